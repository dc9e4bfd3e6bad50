use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use validator::Validate;

use crate::error::{ProcessingError, Result};

/// How a stored parameter value of exactly `0.0` is interpreted.
///
/// The float metadata export writes `0.0` for parameters a float never
/// measured, so `Absent` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    #[default]
    Absent,
    Reading,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LaunchInfo {
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub date: Option<String>,

    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub platform_type: Option<String>,

    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub float_serial_no: Option<String>,

    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub deployment_platform: Option<String>,

    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub deployment_cruise_id: Option<String>,
}

/// Metadata and per-parameter summary statistics for one float.
///
/// Only `launch_info` is typed; every other attribute (`temp_max`,
/// `psal_avg`, `status`, `technical_info`, ...) is kept verbatim so that
/// filters can address fields by their literal name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FloatRecord {
    #[serde(skip)]
    pub float_id: String,

    #[serde(default)]
    #[validate(nested)]
    pub launch_info: LaunchInfo,

    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl FloatRecord {
    pub fn builder(float_id: impl Into<String>) -> FloatRecordBuilder {
        FloatRecordBuilder::new(float_id)
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.launch_info.latitude, self.launch_info.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn platform_type(&self) -> &str {
        self.launch_info.platform_type.as_deref().unwrap_or("")
    }

    /// Raw numeric value of an attribute, if present and numeric.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        self.attributes.get(field).and_then(Value::as_f64)
    }

    /// Numeric value of an attribute that counts as an actual reading.
    pub fn reading(&self, field: &str, policy: ZeroPolicy) -> Option<f64> {
        let value = self.numeric(field)?;
        if !value.is_finite() {
            return None;
        }
        match policy {
            ZeroPolicy::Absent if value == 0.0 => None,
            _ => Some(value),
        }
    }

    pub fn attribute_str(&self, field: &str) -> Option<&str> {
        self.attributes.get(field).and_then(Value::as_str)
    }

    pub fn validate_record(&self) -> Result<()> {
        self.validate().map_err(|source| ProcessingError::Validation {
            float_id: self.float_id.clone(),
            source,
        })
    }
}

/// Accepts strings, numbers and booleans and renders them as text.
fn deserialize_loose_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

pub struct FloatRecordBuilder {
    float_id: String,
    launch_info: LaunchInfo,
    attributes: BTreeMap<String, Value>,
}

impl FloatRecordBuilder {
    pub fn new(float_id: impl Into<String>) -> Self {
        Self {
            float_id: float_id.into(),
            launch_info: LaunchInfo::default(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.launch_info.latitude = Some(latitude);
        self.launch_info.longitude = Some(longitude);
        self
    }

    pub fn launch_date(mut self, date: impl Into<String>) -> Self {
        self.launch_info.date = Some(date.into());
        self
    }

    pub fn platform_type(mut self, platform_type: impl Into<String>) -> Self {
        self.launch_info.platform_type = Some(platform_type.into());
        self
    }

    pub fn parameter(mut self, field: impl Into<String>, value: f64) -> Self {
        if let Some(number) = serde_json::Number::from_f64(value) {
            self.attributes.insert(field.into(), Value::Number(number));
        }
        self
    }

    pub fn attribute(mut self, field: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(field.into(), value);
        self
    }

    pub fn build(self) -> Result<FloatRecord> {
        if self.float_id.trim().is_empty() {
            return Err(ProcessingError::InvalidFormat(
                "float_id must not be empty".to_string(),
            ));
        }

        let record = FloatRecord {
            float_id: self.float_id,
            launch_info: self.launch_info,
            attributes: self.attributes,
        };
        record.validate_record()?;
        Ok(record)
    }
}
