use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::models::ordered::OrderedMap;

/// One column value returned by the profile store.
///
/// Floats may be NaN (missing depth levels in the source arrays), which
/// JSON cannot represent; `to_json` maps every non-finite float to null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Array(Vec<ColumnValue>),
}

impl ColumnValue {
    pub fn to_json(&self) -> Value {
        match self {
            ColumnValue::Null => Value::Null,
            ColumnValue::Bool(b) => Value::Bool(*b),
            ColumnValue::Int(i) => Value::from(*i),
            ColumnValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ColumnValue::Text(s) => Value::String(s.clone()),
            ColumnValue::Array(items) => Value::Array(items.iter().map(ColumnValue::to_json).collect()),
        }
    }

    /// Text form used for the `juld` timestamp.
    pub fn display_string(&self) -> String {
        match self {
            ColumnValue::Null => "None".to_string(),
            ColumnValue::Text(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Float(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Int(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_string())
    }
}

impl From<Vec<f64>> for ColumnValue {
    fn from(values: Vec<f64>) -> Self {
        ColumnValue::Array(values.into_iter().map(ColumnValue::Float).collect())
    }
}

/// One row fetched from the `argo_profiles` store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub float_id: String,
    pub cycle_number: i64,
    #[serde(default = "null_column")]
    pub juld: ColumnValue,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub columns: BTreeMap<String, ColumnValue>,
}

fn null_column() -> ColumnValue {
    ColumnValue::Null
}

impl ProfileRow {
    pub fn new(float_id: impl Into<String>, cycle_number: i64) -> Self {
        Self {
            float_id: float_id.into(),
            cycle_number,
            juld: ColumnValue::Null,
            latitude: None,
            longitude: None,
            columns: BTreeMap::new(),
        }
    }

    pub fn with_position(mut self, juld: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        self.juld = ColumnValue::Text(juld.into());
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.columns.insert(name.into(), value.into());
        self
    }

    /// Measurement payload stored under the row's cycle key.
    pub fn payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("juld".to_string(), Value::String(self.juld.display_string()));
        payload.insert("latitude".to_string(), optional_number(self.latitude));
        payload.insert("longitude".to_string(), optional_number(self.longitude));
        for (name, value) in &self.columns {
            payload.insert(name.clone(), value.to_json());
        }
        Value::Object(payload)
    }
}

fn optional_number(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Float IDs per caller-supplied group label.
pub type GroupedResult = OrderedMap<Vec<String>>;

/// Cycle number (as text) to measurement payload.
pub type CycleRecord = OrderedMap<Value>;

/// Float ID to its cycles.
pub type FloatCycles = OrderedMap<CycleRecord>;

/// Group label to float ID to cycles.
pub type ResultTree = OrderedMap<FloatCycles>;
