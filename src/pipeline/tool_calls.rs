//! Parsing of the `TOOL_CALLS:` block a filter planner emits.
//!
//! ```text
//! TOOL_CALLS:
//! filter_by_coordinates: lat_min=5, lat_max=22, lon_min=80, lon_max=95, k=all
//! filter_by_parameter_value: parameter='temperature', operator='>', value=25
//! ```

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

use crate::error::{ProcessingError, Result};
use crate::filters::{NegatedFilter, NegationKind, ResultLimit};
use crate::utils::constants::{LIMIT_ALL, TOOL_CALLS_MARKER};
use crate::utils::coordinates::BoundingBox;

fn call_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:(?:[-*]|\d+[.)])\s*)?[`\[]?(\w+)[`\]]?\s*:\s*(.*?)[\s`]*$")
            .expect("valid tool call regex")
    })
}

fn key_start_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\w+\s*=").expect("valid key regex"))
}

/// A single argument value as written by the planner.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    All,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ArgValue {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let quoted = raw.starts_with('"') || raw.starts_with('\'');
        let lowered = raw.to_lowercase();

        if lowered == LIMIT_ALL {
            return ArgValue::All;
        }
        if lowered == "true" || lowered == "false" {
            return ArgValue::Bool(lowered == "true");
        }
        if !quoted {
            if let Ok(i) = raw.parse::<i64>() {
                return ArgValue::Int(i);
            }
            if let Ok(f) = raw.parse::<f64>() {
                if f.is_finite() {
                    return ArgValue::Float(f);
                }
            }
        }
        ArgValue::Text(raw.trim_matches(|c| c == '"' || c == '\'').to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Int(i) => Some(*i as f64),
            ArgValue::Float(f) => Some(*f),
            ArgValue::Text(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            ArgValue::All => LIMIT_ALL.to_string(),
            ArgValue::Bool(b) => b.to_string(),
            ArgValue::Int(i) => i.to_string(),
            ArgValue::Float(f) => f.to_string(),
            ArgValue::Text(s) => s.clone(),
        }
    }

    /// Coerce to a result limit; anything unusable means "no limit".
    pub fn as_limit(&self) -> ResultLimit {
        match self {
            ArgValue::Int(i) => ResultLimit::from_count(*i),
            ArgValue::Float(f) if f.is_finite() => ResultLimit::from_count(f.trunc() as i64),
            ArgValue::Text(s) => ResultLimit::parse_lenient(s),
            _ => ResultLimit::All,
        }
    }
}

/// Named arguments of one tool call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs(BTreeMap<String, ArgValue>);

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ArgValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn number(&self, key: &str) -> Result<f64> {
        let value = self
            .get(key)
            .ok_or_else(|| ProcessingError::InvalidParameter(format!("missing argument '{}'", key)))?;
        value.as_f64().ok_or_else(|| {
            ProcessingError::InvalidParameter(format!("argument '{}' is not a number: {:?}", key, value))
        })
    }

    pub fn number_or(&self, key: &str, default: f64) -> Result<f64> {
        if self.contains(key) {
            self.number(key)
        } else {
            Ok(default)
        }
    }

    pub fn text(&self, key: &str) -> Result<String> {
        self.get(key)
            .map(ArgValue::as_text)
            .ok_or_else(|| ProcessingError::InvalidParameter(format!("missing argument '{}'", key)))
    }

    pub fn limit(&self, key: &str) -> ResultLimit {
        self.get(key).map(ArgValue::as_limit).unwrap_or_default()
    }

    /// Coordinate box; omitted latitude bounds span the globe, likewise longitude.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        const KEYS: [&str; 4] = ["lat_min", "lat_max", "lon_min", "lon_max"];
        if !KEYS.iter().any(|key| self.contains(key)) {
            return Err(ProcessingError::InvalidParameter(
                "coordinate filter needs at least one of lat_min, lat_max, lon_min, lon_max".to_string(),
            ));
        }
        Ok(BoundingBox::new(
            self.number_or("lat_min", -90.0)?,
            self.number_or("lat_max", 90.0)?,
            self.number_or("lon_min", -180.0)?,
            self.number_or("lon_max", 180.0)?,
        ))
    }
}

/// Filter operations a plan can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    FilterByCoordinates,
    FilterByDateRange,
    FilterByParameterValue,
    FindExtremeValues,
    FilterByPlatformType,
    FilterByNegation,
    CombineFilters,
    GetAllFloatIds,
    GetFloatById,
    FindNearestFloats,
}

impl ToolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::FilterByCoordinates => "filter_by_coordinates",
            ToolName::FilterByDateRange => "filter_by_date_range",
            ToolName::FilterByParameterValue => "filter_by_parameter_value",
            ToolName::FindExtremeValues => "find_extreme_values",
            ToolName::FilterByPlatformType => "filter_by_platform_type",
            ToolName::FilterByNegation => "filter_by_negation",
            ToolName::CombineFilters => "combine_filters",
            ToolName::GetAllFloatIds => "get_all_float_ids",
            ToolName::GetFloatById => "get_float_by_id",
            ToolName::FindNearestFloats => "find_nearest_floats",
        }
    }
}

impl FromStr for ToolName {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim() {
            "filter_by_coordinates" => ToolName::FilterByCoordinates,
            "filter_by_date_range" => ToolName::FilterByDateRange,
            "filter_by_parameter_value" => ToolName::FilterByParameterValue,
            "find_extreme_values" => ToolName::FindExtremeValues,
            "filter_by_platform_type" => ToolName::FilterByPlatformType,
            "filter_by_negation" => ToolName::FilterByNegation,
            "combine_filters" => ToolName::CombineFilters,
            "get_all_float_ids" => ToolName::GetAllFloatIds,
            "get_float_by_id" => ToolName::GetFloatById,
            "find_nearest_floats" => ToolName::FindNearestFloats,
            other => return Err(ProcessingError::ToolCallParse(format!("unknown tool '{}'", other))),
        })
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: ToolArgs,
}

/// Split `a=1, b='x, y', c=3` on the commas that start a new `key=`.
fn split_arguments(params: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (pos, _) in params.match_indices(',') {
        if key_start_regex().is_match(&params[pos + 1..]) {
            pieces.push(&params[start..pos]);
            start = pos + 1;
        }
    }
    pieces.push(&params[start..]);
    pieces
}

fn parse_arguments(params: &str) -> ToolArgs {
    let mut args = ToolArgs::new();
    if params.trim().is_empty() {
        return args;
    }
    for piece in split_arguments(params) {
        if let Some((key, value)) = piece.split_once('=') {
            args.insert(key.trim(), ArgValue::parse(value));
        }
    }
    args
}

/// Parse every call after the last `TOOL_CALLS:` marker (or the whole text if
/// there is none). Lines that are not `name: args` are ignored.
pub fn parse_tool_calls(response: &str) -> Vec<ToolCall> {
    let section = match response.rfind(TOOL_CALLS_MARKER) {
        Some(pos) => &response[pos + TOOL_CALLS_MARKER.len()..],
        None => response,
    };

    let mut calls = Vec::new();
    for line in section.lines() {
        let Some(captures) = call_line_regex().captures(line) else {
            continue;
        };
        let name = captures[1].to_string();
        let params = captures.get(2).map_or("", |m| m.as_str());

        if !params.is_empty() && !params.contains('=') {
            warn!("Could not parse parameters for {}: {}", name, params);
            continue;
        }
        calls.push(ToolCall {
            name,
            args: parse_arguments(params),
        });
    }
    calls
}

/// Typed form of a tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterRequest {
    Coordinates {
        bbox: BoundingBox,
        k: ResultLimit,
    },
    DateRange {
        start_date: String,
        end_date: String,
        k: ResultLimit,
    },
    ParameterValue {
        parameter: String,
        operator: String,
        value: f64,
        k: ResultLimit,
    },
    ExtremeValues {
        parameter: String,
        extreme_type: String,
        k: ResultLimit,
    },
    PlatformType {
        platform_type: String,
        k: ResultLimit,
    },
    Negation {
        filter: NegatedFilter,
        k: ResultLimit,
    },
    Combine,
    AllFloatIds,
    FloatById {
        float_id: String,
    },
    NearestFloats {
        latitude: f64,
        longitude: f64,
        k: ResultLimit,
    },
}

impl FilterRequest {
    pub fn from_call(call: &ToolCall) -> Result<Self> {
        let args = &call.args;
        let k = args.limit("k");

        Ok(match call.name.parse::<ToolName>()? {
            ToolName::FilterByCoordinates => FilterRequest::Coordinates {
                bbox: args.bounding_box()?,
                k,
            },
            ToolName::FilterByDateRange => FilterRequest::DateRange {
                start_date: args.text("start_date")?,
                end_date: args.text("end_date")?,
                k,
            },
            ToolName::FilterByParameterValue => FilterRequest::ParameterValue {
                parameter: args.text("parameter")?,
                operator: args.text("operator")?,
                value: args.number("value")?,
                k,
            },
            ToolName::FindExtremeValues => FilterRequest::ExtremeValues {
                parameter: args.text("parameter")?,
                extreme_type: args.text("extreme_type")?,
                k,
            },
            ToolName::FilterByPlatformType => FilterRequest::PlatformType {
                platform_type: args.text("platform_type")?,
                k,
            },
            ToolName::FilterByNegation => FilterRequest::Negation {
                filter: negated_filter(args)?,
                k,
            },
            ToolName::CombineFilters => FilterRequest::Combine,
            ToolName::GetAllFloatIds => FilterRequest::AllFloatIds,
            ToolName::GetFloatById => FilterRequest::FloatById {
                float_id: args.text("float_id")?,
            },
            ToolName::FindNearestFloats => FilterRequest::NearestFloats {
                latitude: args.number("latitude")?,
                longitude: args.number("longitude")?,
                k,
            },
        })
    }
}

fn negated_filter(args: &ToolArgs) -> Result<NegatedFilter> {
    let kind: NegationKind = args.text("filter_type")?.parse()?;
    let filter = match kind {
        NegationKind::Coordinates => NegatedFilter::coordinates(args.bounding_box()?),
        NegationKind::DateRange => {
            NegatedFilter::date_range(args.text("start_date")?, args.text("end_date")?)
        }
        NegationKind::PlatformType => NegatedFilter::platform_type(args.text("platform_type")?),
    };
    Ok(filter.with_inner_limit(args.limit("inner_k")))
}
