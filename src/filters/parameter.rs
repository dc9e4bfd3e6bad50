use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{STAT_AVG, STAT_MAX, STAT_MIN, STAT_SUFFIXES};

/// Public parameter names and the field prefix their statistics are stored under.
const PARAMETER_ALIASES: &[(&str, &str)] = &[
    ("temperature", "temp"),
    ("temp", "temp"),
    ("psal", "psal"),
    ("salinity", "psal"),
    ("pres", "pres"),
    ("pressure", "pres"),
    ("depth", "pres"),
    ("doxy", "doxy"),
    ("oxygen", "doxy"),
    ("dissolved_oxygen", "doxy"),
    ("chlorophyll", "fluorescence_chla"),
    ("chla", "fluorescence_chla"),
    ("fluorescence_chla", "fluorescence_chla"),
    ("bbp700", "bbp700"),
    ("backscatter", "bbp700"),
    ("nitrate", "nitrate"),
    ("ph", "ph"),
    ("turbidity", "turbidity"),
    ("cdom", "cdom"),
];

/// Field prefix for a generic parameter name, if it is a known one.
pub fn base_field(parameter: &str) -> Option<&'static str> {
    let lowered = parameter.trim().to_lowercase();
    PARAMETER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, base)| *base)
}

fn summary_fields_for(base: &str) -> Vec<String> {
    [STAT_MAX, STAT_MIN, STAT_AVG]
        .iter()
        .map(|stat| format!("{}_{}", base, stat))
        .collect()
}

/// Resolve a parameter name to the fields a threshold filter checks.
///
/// * `temp_min` (already qualified) checks only that field.
/// * `temperature` (known generic name) checks `temp_max`, `temp_min`, `temp_avg`.
/// * anything else is used as a literal field name.
pub fn resolve_fields(parameter: &str) -> Vec<String> {
    let trimmed = parameter.trim();
    if STAT_SUFFIXES.iter().any(|suffix| trimmed.ends_with(suffix)) {
        return vec![trimmed.to_string()];
    }
    match base_field(trimmed) {
        Some(base) => summary_fields_for(base),
        None => vec![trimmed.to_string()],
    }
}

/// Resolve a generic parameter name to its three summary fields.
/// Unknown names resolve to nothing.
pub fn resolve_summary_fields(parameter: &str) -> Option<Vec<String>> {
    base_field(parameter).map(summary_fields_for)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "==")]
    Equal,
}

impl Comparison {
    pub fn holds(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Greater => lhs > rhs,
            Comparison::Less => lhs < rhs,
            Comparison::GreaterOrEqual => lhs >= rhs,
            Comparison::LessOrEqual => lhs <= rhs,
            Comparison::Equal => lhs == rhs,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
            Comparison::Equal => "==",
        }
    }
}

impl FromStr for Comparison {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            ">" => Ok(Comparison::Greater),
            "<" => Ok(Comparison::Less),
            ">=" => Ok(Comparison::GreaterOrEqual),
            "<=" => Ok(Comparison::LessOrEqual),
            "==" | "=" => Ok(Comparison::Equal),
            other => Err(ProcessingError::InvalidParameter(format!(
                "unknown comparison operator '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremeKind {
    Max,
    Min,
}

impl FromStr for ExtremeKind {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "max" | "maximum" | "highest" => Ok(ExtremeKind::Max),
            "min" | "minimum" | "lowest" => Ok(ExtremeKind::Min),
            other => Err(ProcessingError::InvalidParameter(format!(
                "unknown extreme type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ExtremeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtremeKind::Max => f.write_str(STAT_MAX),
            ExtremeKind::Min => f.write_str(STAT_MIN),
        }
    }
}
