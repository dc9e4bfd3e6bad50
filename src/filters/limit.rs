use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::constants::LIMIT_ALL;

/// Result-count limit `k`: everything, or the first `n` matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultLimit {
    #[default]
    All,
    Top(usize),
}

impl ResultLimit {
    /// Coerce an integer; negative values mean "no limit".
    pub fn from_count(count: i64) -> Self {
        usize::try_from(count).map(ResultLimit::Top).unwrap_or(ResultLimit::All)
    }

    /// Coerce free text. Anything that is not "all" or an integer means "no limit".
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(ResultLimit::All)
    }

    pub fn apply<T>(&self, mut items: Vec<T>) -> Vec<T> {
        if let ResultLimit::Top(n) = *self {
            items.truncate(n);
        }
        items
    }
}

impl FromStr for ResultLimit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches(|c| c == '"' || c == '\'');
        if trimmed.eq_ignore_ascii_case(LIMIT_ALL) {
            return Ok(ResultLimit::All);
        }
        if let Ok(count) = trimmed.parse::<i64>() {
            return Ok(ResultLimit::from_count(count));
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(ResultLimit::from_count(value.trunc() as i64)),
            _ => Err(format!("'{}' is not a result limit", s)),
        }
    }
}

impl fmt::Display for ResultLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultLimit::All => write!(f, "{}", LIMIT_ALL),
            ResultLimit::Top(n) => write!(f, "{}", n),
        }
    }
}
