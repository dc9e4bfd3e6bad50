use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::filters::limit::ResultLimit;
use crate::utils::coordinates::BoundingBox;

/// Filters that can be negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegationKind {
    Coordinates,
    DateRange,
    PlatformType,
}

impl NegationKind {
    pub fn name(&self) -> &'static str {
        match self {
            NegationKind::Coordinates => "coordinates",
            NegationKind::DateRange => "date_range",
            NegationKind::PlatformType => "platform_type",
        }
    }
}

impl FromStr for NegationKind {
    type Err = ProcessingError;

    /// Accepts the bare kind or phrasing that embeds it, such as
    /// `filter_by_coordinates` or `not date_range`.
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase().replace([' ', '-'], "_");
        [
            NegationKind::Coordinates,
            NegationKind::DateRange,
            NegationKind::PlatformType,
        ]
        .into_iter()
        .find(|kind| lowered.contains(kind.name()))
        .ok_or_else(|| ProcessingError::InvalidFilterType(s.to_string()))
    }
}

impl fmt::Display for NegationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The inner filter whose matches are excluded.
#[derive(Debug, Clone, PartialEq)]
pub enum NegatedFilter {
    Coordinates {
        bbox: BoundingBox,
        k: ResultLimit,
    },
    DateRange {
        start_date: String,
        end_date: String,
        k: ResultLimit,
    },
    PlatformType {
        platform_type: String,
        k: ResultLimit,
    },
}

impl NegatedFilter {
    pub fn coordinates(bbox: BoundingBox) -> Self {
        NegatedFilter::Coordinates {
            bbox,
            k: ResultLimit::All,
        }
    }

    pub fn date_range(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        NegatedFilter::DateRange {
            start_date: start_date.into(),
            end_date: end_date.into(),
            k: ResultLimit::All,
        }
    }

    pub fn platform_type(platform_type: impl Into<String>) -> Self {
        NegatedFilter::PlatformType {
            platform_type: platform_type.into(),
            k: ResultLimit::All,
        }
    }

    pub fn kind(&self) -> NegationKind {
        match self {
            NegatedFilter::Coordinates { .. } => NegationKind::Coordinates,
            NegatedFilter::DateRange { .. } => NegationKind::DateRange,
            NegatedFilter::PlatformType { .. } => NegationKind::PlatformType,
        }
    }

    /// Limit applied to the inner filter before the complement is taken.
    pub fn inner_limit(&self) -> ResultLimit {
        match self {
            NegatedFilter::Coordinates { k, .. }
            | NegatedFilter::DateRange { k, .. }
            | NegatedFilter::PlatformType { k, .. } => *k,
        }
    }

    pub fn with_inner_limit(mut self, limit: ResultLimit) -> Self {
        match &mut self {
            NegatedFilter::Coordinates { k, .. }
            | NegatedFilter::DateRange { k, .. }
            | NegatedFilter::PlatformType { k, .. } => *k = limit,
        }
        self
    }
}
