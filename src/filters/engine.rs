use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::filters::limit::ResultLimit;
use crate::filters::negation::NegatedFilter;
use crate::filters::parameter::{resolve_fields, resolve_summary_fields, Comparison, ExtremeKind};
use crate::models::{FloatCatalog, FloatRecord, ZeroPolicy};
use crate::utils::coordinates::{haversine_distance, BoundingBox};
use crate::utils::dates::{parse_date_bound, parse_launch_date};

/// Evaluates filter predicates against a catalog snapshot.
///
/// Every predicate is a pure function of the catalog and its arguments.
/// Results are float IDs in catalog order (extreme and nearest queries
/// order by value instead), truncated by the result limit.
pub struct FilterEngine<'a> {
    catalog: &'a FloatCatalog,
    zero_policy: ZeroPolicy,
}

impl<'a> FilterEngine<'a> {
    pub fn new(catalog: &'a FloatCatalog) -> Self {
        Self {
            catalog,
            zero_policy: ZeroPolicy::default(),
        }
    }

    pub fn with_zero_policy(mut self, zero_policy: ZeroPolicy) -> Self {
        self.zero_policy = zero_policy;
        self
    }

    /// Every float ID, the universe for negation.
    pub fn all_float_ids(&self) -> Vec<String> {
        self.catalog.ids().map(str::to_string).collect()
    }

    pub fn get_float_by_id(&self, float_id: &str) -> Vec<String> {
        let float_id = float_id.trim();
        if self.catalog.contains(float_id) {
            vec![float_id.to_string()]
        } else {
            Vec::new()
        }
    }

    fn collect_matching<F>(&self, k: ResultLimit, predicate: F) -> Vec<String>
    where
        F: Fn(&FloatRecord) -> bool,
    {
        let matching: Vec<String> = self
            .catalog
            .iter()
            .filter(|record| predicate(record))
            .map(|record| record.float_id.clone())
            .collect();

        info!("Found {} matching floats", matching.len());
        k.apply(matching)
    }

    /// Floats whose launch position lies inside the box, bounds inclusive.
    pub fn filter_by_coordinates(&self, bbox: &BoundingBox, k: ResultLimit) -> Vec<String> {
        info!(
            "Filtering by coordinates: lat({}, {}), lon({}, {})",
            bbox.lat_min, bbox.lat_max, bbox.lon_min, bbox.lon_max
        );
        if bbox.is_empty() {
            warn!("Bounding box has inverted bounds, nothing can match");
            return Vec::new();
        }

        self.collect_matching(k, |record| {
            record
                .coordinates()
                .is_some_and(|(lat, lon)| bbox.contains(lat, lon))
        })
    }

    /// Floats launched between `start_date` and `end_date` (`YYYY-MM-DD`, inclusive).
    /// Malformed bounds yield no matches.
    pub fn filter_by_date_range(&self, start_date: &str, end_date: &str, k: ResultLimit) -> Vec<String> {
        info!("Filtering by date range: {} to {}", start_date, end_date);

        let (start, end) = match (parse_date_bound(start_date), parse_date_bound(end_date)) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Error parsing input date range: {}", e);
                return Vec::new();
            }
        };

        self.collect_matching(k, |record| {
            record
                .launch_info
                .date
                .as_deref()
                .and_then(parse_launch_date)
                .is_some_and(|launched| start <= launched && launched <= end)
        })
    }

    /// Floats where any resolved field of `parameter` satisfies the comparison.
    pub fn filter_by_parameter_value(
        &self,
        parameter: &str,
        operator: Comparison,
        value: f64,
        k: ResultLimit,
    ) -> Vec<String> {
        info!("Filtering by parameter: {} {} {}", parameter, operator, value);

        let fields = resolve_fields(parameter);
        debug!("Checking fields {:?}", fields);

        self.collect_matching(k, |record| {
            fields.iter().any(|field| {
                record
                    .reading(field, self.zero_policy)
                    .is_some_and(|reading| operator.holds(reading, value))
            })
        })
    }

    /// Floats ordered by their most extreme reading of `parameter`.
    ///
    /// For `Max` each float contributes the largest of its max/min/avg
    /// readings and floats are sorted descending; `Min` is the mirror
    /// image. Floats without any reading are left out, ties keep catalog order.
    pub fn find_extreme_values(&self, parameter: &str, extreme: ExtremeKind, k: ResultLimit) -> Vec<String> {
        info!("Finding extreme values: {} {}", parameter, extreme);

        let Some(fields) = resolve_summary_fields(parameter) else {
            warn!("Unknown parameter '{}'", parameter);
            return Vec::new();
        };

        let mut float_values: Vec<(&str, f64)> = self
            .catalog
            .iter()
            .filter_map(|record| {
                let readings = fields
                    .iter()
                    .filter_map(|field| record.reading(field, self.zero_policy));
                let extreme_value = match extreme {
                    ExtremeKind::Max => readings.reduce(f64::max),
                    ExtremeKind::Min => readings.reduce(f64::min),
                }?;
                Some((record.float_id.as_str(), extreme_value))
            })
            .collect();

        match extreme {
            ExtremeKind::Min => float_values.sort_by(|a, b| a.1.total_cmp(&b.1)),
            ExtremeKind::Max => float_values.sort_by(|a, b| b.1.total_cmp(&a.1)),
        }

        debug!("Ranked {} floats by {} {}", float_values.len(), extreme, parameter);
        k.apply(float_values.into_iter().map(|(id, _)| id.to_string()).collect())
    }

    /// Floats whose launch platform type contains `platform_type`, ignoring case.
    pub fn filter_by_platform_type(&self, platform_type: &str, k: ResultLimit) -> Vec<String> {
        info!("Filtering by platform type: {}", platform_type);

        let needle = platform_type.to_uppercase();
        self.collect_matching(k, |record| record.platform_type().to_uppercase().contains(&needle))
    }

    /// Floats NOT matched by the inner filter, in catalog order.
    pub fn filter_by_negation(&self, filter: &NegatedFilter, k: ResultLimit) -> Result<Vec<String>> {
        info!("Executing negation filter for type '{}'", filter.kind());

        let inner = filter.inner_limit();
        let excluded = match filter {
            NegatedFilter::Coordinates { bbox, .. } => self.filter_by_coordinates(bbox, inner),
            NegatedFilter::DateRange {
                start_date, end_date, ..
            } => self.filter_by_date_range(start_date, end_date, inner),
            NegatedFilter::PlatformType { platform_type, .. } => self.filter_by_platform_type(platform_type, inner),
        };
        let excluded: HashSet<&str> = excluded.iter().map(String::as_str).collect();

        let remaining: Vec<String> = self
            .catalog
            .ids()
            .filter(|id| !excluded.contains(id))
            .map(str::to_string)
            .collect();

        info!("Result of negation: {} floats", remaining.len());
        Ok(k.apply(remaining))
    }

    /// Floats ordered by great-circle distance from a point.
    pub fn find_nearest_floats(&self, latitude: f64, longitude: f64, k: ResultLimit) -> Vec<String> {
        info!("Finding floats nearest to ({}, {})", latitude, longitude);

        let mut distances: Vec<(&str, f64)> = self
            .catalog
            .iter()
            .filter_map(|record| {
                let (lat, lon) = record.coordinates()?;
                Some((
                    record.float_id.as_str(),
                    haversine_distance(latitude, longitude, lat, lon),
                ))
            })
            .collect();
        distances.sort_by(|a, b| a.1.total_cmp(&b.1));

        k.apply(distances.into_iter().map(|(id, _)| id.to_string()).collect())
    }
}
