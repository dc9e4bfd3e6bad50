use crate::error::{ProcessingError, Result};
use crate::models::FloatCatalog;
use crate::utils::dates::parse_launch_date;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct CatalogStatistics {
    pub total_floats: usize,
    pub positioned_floats: usize,
    pub dated_floats: usize,
    pub launch_range: Option<(NaiveDate, NaiveDate)>,
    pub geographic_bounds: Option<GeographicBounds>,
    /// Float count per platform type; floats without one count as "unknown".
    pub platform_types: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeographicBounds {
    fn point(lat: f64, lon: f64) -> Self {
        Self {
            min_lat: lat,
            max_lat: lat,
            min_lon: lon,
            max_lon: lon,
        }
    }

    fn extend(&mut self, lat: f64, lon: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
    }
}

pub struct CatalogAnalyzer;

impl CatalogAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, catalog: &FloatCatalog) -> Result<CatalogStatistics> {
        if catalog.is_empty() {
            return Err(ProcessingError::Config("No floats in catalog".to_string()));
        }

        let mut bounds: Option<GeographicBounds> = None;
        let mut launch_range: Option<(NaiveDate, NaiveDate)> = None;
        let mut positioned_floats = 0;
        let mut dated_floats = 0;
        let mut platform_types = BTreeMap::new();

        for float in catalog.iter() {
            if let Some((lat, lon)) = float.coordinates() {
                positioned_floats += 1;
                match bounds.as_mut() {
                    Some(b) => b.extend(lat, lon),
                    None => bounds = Some(GeographicBounds::point(lat, lon)),
                }
            }

            if let Some(date) = float.launch_info.date.as_deref().and_then(parse_launch_date) {
                dated_floats += 1;
                launch_range = Some(match launch_range {
                    Some((first, last)) => (first.min(date), last.max(date)),
                    None => (date, date),
                });
            }

            let platform = match float.platform_type().trim() {
                "" => "unknown".to_string(),
                other => other.to_string(),
            };
            *platform_types.entry(platform).or_insert(0) += 1;
        }

        Ok(CatalogStatistics {
            total_floats: catalog.len(),
            positioned_floats,
            dated_floats,
            launch_range,
            geographic_bounds: bounds,
            platform_types,
        })
    }
}

impl Default for CatalogAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStatistics {
    pub fn summary(&self) -> String {
        let launches = match self.launch_range {
            Some((first, last)) => format!("{} to {}", first, last),
            None => "No valid launch dates".to_string(),
        };

        let coverage = match self.geographic_bounds {
            Some(b) => format!(
                "{:.1}°N-{:.1}°N, {:.1}°E-{:.1}°E",
                b.min_lat, b.max_lat, b.min_lon, b.max_lon
            ),
            None => "No positioned floats".to_string(),
        };

        format!(
            "Floats: {} total ({} positioned, {} with launch dates)\n\
            Launches: {}\n\
            Coverage: {}",
            self.total_floats, self.positioned_floats, self.dated_floats, launches, coverage
        )
    }

    pub fn detailed_summary(&self) -> String {
        let platforms: Vec<String> = self
            .platform_types
            .iter()
            .map(|(platform, count)| format!("- {}: {}", platform, count))
            .collect();

        format!("{}\n\nPlatform Types:\n{}", self.summary(), platforms.join("\n"))
    }
}
