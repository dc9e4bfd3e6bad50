pub mod catalog_analyzer;

pub use catalog_analyzer::{CatalogAnalyzer, CatalogStatistics, GeographicBounds};
