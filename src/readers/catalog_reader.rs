use crate::error::Result;
use crate::models::{FloatCatalog, FloatRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

pub struct CatalogReader {
    skip_invalid: bool,
}

impl CatalogReader {
    pub fn new() -> Self {
        Self {
            skip_invalid: false,
        }
    }

    pub fn with_skip_invalid(skip_invalid: bool) -> Self {
        Self { skip_invalid }
    }

    /// Read float metadata from a JSON object keyed by float ID
    pub fn read_catalog(&self, path: &Path) -> Result<FloatCatalog> {
        info!("Reading float metadata from {}", path.display());
        let file = File::open(path)?;
        self.read_catalog_from(BufReader::new(file))
    }

    pub fn read_catalog_from<R: Read>(&self, reader: R) -> Result<FloatCatalog> {
        let raw: FloatCatalog = serde_json::from_reader(reader)?;
        self.validated(raw)
    }

    pub fn parse_catalog(&self, json: &str) -> Result<FloatCatalog> {
        let raw: FloatCatalog = serde_json::from_str(json)?;
        self.validated(raw)
    }

    fn validated(&self, raw: FloatCatalog) -> Result<FloatCatalog> {
        if !self.skip_invalid {
            raw.validate()?;
            info!("Loaded {} floats", raw.len());
            return Ok(raw);
        }

        let total = raw.len();
        let kept: Vec<FloatRecord> = raw
            .iter()
            .filter(|record| match record.validate_record() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping float: {}", e);
                    false
                }
            })
            .cloned()
            .collect();

        if kept.len() < total {
            warn!("Skipped {} invalid floats", total - kept.len());
        }
        let catalog = FloatCatalog::from_records(kept)?;
        info!("Loaded {} floats", catalog.len());
        Ok(catalog)
    }
}

impl Default for CatalogReader {
    fn default() -> Self {
        Self::new()
    }
}
