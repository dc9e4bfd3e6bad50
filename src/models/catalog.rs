use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::{Arc, RwLock};

use crate::error::{ProcessingError, Result};
use crate::models::float::FloatRecord;
use crate::models::ordered::OrderedMap;

/// Float metadata keyed by float ID, in source-file order.
#[derive(Debug, Clone, Default)]
pub struct FloatCatalog {
    floats: OrderedMap<FloatRecord>,
}

impl FloatCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records, validating each one.
    ///
    /// A repeated float ID replaces the earlier record but keeps its position.
    pub fn from_records(records: impl IntoIterator<Item = FloatRecord>) -> Result<Self> {
        let mut floats = OrderedMap::new();
        for record in records {
            record.validate_record()?;
            floats.insert(record.float_id.clone(), record);
        }
        Ok(Self { floats })
    }

    pub fn get(&self, float_id: &str) -> Option<&FloatRecord> {
        self.floats.get(float_id)
    }

    /// Like [`FloatCatalog::get`], but a missing float is an error.
    pub fn require(&self, float_id: &str) -> Result<&FloatRecord> {
        self.get(float_id).ok_or_else(|| ProcessingError::FloatNotFound {
            float_id: float_id.to_string(),
        })
    }

    pub fn contains(&self, float_id: &str) -> bool {
        self.floats.contains_key(float_id)
    }

    pub fn len(&self) -> usize {
        self.floats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloatRecord> {
        self.floats.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.floats.keys()
    }

    pub fn validate(&self) -> Result<()> {
        for record in self.iter() {
            record.validate_record()?;
        }
        Ok(())
    }
}

impl Serialize for FloatCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.floats.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FloatCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = OrderedMap::<FloatRecord>::deserialize(deserializer)?;
        let floats = raw
            .into_iter()
            .map(|(float_id, mut record)| {
                record.float_id = float_id.clone();
                (float_id, record)
            })
            .collect();
        Ok(Self { floats })
    }
}

/// Shared handle to the process-wide catalog.
///
/// Readers take a snapshot and keep evaluating against it; a reload
/// swaps the whole catalog so existing snapshots are never mutated.
#[derive(Debug, Clone, Default)]
pub struct CatalogHandle {
    current: Arc<RwLock<Arc<FloatCatalog>>>,
}

impl CatalogHandle {
    pub fn new(catalog: FloatCatalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    pub fn snapshot(&self) -> Arc<FloatCatalog> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the catalog wholesale and return the number of floats loaded.
    pub fn replace(&self, catalog: FloatCatalog) -> usize {
        let count = catalog.len();
        let fresh = Arc::new(catalog);
        match self.current.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
        tracing::info!("Loaded {} floats into catalog", count);
        count
    }
}
