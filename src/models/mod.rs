pub mod catalog;
pub mod float;
pub mod ordered;
pub mod profile;

pub use catalog::{CatalogHandle, FloatCatalog};
pub use float::{FloatRecord, FloatRecordBuilder, LaunchInfo, ZeroPolicy};
pub use ordered::OrderedMap;
pub use profile::{ColumnValue, CycleRecord, FloatCycles, GroupedResult, ProfileRow, ResultTree};
