pub mod combine;
pub mod engine;
pub mod limit;
pub mod negation;
pub mod parameter;

pub use combine::combine_filters;
pub use engine::FilterEngine;
pub use limit::ResultLimit;
pub use negation::{NegatedFilter, NegationKind};
pub use parameter::{resolve_fields, resolve_summary_fields, Comparison, ExtremeKind};
