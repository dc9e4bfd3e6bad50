pub mod grouping;
pub mod normalizer;

pub use grouping::group_rows;
pub use normalizer::{NormalizationReport, ResultNormalizer};
