pub mod catalog_reader;
pub mod result_reader;

pub use catalog_reader::CatalogReader;
pub use result_reader::read_results;
