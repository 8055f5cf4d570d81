pub mod extractor;
pub mod records;
pub mod store;
