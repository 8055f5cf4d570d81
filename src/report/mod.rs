pub mod plot;
pub mod summary_csv;
pub mod text;
