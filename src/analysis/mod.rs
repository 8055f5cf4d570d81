pub mod aggregate;
pub mod align;
pub mod correlation;
pub mod outlier;
pub mod pipeline;
pub mod series;
