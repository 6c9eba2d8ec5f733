//! Date alignment of the weather table with an external secondary series.

pub mod analyzer;
pub mod rolling;
pub mod secondary;
pub mod stats;
pub mod trend;
