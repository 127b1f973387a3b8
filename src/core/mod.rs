pub mod error;
pub mod types;

pub use error::{DashError, Result};
pub use types::{Metric, Observation, REQUIRED_COLUMNS, finite_or_zero, round_to};
