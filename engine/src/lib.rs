// Engine library root
// Time-series preparation for the trend dashboards: date-range resolution,
// provider fetch, currency rescaling, statistics and moving averages.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod services;

pub use error::{EngineError, ErrorKind, Result};
