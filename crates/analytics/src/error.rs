use configuration::error::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Benchmark '{benchmark}' shares no timestamps with '{symbol}'")]
    NoOverlap { symbol: String, benchmark: String },

    #[error("Invalid statistics settings: {0}")]
    InvalidSettings(#[from] ConfigError),
}
