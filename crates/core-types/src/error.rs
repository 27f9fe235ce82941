use thiserror::Error;

/// Reasons a `PriceSeries` is rejected at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Price series '{0}' contains no bars")]
    EmptySeries(String),

    #[error("Timestamps must be strictly increasing: bar {index} is not after the preceding bar")]
    NonMonotonicTimestamp { index: usize },

    #[error("Invalid price range at bar {index}: {reason}")]
    InvalidRange { index: usize, reason: String },

    #[error("Negative volume {volume} at bar {index}")]
    NegativeVolume { index: usize, volume: f64 },

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}
