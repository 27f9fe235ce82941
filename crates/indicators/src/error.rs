use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Indicator set received invalid parameters: {0}")]
    InvalidParameters(String),
}

impl From<configuration::error::ConfigError> for IndicatorError {
    fn from(err: configuration::error::ConfigError) -> Self {
        IndicatorError::InvalidParameters(err.to_string())
    }
}
