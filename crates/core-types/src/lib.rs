//! # Meridian Core Types
//!
//! The shared vocabulary of the workspace: the immutable `PriceSeries` every
//! indicator and statistic reads, the `Value` type that makes "undefined" an
//! explicit state, and the calendar constants used for annualization.

pub mod enums;
pub mod error;
pub mod series;
pub mod value;

// Re-export the core types to provide a clean public API.
pub use enums::{Frequency, TrueRangeMethod};
pub use error::CoreError;
pub use series::{Bar, PriceSeries};
pub use value::{Series, Value, defined, na_series, series_from};

/// Calendar days per year, used by CAGR.
pub const DAYS_IN_YEAR: f64 = 365.0;
/// Trading days per year, used to annualize daily statistics.
pub const DAYS_IN_TRADING_YEAR: f64 = 252.0;
pub const MONTHS_IN_YEAR: f64 = 12.0;
