use serde::{Deserialize, Serialize};

/// Selects how the true range of a bar is measured.
///
/// `Legacy` is `high - previous low`, the historical definition every dependent
/// indicator (ATR, ADX, Keltner Channels, Chandelier Exit) was calibrated on.
/// `Canonical` is `max(high - low, |high - previous close|, |low - previous close|)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrueRangeMethod {
    #[default]
    Legacy,
    Canonical,
}

/// Resolution a close series can be resampled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Number of periods of this frequency in one year, used for annualization.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Frequency::Daily => crate::DAYS_IN_TRADING_YEAR,
            Frequency::Monthly => crate::MONTHS_IN_YEAR,
            Frequency::Yearly => 1.0,
        }
    }
}
