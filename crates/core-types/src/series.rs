use crate::error::CoreError;
use crate::value::{Series, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One time-indexed OHLCV observation.
///
/// Any price field may be undefined (`null` in JSON) when the source left a gap;
/// the range invariants are only checked between fields that are defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: Value,
    pub high: Value,
    pub low: Value,
    pub close: Value,
    #[serde(alias = "adj_close", default)]
    pub adjusted_close: Value,
    #[serde(default)]
    pub volume: Value,
}

impl Bar {
    /// Creates a fully defined bar whose adjusted close equals its close.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open: Value::new(open),
            high: Value::new(high),
            low: Value::new(low),
            close: Value::new(close),
            adjusted_close: Value::new(close),
            volume: Value::new(volume),
        }
    }

    /// Overrides the adjusted close.
    pub fn with_adjusted_close(mut self, adjusted_close: f64) -> Self {
        self.adjusted_close = Value::new(adjusted_close);
        self
    }

    fn validate(&self, index: usize) -> Result<(), CoreError> {
        if let (Some(high), Some(low)) = (self.high.get(), self.low.get()) {
            if high < low {
                return Err(CoreError::InvalidRange {
                    index,
                    reason: format!("high {high} is below low {low}"),
                });
            }
        }
        for (name, field) in [("open", self.open), ("close", self.close)] {
            let Some(price) = field.get() else { continue };
            if let Some(high) = self.high.get() {
                if price > high {
                    return Err(CoreError::InvalidRange {
                        index,
                        reason: format!("{name} {price} is above high {high}"),
                    });
                }
            }
            if let Some(low) = self.low.get() {
                if price < low {
                    return Err(CoreError::InvalidRange {
                        index,
                        reason: format!("{name} {price} is below low {low}"),
                    });
                }
            }
        }
        if let Some(volume) = self.volume.get() {
            if volume < 0.0 {
                return Err(CoreError::NegativeVolume { index, volume });
            }
        }
        Ok(())
    }
}

/// An immutable, time-ordered OHLCV history for one instrument.
///
/// Construction is the only place input is validated: once a `PriceSeries`
/// exists its timestamps are strictly increasing and every bar satisfies the
/// OHLC range invariants. Derived series (slices) are new values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(CoreError::EmptySeries(symbol));
        }
        for (index, bar) in bars.iter().enumerate() {
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(CoreError::NonMonotonicTimestamp { index });
            }
            bar.validate(index)?;
        }
        tracing::debug!(symbol = %symbol, bars = bars.len(), "Constructed price series.");
        Ok(Self { symbol, bars })
    }

    /// Builds a series from `(timestamp, close)` pairs; every OHLC field is the close.
    pub fn from_closes(
        symbol: impl Into<String>,
        closes: &[(DateTime<Utc>, f64)],
    ) -> Result<Self, CoreError> {
        let bars = closes
            .iter()
            .map(|&(ts, c)| Bar::new(ts, c, c, c, c, 0.0))
            .collect();
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn first_timestamp(&self) -> DateTime<Utc> {
        self.bars[0].timestamp
    }

    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.bars[self.bars.len() - 1].timestamp
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn open(&self) -> Series {
        self.column(|b| b.open)
    }

    pub fn high(&self) -> Series {
        self.column(|b| b.high)
    }

    pub fn low(&self) -> Series {
        self.column(|b| b.low)
    }

    pub fn close(&self) -> Series {
        self.column(|b| b.close)
    }

    pub fn adjusted_close(&self) -> Series {
        self.column(|b| b.adjusted_close)
    }

    pub fn volume(&self) -> Series {
        self.column(|b| b.volume)
    }

    /// Index of the last bar at or before `ts`, if any.
    pub fn index_at_or_before(&self, ts: DateTime<Utc>) -> Option<usize> {
        let after = self.bars.partition_point(|b| b.timestamp <= ts);
        after.checked_sub(1)
    }

    /// The bars from `ts` (inclusive) to the end, as a new series.
    ///
    /// Returns `None` when no bar falls on or after `ts`.
    pub fn slice_from(&self, ts: DateTime<Utc>) -> Option<PriceSeries> {
        let start = self.bars.partition_point(|b| b.timestamp < ts);
        if start >= self.bars.len() {
            return None;
        }
        Some(Self {
            symbol: self.symbol.clone(),
            bars: self.bars[start..].to_vec(),
        })
    }

    fn column(&self, f: impl Fn(&Bar) -> Value) -> Series {
        self.bars.iter().map(f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    #[test]
    fn rejects_empty_series() {
        let err = PriceSeries::new("EMPTY", vec![]).unwrap_err();
        assert_eq!(err, CoreError::EmptySeries("EMPTY".to_string()));
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let bars = vec![
            Bar::new(day(0), 1.0, 1.0, 1.0, 1.0, 0.0),
            Bar::new(day(0), 1.0, 1.0, 1.0, 1.0, 0.0),
        ];
        let err = PriceSeries::new("DUP", bars).unwrap_err();
        assert_eq!(err, CoreError::NonMonotonicTimestamp { index: 1 });
    }

    #[test]
    fn rejects_high_below_low() {
        let bars = vec![Bar::new(day(0), 1.0, 1.0, 2.0, 1.5, 0.0)];
        assert!(matches!(
            PriceSeries::new("BAD", bars),
            Err(CoreError::InvalidRange { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_close_outside_range() {
        let bars = vec![Bar::new(day(0), 1.0, 2.0, 0.5, 3.0, 0.0)];
        assert!(matches!(
            PriceSeries::new("BAD", bars),
            Err(CoreError::InvalidRange { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_negative_volume() {
        let bars = vec![Bar::new(day(0), 1.0, 1.0, 1.0, 1.0, -5.0)];
        assert!(matches!(
            PriceSeries::new("BAD", bars),
            Err(CoreError::NegativeVolume { index: 0, .. })
        ));
    }

    #[test]
    fn undefined_fields_skip_range_checks() {
        let mut bar = Bar::new(day(0), 1.0, 2.0, 0.5, 1.5, 10.0);
        bar.close = Value::NA;
        bar.high = Value::NA;
        let series = PriceSeries::new("GAP", vec![bar]).unwrap();
        assert!(series.close()[0].is_na());
    }

    #[test]
    fn slices_from_timestamp() {
        let closes: Vec<_> = (0..5).map(|i| (day(i), 100.0 + i as f64)).collect();
        let series = PriceSeries::from_closes("X", &closes).unwrap();
        let tail = series.slice_from(day(2)).unwrap();
        assert_eq!(tail.len(), 3);
        assert_eq!(tail.close()[0], Value::new(102.0));
        assert!(series.slice_from(day(10)).is_none());
        assert_eq!(series.index_at_or_before(day(3)), Some(3));
        assert_eq!(series.index_at_or_before(day(-1)), None);
    }

    #[test]
    fn deserializes_bars_with_gaps() {
        let json = r#"[
            {"timestamp":"2024-01-01T00:00:00Z","open":1.0,"high":2.0,"low":0.5,"close":1.5,"adj_close":1.4,"volume":100.0},
            {"timestamp":"2024-01-02T00:00:00Z","open":null,"high":null,"low":null,"close":null,"volume":null}
        ]"#;
        let bars: Vec<Bar> = serde_json::from_str(json).unwrap();
        let series = PriceSeries::new("JSON", bars).unwrap();
        assert_eq!(series.adjusted_close()[0], Value::new(1.4));
        assert!(series.close()[1].is_na());
    }
}
