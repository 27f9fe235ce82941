use chrono::{DateTime, Datelike, Utc};
use core_types::{Frequency, PriceSeries, Series, Value};
use indicators::rolling::pct_change;

/// A close series sampled at one observation per calendar period.
#[derive(Debug, Clone, PartialEq)]
pub struct Resampled {
    pub frequency: Frequency,
    /// The timestamp of the last bar of each period.
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Series,
}

impl Resampled {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Value {
        self.values.last().copied().unwrap_or(Value::NA)
    }

    /// Period-over-period returns. Slot 0 is always undefined.
    pub fn returns(&self) -> Series {
        pct_change(&self.values, 1)
    }
}

fn period_key(ts: DateTime<Utc>, frequency: Frequency) -> (i32, u32, u32) {
    match frequency {
        Frequency::Daily => (ts.year(), ts.month(), ts.day()),
        Frequency::Monthly => (ts.year(), ts.month(), 0),
        Frequency::Yearly => (ts.year(), 0, 0),
    }
}

/// Last close of every calendar period that has at least one bar.
///
/// Each observation is the last defined close inside the period (undefined
/// if the period has none) labelled with the period's last bar timestamp.
/// Periods without bars are skipped, not filled.
pub fn resample(series: &PriceSeries, frequency: Frequency) -> Resampled {
    let mut out = Resampled {
        frequency,
        timestamps: Vec::new(),
        values: Vec::new(),
    };
    let mut current = None;

    for bar in series.bars() {
        let key = period_key(bar.timestamp, frequency);
        if current != Some(key) {
            current = Some(key);
            out.timestamps.push(bar.timestamp);
            out.values.push(bar.close);
            continue;
        }
        if let (Some(ts), Some(value)) = (out.timestamps.last_mut(), out.values.last_mut()) {
            *ts = bar.timestamp;
            *value = bar.close.or(*value);
        }
    }
    out
}
