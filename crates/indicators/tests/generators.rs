use chrono::{Duration, TimeZone, Utc};
use core_types::{Bar, PriceSeries};
use proptest::prelude::*;

/// A daily random walk of valid OHLCV bars starting at 2024-01-01.
pub fn price_series(len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = PriceSeries> {
    prop::collection::vec(bar_shape(), len).prop_map(|shapes| {
        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut close = 100.0;
        let bars = shapes
            .into_iter()
            .enumerate()
            .map(|(i, (change, spread, volume))| {
                let open = close;
                close = (close * (1.0 + change)).max(1.0);
                let high = open.max(close) + spread;
                let low = (open.min(close) - spread).max(0.5);
                Bar::new(origin + Duration::days(i as i64), open, high, low, close, volume)
            })
            .collect();
        PriceSeries::new("PROP", bars).unwrap()
    })
}

fn bar_shape() -> impl Strategy<Value = (f64, f64, f64)> {
    (
        -0.05f64..0.05, // close-to-close change
        0.0f64..2.0,    // wick length
        1.0f64..1e6,    // volume
    )
}

/// Closes kept within a band narrow enough that no move doubles a prior close.
pub fn bounded_closes(len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(60.0f64..100.0, len)
}
