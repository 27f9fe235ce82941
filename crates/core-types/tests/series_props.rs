use chrono::{Duration, TimeZone, Utc};
use core_types::{Bar, CoreError, PriceSeries};
use proptest::prelude::*;

/// Generates valid bar sequences with daily, strictly increasing timestamps.
fn valid_bars(len: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec((1.0f64..500.0, 0.0f64..0.05, 0.0f64..1.0, 0.0f64..1e6), len..=len)
        .prop_map(|rows| {
            let origin = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
            rows.into_iter()
                .enumerate()
                .map(|(i, (base, spread, pos, volume))| {
                    let low = base * (1.0 - spread);
                    let high = base * (1.0 + spread);
                    let close = low + (high - low) * pos;
                    Bar::new(origin + Duration::days(i as i64), base, high, low, close, volume)
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn valid_sequences_construct(bars in valid_bars(30)) {
        let series = PriceSeries::new("PROP", bars.clone()).unwrap();
        prop_assert_eq!(series.len(), 30);
        prop_assert_eq!(series.close().len(), 30);
    }

    #[test]
    fn reversed_sequences_are_rejected(bars in valid_bars(5)) {
        let mut reversed = bars;
        reversed.reverse();
        let err = PriceSeries::new("REV", reversed).unwrap_err();
        prop_assert_eq!(err, CoreError::NonMonotonicTimestamp { index: 1 });
    }
}
