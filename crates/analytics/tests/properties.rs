use analytics::{AnalyticsEngine, drawdown, drawdown_episodes};
use chrono::{DateTime, Duration, TimeZone, Utc};
use core_types::{PriceSeries, Value, series_from};
use proptest::prelude::*;

fn timestamps(n: usize) -> Vec<DateTime<Utc>> {
    let origin = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    (0..n).map(|i| origin + Duration::days(i as i64)).collect()
}

/// Closes with an occasional undefined gap.
fn closes() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::weighted(0.9, 1.0f64..500.0), 1..200)
}

proptest! {
    #[test]
    fn drawdown_is_never_positive_and_zero_at_new_highs(values in closes()) {
        let close: Vec<Value> = values.iter().map(|&v| Value::from(v)).collect();
        let dd = drawdown(&close);
        let mut peak = f64::NEG_INFINITY;
        for (c, d) in close.iter().zip(&dd) {
            if let Some(d) = d.get() {
                prop_assert!(d <= 0.0);
            }
            if let Some(c) = c.get() {
                if c >= peak {
                    prop_assert_eq!(*d, Value::ZERO);
                    peak = c;
                }
            }
        }
    }

    #[test]
    fn episodes_are_ordered_and_disjoint(values in prop::collection::vec(1.0f64..500.0, 1..200)) {
        let close = series_from(&values);
        let ts = timestamps(values.len());
        let episodes = drawdown_episodes(&ts, &drawdown(&close));
        for e in &episodes {
            prop_assert!(e.days >= 0);
            prop_assert!(e.start <= e.end);
            prop_assert!(e.depth < 0.0);
        }
        for pair in episodes.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn report_never_panics(values in prop::collection::vec(1.0f64..500.0, 1..800)) {
        let ts = timestamps(values.len());
        let points: Vec<_> = ts.into_iter().zip(values).collect();
        let series = PriceSeries::from_closes("PROP", &points).unwrap();
        let report = AnalyticsEngine::default().calculate(&series);
        prop_assert_eq!(report.start, series.first_timestamp());
        if let Some(dd) = report.max_drawdown.get() {
            prop_assert!(dd <= 0.0);
        }
    }
}

#[test]
fn three_bar_series_reports_only_descriptive_fields() {
    let points: Vec<_> = timestamps(3).into_iter().zip([10.0, 12.0, 9.0]).collect();
    let series = PriceSeries::from_closes("SHORT", &points).unwrap();
    let report = AnalyticsEngine::default().calculate(&series);
    assert_eq!(report.name, "SHORT");
    assert_eq!(report.market_cap, 1.0);
    assert!(report.total_return.is_na());
    assert!(report.cagr.is_na());
    assert!(report.best_day.is_none());
    assert!(report.return_table.is_empty());
}
