use core_types::{PriceSeries, Series, TrueRangeMethod, Value};
use serde::Serialize;

use crate::rolling::shift;

/// Where the close sits within the bar's range, in `[-1, 1]`.
///
/// `((close - low) - (high - close)) / (high - low)`; undefined for a zero range.
pub fn money_flow(series: &PriceSeries) -> Series {
    series
        .bars()
        .iter()
        .map(|b| ((b.close - b.low) - (b.high - b.close)) / (b.high - b.low))
        .collect()
}

pub fn money_flow_volume(series: &PriceSeries) -> Series {
    money_flow(series)
        .into_iter()
        .zip(series.volume())
        .map(|(mf, v)| mf * v)
        .collect()
}

/// `(high + low + close) / 3`.
pub fn typical_price(series: &PriceSeries) -> Series {
    series
        .bars()
        .iter()
        .map(|b| (b.high + b.low + b.close) / 3.0)
        .collect()
}

/// `open - previous close`.
pub fn close_to_open_range(series: &PriceSeries) -> Series {
    let prev_close = shift(&series.close(), 1);
    series
        .open()
        .into_iter()
        .zip(prev_close)
        .map(|(open, prev)| open - prev)
        .collect()
}

pub fn high_low_spread(series: &PriceSeries) -> Series {
    series.bars().iter().map(|b| b.high - b.low).collect()
}

/// True range per bar. Bar 0 is undefined under either definition since both
/// need the previous bar.
pub fn true_range(series: &PriceSeries, method: TrueRangeMethod) -> Series {
    let bars = series.bars();
    let mut out = Vec::with_capacity(bars.len());
    out.push(Value::NA);
    out.extend(bars.windows(2).map(|pair| {
        let (prev, bar) = (&pair[0], &pair[1]);
        match method {
            TrueRangeMethod::Legacy => bar.high - prev.low,
            TrueRangeMethod::Canonical => (bar.high - bar.low)
                .max((bar.high - prev.close).abs())
                .max((bar.low - prev.close).abs()),
        }
    }));
    out
}

/// `100 * (close - close[n]) / close[n]`.
pub fn rate_of_change(close: &[Value], period: usize) -> Series {
    let lagged = shift(close, period as isize);
    close
        .iter()
        .zip(lagged)
        .map(|(&c, prev)| 100.0 * (c - prev) / prev)
        .collect()
}

/// Five evenly spaced levels from the low (`l1`) to the high (`l5`) of each bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantRange {
    pub l1: Series,
    pub l2: Series,
    pub l3: Series,
    pub l4: Series,
    pub l5: Series,
}

pub fn quadrant_range(series: &PriceSeries) -> QuadrantRange {
    let quarter: Series = high_low_spread(series).into_iter().map(|s| s / 4.0).collect();
    let level = |k: f64| -> Series {
        series
            .low()
            .into_iter()
            .zip(&quarter)
            .map(|(low, &q)| low + k * q)
            .collect()
    };
    QuadrantRange {
        l1: level(0.0),
        l2: level(1.0),
        l3: level(2.0),
        l4: level(3.0),
        l5: level(4.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bars;
    use approx::assert_relative_eq;

    #[test]
    fn money_flow_spans_minus_one_to_one() {
        let series = bars(&[(10.0, 12.0, 8.0, 12.0, 100.0), (10.0, 12.0, 8.0, 8.0, 100.0)]);
        let mf = money_flow(&series);
        assert_eq!(mf, vec![Value::new(1.0), Value::new(-1.0)]);
        assert_eq!(money_flow_volume(&series)[1], Value::new(-100.0));
    }

    #[test]
    fn zero_range_money_flow_is_undefined() {
        let series = bars(&[(10.0, 10.0, 10.0, 10.0, 1.0)]);
        assert!(money_flow(&series)[0].is_na());
    }

    #[test]
    fn true_range_methods_differ_on_gaps() {
        // Gap up: previous close 10, bar trades 14..16.
        let series = bars(&[(9.0, 11.0, 9.0, 10.0, 0.0), (15.0, 16.0, 14.0, 15.0, 0.0)]);
        let legacy = true_range(&series, TrueRangeMethod::Legacy);
        let canonical = true_range(&series, TrueRangeMethod::Canonical);
        assert!(legacy[0].is_na() && canonical[0].is_na());
        assert_eq!(legacy[1], Value::new(16.0 - 9.0));
        assert_eq!(canonical[1], Value::new(6.0));
    }

    #[test]
    fn rate_of_change_is_percent() {
        let close = core_types::series_from(&[100.0, 110.0, 99.0]);
        let roc = rate_of_change(&close, 1);
        assert!(roc[0].is_na());
        assert_relative_eq!(roc[1].unwrap_or(f64::NAN), 10.0);
        assert_relative_eq!(roc[2].unwrap_or(f64::NAN), -10.0);
    }

    #[test]
    fn quadrant_levels_split_the_range() {
        let q = quadrant_range(&bars(&[(10.0, 12.0, 8.0, 10.0, 0.0)]));
        assert_eq!(q.l1[0], Value::new(8.0));
        assert_eq!(q.l3[0], Value::new(10.0));
        assert_eq!(q.l5[0], Value::new(12.0));
    }
}
