//! Volume-based indicators.

use configuration::FastSlowParams;
use core_types::{PriceSeries, Series, Value, na_series};
use serde::Serialize;

use crate::filter::ema;
use crate::rolling::{cumsum, rolling_sum, zip_with};
use crate::transforms::{money_flow_volume, typical_price};

/// Accumulation/Distribution Line: running total of money flow volume.
pub fn accumulation_distribution_line(series: &PriceSeries) -> Series {
    cumsum(&money_flow_volume(series))
}

pub fn chaikin_money_flow(series: &PriceSeries, period: usize) -> Series {
    zip_with(
        &rolling_sum(&money_flow_volume(series), period),
        &rolling_sum(&series.volume(), period),
        |mfv, v| mfv / v,
    )
}

/// MACD-style spread of two EMAs of the A/D line.
pub fn chaikin_oscillator(series: &PriceSeries, params: &FastSlowParams) -> Series {
    let adl = accumulation_distribution_line(series);
    zip_with(&ema(&adl, params.fast), &ema(&adl, params.slow), |f, s| f - s)
}

/// Money Flow Index: a volume-weighted RSI on the typical price.
///
/// Raw money flow counts as positive when the typical price rose from the
/// previous bar and negative when it fell. Undefined while the window has no
/// negative flow.
pub fn money_flow_index(series: &PriceSeries, period: usize) -> Series {
    let tp = typical_price(series);
    let raw = zip_with(&tp, &series.volume(), |p, v| p * v);
    let mut positive = na_series(tp.len());
    let mut negative = na_series(tp.len());
    for i in 1..tp.len() {
        let (Some(now), Some(before), Some(flow)) = (tp[i].get(), tp[i - 1].get(), raw[i].get()) else {
            continue;
        };
        let (p, n) = if now > before {
            (flow, 0.0)
        } else if now < before {
            (0.0, flow)
        } else {
            (0.0, 0.0)
        };
        positive[i] = Value::new(p);
        negative[i] = Value::new(n);
    }
    zip_with(
        &rolling_sum(&positive, period),
        &rolling_sum(&negative, period),
        |p, n| 100.0 - 100.0 / (1.0 + p / n),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegativeVolumeIndex {
    pub nvi: Series,
    pub signal: Series,
}

/// Negative Volume Index, starting at 1000 on the first fully defined bar.
///
/// The index compounds the close's percentage change only on bars whose
/// volume fell from the previous bar and is carried unchanged otherwise.
pub fn negative_volume_index(series: &PriceSeries, signal_period: usize) -> NegativeVolumeIndex {
    const BASE: f64 = 1000.0;
    let close = series.close();
    let volume = series.volume();
    let mut nvi = na_series(close.len());
    let mut state: Option<(f64, f64, f64)> = None; // (index, close, volume)

    for i in 0..close.len() {
        let (Some(c), Some(v)) = (close[i].get(), volume[i].get()) else {
            continue;
        };
        let level = match state {
            None => BASE,
            Some((level, prev_close, prev_volume)) if v < prev_volume && prev_close != 0.0 => {
                level * (c / prev_close)
            }
            Some((level, _, _)) => level,
        };
        nvi[i] = Value::new(level);
        state = Some((level, c, v));
    }
    let signal = ema(&nvi, signal_period);
    NegativeVolumeIndex { nvi, signal }
}

/// On Balance Volume, starting at zero on the first fully defined bar.
pub fn on_balance_volume(series: &PriceSeries) -> Series {
    let close = series.close();
    let volume = series.volume();
    let mut out = na_series(close.len());
    let mut state: Option<(f64, f64)> = None; // (obv, close)

    for i in 0..close.len() {
        let (Some(c), Some(v)) = (close[i].get(), volume[i].get()) else {
            continue;
        };
        let obv = match state {
            None => 0.0,
            Some((obv, prev)) if c > prev => obv + v,
            Some((obv, prev)) if c < prev => obv - v,
            Some((obv, _)) => obv,
        };
        out[i] = Value::new(obv);
        state = Some((obv, c));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bars;
    use approx::assert_relative_eq;

    fn sample() -> PriceSeries {
        bars(&[
            (10.0, 11.0, 9.0, 10.0, 100.0),
            (10.0, 12.0, 10.0, 12.0, 200.0),
            (12.0, 12.0, 10.0, 11.0, 150.0),
            (11.0, 11.5, 10.5, 11.0, 50.0),
            (11.0, 13.0, 11.0, 13.0, 80.0),
        ])
    }

    #[test]
    fn obv_adds_and_subtracts_volume() {
        let out = on_balance_volume(&sample());
        let expected = [0.0, 200.0, 50.0, 50.0, 130.0];
        assert_eq!(out, core_types::series_from(&expected));
    }

    #[test]
    fn nvi_moves_only_on_falling_volume() {
        let out = negative_volume_index(&sample(), 3);
        assert_eq!(out.nvi[0], Value::new(1000.0));
        assert_eq!(out.nvi[1], Value::new(1000.0));
        assert_relative_eq!(out.nvi[2].unwrap_or(f64::NAN), 1000.0 * 11.0 / 12.0, epsilon = 1e-9);
        // Volume fell again but the close is unchanged.
        assert_relative_eq!(out.nvi[3].unwrap_or(f64::NAN), 1000.0 * 11.0 / 12.0, epsilon = 1e-9);
        assert_relative_eq!(out.nvi[4].unwrap_or(f64::NAN), 1000.0 * 11.0 / 12.0, epsilon = 1e-9);
    }

    #[test]
    fn adl_accumulates_money_flow_volume() {
        let out = accumulation_distribution_line(&sample());
        // Bar 0 closes mid-range (0), bar 1 at the high (+200).
        assert_eq!(out[0], Value::ZERO);
        assert_eq!(out[1], Value::new(200.0));
    }

    #[test]
    fn mfi_is_bounded() {
        let out = money_flow_index(&sample(), 3);
        assert!(out[2].is_na());
        let value = out[4].unwrap_or(f64::NAN);
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn chaikin_money_flow_window() {
        let out = chaikin_money_flow(&sample(), 2);
        assert!(out[0].is_na());
        // (0 + 200) / (100 + 200)
        assert_relative_eq!(out[1].unwrap_or(f64::NAN), 200.0 / 300.0);
    }
}
