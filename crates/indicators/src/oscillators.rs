//! Momentum and trend oscillators.

use configuration::{
    CoppockParams, MacdParams, MassIndexParams, PmoParams, SctrParams, StochasticParams,
    TsiParams, UltimateParams,
};
use core_types::{PriceSeries, Series, TrueRangeMethod, Value};
use serde::Serialize;

use crate::filter::ema;
use crate::rolling::{
    diff, pct_change, rolling_max, rolling_mean, rolling_min, rolling_std, rolling_sum, shift,
    wma, zip_with,
};
use crate::rsi::rsi;
use crate::transforms::{high_low_spread, rate_of_change, true_range, typical_price};

/// A line, its EMA signal and the histogram between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalLine {
    pub line: Series,
    pub signal: Series,
    pub histogram: Series,
}

impl SignalLine {
    fn from_line(line: Series, signal_period: usize) -> Self {
        let signal = ema(&line, signal_period);
        let histogram = zip_with(&line, &signal, |l, s| l - s);
        Self { line, signal, histogram }
    }
}

/// Fast EMA minus slow EMA of `input`.
pub fn macd(input: &[Value], params: &MacdParams) -> SignalLine {
    let fast = ema(input, params.fast);
    let slow = ema(input, params.slow);
    SignalLine::from_line(zip_with(&fast, &slow, |f, s| f - s), params.signal)
}

/// The EMA spread as a percentage of the slow EMA.
fn percentage_oscillator(input: &[Value], params: &MacdParams) -> SignalLine {
    let fast = ema(input, params.fast);
    let slow = ema(input, params.slow);
    let line = zip_with(&fast, &slow, |f, s| 100.0 * (f - s) / s);
    SignalLine::from_line(line, params.signal)
}

/// Percentage Price Oscillator over the close.
pub fn ppo(close: &[Value], params: &MacdParams) -> SignalLine {
    percentage_oscillator(close, params)
}

/// Percentage Volume Oscillator.
pub fn pvo(volume: &[Value], params: &MacdParams) -> SignalLine {
    percentage_oscillator(volume, params)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stochastic {
    pub k: Series,
    pub d: Series,
}

pub fn stochastic(series: &PriceSeries, params: &StochasticParams) -> Stochastic {
    let highest = rolling_max(&series.high(), params.period);
    let lowest = rolling_min(&series.low(), params.period);
    let above_low = zip_with(&series.close(), &lowest, |c, l| c - l);
    let range = zip_with(&highest, &lowest, |h, l| h - l);
    let k = zip_with(&above_low, &range, |a, r| 100.0 * a / r);
    let d = rolling_mean(&k, params.smoothing);
    Stochastic { k, d }
}

/// Stochastic oscillator applied to RSI, as a fraction in `[0, 1]`.
pub fn stochastic_rsi(close: &[Value], period: usize) -> Series {
    let rsi = rsi(close, period);
    let highest = rolling_max(&rsi, period);
    let lowest = rolling_min(&rsi, period);
    rsi.iter()
        .zip(highest.iter().zip(&lowest))
        .map(|(&r, (&h, &l))| (r - l) / (h - l))
        .collect()
}

/// Williams %R in `[-100, 0]`.
pub fn williams_r(series: &PriceSeries, period: usize) -> Series {
    let highest = rolling_max(&series.high(), period);
    let lowest = rolling_min(&series.low(), period);
    let below_high = zip_with(&highest, &series.close(), |h, c| h - c);
    let range = zip_with(&highest, &lowest, |h, l| h - l);
    zip_with(&below_high, &range, |b, r| -100.0 * b / r)
}

/// Commodity Channel Index, scaled by the 0.015 Lambert constant and the
/// population standard deviation of the typical price.
pub fn cci(series: &PriceSeries, period: usize) -> Series {
    let tp = typical_price(series);
    let mean = rolling_mean(&tp, period);
    let std = rolling_std(&tp, period);
    tp.iter()
        .zip(mean.iter().zip(&std))
        .map(|(&p, (&m, &s))| (p - m) / (0.015 * s))
        .collect()
}

/// One-bar rate of change of a triple-smoothed EMA, as a fraction.
pub fn trix(close: &[Value], period: usize) -> Series {
    let triple = ema(&ema(&ema(close, period), period), period);
    pct_change(&triple, 1)
}

/// True Strength Index: double-smoothed momentum over double-smoothed absolute momentum.
pub fn tsi(close: &[Value], params: &TsiParams) -> Series {
    let change = diff(close, 1);
    let abs_change: Series = change.iter().map(|c| c.abs()).collect();
    let smooth = |s: &[Value]| ema(&ema(s, params.long), params.short);
    zip_with(&smooth(&change), &smooth(&abs_change), |m, a| 100.0 * m / a)
}

pub fn ultimate_oscillator(series: &PriceSeries, params: &UltimateParams) -> Series {
    let prev_close = shift(&series.close(), 1);
    let (mut buying, mut range) = (Vec::with_capacity(series.len()), Vec::with_capacity(series.len()));
    for (bar, &pc) in series.bars().iter().zip(&prev_close) {
        let true_low = bar.low.min(pc);
        buying.push(bar.close - true_low);
        range.push(bar.high.max(pc) - true_low);
    }
    let average = |n: usize| zip_with(&rolling_sum(&buying, n), &rolling_sum(&range, n), |b, r| b / r);
    let (a1, a2, a3) = (average(params.short), average(params.medium), average(params.long));
    a1.iter()
        .zip(a2.iter().zip(&a3))
        .map(|(&x, (&y, &z))| 100.0 * (4.0 * x + 2.0 * y + z) / 7.0)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vortex {
    pub plus: Series,
    pub minus: Series,
}

/// Vortex indicator: summed `|high - previous low|` and `|low - previous high|`
/// over summed true range.
pub fn vortex(series: &PriceSeries, period: usize) -> Vortex {
    let prev_high = shift(&series.high(), 1);
    let prev_low = shift(&series.low(), 1);
    let plus_vm = zip_with(&series.high(), &prev_low, |h, l| (h - l).abs());
    let minus_vm = zip_with(&series.low(), &prev_high, |l, h| (l - h).abs());
    let tr_sum = rolling_sum(&true_range(series, TrueRangeMethod::Canonical), period);
    Vortex {
        plus: zip_with(&rolling_sum(&plus_vm, period), &tr_sum, |v, t| v / t),
        minus: zip_with(&rolling_sum(&minus_vm, period), &tr_sum, |v, t| v / t),
    }
}

/// Sum of the single/double EMA ratio of the high-low range.
pub fn mass_index(series: &PriceSeries, params: &MassIndexParams) -> Series {
    let single = ema(&high_low_spread(series), params.ema_period);
    let double = ema(&single, params.ema_period);
    rolling_sum(&zip_with(&single, &double, |s, d| s / d), params.sum_period)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowSureThing {
    pub kst: Series,
    pub signal: Series,
}

/// Weighted sum of four smoothed rates of change (10/10, 15/10, 20/10, 30/15).
pub fn know_sure_thing(close: &[Value], signal_period: usize) -> KnowSureThing {
    const LEGS: [(usize, usize, f64); 4] = [(10, 10, 1.0), (15, 10, 2.0), (20, 10, 3.0), (30, 15, 4.0)];
    let mut kst = vec![Value::ZERO; close.len()];
    for (roc_period, sma_period, weight) in LEGS {
        let leg = rolling_mean(&rate_of_change(close, roc_period), sma_period);
        kst = zip_with(&kst, &leg, |acc, x| acc + weight * x);
    }
    let signal = rolling_mean(&kst, signal_period);
    KnowSureThing { kst, signal }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceMomentum {
    pub pmo: Series,
    pub signal: Series,
}

/// Price Momentum Oscillator: the one-bar percentage change smoothed twice,
/// scaled by 10 between passes.
pub fn price_momentum_oscillator(close: &[Value], params: &PmoParams) -> PriceMomentum {
    let roc = rate_of_change(close, 1);
    let first: Series = ema(&roc, params.first_smoothing)
        .into_iter()
        .map(|x| 10.0 * x)
        .collect();
    let pmo = ema(&first, params.second_smoothing);
    let signal = ema(&pmo, params.signal);
    PriceMomentum { pmo, signal }
}

/// Close displaced back `period / 2 + 1` bars, minus the current SMA.
pub fn detrended_price_oscillator(close: &[Value], period: usize) -> Series {
    let displaced = shift(close, (period / 2 + 1) as isize);
    zip_with(&displaced, &rolling_mean(close, period), |c, m| c - m)
}

/// WMA of the sum of a long and a short rate of change.
pub fn coppock_curve(close: &[Value], params: &CoppockParams) -> Series {
    let roc_sum = zip_with(
        &rate_of_change(close, params.long_roc),
        &rate_of_change(close, params.short_roc),
        |a, b| a + b,
    );
    wma(&roc_sum, params.wma_period)
}

/// SMA of midpoint movement per unit of volume-adjusted range.
pub fn ease_of_movement(series: &PriceSeries, period: usize) -> Series {
    let midpoint: Series = series.bars().iter().map(|b| (b.high + b.low) / 2.0).collect();
    let distance = diff(&midpoint, 1);
    let box_ratio: Series = series
        .bars()
        .iter()
        .map(|b| (b.volume / 100_000_000.0) / (b.high - b.low))
        .collect();
    rolling_mean(&zip_with(&distance, &box_ratio, |d, b| d / b), period)
}

/// EMA of `(close - previous close) * volume`.
pub fn force_index(series: &PriceSeries, period: usize) -> Series {
    let raw = zip_with(&diff(&series.close(), 1), &series.volume(), |d, v| d * v);
    ema(&raw, period)
}

/// StockCharts Technical Rank: a weighted blend of long, medium and short
/// term trend and momentum readings.
pub fn stockcharts_technical_rank(close: &[Value], params: &SctrParams, ppo_params: &MacdParams) -> Series {
    let [long_ema, long_roc, medium_ema, medium_roc, ppo_slope, rsi_period] = params.periods;
    let above_ema = |period: usize| zip_with(close, &ema(close, period), |c, e| 100.0 * (c / e - 1.0));

    let histogram = ppo(close, ppo_params).histogram;
    let slope_span = ppo_slope as f64;
    let short_slope = zip_with(&histogram, &shift(&histogram, ppo_slope as isize), |h, prev| {
        100.0 * ((h - prev) / slope_span) / 2.0
    });

    let components = [
        above_ema(long_ema),
        rate_of_change(close, long_roc),
        above_ema(medium_ema),
        rate_of_change(close, medium_roc),
        short_slope,
        rsi(close, rsi_period),
    ];
    let mut rank = vec![Value::ZERO; close.len()];
    for (component, weight) in components.iter().zip(params.weights) {
        rank = zip_with(&rank, component, |acc, x| acc + weight * x);
    }
    rank
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bars, closes};
    use approx::assert_relative_eq;
    use configuration::IndicatorSettings;

    fn wave(len: usize) -> Vec<f64> {
        (0..len).map(|i| 100.0 + 10.0 * (i as f64 / 5.0).sin()).collect()
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let close = closes(&wave(60)).close();
        let out = macd(&close, &IndicatorSettings::default().macd);
        for i in 0..60 {
            let expected = out.line[i] - out.signal[i];
            assert_relative_eq!(out.histogram[i].unwrap_or(f64::NAN), expected.unwrap_or(f64::NAN));
        }
    }

    #[test]
    fn flat_series_has_zero_macd_and_undefined_stochastic() {
        let series = closes(&[50.0; 40]);
        let out = macd(&series.close(), &IndicatorSettings::default().macd);
        assert_eq!(out.line[39], Value::ZERO);
        let stoch = stochastic(&series, &IndicatorSettings::default().stochastic);
        assert!(stoch.k.iter().all(|v| v.is_na()));
    }

    #[test]
    fn stochastic_and_williams_agree() {
        let series = closes(&wave(40));
        let stoch = stochastic(&series, &StochasticParams { period: 10, smoothing: 3 });
        let wr = williams_r(&series, 10);
        for i in 9..40 {
            assert_relative_eq!(
                stoch.k[i].unwrap_or(f64::NAN) - 100.0,
                wr[i].unwrap_or(f64::NAN),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn tsi_of_monotone_rise_is_one_hundred() {
        let close = closes(&(0..60).map(|i| 10.0 + i as f64).collect::<Vec<_>>()).close();
        let out = tsi(&close, &TsiParams { long: 25, short: 13 });
        assert!(out[0].is_na());
        assert_relative_eq!(out[59].unwrap_or(f64::NAN), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn ultimate_oscillator_on_closes_at_highs() {
        let rows: Vec<_> = (0..40)
            .map(|i| {
                let c = 20.0 + i as f64;
                (c - 0.5, c, c - 1.0, c, 10.0)
            })
            .collect();
        let out = ultimate_oscillator(&bars(&rows), &IndicatorSettings::default().ultimate);
        assert!(out[27].is_na());
        assert_relative_eq!(out[39].unwrap_or(f64::NAN), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn detrended_price_oscillator_displacement() {
        let close = closes(&(0..30).map(|i| i as f64 + 1.0).collect::<Vec<_>>()).close();
        let out = detrended_price_oscillator(&close, 20);
        // close[19 - 11] - mean(close[0..=19]) = 9 - 10.5
        assert_relative_eq!(out[19].unwrap_or(f64::NAN), -1.5);
    }

    #[test]
    fn force_index_sign_follows_price() {
        let series = bars(&[
            (10.0, 10.0, 10.0, 10.0, 100.0),
            (11.0, 11.0, 11.0, 11.0, 200.0),
            (10.5, 10.5, 10.5, 10.5, 50.0),
        ]);
        let raw = force_index(&series, 1);
        assert_eq!(raw, vec![Value::NA, Value::new(200.0), Value::new(-25.0)]);
    }

    #[test]
    fn coppock_needs_roc_plus_wma_history() {
        let close = closes(&wave(40)).close();
        let out = coppock_curve(&close, &IndicatorSettings::default().coppock);
        // ROC14 starts at bar 14; WMA10 adds nine more bars.
        assert!(out[22].is_na());
        assert!(out[23].is_defined());
    }

    #[test]
    fn sctr_blends_configured_components() {
        let close = closes(&wave(260)).close();
        let settings = IndicatorSettings::default();
        let rank = stockcharts_technical_rank(&close, &settings.sctr, &settings.ppo);
        // The 125-bar rate of change is the longest warm-up; EMAs start at once.
        assert!(rank[124].is_na());
        assert!(rank[125].is_defined());
    }
}
