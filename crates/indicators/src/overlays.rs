//! Price overlays: bands, channels, clouds and pivot levels drawn on the price chart.

use configuration::{
    BollingerParams, ChandelierParams, EnvelopeParams, IchimokuParams, KeltnerParams,
    VolumeByPriceParams,
};
use core_types::{PriceSeries, Series, TrueRangeMethod, Value, na_series};
use serde::Serialize;

use crate::directional::atr;
use crate::filter::ema;
use crate::rolling::{
    cumsum, rolling_max, rolling_mean, rolling_min, rolling_std, rolling_sum, shift, zip_with,
};
use crate::transforms::{high_low_spread, typical_price};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Simple moving average plus and minus `num_std` population standard deviations.
pub fn bollinger_bands(close: &[Value], params: &BollingerParams) -> BollingerBands {
    let middle = rolling_mean(close, params.period);
    let std = rolling_std(close, params.period);
    let k = params.num_std;
    BollingerBands {
        upper: zip_with(&middle, &std, |m, s| m + k * s),
        lower: zip_with(&middle, &std, |m, s| m - k * s),
        middle,
    }
}

/// Band width relative to the middle band.
pub fn bandwidth(bands: &BollingerBands) -> Series {
    let width = zip_with(&bands.upper, &bands.lower, |u, l| u - l);
    zip_with(&width, &bands.middle, |w, m| w / m)
}

/// Position of the close inside the bands: 0 at the lower band, 1 at the upper.
pub fn percent_b(close: &[Value], bands: &BollingerBands) -> Series {
    let width = zip_with(&bands.upper, &bands.lower, |u, l| u - l);
    let above_lower = zip_with(close, &bands.lower, |c, l| c - l);
    zip_with(&above_lower, &width, |a, w| a / w)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChandelierExit {
    pub long: Series,
    pub short: Series,
}

/// Trailing stops hung `multiplier` ATRs below the highest high (long) and
/// above the lowest low (short).
pub fn chandelier_exit(
    series: &PriceSeries,
    params: &ChandelierParams,
    method: TrueRangeMethod,
) -> ChandelierExit {
    let atr = atr(series, params.period, method);
    let highest = rolling_max(&series.high(), params.period);
    let lowest = rolling_min(&series.low(), params.period);
    let k = params.multiplier;
    ChandelierExit {
        long: zip_with(&highest, &atr, |h, a| h - k * a),
        short: zip_with(&lowest, &atr, |l, a| l + k * a),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ichimoku {
    pub conversion: Series,
    pub base: Series,
    pub leading_a: Series,
    pub leading_b: Series,
    /// The close pulled back by `base_period` bars.
    pub lagging: Series,
}

fn midpoint(series: &PriceSeries, period: usize) -> Series {
    let highest = rolling_max(&series.high(), period);
    let lowest = rolling_min(&series.low(), period);
    zip_with(&highest, &lowest, |h, l| (h + l) / 2.0)
}

pub fn ichimoku(series: &PriceSeries, params: &IchimokuParams) -> Ichimoku {
    let conversion = midpoint(series, params.conversion_period);
    let base = midpoint(series, params.base_period);
    Ichimoku {
        leading_a: zip_with(&conversion, &base, |c, b| (c + b) / 2.0),
        leading_b: midpoint(series, params.leading_period),
        lagging: shift(&series.close(), -(params.base_period as isize)),
        conversion,
        base,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeltnerChannels {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// EMA center line with ATR-scaled channels.
pub fn keltner_channels(
    series: &PriceSeries,
    params: &KeltnerParams,
    method: TrueRangeMethod,
) -> KeltnerChannels {
    let middle = ema(&series.close(), params.period);
    let atr = atr(series, params.atr_period, method);
    let k = params.multiplier;
    KeltnerChannels {
        upper: zip_with(&middle, &atr, |m, a| m + k * a),
        lower: zip_with(&middle, &atr, |m, a| m - k * a),
        middle,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageEnvelopes {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

pub fn moving_average_envelopes(close: &[Value], params: &EnvelopeParams) -> MovingAverageEnvelopes {
    let middle = rolling_mean(close, params.period);
    let k = params.percent;
    MovingAverageEnvelopes {
        upper: middle.iter().map(|&m| m + k * m).collect(),
        lower: middle.iter().map(|&m| m - k * m).collect(),
        middle,
    }
}

/// Floor-trader pivots from each bar's own high, low and close.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotPoints {
    pub pivot: Series,
    pub s1: Series,
    pub s2: Series,
    pub r1: Series,
    pub r2: Series,
}

pub fn pivot_points(series: &PriceSeries) -> PivotPoints {
    let p = typical_price(series);
    let hl = high_low_spread(series);
    PivotPoints {
        s1: zip_with(&p, &series.high(), |p, h| 2.0 * p - h),
        s2: zip_with(&p, &hl, |p, r| p - r),
        r1: zip_with(&p, &series.low(), |p, l| 2.0 * p - l),
        r2: zip_with(&p, &hl, |p, r| p + r),
        pivot: p,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibonacciPivotPoints {
    pub pivot: Series,
    pub s1: Series,
    pub s2: Series,
    pub s3: Series,
    pub r1: Series,
    pub r2: Series,
    pub r3: Series,
}

pub fn fibonacci_pivot_points(series: &PriceSeries) -> FibonacciPivotPoints {
    let p = typical_price(series);
    let hl = high_low_spread(series);
    let level = |ratio: f64| zip_with(&p, &hl, |p, r| p + ratio * r);
    FibonacciPivotPoints {
        s1: level(-0.382),
        s2: level(-0.618),
        s3: level(-1.0),
        r1: level(0.382),
        r2: level(0.618),
        r3: level(1.0),
        pivot: p,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemarkPivotPoints {
    pub pivot: Series,
    pub s1: Series,
    pub r1: Series,
}

/// DeMark pivots. The base sum double-weights the low on a down bar, the high
/// on an up bar and the close on an unchanged bar.
pub fn demark_pivot_points(series: &PriceSeries) -> DemarkPivotPoints {
    let x: Series = series
        .bars()
        .iter()
        .map(|b| match (b.close.get(), b.open.get()) {
            (Some(c), Some(o)) if c < o => b.high + 2.0 * b.low + b.close,
            (Some(c), Some(o)) if c > o => 2.0 * b.high + b.low + b.close,
            (Some(_), Some(_)) => b.high + b.low + 2.0 * b.close,
            _ => Value::NA,
        })
        .collect();
    DemarkPivotPoints {
        pivot: x.iter().map(|&x| x / 4.0).collect(),
        s1: zip_with(&x, &series.high(), |x, h| x / 2.0 - h),
        r1: zip_with(&x, &series.low(), |x, l| x / 2.0 - l),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChannel {
    pub upper: Series,
    pub lower: Series,
    pub center: Series,
}

pub fn price_channel(series: &PriceSeries, period: usize) -> PriceChannel {
    let upper = rolling_max(&series.high(), period);
    let lower = rolling_min(&series.low(), period);
    PriceChannel {
        center: zip_with(&upper, &lower, |h, l| (h + l) / 2.0),
        upper,
        lower,
    }
}

/// Volume traded at each price block over a trailing window.
///
/// `levels[b][i]` is the volume of the window ending at bar `i` whose closes
/// fell into block `b`. Blocks split the window's closing range evenly, from
/// the lowest close (block 0) to the highest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeByPrice {
    pub levels: Vec<Series>,
}

pub fn volume_by_price(series: &PriceSeries, params: &VolumeByPriceParams) -> VolumeByPrice {
    let close = series.close();
    let volume = series.volume();
    let (period, blocks) = (params.period, params.blocks);
    let mut levels = vec![na_series(close.len()); blocks];
    if period == 0 || blocks == 0 || close.len() < period {
        return VolumeByPrice { levels };
    }

    for end in period - 1..close.len() {
        let window: Option<Vec<(f64, f64)>> = (end + 1 - period..=end)
            .map(|k| Some((close[k].get()?, volume[k].get()?)))
            .collect();
        let Some(window) = window else { continue };

        let low = window.iter().map(|(c, _)| *c).fold(f64::INFINITY, f64::min);
        let high = window.iter().map(|(c, _)| *c).fold(f64::NEG_INFINITY, f64::max);
        let step = if blocks > 1 { (high - low) / (blocks - 1) as f64 } else { 0.0 };
        let mut tally = vec![0.0; blocks];
        for (c, v) in window {
            // Number of block edges at or below the close, minus one.
            let edges_below = (0..blocks).filter(|&b| low + step * b as f64 <= c).count();
            tally[edges_below.saturating_sub(1)] += v;
        }
        for (level, total) in levels.iter_mut().zip(tally) {
            level[end] = Value::new(total);
        }
    }
    VolumeByPrice { levels }
}

/// Cumulative volume-weighted typical price.
pub fn vwap(series: &PriceSeries) -> Series {
    let volume = series.volume();
    let turnover = zip_with(&typical_price(series), &volume, |p, v| p * v);
    zip_with(&cumsum(&turnover), &cumsum(&volume), |t, v| t / v)
}

/// Rolling population standard deviation of the close.
pub fn volatility(close: &[Value], period: usize) -> Series {
    rolling_std(close, period)
}

/// Root-mean-square percentage drawdown from the trailing `period`-bar high.
pub fn ulcer_index(close: &[Value], period: usize) -> Series {
    let highest = rolling_max(close, period);
    let squared: Series = zip_with(close, &highest, |c, h| {
        let pct = 100.0 * (c - h) / h;
        pct * pct
    });
    rolling_sum(&squared, period)
        .into_iter()
        .map(|s| (s / period as f64).sqrt())
        .collect()
}

/// Price gaps between consecutive bars: `low - previous high` when the bar
/// trades entirely above the previous one, `high - previous low` (negative)
/// when entirely below, zero otherwise.
pub fn gaps(series: &PriceSeries) -> Series {
    let mut out = vec![Value::NA];
    out.extend(series.bars().windows(2).map(|pair| {
        let (prev, bar) = (&pair[0], &pair[1]);
        let up = bar.low - prev.high;
        let down = bar.high - prev.low;
        match (up.get(), down.get()) {
            (Some(u), _) if u > 0.0 => up,
            (_, Some(d)) if d < 0.0 => down,
            (Some(_), Some(_)) => Value::ZERO,
            _ => Value::NA,
        }
    }));
    out
}
