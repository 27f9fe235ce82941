//! Trailing-window aggregators and series plumbing.
//!
//! A rolling window of length `n` is defined from bar `n - 1` onward; any
//! undefined value inside the window makes the output undefined. A zero
//! window, or fewer than `n` bars, gives an entirely undefined result.

use core_types::{Series, Value, na_series};
use ta::errors::Result as TaResult;
use ta::indicators::{Maximum, Minimum, SimpleMovingAverage, StandardDeviation};
use ta::{Next, Reset};

/// Applies `f` to every complete, fully defined trailing window.
fn rolling(input: &[Value], period: usize, f: impl Fn(&[f64]) -> f64) -> Series {
    let mut out = na_series(input.len());
    if period == 0 || input.len() < period {
        return out;
    }
    for (end, slot) in out.iter_mut().enumerate().skip(period - 1) {
        let window: Option<Vec<f64>> = input[end + 1 - period..=end].iter().map(|v| v.get()).collect();
        if let Some(window) = window {
            *slot = Value::new(f(&window));
        }
    }
    out
}

/// Drives a `ta` window indicator over the defined runs of `input`.
///
/// The indicator is reset on every undefined value and only reports once it
/// has seen `period` consecutive defined inputs, so partial windows never leak.
fn windowed<I>(input: &[Value], period: usize, build: fn(usize) -> TaResult<I>) -> Series
where
    I: Next<f64, Output = f64> + Reset,
{
    let Ok(mut indicator) = build(period) else {
        return na_series(input.len());
    };
    let mut run = 0;
    input
        .iter()
        .map(|v| match v.get() {
            Some(x) => {
                run += 1;
                let out = indicator.next(x);
                if run >= period { Value::new(out) } else { Value::NA }
            }
            None => {
                indicator.reset();
                run = 0;
                Value::NA
            }
        })
        .collect()
}

pub fn rolling_sum(input: &[Value], period: usize) -> Series {
    rolling(input, period, |w| w.iter().sum())
}

pub fn rolling_mean(input: &[Value], period: usize) -> Series {
    windowed(input, period, SimpleMovingAverage::new)
}

/// Rolling standard deviation with the population denominator `n`.
pub fn rolling_std(input: &[Value], period: usize) -> Series {
    windowed(input, period, StandardDeviation::new)
}

pub fn rolling_max(input: &[Value], period: usize) -> Series {
    windowed(input, period, Maximum::new)
}

pub fn rolling_min(input: &[Value], period: usize) -> Series {
    windowed(input, period, Minimum::new)
}

/// Linearly weighted moving average; the newest bar carries weight `n`.
pub fn wma(input: &[Value], period: usize) -> Series {
    rolling(input, period, |w| {
        let n = w.len() as f64;
        let weighted: f64 = w.iter().enumerate().map(|(i, x)| (i as f64 + 1.0) * x).sum();
        weighted / (n * (n + 1.0) / 2.0)
    })
}

/// Shifts values forward by `periods` bars (a lag); negative shifts pull
/// future values back. Vacated slots are undefined.
pub fn shift(input: &[Value], periods: isize) -> Series {
    let len = input.len() as isize;
    (0..len)
        .map(|i| {
            let src = i - periods;
            if (0..len).contains(&src) {
                input[src as usize]
            } else {
                Value::NA
            }
        })
        .collect()
}

/// `x[i] - x[i - periods]`.
pub fn diff(input: &[Value], periods: usize) -> Series {
    let lagged = shift(input, periods as isize);
    input.iter().zip(lagged).map(|(&x, prev)| x - prev).collect()
}

/// `x[i] / x[i - periods] - 1`.
pub fn pct_change(input: &[Value], periods: usize) -> Series {
    let lagged = shift(input, periods as isize);
    input.iter().zip(lagged).map(|(&x, prev)| x / prev - 1.0).collect()
}

/// Combines two aligned series element-wise.
pub fn zip_with(a: &[Value], b: &[Value], f: impl Fn(Value, Value) -> Value) -> Series {
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

/// Running total. Undefined inputs stay undefined and do not reset the sum.
pub fn cumsum(input: &[Value]) -> Series {
    let mut total = 0.0;
    input
        .iter()
        .map(|v| {
            v.get().map_or(Value::NA, |x| {
                total += x;
                Value::new(total)
            })
        })
        .collect()
}

/// Replaces undefined values with the most recent defined one.
pub fn ffill(input: &[Value]) -> Series {
    let mut last = Value::NA;
    input
        .iter()
        .map(|&v| {
            last = v.or(last);
            last
        })
        .collect()
}

/// Fills undefined runs strictly between two defined values by linear
/// interpolation over bar index. Leading and trailing gaps are left alone.
pub fn interpolate_linear(input: &[Value]) -> Series {
    let mut out = input.to_vec();
    let mut prev: Option<(usize, f64)> = None;
    for (i, v) in input.iter().enumerate() {
        let Some(y) = v.get() else { continue };
        if let Some((j, y0)) = prev {
            let span = (i - j) as f64;
            for (k, slot) in out.iter_mut().enumerate().take(i).skip(j + 1) {
                *slot = Value::new(y0 + (y - y0) * (k - j) as f64 / span);
            }
        }
        prev = Some((i, y));
    }
    out
}
