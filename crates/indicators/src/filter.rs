//! Causal recursive smoothing.
//!
//! Every recursive average in the crate (RSI, ATR, ADX and the EMA-based
//! oscillators) goes through [`CausalFilter`], so undefined inputs are handled
//! in exactly one place:
//!
//! - leading undefined inputs are skipped and the filter starts on the first
//!   defined one;
//! - an undefined input after the start emits undefined and leaves the state
//!   untouched, so the next defined input continues the recursion.

use core_types::{Series, Value};
use ta::Next as _;
use ta::indicators::ExponentialMovingAverage;

/// A smoothing filter whose output at bar `i` depends on its own output at `i - 1`.
pub trait CausalFilter {
    /// Feeds one defined observation. Returns `None` while the filter is warming up.
    fn update(&mut self, input: f64) -> Option<f64>;

    /// Runs the filter over a whole series.
    fn apply(mut self, input: &[Value]) -> Series
    where
        Self: Sized,
    {
        input
            .iter()
            .map(|v| match v.get() {
                Some(x) => Value::from(self.update(x)),
                None => Value::NA,
            })
            .collect()
    }
}

/// Wilder's smoothing: `avg[i] = ((n - 1) * avg[i - 1] + x[i]) / n`.
///
/// Seeded with the simple mean of the first `n` defined inputs, which is emitted
/// on the `n`-th of them. A zero period never produces output.
#[derive(Debug, Clone)]
pub struct Wilder {
    period: usize,
    seed_sum: f64,
    seen: usize,
    current: Option<f64>,
}

impl Wilder {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            seed_sum: 0.0,
            seen: 0,
            current: None,
        }
    }
}

impl CausalFilter for Wilder {
    fn update(&mut self, input: f64) -> Option<f64> {
        if self.period == 0 {
            return None;
        }
        let n = self.period as f64;
        self.current = match self.current {
            Some(prev) => Some(((n - 1.0) * prev + input) / n),
            None => {
                self.seed_sum += input;
                self.seen += 1;
                (self.seen == self.period).then(|| self.seed_sum / n)
            }
        };
        self.current
    }
}

/// Exponential moving average with smoothing `2 / (n + 1)`, seeded with the
/// first defined input.
pub struct Ema {
    inner: Option<ExponentialMovingAverage>,
}

impl Ema {
    /// A zero period yields a filter that never produces output.
    pub fn new(period: usize) -> Self {
        Self {
            inner: ExponentialMovingAverage::new(period).ok(),
        }
    }
}

impl CausalFilter for Ema {
    fn update(&mut self, input: f64) -> Option<f64> {
        self.inner.as_mut().map(|ema| ema.next(input))
    }
}

/// Shorthand for running a fresh EMA over `input`.
pub fn ema(input: &[Value], period: usize) -> Series {
    Ema::new(period).apply(input)
}

/// Shorthand for running a fresh Wilder filter over `input`.
pub fn wilder(input: &[Value], period: usize) -> Series {
    Wilder::new(period).apply(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core_types::series_from;

    #[test]
    fn wilder_seeds_with_simple_mean() {
        let out = wilder(&series_from(&[1.0, 2.0, 3.0, 6.0]), 3);
        assert!(out[0].is_na() && out[1].is_na());
        assert_eq!(out[2], Value::new(2.0));
        // (2 * 2 + 6) / 3
        assert_relative_eq!(out[3].unwrap_or(f64::NAN), 10.0 / 3.0);
    }

    #[test]
    fn wilder_skips_leading_and_holds_state_on_gaps() {
        let input = vec![
            Value::NA,
            Value::new(2.0),
            Value::new(4.0),
            Value::NA,
            Value::new(6.0),
        ];
        let out = wilder(&input, 2);
        assert_eq!(out[0], Value::NA);
        assert_eq!(out[1], Value::NA);
        assert_eq!(out[2], Value::new(3.0));
        assert_eq!(out[3], Value::NA);
        assert_eq!(out[4], Value::new(4.5));
    }

    #[test]
    fn ema_starts_at_first_defined_input() {
        let out = ema(&[Value::NA, Value::new(10.0), Value::new(20.0)], 3);
        assert!(out[0].is_na());
        assert_eq!(out[1], Value::new(10.0));
        // k = 2 / 4
        assert_relative_eq!(out[2].unwrap_or(f64::NAN), 15.0);
    }

    #[test]
    fn zero_period_is_undefined_everywhere() {
        let input = series_from(&[1.0, 2.0, 3.0]);
        assert!(ema(&input, 0).iter().all(|v| v.is_na()));
        assert!(wilder(&input, 0).iter().all(|v| v.is_na()));
    }
}
