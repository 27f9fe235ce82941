use core_types::{Series, Value};

use crate::filter::wilder;
use crate::rolling::diff;

/// Relative Strength Index over `period` bars.
///
/// Gains and losses of the bar-to-bar change are Wilder-smoothed; the first
/// value appears at bar `period`, seeded with the mean of changes `1..=period`.
/// Undefined wherever the average loss is zero.
pub fn rsi(close: &[Value], period: usize) -> Series {
    let change = diff(close, 1);
    let gains: Series = change.iter().map(|c| c.map(|x| x.max(0.0))).collect();
    let losses: Series = change.iter().map(|c| c.map(|x| (-x).max(0.0))).collect();

    let avg_gain = wilder(&gains, period);
    let avg_loss = wilder(&losses, period);
    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(g, l)| 100.0 - 100.0 / (1.0 + g / l))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core_types::series_from;

    #[test]
    fn seeds_at_bar_period() {
        // Changes: +1, -1, +2 -> avg gain 1, avg loss 1/3 over 3 bars.
        let close = series_from(&[10.0, 11.0, 10.0, 12.0]);
        let out = rsi(&close, 3);
        assert!(out[..3].iter().all(|v| v.is_na()));
        assert_relative_eq!(out[3].unwrap_or(f64::NAN), 75.0, epsilon = 1e-9);
    }

    #[test]
    fn smooths_after_the_seed() {
        let close = series_from(&[10.0, 11.0, 10.0, 12.0, 11.0]);
        let out = rsi(&close, 3);
        // gain: (2 * 1 + 0) / 3, loss: (2 * 1/3 + 1) / 3
        let g = 2.0 / 3.0;
        let l = (2.0 / 3.0 + 1.0) / 3.0;
        assert_relative_eq!(out[4].unwrap_or(f64::NAN), 100.0 - 100.0 / (1.0 + g / l), epsilon = 1e-9);
    }

    #[test]
    fn undefined_without_losses() {
        let rising = series_from(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(rsi(&rising, 2).iter().all(|v| v.is_na()));
        let flat = series_from(&[5.0; 20]);
        assert!(rsi(&flat, 14).iter().all(|v| v.is_na()));
    }
}
