use core_types::{Series, Value, na_series};
use serde::Serialize;

use crate::rolling::interpolate_linear;

/// ZigZag line and the bars retained as pivots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZigZag {
    /// Pivot closes joined by straight lines; the last defined close anchors the tail.
    pub line: Series,
    /// Indices of the pivot bars, in order.
    pub pivots: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZigZagState {
    pub last_pivot: Option<f64>,
}

impl ZigZagState {
    /// Whether `close` moves far enough from the last pivot to become one.
    /// The first observation is always a pivot.
    pub fn is_pivot(&self, close: f64, threshold: f64) -> bool {
        let Some(last) = self.last_pivot else {
            return true;
        };
        if threshold == 0.0 {
            return true;
        }
        if last == 0.0 {
            return close != 0.0;
        }
        (close - last).abs() / last.abs() > threshold
    }

    pub fn step(self, close: f64, threshold: f64) -> (Self, bool) {
        if self.is_pivot(close, threshold) {
            (Self { last_pivot: Some(close) }, true)
        } else {
            (self, false)
        }
    }
}

/// ZigZag over closes with a percentage threshold (7.0 = 7%).
pub fn zigzag(close: &[Value], percent: f64) -> ZigZag {
    let threshold = percent / 100.0;
    let mut anchors = na_series(close.len());
    let mut pivots = Vec::new();
    let mut state = ZigZagState::default();

    for (i, c) in close.iter().enumerate() {
        let Some(c) = c.get() else { continue };
        let (next, pivot) = state.step(c, threshold);
        if pivot {
            anchors[i] = Value::new(c);
            pivots.push(i);
        }
        state = next;
    }
    if let Some(last) = close.iter().rposition(|v| v.is_defined()) {
        anchors[last] = close[last];
    }

    ZigZag {
        line: interpolate_linear(&anchors),
        pivots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core_types::series_from;

    #[test]
    fn zero_threshold_keeps_every_bar() {
        let close = series_from(&[10.0, 10.0, 11.0, 9.0]);
        let zz = zigzag(&close, 0.0);
        assert_eq!(zz.pivots, vec![0, 1, 2, 3]);
        assert_eq!(zz.line, close);
    }

    #[test]
    fn full_threshold_interpolates_first_to_last() {
        let close = series_from(&[10.0, 15.0, 12.0, 14.0, 18.0]);
        let zz = zigzag(&close, 100.0);
        assert_eq!(zz.pivots, vec![0]);
        for (i, v) in zz.line.iter().enumerate() {
            assert_relative_eq!(v.unwrap_or(f64::NAN), 10.0 + 2.0 * i as f64);
        }
    }

    #[test]
    fn moves_are_measured_from_the_last_pivot() {
        // 10 -> 10.5 (5%) is ignored, 10 -> 11 (10%) is kept, then 11 -> 10 (9.1%) is kept.
        let close = series_from(&[10.0, 10.5, 11.0, 10.0]);
        let zz = zigzag(&close, 7.0);
        assert_eq!(zz.pivots, vec![0, 2, 3]);
        assert_relative_eq!(zz.line[1].unwrap_or(f64::NAN), 10.5);
    }

    #[test]
    fn threshold_is_relative_to_the_pivot_not_the_close() {
        // 100 -> 60 is a 40% move off the pivot, though 66.7% of the new close.
        let close = series_from(&[100.0, 60.0, 70.0]);
        let zz = zigzag(&close, 45.0);
        assert_eq!(zz.pivots, vec![0]);
        assert!(!ZigZagState { last_pivot: Some(100.0) }.is_pivot(60.0, 0.45));
    }

    #[test]
    fn leading_gaps_stay_undefined() {
        let mut close = series_from(&[0.0, 5.0, 6.0]);
        close[0] = Value::NA;
        let zz = zigzag(&close, 50.0);
        assert!(zz.line[0].is_na());
        assert_eq!(zz.pivots, vec![1]);
        assert_eq!(zz.line[2], Value::new(6.0));
    }
}
