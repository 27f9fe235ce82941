use chrono::{DateTime, Utc};
use core_types::{PriceSeries, Series, Value, na_series};
use indicators::rolling::ffill;
use serde::Serialize;

/// One contiguous stretch below the running peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawdownEpisode {
    /// First bar below the peak.
    pub start: DateTime<Utc>,
    /// First bar back at the peak, or the last bar if the series ends in drawdown.
    pub end: DateTime<Utc>,
    /// Deepest drawdown within `[start, end]`, a non-positive fraction.
    pub depth: f64,
    pub days: i64,
}

/// Fractional decline of each close from its running maximum.
///
/// Missing closes are forward-filled. Bars before the first defined close
/// are undefined.
pub fn drawdown(close: &[Value]) -> Series {
    let filled = ffill(close);
    let mut out = na_series(filled.len());
    let mut peak = f64::NEG_INFINITY;
    for (slot, value) in out.iter_mut().zip(filled) {
        let Some(c) = value.get() else { continue };
        peak = peak.max(c);
        *slot = Value::new(c) / peak - 1.0;
    }
    out
}

/// Splits a drawdown series into non-overlapping episodes ordered by start.
pub fn drawdown_episodes(timestamps: &[DateTime<Utc>], drawdown: &[Value]) -> Vec<DrawdownEpisode> {
    let mut episodes = Vec::new();
    // (start index, deepest value so far)
    let mut open: Option<(usize, f64)> = None;
    let mut last_defined = None;

    for (i, dd) in drawdown.iter().enumerate() {
        let Some(dd) = dd.get() else { continue };
        last_defined = Some(i);
        open = match open {
            None if dd != 0.0 => Some((i, dd)),
            None => None,
            Some((start, depth)) if dd == 0.0 => {
                episodes.push(episode(timestamps, start, i, depth));
                None
            }
            Some((start, depth)) => Some((start, depth.min(dd))),
        };
    }
    if let (Some((start, depth)), Some(end)) = (open, last_defined) {
        episodes.push(episode(timestamps, start, end, depth));
    }
    tracing::debug!(episodes = episodes.len(), "Segmented drawdown episodes.");
    episodes
}

fn episode(timestamps: &[DateTime<Utc>], start: usize, end: usize, depth: f64) -> DrawdownEpisode {
    DrawdownEpisode {
        start: timestamps[start],
        end: timestamps[end],
        depth,
        days: (timestamps[end] - timestamps[start]).num_days(),
    }
}

/// Drawdown episodes of a series' closes.
pub fn episodes(series: &PriceSeries) -> Vec<DrawdownEpisode> {
    drawdown_episodes(&series.timestamps(), &drawdown(&series.close()))
}
