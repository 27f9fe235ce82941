use core_types::{PriceSeries, Series, Value, na_series};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aroon {
    pub up: Series,
    pub down: Series,
    pub oscillator: Series,
}

/// Bars since the most recent bar that matched its own trailing `period`-bar
/// extremum, capped at `period`.
///
/// Windows at the start of the series are partial, so bar 0 always qualifies
/// when defined. Undefined inputs never qualify and are skipped inside the
/// window.
fn bars_since_extremum(input: &[Value], period: usize, better: fn(f64, f64) -> bool) -> Series {
    let mut out = na_series(input.len());
    let mut last_hit: Option<usize> = None;
    for i in 0..input.len() {
        if let Some(x) = input[i].get() {
            let start = (i + 1).saturating_sub(period);
            let beaten = input[start..i]
                .iter()
                .filter_map(|v| v.get())
                .any(|other| better(other, x));
            if !beaten {
                last_hit = Some(i);
            }
        }
        if let Some(hit) = last_hit {
            out[i] = Value::new((i - hit).min(period) as f64);
        }
    }
    out
}

/// Aroon Up/Down/Oscillator in percent. Fewer than `period` bars (or a zero
/// period) gives an entirely undefined result.
pub fn aroon(series: &PriceSeries, period: usize) -> Aroon {
    let len = series.len();
    if period == 0 || len < period {
        return Aroon {
            up: na_series(len),
            down: na_series(len),
            oscillator: na_series(len),
        };
    }
    let n = period as f64;
    let since_high = bars_since_extremum(&series.high(), period, |other, x| other > x);
    let since_low = bars_since_extremum(&series.low(), period, |other, x| other < x);

    let score = |since: Series| -> Series { since.into_iter().map(|d| 100.0 * (n - d) / n).collect() };
    let up = score(since_high);
    let down = score(since_low);
    let oscillator = up.iter().zip(&down).map(|(&u, &d)| u - d).collect();
    Aroon { up, down, oscillator }
}
