use configuration::ParabolicSarParams;
use core_types::{PriceSeries, Series, Value, na_series};
use serde::Serialize;

/// Parabolic SAR split by trend phase. On every bar exactly one of the two
/// series carries the stop; the other holds zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParabolicSar {
    pub rising: Series,
    pub falling: Series,
}

/// The state carried from one bar to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarState {
    pub rising: bool,
    /// Extreme point: highest high of a rising phase, lowest low of a falling one.
    pub extreme: f64,
    pub acceleration: f64,
    pub sar: f64,
}

impl SarState {
    /// The state before bar 1: rising, with the first bar's low as the stop.
    pub fn initial(high: f64, low: f64, params: &ParabolicSarParams) -> Self {
        Self {
            rising: true,
            extreme: high,
            acceleration: params.step_rising,
            sar: low,
        }
    }

    /// Advances one bar. Returns the new state and the stop recorded for this
    /// bar, tagged with the phase it was recorded in (`true` = rising).
    pub fn step(self, high: f64, low: f64, params: &ParabolicSarParams) -> (Self, f64, bool) {
        let (extreme, new_extreme, step, max_accel) = if self.rising {
            let ep = self.extreme.max(high);
            (ep, ep == high, params.step_rising, params.max_accel_rising)
        } else {
            let ep = self.extreme.min(low);
            (ep, ep == low, params.step_falling, params.max_accel_falling)
        };
        let acceleration = if new_extreme {
            (self.acceleration + step).min(max_accel)
        } else {
            self.acceleration.min(max_accel)
        };
        let sar = self.sar + acceleration * (extreme - self.sar);
        let recorded = (sar, self.rising);

        let next = if self.rising && (sar > low || sar > high) {
            Self {
                rising: false,
                extreme,
                acceleration: params.step_falling,
                sar: extreme,
            }
        } else if !self.rising && (sar < low || sar < high) {
            Self {
                rising: true,
                extreme,
                acceleration: params.step_rising,
                sar: extreme,
            }
        } else {
            Self {
                rising: self.rising,
                extreme,
                acceleration,
                sar,
            }
        };
        (next, recorded.0, recorded.1)
    }
}

/// Folds [`SarState::step`] over the series from its first fully defined bar.
///
/// Bars before it are undefined; a later bar with an undefined high or low is
/// undefined in both phases and leaves the state untouched.
pub fn parabolic_sar(series: &PriceSeries, params: &ParabolicSarParams) -> ParabolicSar {
    let len = series.len();
    let mut out = ParabolicSar {
        rising: na_series(len),
        falling: na_series(len),
    };
    let mut state: Option<SarState> = None;

    for (i, bar) in series.bars().iter().enumerate() {
        let (Some(high), Some(low)) = (bar.high.get(), bar.low.get()) else {
            continue;
        };
        match state {
            None => {
                let initial = SarState::initial(high, low, params);
                out.rising[i] = Value::new(initial.sar);
                out.falling[i] = Value::ZERO;
                state = Some(initial);
            }
            Some(current) => {
                let (next, sar, rising) = current.step(high, low, params);
                let (active, inactive) = if rising {
                    (&mut out.rising, &mut out.falling)
                } else {
                    (&mut out.falling, &mut out.rising)
                };
                active[i] = Value::new(sar);
                inactive[i] = Value::ZERO;
                state = Some(next);
            }
        }
    }
    out
}
