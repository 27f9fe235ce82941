//! # Meridian Indicator Library
//!
//! Technical-analysis indicators over a `PriceSeries`. Every output is a
//! `Series` (or a named-field struct of them) aligned bar-for-bar with the
//! input; bars before a lookback window fills are undefined, never zero.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** no I/O. Depends only on `core-types` and `configuration`;
//!   parameters are handed in, never loaded.
//! - **One Smoothing Path:** recursive averages go through the `CausalFilter`
//!   trait (`Wilder`, `Ema`), so undefined-input handling lives in one place.
//! - **Explicit State:** path-dependent indicators (Parabolic SAR, ZigZag)
//!   expose their state struct and a pure `step` transition.
//!
//! ## Public API
//!
//! - The indicator functions, grouped by module (`overlays`, `oscillators`,
//!   `volume`, ...).
//! - `IndicatorSet`: computes the whole catalogue into an `IndicatorTable`.

pub mod aroon;
pub mod directional;
pub mod error;
pub mod filter;
pub mod oscillators;
pub mod overlays;
pub mod rolling;
pub mod rsi;
pub mod sar;
pub mod set;
pub mod transforms;
pub mod volume;
pub mod zigzag;

pub use aroon::{Aroon, aroon};
pub use directional::{Adx, adx, atr};
pub use error::IndicatorError;
pub use filter::{CausalFilter, Ema, Wilder};
pub use rsi::rsi;
pub use sar::{ParabolicSar, SarState, parabolic_sar};
pub use set::{Column, IndicatorSet, IndicatorTable};
pub use zigzag::{ZigZag, ZigZagState, zigzag};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};
    use core_types::{Bar, PriceSeries};

    /// Daily bars from `(open, high, low, close, volume)` rows.
    pub fn bars(rows: &[(f64, f64, f64, f64, f64)]) -> PriceSeries {
        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = rows
            .iter()
            .enumerate()
            .map(|(i, &(o, h, l, c, v))| Bar::new(origin + Duration::days(i as i64), o, h, l, c, v))
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    /// Daily bars whose every price field is the given close.
    pub fn closes(values: &[f64]) -> PriceSeries {
        let rows: Vec<_> = values.iter().map(|&c| (c, c, c, c, 1000.0)).collect();
        bars(&rows)
    }
}
