use core_types::{PriceSeries, Series, TrueRangeMethod, Value};
use serde::Serialize;

use crate::filter::wilder;
use crate::transforms::true_range;

/// Wilder-smoothed true range.
pub fn atr(series: &PriceSeries, period: usize, method: TrueRangeMethod) -> Series {
    wilder(&true_range(series, method), period)
}

/// Directional movement system. DI and DX values are fractions, not percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adx {
    pub plus_di: Series,
    pub minus_di: Series,
    pub dx: Series,
    pub adx: Series,
}

/// +DM and -DM per bar: the larger of up-move and down-move is kept (floored
/// at zero), the other is zeroed. Ties zero both.
fn directional_movement(series: &PriceSeries) -> (Series, Series) {
    let bars = series.bars();
    let mut plus = vec![Value::NA];
    let mut minus = vec![Value::NA];
    for pair in bars.windows(2) {
        let (prev, bar) = (&pair[0], &pair[1]);
        let up = bar.high - prev.high;
        let down = prev.low - bar.low;
        let (p, m) = match (up.get(), down.get()) {
            (Some(u), Some(d)) if u > d => (Value::new(u.max(0.0)), Value::ZERO),
            (Some(u), Some(d)) if d > u => (Value::ZERO, Value::new(d.max(0.0))),
            (Some(_), Some(_)) => (Value::ZERO, Value::ZERO),
            _ => (Value::NA, Value::NA),
        };
        plus.push(p);
        minus.push(m);
    }
    (plus, minus)
}

pub fn adx(series: &PriceSeries, period: usize, method: TrueRangeMethod) -> Adx {
    let smoothed_tr = atr(series, period, method);
    let (plus_dm, minus_dm) = directional_movement(series);
    let smoothed_plus = wilder(&plus_dm, period);
    let smoothed_minus = wilder(&minus_dm, period);

    let plus_di: Series = smoothed_plus.iter().zip(&smoothed_tr).map(|(&p, &tr)| p / tr).collect();
    let minus_di: Series = smoothed_minus.iter().zip(&smoothed_tr).map(|(&m, &tr)| m / tr).collect();
    let dx: Series = plus_di
        .iter()
        .zip(&minus_di)
        .map(|(&p, &m)| (p - m).abs() / (p + m))
        .collect();
    let adx = wilder(&dx, period);

    Adx {
        plus_di,
        minus_di,
        dx,
        adx,
    }
}
