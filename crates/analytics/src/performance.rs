//! Whole-series return and risk measures.
//!
//! Range arguments are optional timestamps resolved to the last bar at or
//! before them; `None` means the first (start) or last (end) bar.

use chrono::{DateTime, Utc};
use core_types::{DAYS_IN_TRADING_YEAR, DAYS_IN_YEAR, PriceSeries, Series, Value, defined};
use indicators::rolling::{diff, pct_change};

use crate::moments::{mean, std_dev};

/// Percent change of the close over `periods` bars, as a fraction.
pub fn returns(series: &PriceSeries, periods: usize) -> Series {
    pct_change(&series.close(), periods)
}

/// Absolute close change over `periods` bars; undefined slots become zero.
pub fn price_returns(series: &PriceSeries, periods: usize) -> Series {
    diff(&series.close(), periods)
        .into_iter()
        .map(|v| v.or(Value::ZERO))
        .collect()
}

fn returns_or_zero(series: &PriceSeries, periods: usize) -> Vec<f64> {
    returns(series, periods).into_iter().map(|v| v.unwrap_or(0.0)).collect()
}

/// Mean of the period returns, in percent.
pub fn arithmetic_return(series: &PriceSeries, periods: usize) -> Value {
    mean(&returns_or_zero(series, periods)) * 100.0
}

/// Geometric mean of the period growth factors minus one, in percent.
pub fn geometric_return(series: &PriceSeries, periods: usize) -> Value {
    let logs: Option<Vec<f64>> = returns_or_zero(series, periods)
        .into_iter()
        .map(|r| (r > -1.0).then(|| (1.0 + r).ln()))
        .collect();
    let Some(logs) = logs else {
        return Value::NA;
    };
    mean(&logs).map(|m| 100.0 * (m.exp() - 1.0))
}

/// Period returns spread evenly over the period: `returns(periods) / periods`.
pub fn rate_of_return(series: &PriceSeries, periods: usize) -> Series {
    returns_or_zero(series, periods)
        .into_iter()
        .map(|r| Value::new(r) / periods as f64)
        .collect()
}

fn bounds(
    series: &PriceSeries,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Option<(usize, usize)> {
    let start = match start {
        Some(ts) => series.index_at_or_before(ts)?,
        None => 0,
    };
    let end = match end {
        Some(ts) => series.index_at_or_before(ts)?,
        None => series.len().checked_sub(1)?,
    };
    Some((start, end))
}

pub fn price_delta(series: &PriceSeries, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Value {
    let Some((start, end)) = bounds(series, start, end) else {
        return Value::NA;
    };
    let bars = series.bars();
    bars[end].close - bars[start].close
}

/// Change between two closes, in percent of the starting close.
pub fn total_return(series: &PriceSeries, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Value {
    let Some((first, _)) = bounds(series, start, end) else {
        return Value::NA;
    };
    price_delta(series, start, end) / series.bars()[first].close * 100.0
}

/// `(end / start) ^ (365 / days) - 1`, with `days` the whole calendar days
/// between the two bars. Undefined when both bars fall on the same day.
pub fn compound_annual_growth_rate(
    series: &PriceSeries,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Value {
    let Some((start, end)) = bounds(series, start, end) else {
        return Value::NA;
    };
    let bars = series.bars();
    let days = (bars[end].timestamp - bars[start].timestamp).num_days();
    if days == 0 {
        return Value::NA;
    }
    (bars[end].close / bars[start].close).powf(DAYS_IN_YEAR / days as f64) - 1.0
}

/// Sample standard deviation of the one-bar returns.
pub fn deviation_risk(series: &PriceSeries) -> Value {
    std_dev(&defined(&returns(series, 1)))
}

/// Annualized Sharpe ratio of the one-bar returns with no risk-free rate.
pub fn risk_return_ratio(series: &PriceSeries) -> Value {
    let r = defined(&returns(series, 1));
    mean(&r) / std_dev(&r) * DAYS_IN_TRADING_YEAR.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn daily(closes: &[f64]) -> PriceSeries {
        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (origin + Duration::days(i as i64), c))
            .collect();
        PriceSeries::from_closes("X", &points).unwrap()
    }

    #[test]
    fn cagr_over_ten_consecutive_days() {
        let closes: Vec<f64> = (100..=109).map(f64::from).collect();
        let series = daily(&closes);
        let expected = (109.0f64 / 100.0).powf(365.0 / 9.0) - 1.0;
        assert_relative_eq!(
            compound_annual_growth_rate(&series, None, None).unwrap_or(f64::NAN),
            expected,
            epsilon = 1e-9
        );
    }

    #[test]
    fn cagr_over_a_single_day_is_undefined() {
        let series = daily(&[1.0]);
        assert!(compound_annual_growth_rate(&series, None, None).is_na());
    }

    #[test]
    fn total_return_is_a_percentage() {
        let series = daily(&[50.0, 55.0, 60.0]);
        assert_relative_eq!(total_return(&series, None, None).unwrap_or(f64::NAN), 20.0, epsilon = 1e-9);
        let mid = series.bars()[1].timestamp;
        assert_relative_eq!(price_delta(&series, Some(mid), None).unwrap_or(f64::NAN), 5.0);
    }

    #[test]
    fn range_before_first_bar_is_undefined() {
        let series = daily(&[50.0, 55.0]);
        let before = series.first_timestamp() - Duration::days(3);
        assert!(price_delta(&series, Some(before), None).is_na());
    }

    #[test]
    fn price_returns_fill_leading_slots_with_zero() {
        let series = daily(&[10.0, 12.0, 11.0]);
        assert_eq!(price_returns(&series, 1), core_types::series_from(&[0.0, 2.0, -1.0]));
    }

    #[test]
    fn arithmetic_and_geometric_returns() {
        // Returns: 0 (filled), +10%, -10%.
        let series = daily(&[100.0, 110.0, 99.0]);
        assert_relative_eq!(arithmetic_return(&series, 1).unwrap_or(f64::NAN), 0.0, epsilon = 1e-9);
        let geometric = 100.0 * ((1.1f64 * 0.9).powf(1.0 / 3.0) - 1.0);
        assert_relative_eq!(geometric_return(&series, 1).unwrap_or(f64::NAN), geometric, epsilon = 1e-9);
    }

    #[test]
    fn flat_series_has_undefined_risk_ratio() {
        let series = daily(&[10.0; 5]);
        assert_eq!(deviation_risk(&series), Value::ZERO);
        assert!(risk_return_ratio(&series).is_na());
    }

    #[test]
    fn rate_of_return_divides_by_period_count() {
        let series = daily(&[10.0, 11.0, 12.0]);
        let out = rate_of_return(&series, 2);
        assert_eq!(out[0], Value::ZERO);
        assert_relative_eq!(out[2].unwrap_or(f64::NAN), 0.1, epsilon = 1e-12);
    }
}
