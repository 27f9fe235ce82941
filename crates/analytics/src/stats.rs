//! The tiered statistics aggregator behind [`crate::AnalyticsEngine`].
//!
//! Daily, monthly and yearly return series each unlock a group of metrics
//! once they have enough slots (the leading undefined return counts as a
//! slot). The first tier that lacks history ends the computation; every
//! metric it would have produced stays undefined.

use chrono::{DateTime, Datelike, Months, Utc};
use configuration::StatsSettings;
use core_types::{DAYS_IN_TRADING_YEAR, Frequency, MONTHS_IN_YEAR, PriceSeries, Value, defined};
use indicators::rolling::pct_change;

use crate::drawdown::{drawdown, drawdown_episodes};
use crate::moments::{kurtosis, mean, skew, std_dev};
use crate::performance::compound_annual_growth_rate;
use crate::report::{Extremum, ReturnTable, StatsReport, YEAR_TO_DATE_SLOT};
use crate::resample::{Resampled, resample};

const MIN_DAILY_SLOTS: usize = 4;
const MIN_MONTHLY_SLOTS: usize = 2;
const MIN_THREE_MONTH_SLOTS: usize = 3;
const MIN_MONTHLY_SHAPE_SLOTS: usize = 4;
const MIN_YEARLY_SLOTS: usize = 2;
const MIN_YEARLY_SHAPE_SLOTS: usize = 4;

/// Annualized per-period risk-free rate for `periods` compounding periods per year.
fn periodic_risk_free(yearly: f64, periods: f64) -> f64 {
    ((1.0 + yearly).powf(1.0 / periods) - 1.0) * periods
}

/// First occurrence of the largest (`best`) or smallest defined value.
fn extremum(timestamps: &[DateTime<Utc>], values: &[Value], best: bool) -> Option<Extremum> {
    let mut found: Option<Extremum> = None;
    for (&timestamp, value) in timestamps.iter().zip(values) {
        let Some(value) = value.get() else { continue };
        let better = match found {
            None => true,
            Some(current) if best => value > current.value,
            Some(current) => value < current.value,
        };
        if better {
            found = Some(Extremum { timestamp, value });
        }
    }
    found
}

/// Excess kurtosis, undefined when no nonzero return remains.
fn kurtosis_of_moves(returns: &[f64]) -> Value {
    if returns.iter().all(|&r| r == 0.0) {
        return Value::NA;
    }
    kurtosis(returns)
}

fn fraction(count: usize, total: isize) -> Value {
    if total <= 0 {
        return Value::NA;
    }
    Value::new(count as f64 / total as f64)
}

/// Last close over the last close at or before `months` calendar months earlier.
fn lookback(series: &PriceSeries, months: u32) -> Value {
    let end = series.last_timestamp();
    let Some(anchor) = end.checked_sub_months(Months::new(months)) else {
        return Value::NA;
    };
    let Some(index) = series.index_at_or_before(anchor) else {
        return Value::NA;
    };
    let bars = series.bars();
    bars[bars.len() - 1].close / bars[index].close - 1.0
}

/// CAGR over the bars from `months` calendar months before the last bar onward.
fn trailing_cagr(series: &PriceSeries, months: u32) -> Value {
    let end = series.last_timestamp();
    end.checked_sub_months(Months::new(months))
        .and_then(|from| series.slice_from(from))
        .map_or(Value::NA, |window| compound_annual_growth_rate(&window, None, None))
}

fn return_table(series: &PriceSeries, monthly: &Resampled, returns: &[Value]) -> ReturnTable {
    let mut table = ReturnTable::new();
    for (ts, &r) in monthly.timestamps.iter().zip(returns) {
        table.entry(ts.year()).or_default().insert(ts.month(), r);
    }
    // The first month has no previous month-end; measure it from the first close.
    if let (Some(ts), Some(&month_end)) = (monthly.timestamps.first(), monthly.values.first()) {
        let first_close = series.bars()[0].close;
        table
            .entry(ts.year())
            .or_default()
            .insert(ts.month(), month_end / first_close - 1.0);
    }
    for months in table.values_mut() {
        let growth = months.values().fold(Value::new(1.0), |acc, &r| acc * (r + 1.0));
        months.insert(YEAR_TO_DATE_SLOT, growth - 1.0);
    }
    table
}

/// Builds the full statistics report for one series.
pub fn summarize(series: &PriceSeries, settings: &StatsSettings) -> StatsReport {
    let mut report = StatsReport::new(
        series.symbol(),
        series.first_timestamp(),
        series.last_timestamp(),
        settings.market_cap,
        settings.risk_free_rate,
    );
    fill(series, settings.risk_free_rate, &mut report);
    report
}

fn fill(series: &PriceSeries, yearly_rf: f64, report: &mut StatsReport) {
    let bars = series.bars();
    let first_close = bars[0].close;
    let last_close = bars[bars.len() - 1].close;

    // Daily
    let close = series.close();
    let timestamps = series.timestamps();
    let daily = pct_change(&close, 1);
    if daily.len() < MIN_DAILY_SLOTS {
        tracing::debug!(slots = daily.len(), "Too few daily returns; report stops at the descriptive tier.");
        return;
    }
    let dr = defined(&daily);
    report.daily_mean = mean(&dr) * DAYS_IN_TRADING_YEAR;
    report.daily_vol = std_dev(&dr) * DAYS_IN_TRADING_YEAR.sqrt();
    report.daily_sharpe =
        (report.daily_mean - periodic_risk_free(yearly_rf, DAYS_IN_TRADING_YEAR)) / report.daily_vol;
    report.best_day = extremum(&timestamps, &daily, true);
    report.worst_day = extremum(&timestamps, &daily, false);
    report.total_return = last_close / first_close - 1.0;
    report.ytd = report.total_return;
    report.cagr = compound_annual_growth_rate(series, None, None);
    report.incep = report.cagr;

    let dd = drawdown(&close);
    report.max_drawdown = defined(&dd).into_iter().reduce(f64::min).map_or(Value::NA, Value::new);
    let episodes = drawdown_episodes(&timestamps, &dd);
    let depths: Vec<f64> = episodes.iter().map(|e| e.depth).collect();
    let durations: Vec<f64> = episodes.iter().map(|e| e.days as f64).collect();
    report.avg_drawdown = mean(&depths);
    report.avg_drawdown_days = mean(&durations);
    report.daily_skew = skew(&dr);
    report.daily_kurt = kurtosis_of_moves(&dr);

    // Monthly
    let monthly = resample(series, Frequency::Monthly);
    let monthly_returns = monthly.returns();
    if monthly_returns.len() < MIN_MONTHLY_SLOTS {
        tracing::debug!(slots = monthly_returns.len(), "Too few monthly returns; report stops at the daily tier.");
        return;
    }
    let mr = defined(&monthly_returns);
    report.monthly_mean = mean(&mr) * MONTHS_IN_YEAR;
    report.monthly_vol = std_dev(&mr) * MONTHS_IN_YEAR.sqrt();
    report.monthly_sharpe =
        (report.monthly_mean - periodic_risk_free(yearly_rf, MONTHS_IN_YEAR)) / report.monthly_vol;
    report.best_month = extremum(&monthly.timestamps, &monthly_returns, true);
    report.worst_month = extremum(&monthly.timestamps, &monthly_returns, false);
    report.mtd = last_close / monthly.values[monthly.len() - 2] - 1.0;
    let ups: Vec<f64> = mr.iter().copied().filter(|&r| r > 0.0).collect();
    let downs: Vec<f64> = mr.iter().copied().filter(|&r| r <= 0.0).collect();
    report.pos_month_perc = fraction(ups.len(), monthly_returns.len() as isize - 1);
    report.avg_up_month = mean(&ups);
    report.avg_down_month = mean(&downs);
    report.return_table = return_table(series, &monthly, &monthly_returns);

    if monthly_returns.len() < MIN_THREE_MONTH_SLOTS {
        return;
    }
    report.three_month = lookback(series, 3);

    if monthly_returns.len() < MIN_MONTHLY_SHAPE_SLOTS {
        return;
    }
    report.monthly_skew = skew(&mr);
    report.monthly_kurt = kurtosis_of_moves(&mr);
    report.six_month = lookback(series, 6);

    // Yearly
    let yearly = resample(series, Frequency::Yearly);
    let yearly_returns = yearly.returns();
    if yearly_returns.len() < MIN_YEARLY_SLOTS {
        tracing::debug!(slots = yearly_returns.len(), "Too few yearly returns; report stops at the monthly tier.");
        return;
    }
    let yr = defined(&yearly_returns);
    report.ytd = last_close / yearly.values[yearly.len() - 2] - 1.0;
    report.one_year = lookback(series, 12);
    report.yearly_mean = mean(&yr);
    report.yearly_vol = std_dev(&yr);
    report.yearly_sharpe = (report.yearly_mean - yearly_rf) / report.yearly_vol;
    report.best_year = extremum(&yearly.timestamps, &yearly_returns, true);
    report.worst_year = extremum(&yearly.timestamps, &yearly_returns, false);
    report.three_year = trailing_cagr(series, 36);
    report.win_year_perc = fraction(
        yr.iter().filter(|&&r| r > 0.0).count(),
        yearly_returns.len() as isize - 1,
    );
    let twelve_month = pct_change(&monthly.values, 11);
    report.twelve_month_win_perc = fraction(
        twelve_month.iter().filter(|v| v.is_positive()).count(),
        monthly.len() as isize - 11,
    );

    if yearly_returns.len() < MIN_YEARLY_SHAPE_SLOTS {
        return;
    }
    report.yearly_skew = skew(&yr);
    report.yearly_kurt = kurtosis_of_moves(&yr);
    report.five_year = trailing_cagr(series, 60);
    report.ten_year = trailing_cagr(series, 120);
}
