use chrono::{DateTime, Utc};
use core_types::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// Month slot of the return table holding the compounded year-to-date return.
pub const YEAR_TO_DATE_SLOT: u32 = 13;

/// Monthly returns keyed by year, then month (1-12, plus [`YEAR_TO_DATE_SLOT`]).
pub type ReturnTable = BTreeMap<i32, BTreeMap<u32, Value>>;

/// The best or worst period return and when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A multi-horizon performance summary of one price series.
///
/// The shape is fixed: metrics that need more history than the series has are
/// undefined rather than absent. Returns, means, volatilities and lookbacks
/// are fractions; `avg_drawdown_days` is in days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub market_cap: f64,
    pub yearly_risk_free_return: f64,

    // Daily
    pub daily_mean: Value,
    pub daily_vol: Value,
    pub daily_sharpe: Value,
    pub best_day: Option<Extremum>,
    pub worst_day: Option<Extremum>,
    pub total_return: Value,
    pub cagr: Value,
    pub incep: Value,
    pub max_drawdown: Value,
    pub avg_drawdown: Value,
    pub avg_drawdown_days: Value,
    pub daily_skew: Value,
    pub daily_kurt: Value,

    // Monthly
    pub monthly_mean: Value,
    pub monthly_vol: Value,
    pub monthly_sharpe: Value,
    pub best_month: Option<Extremum>,
    pub worst_month: Option<Extremum>,
    pub mtd: Value,
    pub pos_month_perc: Value,
    pub avg_up_month: Value,
    pub avg_down_month: Value,
    pub three_month: Value,
    pub monthly_skew: Value,
    pub monthly_kurt: Value,
    pub six_month: Value,

    // Yearly
    pub ytd: Value,
    pub one_year: Value,
    pub yearly_mean: Value,
    pub yearly_vol: Value,
    pub yearly_sharpe: Value,
    pub best_year: Option<Extremum>,
    pub worst_year: Option<Extremum>,
    pub three_year: Value,
    pub win_year_perc: Value,
    pub twelve_month_win_perc: Value,
    pub yearly_skew: Value,
    pub yearly_kurt: Value,
    pub five_year: Value,
    pub ten_year: Value,

    pub return_table: ReturnTable,
}

impl StatsReport {
    /// A report with only the descriptive fields set.
    pub fn new(
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        market_cap: f64,
        yearly_risk_free_return: f64,
    ) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            market_cap,
            yearly_risk_free_return,
            daily_mean: Value::NA,
            daily_vol: Value::NA,
            daily_sharpe: Value::NA,
            best_day: None,
            worst_day: None,
            total_return: Value::NA,
            cagr: Value::NA,
            incep: Value::NA,
            max_drawdown: Value::NA,
            avg_drawdown: Value::NA,
            avg_drawdown_days: Value::NA,
            daily_skew: Value::NA,
            daily_kurt: Value::NA,
            monthly_mean: Value::NA,
            monthly_vol: Value::NA,
            monthly_sharpe: Value::NA,
            best_month: None,
            worst_month: None,
            mtd: Value::NA,
            pos_month_perc: Value::NA,
            avg_up_month: Value::NA,
            avg_down_month: Value::NA,
            three_month: Value::NA,
            monthly_skew: Value::NA,
            monthly_kurt: Value::NA,
            six_month: Value::NA,
            ytd: Value::NA,
            one_year: Value::NA,
            yearly_mean: Value::NA,
            yearly_vol: Value::NA,
            yearly_sharpe: Value::NA,
            best_year: None,
            worst_year: None,
            three_year: Value::NA,
            win_year_perc: Value::NA,
            twelve_month_win_perc: Value::NA,
            yearly_skew: Value::NA,
            yearly_kurt: Value::NA,
            five_year: Value::NA,
            ten_year: Value::NA,
            return_table: ReturnTable::new(),
        }
    }

    /// The compounded return of `year`, if the table has that year.
    pub fn year_to_date(&self, year: i32) -> Value {
        self.return_table
            .get(&year)
            .and_then(|months| months.get(&YEAR_TO_DATE_SLOT))
            .copied()
            .unwrap_or(Value::NA)
    }
}
