//! Terminal tables for the `stats` command.

use analytics::{BenchmarkMetrics, DrawdownEpisode, Extremum, StatsReport, YEAR_TO_DATE_SLOT};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use core_types::Value;

enum Format {
    Percent,
    Number,
}

fn percent(value: Value) -> String {
    value.map(|x| x * 100.0).get().map_or_else(|| "-".to_string(), |x| format!("{x:.2}%"))
}

fn number(value: Value) -> String {
    format!("{value:.2}")
}

fn extremum(e: Option<Extremum>) -> String {
    e.map_or_else(
        || "-".to_string(),
        |e| format!("{} ({})", percent(Value::new(e.value)), e.timestamp.format("%Y-%m-%d")),
    )
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn right_aligned(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// One row per metric, one column per report.
pub fn stats_table(reports: &[StatsReport]) -> Table {
    type Row = (&'static str, Format, fn(&StatsReport) -> Value);
    let rows: &[Row] = &[
        ("Risk-free rate", Format::Percent, |r| Value::new(r.yearly_risk_free_return)),
        ("Total Return", Format::Percent, |r| r.total_return),
        ("CAGR", Format::Percent, |r| r.cagr),
        ("Max Drawdown", Format::Percent, |r| r.max_drawdown),
        ("Market Cap", Format::Number, |r| Value::new(r.market_cap)),
        ("MTD", Format::Percent, |r| r.mtd),
        ("3m", Format::Percent, |r| r.three_month),
        ("6m", Format::Percent, |r| r.six_month),
        ("YTD", Format::Percent, |r| r.ytd),
        ("1Y", Format::Percent, |r| r.one_year),
        ("3Y (ann.)", Format::Percent, |r| r.three_year),
        ("5Y (ann.)", Format::Percent, |r| r.five_year),
        ("10Y (ann.)", Format::Percent, |r| r.ten_year),
        ("Since Incep. (ann.)", Format::Percent, |r| r.incep),
        ("Daily Sharpe", Format::Number, |r| r.daily_sharpe),
        ("Daily Mean (ann.)", Format::Percent, |r| r.daily_mean),
        ("Daily Vol (ann.)", Format::Percent, |r| r.daily_vol),
        ("Daily Skew", Format::Number, |r| r.daily_skew),
        ("Daily Kurt", Format::Number, |r| r.daily_kurt),
        ("Monthly Sharpe", Format::Number, |r| r.monthly_sharpe),
        ("Monthly Mean (ann.)", Format::Percent, |r| r.monthly_mean),
        ("Monthly Vol (ann.)", Format::Percent, |r| r.monthly_vol),
        ("Monthly Skew", Format::Number, |r| r.monthly_skew),
        ("Monthly Kurt", Format::Number, |r| r.monthly_kurt),
        ("Yearly Sharpe", Format::Number, |r| r.yearly_sharpe),
        ("Yearly Mean", Format::Percent, |r| r.yearly_mean),
        ("Yearly Vol", Format::Percent, |r| r.yearly_vol),
        ("Yearly Skew", Format::Number, |r| r.yearly_skew),
        ("Yearly Kurt", Format::Number, |r| r.yearly_kurt),
        ("Avg. Drawdown", Format::Percent, |r| r.avg_drawdown),
        ("Avg. Drawdown Days", Format::Number, |r| r.avg_drawdown_days),
        ("Avg. Up Month", Format::Percent, |r| r.avg_up_month),
        ("Avg. Down Month", Format::Percent, |r| r.avg_down_month),
        ("Positive Month %", Format::Percent, |r| r.pos_month_perc),
        ("Win Year %", Format::Percent, |r| r.win_year_perc),
        ("Win 12m %", Format::Percent, |r| r.twelve_month_win_perc),
    ];

    let mut header = vec!["Stat".to_string()];
    header.extend(reports.iter().map(|r| r.name.clone()));
    let mut table = new_table(header);

    let dates: [(&str, fn(&StatsReport) -> String); 2] = [
        ("Start", |r| r.start.format("%Y-%m-%d").to_string()),
        ("End", |r| r.end.format("%Y-%m-%d").to_string()),
    ];
    for (label, get) in dates {
        let mut cells = vec![Cell::new(label)];
        cells.extend(reports.iter().map(|r| right_aligned(get(r))));
        table.add_row(cells);
    }

    for (label, format, get) in rows {
        let mut cells = vec![Cell::new(label)];
        cells.extend(reports.iter().map(|r| {
            let value = get(r);
            right_aligned(match format {
                Format::Percent => percent(value),
                Format::Number => number(value),
            })
        }));
        table.add_row(cells);
    }

    let extremes: [(&str, fn(&StatsReport) -> Option<Extremum>); 6] = [
        ("Best Day", |r| r.best_day),
        ("Worst Day", |r| r.worst_day),
        ("Best Month", |r| r.best_month),
        ("Worst Month", |r| r.worst_month),
        ("Best Year", |r| r.best_year),
        ("Worst Year", |r| r.worst_year),
    ];
    for (label, get) in extremes {
        let mut cells = vec![Cell::new(label)];
        cells.extend(reports.iter().map(|r| right_aligned(extremum(get(r)))));
        table.add_row(cells);
    }
    table
}

pub fn drawdown_table(episodes: &[DrawdownEpisode]) -> Table {
    let mut table = new_table(
        ["Start", "End", "Depth", "Days"].iter().map(|s| s.to_string()).collect(),
    );
    for e in episodes {
        table.add_row(vec![
            Cell::new(e.start.format("%Y-%m-%d")),
            Cell::new(e.end.format("%Y-%m-%d")),
            right_aligned(percent(Value::new(e.depth))),
            right_aligned(e.days.to_string()),
        ]);
    }
    table
}

/// Years down, months across, with the compounded year in the last column.
pub fn return_table(report: &StatsReport) -> Table {
    let mut header = vec!["Year".to_string()];
    header.extend(
        ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "YTD"]
            .iter()
            .map(|s| s.to_string()),
    );
    let mut table = new_table(header);
    for (year, months) in &report.return_table {
        let mut cells = vec![Cell::new(year)];
        cells.extend((1..=YEAR_TO_DATE_SLOT).map(|m| {
            right_aligned(months.get(&m).map_or_else(String::new, |&v| percent(v)))
        }));
        table.add_row(cells);
    }
    table
}

pub fn benchmark_table(metrics: &[(String, BenchmarkMetrics)]) -> Table {
    let mut table = new_table(
        ["Symbol", "Info Ratio", "Sharpe (ann.)", "Equity Sharpe", "Beta", "Alpha", "R²"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    for (symbol, m) in metrics {
        let mut cells = vec![Cell::new(symbol)];
        cells.extend(
            [m.information_ratio, m.annualized_sharpe_ratio, m.equity_sharpe, m.beta, m.alpha, m.r_squared]
                .into_iter()
                .map(|v| right_aligned(number(v))),
        );
        table.add_row(cells);
    }
    table
}
