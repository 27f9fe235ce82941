use crate::benchmark::{BenchmarkComparator, BenchmarkMetrics};
use crate::drawdown::{DrawdownEpisode, episodes};
use crate::error::AnalyticsError;
use crate::report::StatsReport;
use crate::stats::summarize;
use configuration::StatsSettings;
use core_types::PriceSeries;
use rayon::prelude::*;

/// A stateless calculator for deriving performance statistics from price history.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    settings: StatsSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: StatsSettings) -> Result<Self, AnalyticsError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &StatsSettings {
        &self.settings
    }

    /// The main entry point for calculating the statistics report.
    ///
    /// Never fails: metrics the series is too short for are left undefined.
    #[tracing::instrument(skip_all, fields(symbol = %series.symbol(), bars = series.len()))]
    pub fn calculate(&self, series: &PriceSeries) -> StatsReport {
        let report = summarize(series, &self.settings);
        tracing::info!(
            total_return = %report.total_return,
            cagr = %report.cagr,
            max_drawdown = %report.max_drawdown,
            "Calculated statistics report."
        );
        report
    }

    /// Calculates reports for several instruments in parallel, in input order.
    pub fn calculate_batch(&self, series: &[PriceSeries]) -> Vec<StatsReport> {
        series.par_iter().map(|s| self.calculate(s)).collect()
    }

    pub fn drawdown_episodes(&self, series: &PriceSeries) -> Vec<DrawdownEpisode> {
        episodes(series)
    }

    /// Benchmark-relative metrics using the configured risk-free rate.
    pub fn compare(
        &self,
        series: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> Result<BenchmarkMetrics, AnalyticsError> {
        let comparator = BenchmarkComparator::new(series, benchmark, self.settings.risk_free_rate)?;
        Ok(comparator.metrics())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn daily(symbol: &str, closes: &[f64]) -> PriceSeries {
        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (origin + Duration::days(i as i64), c))
            .collect();
        PriceSeries::from_closes(symbol, &points).unwrap()
    }

    #[test]
    fn rejects_invalid_settings() {
        let settings = StatsSettings {
            risk_free_rate: f64::NAN,
            market_cap: 1.0,
        };
        assert!(matches!(
            AnalyticsEngine::new(settings),
            Err(AnalyticsError::InvalidSettings(_))
        ));
    }

    #[test]
    fn batch_preserves_input_order() {
        let engine = AnalyticsEngine::default();
        let inputs = vec![
            daily("A", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            daily("B", &[5.0, 4.0, 3.0]),
            daily("C", &[2.0, 2.0, 2.0, 2.0]),
        ];
        let reports = engine.calculate_batch(&inputs);
        let names: Vec<_> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(reports[0], engine.calculate(&inputs[0]));
    }

    #[test]
    fn compare_uses_configured_rate() {
        let engine = AnalyticsEngine::new(StatsSettings {
            risk_free_rate: 0.05,
            market_cap: 1.0,
        })
        .unwrap();
        let series = daily("S", &[10.0, 11.0, 10.5, 11.5, 12.0]);
        let bench = daily("B", &[20.0, 20.5, 20.2, 21.0, 21.1]);
        let metrics = engine.compare(&series, &bench).unwrap();
        let direct = BenchmarkComparator::new(&series, &bench, 0.05).unwrap().metrics();
        assert_eq!(metrics, direct);
    }
}
