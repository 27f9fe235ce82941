use chrono::{DateTime, Utc};
use core_types::{DAYS_IN_TRADING_YEAR, PriceSeries, Value};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::AnalyticsError;
use crate::moments::{covariance, mean, std_dev, variance};
use crate::performance::returns;

/// Benchmark-relative risk measures, all derived from one-bar returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkMetrics {
    pub information_ratio: Value,
    pub annualized_sharpe_ratio: Value,
    pub equity_sharpe: Value,
    pub beta: Value,
    pub alpha: Value,
    pub r_squared: Value,
}

/// Compares one instrument's returns with a benchmark's over their common bars.
#[derive(Debug, Clone)]
pub struct BenchmarkComparator {
    /// Instrument returns, aligned with `benchmark`.
    returns: Vec<f64>,
    benchmark: Vec<f64>,
    /// Yearly risk-free rate.
    risk_free_rate: f64,
}

impl BenchmarkComparator {
    /// Aligns the one-bar returns of both series by timestamp (inner join).
    ///
    /// A bar only contributes when both returns are defined on it.
    pub fn new(
        series: &PriceSeries,
        benchmark: &PriceSeries,
        risk_free_rate: f64,
    ) -> Result<Self, AnalyticsError> {
        let benchmark_returns: HashMap<DateTime<Utc>, Value> = benchmark
            .timestamps()
            .into_iter()
            .zip(returns(benchmark, 1))
            .collect();

        let mut overlap = 0;
        let mut pairs = (Vec::new(), Vec::new());
        for (ts, r) in series.timestamps().into_iter().zip(returns(series, 1)) {
            let Some(&rb) = benchmark_returns.get(&ts) else { continue };
            overlap += 1;
            if let (Some(r), Some(rb)) = (r.get(), rb.get()) {
                pairs.0.push(r);
                pairs.1.push(rb);
            }
        }
        if overlap == 0 {
            return Err(AnalyticsError::NoOverlap {
                symbol: series.symbol().to_string(),
                benchmark: benchmark.symbol().to_string(),
            });
        }
        tracing::debug!(overlap, aligned = pairs.0.len(), "Aligned benchmark returns.");
        Ok(Self {
            returns: pairs.0,
            benchmark: pairs.1,
            risk_free_rate,
        })
    }

    /// Number of aligned return pairs.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    fn per_period_risk_free(&self) -> f64 {
        self.risk_free_rate / DAYS_IN_TRADING_YEAR
    }

    fn deltas(&self, offset: f64) -> Vec<f64> {
        self.returns
            .iter()
            .zip(&self.benchmark)
            .map(|(r, rb)| r - offset - rb)
            .collect()
    }

    /// Mean over standard deviation of the return difference.
    pub fn information_ratio(&self) -> Value {
        let delta = self.deltas(0.0);
        mean(&delta) / std_dev(&delta)
    }

    pub fn annualized_sharpe_ratio(&self) -> Value {
        self.information_ratio() * DAYS_IN_TRADING_YEAR.sqrt()
    }

    /// Annualized Sharpe of the excess return over both the risk-free rate and the benchmark.
    pub fn equity_sharpe(&self) -> Value {
        let delta = self.deltas(self.per_period_risk_free());
        mean(&delta) / std_dev(&delta) * DAYS_IN_TRADING_YEAR.sqrt()
    }

    pub fn beta(&self) -> Value {
        covariance(&self.returns, &self.benchmark) / variance(&self.benchmark)
    }

    pub fn alpha(&self) -> Value {
        let rf = self.per_period_risk_free();
        mean(&self.returns) - rf - self.beta() * (mean(&self.benchmark) - rf)
    }

    /// Share of the instrument's return variance explained by the fitted
    /// `alpha + beta * (benchmark - rf) + rf` line.
    pub fn r_squared(&self) -> Value {
        let (Some(alpha), Some(beta), Some(mean_r)) =
            (self.alpha().get(), self.beta().get(), mean(&self.returns).get())
        else {
            return Value::NA;
        };
        let rf = self.per_period_risk_free();
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (&r, &rb) in self.returns.iter().zip(&self.benchmark) {
            let fitted = alpha + beta * (rb - rf) + rf;
            ss_res += (fitted - r).powi(2);
            ss_tot += (r - mean_r).powi(2);
        }
        1.0 - Value::new(ss_res) / ss_tot
    }

    pub fn metrics(&self) -> BenchmarkMetrics {
        BenchmarkMetrics {
            information_ratio: self.information_ratio(),
            annualized_sharpe_ratio: self.annualized_sharpe_ratio(),
            equity_sharpe: self.equity_sharpe(),
            beta: self.beta(),
            alpha: self.alpha(),
            r_squared: self.r_squared(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn daily(symbol: &str, offset: i64, closes: &[f64]) -> PriceSeries {
        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (origin + Duration::days(offset + i as i64), c))
            .collect();
        PriceSeries::from_closes(symbol, &points).unwrap()
    }

    /// An instrument whose every return is twice the benchmark's.
    fn levered_pair() -> (PriceSeries, PriceSeries) {
        let bench_returns = [0.01, -0.02, 0.015, 0.005, -0.01, 0.02];
        let (mut b, mut s) = (vec![100.0], vec![100.0]);
        for r in bench_returns {
            b.push(b[b.len() - 1] * (1.0 + r));
            s.push(s[s.len() - 1] * (1.0 + 2.0 * r));
        }
        (daily("S", 0, &s), daily("B", 0, &b))
    }

    #[test]
    fn levered_instrument_has_beta_two_and_perfect_fit() {
        let (series, bench) = levered_pair();
        let cmp = BenchmarkComparator::new(&series, &bench, 0.0).unwrap();
        assert_eq!(cmp.len(), 6);
        assert_relative_eq!(cmp.beta().unwrap_or(f64::NAN), 2.0, epsilon = 1e-9);
        assert_relative_eq!(cmp.alpha().unwrap_or(f64::NAN), 0.0, epsilon = 1e-9);
        assert_relative_eq!(cmp.r_squared().unwrap_or(f64::NAN), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn identical_series_have_undefined_information_ratio() {
        let (_, bench) = levered_pair();
        let cmp = BenchmarkComparator::new(&bench, &bench, 0.0).unwrap();
        // Every delta is exactly zero.
        assert!(cmp.information_ratio().is_na());
        assert!(cmp.annualized_sharpe_ratio().is_na());
    }

    #[test]
    fn alignment_is_an_inner_join() {
        let series = daily("S", 0, &[10.0, 11.0, 12.0, 13.0]);
        let bench = daily("B", 2, &[20.0, 21.0, 22.0]);
        let cmp = BenchmarkComparator::new(&series, &bench, 0.0).unwrap();
        // Days 2 and 3 overlap; day 2 is the benchmark's first bar and has no return.
        assert_eq!(cmp.len(), 1);
    }

    #[test]
    fn disjoint_series_are_rejected() {
        let series = daily("S", 0, &[10.0, 11.0]);
        let bench = daily("B", 10, &[20.0, 21.0]);
        assert!(matches!(
            BenchmarkComparator::new(&series, &bench, 0.0),
            Err(AnalyticsError::NoOverlap { .. })
        ));
    }

    #[test]
    fn equity_sharpe_subtracts_the_daily_risk_free_rate() {
        let (series, bench) = levered_pair();
        let without = BenchmarkComparator::new(&series, &bench, 0.0).unwrap();
        let with = BenchmarkComparator::new(&series, &bench, 0.252).unwrap();
        let delta = without.deltas(0.001);
        let expected = mean(&delta).unwrap_or(f64::NAN) / std_dev(&delta).unwrap_or(f64::NAN)
            * DAYS_IN_TRADING_YEAR.sqrt();
        assert_relative_eq!(with.equity_sharpe().unwrap_or(f64::NAN), expected, epsilon = 1e-9);
        assert!(with.equity_sharpe().unwrap_or(f64::NAN) < without.equity_sharpe().unwrap_or(f64::NAN));
    }
}
