//! # Meridian Analytics Engine
//!
//! Performance statistics over a single price series: drawdown segmentation,
//! calendar resampling, the tiered daily/monthly/yearly `StatsReport`, and
//! benchmark-relative risk measures.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** no I/O. Depends on `core-types`, `configuration` and the
//!   series plumbing of `indicators`.
//! - **Stateless Calculation:** the `AnalyticsEngine` holds only its settings.
//!   A report is rebuilt from the series on every call; short histories
//!   degrade to undefined metrics instead of errors.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the entry point (`calculate`, `calculate_batch`, `compare`).
//! - `StatsReport`: the fixed-shape report, with its monthly `ReturnTable`.
//! - `BenchmarkComparator`: aligned return comparison against a benchmark.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod benchmark;
pub mod drawdown;
pub mod engine;
pub mod error;
pub mod moments;
pub mod performance;
pub mod report;
pub mod resample;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use benchmark::{BenchmarkComparator, BenchmarkMetrics};
pub use drawdown::{DrawdownEpisode, drawdown, drawdown_episodes};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{Extremum, ReturnTable, StatsReport, YEAR_TO_DATE_SLOT};
pub use resample::{Resampled, resample};
