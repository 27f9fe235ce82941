use analytics::{AnalyticsEngine, BenchmarkMetrics, DrawdownEpisode, StatsReport};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configuration::load_config;
use core_types::{Bar, PriceSeries};
use indicators::IndicatorSet;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod render;

/// The main entry point for the Meridian analysis tool.
fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    // Execute the appropriate command
    match cli.command {
        Commands::Stats(args) => handle_stats(args, AnalyticsEngine::new(config.stats)?),
        Commands::Indicators(args) => handle_indicators(args, IndicatorSet::new(config.indicators)?),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Technical indicators and performance statistics over OHLCV price history.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (defaults to ./meridian.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the performance statistics report for one or more instruments.
    Stats(StatsArgs),
    /// Compute every indicator for one instrument and write it as JSON.
    Indicators(IndicatorsArgs),
}

#[derive(Parser)]
struct StatsArgs {
    /// JSON files, each an array of bars. The file stem is used as the symbol.
    #[arg(long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// A benchmark price file to compare every input against.
    #[arg(long)]
    benchmark: Option<PathBuf>,
}

#[derive(Parser)]
struct IndicatorsArgs {
    /// A JSON file holding an array of bars.
    #[arg(long)]
    input: PathBuf,

    /// Where to write the indicator table (stdout when omitted).
    #[arg(long)]
    output: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Reads a JSON array of bars into a validated price series.
fn load_series(path: &Path) -> Result<PriceSeries> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let bars: Vec<Bar> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse bars from {}", path.display()))?;
    let symbol = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let series = PriceSeries::new(symbol, bars)
        .with_context(|| format!("Invalid price history in {}", path.display()))?;
    tracing::info!(symbol = %series.symbol(), bars = series.len(), "Loaded price series.");
    Ok(series)
}

fn handle_stats(args: StatsArgs, engine: AnalyticsEngine) -> Result<()> {
    let series = args
        .input
        .par_iter()
        .map(|path| load_series(path))
        .collect::<Result<Vec<_>>>()?;
    let reports: Vec<StatsReport> = engine.calculate_batch(&series);
    println!("{}", render::stats_table(&reports));

    for (s, report) in series.iter().zip(&reports) {
        let episodes: Vec<DrawdownEpisode> = engine.drawdown_episodes(s);
        println!("\nDrawdowns: {}", report.name);
        println!("{}", render::drawdown_table(&episodes));
        if !report.return_table.is_empty() {
            println!("\nMonthly returns: {}", report.name);
            println!("{}", render::return_table(report));
        }
    }

    if let Some(path) = args.benchmark {
        let benchmark = load_series(&path)?;
        let metrics = series
            .iter()
            .map(|s| Ok((s.symbol().to_string(), engine.compare(s, &benchmark)?)))
            .collect::<Result<Vec<(String, BenchmarkMetrics)>>>()?;
        println!("\nAgainst {}", benchmark.symbol());
        println!("{}", render::benchmark_table(&metrics));
    }
    Ok(())
}

fn handle_indicators(args: IndicatorsArgs, set: IndicatorSet) -> Result<()> {
    let series = load_series(&args.input)?;
    let table = set.compute(&series);
    match args.output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
            serde_json::to_writer(BufWriter::new(file), &table)?;
            tracing::info!(path = %path.display(), columns = table.columns.len(), "Wrote indicator table.");
        }
        None => println!("{}", serde_json::to_string(&table)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_bars_and_uses_file_stem_as_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ACME.json");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"[
                {{"timestamp": "2024-01-02T00:00:00Z", "open": 10.0, "high": 11.0, "low": 9.5, "close": 10.5, "volume": 1000}},
                {{"timestamp": "2024-01-03T00:00:00Z", "open": 10.5, "high": 12.0, "low": 10.0, "close": null, "volume": 800}}
            ]"#
        )
        .unwrap();

        let series = load_series(&path).unwrap();
        assert_eq!(series.symbol(), "ACME");
        assert_eq!(series.len(), 2);
        assert!(series.bars()[1].close.is_na());
    }

    #[test]
    fn rejects_out_of_order_bars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BAD.json");
        std::fs::write(
            &path,
            r#"[
                {"timestamp": "2024-01-03T00:00:00Z", "open": 1, "high": 1, "low": 1, "close": 1},
                {"timestamp": "2024-01-02T00:00:00Z", "open": 1, "high": 1, "low": 1, "close": 1}
            ]"#,
        )
        .unwrap();
        assert!(load_series(&path).is_err());
    }
}
