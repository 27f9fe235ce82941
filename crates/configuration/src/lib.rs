use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    BollingerParams, ChandelierParams, CoppockParams, EnvelopeParams, FastSlowParams,
    IchimokuParams, IndicatorSettings, KeltnerParams, MacdParams, MassIndexParams,
    ParabolicSarParams, PmoParams, SctrParams, StatsSettings, StochasticParams, TsiParams,
    UltimateParams, VolumeByPriceParams, ZigZagParams,
};

/// Loads the application configuration.
///
/// Reads `path` when given, otherwise an optional `meridian.toml` in the working
/// directory. `MERIDIAN__<SECTION>__<KEY>` environment variables override file
/// values (e.g. `MERIDIAN__STATS__RISK_FREE_RATE=0.02`). The result is validated
/// before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    builder = match path {
        Some(path) => builder.add_source(config::File::from(path)),
        None => builder.add_source(config::File::with_name("meridian").required(false)),
    };
    let builder = builder
        .add_source(
            config::Environment::with_prefix("MERIDIAN")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Loaded configuration.");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TrueRangeMethod;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn reads_overrides_from_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[stats]\nrisk_free_rate = 0.03\n\n[indicators]\nrsi_period = 21\ntrue_range = \"canonical\"\n\n[indicators.bollinger]\nperiod = 10\nnum_std = 1.5"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.stats.risk_free_rate, 0.03);
        assert_eq!(config.stats.market_cap, 1.0);
        assert_eq!(config.indicators.rsi_period, 21);
        assert_eq!(config.indicators.bollinger.period, 10);
        assert_eq!(config.indicators.true_range, TrueRangeMethod::Canonical);
        // Untouched sections keep their defaults.
        assert_eq!(config.indicators.macd.slow, 26);
    }

    #[test]
    fn rejects_zero_window() {
        let mut config = Config::default();
        config.indicators.aroon_period = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("aroon_period"));
    }

    #[test]
    fn rejects_inverted_macd_windows() {
        let mut config = Config::default();
        config.indicators.macd.fast = 30;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_sar_max_below_step() {
        let mut config = Config::default();
        config.indicators.parabolic_sar.max_accel_falling = 0.01;
        assert!(config.validate().is_err());
    }
}
