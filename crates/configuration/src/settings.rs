use crate::error::ConfigError;
use core_types::TrueRangeMethod;
use serde::{Deserialize, Serialize};

/// The root configuration structure for the entire application.
///
/// Every section falls back to its `Default`, so an empty file (or no file at
/// all) yields the conventional technical-analysis parameterization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stats: StatsSettings,
    pub indicators: IndicatorSettings,
}

impl Config {
    /// Rejects parameter combinations that cannot produce a meaningful result.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stats.validate()?;
        self.indicators.validate()
    }
}

/// Inputs to the statistics report that are not derived from prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    /// Annual risk-free rate as a fraction (0.02 = 2%).
    pub risk_free_rate: f64,
    /// Market capitalization, carried verbatim into the report.
    pub market_cap: f64,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            market_cap: 1.0,
        }
    }
}

impl StatsSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.risk_free_rate.is_finite() || self.risk_free_rate <= -1.0 {
            return Err(ConfigError::ValidationError(format!(
                "stats.risk_free_rate must be a finite rate above -100%, got {}",
                self.risk_free_rate
            )));
        }
        if !self.market_cap.is_finite() {
            return Err(ConfigError::ValidationError(
                "stats.market_cap must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters for Bollinger Bands and the indicators derived from them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerParams {
    pub period: usize,
    /// Band half-width in (population) standard deviations.
    pub num_std: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChandelierParams {
    pub period: usize,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IchimokuParams {
    pub conversion_period: usize,
    pub base_period: usize,
    pub leading_period: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeltnerParams {
    /// EMA period of the center line.
    pub period: usize,
    pub atr_period: usize,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnvelopeParams {
    pub period: usize,
    /// Envelope offset as a fraction of the moving average (0.025 = 2.5%).
    pub percent: f64,
}

/// Parameters for the Parabolic SAR. Rising and falling phases accelerate independently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParabolicSarParams {
    pub step_rising: f64,
    pub step_falling: f64,
    pub max_accel_rising: f64,
    pub max_accel_falling: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ZigZagParams {
    /// Minimum move from the last pivot, in percent, for a bar to become a pivot.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeByPriceParams {
    pub period: usize,
    pub blocks: usize,
}

/// A fast/slow/signal triple shared by MACD, PPO and PVO.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FastSlowParams {
    pub fast: usize,
    pub slow: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CoppockParams {
    pub wma_period: usize,
    pub long_roc: usize,
    pub short_roc: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PmoParams {
    /// Smoothing applied to the one-bar rate of change.
    pub first_smoothing: usize,
    /// Smoothing applied to the scaled first pass.
    pub second_smoothing: usize,
    pub signal: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MassIndexParams {
    pub ema_period: usize,
    pub sum_period: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochasticParams {
    pub period: usize,
    pub smoothing: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TsiParams {
    pub long: usize,
    pub short: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UltimateParams {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

/// StockCharts Technical Rank windows and weights:
/// long EMA, long ROC, medium EMA, medium ROC, PPO-histogram slope, RSI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SctrParams {
    pub periods: [usize; 6],
    pub weights: [f64; 6],
}

/// Tunables for every indicator in the engine, defaulting to conventional values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    /// True-range definition used by ATR, ADX, Keltner Channels and Chandelier Exit.
    pub true_range: TrueRangeMethod,
    pub bollinger: BollingerParams,
    pub chandelier: ChandelierParams,
    pub ichimoku: IchimokuParams,
    pub keltner: KeltnerParams,
    pub envelopes: EnvelopeParams,
    pub parabolic_sar: ParabolicSarParams,
    pub zigzag: ZigZagParams,
    pub volume_by_price: VolumeByPriceParams,
    pub macd: MacdParams,
    pub ppo: MacdParams,
    pub pvo: MacdParams,
    pub chaikin_oscillator: FastSlowParams,
    pub coppock: CoppockParams,
    pub pmo: PmoParams,
    pub mass_index: MassIndexParams,
    pub stochastic: StochasticParams,
    pub tsi: TsiParams,
    pub ultimate: UltimateParams,
    pub sctr: SctrParams,
    pub price_channel_period: usize,
    pub aroon_period: usize,
    pub adx_period: usize,
    pub atr_period: usize,
    pub rsi_period: usize,
    pub cci_period: usize,
    pub chaikin_money_flow_period: usize,
    pub dpo_period: usize,
    pub ease_of_movement_period: usize,
    pub force_index_period: usize,
    pub kst_signal_period: usize,
    pub mfi_period: usize,
    pub nvi_signal_period: usize,
    pub roc_period: usize,
    pub stochastic_rsi_period: usize,
    pub trix_period: usize,
    pub ulcer_period: usize,
    pub volatility_period: usize,
    pub vortex_period: usize,
    pub williams_period: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            true_range: TrueRangeMethod::Legacy,
            bollinger: BollingerParams { period: 20, num_std: 2.0 },
            chandelier: ChandelierParams { period: 22, multiplier: 3.0 },
            ichimoku: IchimokuParams {
                conversion_period: 9,
                base_period: 26,
                leading_period: 52,
            },
            keltner: KeltnerParams {
                period: 20,
                atr_period: 10,
                multiplier: 2.0,
            },
            envelopes: EnvelopeParams { period: 20, percent: 0.025 },
            parabolic_sar: ParabolicSarParams {
                step_rising: 0.02,
                step_falling: 0.02,
                max_accel_rising: 0.2,
                max_accel_falling: 0.2,
            },
            zigzag: ZigZagParams { percent: 7.0 },
            volume_by_price: VolumeByPriceParams { period: 14, blocks: 12 },
            macd: MacdParams { fast: 12, slow: 26, signal: 9 },
            ppo: MacdParams { fast: 12, slow: 26, signal: 9 },
            pvo: MacdParams { fast: 12, slow: 26, signal: 9 },
            chaikin_oscillator: FastSlowParams { fast: 3, slow: 10 },
            coppock: CoppockParams {
                wma_period: 10,
                long_roc: 14,
                short_roc: 11,
            },
            pmo: PmoParams {
                first_smoothing: 35,
                second_smoothing: 20,
                signal: 10,
            },
            mass_index: MassIndexParams { ema_period: 9, sum_period: 25 },
            stochastic: StochasticParams { period: 20, smoothing: 3 },
            tsi: TsiParams { long: 25, short: 13 },
            ultimate: UltimateParams { short: 7, medium: 14, long: 28 },
            sctr: SctrParams {
                periods: [200, 125, 50, 20, 3, 14],
                weights: [0.30, 0.30, 0.15, 0.15, 0.05, 0.05],
            },
            price_channel_period: 20,
            aroon_period: 25,
            adx_period: 14,
            atr_period: 14,
            rsi_period: 14,
            cci_period: 20,
            chaikin_money_flow_period: 20,
            dpo_period: 20,
            ease_of_movement_period: 14,
            force_index_period: 13,
            kst_signal_period: 9,
            mfi_period: 14,
            nvi_signal_period: 255,
            roc_period: 20,
            stochastic_rsi_period: 20,
            trix_period: 15,
            ulcer_period: 14,
            volatility_period: 20,
            vortex_period: 14,
            williams_period: 14,
        }
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("bollinger.period", self.bollinger.period),
            ("chandelier.period", self.chandelier.period),
            ("ichimoku.conversion_period", self.ichimoku.conversion_period),
            ("ichimoku.base_period", self.ichimoku.base_period),
            ("ichimoku.leading_period", self.ichimoku.leading_period),
            ("keltner.period", self.keltner.period),
            ("keltner.atr_period", self.keltner.atr_period),
            ("envelopes.period", self.envelopes.period),
            ("volume_by_price.period", self.volume_by_price.period),
            ("volume_by_price.blocks", self.volume_by_price.blocks),
            ("macd.signal", self.macd.signal),
            ("ppo.signal", self.ppo.signal),
            ("pvo.signal", self.pvo.signal),
            ("coppock.wma_period", self.coppock.wma_period),
            ("coppock.long_roc", self.coppock.long_roc),
            ("coppock.short_roc", self.coppock.short_roc),
            ("pmo.first_smoothing", self.pmo.first_smoothing),
            ("pmo.second_smoothing", self.pmo.second_smoothing),
            ("pmo.signal", self.pmo.signal),
            ("mass_index.ema_period", self.mass_index.ema_period),
            ("mass_index.sum_period", self.mass_index.sum_period),
            ("stochastic.period", self.stochastic.period),
            ("stochastic.smoothing", self.stochastic.smoothing),
            ("tsi.long", self.tsi.long),
            ("tsi.short", self.tsi.short),
            ("ultimate.short", self.ultimate.short),
            ("ultimate.medium", self.ultimate.medium),
            ("ultimate.long", self.ultimate.long),
            ("price_channel_period", self.price_channel_period),
            ("aroon_period", self.aroon_period),
            ("adx_period", self.adx_period),
            ("atr_period", self.atr_period),
            ("rsi_period", self.rsi_period),
            ("cci_period", self.cci_period),
            ("chaikin_money_flow_period", self.chaikin_money_flow_period),
            ("dpo_period", self.dpo_period),
            ("ease_of_movement_period", self.ease_of_movement_period),
            ("force_index_period", self.force_index_period),
            ("kst_signal_period", self.kst_signal_period),
            ("mfi_period", self.mfi_period),
            ("nvi_signal_period", self.nvi_signal_period),
            ("roc_period", self.roc_period),
            ("stochastic_rsi_period", self.stochastic_rsi_period),
            ("trix_period", self.trix_period),
            ("ulcer_period", self.ulcer_period),
            ("volatility_period", self.volatility_period),
            ("vortex_period", self.vortex_period),
            ("williams_period", self.williams_period),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, period)| *period == 0) {
            return Err(ConfigError::ValidationError(format!(
                "indicators.{name} must be greater than zero"
            )));
        }
        if self.sctr.periods.contains(&0) {
            return Err(ConfigError::ValidationError(
                "indicators.sctr.periods must all be greater than zero".to_string(),
            ));
        }

        for (name, fast, slow) in [
            ("macd", self.macd.fast, self.macd.slow),
            ("ppo", self.ppo.fast, self.ppo.slow),
            ("pvo", self.pvo.fast, self.pvo.slow),
            ("chaikin_oscillator", self.chaikin_oscillator.fast, self.chaikin_oscillator.slow),
        ] {
            if fast == 0 || fast >= slow {
                return Err(ConfigError::ValidationError(format!(
                    "indicators.{name}: fast period ({fast}) must be positive and less than slow period ({slow})"
                )));
            }
        }

        let sar = &self.parabolic_sar;
        if sar.step_rising <= 0.0 || sar.step_falling <= 0.0 {
            return Err(ConfigError::ValidationError(
                "indicators.parabolic_sar steps must be greater than zero".to_string(),
            ));
        }
        if sar.max_accel_rising < sar.step_rising || sar.max_accel_falling < sar.step_falling {
            return Err(ConfigError::ValidationError(
                "indicators.parabolic_sar maximum acceleration must be at least the step".to_string(),
            ));
        }

        for (name, value) in [
            ("zigzag.percent", self.zigzag.percent),
            ("bollinger.num_std", self.bollinger.num_std),
            ("chandelier.multiplier", self.chandelier.multiplier),
            ("keltner.multiplier", self.keltner.multiplier),
            ("envelopes.percent", self.envelopes.percent),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "indicators.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
