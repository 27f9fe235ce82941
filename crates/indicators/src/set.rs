use chrono::{DateTime, Utc};
use configuration::IndicatorSettings;
use core_types::{PriceSeries, Series};
use rayon::prelude::*;
use serde::Serialize;

use crate::aroon::aroon;
use crate::directional::{adx, atr};
use crate::error::IndicatorError;
use crate::oscillators::*;
use crate::overlays::*;
use crate::rolling::pct_change;
use crate::rsi::rsi;
use crate::sar::parabolic_sar;
use crate::transforms::*;
use crate::volume::*;
use crate::zigzag::zigzag;

/// One named indicator output aligned with the input bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Series,
}

/// Every indicator for one instrument, in a fixed column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorTable {
    pub symbol: String,
    pub timestamps: Vec<DateTime<Utc>>,
    pub columns: Vec<Column>,
}

impl IndicatorTable {
    pub fn column(&self, name: &str) -> Option<&[core_types::Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    fn push(&mut self, name: impl Into<String>, values: Series) {
        self.columns.push(Column {
            name: name.into(),
            values,
        });
    }
}

/// Computes the full indicator catalogue with one validated parameter set.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    settings: IndicatorSettings,
}

impl IndicatorSet {
    pub fn new(settings: IndicatorSettings) -> Result<Self, IndicatorError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    #[tracing::instrument(skip_all, fields(symbol = %series.symbol(), bars = series.len()))]
    pub fn compute(&self, series: &PriceSeries) -> IndicatorTable {
        let s = &self.settings;
        let tr = s.true_range;
        let close = series.close();
        let volume = series.volume();

        let mut table = IndicatorTable {
            symbol: series.symbol().to_string(),
            timestamps: series.timestamps(),
            columns: Vec::new(),
        };

        // Primitive transforms
        table.push("return", pct_change(&close, 1));
        table.push("money_flow", money_flow(series));
        table.push("money_flow_volume", money_flow_volume(series));
        table.push("typical_price", typical_price(series));
        table.push("close_to_open_range", close_to_open_range(series));
        let quadrants = quadrant_range(series);
        for (i, level) in [quadrants.l1, quadrants.l2, quadrants.l3, quadrants.l4, quadrants.l5]
            .into_iter()
            .enumerate()
        {
            table.push(format!("quadrant_range_l{}", i + 1), level);
        }
        table.push("true_range", true_range(series, tr));
        table.push("high_low_spread", high_low_spread(series));
        table.push("roc", rate_of_change(&close, s.roc_period));

        // Overlays
        let bands = bollinger_bands(&close, &s.bollinger);
        table.push("bandwidth", bandwidth(&bands));
        table.push("percent_b", percent_b(&close, &bands));
        table.push("bollinger_upper", bands.upper);
        table.push("bollinger_middle", bands.middle);
        table.push("bollinger_lower", bands.lower);

        let chandelier = chandelier_exit(series, &s.chandelier, tr);
        table.push("chandelier_long", chandelier.long);
        table.push("chandelier_short", chandelier.short);

        let cloud = ichimoku(series, &s.ichimoku);
        table.push("ichimoku_conversion", cloud.conversion);
        table.push("ichimoku_base", cloud.base);
        table.push("ichimoku_leading_a", cloud.leading_a);
        table.push("ichimoku_leading_b", cloud.leading_b);
        table.push("ichimoku_lagging", cloud.lagging);

        let keltner = keltner_channels(series, &s.keltner, tr);
        table.push("keltner_upper", keltner.upper);
        table.push("keltner_middle", keltner.middle);
        table.push("keltner_lower", keltner.lower);

        let envelopes = moving_average_envelopes(&close, &s.envelopes);
        table.push("envelope_upper", envelopes.upper);
        table.push("envelope_middle", envelopes.middle);
        table.push("envelope_lower", envelopes.lower);

        let sar = parabolic_sar(series, &s.parabolic_sar);
        table.push("parabolic_sar_rising", sar.rising);
        table.push("parabolic_sar_falling", sar.falling);

        let pivots = pivot_points(series);
        table.push("pivot_point", pivots.pivot);
        table.push("pivot_s1", pivots.s1);
        table.push("pivot_s2", pivots.s2);
        table.push("pivot_r1", pivots.r1);
        table.push("pivot_r2", pivots.r2);

        let fib = fibonacci_pivot_points(series);
        table.push("fibonacci_pivot_point", fib.pivot);
        table.push("fibonacci_s1", fib.s1);
        table.push("fibonacci_s2", fib.s2);
        table.push("fibonacci_s3", fib.s3);
        table.push("fibonacci_r1", fib.r1);
        table.push("fibonacci_r2", fib.r2);
        table.push("fibonacci_r3", fib.r3);

        let demark = demark_pivot_points(series);
        table.push("demark_pivot_point", demark.pivot);
        table.push("demark_s1", demark.s1);
        table.push("demark_r1", demark.r1);

        let channel = price_channel(series, s.price_channel_period);
        table.push("price_channel_upper", channel.upper);
        table.push("price_channel_lower", channel.lower);
        table.push("price_channel_center", channel.center);

        for (i, level) in volume_by_price(series, &s.volume_by_price).levels.into_iter().enumerate() {
            table.push(format!("volume_by_price_{}", i + 1), level);
        }
        table.push("vwap", vwap(series));
        table.push("zigzag", zigzag(&close, s.zigzag.percent).line);
        table.push("gaps", gaps(series));

        // Indicators
        table.push("adl", accumulation_distribution_line(series));
        let aroon = aroon(series, s.aroon_period);
        table.push("aroon_up", aroon.up);
        table.push("aroon_down", aroon.down);
        table.push("aroon_oscillator", aroon.oscillator);
        table.push("adx", adx(series, s.adx_period, tr).adx);
        table.push("atr", atr(series, s.atr_period, tr));
        table.push("cci", cci(series, s.cci_period));
        table.push("coppock_curve", coppock_curve(&close, &s.coppock));
        table.push("chaikin_money_flow", chaikin_money_flow(series, s.chaikin_money_flow_period));
        table.push("chaikin_oscillator", chaikin_oscillator(series, &s.chaikin_oscillator));

        let pmo = price_momentum_oscillator(&close, &s.pmo);
        table.push("pmo", pmo.pmo);
        table.push("pmo_signal", pmo.signal);
        table.push("dpo", detrended_price_oscillator(&close, s.dpo_period));
        table.push("ease_of_movement", ease_of_movement(series, s.ease_of_movement_period));
        table.push("force_index", force_index(series, s.force_index_period));

        let kst = know_sure_thing(&close, s.kst_signal_period);
        table.push("kst", kst.kst);
        table.push("kst_signal", kst.signal);
        table.push("mass_index", mass_index(series, &s.mass_index));

        for (prefix, line) in [
            ("macd", macd(&close, &s.macd)),
            ("ppo", ppo(&close, &s.ppo)),
            ("pvo", pvo(&volume, &s.pvo)),
        ] {
            table.push(prefix, line.line);
            table.push(format!("{prefix}_signal"), line.signal);
            table.push(format!("{prefix}_histogram"), line.histogram);
        }

        table.push("money_flow_index", money_flow_index(series, s.mfi_period));
        let nvi = negative_volume_index(series, s.nvi_signal_period);
        table.push("nvi", nvi.nvi);
        table.push("nvi_signal", nvi.signal);
        table.push("obv", on_balance_volume(series));
        table.push("rsi", rsi(&close, s.rsi_period));
        table.push("sctr", stockcharts_technical_rank(&close, &s.sctr, &s.ppo));
        table.push("volatility", volatility(&close, s.volatility_period));

        let stoch = stochastic(series, &s.stochastic);
        table.push("stochastic_k", stoch.k);
        table.push("stochastic_d", stoch.d);
        table.push("stochastic_rsi", stochastic_rsi(&close, s.stochastic_rsi_period));
        table.push("trix", trix(&close, s.trix_period));
        table.push("tsi", tsi(&close, &s.tsi));
        table.push("ulcer_index", ulcer_index(&close, s.ulcer_period));
        table.push("ultimate_oscillator", ultimate_oscillator(series, &s.ultimate));

        let vortex = vortex(series, s.vortex_period);
        table.push("vortex_plus", vortex.plus);
        table.push("vortex_minus", vortex.minus);
        table.push("williams_r", williams_r(series, s.williams_period));

        tracing::debug!(columns = table.columns.len(), "Computed indicator table.");
        table
    }

    /// Computes tables for several instruments in parallel.
    pub fn compute_batch(&self, series: &[PriceSeries]) -> Vec<IndicatorTable> {
        series.par_iter().map(|s| self.compute(s)).collect()
    }
}
