//! Growth and ratio computation over extracted metric series.
//!
//! Every value in here is `Option<f64>`: `None` means "not computable"
//! (missing operand, zero denominator, non-positive CAGR base) and is
//! never collapsed to zero, NaN, or infinity.

pub mod growth;
pub mod ratios;

pub use growth::*;
pub use ratios::*;

use analysis_core::{CompanyProfile, EngineConfig, MetricSeries, RatioSet};
use std::collections::BTreeMap;

/// Everything the metrics engine derives from one workbook's series.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedMetrics {
    pub ratios: RatioSet,
    /// Net profit margin one period before the latest (trend input for
    /// the profitability score).
    pub prev_net_profit_margin: Option<f64>,
    /// Latest and previous free cash flow (trend input for the cash
    /// flow quality score).
    pub latest_fcf: Option<f64>,
    pub prev_fcf: Option<f64>,
}

impl ComputedMetrics {
    /// The revenue CAGR the scoring rubric keys on: the 5-point window,
    /// falling back to the longest other window that computed.
    pub fn scoring_revenue_cagr(&self) -> Option<f64> {
        self.ratios
            .value("revenue_cagr_5y")
            .or_else(|| self.ratios.value("revenue_cagr_10y"))
            .or_else(|| self.ratios.value("revenue_cagr_3y"))
    }
}

/// Compute all growth metrics and ratios for one workbook.
pub fn compute_metrics(
    series: &BTreeMap<String, MetricSeries>,
    profile: &CompanyProfile,
    config: &EngineConfig,
) -> ComputedMetrics {
    let mut ratios = RatioSet::default();
    growth::record_growth_metrics(&mut ratios, series);
    ratios::record_ratios(&mut ratios, series, profile, config);

    let prev_net_profit_margin = ratios::previous_net_profit_margin(series);
    let fcf = series.get("free_cash_flow");
    let latest_fcf = fcf.and_then(|s| s.latest_value());
    let prev_fcf = fcf.and_then(|s| s.previous_value());

    tracing::debug!(
        "Computed {} metrics ({} not computable)",
        ratios.ratios.len(),
        ratios.not_computable_names().len()
    );

    ComputedMetrics { ratios, prev_net_profit_margin, latest_fcf, prev_fcf }
}
