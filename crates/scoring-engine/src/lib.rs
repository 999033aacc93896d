//! Band-table scoring rubric: five categories of 0-20 points each,
//! summed into a 100-point total and a recommendation tier.
//!
//! A category whose required inputs are not computable scores 0 and is
//! reported by name so the gap lands in `DataQuality` rather than
//! silently depressing the total.

pub mod bands;

use analysis_core::ScoreBreakdown;
use bands::{resolve_at_least, resolve_below, Band};
use metrics_engine::ComputedMetrics;

const GROWTH_BANDS: &[Band] = &[Band::new(15.0, 20), Band::new(10.0, 15), Band::new(5.0, 10)];
const MARGIN_BANDS: &[Band] = &[Band::new(10.0, 15), Band::new(5.0, 10)];
const PE_BANDS: &[Band] = &[Band::new(25.0, 15), Band::new(35.0, 10)];

/// Revenue growth: 5-point CAGR, falling back to the longest window
/// that computed. `None` when no revenue CAGR computed at all.
fn score_growth(metrics: &ComputedMetrics) -> Option<u8> {
    let cagr = metrics.scoring_revenue_cagr()?;
    Some(resolve_at_least(GROWTH_BANDS, cagr))
}

/// Latest net profit margin, with the top band gated on a non-declining
/// two-period trend.
fn score_profitability(metrics: &ComputedMetrics) -> Option<u8> {
    let margin = metrics.ratios.value("net_profit_margin")?;
    let declining = matches!(
        metrics.prev_net_profit_margin,
        Some(prev) if prev > margin
    );
    if margin >= 15.0 && !declining {
        return Some(20);
    }
    Some(resolve_at_least(MARGIN_BANDS, margin))
}

/// Leverage and liquidity jointly. The top two bands need both ratios;
/// the moderate-leverage band asks only that debt stays under 2x equity.
fn score_financial_health(metrics: &ComputedMetrics) -> Option<u8> {
    let de = metrics.ratios.value("debt_to_equity")?;
    let cr = metrics.ratios.value("current_ratio");
    if de < 0.5 && matches!(cr, Some(c) if c > 2.0) {
        return Some(20);
    }
    if de < 1.0 && matches!(cr, Some(c) if c > 1.5) {
        return Some(15);
    }
    if de < 2.0 {
        return Some(10);
    }
    Some(0)
}

/// Cash conversion, with the top band gated on free cash flow growing
/// period over period.
fn score_cash_flow(metrics: &ComputedMetrics) -> Option<u8> {
    let conversion = metrics.ratios.value("ocf_to_net_profit")?;
    let fcf_growing = matches!(
        (metrics.latest_fcf, metrics.prev_fcf),
        (Some(latest), Some(prev)) if latest > prev
    );
    if conversion > 1.0 && fcf_growing {
        return Some(20);
    }
    if conversion > 0.8 {
        return Some(15);
    }
    if conversion > 0.6 {
        return Some(10);
    }
    Some(0)
}

/// P/E against growth. An expensive multiple still floors at 5 points;
/// only a missing P/E zeroes the category.
fn score_valuation(metrics: &ComputedMetrics) -> Option<u8> {
    let pe = metrics.ratios.value("pe_ratio")?;
    let growth = metrics.scoring_revenue_cagr();
    if pe < 15.0 && matches!(growth, Some(g) if g >= 10.0) {
        return Some(20);
    }
    Some(resolve_below(PE_BANDS, pe, 5))
}

/// Score one company's computed metrics. Returns the breakdown and the
/// names of categories zeroed because their inputs were not computable.
pub fn score(metrics: &ComputedMetrics) -> (ScoreBreakdown, Vec<String>) {
    let mut zeroed = Vec::new();
    let mut resolve = |name: &str, scored: Option<u8>| match scored {
        Some(points) => points,
        None => {
            zeroed.push(name.to_string());
            0
        }
    };

    let growth = resolve("growth", score_growth(metrics));
    let profitability = resolve("profitability", score_profitability(metrics));
    let financial_health = resolve("financial_health", score_financial_health(metrics));
    let cash_flow_quality = resolve("cash_flow_quality", score_cash_flow(metrics));
    let valuation = resolve("valuation", score_valuation(metrics));

    let breakdown = ScoreBreakdown::new(
        growth,
        profitability,
        financial_health,
        cash_flow_quality,
        valuation,
    );
    tracing::debug!(
        total = breakdown.total,
        recommendation = breakdown.recommendation.as_str(),
        "Scored company"
    );
    (breakdown, zeroed)
}
