use analysis_core::{MetricSeries, Ratio, RatioSet};
use std::collections::BTreeMap;

/// Compound annual growth rate between two values `k` periods apart,
/// as a percentage. Not computable when either endpoint is non-positive
/// or the window spans fewer than one period. Volatile windows are not
/// clipped; interpreting them is the scoring layer's job.
pub fn cagr(start: f64, end: f64, periods: u32) -> Option<f64> {
    if start <= 0.0 || end <= 0.0 || periods < 1 {
        return None;
    }
    Some(((end / start).powf(1.0 / periods as f64) - 1.0) * 100.0)
}

/// CAGR over the trailing `n` data points of a series (all of them when
/// fewer exist). Endpoints are the first and last *present* values in
/// the window; the period count is their year distance.
pub fn cagr_last_n(series: &MetricSeries, n: usize) -> Option<f64> {
    let window = series.last_n(n);
    let mut present = window.iter().filter(|p| p.value.is_some());
    let first = present.next()?;
    let last = present.last().unwrap_or(first);
    let span = last.period.year() - first.period.year();
    if span < 1 {
        return None;
    }
    cagr(first.value?, last.value?, span as u32)
}

/// Simple period-over-period growth `(current - previous) / previous`,
/// not computable when the base is zero.
pub fn growth_rate(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous)
}

/// Mean of the last four quarter-over-quarter revenue growth rates, as
/// a percentage. Needs at least two present consecutive quarters.
pub fn quarterly_momentum(series: &MetricSeries) -> Option<f64> {
    let window = series.last_n(5);
    let mut rates = Vec::new();
    for pair in window.windows(2) {
        if let (Some(prev), Some(cur)) = (pair[0].value, pair[1].value) {
            if let Some(rate) = growth_rate(prev, cur) {
                rates.push(rate * 100.0);
            }
        }
    }
    if rates.is_empty() {
        return None;
    }
    Some(rates.iter().sum::<f64>() / rates.len() as f64)
}

fn record_cagr(
    ratios: &mut RatioSet,
    name: &str,
    series: Option<&MetricSeries>,
    points: usize,
) {
    let window = series.map(|s| s.last_n(points)).unwrap_or(&[]);
    let first = window.iter().find_map(|p| p.value.map(|v| (p.period, v)));
    let last = window.iter().rev().find_map(|p| p.value.map(|v| (p.period, v)));
    let value = series.and_then(|s| cagr_last_n(s, points));

    let mut inputs = BTreeMap::new();
    inputs.insert("start".to_string(), first.map(|(_, v)| v));
    inputs.insert("end".to_string(), last.map(|(_, v)| v));
    inputs.insert(
        "periods".to_string(),
        match (first, last) {
            (Some((f, _)), Some((l, _))) => Some((l.year() - f.year()) as f64),
            _ => None,
        },
    );
    ratios.insert(
        name,
        Ratio { value, formula: "(end / start)^(1 / periods) - 1".to_string(), inputs },
    );
}

/// Record every growth metric into the ratio set: revenue and profit
/// CAGR over 3/5/10-point windows, EPS growth, quarterly momentum.
pub fn record_growth_metrics(ratios: &mut RatioSet, series: &BTreeMap<String, MetricSeries>) {
    let revenue = series.get("revenue");
    let net_profit = series.get("net_profit");

    for (name, src, points) in [
        ("revenue_cagr_3y", revenue, 3),
        ("revenue_cagr_5y", revenue, 5),
        ("revenue_cagr_10y", revenue, 10),
        ("profit_cagr_3y", net_profit, 3),
        ("profit_cagr_5y", net_profit, 5),
        ("profit_cagr_10y", net_profit, 10),
        ("eps_growth_5y", series.get("eps"), 5),
    ] {
        record_cagr(ratios, name, src, points);
    }

    let momentum = series.get("quarterly_revenue").and_then(quarterly_momentum);
    let mut inputs = BTreeMap::new();
    inputs.insert(
        "quarters_present".to_string(),
        series
            .get("quarterly_revenue")
            .map(|s| s.present_count() as f64),
    );
    ratios.insert(
        "quarterly_growth_momentum",
        Ratio {
            value: momentum,
            formula: "mean of last 4 QoQ revenue growth rates".to_string(),
            inputs,
        },
    );
}
