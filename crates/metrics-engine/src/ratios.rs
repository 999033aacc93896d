use crate::growth::cagr_last_n;
use analysis_core::{CompanyProfile, EngineConfig, MetricSeries, Ratio, RatioSet};
use std::collections::BTreeMap;

/// `a / b`, not computable when either operand is missing or the
/// denominator is zero.
fn divide(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

fn percent(v: Option<f64>) -> Option<f64> {
    v.map(|x| x * 100.0)
}

fn record(
    ratios: &mut RatioSet,
    name: &str,
    value: Option<f64>,
    formula: &str,
    inputs: &[(&str, Option<f64>)],
) {
    let inputs = inputs
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect::<BTreeMap<_, _>>();
    ratios.insert(name, Ratio { value, formula: formula.to_string(), inputs });
}

fn latest(series: &BTreeMap<String, MetricSeries>, name: &str) -> Option<f64> {
    series.get(name).and_then(|s| s.latest_value())
}

/// Net profit margin one period before the latest, the trend input for
/// the profitability score. Requires both operands present in that
/// period.
pub fn previous_net_profit_margin(series: &BTreeMap<String, MetricSeries>) -> Option<f64> {
    let np = series.get("net_profit")?.previous_value();
    let revenue = series.get("revenue")?.previous_value();
    percent(divide(np, revenue))
}

/// Record every point-in-time ratio from the latest period of each
/// series, plus the market-data valuation ratios.
pub fn record_ratios(
    ratios: &mut RatioSet,
    series: &BTreeMap<String, MetricSeries>,
    profile: &CompanyProfile,
    config: &EngineConfig,
) {
    let revenue = latest(series, "revenue");
    let total_assets = latest(series, "total_assets");
    let operating_profit = latest(series, "operating_profit");
    let net_profit = latest(series, "net_profit");
    let eps = latest(series, "eps");
    let depreciation = latest(series, "depreciation");
    let interest_expense = latest(series, "interest_expense");
    let equity = latest(series, "total_equity");
    let debt = latest(series, "total_debt");
    let current_assets = latest(series, "current_assets");
    let current_liabilities = latest(series, "current_liabilities");
    let inventory = latest(series, "inventory");
    let cash = latest(series, "cash");
    let ocf = latest(series, "operating_cash_flow");
    let fcf = latest(series, "free_cash_flow");

    // EBITDA from reported lines, never approximated from net profit.
    let ebitda = match (operating_profit, depreciation) {
        (Some(op), Some(dep)) => Some(op + dep),
        _ => None,
    };
    let capital_employed = match (equity, debt) {
        (Some(e), Some(d)) => Some(e + d),
        _ => None,
    };

    record(
        ratios,
        "operating_margin",
        percent(divide(operating_profit, revenue)),
        "operating_profit / revenue",
        &[("operating_profit", operating_profit), ("revenue", revenue)],
    );
    record(
        ratios,
        "net_profit_margin",
        percent(divide(net_profit, revenue)),
        "net_profit / revenue",
        &[("net_profit", net_profit), ("revenue", revenue)],
    );
    record(
        ratios,
        "roe",
        percent(divide(net_profit, equity)),
        "net_profit / total_equity",
        &[("net_profit", net_profit), ("total_equity", equity)],
    );
    record(
        ratios,
        "roce",
        percent(divide(operating_profit, capital_employed)),
        "operating_profit / (total_equity + total_debt)",
        &[
            ("operating_profit", operating_profit),
            ("total_equity", equity),
            ("total_debt", debt),
        ],
    );
    record(
        ratios,
        "debt_to_equity",
        divide(debt, equity),
        "total_debt / total_equity",
        &[("total_debt", debt), ("total_equity", equity)],
    );
    record(
        ratios,
        "interest_coverage",
        divide(operating_profit, interest_expense),
        "operating_profit / interest_expense",
        &[
            ("operating_profit", operating_profit),
            ("interest_expense", interest_expense),
        ],
    );
    record(
        ratios,
        "debt_to_ebitda",
        divide(debt, ebitda),
        "total_debt / (operating_profit + depreciation)",
        &[("total_debt", debt), ("ebitda", ebitda)],
    );
    record(
        ratios,
        "current_ratio",
        divide(current_assets, current_liabilities),
        "current_assets / current_liabilities",
        &[
            ("current_assets", current_assets),
            ("current_liabilities", current_liabilities),
        ],
    );
    let quick_assets = match (current_assets, inventory) {
        (Some(ca), Some(inv)) => Some(ca - inv),
        _ => None,
    };
    record(
        ratios,
        "quick_ratio",
        divide(quick_assets, current_liabilities),
        "(current_assets - inventory) / current_liabilities",
        &[
            ("current_assets", current_assets),
            ("inventory", inventory),
            ("current_liabilities", current_liabilities),
        ],
    );

    record(
        ratios,
        "asset_turnover",
        divide(revenue, total_assets),
        "revenue / total_assets",
        &[("revenue", revenue), ("total_assets", total_assets)],
    );
    let working_capital = match (current_assets, current_liabilities) {
        (Some(ca), Some(cl)) => Some(ca - cl),
        _ => None,
    };
    record(
        ratios,
        "working_capital_turnover",
        divide(revenue, working_capital),
        "revenue / (current_assets - current_liabilities)",
        &[
            ("revenue", revenue),
            ("current_assets", current_assets),
            ("current_liabilities", current_liabilities),
        ],
    );

    // OCF conversion only means anything against a positive profit.
    let ocf_conversion = match net_profit {
        Some(np) if np > 0.0 => divide(ocf, Some(np)),
        _ => None,
    };
    record(
        ratios,
        "ocf_to_net_profit",
        ocf_conversion,
        "operating_cash_flow / net_profit",
        &[("operating_cash_flow", ocf), ("net_profit", net_profit)],
    );
    record(
        ratios,
        "free_cash_flow",
        fcf,
        "operating_cash_flow - |capex|",
        &[("free_cash_flow", fcf)],
    );
    record(
        ratios,
        "fcf_to_revenue",
        percent(divide(fcf, revenue)),
        "free_cash_flow / revenue",
        &[("free_cash_flow", fcf), ("revenue", revenue)],
    );

    record_valuation_ratios(
        ratios, series, profile, config, net_profit, eps, equity, debt, cash, ebitda,
    );
}

#[allow(clippy::too_many_arguments)]
fn record_valuation_ratios(
    ratios: &mut RatioSet,
    series: &BTreeMap<String, MetricSeries>,
    profile: &CompanyProfile,
    config: &EngineConfig,
    net_profit: Option<f64>,
    eps: Option<f64>,
    equity: Option<f64>,
    debt: Option<f64>,
    cash: Option<f64>,
    ebitda: Option<f64>,
) {
    let price = profile.current_price;
    let market_cap = profile.market_cap_or_derived();

    // Per-share P/E when EPS is positive, otherwise whole-company P/E.
    let pe = match (price, eps) {
        (Some(p), Some(e)) if e > 0.0 => Some(p / e),
        _ => match (market_cap, net_profit) {
            (Some(mc), Some(np)) if np > 0.0 => Some(mc / np),
            _ => None,
        },
    };
    record(
        ratios,
        "pe_ratio",
        pe,
        "price / eps, or market_cap / net_profit",
        &[
            ("price", price),
            ("eps", eps),
            ("market_cap", market_cap),
            ("net_profit", net_profit),
        ],
    );
    record(
        ratios,
        "pb_ratio",
        divide(market_cap, equity),
        "market_cap / total_equity",
        &[("market_cap", market_cap), ("total_equity", equity)],
    );

    let enterprise_value = match (market_cap, debt, cash) {
        (Some(mc), Some(d), Some(c)) => Some(mc + d - c),
        _ => None,
    };
    record(
        ratios,
        "ev_ebitda",
        divide(enterprise_value, ebitda),
        "(market_cap + total_debt - cash) / ebitda",
        &[
            ("market_cap", market_cap),
            ("total_debt", debt),
            ("cash", cash),
            ("ebitda", ebitda),
        ],
    );

    let peg_growth = series
        .get("net_profit")
        .and_then(|s| cagr_last_n(s, config.peg_growth_points));
    let peg = match (pe, peg_growth) {
        (Some(pe), Some(g)) if g > 0.0 => Some(pe / g),
        _ => None,
    };
    record(
        ratios,
        "peg_ratio",
        peg,
        "pe_ratio / profit_cagr",
        &[("pe_ratio", pe), ("profit_cagr", peg_growth)],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{PeriodLabel, SeriesPoint};

    fn series(name: &str, points: &[(i32, f64)]) -> MetricSeries {
        MetricSeries::new(
            name,
            points
                .iter()
                .map(|(y, v)| SeriesPoint { period: PeriodLabel::Year(*y), value: Some(*v) })
                .collect(),
        )
    }

    fn fixture() -> BTreeMap<String, MetricSeries> {
        let mut map = BTreeMap::new();
        for (name, points) in [
            ("revenue", vec![(2024, 220.06), (2025, 407.78)]),
            ("operating_profit", vec![(2024, 18.0), (2025, 33.0)]),
            ("net_profit", vec![(2023, 8.0), (2024, 11.15), (2025, 19.97)]),
            ("eps", vec![(2024, 5.5), (2025, 9.8)]),
            ("depreciation", vec![(2024, 4.0), (2025, 6.0)]),
            ("interest_expense", vec![(2024, 1.0), (2025, 1.5)]),
            ("total_equity", vec![(2024, 60.0), (2025, 80.0)]),
            ("total_debt", vec![(2024, 30.0), (2025, 24.0)]),
            ("current_assets", vec![(2025, 90.0)]),
            ("current_liabilities", vec![(2025, 45.0)]),
            ("inventory", vec![(2025, 18.0)]),
            ("total_assets", vec![(2024, 150.0), (2025, 200.0)]),
            ("cash", vec![(2025, 12.0)]),
            ("operating_cash_flow", vec![(2024, 14.0), (2025, 22.0)]),
            ("free_cash_flow", vec![(2024, 9.0), (2025, 15.0)]),
        ] {
            map.insert(name.to_string(), series(name, &points));
        }
        map
    }

    fn compute(series: &BTreeMap<String, MetricSeries>, profile: &CompanyProfile) -> RatioSet {
        let mut ratios = RatioSet::default();
        record_ratios(&mut ratios, series, profile, &EngineConfig::default());
        ratios
    }

    #[test]
    fn test_margins_from_latest_period() {
        let ratios = compute(&fixture(), &CompanyProfile::default());
        let npm = ratios.value("net_profit_margin").unwrap();
        assert!((npm - 4.897).abs() < 0.01, "got {}", npm);
        let om = ratios.value("operating_margin").unwrap();
        assert!((om - 8.093).abs() < 0.01, "got {}", om);
    }

    #[test]
    fn test_returns_and_leverage() {
        let ratios = compute(&fixture(), &CompanyProfile::default());
        let roe = ratios.value("roe").unwrap();
        assert!((roe - 24.9625).abs() < 1e-4);
        // ROCE uses equity + debt as capital employed
        let roce = ratios.value("roce").unwrap();
        assert!((roce - 33.0 / 104.0 * 100.0).abs() < 1e-9);
        let de = ratios.value("debt_to_equity").unwrap();
        assert!((de - 0.3).abs() < 1e-9);
        // EBITDA = operating profit + depreciation
        let dte = ratios.value("debt_to_ebitda").unwrap();
        assert!((dte - 24.0 / 39.0).abs() < 1e-9);
        let ic = ratios.value("interest_coverage").unwrap();
        assert!((ic - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_liquidity() {
        let ratios = compute(&fixture(), &CompanyProfile::default());
        assert_eq!(ratios.value("current_ratio"), Some(2.0));
        assert_eq!(ratios.value("quick_ratio"), Some(1.6));
    }

    #[test]
    fn test_efficiency_turnover() {
        let ratios = compute(&fixture(), &CompanyProfile::default());
        let at = ratios.value("asset_turnover").unwrap();
        assert!((at - 407.78 / 200.0).abs() < 1e-9);
        let wct = ratios.value("working_capital_turnover").unwrap();
        assert!((wct - 407.78 / 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_turnover_needs_nonzero_working_capital() {
        let mut map = fixture();
        map.insert(
            "current_liabilities".to_string(),
            series("current_liabilities", &[(2025, 90.0)]),
        );
        let ratios = compute(&map, &CompanyProfile::default());
        assert_eq!(ratios.value("working_capital_turnover"), None);

        map.remove("total_assets");
        let ratios = compute(&map, &CompanyProfile::default());
        assert_eq!(ratios.value("asset_turnover"), None);
    }

    #[test]
    fn test_cash_flow_quality() {
        let ratios = compute(&fixture(), &CompanyProfile::default());
        let conv = ratios.value("ocf_to_net_profit").unwrap();
        assert!((conv - 22.0 / 19.97).abs() < 1e-9);
        assert_eq!(ratios.value("free_cash_flow"), Some(15.0));
    }

    #[test]
    fn test_ocf_conversion_needs_positive_profit() {
        let mut map = fixture();
        map.insert("net_profit".to_string(), series("net_profit", &[(2025, -4.0)]));
        let ratios = compute(&map, &CompanyProfile::default());
        assert_eq!(ratios.value("ocf_to_net_profit"), None);
    }

    #[test]
    fn test_zero_denominator_not_computable() {
        let mut map = fixture();
        map.insert("total_equity".to_string(), series("total_equity", &[(2025, 0.0)]));
        let ratios = compute(&map, &CompanyProfile::default());
        assert_eq!(ratios.value("roe"), None);
        assert_eq!(ratios.value("debt_to_equity"), None);
        // Audit trail survives the failure
        let de = ratios.get("debt_to_equity").unwrap();
        assert_eq!(de.inputs.get("total_equity").copied().flatten(), Some(0.0));
    }

    #[test]
    fn test_pe_prefers_per_share_form() {
        let profile = CompanyProfile {
            current_price: Some(980.0),
            market_cap: Some(5000.0),
            ..Default::default()
        };
        let ratios = compute(&fixture(), &profile);
        assert_eq!(ratios.value("pe_ratio"), Some(980.0 / 9.8));
    }

    #[test]
    fn test_pe_falls_back_to_market_cap() {
        let mut map = fixture();
        map.remove("eps");
        let profile = CompanyProfile { market_cap: Some(1997.0), ..Default::default() };
        let ratios = compute(&map, &profile);
        assert_eq!(ratios.value("pe_ratio"), Some(1997.0 / 19.97));
    }

    #[test]
    fn test_pe_not_computable_without_market_data() {
        let ratios = compute(&fixture(), &CompanyProfile::default());
        assert_eq!(ratios.value("pe_ratio"), None);
        assert_eq!(ratios.value("pb_ratio"), None);
        assert_eq!(ratios.value("ev_ebitda"), None);
    }

    #[test]
    fn test_ev_ebitda() {
        let profile = CompanyProfile { market_cap: Some(1000.0), ..Default::default() };
        let ratios = compute(&fixture(), &profile);
        // EV = 1000 + 24 - 12, EBITDA = 39
        let ev = ratios.value("ev_ebitda").unwrap();
        assert!((ev - 1012.0 / 39.0).abs() < 1e-9);
    }

    #[test]
    fn test_peg_uses_three_point_profit_cagr() {
        let profile = CompanyProfile {
            current_price: Some(980.0),
            ..Default::default()
        };
        let ratios = compute(&fixture(), &profile);
        // Profit 8.0 -> 19.97 over 2 years: ~58.0% CAGR; P/E ~ 100
        let peg = ratios.value("peg_ratio").unwrap();
        let growth = ((19.97f64 / 8.0).powf(0.5) - 1.0) * 100.0;
        assert!((peg - (980.0 / 9.8) / growth).abs() < 1e-9);
    }

    #[test]
    fn test_peg_needs_positive_growth() {
        let mut map = fixture();
        map.insert(
            "net_profit".to_string(),
            series("net_profit", &[(2023, 30.0), (2024, 25.0), (2025, 19.97)]),
        );
        let profile = CompanyProfile { current_price: Some(980.0), ..Default::default() };
        let ratios = compute(&map, &profile);
        assert_eq!(ratios.value("peg_ratio"), None);
    }

    #[test]
    fn test_previous_net_profit_margin() {
        let prev = previous_net_profit_margin(&fixture()).unwrap();
        assert!((prev - 11.15 / 220.06 * 100.0).abs() < 1e-9);
        assert_eq!(previous_net_profit_margin(&BTreeMap::new()), None);
    }
}
