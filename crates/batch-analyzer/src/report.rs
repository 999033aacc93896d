//! Markdown and JSON rendering of a ranked batch of analysis results.

use analysis_core::AnalysisResult;
use std::fmt::Write;

fn fmt_ratio(r: &AnalysisResult, name: &str) -> String {
    match r.ratios.value(name) {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

fn company_label(r: &AnalysisResult) -> &str {
    r.profile.name.as_deref().unwrap_or("(unnamed)")
}

/// Consolidated markdown report: ranking table first, then one detail
/// section per company in rank order.
pub fn render_markdown(ranked: &[&AnalysisResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Investment Analysis Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Ranking");
    let _ = writeln!(out);
    let _ = writeln!(out, "| # | Company | Score | Recommendation | D/E | P/E |");
    let _ = writeln!(out, "|---|---------|-------|----------------|-----|-----|");
    for (i, r) in ranked.iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {}/100 | {} | {} | {} |",
            i + 1,
            company_label(r),
            r.score.total,
            r.score.recommendation.as_str(),
            fmt_ratio(r, "debt_to_equity"),
            fmt_ratio(r, "pe_ratio"),
        );
    }

    for r in ranked {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", company_label(r));
        let _ = writeln!(out);
        let _ = writeln!(out, "- Growth: {}/20", r.score.growth);
        let _ = writeln!(out, "- Profitability: {}/20", r.score.profitability);
        let _ = writeln!(out, "- Financial Health: {}/20", r.score.financial_health);
        let _ = writeln!(out, "- Cash Flow Quality: {}/20", r.score.cash_flow_quality);
        let _ = writeln!(out, "- Valuation: {}/20", r.score.valuation);
        let _ = writeln!(
            out,
            "- **Total: {}/100 ({})**",
            r.score.total,
            r.score.recommendation.as_str()
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "### Key ratios");
        let _ = writeln!(out);
        for name in [
            "revenue_cagr_5y",
            "profit_cagr_5y",
            "net_profit_margin",
            "roe",
            "debt_to_equity",
            "current_ratio",
            "ocf_to_net_profit",
            "pe_ratio",
            "peg_ratio",
        ] {
            let _ = writeln!(out, "- {}: {}", name, fmt_ratio(r, name));
        }

        let dq = &r.data_quality;
        let _ = writeln!(out);
        let _ = writeln!(out, "### Data quality: {:?}", dq.grade);
        if !dq.absent_sheets.is_empty() {
            let names: Vec<&str> = dq.absent_sheets.iter().map(|k| k.display_name()).collect();
            let _ = writeln!(out, "- Absent sheets: {}", names.join(", "));
        }
        if !dq.missing_metrics.is_empty() {
            let _ = writeln!(out, "- Missing metrics: {}", dq.missing_metrics.join(", "));
        }
        if !dq.not_computable_ratios.is_empty() {
            let _ = writeln!(
                out,
                "- Not computable: {}",
                dq.not_computable_ratios.join(", ")
            );
        }
        if !dq.zeroed_categories.is_empty() {
            let _ = writeln!(out, "- Zeroed categories: {}", dq.zeroed_categories.join(", "));
        }
    }
    out
}

/// The same ranking as a JSON array, full results included.
pub fn render_json(ranked: &[&AnalysisResult]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(ranked)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{
        CompanyProfile, DataQuality, DataQualityGrade, RatioSet, ScoreBreakdown, SheetKind,
    };
    use std::collections::BTreeMap;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            profile: CompanyProfile { name: Some("ACME LTD".into()), ..Default::default() },
            series: BTreeMap::new(),
            ratios: RatioSet::default(),
            score: ScoreBreakdown::new(20, 10, 15, 0, 5),
            data_quality: DataQuality {
                absent_sheets: vec![SheetKind::CashFlow],
                missing_metrics: vec!["dividend".into()],
                not_computable_ratios: vec!["pe_ratio".into()],
                zeroed_categories: vec!["cash_flow_quality".into()],
                grade: DataQualityGrade::Medium,
            },
        }
    }

    #[test]
    fn test_markdown_lists_ranking_and_gaps() {
        let r = sample();
        let md = render_markdown(&[&r]);
        assert!(md.contains("| 1 | ACME LTD | 50/100 | BUY |"));
        assert!(md.contains("Absent sheets: Cash Flow"));
        assert!(md.contains("Zeroed categories: cash_flow_quality"));
        assert!(md.contains("pe_ratio: n/a"));
    }

    #[test]
    fn test_json_round_trips() {
        let r = sample();
        let json = render_json(&[&r]).unwrap();
        let parsed: Vec<AnalysisResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].score.total, 50);
    }
}
