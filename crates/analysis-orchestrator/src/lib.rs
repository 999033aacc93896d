//! Assembles one workbook's extraction, metrics, and score into a
//! single immutable result, and drives batch runs over many files.

pub mod batch;


use analysis_core::{
    AnalysisError, AnalysisResult, DataQuality, DataQualityGrade, EngineConfig, MetricSeries,
    PeriodLabel, SheetKind, Workbook,
};
use sheet_extraction::{
    extract_balance_sheet, extract_cash_flow, extract_profile, extract_profit_loss,
    extract_quarterly, SheetExtraction,
};
use std::collections::BTreeMap;

/// Series that must exist for an analysis to say anything substantive.
const KEY_METRICS: &[&str] = &["revenue", "net_profit", "operating_cash_flow"];

/// The statement sheets counted toward the completeness grade. The
/// Data Sheet carries metadata, not statements, so it is excluded.
const STATEMENT_KINDS: &[SheetKind] = &[
    SheetKind::ProfitLoss,
    SheetKind::BalanceSheet,
    SheetKind::CashFlow,
    SheetKind::Quarterly,
];

/// Analyze one in-memory workbook end to end.
///
/// Fails only when no sheet is recognizable at all; any lesser gap
/// (absent sheets, unlocated metrics, non-computable ratios) degrades
/// the result and is recorded in its `DataQuality` instead.
pub fn analyze_workbook(
    workbook: &Workbook,
    config: &EngineConfig,
) -> Result<AnalysisResult, AnalysisError> {
    if !workbook.has_recognized_sheet() {
        return Err(AnalysisError::NoRecognizableSheets);
    }

    let mut series: BTreeMap<String, MetricSeries> = BTreeMap::new();
    let mut missing_metrics: Vec<String> = Vec::new();

    let extractors: &[(SheetKind, fn(&analysis_core::Sheet) -> SheetExtraction)] = &[
        (SheetKind::ProfitLoss, extract_profit_loss),
        (SheetKind::BalanceSheet, extract_balance_sheet),
        (SheetKind::CashFlow, extract_cash_flow),
        (SheetKind::Quarterly, extract_quarterly),
    ];
    for (kind, extract) in extractors {
        let Some(sheet) = workbook.find_sheet(*kind) else {
            tracing::warn!("No {} sheet found", kind.display_name());
            continue;
        };
        let extraction = extract(sheet);
        tracing::info!(
            "{}: {} series extracted, {} metrics not located",
            kind.display_name(),
            extraction.series.len(),
            extraction.missing.len()
        );
        missing_metrics.extend(extraction.missing);
        for s in extraction.series {
            series.insert(s.name.clone(), s);
        }
    }

    let (profile, missing_fields) = extract_profile(workbook);
    missing_metrics.extend(missing_fields);
    missing_metrics.sort();
    missing_metrics.dedup();

    let metrics = metrics_engine::compute_metrics(&series, &profile, config);
    let (score, zeroed_categories) = scoring_engine::score(&metrics);

    let absent_sheets = workbook.absent_kinds();
    let grade = assess_grade(workbook, &series, config);
    let data_quality = DataQuality {
        absent_sheets,
        missing_metrics,
        not_computable_ratios: metrics.ratios.not_computable_names(),
        zeroed_categories,
        grade,
    };

    tracing::info!(
        company = profile.name.as_deref().unwrap_or("<unnamed>"),
        total = score.total,
        recommendation = score.recommendation.as_str(),
        grade = ?data_quality.grade,
        "Analysis complete"
    );

    Ok(AnalysisResult {
        profile,
        series,
        ratios: metrics.ratios,
        score,
        data_quality,
    })
}

/// Longest annual history among the extracted series.
fn annual_history_depth(series: &BTreeMap<String, MetricSeries>) -> usize {
    series
        .values()
        .filter(|s| s.points.iter().all(|p| matches!(p.period, PeriodLabel::Year(_))))
        .map(|s| s.present_count())
        .max()
        .unwrap_or(0)
}

/// Completeness grade over three axes: recognized statement sheets,
/// depth of annual history, and presence of the key series.
fn assess_grade(
    workbook: &Workbook,
    series: &BTreeMap<String, MetricSeries>,
    config: &EngineConfig,
) -> DataQualityGrade {
    let sheets = STATEMENT_KINDS
        .iter()
        .filter(|k| workbook.find_sheet(**k).is_some())
        .count();
    let years = annual_history_depth(series);
    let key = KEY_METRICS
        .iter()
        .filter(|name| series.get(**name).map(|s| s.present_count() > 0).unwrap_or(false))
        .count();

    if sheets >= 3 && years >= config.preferred_years && key >= 2 {
        DataQualityGrade::High
    } else if sheets >= 2 && years >= 3 && key >= 1 {
        DataQualityGrade::Medium
    } else {
        DataQualityGrade::Low
    }
}
