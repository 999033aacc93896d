//! Concurrent multi-workbook analysis with per-file failure isolation
//! and a deterministic consolidated ranking.

use crate::analyze_workbook;
use analysis_core::{AnalysisError, AnalysisResult, EngineConfig};
use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Outcome of one file in a batch run. A failed file never aborts the
/// rest of the batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub result: Result<AnalysisResult, AnalysisError>,
}

/// Analyze many workbook files, at most `concurrency` at a time.
/// Outcomes come back in input order regardless of completion order.
pub async fn analyze_batch(
    paths: Vec<PathBuf>,
    config: EngineConfig,
    concurrency: usize,
) -> Vec<BatchOutcome> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::with_capacity(paths.len());

    for path in paths {
        let semaphore = Arc::clone(&semaphore);
        let task_path = path.clone();
        let handle = tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore never closed");
            let result = tokio::task::spawn_blocking(move || {
                let workbook = workbook_reader::read_workbook(&task_path)?;
                analyze_workbook(&workbook, &config)
            })
            .await
            .unwrap_or_else(|e| {
                Err(AnalysisError::UnreadableWorkbook(format!(
                    "analysis task failed: {e}"
                )))
            });
            result
        });
        handles.push((path, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = handle.await.unwrap_or_else(|e| {
            Err(AnalysisError::UnreadableWorkbook(format!(
                "analysis task failed: {e}"
            )))
        });
        if let Err(err) = &result {
            tracing::warn!("{}: {err}", path.display());
        }
        outcomes.push(BatchOutcome { path, result });
    }
    outcomes
}

fn debt_to_equity_order(a: &AnalysisResult, b: &AnalysisResult) -> Ordering {
    // Lower leverage ranks first; unknown leverage ranks last
    match (
        a.ratios.value("debt_to_equity"),
        b.ratios.value("debt_to_equity"),
    ) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn company_name(r: &AnalysisResult) -> &str {
    r.profile.name.as_deref().unwrap_or("")
}

/// Rank analyzed companies: descending total score, ties broken by
/// lower debt-to-equity, then by company name.
pub fn rank(results: &[AnalysisResult]) -> Vec<&AnalysisResult> {
    let mut ranked: Vec<&AnalysisResult> = results.iter().collect();
    ranked.sort_by(|a, b| {
        b.score
            .total
            .cmp(&a.score.total)
            .then_with(|| debt_to_equity_order(a, b))
            .then_with(|| company_name(a).cmp(company_name(b)))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{
        CompanyProfile, DataQuality, DataQualityGrade, Ratio, RatioSet, ScoreBreakdown,
    };
    use std::collections::BTreeMap;

    fn result(name: &str, total_parts: (u8, u8, u8, u8, u8), de: Option<f64>) -> AnalysisResult {
        let mut ratios = RatioSet::default();
        ratios.insert(
            "debt_to_equity",
            Ratio { value: de, formula: String::new(), inputs: BTreeMap::new() },
        );
        AnalysisResult {
            profile: CompanyProfile { name: Some(name.to_string()), ..Default::default() },
            series: BTreeMap::new(),
            ratios,
            score: ScoreBreakdown::new(
                total_parts.0,
                total_parts.1,
                total_parts.2,
                total_parts.3,
                total_parts.4,
            ),
            data_quality: DataQuality {
                absent_sheets: vec![],
                missing_metrics: vec![],
                not_computable_ratios: vec![],
                zeroed_categories: vec![],
                grade: DataQualityGrade::Low,
            },
        }
    }

    #[test]
    fn test_rank_orders_by_score_then_leverage_then_name() {
        let results = vec![
            result("Delta", (20, 20, 10, 0, 5), Some(1.2)),
            result("Alpha", (20, 20, 20, 20, 20), Some(0.5)),
            result("Charlie", (20, 20, 10, 0, 5), None),
            result("Bravo", (20, 20, 10, 0, 5), Some(0.3)),
            result("Echo", (20, 20, 10, 0, 5), Some(0.3)),
        ];
        let ranked = rank(&results);
        let names: Vec<&str> = ranked.iter().map(|r| company_name(r)).collect();
        // 100 first; then 55s by leverage (None last), ties by name
        assert_eq!(names, vec!["Alpha", "Bravo", "Echo", "Delta", "Charlie"]);
    }

    #[tokio::test]
    async fn test_batch_isolates_missing_files() {
        let outcomes = analyze_batch(
            vec![PathBuf::from("/nonexistent/a.xlsx"), PathBuf::from("/nonexistent/b.xlsx")],
            EngineConfig::default(),
            2,
        )
        .await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].path, PathBuf::from("/nonexistent/a.xlsx"));
        assert!(outcomes.iter().all(|o| o.result.is_err()));
    }
}
