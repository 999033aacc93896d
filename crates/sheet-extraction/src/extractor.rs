use crate::locator::{find_label_row, locate_metric, PeriodGranularity};
use crate::tables::{
    MetricSpec, BALANCE_SHEET_METRICS, CASH_FLOW_METRICS, PROFILE_FIELDS, PROFIT_LOSS_METRICS,
    QUARTERLY_METRICS,
};
use analysis_core::{
    CompanyProfile, MetricSeries, SeriesPoint, Sheet, SheetKind, Workbook,
};
use std::collections::HashSet;

/// Everything one sheet yielded: the recognized series plus the
/// canonical names that could not be located.
#[derive(Debug, Clone, Default)]
pub struct SheetExtraction {
    pub series: Vec<MetricSeries>,
    pub missing: Vec<String>,
}

/// Run the locator for every entry of a declarative metric table.
///
/// Each physical row is claimed by at most one canonical metric, so a
/// generic synonym can never steal a row a more specific one already
/// matched. Empty or non-numeric data cells become missing values for
/// their period; they are never defaulted to zero.
pub fn extract_statement(
    sheet: &Sheet,
    metrics: &[MetricSpec],
    granularity: PeriodGranularity,
) -> SheetExtraction {
    let mut out = SheetExtraction::default();
    let mut claimed: HashSet<usize> = HashSet::new();

    for spec in metrics {
        let Some(location) = locate_metric(sheet, spec.labels, granularity, &claimed) else {
            tracing::debug!(
                "'{}' not found in sheet '{}' (searched {:?})",
                spec.canonical,
                sheet.name,
                spec.labels
            );
            out.missing.push(spec.canonical.to_string());
            continue;
        };
        claimed.insert(location.label_row);

        let points: Vec<SeriesPoint> = location
            .periods
            .iter()
            .map(|(col, period)| SeriesPoint {
                period: *period,
                value: sheet.cell(location.label_row, *col).as_number(),
            })
            .collect();
        out.series.push(MetricSeries::new(spec.canonical, points));
    }
    out
}

pub fn extract_profit_loss(sheet: &Sheet) -> SheetExtraction {
    extract_statement(sheet, PROFIT_LOSS_METRICS, PeriodGranularity::Annual)
}

pub fn extract_balance_sheet(sheet: &Sheet) -> SheetExtraction {
    extract_statement(sheet, BALANCE_SHEET_METRICS, PeriodGranularity::Annual)
}

/// Cash flow extraction, plus the derived per-period free cash flow
/// series (OCF minus the magnitude of capex, which most exports report
/// as a negative investing outflow).
pub fn extract_cash_flow(sheet: &Sheet) -> SheetExtraction {
    let mut out = extract_statement(sheet, CASH_FLOW_METRICS, PeriodGranularity::Annual);

    let ocf = out.series.iter().find(|s| s.name == "operating_cash_flow").cloned();
    let capex = out.series.iter().find(|s| s.name == "capex").cloned();
    if let (Some(ocf), Some(capex)) = (ocf, capex) {
        let points: Vec<SeriesPoint> = ocf
            .points
            .iter()
            .map(|p| SeriesPoint {
                period: p.period,
                value: match (p.value, capex.value_at(p.period)) {
                    (Some(o), Some(c)) => Some(o - c.abs()),
                    _ => None,
                },
            })
            .collect();
        out.series.push(MetricSeries::new("free_cash_flow", points));
    }
    out
}

pub fn extract_quarterly(sheet: &Sheet) -> SheetExtraction {
    extract_statement(sheet, QUARTERLY_METRICS, PeriodGranularity::Quarterly)
}

/// Scalar lookup: locate the field label, then take the first numeric
/// cell within a few columns to its right.
fn extract_scalar(sheet: &Sheet, spec: &MetricSpec) -> Option<f64> {
    let claimed = HashSet::new();
    let row = find_label_row(sheet, spec.labels, None, &claimed)?;
    let cells = sheet.row(row);
    cells.iter().skip(1).take(5).find_map(|c| c.as_number())
}

/// Company-name discovery: header cells across all sheets often carry
/// the full legal name (e.g. "ACME INFORMATICS LTD").
fn find_company_name(workbook: &Workbook) -> Option<String> {
    const NAME_MARKERS: &[&str] = &["LTD", "LIMITED", "INC", "CORP", "COMPANY", "PLC"];
    for sheet in &workbook.sheets {
        for row in 0..sheet.row_count().min(2) {
            for cell in sheet.row(row) {
                let Some(text) = cell.as_text() else { continue };
                let trimmed = text.trim();
                if trimmed.len() <= 5 {
                    continue;
                }
                let upper = trimmed.to_uppercase();
                if NAME_MARKERS.iter().any(|m| upper.contains(m)) {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

/// Pull scalar CompanyProfile fields from the Data Sheet using the same
/// locator pattern as the series extractors, one cell each.
pub fn extract_profile(workbook: &Workbook) -> (CompanyProfile, Vec<String>) {
    let mut profile = CompanyProfile { name: find_company_name(workbook), ..Default::default() };
    let mut missing = Vec::new();

    let Some(sheet) = workbook.find_sheet(SheetKind::DataSheet) else {
        missing.extend(PROFILE_FIELDS.iter().map(|f| f.canonical.to_string()));
        return (profile, missing);
    };

    for spec in PROFILE_FIELDS {
        let value = extract_scalar(sheet, spec);
        if value.is_none() {
            missing.push(spec.canonical.to_string());
        }
        match spec.canonical {
            "current_price" => profile.current_price = value,
            "market_cap" => profile.market_cap = value,
            "face_value" => profile.face_value = value,
            "outstanding_shares" => profile.outstanding_shares = value,
            _ => {}
        }
    }
    (profile, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{CellValue, PeriodLabel};

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn pl_sheet() -> Sheet {
        Sheet::new(
            "Profit & Loss",
            vec![
                vec![text("ACME INFORMATICS LTD"), text(""), text("")],
                vec![text("Narration"), num(2023.0), num(2024.0), num(2025.0)],
                vec![text("Sales +"), num(137.66), num(220.06), num(407.78)],
                vec![text("Operating Profit"), num(20.0), num(31.0), num(60.0)],
                vec![text("Net Profit +"), num(7.5), num(11.2), num(19.97)],
                vec![text("EPS in Rs"), num(3.1), num(4.6), num(8.2)],
            ],
        )
    }

    #[test]
    fn test_extract_profit_loss() {
        let out = extract_profit_loss(&pl_sheet());
        let revenue = out.series.iter().find(|s| s.name == "revenue").unwrap();
        assert_eq!(revenue.latest_value(), Some(407.78));
        assert_eq!(revenue.latest().unwrap().period, PeriodLabel::Year(2025));

        // dividend, depreciation, interest_expense rows are absent
        assert!(out.missing.contains(&"dividend".to_string()));
        assert!(out.missing.contains(&"depreciation".to_string()));
        assert!(out.missing.contains(&"interest_expense".to_string()));
    }

    #[test]
    fn test_empty_cells_stay_missing_not_zero() {
        let sheet = Sheet::new(
            "Profit & Loss",
            vec![
                vec![text(""), num(2023.0), num(2024.0)],
                vec![text("Sales"), text(""), num(50.0)],
                vec![text("Net Profit"), num(0.0), text("n/a")],
            ],
        );
        let out = extract_profit_loss(&sheet);
        let revenue = out.series.iter().find(|s| s.name == "revenue").unwrap();
        assert_eq!(revenue.value_at(PeriodLabel::Year(2023)), None);
        assert_eq!(revenue.value_at(PeriodLabel::Year(2024)), Some(50.0));

        // Zero is a value; "n/a" is not
        let np = out.series.iter().find(|s| s.name == "net_profit").unwrap();
        assert_eq!(np.value_at(PeriodLabel::Year(2023)), Some(0.0));
        assert_eq!(np.value_at(PeriodLabel::Year(2024)), None);
    }

    #[test]
    fn test_cash_flow_derives_fcf() {
        let sheet = Sheet::new(
            "Cash Flow",
            vec![
                vec![text(""), num(2023.0), num(2024.0)],
                vec![text("Cash from Operating Activity +"), num(100.0), num(140.0)],
                vec![text("Cash from Investing Activity +"), num(-30.0), num(-45.0)],
                vec![text("Cash from Financing Activity +"), num(-20.0), num(-10.0)],
            ],
        );
        let out = extract_cash_flow(&sheet);
        let fcf = out.series.iter().find(|s| s.name == "free_cash_flow").unwrap();
        assert_eq!(fcf.value_at(PeriodLabel::Year(2023)), Some(70.0));
        assert_eq!(fcf.value_at(PeriodLabel::Year(2024)), Some(95.0));
    }

    #[test]
    fn test_quarterly_extraction() {
        let sheet = Sheet::new(
            "Quarters",
            vec![
                vec![text(""), text("Q1 2025"), text("Q2 2025"), text("Q3 2025")],
                vec![text("Sales"), num(80.0), num(95.0), num(110.0)],
                vec![text("Net Profit"), num(4.0), num(5.5), num(7.0)],
            ],
        );
        let out = extract_quarterly(&sheet);
        let revenue = out.series.iter().find(|s| s.name == "quarterly_revenue").unwrap();
        assert_eq!(revenue.len(), 3);
        assert_eq!(
            revenue.latest().unwrap().period,
            PeriodLabel::Quarter { year: 2025, quarter: 3 }
        );
    }

    #[test]
    fn test_extract_profile() {
        let workbook = Workbook::new(vec![
            pl_sheet(),
            Sheet::new(
                "Data Sheet",
                vec![
                    vec![text("Current Price"), num(412.5)],
                    vec![text("Market Cap"), text(""), num(9_800.0)],
                    vec![text("Face Value"), num(10.0)],
                ],
            ),
        ]);
        let (profile, missing) = extract_profile(&workbook);
        assert_eq!(profile.name.as_deref(), Some("ACME INFORMATICS LTD"));
        assert_eq!(profile.current_price, Some(412.5));
        assert_eq!(profile.market_cap, Some(9_800.0));
        assert_eq!(profile.face_value, Some(10.0));
        assert_eq!(profile.outstanding_shares, None);
        assert_eq!(missing, vec!["outstanding_shares".to_string()]);
    }

    #[test]
    fn test_profile_without_data_sheet() {
        let workbook = Workbook::new(vec![pl_sheet()]);
        let (profile, missing) = extract_profile(&workbook);
        assert!(profile.current_price.is_none());
        assert_eq!(missing.len(), PROFILE_FIELDS.len());
    }
}
