use analysis_core::{CellValue, PeriodLabel, Sheet};
use std::collections::HashSet;

/// Rows scanned from the top when looking for the period header.
const HEADER_SCAN_ROWS: usize = 5;
/// Minimum period-parseable cells for a row to qualify as a header.
const MIN_HEADER_PERIODS: usize = 2;
/// Sanity bounds for calendar years found in headers.
const YEAR_MIN: i32 = 1990;
const YEAR_MAX: i32 = 2035;

/// Whether a sheet reports annual or quarterly periods. Controls how
/// date-like header cells collapse into a [`PeriodLabel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodGranularity {
    Annual,
    Quarterly,
}

/// The coordinates of a located metric row: the period header columns
/// and the data row carrying the metric's values.
#[derive(Debug, Clone)]
pub struct TableLocation {
    pub header_row: usize,
    pub label_row: usize,
    /// (column, period) pairs, left to right.
    pub periods: Vec<(usize, PeriodLabel)>,
}

/// The single normalization every label comparison goes through:
/// lowercase, trim, collapse internal whitespace.
pub fn normalize_label(raw: &str) -> String {
    raw.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn in_year_range(year: i32) -> bool {
    (YEAR_MIN..=YEAR_MAX).contains(&year)
}

fn parse_quarter_token(token: &str) -> Option<u8> {
    let rest = token.strip_prefix('q').or_else(|| token.strip_prefix('Q'))?;
    match rest {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        "4" => Some(4),
        _ => None,
    }
}

/// Parse an ISO `YYYY-MM-DD` date into (year, quarter-by-calendar-month).
fn parse_iso_date(text: &str) -> Option<(i32, u8)> {
    let mut parts = text.trim().splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if !in_year_range(year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some((year, ((month - 1) / 3 + 1) as u8))
}

/// Parse one header cell into a period label, or `None` when the cell
/// is not period-like. Accepted shapes: a bare year number, a 4-digit
/// year token in text, `Q3 2024` / `2024 Q3`, and ISO date text (which
/// collapses to a year for annual sheets and a calendar quarter for
/// quarterly ones).
pub fn parse_period(cell: &CellValue, granularity: PeriodGranularity) -> Option<PeriodLabel> {
    match cell {
        CellValue::Number(n) => {
            let year = *n as i32;
            if n.fract() == 0.0 && in_year_range(year) {
                Some(PeriodLabel::Year(year))
            } else {
                None
            }
        }
        CellValue::Text(s) => {
            let text = s.trim();
            if let Some((year, quarter)) = parse_iso_date(text) {
                return Some(match granularity {
                    PeriodGranularity::Annual => PeriodLabel::Year(year),
                    PeriodGranularity::Quarterly => PeriodLabel::Quarter { year, quarter },
                });
            }

            let mut year: Option<i32> = None;
            let mut quarter: Option<u8> = None;
            for token in text.split_whitespace() {
                if let Some(q) = parse_quarter_token(token) {
                    quarter = quarter.or(Some(q));
                } else if token.len() == 4 {
                    if let Ok(y) = token.parse::<i32>() {
                        if in_year_range(y) {
                            year = year.or(Some(y));
                        }
                    }
                }
            }
            match (year, quarter) {
                (Some(year), Some(quarter)) => Some(PeriodLabel::Quarter { year, quarter }),
                (Some(year), None) => Some(PeriodLabel::Year(year)),
                _ => None,
            }
        }
        CellValue::Empty => None,
    }
}

/// Find the period header: among the top rows, the one with the most
/// period-parseable cells wins. Returns `None` when no row qualifies.
pub fn find_header_row(
    sheet: &Sheet,
    granularity: PeriodGranularity,
) -> Option<(usize, Vec<(usize, PeriodLabel)>)> {
    let mut best: Option<(usize, Vec<(usize, PeriodLabel)>)> = None;
    for row in 0..sheet.row_count().min(HEADER_SCAN_ROWS) {
        let periods: Vec<(usize, PeriodLabel)> = sheet
            .row(row)
            .iter()
            .enumerate()
            .filter_map(|(col, cell)| parse_period(cell, granularity).map(|p| (col, p)))
            .collect();
        if periods.len() >= MIN_HEADER_PERIODS
            && best.as_ref().map_or(true, |(_, b)| periods.len() > b.len())
        {
            best = Some((row, periods));
        }
    }
    best
}

fn label_matches(normalized_cell: &str, synonym: &str) -> bool {
    // Tolerate trailing decoration ("sales +", "net profit %") but not
    // a longer label ("sales growth" must not match "sales").
    match normalized_cell.strip_prefix(synonym) {
        Some(rest) => rest.chars().all(|c| !c.is_alphanumeric()),
        None => false,
    }
}

/// Find the data row for a metric by matching each row's first filled
/// cell against the synonym list. Rows below the header are preferred;
/// rows already claimed by another metric are skipped.
pub fn find_label_row(
    sheet: &Sheet,
    synonyms: &[&str],
    header_row: Option<usize>,
    claimed: &HashSet<usize>,
) -> Option<usize> {
    let mut fallback: Option<usize> = None;
    for synonym in synonyms {
        let target = normalize_label(synonym);
        for row in 0..sheet.row_count() {
            if claimed.contains(&row) {
                continue;
            }
            let Some((_, cell)) = sheet.first_filled_cell(row) else {
                continue;
            };
            let Some(text) = cell.as_text() else { continue };
            if !label_matches(&normalize_label(text), &target) {
                continue;
            }
            match header_row {
                Some(h) if row > h => return Some(row),
                _ => fallback = fallback.or(Some(row)),
            }
        }
    }
    // A match above the header only wins when no synonym matched a row
    // below it.
    fallback
}

/// Full locator contract: header row plus the data row for a label.
/// `None` is a normal outcome; callers degrade, they do not fail.
pub fn locate_metric(
    sheet: &Sheet,
    synonyms: &[&str],
    granularity: PeriodGranularity,
    claimed: &HashSet<usize>,
) -> Option<TableLocation> {
    let (header_row, periods) = find_header_row(sheet, granularity)?;
    let label_row = find_label_row(sheet, synonyms, Some(header_row), claimed)?;
    Some(TableLocation { header_row, label_row, periods })
}
