//! Spreadsheet file ingestion.
//!
//! Opens a multi-sheet workbook with calamine and flattens every sheet
//! into the plain cell grid the extraction crates consume. Native
//! spreadsheet encodings (serial dates, booleans, cell errors) are
//! resolved here so downstream code only ever sees number/text/empty.

use analysis_core::{AnalysisError, CellValue, Sheet, Workbook};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use std::path::Path;

/// Excel's day-zero epoch (the 1900 date system).
fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("static date")
}

/// Render an Excel serial date as ISO text so the table locator can
/// parse a year or quarter out of it.
fn serial_to_iso_date(serial: f64) -> Option<String> {
    if !(0.0..=200_000.0).contains(&serial) {
        return None;
    }
    let date = excel_epoch().checked_add_signed(Duration::days(serial as i64))?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::DateTime(dt) => match serial_to_iso_date(dt.as_f64()) {
            Some(iso) => CellValue::Text(iso),
            None => CellValue::Empty,
        },
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        // Booleans carry no financial meaning and must not surface as
        // numbers a header or data scan could pick up
        Data::Bool(_) | Data::DurationIso(_) | Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// Read every sheet of the workbook at `path` into an in-memory grid.
///
/// Fails only when the file itself cannot be parsed; sheets that fail
/// to load individually are skipped with a warning.
pub fn read_workbook(path: impl AsRef<Path>) -> Result<Workbook, AnalysisError> {
    let path = path.as_ref();
    let mut reader = open_workbook_auto(path)
        .map_err(|e| AnalysisError::UnreadableWorkbook(format!("{}: {}", path.display(), e)))?;

    let names: Vec<String> = reader.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());

    for name in names {
        let range = match reader.worksheet_range(&name) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping unreadable sheet '{}': {}", name, e);
                continue;
            }
        };
        let rows: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();
        sheets.push(Sheet::new(name, rows));
    }

    if sheets.is_empty() {
        return Err(AnalysisError::UnreadableWorkbook(format!(
            "{}: workbook contains no readable sheets",
            path.display()
        )));
    }

    tracing::info!(
        "Loaded workbook {} with {} sheets",
        path.display(),
        sheets.len()
    );
    Ok(Workbook::new(sheets))
}
