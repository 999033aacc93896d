use thiserror::Error;

/// Structural failures that abort the analysis of a single workbook.
///
/// Missing labels, metrics, or ratios are NOT errors: they are expected
/// conditions recorded in [`crate::DataQuality`] and propagated as
/// `Option::None` values.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Unreadable workbook: {0}")]
    UnreadableWorkbook(String),

    #[error("No recognizable sheets in workbook")]
    NoRecognizableSheets,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
