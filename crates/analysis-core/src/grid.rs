use serde::{Deserialize, Serialize};

/// A single cell surfaced from the spreadsheet reader.
///
/// Zero and empty are semantically distinct: zero is a reported value,
/// empty is the absence of one. Extractors must never conflate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Numeric view of the cell. Text cells are parsed after stripping
    /// thousands separators; anything unparseable is `None`, not zero.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => {
                let cleaned = s.trim().replace(',', "");
                if cleaned.is_empty() {
                    return None;
                }
                cleaned.parse::<f64>().ok()
            }
            CellValue::Empty => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

/// The five statement sheets an input workbook may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetKind {
    ProfitLoss,
    BalanceSheet,
    CashFlow,
    Quarterly,
    DataSheet,
}

impl SheetKind {
    pub const ALL: [SheetKind; 5] = [
        SheetKind::ProfitLoss,
        SheetKind::BalanceSheet,
        SheetKind::CashFlow,
        SheetKind::Quarterly,
        SheetKind::DataSheet,
    ];

    /// Keywords matched (case-insensitively) against sheet names.
    pub fn name_keywords(&self) -> &'static [&'static str] {
        match self {
            SheetKind::ProfitLoss => &["profit", "p&l", "pl", "income"],
            SheetKind::BalanceSheet => &["balance", "bs", "position"],
            SheetKind::CashFlow => &["cash flow", "cashflow", "cf", "cash"],
            SheetKind::Quarterly => &["quarters", "quarterly"],
            SheetKind::DataSheet => &["data", "company", "info", "summary", "overview"],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SheetKind::ProfitLoss => "Profit & Loss",
            SheetKind::BalanceSheet => "Balance Sheet",
            SheetKind::CashFlow => "Cash Flow",
            SheetKind::Quarterly => "Quarters",
            SheetKind::DataSheet => "Data Sheet",
        }
    }
}

/// A named 2-D grid of cells with no assumed shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { name: name.into(), rows }
    }

    /// Cell at (row, col); out-of-range coordinates read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(|r| r.as_slice()).unwrap_or(&[])
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First non-empty cell of a row, with its column index.
    pub fn first_filled_cell(&self, row: usize) -> Option<(usize, &CellValue)> {
        self.row(row).iter().enumerate().find(|(_, c)| !c.is_empty())
    }
}

/// An ordered set of named sheets, read once and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Find the sheet for a statement type by keyword match on its name.
    /// Longer keywords are tried first so "cash flow" wins over "cash".
    pub fn find_sheet(&self, kind: SheetKind) -> Option<&Sheet> {
        let mut keywords: Vec<&str> = kind.name_keywords().to_vec();
        keywords.sort_by_key(|k| std::cmp::Reverse(k.len()));
        for keyword in keywords {
            for sheet in &self.sheets {
                if sheet.name.to_lowercase().contains(keyword) {
                    return Some(sheet);
                }
            }
        }
        None
    }

    /// Statement kinds with no matching sheet in this workbook.
    pub fn absent_kinds(&self) -> Vec<SheetKind> {
        SheetKind::ALL
            .iter()
            .copied()
            .filter(|k| self.find_sheet(*k).is_none())
            .collect()
    }

    /// True when at least one statement sheet is recognizable.
    pub fn has_recognized_sheet(&self) -> bool {
        SheetKind::ALL.iter().any(|k| self.find_sheet(*k).is_some())
    }
}
