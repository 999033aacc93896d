//! Declarative label tables: canonical metric name -> accepted row
//! labels, per statement sheet. Extractors differ only in these tables.

/// One extractable line item: its canonical name and the row labels
/// (already lowercase) it may appear under.
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub canonical: &'static str,
    pub labels: &'static [&'static str],
}

pub const PROFIT_LOSS_METRICS: &[MetricSpec] = &[
    MetricSpec {
        canonical: "revenue",
        labels: &["sales", "revenue", "total revenue", "net sales", "turnover"],
    },
    MetricSpec {
        canonical: "operating_profit",
        labels: &["operating profit", "operating income", "ebit"],
    },
    MetricSpec {
        canonical: "net_profit",
        labels: &["net profit", "net income", "profit after tax", "pat"],
    },
    MetricSpec {
        canonical: "eps",
        labels: &["eps", "earnings per share", "eps in rs"],
    },
    MetricSpec {
        canonical: "dividend",
        labels: &["dividend", "dividend per share", "dps", "dividend payout"],
    },
    MetricSpec {
        canonical: "depreciation",
        labels: &["depreciation", "depreciation and amortisation", "depreciation & amortization"],
    },
    MetricSpec {
        canonical: "interest_expense",
        labels: &["interest", "interest expense", "finance costs"],
    },
];

pub const BALANCE_SHEET_METRICS: &[MetricSpec] = &[
    MetricSpec {
        canonical: "total_equity",
        labels: &["total equity", "shareholders equity", "net worth", "equity"],
    },
    MetricSpec {
        canonical: "total_debt",
        labels: &["total debt", "total borrowings", "borrowings", "debt"],
    },
    MetricSpec {
        canonical: "current_assets",
        labels: &["current assets", "total current assets", "other assets"],
    },
    MetricSpec {
        canonical: "current_liabilities",
        labels: &["current liabilities", "total current liabilities", "other liabilities"],
    },
    MetricSpec {
        canonical: "inventory",
        labels: &["inventory", "inventories", "stock in trade"],
    },
    MetricSpec {
        canonical: "fixed_assets",
        labels: &["fixed assets", "net block", "property plant equipment", "ppe"],
    },
    MetricSpec { canonical: "total_assets", labels: &["total assets"] },
    MetricSpec {
        canonical: "cash",
        labels: &["cash & bank", "cash and bank", "cash & equivalents", "cash and cash equivalents", "cash"],
    },
];

pub const CASH_FLOW_METRICS: &[MetricSpec] = &[
    MetricSpec {
        canonical: "operating_cash_flow",
        labels: &["cash from operating activity", "operating cash flow", "cash from operations", "ocf"],
    },
    MetricSpec {
        canonical: "capex",
        labels: &["capital expenditure", "capex", "cash from investing activity", "investing activity"],
    },
    MetricSpec {
        canonical: "financing_cash_flow",
        labels: &["cash from financing activity", "financing cash flow", "cash from financing"],
    },
];

pub const QUARTERLY_METRICS: &[MetricSpec] = &[
    MetricSpec {
        canonical: "quarterly_revenue",
        labels: &["sales", "revenue", "total revenue"],
    },
    MetricSpec {
        canonical: "quarterly_net_profit",
        labels: &["net profit", "net income", "profit after tax", "pat"],
    },
];

/// Scalar Data Sheet fields (one cell each, not a series).
pub const PROFILE_FIELDS: &[MetricSpec] = &[
    MetricSpec {
        canonical: "current_price",
        labels: &["current price", "share price", "cmp", "market price", "price"],
    },
    MetricSpec {
        canonical: "market_cap",
        labels: &["market cap", "market capitalization", "market capitalisation", "mcap"],
    },
    MetricSpec {
        canonical: "face_value",
        labels: &["face value", "fv", "par value"],
    },
    MetricSpec {
        canonical: "outstanding_shares",
        labels: &["outstanding shares", "shares outstanding", "number of equity shares", "number of shares", "shares"],
    },
];
