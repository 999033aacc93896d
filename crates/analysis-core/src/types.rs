use crate::grid::SheetKind;
use crate::series::MetricSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar company metadata pulled from the Data Sheet. Every field is
/// independently optional; partial disclosure is the normal case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub current_price: Option<f64>,
    pub face_value: Option<f64>,
    pub outstanding_shares: Option<f64>,
    pub market_cap: Option<f64>,
}

impl CompanyProfile {
    /// Market cap as reported, or derived from price x share count.
    pub fn market_cap_or_derived(&self) -> Option<f64> {
        self.market_cap.or_else(|| {
            match (self.current_price, self.outstanding_shares) {
                (Some(p), Some(n)) if p > 0.0 && n > 0.0 => Some(p * n),
                _ => None,
            }
        })
    }
}

/// One computed ratio with its audit trail. The formula and operand
/// inputs are retained even when the value was not computable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    /// `None` means not computable (missing operand or zero denominator).
    pub value: Option<f64>,
    pub formula: String,
    pub inputs: BTreeMap<String, Option<f64>>,
}

/// Named ratios in deterministic (sorted) order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    pub ratios: BTreeMap<String, Ratio>,
}

impl RatioSet {
    pub fn insert(&mut self, name: impl Into<String>, ratio: Ratio) {
        self.ratios.insert(name.into(), ratio);
    }

    pub fn get(&self, name: &str) -> Option<&Ratio> {
        self.ratios.get(name)
    }

    /// Computed value of a named ratio, `None` when absent or not computable.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.ratios.get(name).and_then(|r| r.value)
    }

    /// Names of ratios that were recorded but could not be computed.
    pub fn not_computable_names(&self) -> Vec<String> {
        self.ratios
            .iter()
            .filter(|(_, r)| r.value.is_none())
            .map(|(n, _)| n.clone())
            .collect()
    }
}

/// Recommendation tier, a pure function of the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Avoid,
}

impl Recommendation {
    pub fn from_total(total: u8) -> Self {
        match total {
            t if t >= 70 => Recommendation::StrongBuy,
            t if t >= 50 => Recommendation::Buy,
            t if t >= 30 => Recommendation::Hold,
            _ => Recommendation::Avoid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Avoid => "AVOID",
        }
    }
}

/// Five category scores (0-20 each), their sum, and the derived tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub growth: u8,
    pub profitability: u8,
    pub financial_health: u8,
    pub cash_flow_quality: u8,
    pub valuation: u8,
    pub total: u8,
    pub recommendation: Recommendation,
}

impl ScoreBreakdown {
    /// Build a breakdown. Category scores are clamped to the 0-20 band;
    /// the total is always their exact sum.
    pub fn new(
        growth: u8,
        profitability: u8,
        financial_health: u8,
        cash_flow_quality: u8,
        valuation: u8,
    ) -> Self {
        let growth = growth.min(20);
        let profitability = profitability.min(20);
        let financial_health = financial_health.min(20);
        let cash_flow_quality = cash_flow_quality.min(20);
        let valuation = valuation.min(20);
        let total = growth + profitability + financial_health + cash_flow_quality + valuation;
        Self {
            growth,
            profitability,
            financial_health,
            cash_flow_quality,
            valuation,
            total,
            recommendation: Recommendation::from_total(total),
        }
    }
}

/// Overall completeness grade for the extracted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataQualityGrade {
    High,
    Medium,
    Low,
}

/// Structured record of every gap encountered during an analysis run,
/// attributable to a named metric, ratio, or sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub absent_sheets: Vec<SheetKind>,
    pub missing_metrics: Vec<String>,
    pub not_computable_ratios: Vec<String>,
    /// Scoring categories that fell to 0 because a required input was
    /// not computable.
    pub zeroed_categories: Vec<String>,
    pub grade: DataQualityGrade,
}

/// Tunables for the metrics engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Window (in data points) of the profit CAGR used for the PEG ratio.
    pub peg_growth_points: usize,
    /// Years of history considered a complete dataset.
    pub preferred_years: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { peg_growth_points: 3, preferred_years: 5 }
    }
}

/// The immutable output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub profile: CompanyProfile,
    pub series: BTreeMap<String, MetricSeries>,
    pub ratios: RatioSet,
    pub score: ScoreBreakdown,
    pub data_quality: DataQuality,
}
