use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A reporting period: a fiscal/calendar year or a quarter within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodLabel {
    Year(i32),
    Quarter { year: i32, quarter: u8 },
}

impl PeriodLabel {
    pub fn year(&self) -> i32 {
        match self {
            PeriodLabel::Year(y) => *y,
            PeriodLabel::Quarter { year, .. } => *year,
        }
    }

    /// Sort key giving strict chronological ordering; annual labels sort
    /// before any quarter of the same year.
    fn sort_key(&self) -> (i32, u8) {
        match self {
            PeriodLabel::Year(y) => (*y, 0),
            PeriodLabel::Quarter { year, quarter } => (*year, *quarter),
        }
    }
}

impl PartialOrd for PeriodLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PeriodLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodLabel::Year(y) => write!(f, "{}", y),
            PeriodLabel::Quarter { year, quarter } => write!(f, "Q{} {}", quarter, year),
        }
    }
}

/// One observation in a metric series. `None` means the period exists in
/// the source table but carried no usable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: PeriodLabel,
    pub value: Option<f64>,
}

/// A named financial line item over an ordered sequence of periods.
///
/// Invariant: periods are strictly increasing and unique; the
/// constructor sorts and drops duplicate labels (first occurrence wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl MetricSeries {
    pub fn new(name: impl Into<String>, mut points: Vec<SeriesPoint>) -> Self {
        points.sort_by_key(|p| p.period);
        points.dedup_by_key(|p| p.period);
        Self { name: name.into(), points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Value at the most recent period, if present.
    pub fn latest_value(&self) -> Option<f64> {
        self.points.last().and_then(|p| p.value)
    }

    /// Value at the period before the most recent one, if present.
    pub fn previous_value(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        self.points[self.points.len() - 2].value
    }

    pub fn value_at(&self, period: PeriodLabel) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.period == period)
            .and_then(|p| p.value)
    }

    /// The trailing `n` points (all of them when fewer exist).
    pub fn last_n(&self, n: usize) -> &[SeriesPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Count of periods that actually carry a value.
    pub fn present_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }
}
