/// One rung of a scoring rubric: the metric threshold and the points
/// awarded when the metric clears it.
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub threshold: f64,
    pub points: u8,
}

impl Band {
    pub const fn new(threshold: f64, points: u8) -> Self {
        Self { threshold, points }
    }
}

/// First band (highest threshold first) whose threshold the value
/// meets or exceeds; 0 when none match.
pub fn resolve_at_least(bands: &[Band], value: f64) -> u8 {
    bands
        .iter()
        .find(|b| value >= b.threshold)
        .map(|b| b.points)
        .unwrap_or(0)
}

/// First band (lowest threshold first) whose threshold the value stays
/// strictly below; `floor` when none match.
pub fn resolve_below(bands: &[Band], value: f64, floor: u8) -> u8 {
    bands
        .iter()
        .find(|b| value < b.threshold)
        .map(|b| b.points)
        .unwrap_or(floor)
}
