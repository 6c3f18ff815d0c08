//! Column statistics over a game's level records
//!
//! Min/max per numeric column, plus the percent change of the
//! experience-to-next-level column between consecutive levels.

use serde::Serialize;

use crate::domain::entities::LevelRecord;

/// Min/max summary over the numeric entries of one column.
///
/// Starts unresolved (`min = +inf`, `max = -inf`) and stays that way when
/// no numeric entry is observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl ColumnStats {
    /// Stats over every finite value yielded by `values`.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut stats = Self::default();
        for value in values {
            stats.observe(value);
        }
        stats
    }

    /// Fold one value in; non-finite values are ignored.
    pub fn observe(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// At least one numeric value has been observed.
    pub fn is_resolved(&self) -> bool {
        self.min <= self.max
    }

    /// The observed range, if there is one.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.is_resolved().then_some((self.min, self.max))
    }

    /// Position of `value` within `[min, max]`, clamped to `[0, 1]`.
    ///
    /// `None` for unresolved or single-value ranges and non-finite input:
    /// such cells get the neutral fill.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if !value.is_finite() || !self.is_resolved() || self.min == self.max {
            return None;
        }
        Some(((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0))
    }
}

/// Everything the table and charts derive from one record sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStats {
    pub cumulative: ColumnStats,
    pub to_next: ColumnStats,
    /// Percent change of experience-to-next against the previous level;
    /// `None` where it cannot be computed. Same length as the input.
    pub percent_delta: Vec<Option<f64>>,
    pub percent_delta_stats: ColumnStats,
}

/// Single pass over `records`.
pub fn compute_stats(records: &[LevelRecord]) -> SeriesStats {
    let mut cumulative = ColumnStats::default();
    let mut to_next = ColumnStats::default();
    let mut percent_delta = Vec::with_capacity(records.len());
    let mut percent_delta_stats = ColumnStats::default();

    for (i, record) in records.iter().enumerate() {
        if let Some(v) = record.cumulative_experience {
            cumulative.observe(v);
        }
        if let Some(v) = record.experience_to_next_level {
            to_next.observe(v);
        }

        let previous = i
            .checked_sub(1)
            .and_then(|p| records[p].experience_to_next_level);
        let delta = match (record.experience_to_next_level, previous) {
            (Some(current), Some(previous)) => percent_change(current, previous),
            _ => None,
        };
        if let Some(d) = delta {
            percent_delta_stats.observe(d);
        }
        percent_delta.push(delta);
    }

    SeriesStats {
        cumulative,
        to_next,
        percent_delta,
        percent_delta_stats,
    }
}

/// `(current / previous - 1) * 100`, or `None` when that is not finite
/// (a zero predecessor).
fn percent_change(current: f64, previous: f64) -> Option<f64> {
    let change = (current / previous - 1.0) * 100.0;
    change.is_finite().then_some(change)
}
