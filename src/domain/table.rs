//! Level experience data table: display text and heat-scale fill per cell

use serde::{Serialize, Serializer};

use crate::domain::color::{grade, Rgb, NEUTRAL_FILL};
use crate::domain::entities::LevelRecord;
use crate::domain::format::{self, NOT_APPLICABLE};
use crate::domain::stats::{compute_stats, ColumnStats, SeriesStats};

/// Column headers, in cell order.
pub const COLUMN_HEADERS: [&str; 5] = [
    "Level",
    "Cumulative Experience",
    "Experience to Next Level",
    "% Difference From Last Level",
    "% of Max Level Experience",
];

/// Background of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFill {
    /// No background (the level column)
    Unfilled,
    /// Unknown value or unusable column range
    Neutral,
    /// Position on the green-yellow-orange-red scale
    Graded(Rgb),
}

impl CellFill {
    pub fn color(&self) -> Option<Rgb> {
        match self {
            CellFill::Unfilled => None,
            CellFill::Neutral => Some(NEUTRAL_FILL),
            CellFill::Graded(rgb) => Some(*rgb),
        }
    }

    fn for_value(value: Option<f64>, column: &ColumnStats) -> Self {
        match value.and_then(|v| column.normalize(v)) {
            Some(position) => CellFill::Graded(grade(position)),
            None => CellFill::Neutral,
        }
    }
}

impl Serialize for CellFill {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.color() {
            Some(rgb) => serializer.serialize_str(&rgb.hex()),
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCell {
    pub text: String,
    pub fill: CellFill,
}

impl TableCell {
    fn new(text: impl Into<String>, fill: CellFill) -> Self {
        Self {
            text: text.into(),
            fill,
        }
    }
}

/// One formatted row; `cells` follow [`COLUMN_HEADERS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub level: i64,
    pub cells: Vec<TableCell>,
}

/// Format one record against precomputed stats.
pub fn format_row(record: &LevelRecord, percent_delta: Option<f64>, stats: &SeriesStats) -> TableRow {
    let to_next = record.experience_to_next_level;
    let to_next_fill = CellFill::for_value(to_next, &stats.to_next);

    let delta_text = percent_delta
        .map(format::percent_fixed)
        .unwrap_or_else(|| NOT_APPLICABLE.to_string());

    let share_text = match (to_next, stats.cumulative.range()) {
        (Some(value), Some((_, max))) => format::percent_of_max(value, max),
        _ => NOT_APPLICABLE.to_string(),
    };

    TableRow {
        level: record.level,
        cells: vec![
            TableCell::new(record.level.to_string(), CellFill::Unfilled),
            TableCell::new(
                format::measure(record.cumulative_experience),
                CellFill::for_value(record.cumulative_experience, &stats.cumulative),
            ),
            TableCell::new(format::measure(to_next), to_next_fill),
            TableCell::new(
                delta_text,
                CellFill::for_value(percent_delta, &stats.percent_delta_stats),
            ),
            TableCell::new(share_text, to_next_fill),
        ],
    }
}

/// Compute stats once and format every record.
pub fn format_table(records: &[LevelRecord]) -> Vec<TableRow> {
    let stats = compute_stats(records);
    records
        .iter()
        .zip(stats.percent_delta.iter())
        .map(|(record, delta)| format_row(record, *delta, &stats))
        .collect()
}
