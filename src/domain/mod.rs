//! Domain layer: entities and the level-experience computations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod charts;
pub mod color;
pub mod entities;
pub mod error;
pub mod format;
pub mod hierarchy;
pub mod stats;
pub mod table;

pub use charts::{
    line_chart_options, line_series, sunburst_chart_options, LineChartOptions, SeriesPoint,
    SunburstChartOptions,
};
pub use color::{CssColor, Rgb, NEUTRAL_FILL};
pub use entities::*;
pub use error::DomainError;
pub use hierarchy::{build_hierarchy, resolve_parent, Diagnostic, Hierarchy, HierarchyNode, NodeId};
pub use stats::{compute_stats, ColumnStats, SeriesStats};
pub use table::{format_row, format_table, CellFill, TableCell, TableRow};
