//! Chart options for the line and sunburst charts
//!
//! Each builder returns a fresh value per call; nothing is shared between
//! renders. Colors from the game document are validated here, before the
//! options reach a renderer.

use serde::Serialize;

use crate::domain::color::CssColor;
use crate::domain::entities::{GameData, LevelRecord};
use crate::domain::error::DomainError;
use crate::domain::hierarchy::{Hierarchy, HierarchyNode};
use crate::domain::stats::ColumnStats;

const ZOOM_HINT: &str =
    "* Left click + drag to zoom in graph<br>* Hold [Ctrl] to pan with left mouse button";
const SUNBURST_POINT_FORMAT: &str = "Lv. <b>{point.name}</b>:<br><b>{point.value}</b> exp";
const SUNBURST_BRIGHTNESS_DROP: f64 = -0.4;

/// Level on x, cumulative experience on y (`None` leaves a gap).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: i64,
    pub y: Option<f64>,
}

/// Line chart points sorted by level.
pub fn line_series(records: &[LevelRecord]) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = records
        .iter()
        .map(|r| SeriesPoint {
            x: r.level,
            y: r.cumulative_experience,
        })
        .collect();
    points.sort_by_key(|p| p.x);
    points
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTitle {
    pub text: String,
}

impl ChartTitle {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Toggle {
    pub enabled: bool,
}

/// Gradient direction in chart-relative units (0..1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientVector {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearGradient {
    pub linear_gradient: GradientVector,
    pub stops: Vec<(f64, CssColor)>,
}

impl LinearGradient {
    /// Top-to-bottom gradient between two colors.
    pub fn vertical(top: CssColor, bottom: CssColor) -> Self {
        Self {
            linear_gradient: GradientVector {
                x1: 0.0,
                y1: 0.0,
                x2: 0.0,
                y2: 1.0,
            },
            stops: vec![(0.0, top), (1.0, bottom)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChartFrame {
    pub zoom_type: &'static str,
    pub panning: bool,
    pub pan_key: &'static str,
    pub background_color: LinearGradient,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub title: ChartTitle,
    pub allow_decimals: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub shared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: CssColor,
    pub data: Vec<SeriesPoint>,
}

/// Options for the cumulative experience line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChartOptions {
    pub chart: LineChartFrame,
    pub title: ChartTitle,
    pub subtitle: ChartTitle,
    pub credits: Toggle,
    pub legend: Toggle,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub tooltip: Tooltip,
    pub series: Vec<LineSeries>,
}

/// Line chart of cumulative experience per level.
///
/// The y-axis range comes from `cumulative`; it is left to the renderer
/// when the column has no numeric values.
pub fn line_chart_options(
    game: &GameData,
    cumulative: &ColumnStats,
) -> Result<LineChartOptions, DomainError> {
    let colors = &game.line_chart_configurations;
    let background = LinearGradient::vertical(
        CssColor::parse("backgroundColor", &colors.background_color)?,
        CssColor::parse("secondaryBackgroundColor", &colors.secondary_background_color)?,
    );
    let range = cumulative.range();

    Ok(LineChartOptions {
        chart: LineChartFrame {
            zoom_type: "x",
            panning: true,
            pan_key: "ctrl",
            background_color: background,
        },
        title: ChartTitle::new(format!(
            "{} - Cumulative Experience To Reach Level",
            game.game_name
        )),
        subtitle: ChartTitle::new(ZOOM_HINT),
        credits: Toggle { enabled: false },
        legend: Toggle { enabled: false },
        x_axis: Axis {
            title: ChartTitle::new("Level"),
            allow_decimals: false,
            min: Some(0.0),
            max: None,
        },
        y_axis: Axis {
            title: ChartTitle::new("Experience"),
            allow_decimals: true,
            min: range.map(|(min, _)| min),
            max: range.map(|(_, max)| max),
        },
        tooltip: Tooltip {
            shared: true,
            header_format: None,
            point_format: None,
        },
        series: vec![LineSeries {
            name: "EXP".to_string(),
            color: CssColor::parse("lineColor", &colors.line_color)?,
            data: line_series(&game.data),
        }],
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorVariation {
    pub key: &'static str,
    pub to: f64,
}

/// Styling for one sunburst ring (1 = innermost).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SunburstLevel {
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_is_constant: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<CssColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_variation: Option<ColorVariation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SunburstSeries {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub allow_traversing_tree: bool,
    pub data: Vec<HierarchyNode>,
    pub levels: Vec<SunburstLevel>,
}

/// Options for the experience-to-next-level sunburst chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstChartOptions {
    /// Palette; the first entry paints the center circle
    pub colors: Vec<CssColor>,
    pub title: ChartTitle,
    pub credits: Toggle,
    pub tooltip: Tooltip,
    pub series: Vec<SunburstSeries>,
}

/// Sunburst chart over an already built hierarchy.
pub fn sunburst_chart_options(
    game: &GameData,
    hierarchy: &Hierarchy,
) -> Result<SunburstChartOptions, DomainError> {
    let ring_color = CssColor::parse("sunburst color", &game.sunburst_chart_configurations.color)?;
    let center = CssColor::parse("center color", "transparent")?;

    let mut levels = vec![SunburstLevel {
        level: 1,
        level_is_constant: Some(false),
        color: Some(ring_color.clone()),
        color_variation: None,
    }];
    levels.extend((2..=4).map(|level| SunburstLevel {
        level,
        level_is_constant: None,
        color: None,
        color_variation: Some(ColorVariation {
            key: "brightness",
            to: SUNBURST_BRIGHTNESS_DROP,
        }),
    }));

    Ok(SunburstChartOptions {
        colors: vec![center, ring_color],
        title: ChartTitle::new(format!(
            "{} - Experience Needed For Next Level",
            game.game_name
        )),
        credits: Toggle { enabled: false },
        tooltip: Tooltip {
            shared: false,
            header_format: Some(String::new()),
            point_format: Some(SUNBURST_POINT_FORMAT.to_string()),
        },
        series: vec![SunburstSeries {
            kind: "sunburst",
            allow_traversing_tree: true,
            data: hierarchy.nodes.clone(),
            levels,
        }],
    })
}
