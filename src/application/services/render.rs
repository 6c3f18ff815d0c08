//! Render service
//!
//! Turns one loaded game into everything a renderer needs: chart options,
//! the sunburst hierarchy and the formatted table.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    build_hierarchy, compute_stats, format_row, format_table, line_chart_options,
    sunburst_chart_options, ColumnStats, Diagnostic, GameData, Hierarchy, LineChartOptions,
    SunburstChartOptions, TableRow,
};

/// Render-ready data for one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub game_name: String,
    pub title_image_uri: String,
    /// Range of the line chart series
    pub cumulative_range: ColumnStats,
    /// Range of the sunburst slice values
    pub to_next_range: ColumnStats,
    pub line_chart: LineChartOptions,
    pub sunburst_chart: SunburstChartOptions,
    pub table: Vec<TableRow>,
    /// Orphaned sections and skipped leaves of the sunburst
    pub diagnostics: Vec<Diagnostic>,
}

/// One game's entry in the references list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub game_name: String,
    pub title_image_uri: String,
    pub references: Vec<String>,
}

/// Stateless service assembling views from game documents.
#[derive(Debug, Default)]
pub struct RenderService;

impl RenderService {
    pub fn new() -> Self {
        Self
    }

    /// Sunburst hierarchy for a game.
    pub fn hierarchy(&self, game: &GameData) -> Hierarchy {
        build_hierarchy(&game.sunburst_chart_configurations.levels, &game.data)
    }

    /// Formatted table rows for a game.
    pub fn table(&self, game: &GameData) -> Vec<TableRow> {
        format_table(&game.data)
    }

    /// Build the complete view. Fails only on colors a renderer cannot use.
    #[instrument(level = "debug", skip_all, fields(game = %game.game_name))]
    pub fn view(&self, game: &GameData) -> ApplicationResult<GameView> {
        let stats = compute_stats(&game.data);
        let hierarchy = self.hierarchy(game);
        debug!(
            "view: {} records, {} hierarchy nodes",
            game.data.len(),
            hierarchy.nodes.len()
        );

        let table = game
            .data
            .iter()
            .zip(stats.percent_delta.iter())
            .map(|(record, delta)| format_row(record, *delta, &stats))
            .collect();

        Ok(GameView {
            game_name: game.game_name.clone(),
            title_image_uri: game.title_image_uri.clone(),
            cumulative_range: stats.cumulative,
            to_next_range: stats.to_next,
            line_chart: line_chart_options(game, &stats.cumulative)?,
            sunburst_chart: sunburst_chart_options(game, &hierarchy)?,
            table,
            diagnostics: hierarchy.diagnostics,
        })
    }

    /// References of all games, in catalog order.
    pub fn references(&self, games: &[GameData]) -> Vec<ReferenceEntry> {
        games
            .iter()
            .map(|g| ReferenceEntry {
                game_name: g.game_name.clone(),
                title_image_uri: g.title_image_uri.clone(),
                references: g.references.clone(),
            })
            .collect()
    }
}
