//! Command dispatch: loads the catalog and prints what each subcommand asks for

use std::io;
use std::path::Path;

use clap::CommandFactory;
use colored::Colorize;
use itertools::Itertools;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::Catalog;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::format::thousands;
use crate::domain::table::COLUMN_HEADERS;
use crate::domain::{GameData, Hierarchy, TableRow};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::SelectionItem;
use crate::infrastructure::InfraError;

/// Parse-level entry point: load settings, wire services, run the subcommand.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    // completions need neither settings nor data
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.data_root.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);
    run_command(command, &container)
}

/// Run one subcommand against an already wired container.
pub fn run_command(command: &Commands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        Commands::Games => cmd_games(container),
        Commands::Select => cmd_select(container),
        Commands::Table { game } => cmd_table(container, game),
        Commands::Tree { game } => cmd_tree(container, game),
        Commands::Export { game, output } => cmd_export(container, game, output.as_deref()),
        Commands::References => cmd_references(container),
        Commands::Config { command } => cmd_config(container, command),
        Commands::Completion { .. } => Err(CliError::Usage(
            "completion is handled before settings are loaded".to_string(),
        )),
    }
}

/// Load the catalog, reporting each failed game document as a warning.
fn load_catalog(container: &ServiceContainer) -> CliResult<Catalog> {
    let settings = &container.settings;
    let catalog = container
        .catalog
        .load(&settings.data_root, &settings.index_path)?;
    for failure in &catalog.failures {
        output::warning(&format!(
            "skipped {}: {}",
            failure.path.display(),
            failure.message
        ));
    }
    Ok(catalog)
}

#[instrument(level = "debug", skip_all)]
fn cmd_games(container: &ServiceContainer) -> CliResult<()> {
    let catalog = load_catalog(container)?;
    if catalog.games.is_empty() {
        output::info("No games found");
        return Ok(());
    }
    for (index, game) in catalog.games.iter().enumerate() {
        output::info(&format!("{:>3}  {}", index, game.game_name));
    }
    Ok(())
}

#[instrument(level = "debug", skip_all)]
fn cmd_select(container: &ServiceContainer) -> CliResult<()> {
    let catalog = load_catalog(container)?;
    let items: Vec<SelectionItem> = catalog
        .games
        .iter()
        .enumerate()
        .map(|(index, game)| SelectionItem {
            display: game.game_name.clone(),
            value: index.to_string(),
        })
        .collect();

    let selected = container
        .selector
        .select_one(&items, "game> ")
        .map_err(|message| InfraError::Selector { message })?;

    let Some(item) = selected else {
        debug!("selection cancelled");
        return Ok(());
    };
    let game = catalog.resolve(&item.value)?;
    print_table(container, game);
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_table(container: &ServiceContainer, key: &str) -> CliResult<()> {
    let catalog = load_catalog(container)?;
    let game = catalog.resolve(key)?;
    print_table(container, game);
    Ok(())
}

fn print_table(container: &ServiceContainer, game: &GameData) {
    let rows = container.render.table(game);
    output::header(&game.game_name);
    output::info(&render_table(&rows, container.settings.output.color));
}

/// Terminal rendering of table rows, one line per level.
pub fn render_table(rows: &[TableRow], color: bool) -> String {
    let widths: Vec<usize> = COLUMN_HEADERS
        .iter()
        .enumerate()
        .map(|(column, header)| {
            rows.iter()
                .filter_map(|row| row.cells.get(column))
                .map(|cell| cell.text.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header = COLUMN_HEADERS
        .iter()
        .zip(&widths)
        .map(|(text, width)| format!(" {:>width$} ", text, width = width))
        .join("|");
    let rule = widths.iter().map(|w| "-".repeat(w + 2)).join("+");

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(if color { header.bold().to_string() } else { header });
    lines.push(rule);
    for row in rows {
        lines.push(
            row.cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| output::cell(&cell.text, *width, cell.fill, color).to_string())
                .join("|"),
        );
    }
    lines.join("\n")
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, key: &str) -> CliResult<()> {
    let catalog = load_catalog(container)?;
    let game = catalog.resolve(key)?;
    let hierarchy = container.render.hierarchy(game);

    output::info(&hierarchy_tree(&game.game_name, &hierarchy));
    for diagnostic in &hierarchy.diagnostics {
        output::warning(diagnostic);
    }
    Ok(())
}

/// Sunburst hierarchy as a terminal tree rooted at `title`.
pub fn hierarchy_tree(title: &str, hierarchy: &Hierarchy) -> Tree<String> {
    Tree::new(title.to_string()).with_leaves(subtrees(hierarchy, None))
}

fn subtrees(hierarchy: &Hierarchy, parent: Option<usize>) -> Vec<Tree<String>> {
    hierarchy
        .children_at(parent)
        .map(|(index, node)| {
            let label = match node.value {
                Some(value) => format!("Lv. {}: {} exp", node.label, thousands(value)),
                None => node.label.clone(),
            };
            Tree::new(label).with_leaves(subtrees(hierarchy, Some(index)))
        })
        .collect()
}

#[instrument(level = "debug", skip(container))]
fn cmd_export(container: &ServiceContainer, key: &str, target: Option<&Path>) -> CliResult<()> {
    let catalog = load_catalog(container)?;
    let game = catalog.resolve(key)?;
    let view = container.render.view(game)?;

    let json = if container.settings.output.pretty_json {
        serde_json::to_string_pretty(&view)
    } else {
        serde_json::to_string(&view)
    }
    .map_err(|e| InfraError::json(format!("encode view of {}", game.game_name), e))?;

    match target {
        Some(path) => {
            container
                .fs
                .ensure_parent(path)
                .and_then(|_| container.fs.write(path, &json))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Exported", &path.display());
        }
        None => output::info(&json),
    }
    Ok(())
}

#[instrument(level = "debug", skip_all)]
fn cmd_references(container: &ServiceContainer) -> CliResult<()> {
    let catalog = load_catalog(container)?;
    for entry in container.render.references(&catalog.games) {
        output::header(&entry.game_name);
        if entry.references.is_empty() {
            output::detail("(none)");
        }
        for reference in &entry.references {
            output::detail(reference);
        }
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::action("Global", "(no config directory)"),
            }
            output::action(
                "Local",
                &local_config_path(&container.settings.data_root).display(),
            );
            Ok(())
        }
        ConfigCommands::Init { local, force } => {
            let path = if *local {
                local_config_path(&container.settings.data_root)
            } else {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no config directory on this system, use --local".into())
                })?
            };
            if container.fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "{} exists, use --force to overwrite",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .and_then(|_| container.fs.write(&path, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created {}", path.display()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_hierarchy, format_table, LevelRecord, RangePart, RangeTier};

    #[test]
    fn given_rows_without_color_when_rendering_table_then_columns_align() {
        let rows = format_table(&[
            LevelRecord::new(1, Some(0.0), Some(100.0)),
            LevelRecord::new(2, Some(100.0), Some(150.0)),
        ]);

        let rendered = render_table(&rows, false);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Experience to Next Level"));
        assert!(lines[3].contains("50.000 %"));
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn given_nested_ranges_when_rendering_tree_then_leaves_sit_under_sections() {
        let tiers = vec![RangeTier::new(vec![RangePart::new(1, 2)])];
        let records = vec![
            LevelRecord::new(1, None, Some(100.0)),
            LevelRecord::new(2, None, Some(1500.0)),
        ];
        let hierarchy = build_hierarchy(&tiers, &records);

        let rendered = hierarchy_tree("Test Quest", &hierarchy).to_string();

        assert!(rendered.starts_with("Test Quest\n"));
        assert!(rendered.contains("1-2 [2]"));
        assert!(rendered.contains("Lv. 2: 1,500 exp"));
    }

    #[test]
    fn given_part_repeated_in_finer_tier_when_rendering_tree_then_nests_once() {
        // Arrange
        let tiers = vec![
            RangeTier::new(vec![RangePart::new(1, 10)]),
            RangeTier::new(vec![RangePart::new(1, 10)]),
        ];
        let records = vec![LevelRecord::new(1, Some(0.0), Some(100.0))];
        let hierarchy = build_hierarchy(&tiers, &records);

        // Act
        let rendered = hierarchy_tree("G", &hierarchy).to_string();

        // Assert
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4, "unexpected tree:\n{rendered}");
        assert_eq!(rendered.matches("1-10 [10]").count(), 2);
        assert_eq!(rendered.matches("Lv. 1: 100 exp").count(), 1);
        assert!(lines[3].ends_with("Lv. 1: 100 exp"));
    }
}
