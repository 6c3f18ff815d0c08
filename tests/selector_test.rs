//! Tests for the Selector trait and the interactive game picker workflow

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use expcurve::application::services::CatalogService;
use expcurve::cli::{run_command, CliError, Commands};
use expcurve::config::Settings;
use expcurve::exitcode;
use expcurve::infrastructure::di::ServiceContainer;
use expcurve::infrastructure::traits::{RealFileSystem, SelectionItem, Selector};

/// Mock selector that returns a predetermined selection
struct MockSelector {
    selection_index: Option<usize>,
}

impl MockSelector {
    fn new(selection_index: Option<usize>) -> Self {
        Self { selection_index }
    }
}

impl Selector for MockSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        _prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        match self.selection_index {
            Some(idx) if idx < items.len() => Ok(Some(items[idx].clone())),
            Some(_) => Err("Index out of bounds".to_string()),
            None => Ok(None), // User cancelled
        }
    }
}

fn write_catalog(root: &Path, names: &[&str]) {
    let games = root.join("data/games");
    std::fs::create_dir_all(&games).unwrap();
    let mut index = Vec::new();
    for name in names {
        let file = format!("{}.json", name.to_lowercase());
        let doc = json!({
            "gameName": name,
            "data": [ { "level": 1, "cumulativeExperience": 0, "experienceToNextLevel": 10 } ]
        });
        std::fs::write(games.join(&file), doc.to_string()).unwrap();
        index.push(format!("data/games/{file}"));
    }
    std::fs::write(
        root.join("data/LevelExperienceDataPaths.json"),
        serde_json::to_string(&index).unwrap(),
    )
    .unwrap();
}

fn container(root: &Path, selector: MockSelector) -> ServiceContainer {
    let settings = Settings {
        data_root: root.to_path_buf(),
        ..Settings::default()
    };
    ServiceContainer::with_deps(settings, Arc::new(RealFileSystem), Arc::new(selector))
}

#[test]
fn given_catalog_when_building_items_then_display_name_and_position_value() {
    // Arrange
    let temp = TempDir::new().unwrap();
    write_catalog(temp.path(), &["Zeta", "Alpha"]);
    let service = CatalogService::new(Arc::new(RealFileSystem));
    let selector = MockSelector::new(Some(1));

    // Act
    let catalog = service
        .load(temp.path(), Path::new("data/LevelExperienceDataPaths.json"))
        .unwrap();
    let items: Vec<SelectionItem> = catalog
        .games
        .iter()
        .enumerate()
        .map(|(i, g)| SelectionItem {
            display: g.game_name.clone(),
            value: i.to_string(),
        })
        .collect();
    let selected = selector.select_one(&items, "game> ").unwrap().unwrap();

    // Assert
    assert_eq!(selected.display, "Zeta");
    assert_eq!(catalog.resolve(&selected.value).unwrap().game_name, "Zeta");
}

#[test]
fn given_user_cancels_when_selecting_then_command_succeeds_quietly() {
    let temp = TempDir::new().unwrap();
    write_catalog(temp.path(), &["Alpha"]);
    let container = container(temp.path(), MockSelector::new(None));

    let result = run_command(&Commands::Select, &container);

    assert!(result.is_ok());
}

#[test]
fn given_selection_when_running_select_then_table_printed_without_error() {
    let temp = TempDir::new().unwrap();
    write_catalog(temp.path(), &["Alpha", "Beta"]);
    let container = container(temp.path(), MockSelector::new(Some(0)));

    let result = run_command(&Commands::Select, &container);

    assert!(result.is_ok());
}

#[test]
fn given_failing_selector_when_running_select_then_software_error() {
    let temp = TempDir::new().unwrap();
    write_catalog(temp.path(), &["Alpha"]);
    let container = container(temp.path(), MockSelector::new(Some(5)));

    let err = run_command(&Commands::Select, &container).unwrap_err();

    assert!(matches!(err, CliError::Infra(_)));
    assert_eq!(err.exit_code(), exitcode::SOFTWARE);
}
