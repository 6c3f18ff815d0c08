//! Tests for command dispatch against an on-disk catalog

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use expcurve::cli::{run_command, CliError, Commands, ConfigCommands};
use expcurve::config::{local_config_path, Settings};
use expcurve::exitcode;
use expcurve::infrastructure::di::ServiceContainer;
use expcurve::infrastructure::traits::{RealFileSystem, SkimSelector};
use expcurve::util::testing;

const INDEX: &str = "data/LevelExperienceDataPaths.json";

fn setup_site(temp: &TempDir) -> PathBuf {
    let root = temp.path().join("site");
    std::fs::create_dir_all(root.join("data/games")).unwrap();
    let game = json!({
        "gameName": "Test Quest",
        "references": ["https://wiki.example/tq"],
        "sunburstChartConfigurations": {
            "color": "#41739D",
            "levels": [ { "parts": [ { "start": 1, "end": 3 } ] } ]
        },
        "data": [
            { "level": 1, "cumulativeExperience": 0, "experienceToNextLevel": 100 },
            { "level": 2, "cumulativeExperience": 100, "experienceToNextLevel": 150 },
            { "level": 3, "cumulativeExperience": 250 }
        ]
    });
    std::fs::write(root.join("data/games/tq.json"), game.to_string()).unwrap();
    std::fs::write(root.join("data/games/broken.json"), "not json").unwrap();
    std::fs::write(
        root.join(INDEX),
        r#"["data/games/tq.json", "data/games/broken.json"]"#,
    )
    .unwrap();
    root
}

fn container(root: &Path, pretty_json: bool) -> ServiceContainer {
    let mut settings = Settings {
        data_root: root.to_path_buf(),
        ..Settings::default()
    };
    settings.output.color = false;
    settings.output.pretty_json = pretty_json;
    ServiceContainer::with_deps(settings, Arc::new(RealFileSystem), Arc::new(SkimSelector))
}

#[test]
fn given_known_game_when_exporting_then_view_written_to_file() {
    // Arrange
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let root = setup_site(&temp);
    let target = temp.path().join("out/views/tq.json");
    let command = Commands::Export {
        game: "test quest".into(),
        output: Some(target.clone()),
    };

    // Act
    run_command(&command, &container(&root, false)).unwrap();

    // Assert
    let written = std::fs::read_to_string(&target).unwrap();
    assert_eq!(written.lines().count(), 1);
    let view: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(view["gameName"], json!("Test Quest"));
    assert_eq!(view["table"][2]["cells"][2]["text"], json!("-"));
}

#[test]
fn given_unknown_game_when_running_table_then_usage_exit_code() {
    let temp = TempDir::new().unwrap();
    let root = setup_site(&temp);

    let err = run_command(
        &Commands::Table {
            game: "Nope".into(),
        },
        &container(&root, true),
    )
    .unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
    assert_eq!(err.to_string(), "game not found: Nope");
}

#[test]
fn given_broken_game_when_listing_then_other_games_still_listed() {
    let temp = TempDir::new().unwrap();
    let root = setup_site(&temp);
    let container = container(&root, true);

    assert!(run_command(&Commands::Games, &container).is_ok());
    assert!(run_command(&Commands::References, &container).is_ok());
    assert!(run_command(&Commands::Tree { game: "0".into() }, &container).is_ok());
    assert!(run_command(&Commands::Table { game: "0".into() }, &container).is_ok());
}

#[test]
fn given_missing_index_when_running_games_then_noinput_exit_code() {
    let temp = TempDir::new().unwrap();

    let err = run_command(&Commands::Games, &container(temp.path(), true)).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_existing_local_config_when_init_without_force_then_usage_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let container = container(temp.path(), true);
    let init = |force| {
        run_command(
            &Commands::Config {
                command: ConfigCommands::Init { local: true, force },
            },
            &container,
        )
    };

    // Act
    init(false).unwrap();
    let second = init(false);
    let forced = init(true);

    // Assert
    let path = local_config_path(temp.path());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        Settings::template()
    );
    assert!(matches!(second, Err(CliError::Usage(_))));
    assert!(forced.is_ok());
}
