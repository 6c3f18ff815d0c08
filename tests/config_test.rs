//! Tests for layered settings loading
//!
//! Precedence: defaults < global file < local file < env < --data-root

use std::path::PathBuf;

use tempfile::TempDir;

use expcurve::application::ApplicationError;
use expcurve::config::{local_config_path, Settings};

fn write(path: &std::path::Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn given_global_and_local_files_when_loading_then_local_wins_per_field() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let global = temp.path().join("xdg/expcurve/expcurve.toml");
    let site = temp.path().join("site");
    write(
        &global,
        "index_path = \"global-index.json\"\n[output]\ncolor = false\npretty_json = false\n",
    );
    write(
        &local_config_path(&site),
        "index_path = \"local-index.json\"\n[output]\npretty_json = true\n",
    );

    // Act
    let settings = Settings::load_from(Some(&global), Some(&site)).unwrap();

    // Assert
    assert_eq!(settings.data_root, site);
    assert_eq!(settings.index_path, PathBuf::from("local-index.json"));
    assert!(!settings.output.color);
    assert!(settings.output.pretty_json);
    assert_eq!(settings.index_file(), site.join("local-index.json"));
}

#[test]
fn given_data_root_in_global_file_when_loading_then_local_file_found_there() {
    let temp = TempDir::new().unwrap();
    let site = temp.path().join("site");
    let global = temp.path().join("expcurve.toml");
    write(&global, &format!("data_root = {:?}\n", site.to_string_lossy()));
    write(&local_config_path(&site), "index_path = \"idx.json\"\n");

    let settings = Settings::load_from(Some(&global), None).unwrap();

    assert_eq!(settings.data_root, site);
    assert_eq!(settings.index_path, PathBuf::from("idx.json"));
}

#[test]
fn given_data_root_in_local_file_when_cli_overrides_then_cli_wins() {
    let temp = TempDir::new().unwrap();
    write(
        &local_config_path(temp.path()),
        "data_root = \"/somewhere/else\"\n",
    );

    let settings = Settings::load_from(None, Some(temp.path())).unwrap();

    assert_eq!(settings.data_root, temp.path());
}

#[test]
fn given_missing_global_file_when_loading_then_defaults() {
    let temp = TempDir::new().unwrap();

    let settings =
        Settings::load_from(Some(&temp.path().join("absent.toml")), Some(temp.path())).unwrap();

    assert_eq!(
        settings,
        Settings {
            data_root: temp.path().to_path_buf(),
            ..Settings::default()
        }
    );
}

#[test]
fn given_malformed_local_file_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();
    write(&local_config_path(temp.path()), "index_path = [unclosed\n");

    let err = Settings::load_from(None, Some(temp.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains(".expcurve.toml"));
}

#[test]
fn given_settings_when_showing_toml_then_parses_back() {
    let settings = Settings {
        data_root: PathBuf::from("/srv/site"),
        ..Settings::default()
    };

    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();

    assert_eq!(parsed, settings);
    assert!(text.contains("[output]"));
}
