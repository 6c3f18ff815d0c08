//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/expcurve/expcurve.toml`
//! 3. Local config: `<data_root>/.expcurve.toml`
//! 4. Environment variables: `EXPCURVE_*` prefix
//! 5. `--data-root` on the command line

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Terminal and export output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    /// Paint table cells with their heat-scale colors
    pub color: bool,
    /// Indent exported JSON
    pub pretty_json: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            pretty_json: true,
        }
    }
}

/// Raw output settings for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputSettings {
    pub color: Option<bool>,
    pub pretty_json: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_root: Option<PathBuf>,
    pub index_path: Option<PathBuf>,
    #[serde(default)]
    pub output: RawOutputSettings,
}

/// Unified configuration for expcurve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory that game document paths are resolved against (default: cwd)
    pub data_root: PathBuf,
    /// Index document listing the game documents, relative to `data_root`
    pub index_path: PathBuf,
    /// Output settings
    pub output: OutputSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("."),
            index_path: PathBuf::from("data/LevelExperienceDataPaths.json"),
            output: OutputSettings::default(),
        }
    }
}

/// Get the XDG config directory for expcurve.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "expcurve").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("expcurve.toml"))
}

/// Get the path to the local config file in a data root.
pub fn local_config_path(data_root: &Path) -> PathBuf {
    data_root.join(".expcurve.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path; unknown variables leave it as is.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.as_ref()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Full path of the index document.
    pub fn index_file(&self) -> PathBuf {
        self.data_root.join(&self.index_path)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_root = expand_path(&self.data_root);
        self.index_path = expand_path(&self.index_path);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_root: overlay
                .data_root
                .clone()
                .unwrap_or_else(|| self.data_root.clone()),
            index_path: overlay
                .index_path
                .clone()
                .unwrap_or_else(|| self.index_path.clone()),
            output: OutputSettings {
                color: overlay.output.color.unwrap_or(self.output.color),
                pretty_json: overlay.output.pretty_json.unwrap_or(self.output.pretty_json),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `data_root` - Optional data root from the command line; it selects
    ///   the local config file and overrides every other source.
    pub fn load(data_root: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), data_root)
    }

    /// [`Settings::load`] with an explicit global config location.
    pub fn load_from(
        global_path: Option<&Path>,
        data_root: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global) = global_path {
            if global.exists() {
                let raw = load_raw_settings(global)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config next to the data
        if let Some(root) = data_root {
            current.data_root = root.to_path_buf();
        }
        let local_path = local_config_path(&expand_path(&current.data_root));
        if local_path.exists() {
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        // 5. Command line
        if let Some(root) = data_root {
            current.data_root = root.to_path_buf();
        }

        current.expand_paths();
        Ok(current)
    }

    /// Apply EXPCURVE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("EXPCURVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_root") {
            settings.data_root = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("index_path") {
            settings.index_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("output.color") {
            settings.output.color = val;
        }
        if let Ok(val) = config.get_bool("output.pretty_json") {
            settings.output.pretty_json = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# expcurve configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/expcurve/expcurve.toml
#   Local:  <data_root>/.expcurve.toml
#   Env:    EXPCURVE_* environment variables (EXPCURVE_OUTPUT__COLOR=false)
#   CLI:    --data-root

# Directory game document paths are resolved against
# data_root = "."

# Index document listing game documents, relative to data_root
# index_path = "data/LevelExperienceDataPaths.json"

[output]
# Paint table cells with heat-scale background colors
# color = true

# Indent exported JSON
# pretty_json = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_no_config_files_when_loading_then_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load_from(None, Some(temp.path())).expect("load defaults");

        assert_eq!(settings.data_root, temp.path());
        assert_eq!(
            settings.index_path,
            PathBuf::from("data/LevelExperienceDataPaths.json")
        );
        assert!(settings.output.pretty_json);
    }

    #[test]
    fn given_tilde_in_data_root_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_root: PathBuf::from("~/games"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let root = settings.data_root.to_string_lossy();
        assert!(root.starts_with(&home), "data_root should start with home: {root}");
        assert!(!root.contains('~'));
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            data_root: None,
            index_path: Some(PathBuf::from("index.json")),
            output: RawOutputSettings {
                color: Some(false),
                pretty_json: None,
            },
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.data_root, PathBuf::from("."));
        assert_eq!(merged.index_path, PathBuf::from("index.json"));
        assert!(!merged.output.color);
        assert!(merged.output.pretty_json);
    }

    #[test]
    fn given_settings_when_index_file_then_joins_root_and_index() {
        let settings = Settings {
            data_root: PathBuf::from("/srv/site"),
            ..Settings::default()
        };
        assert_eq!(
            settings.index_file(),
            PathBuf::from("/srv/site/data/LevelExperienceDataPaths.json")
        );
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.data_root.is_none());
    }
}
