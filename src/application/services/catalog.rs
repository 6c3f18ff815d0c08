//! Game catalog service
//!
//! Reads the index document, then every game document it lists. Game
//! documents are read in parallel; each read succeeds or fails on its own,
//! and the catalog is sorted exactly once after all reads have finished.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, error, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, JsonResultExt};
use crate::domain::GameData;
use crate::infrastructure::traits::FileSystem;

/// A game document that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// All successfully loaded games, sorted by name, plus what failed.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub games: Vec<GameData>,
    pub failures: Vec<LoadFailure>,
}

impl Catalog {
    /// Case-insensitive lookup by game name.
    pub fn find(&self, name: &str) -> Option<&GameData> {
        let wanted = name.trim();
        self.games
            .iter()
            .find(|g| g.game_name.eq_ignore_ascii_case(wanted))
    }

    /// Lookup by catalog position (as listed by `games`).
    pub fn get(&self, index: usize) -> Option<&GameData> {
        self.games.get(index)
    }

    /// Lookup by position or name, whichever `key` parses as.
    pub fn resolve(&self, key: &str) -> ApplicationResult<&GameData> {
        let by_index = key.trim().parse::<usize>().ok().and_then(|i| self.get(i));
        by_index
            .or_else(|| self.find(key))
            .ok_or_else(|| ApplicationError::GameNotFound(key.to_string()))
    }
}

/// Service for loading game documents.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read the index document: a JSON array of game document paths.
    #[instrument(level = "debug", skip(self))]
    pub fn read_index(&self, index_path: &Path) -> ApplicationResult<Vec<String>> {
        if !self.fs.exists(index_path) {
            return Err(ApplicationError::IndexNotFound(index_path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(index_path)
            .with_path_context("read index document", index_path)?;
        let paths: Vec<String> =
            serde_json::from_str(&content).with_path_context("parse index document", index_path)?;
        debug!("read_index: {} game documents listed", paths.len());
        Ok(paths)
    }

    /// Read, parse and validate one game document.
    pub fn load_game(&self, path: &Path) -> ApplicationResult<GameData> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read game document", path)?;
        let game: GameData =
            serde_json::from_str(&content).with_path_context("parse game document", path)?;
        game.validate()?;
        Ok(game)
    }

    /// Load every game listed in the index.
    ///
    /// Index entries are resolved against `data_root`. A failing game is
    /// logged and reported in [`Catalog::failures`]; it never blocks the
    /// others. Only a missing or malformed index fails the whole load.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, data_root: &Path, index_path: &Path) -> ApplicationResult<Catalog> {
        let index = self.read_index(&data_root.join(index_path))?;
        let paths: Vec<PathBuf> = index.iter().map(|p| data_root.join(p)).collect();

        let outcomes: Vec<(PathBuf, ApplicationResult<GameData>)> = paths
            .into_par_iter()
            .map(|path| {
                let outcome = self.load_game(&path);
                (path, outcome)
            })
            .collect();

        let mut catalog = Catalog::default();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(game) => catalog.games.push(game),
                Err(e) => {
                    error!("failed to load {}: {}", path.display(), e);
                    catalog.failures.push(LoadFailure {
                        message: failure_message(&e),
                        path,
                    });
                }
            }
        }

        // stable: equal names keep index order
        catalog.games.sort_by(|a, b| a.game_name.cmp(&b.game_name));
        info!(
            loaded = catalog.games.len(),
            failed = catalog.failures.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

/// Error text including its source chain.
fn failure_message(e: &ApplicationError) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
