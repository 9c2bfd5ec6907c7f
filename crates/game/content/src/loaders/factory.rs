//! Content factory for building games from data files.

use std::path::{Path, PathBuf};

use board_core::{BoardDocument, EngineError, Game, GameConfig};

use crate::loaders::{BoardLoader, ConfigLoader, LoadResult};

/// Content factory that loads all board content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── boards/
///     ├── classic.json
///     └── tiny.json
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or the defaults when the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load a board from `boards/{board_name}.json`.
    pub fn load_board(&self, board_name: &str) -> LoadResult<BoardDocument> {
        let path = self
            .data_dir
            .join("boards")
            .join(format!("{}.json", board_name));
        BoardLoader::load(&path)
    }

    /// Builds a game from `config` and the named board.
    pub fn build_game(&self, config: GameConfig, board_name: &str) -> LoadResult<Game> {
        let document = self.load_board(board_name)?;
        Game::from_board(config, &document)
            .map_err(|e: EngineError| anyhow::anyhow!("Board {} rejected: {}", board_name, e))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
