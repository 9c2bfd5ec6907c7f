//! Board document loader.
//!
//! Loads the JSON board layout: tiles in perimeter order plus the cards,
//! loot tables, industries and groups they reference. Structural checks
//! (tile count, table references) run when the engine loads the document.

use std::path::Path;

use board_core::BoardDocument;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Loader for board documents from JSON files.
pub struct BoardLoader;

impl BoardLoader {
    /// Load a board document from a JSON file.
    pub fn load(path: &Path) -> LoadResult<BoardDocument> {
        let content = read_file(path)?;
        let document = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))?;

        debug!(
            target: "content::board",
            path = %path.display(),
            tiles = document.tiles.len(),
            dimension = document.properties.dimension,
            "board document read"
        );
        Ok(document)
    }

    /// Parse a board document from JSON text.
    pub fn parse(content: &str) -> LoadResult<BoardDocument> {
        serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse board JSON: {}", e))
    }
}
