use serde_json::Value;
use tracing::{info, warn};

use crate::ecs::{Component, DomainType, EntityId, Registry};
use crate::error::GameError;
use crate::types::{BoardDocument, LootTable, Tile};

use super::{Board, BoardError, EngineError, Game};

impl Game {
    /// Creates a game and populates it from a board document.
    pub fn from_board(
        config: crate::config::GameConfig,
        document: &BoardDocument,
    ) -> Result<Self, EngineError> {
        let mut game = Self::new(config);
        game.load(document)?;
        Ok(game)
    }

    /// Populates the store from a board document.
    ///
    /// Entities are created in document order: loot tables, cards,
    /// industries, groups, then tiles. Tile count, tile tags, chest table
    /// names and loot table card references are checked before anything is
    /// stored. Every tile must also rebuild into its typed view. On any
    /// failure the store is left as it was before the call.
    pub fn load(&mut self, document: &BoardDocument) -> Result<(), EngineError> {
        if !self.board.tiles.is_empty() {
            return Err(BoardError::AlreadyLoaded.into());
        }
        validate(document)?;

        let snapshot = self.store.clone();
        match self.populate(document) {
            Ok(board) => {
                info!(
                    target: "core::game",
                    tiles = board.tiles.len(),
                    cards = board.cards.len(),
                    loot_tables = board.loot_tables.len(),
                    dimension = board.dimension,
                    "board loaded"
                );
                self.board = board;
                Ok(())
            }
            Err(err) => {
                warn!(target: "core::game", code = err.error_code(), %err, "board rejected");
                self.store = snapshot;
                Err(err)
            }
        }
    }

    fn populate(&mut self, document: &BoardDocument) -> Result<Board, EngineError> {
        let mut board = Board {
            dimension: document.properties.dimension,
            ..Board::default()
        };

        board.loot_tables = self.create_all(&document.loot_tables, DomainType::LootTable)?;
        board.cards = self.create_all(&document.cards, DomainType::Card)?;
        board.industries = self.create_all(&document.industries, DomainType::Industry)?;
        board.groups = self.create_all(&document.groups, DomainType::Group)?;

        for (index, raw) in document.tiles.iter().enumerate() {
            let tag = tile_tag(raw, index)?;
            let ty = Registry::tile_type(tag);

            let data = match ty {
                DomainType::ChestTile => self.bind_loot_table(raw, index, &board.loot_tables)?,
                _ => raw.clone(),
            };
            let id = self.store.create_entity(Some(&data), Some(ty))?;
            Tile::load(&self.store, id)?;
            board.tiles.push(id);
        }

        Ok(board)
    }

    fn create_all(&mut self, entries: &[Value], ty: DomainType) -> Result<Vec<EntityId>, EngineError> {
        entries
            .iter()
            .map(|data| Ok(self.store.create_entity(Some(data), Some(ty))?))
            .collect()
    }

    /// Replaces a chest tile's loot table name with the table's entity id.
    fn bind_loot_table(
        &self,
        raw: &Value,
        index: usize,
        tables: &[EntityId],
    ) -> Result<Value, EngineError> {
        let name = raw.get("table").and_then(Value::as_str).unwrap_or_default();
        let table = tables
            .iter()
            .find(|id| self.store.get_str(Component::Text, **id) == Some(name))
            .ok_or_else(|| BoardError::UnknownLootTable {
                index,
                name: name.to_string(),
            })?;

        let mut data = raw.clone();
        if let Some(object) = data.as_object_mut() {
            object.insert("table".into(), Value::from(table.0));
        }
        Ok(data)
    }
}

fn tile_tag(raw: &Value, index: usize) -> Result<&str, BoardError> {
    raw.get("type")
        .and_then(Value::as_str)
        .ok_or(BoardError::MissingTileType { index })
}

/// Checks the perimeter tile count, tile tags, chest table names and loot
/// table card references.
fn validate(document: &BoardDocument) -> Result<(), BoardError> {
    let count = document.tiles.len();
    let expected = document.properties.expected_tiles();
    if document.properties.dimension < 2 || count != expected {
        return Err(BoardError::TileCount {
            count,
            dimension: document.properties.dimension,
            expected,
        });
    }

    let table_names: Vec<&str> = document
        .loot_tables
        .iter()
        .filter_map(|raw| raw.get("name").and_then(Value::as_str))
        .collect();

    for (index, raw) in document.tiles.iter().enumerate() {
        let tag = tile_tag(raw, index)?;
        if Registry::tile_type(tag) != DomainType::ChestTile {
            continue;
        }
        let name = raw.get("table").and_then(Value::as_str).unwrap_or_default();
        if !table_names.contains(&name) {
            return Err(BoardError::UnknownLootTable {
                index,
                name: name.to_string(),
            });
        }
    }

    for raw in &document.loot_tables {
        // tables that do not parse fail when drawn from
        let Ok(table) = serde_json::from_value::<LootTable>(raw.clone()) else {
            continue;
        };
        if let Some(&card) = table.data.cards.iter().find(|&&card| card >= document.cards.len()) {
            return Err(BoardError::UnknownCard {
                table: table.name,
                card,
            });
        }
    }

    Ok(())
}
