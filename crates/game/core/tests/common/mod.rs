//! Board fixtures shared by the scenario tests.
#![allow(dead_code)]

use board_core::{BoardDocument, Game, GameConfig};
use serde_json::{Value, json};

/// Builds square boards of plain tiles, with individual tiles replaced.
pub struct BoardBuilder {
    dimension: usize,
    tiles: Vec<Value>,
    cards: Vec<Value>,
    loot_tables: Vec<Value>,
    groups: Vec<Value>,
}

impl BoardBuilder {
    /// A board whose first tile is `Go` and every other tile is blank.
    pub fn new(dimension: usize) -> Self {
        let count = 4 * (dimension - 1);
        let tiles = (0..count)
            .map(|i| if i == 0 { plain("Go") } else { plain(&format!("Blank {i}")) })
            .collect();

        Self {
            dimension,
            tiles,
            cards: Vec::new(),
            loot_tables: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn tile(mut self, position: usize, tile: Value) -> Self {
        self.tiles[position] = tile;
        self
    }

    pub fn card(mut self, text: &str, script: Value) -> Self {
        self.cards.push(json!({ "text": text, "script": script }));
        self
    }

    pub fn loot_table(mut self, name: &str, cards: &[usize], weights: &[f64]) -> Self {
        self.loot_tables.push(json!({
            "name": name,
            "data": { "cards": cards, "weights": weights },
        }));
        self
    }

    pub fn group(mut self, label: &str) -> Self {
        self.groups.push(json!({ "label": label }));
        self
    }

    /// Drops the last tile, producing a board with the wrong tile count.
    pub fn without_last_tile(mut self) -> Self {
        self.tiles.pop();
        self
    }

    pub fn with_extra_tile(mut self) -> Self {
        self.tiles.push(plain("Extra"));
        self
    }

    pub fn build(self) -> BoardDocument {
        serde_json::from_value(json!({
            "lootTables": self.loot_tables,
            "cards": self.cards,
            "industries": [],
            "groups": self.groups,
            "tiles": self.tiles,
            "properties": { "dimension": self.dimension, "name": "test" },
        }))
        .expect("fixture board deserializes")
    }
}

pub fn plain(label: &str) -> Value {
    json!({ "type": "Blank", "label": label })
}

pub fn jail() -> Value {
    json!({ "type": "Jail", "label": "Jail" })
}

pub fn property(label: &str, price: i64, group: &str, rent: &[i64]) -> Value {
    json!({
        "type": "Property",
        "label": label,
        "price": price,
        "group": group,
        "rent": rent,
    })
}

pub fn action(label: &str, events: Value) -> Value {
    json!({ "type": "Action", "label": label, "events": events })
}

pub fn chest(label: &str, table: &str) -> Value {
    json!({ "type": "Chest", "label": label, "table": table })
}

pub fn tax(label: &str, method: &str, price: i64) -> Value {
    json!({ "type": "Tax", "label": label, "method": method, "price": price })
}

/// Deterministic configuration: fixed seat order and seed.
pub fn config() -> GameConfig {
    GameConfig {
        randomize_order: false,
        ..GameConfig::with_seed(7)
    }
}

pub fn game(board: &BoardDocument) -> Game {
    Game::from_board(config(), board).expect("fixture board loads")
}

pub fn game_with(config: GameConfig, board: &BoardDocument) -> Game {
    Game::from_board(config, board).expect("fixture board loads")
}
