//! Typed views of the entities stored in the [`EntityStore`](crate::ecs::EntityStore).
//!
//! Each type's serde representation uses the field names of its registered
//! association, so `store.insert(&value)` and `store.construct_as::<T>(id)`
//! convert between the typed view and raw components.
mod board;
mod tile;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ecs::{Associated, DomainType, EntityId};
use crate::script::Script;

pub use board::{BoardDocument, BoardProperties};
pub use tile::{
    ActionTile, BuyableTile, ChestTile, CompanyTile, PlainTile, PropertyTile, TaxTile, Tile,
    TileKind,
};

/// An amount a player still owes. `creditor: None` is the bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub creditor: Option<EntityId>,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Free-form player data (`jailed`, `character.color`, ...).
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub balance: i64,
    #[serde(default)]
    pub position: usize,
    /// Outstanding debts, settled front to back.
    #[serde(default)]
    pub debts: Vec<Debt>,
}

impl Player {
    pub fn new(name: impl Into<String>, balance: i64, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
            balance,
            position: 0,
            debts: Vec::new(),
        }
    }

    pub fn total_debt(&self) -> i64 {
        self.debts.iter().map(|debt| debt.amount).sum()
    }
}

impl Associated for Player {
    const TYPE: DomainType = DomainType::Player;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Display text, rendered with the same `$variable` binding as scripts.
    pub text: String,
    pub script: Script,
}

impl Associated for Card {
    const TYPE: DomainType = DomainType::Card;
}

/// Card pool of a loot table. `cards` index the board's card list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootData {
    pub cards: Vec<usize>,
    pub weights: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub name: String,
    pub data: LootData,
}

impl LootTable {
    /// Draws a card index with probability proportional to its weight.
    ///
    /// Returns `None` when the weights are empty, all zero or invalid, or
    /// when the drawn slot has no card.
    pub fn choice<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let distribution = WeightedIndex::new(&self.data.weights).ok()?;
        self.data.cards.get(distribution.sample(rng)).copied()
    }
}

impl Associated for LootTable {
    const TYPE: DomainType = DomainType::LootTable;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Industry {
    pub name: String,
    pub method: String,
    pub base: Value,
    #[serde(default)]
    pub modifier: Vec<Value>,
}

impl Associated for Industry {
    const TYPE: DomainType = DomainType::Industry;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
}

impl Associated for Group {
    const TYPE: DomainType = DomainType::Group;
}
