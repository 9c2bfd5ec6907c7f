use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display};

use crate::ecs::{Associated, DomainType, EntityId, EntityStore, StoreError};
use crate::script::TileEvents;

/// Tile variant tag used to look up land and pass behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum TileKind {
    Plain,
    Action,
    Chest,
    Buyable,
    Company,
    Property,
    Tax,
}

impl TileKind {
    pub const fn from_type(ty: DomainType) -> Option<Self> {
        Some(match ty {
            DomainType::Tile => Self::Plain,
            DomainType::ActionTile => Self::Action,
            DomainType::ChestTile => Self::Chest,
            DomainType::BuyableTile => Self::Buyable,
            DomainType::CompanyTile => Self::Company,
            DomainType::PropertyTile => Self::Property,
            DomainType::TaxTile => Self::Tax,
            _ => return None,
        })
    }

    /// Whether tiles of this kind can be owned.
    pub const fn is_buyable(self) -> bool {
        matches!(self, Self::Buyable | Self::Company | Self::Property)
    }
}

/// A tile with no behaviour of its own (`Go`, `Jail`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainTile {
    #[serde(rename = "type")]
    pub tag: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTile {
    #[serde(rename = "type")]
    pub tag: String,
    pub label: String,
    #[serde(default)]
    pub events: Option<TileEvents>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestTile {
    #[serde(rename = "type")]
    pub tag: String,
    pub label: String,
    /// Loot table entity.
    pub table: EntityId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyableTile {
    #[serde(rename = "type")]
    pub tag: String,
    pub label: String,
    #[serde(default)]
    pub owner: Option<EntityId>,
    pub price: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyTile {
    #[serde(rename = "type")]
    pub tag: String,
    pub label: String,
    #[serde(default)]
    pub owner: Option<EntityId>,
    pub price: i64,
    pub industry: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTile {
    #[serde(rename = "type")]
    pub tag: String,
    pub label: String,
    #[serde(default)]
    pub owner: Option<EntityId>,
    pub price: i64,
    pub group: String,
    /// Rent per development level.
    pub rent: Vec<i64>,
    #[serde(default)]
    pub level: usize,
}

impl PropertyTile {
    /// Rent due at the current level; the top rung applies past the ladder.
    pub fn current_rent(&self) -> i64 {
        self.rent
            .get(self.level)
            .or(self.rent.last())
            .copied()
            .unwrap_or_default()
    }

    pub fn max_level(&self) -> usize {
        self.rent.len().saturating_sub(1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTile {
    #[serde(rename = "type")]
    pub tag: String,
    pub label: String,
    /// `"percent"` taxes `price`% of the balance, anything else is flat.
    pub method: String,
    pub price: i64,
}

impl TaxTile {
    pub fn amount(&self, balance: i64) -> i64 {
        if self.method == "percent" {
            balance.max(0) * self.price / 100
        } else {
            self.price
        }
    }
}

macro_rules! associated {
    ($($ty:ident => $domain:ident),* $(,)?) => {
        $(impl Associated for $ty {
            const TYPE: DomainType = DomainType::$domain;
        })*
    };
}

associated! {
    PlainTile => Tile,
    ActionTile => ActionTile,
    ChestTile => ChestTile,
    BuyableTile => BuyableTile,
    CompanyTile => CompanyTile,
    PropertyTile => PropertyTile,
    TaxTile => TaxTile,
}

/// Typed view of any board tile.
#[derive(Clone, Debug, PartialEq)]
pub enum Tile {
    Plain(PlainTile),
    Action(ActionTile),
    Chest(ChestTile),
    Buyable(BuyableTile),
    Company(CompanyTile),
    Property(PropertyTile),
    Tax(TaxTile),
}

impl Tile {
    /// Rebuilds the typed view of tile `id`.
    pub fn load(store: &EntityStore, id: EntityId) -> Result<Self, StoreError> {
        let mask = store.mask(id);
        let ty = store
            .type_of(id)
            .ok_or(StoreError::TypeResolution { id, mask })?;

        Ok(match TileKind::from_type(ty) {
            Some(TileKind::Plain) => Self::Plain(store.construct_as(id)?),
            Some(TileKind::Action) => Self::Action(store.construct_as(id)?),
            Some(TileKind::Chest) => Self::Chest(store.construct_as(id)?),
            Some(TileKind::Buyable) => Self::Buyable(store.construct_as(id)?),
            Some(TileKind::Company) => Self::Company(store.construct_as(id)?),
            Some(TileKind::Property) => Self::Property(store.construct_as(id)?),
            Some(TileKind::Tax) => Self::Tax(store.construct_as(id)?),
            None => {
                return Err(StoreError::TypeMismatch {
                    id,
                    expected: DomainType::Tile,
                    found: ty,
                });
            }
        })
    }

    pub fn kind(&self) -> TileKind {
        match self {
            Self::Plain(_) => TileKind::Plain,
            Self::Action(_) => TileKind::Action,
            Self::Chest(_) => TileKind::Chest,
            Self::Buyable(_) => TileKind::Buyable,
            Self::Company(_) => TileKind::Company,
            Self::Property(_) => TileKind::Property,
            Self::Tax(_) => TileKind::Tax,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Plain(t) => &t.label,
            Self::Action(t) => &t.label,
            Self::Chest(t) => &t.label,
            Self::Buyable(t) => &t.label,
            Self::Company(t) => &t.label,
            Self::Property(t) => &t.label,
            Self::Tax(t) => &t.label,
        }
    }

    /// Owner of a buyable tile.
    pub fn owner(&self) -> Option<EntityId> {
        match self {
            Self::Buyable(t) => t.owner,
            Self::Company(t) => t.owner,
            Self::Property(t) => t.owner,
            _ => None,
        }
    }

    /// Purchase price of a buyable tile.
    pub fn price(&self) -> Option<i64> {
        match self {
            Self::Buyable(t) => Some(t.price),
            Self::Company(t) => Some(t.price),
            Self::Property(t) => Some(t.price),
            _ => None,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_typed_views_by_mask() {
        let mut store = EntityStore::new();
        let property = store
            .create_entity(
                Some(&json!({
                    "type": "Property",
                    "label": "Paris",
                    "price": 400,
                    "group": "France",
                    "rent": [50, 200],
                })),
                Some(DomainType::PropertyTile),
            )
            .unwrap();
        let action = store
            .create_entity(
                Some(&json!({ "type": "Action", "label": "Go To Jail" })),
                Some(DomainType::ActionTile),
            )
            .unwrap();

        let tile = Tile::load(&store, property).unwrap();
        assert_eq!(tile.kind(), TileKind::Property);
        assert_eq!(tile.owner(), None);
        assert_eq!(tile.price(), Some(400));
        assert_eq!(tile.to_string(), "Property(Paris)");

        let Tile::Action(action) = Tile::load(&store, action).unwrap() else {
            panic!("expected an action tile");
        };
        assert_eq!(action.events, None);
    }

    #[test]
    fn rent_and_tax_amounts() {
        let property = PropertyTile {
            tag: "Property".into(),
            label: "Paris".into(),
            owner: None,
            price: 400,
            group: "France".into(),
            rent: vec![50, 200, 600],
            level: 1,
        };
        assert_eq!(property.current_rent(), 200);
        assert_eq!(property.max_level(), 2);

        let mut tax = TaxTile {
            tag: "Tax".into(),
            label: "Income Tax".into(),
            method: "percent".into(),
            price: 10,
        };
        assert_eq!(tax.amount(1500), 150);
        tax.method = "flat".into();
        assert_eq!(tax.amount(1500), 10);
    }
}
