//! Static field-to-component associations for every domain type.
//!
//! The registry is the single place that knows which component pool backs
//! which field of which type. It is built once when a store is created and
//! checked for mask uniqueness, so that an entity's mask identifies its type.

use std::collections::HashMap;

use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::error;

use super::{Component, ComponentMask};

/// Every domain type that can be stored in the entity store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString)]
pub enum DomainType {
    LootTable,
    Card,
    Industry,
    Group,
    Player,
    Tile,
    ActionTile,
    ChestTile,
    BuyableTile,
    CompanyTile,
    PropertyTile,
    TaxTile,
}

impl DomainType {
    /// Returns true for the tile family.
    pub const fn is_tile(self) -> bool {
        matches!(
            self,
            Self::Tile
                | Self::ActionTile
                | Self::ChestTile
                | Self::BuyableTile
                | Self::CompanyTile
                | Self::PropertyTile
                | Self::TaxTile
        )
    }
}

/// Literal written when an associated object omits a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldDefault {
    Null,
    Zero,
    EmptyList,
}

impl FieldDefault {
    pub fn value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Zero => Value::from(0),
            Self::EmptyList => Value::Array(Vec::new()),
        }
    }
}

/// One `(component kind, field name, optional default)` row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldAssociation {
    pub component: Component,
    pub field: &'static str,
    pub default: Option<FieldDefault>,
}

const fn field(component: Component, field: &'static str) -> FieldAssociation {
    FieldAssociation {
        component,
        field,
        default: None,
    }
}

const fn field_or(
    component: Component,
    field: &'static str,
    default: FieldDefault,
) -> FieldAssociation {
    FieldAssociation {
        component,
        field,
        default: Some(default),
    }
}

/// Registered layout of one domain type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeEntry {
    pub ty: DomainType,
    /// Additional names accepted by selectors, e.g. the board tag `Property`.
    pub aliases: &'static [&'static str],
    pub fields: &'static [FieldAssociation],
    pub mask: ComponentMask,
}

impl TypeEntry {
    pub fn new(
        ty: DomainType,
        aliases: &'static [&'static str],
        fields: &'static [FieldAssociation],
    ) -> Self {
        let mask = fields
            .iter()
            .fold(ComponentMask::empty(), |mask, f| mask | f.component.mask());
        Self {
            ty,
            aliases,
            fields,
            mask,
        }
    }

    /// Looks up the association for a field name.
    pub fn field(&self, name: &str) -> Option<&FieldAssociation> {
        self.fields.iter().find(|f| f.field == name)
    }

    /// Returns true if `name` is the type name or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.ty.as_ref() == name || self.aliases.contains(&name)
    }
}

// ============================================================================
// Association table
// ============================================================================

use Component as C;
use FieldDefault as D;

const LOOT_TABLE: &[FieldAssociation] = &[field(C::Text, "name"), field(C::Data, "data")];

const CARD: &[FieldAssociation] = &[field(C::Text, "text"), field(C::Script, "script")];

const INDUSTRY: &[FieldAssociation] = &[
    field(C::Text, "name"),
    field(C::Method, "method"),
    field(C::Data, "base"),
    field_or(C::List, "modifier", D::EmptyList),
];

const GROUP: &[FieldAssociation] = &[field(C::Text, "label")];

const PLAYER: &[FieldAssociation] = &[
    field(C::Text, "name"),
    field(C::Data, "data"),
    field_or(C::Balance, "balance", D::Zero),
    field_or(C::Position, "position", D::Zero),
    field_or(C::Debts, "debts", D::EmptyList),
];

const TILE: &[FieldAssociation] = &[field(C::Type, "type"), field(C::Text, "label")];

const ACTION_TILE: &[FieldAssociation] = &[
    field(C::Type, "type"),
    field(C::Text, "label"),
    field(C::Script, "events"),
];

const CHEST_TILE: &[FieldAssociation] = &[
    field(C::Type, "type"),
    field(C::Text, "label"),
    field(C::Table, "table"),
];

const BUYABLE_TILE: &[FieldAssociation] = &[
    field(C::Type, "type"),
    field(C::Text, "label"),
    field_or(C::Owner, "owner", D::Null),
    field(C::Price, "price"),
];

const COMPANY_TILE: &[FieldAssociation] = &[
    field(C::Type, "type"),
    field(C::Text, "label"),
    field_or(C::Owner, "owner", D::Null),
    field(C::Price, "price"),
    field(C::Industry, "industry"),
];

const PROPERTY_TILE: &[FieldAssociation] = &[
    field(C::Type, "type"),
    field(C::Text, "label"),
    field_or(C::Owner, "owner", D::Null),
    field(C::Price, "price"),
    field(C::Group, "group"),
    field(C::List, "rent"),
    field_or(C::Level, "level", D::Zero),
];

const TAX_TILE: &[FieldAssociation] = &[
    field(C::Type, "type"),
    field(C::Text, "label"),
    field(C::Method, "method"),
    field(C::Price, "price"),
];

// ============================================================================
// Registry
// ============================================================================

/// Lookup tables from domain type to layout and from mask back to type.
#[derive(Clone, Debug)]
pub struct Registry {
    entries: HashMap<DomainType, TypeEntry>,
    by_mask: HashMap<ComponentMask, DomainType>,
    collisions: Vec<(DomainType, DomainType)>,
}

impl Registry {
    /// Builds a registry from explicit entries.
    ///
    /// A mask shared by two types is a configuration error: it is logged and
    /// recorded, and the first registered type keeps the mask.
    pub fn new(entries: impl IntoIterator<Item = TypeEntry>) -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
            by_mask: HashMap::new(),
            collisions: Vec::new(),
        };

        for entry in entries {
            match registry.by_mask.get(&entry.mask) {
                Some(&existing) if existing != entry.ty => {
                    error!(
                        target: "core::ecs",
                        ty = %entry.ty,
                        existing = %existing,
                        mask = ?entry.mask,
                        "type association mask collision"
                    );
                    registry.collisions.push((entry.ty, existing));
                }
                Some(_) => {}
                None => {
                    registry.by_mask.insert(entry.mask, entry.ty);
                }
            }
            registry.entries.insert(entry.ty, entry);
        }

        registry
    }

    /// The association table used by the game.
    pub fn standard() -> Self {
        use DomainType as T;

        Self::new([
            TypeEntry::new(T::LootTable, &[], LOOT_TABLE),
            TypeEntry::new(T::Card, &[], CARD),
            TypeEntry::new(T::Industry, &[], INDUSTRY),
            TypeEntry::new(T::Group, &[], GROUP),
            TypeEntry::new(T::Player, &[], PLAYER),
            TypeEntry::new(T::Tile, &[], TILE),
            TypeEntry::new(T::ActionTile, &["Action"], ACTION_TILE),
            TypeEntry::new(T::ChestTile, &["Chest"], CHEST_TILE),
            TypeEntry::new(T::BuyableTile, &["Buyable"], BUYABLE_TILE),
            TypeEntry::new(T::CompanyTile, &["Company"], COMPANY_TILE),
            TypeEntry::new(T::PropertyTile, &["Property"], PROPERTY_TILE),
            TypeEntry::new(T::TaxTile, &["Tax"], TAX_TILE),
        ])
    }

    pub fn entry(&self, ty: DomainType) -> Option<&TypeEntry> {
        self.entries.get(&ty)
    }

    /// Resolves a component mask to the registered type that produces it.
    pub fn resolve(&self, mask: ComponentMask) -> Option<DomainType> {
        self.by_mask.get(&mask).copied()
    }

    /// Mask collisions detected while building, as `(rejected, kept)` pairs.
    pub fn collisions(&self) -> &[(DomainType, DomainType)] {
        &self.collisions
    }

    /// Maps a board tile tag to the tile type it loads as.
    ///
    /// Unknown tags (`Go`, `Jail`, ...) load as plain tiles.
    pub fn tile_type(tag: &str) -> DomainType {
        match tag {
            "Action" => DomainType::ActionTile,
            "Chest" => DomainType::ChestTile,
            "Company" => DomainType::CompanyTile,
            "Property" => DomainType::PropertyTile,
            "Tax" => DomainType::TaxTile,
            _ => DomainType::Tile,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn standard_registry_has_unique_masks() {
        let registry = Registry::standard();
        assert!(registry.collisions().is_empty());

        for ty in DomainType::iter() {
            let entry = registry.entry(ty).expect("every type is registered");
            assert_eq!(registry.resolve(entry.mask), Some(ty), "{ty} resolves by mask");
        }
    }

    #[test]
    fn collision_is_recorded_not_fatal() {
        const CARD_TEXT: &[FieldAssociation] = &[field(C::Text, "text")];

        let registry = Registry::new([
            TypeEntry::new(DomainType::Group, &[], GROUP),
            TypeEntry::new(DomainType::Card, &[], CARD_TEXT),
        ]);

        assert_eq!(
            registry.collisions(),
            &[(DomainType::Card, DomainType::Group)]
        );
        assert_eq!(
            registry.resolve(ComponentMask::TEXT),
            Some(DomainType::Group)
        );
    }

    #[test]
    fn aliases_match_board_tags() {
        let registry = Registry::standard();
        let property = registry.entry(DomainType::PropertyTile).unwrap();
        assert!(property.answers_to("Property"));
        assert!(property.answers_to("PropertyTile"));
        assert!(!property.answers_to("Tile"));

        assert_eq!(Registry::tile_type("Chest"), DomainType::ChestTile);
        assert_eq!(Registry::tile_type("Jail"), DomainType::Tile);
    }
}
