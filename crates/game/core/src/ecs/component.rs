use bitflags::bitflags;
use serde_json::Value;
use strum::{AsRefStr, Display, EnumCount, EnumIter};

/// Closed set of component kinds.
///
/// Each kind owns exactly one sparse pool in the [`EntityStore`](super::EntityStore).
/// The discriminant doubles as the bit position in [`ComponentMask`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr, EnumIter, EnumCount,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Component {
    /// Labels, names and card text.
    Text = 0,
    /// Free-form nested data blobs.
    Data,
    /// Ordered lists (rent ladders, modifiers).
    List,
    /// Board type tag of a tile ("Property", "Chest", ...).
    Type,
    Price,
    Owner,
    Position,
    Balance,
    /// Development level of a property.
    Level,
    /// Script bodies (card scripts, tile pass/land events).
    Script,
    Group,
    Industry,
    /// Loot table reference of a chest tile.
    Table,
    Method,
    Debts,
}

impl Component {
    /// Single-bit mask for this kind.
    #[inline]
    pub const fn mask(self) -> ComponentMask {
        ComponentMask::from_bits_retain(1 << (self as u32))
    }
}

bitflags! {
    /// Tracks which component kinds are populated for an entity.
    ///
    /// Bit `n` corresponds to the [`Component`] with discriminant `n`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ComponentMask: u32 {
        const TEXT     = 1 << 0;
        const DATA     = 1 << 1;
        const LIST     = 1 << 2;
        const TYPE     = 1 << 3;
        const PRICE    = 1 << 4;
        const OWNER    = 1 << 5;
        const POSITION = 1 << 6;
        const BALANCE  = 1 << 7;
        const LEVEL    = 1 << 8;
        const SCRIPT   = 1 << 9;
        const GROUP    = 1 << 10;
        const INDUSTRY = 1 << 11;
        const TABLE    = 1 << 12;
        const METHOD   = 1 << 13;
        const DEBTS    = 1 << 14;
    }
}

impl ComponentMask {
    /// Returns true if the bit for `component` is set.
    #[inline]
    pub fn has(self, component: Component) -> bool {
        self.contains(component.mask())
    }
}

/// One cell of a component pool.
///
/// `Unset` is the explicit sentinel for ids that do not carry the component;
/// a present-but-empty component is `Set(Value::Null)`.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Slot {
    #[default]
    Unset,
    Set(Value),
}

impl Slot {
    pub fn is_unset(&self) -> bool {
        matches!(self, Slot::Unset)
    }

    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    /// Borrow the stored value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Slot::Unset => None,
            Slot::Set(value) => Some(value),
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Slot::Unset => None,
            Slot::Set(value) => Some(value),
        }
    }
}
