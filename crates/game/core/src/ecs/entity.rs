use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ComponentMask;

/// Unique identifier for any entity tracked in the store.
///
/// Ids are dense indices into every component pool. They are assigned in
/// creation order and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Position of this entity inside the component pools.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    /// Accepts both the bare index (`"12"`) and the display form (`"#12"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('#').unwrap_or(s).parse().map(EntityId)
    }
}

/// An id plus the set of component kinds currently populated for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub mask: ComponentMask,
}

impl Entity {
    pub const fn new(id: EntityId) -> Self {
        Self {
            id,
            mask: ComponentMask::empty(),
        }
    }
}
