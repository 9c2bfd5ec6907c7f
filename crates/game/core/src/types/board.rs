use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Board definition as read from JSON.
///
/// Entries are kept as raw objects: the registry association decides which
/// fields of each entry are stored, so boards may carry extra presentation
/// fields the rules never read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    #[serde(default)]
    pub loot_tables: Vec<Value>,
    #[serde(default)]
    pub cards: Vec<Value>,
    #[serde(default)]
    pub industries: Vec<Value>,
    #[serde(default)]
    pub groups: Vec<Value>,
    pub tiles: Vec<Value>,
    pub properties: BoardProperties,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardProperties {
    /// Side length of the square board, corners included.
    pub dimension: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BoardProperties {
    /// Number of perimeter tiles a board of this dimension has.
    pub fn expected_tiles(&self) -> usize {
        4 * self.dimension.saturating_sub(1)
    }
}
