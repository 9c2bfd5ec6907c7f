use serde_json::Value;

use super::{Constraints, Op, Selector};
use crate::ecs::{EntityId, EntityStore, StoreError, access};

impl Selector {
    /// Returns every entity matched by any of the selector's types, in id order.
    ///
    /// An entity whose components resolve to no registered type is a
    /// consistency error and aborts the selection.
    pub fn select(&self, store: &EntityStore) -> Result<Vec<EntityId>, StoreError> {
        let mut matches = Vec::new();
        for entity in store.entities() {
            if self.matches(store, entity.id)? {
                matches.push(entity.id);
            }
        }
        Ok(matches)
    }

    /// Tests a single entity against the selector.
    pub fn matches(&self, store: &EntityStore, id: EntityId) -> Result<bool, StoreError> {
        let mask = store.mask(id);
        let ty = store
            .type_of(id)
            .ok_or(StoreError::TypeResolution { id, mask })?;
        let entry = store
            .registry()
            .entry(ty)
            .ok_or(StoreError::UnregisteredType(ty))?;

        for (name, constraints) in &self.types {
            if !entry.answers_to(name) {
                continue;
            }
            let Some(constraints) = constraints else {
                return Ok(true);
            };
            if satisfies(store, id, constraints)? {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

fn satisfies(store: &EntityStore, id: EntityId, constraints: &Constraints) -> Result<bool, StoreError> {
    for (path, (op, expected)) in constraints {
        let mut segments = path.split('.');
        let field = segments.next().unwrap_or_default();
        let path: Vec<&str> = segments.collect();

        let Some(value) = store.field(id, field)?.value() else {
            return Ok(false);
        };
        let Some(actual) = access(value, &path).filter(|v| !v.is_null()) else {
            return Ok(false);
        };

        if !compare(actual, *op, expected) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Textual form of a scalar value, used for equality and numeric coercion.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn compare(actual: &Value, op: Op, expected: &str) -> bool {
    if let (Some(lhs), Ok(rhs)) = (numeric(actual), expected.parse::<f64>()) {
        return match op {
            Op::Eq | Op::EqEq => lhs == rhs,
            Op::Ne => lhs != rhs,
            Op::Gt => lhs > rhs,
            Op::Ge => lhs >= rhs,
            Op::Lt => lhs < rhs,
            Op::Le => lhs <= rhs,
        };
    }

    let lhs = stringify(actual);
    match op {
        Op::Eq | Op::EqEq => lhs == expected,
        Op::Ne => lhs != expected,
        _ => false,
    }
}

// ============================================================================
// Nearest match
// ============================================================================

/// How board distance is measured when looking for the nearest tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Distance travelling forward only, wrapping at the board end.
    Forward,
    /// Shorter of the forward and backward distances.
    Shortest,
}

impl Metric {
    pub fn distance(self, from: usize, to: usize, len: usize) -> usize {
        match self {
            Self::Forward => forward_distance(from, to, len),
            Self::Shortest => cyclic_distance(from, to, len),
        }
    }
}

/// `(to - from) mod len`.
pub fn forward_distance(from: usize, to: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (to % len + len - from % len) % len
}

/// `min(diff, len - diff)` where `diff` is the forward distance.
pub fn cyclic_distance(from: usize, to: usize, len: usize) -> usize {
    let diff = forward_distance(from, to, len);
    diff.min(len - diff)
}

/// Picks the candidate tile closest to `from` under `metric`.
///
/// `tiles` is the board in position order; candidates that are not on the
/// board are ignored. Ties go to the first candidate encountered. Returns the
/// board position and entity of the winner.
pub fn nearest(
    candidates: &[EntityId],
    tiles: &[EntityId],
    from: usize,
    metric: Metric,
) -> Option<(usize, EntityId)> {
    let len = tiles.len();

    candidates
        .iter()
        .filter_map(|id| {
            tiles
                .iter()
                .position(|tile| tile == id)
                .map(|position| (position, *id))
        })
        .fold(None, |best: Option<(usize, (usize, EntityId))>, (position, id)| {
            let distance = metric.distance(from, position, len);
            match best {
                Some((best_distance, _)) if best_distance <= distance => best,
                _ => Some((distance, (position, id))),
            }
        })
        .map(|(_, winner)| winner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::DomainType;
    use serde_json::json;

    fn store() -> EntityStore {
        let mut store = EntityStore::new();
        for (name, balance, color) in [("ann", 1500, "red"), ("bob", 900, "blue"), ("cy", 2000, "red")] {
            store
                .create_entity(
                    Some(&json!({
                        "name": name,
                        "balance": balance,
                        "data": { "character": { "color": color } },
                    })),
                    Some(DomainType::Player),
                )
                .unwrap();
        }
        store
            .create_entity(
                Some(&json!({ "type": "Property", "label": "Paris", "group": "France", "price": 400, "rent": [10] })),
                Some(DomainType::PropertyTile),
            )
            .unwrap();
        store
            .create_entity(
                Some(&json!({ "type": "Jail", "label": "Jail" })),
                Some(DomainType::Tile),
            )
            .unwrap();
        store
    }

    fn select(store: &EntityStore, selector: &str) -> Vec<u32> {
        Selector::parse(selector)
            .unwrap()
            .select(store)
            .unwrap()
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    #[test]
    fn numeric_and_string_comparisons() {
        let store = store();
        assert_eq!(select(&store, "Player[balance>=1500]"), [0, 2]);
        assert_eq!(select(&store, "Player[balance<1000]"), [1]);
        assert_eq!(select(&store, "Player[name=bob]"), [1]);
        assert_eq!(select(&store, "Player[name!=bob]"), [0, 2]);
        assert!(select(&store, "Player[name>bob]").is_empty());
    }

    #[test]
    fn nested_paths_and_multiple_constraints() {
        let store = store();
        assert_eq!(select(&store, "Player[data.character.color=red]"), [0, 2]);
        assert_eq!(
            select(&store, "Player[data.character.color=red, balance<1600]"),
            [0]
        );
        assert!(select(&store, "Player[data.missing.path=1]").is_empty());
        assert!(select(&store, "Player[nofield=1]").is_empty());
    }

    #[test]
    fn type_names_and_aliases() {
        let store = store();
        assert_eq!(select(&store, "Property[group=France]"), [3]);
        assert_eq!(select(&store, "PropertyTile"), [3]);
        assert_eq!(select(&store, "Tile[label=Jail]"), [4]);
        assert!(select(&store, "Card").is_empty());
    }

    #[test]
    fn canonical_distances() {
        assert_eq!(forward_distance(38, 1, 40), 3);
        assert_eq!(forward_distance(5, 5, 40), 0);
        assert_eq!(cyclic_distance(1, 38, 40), 3);
        assert_eq!(cyclic_distance(0, 20, 40), 20);
    }

    #[test]
    fn nearest_prefers_first_on_ties() {
        let tiles: Vec<EntityId> = (10..20).map(EntityId).collect();
        let candidates = [EntityId(12), EntityId(18)];

        // from 5: forward to 2 is 7, to 8 is 3
        assert_eq!(
            nearest(&candidates, &tiles, 5, Metric::Forward),
            Some((8, EntityId(18)))
        );
        // from 0: shortest to 2 is 2, to 8 is 2
        assert_eq!(
            nearest(&candidates, &tiles, 0, Metric::Shortest),
            Some((2, EntityId(12)))
        );
        assert_eq!(nearest(&[EntityId(99)], &tiles, 0, Metric::Forward), None);
    }
}
