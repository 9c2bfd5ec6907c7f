//! Entity store: dense ids, per-component sparse pools.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{
    Component, ComponentMask, DomainType, Entity, EntityId, Registry, Slot, StoreError,
};

static UNSET: Slot = Slot::Unset;

/// A domain type with a registered field association.
///
/// The serde representation of the type must be an object whose keys are the
/// field names of its association.
pub trait Associated: Serialize + DeserializeOwned {
    const TYPE: DomainType;
}

/// Field-populated view of an entity, rebuilt from its components.
#[derive(Clone, Debug, PartialEq)]
pub struct Constructed {
    pub id: EntityId,
    pub ty: DomainType,
    pub fields: Map<String, Value>,
}

impl fmt::Display for Constructed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = serde_json::to_string(&self.fields).map_err(|_| fmt::Error)?;
        write!(f, "{}{}({})", self.ty, self.id, body)
    }
}

/// Owns every entity and one lazily grown pool per component kind.
///
/// Invariant: an entity's mask bit for kind K is set iff K's pool holds a
/// [`Slot::Set`] at that id. Pools never shrink and ids are never reused.
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    pools: HashMap<Component, Vec<Slot>>,
    registry: Registry,
}

impl EntityStore {
    /// Creates an empty store backed by the standard registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::standard())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            entities: Vec::new(),
            pools: HashMap::new(),
            registry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    /// Component mask of `id`, empty for unknown ids.
    pub fn mask(&self, id: EntityId) -> ComponentMask {
        self.entity(id).map(|e| e.mask).unwrap_or_default()
    }

    /// Registered type of `id`, if its mask resolves to one.
    pub fn type_of(&self, id: EntityId) -> Option<DomainType> {
        self.entity(id).and_then(|e| self.registry.resolve(e.mask))
    }

    fn check_bounds(&self, id: EntityId) -> Result<(), StoreError> {
        if id.index() >= self.entities.len() {
            return Err(StoreError::OutOfBounds {
                id,
                len: self.entities.len(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Creation and association
    // ------------------------------------------------------------------------

    /// Creates an entity and, when both `data` and `ty` are given, associates
    /// the data with it.
    pub fn create_entity(
        &mut self,
        data: Option<&Value>,
        ty: Option<DomainType>,
    ) -> Result<EntityId, StoreError> {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity::new(id));

        if let (Some(data), Some(ty)) = (data, ty) {
            self.associate(id, data, ty)?;
        }

        Ok(id)
    }

    /// Writes each associated field of `object` into its component pool.
    ///
    /// Missing fields take the association default, or only get their
    /// presence bit when there is no default.
    pub fn associate(
        &mut self,
        id: EntityId,
        object: &Value,
        ty: DomainType,
    ) -> Result<(), StoreError> {
        self.check_bounds(id)?;

        let object = object.as_object().ok_or(StoreError::NotAnObject { id })?;
        let fields = self
            .registry
            .entry(ty)
            .ok_or(StoreError::UnregisteredType(ty))?
            .fields;

        for association in fields {
            match (object.get(association.field), association.default) {
                (Some(value), _) => self.set(association.component, id, value.clone())?,
                (None, Some(default)) => self.set(association.component, id, default.value())?,
                (None, None) => self.assign(association.component, id)?,
            }
        }

        Ok(())
    }

    /// Creates an entity from a typed domain object.
    pub fn insert<T: Associated>(&mut self, object: &T) -> Result<EntityId, StoreError> {
        let id = EntityId(self.entities.len() as u32);
        let value = serde_json::to_value(object).map_err(|e| StoreError::Conversion {
            id,
            ty: T::TYPE,
            message: e.to_string(),
        })?;

        self.create_entity(Some(&value), Some(T::TYPE))
    }

    /// Marks `component` as present on `id`.
    ///
    /// Idempotent: when the bit is already set neither mask nor pool change.
    /// Otherwise the pool is created or extended to cover every entity and
    /// the slot holds `Value::Null` until written.
    pub fn assign(&mut self, component: Component, id: EntityId) -> Result<(), StoreError> {
        self.check_bounds(id)?;

        let entity = &mut self.entities[id.index()];
        if entity.mask.has(component) {
            return Ok(());
        }
        entity.mask |= component.mask();

        let len = self.entities.len();
        let pool = self.pools.entry(component).or_default();
        if pool.len() < len {
            pool.resize(len, Slot::Unset);
        }
        pool[id.index()] = Slot::Set(Value::Null);

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------------

    /// Reads a component slot; out-of-range ids and missing pools are unset.
    pub fn get(&self, component: Component, id: EntityId) -> &Slot {
        self.pools
            .get(&component)
            .and_then(|pool| pool.get(id.index()))
            .unwrap_or(&UNSET)
    }

    /// Reads the stored value, `None` when unset.
    pub fn value(&self, component: Component, id: EntityId) -> Option<&Value> {
        self.get(component, id).value()
    }

    /// Reads element `index` of a list-valued component.
    pub fn get_index(&self, component: Component, id: EntityId, index: usize) -> Option<&Value> {
        self.value(component, id)?.as_array()?.get(index)
    }

    pub fn get_i64(&self, component: Component, id: EntityId) -> Option<i64> {
        self.value(component, id).and_then(as_i64)
    }

    pub fn get_str(&self, component: Component, id: EntityId) -> Option<&str> {
        self.value(component, id)?.as_str()
    }

    /// Reads an entity reference (owner, creditor, loot table).
    pub fn get_entity(&self, component: Component, id: EntityId) -> Option<EntityId> {
        self.value(component, id)
            .and_then(Value::as_u64)
            .map(|raw| EntityId(raw as u32))
    }

    /// Writes a component value, assigning the component first if needed.
    pub fn set(&mut self, component: Component, id: EntityId, value: Value) -> Result<(), StoreError> {
        self.assign(component, id)?;

        // assign() sized the pool to cover `id`
        if let Some(slot) = self
            .pools
            .get_mut(&component)
            .and_then(|pool| pool.get_mut(id.index()))
        {
            *slot = Slot::Set(value);
        }

        Ok(())
    }

    /// Resolves a field name through the entity's registered type.
    ///
    /// Fields the type does not declare read as unset.
    pub fn field(&self, id: EntityId, name: &str) -> Result<&Slot, StoreError> {
        let entry = self.entry_of(id)?;
        Ok(match entry.field(name) {
            Some(association) => self.get(association.component, id),
            None => &UNSET,
        })
    }

    fn entry_of(&self, id: EntityId) -> Result<&super::TypeEntry, StoreError> {
        let mask = self
            .entity(id)
            .ok_or(StoreError::OutOfBounds {
                id,
                len: self.entities.len(),
            })?
            .mask;
        let ty = self
            .registry
            .resolve(mask)
            .ok_or(StoreError::TypeResolution { id, mask })?;
        self.registry
            .entry(ty)
            .ok_or(StoreError::UnregisteredType(ty))
    }

    // ------------------------------------------------------------------------
    // Reconstruction
    // ------------------------------------------------------------------------

    /// Rebuilds the field view of an entity from its components.
    pub fn construct(&self, id: EntityId) -> Result<Constructed, StoreError> {
        let entry = self.entry_of(id)?;

        let fields = entry
            .fields
            .iter()
            .map(|association| {
                let value = self
                    .value(association.component, id)
                    .cloned()
                    .unwrap_or(Value::Null);
                (association.field.to_string(), value)
            })
            .collect();

        Ok(Constructed {
            id,
            ty: entry.ty,
            fields,
        })
    }

    /// Rebuilds a typed domain object from an entity.
    pub fn construct_as<T: Associated>(&self, id: EntityId) -> Result<T, StoreError> {
        let constructed = self.construct(id)?;
        if constructed.ty != T::TYPE {
            return Err(StoreError::TypeMismatch {
                id,
                expected: T::TYPE,
                found: constructed.ty,
            });
        }

        serde_json::from_value(Value::Object(constructed.fields)).map_err(|e| {
            StoreError::Conversion {
                id,
                ty: T::TYPE,
                message: e.to_string(),
            }
        })
    }
}

/// Numeric view of a component value, accepting integral floats.
pub fn as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

/// Walks a dotted path into nested data.
///
/// Object segments are keys, array segments are numeric indices.
pub fn access<'a, S: AsRef<str>>(value: &'a Value, path: &[S]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| {
        let segment = segment.as_ref();
        match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn get_before_write_is_unset() {
        let mut store = EntityStore::new();
        let id = store.create_entity(None, None).unwrap();

        for component in Component::iter() {
            assert!(store.get(component, id).is_unset());
        }
        assert!(store.get(Component::Text, EntityId(99)).is_unset());
    }

    #[test]
    fn set_then_get_returns_value() {
        let mut store = EntityStore::new();
        let id = store.create_entity(None, None).unwrap();

        store.set(Component::Balance, id, json!(1500)).unwrap();

        assert_eq!(store.get(Component::Balance, id), &Slot::Set(json!(1500)));
        assert!(store.mask(id).has(Component::Balance));
        assert_eq!(store.get_i64(Component::Balance, id), Some(1500));
    }

    #[test]
    fn set_out_of_bounds_fails() {
        let mut store = EntityStore::new();
        store.create_entity(None, None).unwrap();

        let err = store.set(Component::Text, EntityId(1), json!("x")).unwrap_err();
        assert_eq!(
            err,
            StoreError::OutOfBounds {
                id: EntityId(1),
                len: 1
            }
        );
    }

    #[test]
    fn assign_is_idempotent_and_never_overwrites() {
        let mut store = EntityStore::new();
        let id = store.create_entity(None, None).unwrap();
        store.set(Component::Price, id, json!(200)).unwrap();

        store.assign(Component::Price, id).unwrap();
        store.assign(Component::Price, id).unwrap();

        assert_eq!(store.mask(id), ComponentMask::PRICE);
        assert_eq!(store.value(Component::Price, id), Some(&json!(200)));

        let bare = store.create_entity(None, None).unwrap();
        store.assign(Component::Owner, bare).unwrap();
        let mask = store.mask(bare);
        store.assign(Component::Owner, bare).unwrap();
        assert_eq!(store.mask(bare), mask);
        assert_eq!(store.get(Component::Owner, bare), &Slot::Set(Value::Null));
    }

    #[test]
    fn pools_grow_lazily_for_later_entities() {
        let mut store = EntityStore::new();
        let first = store.create_entity(None, None).unwrap();
        store.set(Component::Text, first, json!("a")).unwrap();

        let second = store.create_entity(None, None).unwrap();
        assert!(store.get(Component::Text, second).is_unset());

        store.set(Component::Text, second, json!("b")).unwrap();
        assert_eq!(store.get_str(Component::Text, first), Some("a"));
        assert_eq!(store.get_str(Component::Text, second), Some("b"));
    }

    #[test]
    fn associate_applies_defaults_and_presence_bits() {
        let mut store = EntityStore::new();
        let id = store
            .create_entity(
                Some(&json!({
                    "type": "Property",
                    "label": "Paris",
                    "price": 400,
                    "group": "France",
                    "rent": [50, 200, 600],
                })),
                Some(DomainType::PropertyTile),
            )
            .unwrap();

        assert_eq!(store.type_of(id), Some(DomainType::PropertyTile));
        assert_eq!(store.get_i64(Component::Level, id), Some(0));
        assert_eq!(store.get(Component::Owner, id), &Slot::Set(Value::Null));
        assert_eq!(store.get_index(Component::List, id, 1), Some(&json!(200)));
        assert_eq!(store.get_index(Component::List, id, 7), None);
    }

    #[test]
    fn associate_rejects_non_objects() {
        let mut store = EntityStore::new();
        let err = store
            .create_entity(Some(&json!([1, 2])), Some(DomainType::Group))
            .unwrap_err();
        assert_eq!(err, StoreError::NotAnObject { id: EntityId(0) });
    }

    #[test]
    fn construct_reports_unresolvable_mask() {
        let mut store = EntityStore::new();
        let id = store.create_entity(None, None).unwrap();
        store.set(Component::Balance, id, json!(1)).unwrap();

        assert!(matches!(
            store.construct(id),
            Err(StoreError::TypeResolution { .. })
        ));
    }

    #[test]
    fn access_walks_objects_and_arrays() {
        let data = json!({ "character": { "colors": ["red", "blue"] } });
        assert_eq!(
            access(&data, &["character", "colors", "1"]),
            Some(&json!("blue"))
        );
        assert_eq!(access(&data, &["missing"]), None);
        assert_eq!(access::<&str>(&data, &[]), Some(&data));
    }
}
