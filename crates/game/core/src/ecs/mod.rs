//! Entity-component store.
//!
//! Every game object is an [`Entity`] whose state lives in sparse per-kind
//! component pools. The [`Registry`] maps domain types to the components that
//! back their fields, which lets the store associate plain objects with
//! entities and rebuild typed views from raw components.
mod component;
mod entity;
mod error;
mod registry;
mod store;

pub use component::{Component, ComponentMask, Slot};
pub use entity::{Entity, EntityId};
pub use error::StoreError;
pub use registry::{DomainType, FieldAssociation, FieldDefault, Registry, TypeEntry};
pub use store::{Associated, Constructed, EntityStore, access, as_i64};
