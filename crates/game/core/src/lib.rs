//! Deterministic rules engine for a square-perimeter trading board game.
//!
//! `board-core` stores every game object (tiles, cards, loot tables,
//! players) as sparse components in an [`EntityStore`], propagates state
//! transitions through a synchronous [`EventDispatcher`], and encodes tile
//! and card effects as data-driven [`Script`]s that address entities with
//! [`Selector`]s. All state mutation flows through [`Game`], which is the
//! context threaded through every reactor and script.
pub mod config;
pub mod ecs;
pub mod error;
pub mod event;
pub mod game;
pub mod script;
pub mod selector;
pub mod types;

pub use config::GameConfig;
pub use ecs::{
    Associated, Component, ComponentMask, Constructed, DomainType, Entity, EntityId, EntityStore,
    Registry, Slot, StoreError,
};
pub use error::{ErrorSeverity, GameError};
pub use event::{Dispatch, DispatchError, Event, EventDispatcher, EventKind};
pub use game::{Board, BoardError, EngineError, Game, PurchaseOffer, TurnState};
pub use script::{Script, ScriptContext, ScriptError, ScriptHost, ScriptValue, TileEvents};
pub use selector::{Metric, Op, Selector, SelectorError};
pub use types::{
    BoardDocument, BoardProperties, Card, Debt, Group, Industry, LootTable, Player, Tile, TileKind,
};
