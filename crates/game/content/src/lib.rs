//! Data-driven board content and loaders.
//!
//! Boards are authored as JSON documents (tiles, cards, loot tables,
//! industries, groups) and game rules as TOML. Loaders turn those files into
//! the `board-core` types the engine is built from.
//!
//! Content is read once at startup and never appears in game state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{BoardLoader, ConfigLoader, ContentFactory, LoadResult};
