//! Error types for the game domain layer.

use crate::ecs::{EntityId, StoreError};
use crate::error::{ErrorSeverity, GameError};
use crate::event::DispatchError;
use crate::script::ScriptError;
use crate::selector::SelectorError;

/// Board document rejected during load.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("incorrect number of tiles {count} for board dimension {dimension} (expected {expected})")]
    TileCount {
        count: usize,
        dimension: usize,
        expected: usize,
    },

    #[error("tile {index} has no type")]
    MissingTileType { index: usize },

    #[error("chest tile {index} references unknown loot table {name:?}")]
    UnknownLootTable { index: usize, name: String },

    #[error("loot table {table:?} references unknown card {card}")]
    UnknownCard { table: String, card: usize },

    #[error("a board is already loaded")]
    AlreadyLoaded,
}

impl GameError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyLoaded => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TileCount { .. } => "BOARD_TILE_COUNT",
            Self::MissingTileType { .. } => "BOARD_MISSING_TILE_TYPE",
            Self::UnknownLootTable { .. } => "BOARD_UNKNOWN_LOOT_TABLE",
            Self::UnknownCard { .. } => "BOARD_UNKNOWN_CARD",
            Self::AlreadyLoaded => "BOARD_ALREADY_LOADED",
        }
    }
}

/// Errors surfaced by [`Game`](super::Game) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("script failed: {0}")]
    Script(#[from] ScriptError),

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),

    #[error("a player named {name:?} already joined")]
    DuplicatePlayer { name: String },

    #[error("entity {0} is not a player")]
    NotAPlayer(EntityId),

    #[error("entity {0} is not a tile on the board")]
    NotATile(EntityId),

    #[error("board position {position} out of range (tiles: {len})")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("no players have joined")]
    NoPlayers,

    #[error("the game has not started")]
    NotStarted,
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Store(e) => e.severity(),
            Self::Selector(e) => e.severity(),
            Self::Dispatch(e) => e.severity(),
            Self::Script(e) => e.severity(),
            Self::Board(e) => e.severity(),
            Self::NoPlayers | Self::NotStarted => ErrorSeverity::Recoverable,
            Self::DuplicatePlayer { .. }
            | Self::NotAPlayer(_)
            | Self::NotATile(_)
            | Self::PositionOutOfRange { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Store(e) => e.error_code(),
            Self::Selector(e) => e.error_code(),
            Self::Dispatch(e) => e.error_code(),
            Self::Script(e) => e.error_code(),
            Self::Board(e) => e.error_code(),
            Self::DuplicatePlayer { .. } => "GAME_DUPLICATE_PLAYER",
            Self::NotAPlayer(_) => "GAME_NOT_A_PLAYER",
            Self::NotATile(_) => "GAME_NOT_A_TILE",
            Self::PositionOutOfRange { .. } => "GAME_POSITION_OUT_OF_RANGE",
            Self::NoPlayers => "GAME_NO_PLAYERS",
            Self::NotStarted => "GAME_NOT_STARTED",
        }
    }
}
