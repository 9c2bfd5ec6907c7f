//! Effect scripts attached to cards and action tiles.
//!
//! A script is a line or a nested list of lines. Each line is tokenized on
//! whitespace (bracketed `name[...]` and `name(...)` spans stay whole), its
//! `$variable` references are bound from the execution context, and the
//! leading keyword selects a built-in:
//!
//! ```text
//! balance add $player 200
//! balance sub $player 10%
//! move $player instant to Tile[label=Jail]
//! move $player next Property[group=Stations]
//! jail $player
//! park $player 2
//! target = random Player[balance>1000]
//! transaction $player $target 50
//! log $player[name] was fined
//! ```
//!
//! Any other leading token must be an assignment `name = ...`.
mod interpreter;
mod token;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ecs::EntityId;
use crate::error::{ErrorSeverity, GameError};

pub use interpreter::{ScriptHost, execute, render};
pub use token::{bind, tokenize};

/// A script body: one line or an ordered list of nested bodies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Script {
    Line(String),
    Block(Vec<Script>),
}

impl Script {
    pub fn line(line: impl Into<String>) -> Self {
        Self::Line(line.into())
    }

    /// Iterates every line in execution order.
    pub fn lines(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Line(line) => Box::new(std::iter::once(line.as_str())),
            Self::Block(body) => Box::new(body.iter().flat_map(Script::lines)),
        }
    }
}

impl From<&str> for Script {
    fn from(line: &str) -> Self {
        Self::line(line)
    }
}

impl<S: Into<Script>> FromIterator<S> for Script {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::Block(iter.into_iter().map(Into::into).collect())
    }
}

/// Pass and land scripts of an action tile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileEvents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<Script>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land: Option<Script>,
}

/// A value bound to a script variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptValue {
    Entity(EntityId),
    Text(String),
    None,
}

impl ScriptValue {
    /// The entity this value refers to, accepting numeric text.
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Self::Entity(id) => Some(*id),
            Self::Text(text) => text.parse().ok(),
            Self::None => None,
        }
    }
}

impl fmt::Display for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // bare index, so bound ids read back as entity references
            Self::Entity(id) => write!(f, "{}", id.0),
            Self::Text(text) => f.write_str(text),
            Self::None => f.write_str("none"),
        }
    }
}

impl From<EntityId> for ScriptValue {
    fn from(id: EntityId) -> Self {
        Self::Entity(id)
    }
}

impl From<Option<EntityId>> for ScriptValue {
    fn from(id: Option<EntityId>) -> Self {
        id.map_or(Self::None, Self::Entity)
    }
}

/// Variables shared by every line of one execution.
pub type ScriptContext = HashMap<String, ScriptValue>;

/// Builds a context with `player` bound, as used for tile and card effects.
pub fn player_context(player: EntityId) -> ScriptContext {
    ScriptContext::from([("player".to_string(), ScriptValue::Entity(player))])
}

/// Errors raised while binding or executing a script line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown keyword {keyword:?}")]
    UnknownKeyword { keyword: String },

    #[error("{keyword}: unknown mode {mode:?}")]
    UnknownMode {
        keyword: &'static str,
        mode: String,
    },

    #[error("{keyword}: missing {argument}")]
    MissingArgument {
        keyword: &'static str,
        argument: &'static str,
    },

    #[error("invalid amount {value:?}")]
    InvalidAmount { value: String },

    #[error("{reference:?} is not a player")]
    NotAPlayer { reference: String },

    #[error("{reference:?} does not reference an entity")]
    InvalidReference { reference: String },

    #[error("cannot bind {token:?}: {reason}")]
    Binding { token: String, reason: String },
}

impl GameError for ScriptError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKeyword { .. } => "SCRIPT_UNKNOWN_KEYWORD",
            Self::UnknownMode { .. } => "SCRIPT_UNKNOWN_MODE",
            Self::MissingArgument { .. } => "SCRIPT_MISSING_ARGUMENT",
            Self::InvalidAmount { .. } => "SCRIPT_INVALID_AMOUNT",
            Self::NotAPlayer { .. } => "SCRIPT_NOT_A_PLAYER",
            Self::InvalidReference { .. } => "SCRIPT_INVALID_REFERENCE",
            Self::Binding { .. } => "SCRIPT_BINDING",
        }
    }
}
