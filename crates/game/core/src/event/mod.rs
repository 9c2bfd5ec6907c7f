//! Game events and the synchronous dispatcher that delivers them.
//!
//! Events describe state transitions that already happened (a move, a
//! purchase, a turn change). Reactors registered on the [`EventDispatcher`]
//! may perform further transitions, which dispatch nested events depth-first
//! before the outer dispatch continues.
mod dispatcher;

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use crate::ecs::EntityId;

pub use dispatcher::{Dispatch, DispatchError, EventDispatcher, Reactor, dispatch};

/// Event kinds reactors can subscribe to.
///
/// `Any` is the root kind: reactors registered for it see every event, and
/// plain [`Event::Message`] events are delivered only to them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum EventKind {
    Any,
    PlayerMove,
    PlayerBalanceUpdated,
    PropertyPurchase,
    PropertyUpgrade,
    PurchaseOffered,
    CardDrawn,
    TurnStart,
    TurnEnd,
}

/// A state transition reported to reactors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// Free-form notification with no concrete kind.
    Message { message: String },

    /// A player changed position. `instant` moves skip pass-through effects.
    PlayerMove {
        player: EntityId,
        initial: usize,
        #[serde(rename = "final")]
        final_position: usize,
        instant: bool,
    },

    PlayerBalanceUpdated { player: EntityId, delta: i64 },

    PropertyPurchase { player: EntityId, tile: EntityId },

    PropertyUpgrade { player: EntityId, tile: EntityId },

    /// An unowned buyable tile was landed on and can be bought for `price`.
    PurchaseOffered {
        player: EntityId,
        tile: EntityId,
        price: i64,
    },

    /// A chest card was drawn and executed; `text` is the rendered card text.
    CardDrawn {
        player: EntityId,
        card: EntityId,
        text: String,
    },

    TurnStart { player: EntityId },

    TurnEnd { player: EntityId },
}

impl Event {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// The concrete kind reactors are looked up by.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Message { .. } => EventKind::Any,
            Self::PlayerMove { .. } => EventKind::PlayerMove,
            Self::PlayerBalanceUpdated { .. } => EventKind::PlayerBalanceUpdated,
            Self::PropertyPurchase { .. } => EventKind::PropertyPurchase,
            Self::PropertyUpgrade { .. } => EventKind::PropertyUpgrade,
            Self::PurchaseOffered { .. } => EventKind::PurchaseOffered,
            Self::CardDrawn { .. } => EventKind::CardDrawn,
            Self::TurnStart { .. } => EventKind::TurnStart,
            Self::TurnEnd { .. } => EventKind::TurnEnd,
        }
    }

    /// The player the event concerns, if any.
    pub fn player(&self) -> Option<EntityId> {
        match self {
            Self::Message { .. } => None,
            Self::PlayerMove { player, .. }
            | Self::PlayerBalanceUpdated { player, .. }
            | Self::PropertyPurchase { player, .. }
            | Self::PropertyUpgrade { player, .. }
            | Self::PurchaseOffered { player, .. }
            | Self::CardDrawn { player, .. }
            | Self::TurnStart { player }
            | Self::TurnEnd { player } => Some(*player),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message { message } => write!(f, "Message({message})"),
            Self::PlayerMove {
                player,
                initial,
                final_position,
                instant,
            } => write!(
                f,
                "PlayerMove(player={player}, initial={initial}, final={final_position}, instant={instant})"
            ),
            Self::PlayerBalanceUpdated { player, delta } => {
                write!(f, "PlayerBalanceUpdated(player={player}, delta={delta})")
            }
            Self::PropertyPurchase { player, tile } => {
                write!(f, "PropertyPurchase(player={player}, tile={tile})")
            }
            Self::PropertyUpgrade { player, tile } => {
                write!(f, "PropertyUpgrade(player={player}, tile={tile})")
            }
            Self::PurchaseOffered {
                player,
                tile,
                price,
            } => write!(
                f,
                "PurchaseOffered(player={player}, tile={tile}, price={price})"
            ),
            Self::CardDrawn { player, card, text } => {
                write!(f, "CardDrawn(player={player}, card={card}, text={text:?})")
            }
            Self::TurnStart { player } => write!(f, "TurnStart(player={player})"),
            Self::TurnEnd { player } => write!(f, "TurnEnd(player={player})"),
        }
    }
}
