//! Game domain layer.
//!
//! [`Game`] owns the entity store, the event dispatcher and the turn state,
//! and is the context threaded through every reactor and script. Player
//! movement is the central transition: moving raises
//! [`Event::PlayerMove`], whose reactor runs the pass effect of every tile
//! strictly between the old and new position and then the land effect of
//! the destination. Effects may run scripts, which move or charge players
//! and so raise further events, all on the same call stack.
mod error;
mod host;
mod ledger;
mod load;
mod tiles;
mod turns;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::config::GameConfig;
use crate::ecs::{EntityId, EntityStore};
use crate::event::{self, Dispatch, Event, EventDispatcher, EventKind};
use crate::script::{self, Script, ScriptContext};
use crate::selector::Selector;
use crate::types::{Player, Tile};

pub use error::{BoardError, EngineError};
pub use turns::TurnState;

/// Entities created from the board document, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    /// Tiles in board position order.
    pub tiles: Vec<EntityId>,
    pub cards: Vec<EntityId>,
    pub loot_tables: Vec<EntityId>,
    pub industries: Vec<EntityId>,
    pub groups: Vec<EntityId>,
    pub dimension: usize,
}

/// An unanswered offer to buy a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurchaseOffer {
    pub player: EntityId,
    pub tile: EntityId,
    pub price: i64,
}

/// A running game.
#[derive(Debug)]
pub struct Game {
    store: EntityStore,
    events: EventDispatcher<Game, EngineError>,
    config: GameConfig,
    rng: StdRng,
    board: Board,
    players: Vec<EntityId>,
    turn: TurnState,
    pending_offer: Option<PurchaseOffer>,
    journal: Vec<Event>,
    log: Vec<String>,
}

impl Game {
    /// Creates an empty game with the built-in reactors registered.
    pub fn new(config: GameConfig) -> Self {
        let mut game = Self {
            store: EntityStore::new(),
            events: EventDispatcher::with_max_depth(config.max_event_depth),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            board: Board::default(),
            players: Vec::new(),
            turn: TurnState::default(),
            pending_offer: None,
            journal: Vec::new(),
            log: Vec::new(),
        };

        game.add_handler(&[EventKind::Any], Game::record);
        game.add_handler(&[EventKind::TurnStart], Game::on_turn_start);
        game.add_handler(&[EventKind::PlayerMove], Game::on_move);
        game.add_handler(&[EventKind::PurchaseOffered], Game::on_purchase_offered);
        game.add_handler(
            &[EventKind::PropertyPurchase, EventKind::PropertyUpgrade],
            Game::on_property_change,
        );

        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Players in join order.
    pub fn players(&self) -> &[EntityId] {
        &self.players
    }

    pub fn turn_state(&self) -> &TurnState {
        &self.turn
    }

    pub fn pending_offer(&self) -> Option<PurchaseOffer> {
        self.pending_offer
    }

    /// Every event dispatched so far, in dispatch order.
    pub fn journal(&self) -> &[Event] {
        &self.journal
    }

    /// Messages written by scripts and game announcements.
    pub fn messages(&self) -> &[String] {
        &self.log
    }

    /// Typed view of a player.
    pub fn player(&self, id: EntityId) -> Result<Player, EngineError> {
        self.check_player(id)?;
        Ok(self.store.construct_as(id)?)
    }

    /// Typed view of the tile at a board position.
    pub fn tile_at(&self, position: usize) -> Result<Tile, EngineError> {
        let id = *self
            .board
            .tiles
            .get(position)
            .ok_or(EngineError::PositionOutOfRange {
                position,
                len: self.board.tiles.len(),
            })?;
        Ok(Tile::load(&self.store, id)?)
    }

    /// Registers an additional reactor, e.g. a presentation adapter.
    pub fn add_handler<F>(&mut self, kinds: &[EventKind], reactor: F)
    where
        F: Fn(&mut Game, &Event) -> Result<(), EngineError> + 'static,
    {
        self.events.add_handler(kinds, reactor);
    }

    /// Dispatches an event to every registered reactor.
    pub fn emit(&mut self, event: Event) -> Result<(), EngineError> {
        event::dispatch(self, &event)
    }

    /// Runs a script with the given variable context.
    pub fn execute(&mut self, script: &Script, ctx: &mut ScriptContext) -> Result<(), EngineError> {
        script::execute(self, script, ctx)
    }

    /// Finds every entity matching a selector expression.
    pub fn select(&self, selector: &str) -> Result<Vec<EntityId>, EngineError> {
        Ok(Selector::parse(selector)?.select(&self.store)?)
    }

    /// Writes a message to the game log and announces it as a root event.
    pub fn announce(&mut self, message: impl Into<String>) -> Result<(), EngineError> {
        let message = message.into();
        info!(target: "core::game", %message);
        self.log.push(message.clone());
        self.emit(Event::message(message))
    }

    // ------------------------------------------------------------------------
    // Built-in reactors
    // ------------------------------------------------------------------------

    fn record(&mut self, event: &Event) -> Result<(), EngineError> {
        self.journal.push(event.clone());
        Ok(())
    }

    fn on_property_change(&mut self, event: &Event) -> Result<(), EngineError> {
        match event {
            Event::PropertyPurchase { player, tile } => {
                info!(target: "core::game", %player, %tile, "tile purchased");
            }
            Event::PropertyUpgrade { player, tile } => {
                info!(target: "core::game", %player, %tile, "tile upgraded");
            }
            _ => {}
        }
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Dispatch for Game {
    type Error = EngineError;

    fn dispatcher(&mut self) -> &mut EventDispatcher<Self, Self::Error> {
        &mut self.events
    }
}
