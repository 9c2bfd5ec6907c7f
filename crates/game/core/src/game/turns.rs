use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::ecs::{Component, EntityId};
use crate::event::Event;
use crate::types::Player;

use super::{EngineError, Game};

/// Seating order and per-player turn restrictions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnState {
    /// Players in seating order.
    pub order: Vec<EntityId>,
    /// Index into `order` of the player whose turn it is.
    pub active: Option<usize>,
    /// Turns started so far.
    pub turn: u64,
    /// Remaining turns each jailed player must wait.
    pub jailed: HashMap<EntityId, u32>,
    /// Remaining turns each parked player is skipped.
    pub parked: HashMap<EntityId, u32>,
}

impl TurnState {
    pub fn active_player(&self) -> Option<EntityId> {
        self.active.and_then(|index| self.order.get(index).copied())
    }

    pub fn is_jailed(&self, player: EntityId) -> bool {
        self.jailed.get(&player).is_some_and(|turns| *turns > 0)
    }

    pub fn is_parked(&self, player: EntityId) -> bool {
        self.parked.get(&player).is_some_and(|turns| *turns > 0)
    }
}

impl Game {
    /// Joins a player under a unique display name.
    ///
    /// The player starts on the first tile with the configured starting
    /// balance and default character data.
    pub fn add_player(&mut self, name: &str) -> Result<EntityId, EngineError> {
        let name = name.trim();
        let taken = self.players.iter().any(|id| {
            self.store.get_str(Component::Text, *id) == Some(name)
        });
        if taken {
            return Err(EngineError::DuplicatePlayer {
                name: name.to_string(),
            });
        }

        let data = json!({
            "jailed": false,
            "character": { "color": "white" },
        });
        let player = Player::new(name, self.config.starting_balance, data);
        let id = self.store.insert(&player)?;

        self.players.push(id);
        self.turn.order.push(id);
        info!(target: "core::game", player = %id, name, "player joined");
        Ok(id)
    }

    pub fn active_player(&self) -> Option<EntityId> {
        self.turn.active_player()
    }

    /// Number of turns started so far.
    pub fn turn(&self) -> u64 {
        self.turn.turn
    }

    /// Starts the game: optionally shuffles the seating order, clears turn
    /// restrictions and starts the first player's turn.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.turn.order.is_empty() {
            return Err(EngineError::NoPlayers);
        }

        if self.config.randomize_order {
            self.turn.order.shuffle(&mut self.rng);
        }
        for player in &self.turn.order {
            self.turn.jailed.insert(*player, 0);
            self.turn.parked.insert(*player, 0);
        }

        self.turn.active = Some(0);
        let player = self.turn.order[0];
        self.emit(Event::TurnStart { player })
    }

    /// Ends the active player's turn and starts the next one.
    ///
    /// Parked players are skipped, using up one parked turn each time.
    pub fn next_turn(&mut self) -> Result<(), EngineError> {
        let (Some(mut active), Some(current)) = (self.turn.active, self.active_player()) else {
            return Err(EngineError::NotStarted);
        };
        self.emit(Event::TurnEnd { player: current })?;

        let len = self.turn.order.len();
        for _ in 0..len {
            active = (active + 1) % len;
            let player = self.turn.order[active];
            match self.turn.parked.get_mut(&player) {
                Some(turns) if *turns > 0 => {
                    *turns -= 1;
                    debug!(target: "core::game", %player, remaining = *turns, "parked, skipping turn");
                }
                _ => break,
            }
        }

        self.turn.active = Some(active);
        let player = self.turn.order[active];
        self.emit(Event::TurnStart { player })
    }

    /// Rolls the configured dice for the active player and advances them by
    /// the total. A jailed player serves one jail turn instead of moving.
    pub fn roll(&mut self) -> Result<Vec<u32>, EngineError> {
        let player = self.active_player().ok_or(EngineError::NotStarted)?;

        let sides = self.config.dice_sides.max(1);
        let dice: Vec<u32> = (0..self.config.dice)
            .map(|_| self.rng.gen_range(1..=sides))
            .collect();
        let total: u32 = dice.iter().sum();
        debug!(target: "core::game", %player, ?dice, total, "rolled");

        if let Some(turns) = self.turn.jailed.get_mut(&player).filter(|turns| **turns > 0) {
            *turns -= 1;
            let released = *turns == 0;
            if released {
                self.set_flag(player, "jailed", false)?;
                self.announce(format!("{player} is released from jail"))?;
            }
            return Ok(dice);
        }

        self.advance(player, total as usize)?;
        Ok(dice)
    }

    /// Sends a player to the tile labelled `Jail` without running tile
    /// effects, and holds them there for the configured number of turns.
    pub fn jail(&mut self, player: EntityId) -> Result<(), EngineError> {
        self.check_player(player)?;

        let jail = self
            .board
            .tiles
            .iter()
            .position(|tile| self.store.get_str(Component::Text, *tile) == Some("Jail"));
        if let Some(position) = jail {
            self.set_position(player, position)?;
        }

        self.turn.jailed.insert(player, self.config.turns_in_jail);
        self.set_flag(player, "jailed", true)?;
        self.announce(format!("{player} is sent to jail"))
    }

    /// Skips the player's next `turns` turns.
    pub fn park(&mut self, player: EntityId, turns: u32) -> Result<(), EngineError> {
        self.check_player(player)?;
        self.turn.parked.insert(player, turns);
        debug!(target: "core::game", %player, turns, "parked");
        Ok(())
    }

    pub(super) fn on_turn_start(&mut self, _: &Event) -> Result<(), EngineError> {
        self.turn.turn += 1;
        Ok(())
    }

    /// Sets a boolean entry of the player's data blob.
    fn set_flag(&mut self, player: EntityId, key: &str, value: bool) -> Result<(), EngineError> {
        let mut data = self
            .store
            .value(Component::Data, player)
            .cloned()
            .unwrap_or(Value::Null);
        if !data.is_object() {
            data = json!({});
        }
        if let Some(object) = data.as_object_mut() {
            object.insert(key.to_string(), Value::Bool(value));
        }
        Ok(self.store.set(Component::Data, player, data)?)
    }
}
