use rand::seq::SliceRandom;
use tracing::info;

use crate::ecs::{EntityId, EntityStore};
use crate::script::ScriptHost;

use super::{EngineError, Game};

impl ScriptHost for Game {
    type Error = EngineError;

    fn store(&self) -> &EntityStore {
        &self.store
    }

    fn board(&self) -> &[EntityId] {
        &self.board.tiles
    }

    fn credit(&mut self, player: EntityId, amount: i64) -> Result<(), EngineError> {
        Game::credit(self, player, amount)
    }

    fn debit(
        &mut self,
        player: EntityId,
        creditor: Option<EntityId>,
        amount: i64,
    ) -> Result<(), EngineError> {
        Game::debit(self, player, creditor, amount)
    }

    fn move_player(
        &mut self,
        player: EntityId,
        position: usize,
        instant: bool,
    ) -> Result<(), EngineError> {
        Game::move_player(self, player, position, instant)
    }

    fn jail(&mut self, player: EntityId) -> Result<(), EngineError> {
        Game::jail(self, player)
    }

    fn park(&mut self, player: EntityId, turns: u32) -> Result<(), EngineError> {
        Game::park(self, player, turns)
    }

    fn choose(&mut self, candidates: &[EntityId]) -> Option<EntityId> {
        candidates.choose(&mut self.rng).copied()
    }

    fn log(&mut self, message: String) {
        info!(target: "core::script", %message);
        self.log.push(message);
    }
}
