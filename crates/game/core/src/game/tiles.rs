//! Land and pass effects of board tiles.
//!
//! Behaviour is looked up per [`TileKind`] in a capability table. Every
//! handler first runs the shared base routine (the tile's declared `pass` or
//! `land` script, if any) and then its variant-specific logic.

use tracing::{debug, info, warn};

use crate::ecs::{Component, DomainType, EntityId, StoreError};
use crate::event::Event;
use crate::script::{self, Script, TileEvents, player_context};
use crate::selector::forward_distance;
use crate::types::{Card, ChestTile, LootTable, Tile, TileKind};

use super::{EngineError, Game, PurchaseOffer};

type TileHandler = fn(&mut Game, EntityId, &Tile, EntityId) -> Result<(), EngineError>;

/// Land and pass handlers of one tile kind.
struct Capability {
    land: TileHandler,
    pass: TileHandler,
}

const fn capability(kind: TileKind) -> Capability {
    match kind {
        TileKind::Plain | TileKind::Action => Capability {
            land: base_land,
            pass: base_pass,
        },
        TileKind::Buyable | TileKind::Company => Capability {
            land: buyable_land,
            pass: base_pass,
        },
        TileKind::Property => Capability {
            land: property_land,
            pass: base_pass,
        },
        TileKind::Chest => Capability {
            land: chest_land,
            pass: base_pass,
        },
        TileKind::Tax => Capability {
            land: tax_land,
            pass: base_pass,
        },
    }
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Pass,
    Land,
}

impl Game {
    /// Moves a player to a board position and raises [`Event::PlayerMove`].
    pub fn move_player(
        &mut self,
        player: EntityId,
        position: usize,
        instant: bool,
    ) -> Result<(), EngineError> {
        self.check_player(player)?;
        let len = self.board.tiles.len();
        if position >= len {
            return Err(EngineError::PositionOutOfRange { position, len });
        }

        let initial = self.position(player);
        self.set_position(player, position)?;

        self.emit(Event::PlayerMove {
            player,
            initial,
            final_position: position,
            instant,
        })
    }

    /// Moves a player forward by `steps`, wrapping around the board.
    pub fn advance(&mut self, player: EntityId, steps: usize) -> Result<(), EngineError> {
        let len = self.board.tiles.len();
        if len == 0 {
            return Err(EngineError::PositionOutOfRange { position: 0, len });
        }
        let position = (self.position(player) + steps) % len;
        self.move_player(player, position, false)
    }

    pub fn position(&self, player: EntityId) -> usize {
        self.store
            .get_i64(Component::Position, player)
            .unwrap_or_default()
            .max(0) as usize
    }

    pub(super) fn set_position(&mut self, player: EntityId, position: usize) -> Result<(), EngineError> {
        Ok(self
            .store
            .set(Component::Position, player, position.into())?)
    }

    /// Runs pass effects for every tile strictly between the two positions,
    /// then the land effect of the destination.
    pub(super) fn on_move(&mut self, event: &Event) -> Result<(), EngineError> {
        let Event::PlayerMove {
            player,
            initial,
            final_position,
            instant,
        } = *event
        else {
            return Ok(());
        };

        let len = self.board.tiles.len();
        if !instant {
            let distance = forward_distance(initial, final_position, len);
            for step in 1..distance {
                self.pass_tile((initial + step) % len, player)?;
            }
        }

        self.land_tile(final_position, player)
    }

    fn pass_tile(&mut self, position: usize, player: EntityId) -> Result<(), EngineError> {
        let (id, tile) = self.tile_entry(position)?;
        (capability(tile.kind()).pass)(self, id, &tile, player)
    }

    fn land_tile(&mut self, position: usize, player: EntityId) -> Result<(), EngineError> {
        let (id, tile) = self.tile_entry(position)?;
        info!(target: "core::game", %player, tile = %tile, position, "landed");
        (capability(tile.kind()).land)(self, id, &tile, player)
    }

    fn tile_entry(&self, position: usize) -> Result<(EntityId, Tile), EngineError> {
        let id = *self
            .board
            .tiles
            .get(position)
            .ok_or(EngineError::PositionOutOfRange {
                position,
                len: self.board.tiles.len(),
            })?;
        Ok((id, Tile::load(&self.store, id)?))
    }

    /// Records the offer and accepts it right away under `auto_purchase`.
    pub(super) fn on_purchase_offered(&mut self, event: &Event) -> Result<(), EngineError> {
        let Event::PurchaseOffered { player, tile, .. } = *event else {
            return Ok(());
        };
        if self.config.auto_purchase {
            self.buy(tile, player)?;
        }
        Ok(())
    }

    /// Draws from a chest's loot table, runs the card against `player` and
    /// returns the drawn card with its rendered text.
    pub fn draw_card(
        &mut self,
        chest: &ChestTile,
        player: EntityId,
    ) -> Result<Option<(EntityId, String)>, EngineError> {
        let table: LootTable = self.store.construct_as(chest.table)?;
        let Some(index) = table.choice(&mut self.rng) else {
            warn!(target: "core::game", table = %table.name, "loot table has nothing to draw");
            return Ok(None);
        };
        let Some(&card_id) = self.board.cards.get(index) else {
            warn!(target: "core::game", table = %table.name, index, "loot table drew a missing card");
            return Ok(None);
        };

        let card: Card = self.store.construct_as(card_id)?;
        let mut ctx = player_context(player);
        self.execute(&card.script, &mut ctx)?;
        let text = script::render(&self.store, &card.text, &ctx)?;

        Ok(Some((card_id, text)))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Runs the tile's declared script for `phase`, if it has one.
fn run_tile_events(
    game: &mut Game,
    tile: EntityId,
    phase: Phase,
    player: EntityId,
) -> Result<(), EngineError> {
    let Some(value) = game.store.value(Component::Script, tile) else {
        return Ok(());
    };
    if value.is_null() {
        return Ok(());
    }

    let events: TileEvents = serde_json::from_value(value.clone()).map_err(|e| {
        StoreError::Conversion {
            id: tile,
            ty: DomainType::ActionTile,
            message: e.to_string(),
        }
    })?;
    let script: Option<Script> = match phase {
        Phase::Pass => events.pass,
        Phase::Land => events.land,
    };

    match script {
        Some(script) => {
            debug!(target: "core::game", %tile, %player, ?phase, "running tile script");
            game.execute(&script, &mut player_context(player))
        }
        None => Ok(()),
    }
}

fn base_pass(game: &mut Game, id: EntityId, _: &Tile, player: EntityId) -> Result<(), EngineError> {
    run_tile_events(game, id, Phase::Pass, player)
}

fn base_land(game: &mut Game, id: EntityId, _: &Tile, player: EntityId) -> Result<(), EngineError> {
    run_tile_events(game, id, Phase::Land, player)
}

/// Offers an unowned tile to the player who landed on it.
fn buyable_land(game: &mut Game, id: EntityId, tile: &Tile, player: EntityId) -> Result<(), EngineError> {
    base_land(game, id, tile, player)?;
    offer(game, id, tile, player)
}

fn offer(game: &mut Game, id: EntityId, tile: &Tile, player: EntityId) -> Result<(), EngineError> {
    if tile.owner().is_some() {
        return Ok(());
    }
    let Some(price) = tile.price() else {
        return Ok(());
    };

    game.pending_offer = Some(PurchaseOffer {
        player,
        tile: id,
        price,
    });
    game.emit(Event::PurchaseOffered {
        player,
        tile: id,
        price,
    })
}

/// Offers the tile when unowned, otherwise charges rent to the owner.
fn property_land(game: &mut Game, id: EntityId, tile: &Tile, player: EntityId) -> Result<(), EngineError> {
    base_land(game, id, tile, player)?;

    let Tile::Property(property) = tile else {
        return Ok(());
    };
    match property.owner {
        None => offer(game, id, tile, player),
        Some(owner) if owner == player => Ok(()),
        Some(owner) => {
            let rent = property.current_rent();
            info!(target: "core::game", %player, %owner, rent, tile = %property.label, "rent due");
            game.debit(player, Some(owner), rent)
        }
    }
}

fn chest_land(game: &mut Game, id: EntityId, tile: &Tile, player: EntityId) -> Result<(), EngineError> {
    base_land(game, id, tile, player)?;

    let Tile::Chest(chest) = tile else {
        return Ok(());
    };
    if let Some((card, text)) = game.draw_card(chest, player)? {
        info!(target: "core::game", %player, %card, text = %text, "card drawn");
        game.log.push(text.clone());
        game.emit(Event::CardDrawn { player, card, text })?;
    }
    Ok(())
}

fn tax_land(game: &mut Game, id: EntityId, tile: &Tile, player: EntityId) -> Result<(), EngineError> {
    base_land(game, id, tile, player)?;

    let Tile::Tax(tax) = tile else {
        return Ok(());
    };
    let amount = tax.amount(game.balance(player));
    info!(target: "core::game", %player, amount, method = %tax.method, "tax due");
    game.debit(player, None, amount)
}
