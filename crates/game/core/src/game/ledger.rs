//! Balances, debts and purchases.
//!
//! Every balance change goes through [`Game::debit`] or [`Game::credit`] so
//! that shortfalls become debts and later income settles them in order.

use serde_json::Value;
use tracing::debug;

use crate::ecs::{Component, DomainType, EntityId, StoreError};
use crate::event::Event;
use crate::types::{Debt, Tile};

use super::{EngineError, Game};

impl Game {
    pub(super) fn check_player(&self, id: EntityId) -> Result<(), EngineError> {
        if self.store.type_of(id) != Some(DomainType::Player) {
            return Err(EngineError::NotAPlayer(id));
        }
        Ok(())
    }

    pub fn balance(&self, player: EntityId) -> i64 {
        self.store
            .get_i64(Component::Balance, player)
            .unwrap_or_default()
    }

    fn set_balance(&mut self, player: EntityId, balance: i64) -> Result<(), EngineError> {
        Ok(self
            .store
            .set(Component::Balance, player, Value::from(balance))?)
    }

    /// Outstanding debts of a player, oldest first.
    pub fn debts(&self, player: EntityId) -> Result<Vec<Debt>, EngineError> {
        match self.store.value(Component::Debts, player) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                StoreError::Conversion {
                    id: player,
                    ty: DomainType::Player,
                    message: e.to_string(),
                }
                .into()
            }),
        }
    }

    fn set_debts(&mut self, player: EntityId, debts: &[Debt]) -> Result<(), EngineError> {
        let value = serde_json::to_value(debts).map_err(|e| StoreError::Conversion {
            id: player,
            ty: DomainType::Player,
            message: e.to_string(),
        })?;
        Ok(self.store.set(Component::Debts, player, value)?)
    }

    /// Takes `amount` from `player` in favour of `creditor` (`None` is the bank).
    ///
    /// When the balance does not cover the amount, the creditor receives what
    /// is available, the balance drops to zero and the shortfall is queued as
    /// a debt to the creditor.
    pub fn debit(
        &mut self,
        player: EntityId,
        creditor: Option<EntityId>,
        amount: i64,
    ) -> Result<(), EngineError> {
        self.check_player(player)?;
        if let Some(creditor) = creditor {
            self.check_player(creditor)?;
        }
        if amount <= 0 {
            return Ok(());
        }

        let balance = self.balance(player);
        let paid = if balance < amount {
            let available = balance.max(0);
            let shortfall = amount - available;

            let mut debts = self.debts(player)?;
            debts.push(Debt {
                creditor,
                amount: shortfall,
            });
            self.set_debts(player, &debts)?;
            self.set_balance(player, 0)?;

            debug!(
                target: "core::game",
                %player,
                amount,
                shortfall,
                "debit exceeds balance, debt queued"
            );
            available
        } else {
            self.set_balance(player, balance - amount)?;
            amount
        };

        self.emit(Event::PlayerBalanceUpdated {
            player,
            delta: -amount,
        })?;

        match creditor {
            Some(creditor) if paid > 0 => self.credit(creditor, paid),
            _ => Ok(()),
        }
    }

    /// Gives `amount` to `player`.
    ///
    /// Outstanding debts absorb the credit first, front to back; each payment
    /// is forwarded to that debt's creditor. Only the remainder reaches the
    /// player's balance.
    pub fn credit(&mut self, player: EntityId, amount: i64) -> Result<(), EngineError> {
        self.check_player(player)?;
        if amount <= 0 {
            return Ok(());
        }

        let mut debts = self.debts(player)?;
        let mut remaining = amount;
        let mut payments = Vec::new();

        while remaining > 0 {
            let Some(front) = debts.first_mut() else {
                break;
            };
            let paid = remaining.min(front.amount);
            front.amount -= paid;
            remaining -= paid;
            payments.push((front.creditor, paid));

            if front.amount <= 0 {
                debts.remove(0);
            }
        }

        if !payments.is_empty() {
            self.set_debts(player, &debts)?;
        }
        if remaining > 0 {
            let balance = self.balance(player);
            self.set_balance(player, balance + remaining)?;
        }

        self.emit(Event::PlayerBalanceUpdated {
            player,
            delta: remaining,
        })?;

        for (creditor, paid) in payments {
            debug!(target: "core::game", %player, paid, creditor = ?creditor, "debt settled");
            if let Some(creditor) = creditor {
                self.credit(creditor, paid)?;
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------------

    /// Buys an unowned tile at its price.
    ///
    /// Returns `false` without changing anything when the tile is owned or
    /// the player cannot afford it.
    pub fn buy(&mut self, tile: EntityId, player: EntityId) -> Result<bool, EngineError> {
        self.check_player(player)?;
        let view = Tile::load(&self.store, tile)?;
        let price = view.price().ok_or(EngineError::NotATile(tile))?;

        if view.owner().is_some() {
            return Ok(false);
        }

        let balance = self.balance(player);
        if balance < price {
            debug!(target: "core::game", %player, %tile, balance, price, "cannot afford tile");
            return Ok(false);
        }

        self.set_balance(player, balance - price)?;
        self.store
            .set(Component::Owner, tile, Value::from(player.0))?;
        if self
            .pending_offer
            .is_some_and(|offer| offer.tile == tile && offer.player == player)
        {
            self.pending_offer = None;
        }

        self.emit(Event::PlayerBalanceUpdated {
            player,
            delta: -price,
        })?;
        self.emit(Event::PropertyPurchase { player, tile })?;
        Ok(true)
    }

    /// Raises a property's development level by one.
    ///
    /// Requires the player to own the tile, a higher rent rung to exist and
    /// the balance to cover the upgrade, which costs the tile's price.
    pub fn upgrade(&mut self, tile: EntityId, player: EntityId) -> Result<bool, EngineError> {
        self.check_player(player)?;
        let Tile::Property(property) = Tile::load(&self.store, tile)? else {
            return Err(EngineError::NotATile(tile));
        };

        if property.owner != Some(player) || property.level >= property.max_level() {
            return Ok(false);
        }

        let balance = self.balance(player);
        if balance < property.price {
            return Ok(false);
        }

        self.set_balance(player, balance - property.price)?;
        self.store
            .set(Component::Level, tile, Value::from(property.level + 1))?;
        self.emit(Event::PlayerBalanceUpdated {
            player,
            delta: -property.price,
        })?;
        self.emit(Event::PropertyUpgrade { player, tile })?;
        Ok(true)
    }
}
