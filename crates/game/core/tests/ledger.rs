mod common;

use board_core::{Debt, Event, GameConfig};
use common::{BoardBuilder, config, game, game_with, property, tax};

fn funded(balance: i64) -> GameConfig {
    GameConfig {
        starting_balance: balance,
        ..config()
    }
}

#[test]
fn debt_chain_settles_front_to_back() {
    let board = BoardBuilder::new(3).build();
    let mut game = game_with(funded(10), &board);
    let debtor = game.add_player("debtor").expect("join");
    let creditor = game.add_player("creditor").expect("join");

    game.debit(debtor, Some(creditor), 30).expect("debit");

    assert_eq!(game.balance(debtor), 0);
    assert_eq!(game.balance(creditor), 20);
    assert_eq!(
        game.debts(debtor).expect("debts"),
        [Debt {
            creditor: Some(creditor),
            amount: 20
        }]
    );

    game.credit(debtor, 25).expect("credit");

    assert!(game.debts(debtor).expect("debts").is_empty());
    assert_eq!(game.balance(creditor), 40);
    assert_eq!(game.balance(debtor), 5);
}

#[test]
fn partial_credit_reduces_front_debt() {
    let board = BoardBuilder::new(3).build();
    let mut game = game_with(funded(0), &board);
    let debtor = game.add_player("debtor").expect("join");
    let first = game.add_player("first").expect("join");
    let second = game.add_player("second").expect("join");

    game.debit(debtor, Some(first), 30).expect("debit");
    game.debit(debtor, None, 10).expect("debit bank");
    game.debit(debtor, Some(second), 5).expect("debit");

    game.credit(debtor, 35).expect("credit");

    assert_eq!(game.balance(first), 30);
    assert_eq!(game.balance(second), 0);
    assert_eq!(game.balance(debtor), 0);
    assert_eq!(
        game.debts(debtor).expect("debts"),
        [
            Debt {
                creditor: None,
                amount: 5
            },
            Debt {
                creditor: Some(second),
                amount: 5
            }
        ]
    );
}

#[test]
fn debit_raises_balance_event() {
    let board = BoardBuilder::new(3).build();
    let mut game = game_with(funded(100), &board);
    let player = game.add_player("ann").expect("join");

    game.debit(player, None, 40).expect("debit");

    assert_eq!(
        game.journal().last(),
        Some(&Event::PlayerBalanceUpdated { player, delta: -40 })
    );
}

#[test]
fn landing_offers_then_charges_rent() {
    let board = BoardBuilder::new(3)
        .group("France")
        .tile(2, property("Paris", 300, "France", &[50, 150]))
        .build();
    let mut game = game_with(funded(1000), &board);
    let owner = game.add_player("owner").expect("join");
    let visitor = game.add_player("visitor").expect("join");
    let paris = game.board().tiles[2];

    game.advance(owner, 2).expect("advance");
    let offer = game.pending_offer().expect("offer made");
    assert_eq!((offer.player, offer.tile, offer.price), (owner, paris, 300));

    assert!(game.buy(paris, owner).expect("buy"));
    assert!(!game.buy(paris, visitor).expect("already owned"));
    assert_eq!(game.balance(owner), 700);
    assert!(game.pending_offer().is_none());

    game.advance(visitor, 2).expect("advance");
    assert_eq!(game.balance(visitor), 950);
    assert_eq!(game.balance(owner), 750);

    // landing on your own tile is free
    game.advance(owner, 8).expect("full lap");
    assert_eq!(game.balance(owner), 750);
}

#[test]
fn upgrade_requires_owner_rung_and_funds() {
    let board = BoardBuilder::new(3)
        .tile(2, property("Paris", 300, "France", &[50, 150]))
        .build();
    let mut game = game_with(funded(700), &board);
    let owner = game.add_player("owner").expect("join");
    let other = game.add_player("other").expect("join");
    let paris = game.board().tiles[2];

    assert!(!game.upgrade(paris, owner).expect("not owned yet"));
    assert!(game.buy(paris, owner).expect("buy"));
    assert!(!game.upgrade(paris, other).expect("not the owner"));

    assert!(game.upgrade(paris, owner).expect("upgrade"));
    assert_eq!(game.balance(owner), 100);
    assert!(!game.upgrade(paris, owner).expect("top rung reached"));

    assert!(matches!(
        game.journal().last(),
        Some(Event::PropertyUpgrade { .. })
    ));

    game.advance(other, 2).expect("advance");
    assert_eq!(game.balance(other), 550);
}

#[test]
fn insufficient_funds_rejects_purchase() {
    let board = BoardBuilder::new(3)
        .tile(1, property("Paris", 300, "France", &[50]))
        .build();
    let mut game = game_with(funded(100), &board);
    let player = game.add_player("ann").expect("join");
    let paris = game.board().tiles[1];

    assert!(!game.buy(paris, player).expect("buy"));
    assert_eq!(game.balance(player), 100);
}

#[test]
fn auto_purchase_accepts_offers() {
    let board = BoardBuilder::new(3)
        .tile(1, property("Paris", 300, "France", &[50]))
        .build();
    let config = GameConfig {
        auto_purchase: true,
        ..funded(500)
    };
    let mut game = game_with(config, &board);
    let player = game.add_player("ann").expect("join");

    game.advance(player, 1).expect("advance");

    let tile = game.tile_at(1).expect("tile");
    assert_eq!(tile.owner(), Some(player));
    assert_eq!(game.balance(player), 200);
}

#[test]
fn tax_methods() {
    let board = BoardBuilder::new(3)
        .tile(1, tax("Income Tax", "percent", 10))
        .tile(2, tax("Luxury Tax", "flat", 75))
        .build();
    let mut game = game(&board);
    let player = game.add_player("ann").expect("join");

    game.advance(player, 1).expect("advance");
    assert_eq!(game.balance(player), 1800);

    game.advance(player, 1).expect("advance");
    assert_eq!(game.balance(player), 1725);
}
