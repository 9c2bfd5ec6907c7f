mod common;

use board_core::{Component, EngineError, Selector, SelectorError};
use common::{BoardBuilder, config, game, game_with, property};

fn market() -> board_core::BoardDocument {
    BoardBuilder::new(3)
        .group("France")
        .group("Italy")
        .tile(1, property("Paris", 300, "France", &[30]))
        .tile(3, property("Rome", 200, "Italy", &[20]))
        .tile(5, property("Lyon", 250, "France", &[25]))
        .build()
}

#[test]
fn players_filtered_by_balance() {
    let mut game = game(&market());
    let rich = game.add_player("rich").expect("join");
    let poor = game.add_player("poor").expect("join");
    game.debit(poor, None, 600).expect("debit");

    assert_eq!(game.select("Player[balance>=1500]").expect("select"), [rich]);
    assert_eq!(game.select("Player[balance<1500]").expect("select"), [poor]);
    assert_eq!(game.select("Player").expect("select"), [rich, poor]);
}

#[test]
fn properties_filtered_by_group() {
    let game = game(&market());
    let tiles = &game.board().tiles;

    assert_eq!(
        game.select("Property[group=France]").expect("select"),
        [tiles[1], tiles[5]]
    );
    assert_eq!(
        game.select("PropertyTile[group=Italy]").expect("select"),
        [tiles[3]]
    );
    assert_eq!(
        game.select("Property[group=France, price>260]").expect("select"),
        [tiles[1]]
    );
}

#[test]
fn union_of_types() {
    let mut game = game(&market());
    let player = game.add_player("ann").expect("join");
    let rome = game.board().tiles[3];

    let selected = Selector::parse_all(["Player[balance=2000]", "Property[label=Rome]"])
        .expect("parse")
        .select(game.store())
        .expect("select");
    assert_eq!(selected, [rome, player]);
}

#[test]
fn unset_fields_never_match() {
    let mut game = game_with(config(), &market());
    let player = game.add_player("ann").expect("join");

    assert!(game.select("Property[owner=0]").expect("select").is_empty());

    let paris = game.board().tiles[1];
    assert!(game.buy(paris, player).expect("buy"));
    assert_eq!(
        game.store().get_entity(Component::Owner, paris),
        Some(player)
    );
    assert_eq!(
        game.select(&format!("Property[owner={}]", player.0))
            .expect("select"),
        [paris]
    );
}

#[test]
fn malformed_selector_is_reported() {
    let game = game(&market());

    let err = game.select("Property[group=France").expect_err("unclosed");
    assert!(matches!(err, EngineError::Selector(SelectorError::Unclosed { .. })));

    let err = game.select("Property[group]").expect_err("no operator");
    assert!(matches!(
        err,
        EngineError::Selector(SelectorError::MissingOperator { .. })
    ));
}
