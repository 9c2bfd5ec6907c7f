mod common;

use board_core::{
    BoardError, Component, DomainType, EngineError, EntityStore, ErrorSeverity, Game, GameError,
    Slot, StoreError, Tile,
};
use common::{BoardBuilder, chest, config, property};
use serde_json::json;

#[test]
fn dimension_eleven_requires_forty_tiles() {
    let board = BoardBuilder::new(11).build();
    assert_eq!(board.tiles.len(), 40);
    let game = Game::from_board(config(), &board).expect("40 tiles load");
    assert_eq!(game.board().tiles.len(), 40);
    assert_eq!(game.board().dimension, 11);

    for (board, count) in [
        (BoardBuilder::new(11).without_last_tile().build(), 39),
        (BoardBuilder::new(11).with_extra_tile().build(), 41),
    ] {
        let err = Game::from_board(config(), &board).expect_err("wrong tile count");
        assert_eq!(
            err,
            EngineError::Board(BoardError::TileCount {
                count,
                dimension: 11,
                expected: 40,
            })
        );
        assert_eq!(err.error_code(), "BOARD_TILE_COUNT");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }
}

#[test]
fn rejected_board_stores_nothing() {
    let board = BoardBuilder::new(4).without_last_tile().build();
    let mut game = Game::new(config());

    assert!(game.load(&board).is_err());
    assert!(game.store().is_empty());

    // groups and cards would be created before the chest tile is reached
    let board = BoardBuilder::new(4)
        .card("first", json!("log first"))
        .group("France")
        .tile(3, chest("Chance", "Nope"))
        .build();
    assert!(matches!(
        game.load(&board),
        Err(EngineError::Board(BoardError::UnknownLootTable { index: 3, .. }))
    ));
    assert!(game.store().is_empty());

    let board = BoardBuilder::new(4)
        .card("first", json!("log first"))
        .tile(5, json!({ "type": "Property", "label": "Paris", "price": 300, "group": "France" }))
        .build();
    assert!(matches!(
        game.load(&board),
        Err(EngineError::Store(StoreError::Conversion { .. }))
    ));
    assert!(game.store().is_empty());
    assert!(game.board().tiles.is_empty());

    let board = BoardBuilder::new(4).build();
    game.load(&board).expect("valid board loads");
    assert_eq!(game.select("Tile[label=Go]").expect("select"), [game.board().tiles[0]]);
    assert!(matches!(
        game.load(&board),
        Err(EngineError::Board(BoardError::AlreadyLoaded))
    ));
}

#[test]
fn chest_tiles_bind_loot_tables_by_name() {
    let board = BoardBuilder::new(3)
        .card("first", json!("log first"))
        .loot_table("Chance", &[0], &[1.0])
        .tile(3, chest("Chance", "Chance"))
        .build();
    let game = Game::from_board(config(), &board).expect("loads");

    let Tile::Chest(tile) = game.tile_at(3).expect("tile") else {
        panic!("expected a chest tile");
    };
    assert_eq!(tile.table, game.board().loot_tables[0]);

    let missing = BoardBuilder::new(3).tile(3, chest("Chance", "Nope")).build();
    assert!(matches!(
        Game::from_board(config(), &missing),
        Err(EngineError::Board(BoardError::UnknownLootTable { index: 3, .. }))
    ));

    let dangling = BoardBuilder::new(3).loot_table("Chance", &[4], &[1.0]).build();
    assert!(matches!(
        Game::from_board(config(), &dangling),
        Err(EngineError::Board(BoardError::UnknownCard { card: 4, .. }))
    ));
}

#[test]
fn tiles_without_type_are_rejected() {
    let board = BoardBuilder::new(3).tile(5, json!({ "label": "Mystery" })).build();
    assert!(matches!(
        Game::from_board(config(), &board),
        Err(EngineError::Board(BoardError::MissingTileType { index: 5 }))
    ));
}

#[test]
fn associate_then_construct_round_trips() {
    let mut store = EntityStore::new();
    let object = property("Paris", 400, "France", &[50, 200, 600]);

    let id = store
        .create_entity(Some(&object), Some(DomainType::PropertyTile))
        .expect("create");
    let constructed = store.construct(id).expect("construct");

    assert_eq!(constructed.ty, DomainType::PropertyTile);
    for (field, value) in object.as_object().expect("object") {
        assert_eq!(constructed.fields.get(field), Some(value), "field {field}");
    }
    assert_eq!(constructed.fields["owner"], json!(null));
    assert_eq!(constructed.fields["level"], json!(0));
}

#[test]
fn store_get_set_and_assign() {
    let mut store = EntityStore::new();
    let a = store.create_entity(None, None).expect("create");
    let b = store.create_entity(None, None).expect("create");

    assert_eq!(store.get(Component::Price, b), &Slot::Unset);
    store.set(Component::Price, b, json!(120)).expect("set");
    assert_eq!(store.get(Component::Price, b), &Slot::Set(json!(120)));
    assert_eq!(store.get(Component::Price, a), &Slot::Unset);

    store.assign(Component::Price, b).expect("assign");
    assert_eq!(store.get(Component::Price, b), &Slot::Set(json!(120)));

    let err = store
        .set(Component::Price, board_core::EntityId(2), json!(1))
        .expect_err("out of bounds");
    assert!(matches!(err, StoreError::OutOfBounds { len: 2, .. }));
    assert_eq!(err.error_code(), "STORE_OUT_OF_BOUNDS");
}

#[test]
fn unresolvable_mask_is_fatal() {
    let mut store = EntityStore::new();
    let id = store.create_entity(None, None).expect("create");
    store.set(Component::Debts, id, json!([])).expect("set");

    let err = store.construct(id).expect_err("no type has only debts");
    assert_eq!(err.severity(), ErrorSeverity::Fatal);
}
