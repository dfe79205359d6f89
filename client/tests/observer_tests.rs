use capymon_client::ledger::RawObject;
use capymon_client::observer::decode_arena;
use capymon_client::ClientError;
use capymon_core::{Element, MatchKind, TypeTable};
use serde_json::{json, Value};

fn raw(fields: Value) -> RawObject {
    RawObject {
        object_id: "0xa7e7a".to_string(),
        version: 21,
        type_name: None,
        fields,
        initial_shared_version: None,
    }
}

fn stats(hp: &str, types: Value) -> Value {
    json!({ "type": "0xpkg::stats::Stats", "fields": {
        "hp": hp, "attack": "14", "defense": "9", "special_attack": "13",
        "special_defense": "8", "speed": "6", "level": "2", "types": types,
        "moves": [0, 1],
    }})
}

#[test]
fn test_pvp_seat_layout() {
    let fields = json!({
        "round": "4",
        "winner": null,
        "player_one": { "fields": {
            "stats": stats("7000000000", json!([2])),
            "starting_hp": "10000000000",
            "account": "0xa1",
            "next_attack": [9, 9, 9],
            "next_round": "4",
        }},
        "player_two": { "fields": {
            "stats": stats("9000000000", json!([0])),
            "starting_hp": "10000000000",
            "account": "0xb2",
            "next_attack": null,
            "next_round": "3",
        }},
    });

    let state = decode_arena(&raw(fields), MatchKind::Pvp, TypeTable::Arena).unwrap();
    assert_eq!(state.round, 4);
    assert!(!state.is_over);
    // Not shared-owned in the fixture: falls back to the object version.
    assert_eq!(state.initial_shared_version, 21);

    let one = state.player_one.as_ref().unwrap();
    assert_eq!(one.hp, 7_000_000_000);
    assert_eq!(one.initial_hp, 10_000_000_000);
    assert_eq!(one.element, Some(Element::Water));
    assert_eq!(one.account.as_deref(), Some("0xa1"));
    assert_eq!(one.next_attack, Some(vec![9, 9, 9]));
    assert_eq!(one.next_round, Some(4));
    assert_eq!(one.hp_percent(), 70);

    let two = state.player_two.as_ref().unwrap();
    assert_eq!(two.element, Some(Element::Fire));
    assert!(two.next_attack.is_none());
    assert_eq!(two.next_round, Some(3));

    let (me, opponent) = state.perspective("0xB2", MatchKind::Pvp);
    assert_eq!(me.unwrap().account.as_deref(), Some("0xb2"));
    assert_eq!(opponent.unwrap().account.as_deref(), Some("0xa1"));
}

#[test]
fn test_legacy_seat_names_and_nested_player() {
    let fields = json!({
        "round": 0,
        "p1": { "fields": {
            "stats": stats("5000000000", json!([3])),
            "player": { "fields": {
                "moves": [4, 5, 6],
                "stats": { "fields": { "hp": "8000000000" } },
            }},
            "kiosk_id": "0xk1",
            "next_attack": { "vec": [] },
        }},
        "p2": null,
    });

    let state = decode_arena(&raw(fields), MatchKind::Pvp, TypeTable::Kiosk).unwrap();
    let one = state.player_one.unwrap();
    assert_eq!(one.moves, vec![4, 5, 6]);
    assert_eq!(one.initial_hp, 8_000_000_000);
    assert_eq!(one.account.as_deref(), Some("0xk1"));
    assert_eq!(one.element, Some(Element::Earth));
    assert!(one.next_attack.is_none());
    assert!(one.next_round.is_none());
    assert!(state.player_two.is_none());
}

#[test]
fn test_initial_hp_defaults_to_current() {
    let fields = json!({
        "player_one": { "fields": { "stats": stats("300", json!([])), "account": "0xa1" } },
    });
    let state = decode_arena(&raw(fields), MatchKind::Pvp, TypeTable::Arena).unwrap();
    let one = state.player_one.unwrap();
    assert_eq!(one.initial_hp, 300);
    assert!(one.element.is_none());
}

#[test]
fn test_bot_arena_layout() {
    let fields = json!({
        "player_stats": stats("0", json!([1])),
        "bot_stats": stats("4000000000", json!([0])),
    });
    let state = decode_arena(&raw(fields), MatchKind::Pvb, TypeTable::Arena).unwrap();
    assert!(state.is_over);
    assert_eq!(state.round, 0);
    assert_eq!(state.player_one.as_ref().unwrap().element, Some(Element::Air));
    assert_eq!(state.player_two.as_ref().unwrap().hp, 4_000_000_000);
}

#[test]
fn test_winner_marks_match_over() {
    let fields = json!({
        "winner": "0xb2",
        "player_one": { "fields": { "stats": stats("10", json!([0])), "account": "0xa1" } },
        "player_two": { "fields": { "stats": stats("10", json!([0])), "account": "0xb2" } },
    });
    let state = decode_arena(&raw(fields), MatchKind::Pvp, TypeTable::Arena).unwrap();
    assert!(state.is_over);
    assert_eq!(state.winner.as_deref(), Some("0xb2"));
}

#[test]
fn test_unknown_type_index_is_malformed() {
    let fields = json!({
        "player_stats": stats("10", json!([7])),
        "bot_stats": stats("10", json!([0])),
    });
    let err = decode_arena(&raw(fields), MatchKind::Pvb, TypeTable::Arena).unwrap_err();
    assert!(matches!(err, ClientError::MalformedState(_)));
}

#[test]
fn test_missing_hp_is_malformed() {
    let fields = json!({
        "player_stats": { "fields": { "attack": "1" } },
        "bot_stats": stats("10", json!([0])),
    });
    assert!(matches!(
        decode_arena(&raw(fields), MatchKind::Pvb, TypeTable::Arena),
        Err(ClientError::MalformedState(_))
    ));
    assert!(matches!(
        decode_arena(&raw(Value::Null), MatchKind::Pvb, TypeTable::Arena),
        Err(ClientError::MalformedState(_))
    ));
}

#[test]
fn test_hex_commitment_string() {
    let seat = |next_attack: Value| json!({ "fields": {
        "stats": stats("10", json!([0])),
        "account": "0xa1",
        "next_attack": next_attack,
    }});

    let state = decode_arena(&raw(json!({ "player_one": seat(json!("0x0aff10")) })), MatchKind::Pvp, TypeTable::Arena)
        .unwrap();
    assert_eq!(state.player_one.unwrap().next_attack, Some(vec![0x0a, 0xff, 0x10]));

    // A bad digit or a dangling nibble must not shorten the hash.
    for bad in ["0xzz12", "0xabc"] {
        let err = decode_arena(&raw(json!({ "player_one": seat(json!(bad)) })), MatchKind::Pvp, TypeTable::Arena)
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedState(ref m) if m.contains("hex")), "{}: {:?}", bad, err);
    }
}

#[test]
fn test_kiosk_battle_layout() {
    let seat = |hp: &str, commitment: Value, next_move: Value| json!({ "fields": {
        "stats": stats(hp, json!([3])),
        "moves": [4, 5, 6, 7],
        "commitment": commitment,
        "next_move": next_move,
    }});
    let fields = json!({
        "p1": seat("6000000000", json!([1, 2, 3]), Value::Null),
        "p2": seat("9000000000", Value::Null, json!(5)),
        "winner": null,
        "history": [{ "fields": { "damage": "10" } }, { "fields": { "damage": "12" } }],
    });

    let state = decode_arena(&raw(fields), MatchKind::Kiosk, TypeTable::Kiosk).unwrap();
    assert_eq!(state.round, 2);
    assert!(!state.is_over);

    let host = state.player_one.as_ref().unwrap();
    assert_eq!(host.account.as_deref(), Some("0xa7e7a"), "host seat belongs to the kiosk holding the battle");
    assert_eq!(host.element, Some(Element::Earth));
    assert_eq!(host.moves, vec![4, 5, 6, 7]);
    assert_eq!(host.next_attack, Some(vec![1, 2, 3]));
    assert_eq!(host.next_round, Some(0));

    let guest = state.player_two.as_ref().unwrap();
    assert!(guest.account.is_none());
    assert!(guest.next_attack.is_none());
    // Revealed this round.
    assert_eq!(guest.next_round, Some(1));

    let (me, _) = state.perspective("0xk2", MatchKind::Kiosk);
    assert_eq!(me.unwrap().hp, 9_000_000_000);
}
