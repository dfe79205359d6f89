// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Turns a raw arena object into the canonical `MatchState`.
//!
//! Two layouts exist on chain. Bot arenas keep `player_stats` and `bot_stats`
//! at the top level. PvP arenas keep `player_one`/`player_two` (older builds:
//! `p1`/`p2`), each wrapping `stats`, `player`, `starting_hp`, the seat owner
//! and the commit bookkeeping. Kiosk battles live under the `MatchKey` dynamic
//! field of the host's extension storage: `p1`/`p2` with `commitment` and
//! `next_move`, plus a `history` of resolved hits. Everything downstream only
//! sees `MatchState`.

use crate::errors::ClientError;
use crate::kiosk::{self, KioskMatch};
use crate::ledger::{RawObject, RemoteLedger};
use capymon_core::{MatchKind, MatchState, PlayerStats, TypeTable};
use serde_json::Value;

/// Reads the arena and decodes it. Never retries.
pub async fn observe<L: RemoteLedger>(
    ledger: &L,
    arena_id: &str,
    kind: MatchKind,
    table: TypeTable,
) -> Result<MatchState, ClientError> {
    let raw = ledger.read_object(arena_id).await?;
    decode_arena(&raw, kind, table)
}

/// Reads the battle stored with the host kiosk of `battle`.
pub async fn observe_kiosk<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    battle: &KioskMatch,
    table: TypeTable,
) -> Result<MatchState, ClientError> {
    let field = ledger
        .read_dynamic_field(&battle.storage_id, &kiosk::match_key(package))
        .await?;
    let value = field.fields.get("value").cloned().unwrap_or(Value::Null);
    if !value.get("fields").map(Value::is_object).unwrap_or(false) {
        return Err(malformed(&battle.host_kiosk, "no battle in progress"));
    }

    let raw = RawObject {
        object_id: battle.host_kiosk.clone(),
        version: field.version,
        type_name: value.get("type").and_then(Value::as_str).map(str::to_string),
        fields: value,
        initial_shared_version: field.initial_shared_version,
    };
    decode_arena(&raw, MatchKind::Kiosk, table)
}

/// Strips `{ type, fields }` wrappers.
fn inner(v: &Value) -> &Value {
    let mut cur = v;
    while let Some(f) = cur.get("fields") {
        cur = f;
    }
    cur
}

/// Move `Option<T>`: `null`, a bare value, or `{ vec: [] | [x] }`.
fn option(v: Option<&Value>) -> Option<&Value> {
    let v = v?;
    if v.is_null() {
        return None;
    }
    let body = inner(v);
    match body.get("vec").and_then(Value::as_array) {
        Some(items) if body.as_object().map(|o| o.len() == 1).unwrap_or(false) => items.first(),
        _ => Some(v),
    }
}

fn uint(v: Option<&Value>) -> Option<u64> {
    match option(v)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn bytes(arena: &str, v: Option<&Value>) -> Result<Option<Vec<u8>>, ClientError> {
    let Some(v) = option(v) else {
        return Ok(None);
    };
    match v {
        Value::Array(items) => Ok(items
            .iter()
            .map(|i| i.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect()),
        Value::String(s) => hex::decode(s.strip_prefix("0x").unwrap_or(s))
            .map(Some)
            .map_err(|e| malformed(arena, &format!("bad hex {:?}: {}", s, e))),
        _ => Ok(None),
    }
}

fn text(v: Option<&Value>) -> Option<String> {
    option(v).and_then(Value::as_str).map(str::to_string)
}

fn malformed(arena: &str, what: &str) -> ClientError {
    ClientError::MalformedState(format!("{}: {}", arena, what))
}

fn decode_stats(arena: &str, v: &Value, table: TypeTable) -> Result<PlayerStats, ClientError> {
    let s = inner(v);
    let hp = uint(s.get("hp")).ok_or_else(|| malformed(arena, "stats without hp"))?;
    let types = bytes(arena, s.get("types"))?.unwrap_or_default();
    let element = match types.first() {
        Some(&idx) => Some(
            table
                .from_u8(idx)
                .ok_or_else(|| malformed(arena, &format!("unknown type index {}", idx)))?,
        ),
        None => None,
    };

    Ok(PlayerStats {
        hp,
        initial_hp: uint(s.get("initial_hp")).unwrap_or(hp),
        attack: uint(s.get("attack")).unwrap_or_default(),
        defense: uint(s.get("defense")).unwrap_or_default(),
        special_attack: uint(s.get("special_attack")).unwrap_or_default(),
        special_defense: uint(s.get("special_defense")).unwrap_or_default(),
        speed: uint(s.get("speed")).unwrap_or_default(),
        level: uint(s.get("level")).unwrap_or(1),
        element,
        types,
        moves: bytes(arena, s.get("moves"))?.unwrap_or_default(),
        ..Default::default()
    })
}

fn decode_seat(arena: &str, seat: &Value, table: TypeTable) -> Result<PlayerStats, ClientError> {
    let seat = inner(seat);
    let stats = seat.get("stats").ok_or_else(|| malformed(arena, "seat without stats"))?;
    let mut p = decode_stats(arena, stats, table)?;
    let player = seat.get("player").map(inner);

    if let Some(moves) = bytes(arena, player.and_then(|pl| pl.get("moves")))? {
        p.moves = moves;
    }
    p.initial_hp = uint(seat.get("starting_hp"))
        .or_else(|| player.and_then(|pl| pl.get("stats")).and_then(|st| uint(inner(st).get("hp"))))
        .unwrap_or(p.hp);
    p.account = text(seat.get("account")).or_else(|| text(seat.get("kiosk_id")));
    p.next_attack = bytes(arena, seat.get("next_attack"))?;
    p.next_round = uint(seat.get("next_round"));
    Ok(p)
}

/// Kiosk seats carry their moves directly and track the round through
/// `next_move`: a seat that has revealed counts as one step ahead.
fn decode_kiosk_seat(arena: &str, seat: &Value, host: Option<&str>, table: TypeTable) -> Result<PlayerStats, ClientError> {
    let mut p = decode_seat(arena, seat, table)?;
    let seat = inner(seat);
    if let Some(moves) = bytes(arena, seat.get("moves"))? {
        p.moves = moves;
    }
    if p.account.is_none() {
        p.account = text(seat.get("kiosk")).or_else(|| host.map(str::to_string));
    }
    p.next_attack = bytes(arena, seat.get("commitment"))?;
    p.next_round = Some(option(seat.get("next_move")).is_some() as u64);
    Ok(p)
}

pub fn decode_arena(raw: &RawObject, kind: MatchKind, table: TypeTable) -> Result<MatchState, ClientError> {
    let arena = raw.object_id.as_str();
    let fields = inner(&raw.fields);
    if !fields.is_object() {
        return Err(malformed(arena, "object has no fields"));
    }

    let (player_one, player_two) = match kind {
        MatchKind::Pvb => (
            option(fields.get("player_stats")).map(|v| decode_stats(arena, v, table)).transpose()?,
            option(fields.get("bot_stats")).map(|v| decode_stats(arena, v, table)).transpose()?,
        ),
        MatchKind::Pvp => {
            let one = option(fields.get("player_one")).or_else(|| option(fields.get("p1")));
            let two = option(fields.get("player_two")).or_else(|| option(fields.get("p2")));
            (
                one.map(|v| decode_seat(arena, v, table)).transpose()?,
                two.map(|v| decode_seat(arena, v, table)).transpose()?,
            )
        }
        MatchKind::Kiosk => (
            option(fields.get("p1"))
                .map(|v| decode_kiosk_seat(arena, v, Some(arena), table))
                .transpose()?,
            option(fields.get("p2"))
                .map(|v| decode_kiosk_seat(arena, v, None, table))
                .transpose()?,
        ),
    };

    let winner = text(fields.get("winner"));
    let someone_down = [&player_one, &player_two]
        .iter()
        .any(|p| p.as_ref().map(PlayerStats::is_defeated).unwrap_or(false));

    Ok(MatchState {
        arena_id: raw.object_id.clone(),
        initial_shared_version: raw.initial_shared_version.unwrap_or(raw.version),
        round: uint(fields.get("round"))
            .or_else(|| fields.get("history").and_then(Value::as_array).map(|h| h.len() as u64))
            .unwrap_or_default(),
        is_over: winner.is_some() || someone_down,
        winner,
        player_one,
        player_two,
    })
}
