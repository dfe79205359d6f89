// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! One ledger write per call. Nothing here re-reads the arena.

use crate::errors::ClientError;
use crate::kiosk::{KioskMatch, OwnedKiosk, CLOCK_ID, GAME_MODULE};
use crate::ledger::{EntryCall, RemoteLedger, SubmitReceipt};
use crate::telemetry::ACTIONS_TOTAL;
use capymon_core::{ArenaRef, Commitment, CommitmentStore, MatchKind, PlayerStats};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ActionEffect {
    /// Bot arenas resolve the hit inside the transaction.
    Attacked { player_hp: u64, bot_hp: u64, digest: String },
    Committed { digest: String, hash: String },
    Revealed { digest: String },
}

/// Where commit and reveal calls go.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Arena(&'a ArenaRef),
    Kiosk(&'a KioskMatch),
}

impl Target<'_> {
    fn call(&self, package: &str, function: &str, args: impl FnOnce(EntryCall) -> EntryCall) -> EntryCall {
        match self {
            Target::Arena(arena) => {
                args(EntryCall::new(package, MatchKind::Pvp.module(), function).arg(arena.object_id.as_str()))
            }
            Target::Kiosk(battle) => args(
                EntryCall::new(package, GAME_MODULE, function)
                    .arg(battle.host_kiosk.as_str())
                    .arg(battle.cap_id.as_str()),
            )
            .arg(CLOCK_ID),
        }
    }
}

fn event_u64(receipt: &SubmitReceipt, key: &str) -> Option<u64> {
    receipt.events.iter().find_map(|e| match e.parsed.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    })
}

pub async fn attack<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    arena: &ArenaRef,
    move_value: u8,
) -> Result<ActionEffect, ClientError> {
    let call = EntryCall::new(package, MatchKind::Pvb.module(), "attack")
        .arg(arena.object_id.as_str())
        .arg(move_value);
    let receipt = ledger.submit_entry(&call).await?;
    metrics::counter!(ACTIONS_TOTAL, 1, "action" => "attack");

    let (Some(player_hp), Some(bot_hp)) = (event_u64(&receipt, "player_hp"), event_u64(&receipt, "bot_hp")) else {
        return Err(ClientError::MalformedState(format!(
            "attack on {} emitted no hp update",
            arena.object_id
        )));
    };
    Ok(ActionEffect::Attacked { player_hp, bot_hp, digest: receipt.digest })
}

/// Persists `commitment` and only then submits its hash, so a crash after the
/// transaction lands still leaves the move and salt on disk.
pub async fn commit<L: RemoteLedger, S: CommitmentStore>(
    ledger: &L,
    store: &S,
    package: &str,
    target: Target<'_>,
    commitment: &Commitment,
) -> Result<ActionEffect, ClientError> {
    store.save(commitment)?;

    let call = target.call(package, "commit", |c| c.bytes_arg(&commitment.hash));
    let receipt = ledger.submit_entry(&call).await?;
    metrics::counter!(ACTIONS_TOTAL, 1, "action" => "commit");

    Ok(ActionEffect::Committed { digest: receipt.digest, hash: commitment.hash_hex() })
}

/// Reveals a stored commitment. The record stays until the next commit
/// replaces it or the match ends, so a lagging read can still be answered.
pub async fn reveal<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    target: Target<'_>,
    commitment: &Commitment,
) -> Result<ActionEffect, ClientError> {
    let call = target.call(package, "reveal", |c| c.arg(commitment.move_value).bytes_arg(&commitment.salt));
    let receipt = ledger.submit_entry(&call).await?;
    metrics::counter!(ACTIONS_TOTAL, 1, "action" => "reveal");
    Ok(ActionEffect::Revealed { digest: receipt.digest })
}

/// Result of `create_arena`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArena {
    pub arena: ArenaRef,
    pub digest: String,
    /// Starting stats from the creation event, when the module emits them.
    pub player: Option<PlayerStats>,
    pub bot: Option<PlayerStats>,
}

fn event_stats(receipt: &SubmitReceipt, key: &str) -> Option<PlayerStats> {
    let v = receipt.events.iter().find_map(|e| e.parsed.get(key))?;
    let n = |k: &str| match v.get(k) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    };
    let hp = n("hp")?;
    Some(PlayerStats {
        hp,
        initial_hp: hp,
        attack: n("attack").unwrap_or_default(),
        defense: n("defense").unwrap_or_default(),
        special_attack: n("special_attack").unwrap_or_default(),
        special_defense: n("special_defense").unwrap_or_default(),
        speed: n("speed").unwrap_or_default(),
        level: n("level").unwrap_or(1),
        ..Default::default()
    })
}

pub async fn create_arena<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    kind: MatchKind,
) -> Result<NewArena, ClientError> {
    let module = kind.module();
    let call = EntryCall::new(package, module, "new");
    let receipt = ledger.submit_entry(&call).await?;

    let suffix = format!("{}::Arena", module);
    let created = receipt
        .created
        .iter()
        .find(|c| c.object_type.ends_with(&suffix))
        .ok_or_else(|| ClientError::MalformedState(format!("{} created no arena", call.target())))?;

    Ok(NewArena {
        arena: ArenaRef {
            object_id: created.object_id.clone(),
            initial_shared_version: created.initial_shared_version.unwrap_or(created.version),
        },
        digest: receipt.digest.clone(),
        player: event_stats(&receipt, "player_stats"),
        bot: event_stats(&receipt, "bot_stats"),
    })
}

/// Takes the second seat of a PvP arena.
pub async fn join_arena<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    arena_id: &str,
) -> Result<SubmitReceipt, ClientError> {
    let call = EntryCall::new(package, MatchKind::Pvp.module(), "join").arg(arena_id);
    ledger.submit_entry(&call).await
}

/// Registers a player of the given type in a kiosk with the game extension.
pub async fn new_player<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    kiosk_id: &str,
    cap_id: &str,
    type_index: u8,
) -> Result<SubmitReceipt, ClientError> {
    let call = EntryCall::new(package, GAME_MODULE, "new_player")
        .arg(kiosk_id)
        .arg(cap_id)
        .arg(type_index);
    ledger.submit_entry(&call).await
}

/// Creates a kiosk for the sender, shares it and hands over its owner cap.
pub async fn create_kiosk<L: RemoteLedger>(ledger: &L) -> Result<OwnedKiosk, ClientError> {
    let call = EntryCall::new("0x2", "kiosk", "default");
    let receipt = ledger.submit_entry(&call).await?;

    let created = |suffix: &str| {
        receipt
            .created
            .iter()
            .find(|c| c.object_type.ends_with(suffix))
            .map(|c| c.object_id.clone())
            .ok_or_else(|| ClientError::MalformedState(format!("{} created no {}", call.target(), suffix)))
    };
    Ok(OwnedKiosk {
        kiosk_id: created("::kiosk::Kiosk")?,
        cap_id: created("::kiosk::KioskOwnerCap")?,
    })
}

/// Installs the game extension into `kiosk`.
pub async fn install<L: RemoteLedger>(ledger: &L, package: &str, kiosk: &OwnedKiosk) -> Result<SubmitReceipt, ClientError> {
    let call = EntryCall::new(package, GAME_MODULE, "install")
        .arg(kiosk.kiosk_id.as_str())
        .arg(kiosk.cap_id.as_str());
    ledger.submit_entry(&call).await
}

/// Puts an order for a match into the shared matchmaking pool of `game_id`.
pub async fn request_match<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    game_id: &str,
    kiosk: &OwnedKiosk,
) -> Result<SubmitReceipt, ClientError> {
    let call = EntryCall::new(package, GAME_MODULE, "play")
        .arg(game_id)
        .arg(kiosk.kiosk_id.as_str())
        .arg(kiosk.cap_id.as_str());
    ledger.submit_entry(&call).await
}

/// Withdraws a pending matchmaking order.
pub async fn cancel_search<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    game_id: &str,
    kiosk: &OwnedKiosk,
) -> Result<SubmitReceipt, ClientError> {
    let call = EntryCall::new(package, GAME_MODULE, "cancel")
        .arg(game_id)
        .arg(kiosk.kiosk_id.as_str())
        .arg(kiosk.cap_id.as_str());
    ledger.submit_entry(&call).await
}

/// Accepts an invite and takes the second seat of the host's battle.
pub async fn join_match<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    kiosk: &OwnedKiosk,
    invite: &crate::kiosk::Invite,
) -> Result<SubmitReceipt, ClientError> {
    let call = EntryCall::new(package, GAME_MODULE, "join")
        .arg(kiosk.kiosk_id.as_str())
        .arg(kiosk.cap_id.as_str())
        .arg(invite.host_kiosk.as_str())
        .arg(invite.invite_id.as_str());
    ledger.submit_entry(&call).await
}
