// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Lookups for the kiosk-based game: the owned kiosk, the game extension in
//! it, the registered player and the matchmaking state.
//!
//! Everything here is a read. The matching writes live in `executor`.

use crate::errors::ClientError;
use crate::ledger::{RawObject, RemoteLedger};
use crate::network::{Signer, SuiLedger};
use serde_json::Value;

pub const GAME_MODULE: &str = "the_game";
pub const KIOSK_CAP_TYPE: &str = "0x2::kiosk::KioskOwnerCap";
/// The shared system clock.
pub const CLOCK_ID: &str = "0x6";

pub fn extension_key(package: &str) -> String {
    format!("0x2::kiosk_extension::ExtensionKey<{}::{}::Game>", package, GAME_MODULE)
}

pub fn player_key(package: &str) -> String {
    format!("{}::{}::PlayerKey", package, GAME_MODULE)
}

pub fn match_key(package: &str) -> String {
    format!("{}::{}::MatchKey", package, GAME_MODULE)
}

pub fn invite_type(package: &str) -> String {
    format!("{}::{}::Invite", package, GAME_MODULE)
}

/// A kiosk together with the cap that authorizes its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedKiosk {
    pub kiosk_id: String,
    pub cap_id: String,
}

/// Everything a seat in a kiosk battle needs to read and act.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskMatch {
    /// Kiosk of the player who hosts the battle. Commit and reveal go here.
    pub host_kiosk: String,
    /// Extension storage of the host, where the battle is kept.
    pub storage_id: String,
    /// Our own kiosk; identifies our seat.
    pub kiosk_id: String,
    pub cap_id: String,
}

/// Where our kiosk stands in matchmaking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    /// No request on record.
    Idle,
    /// An order sits in the matchmaking pool.
    Searching,
    /// Paired; the battle is kept by `host_kiosk`.
    Guest { host_kiosk: String },
    /// Paired; the battle is kept by us.
    Host,
}

/// An invitation a host sent to our kiosk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    pub invite_id: String,
    pub host_kiosk: String,
}

fn missing_as_none<T>(read: Result<T, ClientError>) -> Result<Option<T>, ClientError> {
    match read {
        Ok(v) => Ok(Some(v)),
        Err(ClientError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn field_str<'a>(raw: &'a RawObject, pointer: &str) -> Option<&'a str> {
    raw.fields.pointer(pointer).and_then(Value::as_str)
}

/// First kiosk whose owner cap is held by `owner`.
pub async fn owned_kiosk<S: Signer>(ledger: &SuiLedger<S>, owner: &str) -> Result<Option<OwnedKiosk>, ClientError> {
    let caps = ledger.owned_objects(owner, KIOSK_CAP_TYPE).await?;
    let Some(cap) = caps.first() else {
        return Ok(None);
    };
    let kiosk_id = field_str(cap, "/for")
        .ok_or_else(|| ClientError::MalformedState(format!("{}: kiosk cap without kiosk", cap.object_id)))?;
    Ok(Some(OwnedKiosk { kiosk_id: kiosk_id.to_string(), cap_id: cap.object_id.clone() }))
}

/// Id of the game extension's storage bag in `kiosk_id`, if the extension is installed.
pub async fn extension_storage<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    kiosk_id: &str,
) -> Result<Option<String>, ClientError> {
    let Some(ext) = missing_as_none(ledger.read_dynamic_field(kiosk_id, &extension_key(package)).await)? else {
        return Ok(None);
    };
    field_str(&ext, "/value/fields/storage/fields/id/id")
        .map(|id| Some(id.to_string()))
        .ok_or_else(|| ClientError::MalformedState(format!("{}: extension without storage", kiosk_id)))
}

pub async fn has_player<L: RemoteLedger>(ledger: &L, package: &str, storage_id: &str) -> Result<bool, ClientError> {
    Ok(missing_as_none(ledger.read_dynamic_field(storage_id, &player_key(package)).await)?.is_some())
}

/// Decodes the `MatchKey` field value: a pool order, the host kiosk id, or the battle itself.
pub fn decode_status(raw: &RawObject) -> MatchStatus {
    let value = raw.fields.get("value").unwrap_or(&Value::Null);
    if let Some(host) = value.as_str() {
        return MatchStatus::Guest { host_kiosk: host.to_string() };
    }
    let is_order = value
        .get("type")
        .and_then(Value::as_str)
        .map(|t| t.contains("::pool::Order"))
        .unwrap_or(false);
    if is_order {
        MatchStatus::Searching
    } else {
        MatchStatus::Host
    }
}

pub async fn match_status<L: RemoteLedger>(
    ledger: &L,
    package: &str,
    storage_id: &str,
) -> Result<MatchStatus, ClientError> {
    match missing_as_none(ledger.read_dynamic_field(storage_id, &match_key(package)).await)? {
        Some(raw) => Ok(decode_status(&raw)),
        None => Ok(MatchStatus::Idle),
    }
}

/// An invite waiting in `kiosk_id`, if the matchmaker paired us with a host.
pub async fn pending_invite<S: Signer>(
    ledger: &SuiLedger<S>,
    package: &str,
    kiosk_id: &str,
) -> Result<Option<Invite>, ClientError> {
    let invites = ledger.owned_objects(kiosk_id, &invite_type(package)).await?;
    let Some(invite) = invites.first() else {
        return Ok(None);
    };
    let host = field_str(invite, "/kiosk")
        .ok_or_else(|| ClientError::MalformedState(format!("{}: invite without host kiosk", invite.object_id)))?;
    Ok(Some(Invite { invite_id: invite.object_id.clone(), host_kiosk: host.to_string() }))
}
