// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Matchmaking for kiosk battles.

use crate::commands::player::{require_storage, resolve_kiosk};
use anyhow::bail;
use capymon_client::executor;
use capymon_client::kiosk::{self, KioskMatch, MatchStatus, OwnedKiosk};
use capymon_client::network::{Signer, SuiLedger};

/// What the caller should do after one matchmaking step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// Nothing to play yet.
    Done,
    Play(KioskMatch),
}

fn seat(owned: &OwnedKiosk, host_kiosk: String, storage_id: String) -> Next {
    Next::Play(KioskMatch {
        host_kiosk,
        storage_id,
        kiosk_id: owned.kiosk_id.clone(),
        cap_id: owned.cap_id.clone(),
    })
}

/// Requests a match, joins one we were invited to, or resumes the one in progress.
/// With `cancel`, a search that found nobody yet is withdrawn instead.
pub async fn run<S: Signer>(
    ledger: &SuiLedger<S>,
    package: &str,
    game_id: &str,
    cancel: bool,
) -> anyhow::Result<Next> {
    if game_id.is_empty() {
        bail!("game_id is not configured (CAPYMON_GAME)");
    }
    let owned = resolve_kiosk(ledger, None, None).await?;
    let storage = require_storage(ledger, package, &owned.kiosk_id).await?;
    if !kiosk::has_player(ledger, package, &storage).await? {
        bail!("Kiosk {} has no player; run new-player first", owned.kiosk_id);
    }

    match kiosk::match_status(ledger, package, &storage).await? {
        MatchStatus::Idle if cancel => {
            println!("No search to cancel");
            Ok(Next::Done)
        }
        MatchStatus::Idle => {
            let receipt = executor::request_match(ledger, package, game_id, &owned).await?;
            println!("Match search started (tx {}). Run battle again to check on it.", receipt.digest);
            Ok(Next::Done)
        }
        MatchStatus::Searching => match kiosk::pending_invite(ledger, package, &owned.kiosk_id).await? {
            Some(invite) if !cancel => {
                let receipt = executor::join_match(ledger, package, &owned, &invite).await?;
                println!("Joined the battle hosted by {} (tx {})", invite.host_kiosk, receipt.digest);
                let host_storage = require_storage(ledger, package, &invite.host_kiosk).await?;
                Ok(seat(&owned, invite.host_kiosk, host_storage))
            }
            _ if cancel => {
                let receipt = executor::cancel_search(ledger, package, game_id, &owned).await?;
                println!("Match search cancelled (tx {})", receipt.digest);
                Ok(Next::Done)
            }
            _ => {
                println!("Still searching for an opponent. Use --cancel to stop.");
                Ok(Next::Done)
            }
        },
        MatchStatus::Guest { host_kiosk } => {
            println!("Resuming as guest of {}", host_kiosk);
            let host_storage = require_storage(ledger, package, &host_kiosk).await?;
            Ok(seat(&owned, host_kiosk, host_storage))
        }
        MatchStatus::Host => {
            println!("Resuming as host");
            Ok(seat(&owned, owned.kiosk_id.clone(), storage))
        }
    }
}
