// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::{anyhow, bail};
use capymon_client::executor;
use capymon_client::kiosk::{self, OwnedKiosk};
use capymon_client::network::{Signer, SuiLedger};
use capymon_client::RemoteLedger;
use capymon_core::{Element, TypeTable};

/// Resolves a type given by name (`water`) or by index (`0`) against the kiosk table.
pub fn parse_type(input: &str) -> anyhow::Result<u8> {
    let table = TypeTable::Kiosk;
    if let Ok(idx) = input.parse::<u8>() {
        return table
            .from_u8(idx)
            .map(|_| idx)
            .ok_or_else(|| anyhow!("type index {} out of range", idx));
    }
    table
        .elements()
        .iter()
        .find(|e| e.name().eq_ignore_ascii_case(input))
        .and_then(|e| table.index_of(*e))
        .ok_or_else(|| {
            let names: Vec<&str> = table.elements().iter().map(Element::name).collect();
            anyhow!("unknown type {:?}, expected one of {}", input, names.join(", "))
        })
}

/// The kiosk given on the command line, or the one the account owns.
pub async fn resolve_kiosk<S: Signer>(
    ledger: &SuiLedger<S>,
    kiosk: Option<String>,
    cap: Option<String>,
) -> anyhow::Result<OwnedKiosk> {
    match (kiosk, cap) {
        (Some(kiosk_id), Some(cap_id)) => Ok(OwnedKiosk { kiosk_id, cap_id }),
        (None, None) => {
            let address = ledger.signer().address().to_string();
            kiosk::owned_kiosk(ledger, &address)
                .await?
                .ok_or_else(|| anyhow!("{} owns no kiosk; run init first", address))
        }
        _ => bail!("--kiosk and --cap go together"),
    }
}

/// Extension storage of `kiosk_id`, failing when the game is not installed.
pub async fn require_storage<L: RemoteLedger>(ledger: &L, package: &str, kiosk_id: &str) -> anyhow::Result<String> {
    kiosk::extension_storage(ledger, package, kiosk_id)
        .await?
        .ok_or_else(|| anyhow!("Kiosk {} does not have the game installed; run init first", kiosk_id))
}

pub async fn run<S: Signer>(
    ledger: &SuiLedger<S>,
    package: &str,
    kiosk: Option<String>,
    cap: Option<String>,
    type_name: &str,
) -> anyhow::Result<()> {
    let type_index = parse_type(type_name)?;
    let owned = resolve_kiosk(ledger, kiosk, cap).await?;
    let storage = require_storage(ledger, package, &owned.kiosk_id).await?;
    if kiosk::has_player(ledger, package, &storage).await? {
        bail!("Kiosk {} already has a player", owned.kiosk_id);
    }

    let receipt = executor::new_player(ledger, package, &owned.kiosk_id, &owned.cap_id, type_index).await?;
    println!("Player created in kiosk {} (tx {})", owned.kiosk_id, receipt.digest);
    Ok(())
}
