// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::bail;
use capymon_client::executor;
use capymon_client::kiosk;
use capymon_client::network::{Signer, SuiLedger};
use capymon_client::RemoteLedger;

/// Makes sure the account can pay for gas, asking the faucet when it cannot.
pub async fn ensure_gas<S: Signer>(ledger: &SuiLedger<S>) -> anyhow::Result<()> {
    let address = ledger.signer().address().to_string();
    let coins = ledger.coin_count(&address).await?;
    if coins > 0 {
        println!("{} already holds {} gas coin(s)", address, coins);
        return Ok(());
    }

    println!("{} has no gas coins, requesting from the faucet...", address);
    ledger.request_test_funds(&address).await?;
    println!("Done. Funds may take a few seconds to appear.");
    Ok(())
}

/// Gas, then a kiosk with the game extension installed. Creates the kiosk
/// when the account has none.
pub async fn run<S: Signer>(ledger: &SuiLedger<S>, package: &str) -> anyhow::Result<()> {
    ensure_gas(ledger).await?;

    let address = ledger.signer().address().to_string();
    let owned = match kiosk::owned_kiosk(ledger, &address).await? {
        Some(owned) => {
            if kiosk::extension_storage(ledger, package, &owned.kiosk_id).await?.is_some() {
                bail!("Kiosk {} already has the game installed; use new-player instead", owned.kiosk_id);
            }
            owned
        }
        None => {
            let owned = executor::create_kiosk(ledger).await?;
            println!("Kiosk created: {} (cap {})", owned.kiosk_id, owned.cap_id);
            owned
        }
    };

    let receipt = executor::install(ledger, package, &owned).await?;
    println!("Game installed in kiosk {} (tx {})", owned.kiosk_id, receipt.digest);
    Ok(())
}
