// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use capymon_client::RemoteLedger;

pub async fn run<L: RemoteLedger>(ledger: &L, address: &str) -> anyhow::Result<()> {
    ledger.request_test_funds(address).await?;
    println!("Requested test funds for {}", address);
    Ok(())
}
