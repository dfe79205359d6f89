// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Shared setup for every subcommand: config, ledger connection, local store.

use anyhow::Context;
use capymon_client::network::{KeytoolSigner, SuiLedger};
use capymon_client::ClientConfig;
use capymon_persistence::FileCommitmentStore;
use std::path::Path;

/// Defaults, then the config file if given, then `CAPYMON_*` variables.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    let base = match path {
        Some(p) => ClientConfig::load(p)?,
        None => ClientConfig::default(),
    };
    Ok(base.from_env())
}

pub fn connect(config: &ClientConfig) -> anyhow::Result<SuiLedger<KeytoolSigner>> {
    config.validate()?;
    let signer = KeytoolSigner::new(&config.address).with_binary(&config.sui_binary);
    let ledger = SuiLedger::new(config, signer)
        .with_context(|| format!("Failed to set up client for {}", config.rpc_url))?;
    Ok(ledger)
}

pub fn open_store(config: &ClientConfig) -> anyhow::Result<FileCommitmentStore> {
    FileCommitmentStore::open(&config.store_dir)
        .with_context(|| format!("Failed to open commitment store at {}", config.store_dir.display()))
}
