// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::errors::ClientError;
use capymon_core::commitment::DEFAULT_SALT_LEN;
use capymon_core::selector::WaitReason;
use capymon_core::TypeTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEVNET_RPC_URL: &str = "https://fullnode.devnet.sui.io:443";
pub const DEVNET_FAUCET_URL: &str = "https://faucet.devnet.sui.io";
pub const DEFAULT_PACKAGE: &str =
    "0xe9143d117939e95c9fc623760c23799420ce2173199f2668d891a87430beff48";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub faucet_url: String,
    /// Game package the entry functions live in.
    pub package_id: String,
    /// Shared matchmaking object of the kiosk game. Only kiosk battles need it.
    pub game_id: String,
    /// Our account address. Used to find our seat in a PvP arena.
    pub address: String,
    /// Where pending commitments are kept between commit and reveal.
    pub store_dir: PathBuf,
    /// `sui` executable used for signing.
    pub sui_binary: String,
    pub type_table: TypeTable,
    pub opponent_wait_ms: u64,
    pub reveal_wait_ms: u64,
    pub fallback_wait_ms: u64,
    pub retry_backoff_ms: u64,
    pub rejection_backoff_ms: u64,
    pub max_transient_retries: u32,
    pub gas_budget: u64,
    pub salt_len: usize,
    /// Wake the poll loop on arena events instead of only on timers.
    pub use_events: bool,
    pub event_poll_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEVNET_RPC_URL.to_string(),
            faucet_url: DEVNET_FAUCET_URL.to_string(),
            package_id: DEFAULT_PACKAGE.to_string(),
            game_id: String::new(),
            address: String::new(),
            store_dir: PathBuf::from(".capymon"),
            sui_binary: "sui".to_string(),
            type_table: TypeTable::Arena,
            opponent_wait_ms: WaitReason::Opponent.default_delay().as_millis() as u64,
            reveal_wait_ms: WaitReason::OpponentCommit.default_delay().as_millis() as u64,
            fallback_wait_ms: WaitReason::Fallback.default_delay().as_millis() as u64,
            retry_backoff_ms: 2000,
            rejection_backoff_ms: 500,
            max_transient_retries: 5,
            gas_budget: 100_000_000,
            salt_len: DEFAULT_SALT_LEN,
            use_events: false,
            event_poll_ms: 1000,
            request_timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let data = std::fs::read(path)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_slice(&data)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Applies `CAPYMON_*` environment overrides.
    pub fn from_env(mut self) -> Self {
        if let Ok(v) = std::env::var("CAPYMON_RPC_URL") {
            self.rpc_url = v;
        }
        if let Ok(v) = std::env::var("CAPYMON_FAUCET_URL") {
            self.faucet_url = v;
        }
        if let Ok(v) = std::env::var("CAPYMON_PACKAGE") {
            self.package_id = v;
        }
        if let Ok(v) = std::env::var("CAPYMON_GAME") {
            self.game_id = v;
        }
        if let Ok(v) = std::env::var("CAPYMON_ADDRESS") {
            self.address = v;
        }
        if let Ok(v) = std::env::var("CAPYMON_STORE_DIR") {
            self.store_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CAPYMON_SUI_BIN") {
            self.sui_binary = v;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.address.is_empty() {
            return Err(ClientError::Config("address is not set".into()));
        }
        if self.package_id.is_empty() {
            return Err(ClientError::Config("package_id is not set".into()));
        }
        if self.salt_len == 0 {
            return Err(ClientError::Config("salt_len must be positive".into()));
        }
        Ok(())
    }

    pub fn wait_for(&self, reason: WaitReason) -> Duration {
        let ms = match reason {
            WaitReason::Opponent => self.opponent_wait_ms,
            WaitReason::OpponentCommit => self.reveal_wait_ms,
            WaitReason::Fallback => self.fallback_wait_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn rejection_backoff(&self) -> Duration {
        Duration::from_millis(self.rejection_backoff_ms)
    }
}
