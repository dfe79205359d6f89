// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Transaction signing is delegated; the client never touches key material.

use crate::errors::ClientError;
use serde_json::Value;
use std::future::Future;
use tokio::process::Command;

pub trait Signer: Send + Sync {
    fn address(&self) -> &str;

    /// Signs base64 transaction bytes, returning a serialized base64 signature.
    fn sign(&self, tx_bytes: &str) -> impl Future<Output = Result<String, ClientError>> + Send;
}

/// Signs through the `sui` CLI keystore (`sui keytool sign`).
#[derive(Debug, Clone)]
pub struct KeytoolSigner {
    address: String,
    binary: String,
}

impl KeytoolSigner {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            binary: "sui".to_string(),
        }
    }

    pub fn with_binary(mut self, binary: &str) -> Self {
        self.binary = binary.to_string();
        self
    }
}

impl Signer for KeytoolSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign(&self, tx_bytes: &str) -> Result<String, ClientError> {
        let output = Command::new(&self.binary)
            .args(["keytool", "sign", "--address", &self.address, "--data", tx_bytes, "--json"])
            .output()
            .await
            .map_err(|e| ClientError::Signer(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            return Err(ClientError::Signer(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let parsed: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| ClientError::Signer(format!("unreadable keytool output: {}", e)))?;
        parsed
            .get("suiSignature")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClientError::Signer("keytool output has no suiSignature".into()))
    }
}
