// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    /// The request never got a JSON-RPC answer.
    #[error("transport: {0}")]
    Transport(String),
    /// The node answered with an error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Minimal JSON-RPC 2.0 client over HTTP POST.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    url: String,
    client: Client,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::trace!("rpc {} #{}", method, id);
        let resp = self.client.post(&self.url).json(&body).send().await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(RpcError::Transport(format!("{} returned {}", method, resp.status())));
        }

        let mut envelope: Value = resp.json().await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        if let Some(err) = envelope.get("error") {
            return Err(RpcError::Rpc {
                code: err.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: err.get("message").and_then(Value::as_str).unwrap_or("unknown").to_string(),
            });
        }

        let result = envelope.get_mut("result").map(Value::take)
            .ok_or_else(|| RpcError::Decode(format!("{}: missing result", method)))?;
        serde_json::from_value(result).map_err(|e| RpcError::Decode(format!("{}: {}", method, e)))
    }
}
