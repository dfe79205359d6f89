// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! `RemoteLedger` over the Sui full node JSON-RPC API and the devnet faucet.

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::ledger::{CreatedObject, EntryCall, EventFilter, LedgerEvent, RawObject, RemoteLedger, SubmitReceipt};
use crate::network::rpc::{JsonRpcClient, RpcError};
use crate::network::signer::Signer;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct SuiLedger<S> {
    rpc: JsonRpcClient,
    faucet_url: String,
    signer: S,
    gas_budget: u64,
    event_poll: Duration,
}

fn parse_u64(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn read_error(object_id: &str, e: RpcError) -> ClientError {
    match e {
        RpcError::Decode(msg) => ClientError::MalformedState(msg),
        other => ClientError::TransientNetwork(format!("read {}: {}", object_id, other)),
    }
}

fn submit_error(target: &str, e: RpcError) -> ClientError {
    match e {
        RpcError::Transport(msg) => ClientError::TransientNetwork(format!("{}: {}", target, msg)),
        other => ClientError::SubmissionRejected(format!("{}: {}", target, other)),
    }
}

fn parse_event(v: &Value) -> Option<LedgerEvent> {
    Some(LedgerEvent {
        event_type: v.get("type")?.as_str()?.to_string(),
        module: v.get("transactionModule").and_then(Value::as_str).unwrap_or_default().to_string(),
        tx_digest: v.pointer("/id/txDigest").and_then(Value::as_str).unwrap_or_default().to_string(),
        parsed: v.get("parsedJson").cloned().unwrap_or(Value::Null),
    })
}

fn parse_created(v: &Value) -> Option<CreatedObject> {
    if v.get("type").and_then(Value::as_str) != Some("created") {
        return None;
    }
    Some(CreatedObject {
        object_id: v.get("objectId")?.as_str()?.to_string(),
        object_type: v.get("objectType").and_then(Value::as_str).unwrap_or_default().to_string(),
        version: v.get("version").and_then(parse_u64).unwrap_or_default(),
        initial_shared_version: v.pointer("/owner/Shared/initial_shared_version").and_then(parse_u64),
    })
}

/// `SuiObjectResponse` to `RawObject`. Missing and deleted objects are `NotFound`.
fn object_from(object_id: &str, resp: &Value) -> Result<RawObject, ClientError> {
    if let Some(err) = resp.get("error") {
        let code = err.get("code").and_then(Value::as_str).unwrap_or_default();
        return match code {
            "notExists" | "deleted" | "dynamicFieldNotFound" => Err(ClientError::NotFound(object_id.to_string())),
            _ => Err(ClientError::MalformedState(format!("{}: {}", object_id, err))),
        };
    }

    let data = resp.get("data")
        .ok_or_else(|| ClientError::MalformedState(format!("{}: no data", object_id)))?;
    let content = data.get("content")
        .ok_or_else(|| ClientError::MalformedState(format!("{}: no content", object_id)))?;

    Ok(RawObject {
        object_id: data.get("objectId").and_then(Value::as_str).unwrap_or(object_id).to_string(),
        version: data.get("version").and_then(parse_u64).unwrap_or_default(),
        type_name: content.get("type").and_then(Value::as_str).map(str::to_string),
        fields: content.get("fields").cloned().unwrap_or(Value::Null),
        initial_shared_version: data.pointer("/owner/Shared/initial_shared_version").and_then(parse_u64),
    })
}

impl<S: Signer> SuiLedger<S> {
    pub fn new(config: &ClientConfig, signer: S) -> Result<Self, ClientError> {
        let rpc = JsonRpcClient::new(&config.rpc_url, Duration::from_millis(config.request_timeout_ms))
            .map_err(|e| ClientError::Config(e.to_string()))?;
        tracing::debug!("Sui ledger at {} (gas budget {})", rpc.url(), config.gas_budget);
        Ok(Self {
            rpc,
            faucet_url: config.faucet_url.trim_end_matches('/').to_string(),
            signer,
            gas_budget: config.gas_budget,
            event_poll: Duration::from_millis(config.event_poll_ms),
        })
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Number of gas coins owned by `owner`.
    pub async fn coin_count(&self, owner: &str) -> Result<usize, ClientError> {
        let page: Value = self.rpc.call("suix_getCoins", json!([owner, null, null, 50])).await
            .map_err(|e| read_error(owner, e))?;
        Ok(page.get("data").and_then(Value::as_array).map(Vec::len).unwrap_or(0))
    }

    /// Objects owned by `owner` (an address or a kiosk) whose type is exactly `struct_type`.
    pub async fn owned_objects(&self, owner: &str, struct_type: &str) -> Result<Vec<RawObject>, ClientError> {
        let page: Value = self.rpc
            .call("suix_getOwnedObjects", json!([owner, {
                "filter": { "StructType": struct_type },
                "options": { "showContent": true, "showType": true, "showOwner": true },
            }, null, 50]))
            .await
            .map_err(|e| read_error(owner, e))?;

        let items = page.get("data").and_then(Value::as_array).cloned().unwrap_or_default();
        items
            .iter()
            .map(|item| object_from(owner, item))
            .collect()
    }
}

impl<S: Signer> RemoteLedger for SuiLedger<S> {
    async fn read_object(&self, object_id: &str) -> Result<RawObject, ClientError> {
        let resp: Value = self.rpc
            .call("sui_getObject", json!([object_id, {
                "showContent": true,
                "showOwner": true,
                "showType": true,
            }]))
            .await
            .map_err(|e| read_error(object_id, e))?;

        object_from(object_id, &resp)
    }

    async fn read_dynamic_field(&self, parent_id: &str, key_type: &str) -> Result<RawObject, ClientError> {
        let resp: Value = self.rpc
            .call("suix_getDynamicFieldObject", json!([parent_id, {
                "type": key_type,
                "value": { "dummy_field": false },
            }]))
            .await
            .map_err(|e| read_error(parent_id, e))?;
        object_from(parent_id, &resp)
    }

    async fn submit_entry(&self, call: &EntryCall) -> Result<SubmitReceipt, ClientError> {
        let target = call.target();
        let started = Instant::now();

        let built: Value = self.rpc
            .call("unsafe_moveCall", json!([
                self.signer.address(),
                call.package,
                call.module,
                call.function,
                call.type_args,
                call.args,
                null,
                self.gas_budget.to_string(),
                null,
            ]))
            .await
            .map_err(|e| submit_error(&target, e))?;

        let tx_bytes = built.get("txBytes").and_then(Value::as_str)
            .ok_or_else(|| ClientError::SubmissionRejected(format!("{}: no txBytes", target)))?;

        let signature = self.signer.sign(tx_bytes).await?;

        let result: Value = self.rpc
            .call("sui_executeTransactionBlock", json!([
                tx_bytes,
                [signature],
                { "showEffects": true, "showEvents": true, "showObjectChanges": true },
                "WaitForLocalExecution",
            ]))
            .await
            .map_err(|e| submit_error(&target, e))?;

        metrics::histogram!(crate::telemetry::SUBMIT_DURATION, started.elapsed().as_secs_f64());

        let status = result.pointer("/effects/status/status").and_then(Value::as_str).unwrap_or("failure");
        if status != "success" {
            let reason = result.pointer("/effects/status/error").and_then(Value::as_str).unwrap_or("unknown");
            return Err(ClientError::SubmissionRejected(format!("{}: {}", target, reason)));
        }

        let receipt = SubmitReceipt {
            digest: result.get("digest").and_then(Value::as_str).unwrap_or_default().to_string(),
            events: result.get("events").and_then(Value::as_array)
                .map(|evs| evs.iter().filter_map(parse_event).collect())
                .unwrap_or_default(),
            created: result.get("objectChanges").and_then(Value::as_array)
                .map(|chs| chs.iter().filter_map(parse_created).collect())
                .unwrap_or_default(),
        };
        tracing::debug!("{} executed in {:?} ({})", target, started.elapsed(), receipt.digest);
        Ok(receipt)
    }

    fn subscribe_events(&self, filter: EventFilter) -> mpsc::Receiver<LedgerEvent> {
        let (tx, rx) = mpsc::channel(64);
        let rpc = self.rpc.clone();
        let every = self.event_poll;

        tokio::spawn(async move {
            let query = json!({ "MoveEventModule": { "package": filter.package, "module": filter.module } });

            // Start from the newest event so history is not replayed.
            let mut cursor = match rpc.call::<Value>("suix_queryEvents", json!([query, null, 1, true])).await {
                Ok(page) => page.get("nextCursor").cloned().unwrap_or(Value::Null),
                Err(e) => {
                    tracing::warn!("Events: initial query failed: {}", e);
                    Value::Null
                }
            };

            loop {
                match rpc.call::<Value>("suix_queryEvents", json!([query, cursor, 50, false])).await {
                    Ok(page) => {
                        let events = page.get("data").and_then(Value::as_array).cloned().unwrap_or_default();
                        for ev in events.iter().filter_map(parse_event) {
                            if !filter.matches(&ev) {
                                continue;
                            }
                            if tx.send(ev).await.is_err() {
                                tracing::debug!("Events: subscriber dropped");
                                return;
                            }
                        }
                        if let Some(next) = page.get("nextCursor").filter(|c| !c.is_null()) {
                            cursor = next.clone();
                        }
                    }
                    Err(e) => tracing::warn!("Events: query failed: {}", e),
                }
                if tx.is_closed() {
                    return;
                }
                tokio::time::sleep(every).await;
            }
        });

        rx
    }

    async fn request_test_funds(&self, address: &str) -> Result<(), ClientError> {
        let url = format!("{}/gas", self.faucet_url);
        let resp = self.rpc.http()
            .post(&url)
            .json(&json!({ "FixedAmountRequest": { "recipient": address } }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ClientError::TransientNetwork(format!("Faucet request failed: {}", resp.status())));
        }

        let body: Value = resp.json().await?;
        match body.get("error").filter(|e| !e.is_null()) {
            Some(err) => Err(ClientError::SubmissionRejected(format!("Faucet: {}", err))),
            None => Ok(()),
        }
    }
}
