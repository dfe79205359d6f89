// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The seam between the coordinator and whatever holds the authoritative
//! arena state.

use crate::errors::ClientError;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A Move entry-function call. Object arguments are passed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCall {
    pub package: String,
    pub module: String,
    pub function: String,
    pub type_args: Vec<String>,
    pub args: Vec<Value>,
}

impl EntryCall {
    pub fn new(package: &str, module: &str, function: &str) -> Self {
        Self {
            package: package.to_string(),
            module: module.to_string(),
            function: function.to_string(),
            type_args: Vec::new(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// `vector<u8>` argument.
    pub fn bytes_arg(self, bytes: &[u8]) -> Self {
        self.arg(Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()))
    }

    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

/// Object as returned by a read, before any game-specific decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObject {
    pub object_id: String,
    pub version: u64,
    pub type_name: Option<String>,
    pub fields: Value,
    /// Present for shared objects.
    pub initial_shared_version: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEvent {
    /// Fully qualified Move type, e.g. `0x..::arena_pvp::PlayerCommit`.
    pub event_type: String,
    pub module: String,
    pub tx_digest: String,
    pub parsed: Value,
}

impl LedgerEvent {
    /// Unqualified event name.
    pub fn name(&self) -> &str {
        self.event_type.rsplit("::").next().unwrap_or(&self.event_type)
    }

    pub fn arena(&self) -> Option<&str> {
        self.parsed.get("arena").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedObject {
    pub object_id: String,
    pub object_type: String,
    pub version: u64,
    pub initial_shared_version: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitReceipt {
    pub digest: String,
    pub events: Vec<LedgerEvent>,
    pub created: Vec<CreatedObject>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventFilter {
    pub package: String,
    pub module: String,
    /// Only events whose `arena` field equals this id.
    pub arena_id: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        if event.module != self.module {
            return false;
        }
        match &self.arena_id {
            Some(id) => event
                .arena()
                .map(|a| capymon_core::types::same_address(a, id))
                .unwrap_or(false),
            None => true,
        }
    }
}

pub trait RemoteLedger: Send + Sync {
    fn read_object(&self, object_id: &str)
        -> impl Future<Output = Result<RawObject, ClientError>> + Send;

    /// Reads the dynamic field of `parent_id` keyed by the unit struct `key_type`.
    /// The returned fields hold `name` and `value`.
    fn read_dynamic_field(&self, parent_id: &str, key_type: &str)
        -> impl Future<Output = Result<RawObject, ClientError>> + Send;

    /// Submits one signed entry call and waits for its effects.
    fn submit_entry(&self, call: &EntryCall)
        -> impl Future<Output = Result<SubmitReceipt, ClientError>> + Send;

    /// Push alternative to polling. The stream ends when the receiver is dropped.
    fn subscribe_events(&self, filter: EventFilter) -> mpsc::Receiver<LedgerEvent>;

    fn request_test_funds(&self, address: &str)
        -> impl Future<Output = Result<(), ClientError>> + Send;
}

impl<T: RemoteLedger + ?Sized> RemoteLedger for Arc<T> {
    fn read_object(&self, object_id: &str)
        -> impl Future<Output = Result<RawObject, ClientError>> + Send {
        (**self).read_object(object_id)
    }

    fn read_dynamic_field(&self, parent_id: &str, key_type: &str)
        -> impl Future<Output = Result<RawObject, ClientError>> + Send {
        (**self).read_dynamic_field(parent_id, key_type)
    }

    fn submit_entry(&self, call: &EntryCall)
        -> impl Future<Output = Result<SubmitReceipt, ClientError>> + Send {
        (**self).submit_entry(call)
    }

    fn subscribe_events(&self, filter: EventFilter) -> mpsc::Receiver<LedgerEvent> {
        (**self).subscribe_events(filter)
    }

    fn request_test_funds(&self, address: &str)
        -> impl Future<Output = Result<(), ClientError>> + Send {
        (**self).request_test_funds(address)
    }
}
