// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod rpc;
pub mod signer;
pub mod sui;

pub use rpc::{JsonRpcClient, RpcError};
pub use signer::{KeytoolSigner, Signer};
pub use sui::SuiLedger;
