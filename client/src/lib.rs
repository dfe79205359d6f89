// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod config;
pub mod errors;
pub mod telemetry;
pub mod ledger;
pub mod network;
pub mod kiosk;
pub mod observer;
pub mod executor;
pub mod chooser;
pub mod coordinator;

pub use config::ClientConfig;
pub use coordinator::{Coordinator, CoordinatorContext, MatchOutcome};
pub use errors::ClientError;
pub use ledger::RemoteLedger;
