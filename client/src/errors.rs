// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use capymon_core::{GameError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Timeout or connectivity failure. Retried after a backoff.
    #[error("Network error: {0}")]
    TransientNetwork(String),
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Not a participant of arena {0}")]
    NotParticipant(String),
    /// The ledger refused the transaction. Re-observe and decide again.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),
    /// Local bookkeeping cannot honestly continue the match.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    #[error("Malformed state: {0}")]
    MalformedState(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Move selection failed: {0}")]
    Chooser(String),
    #[error("Signer error: {0}")]
    Signer(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::TransientNetwork(_))
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::SubmissionRejected(_))
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::TransientNetwork(_) => "transient_network",
            ClientError::NotFound(_) => "not_found",
            ClientError::NotParticipant(_) => "not_participant",
            ClientError::SubmissionRejected(_) => "submission_rejected",
            ClientError::InvariantViolation(_) => "invariant_violation",
            ClientError::MalformedState(_) => "malformed_state",
            ClientError::Store(_) => "store",
            ClientError::Chooser(_) => "chooser",
            ClientError::Signer(_) => "signer",
            ClientError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::TransientNetwork(e.to_string())
    }
}

impl From<GameError> for ClientError {
    fn from(e: GameError) -> Self {
        match e {
            GameError::NotParticipant => ClientError::NotParticipant(String::new()),
            other => ClientError::Chooser(other.to_string()),
        }
    }
}
