// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod error;
pub mod record;
pub mod commitment_file;

pub use commitment_file::FileCommitmentStore;
pub use error::{PersistenceError, Result};
