// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use capymon_core::{Commitment, CommitmentStore};
use capymon_persistence::FileCommitmentStore;

pub fn pending_table(commitments: &[Commitment]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Arena", "Round", "Move", "Hash", "Committed at"]);

    for c in commitments {
        let ts = chrono::DateTime::from_timestamp(c.created_at as i64, 0)
            .unwrap_or_default()
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        table.add_row(vec![
            c.arena_id.clone(),
            c.round.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
            c.move_value.to_string(),
            c.hash_hex(),
            ts,
        ]);
    }
    table
}

/// Lists commitments waiting to be revealed.
pub fn run(store: &FileCommitmentStore) -> anyhow::Result<()> {
    let pending = store.list()?;
    if pending.is_empty() {
        println!("No pending commitments in {}", store.dir().display());
        return Ok(());
    }
    println!("\nPending commitments in {}\n", store.dir().display());
    println!("{}\n", pending_table(&pending));
    Ok(())
}
