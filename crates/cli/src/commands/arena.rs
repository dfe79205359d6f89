// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use capymon_client::executor::{self, NewArena};
use capymon_client::RemoteLedger;
use capymon_core::types::format_hp;
use capymon_core::{MatchKind, PlayerStats};

fn stats_table(arena: &NewArena) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Stat", "Player", "Bot"]);

    let pick = |p: &Option<PlayerStats>, f: fn(&PlayerStats) -> String| {
        p.as_ref().map(f).unwrap_or_else(|| "-".to_string())
    };
    let rows: [(&str, fn(&PlayerStats) -> String); 7] = [
        ("HP", |p| format_hp(p.hp)),
        ("Attack", |p| p.attack.to_string()),
        ("Defense", |p| p.defense.to_string()),
        ("Sp. Attack", |p| p.special_attack.to_string()),
        ("Sp. Defense", |p| p.special_defense.to_string()),
        ("Speed", |p| p.speed.to_string()),
        ("Level", |p| p.level.to_string()),
    ];
    for (name, f) in rows {
        table.add_row(vec![name.to_string(), pick(&arena.player, f), pick(&arena.bot, f)]);
    }
    table
}

pub async fn create<L: RemoteLedger>(ledger: &L, package: &str, kind: MatchKind) -> anyhow::Result<NewArena> {
    let created = executor::create_arena(ledger, package, kind).await?;

    println!("\nArena created: {}", created.arena.object_id);
    println!("Initial shared version: {}", created.arena.initial_shared_version);
    println!("Transaction: {}", created.digest);
    if created.player.is_some() || created.bot.is_some() {
        println!("{}\n", stats_table(&created));
    }
    if kind == MatchKind::Pvp {
        println!("Share the arena id with your opponent: capymon join {}", created.arena.object_id);
    }
    Ok(created)
}

pub async fn join<L: RemoteLedger>(ledger: &L, package: &str, arena_id: &str) -> anyhow::Result<()> {
    let receipt = executor::join_arena(ledger, package, arena_id).await?;
    println!("Joined arena {} (tx {})", arena_id, receipt.digest);
    Ok(())
}
