// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use capymon_client::{observer, RemoteLedger};
use capymon_core::types::format_hp;
use capymon_core::{MatchKind, MatchState, PlayerStats, TypeTable};

/// Ten-cell health bar.
pub fn hp_bar(percent: u8) -> String {
    let filled = (percent.min(100) as usize + 5) / 10;
    format!("{}{} {:>3}%", "#".repeat(filled), "-".repeat(10 - filled), percent)
}

fn seat_label(state: &MatchState, seat: Option<&PlayerStats>, me: &str, kind: MatchKind) -> String {
    let (mine, _) = state.perspective(me, kind);
    let is_me = match (mine, seat) {
        (Some(a), Some(b)) => std::ptr::eq(a, b),
        _ => false,
    };
    match (kind, is_me) {
        (_, true) => "You".to_string(),
        (MatchKind::Pvb, false) => "Bot".to_string(),
        (MatchKind::Pvp | MatchKind::Kiosk, false) => "Opponent".to_string(),
    }
}

pub fn state_table(state: &MatchState, me: &str, kind: MatchKind) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Seat", "Account", "Type", "HP", "Health", "Committed", "Next round"]);

    for seat in [state.player_one.as_ref(), state.player_two.as_ref()] {
        let label = seat_label(state, seat, me, kind);
        match seat {
            Some(p) => {
                table.add_row(vec![
                    label,
                    p.account.clone().unwrap_or_else(|| "-".to_string()),
                    p.element.map(|e| e.name().to_string()).unwrap_or_else(|| "?".to_string()),
                    format!("{} / {}", format_hp(p.hp), format_hp(p.initial_hp)),
                    hp_bar(p.hp_percent()),
                    (if p.has_committed() { "yes" } else { "no" }).to_string(),
                    p.next_round.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
                ]);
            }
            None => {
                table.add_row(vec![label, "(empty seat)".to_string()]);
            }
        }
    }
    table
}

pub async fn run<L: RemoteLedger>(
    ledger: &L,
    arena_id: &str,
    kind: MatchKind,
    type_table: TypeTable,
    me: &str,
) -> anyhow::Result<()> {
    let state = observer::observe(ledger, arena_id, kind, type_table).await?;

    println!("\nArena {} ({})", state.arena_id, kind.module());
    println!("--------------------");
    println!("Round: {}", state.round);
    match (&state.winner, state.is_over) {
        (Some(w), _) => println!("Status: over, winner {}", w),
        (None, true) => println!("Status: over"),
        (None, false) => println!("Status: in progress"),
    }
    println!("{}\n", state_table(&state, me, kind));
    Ok(())
}
