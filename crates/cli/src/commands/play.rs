// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::commands::inspect::hp_bar;
use capymon_client::chooser::MoveChooser;
use capymon_client::kiosk::KioskMatch;
use capymon_client::{Coordinator, CoordinatorContext, MatchOutcome, RemoteLedger};
use capymon_core::{CommitmentStore, MatchKind};
use tokio_util::sync::CancellationToken;

/// Plays `arena_id` until it ends or the user presses Ctrl-C.
pub async fn run<L, S, C>(
    ctx: CoordinatorContext<L, S>,
    arena_id: &str,
    kind: MatchKind,
    chooser: C,
) -> anyhow::Result<MatchOutcome>
where
    L: RemoteLedger,
    S: CommitmentStore,
    C: MoveChooser,
{
    drive(Coordinator::new(ctx, arena_id, kind, chooser)).await
}

/// Plays a matchmade battle kept by `battle.host_kiosk`.
pub async fn run_kiosk<L, S, C>(ctx: CoordinatorContext<L, S>, battle: KioskMatch, chooser: C) -> anyhow::Result<MatchOutcome>
where
    L: RemoteLedger,
    S: CommitmentStore,
    C: MoveChooser,
{
    drive(Coordinator::for_kiosk(ctx, battle, chooser)).await
}

async fn drive<L, S, C>(mut coordinator: Coordinator<L, S, C>) -> anyhow::Result<MatchOutcome>
where
    L: RemoteLedger,
    S: CommitmentStore,
    C: MoveChooser,
{
    let me = coordinator.identity().to_string();
    let kind = coordinator.kind();
    let arena_id = coordinator.arena_id().to_string();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nLeaving match. A move still being picked is dropped; a sent commitment stays on disk for a later play.");
            on_interrupt.cancel();
        }
    });

    let mut progress = coordinator.progress();
    let render = tokio::spawn(async move {
        let mut last = None;
        while progress.changed().await.is_ok() {
            let snapshot = progress.borrow_and_update().clone();
            let Some(state) = snapshot else { continue };
            let (mine, theirs) = state.perspective(&me, kind);
            let key = (state.round, mine.map(|p| p.hp), theirs.map(|p| p.hp));
            if last == Some(key) {
                continue;
            }
            last = Some(key);
            println!(
                "Round {:>3} | You {} | {} {}",
                state.round,
                mine.map(|p| hp_bar(p.hp_percent())).unwrap_or_else(|| "-".into()),
                if kind == MatchKind::Pvb { "Bot" } else { "Opponent" },
                theirs.map(|p| hp_bar(p.hp_percent())).unwrap_or_else(|| "waiting to join".into()),
            );
        }
    });

    let outcome = coordinator.run(cancel).await;
    // Dropping the coordinator closes the progress channel and ends the renderer.
    drop(coordinator);
    let _ = render.await;

    let outcome = outcome?;
    match &outcome {
        MatchOutcome::Won => println!("\nYou won!"),
        MatchOutcome::Lost => println!("\nYou lost."),
        MatchOutcome::Ended { winner } => println!("\nMatch over. Winner: {}", winner),
        MatchOutcome::Left => println!("\nLeft arena {}", arena_id),
    }
    Ok(outcome)
}
