// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Drives one match to completion: observe, decide, act, wait, repeat.

use crate::chooser::{MoveChoice, MoveChooser};
use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::executor::{self, ActionEffect, Target};
use crate::kiosk::KioskMatch;
use crate::ledger::{EventFilter, LedgerEvent, RemoteLedger};
use crate::observer;
use crate::telemetry::{MATCHES_FINISHED_TOTAL, POLLS_TOTAL, REJECTIONS_TOTAL, TRANSIENT_ERRORS_TOTAL};
use capymon_core::catalog::{available_moves, moves_for};
use capymon_core::{select, Action, Commitment, CommitmentStore, GameError, MatchKind, MatchState, TypeTable};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Everything a match needs from the outside world.
pub struct CoordinatorContext<L, S> {
    pub ledger: L,
    pub store: S,
    pub config: ClientConfig,
}

impl<L: RemoteLedger, S: CommitmentStore> CoordinatorContext<L, S> {
    pub fn new(ledger: L, store: S, config: ClientConfig) -> Self {
        Self { ledger, store, config }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Won,
    Lost,
    /// The arena recorded a winner without either side reaching zero hp.
    Ended { winner: String },
    /// Cancelled locally. Any pending commitment is kept for a later resume.
    Left,
}

impl MatchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            MatchOutcome::Won => "won",
            MatchOutcome::Lost => "lost",
            MatchOutcome::Ended { .. } => "ended",
            MatchOutcome::Left => "left",
        }
    }
}

enum LoopState {
    Observing,
    Deciding(MatchState),
    Acting(Action, MatchState),
    Waiting(Duration),
    Terminal(Result<MatchOutcome, ClientError>),
}

pub struct Coordinator<L, S, C> {
    ctx: CoordinatorContext<L, S>,
    arena_id: String,
    kind: MatchKind,
    chooser: C,
    /// Set for kiosk battles, which are read and played through the host kiosk.
    kiosk: Option<KioskMatch>,
    events: Option<mpsc::Receiver<LedgerEvent>>,
    progress: watch::Sender<Option<MatchState>>,
    transient_failures: u32,
}

impl<L, S, C> Coordinator<L, S, C>
where
    L: RemoteLedger,
    S: CommitmentStore,
    C: MoveChooser,
{
    pub fn new(ctx: CoordinatorContext<L, S>, arena_id: &str, kind: MatchKind, chooser: C) -> Self {
        let (progress, _) = watch::channel(None);
        Self {
            ctx,
            arena_id: arena_id.to_string(),
            kind,
            chooser,
            kiosk: None,
            events: None,
            progress,
            transient_failures: 0,
        }
    }

    /// Coordinator for a matchmade battle kept by `battle.host_kiosk`.
    pub fn for_kiosk(ctx: CoordinatorContext<L, S>, battle: KioskMatch, chooser: C) -> Self {
        let mut coordinator = Self::new(ctx, &battle.host_kiosk, MatchKind::Kiosk, chooser);
        coordinator.kiosk = Some(battle);
        coordinator
    }

    /// What our seat is recorded under: the kiosk in kiosk battles, the account otherwise.
    pub fn identity(&self) -> &str {
        match &self.kiosk {
            Some(battle) => &battle.kiosk_id,
            None => &self.ctx.config.address,
        }
    }

    fn type_table(&self) -> TypeTable {
        match self.kiosk {
            Some(_) => TypeTable::Kiosk,
            None => self.ctx.config.type_table,
        }
    }

    /// Latest snapshot seen by the loop, for rendering.
    pub fn progress(&self) -> watch::Receiver<Option<MatchState>> {
        self.progress.subscribe()
    }

    pub fn arena_id(&self) -> &str {
        &self.arena_id
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    pub fn context(&self) -> &CoordinatorContext<L, S> {
        &self.ctx
    }

    /// Runs until the match is over, the token is cancelled, or a fatal error.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<MatchOutcome, ClientError> {
        if self.ctx.config.use_events && self.events.is_none() {
            self.events = Some(self.ctx.ledger.subscribe_events(EventFilter {
                package: self.ctx.config.package_id.clone(),
                module: self.kind.module().to_string(),
                // Kiosk battle events do not name an arena.
                arena_id: self.kiosk.is_none().then(|| self.arena_id.clone()),
            }));
        }

        tracing::info!("Match {} ({:?}): starting as {}", self.arena_id, self.kind, self.identity());
        let mut state = LoopState::Observing;

        loop {
            state = match state {
                LoopState::Observing => self.observe(&cancel).await,
                LoopState::Deciding(snapshot) => self.decide(snapshot),
                LoopState::Acting(action, snapshot) => self.act(action, snapshot, &cancel).await,
                LoopState::Waiting(delay) => {
                    self.pause(delay, &cancel).await;
                    LoopState::Observing
                }
                LoopState::Terminal(result) => return self.finish(result),
            };
        }
    }

    async fn observe(&mut self, cancel: &CancellationToken) -> LoopState {
        if cancel.is_cancelled() {
            return LoopState::Terminal(Ok(MatchOutcome::Left));
        }

        metrics::counter!(POLLS_TOTAL, 1);
        let table = self.type_table();
        let read = match &self.kiosk {
            Some(battle) => observer::observe_kiosk(&self.ctx.ledger, &self.ctx.config.package_id, battle, table).await,
            None => observer::observe(&self.ctx.ledger, &self.arena_id, self.kind, table).await,
        };

        if cancel.is_cancelled() {
            return LoopState::Terminal(Ok(MatchOutcome::Left));
        }

        match read {
            Ok(snapshot) => {
                self.transient_failures = 0;
                self.progress.send_replace(Some(snapshot.clone()));
                LoopState::Deciding(snapshot)
            }
            Err(e) => self.recover(e),
        }
    }

    fn decide(&mut self, snapshot: MatchState) -> LoopState {
        let (me, opponent) = snapshot.perspective(self.identity(), self.kind);

        let action = match select(me, opponent, self.kind) {
            Ok(action) => action,
            Err(GameError::NotParticipant) => {
                return LoopState::Terminal(Err(ClientError::NotParticipant(self.arena_id.clone())));
            }
            Err(e) => return LoopState::Terminal(Err(e.into())),
        };

        tracing::debug!("Match {} round {}: {}", self.arena_id, snapshot.round, action.name());

        // Zero hp decides first; a recorded winner only ends an otherwise live match.
        if !action.is_terminal() {
            if let Some(winner) = &snapshot.winner {
                return LoopState::Terminal(Ok(MatchOutcome::Ended { winner: winner.clone() }));
            }
        }

        match action {
            Action::Loss => LoopState::Terminal(Ok(MatchOutcome::Lost)),
            Action::Win => LoopState::Terminal(Ok(MatchOutcome::Won)),
            Action::Wait(reason) => LoopState::Waiting(self.ctx.config.wait_for(reason)),
            other => LoopState::Acting(other, snapshot),
        }
    }

    async fn act(&mut self, action: Action, snapshot: MatchState, cancel: &CancellationToken) -> LoopState {
        let result = self.execute(action, &snapshot, cancel).await;

        // In-flight work is never aborted, but its outcome no longer matters.
        if cancel.is_cancelled() {
            return LoopState::Terminal(Ok(MatchOutcome::Left));
        }

        match result {
            Ok(None) => LoopState::Terminal(Ok(MatchOutcome::Left)),
            Ok(Some(effect)) => {
                self.transient_failures = 0;
                match &effect {
                    ActionEffect::Attacked { player_hp, bot_hp, .. } => tracing::info!(
                        "Match {}: attacked, hp now {} / bot {}",
                        self.arena_id,
                        capymon_core::types::format_hp(*player_hp),
                        capymon_core::types::format_hp(*bot_hp)
                    ),
                    ActionEffect::Committed { hash, .. } => {
                        tracing::info!("Match {}: committed {}", self.arena_id, hash)
                    }
                    ActionEffect::Revealed { digest } => {
                        tracing::info!("Match {}: revealed ({})", self.arena_id, digest)
                    }
                }
                LoopState::Observing
            }
            Err(e) => self.recover(e),
        }
    }

    /// Submits `action`. `None` means the token fired before anything was sent.
    async fn execute(
        &mut self,
        action: Action,
        snapshot: &MatchState,
        cancel: &CancellationToken,
    ) -> Result<Option<ActionEffect>, ClientError> {
        let (me, opponent) = snapshot.perspective(self.identity(), self.kind);
        let (Some(me), Some(opponent)) = (me, opponent) else {
            return Err(ClientError::InvariantViolation(format!(
                "{} chosen without both players present",
                action.name()
            )));
        };
        let arena = snapshot.arena_ref();
        let target = match &self.kiosk {
            Some(battle) => Target::Kiosk(battle),
            None => Target::Arena(&arena),
        };
        let package = self.ctx.config.package_id.as_str();

        match action {
            Action::Attack | Action::Commit => {
                let moves = available_moves(moves_for(self.type_table()), &me.moves);
                if moves.is_empty() {
                    return Err(GameError::NoMoves.into());
                }
                let choice = MoveChoice {
                    kind: self.kind,
                    round: snapshot.round,
                    me,
                    opponent,
                    moves,
                };
                let move_value = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Ok(None),
                    chosen = self.chooser.choose(choice) => chosen?,
                };
                if cancel.is_cancelled() {
                    return Ok(None);
                }

                if action == Action::Attack {
                    return executor::attack(&self.ctx.ledger, package, &arena, move_value).await.map(Some);
                }

                let commitment = Commitment::generate(
                    &self.arena_id,
                    move_value,
                    self.ctx.config.salt_len,
                    me.next_round,
                );
                executor::commit(&self.ctx.ledger, &self.ctx.store, package, target, &commitment)
                    .await
                    .map(Some)
            }
            Action::Reveal => {
                let commitment = self.ctx.store.load(&self.arena_id)?.ok_or_else(|| {
                    ClientError::InvariantViolation(format!(
                        "no stored commitment for {}; the committed move cannot be reconstructed",
                        self.arena_id
                    ))
                })?;
                if let Some(onchain) = &me.next_attack {
                    if !commitment.opens(onchain) {
                        return Err(ClientError::InvariantViolation(format!(
                            "stored commitment {} does not match the hash on {}",
                            commitment.hash_hex(),
                            self.arena_id
                        )));
                    }
                }
                if cancel.is_cancelled() {
                    return Ok(None);
                }
                executor::reveal(&self.ctx.ledger, package, target, &commitment).await.map(Some)
            }
            Action::Loss | Action::Win | Action::Wait(_) => Err(ClientError::InvariantViolation(format!(
                "{} is not executable",
                action.name()
            ))),
        }
    }

    /// Retry policy shared by reads and writes.
    fn recover(&mut self, e: ClientError) -> LoopState {
        if e.is_rejection() {
            metrics::counter!(REJECTIONS_TOTAL, 1);
            tracing::warn!("Match {}: {}. Re-reading state.", self.arena_id, e);
            return LoopState::Waiting(self.ctx.config.rejection_backoff());
        }

        if e.is_transient() {
            metrics::counter!(TRANSIENT_ERRORS_TOTAL, 1);
            self.transient_failures += 1;
            if self.transient_failures > self.ctx.config.max_transient_retries {
                tracing::error!("Match {}: giving up after {} network failures", self.arena_id, self.transient_failures);
                return LoopState::Terminal(Err(e));
            }
            tracing::warn!(
                "Match {}: {} (attempt {}/{}). Retrying in {:?}",
                self.arena_id,
                e,
                self.transient_failures,
                self.ctx.config.max_transient_retries,
                self.ctx.config.retry_backoff()
            );
            return LoopState::Waiting(self.ctx.config.retry_backoff());
        }

        LoopState::Terminal(Err(e))
    }

    async fn pause(&mut self, delay: Duration, cancel: &CancellationToken) {
        let sleep = tokio::time::sleep(delay);
        let closed = match self.events.as_mut() {
            Some(rx) => tokio::select! {
                _ = sleep => false,
                _ = cancel.cancelled() => false,
                ev = rx.recv() => match ev {
                    Some(ev) => {
                        tracing::debug!("Match {}: woken by {}", self.arena_id, ev.name());
                        false
                    }
                    None => true,
                },
            },
            None => {
                tokio::select! {
                    _ = sleep => {},
                    _ = cancel.cancelled() => {},
                }
                false
            }
        };
        if closed {
            tracing::debug!("Match {}: event stream closed, polling only", self.arena_id);
            self.events = None;
        }
    }

    /// Per-match teardown. A finished match has no use for its commitment.
    fn finish(&mut self, result: Result<MatchOutcome, ClientError>) -> Result<MatchOutcome, ClientError> {
        self.events = None;
        match &result {
            Ok(MatchOutcome::Left) => {
                tracing::info!("Match {}: left", self.arena_id);
            }
            Ok(outcome) => {
                metrics::counter!(MATCHES_FINISHED_TOTAL, 1, "outcome" => outcome.label());
                tracing::info!("Match {}: {}", self.arena_id, outcome.label());
                if let Err(e) = self.ctx.store.clear(&self.arena_id) {
                    tracing::warn!("Match {}: could not clear commitment: {}", self.arena_id, e);
                }
            }
            Err(e) => {
                metrics::counter!(MATCHES_FINISHED_TOTAL, 1, "outcome" => e.kind());
                tracing::error!("Match {}: {}", self.arena_id, e);
            }
        }
        result
    }
}
