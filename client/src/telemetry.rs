// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Log output and the Prometheus recorder behind `--metrics`.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const POLLS_TOTAL: &str = "capymon_polls_total";
pub const ACTIONS_TOTAL: &str = "capymon_actions_total";
pub const REJECTIONS_TOTAL: &str = "capymon_submission_rejections_total";
pub const TRANSIENT_ERRORS_TOTAL: &str = "capymon_transient_errors_total";
pub const SUBMIT_DURATION: &str = "capymon_submit_duration_seconds";
pub const MATCHES_FINISHED_TOTAL: &str = "capymon_matches_finished_total";

/// Used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "capymon_client=info,capymon_cli=info";

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();

fn describe_metrics() {
    let counters = [
        (POLLS_TOTAL, "Arena snapshots read"),
        (ACTIONS_TOTAL, "Actions submitted, by kind"),
        (REJECTIONS_TOTAL, "Submissions refused by the ledger"),
        (TRANSIENT_ERRORS_TOTAL, "Retryable network failures"),
        (MATCHES_FINISHED_TOTAL, "Matches that reached a terminal state"),
    ];
    for (name, help) in counters {
        metrics::describe_counter!(name, help);
    }
    metrics::describe_histogram!(SUBMIT_DURATION, metrics::Unit::Seconds, "Time from submit to effects");
}

/// Sets up stderr logging and the metrics recorder. Returns false when a
/// recorder was already installed, in which case the existing one keeps counting.
pub fn init_telemetry() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if RECORDER.get().is_some() {
        return false;
    }
    let handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!("Metrics disabled, no recorder: {}", e);
            return false;
        }
    };
    let installed = RECORDER.set(handle).is_ok();
    describe_metrics();
    installed
}

/// Prometheus text for everything recorded so far.
pub fn render_metrics() -> String {
    RECORDER
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_else(|| "# capymon metrics were not enabled\n".to_string())
}
