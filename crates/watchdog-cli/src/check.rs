//! One check: fetch, classify, report, and optionally relay.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use watchdog_core::{FetchOutcome, HealthState, Reason, Verdict, WatchdogConfig};
use watchdog_notify::TelegramNotifier;
use watchdog_probe::Prober;

/// Everything produced by a single check.
#[derive(Debug)]
pub struct CheckReport {
    pub outcome: FetchOutcome,
    pub verdict: Verdict,
    pub message: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    state: HealthState,
    reason: Option<Reason>,
    message: &'a str,
    outcome: &'a FetchOutcome,
}

impl CheckReport {
    /// Message, a spacer line, then `STATE: <label>`.
    pub fn render_text(&self) -> String {
        format!("{}\n  \nSTATE: {}", self.message, self.verdict.state)
    }

    pub fn render_json(&self) -> anyhow::Result<String> {
        let json = JsonReport {
            state: self.verdict.state,
            reason: self.verdict.reason,
            message: &self.message,
            outcome: &self.outcome,
        };
        Ok(serde_json::to_string_pretty(&json)?)
    }
}

/// Run one check against the configured target.
pub async fn run(config: &WatchdogConfig) -> anyhow::Result<CheckReport> {
    let prober = Prober::new(config.target.timeout())?;
    let outcome = prober.fetch(&config.target.url).await;
    Ok(evaluate(config, outcome))
}

/// Classify an outcome and render its message at the current time.
pub fn evaluate(config: &WatchdogConfig, outcome: FetchOutcome) -> CheckReport {
    let verdict = watchdog_core::classify(&outcome, &config.baselines);
    let message = watchdog_core::build_message(
        &verdict,
        &outcome,
        &config.baselines,
        &config.report,
        Utc::now(),
    );
    info!(state = %verdict.state, reason = ?verdict.reason, "check classified");
    CheckReport {
        outcome,
        verdict,
        message,
    }
}

/// Relay a message to Telegram. Never fails the run.
pub async fn relay(config: &WatchdogConfig, message: &str) {
    match TelegramNotifier::from_config(&config.telegram) {
        Ok(Some(notifier)) => {
            notifier.broadcast(message).await;
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Telegram notifier unavailable"),
    }
}
