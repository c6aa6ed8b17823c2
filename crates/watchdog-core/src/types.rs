//! Value records passed between the probe, the classifier, and the reporter.

use serde::{Deserialize, Serialize};

// ── Outcome ───────────────────────────────────────────────────────

/// Raw measurements from one fetch of the target page.
///
/// A completed request carries `status_code`, `size_bytes`, and
/// `elapsed_secs`; a failed one carries only `error`. The classifier
/// accepts any mix of present and absent fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub status_code: Option<u16>,
    pub size_bytes: Option<u64>,
    pub elapsed_secs: Option<f64>,
    pub error: Option<String>,
}

impl FetchOutcome {
    /// Outcome of a request that produced a response (any status).
    pub fn response(status_code: u16, size_bytes: u64, elapsed_secs: f64) -> Self {
        Self {
            status_code: Some(status_code),
            size_bytes: Some(size_bytes),
            elapsed_secs: Some(elapsed_secs),
            error: None,
        }
    }

    /// Outcome of a request that never produced a response.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

// ── Verdict ───────────────────────────────────────────────────────

/// Top-level classification of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthState {
    /// Reachable, 200, content and latency within baselines.
    Good,
    /// Reachable with a 200, but deviating from a baseline.
    Abnormal,
    /// Unreachable or answering with a non-200 status.
    Down,
}

impl HealthState {
    pub fn label(&self) -> &'static str {
        match self {
            HealthState::Good => "GOOD",
            HealthState::Abnormal => "ABNORMAL",
            HealthState::Down => "DOWN",
        }
    }

    pub fn is_nominal(&self) -> bool {
        *self == HealthState::Good
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a check is not GOOD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Reason {
    /// Page size fell outside the expected window.
    Content,
    /// Response time exceeded the slow threshold.
    Slow,
    /// Transport failure or non-200 status.
    Error,
}

impl Reason {
    pub fn label(&self) -> &'static str {
        match self {
            Reason::Content => "CONTENT",
            Reason::Slow => "SLOW",
            Reason::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifier output: a state plus, for non-GOOD states, a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub state: HealthState,
    pub reason: Option<Reason>,
}

impl Verdict {
    pub fn good() -> Self {
        Self {
            state: HealthState::Good,
            reason: None,
        }
    }

    pub fn abnormal(reason: Reason) -> Self {
        Self {
            state: HealthState::Abnormal,
            reason: Some(reason),
        }
    }

    pub fn down() -> Self {
        Self {
            state: HealthState::Down,
            reason: Some(Reason::Error),
        }
    }

    /// Whether the report should be relayed to the notification channel.
    pub fn should_notify(&self) -> bool {
        !self.state.is_nominal()
    }
}
