//! Outcome classification.
//!
//! Checks run in a fixed order and the first match wins:
//!
//! 1. error, missing status, or status != 200  → DOWN / ERROR
//! 2. size outside `[size_low, size_high]`     → ABNORMAL / CONTENT
//! 3. elapsed > `latency_secs * slow_factor`   → ABNORMAL / SLOW
//! 4. otherwise                                → GOOD
//!
//! Size and latency are never consulted for a non-200 response, and a
//! content deviation is reported even when the response was also slow.

use tracing::trace;

use crate::config::Baselines;
use crate::types::{FetchOutcome, Reason, Verdict};

/// Classify a fetch outcome against the baselines.
///
/// Total over its input: a 200 with no recorded size is CONTENT, and a
/// 200 with no comparable latency (absent or NaN) is SLOW.
pub fn classify(outcome: &FetchOutcome, baselines: &Baselines) -> Verdict {
    if outcome.error.is_some() || outcome.status_code != Some(200) {
        return Verdict::down();
    }

    let size_ok = outcome
        .size_bytes
        .is_some_and(|size| baselines.size_in_range(size));
    if !size_ok {
        trace!(size = ?outcome.size_bytes, low = baselines.size_low, high = baselines.size_high, "size outside window");
        return Verdict::abnormal(Reason::Content);
    }

    let threshold = baselines.slow_threshold();
    let fast_enough = outcome
        .elapsed_secs
        .is_some_and(|elapsed| elapsed <= threshold);
    if !fast_enough {
        trace!(elapsed = ?outcome.elapsed_secs, threshold, "response slower than threshold");
        return Verdict::abnormal(Reason::Slow);
    }

    Verdict::good()
}
