//! watchdog-probe — fetches the watched page once and records what happened.
//!
//! The probe never fails outright: every transport problem (DNS, connect,
//! TLS, timeout, truncated body) is folded into a [`FetchOutcome`] with its
//! `error` set, and any HTTP response, whatever the status, is measured.

pub mod prober;

pub use prober::{ProbeError, Prober};
