//! watchdog-core — the decision logic of the watchdog.
//!
//! A single check flows through two pure functions:
//!
//! ```text
//! FetchOutcome ──classify()──▶ Verdict ──build_message()──▶ String
//!                    ▲                          ▲
//!                Baselines              Baselines + ReportStyle
//! ```
//!
//! Neither function performs I/O or fails. Fetching the page and relaying
//! the message live in `watchdog-probe` and `watchdog-notify`.

pub mod classify;
pub mod config;
pub mod error;
pub mod report;
pub mod types;

pub use classify::classify;
pub use config::{Baselines, ReportStyle, TargetConfig, TelegramConfig, WatchdogConfig};
pub use error::{ConfigError, ConfigResult};
pub use report::build_message;
pub use types::*;
