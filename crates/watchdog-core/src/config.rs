//! Watchdog configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file,
//! then environment variables. The result is built once at startup and
//! handed to the probe, classifier, reporter, and notifier by reference.
//!
//! ```toml
//! [target]
//! url = "https://sailgpt.tekdinext.com"
//! timeout = "10s"
//!
//! [baselines]
//! size = 1145
//! latency_secs = 0.21
//! size_low = 900
//! size_high = 1400
//! slow_factor = 2.0
//!
//! [telegram]
//! chat_ids = ["-100123", "42"]
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Environment keys read by [`WatchdogConfig::apply_env`].
pub mod env {
    pub const URL: &str = "WATCHDOG_URL";
    pub const TIMEOUT: &str = "WATCHDOG_TIMEOUT";
    pub const BASELINE_SIZE: &str = "WATCHDOG_BASELINE_SIZE";
    pub const BASELINE_TIME: &str = "WATCHDOG_BASELINE_TIME";
    pub const SIZE_LOW: &str = "WATCHDOG_SIZE_LOW";
    pub const SIZE_HIGH: &str = "WATCHDOG_SIZE_HIGH";
    pub const SLOW_FACTOR: &str = "WATCHDOG_SLOW_FACTOR";
    pub const SITE_NAME: &str = "WATCHDOG_SITE_NAME";
    pub const TG_TOKEN: &str = "TG_TOKEN";
    pub const TG_CHAT_IDS: &str = "TG_CHAT_IDS";
}

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TELEGRAM_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    pub target: TargetConfig,
    pub baselines: Baselines,
    pub report: ReportStyle,
    pub telegram: TelegramConfig,
}

/// The page being watched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub url: String,
    /// Fetch timeout (e.g., "10s").
    pub timeout: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: "https://sailgpt.tekdinext.com".to_string(),
            timeout: "10s".to_string(),
        }
    }
}

impl TargetConfig {
    pub fn timeout(&self) -> Duration {
        parse_duration(&self.timeout).unwrap_or(DEFAULT_FETCH_TIMEOUT)
    }
}

/// Expected page size and latency, measured offline against a healthy site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Baselines {
    /// Typical page size in bytes.
    pub size: u64,
    /// Typical response time in seconds.
    pub latency_secs: f64,
    /// Smallest in-range page size (inclusive).
    pub size_low: u64,
    /// Largest in-range page size (inclusive).
    pub size_high: u64,
    /// Multiple of `latency_secs` above which a response is slow.
    pub slow_factor: f64,
}

impl Default for Baselines {
    fn default() -> Self {
        Self {
            size: 1145,
            latency_secs: 0.21,
            size_low: 900,
            size_high: 1400,
            slow_factor: 2.0,
        }
    }
}

impl Baselines {
    /// Latency above which a response counts as slow.
    pub fn slow_threshold(&self) -> f64 {
        self.latency_secs * self.slow_factor
    }

    /// Whether `size` lies in `[size_low, size_high]`.
    pub fn size_in_range(&self, size: u64) -> bool {
        (self.size_low..=self.size_high).contains(&size)
    }
}

/// Presentation settings for the status message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStyle {
    /// Site name used in the message body; upper-cased in the title.
    pub display_name: String,
    /// Fixed offset added to UTC for the "Last check" line.
    pub utc_offset_minutes: i32,
    /// Label printed after the shifted time.
    pub zone_label: String,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            display_name: "SailGPT".to_string(),
            utc_offset_minutes: 5 * 60 + 30,
            zone_label: "IST".to_string(),
        }
    }
}

/// Telegram bot credentials and destinations.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub chat_ids: Vec<String>,
    pub api_base: String,
    /// Per-message timeout (e.g., "5s").
    pub timeout: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            chat_ids: Vec::new(),
            api_base: "https://api.telegram.org".to_string(),
            timeout: "5s".to_string(),
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("chat_ids", &self.chat_ids)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TelegramConfig {
    pub fn timeout(&self) -> Duration {
        parse_duration(&self.timeout).unwrap_or(DEFAULT_TELEGRAM_TIMEOUT)
    }

    /// Both a token and at least one chat id are present.
    pub fn is_configured(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty()) && !self.chat_ids.is_empty()
    }
}

impl WatchdogConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Defaults or `path`, overlaid with the process environment, validated.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(p) => {
                debug!(path = %p.display(), "loading config file");
                Self::from_file(p)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from an environment-like lookup.
    ///
    /// Keys that are unset or blank leave the current value untouched.
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(env::URL) {
            self.target.url = url.trim().to_string();
        }
        if let Some(timeout) = get(env::TIMEOUT) {
            self.target.timeout = timeout.trim().to_string();
        }
        if let Some(v) = get(env::BASELINE_SIZE) {
            self.baselines.size = parse_value(env::BASELINE_SIZE, &v)?;
        }
        if let Some(v) = get(env::BASELINE_TIME) {
            self.baselines.latency_secs = parse_value(env::BASELINE_TIME, &v)?;
        }
        if let Some(v) = get(env::SIZE_LOW) {
            self.baselines.size_low = parse_value(env::SIZE_LOW, &v)?;
        }
        if let Some(v) = get(env::SIZE_HIGH) {
            self.baselines.size_high = parse_value(env::SIZE_HIGH, &v)?;
        }
        if let Some(v) = get(env::SLOW_FACTOR) {
            self.baselines.slow_factor = parse_value(env::SLOW_FACTOR, &v)?;
        }
        if let Some(name) = get(env::SITE_NAME) {
            self.report.display_name = name.trim().to_string();
        }
        if let Some(token) = get(env::TG_TOKEN) {
            self.telegram.token = Some(token.trim().to_string());
        }
        if let Some(ids) = lookup(env::TG_CHAT_IDS) {
            let ids = split_chat_ids(&ids);
            if !ids.is_empty() {
                self.telegram.chat_ids = ids;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.target.url.trim().is_empty() {
            return Err(ConfigError::Invalid("target url is empty".to_string()));
        }
        for (key, value) in [
            ("target.timeout", &self.target.timeout),
            ("telegram.timeout", &self.telegram.timeout),
        ] {
            if parse_duration(value).is_none() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                });
            }
        }

        let b = &self.baselines;
        if b.size_low > b.size_high {
            return Err(ConfigError::Invalid(format!(
                "size window is empty: size_low {} > size_high {}",
                b.size_low, b.size_high
            )));
        }
        if !b.latency_secs.is_finite() || b.latency_secs < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "baselines.latency_secs".to_string(),
                value: b.latency_secs.to_string(),
            });
        }
        if !b.slow_factor.is_finite() || b.slow_factor < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "baselines.slow_factor".to_string(),
                value: b.slow_factor.to_string(),
            });
        }
        Ok(())
    }
}

/// Split a comma-separated chat id list, dropping blanks.
pub fn split_chat_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parse a duration string like "5s", "500ms", "1m", or bare seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
