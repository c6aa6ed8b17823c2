//! watchdog — fetch a page once, classify it, and report.
//!
//! # Usage
//!
//! ```text
//! watchdog --config /etc/watchdog.toml
//! TG_TOKEN=... TG_CHAT_IDS=-100123,42 watchdog --format json
//! ```
//!
//! Repetition is left to cron or a systemd timer.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use watchdog_core::WatchdogConfig;

mod check;

#[derive(Parser)]
#[command(
    name = "watchdog",
    about = "Synthetic health check for a single web page",
    version
)]
struct Cli {
    /// TOML config file (environment variables override it)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the watched URL
    #[arg(short, long)]
    url: Option<String>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Print the report but never send notifications
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("watchdog=info".parse()?),
        )
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();

    let mut config = WatchdogConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.target.url = url;
        config.validate()?;
    }
    info!(url = %config.target.url, "starting check");

    let report = check::run(&config).await?;

    match cli.format {
        Format::Text => println!("{}", report.render_text()),
        Format::Json => println!("{}", report.render_json()?),
    }

    if report.verdict.should_notify() {
        if cli.dry_run {
            info!(state = %report.verdict.state, "dry run, notification skipped");
        } else {
            check::relay(&config, &report.message).await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["watchdog"]).unwrap();
        assert_eq!(cli.format, Format::Text);
        assert!(!cli.dry_run);
        assert!(cli.config.is_none());
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "watchdog",
            "--config",
            "watchdog.toml",
            "--url",
            "http://localhost:8080",
            "--format",
            "json",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("watchdog.toml")));
        assert_eq!(cli.url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(cli.format, Format::Json);
        assert!(cli.dry_run);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["watchdog", "--format", "yaml"]).is_err());
    }
}
