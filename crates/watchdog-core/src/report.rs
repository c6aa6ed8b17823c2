//! Status message composition.
//!
//! Every message is a short list of lines joined by [`LINE_SEPARATOR`],
//! which keeps the report on one line in chat clients and log files.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::{Baselines, ReportStyle};
use crate::types::{FetchOutcome, HealthState, Reason, Verdict};

pub const LINE_SEPARATOR: &str = "  ";

const NOT_AVAILABLE: &str = "N/A";

/// Render the report for a classified outcome.
///
/// Never fails: absent measurements print as "N/A" and ratios against a
/// zero or absent value fall back to plain text.
pub fn build_message(
    verdict: &Verdict,
    outcome: &FetchOutcome,
    baselines: &Baselines,
    style: &ReportStyle,
    now: DateTime<Utc>,
) -> String {
    let ctx = Context {
        outcome,
        baselines,
        style,
        site_title: style.display_name.to_uppercase(),
        timestamp: format_timestamp(now, style),
    };

    let lines = match (verdict.state, verdict.reason) {
        (HealthState::Good, _) => ctx.good(),
        (HealthState::Abnormal, Some(Reason::Content)) => ctx.content(),
        (HealthState::Abnormal, Some(Reason::Slow)) => ctx.slow(),
        // Not produced by `classify`, kept so any hand-built verdict renders.
        (HealthState::Abnormal, _) => ctx.abnormal_generic(),
        (HealthState::Down, _) => ctx.down(),
    };

    lines.join(LINE_SEPARATOR)
}

/// "DD Mon YYYY, HH:MM <label>" for `now` shifted by the style's fixed offset.
pub fn format_timestamp(now: DateTime<Utc>, style: &ReportStyle) -> String {
    let shifted = now + TimeDelta::minutes(i64::from(style.utc_offset_minutes));
    format!("{} {}", shifted.format("%d %b %Y, %H:%M"), style.zone_label)
}

struct Context<'a> {
    outcome: &'a FetchOutcome,
    baselines: &'a Baselines,
    style: &'a ReportStyle,
    site_title: String,
    timestamp: String,
}

impl Context<'_> {
    fn title(&self, suffix: &str) -> String {
        format!("{} WatchDog: {suffix}", self.site_title)
    }

    fn last_check(&self) -> String {
        format!("Last check: {}", self.timestamp)
    }

    fn size_text(&self) -> String {
        match self.outcome.size_bytes {
            Some(size) => format!("{size} bytes"),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    fn time_text(&self) -> String {
        match self.outcome.elapsed_secs {
            Some(elapsed) => format!("{elapsed:.3} s"),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    fn normal_time(&self) -> String {
        format!("normal ~{:.2} s", self.baselines.latency_secs)
    }

    fn normal_size(&self) -> String {
        format!("normal ~{} bytes", self.baselines.size)
    }

    fn good(&self) -> Vec<String> {
        vec![
            self.title(HealthState::Good.label()),
            format!("{} is behaving normally.", self.style.display_name),
            self.last_check(),
            format!("Response time: {} ({})", self.time_text(), self.normal_time()),
            format!("Page size: {} ({})", self.size_text(), self.normal_size()),
        ]
    }

    fn content(&self) -> Vec<String> {
        let ratio = match self.outcome.size_bytes {
            Some(size) if size != 0 && self.baselines.size != 0 => {
                let pct = size as f64 / self.baselines.size as f64 * 100.0;
                format!("{pct:.0}% of normal")
            }
            _ => "unknown vs normal".to_string(),
        };

        vec![
            self.title("ABNORMAL (CONTENT)"),
            format!(
                "{} is reachable, but the page content is unusual compared to normal.",
                self.style.display_name
            ),
            self.last_check(),
            format!("Page size: {} ({}) = {ratio}.", self.size_text(), self.normal_size()),
            "This may indicate an error page or backend issue. \
             Please verify manually by logging in and sending a test prompt."
                .to_string(),
        ]
    }

    fn slow(&self) -> Vec<String> {
        let factor = match self.outcome.elapsed_secs {
            Some(elapsed) if elapsed != 0.0 && self.baselines.latency_secs != 0.0 => {
                format!("{:.1}X slower than normal", elapsed / self.baselines.latency_secs)
            }
            _ => "slower than normal".to_string(),
        };

        vec![
            self.title("ABNORMAL (SLOW)"),
            format!(
                "{} is reachable, but slower than usual.",
                self.style.display_name
            ),
            self.last_check(),
            format!("Response time: {} ({}) = {factor}.", self.time_text(), self.normal_time()),
            format!("Page size: {} ({}).", self.size_text(), self.normal_size()),
            "System is up, but performance is degraded. \
             May please monitor and escalate if users report issues."
                .to_string(),
        ]
    }

    fn abnormal_generic(&self) -> Vec<String> {
        let status = self
            .outcome
            .status_code
            .map_or_else(|| NOT_AVAILABLE.to_string(), |code| code.to_string());

        vec![
            self.title(HealthState::Abnormal.label()),
            format!(
                "{} is reachable, but behaviour is unusual.",
                self.style.display_name
            ),
            self.last_check(),
            format!("Status code: {status}"),
            format!("Response time: {}", self.time_text()),
            format!("Page size: {}", self.size_text()),
            "Please verify manually.".to_string(),
        ]
    }

    fn down(&self) -> Vec<String> {
        let error = match (&self.outcome.error, self.outcome.status_code) {
            (Some(err), _) if !err.is_empty() => err.clone(),
            (_, Some(code)) => format!("HTTP {code}"),
            _ => "Unknown error".to_string(),
        };

        vec![
            self.title(HealthState::Down.label()),
            format!("{} is not reachable.", self.style.display_name),
            self.last_check(),
            format!("Error: {error}."),
            "This indicates an outage at the portal/infra level.".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 4, 0, 0).unwrap()
    }

    fn render(outcome: &FetchOutcome) -> (Verdict, String) {
        let baselines = Baselines::default();
        let verdict = classify(outcome, &baselines);
        let message = build_message(
            &verdict,
            outcome,
            &baselines,
            &ReportStyle::default(),
            fixed_now(),
        );
        (verdict, message)
    }

    #[test]
    fn timestamp_is_shifted_and_labelled() {
        assert_eq!(
            format_timestamp(fixed_now(), &ReportStyle::default()),
            "01 Mar 2026, 09:30 IST"
        );
    }

    #[test]
    fn timestamp_offset_crosses_midnight() {
        let late = Utc.with_ymd_and_hms(2025, 12, 31, 20, 15, 0).unwrap();
        assert_eq!(
            format_timestamp(late, &ReportStyle::default()),
            "01 Jan 2026, 01:45 IST"
        );
    }

    #[test]
    fn timestamp_uses_configured_offset() {
        let style = ReportStyle {
            utc_offset_minutes: -300,
            zone_label: "EST".to_string(),
            ..ReportStyle::default()
        };
        assert_eq!(format_timestamp(fixed_now(), &style), "28 Feb 2026, 23:00 EST");
    }

    #[test]
    fn good_report() {
        let (verdict, message) = render(&FetchOutcome::response(200, 1145, 0.20));
        assert_eq!(verdict.state, HealthState::Good);
        assert_eq!(
            message,
            "SAILGPT WatchDog: GOOD  \
             SailGPT is behaving normally.  \
             Last check: 01 Mar 2026, 09:30 IST  \
             Response time: 0.200 s (normal ~0.21 s)  \
             Page size: 1145 bytes (normal ~1145 bytes)"
        );
    }

    #[test]
    fn content_report_shows_percentage() {
        let (verdict, message) = render(&FetchOutcome::response(200, 500, 0.20));
        assert_eq!(verdict, Verdict::abnormal(Reason::Content));
        assert!(message.starts_with("SAILGPT WatchDog: ABNORMAL (CONTENT)"));
        assert!(message.contains("Page size: 500 bytes (normal ~1145 bytes) = 44% of normal."));
        assert!(message.contains("Please verify manually by logging in"));
    }

    #[test]
    fn content_report_with_zero_size_has_no_ratio() {
        let (verdict, message) = render(&FetchOutcome::response(200, 0, 0.20));
        assert_eq!(verdict, Verdict::abnormal(Reason::Content));
        assert!(message.contains("Page size: 0 bytes (normal ~1145 bytes) = unknown vs normal."));
    }

    #[test]
    fn content_report_with_zero_baseline_has_no_ratio() {
        let baselines = Baselines {
            size: 0,
            ..Baselines::default()
        };
        let outcome = FetchOutcome::response(200, 10, 0.2);
        let message = build_message(
            &Verdict::abnormal(Reason::Content),
            &outcome,
            &baselines,
            &ReportStyle::default(),
            fixed_now(),
        );
        assert!(message.contains("= unknown vs normal."));
    }

    #[test]
    fn content_report_with_missing_size() {
        let outcome = FetchOutcome {
            status_code: Some(200),
            elapsed_secs: Some(0.2),
            ..FetchOutcome::default()
        };
        let (_, message) = render(&outcome);
        assert!(message.contains("Page size: N/A (normal ~1145 bytes) = unknown vs normal."));
    }

    #[test]
    fn slow_report_shows_multiplier() {
        let (verdict, message) = render(&FetchOutcome::response(200, 1145, 1.00));
        assert_eq!(verdict, Verdict::abnormal(Reason::Slow));
        assert_eq!(
            message,
            "SAILGPT WatchDog: ABNORMAL (SLOW)  \
             SailGPT is reachable, but slower than usual.  \
             Last check: 01 Mar 2026, 09:30 IST  \
             Response time: 1.000 s (normal ~0.21 s) = 4.8X slower than normal.  \
             Page size: 1145 bytes (normal ~1145 bytes).  \
             System is up, but performance is degraded. \
             May please monitor and escalate if users report issues."
        );
    }

    #[test]
    fn slow_report_with_zero_baseline_has_no_multiplier() {
        let baselines = Baselines {
            latency_secs: 0.0,
            ..Baselines::default()
        };
        let outcome = FetchOutcome::response(200, 1145, 0.5);
        let verdict = classify(&outcome, &baselines);
        assert_eq!(verdict, Verdict::abnormal(Reason::Slow));

        let message = build_message(
            &verdict,
            &outcome,
            &baselines,
            &ReportStyle::default(),
            fixed_now(),
        );
        assert!(message.contains("Response time: 0.500 s (normal ~0.00 s) = slower than normal."));
    }

    #[test]
    fn slow_report_with_missing_elapsed() {
        let outcome = FetchOutcome {
            status_code: Some(200),
            size_bytes: Some(1145),
            ..FetchOutcome::default()
        };
        let (_, message) = render(&outcome);
        assert!(message.contains("Response time: N/A (normal ~0.21 s) = slower than normal."));
    }

    #[test]
    fn down_report_for_http_status() {
        let outcome = FetchOutcome {
            status_code: Some(500),
            ..FetchOutcome::default()
        };
        let (verdict, message) = render(&outcome);
        assert_eq!(verdict, Verdict::down());
        assert_eq!(
            message,
            "SAILGPT WatchDog: DOWN  \
             SailGPT is not reachable.  \
             Last check: 01 Mar 2026, 09:30 IST  \
             Error: HTTP 500.  \
             This indicates an outage at the portal/infra level."
        );
    }

    #[test]
    fn down_report_for_transport_error() {
        let (verdict, message) = render(&FetchOutcome::failed("Connection refused"));
        assert_eq!(verdict, Verdict::down());
        assert!(message.contains("Error: Connection refused."));
    }

    #[test]
    fn down_report_with_nothing_known() {
        let (_, message) = render(&FetchOutcome::default());
        assert!(message.contains("Error: Unknown error."));
    }

    #[test]
    fn down_report_with_empty_error_falls_back_to_status() {
        let outcome = FetchOutcome {
            status_code: Some(502),
            error: Some(String::new()),
            ..FetchOutcome::default()
        };
        let (_, message) = render(&outcome);
        assert!(message.contains("Error: HTTP 502."));
    }

    #[test]
    fn generic_abnormal_lists_raw_fields() {
        let verdict = Verdict {
            state: HealthState::Abnormal,
            reason: Some(Reason::Error),
        };
        let outcome = FetchOutcome {
            status_code: Some(200),
            size_bytes: None,
            elapsed_secs: Some(0.3),
            error: None,
        };
        let message = build_message(
            &verdict,
            &outcome,
            &Baselines::default(),
            &ReportStyle::default(),
            fixed_now(),
        );
        assert!(message.starts_with("SAILGPT WatchDog: ABNORMAL  "));
        assert!(message.contains("Status code: 200"));
        assert!(message.contains("Response time: 0.300 s"));
        assert!(message.contains("Page size: N/A"));
        assert!(message.ends_with("Please verify manually."));
    }

    #[test]
    fn every_state_renders_with_all_fields_absent() {
        let outcome = FetchOutcome::default();
        let verdicts = [
            Verdict::good(),
            Verdict::abnormal(Reason::Content),
            Verdict::abnormal(Reason::Slow),
            Verdict {
                state: HealthState::Abnormal,
                reason: None,
            },
            Verdict::down(),
        ];
        for verdict in verdicts {
            let message = build_message(
                &verdict,
                &outcome,
                &Baselines::default(),
                &ReportStyle::default(),
                fixed_now(),
            );
            assert!(message.contains("Last check: 01 Mar 2026, 09:30 IST"));
        }
    }

    #[test]
    fn display_name_drives_title_and_body() {
        let style = ReportStyle {
            display_name: "Portal".to_string(),
            ..ReportStyle::default()
        };
        let outcome = FetchOutcome::response(200, 1145, 0.1);
        let message = build_message(
            &Verdict::good(),
            &outcome,
            &Baselines::default(),
            &style,
            fixed_now(),
        );
        assert!(message.starts_with("PORTAL WatchDog: GOOD  Portal is behaving normally."));
    }
}
