//! Failure presentation: content-policy aware error notifications and the
//! detailed diagnostic panel shown when a generation fails.

use std::time::Duration;

use tracing::error;

use crate::notify::{NotificationId, NotificationKind, Notifier};

pub const ERROR_DURATION: Duration = Duration::from_millis(5000);
pub const POLICY_ERROR_DURATION: Duration = Duration::from_millis(8000);

const POLICY_PATTERNS: &[&str] = &[
    "content_policy",
    "content policy",
    "policy violation",
    "sensitive",
    "內容政策",
    "敏感",
];

const SUGGESTION_MARKERS: &[&str] = &["suggestion", "optimiz", "建議", "優化"];

pub const POLICY_SUGGESTION: &str =
    "Suggestion: use \"Optimize prompt\" to get policy-safe alternatives.";

pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    pub duration: Duration,
}

pub fn is_content_policy_error(message: &str) -> bool {
    let lowered = message.to_lowercase();
    POLICY_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// Shapes a failure message for display.
pub fn describe_error(message: &str) -> ErrorReport {
    let message = if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message.to_string()
    };
    if !is_content_policy_error(&message) {
        return ErrorReport {
            message,
            duration: ERROR_DURATION,
        };
    }

    let lowered = message.to_lowercase();
    let message = if SUGGESTION_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        message
    } else {
        format!("{message}\n\n{POLICY_SUGGESTION}")
    };
    ErrorReport {
        message,
        duration: POLICY_ERROR_DURATION,
    }
}

pub async fn handle_error(notifier: &Notifier, context: &str, message: &str) -> NotificationId {
    error!(context, error = message, "operation failed");
    let report = describe_error(message);
    notifier
        .notify_for(report.message, NotificationKind::Error, report.duration)
        .await
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticPanel {
    pub error: String,
    pub troubleshooting: Vec<String>,
    pub technical_uri: Option<String>,
}

impl DiagnosticPanel {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }

    pub fn with_troubleshooting(mut self, steps: Vec<String>) -> Self {
        self.troubleshooting = steps;
        self
    }

    pub fn with_technical_uri(mut self, uri: Option<String>) -> Self {
        self.technical_uri = uri.filter(|uri| !uri.trim().is_empty());
        self
    }

    /// Plain-text rendering: error, numbered remediation steps, then the
    /// technical URI when the asset was produced but could not be fetched.
    pub fn render(&self) -> String {
        let mut out = format!("Generation failed\nReason: {}", self.error);
        if !self.troubleshooting.is_empty() {
            out.push_str("\n\nSuggested fixes:");
            for (step, text) in self.troubleshooting.iter().enumerate() {
                out.push_str(&format!("\n  {}. {text}", step + 1));
            }
        }
        if let Some(uri) = &self.technical_uri {
            out.push_str(&format!(
                "\n\nTechnical details:\n  Asset URI: {uri}\n  The asset was generated but downloading it failed; check storage permissions."
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast;

    #[test]
    fn policy_errors_get_longer_duration_and_suggestion() {
        let report = describe_error("policy violation");
        assert_eq!(report.duration, POLICY_ERROR_DURATION);
        assert!(report.message.starts_with("policy violation"));
        assert!(report.message.ends_with(POLICY_SUGGESTION));

        let already = describe_error("Blocked by content policy. Suggestion: rephrase.");
        assert_eq!(already.message, "Blocked by content policy. Suggestion: rephrase.");

        let cjk = describe_error("提示詞包含敏感內容");
        assert_eq!(cjk.duration, POLICY_ERROR_DURATION);
    }

    #[test]
    fn ordinary_errors_pass_through() {
        let report = describe_error("HTTP error! status: 502");
        assert_eq!(report.message, "HTTP error! status: 502");
        assert_eq!(report.duration, ERROR_DURATION);
        assert_eq!(describe_error("  ").message, UNKNOWN_ERROR);
    }

    #[tokio::test]
    async fn handle_error_posts_error_notification() {
        let (events, _rx) = broadcast::channel(8);
        let notifier = Notifier::new(events);
        handle_error(&notifier, "image generation", "content_policy_violation").await;
        let active = notifier.active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, NotificationKind::Error);
        assert_eq!(active[0].duration, POLICY_ERROR_DURATION);
        assert!(active[0].message.contains(POLICY_SUGGESTION));
    }

    #[test]
    fn panel_renders_steps_and_uri() {
        let panel = DiagnosticPanel::new("download failed")
            .with_troubleshooting(vec!["Grant storage access".into(), "Retry".into()])
            .with_technical_uri(Some("gs://bucket/video.mp4".into()));
        let text = panel.render();
        assert!(text.contains("Reason: download failed"));
        assert!(text.contains("  1. Grant storage access\n  2. Retry"));
        assert!(text.contains("Asset URI: gs://bucket/video.mp4"));

        let bare = DiagnosticPanel::new("boom").with_technical_uri(Some(String::new()));
        assert_eq!(bare.render(), "Generation failed\nReason: boom");
    }
}
