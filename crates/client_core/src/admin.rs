//! Read-only admin dashboard over the backend's generation log.

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use shared::{
    domain::{ContentType, GenerationStatus},
    error::{ApiError, ParseDomainError},
    protocol::{ApiEnvelope, GenerationRecord, GenerationStatistics},
};
use tracing::{info, warn};

use crate::{
    backend::BackendApi,
    error::ClientError,
    format::{format_timestamp, truncate_text},
    notify::{NotificationKind, Notifier},
};

pub const PROMPT_PREVIEW_CHARS: usize = 50;
pub const ADMIN_ERROR_DURATION: Duration = Duration::from_millis(5000);
const SYSTEM_USER: &str = "System user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    Statistics,
    Records,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordFilter {
    #[default]
    All,
    Only(ContentType),
}

impl RecordFilter {
    pub fn matches(self, record: &GenerationRecord) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::Only(content) => record.generation_type == content,
        }
    }
}

impl FromStr for RecordFilter {
    type Err = ParseDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(RecordFilter::All);
        }
        value
            .parse::<ContentType>()
            .map(RecordFilter::Only)
            .map_err(|_| ParseDomainError::new("record filter", value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

impl fmt::Display for StatCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

pub fn status_label(status: GenerationStatus) -> &'static str {
    match status {
        GenerationStatus::Success => "✅ Success",
        GenerationStatus::Failed => "❌ Failed",
        GenerationStatus::Unknown => "❓ Unknown",
    }
}

fn type_label(content: ContentType) -> &'static str {
    match content {
        ContentType::Image => "🖼️ Image",
        ContentType::Video => "🎬 Video",
    }
}

/// One rendered row of the records table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub user: &'static str,
    pub kind: &'static str,
    pub model: String,
    pub prompt: String,
    pub full_prompt: String,
    pub status: &'static str,
    pub duration: String,
    pub created_at: String,
}

impl From<&GenerationRecord> for RecordRow {
    fn from(record: &GenerationRecord) -> Self {
        Self {
            user: SYSTEM_USER,
            kind: type_label(record.generation_type),
            model: record
                .model_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            prompt: truncate_text(&record.prompt, PROMPT_PREVIEW_CHARS),
            full_prompt: record.prompt.clone(),
            status: status_label(record.status),
            duration: match record.generation_time {
                Some(seconds) if seconds > 0.0 => format!("{seconds:.2}s"),
                _ => "-".to_string(),
            },
            created_at: record
                .created_at
                .as_deref()
                .filter(|raw| !raw.is_empty())
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub struct AdminDashboard {
    backend: Arc<dyn BackendApi>,
    notifier: Notifier,
    tab: AdminTab,
    statistics: Option<GenerationStatistics>,
    records: Vec<GenerationRecord>,
}

impl AdminDashboard {
    pub fn new(backend: Arc<dyn BackendApi>, notifier: Notifier) -> Self {
        Self {
            backend,
            notifier,
            tab: AdminTab::Statistics,
            statistics: None,
            records: Vec::new(),
        }
    }

    pub fn tab(&self) -> AdminTab {
        self.tab
    }

    pub fn statistics(&self) -> Option<&GenerationStatistics> {
        self.statistics.as_ref()
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Switches tabs and loads the tab's data.
    pub async fn show_tab(&mut self, tab: AdminTab) -> Result<(), ClientError> {
        self.tab = tab;
        match tab {
            AdminTab::Statistics => self.load_statistics().await,
            AdminTab::Records => self.load_records().await.map(|_| ()),
        }
    }

    pub async fn load_statistics(&mut self) -> Result<(), ClientError> {
        let outcome = match self.backend.admin_statistics().await {
            Ok(response) => match response.failure() {
                Some(failure) => Err(failure),
                None => Ok(response.statistics.unwrap_or_default()),
            },
            Err(err) => Err(err.user_message()),
        };
        match outcome {
            Ok(statistics) => {
                info!(total = statistics.total_generations, "statistics loaded");
                self.statistics = Some(statistics);
                Ok(())
            }
            Err(message) => Err(self.load_failed("statistics", message).await),
        }
    }

    pub async fn load_records(&mut self) -> Result<usize, ClientError> {
        let outcome = match self.backend.recent_generations().await {
            Ok(response) => match response.failure() {
                Some(failure) => Err(failure),
                None => Ok(response.generations),
            },
            Err(err) => Err(err.user_message()),
        };
        match outcome {
            Ok(records) => {
                info!(count = records.len(), "generation records loaded");
                self.records = records;
                Ok(self.records.len())
            }
            Err(message) => Err(self.load_failed("generation records", message).await),
        }
    }

    async fn load_failed(&self, what: &str, message: String) -> ClientError {
        warn!(what, error = %message, "admin load failed");
        self.notifier
            .notify_for(
                format!("Failed to load {what}: {message}"),
                NotificationKind::Error,
                ADMIN_ERROR_DURATION,
            )
            .await;
        ApiError::new(message).into()
    }

    pub fn stat_cards(&self) -> Vec<StatCard> {
        let stats = self.statistics.clone().unwrap_or_default();
        vec![
            StatCard {
                label: "Total generations",
                value: stats.total_generations.to_string(),
            },
            StatCard {
                label: "Image generations",
                value: stats.image_generations.to_string(),
            },
            StatCard {
                label: "Video generations",
                value: stats.video_generations.to_string(),
            },
            StatCard {
                label: "Today",
                value: stats.today_generations.to_string(),
            },
            StatCard {
                label: "Success rate",
                value: format!("{}%", stats.success_rate),
            },
            StatCard {
                label: "Active users",
                value: "N/A".to_string(),
            },
        ]
    }

    pub fn rows(&self, filter: RecordFilter) -> Vec<RecordRow> {
        self.records
            .iter()
            .filter(|record| filter.matches(record))
            .map(RecordRow::from)
            .collect()
    }
}
