use shared::domain::ContentType;

pub mod admin;
pub mod backend;
pub mod diagnostics;
mod downloads;
pub mod error;
pub mod format;
pub mod media;
pub mod modal;
pub mod notify;
pub mod progress;
pub mod prompt;
pub mod search;
pub mod selector;
pub mod shell;
pub mod studio;
#[cfg(test)]
mod test_support;
pub mod tips;
pub mod validation;

pub use backend::{BackendApi, HttpBackend};
pub use diagnostics::DiagnosticPanel;
pub use downloads::DownloadTally;
pub use error::{ClientError, ValidationError};
pub use media::{ImageKind, MediaKind, VideoKind};
pub use modal::{MemorySurface, ModalController, ModalId, ModalSurface};
pub use notify::{Notification, NotificationId, NotificationKind, Notifier};
pub use selector::{ButtonStyle, OptionButton, OptimizationSelector, SelectionState};
pub use shell::StudioShell;
pub use studio::{GenerationOutcome, GenerationStudio, ImageStudio, VideoStudio};

/// Everything a front end needs to redraw, broadcast by the core.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    NotificationPosted(Notification),
    NotificationRemoved(NotificationId),
    LoadingStarted {
        content: ContentType,
        message: String,
    },
    Progress {
        content: ContentType,
        percent: u8,
    },
    LoadingFinished {
        content: ContentType,
    },
    OptimizationsReady {
        content: ContentType,
        candidates: Vec<String>,
    },
    SelectionChanged {
        content: ContentType,
        buttons: Vec<OptionButton>,
    },
    AssetsRendered {
        content: ContentType,
        total: usize,
    },
    DiagnosticRendered {
        content: ContentType,
        panel: DiagnosticPanel,
    },
    SearchResultsRendered {
        page: u32,
        total_pages: u32,
        count: usize,
    },
}
