use std::{fmt, sync::Arc, time::Duration};

use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::ClientEvent;

pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub duration: Duration,
}

struct NotifierState {
    next_id: u64,
    active: Vec<Notification>,
}

/// Transient notifications, each expiring on its own timer.
///
/// Clones share the same list. Notifications stack independently: there is
/// no queueing and no deduplication.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Mutex<NotifierState>>,
    events: broadcast::Sender<ClientEvent>,
    default_duration: Duration,
}

impl Notifier {
    pub fn new(events: broadcast::Sender<ClientEvent>) -> Self {
        Self::with_default_duration(events, DEFAULT_NOTIFICATION_DURATION)
    }

    pub fn with_default_duration(
        events: broadcast::Sender<ClientEvent>,
        default_duration: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NotifierState {
                next_id: 1,
                active: Vec::new(),
            })),
            events,
            default_duration,
        }
    }

    pub async fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        self.notify_for(message, kind, self.default_duration).await
    }

    pub async fn notify_for(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
    ) -> NotificationId {
        let notification = {
            let mut guard = self.inner.lock().await;
            let id = NotificationId(guard.next_id);
            guard.next_id += 1;
            let notification = Notification {
                id,
                kind,
                message: message.into(),
                duration,
            };
            guard.active.push(notification.clone());
            notification
        };
        let id = notification.id;
        debug!(id = id.0, kind = %kind, message = %notification.message, "notification posted");
        let _ = self
            .events
            .send(ClientEvent::NotificationPosted(notification));

        let notifier = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            notifier.dismiss(id).await;
        });

        id
    }

    /// Removes a notification. Returns `false` when it was already gone.
    pub async fn dismiss(&self, id: NotificationId) -> bool {
        let removed = {
            let mut guard = self.inner.lock().await;
            let before = guard.active.len();
            guard.active.retain(|notification| notification.id != id);
            guard.active.len() != before
        };
        if removed {
            let _ = self.events.send(ClientEvent::NotificationRemoved(id));
        }
        removed
    }

    pub async fn active(&self) -> Vec<Notification> {
        self.inner.lock().await.active.clone()
    }

    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }
}

#[cfg(test)]
#[path = "tests/notify_tests.rs"]
mod tests;
