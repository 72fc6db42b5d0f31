//! One front-end session: shared modal layer, notifications and the four
//! panels that use them.

use std::{path::PathBuf, sync::Arc, time::Duration};

use tokio::sync::broadcast;
use tracing::info;

use crate::{
    admin::AdminDashboard,
    backend::BackendApi,
    modal::{ModalController, ModalSurface},
    notify::Notifier,
    search::SearchSession,
    studio::{ImageStudio, VideoStudio},
    ClientEvent,
};

const EVENT_CAPACITY: usize = 256;

pub struct StudioShell {
    pub modals: ModalController,
    pub notifier: Notifier,
    pub image: ImageStudio,
    pub video: VideoStudio,
    pub search: SearchSession,
    pub admin: AdminDashboard,
    events: broadcast::Sender<ClientEvent>,
}

impl StudioShell {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        surface: Box<dyn ModalSurface>,
        download_dir: impl Into<PathBuf>,
        notification_duration: Duration,
    ) -> Self {
        let download_dir = download_dir.into();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let notifier = Notifier::with_default_duration(events.clone(), notification_duration);
        info!(download_dir = %download_dir.display(), "studio session started");
        Self {
            modals: ModalController::new(surface),
            image: ImageStudio::new(
                backend.clone(),
                notifier.clone(),
                events.clone(),
                download_dir.join("images"),
            ),
            video: VideoStudio::new(
                backend.clone(),
                notifier.clone(),
                events.clone(),
                download_dir.join("videos"),
            ),
            search: SearchSession::new(
                backend.clone(),
                notifier.clone(),
                events.clone(),
                download_dir.join("search"),
            ),
            admin: AdminDashboard::new(backend, notifier.clone()),
            notifier,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Closes any open modal and drops pending notifications.
    pub async fn shutdown(&mut self) {
        if let Some(id) = self.modals.active() {
            self.modals.close(id);
        }
        for notification in self.notifier.active().await {
            self.notifier.dismiss(notification.id).await;
        }
        info!("studio session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        modal::{MemorySurface, ModalId},
        notify::NotificationKind,
        test_support::FakeBackend,
    };

    #[tokio::test(start_paused = true)]
    async fn panels_share_one_event_stream() {
        let dir = tempfile::tempdir().unwrap();
        let page = MemorySurface::default();
        let mut shell = StudioShell::new(
            Arc::new(FakeBackend::default()),
            Box::new(page.clone()),
            dir.path(),
            Duration::from_millis(1500),
        );
        let mut events = shell.subscribe_events();

        shell.image.set_prompt("   ");
        shell.image.submit().await;
        match events.recv().await.unwrap() {
            ClientEvent::NotificationPosted(notification) => {
                assert_eq!(notification.kind, NotificationKind::Warning);
                assert_eq!(notification.duration, Duration::from_millis(1500));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        shell.video.show_tips(&mut shell.modals);
        assert!(page.is_visible(ModalId::PromptTips));

        shell.shutdown().await;
        assert!(!page.is_visible(ModalId::PromptTips));
        assert!(shell.notifier.active().await.is_empty());
    }
}
