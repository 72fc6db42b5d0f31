use std::time::Duration;

use rand::Rng;
use shared::domain::ContentType;
use tokio::{sync::broadcast, task::JoinHandle};

use crate::ClientEvent;

/// Cadence of the cosmetic progress bar shown while a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressProfile {
    pub interval: Duration,
    pub max_step: f64,
}

pub const IMAGE_PROGRESS: ProgressProfile = ProgressProfile {
    interval: Duration::from_millis(500),
    max_step: 20.0,
};

pub const VIDEO_PROGRESS: ProgressProfile = ProgressProfile {
    interval: Duration::from_millis(2000),
    max_step: 10.0,
};

/// Random-walk progress ticker. It reports nothing about the real request
/// and is aborted when dropped.
pub struct ProgressSimulator {
    handle: JoinHandle<()>,
}

impl ProgressSimulator {
    pub fn start(
        content: ContentType,
        profile: ProgressProfile,
        events: broadcast::Sender<ClientEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut progress = 0.0_f64;
            let mut ticker = tokio::time::interval(profile.interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let step = rand::thread_rng().gen_range(0.0..profile.max_step);
                progress = (progress + step).min(100.0);
                let _ = events.send(ClientEvent::Progress {
                    content,
                    percent: progress.floor() as u8,
                });
                if progress >= 100.0 {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn stop(self) {}
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
