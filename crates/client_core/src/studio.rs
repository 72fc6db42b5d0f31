//! Prompt optimization and generation orchestration shared by the image and
//! video generators.

use std::{path::PathBuf, sync::Arc};

use shared::{domain::ContentType, protocol::ApiEnvelope};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    backend::BackendApi,
    diagnostics::{handle_error, DiagnosticPanel},
    downloads::{save_asset, DownloadTally},
    error::{ClientError, ValidationError},
    media::{GeneratedAsset, GenerationReply, ImageKind, MediaKind, VideoKind},
    modal::{ModalController, ModalId, IMAGE_PREVIEW_TITLE},
    notify::{NotificationKind, Notifier},
    progress::ProgressSimulator,
    prompt::{contains_cjk, PromptForm},
    selector::{CandidateIndex, OptimizationSelector},
    tips::{tips_for, TipCategory},
    validation::validate_prompt,
    ClientEvent,
};

pub type ImageStudio = GenerationStudio<ImageKind>;
pub type VideoStudio = GenerationStudio<VideoKind>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Assets were appended; `count` is how many this submission produced.
    Rendered { count: usize },
    Failed(DiagnosticPanel),
    /// Rejected locally; no generation request was sent.
    Rejected(ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastGeneration {
    pub count: usize,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationStats {
    pub total_assets: usize,
    pub last_generation: Option<LastGeneration>,
}

/// One generator page: prompt form, optimization panel, parameters and the
/// session's generated assets.
///
/// Every operation takes `&mut self`, so a second submission cannot start
/// while one is in flight.
pub struct GenerationStudio<K: MediaKind> {
    kind: K,
    backend: Arc<dyn BackendApi>,
    notifier: Notifier,
    events: broadcast::Sender<ClientEvent>,
    download_dir: PathBuf,
    form: PromptForm,
    selector: OptimizationSelector,
    optimization_visible: bool,
    params: K::Params,
    assets: Vec<K::Asset>,
    last_generation: Option<LastGeneration>,
    previewed: Option<K::Asset>,
}

impl<K: MediaKind> GenerationStudio<K> {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        notifier: Notifier,
        events: broadcast::Sender<ClientEvent>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind: K::default(),
            backend,
            notifier,
            events,
            download_dir: download_dir.into(),
            form: PromptForm::default(),
            selector: OptimizationSelector::default(),
            optimization_visible: false,
            params: K::Params::default(),
            assets: Vec::new(),
            last_generation: None,
            previewed: None,
        }
    }

    pub fn form(&self) -> &PromptForm {
        &self.form
    }

    pub fn set_prompt(&mut self, raw: impl Into<String>) {
        self.form.set_raw(raw);
    }

    pub fn params(&self) -> &K::Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut K::Params {
        &mut self.params
    }

    pub fn selector(&self) -> &OptimizationSelector {
        &self.selector
    }

    pub fn optimization_visible(&self) -> bool {
        self.optimization_visible
    }

    pub fn assets(&self) -> &[K::Asset] {
        &self.assets
    }

    pub fn previewed(&self) -> Option<&K::Asset> {
        self.previewed.as_ref()
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }

    async fn notify(&self, message: impl Into<String>, kind: NotificationKind) {
        self.notifier.notify(message, kind).await;
    }

    /// Requests the six optimization candidates for the current prompt.
    pub async fn optimize(&mut self) -> bool {
        let mut prompt = self.form.raw().trim().to_string();
        if prompt.is_empty() && K::CONTENT == ContentType::Video {
            prompt = self.form.final_prompt().trim().to_string();
        }
        if prompt.is_empty() {
            self.notify("Please enter a prompt first", NotificationKind::Warning)
                .await;
            return false;
        }

        self.emit(ClientEvent::LoadingStarted {
            content: K::CONTENT,
            message: "Analysing prompt...".to_string(),
        });
        let result = self.backend.optimize_prompt(K::CONTENT, &prompt).await;
        self.emit(ClientEvent::LoadingFinished { content: K::CONTENT });

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                handle_error(&self.notifier, "prompt optimization", &err.user_message()).await;
                return false;
            }
        };
        if let Some(failure) = response.failure() {
            handle_error(&self.notifier, "prompt optimization", &failure).await;
            return false;
        }

        info!(
            content = %K::CONTENT,
            candidates = response.optimizations.len(),
            "optimization candidates loaded"
        );
        self.selector
            .load(response.optimizations, response.style_names);
        self.optimization_visible = true;
        self.emit(ClientEvent::OptimizationsReady {
            content: K::CONTENT,
            candidates: self.selector.candidates().to_vec(),
        });
        self.emit(ClientEvent::SelectionChanged {
            content: K::CONTENT,
            buttons: self.selector.buttons(),
        });
        true
    }

    pub async fn select_optimization(&mut self, index: usize) -> bool {
        let Some(index) = CandidateIndex::new(index) else {
            debug!(index, "candidate index out of range");
            return false;
        };
        if !self.selector.select(index, &mut self.form) {
            return false;
        }
        self.emit(ClientEvent::SelectionChanged {
            content: K::CONTENT,
            buttons: self.selector.buttons(),
        });
        self.notify(
            format!("Selected optimized version {index}; it is translated at generation time"),
            NotificationKind::Success,
        )
        .await;
        true
    }

    /// Fetches candidates and adopts candidate `index`. Fails when either
    /// step does.
    pub async fn optimize_and_select(&mut self, index: usize) -> bool {
        self.optimize().await && self.select_optimization(index).await
    }

    pub async fn reset_to_original(&mut self) -> bool {
        if self.form.raw().trim().is_empty() {
            self.notify("There is no original prompt to restore", NotificationKind::Warning)
                .await;
            return false;
        }
        self.selector.reset(&mut self.form);
        self.emit(ClientEvent::SelectionChanged {
            content: K::CONTENT,
            buttons: self.selector.buttons(),
        });
        self.notify("Restored the original prompt", NotificationKind::Success)
            .await;
        true
    }

    /// Hides the candidate panel. A chosen candidate stays in the final prompt.
    pub async fn close_optimization(&mut self) {
        self.optimization_visible = false;
        self.notify("Kept the current prompt", NotificationKind::Success)
            .await;
    }

    /// Validates, optionally translates, then generates from the final prompt.
    pub async fn submit(&mut self) -> GenerationOutcome {
        let mut prompt = self.form.final_prompt().trim().to_string();
        if prompt.is_empty() {
            self.notify("Please enter a prompt first", NotificationKind::Warning)
                .await;
            return GenerationOutcome::Rejected(ValidationError::EmptyPrompt);
        }
        if let Err(err) = K::validate(&prompt, &self.params) {
            return self.reject(err).await;
        }

        if contains_cjk(&prompt) {
            prompt = self.translate(prompt).await;
            if let Err(err) = validate_prompt(&prompt) {
                return self.reject(err).await;
            }
        }

        self.emit(ClientEvent::LoadingStarted {
            content: K::CONTENT,
            message: K::LOADING_MESSAGE.to_string(),
        });
        let progress = ProgressSimulator::start(K::CONTENT, K::PROGRESS, self.events.clone());
        let result = self
            .kind
            .generate(self.backend.as_ref(), &prompt, &self.params)
            .await;
        progress.stop();
        self.emit(ClientEvent::LoadingFinished { content: K::CONTENT });

        match result {
            Ok(reply) => self.finish(reply).await,
            Err(err) => {
                let panel = DiagnosticPanel::new(err.user_message());
                self.fail(panel).await
            }
        }
    }

    async fn reject(&self, err: ValidationError) -> GenerationOutcome {
        warn!(content = %K::CONTENT, error = %err, "generation rejected locally");
        self.notify(err.to_string(), NotificationKind::Error).await;
        GenerationOutcome::Rejected(err)
    }

    /// One translation round-trip; any failure keeps the original text.
    async fn translate(&self, prompt: String) -> String {
        self.emit(ClientEvent::LoadingStarted {
            content: K::CONTENT,
            message: "Translating prompt to English...".to_string(),
        });
        let result = self.backend.translate_prompt(K::CONTENT, &prompt).await;
        self.emit(ClientEvent::LoadingFinished { content: K::CONTENT });

        let translated = match result {
            Ok(response) if response.success() => response
                .translated_prompt
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            Ok(response) => {
                warn!(error = ?response.error, "translation rejected; using original prompt");
                None
            }
            Err(err) => {
                warn!(error = %err, "translation request failed; using original prompt");
                None
            }
        };

        match translated {
            Some(text) => {
                info!(content = %K::CONTENT, "prompt translated");
                self.notify("Prompt translated to English", NotificationKind::Success)
                    .await;
                text
            }
            None => {
                self.notify(
                    "Translation failed; using the original prompt",
                    NotificationKind::Warning,
                )
                .await;
                prompt
            }
        }
    }

    async fn finish(&mut self, reply: GenerationReply<K::Asset>) -> GenerationOutcome {
        if let Some(failure) = reply.failure {
            let panel = DiagnosticPanel::new(failure)
                .with_troubleshooting(reply.troubleshooting)
                .with_technical_uri(reply.cloud_uri);
            return self.fail(panel).await;
        }

        let count = reply.assets.len();
        self.assets.extend(reply.assets);
        self.last_generation = Some(LastGeneration {
            count: reply.total_count,
            timestamp: reply.timestamp,
        });
        info!(content = %K::CONTENT, count, total = self.assets.len(), "generation rendered");
        self.emit(ClientEvent::AssetsRendered {
            content: K::CONTENT,
            total: self.assets.len(),
        });
        self.notify(K::success_message(reply.total_count), NotificationKind::Success)
            .await;
        GenerationOutcome::Rendered { count }
    }

    async fn fail(&self, panel: DiagnosticPanel) -> GenerationOutcome {
        self.emit(ClientEvent::DiagnosticRendered {
            content: K::CONTENT,
            panel: panel.clone(),
        });
        let context = format!("{} generation", K::CONTENT.label());
        handle_error(&self.notifier, &context, &panel.error).await;
        GenerationOutcome::Failed(panel)
    }

    /// Opens the preview modal for asset `index` and remembers it as the
    /// current preview.
    pub fn preview(&mut self, index: usize, modals: &mut ModalController) -> bool {
        let Some(asset) = self.assets.get(index).cloned() else {
            return false;
        };
        if !modals.open(K::PREVIEW_MODAL) {
            return false;
        }
        if let Some(size) = asset.dimensions() {
            modals.set_preview_title(&format!(
                "{IMAGE_PREVIEW_TITLE} ({size} - {})",
                size.orientation_label()
            ));
        }
        self.previewed = Some(asset);
        true
    }

    pub async fn download(&self, index: usize) -> Result<PathBuf, ClientError> {
        let asset = self
            .assets
            .get(index)
            .ok_or(ClientError::Missing("asset"))?;
        self.download_asset(asset).await
    }

    pub async fn download_current(&self) -> Result<PathBuf, ClientError> {
        match &self.previewed {
            Some(asset) => self.download_asset(asset).await,
            None => {
                self.notify(
                    format!("There is no {} to download", K::CONTENT.label()),
                    NotificationKind::Error,
                )
                .await;
                Err(ClientError::Missing("preview"))
            }
        }
    }

    async fn download_asset(&self, asset: &K::Asset) -> Result<PathBuf, ClientError> {
        let result = save_asset(
            self.backend.as_ref(),
            &self.download_dir,
            asset.url(),
            asset.filename(),
        )
        .await;
        match &result {
            Ok(_) => {
                self.notify(
                    format!("Downloaded {}", asset.filename()),
                    NotificationKind::Success,
                )
                .await
            }
            Err(err) => {
                warn!(url = asset.url(), error = %err, "download failed");
                self.notify("Download failed", NotificationKind::Error).await;
            }
        }
        result
    }

    /// Downloads every asset in order, pausing between each.
    pub async fn download_all(&self) -> DownloadTally {
        let mut tally = DownloadTally::default();
        if self.assets.is_empty() {
            self.notify(
                format!("There is no {} to download", K::CONTENT.label()),
                NotificationKind::Warning,
            )
            .await;
            return tally;
        }

        self.notify(
            format!("Downloading {} {}(s)", self.assets.len(), K::CONTENT.label()),
            NotificationKind::Success,
        )
        .await;
        for (position, asset) in self.assets.iter().enumerate() {
            if position > 0 {
                tokio::time::sleep(K::DOWNLOAD_STAGGER).await;
            }
            let result = self.download_asset(asset).await;
            tally.record(&result);
        }
        tally
    }

    /// Absolute link for asset `index`, announced as copied.
    pub async fn copy_link(&self, index: usize) -> Option<String> {
        let asset = self.assets.get(index)?;
        let link = self.backend.resolve_url(asset.url());
        self.notify("Link copied to clipboard", NotificationKind::Success)
            .await;
        Some(link)
    }

    /// Link for the previewed asset.
    pub async fn share_current(&self) -> Option<String> {
        let Some(asset) = &self.previewed else {
            self.notify(
                format!("There is no {} to share", K::CONTENT.label()),
                NotificationKind::Error,
            )
            .await;
            return None;
        };
        let link = self.backend.resolve_url(asset.url());
        self.notify("Link copied to clipboard", NotificationKind::Success)
            .await;
        Some(link)
    }

    pub async fn clear_results(&mut self) {
        self.assets.clear();
        self.last_generation = None;
        self.previewed = None;
        self.optimization_visible = false;
        self.emit(ClientEvent::AssetsRendered {
            content: K::CONTENT,
            total: 0,
        });
        self.notify("Cleared all results", NotificationKind::Success)
            .await;
    }

    pub fn stats(&self) -> GenerationStats {
        GenerationStats {
            total_assets: self.assets.len(),
            last_generation: self.last_generation.clone(),
        }
    }

    pub fn show_tips(&self, modals: &mut ModalController) -> &'static [TipCategory] {
        modals.open(ModalId::PromptTips);
        tips_for(K::CONTENT)
    }

    pub async fn insert_tip(&mut self, tip: &str, modals: &mut ModalController) {
        self.form.append_tip(tip);
        self.notify("Tip added to prompt", NotificationKind::Success)
            .await;
        modals.close(ModalId::PromptTips);
    }
}

#[cfg(test)]
#[path = "tests/studio_tests.rs"]
mod tests;
