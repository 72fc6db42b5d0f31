//! Web image search: paging, multi-select and server-mediated downloads.

use std::{collections::BTreeSet, path::PathBuf, sync::Arc, time::Duration};

use shared::{
    domain::SearchImageId,
    error::ApiError,
    protocol::{ApiEnvelope, SearchOptions, SearchRequest, SearchResult},
};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{
    backend::BackendApi,
    downloads::{save_asset, DownloadTally},
    error::{ClientError, ValidationError},
    modal::{ModalController, ModalId},
    notify::{NotificationKind, Notifier},
    ClientEvent,
};

pub const DEFAULT_PER_PAGE: u32 = 12;
pub const DOWNLOAD_GAP: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilters {
    pub orientation: String,
    pub size: String,
    pub image_type: String,
    pub per_page: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            orientation: "any".to_string(),
            size: "medium".to_string(),
            image_type: "photo".to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u32,
    pub total_pages: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    /// Pagination is only shown when there is more than one page.
    pub visible: bool,
    pub label: String,
}

pub fn total_pages(total_results: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 1;
    }
    let pages = total_results.div_ceil(u64::from(per_page));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

pub struct SearchSession {
    backend: Arc<dyn BackendApi>,
    notifier: Notifier,
    events: broadcast::Sender<ClientEvent>,
    download_dir: PathBuf,
    pub filters: SearchFilters,
    input: String,
    query: String,
    page: u32,
    total_pages: u32,
    total_results: u64,
    results: Vec<SearchResult>,
    selected: BTreeSet<SearchImageId>,
    options: Option<SearchOptions>,
    previewed: Option<SearchResult>,
}

impl SearchSession {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        notifier: Notifier,
        events: broadcast::Sender<ClientEvent>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            backend,
            notifier,
            events,
            download_dir: download_dir.into(),
            filters: SearchFilters::default(),
            input: String::new(),
            query: String::new(),
            page: 1,
            total_pages: 1,
            total_results: 0,
            results: Vec::new(),
            selected: BTreeSet::new(),
            options: None,
            previewed: None,
        }
    }

    pub fn set_input(&mut self, query: impl Into<String>) {
        self.input = query.into();
    }

    /// Whether the search control is enabled for the current input.
    pub fn can_search(&self) -> bool {
        !self.input.trim().is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    pub fn options(&self) -> Option<&SearchOptions> {
        self.options.as_ref()
    }

    pub fn previewed(&self) -> Option<&SearchResult> {
        self.previewed.as_ref()
    }

    /// Runs the search for the current input at `page`.
    pub async fn search(&mut self, page: u32) -> Result<usize, ClientError> {
        let query = self.input.trim().to_string();
        if query.is_empty() {
            self.notifier
                .notify("Please enter search keywords", NotificationKind::Warning)
                .await;
            return Err(ValidationError::EmptyQuery.into());
        }

        let per_page = self.filters.per_page.max(1);
        let request = SearchRequest {
            query: query.clone(),
            page: page.max(1),
            per_page,
            orientation: self.filters.orientation.clone(),
            size: self.filters.size.clone(),
            image_type: self.filters.image_type.clone(),
        };
        let response = match self.backend.search_images(&request).await {
            Ok(response) => response,
            Err(err) => return Err(self.search_failed(err.user_message(), err).await),
        };
        if let Some(failure) = response.failure() {
            let err = ClientError::Api(ApiError::new(failure.clone()));
            return Err(self.search_failed(failure, err).await);
        }

        self.query = query;
        self.page = request.page;
        self.total_results = response.total_results;
        self.total_pages = total_pages(response.total_results, per_page);
        self.results = response.results;
        self.selected.clear();
        info!(
            query = %self.query,
            page = self.page,
            total_pages = self.total_pages,
            results = self.results.len(),
            "search results loaded"
        );
        let _ = self.events.send(ClientEvent::SearchResultsRendered {
            page: self.page,
            total_pages: self.total_pages,
            count: self.results.len(),
        });
        self.notifier
            .notify(
                response
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| "Search complete".to_string()),
                NotificationKind::Success,
            )
            .await;
        Ok(self.results.len())
    }

    async fn search_failed(&self, message: String, err: ClientError) -> ClientError {
        warn!(error = %message, "search failed");
        self.notifier
            .notify(format!("Search failed: {message}"), NotificationKind::Error)
            .await;
        err
    }

    /// Re-runs the last successful query at `page`; a no-op without one.
    pub async fn load_page(&mut self, page: u32) -> Result<usize, ClientError> {
        if self.query.is_empty() {
            return Ok(0);
        }
        self.input = self.query.clone();
        self.search(page).await
    }

    pub async fn next_page(&mut self) -> Result<usize, ClientError> {
        if self.page >= self.total_pages {
            return Ok(0);
        }
        self.load_page(self.page + 1).await
    }

    pub async fn prev_page(&mut self) -> Result<usize, ClientError> {
        if self.page <= 1 {
            return Ok(0);
        }
        self.load_page(self.page - 1).await
    }

    pub async fn quick_search(&mut self, query: &str) -> Result<usize, ClientError> {
        self.input = query.to_string();
        self.search(1).await
    }

    pub fn pagination(&self) -> PaginationState {
        PaginationState {
            page: self.page,
            total_pages: self.total_pages,
            prev_enabled: self.page > 1,
            next_enabled: self.page < self.total_pages,
            visible: self.total_pages > 1,
            label: format!("Page {} of {}", self.page, self.total_pages),
        }
    }

    /// Flips selection of `id`; returns whether it is now selected.
    pub fn toggle_selection(&mut self, id: &SearchImageId) -> bool {
        if !self.results.iter().any(|result| &result.id == id) {
            return false;
        }
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        }
    }

    pub fn is_selected(&self, id: &SearchImageId) -> bool {
        self.selected.contains(id)
    }

    pub fn selection_label(&self) -> String {
        format!("{} selected", self.selected.len())
    }

    pub fn can_download_selected(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn reset_selection(&mut self) {
        self.selected.clear();
    }

    /// Asks the backend to fetch the original, then saves its copy locally.
    async fn download_result(&self, result: &SearchResult) -> Result<PathBuf, ClientError> {
        let response = self.backend.download_image(result.source_url()).await?;
        if let Some(failure) = response.failure() {
            return Err(ApiError::new(failure).into());
        }
        let url = response
            .download_url
            .ok_or(ClientError::Missing("download url"))?;
        let filename = response
            .filename
            .unwrap_or_else(|| format!("{}.jpg", result.id));
        save_asset(self.backend.as_ref(), &self.download_dir, &url, &filename).await
    }

    pub async fn download_single(&self, id: &SearchImageId) -> Result<PathBuf, ClientError> {
        let Some(result) = self.results.iter().find(|result| &result.id == id) else {
            self.notifier
                .notify("Image details not found", NotificationKind::Error)
                .await;
            return Err(ClientError::Missing("search result"));
        };
        match self.download_result(result).await {
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.notifier
                    .notify(format!("Downloaded {name}"), NotificationKind::Success)
                    .await;
                Ok(path)
            }
            Err(err) => {
                warn!(id = %id, error = %err, "search download failed");
                self.notifier
                    .notify(
                        format!("Download failed: {}", err.user_message()),
                        NotificationKind::Error,
                    )
                    .await;
                Err(err)
            }
        }
    }

    /// Downloads the selection one at a time, then clears it.
    pub async fn download_selected(&mut self) -> DownloadTally {
        let mut tally = DownloadTally::default();
        if self.selected.is_empty() {
            self.notifier
                .notify(
                    "Select images to download first",
                    NotificationKind::Warning,
                )
                .await;
            return tally;
        }

        let chosen: Vec<SearchResult> = self
            .results
            .iter()
            .filter(|result| self.selected.contains(&result.id))
            .cloned()
            .collect();
        for result in &chosen {
            let outcome = self.download_result(result).await;
            if let Err(err) = &outcome {
                warn!(id = %result.id, error = %err, "search download failed");
            }
            let succeeded = outcome.is_ok();
            tally.record(&outcome);
            if succeeded {
                tokio::time::sleep(DOWNLOAD_GAP).await;
            }
        }

        if tally.succeeded > 0 {
            let mut message = format!("Downloaded {} image(s)", tally.succeeded);
            if tally.failed > 0 {
                message.push_str(&format!(", {} failed", tally.failed));
            }
            self.notifier.notify(message, NotificationKind::Success).await;
        } else {
            self.notifier
                .notify("All downloads failed", NotificationKind::Error)
                .await;
        }
        self.selected.clear();
        tally
    }

    pub fn preview(&mut self, id: &SearchImageId, modals: &mut ModalController) -> bool {
        let Some(result) = self.results.iter().find(|result| &result.id == id).cloned() else {
            return false;
        };
        if !modals.open(ModalId::ImagePreview) {
            return false;
        }
        self.previewed = Some(result);
        true
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.page = 1;
        self.total_pages = 1;
        self.total_results = 0;
        self.results.clear();
        self.selected.clear();
        self.previewed = None;
    }

    /// Loads the filter choices. Failures keep the built-in defaults.
    pub async fn load_options(&mut self) -> bool {
        match self.backend.search_options().await {
            Ok(response) if response.success => match response.options {
                Some(options) => {
                    self.options = Some(options);
                    true
                }
                None => false,
            },
            Ok(response) => {
                warn!(error = ?response.error, "search options rejected");
                false
            }
            Err(err) => {
                warn!(error = %err, "failed to load search options");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
