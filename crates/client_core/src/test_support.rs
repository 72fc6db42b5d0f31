//! In-process backend double for orchestrator tests.

use std::sync::Mutex;

use async_trait::async_trait;
use shared::{
    domain::ContentType,
    error::ApiError,
    protocol::{
        DownloadResponse, ImageGenerationRequest, ImageGenerationResponse, OptimizeResponse,
        RecentGenerationsResponse, SearchOptionsResponse, SearchRequest, SearchResponse,
        StatisticsResponse, TranslateResponse, VideoGenerationRequest, VideoGenerationResponse,
    },
};

use crate::{backend::BackendApi, error::ClientError};

/// Replies are configured per endpoint; `None` makes the call fail with an
/// API error. Every call is recorded by name.
#[derive(Default)]
pub(crate) struct FakeBackend {
    pub calls: Mutex<Vec<&'static str>>,
    pub translate: Mutex<Option<TranslateResponse>>,
    pub optimize: Mutex<Option<OptimizeResponse>>,
    pub images: Mutex<Option<ImageGenerationResponse>>,
    pub videos: Mutex<Option<VideoGenerationResponse>>,
    pub search: Mutex<Option<SearchResponse>>,
    pub download: Mutex<Option<DownloadResponse>>,
    pub options: Mutex<Option<SearchOptionsResponse>>,
    pub statistics: Mutex<Option<StatisticsResponse>>,
    pub records: Mutex<Option<RecentGenerationsResponse>>,
    pub image_requests: Mutex<Vec<ImageGenerationRequest>>,
    pub video_requests: Mutex<Vec<VideoGenerationRequest>>,
    pub search_requests: Mutex<Vec<SearchRequest>>,
    pub fetched: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|call| **call == name).count()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    fn reply<T: Clone>(slot: &Mutex<Option<T>>, name: &str) -> Result<T, ClientError> {
        slot.lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::new(format!("{name} unavailable")).into())
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn translate_prompt(
        &self,
        _content: ContentType,
        _prompt: &str,
    ) -> Result<TranslateResponse, ClientError> {
        self.record("translate");
        Self::reply(&self.translate, "translate")
    }

    async fn optimize_prompt(
        &self,
        _content: ContentType,
        _prompt: &str,
    ) -> Result<OptimizeResponse, ClientError> {
        self.record("optimize");
        Self::reply(&self.optimize, "optimize")
    }

    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ClientError> {
        self.record("generate_images");
        self.image_requests.lock().unwrap().push(request.clone());
        Self::reply(&self.images, "image generation")
    }

    async fn generate_videos(
        &self,
        request: &VideoGenerationRequest,
    ) -> Result<VideoGenerationResponse, ClientError> {
        self.record("generate_videos");
        self.video_requests.lock().unwrap().push(request.clone());
        Self::reply(&self.videos, "video generation")
    }

    async fn search_images(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
        self.record("search");
        self.search_requests.lock().unwrap().push(request.clone());
        Self::reply(&self.search, "search")
    }

    async fn download_image(&self, _image_url: &str) -> Result<DownloadResponse, ClientError> {
        self.record("download");
        Self::reply(&self.download, "download")
    }

    async fn search_options(&self) -> Result<SearchOptionsResponse, ClientError> {
        self.record("search_options");
        Self::reply(&self.options, "search options")
    }

    async fn admin_statistics(&self) -> Result<StatisticsResponse, ClientError> {
        self.record("statistics");
        Self::reply(&self.statistics, "statistics")
    }

    async fn recent_generations(&self) -> Result<RecentGenerationsResponse, ClientError> {
        self.record("records");
        Self::reply(&self.records, "records")
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        self.record("fetch");
        self.fetched.lock().unwrap().push(url.to_string());
        if url.contains("broken") {
            return Err(ApiError::new("HTTP error! status: 404").into());
        }
        Ok(url.as_bytes().to_vec())
    }

    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else {
            format!("http://studio.test/{}", url.trim_start_matches('/'))
        }
    }
}
