use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::ContentType,
    error::{ApiError, ErrorBody},
    protocol::{
        DownloadRequest, DownloadResponse, ImageGenerationRequest, ImageGenerationResponse,
        OptimizeRequest, OptimizeResponse, RecentGenerationsResponse, SearchOptionsResponse,
        SearchRequest, SearchResponse, StatisticsResponse, TranslateRequest, TranslateResponse,
        VideoGenerationRequest, VideoGenerationResponse,
    },
};
use tracing::{debug, warn};
use url::Url;

use crate::error::ClientError;

/// REST surface of the generation backend.
///
/// A response that decodes but reports `success: false` is returned as `Ok`;
/// callers inspect it through [`shared::protocol::ApiEnvelope`]. Non-2xx
/// statuses come back as [`ClientError::Api`].
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn translate_prompt(
        &self,
        content: ContentType,
        prompt: &str,
    ) -> Result<TranslateResponse, ClientError>;
    async fn optimize_prompt(
        &self,
        content: ContentType,
        prompt: &str,
    ) -> Result<OptimizeResponse, ClientError>;
    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ClientError>;
    async fn generate_videos(
        &self,
        request: &VideoGenerationRequest,
    ) -> Result<VideoGenerationResponse, ClientError>;
    async fn search_images(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError>;
    async fn download_image(&self, image_url: &str) -> Result<DownloadResponse, ClientError>;
    async fn search_options(&self) -> Result<SearchOptionsResponse, ClientError>;
    async fn admin_statistics(&self) -> Result<StatisticsResponse, ClientError>;
    async fn recent_generations(&self) -> Result<RecentGenerationsResponse, ClientError>;
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError>;
    /// Absolute form of a possibly server-relative asset URL.
    fn resolve_url(&self, url: &str) -> String;
}

pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST backend request");
        let response = self.http.post(url).json(body).send().await?;
        decode_response(path, response).await
    }

    async fn get_json<Resp>(&self, path: &str) -> Result<Resp, ClientError>
    where
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "GET backend request");
        let response = self.http.get(url).send().await?;
        decode_response(path, response).await
    }
}

async fn decode_response<Resp>(path: &str, response: reqwest::Response) -> Result<Resp, ClientError>
where
    Resp: DeserializeOwned,
{
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), body);
        warn!(path, status = status.as_u16(), error = %err, "backend request failed");
        return Err(err.into());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn content_path(content: ContentType, action: &str) -> String {
    format!("api/{}/{action}", content.as_str())
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn translate_prompt(
        &self,
        content: ContentType,
        prompt: &str,
    ) -> Result<TranslateResponse, ClientError> {
        self.post_json(
            &content_path(content, "translate-prompt"),
            &TranslateRequest {
                prompt: prompt.to_string(),
            },
        )
        .await
    }

    async fn optimize_prompt(
        &self,
        content: ContentType,
        prompt: &str,
    ) -> Result<OptimizeResponse, ClientError> {
        self.post_json(
            &content_path(content, "optimize-prompt"),
            &OptimizeRequest {
                prompt: prompt.to_string(),
                content_type: content,
            },
        )
        .await
    }

    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ClientError> {
        self.post_json("api/image/generate", request).await
    }

    async fn generate_videos(
        &self,
        request: &VideoGenerationRequest,
    ) -> Result<VideoGenerationResponse, ClientError> {
        self.post_json("api/video/generate", request).await
    }

    async fn search_images(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
        self.post_json("api/image/search", request).await
    }

    async fn download_image(&self, image_url: &str) -> Result<DownloadResponse, ClientError> {
        self.post_json(
            "api/image/download",
            &DownloadRequest {
                image_url: image_url.to_string(),
            },
        )
        .await
    }

    async fn search_options(&self) -> Result<SearchOptionsResponse, ClientError> {
        self.get_json("api/image/search-options").await
    }

    async fn admin_statistics(&self) -> Result<StatisticsResponse, ClientError> {
        self.get_json("api/admin/statistics").await
    }

    async fn recent_generations(&self) -> Result<RecentGenerationsResponse, ClientError> {
        self.get_json("api/admin/recent-generations").await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let url = Url::parse(&self.resolve_url(url))?;
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }

    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        let path = if url.starts_with('/') {
            url.to_string()
        } else {
            format!("/{url}")
        };
        match self.base_url.join(&path) {
            Ok(joined) => joined.to_string(),
            Err(_) => url.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
