//! The two generation targets. Everything that differs between image and
//! video generation lives behind [`MediaKind`]; the shared flow is in
//! [`crate::studio`].

use std::time::Duration;

use async_trait::async_trait;
use shared::{
    domain::{ContentType, ImageSize},
    protocol::{
        ApiEnvelope, ImageAsset, ImageGenerationRequest, VideoAsset, VideoGenerationRequest,
    },
};

use crate::{
    backend::BackendApi,
    error::{ClientError, ValidationError},
    format::{format_duration, format_file_size},
    modal::ModalId,
    progress::{ProgressProfile, IMAGE_PROGRESS, VIDEO_PROGRESS},
    validation::{validate_image, validate_video, ImageParams, VideoParams},
};

/// A rendered result card.
pub trait GeneratedAsset: Clone + Send + Sync + 'static {
    fn url(&self) -> &str;
    fn filename(&self) -> &str;
    fn file_size(&self) -> u64;
    /// One-line caption shown under the asset.
    fn caption(&self) -> String;
    /// Pixel size, when the preview header should show it.
    fn dimensions(&self) -> Option<ImageSize> {
        None
    }
}

impl GeneratedAsset for ImageAsset {
    fn url(&self) -> &str {
        &self.url
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn file_size(&self) -> u64 {
        self.file_size
    }

    fn caption(&self) -> String {
        format!(
            "{} | size: {} | quality: {} | {}",
            self.filename,
            self.size.as_deref().unwrap_or("unknown"),
            self.quality.as_deref().unwrap_or("standard"),
            format_file_size(self.file_size),
        )
    }

    fn dimensions(&self) -> Option<ImageSize> {
        self.size.as_deref()?.parse().ok()
    }
}

impl GeneratedAsset for VideoAsset {
    fn url(&self) -> &str {
        &self.url
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn file_size(&self) -> u64 {
        self.file_size
    }

    fn caption(&self) -> String {
        let length = self
            .duration
            .map(|seconds| format_duration(u64::from(seconds)))
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "{} | ratio: {} | length: {} | {}",
            self.filename,
            self.aspect_ratio.as_deref().unwrap_or("16:9"),
            length,
            format_file_size(self.file_size),
        )
    }
}

/// Normalized generation response.
#[derive(Debug, Clone)]
pub struct GenerationReply<A> {
    pub assets: Vec<A>,
    pub total_count: usize,
    pub timestamp: Option<String>,
    pub failure: Option<String>,
    pub troubleshooting: Vec<String>,
    pub cloud_uri: Option<String>,
}

#[async_trait]
pub trait MediaKind: Default + Send + Sync + 'static {
    const CONTENT: ContentType;
    const PREVIEW_MODAL: ModalId;
    const PROGRESS: ProgressProfile;
    const DOWNLOAD_STAGGER: Duration;
    const LOADING_MESSAGE: &'static str;

    type Params: Clone + Default + Send + Sync;
    type Asset: GeneratedAsset;

    fn validate(prompt: &str, params: &Self::Params) -> Result<(), ValidationError>;

    fn success_message(count: usize) -> String;

    async fn generate(
        &self,
        backend: &dyn BackendApi,
        prompt: &str,
        params: &Self::Params,
    ) -> Result<GenerationReply<Self::Asset>, ClientError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageKind;

#[async_trait]
impl MediaKind for ImageKind {
    const CONTENT: ContentType = ContentType::Image;
    const PREVIEW_MODAL: ModalId = ModalId::ImagePreview;
    const PROGRESS: ProgressProfile = IMAGE_PROGRESS;
    const DOWNLOAD_STAGGER: Duration = Duration::from_millis(500);
    const LOADING_MESSAGE: &'static str = "Generating images...";

    type Params = ImageParams;
    type Asset = ImageAsset;

    fn validate(prompt: &str, params: &ImageParams) -> Result<(), ValidationError> {
        validate_image(prompt, params)
    }

    fn success_message(count: usize) -> String {
        format!("Generated {count} image(s)")
    }

    async fn generate(
        &self,
        backend: &dyn BackendApi,
        prompt: &str,
        params: &ImageParams,
    ) -> Result<GenerationReply<ImageAsset>, ClientError> {
        let request = ImageGenerationRequest {
            prompt: prompt.to_string(),
            model: params.model,
            count: params.count,
            quality: params.quality,
            size: params.size,
            style: params.style,
        };
        let response = backend.generate_images(&request).await?;
        let failure = response.failure();
        let total_count = response
            .total_count
            .map(|count| count as usize)
            .unwrap_or(response.images.len());
        Ok(GenerationReply {
            assets: response.images,
            total_count,
            timestamp: response.timestamp,
            failure,
            troubleshooting: Vec::new(),
            cloud_uri: None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VideoKind;

#[async_trait]
impl MediaKind for VideoKind {
    const CONTENT: ContentType = ContentType::Video;
    const PREVIEW_MODAL: ModalId = ModalId::VideoPreview;
    const PROGRESS: ProgressProfile = VIDEO_PROGRESS;
    const DOWNLOAD_STAGGER: Duration = Duration::from_millis(1000);
    const LOADING_MESSAGE: &'static str = "Generating video, this can take 2-3 minutes...";

    type Params = VideoParams;
    type Asset = VideoAsset;

    fn validate(prompt: &str, params: &VideoParams) -> Result<(), ValidationError> {
        validate_video(prompt, params)
    }

    fn success_message(_count: usize) -> String {
        "Video generated".to_string()
    }

    async fn generate(
        &self,
        backend: &dyn BackendApi,
        prompt: &str,
        params: &VideoParams,
    ) -> Result<GenerationReply<VideoAsset>, ClientError> {
        let request = VideoGenerationRequest {
            prompt: prompt.to_string(),
            model: params.model,
            aspect_ratio: params.aspect_ratio,
            duration: params.duration,
            person_generation: params.person_generation,
        };
        let response = backend.generate_videos(&request).await?;
        let failure = response.failure();
        Ok(GenerationReply {
            total_count: response.videos.len(),
            assets: response.videos,
            timestamp: response.timestamp,
            failure,
            troubleshooting: response.troubleshooting,
            cloud_uri: response.cloud_uri,
        })
    }
}
