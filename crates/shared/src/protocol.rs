use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{
    AspectRatio, ContentType, GenerationStatus, ImageModel, ImageQuality, ImageSize, ImageStyle,
    PersonGeneration, SearchImageId, VideoModel,
};

/// Every backend response carries `{success, ...}` or `{error}`.
pub trait ApiEnvelope {
    fn success(&self) -> bool;
    fn error(&self) -> Option<&str>;

    /// `None` when the response is a success; otherwise the text to surface.
    fn failure(&self) -> Option<String> {
        if let Some(error) = self.error().filter(|error| !error.trim().is_empty()) {
            return Some(error.to_string());
        }
        if self.success() {
            None
        } else {
            Some("request failed".to_string())
        }
    }
}

macro_rules! envelope {
    ($($name:ident),+ $(,)?) => {
        $(
            impl ApiEnvelope for $name {
                fn success(&self) -> bool {
                    self.success
                }

                fn error(&self) -> Option<&str> {
                    self.error.as_deref()
                }
            }
        )+
    };
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
        Null,
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid count: {text}"))),
        Raw::Null => Ok(0),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub prompt: String,
    pub content_type: ContentType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub optimizations: Vec<String>,
    #[serde(default)]
    pub style_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub model: ImageModel,
    pub count: u8,
    pub quality: ImageQuality,
    pub size: ImageSize,
    pub style: ImageStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub url: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default)]
    pub file_size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub images: Vec<ImageAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoGenerationRequest {
    pub prompt: String,
    pub model: VideoModel,
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: AspectRatio,
    pub duration: u8,
    #[serde(rename = "personGeneration")]
    pub person_generation: PersonGeneration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAsset {
    pub url: String,
    pub filename: String,
    #[serde(
        rename = "aspectRatio",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default)]
    pub file_size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoGenerationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub videos: Vec<VideoAsset>,
    #[serde(default)]
    pub troubleshooting: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub per_page: u32,
    pub orientation: String,
    pub size: String,
    #[serde(rename = "type")]
    pub image_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: SearchImageId,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl SearchResult {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .or_else(|| self.description.as_deref().filter(|d| !d.is_empty()))
            .unwrap_or("Untitled")
    }

    pub fn source_url(&self) -> &str {
        self.download_url.as_deref().unwrap_or(&self.url)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_results: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOption {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub sizes: Vec<SearchOption>,
    #[serde(default)]
    pub types: Vec<SearchOption>,
    #[serde(default)]
    pub orientations: Vec<SearchOption>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOptionsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SearchOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStatistics {
    #[serde(default)]
    pub total_generations: u64,
    #[serde(default)]
    pub image_generations: u64,
    #[serde(default)]
    pub video_generations: u64,
    #[serde(default)]
    pub today_generations: u64,
    #[serde(default)]
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<GenerationStatistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default)]
    pub prompt: String,
    pub status: GenerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentGenerationsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub generations: Vec<GenerationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

envelope!(
    TranslateResponse,
    OptimizeResponse,
    ImageGenerationResponse,
    VideoGenerationResponse,
    SearchResponse,
    DownloadResponse,
    SearchOptionsResponse,
    StatisticsResponse,
    RecentGenerationsResponse,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_success_or_error_is_a_failure() {
        let ok: ImageGenerationResponse =
            serde_json::from_str(r#"{"success":true,"images":[]}"#).unwrap();
        assert_eq!(ok.failure(), None);

        let rejected: ImageGenerationResponse =
            serde_json::from_str(r#"{"success":false,"error":"policy violation"}"#).unwrap();
        assert_eq!(rejected.failure().as_deref(), Some("policy violation"));

        let error_only: TranslateResponse =
            serde_json::from_str(r#"{"error":"translation unavailable"}"#).unwrap();
        assert_eq!(error_only.failure().as_deref(), Some("translation unavailable"));

        let bare: TranslateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.failure().as_deref(), Some("request failed"));
    }

    #[test]
    fn video_request_uses_camel_case_fields() {
        let request = VideoGenerationRequest {
            prompt: "waves".into(),
            model: VideoModel::Veo,
            aspect_ratio: AspectRatio::Portrait,
            duration: 6,
            person_generation: PersonGeneration::AllowAdult,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["aspectRatio"], "9:16");
        assert_eq!(value["personGeneration"], "allow_adult");
        assert_eq!(value["model"], "veo");
    }

    #[test]
    fn search_total_accepts_string_counts() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"success":true,"total_results":"1250","results":[{"id":"a","url":"https://x/a.jpg"}]}"#,
        )
        .unwrap();
        assert_eq!(response.total_results, 1250);
        assert_eq!(response.results[0].display_title(), "Untitled");
        assert_eq!(response.results[0].source_url(), "https://x/a.jpg");
    }

    #[test]
    fn image_request_serializes_wire_names() {
        let request = ImageGenerationRequest {
            prompt: "a fox".into(),
            model: ImageModel::DallE3,
            count: 1,
            quality: ImageQuality::Hd,
            size: ImageSize::new(1024, 1792),
            style: ImageStyle::Natural,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "dall-e-3");
        assert_eq!(value["size"], "1024x1792");
        assert_eq!(value["quality"], "hd");
    }
}
