//! Per-model parameter tables and local request validation.

use shared::domain::{
    AspectRatio, ImageModel, ImageQuality, ImageSize, ImageStyle, PersonGeneration, VideoModel,
};
use tracing::debug;

use crate::{error::ValidationError, prompt::MAX_PROMPT_CHARS};

pub const MIN_IMAGE_COUNT: u8 = 1;
pub const MAX_IMAGE_COUNT: u8 = 10;

const SQUARE: ImageSize = ImageSize::new(1024, 1024);
const TALL: ImageSize = ImageSize::new(1024, 1792);
const WIDE: ImageSize = ImageSize::new(1792, 1024);
const FOUR_THREE: ImageSize = ImageSize::new(1152, 896);
const THREE_FOUR: ImageSize = ImageSize::new(896, 1152);

/// What a model offers in the form and what it accepts on submit.
///
/// `accepted_*` may be wider than `offered_*`: a value carried over from a
/// previous model can still be valid without being listed.
#[derive(Debug, Clone, Copy)]
pub struct ImageModelOptions {
    pub counts: &'static [u8],
    pub default_count: u8,
    pub offered_sizes: &'static [ImageSize],
    pub accepted_sizes: &'static [ImageSize],
    pub qualities: &'static [ImageQuality],
    pub supports_style: bool,
}

pub fn image_options(model: ImageModel) -> ImageModelOptions {
    match model {
        ImageModel::DallE3 => ImageModelOptions {
            counts: &[1],
            default_count: 1,
            offered_sizes: &[SQUARE, TALL, WIDE],
            accepted_sizes: &[SQUARE, TALL, WIDE],
            qualities: &[ImageQuality::Standard, ImageQuality::Hd],
            supports_style: true,
        },
        ImageModel::Imagen => ImageModelOptions {
            counts: &[1, 2, 3, 4],
            default_count: 4,
            offered_sizes: &[SQUARE, FOUR_THREE, THREE_FOUR],
            accepted_sizes: &[SQUARE, FOUR_THREE, THREE_FOUR, WIDE, TALL],
            qualities: &[ImageQuality::Standard, ImageQuality::High, ImageQuality::Ultra],
            supports_style: false,
        },
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VideoModelOptions {
    pub offered_durations: &'static [u8],
    pub accepted_durations: &'static [u8],
    pub default_duration: u8,
}

pub fn video_options(model: VideoModel) -> VideoModelOptions {
    match model {
        VideoModel::Veo => VideoModelOptions {
            offered_durations: &[5, 6, 7, 8],
            accepted_durations: &[5, 6, 7, 8],
            default_duration: 5,
        },
        VideoModel::OpenAi => VideoModelOptions {
            offered_durations: &[3, 4, 5, 6, 7, 8, 9, 10],
            accepted_durations: &[5, 6, 7, 8],
            default_duration: 5,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageParams {
    pub model: ImageModel,
    pub count: u8,
    pub quality: ImageQuality,
    pub size: ImageSize,
    pub style: ImageStyle,
}

impl ImageParams {
    pub fn for_model(model: ImageModel) -> Self {
        let options = image_options(model);
        Self {
            model,
            count: options.default_count,
            quality: ImageQuality::Standard,
            size: SQUARE,
            style: ImageStyle::Vivid,
        }
    }

    /// Changes the model, keeping the current size and quality when the new
    /// model still offers them. The count always resets to the model default.
    pub fn switch_model(&mut self, model: ImageModel) {
        let options = image_options(model);
        self.model = model;
        self.count = options.default_count;
        if !options.offered_sizes.contains(&self.size) {
            self.size = SQUARE;
        }
        if !options.qualities.contains(&self.quality) {
            self.quality = ImageQuality::Standard;
        }
        debug!(model = %model, size = %self.size, quality = %self.quality, "image model switched");
    }
}

impl Default for ImageParams {
    fn default() -> Self {
        Self::for_model(ImageModel::DallE3)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoParams {
    pub model: VideoModel,
    pub aspect_ratio: AspectRatio,
    pub duration: u8,
    pub person_generation: PersonGeneration,
}

impl VideoParams {
    pub fn for_model(model: VideoModel) -> Self {
        Self {
            model,
            aspect_ratio: AspectRatio::Landscape,
            duration: video_options(model).default_duration,
            person_generation: PersonGeneration::AllowAdult,
        }
    }

    pub fn switch_model(&mut self, model: VideoModel) {
        let options = video_options(model);
        self.model = model;
        if !options.offered_durations.contains(&self.duration) {
            self.duration = options.default_duration;
        }
        debug!(model = %model, duration = self.duration, "video model switched");
    }
}

impl Default for VideoParams {
    fn default() -> Self {
        Self::for_model(VideoModel::Veo)
    }
}

pub fn validate_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.trim().is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }
    let actual = prompt.chars().count();
    if actual > MAX_PROMPT_CHARS {
        return Err(ValidationError::PromptTooLong {
            max: MAX_PROMPT_CHARS,
            actual,
        });
    }
    Ok(())
}

pub fn validate_image(prompt: &str, params: &ImageParams) -> Result<(), ValidationError> {
    validate_prompt(prompt)?;
    if !(MIN_IMAGE_COUNT..=MAX_IMAGE_COUNT).contains(&params.count) {
        return Err(ValidationError::CountOutOfRange {
            count: params.count,
            min: MIN_IMAGE_COUNT,
            max: MAX_IMAGE_COUNT,
        });
    }

    let options = image_options(params.model);
    if !options.counts.contains(&params.count) {
        return Err(ValidationError::not_allowed(
            "count",
            params.model,
            params.count,
            options.counts,
        ));
    }
    if !options.qualities.contains(&params.quality) {
        return Err(ValidationError::not_allowed(
            "quality",
            params.model,
            params.quality,
            options.qualities,
        ));
    }
    if !options.accepted_sizes.contains(&params.size) {
        return Err(ValidationError::not_allowed(
            "size",
            params.model,
            params.size,
            options.accepted_sizes,
        ));
    }
    Ok(())
}

pub fn validate_video(prompt: &str, params: &VideoParams) -> Result<(), ValidationError> {
    validate_prompt(prompt)?;
    let options = video_options(params.model);
    if !options.accepted_durations.contains(&params.duration) {
        return Err(ValidationError::not_allowed(
            "duration",
            params.model,
            params.duration,
            options.accepted_durations,
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
