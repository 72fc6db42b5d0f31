use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseDomainError;

macro_rules! wire_enum {
    ($name:ident, $field:literal { $($variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire $(, alias = $alias)*)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseDomainError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($wire $(| $alias)* => Ok($name::$variant),)+
                    _ => Err(ParseDomainError::new($field, value)),
                }
            }
        }
    };
}

wire_enum!(ContentType, "content type" {
    Image => "image",
    Video => "video",
});

wire_enum!(ImageModel, "image model" {
    DallE3 => "dall-e-3" | "openai",
    Imagen => "imagen",
});

wire_enum!(VideoModel, "video model" {
    Veo => "veo",
    OpenAi => "openai",
});

wire_enum!(ImageQuality, "quality" {
    Standard => "standard",
    Hd => "hd",
    High => "high",
    Ultra => "ultra",
});

wire_enum!(ImageStyle, "style" {
    Vivid => "vivid",
    Natural => "natural",
});

wire_enum!(AspectRatio, "aspect ratio" {
    Landscape => "16:9",
    Portrait => "9:16",
});

wire_enum!(PersonGeneration, "person generation" {
    AllowAdult => "allow_adult",
    DontAllow => "dont_allow",
});

impl ContentType {
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Image => "image",
            ContentType::Video => "video",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchImageId(pub String);

impl SearchImageId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pixel dimensions carried on the wire as `"<width>x<height>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn orientation_label(self) -> &'static str {
        let ratio = self.width as f64 / self.height.max(1) as f64;
        if ratio > 1.5 {
            "landscape"
        } else if ratio < 0.75 {
            "portrait"
        } else {
            "square"
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageSize {
    type Err = ParseDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (width, height) = value
            .trim()
            .split_once(['x', 'X', '×'])
            .ok_or_else(|| ParseDomainError::new("size", value))?;
        let width = width
            .trim()
            .parse()
            .map_err(|_| ParseDomainError::new("size", value))?;
        let height = height
            .trim()
            .parse()
            .map_err(|_| ParseDomainError::new("size", value))?;
        if width == 0 || height == 0 {
            return Err(ParseDomainError::new("size", value));
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for ImageSize {
    type Error = ParseDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ImageSize> for String {
    fn from(value: ImageSize) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_model_aliases() {
        assert_eq!("openai".parse::<ImageModel>().unwrap(), ImageModel::DallE3);
        assert_eq!(" DALL-E-3 ".parse::<ImageModel>().unwrap(), ImageModel::DallE3);
        assert_eq!("openai".parse::<VideoModel>().unwrap(), VideoModel::OpenAi);
        let err = "midjourney".parse::<ImageModel>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported image model: midjourney");
    }

    #[test]
    fn image_size_uses_wire_format() {
        let size: ImageSize = "1792x1024".parse().unwrap();
        assert_eq!(size, ImageSize::new(1792, 1024));
        assert_eq!(serde_json::to_string(&size).unwrap(), "\"1792x1024\"");
        assert_eq!(size.orientation_label(), "landscape");
        assert!("1024".parse::<ImageSize>().is_err());
        assert!("0x1024".parse::<ImageSize>().is_err());
    }

    #[test]
    fn unknown_generation_status_is_tolerated() {
        let status: GenerationStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, GenerationStatus::Unknown);
    }

    #[test]
    fn aspect_ratio_round_trips_through_serde() {
        let ratio: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(ratio, AspectRatio::Portrait);
        assert_eq!(ratio.to_string(), "9:16");
    }
}
