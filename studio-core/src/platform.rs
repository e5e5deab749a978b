//! Target platform specifications for ad creatives.

use serde::{Deserialize, Serialize};

/// Advertising platform a creative targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Meta (Facebook/Instagram) placements.
    Meta,
    /// Google display placements.
    Google,
    /// LinkedIn placements.
    LinkedIn,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Meta => "meta",
            Self::Google => "google",
            Self::LinkedIn => "linkedin",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "meta" => Ok(Self::Meta),
            "google" => Ok(Self::Google),
            "linkedin" => Ok(Self::LinkedIn),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Canvas aspect format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasFormat {
    /// 1:1 square.
    Square,
    /// Wide landscape.
    Landscape,
    /// Tall portrait.
    Portrait,
    /// Full-screen vertical story.
    Story,
}

impl std::fmt::Display for CanvasFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Square => "square",
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Story => "story",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for CanvasFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "landscape" => Ok(Self::Landscape),
            "portrait" => Ok(Self::Portrait),
            "story" => Ok(Self::Story),
            other => Err(format!("unknown canvas format: {other}")),
        }
    }
}

/// Placement requirements a platform imposes on a creative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    /// Required canvas width in pixels.
    pub width: u32,
    /// Required canvas height in pixels.
    pub height: u32,
    /// Minimum ratio of canvas area that should carry text, if the platform
    /// cares.
    pub min_text_ratio: Option<f32>,
    /// Maximum exported file size in bytes, if the platform caps it.
    pub max_file_size: Option<u64>,
}

impl PlatformSpec {
    const fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            min_text_ratio: None,
            max_file_size: None,
        }
    }

    const fn with_text_ratio(mut self, ratio: f32) -> Self {
        self.min_text_ratio = Some(ratio);
        self
    }

    const fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }
}

/// Look up the placement spec for a platform/format combination.
///
/// Returns `None` for combinations the platform does not offer (story and
/// portrait exist only on Meta).
#[must_use]
pub fn spec_for(platform: Platform, format: CanvasFormat) -> Option<PlatformSpec> {
    match (platform, format) {
        (Platform::Meta, CanvasFormat::Square) => {
            Some(PlatformSpec::sized(1080, 1080).with_text_ratio(0.2))
        }
        (Platform::Meta, CanvasFormat::Landscape) => {
            Some(PlatformSpec::sized(1200, 628).with_text_ratio(0.2))
        }
        (Platform::Meta, CanvasFormat::Portrait) => {
            Some(PlatformSpec::sized(1080, 1350).with_text_ratio(0.2))
        }
        (Platform::Meta, CanvasFormat::Story) => {
            Some(PlatformSpec::sized(1080, 1920).with_text_ratio(0.2))
        }
        (Platform::Google, CanvasFormat::Square) => {
            Some(PlatformSpec::sized(1200, 1200).with_max_file_size(150_000))
        }
        (Platform::Google, CanvasFormat::Landscape) => {
            Some(PlatformSpec::sized(1200, 628).with_max_file_size(150_000))
        }
        (Platform::LinkedIn, CanvasFormat::Square) => Some(PlatformSpec::sized(1200, 1200)),
        (Platform::LinkedIn, CanvasFormat::Landscape) => Some(PlatformSpec::sized(1200, 627)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_offers_all_formats() {
        for format in [
            CanvasFormat::Square,
            CanvasFormat::Landscape,
            CanvasFormat::Portrait,
            CanvasFormat::Story,
        ] {
            assert!(spec_for(Platform::Meta, format).is_some());
        }
    }

    #[test]
    fn test_story_is_meta_only() {
        assert!(spec_for(Platform::Google, CanvasFormat::Story).is_none());
        assert!(spec_for(Platform::LinkedIn, CanvasFormat::Story).is_none());
    }

    #[test]
    fn test_known_dimensions() {
        let spec = spec_for(Platform::Meta, CanvasFormat::Story).expect("spec");
        assert_eq!((spec.width, spec.height), (1080, 1920));

        let spec = spec_for(Platform::LinkedIn, CanvasFormat::Landscape).expect("spec");
        assert_eq!((spec.width, spec.height), (1200, 627));
    }

    #[test]
    fn test_google_caps_file_size() {
        let spec = spec_for(Platform::Google, CanvasFormat::Square).expect("spec");
        assert_eq!(spec.max_file_size, Some(150_000));
        assert!(spec.min_text_ratio.is_none());
    }

    #[test]
    fn test_parse_round_trip() {
        for platform in [Platform::Meta, Platform::Google, Platform::LinkedIn] {
            let parsed: Platform = platform.to_string().parse().expect("parse");
            assert_eq!(parsed, platform);
        }
        assert!("tiktok".parse::<Platform>().is_err());
    }
}
