//! Deterministic template-based design generation.
//!
//! Stands behind the opaque generation seam: prompt in, well-formed document
//! out. Layout derives from the platform spec dimensions; colors and fonts
//! come from the brand rules when present.

use async_trait::async_trait;

use studio_core::{
    current_timestamp_ms, spec_for, Background, DesignId, Document, Element, ElementKind,
    FontWeight, Placement, TextAlign,
};
use studio_session::{BrandRules, DesignGenerator, GenerateError, GenerateRequest};

/// Maximum accepted prompt length in characters.
pub const MAX_PROMPT_LEN: usize = 1000;

/// Maximum characters of the prompt carried into the headline.
const HEADLINE_LEN: usize = 60;

/// Template-driven generator producing a headline-and-accent layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    /// Create a generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DesignGenerator for TemplateGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<Document, GenerateError> {
        if request.prompt.is_empty() || request.prompt.chars().count() > MAX_PROMPT_LEN {
            return Err(GenerateError::InvalidPrompt(format!(
                "prompt must be 1-{MAX_PROMPT_LEN} characters"
            )));
        }
        let spec = spec_for(request.platform, request.format).ok_or_else(|| {
            GenerateError::UnsupportedPlacement(format!(
                "{} does not offer the {} format",
                request.platform, request.format
            ))
        })?;

        let brand: BrandRules = request.brand_rules.clone().unwrap_or_default();
        let background = brand
            .colors
            .first()
            .cloned()
            .unwrap_or_else(|| "#ffffff".to_string());
        let accent = brand
            .colors
            .get(1)
            .cloned()
            .unwrap_or_else(|| "#0066cc".to_string());
        let text_fill = contrasting_text_color(&background);
        let font_family = brand
            .fonts
            .first()
            .cloned()
            .unwrap_or_else(|| "Arial".to_string());

        let width = spec.width;
        let height = spec.height;
        let headline = headline_from_prompt(&request.prompt);

        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (width as f32, height as f32);
        let margin = w * 0.08;
        let headline_size = (w * 0.055).max(24.0);

        let elements = vec![
            Element::new(ElementKind::Text {
                content: headline,
                font_family,
                font_size: headline_size,
                font_weight: FontWeight::Bold,
                align: TextAlign::Center,
                fill: text_fill,
            })
            .with_name("headline")
            .with_placement(Placement::at(
                margin,
                h * 0.28,
                w - margin * 2.0,
                headline_size * 1.4,
            )),
            Element::new(ElementKind::Rectangle {
                fill: accent,
                corner_radius: 4.0,
            })
            .with_name("accent-bar")
            .with_placement(Placement::at(w * 0.35, h * 0.28 + headline_size * 1.8, w * 0.3, 8.0)),
        ];

        tracing::info!(
            platform = %request.platform,
            format = %request.format,
            "generated template design"
        );

        Ok(Document {
            id: DesignId::new(),
            canvas_width: width,
            canvas_height: height,
            background: Background::Color(background),
            elements,
            version: 1,
            updated_at: current_timestamp_ms(),
        })
    }
}

/// Trim the prompt into a headline.
fn headline_from_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.chars().count() <= HEADLINE_LEN {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(HEADLINE_LEN - 1).collect();
    format!("{}…", cut.trim_end())
}

/// Black on light backgrounds, white on dark ones.
fn contrasting_text_color(background_hex: &str) -> String {
    let luminance = parse_hex(background_hex).map_or(1.0, |[r, g, b]| {
        (0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)) / 255.0
    });
    if luminance > 0.5 {
        "#000000".to_string()
    } else {
        "#ffffff".to_string()
    }
}

/// Parse a `#rrggbb` color.
fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}
