//! Design elements - the visual primitives that make up a document.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left-aligned text.
    #[default]
    Left,
    /// Centered text.
    Center,
    /// Right-aligned text.
    Right,
}

/// Font weight for text elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Normal weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector image.
    Svg,
    /// WebP image.
    WebP,
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementKind {
    /// A text block.
    Text {
        /// Text content.
        content: String,
        /// Font family name.
        font_family: String,
        /// Font size in pixels.
        font_size: f32,
        /// Font weight.
        font_weight: FontWeight,
        /// Horizontal alignment.
        align: TextAlign,
        /// Fill color as hex.
        fill: String,
    },

    /// A rectangle shape.
    Rectangle {
        /// Fill color as hex.
        fill: String,
        /// Corner radius in pixels.
        corner_radius: f32,
    },

    /// A circle shape, inscribed in the element bounds.
    Circle {
        /// Fill color as hex.
        fill: String,
    },

    /// A raster or vector image.
    Image {
        /// Image source URI or data URI.
        src: String,
        /// Image format.
        format: ImageFormat,
    },

    /// A container group for other elements.
    Group {
        /// Child element IDs.
        children: Vec<ElementId>,
    },
}

impl ElementKind {
    /// Create a text kind with default typography.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            font_family: "Arial".to_string(),
            font_size: 24.0,
            font_weight: FontWeight::Normal,
            align: TextAlign::Left,
            fill: "#000000".to_string(),
        }
    }

    /// Create a rectangle kind with square corners.
    #[must_use]
    pub fn rectangle(fill: impl Into<String>) -> Self {
        Self::Rectangle {
            fill: fill.into(),
            corner_radius: 0.0,
        }
    }
}

/// Position, size, rotation, and opacity of an element on the canvas.
///
/// Rotation is stored in degrees and wraps into `[0, 360)`. Opacity is
/// clamped into `[0, 1]` - out-of-range values are normalized, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Rotation in degrees, `[0, 360)`.
    pub rotation: f32,
    /// Opacity, `[0, 1]`.
    pub opacity: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

impl Placement {
    /// Create a placement at the given position and size.
    #[must_use]
    pub fn at(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
        .normalized()
    }

    /// Return a copy with rotation wrapped and opacity clamped.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.rotation = wrap_degrees(self.rotation);
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self
    }

    /// Check that every numeric field is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.rotation.is_finite()
            && self.opacity.is_finite()
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
#[must_use]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs due to rounding
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// A design element with content and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Optional stable name, unique within a document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Element content.
    pub kind: ElementKind,
    /// Position, size, rotation, opacity.
    pub placement: Placement,
}

impl Element {
    /// Create a new element with the given kind and default placement.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            name: None,
            kind,
            placement: Placement::default(),
        }
    }

    /// Set the placement.
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement.normalized();
        self
    }

    /// Set the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check whether this element lies fully inside a canvas of the given size.
    #[must_use]
    pub fn within_bounds(&self, canvas_width: u32, canvas_height: u32) -> bool {
        let p = &self.placement;
        #[allow(clippy::cast_precision_loss)]
        {
            p.x >= 0.0
                && p.y >= 0.0
                && p.x + p.width <= canvas_width as f32
                && p.y + p.height <= canvas_height as f32
        }
    }
}

/// A partial update to an element.
///
/// Every field is optional; only present fields are applied. Kind-specific
/// fields that do not apply to the target element's variant are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    /// New X position.
    pub x: Option<f32>,
    /// New Y position.
    pub y: Option<f32>,
    /// New width.
    pub width: Option<f32>,
    /// New height.
    pub height: Option<f32>,
    /// New rotation in degrees (wrapped into `[0, 360)`).
    pub rotation: Option<f32>,
    /// New opacity (clamped into `[0, 1]`).
    pub opacity: Option<f32>,
    /// New element name.
    pub name: Option<String>,
    /// New text content (text elements).
    pub content: Option<String>,
    /// New font family (text elements).
    pub font_family: Option<String>,
    /// New font size (text elements).
    pub font_size: Option<f32>,
    /// New font weight (text elements).
    pub font_weight: Option<FontWeight>,
    /// New alignment (text elements).
    pub align: Option<TextAlign>,
    /// New fill color (text and shape elements).
    pub fill: Option<String>,
    /// New corner radius (rectangle elements).
    pub corner_radius: Option<f32>,
    /// New image source (image elements).
    pub src: Option<String>,
}

impl ElementPatch {
    /// A patch that moves an element.
    #[must_use]
    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// A patch that resizes an element.
    #[must_use]
    pub fn resized(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// A patch that changes opacity.
    #[must_use]
    pub fn opacity(value: f32) -> Self {
        Self {
            opacity: Some(value),
            ..Self::default()
        }
    }

    /// Check that every present numeric field is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.x,
            self.y,
            self.width,
            self.height,
            self.rotation,
            self.opacity,
            self.font_size,
            self.corner_radius,
        ]
        .iter()
        .flatten()
        .all(|v| v.is_finite())
    }
}
