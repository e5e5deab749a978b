//! The design document - the serializable unit of work.
//!
//! A [`Document`] is persistent data: every mutation takes `&self` and
//! returns a new value with `version` bumped by exactly one. Snapshots are
//! therefore cheap to keep, and no live view can alias a stale revision.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use crate::error::{DocumentError, DocumentResult};

/// Unique identifier for a design document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DesignId(Uuid);

impl DesignId {
    /// Create a new unique design ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a design ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for DesignId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DesignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canvas background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Background {
    /// Solid color as hex.
    Color(String),
    /// Reference to an image resource.
    Image(String),
}

impl Default for Background {
    fn default() -> Self {
        Self::Color("#ffffff".to_string())
    }
}

/// A design document: sized canvas, background, and an ordered element list.
///
/// Element order encodes z-order; later entries render on top. `version`
/// strictly increases by one per committed mutation and doubles as the
/// optimistic-concurrency token against the design store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, assigned at creation.
    pub id: DesignId,
    /// Canvas width in pixels, fixed per document.
    pub canvas_width: u32,
    /// Canvas height in pixels, fixed per document.
    pub canvas_height: u32,
    /// Canvas background.
    pub background: Background,
    /// Elements in z-order.
    pub elements: Vec<Element>,
    /// Mutation counter, starts at 1.
    pub version: u64,
    /// Timestamp of the last committed mutation (ms since epoch).
    pub updated_at: u64,
}

impl Document {
    /// Create a new blank document with the given canvas size.
    #[must_use]
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            id: DesignId::new(),
            canvas_width: canvas_width.max(1),
            canvas_height: canvas_height.max(1),
            background: Background::default(),
            elements: Vec::new(),
            version: 1,
            updated_at: current_timestamp_ms(),
        }
    }

    /// Look up an element by ID.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Check whether an element exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Number of elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate text elements.
    pub fn text_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|e| matches!(e.kind, ElementKind::Text { .. }))
    }

    /// Add an element on top of the stack.
    ///
    /// The element's placement is normalized (rotation wrapped, opacity
    /// clamped) before insertion.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Validation`] if a placement value is
    /// non-finite, or if the element's id or name collides with an existing
    /// element.
    pub fn add_element(&self, element: Element) -> DocumentResult<Self> {
        if !element.placement.is_finite() {
            return Err(DocumentError::Validation(
                "placement contains a non-finite value".to_string(),
            ));
        }
        if self.contains(element.id) {
            return Err(DocumentError::Validation(format!(
                "duplicate element id: {}",
                element.id
            )));
        }
        if let Some(name) = element.name.as_deref() {
            if !name.is_empty() && self.elements.iter().any(|e| e.name.as_deref() == Some(name)) {
                return Err(DocumentError::Validation(format!(
                    "duplicate element name: {name}"
                )));
            }
        }

        let mut next = self.clone();
        let mut element = element;
        element.placement = element.placement.normalized();
        next.elements.push(element);
        Ok(next.committed())
    }

    /// Remove an element.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the element does not exist.
    pub fn remove_element(&self, id: ElementId) -> DocumentResult<Self> {
        if !self.contains(id) {
            return Err(DocumentError::NotFound(id));
        }
        let mut next = self.clone();
        next.elements.retain(|e| e.id != id);
        // Drop the removed id from any group that references it
        for element in &mut next.elements {
            if let ElementKind::Group { children } = &mut element.kind {
                children.retain(|child| *child != id);
            }
        }
        Ok(next.committed())
    }

    /// Apply a partial update to an element.
    ///
    /// Present numeric fields must be finite; rotation is wrapped and opacity
    /// clamped. Kind-specific fields that do not apply to the element's
    /// variant are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the element does not exist,
    /// [`DocumentError::Validation`] if a numeric field is non-finite or the
    /// new name collides with another element.
    pub fn update_element(&self, id: ElementId, patch: &ElementPatch) -> DocumentResult<Self> {
        if !patch.is_finite() {
            return Err(DocumentError::Validation(
                "patch contains a non-finite value".to_string(),
            ));
        }
        if !self.contains(id) {
            return Err(DocumentError::NotFound(id));
        }
        if let Some(name) = patch.name.as_deref() {
            if !name.is_empty()
                && self
                    .elements
                    .iter()
                    .any(|e| e.id != id && e.name.as_deref() == Some(name))
            {
                return Err(DocumentError::Validation(format!(
                    "duplicate element name: {name}"
                )));
            }
        }

        let mut next = self.clone();
        let element = next
            .elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(DocumentError::NotFound(id))?;
        apply_patch(element, patch);
        Ok(next.committed())
    }

    /// Move an element to a new z-order index.
    ///
    /// The index is clamped to the valid range.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the element does not exist.
    pub fn reorder(&self, id: ElementId, new_index: usize) -> DocumentResult<Self> {
        let Some(current) = self.elements.iter().position(|e| e.id == id) else {
            return Err(DocumentError::NotFound(id));
        };
        let mut next = self.clone();
        let element = next.elements.remove(current);
        let index = new_index.min(next.elements.len());
        next.elements.insert(index, element);
        Ok(next.committed())
    }

    /// Replace the canvas background.
    #[must_use]
    pub fn set_background(&self, background: Background) -> Self {
        let mut next = self.clone();
        next.background = background;
        next.committed()
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DocumentResult<String> {
        serde_json::to_string(self).map_err(DocumentError::Serialization)
    }

    /// Deserialize a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        serde_json::from_str(json).map_err(DocumentError::Serialization)
    }

    /// Compare two documents for equality, ignoring `updated_at`.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.id == other.id
            && self.canvas_width == other.canvas_width
            && self.canvas_height == other.canvas_height
            && self.background == other.background
            && self.elements == other.elements
            && self.version == other.version
    }

    /// Finish a mutation: bump the version once and refresh the timestamp.
    fn committed(mut self) -> Self {
        self.version += 1;
        self.updated_at = current_timestamp_ms();
        self
    }
}

/// Apply a patch to an element in place. Inputs are already validated.
fn apply_patch(element: &mut Element, patch: &ElementPatch) {
    let p = &mut element.placement;
    if let Some(x) = patch.x {
        p.x = x;
    }
    if let Some(y) = patch.y {
        p.y = y;
    }
    if let Some(width) = patch.width {
        p.width = width;
    }
    if let Some(height) = patch.height {
        p.height = height;
    }
    if let Some(rotation) = patch.rotation {
        p.rotation = rotation;
    }
    if let Some(opacity) = patch.opacity {
        p.opacity = opacity;
    }
    element.placement = element.placement.normalized();

    if let Some(name) = &patch.name {
        element.name = Some(name.clone());
    }

    match &mut element.kind {
        ElementKind::Text {
            content,
            font_family,
            font_size,
            font_weight,
            align,
            fill,
        } => {
            if let Some(v) = &patch.content {
                content.clone_from(v);
            }
            if let Some(v) = &patch.font_family {
                font_family.clone_from(v);
            }
            if let Some(v) = patch.font_size {
                *font_size = v;
            }
            if let Some(v) = patch.font_weight {
                *font_weight = v;
            }
            if let Some(v) = patch.align {
                *align = v;
            }
            if let Some(v) = &patch.fill {
                fill.clone_from(v);
            }
        }
        ElementKind::Rectangle {
            fill,
            corner_radius,
        } => {
            if let Some(v) = &patch.fill {
                fill.clone_from(v);
            }
            if let Some(v) = patch.corner_radius {
                *corner_radius = v;
            }
        }
        ElementKind::Circle { fill } => {
            if let Some(v) = &patch.fill {
                fill.clone_from(v);
            }
        }
        ElementKind::Image { src, .. } => {
            if let Some(v) = &patch.src {
                src.clone_from(v);
            }
        }
        ElementKind::Group { .. } => {}
    };
}

/// Get the current Unix timestamp in milliseconds.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Placement;

    fn text_element(content: &str) -> Element {
        Element::new(ElementKind::text(content))
            .with_placement(Placement::at(10.0, 10.0, 50.0, 20.0))
    }

    #[test]
    fn test_new_document_starts_at_version_one() {
        let doc = Document::new(1080, 1080);
        assert_eq!(doc.version, 1);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_add_element_bumps_version_once() {
        let doc = Document::new(1080, 1080);
        let next = doc.add_element(text_element("Hi")).expect("add");
        assert_eq!(next.version, 2);
        assert_eq!(next.element_count(), 1);
        // The original value is untouched
        assert_eq!(doc.version, 1);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_add_element_normalizes_placement() {
        let doc = Document::new(1080, 1080);
        let el = Element::new(ElementKind::rectangle("#333333")).with_placement(Placement {
            rotation: 540.0,
            opacity: 2.0,
            ..Placement::default()
        });
        let id = el.id;
        let next = doc.add_element(el).expect("add");
        let stored = next.element(id).expect("element");
        assert!((stored.placement.rotation - 180.0).abs() < f32::EPSILON);
        assert!((stored.placement.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_add_element_rejects_non_finite() {
        let doc = Document::new(1080, 1080);
        let el = Element::new(ElementKind::rectangle("#333333")).with_placement(Placement {
            x: f32::NAN,
            ..Placement::default()
        });
        let result = doc.add_element(el);
        assert!(matches!(result, Err(DocumentError::Validation(_))));
    }

    #[test]
    fn test_add_element_rejects_duplicate_name() {
        let doc = Document::new(1080, 1080);
        let doc = doc
            .add_element(text_element("a").with_name("headline"))
            .expect("add");
        let result = doc.add_element(text_element("b").with_name("headline"));
        assert!(matches!(result, Err(DocumentError::Validation(_))));
    }

    #[test]
    fn test_remove_element() {
        let doc = Document::new(1080, 1080);
        let el = text_element("bye");
        let id = el.id;
        let doc = doc.add_element(el).expect("add");
        let next = doc.remove_element(id).expect("remove");
        assert!(next.is_empty());
        assert_eq!(next.version, 3);
    }

    #[test]
    fn test_remove_unknown_element_fails_unchanged() {
        let doc = Document::new(1080, 1080);
        let result = doc.remove_element(ElementId::new());
        assert!(matches!(result, Err(DocumentError::NotFound(_))));
        assert_eq!(doc.version, 1);
    }

    #[test]
    fn test_remove_element_detaches_from_groups() {
        let doc = Document::new(1080, 1080);
        let child = text_element("child");
        let child_id = child.id;
        let doc = doc.add_element(child).expect("add child");
        let group = Element::new(ElementKind::Group {
            children: vec![child_id],
        });
        let group_id = group.id;
        let doc = doc.add_element(group).expect("add group");

        let doc = doc.remove_element(child_id).expect("remove child");
        let ElementKind::Group { children } = &doc.element(group_id).expect("group").kind else {
            panic!("expected group");
        };
        assert!(children.is_empty());
    }

    #[test]
    fn test_update_element_opacity_clamps() {
        let doc = Document::new(1080, 1080);
        let el = text_element("x");
        let id = el.id;
        let doc = doc.add_element(el).expect("add");

        let high = doc
            .update_element(id, &ElementPatch::opacity(1.5))
            .expect("update");
        assert!((high.element(id).expect("el").placement.opacity - 1.0).abs() < f32::EPSILON);

        let low = doc
            .update_element(id, &ElementPatch::opacity(-0.2))
            .expect("update");
        assert!(low.element(id).expect("el").placement.opacity.abs() < f32::EPSILON);
    }

    #[test]
    fn test_update_element_rejects_nan() {
        let doc = Document::new(1080, 1080);
        let el = text_element("x");
        let id = el.id;
        let doc = doc.add_element(el).expect("add");
        let result = doc.update_element(id, &ElementPatch::moved(f32::NAN, 0.0));
        assert!(matches!(result, Err(DocumentError::Validation(_))));
    }

    #[test]
    fn test_update_ignores_mismatched_kind_fields() {
        let doc = Document::new(1080, 1080);
        let el = Element::new(ElementKind::rectangle("#abcdef"));
        let id = el.id;
        let doc = doc.add_element(el).expect("add");

        let patch = ElementPatch {
            content: Some("ignored".to_string()),
            fill: Some("#123456".to_string()),
            ..ElementPatch::default()
        };
        let next = doc.update_element(id, &patch).expect("update");
        let ElementKind::Rectangle { fill, .. } = &next.element(id).expect("el").kind else {
            panic!("expected rectangle");
        };
        assert_eq!(fill, "#123456");
    }

    #[test]
    fn test_reorder_moves_element() {
        let doc = Document::new(1080, 1080);
        let a = text_element("a");
        let b = text_element("b");
        let a_id = a.id;
        let doc = doc.add_element(a).expect("add a");
        let doc = doc.add_element(b).expect("add b");

        let next = doc.reorder(a_id, 5).expect("reorder clamps");
        assert_eq!(next.elements.last().expect("last").id, a_id);
    }

    #[test]
    fn test_set_background() {
        let doc = Document::new(1080, 1080);
        let next = doc.set_background(Background::Color("#101010".to_string()));
        assert_eq!(next.background, Background::Color("#101010".to_string()));
        assert_eq!(next.version, 2);
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let doc = Document::new(1200, 628);
        let doc = doc
            .add_element(text_element("Round trip").with_name("headline"))
            .expect("add");
        let doc = doc.set_background(Background::Image("https://cdn/bg.png".to_string()));

        let json = doc.to_json().expect("serialize");
        let back = Document::from_json(&json).expect("deserialize");
        assert_eq!(doc, back);
    }

    #[test]
    fn test_same_content_ignores_updated_at() {
        let doc = Document::new(1080, 1080);
        let mut other = doc.clone();
        other.updated_at += 1000;
        assert!(doc.same_content(&other));
        assert_ne!(doc, other);
    }
}
