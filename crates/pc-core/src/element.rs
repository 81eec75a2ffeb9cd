//! Canvas elements: positioned, sized, typed visual units.
//!
//! An `Element` is a rectangle in canvas space plus a closed set of
//! type-specific attributes (`ElementKind`). The element type is fixed at
//! construction. Transient interaction flags (`is_selected`, `is_editing`,
//! `cursor_visible`) live on the element for the renderer's benefit but are
//! never serialized.

use crate::error::ElementError;
use crate::geometry::{Bounds, Point};
use crate::id::ElementId;
use crate::style::{Color, FontSpec, TextAlign};
use serde::{Deserialize, Serialize};

/// Default fill for box elements.
pub const DEFAULT_FILL: Color = Color::rgb(0x34, 0x98, 0xDB);

// ─── Kinds ───────────────────────────────────────────────────────────────

/// Attributes of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextAttrs {
    pub content: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_color: Color,
    pub font_bold: bool,
    pub font_italic: bool,
    pub text_align: TextAlign,
}

impl Default for TextAttrs {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_family: "Arial".into(),
            font_size: 16.0,
            font_color: Color::BLACK,
            font_bold: false,
            font_italic: false,
            text_align: TextAlign::Left,
        }
    }
}

impl TextAttrs {
    pub fn font(&self) -> FontSpec {
        FontSpec {
            family: self.font_family.clone(),
            size: self.font_size,
            bold: self.font_bold,
            italic: self.font_italic,
        }
    }
}

fn default_fill() -> Color {
    DEFAULT_FILL
}

/// Type-specific element data. Serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextAttrs),
    Image {
        /// Image URL or data URI.
        content: String,
    },
    Box {
        #[serde(rename = "fillColor", default = "default_fill")]
        fill_color: Color,
    },
}

/// Field-less discriminant of `ElementKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Image,
    Box,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Box => "box",
        }
    }
}

// ─── Resize handles ──────────────────────────────────────────────────────

/// A corner resize handle. Declaration order is the hit-test priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default = "ElementId::generated")]
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(default)]
    pub locked: bool,

    #[serde(skip)]
    pub is_selected: bool,
    #[serde(skip)]
    pub is_editing: bool,
    #[serde(skip)]
    pub cursor_visible: bool,
}

impl Element {
    pub fn new(bounds: Bounds, kind: ElementKind) -> Self {
        let prefix = match &kind {
            ElementKind::Text(_) => "text",
            ElementKind::Image { .. } => "image",
            ElementKind::Box { .. } => "box",
        };
        Self {
            id: ElementId::with_prefix(prefix),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            kind,
            locked: false,
            is_selected: false,
            is_editing: false,
            cursor_visible: false,
        }
    }

    /// Text element with default typography.
    pub fn text(bounds: Bounds, content: impl Into<String>) -> Self {
        Self::new(
            bounds,
            ElementKind::Text(TextAttrs {
                content: content.into(),
                ..TextAttrs::default()
            }),
        )
    }

    pub fn image(bounds: Bounds, src: impl Into<String>) -> Self {
        Self::new(
            bounds,
            ElementKind::Image {
                content: src.into(),
            },
        )
    }

    pub fn rect(bounds: Bounds, fill_color: Color) -> Self {
        Self::new(bounds, ElementKind::Box { fill_color })
    }

    pub fn element_type(&self) -> ElementType {
        match self.kind {
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Image { .. } => ElementType::Image,
            ElementKind::Box { .. } => ElementType::Box,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text(_))
    }

    pub fn text_attrs(&self) -> Option<&TextAttrs> {
        match &self.kind {
            ElementKind::Text(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn text_attrs_mut(&mut self) -> Option<&mut TextAttrs> {
        match &mut self.kind {
            ElementKind::Text(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_bounds(&mut self, b: Bounds) {
        self.x = b.x;
        self.y = b.y;
        self.width = b.width;
        self.height = b.height;
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Inclusive bounding-box test.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        self.bounds().contains(px, py)
    }

    /// Corner points in `Handle::ALL` order.
    pub fn resize_handles(&self) -> [Point; 4] {
        let b = self.bounds();
        [
            Point::new(b.x, b.y),
            Point::new(b.right(), b.y),
            Point::new(b.x, b.bottom()),
            Point::new(b.right(), b.bottom()),
        ]
    }

    /// First handle whose grab square contains the point.
    ///
    /// The square has side `handle_size` centered on the corner and is grown
    /// by `margin` on every side.
    pub fn resize_handle_at(
        &self,
        px: f32,
        py: f32,
        handle_size: f32,
        margin: f32,
    ) -> Option<Handle> {
        let reach = handle_size / 2.0 + margin;
        Handle::ALL
            .into_iter()
            .zip(self.resize_handles())
            .find(|(_, p)| (px - p.x).abs() <= reach && (py - p.y).abs() <= reach)
            .map(|(handle, _)| handle)
    }

    /// Translate without validation; callers clamp or snap.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Value copy shifted by `offset` on both axes, with a fresh id and
    /// cleared interaction flags.
    pub fn duplicate(&self, offset: f32) -> Element {
        let mut copy = Element::new(self.bounds(), self.kind.clone());
        copy.move_by(offset, offset);
        copy.locked = self.locked;
        copy
    }

    pub fn clear_transient(&mut self) {
        self.is_selected = false;
        self.is_editing = false;
        self.cursor_visible = false;
    }

    // ─── Validation ──────────────────────────────────────────────────────

    /// First rule this element violates, if any.
    pub fn validation_error(&self) -> Option<ElementError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Some(ElementError::NonPositiveSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.x < 0.0 || self.y < 0.0 {
            return Some(ElementError::NegativePosition {
                x: self.x,
                y: self.y,
            });
        }
        match &self.kind {
            ElementKind::Text(attrs) if !(attrs.font_size > 0.0) => {
                Some(ElementError::InvalidFontSize(attrs.font_size))
            }
            ElementKind::Image { content } if content.trim().is_empty() => {
                Some(ElementError::MissingContent { kind: "image" })
            }
            _ => None,
        }
    }

    pub fn validate(&self) -> bool {
        self.validation_error().is_none()
    }
}
