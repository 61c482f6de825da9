//! Drawing primitives produced by a layout pass.
//!
//! Every primitive carries absolute page coordinates. Text is positioned
//! by its top edge (`y`) and horizontal anchor (`align`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderItem {
    Text(TextItem),
    /// Stacked time-signature glyph
    Beat(BeatItem),
    Line(LineItem),
    Dot(DotItem),
    /// Cubic bezier rising `height` above the chord from (x, y) to (to_x, to_y)
    Curve(CurveItem),
    Arc(ArcItem),
    /// Rectangle filled with the background color
    Clear(ClearItem),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub size: f64,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatItem {
    pub x: f64,
    pub y: f64,
    pub numerator: String,
    pub denominator: String,
    pub font_size: f64,
    pub line_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub x: f64,
    pub y: f64,
    pub to_x: f64,
    pub to_y: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotItem {
    pub x: f64,
    pub y: f64,
    /// Radius
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveItem {
    pub x: f64,
    pub y: f64,
    pub to_x: f64,
    pub to_y: f64,
    pub line_width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcItem {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    /// Start and end angle in radians, clockwise in page coordinates
    pub angle: (f64, f64),
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearItem {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Hit-testing box of one rendered notation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Strict containment, edges excluded.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x1 && x < self.x2 && y > self.y1 && y < self.y2
    }
}

// ── Constructors used by the renderer ───────────────────────────────

pub(super) fn text(x: f64, y: f64, text: impl Into<String>, size: f64, align: TextAlign) -> RenderItem {
    RenderItem::Text(TextItem { x, y, text: text.into(), size, align })
}

pub(super) fn line(x: f64, y: f64, to_x: f64, to_y: f64, width: f64) -> RenderItem {
    RenderItem::Line(LineItem { x, y, to_x, to_y, width })
}

pub(super) fn dot(x: f64, y: f64, size: f64) -> RenderItem {
    RenderItem::Dot(DotItem { x, y, size })
}

pub(super) fn curve(x: f64, y: f64, to_x: f64, to_y: f64, line_width: f64, height: f64) -> RenderItem {
    RenderItem::Curve(CurveItem { x, y, to_x, to_y, line_width, height })
}
