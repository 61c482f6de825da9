//! SVG painter. Turns render primitives into a standalone SVG document.
//!
//! Any other surface (canvas, PDF, native view) can implement [`Painter`]
//! the same way and reuse [`paint_all`] and [`repaint_notation`].

use std::f64::consts::PI;

use crate::error::Result;
use crate::model::{Options, SheetStyle};
use super::items::{BoundingBox, RenderItem, TextAlign};
use super::sheet::{RenderNotation, RenderSheet};
use super::{render, RenderResult};

/// A drawing surface for render primitives.
pub trait Painter {
    fn paint(&mut self, item: &RenderItem, style: &SheetStyle);

    /// Fill `bounds` with the background color.
    fn erase(&mut self, bounds: &BoundingBox, style: &SheetStyle);
}

/// Paint every primitive of a pass in order.
pub fn paint_all<P: Painter + ?Sized>(painter: &mut P, result: &RenderResult, style: &SheetStyle) {
    for item in &result.items {
        painter.paint(item, style);
    }
}

/// Erase one notation's box and paint its own primitives again.
pub fn repaint_notation<P: Painter + ?Sized>(painter: &mut P, notation: &RenderNotation, style: &SheetStyle) {
    painter.erase(&notation.bounds, style);
    for item in &notation.items {
        painter.paint(item, style);
    }
}

/// Lay out `sheet` and paint the result as an SVG string.
pub fn render_to_svg(sheet: &mut RenderSheet, options: &Options) -> Result<String> {
    let result = render(sheet, options)?;
    let mut svg = SvgPainter::new(result.width, result.height, &options.style);
    paint_all(&mut svg, &result, &options.style);
    Ok(svg.build())
}

// ═══════════════════════════════════════════════════════════════════════
// SvgPainter
// ═══════════════════════════════════════════════════════════════════════

pub struct SvgPainter {
    elements: Vec<String>,
    width: f64,
    height: f64,
    font: String,
}

impl SvgPainter {
    /// Start a page filled with the style's background color.
    pub fn new(width: f64, height: f64, style: &SheetStyle) -> Self {
        let mut painter = Self {
            elements: Vec::new(),
            width,
            height,
            font: style.font.clone(),
        };
        painter.rect(0.0, 0.0, width, height, &style.background_color);
        painter
    }

    pub fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}" style="font-family: '{}', sans-serif;">"#,
            self.width, self.height, self.width, self.height, escape(&self.font)
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x, y, w, h, fill
        ));
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
            x1, y1, x2, y2, color, width
        ));
    }

    /// Text hanging from `y`, the top edge used by the layout.
    fn text(&mut self, x: f64, y: f64, content: &str, size: f64, align: TextAlign, fill: &str) {
        let anchor = match align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.1}" fill="{}" text-anchor="{}" dominant-baseline="hanging">{}</text>"#,
            x, y, size, fill, anchor, escape(content)
        ));
    }

    fn path(&mut self, d: &str, stroke: &str, stroke_width: f64) {
        self.elements.push(format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            d, stroke, stroke_width
        ));
    }
}

impl Painter for SvgPainter {
    fn paint(&mut self, item: &RenderItem, style: &SheetStyle) {
        let color = style.fill_color.as_str();
        match item {
            RenderItem::Text(t) => self.text(t.x, t.y, &t.text, t.size, t.align, color),
            RenderItem::Beat(b) => {
                // Numerator over denominator, split by a short rule.
                let digits = b.numerator.chars().count().max(b.denominator.chars().count());
                let width = b.font_size * (0.6 * digits as f64 + 0.4);
                let center = b.x + width / 2.0;
                let rule_y = b.y + b.font_size + b.line_width;
                self.text(center, b.y, &b.numerator, b.font_size, TextAlign::Center, color);
                self.line(b.x, rule_y, b.x + width, rule_y, color, b.line_width);
                self.text(center, rule_y + b.line_width, &b.denominator, b.font_size, TextAlign::Center, color);
            }
            RenderItem::Line(l) => self.line(l.x, l.y, l.to_x, l.to_y, color, l.width),
            RenderItem::Dot(d) => self.elements.push(format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
                d.x, d.y, d.size, color
            )),
            RenderItem::Curve(c) => {
                // Control points at the chord's thirds, pulled up to 3/4
                // of the curve height.
                let reach = (c.to_x - c.x) / 3.0;
                let lift = c.height * 0.75;
                let d = format!(
                    "M{:.1},{:.1} C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                    c.x, c.y,
                    c.x + reach, c.y - lift,
                    c.to_x - reach, c.to_y - lift,
                    c.to_x, c.to_y,
                );
                self.path(&d, color, c.line_width);
            }
            RenderItem::Arc(a) => {
                let (start, end) = a.angle;
                let large = if (end - start).rem_euclid(2.0 * PI) > PI { 1 } else { 0 };
                let d = format!(
                    "M{:.1},{:.1} A{:.1},{:.1} 0 {} 1 {:.1},{:.1}",
                    a.x + a.r * start.cos(), a.y + a.r * start.sin(),
                    a.r, a.r, large,
                    a.x + a.r * end.cos(), a.y + a.r * end.sin(),
                );
                self.path(&d, color, a.width);
            }
            RenderItem::Clear(c) => self.rect(c.x, c.y, c.width, c.height, &style.background_color),
        }
    }

    fn erase(&mut self, bounds: &BoundingBox, style: &SheetStyle) {
        self.rect(bounds.x1, bounds.y1, bounds.width(), bounds.height(), &style.background_color);
    }
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
