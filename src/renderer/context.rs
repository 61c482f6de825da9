//! Per-pass geometry and the mutable layout cursor.

use crate::model::{Notation, Options};
use super::constants::*;
use super::diagnostics::Diagnostics;
use super::items::RenderItem;
use super::slurs::SlurTracker;
use super::timeline::extension_count;

/// Geometry derived once from [`Options`] for a whole pass.
#[derive(Debug, Clone)]
pub(super) struct RenderContext {
    pub(super) width: f64,
    pub(super) usable_width: f64,
    pub(super) padding_x: f64,
    pub(super) padding_y: f64,
    pub(super) font_size: f64,
    pub(super) line_height: f64,
    /// Gap between the top of a row's line and its glyphs
    pub(super) notation_margin: f64,
    pub(super) line_padding: f64,
    /// Stroke width
    pub(super) line_width: f64,
    /// Duration/octave dot radius
    pub(super) dot_size: f64,
}

impl RenderContext {
    pub(super) fn new(options: &Options) -> Self {
        let fs = options.font_size;
        Self {
            width: options.width,
            usable_width: options.width - options.padding_x * 2.0,
            padding_x: options.padding_x,
            padding_y: options.padding_y,
            font_size: fs,
            line_height: fs * LINE_HEIGHT,
            notation_margin: fs * NOTATION_MARGIN,
            line_padding: options.line_padding,
            line_width: (fs * STROKE_WIDTH).ceil(),
            dot_size: (fs * DOT_SIZE).ceil(),
        }
    }

    /// Right edge of the usable area.
    pub(super) fn right_edge(&self) -> f64 {
        self.padding_x + self.usable_width
    }

    // ── Width model ─────────────────────────────────────────────────
    // Shared by the row planner and the renderer so that planned and
    // placed widths agree.

    /// Base glyph width, narrower for finer durations.
    pub(super) fn note_width(&self, denominator: u32) -> f64 {
        let scale = match denominator {
            d if d > 16 => 0.6,
            d if d > 8 => 0.666,
            d if d > 4 => 0.75,
            _ => 1.0,
        };
        self.font_size * NOTE_WIDTH * scale
    }

    /// Width of a note or rest glyph including room for an accidental.
    pub(super) fn head_width(&self, notation: &Notation) -> f64 {
        let base = self.note_width(notation.denominator());
        match notation {
            Notation::Note(note) if note.pitch.accidental != 0 => {
                base + self.font_size * ACCIDENTAL_SURCHARGE
            }
            _ => base,
        }
    }

    /// Width of one tuplet member.
    pub(super) fn tuplet_member_width(&self, denominator: u32) -> f64 {
        self.note_width(denominator.saturating_mul(2))
    }

    pub(super) fn dot_width(&self) -> f64 {
        self.font_size * DOT_WIDTH
    }

    pub(super) fn extension_width(&self) -> f64 {
        self.note_width(1)
    }

    pub(super) fn ornaments_width(&self, count: usize) -> f64 {
        self.font_size * ORNAMENT_STEP * (count as f64 + 1.0)
    }

    pub(super) fn bar_width(&self) -> f64 {
        self.line_width + self.font_size
    }

    /// Planned width of one notation and how many stretchable items
    /// (heads, dots, ties, tuplet members) it contributes.
    pub(super) fn measure_notation(&self, notation: &Notation) -> (f64, usize) {
        match notation {
            Notation::Note(note) => {
                let ties = extension_count(note.denominator);
                let mut width = self.head_width(notation) + ties as f64 * self.extension_width();
                let mut items = 1 + ties;
                if note.dotted && note.denominator >= 4 {
                    width += self.dot_width();
                    items += 1;
                }
                if !note.ornaments.is_empty() {
                    width += self.ornaments_width(note.ornaments.len());
                }
                (width, items)
            }
            Notation::Rest(rest) => {
                let ties = extension_count(rest.denominator);
                let width = self.head_width(notation) + ties as f64 * self.extension_width();
                (width, 1 + ties)
            }
            Notation::Tuplet(tuplet) => {
                let count = tuplet.pitches.len();
                (self.tuplet_member_width(tuplet.denominator) * count as f64, count)
            }
        }
    }

    /// Y of the `level`-th beam line under a row whose top is `y`.
    pub(super) fn underline_y(&self, y: f64, level: usize) -> f64 {
        (y + self.notation_margin
            + self.font_size
            + level as f64 * self.line_width * 2.0
            + self.line_width)
            .ceil()
    }
}

/// The single mutable cursor threaded through a layout pass.
#[derive(Debug)]
pub(super) struct RenderState {
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) row: usize,
    pub(super) measure: usize,
    pub(super) notation: usize,
    pub(super) items: Vec<RenderItem>,
    pub(super) diagnostics: Diagnostics,
    pub(super) slurs: SlurTracker,
}

impl RenderState {
    pub(super) fn new(ctx: &RenderContext) -> Self {
        Self {
            x: ctx.padding_x,
            y: ctx.padding_y,
            row: 0,
            measure: 0,
            notation: 0,
            items: Vec::new(),
            diagnostics: Diagnostics::default(),
            slurs: SlurTracker::default(),
        }
    }
}
