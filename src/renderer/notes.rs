//! Note, rest and tuplet rendering.
//!
//! Each function advances the pen across the notation's slot, emits its
//! primitives into both the pass output and the notation's own item list,
//! and records its hit-testing box.

use std::f64::consts::PI;

use crate::model::*;
use super::beams::{BeamBuffer, BeamSegment};
use super::constants::*;
use super::context::{RenderContext, RenderState};
use super::items::{self, ArcItem, BoundingBox, ClearItem, RenderItem, TextAlign};
use super::layout::RowContext;
use super::pitch::{build_pitch, PitchHistory};
use super::sheet::RenderNotation;
use super::slurs::SlurAnchor;
use super::timeline::{beam_count, extension_count, has_invalid_dot, notation_ticks, Ticks};

/// State scoped to the measure being rendered.
#[derive(Debug, Default)]
pub(super) struct MeasureState {
    pub(super) pitches: PitchHistory,
    pub(super) beams: BeamBuffer,
}

impl MeasureState {
    pub(super) fn reset(&mut self) {
        self.pitches.reset();
        self.beams.reset();
    }
}

/// Render one notation at the pen and return its tick length.
pub(super) fn render_notation(
    ctx: &RenderContext,
    state: &mut RenderState,
    row: &RowContext,
    measure: &mut MeasureState,
    item: &mut RenderNotation,
) -> Ticks {
    let RenderNotation { notation, items: owned, bounds } = item;
    owned.clear();

    if has_invalid_dot(notation) {
        state.diagnostics.warning(
            state.notation,
            format!("dot on a 1/{} note has no effect", notation.denominator()),
        );
    }

    let head = ctx.head_width(notation);
    let mut slot = Slot { owned, bounds };
    match &*notation {
        Notation::Note(note) => render_note(ctx, state, row, measure, note, head, &mut slot),
        Notation::Rest(rest) => render_rest(ctx, state, row, measure, rest, head, &mut slot),
        Notation::Tuplet(tuplet) => render_tuplet(ctx, state, row, measure, tuplet, &mut slot),
    }

    notation_ticks(notation)
}

/// Output slot of the notation being rendered.
struct Slot<'a> {
    owned: &'a mut Vec<RenderItem>,
    bounds: &'a mut BoundingBox,
}

impl Slot<'_> {
    fn emit(&mut self, state: &mut RenderState, new: Vec<RenderItem>) {
        self.owned.extend(new.iter().cloned());
        state.items.extend(new);
    }
}

// ── Note ────────────────────────────────────────────────────────────

fn render_note(
    ctx: &RenderContext,
    state: &mut RenderState,
    row: &RowContext,
    measure: &mut MeasureState,
    note: &Note,
    head: f64,
    slot: &mut Slot<'_>,
) {
    let half = head / 2.0;
    state.x += half + row.margin / 2.0;

    if !note.ornaments.is_empty() {
        let grace = ornament_items(ctx, state.x, state.y, &note.ornaments);
        slot.emit(state, grace);
        state.x += ctx.ornaments_width(note.ornaments.len());
    }

    let lines = register_beams(ctx, state, &mut measure.beams, note.denominator);

    let top = state.y + ctx.notation_margin;
    let glyph = build_pitch(ctx, &note.pitch, 1.0, state.x, top, &measure.pitches, beam_padding(ctx, lines));
    slot.emit(state, glyph);
    measure.pitches.record(note.pitch);

    *slot.bounds = BoundingBox {
        x1: state.x - half,
        y1: top,
        x2: state.x + half,
        y2: top + ctx.font_size,
    };

    match note.slur {
        Slur::None => {}
        Slur::Start => {
            let anchor = slur_anchor(ctx, state, note.pitch.octave);
            state.slurs.start(anchor, &mut state.diagnostics);
        }
        Slur::End => {
            let anchor = slur_anchor(ctx, state, note.pitch.octave);
            let curves = state.slurs.end(ctx, anchor, &mut state.diagnostics);
            state.items.extend(curves);
        }
    }

    state.x += half + row.margin / 2.0;

    if note.dotted && note.denominator >= 4 {
        state.x += row.margin / 2.0;
        let dot = items::dot(
            state.x + ctx.font_size * 0.25 - ctx.dot_size / 2.0,
            state.y + ctx.font_size * DURATION_DOT_Y,
            ctx.dot_size,
        );
        slot.emit(state, vec![dot]);
        state.x += ctx.dot_width() + row.margin / 2.0;
    }

    render_extensions(ctx, state, row, note.denominator, slot);
}

/// Grace pitches above-left of the note, a bracket line under them and an
/// arc leading into the note. Grace pitches never share accidentals with
/// the measure.
fn ornament_items(ctx: &RenderContext, x: f64, y: f64, ornaments: &[Pitch]) -> Vec<RenderItem> {
    let fs = ctx.font_size;
    let step = fs * ORNAMENT_STEP;
    let fresh = PitchHistory::default();

    let mut out = Vec::new();
    for (i, pitch) in ornaments.iter().enumerate() {
        out.extend(build_pitch(ctx, pitch, ORNAMENT_SCALE, x + i as f64 * step, y, &fresh, 0.0));
    }

    let last = (ornaments.len() - 1) as f64;
    let bracket_y = y + fs * ORNAMENT_SCALE + ctx.line_width;
    out.push(items::line(x - step / 2.0, bracket_y, x + last * step + step / 2.0, bracket_y, ctx.line_width));
    out.push(RenderItem::Arc(ArcItem {
        x: x + fs * (ORNAMENT_STEP * last + 0.5),
        y: y + fs * 0.5,
        r: fs / 3.0,
        angle: (PI * 0.5, PI),
        width: ctx.line_width,
    }));
    out
}

fn slur_anchor(ctx: &RenderContext, state: &RenderState, octave: i8) -> SlurAnchor {
    let rise = octave.max(0) as f64;
    SlurAnchor {
        x: state.x,
        y: state.y - SLUR_RISE_PER_OCTAVE * ctx.font_size * rise,
        row: state.row,
        index: state.notation,
    }
}

// ── Rest ────────────────────────────────────────────────────────────

fn render_rest(
    ctx: &RenderContext,
    state: &mut RenderState,
    row: &RowContext,
    measure: &mut MeasureState,
    rest: &Rest,
    head: f64,
    slot: &mut Slot<'_>,
) {
    let half = head / 2.0;
    state.x += half + row.margin / 2.0;

    let top = state.y + ctx.notation_margin;
    let glyph = items::text(state.x, top, REST_GLYPH, ctx.font_size, TextAlign::Center);
    slot.emit(state, vec![glyph]);
    *slot.bounds = BoundingBox {
        x1: state.x - half,
        y1: top,
        x2: state.x + half,
        y2: top + ctx.font_size,
    };

    register_beams(ctx, state, &mut measure.beams, rest.denominator);
    state.x += half + row.margin / 2.0;

    render_extensions(ctx, state, row, rest.denominator, slot);
}

// ── Shared pieces ───────────────────────────────────────────────────

/// Buffer one beam segment per level under the pen; returns the level
/// count.
fn register_beams(ctx: &RenderContext, state: &RenderState, beams: &mut BeamBuffer, denominator: u32) -> usize {
    let count = beam_count(denominator);
    let reach = ctx.note_width(denominator) / 4.0;
    for level in 0..count {
        beams.register(BeamSegment::new(
            state.notation,
            level,
            state.x - reach,
            state.x + reach,
            ctx.underline_y(state.y, level),
            ctx.line_width,
        ));
    }
    count
}

fn beam_padding(ctx: &RenderContext, lines: usize) -> f64 {
    lines as f64 * (ctx.line_width + 1.0)
}

/// Dashes after a whole or half value, one per extra quarter.
fn render_extensions(
    ctx: &RenderContext,
    state: &mut RenderState,
    row: &RowContext,
    denominator: u32,
    slot: &mut Slot<'_>,
) {
    let fs = ctx.font_size;
    for _ in 0..extension_count(denominator) {
        state.x += row.margin / 2.0;
        let y = state.y + fs * EXTENSION_Y;
        let dash = items::line(
            state.x + fs * EXTENSION_START,
            y,
            state.x + fs * EXTENSION_END,
            y,
            ctx.line_width * 2.0,
        );
        slot.emit(state, vec![dash]);
        state.x += ctx.extension_width() + row.margin / 2.0;
    }
}

// ── Tuplet ──────────────────────────────────────────────────────────

fn render_tuplet(
    ctx: &RenderContext,
    state: &mut RenderState,
    row: &RowContext,
    measure: &mut MeasureState,
    tuplet: &Tuplet,
    slot: &mut Slot<'_>,
) {
    let fs = ctx.font_size;
    let half = ctx.tuplet_member_width(tuplet.denominator) / 2.0;
    let lines = beam_count(tuplet.denominator.saturating_mul(2));
    let top = state.y + ctx.notation_margin;

    let mut x = state.x + half + row.margin / 2.0;
    let line_start = x - half / 2.0;
    let x1 = x - half;

    for (i, pitch) in tuplet.pitches.iter().enumerate() {
        let glyph = build_pitch(ctx, pitch, 1.0, x, top, &measure.pitches, beam_padding(ctx, lines));
        slot.emit(state, glyph);
        measure.pitches.record(*pitch);
        if i + 1 < tuplet.pitches.len() {
            x += half * 2.0 + row.margin;
        }
    }
    let line_end = x + half / 2.0;
    x += half + row.margin / 2.0;

    *slot.bounds = BoundingBox { x1, y1: top, x2: x, y2: top + fs };

    let mut group = Vec::new();
    for level in 0..lines {
        let y = ctx.underline_y(state.y, level);
        group.push(items::line(line_start, y, line_end, y, ctx.line_width));
    }

    let highest = tuplet.pitches.iter().map(|p| p.octave).max().unwrap_or(0).max(0);
    let y = state.y - SLUR_RISE_PER_OCTAVE * fs * highest as f64;
    group.push(items::curve(state.x, y, x, y, ctx.line_width, CURVE_HEIGHT * ctx.line_height));
    group.push(RenderItem::Clear(ClearItem {
        x: (state.x + x - fs * 0.5) / 2.0,
        y: y - TUPLET_GAP_RISE * fs,
        width: 0.5 * fs,
        height: 0.5 * fs,
    }));
    group.push(items::text(
        (state.x + x) / 2.0,
        y - TUPLET_NUMERAL_RISE * fs,
        tuplet.pitches.len().to_string(),
        TUPLET_NUMERAL * fs,
        TextAlign::Center,
    ));
    slot.emit(state, group);

    state.x = x;
}
