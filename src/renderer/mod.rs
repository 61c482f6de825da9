//! Jianpu renderer. Lays out a [`RenderSheet`] into positioned drawing
//! primitives.
//!
//! A pass walks the notations once, row by row. The row planner decides
//! where each row ends and how much justification margin it gets, then the
//! notation renderer places glyphs, beams, slurs and bar lines. Placement
//! problems are collected as [`Log`] entries and never abort the pass.

mod beams;
mod constants;
mod context;
mod diagnostics;
mod items;
mod layout;
mod notes;
mod pitch;
mod sheet;
mod slurs;
mod svg_builder;
mod timeline;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::model::*;
use constants::*;
use context::{RenderContext, RenderState};
use layout::{plan_row, RowContext};
use notes::{render_notation, MeasureState};
use timeline::{meter_at, MeasureClock, Meter};

pub use diagnostics::{Log, Severity};
pub use items::{
    ArcItem, BeatItem, BoundingBox, ClearItem, CurveItem, DotItem, LineItem, RenderItem, TextAlign,
    TextItem,
};
pub use sheet::{RenderNotation, RenderSheet};
pub use svg_builder::{paint_all, render_to_svg, repaint_notation, Painter, SvgPainter};

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderResult {
    /// Page width
    pub width: f64,
    /// Page height, including bottom padding
    pub height: f64,
    /// Every primitive of the page, in drawing order
    pub items: Vec<RenderItem>,
    /// Placement diagnostics, in the order they were found
    pub logs: Vec<Log>,
    /// Bounding box per notation, parallel to the sheet's notations
    pub notations: Vec<BoundingBox>,
}

impl RenderResult {
    pub fn errors(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter().filter(|log| log.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter().filter(|log| !log.is_error())
    }
}

/// Lay out the whole sheet.
///
/// Each notation's primitives and bounding box are written back into
/// `sheet` so single notations can be repainted later. Structural problems
/// (missing leading key or time signature, malformed durations or
/// pitches) are returned as errors before anything is placed.
pub fn render(sheet: &mut RenderSheet, options: &Options) -> Result<RenderResult> {
    sheet.check()?;

    let ctx = RenderContext::new(options);
    let mut state = RenderState::new(&ctx);
    log::debug!("rendering {} notations at width {}", sheet.len(), ctx.width);

    render_info(&ctx, &mut state, &sheet.info);

    let mut clock = MeasureClock::new(meter_at(&sheet.beats, 0));
    let mut measure = MeasureState::default();

    let mut start = 0;
    while start < sheet.len() {
        let row = plan_row(sheet, &ctx, start);
        if row.overflow {
            state
                .diagnostics
                .warning(row.start, "measure is wider than the row and overflows it");
        }
        render_row(&ctx, &mut state, sheet, &row, &mut clock, &mut measure);
        start = row.end + 1;
    }

    if !clock.is_measure_start() {
        let short = clock.meter().measure_ticks - clock.elapsed();
        state.diagnostics.error(
            sheet.len().saturating_sub(1),
            format!("measure duration: last measure is {short} ticks short"),
        );
    }
    state.slurs.finish(&mut state.diagnostics);

    let height = state.y + ctx.padding_y;
    Ok(RenderResult {
        width: ctx.width,
        height,
        items: state.items,
        logs: state.diagnostics.into_logs(),
        notations: sheet.notations.iter().map(|n| n.bounds).collect(),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Header block
// ═══════════════════════════════════════════════════════════════════════

fn render_info(ctx: &RenderContext, state: &mut RenderState, info: &Info) {
    let fs = ctx.font_size;
    let center = ctx.width / 2.0;
    let top = state.y;

    if !info.title.is_empty() {
        let size = TITLE_SIZE * fs;
        state.items.push(items::text(center, state.y, info.title.as_str(), size, TextAlign::Center));
        state.y += size * LINE_HEIGHT;
    }
    if !info.sub_title.is_empty() {
        state.items.push(items::text(center, state.y, info.sub_title.as_str(), fs, TextAlign::Center));
        state.y += ctx.line_height;
    }

    let size = CREDIT_SIZE * fs;
    for credit in [&info.artist, &info.copyright] {
        if credit.is_empty() {
            continue;
        }
        state.items.push(items::text(ctx.right_edge(), state.y, credit.as_str(), size, TextAlign::Right));
        state.y += size * LINE_HEIGHT;
    }

    if state.y > top {
        state.y += ctx.line_padding;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Rows
// ═══════════════════════════════════════════════════════════════════════

fn render_row(
    ctx: &RenderContext,
    state: &mut RenderState,
    sheet: &mut RenderSheet,
    row: &RowContext,
    clock: &mut MeasureClock,
    measure: &mut MeasureState,
) {
    let RenderSheet { modes, beats, bpms, notations, .. } = sheet;
    let annotations = Annotations { modes: &*modes, beats: &*beats, bpms: &*bpms };

    let row_top = state.y;
    state.y += row.header_lines as f64 * ctx.line_height;
    state.x = ctx.padding_x;

    for (offset, item) in notations[row.start..=row.end].iter_mut().enumerate() {
        let index = row.start + offset;
        state.notation = index;

        render_annotations(ctx, state, row, row_top, &annotations, clock);
        let ticks = render_notation(ctx, state, row, measure, item);

        let step = clock.advance(ticks);
        if step.beat_closed || step.measure_closed {
            flush_beams(state, measure);
        }
        if step.measure_closed {
            if let Some(over) = step.overrun {
                state.diagnostics.error(
                    index,
                    format!("measure duration: measure {} runs {over} ticks too long", state.measure + 1),
                );
            }
            render_divider(ctx, state, row);
            state.measure += 1;
            measure.reset();
        }
    }

    flush_beams(state, measure);
    state.y += ctx.line_height + ctx.line_padding;
    state.row += 1;
}

struct Annotations<'a> {
    modes: &'a BTreeMap<usize, Key>,
    beats: &'a BTreeMap<usize, Beat>,
    bpms: &'a BTreeMap<usize, u32>,
}

/// Key, time signature and tempo anchored at the current notation, drawn
/// on the row's header lines above the pen.
fn render_annotations(
    ctx: &RenderContext,
    state: &mut RenderState,
    row: &RowContext,
    row_top: f64,
    annotations: &Annotations<'_>,
    clock: &mut MeasureClock,
) {
    let fs = ctx.font_size;
    let index = state.notation;
    let mode = annotations.modes.get(&index);

    if let Some(key) = mode {
        let label = format!("{KEY_PREFIX}{}", key.text());
        state.items.push(items::text(state.x, row_top, label, ANNOTATION_TEXT * fs, TextAlign::Left));
    }

    if let Some(beat) = annotations.beats.get(&index) {
        if !clock.is_measure_start() {
            state
                .diagnostics
                .error(index, "time signature changes in the middle of a measure");
        }
        clock.set_meter(Meter::from_beat(beat));

        let x = if mode.is_some() { state.x + BEAT_AFTER_MODE * fs } else { state.x };
        state.items.push(RenderItem::Beat(BeatItem {
            x,
            y: row_top,
            numerator: beat.numerator.to_string(),
            denominator: beat.denominator.to_string(),
            font_size: BEAT_GLYPH_SIZE * fs,
            line_width: ctx.line_width,
        }));
    }

    if let Some(bpm) = annotations.bpms.get(&index) {
        let y = row_top + row.header_lines.saturating_sub(1) as f64 * ctx.line_height;
        let label = format!("{TEMPO_PREFIX}{bpm}");
        state.items.push(items::text(state.x, y, label, ANNOTATION_TEXT * fs, TextAlign::Left));
    }
}

fn flush_beams(state: &mut RenderState, measure: &mut MeasureState) {
    if !measure.beams.is_empty() {
        let lines = measure.beams.flush();
        state.items.extend(lines);
    }
}

/// Bar line after a closed measure, numbered with the measure it opens.
fn render_divider(ctx: &RenderContext, state: &mut RenderState, row: &RowContext) {
    let fs = ctx.font_size;
    let half = ctx.bar_width() / 2.0 + row.margin / 2.0;
    state.x += half;

    state.items.push(items::line(state.x, state.y, state.x, state.y + ctx.line_height, ctx.line_width));
    state.items.push(items::text(
        state.x,
        state.y - MEASURE_NUMBER_RISE * fs,
        (state.measure + 2).to_string(),
        MEASURE_NUMBER_SIZE * fs,
        TextAlign::Center,
    ));

    state.x += half;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarters(degrees: &[u8]) -> Vec<Notation> {
        degrees.iter().map(|&d| Note::new(Pitch::new(d), 4).into()).collect()
    }

    fn sheet_of(notations: Vec<Notation>) -> RenderSheet {
        RenderSheet::from(Sheet { notations, ..Sheet::default() })
    }

    #[test]
    fn pass_writes_bounds_back_into_sheet() {
        let mut sheet = sheet_of(quarters(&[1, 2, 3, 4]));
        let result = render(&mut sheet, &Options::default()).unwrap();

        assert_eq!(result.notations.len(), 4);
        for (slot, bounds) in sheet.notations.iter().zip(&result.notations) {
            assert_eq!(&slot.bounds, bounds);
            assert!(!slot.items.is_empty());
        }
    }

    #[test]
    fn header_block_stacks_title_and_credits() {
        let mut sheet = sheet_of(quarters(&[1, 2, 3, 4]));
        sheet.info.sub_title = "folk song".into();
        sheet.info.artist = "trad.".into();
        let result = render(&mut sheet, &Options::default()).unwrap();

        let texts: Vec<&TextItem> = result
            .items
            .iter()
            .filter_map(|i| match i {
                RenderItem::Text(t) => Some(t),
                _ => None,
            })
            .take(3)
            .collect();
        assert_eq!(texts[0].text, "Unknown");
        assert_eq!(texts[0].size, 64.0);
        assert_eq!(texts[0].align, TextAlign::Center);
        assert_eq!(texts[1].text, "folk song");
        assert!(texts[1].y > texts[0].y);
        assert_eq!(texts[2].text, "trad.");
        assert_eq!(texts[2].align, TextAlign::Right);
        assert_eq!(texts[2].x, 1200.0);
    }

    #[test]
    fn annotations_share_the_first_header_line() {
        let mut sheet = sheet_of(quarters(&[1, 2, 3, 4]));
        let result = render(&mut sheet, &Options::default()).unwrap();

        let key = result
            .items
            .iter()
            .find_map(|i| match i {
                RenderItem::Text(t) if t.text.starts_with("1 = ") => Some(t),
                _ => None,
            })
            .unwrap();
        let beat = result
            .items
            .iter()
            .find_map(|i| match i {
                RenderItem::Beat(b) => Some(b),
                _ => None,
            })
            .unwrap();
        let tempo = result
            .items
            .iter()
            .find_map(|i| match i {
                RenderItem::Text(t) if t.text.ends_with("= 72") && !t.text.starts_with("1 = ") => Some(t),
                _ => None,
            })
            .unwrap();

        assert_eq!(key.text, "1 = A");
        assert_eq!(beat.y, key.y);
        assert_eq!(beat.x, key.x + 96.0);
        assert_eq!(beat.font_size, key.size);
        assert_eq!((beat.numerator.as_str(), beat.denominator.as_str()), ("4", "4"));
        assert_eq!(tempo.y, key.y + 48.0);
    }

    #[test]
    fn mid_measure_time_signature_is_reported_and_applied() {
        let mut sheet = sheet_of(quarters(&[1, 2, 3, 4, 5, 6]));
        sheet.beats.insert(1, Beat { notation: 1, numerator: 2, denominator: 4 });
        let result = render(&mut sheet, &Options::default()).unwrap();

        let errors: Vec<&Log> = result.errors().collect();
        assert!(errors.iter().any(|l| l.index == 1 && l.message.contains("middle of a measure")));
        // 1 quarter under 4/4 then 2/4 from notation 1: the measure closes
        // at notation 1, leaving two full 2/4 measures.
        assert!(!errors.iter().any(|l| l.message.contains("short")));
    }

    #[test]
    fn incomplete_last_measure_is_an_error() {
        let mut sheet = sheet_of(quarters(&[1, 2, 3]));
        let result = render(&mut sheet, &Options::default()).unwrap();
        let errors: Vec<&Log> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].index, 2);
        assert!(errors[0].message.starts_with("measure duration"));
    }

    #[test]
    fn structural_errors_abort_before_layout() {
        let mut sheet = sheet_of(quarters(&[1, 2, 3, 4]));
        sheet.modes.clear();
        assert!(render(&mut sheet, &Options::default()).is_err());
        assert!(sheet.notations.iter().all(|n| n.items.is_empty()));
    }
}
