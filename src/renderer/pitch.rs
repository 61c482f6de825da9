//! Pitch glyphs: scale degree, accidental and octave dots.

use crate::model::Pitch;
use super::constants::*;
use super::context::RenderContext;
use super::items::{self, RenderItem, TextAlign};

/// Pitches placed so far in the current measure, most recent last.
#[derive(Debug, Default)]
pub(super) struct PitchHistory {
    placed: Vec<Pitch>,
}

impl PitchHistory {
    pub(super) fn record(&mut self, pitch: Pitch) {
        self.placed.push(pitch);
    }

    /// Most recent pitch with the same degree and octave.
    pub(super) fn last_same(&self, pitch: &Pitch) -> Option<&Pitch> {
        self.placed
            .iter()
            .rev()
            .find(|p| p.degree == pitch.degree && p.octave == pitch.octave)
    }

    pub(super) fn reset(&mut self) {
        self.placed.clear();
    }
}

fn accidental_text(accidental: i8) -> Option<&'static str> {
    match accidental {
        -2 => Some("𝄫"),
        -1 => Some("♭"),
        1 => Some("♯"),
        2 => Some("𝄪"),
        _ => None,
    }
}

/// Accidental glyph to show for `pitch`, given the most recent pitch of
/// the same degree and octave in this measure.
pub(super) fn accidental_glyph(prior: Option<&Pitch>, pitch: &Pitch) -> Option<&'static str> {
    match prior {
        None => accidental_text(pitch.accidental),
        Some(p) if p.accidental == pitch.accidental => None,
        Some(p) if p.accidental != 0 && pitch.accidental == 0 => Some(NATURAL_GLYPH),
        Some(_) => accidental_text(pitch.accidental),
    }
}

/// Build the glyphs of one pitch centered at `x`, top at `y`.
///
/// `scale` shrinks grace pitches; `bottom_padding` pushes low octave dots
/// below any beam lines.
pub(super) fn build_pitch(
    ctx: &RenderContext,
    pitch: &Pitch,
    scale: f64,
    x: f64,
    y: f64,
    history: &PitchHistory,
    bottom_padding: f64,
) -> Vec<RenderItem> {
    let size = ctx.font_size * scale;
    let mut out = vec![items::text(x, y, pitch.degree.to_string(), size, TextAlign::Center)];

    if let Some(glyph) = accidental_glyph(history.last_same(pitch), pitch) {
        out.push(items::text(
            x - size * ACCIDENTAL_OFFSET,
            y - size * ACCIDENTAL_OFFSET,
            glyph,
            size * ACCIDENTAL_SIZE,
            TextAlign::Right,
        ));
    }

    let (edge, dir) = if pitch.octave > 0 {
        (y, -1.0)
    } else {
        (y + size + bottom_padding, 1.0)
    };
    for i in 0..pitch.octave.unsigned_abs() {
        let offset = (OCTAVE_DOT_OFFSET + i as f64 * OCTAVE_DOT_STEP) * size;
        out.push(items::dot(x, edge + dir * offset, ctx.dot_size * scale));
    }

    out
}
