//! Shared constants for the jianpu renderer.
//!
//! Geometry is proportional: most values are factors of the font size
//! from [`Options`](crate::Options), so one layout scales to any size.

// ── Timeline ────────────────────────────────────────────────────────
pub(super) const WHOLE_NOTE_TICKS: f64 = 1024.0;
pub(super) const MAX_DENOMINATOR: u32 = 4096;

// ── Context factors (× font size) ───────────────────────────────────
pub(super) const LINE_HEIGHT: f64 = 1.5;
pub(super) const NOTATION_MARGIN: f64 = 0.25;
pub(super) const STROKE_WIDTH: f64 = 0.05;
pub(super) const DOT_SIZE: f64 = 0.08;

// ── Widths (× font size) ────────────────────────────────────────────
pub(super) const NOTE_WIDTH: f64 = 1.33;
pub(super) const DOT_WIDTH: f64 = 0.666;
pub(super) const ORNAMENT_STEP: f64 = 0.25;
pub(super) const ACCIDENTAL_SURCHARGE: f64 = 0.25;

// ── Glyph placement (× font size) ───────────────────────────────────
pub(super) const ANNOTATION_TEXT: f64 = 0.75;
pub(super) const BEAT_AFTER_MODE: f64 = 3.0;
pub(super) const MEASURE_NUMBER_SIZE: f64 = 0.4;
pub(super) const MEASURE_NUMBER_RISE: f64 = 0.666;
pub(super) const DURATION_DOT_Y: f64 = 0.75;
pub(super) const EXTENSION_Y: f64 = 0.7;
pub(super) const EXTENSION_START: f64 = 0.25;
pub(super) const EXTENSION_END: f64 = 0.75;
pub(super) const ORNAMENT_SCALE: f64 = 0.5;
pub(super) const SLUR_RISE_PER_OCTAVE: f64 = 0.25;
pub(super) const TUPLET_NUMERAL: f64 = 0.5;
pub(super) const TUPLET_NUMERAL_RISE: f64 = 0.66;
pub(super) const TUPLET_GAP_RISE: f64 = 0.75;
pub(super) const BEAT_GLYPH_SIZE: f64 = 0.75;

// ── Header block (× font size) ──────────────────────────────────────
pub(super) const TITLE_SIZE: f64 = 2.0;
pub(super) const CREDIT_SIZE: f64 = 0.75;

// ── Pitch glyph (× glyph size) ──────────────────────────────────────
pub(super) const ACCIDENTAL_SIZE: f64 = 0.75;
pub(super) const ACCIDENTAL_OFFSET: f64 = 0.25;
pub(super) const OCTAVE_DOT_OFFSET: f64 = 0.2;
pub(super) const OCTAVE_DOT_STEP: f64 = 0.25;

// ── Curves (× line height) ──────────────────────────────────────────
pub(super) const CURVE_HEIGHT: f64 = 0.5;

// ── Glyph text ──────────────────────────────────────────────────────
pub(super) const NATURAL_GLYPH: &str = "♮";
pub(super) const REST_GLYPH: &str = "0";
pub(super) const TEMPO_PREFIX: &str = "𝅘𝅥 = ";
pub(super) const KEY_PREFIX: &str = "1 = ";
