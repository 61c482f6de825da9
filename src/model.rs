//! Data model for a numbered-notation (jianpu) sheet.
//!
//! These structures mirror the JSON document exchanged with the editor:
//! a flat list of notations plus sparse, index-anchored annotations for
//! key, time signature and tempo.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// A complete sheet document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Title block
    pub info: Info,
    /// Notes, rests and tuplets in score order
    pub notations: Vec<Notation>,
    /// Repeat spans (carried through, not typeset)
    #[serde(default)]
    pub repeats: Vec<Repeat>,
    /// Tempo annotations
    #[serde(default)]
    pub bpms: Vec<Bpm>,
    /// Time signature annotations
    #[serde(default)]
    pub beats: Vec<Beat>,
    /// Key annotations
    #[serde(default)]
    pub modes: Vec<Mode>,
}

impl Default for Sheet {
    fn default() -> Self {
        Self {
            info: Info {
                title: "Unknown".into(),
                ..Info::default()
            },
            notations: vec![Notation::Rest(Rest::new(4)); 4],
            repeats: Vec::new(),
            bpms: vec![Bpm { notation: 0, bpm: 72 }],
            beats: vec![Beat { notation: 0, numerator: 4, denominator: 4 }],
            modes: vec![Mode { notation: 0, value: Key::A }],
        }
    }
}

/// Title block shown above the first row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Info {
    pub title: String,
    pub sub_title: String,
    pub artist: String,
    pub copyright: String,
}

/// A repeated span of measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    /// First measure of the span
    pub from: usize,
    /// Last measure of the span
    pub to: usize,
    /// Number of times the span is played
    pub count: u32,
}

/// Time signature anchored at a notation index.
///
/// A time signature change must start on the first notation of a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beat {
    pub notation: usize,
    pub numerator: u32,
    pub denominator: u32,
}

/// Tempo anchored at a notation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bpm {
    pub notation: usize,
    pub bpm: u32,
}

/// Key anchored at a notation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub notation: usize,
    pub value: Key,
}

/// The twelve key spellings, encoded 0–11 starting from A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Key {
    A = 0,
    BFlat = 1,
    B = 2,
    C = 3,
    CSharp = 4,
    D = 5,
    DSharp = 6,
    E = 7,
    F = 8,
    FSharp = 9,
    G = 10,
    GSharp = 11,
}

impl Key {
    /// Display spelling used in the "1 = X" key marker.
    pub fn text(self) -> &'static str {
        match self {
            Key::A => "A",
            Key::BFlat => "♭B",
            Key::B => "B",
            Key::C => "C",
            Key::CSharp => "♯C",
            Key::D => "D",
            Key::DSharp => "♯D",
            Key::E => "E",
            Key::F => "F",
            Key::FSharp => "♯F",
            Key::G => "G",
            Key::GSharp => "♯G",
        }
    }
}

/// A scale-degree pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    /// Scale degree 1–7
    #[serde(rename = "base")]
    pub degree: u8,
    /// -2 double flat, -1 flat, 0 none, 1 sharp, 2 double sharp
    #[serde(default)]
    pub accidental: i8,
    /// Octaves above (positive) or below (negative) the middle octave
    #[serde(default)]
    pub octave: i8,
}

impl Pitch {
    pub fn new(degree: u8) -> Self {
        Self { degree, accidental: 0, octave: 0 }
    }

    pub fn with_accidental(mut self, accidental: i8) -> Self {
        self.accidental = accidental;
        self
    }

    pub fn with_octave(mut self, octave: i8) -> Self {
        self.octave = octave;
        self
    }
}

/// Slur marker carried by a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Slur {
    #[default]
    None = 0,
    Start = 1,
    End = 2,
}

/// One symbolic event in the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNotation", into = "RawNotation")]
pub enum Notation {
    Note(Note),
    Rest(Rest),
    Tuplet(Tuplet),
}

impl Notation {
    /// Duration denominator: 1 = whole, 2 = half, 4 = quarter, …
    pub fn denominator(&self) -> u32 {
        match self {
            Notation::Note(n) => n.denominator,
            Notation::Rest(r) => r.denominator,
            Notation::Tuplet(t) => t.denominator,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Notation::Note(_) => "note",
            Notation::Rest(_) => "rest",
            Notation::Tuplet(_) => "tuplet",
        }
    }
}

impl From<Note> for Notation {
    fn from(note: Note) -> Self {
        Notation::Note(note)
    }
}

impl From<Rest> for Notation {
    fn from(rest: Rest) -> Self {
        Notation::Rest(rest)
    }
}

impl From<Tuplet> for Notation {
    fn from(tuplet: Tuplet) -> Self {
        Notation::Tuplet(tuplet)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub pitch: Pitch,
    pub denominator: u32,
    pub dotted: bool,
    pub slur: Slur,
    /// Grace pitches drawn before the note
    pub ornaments: Vec<Pitch>,
}

impl Note {
    pub fn new(pitch: Pitch, denominator: u32) -> Self {
        Self {
            pitch,
            denominator,
            dotted: false,
            slur: Slur::None,
            ornaments: Vec::new(),
        }
    }

    pub fn dotted(mut self) -> Self {
        self.dotted = true;
        self
    }

    pub fn with_slur(mut self, slur: Slur) -> Self {
        self.slur = slur;
        self
    }

    pub fn with_ornaments(mut self, ornaments: Vec<Pitch>) -> Self {
        self.ornaments = ornaments;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rest {
    pub denominator: u32,
    /// Accepted for compatibility; a rest's dot has no effect
    pub dotted: bool,
}

impl Rest {
    pub fn new(denominator: u32) -> Self {
        Self { denominator, dotted: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tuplet {
    /// Denominator of the whole group's duration
    pub denominator: u32,
    pub pitches: Vec<Pitch>,
}

impl Tuplet {
    pub fn new(denominator: u32, pitches: Vec<Pitch>) -> Self {
        Self { denominator, pitches }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Wire format
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
enum NotationKind {
    Note = 1,
    Rest = 2,
    Tuplet = 3,
}

/// Flat JSON shape of a notation: `{ type, time, dot, slur, pitch, … }`.
#[derive(Serialize, Deserialize)]
struct RawNotation {
    #[serde(rename = "type")]
    kind: NotationKind,
    time: u32,
    #[serde(default)]
    dot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pitch: Option<Pitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slur: Option<Slur>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ornaments: Option<Vec<Pitch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pitches: Option<Vec<Pitch>>,
}

impl TryFrom<RawNotation> for Notation {
    type Error = String;

    fn try_from(raw: RawNotation) -> Result<Self, Self::Error> {
        match raw.kind {
            NotationKind::Note => {
                let pitch = raw.pitch.ok_or_else(|| "note is missing its pitch".to_string())?;
                Ok(Notation::Note(Note {
                    pitch,
                    denominator: raw.time,
                    dotted: raw.dot,
                    slur: raw.slur.unwrap_or_default(),
                    ornaments: raw.ornaments.unwrap_or_default(),
                }))
            }
            NotationKind::Rest => Ok(Notation::Rest(Rest {
                denominator: raw.time,
                dotted: raw.dot,
            })),
            NotationKind::Tuplet => Ok(Notation::Tuplet(Tuplet {
                denominator: raw.time,
                pitches: raw.pitches.unwrap_or_default(),
            })),
        }
    }
}

impl From<Notation> for RawNotation {
    fn from(notation: Notation) -> Self {
        match notation {
            Notation::Note(n) => RawNotation {
                kind: NotationKind::Note,
                time: n.denominator,
                dot: n.dotted,
                pitch: Some(n.pitch),
                slur: Some(n.slur),
                ornaments: Some(n.ornaments),
                pitches: None,
            },
            Notation::Rest(r) => RawNotation {
                kind: NotationKind::Rest,
                time: r.denominator,
                dot: r.dotted,
                pitch: None,
                slur: None,
                ornaments: None,
                pitches: None,
            },
            Notation::Tuplet(t) => RawNotation {
                kind: NotationKind::Tuplet,
                time: t.denominator,
                dot: false,
                pitch: None,
                slur: None,
                ornaments: None,
                pitches: Some(t.pitches),
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Layout options
// ═══════════════════════════════════════════════════════════════════════

/// Page geometry and style for a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Page width in user units
    pub width: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    #[serde(alias = "fontsize")]
    pub font_size: f64,
    /// Vertical gap between rows
    pub line_padding: f64,
    pub style: SheetStyle,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            width: 1280.0,
            padding_x: 80.0,
            padding_y: 100.0,
            font_size: 32.0,
            line_padding: 40.0,
            style: SheetStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetStyle {
    pub font: String,
    pub fill_color: String,
    pub background_color: String,
}

impl Default for SheetStyle {
    fn default() -> Self {
        Self {
            font: "arial".into(),
            fill_color: "#333333".into(),
            background_color: "#ffffff".into(),
        }
    }
}
