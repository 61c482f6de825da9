//! Tick arithmetic over the notation sequence.
//!
//! A whole note is [`WHOLE_NOTE_TICKS`] ticks. Ticks are kept as `f64`:
//! every legal duration (powers of two down to 1/4096, optionally dotted)
//! is exactly representable, so comparisons against measure boundaries
//! are exact.

use std::collections::BTreeMap;

use crate::model::*;
use super::constants::*;

pub(super) type Ticks = f64;

/// Measure and beat length for the active time signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Meter {
    pub(super) measure_ticks: Ticks,
    pub(super) beat_ticks: Ticks,
}

impl Meter {
    pub(super) fn from_beat(beat: &Beat) -> Self {
        let beat_ticks = WHOLE_NOTE_TICKS / beat.denominator as f64;
        Self {
            measure_ticks: beat_ticks * beat.numerator as f64,
            beat_ticks,
        }
    }
}

/// The meter in effect at `index`: the closest time signature anchored at
/// or before it. Falls back to 4/4 when the map is empty.
pub(super) fn meter_at(beats: &BTreeMap<usize, Beat>, index: usize) -> Meter {
    beats
        .range(..=index)
        .next_back()
        .map(|(_, beat)| Meter::from_beat(beat))
        .unwrap_or(Meter {
            measure_ticks: WHOLE_NOTE_TICKS,
            beat_ticks: WHOLE_NOTE_TICKS / 4.0,
        })
}

/// Tick length of one notation.
///
/// Dotting multiplies a note's length by 1.5, except on whole and half
/// notes where the dot is ignored (see [`has_invalid_dot`]). A rest's dot
/// is always ignored. A tuplet occupies its denominator's length as a
/// whole group.
pub(super) fn notation_ticks(notation: &Notation) -> Ticks {
    let base = WHOLE_NOTE_TICKS / notation.denominator() as f64;
    match notation {
        Notation::Note(note) if note.dotted && note.denominator >= 4 => base * 1.5,
        _ => base,
    }
}

/// A dot on a whole or half note has no effect and is reported.
pub(super) fn has_invalid_dot(notation: &Notation) -> bool {
    matches!(notation, Notation::Note(note) if note.dotted && note.denominator < 4)
}

/// Number of beam lines under a duration: 8 → 1, 16 → 2, 32 → 3, …
/// Non power-of-two denominators get none.
pub(super) fn beam_count(denominator: u32) -> usize {
    if denominator > 4 && denominator.is_power_of_two() {
        denominator.trailing_zeros() as usize - 2
    } else {
        0
    }
}

/// Number of extension ties drawn after a whole (3) or half (1) value.
pub(super) fn extension_count(denominator: u32) -> usize {
    match denominator {
        1 => 3,
        2 => 1,
        _ => 0,
    }
}

/// Result of feeding one notation's ticks into a [`MeasureClock`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(super) struct ClockStep {
    /// The running sum crossed at least one beat boundary
    pub(super) beat_closed: bool,
    /// The running sum reached the measure length; the clock has reset
    pub(super) measure_closed: bool,
    /// Ticks past the measure length, when the measure over-ran
    pub(super) overrun: Option<Ticks>,
}

/// Running tick sum within the current measure.
#[derive(Debug, Clone)]
pub(super) struct MeasureClock {
    meter: Meter,
    elapsed: Ticks,
    beats_done: u32,
}

impl MeasureClock {
    pub(super) fn new(meter: Meter) -> Self {
        Self { meter, elapsed: 0.0, beats_done: 0 }
    }

    pub(super) fn meter(&self) -> Meter {
        self.meter
    }

    pub(super) fn set_meter(&mut self, meter: Meter) {
        self.meter = meter;
    }

    pub(super) fn elapsed(&self) -> Ticks {
        self.elapsed
    }

    pub(super) fn is_measure_start(&self) -> bool {
        self.elapsed == 0.0
    }

    pub(super) fn advance(&mut self, ticks: Ticks) -> ClockStep {
        self.elapsed += ticks;

        let beat = (self.elapsed / self.meter.beat_ticks).floor() as u32;
        let beat_closed = beat > self.beats_done;
        if beat_closed {
            self.beats_done = beat;
        }

        if self.elapsed < self.meter.measure_ticks {
            return ClockStep { beat_closed, ..ClockStep::default() };
        }

        let overrun = self.elapsed - self.meter.measure_ticks;
        self.reset();
        ClockStep {
            beat_closed,
            measure_closed: true,
            overrun: (overrun > 0.0).then_some(overrun),
        }
    }

    pub(super) fn reset(&mut self) {
        self.elapsed = 0.0;
        self.beats_done = 0;
    }
}
