//! The render-side view of a sheet: annotations as index-keyed maps and
//! one [`RenderNotation`] slot per notation for its primitives and box.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::*;
use super::constants::MAX_DENOMINATOR;
use super::items::{BoundingBox, RenderItem};

/// A notation together with the output of its last layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNotation {
    pub notation: Notation,
    /// Primitives owned by this notation alone (beams and slurs that span
    /// several notations are not included)
    pub items: Vec<RenderItem>,
    pub bounds: BoundingBox,
}

impl RenderNotation {
    pub fn new(notation: Notation) -> Self {
        Self {
            notation,
            items: Vec::new(),
            bounds: BoundingBox::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSheet {
    pub info: Info,
    pub repeats: Vec<Repeat>,
    pub modes: BTreeMap<usize, Key>,
    pub beats: BTreeMap<usize, Beat>,
    pub bpms: BTreeMap<usize, u32>,
    pub notations: Vec<RenderNotation>,
}

impl From<Sheet> for RenderSheet {
    fn from(sheet: Sheet) -> Self {
        let info = Info {
            title: sheet.info.title.trim().to_string(),
            sub_title: sheet.info.sub_title.trim().to_string(),
            artist: sheet.info.artist.trim().to_string(),
            copyright: sheet.info.copyright.trim().to_string(),
        };

        // Later entries for the same index win.
        Self {
            info,
            repeats: sheet.repeats,
            modes: sheet.modes.iter().map(|m| (m.notation, m.value)).collect(),
            beats: sheet.beats.iter().map(|b| (b.notation, *b)).collect(),
            bpms: sheet.bpms.iter().map(|b| (b.notation, b.bpm)).collect(),
            notations: sheet.notations.into_iter().map(RenderNotation::new).collect(),
        }
    }
}

impl RenderSheet {
    /// Convert back to the plain document shape.
    pub fn to_sheet(&self) -> Sheet {
        Sheet {
            info: self.info.clone(),
            notations: self.notations.iter().map(|n| n.notation.clone()).collect(),
            repeats: self.repeats.clone(),
            bpms: self
                .bpms
                .iter()
                .map(|(&notation, &bpm)| Bpm { notation, bpm })
                .collect(),
            beats: self
                .beats
                .iter()
                .map(|(&notation, beat)| Beat { notation, ..*beat })
                .collect(),
            modes: self
                .modes
                .iter()
                .map(|(&notation, &value)| Mode { notation, value })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.notations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notations.is_empty()
    }

    pub fn notation(&self, index: usize) -> Option<&RenderNotation> {
        self.notations.get(index)
    }

    /// Replace one notation. Its primitives and box are cleared until the
    /// next layout pass.
    pub fn set_notation(&mut self, index: usize, notation: Notation) -> Result<()> {
        let len = self.notations.len();
        let slot = self
            .notations
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = RenderNotation::new(notation);
        Ok(())
    }

    /// Index of the notation whose box contains the point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.notations.iter().position(|n| n.bounds.contains(x, y))
    }

    /// Check the preconditions a layout pass relies on.
    pub fn check(&self) -> Result<()> {
        if !self.modes.contains_key(&0) {
            return Err(Error::MissingMode);
        }
        if !self.beats.contains_key(&0) {
            return Err(Error::MissingBeat);
        }

        for (&index, beat) in &self.beats {
            if beat.numerator == 0 || !is_valid_denominator(beat.denominator) {
                return Err(Error::InvalidBeat {
                    index,
                    numerator: beat.numerator,
                    denominator: beat.denominator,
                });
            }
        }

        for (index, item) in self.notations.iter().enumerate() {
            check_notation(&item.notation)
                .map_err(|reason| Error::InvalidNotation { index, reason })?;
        }

        Ok(())
    }
}

fn is_valid_denominator(denominator: u32) -> bool {
    denominator.is_power_of_two() && denominator <= MAX_DENOMINATOR
}

fn check_pitch(pitch: &Pitch) -> Result<(), String> {
    if !(1..=7).contains(&pitch.degree) {
        return Err(format!("scale degree {} is outside 1-7", pitch.degree));
    }
    if !(-2..=2).contains(&pitch.accidental) {
        return Err(format!("accidental {} is outside -2..2", pitch.accidental));
    }
    Ok(())
}

fn check_notation(notation: &Notation) -> Result<(), String> {
    let denominator = notation.denominator();
    if !is_valid_denominator(denominator) {
        return Err(format!(
            "{} duration 1/{denominator} is not a power of two up to 1/{MAX_DENOMINATOR}",
            notation.kind_name()
        ));
    }

    match notation {
        Notation::Note(note) => {
            check_pitch(&note.pitch)?;
            note.ornaments.iter().try_for_each(check_pitch)
        }
        Notation::Rest(_) => Ok(()),
        Notation::Tuplet(tuplet) => {
            if tuplet.pitches.is_empty() {
                return Err("tuplet has no pitches".into());
            }
            tuplet.pitches.iter().try_for_each(check_pitch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_sheet_trims_info_and_keys_annotations() {
        let mut sheet = Sheet::default();
        sheet.info.title = "  Jasmine  ".into();
        sheet.beats.push(Beat { notation: 2, numerator: 3, denominator: 4 });

        let rs = RenderSheet::from(sheet);
        assert_eq!(rs.info.title, "Jasmine");
        assert_eq!(rs.beats[&2].numerator, 3);
        assert_eq!(rs.modes[&0], Key::A);
        assert_eq!(rs.bpms[&0], 72);
        assert_eq!(rs.len(), 4);
    }

    #[test]
    fn to_sheet_restores_annotation_arrays() {
        let sheet = Sheet::default();
        let rs = RenderSheet::from(sheet.clone());
        assert_eq!(rs.to_sheet(), sheet);
    }

    #[test]
    fn check_requires_leading_mode_and_beat() {
        let mut sheet = Sheet::default();
        sheet.modes[0].notation = 1;
        assert!(matches!(RenderSheet::from(sheet).check(), Err(Error::MissingMode)));

        let mut sheet = Sheet::default();
        sheet.beats.clear();
        assert!(matches!(RenderSheet::from(sheet).check(), Err(Error::MissingBeat)));
    }

    #[test]
    fn check_rejects_bad_notations() {
        let mut sheet = Sheet::default();
        sheet.notations[1] = Note::new(Pitch::new(1), 3).into();
        assert!(matches!(
            RenderSheet::from(sheet).check(),
            Err(Error::InvalidNotation { index: 1, .. })
        ));

        let mut sheet = Sheet::default();
        sheet.notations[2] = Note::new(Pitch::new(8), 4).into();
        assert!(matches!(
            RenderSheet::from(sheet).check(),
            Err(Error::InvalidNotation { index: 2, .. })
        ));

        let mut sheet = Sheet::default();
        sheet.notations[0] = Tuplet::new(4, vec![]).into();
        assert!(RenderSheet::from(sheet).check().is_err());
    }

    #[test]
    fn set_notation_checks_range() {
        let mut rs = RenderSheet::from(Sheet::default());
        assert!(rs.set_notation(3, Note::new(Pitch::new(5), 4).into()).is_ok());
        assert!(matches!(
            rs.set_notation(4, Rest::new(4).into()),
            Err(Error::IndexOutOfRange { index: 4, len: 4 })
        ));
    }
}
