//! Integration tests: read the sample sheets in the sheetmusic/ directory
//! and the JSON document shape.

use jianpu::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn sheetmusic_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("sheetmusic")
}

fn read_sample(name: &str) -> String {
    let path = sheetmusic_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

#[test]
fn parse_jasmine() {
    let sheet = parse_sheet(&read_sample("jasmine.json")).expect("Failed to parse jasmine.json");

    // Metadata
    assert_eq!(sheet.info.title, "Jasmine Flower");
    assert_eq!(sheet.info.sub_title, "Jiangsu folk song");
    assert_eq!(sheet.info.artist, "Traditional");

    // Annotations
    assert_eq!(sheet.modes, vec![Mode { notation: 0, value: Key::F }]);
    assert_eq!(sheet.beats, vec![Beat { notation: 0, numerator: 2, denominator: 4 }]);
    assert_eq!(sheet.bpms, vec![Bpm { notation: 0, bpm: 88 }]);
    assert_eq!(sheet.repeats, vec![Repeat { from: 0, to: 1, count: 2 }]);

    // Notations
    assert_eq!(sheet.notations.len(), 22);
    assert_eq!(
        sheet.notations[3],
        Notation::Note(Note::new(Pitch::new(6), 8).with_slur(Slur::Start))
    );
    assert_eq!(
        sheet.notations[4],
        Notation::Note(Note::new(Pitch::new(1).with_octave(1), 16))
    );
    assert_eq!(
        sheet.notations[6],
        Notation::Note(Note::new(Pitch::new(5), 4).with_ornaments(vec![Pitch::new(6)]))
    );
    assert_eq!(sheet.notations[11], Notation::Note(Note::new(Pitch::new(3), 8).dotted()));
    assert_eq!(
        sheet.notations[14],
        Notation::Tuplet(Tuplet::new(4, vec![Pitch::new(1), Pitch::new(2), Pitch::new(3)]))
    );
    assert_eq!(
        sheet.notations[15],
        Notation::Note(Note::new(Pitch::new(4).with_accidental(1), 8))
    );
    assert_eq!(sheet.notations[18], Notation::Rest(Rest::new(4)));
}

#[test]
fn jasmine_survives_json_round_trip() {
    let sheet = parse_sheet(&read_sample("jasmine.json")).unwrap();
    let json = sheet_to_json(&sheet).unwrap();
    assert_eq!(parse_sheet(&json).unwrap(), sheet);
}

#[test]
fn render_sheet_converts_back() {
    let sheet = parse_sheet(&read_sample("jasmine.json")).unwrap();
    assert_eq!(RenderSheet::from(sheet.clone()).to_sheet(), sheet);
}

#[test]
fn notation_wire_format() {
    let note = Notation::Note(Note::new(Pitch::new(2).with_accidental(-1), 8).with_slur(Slur::End));
    let value = serde_json::to_value(&note).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "type": 1,
            "time": 8,
            "dot": false,
            "pitch": { "base": 2, "accidental": -1, "octave": 0 },
            "slur": 2,
            "ornaments": []
        })
    );

    let rest = serde_json::to_value(Notation::Rest(Rest::new(2))).unwrap();
    assert_eq!(rest, serde_json::json!({ "type": 2, "time": 2, "dot": false }));
}

#[test]
fn minimal_sheet_takes_defaults() {
    let json = r#"{
        "info": { "title": "  Scale  " },
        "notations": [{ "type": 1, "time": 4, "pitch": { "base": 1 } }]
    }"#;
    let sheet = parse_sheet(json).unwrap();
    assert_eq!(sheet.info.title, "  Scale  ");
    assert!(sheet.modes.is_empty());

    // Info strings are trimmed on the render side.
    let render_sheet = RenderSheet::from(sheet);
    assert_eq!(render_sheet.info.title, "Scale");
    assert!(matches!(render_sheet.check(), Err(Error::MissingMode)));
}

#[test]
fn malformed_notations_are_rejected() {
    let missing_pitch = r#"{ "info": {}, "notations": [{ "type": 1, "time": 4 }] }"#;
    assert!(matches!(parse_sheet(missing_pitch), Err(Error::Json(_))));

    let unknown_type = r#"{ "info": {}, "notations": [{ "type": 4, "time": 4 }] }"#;
    assert!(matches!(parse_sheet(unknown_type), Err(Error::Json(_))));

    let unknown_key = r#"{ "info": {}, "notations": [], "modes": [{ "notation": 0, "value": 12 }] }"#;
    assert!(parse_sheet(unknown_key).is_err());
}

#[test]
fn default_sheet_renders_cleanly() {
    let mut sheet = RenderSheet::from(Sheet::default());
    let result = render(&mut sheet, &Options::default()).unwrap();
    assert!(result.logs.is_empty());
    assert_eq!(result.notations.len(), 4);
    assert!(result.items.iter().any(|i| matches!(i, RenderItem::Text(t) if t.text == "Unknown")));
}
