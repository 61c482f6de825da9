//! Row planning: decides how many notations go on each row and how much
//! justification margin each stretchable item receives.
//!
//! Rows break only where a measure closes. The last row of the score is
//! left unjustified.

use super::context::RenderContext;
use super::sheet::RenderSheet;
use super::timeline::{meter_at, notation_ticks, Meter};

/// How one row is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowContext {
    /// First notation on the row
    pub start: usize,
    /// Last notation on the row (inclusive)
    pub end: usize,
    /// Measures closed on the row
    pub measure_count: usize,
    /// Planned width of the content and the bar lines before the last one,
    /// without justification
    pub used_width: f64,
    /// Extra spacing per stretchable item
    pub margin: f64,
    /// Annotation lines reserved above the row
    pub header_lines: usize,
    /// The row's single measure is wider than the usable width
    pub overflow: bool,
}

/// Plan the row starting at notation `start`.
pub(super) fn plan_row(sheet: &RenderSheet, ctx: &RenderContext, start: usize) -> RowContext {
    let notations = &sheet.notations;
    let mut meter: Meter = meter_at(&sheet.beats, start);

    let mut used = 0.0;
    let mut items = 0usize;
    let mut measures = 0usize;
    let mut elapsed = 0.0;
    let mut overflow = false;
    let mut committed: Option<RowContext> = None;

    for (i, item) in notations.iter().enumerate().skip(start) {
        if let Some(beat) = sheet.beats.get(&i) {
            meter = Meter::from_beat(beat);
        }

        let (width, count) = ctx.measure_notation(&item.notation);
        used += width;
        items += count;

        if used > ctx.usable_width {
            if let Some(row) = committed {
                return with_header_lines(sheet, row);
            }
            overflow = true;
        }

        elapsed += notation_ticks(&item.notation);
        if elapsed < meter.measure_ticks {
            continue;
        }

        // The bar line stretches with the row but its width only counts
        // toward the measures that follow it.
        elapsed = 0.0;
        measures += 1;
        items += 1;

        let margin = if overflow || used >= ctx.usable_width {
            0.0
        } else {
            (ctx.usable_width - used) / (items as f64 + 0.5)
        };
        let row = RowContext {
            start,
            end: i,
            measure_count: measures,
            used_width: used,
            margin,
            header_lines: 0,
            overflow,
        };
        if overflow {
            return with_header_lines(sheet, row);
        }
        committed = Some(row);
        used += ctx.bar_width();
    }

    // Ran out of notations before the row filled up.
    let row = RowContext {
        start,
        end: notations.len().saturating_sub(1).max(start),
        measure_count: measures,
        used_width: used,
        margin: 0.0,
        header_lines: 0,
        overflow,
    };
    with_header_lines(sheet, row)
}

fn with_header_lines(sheet: &RenderSheet, mut row: RowContext) -> RowContext {
    let range = row.start..=row.end;
    let signature = sheet.modes.range(range.clone()).next().is_some()
        || sheet.beats.range(range.clone()).next().is_some();
    let tempo = sheet.bpms.range(range).next().is_some();
    row.header_lines = signature as usize + tempo as usize;

    log::debug!(
        "row {}..={}: {} measures, used {:.1}, margin {:.2}",
        row.start, row.end, row.measure_count, row.used_width, row.margin
    );
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    fn quarters(count: usize) -> Vec<Notation> {
        (0..count)
            .map(|i| Note::new(Pitch::new((i % 7) as u8 + 1), 4).into())
            .collect()
    }

    fn sheet_of(notations: Vec<Notation>) -> RenderSheet {
        RenderSheet::from(Sheet {
            notations,
            bpms: Vec::new(),
            ..Sheet::default()
        })
    }

    fn narrow(width: f64) -> RenderContext {
        RenderContext::new(&Options { width, ..Options::default() })
    }

    #[test]
    fn short_score_is_one_unjustified_row() {
        let sheet = sheet_of(quarters(4));
        let ctx = narrow(1280.0);
        let row = plan_row(&sheet, &ctx, 0);
        assert_eq!((row.start, row.end), (0, 3));
        assert_eq!(row.measure_count, 1);
        assert_eq!(row.margin, 0.0);
        assert_eq!(row.header_lines, 1);
    }

    #[test]
    fn rows_break_on_measure_boundaries() {
        // 4/4 quarters: 42.56 per note, ~204 per measure incl. bar line.
        let sheet = sheet_of(quarters(40));
        let ctx = narrow(160.0 + 500.0);

        let mut start = 0;
        while start < sheet.len() {
            let row = plan_row(&sheet, &ctx, start);
            assert!(row.end >= row.start);
            if row.end + 1 < sheet.len() {
                assert_eq!((row.end + 1) % 4, 0, "row ended inside a measure at {}", row.end);
                assert!(row.margin > 0.0);
            }
            start = row.end + 1;
        }
    }

    #[test]
    fn margin_spreads_remaining_width() {
        let sheet = sheet_of(quarters(40));
        let ctx = narrow(160.0 + 500.0);
        let row = plan_row(&sheet, &ctx, 0);

        // Two measures fit: 8 heads and 2 bar lines.
        assert_eq!(row.end, 7);
        assert_eq!(row.measure_count, 2);
        let expected = (ctx.usable_width - row.used_width) / 10.5;
        assert!((row.margin - expected).abs() < 1e-9);
    }

    #[test]
    fn closing_bar_line_does_not_push_a_measure_off_the_row() {
        // Two measures of content take 374.48; with their closing bar line
        // they would not fit in 390.
        let sheet = sheet_of(quarters(12));
        let ctx = narrow(160.0 + 390.0);
        let row = plan_row(&sheet, &ctx, 0);

        assert_eq!(row.end, 7);
        assert_eq!(row.measure_count, 2);
        assert!((row.used_width - (8.0 * 42.56 + 34.0)).abs() < 1e-9);
        let expected = (390.0 - row.used_width) / 10.5;
        assert!((row.margin - expected).abs() < 1e-9);
    }

    #[test]
    fn oversized_measure_gets_its_own_row() {
        let sheet = sheet_of(quarters(8));
        let ctx = narrow(160.0 + 100.0);

        let row = plan_row(&sheet, &ctx, 0);
        assert_eq!(row.end, 3);
        assert!(row.overflow);
        assert_eq!(row.margin, 0.0);

        let next = plan_row(&sheet, &ctx, 4);
        assert_eq!(next.start, 4);
        assert_eq!(next.end, 7);
    }

    #[test]
    fn planner_follows_time_signature_changes() {
        let mut sheet = sheet_of(quarters(7));
        sheet.beats.insert(4, Beat { notation: 4, numerator: 3, denominator: 4 });
        let ctx = narrow(160.0 + 300.0);

        // First row holds the 4/4 measure only; the 3/4 measure follows.
        let row = plan_row(&sheet, &ctx, 0);
        assert_eq!(row.end, 3);
        let next = plan_row(&sheet, &ctx, 4);
        assert_eq!(next.end, 6);
        assert_eq!(next.measure_count, 1);
        assert_eq!(next.header_lines, 1);
    }

    #[test]
    fn tempo_adds_a_header_line() {
        let mut sheet = sheet_of(quarters(4));
        sheet.bpms.insert(0, 96);
        let row = plan_row(&sheet, &narrow(1280.0), 0);
        assert_eq!(row.header_lines, 2);
    }
}
