//! Slur tracking across notes and rows.

use super::constants::CURVE_HEIGHT;
use super::context::RenderContext;
use super::diagnostics::Diagnostics;
use super::items::{self, RenderItem};

/// Recorded position of a slur start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SlurAnchor {
    pub(super) x: f64,
    /// Top of the note, raised above any octave dots
    pub(super) y: f64,
    pub(super) row: usize,
    pub(super) index: usize,
}

/// At most one open slur at a time.
#[derive(Debug, Default)]
pub(super) struct SlurTracker {
    pending: Option<SlurAnchor>,
}

impl SlurTracker {
    #[cfg(test)]
    pub(super) fn pending(&self) -> Option<&SlurAnchor> {
        self.pending.as_ref()
    }

    pub(super) fn start(&mut self, anchor: SlurAnchor, diagnostics: &mut Diagnostics) {
        if let Some(open) = self.pending {
            diagnostics.error(
                anchor.index,
                format!("slur started while the slur from notation {} is still open", open.index),
            );
        }
        self.pending = Some(anchor);
    }

    /// Close the open slur at `end` and return its curves: one on the
    /// same row, or two when the slur wraps onto a later row.
    pub(super) fn end(
        &mut self,
        ctx: &RenderContext,
        end: SlurAnchor,
        diagnostics: &mut Diagnostics,
    ) -> Vec<RenderItem> {
        let Some(start) = self.pending.take() else {
            diagnostics.error(end.index, "slur end has no matching start");
            return Vec::new();
        };

        let height = CURVE_HEIGHT * ctx.line_height;
        if start.row == end.row {
            let y = start.y.min(end.y);
            return vec![items::curve(start.x, y, end.x, y, ctx.line_width, height)];
        }

        vec![
            items::curve(start.x, start.y, ctx.right_edge(), start.y, ctx.line_width, height),
            items::curve(ctx.padding_x, end.y, end.x, end.y, ctx.line_width, height),
        ]
    }

    /// Report a slur left open at the end of the score.
    pub(super) fn finish(&mut self, diagnostics: &mut Diagnostics) {
        if let Some(open) = self.pending.take() {
            diagnostics.error(open.index, "slur start has no matching end");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Options;
    use crate::renderer::diagnostics::Severity;

    fn anchor(x: f64, y: f64, row: usize, index: usize) -> SlurAnchor {
        SlurAnchor { x, y, row, index }
    }

    fn curve_count(items: &[RenderItem]) -> usize {
        items.iter().filter(|i| matches!(i, RenderItem::Curve(_))).count()
    }

    #[test]
    fn same_row_draws_one_curve_at_higher_point() {
        let ctx = RenderContext::new(&Options::default());
        let mut diag = Diagnostics::default();
        let mut slurs = SlurTracker::default();

        slurs.start(anchor(100.0, 40.0, 0, 0), &mut diag);
        let items = slurs.end(&ctx, anchor(300.0, 50.0, 0, 3), &mut diag);

        assert_eq!(curve_count(&items), 1);
        match &items[0] {
            RenderItem::Curve(c) => {
                assert_eq!((c.x, c.to_x), (100.0, 300.0));
                assert_eq!((c.y, c.to_y), (40.0, 40.0));
                assert_eq!(c.height, 24.0);
            }
            other => panic!("expected curve, got {other:?}"),
        }
        assert!(slurs.pending().is_none());
        assert!(diag.logs().is_empty());
    }

    #[test]
    fn cross_row_draws_two_curves() {
        let ctx = RenderContext::new(&Options::default());
        let mut diag = Diagnostics::default();
        let mut slurs = SlurTracker::default();

        slurs.start(anchor(1000.0, 40.0, 0, 7), &mut diag);
        let items = slurs.end(&ctx, anchor(200.0, 150.0, 1, 9), &mut diag);

        assert_eq!(curve_count(&items), 2);
        let RenderItem::Curve(first) = &items[0] else { panic!() };
        let RenderItem::Curve(second) = &items[1] else { panic!() };
        assert_eq!(first.to_x, ctx.right_edge());
        assert_eq!(second.x, ctx.padding_x);
        assert_eq!(second.to_y, 150.0);
    }

    #[test]
    fn end_without_start_is_an_error() {
        let ctx = RenderContext::new(&Options::default());
        let mut diag = Diagnostics::default();
        let mut slurs = SlurTracker::default();

        let items = slurs.end(&ctx, anchor(0.0, 0.0, 0, 2), &mut diag);
        assert!(items.is_empty());
        assert_eq!(diag.logs().len(), 1);
        assert_eq!(diag.logs()[0].index, 2);
        assert_eq!(diag.logs()[0].severity, Severity::Error);
    }

    #[test]
    fn second_start_overwrites_and_reports() {
        let mut diag = Diagnostics::default();
        let mut slurs = SlurTracker::default();

        slurs.start(anchor(10.0, 0.0, 0, 1), &mut diag);
        slurs.start(anchor(20.0, 0.0, 0, 2), &mut diag);
        assert_eq!(diag.logs().len(), 1);
        assert_eq!(slurs.pending().map(|a| a.index), Some(2));
    }

    #[test]
    fn unfinished_slur_reported_once() {
        let mut diag = Diagnostics::default();
        let mut slurs = SlurTracker::default();

        slurs.start(anchor(10.0, 0.0, 0, 4), &mut diag);
        slurs.finish(&mut diag);
        slurs.finish(&mut diag);
        assert_eq!(diag.logs().len(), 1);
        assert_eq!(diag.logs()[0].index, 4);
    }
}
