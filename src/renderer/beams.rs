//! Beam (underline) merging.
//!
//! Each note or rest shorter than a quarter registers one short segment
//! per beam level. Segments are buffered until a beat or measure ends,
//! then segments of consecutive notations on the same level are joined
//! into one continuous line.

use super::items::{self, RenderItem};

/// A beam line owned by the notations `first..=last` at one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct BeamSegment {
    pub(super) first: usize,
    pub(super) last: usize,
    pub(super) level: usize,
    pub(super) x1: f64,
    pub(super) x2: f64,
    pub(super) y: f64,
    pub(super) width: f64,
}

impl BeamSegment {
    pub(super) fn new(index: usize, level: usize, x1: f64, x2: f64, y: f64, width: f64) -> Self {
        Self { first: index, last: index, level, x1, x2, y, width }
    }

    pub(super) fn to_item(&self) -> RenderItem {
        items::line(self.x1, self.y, self.x2, self.y, self.width)
    }
}

/// Per-beat buffer of unmerged segments.
#[derive(Debug, Default)]
pub(super) struct BeamBuffer {
    segments: Vec<BeamSegment>,
}

impl BeamBuffer {
    pub(super) fn register(&mut self, segment: BeamSegment) {
        self.segments.push(segment);
    }

    pub(super) fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Merge everything buffered and clear the buffer.
    pub(super) fn flush(&mut self) -> Vec<RenderItem> {
        let merged = merge_segments(&self.segments);
        self.reset();
        merged.iter().map(BeamSegment::to_item).collect()
    }

    pub(super) fn reset(&mut self) {
        self.segments.clear();
    }
}

/// Group by level (in first-seen order), sort each group by notation
/// index, and join runs of consecutive indices.
pub(super) fn merge_segments(segments: &[BeamSegment]) -> Vec<BeamSegment> {
    let mut levels: Vec<usize> = Vec::new();
    for s in segments {
        if !levels.contains(&s.level) {
            levels.push(s.level);
        }
    }

    let mut merged = Vec::with_capacity(segments.len());
    for level in levels {
        let mut group: Vec<BeamSegment> = segments.iter().filter(|s| s.level == level).copied().collect();
        group.sort_by_key(|s| s.first);

        let mut current: Option<BeamSegment> = None;
        for seg in group {
            current = match current {
                Some(mut run) if seg.first == run.last + 1 => {
                    run.last = seg.last;
                    run.x2 = seg.x2;
                    Some(run)
                }
                Some(run) => {
                    merged.push(run);
                    Some(seg)
                }
                None => Some(seg),
            };
        }
        merged.extend(current);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(index: usize, level: usize, x: f64) -> BeamSegment {
        BeamSegment::new(index, level, x - 5.0, x + 5.0, 100.0 + level as f64 * 4.0, 2.0)
    }

    #[test]
    fn consecutive_segments_join() {
        let merged = merge_segments(&[seg(3, 0, 10.0), seg(4, 0, 30.0), seg(5, 0, 50.0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].first, 3);
        assert_eq!(merged[0].last, 5);
        assert_eq!(merged[0].x1, 5.0);
        assert_eq!(merged[0].x2, 55.0);
    }

    #[test]
    fn index_gap_starts_new_segment() {
        let merged = merge_segments(&[seg(1, 0, 10.0), seg(3, 0, 50.0)]);
        assert_eq!(merged.len(), 2);
        assert_eq!((merged[0].first, merged[1].first), (1, 3));
    }

    #[test]
    fn sixteenth_then_eighth() {
        // 16th at index 0 has levels 0 and 1, the following 8th only level 0.
        let segments = [seg(0, 0, 10.0), seg(0, 1, 10.0), seg(1, 0, 30.0)];
        let merged = merge_segments(&segments);

        let level0: Vec<_> = merged.iter().filter(|s| s.level == 0).collect();
        let level1: Vec<_> = merged.iter().filter(|s| s.level == 1).collect();
        assert_eq!(level0.len(), 1);
        assert_eq!((level0[0].x1, level0[0].x2), (5.0, 35.0));
        assert_eq!(level1.len(), 1);
        assert_eq!((level1[0].x1, level1[0].x2), (5.0, 15.0));
    }

    #[test]
    fn unordered_input_is_sorted_by_index() {
        let merged = merge_segments(&[seg(2, 0, 50.0), seg(1, 0, 30.0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].x1, merged[0].x2), (25.0, 55.0));
    }

    #[test]
    fn merging_is_idempotent() {
        let segments = [
            seg(0, 0, 10.0),
            seg(0, 1, 10.0),
            seg(1, 0, 30.0),
            seg(1, 1, 30.0),
            seg(3, 0, 70.0),
        ];
        let once = merge_segments(&segments);
        let twice = merge_segments(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn flush_clears_buffer() {
        let mut buffer = BeamBuffer::default();
        buffer.register(seg(0, 0, 10.0));
        buffer.register(seg(1, 0, 30.0));
        let items = buffer.flush();
        assert_eq!(items.len(), 1);
        assert!(buffer.is_empty());
        assert!(buffer.flush().is_empty());
    }
}
