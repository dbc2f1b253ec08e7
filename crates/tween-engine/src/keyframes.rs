//! Tweenpoint (keyframe) selection
//!
//! A tweenpoint is a record the photographer edited by hand. The first and
//! last records of a sequence are always tweenpoints as well, so every other
//! record has a tweenpoint on each side of it.

use serde::Serialize;
use tracing::debug;

use crate::record::PhotoRecord;

/// Strictly ascending, deduplicated indices into a record sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tweenpoints(Vec<usize>);

impl Tweenpoints {
    /// Select the edited records plus both ends of the sequence.
    pub fn select(records: &[PhotoRecord]) -> Self {
        let Some(last) = records.len().checked_sub(1) else {
            return Self::default();
        };

        let mut indices: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.has_edits())
            .map(|(i, _)| i)
            .collect();
        debug!(edited = indices.len(), total = records.len(), "selected edited records");

        indices.push(0);
        indices.push(last);
        Self::new(indices)
    }

    /// Build from arbitrary indices, sorting and deduplicating them.
    pub fn new(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The nearest tweenpoints strictly before and strictly after `index`.
    ///
    /// `None` when `index` is itself a tweenpoint or lies outside the span.
    pub fn enclosing(&self, index: usize) -> Option<(usize, usize)> {
        let after = match self.0.binary_search(&index) {
            Ok(_) => return None,
            Err(pos) => pos,
        };

        let start = *self.0.get(after.checked_sub(1)?)?;
        let end = *self.0.get(after)?;
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Parameter;
    use crate::test_support::{record, record_text};

    #[test]
    fn test_boundaries_always_selected() {
        let records: Vec<_> = (0..5).map(|i| record(i * 10, "1/250", "8", &[])).collect();
        let tp = Tweenpoints::select(&records);
        assert_eq!(tp.indices(), &[0, 4]);
    }

    #[test]
    fn test_edited_records_selected() {
        let records = vec![
            record(0, "1/250", "8", &[]),
            record(10, "1/250", "8", &[(Parameter::Exposure, 1.0)]),
            record(20, "1/250", "8", &[]),
            record(30, "1/250", "8", &[(Parameter::Tint, 5.0)]),
            record(40, "1/250", "8", &[(Parameter::Contrast, 5.0)]),
        ];
        let tp = Tweenpoints::select(&records);
        assert_eq!(tp.indices(), &[0, 1, 3, 4]);
        assert!(tp.contains(3));
        assert!(!tp.contains(2));
    }

    #[test]
    fn test_edits_detected_without_raw_file_name() {
        let records: Vec<_> = [(0, 0.0), (10, 1.5), (20, 0.0)]
            .into_iter()
            .map(|(t, exposure)| {
                let text = record_text(t, "1/250", "8", &[(Parameter::Exposure, exposure)]).replace(
                    &format!("   crs:RawFileName=\"DSC_{:04}.NEF\"\n", t),
                    "",
                );
                PhotoRecord::parse(&text).unwrap()
            })
            .collect();

        assert!(records[1].has_edits());
        let tp = Tweenpoints::select(&records);
        assert_eq!(tp.indices(), &[0, 1, 2]);
        assert!(tp.contains(1));
    }

    #[test]
    fn test_single_record_sequence() {
        let records = vec![record(0, "1/250", "8", &[(Parameter::Exposure, 1.0)])];
        let tp = Tweenpoints::select(&records);
        assert_eq!(tp.indices(), &[0]);
        assert_eq!(tp.enclosing(0), None);
    }

    #[test]
    fn test_empty_sequence() {
        assert!(Tweenpoints::select(&[]).is_empty());
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let tp = Tweenpoints::new(vec![7, 0, 3, 7, 0]);
        assert_eq!(tp.indices(), &[0, 3, 7]);
        assert_eq!(tp.len(), 3);
    }

    #[test]
    fn test_enclosing() {
        let tp = Tweenpoints::new(vec![0, 3, 7]);
        assert_eq!(tp.enclosing(1), Some((0, 3)));
        assert_eq!(tp.enclosing(2), Some((0, 3)));
        assert_eq!(tp.enclosing(4), Some((3, 7)));
        assert_eq!(tp.enclosing(6), Some((3, 7)));
        assert_eq!(tp.enclosing(3), None);
        assert_eq!(tp.enclosing(8), None);
    }
}
