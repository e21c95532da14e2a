//! Partial/committed segment consolidation

use std::collections::HashMap;

use crate::domain::transcription::{
    SegmentPatch, TranscriptEvent, TranscriptSegment, TranslationStatus,
};

/// Separator between committed segment texts in the final transcript
const SEGMENT_SEPARATOR: &str = " ";

/// Merges the stream of partial/committed segment events into a stable
/// ordered transcript.
///
/// Committed segments form an append-only log in emission order; in-flight
/// partials live in a separate small set with replace-by-identifier
/// semantics. Translations are tracked per segment, keyed independently, so
/// out-of-order completion is fine.
#[derive(Debug, Default)]
pub struct SegmentConsolidator {
    committed: Vec<TranscriptSegment>,
    /// Segment id -> index into `committed`
    committed_index: HashMap<String, usize>,
    /// In-flight partials in arrival order; replaced in place by id
    partials: Vec<TranscriptSegment>,
}

impl SegmentConsolidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one transcriber event.
    /// Returns false when the event was stale and ignored (a partial for an
    /// already-committed segment, or a duplicate commit).
    pub fn apply(&mut self, event: TranscriptEvent) -> bool {
        match event {
            TranscriptEvent::Partial(patch) => self.apply_partial(patch),
            TranscriptEvent::Committed(patch) => self.apply_committed(patch),
        }
    }

    fn apply_partial(&mut self, patch: SegmentPatch) -> bool {
        // Committed segments are immutable; a late partial for one is stale
        if self.committed_index.contains_key(&patch.id) {
            return false;
        }
        if let Some(existing) = self.partials.iter_mut().find(|s| s.id == patch.id) {
            existing.text = patch.text;
            existing.speaker = patch.speaker;
            existing.timestamp_ms = patch.timestamp_ms;
        } else {
            self.partials.push(patch.into_segment(true));
        }
        true
    }

    fn apply_committed(&mut self, patch: SegmentPatch) -> bool {
        // Duplicate commits are ignored
        if self.committed_index.contains_key(&patch.id) {
            return false;
        }
        // Carry translation state over from the partial, if any
        let (translation, translation_status) =
            match self.partials.iter().position(|s| s.id == patch.id) {
                Some(pos) => {
                    let partial = self.partials.remove(pos);
                    (partial.translation, partial.translation_status)
                }
                None => (None, TranslationStatus::None),
            };

        let mut segment = patch.into_segment(false);
        segment.translation = translation;
        segment.translation_status = translation_status;

        self.committed_index
            .insert(segment.id.clone(), self.committed.len());
        self.committed.push(segment);
        true
    }

    /// Committed segments followed by in-flight partials, the live view
    pub fn merged_segments(&self) -> Vec<&TranscriptSegment> {
        self.committed.iter().chain(self.partials.iter()).collect()
    }

    /// Owned copy of the live view, for draft snapshots
    pub fn snapshot(&self) -> Vec<TranscriptSegment> {
        self.merged_segments().into_iter().cloned().collect()
    }

    /// Final transcript: committed texts in order, single-separator joined.
    /// Segments still partial at stop time are dropped, not guessed-complete.
    pub fn consolidate(&self) -> String {
        self.committed
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(SEGMENT_SEPARATOR)
    }

    /// Joined translations of committed segments that finished translating.
    /// None when no segment has a completed translation.
    pub fn consolidated_translation(&self) -> Option<String> {
        let done: Vec<&str> = self
            .committed
            .iter()
            .filter(|s| s.translation_status == TranslationStatus::Done)
            .filter_map(|s| s.translation.as_deref())
            .collect();
        if done.is_empty() {
            None
        } else {
            Some(done.join(SEGMENT_SEPARATOR))
        }
    }

    /// Mark a segment as submitted for translation
    pub fn mark_translation_pending(&mut self, segment_id: &str) {
        if let Some(segment) = self.find_mut(segment_id) {
            segment.translation_status = TranslationStatus::Pending;
        }
    }

    /// Record a translation outcome for a segment.
    /// A result for an unknown (already discarded) segment is dropped.
    pub fn set_translation(&mut self, segment_id: &str, result: Result<String, ()>) {
        if let Some(segment) = self.find_mut(segment_id) {
            match result {
                Ok(text) => {
                    segment.translation = Some(text);
                    segment.translation_status = TranslationStatus::Done;
                }
                Err(()) => {
                    segment.translation = None;
                    segment.translation_status = TranslationStatus::Error;
                }
            }
        }
    }

    fn find_mut(&mut self, segment_id: &str) -> Option<&mut TranscriptSegment> {
        if let Some(&idx) = self.committed_index.get(segment_id) {
            return self.committed.get_mut(idx);
        }
        self.partials.iter_mut().find(|s| s.id == segment_id)
    }

    /// Number of committed segments
    pub fn committed_len(&self) -> usize {
        self.committed.len()
    }

    /// True when nothing has been received yet
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.partials.is_empty()
    }

    /// Clear all segments and translation state for a new session.
    /// Stale translations must never leak into the next session.
    pub fn reset(&mut self) {
        self.committed.clear();
        self.committed_index.clear();
        self.partials.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(id: &str, text: &str) -> TranscriptEvent {
        TranscriptEvent::Partial(SegmentPatch::new(id, text))
    }

    fn committed(id: &str, text: &str) -> TranscriptEvent {
        TranscriptEvent::Committed(SegmentPatch::new(id, text))
    }

    #[test]
    fn partial_replaces_by_identifier() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.apply(partial("a", "hel"));
        consolidator.apply(partial("a", "hello"));
        consolidator.apply(committed("a", "hello"));

        assert_eq!(consolidator.consolidate(), "hello");
        assert_eq!(consolidator.merged_segments().len(), 1);
    }

    #[test]
    fn commit_moves_partial_into_history() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.apply(partial("a", "first"));
        consolidator.apply(committed("a", "first"));
        consolidator.apply(partial("b", "second"));

        let merged = consolidator.merged_segments();
        assert_eq!(merged.len(), 2);
        assert!(!merged[0].is_partial);
        assert!(merged[1].is_partial);
    }

    #[test]
    fn late_partial_for_committed_segment_is_ignored() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.apply(committed("a", "final"));
        consolidator.apply(partial("a", "stale revision"));

        assert_eq!(consolidator.consolidate(), "final");
        assert_eq!(consolidator.merged_segments().len(), 1);
    }

    #[test]
    fn duplicate_commit_is_ignored() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.apply(committed("a", "once"));
        consolidator.apply(committed("a", "twice"));

        assert_eq!(consolidator.committed_len(), 1);
        assert_eq!(consolidator.consolidate(), "once");
    }

    #[test]
    fn consolidate_preserves_emission_order() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.apply(partial("b", "world"));
        consolidator.apply(committed("a", "hello"));
        consolidator.apply(committed("b", "world"));

        assert_eq!(consolidator.consolidate(), "hello world");
    }

    #[test]
    fn trailing_partial_is_dropped_from_final_transcript() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.apply(committed("a", "done"));
        consolidator.apply(partial("b", "still being rev"));

        assert_eq!(consolidator.consolidate(), "done");
    }

    #[test]
    fn apply_reports_stale_events() {
        let mut consolidator = SegmentConsolidator::new();
        assert!(consolidator.apply(partial("a", "hel")));
        assert!(consolidator.apply(partial("a", "hello")));
        assert!(consolidator.apply(committed("a", "hello")));

        // Late partial and duplicate commit are both ignored
        assert!(!consolidator.apply(partial("a", "stale")));
        assert!(!consolidator.apply(committed("a", "hello")));
    }

    #[test]
    fn translation_outcomes_are_keyed_independently() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.apply(committed("a", "uno"));
        consolidator.apply(committed("b", "dos"));
        consolidator.mark_translation_pending("a");
        consolidator.mark_translation_pending("b");

        // Later segment finishes first
        consolidator.set_translation("b", Ok("two".into()));
        consolidator.set_translation("a", Ok("one".into()));

        assert_eq!(
            consolidator.consolidated_translation().as_deref(),
            Some("one two")
        );
    }

    #[test]
    fn translation_error_does_not_block_others() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.apply(committed("a", "uno"));
        consolidator.apply(committed("b", "dos"));
        consolidator.set_translation("a", Err(()));
        consolidator.set_translation("b", Ok("two".into()));

        let merged = consolidator.merged_segments();
        assert_eq!(merged[0].translation_status, TranslationStatus::Error);
        assert_eq!(
            consolidator.consolidated_translation().as_deref(),
            Some("two")
        );
    }

    #[test]
    fn commit_carries_partial_translation_state() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.apply(partial("a", "hola"));
        consolidator.mark_translation_pending("a");
        consolidator.set_translation("a", Ok("hello".into()));
        consolidator.apply(committed("a", "hola"));

        let merged = consolidator.merged_segments();
        assert_eq!(merged[0].translation.as_deref(), Some("hello"));
        assert_eq!(merged[0].translation_status, TranslationStatus::Done);
    }

    #[test]
    fn translation_for_unknown_segment_is_dropped() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.set_translation("ghost", Ok("boo".into()));
        assert!(consolidator.is_empty());
    }

    #[test]
    fn reset_clears_everything_for_next_session() {
        let mut consolidator = SegmentConsolidator::new();
        consolidator.apply(committed("a", "old session"));
        consolidator.set_translation("a", Ok("vieja".into()));
        consolidator.reset();

        assert!(consolidator.is_empty());
        assert_eq!(consolidator.consolidate(), "");
        assert!(consolidator.consolidated_translation().is_none());

        // A fresh segment reusing an old id starts clean
        consolidator.apply(partial("a", "new session"));
        let merged = consolidator.merged_segments();
        assert_eq!(merged[0].translation_status, TranslationStatus::None);
        assert!(merged[0].translation.is_none());
    }
}
