//! Playback sync: turn playback positions into chord highlight updates.
//!
//! [`PlaybackSync`] remembers the last chord it announced. A position update
//! produces a [`DisplayUpdate`] only when the active record's chord differs
//! from that chord. Positions that fall in a gap between records change
//! nothing, so the last chord stays on screen until a different one starts.
//!
//! ```text
//! Idle ──(chord X found)──▶ Announced(X) ──(chord Y ≠ X found)──▶ Announced(Y)
//!   ▲                                                                  │
//!   └───────────────────────────── reset() ─────────────────────────────┘
//! ```

use serde::Serialize;

use crate::annotation::{AnnotationStore, Millis, NO_CHORD};
use crate::chord::ParsedChord;
use crate::config::DEFAULT_LOOKAHEAD_MS;
use crate::pitch::PitchSet;

/// What the display layer should show after a chord change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayUpdate {
    /// Index of the active record, for table row selection
    pub index: usize,
    /// Chord token as stored in the record
    pub chord: String,
    /// All false for `N` or for chords that do not resolve
    pub highlight: PitchSet,
}

impl DisplayUpdate {
    pub fn is_no_chord(&self) -> bool {
        self.chord == NO_CHORD
    }
}

/// Per-session chord announcement state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSync {
    lookahead_ms: Millis,
    last_announced: Option<String>,
    /// Generation of the shared snapshot seen by the last update
    generation: Option<u64>,
}

impl PlaybackSync {
    pub fn new(lookahead_ms: Millis) -> Self {
        PlaybackSync {
            lookahead_ms,
            last_announced: None,
            generation: None,
        }
    }

    /// The chord currently on screen, `None` while idle.
    pub fn last_announced(&self) -> Option<&str> {
        self.last_announced.as_deref()
    }

    /// Back to idle. Called whenever a new store is installed.
    pub fn reset(&mut self) {
        self.last_announced = None;
    }

    /// Note the generation of the snapshot about to be queried, going back to
    /// idle if it differs from the previous one.
    pub fn observe_generation(&mut self, generation: u64) {
        if self.generation != Some(generation) {
            if self.generation.is_some() {
                log::debug!("Annotation snapshot changed to generation {}", generation);
            }
            self.generation = Some(generation);
            self.reset();
        }
    }

    /// Position queried after applying the lookahead.
    pub fn lookup_position(&self, position: Millis) -> Millis {
        position.saturating_add(self.lookahead_ms)
    }

    /// Handle one playback position report.
    ///
    /// Safe to call repeatedly with the same, or an earlier, position.
    pub fn on_position(&mut self, store: &AnnotationStore, position: Millis) -> Option<DisplayUpdate> {
        let index = store.search(self.lookup_position(position))?;
        let record = store.get(index)?;

        if self.last_announced.as_deref() == Some(record.chord.as_str()) {
            return None;
        }
        self.last_announced = Some(record.chord.clone());

        let highlight = if record.is_no_chord() {
            PitchSet::EMPTY
        } else {
            ParsedChord::parse(&record.chord)
                .components()
                .unwrap_or(PitchSet::EMPTY)
        };
        log::debug!(
            "Chord change at {}ms: {} [{}]",
            position,
            record.chord,
            highlight
        );

        Some(DisplayUpdate {
            index,
            chord: record.chord.clone(),
            highlight,
        })
    }
}

impl Default for PlaybackSync {
    fn default() -> Self {
        PlaybackSync::new(DEFAULT_LOOKAHEAD_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationRecord;
    use crate::pitch::PitchClass;

    fn timeline() -> AnnotationStore {
        AnnotationStore::from_records(vec![
            AnnotationRecord::new(0, 1000, "C"),
            AnnotationRecord::new(1000, 2000, "N"),
            AnnotationRecord::new(2000, 3000, "G"),
        ])
    }

    #[test]
    fn test_announces_only_on_change() {
        let store = timeline();
        let mut sync = PlaybackSync::new(0);

        let update = sync.on_position(&store, 400).unwrap();
        assert_eq!(update.chord, "C");
        assert_eq!(update.index, 0);
        let notes: Vec<usize> = update.highlight.notes().map(PitchClass::index).collect();
        assert_eq!(notes, vec![0, 4, 7]);

        assert_eq!(sync.on_position(&store, 600), None);

        let update = sync.on_position(&store, 1100).unwrap();
        assert_eq!(update.chord, "N");
        assert!(update.is_no_chord());
        assert_eq!(update.highlight, PitchSet::EMPTY);
        assert_eq!(sync.last_announced(), Some("N"));
    }

    #[test]
    fn test_gap_keeps_last_chord() {
        let store = AnnotationStore::from_records(vec![
            AnnotationRecord::new(0, 900, "C"),
            AnnotationRecord::new(1200, 1800, "C"),
            AnnotationRecord::new(1800, 2400, "F"),
        ]);
        let mut sync = PlaybackSync::new(0);

        assert!(sync.on_position(&store, 100).is_some());
        assert_eq!(sync.on_position(&store, 1000), None);
        assert_eq!(sync.last_announced(), Some("C"));
        // Same chord after the gap is still suppressed
        assert_eq!(sync.on_position(&store, 1300), None);
        assert_eq!(sync.on_position(&store, 2000).map(|u| u.chord), Some("F".to_string()));
    }

    #[test]
    fn test_lookahead_pre_empts_change() {
        let store = timeline();
        let mut sync = PlaybackSync::new(100);

        assert_eq!(sync.on_position(&store, 850).map(|u| u.chord), Some("C".to_string()));
        // 950 + 100 lands in the "N" record
        assert_eq!(sync.on_position(&store, 950).map(|u| u.chord), Some("N".to_string()));
    }

    #[test]
    fn test_regressing_position() {
        let store = timeline();
        let mut sync = PlaybackSync::new(0);

        assert_eq!(sync.on_position(&store, 2500).map(|u| u.index), Some(2));
        assert_eq!(sync.on_position(&store, 2500), None);
        assert_eq!(sync.on_position(&store, 200).map(|u| u.index), Some(0));
    }

    #[test]
    fn test_unresolved_chord_highlights_nothing() {
        let store = AnnotationStore::from_records(vec![
            AnnotationRecord::new(0, 1000, "Csus4"),
            AnnotationRecord::new(1000, 2000, "Xyz123"),
        ]);
        let mut sync = PlaybackSync::new(0);

        let update = sync.on_position(&store, 500).unwrap();
        assert_eq!(update.chord, "Csus4");
        assert!(update.highlight.is_empty());

        let update = sync.on_position(&store, 1500).unwrap();
        assert_eq!(update.chord, "Xyz123");
        assert!(update.highlight.is_empty());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let store = timeline();
        let mut sync = PlaybackSync::new(0);

        assert!(sync.on_position(&store, 500).is_some());
        sync.reset();
        assert_eq!(sync.last_announced(), None);
        assert!(sync.on_position(&store, 500).is_some());
    }

    #[test]
    fn test_default_uses_configured_lookahead() {
        let sync = PlaybackSync::default();
        assert_eq!(sync.lookup_position(900), 900 + DEFAULT_LOOKAHEAD_MS);
        assert_eq!(sync, PlaybackSync::new(crate::SyncConfig::default().lookahead_ms));
    }

    #[test]
    fn test_new_generation_returns_to_idle() {
        let store = timeline();
        let mut sync = PlaybackSync::new(0);

        sync.observe_generation(1);
        assert!(sync.on_position(&store, 500).is_some());

        sync.observe_generation(1);
        assert_eq!(sync.last_announced(), Some("C"));
        assert_eq!(sync.on_position(&store, 500), None);

        sync.observe_generation(2);
        assert_eq!(sync.last_announced(), None);
        assert!(sync.on_position(&store, 500).is_some());
    }

    #[test]
    fn test_not_found_is_silent() {
        let mut sync = PlaybackSync::new(0);
        assert_eq!(sync.on_position(&AnnotationStore::new(), 500), None);
        assert_eq!(sync.on_position(&timeline(), 9000), None);
        assert_eq!(sync.last_announced(), None);
    }
}
