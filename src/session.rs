//! A playback session: one source, its annotation snapshot and sync state.
//!
//! Each analysis run produces a complete [`AnnotationStore`] that replaces the
//! previous one wholesale. Readers hold an `Arc` to a single snapshot, so a
//! replacement is never observed half-built.

use std::sync::{Arc, PoisonError, RwLock};

use crate::annotation::{AnnotationStore, Millis};
use crate::config::SyncConfig;
use crate::error::ChordTrackError;
use crate::sync::{DisplayUpdate, PlaybackSync};

/// Boundary object for the host UI.
///
/// # Example
/// ```rust
/// use chordtrack::{Session, SyncConfig};
///
/// let mut session = Session::new(SyncConfig::with_lookahead(0));
/// session.open_source("song.mp3");
/// session.install_annotations("0.00 1.00 C\n1.00 2.00 G7\n")?;
///
/// let update = session.on_position_update(1500).unwrap();
/// assert_eq!(update.chord, "G7");
/// assert_eq!(update.highlight.to_string(), "D F G B");
/// # Ok::<(), chordtrack::ChordTrackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    source: Option<String>,
    store: Arc<AnnotationStore>,
    sync: PlaybackSync,
}

impl Session {
    pub fn new(config: SyncConfig) -> Self {
        Session {
            source: None,
            store: Arc::new(AnnotationStore::new()),
            sync: PlaybackSync::new(config.lookahead_ms),
        }
    }

    /// Switch to a new source. Its annotations are not known yet.
    pub fn open_source(&mut self, label: impl Into<String>) {
        let label = label.into();
        log::debug!("Opening source {}", label);
        self.source = Some(label);
        self.install(AnnotationStore::new());
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Parse one analysis run and make it the current snapshot.
    ///
    /// On failure the previous snapshot and the displayed chord are kept.
    pub fn install_annotations(&mut self, raw: &str) -> Result<usize, ChordTrackError> {
        match AnnotationStore::parse(raw) {
            Ok(store) => {
                let count = store.len();
                self.install(store);
                Ok(count)
            }
            Err(e) => {
                log::warn!("Discarding analysis result: {}", e);
                Err(e)
            }
        }
    }

    /// Install an already built store and go back to idle.
    pub fn install(&mut self, store: AnnotationStore) {
        self.install_snapshot(Arc::new(store));
    }

    pub fn install_snapshot(&mut self, store: Arc<AnnotationStore>) {
        log::debug!("Installed {} annotation records", store.len());
        self.store = store;
        self.sync.reset();
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<AnnotationStore> {
        Arc::clone(&self.store)
    }

    pub fn sync(&self) -> &PlaybackSync {
        &self.sync
    }

    /// Handle a playback clock report.
    pub fn on_position_update(&mut self, position: Millis) -> Option<DisplayUpdate> {
        self.sync.on_position(&self.store, position)
    }

    /// Row to select in the record table at `position`, lookahead applied.
    pub fn active_index(&self, position: Millis) -> Option<usize> {
        self.store.search(self.sync.lookup_position(position))
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(SyncConfig::default())
    }
}

/// A snapshot together with the install that produced it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Incremented on every install
    pub generation: u64,
    pub store: Arc<AnnotationStore>,
}

/// Annotation snapshot shared between threads.
///
/// `install` swaps the whole snapshot under a write lock; `load` hands out the
/// current `Arc`, which stays valid after a later swap. Every install bumps the
/// generation so readers can tell that the store they sync against changed.
#[derive(Debug, Default)]
pub struct SharedAnnotations {
    current: RwLock<Snapshot>,
}

impl SharedAnnotations {
    pub fn new(store: AnnotationStore) -> Self {
        SharedAnnotations {
            current: RwLock::new(Snapshot {
                generation: 0,
                store: Arc::new(store),
            }),
        }
    }

    /// Current snapshot and its generation
    pub fn snapshot(&self) -> Snapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn load(&self) -> Arc<AnnotationStore> {
        self.snapshot().store
    }

    pub fn generation(&self) -> u64 {
        self.snapshot().generation
    }

    /// Replace the snapshot, returning the previous store.
    pub fn install(&self, store: AnnotationStore) -> Arc<AnnotationStore> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Snapshot {
            generation: guard.generation.wrapping_add(1),
            store: Arc::new(store),
        };
        log::debug!(
            "Installed {} annotation records as generation {}",
            next.store.len(),
            next.generation
        );
        std::mem::replace(&mut *guard, next).store
    }

    /// Handle a playback clock report against the current snapshot.
    ///
    /// `sync` goes back to idle first if a new store was installed since its
    /// previous update.
    pub fn on_position_update(
        &self,
        sync: &mut PlaybackSync,
        position: Millis,
    ) -> Option<DisplayUpdate> {
        let snapshot = self.snapshot();
        sync.observe_generation(snapshot.generation);
        sync.on_position(&snapshot.store, position)
    }

    /// Parse and install; the current snapshot is untouched on failure.
    pub fn install_annotations(&self, raw: &str) -> Result<usize, ChordTrackError> {
        let store = AnnotationStore::parse(raw)?;
        let count = store.len();
        self.install(store);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const RAW: &str = "0.00 1.00 C\n1.00 2.00 N\n2.00 3.00 G\n";

    #[test]
    fn test_install_resets_sync() {
        let mut session = Session::new(SyncConfig::with_lookahead(0));
        session.install_annotations(RAW).unwrap();
        assert!(session.on_position_update(500).is_some());
        assert_eq!(session.sync().last_announced(), Some("C"));

        assert_eq!(session.install_annotations(RAW), Ok(3));
        assert_eq!(session.sync().last_announced(), None);
        // Same chord is announced again on the fresh store
        assert_eq!(session.on_position_update(500).map(|u| u.chord), Some("C".to_string()));
    }

    #[test]
    fn test_failed_install_keeps_previous_state() {
        let mut session = Session::new(SyncConfig::with_lookahead(0));
        session.install_annotations(RAW).unwrap();
        session.on_position_update(2500);

        assert!(session.install_annotations("0.0 1.0 C\nbad line").is_err());
        assert_eq!(session.snapshot().len(), 3);
        assert_eq!(session.sync().last_announced(), Some("G"));
        assert_eq!(session.on_position_update(2600), None);
    }

    #[test]
    fn test_open_source_discards_store() {
        let mut session = Session::new(SyncConfig::default());
        session.install_annotations(RAW).unwrap();
        session.on_position_update(500);

        session.open_source("next.flac");
        assert_eq!(session.source(), Some("next.flac"));
        assert!(session.snapshot().is_empty());
        assert_eq!(session.sync().last_announced(), None);
        assert_eq!(session.on_position_update(500), None);
    }

    #[test]
    fn test_active_index_uses_lookahead() {
        let mut session = Session::new(SyncConfig::default());
        session.install_annotations(RAW).unwrap();
        assert_eq!(session.active_index(850), Some(0));
        assert_eq!(session.active_index(950), Some(1));
        assert_eq!(session.active_index(2950), None);
    }

    #[test]
    fn test_snapshot_outlives_replacement() {
        let mut session = Session::new(SyncConfig::default());
        session.install_annotations(RAW).unwrap();
        let old = session.snapshot();

        session.install_annotations("0.00 5.00 Am").unwrap();
        assert_eq!(old.len(), 3);
        assert_eq!(session.snapshot().len(), 1);
    }

    #[test]
    fn test_shared_annotations_swap() {
        let shared = Arc::new(SharedAnnotations::default());
        assert!(shared.load().is_empty());

        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || shared.install_annotations(RAW))
        };
        let seen = shared.load().len();
        assert!(seen == 0 || seen == 3);

        assert_eq!(writer.join().unwrap(), Ok(3));
        assert_eq!(shared.load().len(), 3);

        assert!(shared.install_annotations("nope").is_err());
        assert_eq!(shared.load().len(), 3);

        let generation = shared.generation();
        let previous = shared.install(AnnotationStore::new());
        assert_eq!(shared.generation(), generation + 1);
        assert_eq!(previous.len(), 3);
        assert!(shared.load().is_empty());
    }

    #[test]
    fn test_shared_install_resets_reader_sync() {
        let shared = SharedAnnotations::default();
        let mut sync = PlaybackSync::new(0);

        shared.install_annotations("0.0 1.0 C").unwrap();
        let update = shared.on_position_update(&mut sync, 500).unwrap();
        assert_eq!(update.chord, "C");
        assert_eq!(shared.on_position_update(&mut sync, 600), None);

        // The new store starts with the same chord; it must still be announced
        shared.install_annotations("0.0 2.0 C\n2.0 3.0 G").unwrap();
        let update = shared.on_position_update(&mut sync, 500).unwrap();
        assert_eq!(update.chord, "C");
        assert_eq!(sync.last_announced(), Some("C"));
        assert_eq!(shared.on_position_update(&mut sync, 700), None);
    }

    #[test]
    fn test_shared_failed_install_keeps_reader_sync() {
        let shared = SharedAnnotations::default();
        let mut sync = PlaybackSync::new(0);

        shared.install_annotations("0.0 1.0 C").unwrap();
        assert!(shared.on_position_update(&mut sync, 500).is_some());

        assert!(shared.install_annotations("bad line").is_err());
        assert_eq!(shared.on_position_update(&mut sync, 500), None);
        assert_eq!(sync.last_announced(), Some("C"));
    }
}
