//! chordtrack - chord annotations for audio playback.
//!
//! Resolves chord symbols to pitch classes and tracks which annotated chord is
//! active as playback advances.
//!
//! ## Modules
//! - `pitch` - Pitch classes, note spellings and 12-slot pitch sets
//! - `chord` - Chord symbol grammar and interval templates
//! - `annotation` - Parsed analysis output and position lookup
//! - `sync` - Chord change detection for position updates
//! - `session` - Snapshot ownership for a host application
//! - `config` - YAML configuration
//! - `error` - Error types

pub mod annotation;
pub mod chord;
pub mod config;
pub mod error;
pub mod pitch;
pub mod session;
pub mod sync;

pub use annotation::{AnnotationRecord, AnnotationStore, Millis, NO_CHORD};
pub use chord::{ChordQuality, ParsedChord};
pub use config::SyncConfig;
pub use error::*;
pub use pitch::{PitchClass, PitchSet};
pub use session::{Session, SharedAnnotations, Snapshot};
pub use sync::{DisplayUpdate, PlaybackSync};

/// Parse the output of one analysis run into a new store.
/// This is the entry point for annotation ingestion.
pub fn install_annotations(raw: &str) -> Result<AnnotationStore, ChordTrackError> {
    AnnotationStore::parse(raw)
}

/// Resolve a chord symbol to 12 highlight flags, or an empty vector when the
/// symbol does not resolve.
///
/// ```
/// use chordtrack::lookup_components;
///
/// let flags = lookup_components("Am");
/// assert_eq!(flags.len(), 12);
/// assert!(flags[9] && flags[0] && flags[4]);
///
/// assert!(lookup_components("Xyz123").is_empty());
/// ```
pub fn lookup_components(chord: &str) -> Vec<bool> {
    chord::chord_components(chord)
        .map(|set| set.to_vec())
        .unwrap_or_default()
}
