//! # Chord Module
//!
//! Parse chord symbols from the analysis output and resolve them to the pitch
//! classes they contain.
//!
//! ## Sub-modules
//! - `grammar` - Ordered-alternative matcher for roots, qualities and bass notes
//! - `quality` - [`ChordQuality`] and its interval templates
//!
//! ## Pipeline
//! 1. [`ParsedChord::parse`] splits a symbol into root spelling and quality symbol
//! 2. [`ParsedChord::components`] resolves the quality template and rotates it
//!    to the root's pitch class
//!
//! Symbols that do not match the grammar, or whose quality has no template,
//! resolve to `None`. That is the normal "nothing to highlight" outcome.
//!
//! ## Example
//! ```rust
//! use chordtrack::chord::ParsedChord;
//!
//! let chord = ParsedChord::parse("Gmaj7");
//! assert_eq!(chord.root, "G");
//! assert_eq!(chord.quality, "maj7");
//!
//! let notes = chord.components().unwrap();
//! assert_eq!(notes.to_string(), "D F# G B");
//! ```

mod grammar;
mod quality;


use std::fmt;

use serde::Serialize;

use crate::pitch::{PitchClass, PitchSet};

pub use quality::ChordQuality;

/// A chord symbol split into its root spelling and quality symbol.
///
/// Both fields are empty when the text did not match the chord grammar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedChord {
    /// Root as written, e.g. `"C#"` or `"bb"`
    pub root: String,
    /// Quality symbol as written, `""` for plain major
    pub quality: String,
    /// Bass note of a slash chord, e.g. `"E"` in `"C/E"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bass: Option<String>,
}

impl ParsedChord {
    /// Build from an already separated root and quality.
    pub fn new(root: impl Into<String>, quality: impl Into<String>) -> Self {
        ParsedChord {
            root: root.into(),
            quality: quality.into(),
            bass: None,
        }
    }

    /// Match `text` against the chord grammar.
    ///
    /// The match is anchored at the start of the text. Anything after the
    /// quality (and the optional `/bass`) is ignored, so `"C7b9"` parses as
    /// `C` + `7`.
    pub fn parse(text: &str) -> Self {
        let Some((root, rest)) = grammar::match_root(text) else {
            return ParsedChord::default();
        };
        let (quality, rest) = grammar::match_quality(rest);

        ParsedChord {
            root: root.to_string(),
            quality: quality.to_string(),
            bass: grammar::match_bass(rest).map(str::to_string),
        }
    }

    /// Whether the text matched the chord grammar at all
    pub fn is_recognized(&self) -> bool {
        !self.root.is_empty()
    }

    pub fn root_pitch(&self) -> Option<PitchClass> {
        PitchClass::from_spelling(&self.root)
    }

    /// Resolved quality, or `None` for qualities without a template.
    pub fn resolved_quality(&self) -> Option<ChordQuality> {
        ChordQuality::from_symbol(&self.quality)
    }

    /// Pitch classes in this chord.
    ///
    /// The quality's template is rotated right by the root's pitch class, so
    /// slot `i` of the result is set iff pitch class `i` belongs to the chord.
    /// Returns `None` when the quality has no template or the root is not a
    /// recognized spelling.
    pub fn components(&self) -> Option<PitchSet> {
        let quality = self.resolved_quality()?;
        let root = self.root_pitch()?;
        Some(quality.template().rotated(root))
    }
}

impl fmt::Display for ParsedChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = &self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}

/// Parse and resolve a chord symbol in one step.
///
/// ```
/// use chordtrack::chord::chord_components;
///
/// let c = chord_components("C").unwrap();
/// assert_eq!(c.to_string(), "C E G");
///
/// assert_eq!(chord_components("Csus4"), None); // no template
/// assert_eq!(chord_components("Xyz123"), None); // not a chord
/// ```
pub fn chord_components(text: &str) -> Option<PitchSet> {
    ParsedChord::parse(text).components()
}
