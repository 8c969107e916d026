//! # Error Types
//!
//! This module defines all error types for chordtrack.
//!
//! Ingestion errors carry the 1-based line number of the offending line in the
//! raw analysis output so the host can point at it.
//!
//! ## Error Types
//! - `MalformedLine` - An annotation line does not have exactly three fields
//! - `EmptyInput` - The analysis output contained no records at all
//! - `ConfigError` - Invalid YAML configuration
//! - `Io` - A file could not be read
//!
//! Chord symbols that fail to resolve and positions outside every interval are
//! not errors; those surface as `None`.
//!
//! ## Usage
//! ```rust
//! use chordtrack::{AnnotationStore, ChordTrackError};
//!
//! match AnnotationStore::parse("0.0 1.5") {
//!     Ok(store) => println!("{} records", store.len()),
//!     Err(ChordTrackError::MalformedLine { line, found, .. }) => {
//!         eprintln!("line {} has {} fields", line, found);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordTrackError {
    /// A non-blank annotation line that does not split into exactly three tokens.
    ///
    /// # Example
    /// ```
    /// # use chordtrack::ChordTrackError;
    /// let err = ChordTrackError::MalformedLine {
    ///     line: 3,
    ///     found: 2,
    ///     content: "1.00 2.00".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Malformed annotation at line 3: expected 3 fields, found 2 in '1.00 2.00'"
    /// );
    /// ```
    #[error("Malformed annotation at line {line}: expected 3 fields, found {found} in '{content}'")]
    MalformedLine {
        line: usize,
        found: usize,
        content: String,
    },

    /// The analysis output had no non-blank lines.
    #[error("Analysis output contains no annotations")]
    EmptyInput,

    /// Invalid configuration.
    ///
    /// # Example
    /// ```
    /// # use chordtrack::ChordTrackError;
    /// let err = ChordTrackError::ConfigError("lookahead-ms must be an integer".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: lookahead-ms must be an integer");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Error reading '{path}': {message}")]
    Io { path: String, message: String },
}
