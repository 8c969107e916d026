//! Playback sync configuration.
//!
//! Read from YAML with kebab-case keys. Every key is optional:
//!
//! ```yaml
//! lookahead-ms: 100
//! ```

use serde::{Deserialize, Serialize};

use crate::annotation::Millis;
use crate::error::ChordTrackError;

/// Default lead applied to playback positions before lookup, in milliseconds
pub const DEFAULT_LOOKAHEAD_MS: Millis = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Added to each position so the highlight changes slightly before the
    /// chord is heard. Negative values delay it instead.
    pub lookahead_ms: Millis,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            lookahead_ms: DEFAULT_LOOKAHEAD_MS,
        }
    }
}

impl SyncConfig {
    /// Config with a custom lookahead.
    pub fn with_lookahead(lookahead_ms: Millis) -> Self {
        SyncConfig { lookahead_ms }
    }

    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ChordTrackError> {
        if content.trim().is_empty() {
            return Ok(SyncConfig::default());
        }
        serde_yaml::from_str(content).map_err(|e| ChordTrackError::ConfigError(e.to_string()))
    }
}
