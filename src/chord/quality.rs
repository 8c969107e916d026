//! Chord qualities with a resolved interval template

use std::fmt;

use serde::Serialize;

use crate::pitch::PitchSet;

/// The qualities that resolve to pitch classes.
///
/// The grammar accepts more (sus, aug/dim, ø, mmaj7, 9/11/13) but those have no
/// template and resolve to `None`.
///
/// | Quality     | Symbol  | Intervals       |
/// |-------------|---------|-----------------|
/// | `Major`     | `""`    | 0, 4, 7         |
/// | `Minor`     | `m`     | 0, 3, 7         |
/// | `Dominant7` | `7`     | 0, 4, 7, 10     |
/// | `Minor7`    | `m7`    | 0, 3, 7, 10     |
/// | `Major7`    | `maj7`  | 0, 4, 7, 11     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChordQuality {
    Major,
    Minor,
    Dominant7,
    Minor7,
    Major7,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 5] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Dominant7,
        ChordQuality::Minor7,
        ChordQuality::Major7,
    ];

    /// Resolve a quality symbol as produced by the chord grammar.
    /// The empty symbol means plain major.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "" => Some(ChordQuality::Major),
            "m" => Some(ChordQuality::Minor),
            "7" => Some(ChordQuality::Dominant7),
            "m7" => Some(ChordQuality::Minor7),
            "maj7" => Some(ChordQuality::Major7),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Major7 => "maj7",
        }
    }

    /// Semitone offsets from the root
    pub fn intervals(self) -> &'static [i32] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Major7 => &[0, 4, 7, 11],
        }
    }

    /// The 12-slot template relative to a root at slot 0.
    pub fn template(self) -> PitchSet {
        PitchSet::from_offsets(self.intervals())
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Dominant7 => "dominant 7th",
            ChordQuality::Minor7 => "minor 7th",
            ChordQuality::Major7 => "major 7th",
        };
        f.write_str(name)
    }
}
