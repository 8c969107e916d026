//! Pitch classes and 12-slot pitch-class sets.
//!
//! A [`PitchClass`] is a semitone index in `0..12` with C = 0. Note spellings
//! resolve through a fixed table of 17 names where enharmonic spellings
//! (`C#`/`Db`) share a pitch class. A [`PitchSet`] is the membership vector the
//! highlight layer consumes: slot `i` is set iff pitch class `i` sounds.

use std::fmt;

use serde::Serialize;

/// Number of pitch classes in an octave
pub const PITCH_CLASSES: usize = 12;

/// Recognized note spellings and their pitch class.
const SPELLINGS: [(&str, u8); 17] = [
    ("C", 0),
    ("C#", 1),
    ("Db", 1),
    ("D", 2),
    ("D#", 3),
    ("Eb", 3),
    ("E", 4),
    ("F", 5),
    ("F#", 6),
    ("Gb", 6),
    ("G", 7),
    ("G#", 8),
    ("Ab", 8),
    ("A", 9),
    ("A#", 10),
    ("Bb", 10),
    ("B", 11),
];

const SHARP_NAMES: [&str; PITCH_CLASSES] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One of the 12 pitch classes, 0 = C ascending by semitone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Wrap any semitone count into a pitch class.
    pub fn new(semitone: i32) -> Self {
        PitchClass(semitone.rem_euclid(PITCH_CLASSES as i32) as u8)
    }

    /// Look up a spelling such as `"C#"` or `"Bb"`.
    ///
    /// The letter is matched case-insensitively, the accidental exactly.
    /// Spellings outside the table (`"Cb"`, `"E#"`, `"H"`) resolve to `None`.
    ///
    /// ```
    /// use chordtrack::PitchClass;
    ///
    /// assert_eq!(PitchClass::from_spelling("Db"), PitchClass::from_spelling("C#"));
    /// assert_eq!(PitchClass::from_spelling("a").map(|p| p.index()), Some(9));
    /// assert_eq!(PitchClass::from_spelling("Cb"), None);
    /// ```
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        let mut chars = spelling.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let rest = chars.as_str();

        SPELLINGS
            .iter()
            .find(|(name, _)| {
                let mut name_chars = name.chars();
                name_chars.next() == Some(letter) && name_chars.as_str() == rest
            })
            .map(|&(_, value)| PitchClass(value))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Sharp spelling of this pitch class.
    pub fn name(self) -> &'static str {
        SHARP_NAMES[self.index()]
    }

    /// All twelve pitch classes in ascending order.
    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..PITCH_CLASSES as u8).map(PitchClass)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Membership vector over the 12 pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct PitchSet([bool; PITCH_CLASSES]);

impl PitchSet {
    /// The set with no pitch class highlighted.
    pub const EMPTY: PitchSet = PitchSet([false; PITCH_CLASSES]);

    /// Build a set from semitone offsets, wrapping each into `0..12`.
    pub fn from_offsets(offsets: &[i32]) -> Self {
        let mut slots = [false; PITCH_CLASSES];
        for &offset in offsets {
            slots[PitchClass::new(offset).index()] = true;
        }
        PitchSet(slots)
    }

    /// Rotate right by `by` slots: slot 0 moves to slot `by`, wrapping at 11 -> 0.
    pub fn rotated(self, by: PitchClass) -> Self {
        let mut slots = self.0;
        slots.rotate_right(by.index());
        PitchSet(slots)
    }

    pub fn contains(&self, pitch: PitchClass) -> bool {
        self.0[pitch.index()]
    }

    pub fn len(&self) -> usize {
        self.0.iter().filter(|&&on| on).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member pitch classes in ascending order.
    pub fn notes(&self) -> impl Iterator<Item = PitchClass> + '_ {
        PitchClass::all().filter(move |&p| self.contains(p))
    }

    pub fn to_vec(&self) -> Vec<bool> {
        self.0.to_vec()
    }
}

impl fmt::Display for PitchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.notes().map(PitchClass::name).collect();
        f.write_str(&names.join(" "))
    }
}
