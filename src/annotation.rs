//! Time-indexed chord annotations.
//!
//! The analysis process emits one record per line:
//!
//! ```text
//! <begin_seconds> <end_seconds> <chord_symbol | N>
//! ```
//!
//! [`AnnotationStore::parse`] ingests a whole run at once. Any malformed line
//! rejects the entire run, so a store is either complete or empty.
//! Timestamps are stored in milliseconds, truncated from `seconds * 1000`.

use serde::Serialize;

use crate::error::ChordTrackError;

/// Playback position or annotation timestamp in milliseconds.
pub type Millis = i64;

/// Chord token meaning "no chord sounding".
pub const NO_CHORD: &str = "N";

/// One time-stamped chord observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    pub begin: Millis,
    pub end: Millis,
    /// Raw chord token, not validated
    pub chord: String,
}

impl AnnotationRecord {
    pub fn new(begin: Millis, end: Millis, chord: impl Into<String>) -> Self {
        AnnotationRecord {
            begin,
            end,
            chord: chord.into(),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, position: Millis) -> bool {
        self.begin <= position && position <= self.end
    }

    pub fn is_no_chord(&self) -> bool {
        self.chord == NO_CHORD
    }

    /// Begin time as `mm:ss.zzz`
    pub fn begin_label(&self) -> String {
        format_timestamp(self.begin)
    }

    /// End time as `mm:ss.zzz`
    pub fn end_label(&self) -> String {
        format_timestamp(self.end)
    }
}

/// The annotation timeline of one analyzed source.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStore {
    records: Vec<AnnotationRecord>,
    /// `reach[i]` is the largest `end` among `records[..=i]`
    reach: Vec<Millis>,
    /// Whether `begin` never decreases, which enables indexed search
    ordered: bool,
}

impl AnnotationStore {
    pub fn new() -> Self {
        AnnotationStore::from_records(Vec::new())
    }

    /// Build a store from records kept in the given order.
    pub fn from_records(records: Vec<AnnotationRecord>) -> Self {
        let ordered = records.windows(2).all(|w| w[0].begin <= w[1].begin);
        let reach = records
            .iter()
            .scan(Millis::MIN, |max, record| {
                *max = (*max).max(record.end);
                Some(*max)
            })
            .collect();

        AnnotationStore {
            records,
            reach,
            ordered,
        }
    }

    /// Parse the complete output of one analysis run.
    ///
    /// Lines may be separated by any mix of `\r` and `\n`; blank lines are
    /// skipped. Each remaining line needs exactly three whitespace-separated
    /// fields. A begin or end field that is not a number reads as 0.
    ///
    /// # Errors
    /// - [`ChordTrackError::MalformedLine`] if a line has the wrong field count
    /// - [`ChordTrackError::EmptyInput`] if there is nothing to parse
    ///
    /// No records are kept from a run that fails.
    ///
    /// ```
    /// use chordtrack::AnnotationStore;
    ///
    /// let store = AnnotationStore::parse("0.00 1.50 C\n1.50 3.25 Am\n").unwrap();
    /// assert_eq!(store.len(), 2);
    /// assert_eq!(store.records()[1].begin, 1500);
    /// assert_eq!(store.records()[1].end, 3250);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ChordTrackError> {
        let mut records = Vec::new();

        for (idx, text) in raw.split('\n').enumerate() {
            let line = idx + 1;
            for segment in text.split('\r') {
                if segment.trim().is_empty() {
                    continue;
                }
                records.push(parse_line(line, segment)?);
            }
        }

        if records.is_empty() {
            return Err(ChordTrackError::EmptyInput);
        }

        let store = AnnotationStore::from_records(records);
        if !store.ordered {
            log::warn!("Annotation begin times are not ascending; falling back to linear search");
        }
        log::debug!("Parsed {} annotation records", store.len());
        Ok(store)
    }

    /// Replace the contents of this store with a fresh parse.
    ///
    /// On failure the store is left empty.
    pub fn reload(&mut self, raw: &str) -> Result<usize, ChordTrackError> {
        match AnnotationStore::parse(raw) {
            Ok(store) => {
                *self = store;
                Ok(self.len())
            }
            Err(e) => {
                *self = AnnotationStore::new();
                Err(e)
            }
        }
    }

    /// Index of the first record with `begin <= position <= end`.
    ///
    /// When two records share a boundary, the earlier one wins.
    ///
    /// ```
    /// use chordtrack::{AnnotationRecord, AnnotationStore};
    ///
    /// let store = AnnotationStore::from_records(vec![
    ///     AnnotationRecord::new(0, 1000, "C"),
    ///     AnnotationRecord::new(2000, 3000, "G"),
    /// ]);
    /// assert_eq!(store.search(500), Some(0));
    /// assert_eq!(store.search(1500), None);
    /// assert_eq!(store.search(3000), Some(1));
    /// ```
    pub fn search(&self, position: Millis) -> Option<usize> {
        if !self.ordered {
            return self.records.iter().position(|r| r.contains(position));
        }

        // Records that have started by `position` form a prefix.
        let started = self.records.partition_point(|r| r.begin <= position);
        // First record whose end (or any earlier end) reaches `position`.
        let first_reaching = self.reach.partition_point(|&end| end < position);

        (first_reaching < started).then_some(first_reaching)
    }

    /// The record active at `position`, if any.
    pub fn active(&self, position: Millis) -> Option<&AnnotationRecord> {
        self.search(position).map(|idx| &self.records[idx])
    }

    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&AnnotationRecord> {
        self.records.get(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest end time across all records.
    pub fn last_end(&self) -> Option<Millis> {
        self.reach.last().copied()
    }

    /// `[begin, end, chord]` text rows for a table view.
    pub fn rows(&self) -> Vec<[String; 3]> {
        self.records
            .iter()
            .map(|r| [r.begin_label(), r.end_label(), r.chord.clone()])
            .collect()
    }
}

impl Default for AnnotationStore {
    fn default() -> Self {
        AnnotationStore::new()
    }
}

fn parse_line(line: usize, text: &str) -> Result<AnnotationRecord, ChordTrackError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let [begin, end, chord] = fields.as_slice() else {
        return Err(ChordTrackError::MalformedLine {
            line,
            found: fields.len(),
            content: text.trim().to_string(),
        });
    };

    Ok(AnnotationRecord {
        begin: parse_seconds(line, begin),
        end: parse_seconds(line, end),
        chord: chord.to_string(),
    })
}

/// Decimal seconds to milliseconds, truncating toward zero.
/// Tokens that are not a finite number read as 0.
fn parse_seconds(line: usize, token: &str) -> Millis {
    match token.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => (seconds * 1000.0) as Millis,
        _ => {
            log::warn!("Line {}: timestamp '{}' is not a number, using 0", line, token);
            0
        }
    }
}

/// Format milliseconds as `mm:ss.zzz`. Minutes are not wrapped into hours.
pub fn format_timestamp(ms: Millis) -> String {
    let ms = ms.max(0);
    format!("{:02}:{:02}.{:03}", ms / 60_000, (ms / 1000) % 60, ms % 1000)
}

/// Format milliseconds as `mm:ss` for position and duration labels.
pub fn format_clock(ms: Millis) -> String {
    let ms = ms.max(0);
    format!("{:02}:{:02}", ms / 60_000, (ms / 1000) % 60)
}
