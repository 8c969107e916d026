//! Ordered-alternative matcher for chord symbols.
//!
//! ```text
//! root    := [A-Ga-g] ('#' | 'b')?
//! quality := ('7' | 'maj7')? 'sus' ('2' | '4')?
//!          | 'ø' '7'?
//!          | 'mmaj7'
//!          | 'maj7'
//!          | 'm' '7'?
//!          | '9' | '11' | '13'
//!          | ('aug' | 'dim')? ('7' | 'maj7')?
//! chord   := root quality ('/' root)?
//! ```
//!
//! Each quality alternative is a sequence of slots. Every alternative is
//! tried against the text following the root and the longest match wins; on a
//! tie the alternative listed first wins. The last alternative can match the
//! empty string, which is plain major.

/// One position in an alternative: a set of literal options.
struct Slot {
    options: &'static [&'static str],
    optional: bool,
}

const fn required(options: &'static [&'static str]) -> Slot {
    Slot { options, optional: false }
}

const fn optional(options: &'static [&'static str]) -> Slot {
    Slot { options, optional: true }
}

const SUSPENDED: &[Slot] = &[optional(&["7", "maj7"]), required(&["sus"]), optional(&["2", "4"])];
const HALF_DIMINISHED: &[Slot] = &[required(&["ø"]), optional(&["7"])];
const MINOR_MAJOR_SEVENTH: &[Slot] = &[required(&["mmaj7"])];
const MAJOR_SEVENTH: &[Slot] = &[required(&["maj7"])];
const MINOR: &[Slot] = &[required(&["m"]), optional(&["7"])];
const NINTH: &[Slot] = &[required(&["9"])];
const ELEVENTH: &[Slot] = &[required(&["11"])];
const THIRTEENTH: &[Slot] = &[required(&["13"])];
const ALTERED: &[Slot] = &[optional(&["aug", "dim"]), optional(&["7", "maj7"])];

/// Quality alternatives in priority order.
const QUALITY_ALTERNATIVES: [&[Slot]; 9] = [
    SUSPENDED,
    HALF_DIMINISHED,
    MINOR_MAJOR_SEVENTH,
    MAJOR_SEVENTH,
    MINOR,
    NINTH,
    ELEVENTH,
    THIRTEENTH,
    ALTERED,
];

/// Byte length of the longest prefix of `text` an alternative accepts.
fn match_alternative(slots: &[Slot], text: &str) -> Option<usize> {
    // Every end offset reachable after the slots consumed so far
    let mut ends = vec![0usize];
    for slot in slots {
        let mut next = Vec::new();
        for &end in &ends {
            if slot.optional {
                next.push(end);
            }
            for option in slot.options {
                if text[end..].starts_with(option) {
                    next.push(end + option.len());
                }
            }
        }
        if next.is_empty() {
            return None;
        }
        next.sort_unstable();
        next.dedup();
        ends = next;
    }
    ends.last().copied()
}

/// Split a root spelling off the front of `text`.
pub(crate) fn match_root(text: &str) -> Option<(&str, &str)> {
    let first = text.chars().next()?;
    if !matches!(first.to_ascii_uppercase(), 'A'..='G') {
        return None;
    }
    let mut len = first.len_utf8();
    if text[len..].starts_with('#') || text[len..].starts_with('b') {
        len += 1;
    }
    Some(text.split_at(len))
}

/// Split the quality symbol off the front of `text`.
///
/// Always succeeds because the empty quality is accepted.
pub(crate) fn match_quality(text: &str) -> (&str, &str) {
    let mut best: Option<usize> = None;
    for slots in QUALITY_ALTERNATIVES {
        if let Some(len) = match_alternative(slots, text) {
            // Strictly longer only, so earlier alternatives keep ties
            if best.map_or(true, |b| len > b) {
                best = Some(len);
            }
        }
    }
    text.split_at(best.unwrap_or(0))
}

/// Parse an optional `/<root>` bass suffix.
pub(crate) fn match_bass(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('/')?;
    match_root(rest).map(|(bass, _)| bass)
}
