//! Instantaneous descriptions: textual snapshots of a machine configuration.

use crate::tape::Tape;
use crate::types::{State, Symbol};
use serde::Serialize;
use std::fmt;

/// A rendered configuration.
///
/// The window spans the occupied part of the tape extended to include the head; if the tape is
/// blank the window is just the head cell. Blank cells render as
/// [`BLANK_PLACEHOLDER`](crate::types::BLANK_PLACEHOLDER).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstantaneousDescription {
    /// Cells strictly left of the head within the window.
    pub left: String,
    /// The cell under the head.
    pub current: String,
    /// Cells strictly right of the head within the window.
    pub right: String,
    pub state: String,
    pub cache: String,
    pub head: i64,
}

impl InstantaneousDescription {
    pub fn capture(tape: &Tape, head: i64, state: &State, cache: &Symbol) -> Self {
        let (min, max) = tape
            .occupied_bounds()
            .map_or((head, head), |(min, max)| (min.min(head), max.max(head)));

        let render = |range: std::ops::Range<i64>| -> String {
            range.map(|pos| tape.read(pos).to_string()).collect()
        };

        Self {
            left: render(min..head),
            current: tape.read(head).to_string(),
            right: render(head + 1..max + 1),
            state: state.to_string(),
            cache: cache.to_string(),
            head,
        }
    }
}

impl fmt::Display for InstantaneousDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {}{}    [mem={}]  head={}",
            self.left, self.state, self.current, self.right, self.cache, self.head
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(tape: &Tape, head: i64) -> String {
        InstantaneousDescription::capture(tape, head, &State::from("q0"), &Symbol::blank())
            .to_string()
    }

    #[test]
    fn test_head_at_start() {
        let tape = Tape::from_input("111");
        assert_eq!(describe(&tape, 0), " (q0) 111    [mem=_]  head=0");
    }

    #[test]
    fn test_head_in_middle() {
        let tape = Tape::from_input("abc");
        let id = InstantaneousDescription::capture(&tape, 1, &State::from("q0"), &Symbol::blank());
        assert_eq!(id.left, "a");
        assert_eq!(id.current, "b");
        assert_eq!(id.right, "c");
        assert_eq!(id.to_string(), "a (q0) bc    [mem=_]  head=1");
    }

    #[test]
    fn test_head_past_occupied_region() {
        let tape = Tape::from_input("11");
        assert_eq!(describe(&tape, 4), "11__ (q0) _    [mem=_]  head=4");
    }

    #[test]
    fn test_head_left_of_occupied_region() {
        let tape = Tape::from_input("ab");
        assert_eq!(describe(&tape, -2), " (q0) __ab    [mem=_]  head=-2");
    }

    #[test]
    fn test_blank_tape_collapses_to_head() {
        let tape = Tape::new();
        assert_eq!(describe(&tape, 7), " (q0) _    [mem=_]  head=7");
    }

    #[test]
    fn test_interior_blanks_and_cache() {
        let mut tape = Tape::from_input("a");
        tape.write(3, Symbol::from('z'));
        let id = InstantaneousDescription::capture(&tape, 0, &State::from("q2"), &Symbol::from('x'));
        assert_eq!(id.to_string(), " (q2) a__z    [mem=x]  head=0");
    }
}
