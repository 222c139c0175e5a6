//! Human move input
//!
//! The engine never touches a terminal. A `MoveSource` hands it raw lines
//! and is told when an entry was rejected so it can explain why.

use std::collections::VecDeque;

use crate::board::Mark;
use crate::error::MoveError;

/// Supplier of raw move text for human players
pub trait MoveSource {
    /// Next raw entry for `mark`, `None` once input is exhausted
    fn read_move(&mut self, mark: Mark) -> Option<String>;

    /// Called when an entry was rejected and the player must try again
    fn reject(&mut self, _error: &MoveError) {}
}

/// Source with no input at all, for matches between automated players
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl MoveSource for NoInput {
    fn read_move(&mut self, _mark: Mark) -> Option<String> {
        None
    }
}

/// Pre-recorded entries, replayed in order. Rejections are kept for inspection.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    rejections: Vec<MoveError>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            rejections: Vec::new(),
        }
    }

    /// Entries not yet consumed
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    pub fn rejections(&self) -> &[MoveError] {
        &self.rejections
    }
}

impl MoveSource for ScriptedInput {
    fn read_move(&mut self, _mark: Mark) -> Option<String> {
        self.lines.pop_front()
    }

    fn reject(&mut self, error: &MoveError) {
        self.rejections.push(error.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_replays_in_order() {
        let mut input = ScriptedInput::new(["1 1", "2 2"]);
        assert_eq!(input.remaining(), 2);
        assert_eq!(input.read_move(Mark::X).as_deref(), Some("1 1"));
        assert_eq!(input.read_move(Mark::O).as_deref(), Some("2 2"));
        assert_eq!(input.read_move(Mark::X), None);
    }

    #[test]
    fn test_no_input() {
        assert_eq!(NoInput.read_move(Mark::X), None);
    }
}
