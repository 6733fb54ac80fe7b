//! Measurement tracker: classifies keystrokes against the current test item

use crate::engine::sequence::{MeasureState, TestItem, TestSequence};
use crate::engine::EngineError;
use serde::{Deserialize, Serialize};

/// What to do when the pointer has been moved back onto an item that already
/// holds a classification and another classifying key arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReclassifyPolicy {
    /// Replace the recorded state, allowing corrections.
    #[default]
    Overwrite,
    /// Keep the first recorded state; the pointer still advances so the
    /// session cannot stall on an already-judged item.
    KeepFirst,
}

/// Outcome of feeding one key to [`MeasurementTracker::classify`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Whether the key was a classifying key (match or space).
    pub applied: bool,
    /// State written to the item, if any.
    pub new_state: Option<MeasureState>,
    /// Pointer position after the call, if it moved.
    pub new_pointer: Option<usize>,
}

impl Classification {
    fn ignored() -> Self {
        Self {
            applied: false,
            new_state: None,
            new_pointer: None,
        }
    }
}

/// Owns the test sequence and the current-item pointer.
///
/// `classify` is the only path that writes item state; `select` only moves
/// the pointer. Both are synchronous and O(1).
#[derive(Debug, Clone)]
pub struct MeasurementTracker {
    sequence: TestSequence,
    pointer: usize,
    policy: ReclassifyPolicy,
}

impl MeasurementTracker {
    pub fn new(sequence: TestSequence) -> Self {
        Self::with_policy(sequence, ReclassifyPolicy::default())
    }

    pub fn with_policy(sequence: TestSequence, policy: ReclassifyPolicy) -> Self {
        debug_assert!(!sequence.is_empty());
        Self {
            sequence,
            pointer: 0,
            policy,
        }
    }

    /// Classify the current item from a raw key identifier.
    ///
    /// A key equal to the current letter (case-insensitive) records `Right`;
    /// the space key is the explicit "I cannot read this" signal and records
    /// `Wrong` regardless of the letter. Anything else leaves the tracker
    /// untouched and reports `applied: false`.
    pub fn classify(&mut self, key: &str) -> Classification {
        let current = self.sequence.items()[self.pointer].clone();

        let state = if key == " " {
            MeasureState::Wrong
        } else if key_matches(key, current.character) {
            MeasureState::Right
        } else {
            log::debug!("ignoring key {:?} at index {}", key, self.pointer);
            return Classification::ignored();
        };

        let new_state = match (current.state, self.policy) {
            (MeasureState::Unknown, _) | (_, ReclassifyPolicy::Overwrite) => {
                self.sequence.set_state(self.pointer, state);
                Some(state)
            }
            (_, ReclassifyPolicy::KeepFirst) => None,
        };

        self.pointer = (self.pointer + 1) % self.sequence.len();
        log::debug!("classified as {:?}, pointer now {}", state, self.pointer);

        Classification {
            applied: true,
            new_state,
            new_pointer: Some(self.pointer),
        }
    }

    /// Move the pointer to `index` (e.g. from a table cell click).
    ///
    /// Never touches any item's state.
    pub fn select(&mut self, index: usize) -> Result<(), EngineError> {
        if index >= self.sequence.len() {
            return Err(EngineError::IndexOutOfRange {
                index,
                len: self.sequence.len(),
            });
        }
        self.pointer = index;
        Ok(())
    }

    pub fn current_item(&self) -> &TestItem {
        &self.sequence.items()[self.pointer]
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn items(&self) -> &[TestItem] {
        self.sequence.items()
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// (right, wrong, unknown) counts across the whole sequence.
    pub fn tally(&self) -> (usize, usize, usize) {
        let mut right = 0;
        let mut wrong = 0;
        let mut unknown = 0;
        for item in self.sequence.items() {
            match item.state {
                MeasureState::Right => right += 1,
                MeasureState::Wrong => wrong += 1,
                MeasureState::Unknown => unknown += 1,
            }
        }
        (right, wrong, unknown)
    }

    /// Replace the sequence and reset the pointer (session restart).
    pub fn restart(&mut self, sequence: TestSequence) {
        debug_assert!(!sequence.is_empty());
        self.sequence = sequence;
        self.pointer = 0;
    }
}

/// Case-insensitive match of a one-character key identifier against a letter.
fn key_matches(key: &str, character: char) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.eq_ignore_ascii_case(&character),
        _ => false,
    }
}
