use crate::error::{Result, StudyError};
use crate::models::Flashcard;

/// Flip-card review position over a deck of known length.
///
/// The navigator never wraps around; every move hides the answer again.
/// An empty deck is valid and turns every navigation into a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckNavigator {
    len: usize,
    index: usize,
    revealed: bool,
}

impl DeckNavigator {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            revealed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// 1-based position for "n of N" displays, `None` on an empty deck.
    pub fn position(&self) -> Option<(usize, usize)> {
        (!self.is_empty()).then_some((self.index + 1, self.len))
    }

    pub fn current<'a>(&self, cards: &'a [Flashcard]) -> Option<&'a Flashcard> {
        if self.is_empty() {
            return None;
        }
        cards.get(self.index)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.len
    }

    pub fn next(&mut self) {
        if self.is_empty() {
            return;
        }
        self.index = (self.index + 1).min(self.len - 1);
        self.revealed = false;
    }

    pub fn previous(&mut self) {
        if self.is_empty() {
            return;
        }
        self.index = self.index.saturating_sub(1);
        self.revealed = false;
    }

    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(StudyError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.index = index;
        self.revealed = false;
        Ok(())
    }

    pub fn toggle_reveal(&mut self) {
        if !self.is_empty() {
            self.revealed = !self.revealed;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.revealed = false;
    }

    /// Re-targets the navigator at a deck of a new length, starting over.
    pub fn reload(&mut self, len: usize) {
        *self = Self::new(len);
    }
}
