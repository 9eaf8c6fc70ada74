use serde::{Deserialize, Serialize};

/// Address of one version within the loaded lesson set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionId {
    pub question: usize,
    pub version: usize,
}

impl VersionId {
    pub fn new(question: usize, version: usize) -> Self {
        Self { question, version }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedWord {
    pub word: String,
    /// Presentation slot the word was taken from. Identity is by slot, never
    /// by text, so repeated words stay independent.
    pub slot: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    #[default]
    Unanswered,
    InProgress,
    Correct,
    Incorrect,
}

/// Ordered reconstruction of one version, plus the slots it draws from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionAnswer {
    slots: Vec<String>,
    consumed: Vec<bool>,
    entries: Vec<SelectedWord>,
    status: VersionStatus,
}

impl VersionAnswer {
    /// `slots` is the presentation order; slot `i` holds `slots[i]`.
    pub fn new(slots: Vec<String>) -> Self {
        let consumed = vec![false; slots.len()];
        Self {
            slots,
            consumed,
            entries: Vec::new(),
            status: VersionStatus::Unanswered,
        }
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn entries(&self) -> &[SelectedWord] {
        &self.entries
    }

    pub fn status(&self) -> VersionStatus {
        self.status
    }

    pub fn is_consumed(&self, slot: usize) -> bool {
        self.consumed.get(slot).copied().unwrap_or(true)
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == self.slots.len()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.word.as_str())
    }

    /// Unselected slots in presentation order.
    pub fn remaining(&self) -> impl Iterator<Item = (usize, &str)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.consumed[*i])
            .map(|(i, w)| (i, w.as_str()))
    }

    /// Appends the word held by `slot`. No-op when the slot is unknown or
    /// already consumed.
    pub fn select(&mut self, slot: usize) -> bool {
        if self.is_consumed(slot) {
            return false;
        }
        self.consumed[slot] = true;
        self.entries.push(SelectedWord {
            word: self.slots[slot].clone(),
            slot,
        });
        self.status = VersionStatus::InProgress;
        true
    }

    /// Removes the entry at `position` and frees its slot. Any correctness
    /// mark is dropped.
    pub fn remove_at(&mut self, position: usize) -> Option<SelectedWord> {
        if position >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(position);
        self.consumed[removed.slot] = false;
        self.reset_status();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.consumed.iter_mut().for_each(|c| *c = false);
        self.status = VersionStatus::Unanswered;
    }

    pub(crate) fn mark(&mut self, status: VersionStatus) {
        self.status = status;
    }

    fn reset_status(&mut self) {
        self.status = if self.entries.is_empty() {
            VersionStatus::Unanswered
        } else {
            VersionStatus::InProgress
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(words: &[&str]) -> VersionAnswer {
        VersionAnswer::new(words.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn select_appends_and_consumes() {
        let mut a = answer(&["cat", "the", "sleeps"]);
        assert!(a.select(1));
        assert!(a.select(0));
        assert_eq!(a.words().collect::<Vec<_>>(), vec!["the", "cat"]);
        assert!(a.is_consumed(1));
        assert_eq!(a.status(), VersionStatus::InProgress);
    }

    #[test]
    fn consumed_or_unknown_slot_is_noop() {
        let mut a = answer(&["a", "b"]);
        assert!(a.select(0));
        assert!(!a.select(0));
        assert!(!a.select(7));
        assert_eq!(a.entries().len(), 1);
    }

    #[test]
    fn duplicate_words_are_independent_slots() {
        let mut a = answer(&["the", "dog", "the"]);
        assert!(a.select(0));
        assert!(a.select(2));
        assert_eq!(a.entries()[0].slot, 0);
        assert_eq!(a.entries()[1].slot, 2);

        let removed = a.remove_at(0).unwrap();
        assert_eq!(removed.slot, 0);
        assert!(!a.is_consumed(0));
        assert!(a.is_consumed(2));
        assert!(a.select(0));
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut a = answer(&["a"]);
        a.select(0);
        assert!(a.remove_at(1).is_none());
        assert_eq!(a.entries().len(), 1);
    }

    #[test]
    fn remove_drops_correct_mark() {
        let mut a = answer(&["a", "b"]);
        a.select(0);
        a.select(1);
        a.mark(VersionStatus::Correct);
        a.remove_at(1);
        assert_eq!(a.status(), VersionStatus::InProgress);
        a.remove_at(0);
        assert_eq!(a.status(), VersionStatus::Unanswered);
    }

    #[test]
    fn clear_frees_every_slot() {
        let mut a = answer(&["a", "b", "c"]);
        a.select(2);
        a.select(0);
        a.mark(VersionStatus::Incorrect);
        a.clear();
        assert!(a.entries().is_empty());
        assert_eq!(a.remaining().count(), 3);
        assert_eq!(a.status(), VersionStatus::Unanswered);
    }

    #[test]
    fn remaining_keeps_presentation_order() {
        let mut a = answer(&["x", "y", "z"]);
        a.select(1);
        let left: Vec<_> = a.remaining().collect();
        assert_eq!(left, vec![(0, "x"), (2, "z")]);
    }
}
