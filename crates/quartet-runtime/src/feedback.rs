#![forbid(unsafe_code)]

//! Per-word visual feedback.

use std::collections::BTreeMap;

use quartet_core::WordId;
use serde::Serialize;

/// Visual state of a single word tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordFeedback {
    #[default]
    Idle,
    Hop,
    Shake,
}

/// Sparse map of word feedback; absent words are [`WordFeedback::Idle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeedbackMap {
    entries: BTreeMap<WordId, WordFeedback>,
}

impl FeedbackMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &WordId) -> WordFeedback {
        self.entries.get(id).copied().unwrap_or_default()
    }

    pub fn set<'a, I>(&mut self, ids: I, status: WordFeedback)
    where
        I: IntoIterator<Item = &'a WordId>,
    {
        for id in ids {
            self.entries.insert(id.clone(), status);
        }
    }

    /// Forget the listed words entirely.
    pub fn clear<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a WordId>,
    {
        for id in ids {
            self.entries.remove(id);
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Words whose feedback is not idle.
    pub fn active(&self) -> impl Iterator<Item = (&WordId, WordFeedback)> {
        self.entries
            .iter()
            .filter(|(_, status)| **status != WordFeedback::Idle)
            .map(|(id, status)| (id, *status))
    }

    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.active().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_words_are_idle() {
        let map = FeedbackMap::new();
        assert_eq!(map.get(&WordId::from("x")), WordFeedback::Idle);
        assert!(map.is_quiet());
    }

    #[test]
    fn set_clear_and_reset() {
        let ids = [WordId::from("a"), WordId::from("b")];
        let mut map = FeedbackMap::new();
        map.set(&ids, WordFeedback::Hop);
        assert_eq!(map.get(&ids[0]), WordFeedback::Hop);
        assert_eq!(map.active().count(), 2);

        map.set(&ids[..1], WordFeedback::Idle);
        assert_eq!(map.active().count(), 1);

        map.clear(&ids[1..]);
        assert!(map.is_quiet());

        map.set(&ids, WordFeedback::Shake);
        map.reset();
        assert!(map.is_quiet());
    }
}
