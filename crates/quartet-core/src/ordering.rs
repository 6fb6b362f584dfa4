#![forbid(unsafe_code)]

//! Grid reordering helpers.
//!
//! All functions return a new ordering and leave their input untouched. None
//! of them adds or drops cards: the output is always a permutation.

use crate::puzzle::{WordCard, WordId};

/// Move the cards named in `solved` to the front, keeping relative order
/// inside both groups.
#[must_use]
pub fn reorder_solved_first(words: &[WordCard], solved: &[WordId]) -> Vec<WordCard> {
    let (mut front, back): (Vec<WordCard>, Vec<WordCard>) = words
        .iter()
        .cloned()
        .partition(|card| solved.contains(&card.id));
    front.extend(back);
    front
}

/// Swap two cards by id.
///
/// Returns `None` when the ids are equal or either card is not on the grid.
#[must_use]
pub fn swap_words(words: &[WordCard], from: &WordId, to: &WordId) -> Option<Vec<WordCard>> {
    if from == to {
        return None;
    }
    let from_index = words.iter().position(|card| &card.id == from)?;
    let to_index = words.iter().position(|card| &card.id == to)?;
    let mut next = words.to_vec();
    next.swap(from_index, to_index);
    Some(next)
}

/// True when `candidate` holds exactly the cards of `words`, in any order.
#[must_use]
pub fn is_permutation_of(candidate: &[WordCard], words: &[WordCard]) -> bool {
    if candidate.len() != words.len() {
        return false;
    }
    let mut left: Vec<&WordId> = candidate.iter().map(|card| &card.id).collect();
    let mut right: Vec<&WordId> = words.iter().map(|card| &card.id).collect();
    left.sort();
    right.sort();
    left == right
}
