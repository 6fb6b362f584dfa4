#![forbid(unsafe_code)]

//! Pure game-state reducer.
//!
//! [`game_reducer`] is the single transition function over [`GameState`].
//! It is total over [`GameAction`]: every action produces a state, no action
//! panics, and nothing outside the returned value is touched. Calling it twice
//! with equal inputs yields equal outputs.
//!
//! # Invariants
//!
//! 1. `selected_ids.len() <= SELECTION_LIMIT`; a toggle at the limit is a no-op.
//! 2. `solved_category_ids` is append-only until the next hydration.
//! 3. `mistakes_remaining` never increases and never goes below zero.
//! 4. `status` only leaves `Playing`; `Won` and `Lost` are never reverted
//!    by `CompleteSolve` or `RecordMistake`.
//!
//! The "no actions after the game ends" rule is enforced by the caller, so
//! the reducer stays total for testing.

use std::sync::Arc;

use serde::Serialize;

use crate::puzzle::{CategoryId, DEFAULT_MISTAKES_ALLOWED, Puzzle, WordCard, WordId};

/// Maximum number of simultaneously selected words.
pub const SELECTION_LIMIT: usize = 4;

/// Overall outcome of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    #[inline]
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_playing()
    }
}

/// Insertion-ordered set of selected word ids, capped at [`SELECTION_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    ids: Vec<WordId>,
}

impl Selection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.ids.len() >= SELECTION_LIMIT
    }

    #[must_use]
    pub fn contains(&self, id: &WordId) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[WordId] {
        &self.ids
    }

    /// The selection after toggling `id`, or `None` when the toggle is
    /// rejected because the selection is full.
    fn toggled(&self, id: &WordId) -> Option<Self> {
        if let Some(position) = self.ids.iter().position(|selected| selected == id) {
            let mut ids = self.ids.clone();
            ids.remove(position);
            return Some(Self { ids });
        }
        if self.is_full() {
            return None;
        }
        let mut ids = self.ids.clone();
        ids.push(id.clone());
        Some(Self { ids })
    }
}

/// A correct guess whose reveal animation is still in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingSolve {
    pub category_id: CategoryId,
    pub word_ids: Vec<WordId>,
}

/// Puzzle progress: the single source of truth for scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Unsolved cards in grid order.
    pub available_words: Vec<WordCard>,
    pub selected_ids: Selection,
    /// Solved categories in the order they were found.
    pub solved_category_ids: Vec<CategoryId>,
    pub mistakes_remaining: u8,
    pub mistakes_allowed: u8,
    pub status: GameStatus,
    pub pending_solve: Option<PendingSolve>,
}

impl GameState {
    /// Initial progress for a freshly hydrated puzzle.
    #[must_use]
    pub fn new(puzzle: &Puzzle, mistakes_allowed: u8) -> Self {
        Self {
            available_words: puzzle.starting_cards().to_vec(),
            selected_ids: Selection::default(),
            solved_category_ids: Vec::new(),
            mistakes_remaining: mistakes_allowed,
            mistakes_allowed,
            status: GameStatus::Playing,
            pending_solve: None,
        }
    }

    /// Grid index of a card, if it is still on the grid.
    #[must_use]
    pub fn position_of(&self, id: &WordId) -> Option<usize> {
        self.available_words.iter().position(|card| &card.id == id)
    }

    #[must_use]
    pub fn card(&self, id: &WordId) -> Option<&WordCard> {
        self.available_words.iter().find(|card| &card.id == id)
    }

    /// Selected cards in grid order; ids no longer on the grid are skipped.
    #[must_use]
    pub fn selected_cards(&self) -> Vec<&WordCard> {
        self.available_words
            .iter()
            .filter(|card| self.selected_ids.contains(&card.id))
            .collect()
    }

    #[must_use]
    pub fn is_solved(&self, category: &CategoryId) -> bool {
        self.solved_category_ids.contains(category)
    }
}

impl Default for GameState {
    /// An empty board, used before the first puzzle is hydrated.
    fn default() -> Self {
        Self {
            available_words: Vec::new(),
            selected_ids: Selection::default(),
            solved_category_ids: Vec::new(),
            mistakes_remaining: DEFAULT_MISTAKES_ALLOWED,
            mistakes_allowed: DEFAULT_MISTAKES_ALLOWED,
            status: GameStatus::Playing,
            pending_solve: None,
        }
    }
}

/// Every transition the reducer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameAction {
    /// Discard all progress and rebuild from a puzzle.
    HydratePuzzle {
        puzzle: Arc<Puzzle>,
        mistakes_allowed: u8,
    },
    ToggleWord(WordId),
    SetWordOrder(Vec<WordCard>),
    MarkSolvePending(PendingSolve),
    CompleteSolve {
        category_id: CategoryId,
        word_ids: Vec<WordId>,
        total_category_count: usize,
    },
    RecordMistake,
    ClearSelection,
}

impl GameAction {
    /// Short name for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HydratePuzzle { .. } => "hydrate_puzzle",
            Self::ToggleWord(_) => "toggle_word",
            Self::SetWordOrder(_) => "set_word_order",
            Self::MarkSolvePending(_) => "mark_solve_pending",
            Self::CompleteSolve { .. } => "complete_solve",
            Self::RecordMistake => "record_mistake",
            Self::ClearSelection => "clear_selection",
        }
    }
}

/// Compute the next state. Pure and deterministic.
#[must_use]
pub fn game_reducer(state: &GameState, action: GameAction) -> GameState {
    match action {
        GameAction::HydratePuzzle {
            puzzle,
            mistakes_allowed,
        } => GameState::new(&puzzle, mistakes_allowed),

        GameAction::ToggleWord(id) => match state.selected_ids.toggled(&id) {
            Some(selected_ids) => GameState {
                selected_ids,
                ..state.clone()
            },
            None => state.clone(),
        },

        GameAction::SetWordOrder(words) => GameState {
            available_words: words,
            ..state.clone()
        },

        GameAction::MarkSolvePending(pending) => GameState {
            pending_solve: Some(pending),
            ..state.clone()
        },

        GameAction::CompleteSolve {
            category_id,
            word_ids,
            total_category_count,
        } => {
            let mut solved_category_ids = state.solved_category_ids.clone();
            solved_category_ids.push(category_id);
            let available_words = state
                .available_words
                .iter()
                .filter(|card| !word_ids.contains(&card.id))
                .cloned()
                .collect();
            let status = if solved_category_ids.len() == total_category_count
                && state.status.is_playing()
            {
                GameStatus::Won
            } else {
                state.status
            };
            GameState {
                available_words,
                solved_category_ids,
                status,
                pending_solve: None,
                ..state.clone()
            }
        }

        GameAction::RecordMistake => {
            let mistakes_remaining = state.mistakes_remaining.saturating_sub(1);
            let status = if mistakes_remaining == 0 && state.status.is_playing() {
                GameStatus::Lost
            } else {
                state.status
            };
            GameState {
                mistakes_remaining,
                status,
                ..state.clone()
            }
        }

        GameAction::ClearSelection => GameState {
            selected_ids: Selection::default(),
            ..state.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{CategoryColor, CategoryDefinition, PuzzleDocument};

    fn puzzle() -> Arc<Puzzle> {
        let category = |id: &str, color, words: [&str; 4]| CategoryDefinition {
            id: CategoryId::from(id),
            title: id.to_uppercase(),
            color,
            words: words.iter().map(|w| (*w).to_owned()).collect(),
        };
        let doc = PuzzleDocument {
            date: "2024-10-01".into(),
            categories: vec![
                category("easy", CategoryColor::Yellow, ["apple", "banana", "citrus", "date"]),
                category("medium", CategoryColor::Green, ["emerald", "garnet", "opal", "topaz"]),
                category("hard", CategoryColor::Blue, ["alpha", "beta", "gamma", "delta"]),
                category("spicy", CategoryColor::Purple, ["north", "south", "east", "west"]),
            ],
            start_grid: None,
            mistakes_allowed: None,
        };
        Arc::new(doc.validate().unwrap())
    }

    fn initial() -> GameState {
        GameState::new(&puzzle(), DEFAULT_MISTAKES_ALLOWED)
    }

    fn ids_for(state: &GameState, category: &str) -> Vec<WordId> {
        state
            .available_words
            .iter()
            .filter(|card| card.category_id == category)
            .map(|card| card.id.clone())
            .collect()
    }

    #[test]
    fn hydrate_resets_everything() {
        let mut state = initial();
        state = game_reducer(&state, GameAction::RecordMistake);
        state = game_reducer(&state, GameAction::ToggleWord(WordId::from("easy-0")));
        let next = game_reducer(
            &state,
            GameAction::HydratePuzzle {
                puzzle: puzzle(),
                mistakes_allowed: 4,
            },
        );
        assert_eq!(next.available_words.len(), 16);
        assert!(next.selected_ids.is_empty());
        assert!(next.solved_category_ids.is_empty());
        assert_eq!(next.mistakes_remaining, 4);
        assert_eq!(next.status, GameStatus::Playing);
        assert!(next.pending_solve.is_none());
    }

    #[test]
    fn toggle_caps_selection_at_four() {
        let initial = initial();
        let targets: Vec<WordId> = initial
            .available_words
            .iter()
            .take(5)
            .map(|card| card.id.clone())
            .collect();
        let mut state = initial;
        for (index, id) in targets.iter().enumerate() {
            state = game_reducer(&state, GameAction::ToggleWord(id.clone()));
            if index < 4 {
                assert!(state.selected_ids.contains(id));
            } else {
                assert_eq!(state.selected_ids.len(), 4);
                assert!(!state.selected_ids.contains(id));
            }
        }
        state = game_reducer(&state, GameAction::ToggleWord(targets[0].clone()));
        assert!(!state.selected_ids.contains(&targets[0]));
        assert_eq!(state.selected_ids.len(), 3);
    }

    #[test]
    fn mark_pending_does_not_touch_words() {
        let state = initial();
        let easy = ids_for(&state, "easy");
        let next = game_reducer(
            &state,
            GameAction::MarkSolvePending(PendingSolve {
                category_id: CategoryId::from("easy"),
                word_ids: easy.clone(),
            }),
        );
        assert_eq!(next.available_words, state.available_words);
        assert_eq!(
            next.pending_solve.as_ref().map(|p| p.word_ids.clone()),
            Some(easy)
        );
    }

    #[test]
    fn complete_solve_removes_words_and_clears_pending() {
        let state = initial();
        let easy = ids_for(&state, "easy");
        let pending = game_reducer(
            &state,
            GameAction::MarkSolvePending(PendingSolve {
                category_id: CategoryId::from("easy"),
                word_ids: easy.clone(),
            }),
        );
        let next = game_reducer(
            &pending,
            GameAction::CompleteSolve {
                category_id: CategoryId::from("easy"),
                word_ids: easy,
                total_category_count: 4,
            },
        );
        assert!(next.pending_solve.is_none());
        assert_eq!(next.solved_category_ids, vec![CategoryId::from("easy")]);
        assert!(next.available_words.iter().all(|c| c.category_id != "easy"));
        assert_eq!(next.available_words.len(), 12);
        assert_eq!(next.status, GameStatus::Playing);
    }

    #[test]
    fn won_only_when_all_categories_solved() {
        let initial = initial();
        let mut state = initial.clone();
        for (index, category) in ["easy", "medium", "hard", "spicy"].iter().enumerate() {
            state = game_reducer(
                &state,
                GameAction::CompleteSolve {
                    category_id: CategoryId::from(*category),
                    word_ids: ids_for(&initial, category),
                    total_category_count: 4,
                },
            );
            if index < 3 {
                assert_eq!(state.status, GameStatus::Playing);
            }
        }
        assert_eq!(state.status, GameStatus::Won);
        assert!(state.available_words.is_empty());
    }

    #[test]
    fn mistakes_floor_at_zero_and_lose() {
        let mut state = initial();
        for expected in [3u8, 2, 1, 0] {
            state = game_reducer(&state, GameAction::RecordMistake);
            assert_eq!(state.mistakes_remaining, expected);
            let expected_status = if expected == 0 {
                GameStatus::Lost
            } else {
                GameStatus::Playing
            };
            assert_eq!(state.status, expected_status);
        }
        state = game_reducer(&state, GameAction::RecordMistake);
        assert_eq!(state.mistakes_remaining, 0);
        assert_eq!(state.status, GameStatus::Lost);
    }

    #[test]
    fn won_is_not_reverted_by_mistakes() {
        let mut state = initial();
        state.status = GameStatus::Won;
        state.mistakes_remaining = 1;
        let next = game_reducer(&state, GameAction::RecordMistake);
        assert_eq!(next.status, GameStatus::Won);
        assert_eq!(next.mistakes_remaining, 0);
    }

    #[test]
    fn clear_selection_empties_set() {
        let mut state = initial();
        for card in initial().available_words.iter().take(2) {
            state = game_reducer(&state, GameAction::ToggleWord(card.id.clone()));
        }
        assert_eq!(state.selected_ids.len(), 2);
        state = game_reducer(&state, GameAction::ClearSelection);
        assert!(state.selected_ids.is_empty());
    }

    #[test]
    fn set_word_order_replaces_grid() {
        let state = initial();
        let mut reversed = state.available_words.clone();
        reversed.reverse();
        let next = game_reducer(&state, GameAction::SetWordOrder(reversed.clone()));
        assert_eq!(next.available_words, reversed);
    }

    #[test]
    fn reducer_is_deterministic() {
        let state = initial();
        let action = GameAction::ToggleWord(WordId::from("hard-2"));
        assert_eq!(
            game_reducer(&state, action.clone()),
            game_reducer(&state, action)
        );
    }
}
