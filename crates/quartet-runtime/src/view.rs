#![forbid(unsafe_code)]

//! Render-ready snapshot of a game.
//!
//! [`GameView`] is derived on request from the reducer state, the feedback
//! map, and the drag context. It owns its data, so a host can keep it across
//! frames or serialize it to a UI thread.

use quartet_core::{
    CategoryDefinition, CategoryId, DateKey, GameStatus, Puzzle, WordCard, WordId,
};
use serde::Serialize;

use crate::drag::{DragPhase, SettleRequest};
use crate::feedback::{FeedbackMap, WordFeedback};

/// One word tile. Category membership stays hidden until the category is
/// solved or revealed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub id: WordId,
    pub label: String,
    pub feedback: WordFeedback,
    pub selected: bool,
    /// The tile is pinned in place while a drag or settle is in progress.
    pub layout_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragView {
    pub phase: DragPhase,
    pub dragging: Option<WordId>,
    pub target: Option<WordId>,
    pub layout_locked: Option<WordId>,
    pub pending_settle: Option<SettleRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    /// Puzzle date as stored in the document.
    pub date: Option<String>,
    /// Human-readable date, e.g. "October 7, 2024".
    pub date_label: Option<String>,
    /// Unsolved tiles in grid order.
    pub words: Vec<TileView>,
    pub selected_ids: Vec<WordId>,
    /// Solved categories in the order they were found.
    pub solved_categories: Vec<CategoryDefinition>,
    /// Unsolved categories revealed so far after a loss.
    pub revealed_categories: Vec<CategoryDefinition>,
    /// Number of post-loss reveals still to come.
    pub reveals_remaining: usize,
    pub mistakes_remaining: u8,
    pub mistakes_allowed: u8,
    pub status: GameStatus,
    /// Whether ordinary input (toggle, shuffle, clear) is refused right now.
    pub locked: bool,
    /// Whether `submit_selection` would be accepted right now.
    pub can_submit: bool,
    pub solve_pending: bool,
    pub drag: DragView,
}

/// Inputs to [`GameView::capture`], borrowed from the facade.
pub(crate) struct ViewParts<'a> {
    pub puzzle: Option<&'a Puzzle>,
    pub available_words: &'a [WordCard],
    pub selected_ids: &'a [WordId],
    pub solved_category_ids: &'a [CategoryId],
    pub shown_reveals: &'a [CategoryId],
    pub total_reveals: usize,
    pub mistakes_remaining: u8,
    pub mistakes_allowed: u8,
    pub status: GameStatus,
    pub locked: bool,
    pub can_submit: bool,
    pub solve_pending: bool,
    pub feedback: &'a FeedbackMap,
    pub drag: DragView,
}

impl GameView {
    pub(crate) fn capture(parts: ViewParts<'_>) -> Self {
        let lookup = |ids: &[CategoryId]| -> Vec<CategoryDefinition> {
            let Some(puzzle) = parts.puzzle else {
                return Vec::new();
            };
            ids.iter()
                .filter_map(|id| puzzle.category(id).cloned())
                .collect()
        };

        let pinned = parts.drag.layout_locked.as_ref();
        let words = parts
            .available_words
            .iter()
            .map(|card| TileView {
                id: card.id.clone(),
                label: card.label.clone(),
                feedback: parts.feedback.get(&card.id),
                selected: parts.selected_ids.contains(&card.id),
                layout_locked: pinned == Some(&card.id),
            })
            .collect();

        let date = parts.puzzle.map(|puzzle| puzzle.date().to_owned());
        let date_label = date
            .as_deref()
            .and_then(|date| date.parse::<DateKey>().ok())
            .map(DateKey::label);

        Self {
            date,
            date_label,
            words,
            selected_ids: parts.selected_ids.to_vec(),
            solved_categories: lookup(parts.solved_category_ids),
            revealed_categories: lookup(parts.shown_reveals),
            reveals_remaining: parts.total_reveals.saturating_sub(parts.shown_reveals.len()),
            mistakes_remaining: parts.mistakes_remaining,
            mistakes_allowed: parts.mistakes_allowed,
            status: parts.status,
            locked: parts.locked,
            can_submit: parts.can_submit,
            solve_pending: parts.solve_pending,
            drag: parts.drag,
        }
    }

    /// The tile for `id`, if it is still on the grid.
    #[must_use]
    pub fn tile(&self, id: &WordId) -> Option<&TileView> {
        self.words.iter().find(|tile| &tile.id == id)
    }

    /// Serialize the snapshot for a renderer outside the process.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the snapshot cannot be encoded.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
