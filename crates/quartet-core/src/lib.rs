#![forbid(unsafe_code)]

//! Quartet core: puzzle model, pure game reducer, and hop timing policy.
//!
//! # Role in Quartet
//! `quartet-core` holds everything that is a pure function of its inputs.
//! There is no clock, no timer, and no pointer state here; those live in
//! `quartet-runtime`, which drives this crate.
//!
//! # Primary responsibilities
//! - **Puzzle**: validated puzzle documents and the word cards they produce.
//! - **Reducer**: [`game_reducer`], the single transition function over
//!   [`GameState`].
//! - **Timing**: [`HopTiming`], the staggered hop schedule and reveal delays.
//! - **Ordering**: grid permutations (solved-first, swap).
//! - **Provider**: the [`PuzzleProvider`] seam and an in-memory
//!   [`StaticCatalog`].
//! - **Geometry**: points and rectangles for drag hit-testing.

pub mod error;
pub mod geometry;
pub mod ordering;
pub mod provider;
pub mod puzzle;
pub mod reducer;
pub mod timing;

pub use error::{ProviderError, PuzzleError};
pub use geometry::{Offset, Point, Rect};
pub use provider::{DateKey, PuzzleProvider, StaticCatalog};
pub use puzzle::{
    CATEGORY_COUNT, CategoryColor, CategoryDefinition, CategoryId, DEFAULT_MISTAKES_ALLOWED,
    Puzzle, PuzzleDocument, WORDS_PER_CATEGORY, WordCard, WordId, ordered_categories,
};
pub use reducer::{
    GameAction, GameState, GameStatus, PendingSolve, SELECTION_LIMIT, Selection, game_reducer,
};
pub use timing::{HopPlan, HopTiming, SettlePadding};
