#![forbid(unsafe_code)]

//! The game facade.
//!
//! [`Game`] is the one object a host talks to. It owns the reducer state,
//! the animation controller, the drag controller, the gesture recognizer,
//! the motion tracer, and the logical clock, and keeps them in lockstep.
//!
//! # Control flow
//!
//! ```text
//!   host intent ──▶ lock check ──▶ instant change ──▶ game_reducer
//!                              └─▶ verdict ──▶ AnimationController ──(timers)──▶ game_reducer
//! ```
//!
//! Time only moves through [`Game::advance`] / [`Game::advance_to`]. Due
//! timers fire one at a time in deadline order, each observing the state
//! left by the previous one, and the clock reads each timer's own deadline
//! while it runs.
//!
//! # Invariants
//!
//! 1. Once the status is terminal, only `HydratePuzzle` reaches the reducer.
//! 2. Hydration cancels every timer and resets feedback, drag, gesture, and
//!    tracer before the new state is built.
//! 3. Submitting clears the selection before the verdict animation starts.
//! 4. The post-loss reveal starts only after the final mistake animation has
//!    settled.
//!
//! # Failure Modes
//!
//! - Operations refused by the interaction lock return `false` / `None` and
//!   change nothing.
//! - A malformed document fails [`Game::hydrate`] and leaves the current
//!   game untouched.

use std::sync::Arc;
use std::time::Duration;

use quartet_core::{
    CategoryId, DateKey, GameAction, GameState, GameStatus, PendingSolve, Point, ProviderError,
    Puzzle, PuzzleDocument, PuzzleError, PuzzleProvider, Rect, SELECTION_LIMIT, WordCard, WordId,
    game_reducer, ordered_categories,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::animation::{AnimationController, FailReveal, LockScope, SolvePhase};
use crate::config::GameConfig;
use crate::drag::{DragController, DropLocator, DropOutcome, LayoutProbe, SettleResolution};
use crate::error::ConfigError;
use crate::feedback::FeedbackMap;
use crate::gesture::{GestureEvent, GestureRecognizer, PointerKind};
use crate::tracer::MotionTracer;
use crate::view::{DragView, GameView, ViewParts};

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The selection is this category; its reveal animation is running.
    Solved(CategoryId),
    Mistake,
}

#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    puzzle: Option<Arc<Puzzle>>,
    state: GameState,
    animation: AnimationController,
    drag: DragController,
    gesture: GestureRecognizer,
    tracer: Box<dyn MotionTracer>,
    rng: SmallRng,
    now: Duration,
}

impl Game {
    /// Build an empty game. Nothing is playable until a puzzle is hydrated.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let rng = match config.shuffle_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        tracing::debug!(target: "quartet.game", config = %config.to_jsonl(), "game created");
        Ok(Self {
            animation: AnimationController::new(config.timing),
            gesture: GestureRecognizer::new(config.gesture),
            tracer: config.tracer.build(),
            drag: DragController::new(),
            puzzle: None,
            state: GameState::default(),
            rng,
            now: Duration::ZERO,
            config,
        })
    }

    /// Replace the configured motion tracer.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Box<dyn MotionTracer>) -> Self {
        self.tracer = tracer;
        self
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_deref()
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn feedback(&self) -> &FeedbackMap {
        self.animation.feedback()
    }

    #[must_use]
    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }

    #[must_use]
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    #[must_use]
    pub fn tracer(&self) -> &dyn MotionTracer {
        self.tracer.as_ref()
    }

    #[must_use]
    pub fn solve_phase(&self) -> Option<SolvePhase> {
        self.animation.solve_phase()
    }

    /// Whether an operation with `scope` would be refused right now.
    #[must_use]
    pub fn is_locked(&self, scope: LockScope) -> bool {
        self.animation
            .is_interaction_locked(&self.state, self.drag.is_drag_locked(), scope)
    }

    /// The earliest moment at which [`advance_to`](Self::advance_to) has work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.animation.next_deadline(), self.gesture.long_press_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // -- Loading ------------------------------------------------------------

    /// Validate `document` and start it from scratch.
    pub fn hydrate(&mut self, document: PuzzleDocument) -> Result<(), PuzzleError> {
        let puzzle = document.validate()?;
        self.hydrate_puzzle(puzzle);
        Ok(())
    }

    /// Start an already validated puzzle from scratch.
    pub fn hydrate_puzzle(&mut self, puzzle: Puzzle) {
        let _span = tracing::debug_span!(target: "quartet.game", "hydrate", date = puzzle.date())
            .entered();
        self.animation.reset();
        self.drag.reset();
        self.gesture.reset();
        self.tracer.clear();

        let mistakes_allowed = puzzle
            .mistakes_allowed()
            .unwrap_or(self.config.mistakes_allowed);
        let puzzle = Arc::new(puzzle);
        self.puzzle = Some(Arc::clone(&puzzle));
        self.dispatch(GameAction::HydratePuzzle {
            puzzle,
            mistakes_allowed,
        });
        tracing::info!(target: "quartet.game", mistakes_allowed, "puzzle hydrated");
    }

    /// Fetch the puzzle for `key` from `provider` and hydrate it.
    pub fn load<P: PuzzleProvider + ?Sized>(
        &mut self,
        provider: &P,
        key: &DateKey,
    ) -> Result<(), ProviderError> {
        let document = provider.fetch(key)?;
        self.hydrate(document)?;
        Ok(())
    }

    // -- Player actions -----------------------------------------------------

    /// Select or deselect a word. Returns whether the toggle was applied.
    pub fn toggle_word(&mut self, id: &WordId) -> bool {
        if self.is_locked(LockScope::DEFAULT) || self.state.position_of(id).is_none() {
            return false;
        }
        self.animation.set_word_idle(id);
        self.dispatch(GameAction::ToggleWord(id.clone()));
        true
    }

    pub fn shuffle_words(&mut self) -> bool {
        if self.is_locked(LockScope::DEFAULT) {
            return false;
        }
        let action = self.animation.shuffle_words(&self.state, &mut self.rng);
        self.dispatch(action);
        true
    }

    /// Replace the grid order with a permutation of it.
    pub fn reorder_words(&mut self, next_order: Vec<WordCard>) -> bool {
        if self.is_locked(LockScope::SOLVE_IDLE) {
            return false;
        }
        match self.animation.reorder_words(&self.state, next_order) {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.is_locked(LockScope::DEFAULT) {
            return false;
        }
        self.animation
            .clear_selection_feedback(self.state.selected_ids.as_slice());
        self.dispatch(GameAction::ClearSelection);
        true
    }

    /// Judge the current selection. Returns `None` unless four selected words
    /// are still on the grid and the game accepts a submission.
    pub fn submit_selection(&mut self) -> Option<Verdict> {
        if !self.selection_on_grid() || self.is_locked(LockScope::SOLVE_IDLE) {
            return None;
        }
        let puzzle = self.puzzle.clone()?;
        let _span = tracing::debug_span!(target: "quartet.game", "submit").entered();

        let word_ids: Vec<WordId> = self.state.selected_ids.iter().cloned().collect();
        let solved = self.matching_category();
        self.dispatch(GameAction::ClearSelection);

        match solved {
            Some(category_id) => {
                tracing::debug!(target: "quartet.game", category = %category_id, "guess correct");
                let pending = PendingSolve {
                    category_id: category_id.clone(),
                    word_ids,
                };
                let actions = self.animation.play_solve_animation(
                    self.now,
                    &self.state,
                    pending,
                    puzzle.category_count(),
                );
                self.dispatch_all(actions);
                Some(Verdict::Solved(category_id))
            }
            None => {
                tracing::debug!(target: "quartet.game", "guess wrong");
                let actions = self
                    .animation
                    .play_mistake_animation(self.now, &self.state, &word_ids);
                self.dispatch_all(actions);
                Some(Verdict::Mistake)
            }
        }
    }

    /// Whether every selected id still resolves to a card on the grid.
    ///
    /// A word toggled while its category's solve is pending leaves the grid
    /// when the solve completes, but stays in the selection.
    fn selection_on_grid(&self) -> bool {
        self.state.selected_ids.is_full()
            && self.state.selected_cards().len() == SELECTION_LIMIT
    }

    /// The unsolved category shared by every selected card, if there is one.
    fn matching_category(&self) -> Option<CategoryId> {
        let cards = self.state.selected_cards();
        let category = &cards.first()?.category_id;
        let same = cards.iter().all(|card| &card.category_id == category);
        (same && !self.state.is_solved(category)).then(|| category.clone())
    }

    // -- Drag ---------------------------------------------------------------

    /// Begin dragging `id`. Returns whether the drag started.
    pub fn on_word_drag_start(&mut self, id: &WordId) -> bool {
        if self.is_locked(LockScope::SOLVE_IDLE) || self.state.position_of(id).is_none() {
            tracing::debug!(target: "quartet.drag", word = %id, "drag start refused");
            return false;
        }
        if !self.drag.start(id.clone()) {
            return false;
        }
        self.tracer.start(id);
        true
    }

    /// Report the word under the pointer. Returns whether the target changed.
    pub fn on_word_drag_move(&mut self, target: Option<WordId>) -> bool {
        self.drag.drag_move(target)
    }

    /// Release the drag. A drop onto a target swaps the two cards.
    pub fn on_word_drag_end<P: LayoutProbe + ?Sized>(&mut self, probe: &P) -> Option<DropOutcome> {
        if let Some(id) = self.drag.dragging().cloned() {
            self.tracer.stop(&id);
        }
        let outcome = self.drag.end(probe)?;
        match self
            .animation
            .swap_word_cards(&self.state, &outcome.from, &outcome.to)
        {
            Some(action) => self.dispatch(action),
            None => {
                tracing::warn!(
                    target: "quartet.drag",
                    from = %outcome.from,
                    to = %outcome.to,
                    "drop target no longer on the grid"
                );
                self.drag.consume_settle();
            }
        }
        Some(outcome)
    }

    pub fn on_word_drag_cancel(&mut self) {
        if let Some(id) = self.drag.dragging().cloned() {
            self.tracer.stop(&id);
        }
        self.drag.cancel();
    }

    /// Settle deltas for the last drop, measured against the post-swap layout.
    /// When either word cannot be measured the settle is dropped and the
    /// layout lock released.
    #[must_use]
    pub fn resolve_drag_settle<P: LayoutProbe + ?Sized>(
        &mut self,
        probe: &P,
    ) -> Option<SettleResolution> {
        self.drag.resolve_settle(probe)
    }

    /// Finish the settle animation, releasing the layout lock.
    pub fn consume_drag_settle(&mut self) -> bool {
        self.drag.consume_settle().is_some()
    }

    // -- Pointer input ------------------------------------------------------

    /// Pointer pressed on a word tile.
    pub fn pointer_down(&mut self, id: WordId, kind: PointerKind, pos: Point) -> Vec<GestureEvent> {
        let events = self.gesture.pointer_down(id, kind, pos, self.now);
        self.apply_gestures(&events, pos, None::<&NoLocator>, None::<&NoProbe>);
        events
    }

    /// Pointer moved; `locator` hit-tests drop targets.
    pub fn pointer_move<L: DropLocator + ?Sized>(
        &mut self,
        pos: Point,
        locator: &L,
    ) -> Vec<GestureEvent> {
        let events = self.gesture.pointer_move(pos);
        self.apply_gestures(&events, pos, Some(locator), None::<&NoProbe>);
        events
    }

    /// Pointer released; `probe` measures tiles before a swap.
    pub fn pointer_up<P: LayoutProbe + ?Sized>(
        &mut self,
        pos: Point,
        probe: &P,
    ) -> Vec<GestureEvent> {
        let events = self.gesture.pointer_up(pos);
        self.apply_gestures(&events, pos, None::<&NoLocator>, Some(probe));
        events
    }

    pub fn pointer_cancel(&mut self) -> Vec<GestureEvent> {
        let events = self.gesture.pointer_cancel();
        self.apply_gestures(&events, Point::default(), None::<&NoLocator>, None::<&NoProbe>);
        events
    }

    fn apply_gestures<L, P>(
        &mut self,
        events: &[GestureEvent],
        pos: Point,
        locator: Option<&L>,
        probe: Option<&P>,
    ) where
        L: DropLocator + ?Sized,
        P: LayoutProbe + ?Sized,
    {
        for event in events {
            match event {
                GestureEvent::Tap { word_id } => {
                    self.toggle_word(word_id);
                }
                GestureEvent::DragStart { word_id, origin } => {
                    self.start_gesture_drag(word_id, *origin);
                }
                GestureEvent::DragMove { word_id, pos, .. } => {
                    if self.drag.dragging() != Some(word_id) {
                        continue;
                    }
                    self.tracer.record(word_id, self.now, *pos);
                    if let Some(locator) = locator {
                        self.drag.locate_and_move(*pos, locator);
                    }
                }
                GestureEvent::DragEnd { word_id, pos: end } => {
                    if self.drag.dragging() != Some(word_id) {
                        continue;
                    }
                    self.tracer.record(word_id, self.now, *end);
                    match probe {
                        Some(probe) => {
                            self.on_word_drag_end(probe);
                        }
                        None => self.on_word_drag_cancel(),
                    }
                }
                GestureEvent::DragCancel { word_id } => {
                    if self.drag.dragging() == Some(word_id) {
                        self.on_word_drag_cancel();
                    }
                }
            }
        }
        tracing::trace!(target: "quartet.drag", x = pos.x, y = pos.y, events = events.len(), "pointer");
    }

    fn start_gesture_drag(&mut self, word_id: &WordId, origin: Point) {
        if self.on_word_drag_start(word_id) {
            self.tracer.record(word_id, self.now, origin);
        } else {
            self.gesture.reset();
        }
    }

    // -- Clock --------------------------------------------------------------

    /// Move the logical clock forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.advance_to(self.now.saturating_add(dt));
    }

    /// Move the logical clock to `target`, running everything due on the way.
    /// Earlier targets are ignored.
    pub fn advance_to(&mut self, target: Duration) {
        if target < self.now {
            return;
        }
        loop {
            let long_press = self.gesture.long_press_deadline().filter(|due| *due <= target);
            let timer = self.animation.next_deadline().filter(|due| *due <= target);
            match (long_press, timer) {
                (Some(press_due), timer) if timer.is_none_or(|timer_due| press_due <= timer_due) => {
                    self.now = self.now.max(press_due);
                    match self.gesture.check_long_press(self.now) {
                        Some(GestureEvent::DragStart { word_id, origin }) => {
                            self.start_gesture_drag(&word_id, origin);
                        }
                        _ => self.gesture.reset(),
                    }
                }
                (_, Some(_)) => {
                    let Some((due, actions)) = self.animation.fire_next_due(target, &self.state)
                    else {
                        break;
                    };
                    self.now = self.now.max(due);
                    self.dispatch_all(actions);
                    self.start_fail_reveal_if_lost();
                }
                _ => break,
            }
        }
        self.now = target;
    }

    fn start_fail_reveal_if_lost(&mut self) {
        if self.state.status != GameStatus::Lost
            || self.animation.is_mistake_animating()
            || self.animation.fail_reveal().is_some()
        {
            return;
        }
        let Some(puzzle) = self.puzzle.as_deref() else {
            return;
        };
        let unsolved = puzzle
            .categories()
            .iter()
            .filter(|category| !self.state.is_solved(&category.id));
        let categories = ordered_categories(unsolved)
            .into_iter()
            .map(|category| category.id.clone())
            .collect();
        self.animation.start_fail_reveal(self.now, categories);
    }

    /// Cancel every timer and abandon pointer input. The board stays as shown.
    pub fn teardown(&mut self) {
        self.animation.teardown();
        self.gesture.reset();
        self.drag.cancel();
        tracing::debug!(target: "quartet.game", "game torn down");
    }

    // -- Dispatch -----------------------------------------------------------

    fn dispatch(&mut self, action: GameAction) {
        let name = action.name();
        if self.state.status.is_terminal() && !matches!(action, GameAction::HydratePuzzle { .. }) {
            tracing::debug!(target: "quartet.reducer", action = name, "ignored after game over");
            return;
        }
        let before = self.state.status;
        self.state = game_reducer(&self.state, action);
        tracing::trace!(target: "quartet.reducer", action = name, "dispatched");
        if self.state.status != before {
            tracing::info!(
                target: "quartet.reducer",
                status = ?self.state.status,
                mistakes_remaining = self.state.mistakes_remaining,
                "status changed"
            );
        }
    }

    fn dispatch_all(&mut self, actions: Vec<GameAction>) {
        for action in actions {
            self.dispatch(action);
        }
    }

    // -- View ---------------------------------------------------------------

    /// Snapshot everything a renderer needs.
    #[must_use]
    pub fn view(&self) -> GameView {
        let reveal = self.animation.fail_reveal();
        let locked = self.is_locked(LockScope::DEFAULT);
        let can_submit = self.selection_on_grid() && !self.is_locked(LockScope::SOLVE_IDLE);
        GameView::capture(ViewParts {
            puzzle: self.puzzle.as_deref(),
            available_words: &self.state.available_words,
            selected_ids: self.state.selected_ids.as_slice(),
            solved_category_ids: &self.state.solved_category_ids,
            shown_reveals: reveal.map(FailReveal::shown).unwrap_or_default(),
            total_reveals: reveal.map_or(0, |reveal| reveal.categories().len()),
            mistakes_remaining: self.state.mistakes_remaining,
            mistakes_allowed: self.state.mistakes_allowed,
            status: self.state.status,
            locked,
            can_submit,
            solve_pending: self.state.pending_solve.is_some(),
            feedback: self.animation.feedback(),
            drag: DragView {
                phase: self.drag.phase(),
                dragging: self.drag.dragging().cloned(),
                target: self.drag.target().cloned(),
                layout_locked: self.drag.layout_locked_word().cloned(),
                pending_settle: self.drag.pending_settle().cloned(),
            },
        })
    }
}

/// Placeholder capability for pointer events that never hit-test.
struct NoLocator;

impl DropLocator for NoLocator {
    fn locate_droppable_at(&self, _point: Point, _exclude: &WordId) -> Option<WordId> {
        None
    }
}

/// Placeholder capability for pointer events that never measure.
struct NoProbe;

impl LayoutProbe for NoProbe {
    fn rect_of(&self, _id: &WordId) -> Option<Rect> {
        None
    }
}
