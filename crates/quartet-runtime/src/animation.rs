#![forbid(unsafe_code)]

//! Animation choreography.
//!
//! [`AnimationController`] is the only path from a submitted guess to a
//! scored outcome. It owns the per-word feedback map and a
//! [`TimeoutRegistry`] of animation events, and turns fired events into
//! reducer actions for the caller to dispatch.
//!
//! # State Machine
//!
//! A correct guess runs an explicit phase machine with one live phase timer:
//!
//! ```text
//!   Hopping ──(hop_duration)──▶ Settling ──(settle_delay)──▶ Revealing ──(reveal_delay)──▶ Done
//!   MarkSolvePending            feedback idle,                                 CompleteSolve
//!   dispatched at start         solved-first sort
//! ```
//!
//! A wrong guess records the mistake immediately, hops, shakes at
//! `settle_delay`, and drops the mistake flag at `settle_delay + shake`.
//!
//! # Invariants
//!
//! 1. `CompleteSolve` is only produced by the reveal timer of the current
//!    solve sequence.
//! 2. A phase event whose timer id is not the sequence's live phase timer is
//!    ignored.
//! 3. [`reset`](AnimationController::reset) and
//!    [`teardown`](AnimationController::teardown) cancel every timer before
//!    returning.
//! 4. The fail reveal never produces reducer actions.

use std::time::Duration;

use quartet_core::ordering::{is_permutation_of, reorder_solved_first, swap_words};
use quartet_core::{
    CategoryId, GameAction, GameState, HopPlan, HopTiming, PendingSolve, SettlePadding, WordCard,
    WordId,
};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::feedback::{FeedbackMap, WordFeedback};
use crate::timeouts::{Fired, TimeoutId, TimeoutRegistry};

// ---------------------------------------------------------------------------
// Timers and events
// ---------------------------------------------------------------------------

/// Timer collections, flushed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerGroup {
    /// Staggered per-word hop starts.
    Hop,
    /// Phase advances after the hops.
    Settle,
    /// The solved-first reordering.
    SolveSort,
    /// The final reveal of a solved category.
    Reveal,
    /// Category batches shown after a loss.
    FailReveal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AnimationEvent {
    Hop(WordId),
    SolveHopsFinished,
    SolveSettled,
    SortSolvedFirst,
    RevealSolved,
    MistakeShake,
    MistakeSettled,
    FailRevealNext,
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

/// Phase of the current solve sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolvePhase {
    Hopping,
    Settling,
    Revealing,
    Done,
}

#[derive(Debug, Clone)]
struct SolveSequence {
    pending: PendingSolve,
    total_category_count: usize,
    plan: HopPlan,
    started_at: Duration,
    phase: SolvePhase,
    phase_timer: Option<TimeoutId>,
}

#[derive(Debug, Clone)]
struct MistakeSequence {
    ordered_ids: Vec<WordId>,
}

/// Progress of the post-loss category reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailReveal {
    categories: Vec<CategoryId>,
    shown: usize,
}

impl FailReveal {
    /// Categories to reveal, in reveal order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryId] {
        &self.categories
    }

    /// Categories revealed so far.
    #[must_use]
    pub fn shown(&self) -> &[CategoryId] {
        &self.categories[..self.shown]
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shown >= self.categories.len()
    }
}

/// Which rules an operation checks before it may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockScope {
    /// Allow the operation while a drag or drag settle is active.
    pub ignore_drag_lock: bool,
    /// Refuse the operation while a solve is pending.
    pub require_solve_idle: bool,
}

impl LockScope {
    pub const DEFAULT: Self = Self {
        ignore_drag_lock: false,
        require_solve_idle: false,
    };

    pub const SOLVE_IDLE: Self = Self {
        ignore_drag_lock: false,
        require_solve_idle: true,
    };
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns feedback, animation timers, and the mistake flag.
#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    timing: HopTiming,
    timers: TimeoutRegistry<TimerGroup, AnimationEvent>,
    feedback: FeedbackMap,
    solve: Option<SolveSequence>,
    mistake: Option<MistakeSequence>,
    fail_reveal: Option<FailReveal>,
}

impl AnimationController {
    #[must_use]
    pub fn new(timing: HopTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timing(&self) -> &HopTiming {
        &self.timing
    }

    #[must_use]
    pub fn feedback(&self) -> &FeedbackMap {
        &self.feedback
    }

    #[must_use]
    pub fn is_mistake_animating(&self) -> bool {
        self.mistake.is_some()
    }

    /// Phase of the most recent solve sequence, if one ran since the last
    /// reset.
    #[must_use]
    pub fn solve_phase(&self) -> Option<SolvePhase> {
        self.solve.as_ref().map(|solve| solve.phase)
    }

    #[must_use]
    pub fn fail_reveal(&self) -> Option<&FailReveal> {
        self.fail_reveal.as_ref()
    }

    /// Number of live timers in `group`.
    #[must_use]
    pub fn pending_timers(&self, group: TimerGroup) -> usize {
        self.timers.pending(group)
    }

    #[must_use]
    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Derive the interaction lock for an operation with `scope`.
    #[must_use]
    pub fn is_interaction_locked(
        &self,
        state: &GameState,
        drag_locked: bool,
        scope: LockScope,
    ) -> bool {
        if state.status.is_terminal() || self.is_mistake_animating() {
            return true;
        }
        if drag_locked && !scope.ignore_drag_lock {
            return true;
        }
        scope.require_solve_idle && state.pending_solve.is_some()
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Cancel every timer and forget all ephemeral animation state.
    pub fn reset(&mut self) {
        let canceled = self.timers.clear_all();
        self.feedback.reset();
        self.solve = None;
        self.mistake = None;
        self.fail_reveal = None;
        tracing::debug!(target: "quartet.animation", canceled, "animation state reset");
    }

    /// Cancel every timer, leaving feedback as last shown.
    pub fn teardown(&mut self) {
        let canceled = self.timers.clear_all();
        tracing::debug!(target: "quartet.animation", canceled, "animation timers torn down");
    }

    // -- Instantaneous operations -------------------------------------------

    /// Shuffle the grid. Selected words lose their feedback.
    pub fn shuffle_words<R: Rng + ?Sized>(&mut self, state: &GameState, rng: &mut R) -> GameAction {
        let mut words = state.available_words.clone();
        words.shuffle(rng);
        self.clear_selection_feedback(state.selected_ids.as_slice());
        GameAction::SetWordOrder(words)
    }

    /// Replace the grid order. Rejects anything that is not a permutation of
    /// the current grid.
    pub fn reorder_words(&self, state: &GameState, next_order: Vec<WordCard>) -> Option<GameAction> {
        if !is_permutation_of(&next_order, &state.available_words) {
            tracing::warn!(
                target: "quartet.animation",
                expected = state.available_words.len(),
                got = next_order.len(),
                "rejected reorder that is not a permutation of the grid"
            );
            return None;
        }
        Some(GameAction::SetWordOrder(next_order))
    }

    /// Swap two cards on the grid.
    #[must_use]
    pub fn swap_word_cards(
        &self,
        state: &GameState,
        from: &WordId,
        to: &WordId,
    ) -> Option<GameAction> {
        swap_words(&state.available_words, from, to).map(GameAction::SetWordOrder)
    }

    pub fn set_word_idle(&mut self, id: &WordId) {
        self.feedback.set([id], WordFeedback::Idle);
    }

    pub fn clear_selection_feedback(&mut self, selected: &[WordId]) {
        self.feedback.set(selected, WordFeedback::Idle);
    }

    // -- Verdict animations -------------------------------------------------

    /// Start the solve choreography for a correct guess at logical time
    /// `now`. Returns the actions to dispatch immediately.
    pub fn play_solve_animation(
        &mut self,
        now: Duration,
        state: &GameState,
        pending: PendingSolve,
        total_category_count: usize,
    ) -> Vec<GameAction> {
        let _span = tracing::debug_span!(
            target: "quartet.animation",
            "solve",
            category = %pending.category_id
        )
        .entered();

        let plan = self
            .timing
            .plan(&pending.word_ids, &state.available_words, SettlePadding::Solved);
        self.start_hops(now, &plan);

        self.timers.clear_group(TimerGroup::SolveSort);
        self.timers.clear_group(TimerGroup::Reveal);
        self.timers.schedule(
            TimerGroup::SolveSort,
            now.saturating_add(plan.settle_delay),
            AnimationEvent::SortSolvedFirst,
        );
        let phase_timer = self.timers.schedule(
            TimerGroup::Settle,
            now.saturating_add(plan.hop_duration),
            AnimationEvent::SolveHopsFinished,
        );

        tracing::debug!(
            target: "quartet.animation",
            hop_ms = plan.hop_duration.as_millis() as u64,
            settle_ms = plan.settle_delay.as_millis() as u64,
            "solve animation started"
        );

        self.solve = Some(SolveSequence {
            pending: pending.clone(),
            total_category_count,
            plan,
            started_at: now,
            phase: SolvePhase::Hopping,
            phase_timer: Some(phase_timer),
        });
        vec![GameAction::MarkSolvePending(pending)]
    }

    /// Start the mistake choreography for a wrong guess at logical time
    /// `now`. The mistake is recorded right away.
    pub fn play_mistake_animation(
        &mut self,
        now: Duration,
        state: &GameState,
        word_ids: &[WordId],
    ) -> Vec<GameAction> {
        let plan = self
            .timing
            .plan(word_ids, &state.available_words, SettlePadding::Mistake);
        self.start_hops(now, &plan);

        let shake_at = now.saturating_add(plan.settle_delay);
        self.timers
            .schedule(TimerGroup::Settle, shake_at, AnimationEvent::MistakeShake);
        self.timers.schedule(
            TimerGroup::Settle,
            shake_at.saturating_add(self.timing.shake()),
            AnimationEvent::MistakeSettled,
        );
        tracing::debug!(
            target: "quartet.animation",
            words = plan.ordered_ids.len(),
            "mistake animation started"
        );

        self.mistake = Some(MistakeSequence {
            ordered_ids: plan.ordered_ids,
        });
        vec![GameAction::RecordMistake]
    }

    /// Begin revealing `categories` one batch at a time. View-only.
    pub fn start_fail_reveal(&mut self, now: Duration, categories: Vec<CategoryId>) {
        self.timers.clear_group(TimerGroup::FailReveal);
        for index in 0..categories.len() {
            self.timers.schedule(
                TimerGroup::FailReveal,
                now.saturating_add(self.timing.fail_reveal_offset(index)),
                AnimationEvent::FailRevealNext,
            );
        }
        tracing::debug!(
            target: "quartet.animation",
            categories = categories.len(),
            "fail reveal started"
        );
        self.fail_reveal = Some(FailReveal {
            categories,
            shown: 0,
        });
    }

    fn start_hops(&mut self, now: Duration, plan: &HopPlan) {
        self.timers.clear_group(TimerGroup::Hop);
        self.timers.clear_group(TimerGroup::Settle);
        for (index, id) in plan.ordered_ids.iter().enumerate() {
            self.timers.schedule(
                TimerGroup::Hop,
                now.saturating_add(self.timing.stagger_offset(index)),
                AnimationEvent::Hop(id.clone()),
            );
        }
    }

    // -- Clock --------------------------------------------------------------

    /// Fire the earliest timer due at or before `now`.
    ///
    /// Returns `None` when nothing is due, otherwise the timer's due time and
    /// the (possibly empty) actions it produced. Call repeatedly, dispatching
    /// between calls, until it returns `None`.
    pub fn fire_next_due(
        &mut self,
        now: Duration,
        state: &GameState,
    ) -> Option<(Duration, Vec<GameAction>)> {
        let fired = self.timers.pop_due(now)?;
        let due = fired.due;
        Some((due, self.handle(fired, state)))
    }

    fn handle(&mut self, fired: Fired<TimerGroup, AnimationEvent>, state: &GameState) -> Vec<GameAction> {
        tracing::trace!(
            target: "quartet.animation",
            id = %fired.id,
            group = ?fired.group,
            due_ms = fired.due.as_millis() as u64,
            "timer fired"
        );
        match fired.event {
            AnimationEvent::Hop(id) => {
                self.feedback.set([&id], WordFeedback::Hop);
                Vec::new()
            }
            AnimationEvent::SolveHopsFinished => {
                self.advance_solve(fired.id, SolvePhase::Hopping);
                Vec::new()
            }
            AnimationEvent::SolveSettled => {
                self.advance_solve(fired.id, SolvePhase::Settling);
                Vec::new()
            }
            AnimationEvent::SortSolvedFirst => match &self.solve {
                Some(solve) => vec![GameAction::SetWordOrder(reorder_solved_first(
                    &state.available_words,
                    &solve.pending.word_ids,
                ))],
                None => Vec::new(),
            },
            AnimationEvent::RevealSolved => self.finish_solve(fired.id),
            AnimationEvent::MistakeShake => {
                if let Some(mistake) = &self.mistake {
                    self.feedback.set(&mistake.ordered_ids, WordFeedback::Shake);
                }
                Vec::new()
            }
            AnimationEvent::MistakeSettled => {
                if let Some(mistake) = self.mistake.take() {
                    self.feedback.set(&mistake.ordered_ids, WordFeedback::Idle);
                    tracing::debug!(target: "quartet.animation", "mistake animation settled");
                }
                Vec::new()
            }
            AnimationEvent::FailRevealNext => {
                if let Some(reveal) = self.fail_reveal.as_mut()
                    && !reveal.is_complete()
                {
                    reveal.shown += 1;
                    tracing::debug!(
                        target: "quartet.animation",
                        shown = reveal.shown,
                        total = reveal.categories.len(),
                        "fail reveal batch shown"
                    );
                }
                Vec::new()
            }
        }
    }

    /// Move the solve sequence out of `expected` when `timer` is its live
    /// phase timer.
    fn advance_solve(&mut self, timer: TimeoutId, expected: SolvePhase) {
        let Some(solve) = self.solve.as_mut() else {
            return;
        };
        if solve.phase_timer != Some(timer) || solve.phase != expected {
            return;
        }
        let (next, due, event, group) = match expected {
            SolvePhase::Hopping => (
                SolvePhase::Settling,
                solve.plan.settle_delay,
                AnimationEvent::SolveSettled,
                TimerGroup::Settle,
            ),
            SolvePhase::Settling => {
                self.feedback.set(&solve.plan.ordered_ids, WordFeedback::Idle);
                (
                    SolvePhase::Revealing,
                    self.timing.reveal_delay(solve.plan.settle_delay),
                    AnimationEvent::RevealSolved,
                    TimerGroup::Reveal,
                )
            }
            SolvePhase::Revealing | SolvePhase::Done => return,
        };
        solve.phase = next;
        solve.phase_timer = Some(self.timers.schedule(
            group,
            solve.started_at.saturating_add(due),
            event,
        ));
        tracing::debug!(target: "quartet.animation", phase = ?next, "solve phase advanced");
    }

    fn finish_solve(&mut self, timer: TimeoutId) -> Vec<GameAction> {
        let Some(solve) = self.solve.as_mut() else {
            return Vec::new();
        };
        if solve.phase_timer != Some(timer) || solve.phase != SolvePhase::Revealing {
            return Vec::new();
        }
        self.timers.clear_group(TimerGroup::SolveSort);
        self.timers.clear_group(TimerGroup::Settle);
        self.feedback.clear(&solve.pending.word_ids);
        solve.phase = SolvePhase::Done;
        solve.phase_timer = None;
        tracing::debug!(
            target: "quartet.animation",
            category = %solve.pending.category_id,
            "solve revealed"
        );
        vec![GameAction::CompleteSolve {
            category_id: solve.pending.category_id.clone(),
            word_ids: solve.pending.word_ids.clone(),
            total_category_count: solve.total_category_count,
        }]
    }
}
