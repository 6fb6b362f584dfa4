#![forbid(unsafe_code)]

//! Drag-to-swap controller.
//!
//! # State Machine
//!
//! ```text
//!   Idle ──start──▶ Dragging ──end (target, rects)──▶ Settling ──consume_settle──▶ Idle
//!                      │  └──end (target, no rects)──────────────────────────────▶ Idle
//!                      └──end (no target) / cancel────────────────────────────────▶ Idle
//! ```
//!
//! The controller never mutates the grid itself. [`DragController::end`]
//! reports the drop and the caller performs the swap, after the settle
//! request has captured the pre-swap rectangles.
//!
//! # Invariants
//!
//! 1. A start is rejected while a drag, layout lock, or settle is active.
//! 2. Target updates are de-duplicated: re-reporting the current target is
//!    not a change.
//! 3. The first target acquired during a drag layout-locks the dragged word.
//! 4. A settle request always carries both pre-swap rectangles.
//!
//! # Failure Modes
//!
//! - A probe that cannot measure either word yields a drop without a settle.

use quartet_core::{Offset, Point, Rect, WordId};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Hit-testing for drop targets.
pub trait DropLocator {
    /// The droppable word under `point`, never `exclude`.
    fn locate_droppable_at(&self, point: Point, exclude: &WordId) -> Option<WordId>;
}

/// Measures word tiles as currently laid out.
pub trait LayoutProbe {
    fn rect_of(&self, id: &WordId) -> Option<Rect>;
}

impl<T: DropLocator + ?Sized> DropLocator for &T {
    fn locate_droppable_at(&self, point: Point, exclude: &WordId) -> Option<WordId> {
        (**self).locate_droppable_at(point, exclude)
    }
}

impl<T: LayoutProbe + ?Sized> LayoutProbe for &T {
    fn rect_of(&self, id: &WordId) -> Option<Rect> {
        (**self).rect_of(id)
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    Idle,
    Dragging,
    Settling,
}

/// A completed drop waiting for its settle animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettleRequest {
    pub request_id: u64,
    pub from: WordId,
    pub to: WordId,
    /// Rect of `from` before the swap.
    pub from_rect: Rect,
    /// Rect of `to` before the swap.
    pub to_rect: Rect,
}

/// How far a word must be drawn back to appear at its pre-swap position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettleDelta {
    pub word_id: WordId,
    pub offset: Offset,
}

/// Deltas for both words of a settle request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettleResolution {
    pub request_id: u64,
    pub from: SettleDelta,
    pub to: SettleDelta,
}

/// A drop onto a target. The caller swaps `from` and `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropOutcome {
    pub from: WordId,
    pub to: WordId,
    /// Whether a settle request was recorded for this drop.
    pub settles: bool,
}

// ---------------------------------------------------------------------------
// DragController
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct DragController {
    dragging: Option<WordId>,
    target: Option<WordId>,
    pending_settle: Option<SettleRequest>,
    layout_locked: Option<WordId>,
    next_request_id: u64,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        if self.dragging.is_some() {
            DragPhase::Dragging
        } else if self.pending_settle.is_some() {
            DragPhase::Settling
        } else {
            DragPhase::Idle
        }
    }

    #[must_use]
    pub fn dragging(&self) -> Option<&WordId> {
        self.dragging.as_ref()
    }

    #[must_use]
    pub fn target(&self) -> Option<&WordId> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn pending_settle(&self) -> Option<&SettleRequest> {
        self.pending_settle.as_ref()
    }

    #[must_use]
    pub fn layout_locked_word(&self) -> Option<&WordId> {
        self.layout_locked.as_ref()
    }

    /// True while a drag, a layout lock, or a settle is active.
    #[must_use]
    pub fn is_drag_locked(&self) -> bool {
        self.dragging.is_some() || self.layout_locked.is_some() || self.pending_settle.is_some()
    }

    /// Begin dragging `word_id`. Returns `false` when rejected.
    pub fn start(&mut self, word_id: WordId) -> bool {
        if self.is_drag_locked() {
            tracing::debug!(target: "quartet.drag", word = %word_id, "drag start rejected");
            return false;
        }
        tracing::debug!(target: "quartet.drag", word = %word_id, "drag started");
        self.dragging = Some(word_id);
        self.target = None;
        true
    }

    /// Report the word currently under the pointer. Returns whether the
    /// target changed.
    pub fn drag_move(&mut self, target: Option<WordId>) -> bool {
        let Some(dragging) = self.dragging.as_ref() else {
            return false;
        };
        match target {
            Some(target) if &target != dragging => {
                if self.target.as_ref() == Some(&target) {
                    return false;
                }
                if self.layout_locked.as_ref() != Some(dragging) {
                    self.layout_locked = Some(dragging.clone());
                }
                tracing::trace!(target: "quartet.drag", over = %target, "drag target changed");
                self.target = Some(target);
                true
            }
            _ => {
                let changed = self.target.is_some() || self.layout_locked.is_some();
                self.target = None;
                self.layout_locked = None;
                changed
            }
        }
    }

    /// Hit-test `point` through `locator` and report the result as the target.
    pub fn locate_and_move<L: DropLocator + ?Sized>(&mut self, point: Point, locator: &L) -> bool {
        let Some(dragging) = self.dragging.as_ref() else {
            return false;
        };
        let target = locator.locate_droppable_at(point, dragging);
        self.drag_move(target)
    }

    /// Release the drag. Returns the drop when a target was acquired,
    /// recording a settle request when `probe` can measure both words.
    pub fn end<P: LayoutProbe + ?Sized>(&mut self, probe: &P) -> Option<DropOutcome> {
        let dragging = self.dragging.take();
        let target = self.target.take();
        let (Some(from), Some(to)) = (dragging, target) else {
            self.layout_locked = None;
            tracing::debug!(target: "quartet.drag", "drag ended without target");
            return None;
        };

        let settles = match (probe.rect_of(&from), probe.rect_of(&to)) {
            (Some(from_rect), Some(to_rect)) => {
                let request_id = self.next_request_id;
                self.next_request_id = self.next_request_id.wrapping_add(1);
                self.layout_locked = Some(from.clone());
                self.pending_settle = Some(SettleRequest {
                    request_id,
                    from: from.clone(),
                    to: to.clone(),
                    from_rect,
                    to_rect,
                });
                true
            }
            _ => {
                self.layout_locked = None;
                false
            }
        };
        tracing::debug!(
            target: "quartet.drag",
            from = %from,
            to = %to,
            settles,
            "drag dropped"
        );
        Some(DropOutcome { from, to, settles })
    }

    /// Abandon the drag without a drop.
    pub fn cancel(&mut self) {
        if self.dragging.take().is_some() {
            tracing::debug!(target: "quartet.drag", "drag canceled");
        }
        self.target = None;
        self.layout_locked = None;
    }

    /// Compute settle deltas against the post-swap layout in `probe`.
    ///
    /// A pending settle that cannot be measured is consumed, releasing the
    /// layout lock.
    #[must_use]
    pub fn resolve_settle<P: LayoutProbe + ?Sized>(
        &mut self,
        probe: &P,
    ) -> Option<SettleResolution> {
        let request = self.pending_settle.as_ref()?;
        let (Some(from_now), Some(to_now)) = (probe.rect_of(&request.from), probe.rect_of(&request.to))
        else {
            tracing::debug!(
                target: "quartet.drag",
                request = request.request_id,
                "settle unmeasurable, dropping"
            );
            self.consume_settle();
            return None;
        };
        Some(SettleResolution {
            request_id: request.request_id,
            from: SettleDelta {
                word_id: request.from.clone(),
                offset: from_now.offset_to(&request.from_rect),
            },
            to: SettleDelta {
                word_id: request.to.clone(),
                offset: to_now.offset_to(&request.to_rect),
            },
        })
    }

    /// Finish the settle, releasing the layout lock.
    pub fn consume_settle(&mut self) -> Option<SettleRequest> {
        let request = self.pending_settle.take();
        self.layout_locked = None;
        if let Some(request) = &request {
            tracing::debug!(target: "quartet.drag", request = request.request_id, "settle consumed");
        }
        request
    }

    /// Forget everything, including any pending settle.
    pub fn reset(&mut self) {
        self.dragging = None;
        self.target = None;
        self.pending_settle = None;
        self.layout_locked = None;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct Probe(HashMap<WordId, Rect>);

    impl Probe {
        fn with(mut self, id: &str, x: f32) -> Self {
            self.0.insert(WordId::from(id), Rect::new(x, 0.0, 10.0, 10.0));
            self
        }
    }

    impl LayoutProbe for Probe {
        fn rect_of(&self, id: &WordId) -> Option<Rect> {
            self.0.get(id).copied()
        }
    }

    impl DropLocator for Probe {
        fn locate_droppable_at(&self, point: Point, exclude: &WordId) -> Option<WordId> {
            self.0
                .iter()
                .find(|(id, rect)| *id != exclude && rect.contains(point))
                .map(|(id, _)| id.clone())
        }
    }

    fn w(id: &str) -> WordId {
        WordId::from(id)
    }

    #[test]
    fn full_drop_and_settle_cycle() {
        let before = Probe::default().with("a", 0.0).with("b", 50.0);
        let mut drag = DragController::new();
        assert!(drag.start(w("a")));
        assert_eq!(drag.phase(), DragPhase::Dragging);

        assert!(drag.drag_move(Some(w("b"))));
        assert_eq!(drag.layout_locked_word(), Some(&w("a")));

        let drop = drag.end(&before).unwrap();
        assert_eq!(drop, DropOutcome { from: w("a"), to: w("b"), settles: true });
        assert_eq!(drag.phase(), DragPhase::Settling);
        assert!(drag.is_drag_locked());

        let after = Probe::default().with("a", 50.0).with("b", 0.0);
        let resolved = drag.resolve_settle(&after).unwrap();
        assert_eq!(resolved.from.offset, Offset::new(-50.0, 0.0));
        assert_eq!(resolved.to.offset, Offset::new(50.0, 0.0));

        assert!(drag.consume_settle().is_some());
        assert_eq!(drag.phase(), DragPhase::Idle);
        assert!(!drag.is_drag_locked());
    }

    #[test]
    fn second_start_rejected_while_active() {
        let probe = Probe::default().with("a", 0.0).with("b", 50.0);
        let mut drag = DragController::new();
        assert!(drag.start(w("a")));
        assert!(!drag.start(w("b")));
        drag.drag_move(Some(w("b")));
        drag.end(&probe);
        assert!(!drag.start(w("b")));
        drag.consume_settle();
        assert!(drag.start(w("b")));
    }

    #[test]
    fn target_updates_are_deduplicated() {
        let mut drag = DragController::new();
        drag.start(w("a"));
        assert!(drag.drag_move(Some(w("b"))));
        assert!(!drag.drag_move(Some(w("b"))));
        assert!(drag.drag_move(Some(w("c"))));
        assert_eq!(drag.target(), Some(&w("c")));
    }

    #[test]
    fn self_or_empty_target_clears_lock() {
        let mut drag = DragController::new();
        drag.start(w("a"));
        drag.drag_move(Some(w("b")));
        assert!(drag.drag_move(Some(w("a"))));
        assert!(drag.target().is_none());
        assert!(drag.layout_locked_word().is_none());
        assert!(!drag.drag_move(None));
    }

    #[test]
    fn end_without_target_is_noop() {
        let mut drag = DragController::new();
        drag.start(w("a"));
        assert!(drag.end(&Probe::default()).is_none());
        assert_eq!(drag.phase(), DragPhase::Idle);
        assert!(!drag.is_drag_locked());
    }

    #[test]
    fn missing_rects_drop_without_settle() {
        let probe = Probe::default().with("a", 0.0);
        let mut drag = DragController::new();
        drag.start(w("a"));
        drag.drag_move(Some(w("b")));
        let drop = drag.end(&probe).unwrap();
        assert!(!drop.settles);
        assert!(drag.pending_settle().is_none());
        assert!(!drag.is_drag_locked());
    }

    #[test]
    fn locate_excludes_dragged_word() {
        let probe = Probe::default().with("a", 0.0).with("b", 50.0);
        let mut drag = DragController::new();
        drag.start(w("a"));
        assert!(!drag.locate_and_move(Point::new(5.0, 5.0), &probe));
        assert!(drag.target().is_none());
        assert!(drag.locate_and_move(Point::new(55.0, 5.0), &probe));
        assert_eq!(drag.target(), Some(&w("b")));
    }

    #[test]
    fn settle_unresolvable_when_post_layout_missing() {
        let probe = Probe::default().with("a", 0.0).with("b", 50.0);
        let mut drag = DragController::new();
        drag.start(w("a"));
        drag.drag_move(Some(w("b")));
        drag.end(&probe);
        assert!(drag.is_drag_locked());
        assert!(drag.resolve_settle(&Probe::default()).is_none());
        assert!(drag.pending_settle().is_none());
        assert!(drag.layout_locked_word().is_none());
        assert!(!drag.is_drag_locked());
    }

    #[test]
    fn resolve_without_pending_settle_keeps_live_drag() {
        let mut drag = DragController::new();
        drag.start(w("a"));
        drag.drag_move(Some(w("b")));
        assert!(drag.resolve_settle(&Probe::default()).is_none());
        assert_eq!(drag.dragging(), Some(&w("a")));
        assert_eq!(drag.layout_locked_word(), Some(&w("a")));
    }
}
