#![forbid(unsafe_code)]

//! Pointer gesture recognition for word tiles.
//!
//! [`GestureRecognizer`] turns raw pointer down/move/up reports into
//! semantic [`GestureEvent`]s: a tap, or a drag lifecycle.
//!
//! # State Machine
//!
//! - **Mouse / pen**: a press becomes a drag once the pointer moves more than
//!   `drag_threshold_px` along either axis. Releasing before that is a tap.
//! - **Touch**: a press becomes a drag once it has been held for
//!   `long_press_ms` without moving past the threshold. Moving past the
//!   threshold first cancels the long press and abandons the gesture, so the
//!   host can scroll.
//!
//! # Invariants
//!
//! 1. Tap and drag never both emit for the same press.
//! 2. Every `DragStart` is followed by exactly one `DragEnd` or `DragCancel`.
//! 3. The long press fires at most once per press.
//! 4. After `reset()` the recognizer is idle.
//!
//! # Failure Modes
//!
//! - Move or up without a prior down is ignored.
//! - A second down while a press is tracked replaces the first press; a drag
//!   in progress is canceled first.

use std::time::Duration;

use quartet_core::{Offset, Point, WordId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for pointer gestures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Movement along either axis (px) that starts a mouse drag (default: 6).
    pub drag_threshold_px: f32,
    /// Hold time before a touch press starts a drag (default: 200ms).
    pub long_press_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 6.0,
            long_press_ms: 200,
        }
    }
}

impl GestureConfig {
    #[must_use]
    pub const fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.drag_threshold_px.is_finite() || self.drag_threshold_px < 0.0 {
            problems.push("gesture.drag_threshold_px must be a finite value >= 0".to_owned());
        }
        problems
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Input device behind a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    #[inline]
    #[must_use]
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::Touch)
    }
}

/// Semantic pointer gestures on a word tile.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// Press and release without a drag.
    Tap { word_id: WordId },
    DragStart { word_id: WordId, origin: Point },
    DragMove {
        word_id: WordId,
        pos: Point,
        /// Displacement from the previous reported position.
        delta: Offset,
    },
    DragEnd { word_id: WordId, pos: Point },
    DragCancel { word_id: WordId },
}

// ---------------------------------------------------------------------------
// GestureRecognizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Press {
    word_id: WordId,
    kind: PointerKind,
    origin: Point,
    last_pos: Point,
    down_at: Duration,
    dragging: bool,
    /// Touch press that moved before the long press fired.
    abandoned: bool,
}

/// Stateful recognizer for a single pointer.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    press: Option<Press>,
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    /// Pointer pressed on `word_id` at `pos`.
    pub fn pointer_down(
        &mut self,
        word_id: WordId,
        kind: PointerKind,
        pos: Point,
        now: Duration,
    ) -> Vec<GestureEvent> {
        let out = self.pointer_cancel();
        self.press = Some(Press {
            word_id,
            kind,
            origin: pos,
            last_pos: pos,
            down_at: now,
            dragging: false,
            abandoned: false,
        });
        out
    }

    /// Pointer moved to `pos`.
    pub fn pointer_move(&mut self, pos: Point) -> Vec<GestureEvent> {
        let mut out = Vec::with_capacity(2);
        let threshold = self.config.drag_threshold_px;
        let Some(press) = self.press.as_mut() else {
            return out;
        };
        if press.abandoned {
            return out;
        }

        if !press.dragging && pos.offset_from(press.origin).exceeds(threshold) {
            if press.kind.is_touch() {
                press.abandoned = true;
                return out;
            }
            press.dragging = true;
            out.push(GestureEvent::DragStart {
                word_id: press.word_id.clone(),
                origin: press.origin,
            });
        }

        if press.dragging {
            out.push(GestureEvent::DragMove {
                word_id: press.word_id.clone(),
                pos,
                delta: pos.offset_from(press.last_pos),
            });
        }
        press.last_pos = pos;
        out
    }

    /// Pointer released at `pos`.
    pub fn pointer_up(&mut self, pos: Point) -> Vec<GestureEvent> {
        let Some(press) = self.press.take() else {
            return Vec::new();
        };
        if press.dragging {
            vec![GestureEvent::DragEnd {
                word_id: press.word_id,
                pos,
            }]
        } else if press.abandoned {
            Vec::new()
        } else {
            vec![GestureEvent::Tap {
                word_id: press.word_id,
            }]
        }
    }

    /// Pointer capture lost. Cancels any drag without a drop.
    pub fn pointer_cancel(&mut self) -> Vec<GestureEvent> {
        match self.press.take() {
            Some(press) if press.dragging => vec![GestureEvent::DragCancel {
                word_id: press.word_id,
            }],
            _ => Vec::new(),
        }
    }

    /// Check for a touch long press. Call on every clock advance.
    pub fn check_long_press(&mut self, now: Duration) -> Option<GestureEvent> {
        let long_press = self.config.long_press();
        let press = self.press.as_mut()?;
        if !press.kind.is_touch() || press.dragging || press.abandoned {
            return None;
        }
        if now.saturating_sub(press.down_at) < long_press {
            return None;
        }
        press.dragging = true;
        Some(GestureEvent::DragStart {
            word_id: press.word_id.clone(),
            origin: press.origin,
        })
    }

    /// When a pending long press would fire, if one is armed.
    #[must_use]
    pub fn long_press_deadline(&self) -> Option<Duration> {
        self.press
            .as_ref()
            .filter(|press| press.kind.is_touch() && !press.dragging && !press.abandoned)
            .map(|press| press.down_at.saturating_add(self.config.long_press()))
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.press.as_ref().is_some_and(|press| press.dragging)
    }

    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Word under the active press.
    #[must_use]
    pub fn pressed_word(&self) -> Option<&WordId> {
        self.press.as_ref().map(|press| &press.word_id)
    }

    /// Drop all state without emitting events.
    pub fn reset(&mut self) {
        self.press = None;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
