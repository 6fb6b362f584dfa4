#![forbid(unsafe_code)]

//! Hop timing policy.
//!
//! Pure functions that turn a set of submitted word ids into a staggered hop
//! schedule. Every delay is relative to the moment the animation starts.
//!
//! ```text
//!  0        stagger   2*stagger  3*stagger      hop_duration   settle_delay        reveal_delay
//!  |hop #0 ------------------------------|           |              |                   |
//!            |hop #1 ---------------------------|     |              |                   |
//!                      ...                            | + padding -> | + reveal padding->|
//! ```
//!
//! # Invariants
//!
//! 1. `hop_duration(0) == 0` and `hop_duration(n) = (n - 1) * stagger + hop`.
//! 2. `settle_delay >= hop_duration` for every plan.
//! 3. `reveal_delay(s) > s`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::puzzle::{WordCard, WordId};

/// Delays used by the hop, shake, lift, and fail-reveal sequences, in
/// milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopTiming {
    /// Offset between consecutive word hops.
    pub stagger_ms: u64,
    /// Length of a single hop.
    pub hop_ms: u64,
    /// Length of the shake played on a wrong guess.
    pub shake_ms: u64,
    /// Pause between the last hop and the solved-group lift.
    pub solved_padding_ms: u64,
    /// Pause between the last hop and the shake.
    pub mistake_padding_ms: u64,
    /// Lift animation plus the pause before the solved row is revealed.
    pub reveal_padding_ms: u64,
    /// Time each category takes to surface during a fail reveal.
    pub fail_reveal_batch_ms: u64,
    /// Pause between fail-reveal batches.
    pub fail_reveal_gap_ms: u64,
}

impl Default for HopTiming {
    fn default() -> Self {
        Self {
            stagger_ms: 70,
            hop_ms: 260,
            shake_ms: 220,
            solved_padding_ms: 140,
            mistake_padding_ms: 120,
            reveal_padding_ms: 420 + 160,
            fail_reveal_batch_ms: 600,
            fail_reveal_gap_ms: 200,
        }
    }
}

/// Which pause follows the hops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettlePadding {
    /// Correct guess: hops are followed by the lift.
    Solved,
    /// Wrong guess: hops are followed by the shake.
    Mistake,
}

/// The schedule for one hop sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopPlan {
    /// Ids in grid order; hop `i` starts at `stagger_offset(i)`.
    pub ordered_ids: Vec<WordId>,
    /// When the last hop finishes.
    pub hop_duration: Duration,
    /// When the sequence settles (hop duration plus padding).
    pub settle_delay: Duration,
}

impl HopTiming {
    #[inline]
    #[must_use]
    pub const fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    #[inline]
    #[must_use]
    pub const fn hop(&self) -> Duration {
        Duration::from_millis(self.hop_ms)
    }

    #[inline]
    #[must_use]
    pub const fn shake(&self) -> Duration {
        Duration::from_millis(self.shake_ms)
    }

    #[inline]
    #[must_use]
    pub const fn fail_reveal_batch(&self) -> Duration {
        Duration::from_millis(self.fail_reveal_batch_ms)
    }

    #[inline]
    #[must_use]
    pub const fn fail_reveal_gap(&self) -> Duration {
        Duration::from_millis(self.fail_reveal_gap_ms)
    }

    #[must_use]
    pub const fn padding(&self, padding: SettlePadding) -> Duration {
        match padding {
            SettlePadding::Solved => Duration::from_millis(self.solved_padding_ms),
            SettlePadding::Mistake => Duration::from_millis(self.mistake_padding_ms),
        }
    }

    /// Start offset of the `index`-th hop.
    #[must_use]
    pub fn stagger_offset(&self, index: usize) -> Duration {
        let index = u64::try_from(index).unwrap_or(u64::MAX);
        Duration::from_millis(self.stagger_ms.saturating_mul(index))
    }

    /// Time for `count` staggered hops to finish.
    #[must_use]
    pub fn hop_duration(&self, count: usize) -> Duration {
        match count {
            0 => Duration::ZERO,
            n => self.stagger_offset(n - 1).saturating_add(self.hop()),
        }
    }

    /// Delay from animation start until the solved row is revealed.
    #[must_use]
    pub fn reveal_delay(&self, settle_delay: Duration) -> Duration {
        settle_delay.saturating_add(Duration::from_millis(self.reveal_padding_ms))
    }

    /// Plan a hop sequence over `ids` as laid out on `grid`.
    #[must_use]
    pub fn plan(&self, ids: &[WordId], grid: &[WordCard], padding: SettlePadding) -> HopPlan {
        let ordered_ids = order_by_grid_position(ids, grid);
        let hop_duration = self.hop_duration(ordered_ids.len());
        HopPlan {
            settle_delay: hop_duration.saturating_add(self.padding(padding)),
            hop_duration,
            ordered_ids,
        }
    }

    /// Time at which the `index`-th fail-reveal batch appears.
    #[must_use]
    pub fn fail_reveal_offset(&self, index: usize) -> Duration {
        let step = self
            .fail_reveal_batch_ms
            .saturating_add(self.fail_reveal_gap_ms);
        let index = u64::try_from(index).unwrap_or(u64::MAX);
        Duration::from_millis(
            self.fail_reveal_batch_ms
                .saturating_add(step.saturating_mul(index)),
        )
    }

    /// Human-readable problems with this timing, empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.hop_ms == 0 {
            problems.push("timing.hop_ms must be > 0".to_owned());
        }
        if self.shake_ms == 0 {
            problems.push("timing.shake_ms must be > 0".to_owned());
        }
        if self.reveal_padding_ms == 0 {
            problems.push("timing.reveal_padding_ms must be > 0".to_owned());
        }
        if self.fail_reveal_batch_ms == 0 {
            problems.push("timing.fail_reveal_batch_ms must be > 0".to_owned());
        }
        problems
    }
}

/// Stable sort of `ids` by their index in `grid`; ids not on the grid go last.
#[must_use]
pub fn order_by_grid_position(ids: &[WordId], grid: &[WordCard]) -> Vec<WordId> {
    let mut ordered = ids.to_vec();
    ordered.sort_by_key(|id| {
        grid.iter()
            .position(|card| &card.id == id)
            .unwrap_or(usize::MAX)
    });
    ordered
}
