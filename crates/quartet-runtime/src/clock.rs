#![forbid(unsafe_code)]

//! Bridge from wall time to the logical clock.
//!
//! The game only understands logical time. Hosts driven by real frames read
//! a [`WallClock`] once per frame and pass the reading to
//! [`Game::advance_to`](crate::game::Game::advance_to).

use std::time::Duration;

use web_time::Instant;

/// Monotonic elapsed time since construction. Works on native and wasm.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    origin: Instant,
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Elapsed time since the clock was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
