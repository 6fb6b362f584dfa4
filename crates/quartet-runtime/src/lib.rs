#![forbid(unsafe_code)]

//! Quartet runtime: timers, animation choreography, drag, and the game facade.
//!
//! # Role in Quartet
//! `quartet-runtime` drives the pure reducer in `quartet-core` through time.
//! Hosts create a [`Game`], hydrate it with a puzzle, forward intents and
//! pointer input, advance the logical clock, and render [`GameView`]
//! snapshots.
//!
//! # Primary responsibilities
//! - **Timeouts**: [`TimeoutRegistry`], grouped cancelable timers on a
//!   logical clock.
//! - **Animation**: [`AnimationController`], the solve and mistake
//!   choreography and the post-loss reveal.
//! - **Drag**: [`DragController`] and [`GestureRecognizer`], drag-to-swap
//!   with settle bookkeeping.
//! - **Facade**: [`Game`], interaction locking and the single dispatch path.
//! - **Config**: [`GameConfig`], loaded from TOML or JSON.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use quartet_core::StaticCatalog;
//! use quartet_runtime::{Game, GameConfig};
//!
//! let catalog = StaticCatalog::builtin().unwrap();
//! let mut game = Game::new(GameConfig::default().with_shuffle_seed(7)).unwrap();
//! game.load(&catalog, &"2024-10-07".parse().unwrap()).unwrap();
//! assert!(game.shuffle_words());
//! game.advance(Duration::from_millis(16));
//! assert_eq!(game.view().words.len(), 16);
//! ```

pub mod animation;
pub mod clock;
pub mod config;
pub mod drag;
pub mod error;
pub mod feedback;
pub mod game;
pub mod gesture;
pub mod layout;
pub mod timeouts;
pub mod tracer;
pub mod view;

pub use animation::{AnimationController, FailReveal, LockScope, SolvePhase, TimerGroup};
pub use clock::WallClock;
pub use config::GameConfig;
pub use drag::{
    DragController, DragPhase, DropLocator, DropOutcome, LayoutProbe, SettleDelta,
    SettleRequest, SettleResolution,
};
pub use error::ConfigError;
pub use feedback::{FeedbackMap, WordFeedback};
pub use game::{Game, Verdict};
pub use gesture::{GestureConfig, GestureEvent, GestureRecognizer, PointerKind};
pub use layout::{GridArrangement, GridLayout};
pub use timeouts::{Fired, TimeoutId, TimeoutRegistry};
pub use tracer::{MotionSample, MotionTracer, NoopTracer, RecordingTracer, TracerConfig};
pub use view::{DragView, GameView, TileView};
