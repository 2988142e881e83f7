//! Game logic and state management.
//!
//! This module drives the data model in [`core`](crate::core) through two game modes:
//!
//! - [`BasketGame`] - Pick a fruit from the field and drop it into a basket
//! - [`PopupGame`] - Grab fruits that pop up and down in fixed slots on timers
//! - [`SessionEngine`] - Applies events to a mode one at a time and publishes snapshots
//! - [`SessionConfig`] / [`PopupConfig`] - Validated, serializable configuration
//! - [`RandomSource`] - Where spawn kinds, positions and slot choices come from
//!
//! # Event Flow
//!
//! 1. The presentation layer turns a click into a [`BasketEvent`] or [`PopupEvent`]
//! 2. [`SessionEngine::submit`] appends it behind any pending input
//! 3. The mode applies it to completion; timer firings are queued as new events
//! 4. Every subscriber receives the new state
//!
//! # Example
//!
//! ```
//! use fruitbasket_engine::{
//!     BasketEvent, BasketGame, BasketKind, SessionConfig, SessionEngine, SpawnSeed,
//! };
//!
//! let seed = SpawnSeed::from_bytes([7; 16]);
//! let game = BasketGame::with_seed(SessionConfig::default(), seed).unwrap();
//! let mut engine = SessionEngine::new(game);
//!
//! let fruit = engine.snapshot().active_fruits()[0];
//! engine.submit(BasketEvent::Pick(fruit.id));
//! engine.submit(BasketEvent::Drop(BasketKind::Only(fruit.kind)));
//!
//! assert_eq!(engine.snapshot().score(), 1);
//! ```

pub use self::{
    basket_game::*, config::*, event::*, popup_game::*, random_source::*, session_engine::*,
    session_stats::*, timer::MAX_FIRINGS_PER_STEP,
};

mod basket_game;
mod config;
mod event;
mod popup_game;
pub(crate) mod random_source;
pub(crate) mod session_engine;
mod session_stats;
mod timer;
