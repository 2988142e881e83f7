//! Session state machine for the fruit basket game.
//!
//! Fruits spawn on a field, the player picks one up and drops it into a basket.
//! A matching basket scores; a mismatch discards the fruit and spawns replacements.
//! A second, timed mode pops fruits up and down in fixed slots and scores on grab.
//!
//! The crate is split like the rest of the workspace:
//!
//! - [`core`] - Plain data: fruits, baskets, positions
//! - [`engine`] - Game modes, spawn sources, configuration and the serialized
//!   [`SessionEngine`] that applies events and publishes snapshots
//!
//! Presentation (3D models, hit-testing, rendering) lives outside this crate and talks
//! to it only through [`SessionEngine::submit`] and snapshot subscriptions.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Spatial axis of the spawn region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Axis {
    #[display("x")]
    X,
    #[display("y")]
    Y,
    #[display("z")]
    Z,
}

/// Rejected session configuration.
///
/// Returned when a session is constructed; a running session never fails.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("fruit kind set is empty")]
    EmptyKindSet,
    #[display("fruit kind `{kind}` is listed more than once")]
    DuplicateKind { kind: FruitKind },
    #[display("initial population must be at least one fruit")]
    EmptyPopulation,
    #[display("spawn range on the {axis} axis is invalid: [{min}, {max})")]
    InvalidSpawnRange { axis: Axis, min: f64, max: f64 },
    #[display("session has no baskets")]
    NoBaskets,
    #[display("basket for `{kind}` accepts a kind outside the fruit kind set")]
    UnknownBasketKind { kind: FruitKind },
    #[display("more than one basket of kind `{kind}`")]
    DuplicateBasket { kind: BasketKind },
    #[display("basket `{kind}` has a non-finite position")]
    InvalidBasketPosition { kind: BasketKind },
    #[display("initial fruit id {id} is used more than once")]
    DuplicateItemId { id: ItemId },
    #[display("initial fruit id {id} leaves no room for new ids")]
    ItemIdOutOfRange { id: ItemId },
    #[display("initial fruit {id} has kind `{kind}` outside the fruit kind set")]
    UnknownFruitKind { id: ItemId, kind: FruitKind },
    #[display("initial fruit {id} has a non-finite position")]
    InvalidFruitPosition { id: ItemId },
    #[display("pop-up mode needs at least one slot")]
    NoSlots,
    #[display("slot {index} has a non-finite position")]
    InvalidSlotPosition { index: usize },
    #[display("pop-up period must be positive")]
    ZeroPopUpPeriod,
    #[display("pop-down period must be positive")]
    ZeroPopDownPeriod,
}
