//! Data model shared by both game modes.
//!
//! - [`Fruit`] - A collectible item with an [`ItemId`], a [`FruitKind`] and a position
//! - [`Basket`] - A deposit target addressed by its [`BasketKind`]
//! - [`Position`] - A scene-space point carried for the presentation layer

pub use self::{basket::*, fruit::*, position::*};

pub(crate) mod basket;
pub(crate) mod fruit;
pub(crate) mod position;
