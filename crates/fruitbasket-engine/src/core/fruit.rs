use serde::{Deserialize, Serialize};

use super::position::Position;

/// Kind of a fruit.
///
/// Baskets match fruits by kind. The observed game uses [`Apple`](Self::Apple) and
/// [`Banana`](Self::Banana) only; the remaining kinds let a configuration widen the
/// kind set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FruitKind {
    /// Apple.
    #[display("apple")]
    Apple = 0,
    /// Banana.
    #[display("banana")]
    Banana = 1,
    /// Orange.
    #[display("orange")]
    Orange = 2,
    /// Grape.
    #[display("grape")]
    Grape = 3,
}

impl FruitKind {
    /// Number of fruit kinds.
    pub const LEN: usize = 4;

    /// All fruit kinds in declaration order.
    pub const ALL: [Self; Self::LEN] = [Self::Apple, Self::Banana, Self::Orange, Self::Grape];

    /// Returns the single character representation of this fruit kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use fruitbasket_engine::FruitKind;
    ///
    /// assert_eq!(FruitKind::Apple.as_char(), 'A');
    /// assert_eq!(FruitKind::Banana.as_char(), 'B');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Apple => 'A',
            Self::Banana => 'B',
            Self::Orange => 'O',
            Self::Grape => 'G',
        }
    }
}

/// Unique identifier of a fruit within one session.
///
/// Identifiers are allocated in increasing order and never reused, so a fruit keeps
/// its id while it moves from the field to the hand and into a basket.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("#{_0}")]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A collectible fruit.
///
/// `active` is `true` only while the fruit sits on the field; it is cleared as soon as
/// the fruit is picked up, and stays cleared once the fruit lands in a basket.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Fruit {
    pub id: ItemId,
    pub kind: FruitKind,
    pub position: Position,
    pub active: bool,
}

impl Fruit {
    /// Creates an active fruit lying on the field.
    #[must_use]
    pub const fn new(id: ItemId, kind: FruitKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            active: true,
        }
    }

    pub(crate) const fn deactivated(self) -> Self {
        Self {
            active: false,
            ..self
        }
    }

    pub(crate) const fn activated(self) -> Self {
        Self {
            active: true,
            ..self
        }
    }
}
