use serde::{Deserialize, Serialize};

use super::{fruit::Fruit, fruit::FruitKind, position::Position};

/// Number of fruits shown per row inside a basket.
const FRUITS_PER_ROW: usize = 4;

/// What a basket accepts.
///
/// A basket is addressed by its kind: drop requests name the kind of the basket the
/// player released the fruit over.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum BasketKind {
    /// Accepts only fruits of the given kind.
    #[display("{_0}")]
    Only(FruitKind),
    /// Accepts every fruit (single-basket variant).
    #[display("any")]
    Any,
}

impl BasketKind {
    /// Returns whether a fruit of `kind` scores when dropped into this basket.
    ///
    /// ```
    /// use fruitbasket_engine::{BasketKind, FruitKind};
    ///
    /// assert!(BasketKind::Only(FruitKind::Apple).accepts(FruitKind::Apple));
    /// assert!(!BasketKind::Only(FruitKind::Apple).accepts(FruitKind::Banana));
    /// assert!(BasketKind::Any.accepts(FruitKind::Banana));
    /// ```
    #[must_use]
    pub fn accepts(self, kind: FruitKind) -> bool {
        match self {
            Self::Only(accepted) => accepted == kind,
            Self::Any => true,
        }
    }
}

impl From<FruitKind> for BasketKind {
    fn from(kind: FruitKind) -> Self {
        Self::Only(kind)
    }
}

/// A static deposit target collecting matched fruits.
///
/// `contents` only ever grows; insertion order is display order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Basket {
    kind: BasketKind,
    position: Position,
    contents: Vec<Fruit>,
}

impl Basket {
    #[must_use]
    pub const fn new(kind: BasketKind, position: Position) -> Self {
        Self {
            kind,
            position,
            contents: Vec::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> BasketKind {
        self.kind
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn contents(&self) -> &[Fruit] {
        &self.contents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub(crate) fn deposit(&mut self, fruit: Fruit) {
        self.contents.push(fruit.deactivated());
    }

    /// Returns where the `index`-th deposited fruit is drawn, relative to the basket.
    ///
    /// Fruits are stacked in rows of four, left to right, each row slightly higher
    /// than the previous one.
    ///
    /// ```
    /// use fruitbasket_engine::{Basket, Position};
    ///
    /// assert_eq!(Basket::content_offset(0), Position::new(-0.75, 0.7, 0.0));
    /// assert_eq!(Basket::content_offset(5), Position::new(-0.25, 1.0, 0.0));
    /// ```
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn content_offset(index: usize) -> Position {
        let row = (index / FRUITS_PER_ROW) as f64;
        let column = (index % FRUITS_PER_ROW) as f64;
        Position::new(column * 0.5 - 0.75, 0.7 + row * 0.3, 0.0)
    }

    /// Returns the scene positions of the deposited fruits in display order.
    pub fn content_positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.contents.len()).map(|i| self.position + Self::content_offset(i))
    }
}
