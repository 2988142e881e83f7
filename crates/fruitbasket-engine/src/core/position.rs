use serde::{Deserialize, Serialize};

/// A point in scene space.
///
/// The engine never interprets positions geometrically; they are carried along so
/// the presentation layer can place fruits, baskets and slots.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize, derive_more::Add)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}
