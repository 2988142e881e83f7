use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Axis, BasketKind, ConfigError, FruitKind, Position};

/// A half-open interval `[min, max)` on one axis.
///
/// `min == max` pins the axis to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range that always yields `value`.
    #[must_use]
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        if self.is_fixed() {
            value == self.min
        } else {
            self.min <= value && value < self.max
        }
    }

    fn validate(self, axis: Axis) -> Result<(), ConfigError> {
        let Self { min, max } = self;
        if !min.is_finite() || !max.is_finite() || min > max || !(max - min).is_finite() {
            return Err(ConfigError::InvalidSpawnRange { axis, min, max });
        }
        Ok(())
    }
}

/// Bounding region new fruits are placed in.
///
/// The default keeps spawns in front of the baskets: a wide span across the table,
/// a narrow band towards the player and a fixed resting height.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SpawnRegion {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl Default for SpawnRegion {
    fn default() -> Self {
        Self {
            x: AxisRange::new(-5.0, 5.0),
            y: AxisRange::fixed(-0.5),
            z: AxisRange::new(1.0, 4.0),
        }
    }
}

impl SpawnRegion {
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.x.contains(position.x) && self.y.contains(position.y) && self.z.contains(position.z)
    }

    /// Returns the corner with the smallest coordinate on every axis.
    #[must_use]
    pub const fn min_corner(&self) -> Position {
        Position::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.x.validate(Axis::X)?;
        self.y.validate(Axis::Y)?;
        self.z.validate(Axis::Z)?;
        Ok(())
    }
}

/// Placement of one basket.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BasketConfig {
    pub kind: BasketKind,
    pub position: Position,
}

/// What happens to the held fruit when the player clicks again while holding it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// The fruit goes back onto the field where it was picked up.
    ReturnToField,
    /// The fruit is dropped out of play.
    #[default]
    Discard,
}

/// Configuration of a basket-mode session.
///
/// Every field has a default matching the two-basket apple/banana game, so a JSON
/// file only needs to list what it changes.
///
/// # Example
///
/// ```
/// use fruitbasket_engine::SessionConfig;
///
/// let config: SessionConfig = serde_json::from_str(r#"{ "mismatch_penalty": 3 }"#).unwrap();
/// assert_eq!(config.mismatch_penalty, 3);
/// assert_eq!(config.initial_population, 10);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Kinds new fruits are drawn from, uniformly.
    pub kinds: Vec<FruitKind>,
    /// Number of fruits placed when the session starts.
    pub initial_population: usize,
    /// Number of fruits spawned after a mismatched drop.
    pub mismatch_penalty: usize,
    pub spawn_region: SpawnRegion,
    pub baskets: Vec<BasketConfig>,
    pub release_policy: ReleasePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            kinds: vec![FruitKind::Apple, FruitKind::Banana],
            initial_population: 10,
            mismatch_penalty: 2,
            spawn_region: SpawnRegion::default(),
            baskets: vec![
                BasketConfig {
                    kind: BasketKind::Only(FruitKind::Apple),
                    position: Position::new(-2.0, 0.0, 0.0),
                },
                BasketConfig {
                    kind: BasketKind::Only(FruitKind::Banana),
                    position: Position::new(2.0, 0.0, 0.0),
                },
            ],
            release_policy: ReleasePolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Single wildcard basket: every drop scores.
    #[must_use]
    pub fn single_basket() -> Self {
        Self {
            baskets: vec![BasketConfig {
                kind: BasketKind::Any,
                position: Position::ORIGIN,
            }],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kinds.is_empty() {
            return Err(ConfigError::EmptyKindSet);
        }
        let mut kinds = HashSet::new();
        for &kind in &self.kinds {
            if !kinds.insert(kind) {
                return Err(ConfigError::DuplicateKind { kind });
            }
        }
        if self.initial_population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        self.spawn_region.validate()?;

        if self.baskets.is_empty() {
            return Err(ConfigError::NoBaskets);
        }
        let mut basket_kinds = HashSet::new();
        for basket in &self.baskets {
            if let BasketKind::Only(kind) = basket.kind
                && !kinds.contains(&kind)
            {
                return Err(ConfigError::UnknownBasketKind { kind });
            }
            if !basket_kinds.insert(basket.kind) {
                return Err(ConfigError::DuplicateBasket { kind: basket.kind });
            }
            if !basket.position.is_finite() {
                return Err(ConfigError::InvalidBasketPosition { kind: basket.kind });
            }
        }
        Ok(())
    }
}

/// Configuration of a timed pop-up session.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Fixed slot positions; the roster size is `slots.len()`.
    pub slots: Vec<Position>,
    /// Interval between two pop-up triggers.
    pub pop_up_period: Duration,
    /// Interval between two pop-down triggers.
    pub pop_down_period: Duration,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            slots: Self::grid(3, 3, 2.0),
            pop_up_period: Duration::from_secs(1),
            pop_down_period: Duration::from_secs(2),
        }
    }
}

impl PopupConfig {
    /// Lays out `rows * columns` slots on the ground plane, centered on the origin.
    ///
    /// ```
    /// use fruitbasket_engine::{PopupConfig, Position};
    ///
    /// let slots = PopupConfig::grid(3, 3, 2.0);
    /// assert_eq!(slots.len(), 9);
    /// assert_eq!(slots[0], Position::new(-2.0, -0.5, -2.0));
    /// assert_eq!(slots[4], Position::new(0.0, -0.5, 0.0));
    /// ```
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn grid(rows: usize, columns: usize, spacing: f64) -> Vec<Position> {
        let center = |n: usize| (n.saturating_sub(1)) as f64 * spacing / 2.0;
        let (x0, z0) = (center(columns), center(rows));
        (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |column| {
                    Position::new(
                        column as f64 * spacing - x0,
                        -0.5,
                        row as f64 * spacing - z0,
                    )
                })
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots.is_empty() {
            return Err(ConfigError::NoSlots);
        }
        if let Some(index) = self.slots.iter().position(|slot| !slot.is_finite()) {
            return Err(ConfigError::InvalidSlotPosition { index });
        }
        if self.pop_up_period.is_zero() {
            return Err(ConfigError::ZeroPopUpPeriod);
        }
        if self.pop_down_period.is_zero() {
            return Err(ConfigError::ZeroPopDownPeriod);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        SessionConfig::default().validate().unwrap();
        SessionConfig::single_basket().validate().unwrap();
        PopupConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_empty_kind_set() {
        let config = SessionConfig {
            kinds: vec![],
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyKindSet));
    }

    #[test]
    fn test_rejects_duplicate_kind() {
        let config = SessionConfig {
            kinds: vec![FruitKind::Apple, FruitKind::Banana, FruitKind::Apple],
            ..SessionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateKind {
                kind: FruitKind::Apple
            })
        );
    }

    #[test]
    fn test_rejects_zero_population() {
        let config = SessionConfig {
            initial_population: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn test_rejects_inverted_or_non_finite_region() {
        let mut config = SessionConfig::default();
        config.spawn_region.z = AxisRange::new(4.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpawnRange { axis: Axis::Z, .. })
        ));

        config.spawn_region.z = AxisRange::new(1.0, 4.0);
        config.spawn_region.x = AxisRange::new(f64::NEG_INFINITY, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpawnRange { axis: Axis::X, .. })
        ));
    }

    #[test]
    fn test_rejects_region_wider_than_f64() {
        let mut config = SessionConfig::default();
        config.spawn_region.x = AxisRange::new(-f64::MAX, f64::MAX);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSpawnRange {
                axis: Axis::X,
                min: -f64::MAX,
                max: f64::MAX,
            })
        );

        config.spawn_region.x = AxisRange::new(-f64::MAX / 2.0, f64::MAX / 2.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_release_discards_by_default() {
        assert_eq!(ReleasePolicy::default(), ReleasePolicy::Discard);
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert!(config.release_policy.is_discard());
    }

    #[test]
    fn test_rejects_basket_problems() {
        let no_baskets = SessionConfig {
            baskets: vec![],
            ..SessionConfig::default()
        };
        assert_eq!(no_baskets.validate(), Err(ConfigError::NoBaskets));

        let mut unknown = SessionConfig::default();
        unknown.baskets[1].kind = BasketKind::Only(FruitKind::Grape);
        assert_eq!(
            unknown.validate(),
            Err(ConfigError::UnknownBasketKind {
                kind: FruitKind::Grape
            })
        );

        let mut duplicate = SessionConfig::default();
        duplicate.baskets[1].kind = BasketKind::Only(FruitKind::Apple);
        assert_eq!(
            duplicate.validate(),
            Err(ConfigError::DuplicateBasket {
                kind: BasketKind::Only(FruitKind::Apple)
            })
        );

        let mut nan = SessionConfig::single_basket();
        nan.baskets[0].position.y = f64::NAN;
        assert_eq!(
            nan.validate(),
            Err(ConfigError::InvalidBasketPosition {
                kind: BasketKind::Any
            })
        );
    }

    #[test]
    fn test_rejects_popup_problems() {
        let no_slots = PopupConfig {
            slots: vec![],
            ..PopupConfig::default()
        };
        assert_eq!(no_slots.validate(), Err(ConfigError::NoSlots));

        let zero_up = PopupConfig {
            pop_up_period: Duration::ZERO,
            ..PopupConfig::default()
        };
        assert_eq!(zero_up.validate(), Err(ConfigError::ZeroPopUpPeriod));

        let zero_down = PopupConfig {
            pop_down_period: Duration::ZERO,
            ..PopupConfig::default()
        };
        assert_eq!(zero_down.validate(), Err(ConfigError::ZeroPopDownPeriod));
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = ConfigError::InvalidSpawnRange {
            axis: Axis::Z,
            min: 4.0,
            max: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "spawn range on the z axis is invalid: [4, 1)"
        );
    }

    #[test]
    fn test_fixed_axis_contains_only_its_value() {
        let range = AxisRange::fixed(-0.5);
        assert!(range.contains(-0.5));
        assert!(!range.contains(-0.4));

        let range = AxisRange::new(1.0, 4.0);
        assert!(range.contains(1.0));
        assert!(!range.contains(4.0));
    }

    #[test]
    fn test_config_json_roundtrip_uses_defaults() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());

        let popup: PopupConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(popup, PopupConfig::default());
    }
}
