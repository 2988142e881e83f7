use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{FruitKind, Position, SpawnRegion};

/// Source of every random decision a session makes.
///
/// Spawning draws a kind and then a position for each new fruit; the pop-up mode
/// draws slot indices. Tests swap in [`ScriptedSource`] to pin the outcome.
pub trait RandomSource {
    /// Draws a kind uniformly from `kinds`, which is never empty.
    fn choose_kind(&mut self, kinds: &[FruitKind]) -> FruitKind;

    /// Draws a position uniformly inside `region`.
    fn sample_position(&mut self, region: &SpawnRegion) -> Position;

    /// Draws an index uniformly from `0..len`, with `len > 0`.
    fn choose_index(&mut self, len: usize) -> usize;
}

impl<S> RandomSource for Box<S>
where
    S: RandomSource + ?Sized,
{
    fn choose_kind(&mut self, kinds: &[FruitKind]) -> FruitKind {
        (**self).choose_kind(kinds)
    }

    fn sample_position(&mut self, region: &SpawnRegion) -> Position {
        (**self).sample_position(region)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        (**self).choose_index(len)
    }
}

/// Seed for deterministic spawning.
///
/// A 128-bit seed for the session's random generator. Two sessions built from the
/// same seed and configuration that receive the same events end in the same state,
/// which is what makes recordings replayable.
///
/// The seed serializes as a 32-digit hex string and parses from one.
///
/// # Example
///
/// ```
/// use fruitbasket_engine::SpawnSeed;
///
/// let seed: SpawnSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// assert_eq!(seed.to_string(), "000102030405060708090a0b0c0d0e0f");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnSeed([u8; 16]);

impl SpawnSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for SpawnSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Malformed seed string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed `{input}`: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for SpawnSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for SpawnSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpawnSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `SpawnSeed` values with `rng.random()`.
impl Distribution<SpawnSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SpawnSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SpawnSeed(seed)
    }
}

/// [`RandomSource`] backed by a random number generator.
///
/// Defaults to a [`Pcg32`] seeded from a [`SpawnSeed`].
#[derive(Debug, Clone)]
pub struct RngSource<R = Pcg32> {
    rng: R,
}

impl Default for RngSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RngSource {
    /// Creates a source with a fresh random seed.
    ///
    /// For reproducible sessions, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: SpawnSeed) -> Self {
        Self::from_rng(Pcg32::from_seed(seed.0))
    }
}

impl<R> RngSource<R>
where
    R: Rng,
{
    pub const fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    fn sample_axis(&mut self, min: f64, max: f64) -> f64 {
        if min < max {
            self.rng.random_range(min..max)
        } else {
            min
        }
    }
}

impl<R> RandomSource for RngSource<R>
where
    R: Rng,
{
    fn choose_kind(&mut self, kinds: &[FruitKind]) -> FruitKind {
        kinds[self.choose_index(kinds.len())]
    }

    fn sample_position(&mut self, region: &SpawnRegion) -> Position {
        let x = self.sample_axis(region.x.min, region.x.max);
        let y = self.sample_axis(region.y.min, region.y.max);
        let z = self.sample_axis(region.z.min, region.z.max);
        Position::new(x, y, z)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// [`RandomSource`] that replays fixed sequences.
///
/// Each sequence cycles once exhausted. With an empty sequence, kinds fall back to
/// the first configured kind, positions to the region's minimum corner and indices
/// to `0`. Scripted values are returned as is, even when they lie outside the
/// configured kinds or region.
///
/// # Example
///
/// ```
/// use fruitbasket_engine::{FruitKind, Position, RandomSource as _, ScriptedSource, SpawnRegion};
///
/// let mut source = ScriptedSource::new()
///     .kinds([FruitKind::Banana, FruitKind::Apple])
///     .positions([Position::new(1.0, -0.5, 2.0)]);
/// let kinds = [FruitKind::Apple, FruitKind::Banana];
///
/// assert_eq!(source.choose_kind(&kinds), FruitKind::Banana);
/// assert_eq!(source.choose_kind(&kinds), FruitKind::Apple);
/// assert_eq!(source.choose_kind(&kinds), FruitKind::Banana);
/// assert_eq!(source.sample_position(&SpawnRegion::default()), Position::new(1.0, -0.5, 2.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    kinds: Cycle<FruitKind>,
    positions: Cycle<Position>,
    indices: Cycle<usize>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kinds<I>(self, kinds: I) -> Self
    where
        I: IntoIterator<Item = FruitKind>,
    {
        Self {
            kinds: Cycle::new(kinds),
            ..self
        }
    }

    #[must_use]
    pub fn positions<I>(self, positions: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        Self {
            positions: Cycle::new(positions),
            ..self
        }
    }

    #[must_use]
    pub fn indices<I>(self, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self {
            indices: Cycle::new(indices),
            ..self
        }
    }
}

impl RandomSource for ScriptedSource {
    fn choose_kind(&mut self, kinds: &[FruitKind]) -> FruitKind {
        self.kinds.next().unwrap_or(kinds[0])
    }

    fn sample_position(&mut self, region: &SpawnRegion) -> Position {
        self.positions
            .next()
            .unwrap_or_else(|| region.min_corner())
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.indices.next().map_or(0, |index| index % len)
    }
}

#[derive(Debug, Clone)]
struct Cycle<T> {
    values: VecDeque<T>,
}

impl<T> Default for Cycle<T> {
    fn default() -> Self {
        Self {
            values: VecDeque::new(),
        }
    }
}

impl<T> Cycle<T>
where
    T: Copy,
{
    fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            values: values.into_iter().collect(),
        }
    }

    fn next(&mut self) -> Option<T> {
        let value = self.values.pop_front()?;
        self.values.push_back(value);
        Some(value)
    }
}
