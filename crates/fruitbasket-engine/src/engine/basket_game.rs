use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    Basket, BasketEvent, BasketKind, ConfigError, Fruit, ItemId, SessionConfig, SessionStats,
    SpawnSeed,
    engine::{
        random_source::{RandomSource, RngSource},
        session_engine::{EventQueue, GameMode},
    },
};

/// Snapshot of a basket-mode session.
///
/// Every fruit id is in at most one place: on the field, in the hand, or in one
/// basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketState {
    /// Fruits on the field, sorted by id.
    active: Vec<Fruit>,
    held: Option<Fruit>,
    baskets: Vec<Basket>,
    stats: SessionStats,
}

impl BasketState {
    /// Returns the fruits on the field, sorted by id.
    #[must_use]
    pub fn active_fruits(&self) -> &[Fruit] {
        &self.active
    }

    #[must_use]
    pub fn active_fruit(&self, id: ItemId) -> Option<&Fruit> {
        self.active_index(id).ok().map(|i| &self.active[i])
    }

    #[must_use]
    pub fn held(&self) -> Option<&Fruit> {
        self.held.as_ref()
    }

    #[must_use]
    pub fn baskets(&self) -> &[Basket] {
        &self.baskets
    }

    #[must_use]
    pub fn basket(&self, kind: BasketKind) -> Option<&Basket> {
        self.baskets.iter().find(|basket| basket.kind() == kind)
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Returns `true` if no fruit id appears in two places at once.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        self.active
            .iter()
            .chain(&self.held)
            .chain(self.baskets.iter().flat_map(Basket::contents))
            .all(|fruit| seen.insert(fruit.id))
    }

    fn active_index(&self, id: ItemId) -> Result<usize, usize> {
        self.active.binary_search_by_key(&id, |fruit| fruit.id)
    }

    fn insert_active(&mut self, fruit: Fruit) {
        let index = self.active_index(fruit.id).unwrap_or_else(|i| i);
        self.active.insert(index, fruit.activated());
    }
}

/// Result of a pick request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PickOutcome {
    /// The fruit moved from the field to the hand.
    Picked(ItemId),
    /// A fruit was already held and has been let go.
    Released(ItemId),
    /// Nothing held and no such fruit on the field.
    Ignored,
}

/// Result of a drop request.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The basket accepted the fruit.
    Deposited { id: ItemId, basket: BasketKind },
    /// The basket rejected the fruit; it was discarded and replacements spawned.
    Mismatched { id: ItemId, spawned: Vec<ItemId> },
    /// Nothing held, or no basket of that kind.
    Ignored,
}

/// Basket-mode session: the fruit field, the hand and the baskets.
///
/// All mutation goes through [`pick`](Self::pick), [`drop_into`](Self::drop_into)
/// and [`advance`](Self::advance); invalid requests are no-ops rather than errors so
/// the presentation layer can forward clicks without checking state first.
///
/// # Example
///
/// ```
/// use fruitbasket_engine::{BasketGame, BasketKind, SessionConfig, SpawnSeed};
///
/// let seed: SpawnSeed = "00000000000000000000000000000001".parse().unwrap();
/// let mut game = BasketGame::with_seed(SessionConfig::default(), seed).unwrap();
/// assert_eq!(game.state().active_fruits().len(), 10);
///
/// let fruit = game.state().active_fruits()[0];
/// game.pick(fruit.id);
/// assert_eq!(game.state().held().map(|f| f.id), Some(fruit.id));
///
/// game.drop_into(BasketKind::Only(fruit.kind));
/// assert_eq!(game.state().score(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BasketGame<S = RngSource> {
    config: SessionConfig,
    source: S,
    state: BasketState,
    next_id: u64,
}

impl BasketGame<RngSource> {
    /// Creates a session with a random seed.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_source(config, RngSource::new())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic spawning.
    pub fn with_seed(config: SessionConfig, seed: SpawnSeed) -> Result<Self, ConfigError> {
        Self::with_source(config, RngSource::with_seed(seed))
    }
}

impl<S> BasketGame<S>
where
    S: RandomSource,
{
    /// Creates a session whose initial population is drawn from `source`.
    pub fn with_source(config: SessionConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut this = Self::empty(config, source);
        let spawned = this.spawn(this.config.initial_population);
        tracing::info!(
            fruits = spawned.len(),
            baskets = this.state.baskets.len(),
            "basket session started"
        );
        Ok(this)
    }

    /// Creates a session starting from the given fruits instead of a random
    /// population. Later spawns still use `source`.
    ///
    /// Each fruit must have a unique id below `u64::MAX`, a kind from the configured
    /// kind set and a finite position.
    pub fn with_fruits<I>(config: SessionConfig, fruits: I, source: S) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = Fruit>,
    {
        config.validate()?;
        let mut this = Self::empty(config, source);
        for fruit in fruits {
            let id = fruit.id;
            if this.state.active_index(id).is_ok() {
                return Err(ConfigError::DuplicateItemId { id });
            }
            if !this.config.kinds.contains(&fruit.kind) {
                return Err(ConfigError::UnknownFruitKind {
                    id,
                    kind: fruit.kind,
                });
            }
            if !fruit.position.is_finite() {
                return Err(ConfigError::InvalidFruitPosition { id });
            }
            let next_id = id
                .get()
                .checked_add(1)
                .ok_or(ConfigError::ItemIdOutOfRange { id })?;
            this.state.insert_active(fruit);
            this.next_id = this.next_id.max(next_id);
        }
        this.state.stats.record_spawn(this.state.active.len());
        tracing::info!(
            fruits = this.state.active.len(),
            baskets = this.state.baskets.len(),
            "basket session started from fixed fruits"
        );
        Ok(this)
    }

    fn empty(config: SessionConfig, source: S) -> Self {
        let baskets = config
            .baskets
            .iter()
            .map(|basket| Basket::new(basket.kind, basket.position))
            .collect();
        Self {
            config,
            source,
            state: BasketState {
                active: Vec::new(),
                held: None,
                baskets,
                stats: SessionStats::new(),
            },
            next_id: 1,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &BasketState {
        &self.state
    }

    /// Handles a click on fruit `id`.
    ///
    /// While holding a fruit, any pick releases it regardless of `id`. Otherwise the
    /// fruit moves from the field to the hand if it is on the field.
    pub fn pick(&mut self, id: ItemId) -> PickOutcome {
        if let Some(held) = self.state.held.take() {
            let discard = self.config.release_policy.is_discard();
            if !discard {
                self.state.insert_active(held);
            }
            self.state.stats.record_release(discard);
            tracing::debug!(fruit = %held.id, requested = %id, discard, "released held fruit");
            return PickOutcome::Released(held.id);
        }

        let Ok(index) = self.state.active_index(id) else {
            tracing::debug!(fruit = %id, "pick ignored: not on the field");
            return PickOutcome::Ignored;
        };
        let fruit = self.state.active.remove(index).deactivated();
        self.state.held = Some(fruit);
        tracing::debug!(fruit = %id, kind = %fruit.kind, "picked fruit");
        PickOutcome::Picked(id)
    }

    /// Handles releasing the held fruit over the basket of kind `target`.
    ///
    /// A matching basket keeps the fruit and scores. A mismatch discards the fruit
    /// and spawns the configured penalty of new fruits. Either way the hand ends up
    /// empty.
    pub fn drop_into(&mut self, target: BasketKind) -> DropOutcome {
        let Some(held) = self.state.held else {
            tracing::debug!(basket = %target, "drop ignored: nothing held");
            return DropOutcome::Ignored;
        };
        let Some(basket) = self
            .state
            .baskets
            .iter_mut()
            .find(|basket| basket.kind() == target)
        else {
            tracing::debug!(basket = %target, "drop ignored: no such basket");
            return DropOutcome::Ignored;
        };
        self.state.held = None;

        if basket.kind().accepts(held.kind) {
            basket.deposit(held);
            self.state.stats.record_match();
            tracing::debug!(
                fruit = %held.id,
                basket = %target,
                score = self.state.score(),
                "deposited fruit"
            );
            return DropOutcome::Deposited {
                id: held.id,
                basket: target,
            };
        }

        let penalty = self.config.mismatch_penalty;
        self.state.stats.record_mismatch();
        let spawned = self.spawn(penalty);
        tracing::debug!(
            fruit = %held.id,
            kind = %held.kind,
            basket = %target,
            spawned = spawned.len(),
            "mismatched drop"
        );
        DropOutcome::Mismatched {
            id: held.id,
            spawned,
        }
    }

    /// Advances the session clock.
    pub fn advance(&mut self, dt: Duration) {
        self.state.stats.advance(dt);
    }

    /// Places up to `count` new fruits on the field.
    ///
    /// Stops early once the id space is used up.
    fn spawn(&mut self, count: usize) -> Vec<ItemId> {
        let mut spawned = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(next_id) = self.next_id.checked_add(1) else {
                tracing::warn!(requested = count, "fruit ids exhausted, spawn cut short");
                break;
            };
            let kind = self.source.choose_kind(&self.config.kinds);
            let position = self.source.sample_position(&self.config.spawn_region);
            let id = ItemId::new(self.next_id);
            self.next_id = next_id;
            // Ids only grow, so pushing keeps the field sorted.
            self.state.active.push(Fruit::new(id, kind, position));
            spawned.push(id);
        }
        self.state.stats.record_spawn(spawned.len());
        spawned
    }
}

impl<S> GameMode for BasketGame<S>
where
    S: RandomSource,
{
    type Event = BasketEvent;
    type State = BasketState;

    fn state(&self) -> &BasketState {
        &self.state
    }

    fn apply(&mut self, event: BasketEvent, _queue: &mut EventQueue<BasketEvent>) {
        match event {
            BasketEvent::Pick(id) => _ = self.pick(id),
            BasketEvent::Drop(kind) => _ = self.drop_into(kind),
            BasketEvent::Tick(dt) => self.advance(dt),
        }
        debug_assert!(self.state.is_consistent(), "fruit found in two places");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BasketConfig, FruitKind, Position, ReleasePolicy, ScriptedSource, SessionEngine,
    };

    const APPLE: BasketKind = BasketKind::Only(FruitKind::Apple);
    const BANANA: BasketKind = BasketKind::Only(FruitKind::Banana);

    fn fruit(raw: u64, kind: FruitKind, position: [f64; 3]) -> Fruit {
        Fruit::new(ItemId::new(raw), kind, position.into())
    }

    fn two_fruit_game(config: SessionConfig) -> BasketGame<ScriptedSource> {
        let source = ScriptedSource::new()
            .kinds([FruitKind::Banana, FruitKind::Apple])
            .positions([Position::new(0.5, -0.5, 1.5), Position::new(-3.0, -0.5, 2.5)]);
        BasketGame::with_fruits(
            config,
            [
                fruit(1, FruitKind::Apple, [1.0, 0.0, 1.0]),
                fruit(2, FruitKind::Banana, [-2.0, 0.0, 2.0]),
            ],
            source,
        )
        .unwrap()
    }

    fn ids(fruits: &[Fruit]) -> Vec<u64> {
        fruits.iter().map(|f| f.id.get()).collect()
    }

    #[test]
    fn test_initial_population_follows_config() {
        let config = SessionConfig {
            initial_population: 25,
            ..SessionConfig::default()
        };
        let game = BasketGame::with_seed(config.clone(), SpawnSeed::from_bytes([3; 16])).unwrap();
        let state = game.state();

        assert_eq!(state.active_fruits().len(), 25);
        assert_eq!(ids(state.active_fruits()), (1..=25).collect::<Vec<_>>());
        assert!(state.held().is_none());
        assert_eq!(state.score(), 0);
        assert_eq!(state.stats().spawned(), 25);
        for fruit in state.active_fruits() {
            assert!(fruit.active);
            assert!(config.kinds.contains(&fruit.kind));
            assert!(config.spawn_region.contains(fruit.position));
        }
        assert_eq!(state.baskets().len(), 2);
        assert!(state.baskets().iter().all(Basket::is_empty));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = SessionConfig {
            kinds: vec![],
            ..SessionConfig::default()
        };
        assert_eq!(
            BasketGame::new(config).unwrap_err(),
            ConfigError::EmptyKindSet
        );
    }

    #[test]
    fn test_duplicate_initial_ids_rejected() {
        let result = BasketGame::with_fruits(
            SessionConfig::default(),
            [
                fruit(4, FruitKind::Apple, [0.0, 0.0, 0.0]),
                fruit(4, FruitKind::Banana, [1.0, 0.0, 0.0]),
            ],
            ScriptedSource::new(),
        );
        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicateItemId { id: ItemId::new(4) }
        );
    }

    #[test]
    fn test_initial_fruits_are_validated() {
        let config = SessionConfig::default();
        let with_one = |fruit: Fruit| {
            BasketGame::with_fruits(config.clone(), [fruit], ScriptedSource::new()).map(|_| ())
        };

        assert_eq!(
            with_one(fruit(u64::MAX, FruitKind::Apple, [0.0, 0.0, 0.0])),
            Err(ConfigError::ItemIdOutOfRange {
                id: ItemId::new(u64::MAX)
            })
        );
        assert_eq!(
            with_one(fruit(3, FruitKind::Grape, [0.0, 0.0, 0.0])),
            Err(ConfigError::UnknownFruitKind {
                id: ItemId::new(3),
                kind: FruitKind::Grape
            })
        );
        assert_eq!(
            with_one(fruit(5, FruitKind::Banana, [f64::NAN, 0.0, 0.0])),
            Err(ConfigError::InvalidFruitPosition { id: ItemId::new(5) })
        );
    }

    #[test]
    fn test_spawn_stops_when_ids_run_out() {
        let mut game = BasketGame::with_fruits(
            SessionConfig::default(),
            [fruit(u64::MAX - 1, FruitKind::Apple, [0.0, 0.0, 0.0])],
            ScriptedSource::new(),
        )
        .unwrap();
        game.pick(ItemId::new(u64::MAX - 1));

        assert_eq!(
            game.drop_into(BANANA),
            DropOutcome::Mismatched {
                id: ItemId::new(u64::MAX - 1),
                spawned: vec![],
            }
        );
        assert!(game.state().active_fruits().is_empty());
        assert_eq!(game.state().stats().spawned(), 1);
    }

    #[test]
    fn test_huge_ticks_saturate_clock() {
        let mut engine = SessionEngine::new(two_fruit_game(SessionConfig::default()));
        engine.submit(BasketEvent::Tick(Duration::MAX));
        engine.submit(BasketEvent::Tick(Duration::from_secs(1)));

        assert_eq!(engine.snapshot().stats().elapsed(), Duration::MAX);
        assert_eq!(ids(engine.snapshot().active_fruits()), [1, 2]);
    }

    #[test]
    fn test_pick_moves_fruit_to_hand() {
        let mut game = two_fruit_game(SessionConfig::default());

        assert_eq!(game.pick(ItemId::new(1)), PickOutcome::Picked(ItemId::new(1)));

        let held = game.state().held().unwrap();
        assert_eq!(held.id, ItemId::new(1));
        assert!(!held.active);
        assert_eq!(ids(game.state().active_fruits()), [2]);
    }

    #[test]
    fn test_pick_unknown_id_is_noop() {
        let mut game = two_fruit_game(SessionConfig::default());
        let before = game.state().clone();

        assert_eq!(game.pick(ItemId::new(42)), PickOutcome::Ignored);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_pick_while_holding_releases_regardless_of_target() {
        for target in [1, 2, 42] {
            let mut game = two_fruit_game(SessionConfig::default());
            game.pick(ItemId::new(1));

            assert_eq!(
                game.pick(ItemId::new(target)),
                PickOutcome::Released(ItemId::new(1))
            );
            assert!(game.state().held().is_none());
            assert_eq!(game.state().stats().releases(), 1);
        }
    }

    #[test]
    fn test_release_returns_fruit_to_field() {
        let config = SessionConfig {
            release_policy: ReleasePolicy::ReturnToField,
            ..SessionConfig::default()
        };
        let mut game = two_fruit_game(config);
        game.pick(ItemId::new(1));
        game.pick(ItemId::new(2));

        let state = game.state();
        assert_eq!(ids(state.active_fruits()), [1, 2]);
        let returned = state.active_fruit(ItemId::new(1)).unwrap();
        assert!(returned.active);
        assert_eq!(returned.position, Position::new(1.0, 0.0, 1.0));
        assert_eq!(state.stats().discarded(), 0);
    }

    #[test]
    fn test_release_discards_fruit_by_default() {
        let mut game = two_fruit_game(SessionConfig::default());
        game.pick(ItemId::new(1));
        game.pick(ItemId::new(1));

        let state = game.state();
        assert!(state.held().is_none());
        assert_eq!(ids(state.active_fruits()), [2]);
        assert_eq!(state.stats().discarded(), 1);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_drop_with_empty_hand_leaves_state_unchanged() {
        let mut game = two_fruit_game(SessionConfig::default());
        let before = game.state().clone();

        assert_eq!(game.drop_into(APPLE), DropOutcome::Ignored);
        assert_eq!(game.drop_into(BANANA), DropOutcome::Ignored);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_matching_drop_scores_and_appends() {
        let mut game = two_fruit_game(SessionConfig::default());
        game.pick(ItemId::new(2));
        assert_eq!(
            game.drop_into(BANANA),
            DropOutcome::Deposited {
                id: ItemId::new(2),
                basket: BANANA
            }
        );
        game.pick(ItemId::new(1));
        game.drop_into(APPLE);

        let state = game.state();
        assert_eq!(state.score(), 2);
        assert!(state.held().is_none());
        assert_eq!(ids(state.basket(BANANA).unwrap().contents()), [2]);
        assert_eq!(ids(state.basket(APPLE).unwrap().contents()), [1]);
        assert!(state.active_fruits().is_empty());
    }

    #[test]
    fn test_deposits_keep_insertion_order() {
        let mut game = BasketGame::with_fruits(
            SessionConfig::single_basket(),
            [
                fruit(1, FruitKind::Apple, [0.0, 0.0, 0.0]),
                fruit(2, FruitKind::Banana, [0.0, 0.0, 0.0]),
                fruit(3, FruitKind::Apple, [0.0, 0.0, 0.0]),
            ],
            ScriptedSource::new(),
        )
        .unwrap();
        for raw in [3, 1, 2] {
            game.pick(ItemId::new(raw));
            game.drop_into(BasketKind::Any);
        }

        let basket = game.state().basket(BasketKind::Any).unwrap();
        assert_eq!(ids(basket.contents()), [3, 1, 2]);
        assert_eq!(game.state().score(), 3);
    }

    #[test]
    fn test_mismatch_discards_and_spawns_penalty() {
        let mut game = two_fruit_game(SessionConfig::default());
        game.pick(ItemId::new(1));

        let outcome = game.drop_into(BANANA);

        assert_eq!(
            outcome,
            DropOutcome::Mismatched {
                id: ItemId::new(1),
                spawned: vec![ItemId::new(3), ItemId::new(4)],
            }
        );
        let state = game.state();
        assert_eq!(state.score(), 0);
        assert!(state.held().is_none());
        assert_eq!(ids(state.active_fruits()), [2, 3, 4]);
        assert_eq!(
            state.active_fruit(ItemId::new(3)).unwrap(),
            &fruit(3, FruitKind::Banana, [0.5, -0.5, 1.5])
        );
        assert_eq!(
            state.active_fruit(ItemId::new(4)).unwrap(),
            &fruit(4, FruitKind::Apple, [-3.0, -0.5, 2.5])
        );
        assert!(state.baskets().iter().all(Basket::is_empty));
        assert_eq!(state.stats().mismatches(), 1);
        assert_eq!(state.stats().discarded(), 1);
        assert_eq!(state.stats().spawned(), 4);
    }

    #[test]
    fn test_mismatch_penalty_is_configurable() {
        let config = SessionConfig {
            mismatch_penalty: 5,
            ..SessionConfig::default()
        };
        let mut game = two_fruit_game(config);
        game.pick(ItemId::new(2));
        game.drop_into(APPLE);

        assert_eq!(game.state().active_fruits().len(), 1 + 5);
    }

    #[test]
    fn test_drop_into_missing_basket_keeps_fruit_held() {
        let config = SessionConfig {
            kinds: vec![FruitKind::Apple, FruitKind::Banana, FruitKind::Orange],
            ..SessionConfig::default()
        };
        let mut game = two_fruit_game(config);
        game.pick(ItemId::new(1));
        let before = game.state().clone();

        assert_eq!(
            game.drop_into(BasketKind::Only(FruitKind::Orange)),
            DropOutcome::Ignored
        );
        assert_eq!(game.drop_into(BasketKind::Any), DropOutcome::Ignored);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_wildcard_basket_accepts_every_kind() {
        let config = SessionConfig {
            baskets: vec![BasketConfig {
                kind: BasketKind::Any,
                position: Position::ORIGIN,
            }],
            ..SessionConfig::default()
        };
        let mut game = two_fruit_game(config);
        for raw in [1, 2] {
            game.pick(ItemId::new(raw));
            assert!(game.drop_into(BasketKind::Any).is_deposited());
        }
        assert_eq!(game.state().score(), 2);
    }

    #[test]
    fn test_tick_only_advances_clock() {
        let mut game = two_fruit_game(SessionConfig::default());
        let before = game.state().clone();
        game.advance(Duration::from_millis(16));

        assert_eq!(game.state().stats().elapsed(), Duration::from_millis(16));
        assert_eq!(game.state().active_fruits(), before.active_fruits());
        assert_eq!(game.state().score(), before.score());
    }

    #[test]
    fn test_random_play_keeps_locations_exclusive() {
        let game = BasketGame::with_seed(SessionConfig::default(), SpawnSeed::from_bytes([9; 16]))
            .unwrap();
        let mut engine = SessionEngine::new(game);
        let targets = [APPLE, BANANA, BasketKind::Any];

        for step in 0_u64..500 {
            let event = match step % 3 {
                0 => BasketEvent::Pick(ItemId::new(step % 17 + 1)),
                1 => BasketEvent::Drop(targets[(step / 3 % 3) as usize]),
                _ => BasketEvent::Tick(Duration::from_millis(10)),
            };
            engine.submit(event);
            assert!(engine.snapshot().is_consistent(), "step {step}");
        }
    }
}
