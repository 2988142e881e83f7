use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, PopupConfig, PopupEvent, PopupStats, Position, SpawnSeed,
    engine::{
        random_source::{RandomSource, RngSource},
        session_engine::{EventQueue, GameMode},
        timer::PeriodicTimer,
    },
};

/// A fixed place where a fruit pops up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub position: Position,
    pub active: bool,
}

/// Snapshot of a timed pop-up session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupState {
    slots: Vec<Slot>,
    stats: PopupStats,
}

impl PopupState {
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &PopupStats {
        &self.stats
    }

    fn indices_where(&self, active: bool) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active == active)
            .map(|(index, _)| index)
            .collect()
    }
}

/// Timed pop-up session.
///
/// Fruits appear in and vanish from a fixed roster of slots on two independent
/// timers; grabbing an occupied slot scores immediately. There is no hand and no
/// basket in this mode.
///
/// Timers advance only on [`PopupEvent::Tick`]. When driven through a
/// [`SessionEngine`](crate::SessionEngine), each firing becomes its own
/// [`PopupEvent::PopUp`] or [`PopupEvent::PopDown`] in the same queue as player
/// grabs, so a grab and a timer never touch a slot at the same time.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use fruitbasket_engine::{PopupConfig, PopupEvent, PopupGame, SessionEngine};
///
/// let game = PopupGame::new(PopupConfig::default()).unwrap();
/// let mut engine = SessionEngine::new(game);
///
/// // One second: the pop-up timer fires once.
/// engine.submit(PopupEvent::Tick(Duration::from_secs(1)));
/// assert_eq!(engine.snapshot().active_count(), 1);
///
/// let occupied = engine.snapshot().slots().iter().position(|s| s.active).unwrap();
/// engine.submit(PopupEvent::Grab(occupied));
/// assert_eq!(engine.snapshot().score(), 1);
/// assert_eq!(engine.snapshot().active_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct PopupGame<S = RngSource> {
    config: PopupConfig,
    source: S,
    state: PopupState,
    pop_up_timer: PeriodicTimer,
    pop_down_timer: PeriodicTimer,
}

impl PopupGame<RngSource> {
    /// Creates a session with a random seed.
    pub fn new(config: PopupConfig) -> Result<Self, ConfigError> {
        Self::with_source(config, RngSource::new())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic slot choice.
    pub fn with_seed(config: PopupConfig, seed: SpawnSeed) -> Result<Self, ConfigError> {
        Self::with_source(config, RngSource::with_seed(seed))
    }
}

impl<S> PopupGame<S>
where
    S: RandomSource,
{
    /// Creates a session with every slot empty.
    pub fn with_source(config: PopupConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let slots = config
            .slots
            .iter()
            .map(|&position| Slot {
                position,
                active: false,
            })
            .collect();
        let this = Self {
            pop_up_timer: PeriodicTimer::new(config.pop_up_period)
                .ok_or(ConfigError::ZeroPopUpPeriod)?,
            pop_down_timer: PeriodicTimer::new(config.pop_down_period)
                .ok_or(ConfigError::ZeroPopDownPeriod)?,
            config,
            source,
            state: PopupState {
                slots,
                stats: PopupStats::new(),
            },
        };
        tracing::info!(
            slots = this.state.slots.len(),
            pop_up_period = ?this.config.pop_up_period,
            pop_down_period = ?this.config.pop_down_period,
            "pop-up session started"
        );
        Ok(this)
    }

    #[must_use]
    pub fn config(&self) -> &PopupConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &PopupState {
        &self.state
    }

    /// Activates a uniformly chosen empty slot.
    ///
    /// Returns the slot index, or `None` if every slot is already active.
    pub fn pop_up(&mut self) -> Option<usize> {
        let index = self.choose_slot(false)?;
        self.state.slots[index].active = true;
        self.state.stats.record_pop_up();
        tracing::debug!(slot = index, active = self.state.active_count(), "fruit popped up");
        Some(index)
    }

    /// Deactivates a uniformly chosen active slot.
    ///
    /// Returns the slot index, or `None` if no slot is active.
    pub fn pop_down(&mut self) -> Option<usize> {
        let index = self.choose_slot(true)?;
        self.state.slots[index].active = false;
        self.state.stats.record_pop_down();
        tracing::debug!(slot = index, active = self.state.active_count(), "fruit popped down");
        Some(index)
    }

    /// Grabs the fruit in slot `index`.
    ///
    /// Scores and empties the slot if it is active. Returns whether the grab hit;
    /// an empty or out-of-range slot leaves the state untouched.
    pub fn grab(&mut self, index: usize) -> bool {
        let Some(slot) = self.state.slots.get_mut(index) else {
            tracing::debug!(slot = index, "grab ignored: no such slot");
            return false;
        };
        if !slot.active {
            tracing::debug!(slot = index, "grab ignored: slot is empty");
            return false;
        }
        slot.active = false;
        self.state.stats.record_grab();
        tracing::debug!(slot = index, score = self.state.score(), "grabbed fruit");
        true
    }

    /// Advances both timers by `dt`.
    ///
    /// Returns the timer firings inside the step in chronological order, pop-ups
    /// first when both fire at the same instant. The firings are not applied here.
    ///
    /// Each timer contributes at most [`crate::MAX_FIRINGS_PER_STEP`] firings; the
    /// rest of an oversized step only moves the clock.
    pub fn advance(&mut self, dt: Duration) -> Vec<PopupEvent> {
        self.state.stats.advance(dt);
        let mut fired: Vec<_> = self
            .pop_up_timer
            .advance(dt)
            .into_iter()
            .map(|offset| (offset, PopupEvent::PopUp))
            .chain(
                self.pop_down_timer
                    .advance(dt)
                    .into_iter()
                    .map(|offset| (offset, PopupEvent::PopDown)),
            )
            .collect();
        fired.sort_by_key(|(offset, _)| *offset);
        fired.into_iter().map(|(_, event)| event).collect()
    }

    fn choose_slot(&mut self, active: bool) -> Option<usize> {
        let candidates = self.state.indices_where(active);
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[self.source.choose_index(candidates.len())])
    }
}

impl<S> GameMode for PopupGame<S>
where
    S: RandomSource,
{
    type Event = PopupEvent;
    type State = PopupState;

    fn state(&self) -> &PopupState {
        &self.state
    }

    fn apply(&mut self, event: PopupEvent, queue: &mut EventQueue<PopupEvent>) {
        match event {
            PopupEvent::Grab(index) => _ = self.grab(index),
            PopupEvent::PopUp => _ = self.pop_up(),
            PopupEvent::PopDown => _ = self.pop_down(),
            PopupEvent::Tick(dt) => {
                for fired in self.advance(dt) {
                    queue.push(fired);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_FIRINGS_PER_STEP, ScriptedSource, SessionEngine};

    fn game(slots: usize) -> PopupGame<ScriptedSource> {
        let config = PopupConfig {
            slots: vec![Position::ORIGIN; slots],
            ..PopupConfig::default()
        };
        PopupGame::with_source(config, ScriptedSource::new()).unwrap()
    }

    #[test]
    fn test_starts_with_all_slots_empty() {
        let game = game(9);
        assert_eq!(game.state().slots().len(), 9);
        assert_eq!(game.state().active_count(), 0);
        assert_eq!(game.state().score(), 0);
    }

    #[test]
    fn test_pop_up_activates_exactly_one_slot() {
        let mut game = game(9);
        assert!(game.pop_up().is_some());
        assert_eq!(game.state().active_count(), 1);
    }

    #[test]
    fn test_pop_up_never_exceeds_roster() {
        let mut game = game(4);
        for _ in 0..4 {
            assert!(game.pop_up().is_some());
        }
        for _ in 0..10 {
            assert_eq!(game.pop_up(), None);
            assert_eq!(game.state().active_count(), 4);
        }
    }

    #[test]
    fn test_pop_down_on_empty_roster_is_noop() {
        let mut game = game(9);
        let before = game.state().clone();
        assert_eq!(game.pop_down(), None);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_pop_choices_come_from_source() {
        let config = PopupConfig {
            slots: vec![Position::ORIGIN; 5],
            ..PopupConfig::default()
        };
        // Empty slots are [0, 1, 2, 3, 4] then [0, 1, 3, 4]; active ones are [2, 4].
        let source = ScriptedSource::new().indices([2, 3, 0]);
        let mut game = PopupGame::with_source(config, source).unwrap();

        assert_eq!(game.pop_up(), Some(2));
        assert_eq!(game.pop_up(), Some(4));
        assert_eq!(game.pop_down(), Some(2));
        assert!(!game.state().slot(2).unwrap().active);
        assert!(game.state().slot(4).unwrap().active);
    }

    #[test]
    fn test_grab_scores_only_active_slots() {
        let mut game = game(3);
        let index = game.pop_up().unwrap();

        assert!(game.grab(index));
        assert_eq!(game.state().score(), 1);
        assert!(!game.state().slot(index).unwrap().active);

        assert!(!game.grab(index));
        assert!(!game.grab(99));
        assert_eq!(game.state().score(), 1);
    }

    #[test]
    fn test_grab_on_empty_slot_leaves_snapshot_unchanged() {
        let mut engine = SessionEngine::new(PopupGame::new(PopupConfig::default()).unwrap());
        let before = engine.snapshot().clone();

        engine.submit(PopupEvent::Grab(0));
        engine.submit(PopupEvent::Grab(42));

        assert_eq!(engine.snapshot(), &before);
    }

    #[test]
    fn test_huge_tick_is_bounded() {
        let mut engine = SessionEngine::new(game(9));

        let processed = engine.submit(PopupEvent::Tick(Duration::from_secs(u64::MAX)));

        assert_eq!(processed, 1 + 2 * MAX_FIRINGS_PER_STEP);
        let state = engine.snapshot();
        assert!(state.active_count() <= 9);
        assert_eq!(state.stats().elapsed(), Duration::from_secs(u64::MAX));

        engine.submit(PopupEvent::Tick(Duration::MAX));
        assert_eq!(engine.snapshot().stats().elapsed(), Duration::MAX);
    }

    #[test]
    fn test_advance_orders_firings() {
        let mut game = game(9);
        assert_eq!(
            game.advance(Duration::from_millis(2500)),
            [PopupEvent::PopUp, PopupEvent::PopUp, PopupEvent::PopDown]
        );
        // Pop-ups at 3s and 4s, pop-down at 4s.
        assert_eq!(
            game.advance(Duration::from_millis(1500)),
            [PopupEvent::PopUp, PopupEvent::PopUp, PopupEvent::PopDown]
        );
        // Both timers fire at 6s, pop-up first.
        assert_eq!(
            game.advance(Duration::from_secs(2)),
            [PopupEvent::PopUp, PopupEvent::PopUp, PopupEvent::PopDown]
        );
        // The firings are returned, not applied.
        assert_eq!(game.state().active_count(), 0);
    }

    #[test]
    fn test_tick_routes_timer_events_through_queue() {
        let mut engine = SessionEngine::new(game(9));

        // Tick, then the two firings it queued.
        assert_eq!(engine.submit(PopupEvent::Tick(Duration::from_secs(2))), 4);
        // Pop-ups at 1s and 2s, pop-down at 2s.
        assert_eq!(engine.snapshot().active_count(), 1);
        assert_eq!(engine.snapshot().stats().pop_ups(), 2);
        assert_eq!(engine.snapshot().stats().pop_downs(), 1);
        assert_eq!(engine.snapshot().stats().elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_grab_submitted_after_tick_sees_timer_results() {
        let mut engine = SessionEngine::new(game(1));
        let sender = engine.sender();

        sender.send(PopupEvent::Tick(Duration::from_secs(1))).unwrap();
        sender.send(PopupEvent::Grab(0)).unwrap();
        engine.pump();

        // The tick's pop-up is queued behind the grab that was already waiting.
        assert_eq!(engine.snapshot().score(), 0);
        assert_eq!(engine.snapshot().active_count(), 1);

        engine.submit(PopupEvent::Grab(0));
        assert_eq!(engine.snapshot().score(), 1);
    }

    #[test]
    fn test_many_ticks_respect_roster_bounds() {
        let game = PopupGame::with_seed(PopupConfig::default(), SpawnSeed::from_bytes([5; 16]))
            .unwrap();
        let mut engine = SessionEngine::new(game);
        for step in 0..400 {
            engine.submit(PopupEvent::Tick(Duration::from_millis(130)));
            if step % 7 == 0 {
                engine.submit(PopupEvent::Grab(step % 9));
            }
            let state = engine.snapshot();
            assert!(state.active_count() <= state.slots().len());
        }
        let stats = engine.snapshot().stats();
        assert_eq!(stats.elapsed(), Duration::from_millis(130 * 400));
    }
}
