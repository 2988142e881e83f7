use std::{
    fs::{self, File},
    io::{BufWriter, Write as _},
    ops::Deref,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use chrono::Utc;
use fruitbasket_engine::{
    BasketEvent, BasketGame, GameMode, PopupEvent, PopupGame, SessionEngine, SpawnSeed,
    SubscriptionId,
};

use crate::schema::record::{RecordedGame, RecordedSession};

/// Longest tick a recording merges consecutive ticks into.
///
/// Timers cap their firings per step, so merging stops well before a merged step
/// could reach that cap for any period of a millisecond or more.
const MAX_MERGED_TICK: Duration = Duration::from_secs(1);

/// Events that can be stored in a recording.
pub trait RecordableEvent: Sized {
    /// Returns the step of a tick event.
    fn tick_step(&self) -> Option<Duration>;

    /// Builds a tick event.
    fn tick(dt: Duration) -> Self;
}

impl RecordableEvent for BasketEvent {
    fn tick_step(&self) -> Option<Duration> {
        match self {
            BasketEvent::Tick(dt) => Some(*dt),
            _ => None,
        }
    }

    fn tick(dt: Duration) -> Self {
        BasketEvent::Tick(dt)
    }
}

impl RecordableEvent for PopupEvent {
    fn tick_step(&self) -> Option<Duration> {
        match self {
            PopupEvent::Tick(dt) => Some(*dt),
            _ => None,
        }
    }

    fn tick(dt: Duration) -> Self {
        PopupEvent::Tick(dt)
    }
}

/// A wrapper around [`SessionEngine`] that records every submitted event.
///
/// Consecutive ticks are merged into one, up to one second: both timers and the
/// clock only see the total step, so the merged recording replays to the same state
/// while staying small at 60 ticks per second.
#[derive(Debug)]
pub struct RecordingEngine<M>
where
    M: GameMode,
{
    engine: SessionEngine<M>,
    events: Vec<M::Event>,
}

/// Provides read-only access to the underlying `SessionEngine`.
///
/// `DerefMut` is not implemented: submitting through the engine directly would skip
/// the recording.
impl<M> Deref for RecordingEngine<M>
where
    M: GameMode,
{
    type Target = SessionEngine<M>;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

impl<M> RecordingEngine<M>
where
    M: GameMode,
    M::Event: RecordableEvent,
{
    pub fn new(mode: M) -> Self {
        Self {
            engine: SessionEngine::new(mode),
            events: Vec::new(),
        }
    }

    pub fn submit(&mut self, event: M::Event) -> usize {
        self.record(event.clone());
        self.engine.submit(event)
    }

    /// Registers a snapshot callback on the underlying engine.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&M::State) + 'static,
    {
        self.engine.subscribe(subscriber)
    }

    pub fn events(&self) -> &[M::Event] {
        &self.events
    }

    pub fn into_parts(self) -> (SessionEngine<M>, Vec<M::Event>) {
        (self.engine, self.events)
    }

    fn record(&mut self, event: M::Event) {
        if let Some(step) = event.tick_step()
            && let Some(last) = self.events.last_mut()
            && let Some(previous) = last.tick_step()
            && let Some(merged) = previous.checked_add(step)
            && merged <= MAX_MERGED_TICK
        {
            *last = M::Event::tick(merged);
            return;
        }
        self.events.push(event);
    }
}

/// Recorded history of a game session, ready to be saved.
#[derive(Debug)]
pub struct SessionHistory {
    seed: SpawnSeed,
    game: RecordedGame,
    final_score: u64,
}

impl SessionHistory {
    pub fn basket(seed: SpawnSeed, recording: RecordingEngine<BasketGame>) -> Self {
        let (engine, events) = recording.into_parts();
        let final_score = engine.snapshot().score();
        let config = engine.into_mode().config().clone();
        Self {
            seed,
            game: RecordedGame::Basket { config, events },
            final_score,
        }
    }

    pub fn popup(seed: SpawnSeed, recording: RecordingEngine<PopupGame>) -> Self {
        let (engine, events) = recording.into_parts();
        let final_score = engine.snapshot().score();
        let config = engine.into_mode().config().clone();
        Self {
            seed,
            game: RecordedGame::Popup { config, events },
            final_score,
        }
    }

    /// Saves the recorded session to a JSON file.
    ///
    /// The filename is generated from the mode and the current timestamp:
    /// `{mode}_{YYYYMMDD_HHMMSS}.json`. `record_dir` is created if it doesn't exist.
    ///
    /// Returns the path of the written file.
    pub fn save(self, record_dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(record_dir)
            .with_context(|| format!("Failed to create directory {}", record_dir.display()))?;

        let timestamp = Utc::now();
        let filename = format!(
            "{}_{}.json",
            self.game.mode_name(),
            timestamp.format("%Y%m%d_%H%M%S")
        );
        let filepath = record_dir.join(filename);

        let data = RecordedSession {
            recorded_at: timestamp,
            seed: self.seed,
            game: self.game,
            final_score: self.final_score,
        };

        let file = File::create(&filepath)
            .with_context(|| format!("Failed to create file: {}", filepath.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &data)
            .with_context(|| format!("Failed to write JSON to {}", filepath.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", filepath.display()))?;

        tracing::info!(
            path = %filepath.display(),
            events = data.game.event_count(),
            "recording saved"
        );
        Ok(filepath)
    }
}

#[cfg(test)]
mod tests {
    use fruitbasket_engine::PopupConfig;

    use super::*;

    fn popup_recording() -> RecordingEngine<PopupGame> {
        let game =
            PopupGame::with_seed(PopupConfig::default(), SpawnSeed::from_bytes([1; 16])).unwrap();
        RecordingEngine::new(game)
    }

    #[test]
    fn test_consecutive_ticks_are_merged() {
        let mut recording = popup_recording();
        for _ in 0..3 {
            recording.submit(PopupEvent::Tick(Duration::from_millis(300)));
        }
        recording.submit(PopupEvent::Grab(4));
        recording.submit(PopupEvent::Tick(Duration::from_millis(100)));

        assert_eq!(
            recording.events(),
            [
                PopupEvent::Tick(Duration::from_millis(900)),
                PopupEvent::Grab(4),
                PopupEvent::Tick(Duration::from_millis(100)),
            ]
        );
    }

    #[test]
    fn test_tick_merging_stops_at_one_second() {
        let mut recording = popup_recording();
        for _ in 0..5 {
            recording.submit(PopupEvent::Tick(Duration::from_millis(400)));
        }
        recording.submit(PopupEvent::Tick(Duration::from_secs(10)));

        assert_eq!(
            recording.events(),
            [
                PopupEvent::Tick(Duration::from_millis(800)),
                PopupEvent::Tick(Duration::from_millis(800)),
                PopupEvent::Tick(Duration::from_millis(400)),
                PopupEvent::Tick(Duration::from_secs(10)),
            ]
        );
    }

    #[test]
    fn test_merged_recording_replays_to_same_state() {
        let mut recording = popup_recording();
        for step in 0..200_usize {
            recording.submit(PopupEvent::Tick(Duration::from_millis(45)));
            if step % 11 == 0 {
                recording.submit(PopupEvent::Grab(step % 9));
            }
        }

        let mut replayed = SessionEngine::new(
            PopupGame::with_seed(PopupConfig::default(), SpawnSeed::from_bytes([1; 16])).unwrap(),
        );
        for event in recording.events() {
            replayed.submit(*event);
        }

        assert_eq!(replayed.snapshot(), recording.snapshot());
    }
}
