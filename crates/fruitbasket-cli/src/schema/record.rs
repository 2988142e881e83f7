use chrono::{DateTime, Utc};
use fruitbasket_engine::{BasketEvent, PopupConfig, PopupEvent, SessionConfig, SpawnSeed};
use serde::{Deserialize, Serialize};

/// Recorded play session with everything needed to replay it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedSession {
    /// Timestamp when recording was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Seed of the spawn source
    pub seed: SpawnSeed,
    /// Game mode with its configuration and the player's events
    #[serde(flatten)]
    pub game: RecordedGame,
    /// Score shown when the session ended
    pub final_score: u64,
}

/// Mode-specific part of a recording.
///
/// Only events the player (or the frame clock) submitted are stored; timer firings
/// are regenerated from the ticks on replay.
#[derive(Debug, Clone, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecordedGame {
    Basket {
        config: SessionConfig,
        events: Vec<BasketEvent>,
    },
    Popup {
        config: PopupConfig,
        events: Vec<PopupEvent>,
    },
}

impl RecordedGame {
    pub fn mode_name(&self) -> &'static str {
        match self {
            RecordedGame::Basket { .. } => "basket",
            RecordedGame::Popup { .. } => "popup",
        }
    }

    pub fn event_count(&self) -> usize {
        match self {
            RecordedGame::Basket { events, .. } => events.len(),
            RecordedGame::Popup { events, .. } => events.len(),
        }
    }
}
