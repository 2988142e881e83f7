use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Statistics of a basket-mode session.
///
/// Tracks what happened to the fruits during a round:
///
/// - **Score**: One point per fruit deposited into an accepting basket
/// - **Mismatches**: Fruits dropped into the wrong basket (and discarded)
/// - **Releases**: Fruits let go by clicking again while holding them
/// - **Spawned**: Every fruit ever created, initial population included
/// - **Discarded**: Fruits that left play without scoring
///
/// # Example
///
/// ```
/// use fruitbasket_engine::SessionStats;
///
/// let mut stats = SessionStats::new();
/// stats.record_spawn(10);
/// stats.record_match();
/// stats.record_mismatch();
/// stats.record_spawn(2);
///
/// assert_eq!(stats.score(), 1);
/// assert_eq!(stats.spawned(), 12);
/// assert_eq!(stats.discarded(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    score: u64,
    mismatches: u64,
    releases: u64,
    spawned: u64,
    discarded: u64,
    elapsed: Duration,
}

impl SessionStats {
    /// Creates a new statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            mismatches: 0,
            releases: 0,
            spawned: 0,
            discarded: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Returns the number of fruits deposited into accepting baskets.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn mismatches(&self) -> u64 {
        self.mismatches
    }

    #[must_use]
    pub const fn releases(&self) -> u64 {
        self.releases
    }

    #[must_use]
    pub const fn spawned(&self) -> u64 {
        self.spawned
    }

    #[must_use]
    pub const fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Returns the play time accumulated from tick events.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub const fn record_match(&mut self) {
        self.score += 1;
    }

    /// Records a fruit discarded by a mismatched drop.
    pub const fn record_mismatch(&mut self) {
        self.mismatches += 1;
        self.discarded += 1;
    }

    pub const fn record_release(&mut self, discarded: bool) {
        self.releases += 1;
        if discarded {
            self.discarded += 1;
        }
    }

    pub const fn record_spawn(&mut self, count: usize) {
        self.spawned += count as u64;
    }

    /// Adds `dt` to the play time, saturating at [`Duration::MAX`].
    pub const fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }
}

/// Statistics of a timed pop-up session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupStats {
    score: u64,
    pop_ups: u64,
    pop_downs: u64,
    elapsed: Duration,
}

impl PopupStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            pop_ups: 0,
            pop_downs: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Returns the number of successful grabs.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the number of slots that popped up.
    #[must_use]
    pub const fn pop_ups(&self) -> u64 {
        self.pop_ups
    }

    /// Returns the number of slots that popped down before being grabbed.
    #[must_use]
    pub const fn pop_downs(&self) -> u64 {
        self.pop_downs
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub const fn record_grab(&mut self) {
        self.score += 1;
    }

    pub const fn record_pop_up(&mut self) {
        self.pop_ups += 1;
    }

    pub const fn record_pop_down(&mut self) {
        self.pop_downs += 1;
    }

    pub const fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }
}
