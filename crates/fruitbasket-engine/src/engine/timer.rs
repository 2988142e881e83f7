use std::time::Duration;

/// Most firings one timer reports for a single step.
///
/// A step spanning more periods than this only moves the timer's phase for the rest.
pub const MAX_FIRINGS_PER_STEP: usize = 1024;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Fires every `period` of accumulated time.
///
/// The timer is driven by tick deltas rather than the wall clock, so a session
/// replayed with the same ticks fires at the same points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PeriodicTimer {
    period: Duration,
    until_next: Duration,
}

impl PeriodicTimer {
    /// Creates a timer whose first firing is one full period away.
    ///
    /// Returns `None` if `period` is zero.
    pub(crate) fn new(period: Duration) -> Option<Self> {
        (!period.is_zero()).then_some(Self {
            period,
            until_next: period,
        })
    }

    /// Advances the timer by `dt`.
    ///
    /// Returns, for each firing inside the step, its offset from the start of the
    /// step, in increasing order. A step longer than the period fires more than once,
    /// up to [`MAX_FIRINGS_PER_STEP`] times.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<Duration> {
        let first = self.until_next;
        let Some(past_first) = dt.checked_sub(first) else {
            self.until_next = first - dt;
            return Vec::new();
        };

        let period = self.period.as_nanos();
        let past_first = past_first.as_nanos();
        self.until_next = self.period - duration_from_nanos(past_first % period);

        let count = usize::try_from(past_first / period)
            .map_or(MAX_FIRINGS_PER_STEP, |extra| {
                extra.saturating_add(1).min(MAX_FIRINGS_PER_STEP)
            });
        let mut fires = Vec::with_capacity(count);
        let mut offset = first;
        for _ in 0..count {
            fires.push(offset);
            offset = offset.saturating_add(self.period);
        }
        fires
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    let subsec = u32::try_from(nanos % NANOS_PER_SEC).unwrap_or_default();
    Duration::new(secs, subsec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periodic(period: Duration) -> PeriodicTimer {
        PeriodicTimer::new(period).unwrap()
    }

    #[test]
    fn test_reports_offsets_inside_step() {
        let mut timer = periodic(Duration::from_secs(1));
        assert!(timer.advance(Duration::from_millis(600)).is_empty());
        assert_eq!(
            timer.advance(Duration::from_millis(1500)),
            [Duration::from_millis(400), Duration::from_millis(1400)]
        );
        assert_eq!(timer.until_next, Duration::from_millis(900));
    }

    #[test]
    fn test_fires_exactly_on_period_boundary() {
        let mut timer = periodic(Duration::from_secs(2));
        assert!(timer.advance(Duration::from_secs(1)).is_empty());
        assert_eq!(timer.advance(Duration::from_secs(1)), [Duration::ZERO]);
        assert_eq!(timer.until_next, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_step_never_fires() {
        let mut timer = periodic(Duration::from_millis(10));
        for _ in 0..100 {
            assert!(timer.advance(Duration::ZERO).is_empty());
        }
        assert_eq!(timer.until_next, Duration::from_millis(10));
    }

    #[test]
    fn test_many_small_steps_match_one_large_step() {
        let mut small = periodic(Duration::from_millis(300));
        let mut large = small.clone();

        let small_fires: usize = (0..100)
            .map(|_| small.advance(Duration::from_millis(10)).len())
            .sum();
        let large_fires = large.advance(Duration::from_secs(1)).len();

        assert_eq!(small_fires, 3);
        assert_eq!(large_fires, 3);
        assert_eq!(small.until_next, large.until_next);
    }

    #[test]
    fn test_oversized_step_is_capped_but_keeps_phase() {
        let mut timer = periodic(Duration::from_millis(300));

        let fires = timer.advance(Duration::from_secs(3600) + Duration::from_millis(100));

        assert_eq!(fires.len(), MAX_FIRINGS_PER_STEP);
        assert_eq!(fires[0], Duration::from_millis(300));
        assert_eq!(fires[1], Duration::from_millis(600));
        // 3600.1s past the start; the next firing is at 3600.3s.
        assert_eq!(timer.until_next, Duration::from_millis(200));
    }

    #[test]
    fn test_maximal_steps_do_not_overflow() {
        let mut timer = periodic(Duration::from_nanos(1));
        assert_eq!(timer.advance(Duration::MAX).len(), MAX_FIRINGS_PER_STEP);
        assert_eq!(timer.until_next, Duration::from_nanos(1));

        let mut timer = periodic(Duration::MAX);
        assert!(timer.advance(Duration::from_secs(1)).is_empty());
        assert_eq!(timer.advance(Duration::MAX).len(), 1);
    }

    #[test]
    fn test_zero_period_is_rejected() {
        assert_eq!(PeriodicTimer::new(Duration::ZERO), None);
    }
}
