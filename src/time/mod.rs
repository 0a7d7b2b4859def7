use embassy_time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The embassy time driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Non-blocking deadline gate. Unlike `Ticker` this never awaits, the caller
/// polls `ready` as often as it likes and `arm`s the gate after acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleThrottle {
    duration: Duration,
    ready_at: Instant,
}

impl SampleThrottle {
    /// A gate that is open immediately and `duration` apart after each arm.
    pub const fn every(duration: Duration) -> Self {
        Self {
            duration,
            ready_at: Instant::MIN,
        }
    }

    /// Spaces `samples_per_period` samples evenly across each
    /// `1 / tick_rate_hz` period. Both must be non-zero.
    pub fn for_tick_rate(tick_rate_hz: u16, samples_per_period: u16) -> Self {
        let samples_per_sec = tick_rate_hz as u64 * samples_per_period as u64;
        Self::every(Duration::from_micros(1_000_000 / samples_per_sec))
    }

    pub fn interval(&self) -> Duration {
        self.duration
    }

    pub fn ready_at(&self) -> Instant {
        self.ready_at
    }

    pub fn ready(&self, now: Instant) -> bool {
        now >= self.ready_at
    }

    pub fn arm(&mut self, now: Instant) {
        self.ready_at = now.checked_add(self.duration).unwrap_or(Instant::MAX);
    }

    pub fn reset(&mut self) {
        self.ready_at = Instant::MIN;
    }
}
