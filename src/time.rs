//! Injectable time primitives.
//!
//! The loop controller never calls `Instant::now()` or `Timer::after()` itself;
//! it goes through [`Clock`] and [`Sleeper`] so that tests can drive hours of
//! simulated time deterministically. Both firmware implementations are thin
//! wrappers over `embassy_time`, which is backed by the RP2350 monotonic timer
//! (never adjusted, unlike a wall clock).

use embassy_time::{Duration, Instant, Timer};

/// Monotonic time source.
pub trait Clock {
    /// Current monotonic instant.
    fn now(&self) -> Instant;
}

/// Cooperative sleep.
pub trait Sleeper {
    /// Suspend the loop for `duration`.
    async fn sleep(
        &mut self,
        duration: Duration,
    );
}

/// [`Clock`] backed by the embassy time driver.
#[derive(Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[inline]
    fn now(&self) -> Instant { Instant::now() }
}

/// [`Sleeper`] backed by `embassy_time::Timer`.
#[derive(Clone, Copy, Default)]
pub struct EmbassySleeper;

impl Sleeper for EmbassySleeper {
    async fn sleep(
        &mut self,
        duration: Duration,
    ) {
        Timer::after(duration).await;
    }
}

/// Manually advanced clock for host tests.
#[cfg(test)]
pub mod manual {
    use core::cell::Cell;
    use std::rc::Rc;

    use embassy_time::{Duration, Instant};

    use super::{Clock, Sleeper};

    /// Shared handle to a simulated monotonic clock. Clones observe the same time.
    #[derive(Clone)]
    pub struct ManualClock {
        now_ms: Rc<Cell<u64>>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                now_ms: Rc::new(Cell::new(0)),
            }
        }

        pub fn advance(
            &self,
            by: Duration,
        ) {
            self.now_ms.set(self.now_ms.get() + by.as_millis());
        }

        /// Sleeper that advances this clock instead of waiting.
        pub fn sleeper(&self) -> ManualSleeper { ManualSleeper { clock: self.clone() } }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant { Instant::from_millis(self.now_ms.get()) }
    }

    pub struct ManualSleeper {
        clock: ManualClock,
    }

    impl Sleeper for ManualSleeper {
        async fn sleep(
            &mut self,
            duration: Duration,
        ) {
            self.clock.advance(duration);
        }
    }
}
