//! # Fetch Throttle
//!
//! Keeps the taxonomy refresh from running concurrently with itself or more
//! often than a minimum interval.
//!
//! ```text
//!          try_begin (admitted)
//!   IDLE ─────────────────────────> FETCHING
//!    ^                                 │
//!    └──── FetchTicket::finish ────────┤  (records completion time)
//!    └──── FetchTicket dropped ────────┘  (failure or cancellation: no timestamp)
//! ```
//!
//! Admission rules:
//!
//! - While FETCHING every request is dropped, forced or not. The caller that
//!   started the fetch will see its result.
//! - While IDLE, a request inside the window that follows the last
//!   *successful* completion is dropped unless it is forced.
//! - A failed fetch never records a timestamp, so it does not start a window.
//!
//! Time comes from `tokio::time`, so tests can pause and advance the clock.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Default minimum interval between two non-forced refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Fetching,
}

/// Why a refresh request was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AlreadyFetching,
    Throttled { remaining: Duration },
}

#[derive(Debug)]
struct ThrottleState {
    phase: FetchPhase,
    last_success: Option<Instant>,
}

#[derive(Debug)]
pub struct FetchThrottle {
    min_interval: Duration,
    state: Mutex<ThrottleState>,
}

impl Default for FetchThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

impl FetchThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            state: Mutex::new(ThrottleState {
                phase: FetchPhase::Idle,
                last_success: None,
            }),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn phase(&self) -> FetchPhase {
        self.state.lock().phase
    }

    /// Asks to start a fetch. On admission the throttle is FETCHING until the
    /// returned ticket is finished or dropped.
    pub fn try_begin(&self, force: bool) -> Result<FetchTicket<'_>, Rejection> {
        let mut state = self.state.lock();
        if state.phase == FetchPhase::Fetching {
            return Err(Rejection::AlreadyFetching);
        }
        if !force {
            if let Some(last) = state.last_success {
                let elapsed = last.elapsed();
                if elapsed < self.min_interval {
                    return Err(Rejection::Throttled {
                        remaining: self.min_interval - elapsed,
                    });
                }
            }
        }
        state.phase = FetchPhase::Fetching;
        Ok(FetchTicket {
            throttle: self,
            finished: false,
        })
    }
}

/// Proof of an admitted fetch. Finish it on success; dropping it unfinished
/// returns the throttle to IDLE without opening a window.
#[must_use = "dropping the ticket immediately ends the fetch as failed"]
pub struct FetchTicket<'a> {
    throttle: &'a FetchThrottle,
    finished: bool,
}

impl FetchTicket<'_> {
    pub fn finish(mut self) {
        let mut state = self.throttle.state.lock();
        state.phase = FetchPhase::Idle;
        state.last_success = Some(Instant::now());
        self.finished = true;
    }
}

impl Drop for FetchTicket<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.throttle.state.lock().phase = FetchPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_request_is_admitted() {
        let throttle = FetchThrottle::default();
        let ticket = throttle.try_begin(false).unwrap();
        assert_eq!(throttle.phase(), FetchPhase::Fetching);
        ticket.finish();
        assert_eq!(throttle.phase(), FetchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_while_fetching_are_dropped_even_when_forced() {
        let throttle = FetchThrottle::default();
        let _ticket = throttle.try_begin(false).unwrap();
        assert_eq!(
            throttle.try_begin(false).err(),
            Some(Rejection::AlreadyFetching)
        );
        assert_eq!(
            throttle.try_begin(true).err(),
            Some(Rejection::AlreadyFetching)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_after_success() {
        let throttle = FetchThrottle::default();
        throttle.try_begin(false).unwrap().finish();

        tokio::time::advance(Duration::from_millis(200)).await;
        match throttle.try_begin(false) {
            Err(Rejection::Throttled { remaining }) => {
                assert_eq!(remaining, Duration::from_millis(1300))
            }
            Err(other) => panic!("Expected Throttled, got {other:?}"),
            Ok(_) => panic!("Expected Throttled, got a ticket"),
        }

        throttle.try_begin(true).unwrap().finish();

        tokio::time::advance(Duration::from_millis(1500)).await;
        assert!(throttle.try_begin(false).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_does_not_open_window() {
        let throttle = FetchThrottle::default();
        {
            let _ticket = throttle.try_begin(false).unwrap();
            // dropped without finish: the fetch failed
        }
        assert_eq!(throttle.phase(), FetchPhase::Idle);
        assert!(throttle.try_begin(false).is_ok());
    }
}
