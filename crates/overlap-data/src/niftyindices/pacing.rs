//! Politeness pacing between requests.
//!
//! A [`Pacer`] hands out [`PacingPermit`]s. Dropping a permit records when the
//! request finished, and the next [`Pacer::acquire`] waits until the delay has
//! passed since then. Because the release happens in `Drop`, the pause is
//! observed whether the request succeeded, failed, or returned early via `?`.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

#[derive(Debug, Default)]
struct PacerState {
    /// Start slot of the most recently granted permit.
    last_start: Option<Instant>,
    /// When the most recently dropped permit was released.
    last_release: Option<Instant>,
}

/// Spaces requests out by a fixed delay.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
    state: Arc<Mutex<PacerState>>,
}

impl Pacer {
    /// Create a pacer with the given pause between requests.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(PacerState::default())),
        }
    }

    /// Configured pause.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the next request slot.
    ///
    /// The slot is at least `delay` after both the previous slot and the
    /// previous release. Concurrent callers are handed successive slots.
    pub async fn acquire(&self) -> PacingPermit {
        let slot = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let slot = [state.last_start, state.last_release]
                .into_iter()
                .flatten()
                .map(|at| at + self.delay)
                .fold(now, Instant::max);
            state.last_start = Some(slot);
            slot
        };

        sleep_until(slot).await;

        PacingPermit {
            state: Arc::clone(&self.state),
        }
    }
}

/// Held for the duration of one request.
#[derive(Debug)]
pub struct PacingPermit {
    state: Arc<Mutex<PacerState>>,
}

impl Drop for PacingPermit {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.last_release = Some(Instant::now());
    }
}
