//! Consecutive-failure circuit breaker shared by every caller of one `LlmClient`.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct CircuitBreaker {
    threshold: u32,
    cooldown: Duration,
    state: Mutex<BreakerState>,
}

#[derive(Debug, Default)]
struct BreakerState {
    consecutive_failures: u32,
    open_until: Option<Instant>,
    /// Set while the single half-open trial call is outstanding.
    half_open_since: Option<Instant>,
}

impl CircuitBreaker {
    /// A threshold of 0 disables the breaker.
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            state: Mutex::new(BreakerState::default()),
        }
    }

    /// Returns false while the circuit is open.
    pub fn allow(&self) -> bool {
        self.allow_at(Instant::now())
    }

    pub fn record_success(&self) {
        let mut state = self.lock();
        state.consecutive_failures = 0;
        state.open_until = None;
        state.half_open_since = None;
    }

    /// Ends a call that said nothing about endpoint health, such as a reply
    /// that could not be parsed. Counts as neither success nor failure.
    pub fn release(&self) {
        self.lock().half_open_since = None;
    }

    /// Returns true when this failure opened the circuit.
    pub fn record_failure(&self) -> bool {
        self.record_failure_at(Instant::now())
    }

    fn allow_at(&self, now: Instant) -> bool {
        let mut state = self.lock();
        if let Some(since) = state.half_open_since {
            // A trial call that never reported back (its future was dropped)
            // stops blocking others after one cooldown.
            if now < since + self.cooldown {
                return false;
            }
            state.half_open_since = Some(now);
            return true;
        }
        match state.open_until {
            Some(until) if now < until => false,
            Some(_) => {
                // Half-open: exactly one trial call; a further failure reopens immediately.
                state.open_until = None;
                state.consecutive_failures = self.threshold.saturating_sub(1);
                state.half_open_since = Some(now);
                true
            }
            None => true,
        }
    }

    fn record_failure_at(&self, now: Instant) -> bool {
        let mut state = self.lock();
        state.half_open_since = None;
        if self.threshold == 0 {
            return false;
        }
        state.consecutive_failures += 1;
        if state.consecutive_failures >= self.threshold && state.open_until.is_none() {
            state.open_until = Some(now + self.cooldown);
            return true;
        }
        false
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        // State is plain counters and instants; a poisoned lock still holds usable data.
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}
