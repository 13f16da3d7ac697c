//! Shared rate limiter for outbound fetches
//!
//! A token bucket with a capacity of one token, refilled once per interval.
//! All workers share a single limiter, so the aggregate request rate is
//! bounded no matter how many workers are running.

use crate::state::PageError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Token-bucket rate limiter shared by all workers
#[derive(Debug)]
pub struct RateLimiter {
    /// Time between two tokens
    interval: Duration,

    /// Instant at which the next token becomes available
    next_token: Mutex<Instant>,
}

impl RateLimiter {
    /// Creates a limiter whose single token is available immediately
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_token: Mutex::new(Instant::now()),
        }
    }

    /// Waits until a token is available
    ///
    /// # Returns
    ///
    /// * `Ok(())` - A token was taken, the caller may send its request
    /// * `Err(PageError::Cancelled)` - `cancel` fired before a token was available
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), PageError> {
        if cancel.is_cancelled() {
            return Err(PageError::Cancelled);
        }

        let ready_at = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PageError::Cancelled),
            ready_at = self.reserve() => ready_at,
        };

        if ready_at <= Instant::now() {
            return Ok(());
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.release(ready_at).await;
                Err(PageError::Cancelled)
            }
            _ = tokio::time::sleep_until(ready_at) => Ok(()),
        }
    }

    /// Claims the next token slot and returns when it becomes usable
    ///
    /// An idle bucket never holds more than one token: a slot in the past is
    /// moved up to now.
    async fn reserve(&self) -> Instant {
        let now = Instant::now();
        let mut next_token = self.next_token.lock().await;
        let ready_at = (*next_token).max(now);
        *next_token = ready_at + self.interval;
        ready_at
    }

    /// Hands back an unused slot reserved for `ready_at`
    ///
    /// Only the most recent reservation can be returned; an earlier one has
    /// later reservations queued behind it and is simply lost.
    async fn release(&self, ready_at: Instant) {
        let mut next_token = self.next_token.lock().await;
        if *next_token == ready_at + self.interval {
            *next_token = ready_at;
        }
    }
}
