//! Per-domain request pacing.
//!
//! Each domain gets a "not before" instant that is pushed forward by the
//! cooldown whenever a request to it finishes. Callers for the same domain
//! queue up behind each other; different domains never wait on one another.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use crate::utils::error::Result;

#[derive(Default)]
struct CooldownState {
    not_before: HashMap<String, Instant>,
    in_flight: HashSet<String>,
}

pub struct DomainRateLimiter {
    state: Mutex<CooldownState>,
    cooldown: Duration,
    poll_interval: Duration,
}

impl DomainRateLimiter {
    pub fn new(cooldown: Duration, poll_interval: Duration) -> Self {
        Self {
            state: Mutex::new(CooldownState::default()),
            cooldown,
            poll_interval,
        }
    }

    pub fn set_cooldown(&self, domain: &str, duration: Duration) {
        let mut state = self.lock();
        state
            .not_before
            .insert(domain.to_ascii_lowercase(), Instant::now() + duration);
    }

    pub fn is_on_cooldown(&self, domain: &str) -> bool {
        let state = self.lock();
        state
            .not_before
            .get(&domain.to_ascii_lowercase())
            .is_some_and(|not_before| Instant::now() < *not_before)
    }

    /// Waits for `domain` to come off cooldown, runs `operation`, then starts
    /// a fresh cooldown.
    ///
    /// Failures are logged and reported as `None`; they are not propagated.
    pub async fn enqueue<T, F, Fut>(&self, domain: &str, operation: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _slot = self.acquire(domain).await;

        match operation().await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(domain, error = %e, "rate-limited operation failed");
                None
            }
        }
    }

    async fn acquire(&self, domain: &str) -> SlotGuard<'_> {
        let key = domain.to_ascii_lowercase();
        loop {
            if self.try_reserve(&key) {
                return SlotGuard { limiter: self, domain: key };
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn try_reserve(&self, domain: &str) -> bool {
        let mut state = self.lock();
        let cooling = state
            .not_before
            .get(domain)
            .is_some_and(|not_before| Instant::now() < *not_before);
        if cooling || state.in_flight.contains(domain) {
            return false;
        }
        state.in_flight.insert(domain.to_string());
        true
    }

    fn release(&self, domain: &str) {
        let mut state = self.lock();
        state.in_flight.remove(domain);
        state
            .not_before
            .insert(domain.to_string(), Instant::now() + self.cooldown);
    }

    fn lock(&self) -> MutexGuard<'_, CooldownState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DomainRateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_millis(100))
    }
}

/// Starts the cooldown even when the operation future is dropped mid-flight.
struct SlotGuard<'a> {
    limiter: &'a DomainRateLimiter,
    domain: String,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.limiter.release(&self.domain);
    }
}
