// state/guard.rs
// Call-site hardening around the stateless verifier: replay rejection and attempt throttling.

use dashmap::{DashMap, mapref::entry::Entry};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::keyed::DashMapStateStore,
};
use std::{
    num::NonZeroU32,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};
use uuid::Uuid;

/// Shrink the limiter's state store every N checks.
const SHRINK_INTERVAL: u64 = 1000;

type KeyedLimiter =
    RateLimiter<String, DashMapStateStore<String>, DefaultClock, NoOpMiddleware>;

/// Tracks, per factor, the last accepted counter and, per account, how many
/// verification attempts are left.
///
/// Each account gets a burst of `max_attempts`; after that one attempt comes
/// back every `window`.
pub struct VerificationGuard {
    limiter: KeyedLimiter,
    checks: AtomicU64,
    last_accepted: DashMap<Uuid, u64>,
}

impl VerificationGuard {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        let burst = NonZeroU32::new(max_attempts).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::keyed(quota),
            checks: AtomicU64::new(0),
            last_accepted: DashMap::new(),
        }
    }

    /// Takes one attempt for `account`. When none are left, returns the
    /// seconds until the next one.
    pub fn check_attempt(&self, account: &str) -> Result<(), u64> {
        let count = self.checks.fetch_add(1, Ordering::Relaxed);
        if count % SHRINK_INTERVAL == 0 && count > 0 {
            self.limiter.retain_recent();
        }

        self.limiter
            .check_key(&account.to_string())
            .map_err(|not_until| {
                let wait = not_until.wait_time_from(DefaultClock::default().now());
                wait.as_secs().max(1)
            })
    }

    /// Records `counter` as used for `factor_id`. Fails if it is not newer
    /// than the last accepted counter.
    pub fn try_consume(&self, factor_id: Uuid, counter: u64) -> bool {
        match self.last_accepted.entry(factor_id) {
            Entry::Occupied(mut seen) => {
                if counter <= *seen.get() {
                    return false;
                }
                seen.insert(counter);
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(counter);
                true
            }
        }
    }

    pub fn forget(&self, factor_id: Uuid) {
        self.last_accepted.remove(&factor_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_are_capped_per_account() {
        let guard = VerificationGuard::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(guard.check_attempt("ana").is_ok());
        }
        let retry_after = guard.check_attempt("ana").unwrap_err();
        assert!(retry_after >= 1 && retry_after <= 60);
        // other accounts are unaffected
        assert!(guard.check_attempt("luis").is_ok());
    }

    #[test]
    fn an_attempt_returns_after_the_window() {
        let guard = VerificationGuard::new(2, Duration::from_millis(100));
        assert!(guard.check_attempt("ana").is_ok());
        assert!(guard.check_attempt("ana").is_ok());
        assert!(guard.check_attempt("ana").is_err());
        std::thread::sleep(Duration::from_millis(150));
        assert!(guard.check_attempt("ana").is_ok());
        assert!(guard.check_attempt("ana").is_err());
    }

    #[test]
    fn zero_attempts_still_allows_one() {
        let guard = VerificationGuard::new(0, Duration::from_secs(60));
        assert!(guard.check_attempt("ana").is_ok());
        assert!(guard.check_attempt("ana").is_err());
    }

    #[test]
    fn same_or_earlier_counter_is_a_replay() {
        let guard = VerificationGuard::new(5, Duration::from_secs(60));
        let id = Uuid::new_v4();
        assert!(guard.try_consume(id, 100));
        assert!(!guard.try_consume(id, 100));
        assert!(!guard.try_consume(id, 99));
        assert!(guard.try_consume(id, 101));
        assert!(guard.try_consume(Uuid::new_v4(), 100));
        guard.forget(id);
        assert!(guard.try_consume(id, 50));
    }
}
