use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

/// Cooldown applied when a command does not declare its own.
pub const DEFAULT_COOLDOWN_SECS: u64 = 3;

/// Outcome of a cooldown acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownGate {
    Allowed,
    Throttled { retry_after: Duration },
}

/// Per-command, per-user cooldown bookkeeping.
///
/// Entries evict themselves through a deferred task scheduled at acquire
/// time; there is no periodic sweep. State is process-local and empties on
/// restart.
#[derive(Clone, Debug, Default)]
pub struct CooldownTracker {
    buckets: Arc<DashMap<String, HashMap<u64, Instant>>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a use of `command` by `user_id`, or report how long the user
    /// still has to wait.
    pub fn try_acquire(&self, command: &str, user_id: u64, cooldown: Duration) -> CooldownGate {
        let now = Instant::now();

        let mut bucket = self.buckets.entry(command.to_owned()).or_default();
        if let Some(expiry) = bucket.get(&user_id)
            && *expiry > now
        {
            return CooldownGate::Throttled {
                retry_after: *expiry - now,
            };
        }

        bucket.insert(user_id, now + cooldown);
        drop(bucket);

        self.schedule_eviction(command.to_owned(), user_id, cooldown);
        CooldownGate::Allowed
    }

    fn schedule_eviction(&self, command: String, user_id: u64, cooldown: Duration) {
        let buckets = Arc::clone(&self.buckets);
        tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;

            // A fresh acquire may have replaced the expiry in the meantime;
            // only drop entries that are actually past due.
            if let Some(mut bucket) = buckets.get_mut(&command)
                && bucket
                    .get(&user_id)
                    .is_some_and(|expiry| *expiry <= Instant::now())
            {
                bucket.remove(&user_id);
            }
        });
    }

    #[cfg(test)]
    fn entry_count(&self, command: &str) -> usize {
        self.buckets.get(command).map_or(0, |bucket| bucket.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn first_use_is_allowed() {
        let tracker = CooldownTracker::new();
        assert_eq!(tracker.try_acquire("ban", 1, WINDOW), CooldownGate::Allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_within_window_reports_remaining_wait() {
        let tracker = CooldownTracker::new();
        tracker.try_acquire("ban", 1, WINDOW);

        tokio::time::advance(Duration::from_secs(1)).await;

        match tracker.try_acquire("ban", 1, WINDOW) {
            CooldownGate::Throttled { retry_after } => {
                let secs = retry_after.as_secs_f64();
                assert!((3.9..=4.0).contains(&secs), "retry_after was {secs}s");
            }
            CooldownGate::Allowed => panic!("expected a throttle"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expired_window_allows_again() {
        let tracker = CooldownTracker::new();
        tracker.try_acquire("ban", 1, WINDOW);

        tokio::time::advance(Duration::from_secs(5)).await;
        tokio::time::advance(Duration::from_millis(1)).await;

        assert_eq!(tracker.try_acquire("ban", 1, WINDOW), CooldownGate::Allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn users_and_commands_are_independent() {
        let tracker = CooldownTracker::new();
        tracker.try_acquire("ban", 1, WINDOW);

        assert_eq!(tracker.try_acquire("ban", 2, WINDOW), CooldownGate::Allowed);
        assert_eq!(
            tracker.try_acquire("kick", 1, WINDOW),
            CooldownGate::Allowed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn entries_self_evict_after_expiry() {
        let tracker = CooldownTracker::new();
        tracker.try_acquire("ban", 1, WINDOW);
        assert_eq!(tracker.entry_count("ban"), 1);

        tokio::time::advance(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        assert_eq!(tracker.entry_count("ban"), 0);
    }
}
