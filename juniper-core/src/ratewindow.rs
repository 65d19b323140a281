use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct FixedWindow {
    started: Instant,
    count: u32,
}

/// Fixed-window message counter keyed by (guild, user), used by the
/// anti-spam check. Purely in-process; counters vanish on restart.
#[derive(Clone, Debug, Default)]
pub struct MessageRateTracker {
    windows: Arc<DashMap<(u64, u64), FixedWindow>>,
}

impl MessageRateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one message and return the total inside the current window.
    pub fn record(&self, guild_id: u64, user_id: u64, window: Duration) -> u32 {
        record_window(&self.windows, (guild_id, user_id), window)
    }

    /// Drop the window, typically right after a penalty was applied so the
    /// same burst is not flagged twice.
    pub fn reset(&self, guild_id: u64, user_id: u64) {
        self.windows.remove(&(guild_id, user_id));
    }
}

/// Fixed-window join counter keyed by guild, used by the anti-raid check.
#[derive(Clone, Debug, Default)]
pub struct JoinRateTracker {
    windows: Arc<DashMap<u64, FixedWindow>>,
}

impl JoinRateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one join and return the total inside the current window.
    pub fn record(&self, guild_id: u64, window: Duration) -> u32 {
        record_window(&self.windows, guild_id, window)
    }

    /// Drop the window, typically right after an alert was raised.
    pub fn reset(&self, guild_id: u64) {
        self.windows.remove(&guild_id);
    }
}

fn record_window<K>(windows: &DashMap<K, FixedWindow>, key: K, window: Duration) -> u32
where
    K: std::hash::Hash + Eq,
{
    let now = Instant::now();
    let mut entry = windows.entry(key).or_insert(FixedWindow {
        started: now,
        count: 0,
    });

    if now.duration_since(entry.started) > window {
        entry.started = now;
        entry.count = 0;
    }

    entry.count += 1;
    entry.count
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn counts_accumulate_inside_the_window() {
        let tracker = MessageRateTracker::new();
        assert_eq!(tracker.record(1, 2, WINDOW), 1);
        assert_eq!(tracker.record(1, 2, WINDOW), 2);

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(tracker.record(1, 2, WINDOW), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn window_expiry_restarts_the_count() {
        let tracker = MessageRateTracker::new();
        tracker.record(1, 2, WINDOW);
        tracker.record(1, 2, WINDOW);

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(tracker.record(1, 2, WINDOW), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn users_are_tracked_independently() {
        let tracker = MessageRateTracker::new();
        tracker.record(1, 2, WINDOW);
        assert_eq!(tracker.record(1, 3, WINDOW), 1);
        assert_eq!(tracker.record(9, 2, WINDOW), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_the_window() {
        let tracker = JoinRateTracker::new();
        tracker.record(1, WINDOW);
        tracker.record(1, WINDOW);
        tracker.reset(1);
        assert_eq!(tracker.record(1, WINDOW), 1);
    }
}
