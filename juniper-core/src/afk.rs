use std::sync::Arc;

use dashmap::DashMap;

#[derive(Clone, Debug)]
pub struct AfkStatus {
    pub reason: String,
    pub since_unix: u64,
}

/// (guild, user) -> AFK marker. Cleared by the user's next message in that
/// guild; in-process only.
#[derive(Clone, Debug, Default)]
pub struct AfkRegistry {
    inner: Arc<DashMap<(u64, u64), AfkStatus>>,
}

impl AfkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, guild_id: u64, user_id: u64, reason: String, since_unix: u64) {
        self.inner
            .insert((guild_id, user_id), AfkStatus { reason, since_unix });
    }

    pub fn clear(&self, guild_id: u64, user_id: u64) -> Option<AfkStatus> {
        self.inner
            .remove(&(guild_id, user_id))
            .map(|(_, status)| status)
    }

    pub fn get(&self, guild_id: u64, user_id: u64) -> Option<AfkStatus> {
        self.inner
            .get(&(guild_id, user_id))
            .map(|entry| entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear_round_trip() {
        let registry = AfkRegistry::new();
        registry.set(1, 2, "lunch".to_owned(), 1_750_000_000);

        assert_eq!(registry.get(1, 2).map(|status| status.reason), Some("lunch".to_owned()));
        assert!(registry.get(1, 3).is_none());

        let cleared = registry.clear(1, 2).expect("status should exist");
        assert_eq!(cleared.since_unix, 1_750_000_000);
        assert!(registry.get(1, 2).is_none());
        assert!(registry.clear(1, 2).is_none());
    }
}
