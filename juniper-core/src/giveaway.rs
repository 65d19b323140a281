use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;
use rand::seq::IndexedRandom;

/// One running (or finished) giveaway, keyed by its announcement message.
#[derive(Clone, Debug)]
pub struct Giveaway {
    pub guild_id: u64,
    pub channel_id: u64,
    pub host_id: u64,
    pub prize: String,
    pub winner_count: u32,
    pub ends_at_unix: u64,
    entrants: HashSet<u64>,
    concluded: bool,
}

impl Giveaway {
    pub fn new(
        guild_id: u64,
        channel_id: u64,
        host_id: u64,
        prize: String,
        winner_count: u32,
        ends_at_unix: u64,
    ) -> Self {
        Self {
            guild_id,
            channel_id,
            host_id,
            prize,
            winner_count: winner_count.max(1),
            ends_at_unix,
            entrants: HashSet::new(),
            concluded: false,
        }
    }

    pub fn entrant_count(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_concluded(&self) -> bool {
        self.concluded
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConcludeOutcome {
    NotFound,
    AlreadyConcluded,
    Finished {
        channel_id: u64,
        prize: String,
        winners: Vec<u64>,
    },
}

/// Process-local giveaway state. Giveaways do not survive a restart; a
/// giveaway that outlives the process is simply lost.
#[derive(Clone, Debug, Default)]
pub struct GiveawayRegistry {
    inner: Arc<DashMap<u64, Giveaway>>,
}

impl GiveawayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, message_id: u64, giveaway: Giveaway) {
        self.inner.insert(message_id, giveaway);
    }

    pub fn get(&self, message_id: u64) -> Option<Giveaway> {
        self.inner.get(&message_id).map(|entry| entry.clone())
    }

    /// Returns false when the giveaway is unknown, finished, or the user
    /// already entered.
    pub fn add_entrant(&self, message_id: u64, user_id: u64) -> bool {
        match self.inner.get_mut(&message_id) {
            Some(mut giveaway) if !giveaway.concluded => giveaway.entrants.insert(user_id),
            _ => false,
        }
    }

    pub fn remove_entrant(&self, message_id: u64, user_id: u64) -> bool {
        match self.inner.get_mut(&message_id) {
            Some(mut giveaway) if !giveaway.concluded => giveaway.entrants.remove(&user_id),
            _ => false,
        }
    }

    /// Draw winners and mark the giveaway finished.
    ///
    /// Idempotent: the scheduled expiry timer and an early `gend` can both
    /// land here, but only the first caller draws winners. Zero entrants
    /// finishes with an empty winner list.
    pub fn conclude(&self, message_id: u64, rng: &mut impl Rng) -> ConcludeOutcome {
        let Some(mut giveaway) = self.inner.get_mut(&message_id) else {
            return ConcludeOutcome::NotFound;
        };

        if giveaway.concluded {
            return ConcludeOutcome::AlreadyConcluded;
        }

        giveaway.concluded = true;
        let winners = draw(&giveaway.entrants, giveaway.winner_count, rng);

        ConcludeOutcome::Finished {
            channel_id: giveaway.channel_id,
            prize: giveaway.prize.clone(),
            winners,
        }
    }

    /// Redraw winners from a finished giveaway's entrant pool.
    pub fn reroll(&self, message_id: u64, count: u32, rng: &mut impl Rng) -> Option<Vec<u64>> {
        let giveaway = self.inner.get(&message_id)?;
        if !giveaway.concluded {
            return None;
        }

        Some(draw(&giveaway.entrants, count.max(1), rng))
    }
}

/// Sample without replacement; fewer entrants than requested winners just
/// yields everyone.
fn draw(entrants: &HashSet<u64>, count: u32, rng: &mut impl Rng) -> Vec<u64> {
    let pool: Vec<u64> = entrants.iter().copied().collect();
    pool.choose_multiple(rng, count as usize).copied().collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn registry_with_giveaway(message_id: u64) -> GiveawayRegistry {
        let registry = GiveawayRegistry::new();
        registry.insert(
            message_id,
            Giveaway::new(10, 20, 30, "Nitro".to_owned(), 2, 1_750_000_000),
        );
        registry
    }

    #[test]
    fn conclude_with_no_entrants_reports_no_winners() {
        let registry = registry_with_giveaway(1);
        let mut rng = StdRng::seed_from_u64(7);

        match registry.conclude(1, &mut rng) {
            ConcludeOutcome::Finished { winners, prize, .. } => {
                assert!(winners.is_empty());
                assert_eq!(prize, "Nitro");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn conclude_is_idempotent() {
        let registry = registry_with_giveaway(1);
        let mut rng = StdRng::seed_from_u64(7);

        assert!(matches!(
            registry.conclude(1, &mut rng),
            ConcludeOutcome::Finished { .. }
        ));
        assert_eq!(
            registry.conclude(1, &mut rng),
            ConcludeOutcome::AlreadyConcluded
        );
        assert_eq!(registry.conclude(99, &mut rng), ConcludeOutcome::NotFound);
    }

    #[test]
    fn winners_are_unique_and_capped_by_entrants() {
        let registry = registry_with_giveaway(1);
        for user_id in [100, 101, 102] {
            assert!(registry.add_entrant(1, user_id));
        }
        assert!(!registry.add_entrant(1, 100), "double entry must be rejected");

        let mut rng = StdRng::seed_from_u64(7);
        let ConcludeOutcome::Finished { winners, .. } = registry.conclude(1, &mut rng) else {
            panic!("expected a finish");
        };

        assert_eq!(winners.len(), 2);
        let mut deduped = winners.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), winners.len());
        assert!(winners.iter().all(|winner| [100, 101, 102].contains(winner)));
    }

    #[test]
    fn entries_after_conclusion_are_rejected() {
        let registry = registry_with_giveaway(1);
        let mut rng = StdRng::seed_from_u64(7);
        registry.conclude(1, &mut rng);

        assert!(!registry.add_entrant(1, 100));
    }

    #[test]
    fn reroll_requires_a_finished_giveaway() {
        let registry = registry_with_giveaway(1);
        registry.add_entrant(1, 100);

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(registry.reroll(1, 1, &mut rng), None);

        registry.conclude(1, &mut rng);
        assert_eq!(registry.reroll(1, 1, &mut rng), Some(vec![100]));
        assert_eq!(registry.reroll(99, 1, &mut rng), None);
    }
}
