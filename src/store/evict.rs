//! Eviction Module
//!
//! One randomized eviction pass, kept apart from any storage provider.
//!
//! A pass draws keys uniformly at random from a snapshot of the store. Reserved
//! and recent keys are never handed out, nor are keys the admission predicate
//! rejects. The caller deletes each key the pass hands out and reports back.

use rand::Rng;

/// Deletions after which a pass stops.
pub const MAX_EVICTIONS_PER_PASS: usize = 10;

/// Random draws a single pass may make.
pub const MAX_DRAWS_PER_PASS: usize = 20;

/// Pass-and-retry rounds around one failed write.
pub const MAX_TRIM_ATTEMPTS: usize = 10;

/// Caller-supplied filter: `false` means the key must never be evicted.
///
/// Receives the candidate key and the current recency list.
pub type Admission = dyn Fn(&str, &[String]) -> bool + Send + Sync;

// == Draw ==
/// Result of one random draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draw {
    /// Candidate may be deleted
    Evict(String),
    /// Drew the reserved recency key
    Reserved,
    /// Candidate is in the recency list
    Recent(String),
    /// Admission predicate refused the candidate
    Rejected(String),
}

// == Eviction Pass ==
/// State of one pass: the candidate pool plus deletion and draw counters.
#[derive(Debug)]
pub struct EvictionPass<'a> {
    pool: Vec<String>,
    recent: &'a [String],
    recent_key: &'a str,
    deleted: usize,
    draws: usize,
}

impl<'a> EvictionPass<'a> {
    /// Starts a pass over a snapshot of all stored keys.
    pub fn new(keys: Vec<String>, recent: &'a [String], recent_key: &'a str) -> Self {
        Self {
            pool: keys,
            recent,
            recent_key,
            deleted: 0,
            draws: 0,
        }
    }

    /// True once the deletion target, the draw budget or the pool runs out.
    pub fn is_finished(&self) -> bool {
        self.deleted >= MAX_EVICTIONS_PER_PASS
            || self.draws >= MAX_DRAWS_PER_PASS
            || self.pool.is_empty()
    }

    // == Draw ==
    /// Draws one candidate, or `None` when the pass is finished.
    ///
    /// A key handed out as `Draw::Evict` leaves the pool whether or not the
    /// caller manages to delete it.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R, admit: Option<&Admission>) -> Option<Draw> {
        if self.is_finished() {
            return None;
        }

        self.draws += 1;
        let index = rng.gen_range(0..self.pool.len());
        let candidate = self.pool[index].as_str();

        if candidate == self.recent_key {
            return Some(Draw::Reserved);
        }
        if self.recent.iter().any(|k| k == candidate) {
            return Some(Draw::Recent(candidate.to_string()));
        }
        if let Some(admit) = admit {
            if !admit(candidate, self.recent) {
                return Some(Draw::Rejected(candidate.to_string()));
            }
        }

        Some(Draw::Evict(self.pool.swap_remove(index)))
    }

    /// Records a successful deletion of a key handed out by `draw`.
    pub fn record_deletion(&mut self) {
        self.deleted += 1;
    }

    pub fn deleted(&self) -> usize {
        self.deleted
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RESERVED: &str = "__recent";

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Runs a pass to completion, deleting everything it hands out.
    fn run(pass: &mut EvictionPass<'_>, rng: &mut StdRng, admit: Option<&Admission>) -> Vec<String> {
        let mut evicted = Vec::new();
        while let Some(draw) = pass.draw(rng, admit) {
            if let Draw::Evict(key) = draw {
                pass.record_deletion();
                evicted.push(key);
            }
        }
        evicted
    }

    #[test]
    fn test_pass_empty_pool_finished() {
        let recent: Vec<String> = Vec::new();
        let mut pass = EvictionPass::new(Vec::new(), &recent, RESERVED);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(pass.is_finished());
        assert_eq!(pass.draw(&mut rng, None), None);
        assert_eq!(pass.draws(), 0);
    }

    #[test]
    fn test_pass_never_evicts_reserved_or_recent() {
        let recent = keys(&["a", "b"]);
        let mut pass = EvictionPass::new(keys(&[RESERVED, "a", "b", "c", "d"]), &recent, RESERVED);
        let mut rng = StdRng::seed_from_u64(7);

        let evicted = run(&mut pass, &mut rng, None);

        assert!(evicted.iter().all(|k| k == "c" || k == "d"));
        assert!(pass.draws() <= MAX_DRAWS_PER_PASS);
    }

    #[test]
    fn test_pass_respects_admission() {
        let recent: Vec<String> = Vec::new();
        let admit: &Admission = &|key: &str, _recent: &[String]| key != "keep";
        let mut pass = EvictionPass::new(keys(&["keep", "x", "y"]), &recent, RESERVED);
        let mut rng = StdRng::seed_from_u64(3);

        let evicted = run(&mut pass, &mut rng, Some(admit));

        assert!(!evicted.contains(&"keep".to_string()));
    }

    #[test]
    fn test_pass_stops_at_deletion_target() {
        let all: Vec<String> = (0..50).map(|i| format!("k{}", i)).collect();
        let recent: Vec<String> = Vec::new();
        let mut pass = EvictionPass::new(all, &recent, RESERVED);
        let mut rng = StdRng::seed_from_u64(11);

        let evicted = run(&mut pass, &mut rng, None);

        // Nothing is protected, so every draw evicts
        assert_eq!(evicted.len(), MAX_EVICTIONS_PER_PASS);
        assert_eq!(pass.draws(), MAX_EVICTIONS_PER_PASS);
    }

    #[test]
    fn test_pass_stops_at_draw_budget() {
        let recent = keys(&["a"]);
        let mut pass = EvictionPass::new(keys(&["a", RESERVED]), &recent, RESERVED);
        let mut rng = StdRng::seed_from_u64(5);

        let evicted = run(&mut pass, &mut rng, None);

        assert!(evicted.is_empty());
        assert_eq!(pass.draws(), MAX_DRAWS_PER_PASS);
    }

    #[test]
    fn test_pass_stops_when_pool_drained() {
        let recent: Vec<String> = Vec::new();
        let mut pass = EvictionPass::new(keys(&["x", "y", "z"]), &recent, RESERVED);
        let mut rng = StdRng::seed_from_u64(9);

        let mut evicted = run(&mut pass, &mut rng, None);
        evicted.sort();

        assert_eq!(evicted, keys(&["x", "y", "z"]));
        assert!(pass.is_finished());
    }

    #[test]
    fn test_admission_sees_recent_list() {
        let recent = keys(&["hot"]);
        let admit: &Admission = &|_key: &str, recent: &[String]| recent.is_empty();
        let mut pass = EvictionPass::new(keys(&["cold"]), &recent, RESERVED);
        let mut rng = StdRng::seed_from_u64(2);

        assert_eq!(
            pass.draw(&mut rng, Some(admit)),
            Some(Draw::Rejected("cold".to_string()))
        );
    }
}
