//! Selection strategies for the bean of the day.

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use beanhub_core::{CoffeeBean, CoreError, Result};

/// Decides which bean becomes the bean of the day.
///
/// Implementations must depend only on `candidates`, `previous` and their
/// own random state; they never touch storage. The random source is owned
/// by the implementation so tests can seed it and assert exact picks.
pub trait SelectionStrategy: Send + Sync {
    /// Picks today's bean from `candidates`, avoiding `previous` when possible.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoCandidatesAvailable`] if `candidates` is empty.
    /// - [`CoreError::NoAlternativeAvailable`] if the only candidates left
    ///   after excluding `previous` are none at all.
    fn select(&self, candidates: &[CoffeeBean], previous: Option<&CoffeeBean>)
    -> Result<CoffeeBean>;
}

/// Type alias for a shareable selection strategy.
pub type DynSelectionStrategy = std::sync::Arc<dyn SelectionStrategy>;

/// Uniform random selection that never repeats the previous day's pick.
///
/// Every eligible candidate has equal probability. The RNG sits behind a
/// mutex so a shared strategy can be called from concurrent requests.
#[derive(Debug)]
pub struct RandomSelectionStrategy {
    rng: Mutex<StdRng>,
}

impl RandomSelectionStrategy {
    /// Creates a strategy seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a strategy with a fixed seed, for deterministic tests.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomSelectionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStrategy for RandomSelectionStrategy {
    fn select(
        &self,
        candidates: &[CoffeeBean],
        previous: Option<&CoffeeBean>,
    ) -> Result<CoffeeBean> {
        if candidates.is_empty() {
            return Err(CoreError::NoCandidatesAvailable);
        }

        let previous_id = previous.map(|p| p.id);
        let eligible: Vec<&CoffeeBean> = candidates
            .iter()
            .filter(|c| Some(c.id) != previous_id)
            .collect();

        if eligible.is_empty() {
            return Err(CoreError::NoAlternativeAvailable);
        }

        let mut rng = self.rng.lock();
        let chosen = eligible
            .choose(&mut *rng)
            .ok_or_else(|| CoreError::internal("eligible candidate set drained unexpectedly"))?;

        Ok((*chosen).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn bean(id: i64, name: &str) -> CoffeeBean {
        CoffeeBean::new(
            id,
            name,
            "dark roast",
            "Colombia",
            BigDecimal::from_str("17.50").unwrap(),
            "https://example.com/bean.png",
        )
    }

    // Compile-time check that the trait stays object safe.
    fn _assert_strategy_object_safe(_: &dyn SelectionStrategy) {}

    #[test]
    fn test_empty_candidates_fails() {
        let strategy = RandomSelectionStrategy::with_seed(1);
        let err = strategy.select(&[], None).unwrap_err();
        assert!(matches!(err, CoreError::NoCandidatesAvailable));
        assert_eq!(err.to_string(), "No coffee beans available to select from.");
    }

    #[test]
    fn test_sole_candidate_equal_to_previous_fails() {
        let strategy = RandomSelectionStrategy::with_seed(1);
        let only = bean(1, "Futuris");
        let err = strategy.select(&[only.clone()], Some(&only)).unwrap_err();
        assert!(matches!(err, CoreError::NoAlternativeAvailable));
        assert_eq!(
            err.to_string(),
            "No alternative coffee beans available to avoid repetition."
        );
    }

    #[test]
    fn test_previous_is_never_repeated() {
        let strategy = RandomSelectionStrategy::with_seed(7);
        let candidates = vec![bean(1, "Futuris"), bean(2, "Zanity"), bean(3, "Klugit")];
        let previous = candidates[0].clone();

        for _ in 0..50 {
            let pick = strategy.select(&candidates, Some(&previous)).unwrap();
            assert_ne!(pick.id, previous.id);
            assert!(pick.id == 2 || pick.id == 3);
        }
    }

    #[test]
    fn test_no_previous_makes_everything_eligible() {
        let strategy = RandomSelectionStrategy::with_seed(7);
        let candidates = vec![bean(1, "Futuris"), bean(2, "Zanity"), bean(3, "Klugit")];

        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(strategy.select(&candidates, None).unwrap().id);
        }
        // Over 100 seeded draws every candidate should come up.
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_single_candidate_without_previous_is_chosen() {
        let strategy = RandomSelectionStrategy::with_seed(1);
        let only = bean(5, "Solo");
        let pick = strategy.select(std::slice::from_ref(&only), None).unwrap();
        assert_eq!(pick.id, 5);
    }

    #[test]
    fn test_previous_outside_candidates_excludes_nothing() {
        let strategy = RandomSelectionStrategy::with_seed(3);
        let candidates = vec![bean(1, "Futuris"), bean(2, "Zanity")];
        let gone = bean(99, "Retired");

        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            seen.insert(strategy.select(&candidates, Some(&gone)).unwrap().id);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_same_seed_gives_same_sequence() {
        let candidates = vec![bean(1, "Futuris"), bean(2, "Zanity"), bean(3, "Klugit")];

        let a = RandomSelectionStrategy::with_seed(42);
        let b = RandomSelectionStrategy::with_seed(42);

        for _ in 0..20 {
            let pick_a = a.select(&candidates, None).unwrap();
            let pick_b = b.select(&candidates, None).unwrap();
            assert_eq!(pick_a.id, pick_b.id);
        }
    }
}
