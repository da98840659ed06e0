//! Mating-pair selection strategies.
//!
//! A strategy turns the current state into a list of parent pairs. Each
//! pair produces two offspring, so a strategy that yields `N / 2` pairs
//! keeps the population at size `N`. An odd individual left over when
//! pairing is dropped.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1 (roulette wheel)
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::{EngineState, Gene, Individual, Score};
use crate::error::{GaError, Result};
use crate::random::shuffle;
use rand::{Rng, RngCore};

/// Two parents chosen to mate.
pub type Pair<G> = (Individual<G>, Individual<G>);

/// A pluggable selection strategy.
///
/// Implement this to replace the built-in [`Selection`] strategies.
pub trait SelectionMethod<G: Gene>: Send + Sync {
    /// Chooses mating pairs from `state`.
    fn select(&self, state: &EngineState<G>, rng: &mut dyn RngCore) -> Result<Vec<Pair<G>>>;
}

/// Built-in selection strategies.
///
/// # Examples
///
/// ```
/// use u_evolve::ga::Selection;
///
/// // Pair the two best, then the next two, and so on.
/// let sel = Selection::ElitistPairing;
///
/// // Fitness-proportional draws with replacement.
/// let sel = Selection::Proportional;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Shuffle the population uniformly, then pair neighbours.
    RandomPairing,

    /// Sort the population best-first, then pair neighbours.
    ///
    /// Strong selection pressure: the best individuals only ever mate with
    /// each other.
    ElitistPairing,

    /// Roulette wheel: `N` independent draws, each individual weighted by
    /// its score, paired in draw order.
    ///
    /// Scores must be non-negative with a positive sum. Under ranked
    /// fitness the weights are the ranks, so the worst individual (rank 0)
    /// is never drawn.
    ///
    /// # Complexity
    /// O(k) per draw for `k` distinct individuals
    Proportional,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::ElitistPairing
    }
}

impl<G: Gene> SelectionMethod<G> for Selection {
    fn select(&self, state: &EngineState<G>, rng: &mut dyn RngCore) -> Result<Vec<Pair<G>>> {
        match self {
            Selection::RandomPairing => Ok(random_pairing(state, rng)),
            Selection::ElitistPairing => Ok(elitist_pairing(state)),
            Selection::Proportional => proportional(state, rng),
        }
    }
}

/// Pairs consecutive individuals, dropping an odd one out.
fn into_pairs<G: Gene>(individuals: Vec<Individual<G>>) -> Vec<Pair<G>> {
    let mut pairs = Vec::with_capacity(individuals.len() / 2);
    let mut iter = individuals.into_iter();
    while let (Some(a), Some(b)) = (iter.next(), iter.next()) {
        pairs.push((a, b));
    }
    pairs
}

fn random_pairing<G: Gene>(state: &EngineState<G>, rng: &mut dyn RngCore) -> Vec<Pair<G>> {
    let mut individuals = state.population.clone();
    shuffle(&mut individuals, rng);
    into_pairs(individuals)
}

fn elitist_pairing<G: Gene>(state: &EngineState<G>) -> Vec<Pair<G>> {
    let score = |ind: &Individual<G>| state.score_of(ind).unwrap_or(Score::Raw(f64::NEG_INFINITY));

    let mut individuals = state.population.clone();
    individuals.sort_by(|a, b| score(b).total_cmp(&score(a)));
    into_pairs(individuals)
}

fn proportional<G: Gene>(state: &EngineState<G>, rng: &mut dyn RngCore) -> Result<Vec<Pair<G>>> {
    let entries: Vec<(&Individual<G>, f64)> = state
        .fitness
        .iter()
        .map(|(ind, score)| (ind, score.value()))
        .collect();

    if let Some(&(_, bad)) = entries.iter().find(|(_, s)| !s.is_finite() || *s < 0.0) {
        return Err(GaError::InvalidFitness {
            reason: format!("score {bad} is negative or not finite"),
        });
    }

    let total: f64 = entries.iter().map(|(_, s)| s).sum();
    if !total.is_finite() {
        return Err(GaError::InvalidFitness {
            reason: format!("total fitness {total} is not finite"),
        });
    }
    if total <= 0.0 {
        return Err(GaError::InvalidFitness {
            reason: format!("total fitness {total} is not positive"),
        });
    }

    let draws = state.population.len();
    let mut order: Vec<usize> = (0..entries.len()).collect();
    let mut drawn = Vec::with_capacity(draws);
    for _ in 0..draws {
        let threshold = rng.random_range(0.0..total);
        shuffle(&mut order, &mut *rng);
        drawn.push(spin(&entries, &order, threshold).clone());
    }

    Ok(into_pairs(drawn))
}

/// One roulette spin: scan entries in `order`, return the first whose
/// slice `[p, p + score]` contains `threshold`.
///
/// Floating-point accumulation can leave `threshold` just past the final
/// slice; the last-scanned entry is returned then.
fn spin<'a, G: Gene>(
    entries: &[(&'a Individual<G>, f64)],
    order: &[usize],
    threshold: f64,
) -> &'a Individual<G> {
    let mut cumulative = 0.0;
    for &idx in order {
        let (ind, score) = entries[idx];
        if cumulative <= threshold && threshold <= cumulative + score {
            return ind;
        }
        cumulative += score;
    }

    let last = *order.last().expect("proportional selection has a positive total");
    entries[last].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::types::{FitnessMap, Score};
    use crate::random::create_rng;
    use std::collections::HashMap;

    fn state_with(scores: &[(&str, f64)]) -> EngineState<char> {
        let population: Vec<_> = scores.iter().map(|(s, _)| Individual::from(*s)).collect();
        let fitness: FitnessMap<char> = scores
            .iter()
            .map(|(s, f)| (Individual::from(*s), Score::Raw(*f)))
            .collect();
        EngineState::new(population, fitness, 0)
    }

    fn scenario() -> EngineState<char> {
        state_with(&[("1100", 4.0), ("1010", 3.0), ("0011", 2.0), ("0000", 1.0)])
    }

    #[test]
    fn test_elitist_pairs_best_together() {
        let mut state = scenario();
        state.population.reverse();
        let mut rng = create_rng(42);

        let pairs = Selection::ElitistPairing.select(&state, &mut rng).unwrap();
        assert_eq!(
            pairs,
            vec![
                (Individual::from("1100"), Individual::from("1010")),
                (Individual::from("0011"), Individual::from("0000")),
            ]
        );
    }

    #[test]
    fn test_random_pairing_uses_whole_population() {
        let state = scenario();
        let mut rng = create_rng(7);

        let pairs = Selection::RandomPairing.select(&state, &mut rng).unwrap();
        assert_eq!(pairs.len(), 2);

        let mut seen: Vec<_> = pairs.into_iter().flat_map(|(a, b)| [a, b]).collect();
        let mut expected = state.population.clone();
        seen.sort_by(|a, b| a.genes().cmp(b.genes()));
        expected.sort_by(|a, b| a.genes().cmp(b.genes()));
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_odd_individual_dropped() {
        let state = state_with(&[("11", 3.0), ("10", 2.0), ("01", 1.0)]);
        let mut rng = create_rng(1);

        assert_eq!(Selection::RandomPairing.select(&state, &mut rng).unwrap().len(), 1);
        assert_eq!(Selection::ElitistPairing.select(&state, &mut rng).unwrap().len(), 1);
        assert_eq!(Selection::Proportional.select(&state, &mut rng).unwrap().len(), 1);
    }

    #[test]
    fn test_proportional_draws_population_size() {
        let state = scenario();
        let mut rng = create_rng(3);
        let pairs = Selection::Proportional.select(&state, &mut rng).unwrap();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_proportional_favors_higher_scores() {
        let state = state_with(&[("11", 90.0), ("10", 9.0), ("01", 1.0), ("00", 0.0)]);
        let mut rng = create_rng(42);

        let mut counts: HashMap<Individual<char>, usize> = HashMap::new();
        for _ in 0..2000 {
            for (a, b) in Selection::Proportional.select(&state, &mut rng).unwrap() {
                *counts.entry(a).or_default() += 1;
                *counts.entry(b).or_default() += 1;
            }
        }

        let best = counts.get(&Individual::from("11")).copied().unwrap_or(0);
        let mid = counts.get(&Individual::from("10")).copied().unwrap_or(0);
        let low = counts.get(&Individual::from("01")).copied().unwrap_or(0);
        assert!(best > mid && mid > low, "counts: {counts:?}");
        assert!(
            best as f64 / 8000.0 > 0.85,
            "expected ~90% share for the best, got {best}/8000"
        );
    }

    #[test]
    fn test_proportional_rejects_zero_total() {
        let state = state_with(&[("11", 0.0), ("00", 0.0)]);
        let mut rng = create_rng(42);
        assert!(matches!(
            Selection::Proportional.select(&state, &mut rng),
            Err(GaError::InvalidFitness { .. })
        ));
    }

    #[test]
    fn test_proportional_rejects_negative_scores() {
        let state = state_with(&[("11", 5.0), ("00", -1.0)]);
        let mut rng = create_rng(42);
        assert!(matches!(
            Selection::Proportional.select(&state, &mut rng),
            Err(GaError::InvalidFitness { .. })
        ));
    }

    #[test]
    fn test_proportional_rejects_overflowing_total() {
        let state = state_with(&[("11", f64::MAX), ("00", f64::MAX)]);
        let mut rng = create_rng(42);
        assert!(matches!(
            Selection::Proportional.select(&state, &mut rng),
            Err(GaError::InvalidFitness { .. })
        ));
    }

    #[test]
    fn test_elitist_pairing_tolerates_nan() {
        let state = state_with(&[("11", f64::NAN), ("10", 1.0), ("01", 3.0), ("00", f64::NAN)]);
        let mut rng = create_rng(0);
        let pairs = Selection::ElitistPairing.select(&state, &mut rng).unwrap();
        assert_eq!(pairs[0], (Individual::from("01"), Individual::from("10")));
    }

    #[test]
    fn test_spin_falls_back_to_last_scanned() {
        let a = Individual::from("1");
        let b = Individual::from("0");
        let entries = vec![(&a, 1.0), (&b, 1.0)];
        // Past the end of the wheel.
        assert_eq!(spin(&entries, &[1, 0], 2.5), &a);
        assert_eq!(spin(&entries, &[0, 1], 0.5), &a);
        assert_eq!(spin(&entries, &[0, 1], 1.5), &b);
    }

    struct FirstTwice;

    impl SelectionMethod<char> for FirstTwice {
        fn select(&self, state: &EngineState<char>, _rng: &mut dyn RngCore) -> Result<Vec<Pair<char>>> {
            let first = state.population[0].clone();
            Ok(vec![(first.clone(), first)])
        }
    }

    #[test]
    fn test_custom_strategy_through_trait_object() {
        let strategy: Box<dyn SelectionMethod<char>> = Box::new(FirstTwice);
        let mut rng = create_rng(0);
        let pairs = strategy.select(&scenario(), &mut rng).unwrap();
        assert_eq!(pairs, vec![(Individual::from("1100"), Individual::from("1100"))]);
    }
}
