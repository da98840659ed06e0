//! Core data types of the engine.
//!
//! The engine is generic over the gene type. An [`Individual`] is a plain
//! value: two individuals with the same genes are the same key in a
//! [`FitnessMap`], so duplicates in a population collapse to one entry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

/// Marker trait for gene values.
///
/// Genes are opaque to the engine; they only need value equality and
/// hashing (individuals key the fitness map) and must be shareable with the
/// evaluation thread pool.
pub trait Gene: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Gene for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// A candidate solution: a fixed-length ordered sequence of genes.
///
/// Individuals are immutable; operators build new individuals instead of
/// editing existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Individual<G> {
    genes: Vec<G>,
}

impl<G> Individual<G> {
    /// Wraps a gene sequence.
    pub fn new(genes: Vec<G>) -> Self {
        Self { genes }
    }

    /// The gene sequence.
    pub fn genes(&self) -> &[G] {
        &self.genes
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if the individual has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Consumes the individual, returning its genes.
    pub fn into_genes(self) -> Vec<G> {
        self.genes
    }
}

impl<G: Clone> Individual<G> {
    /// Returns a copy with the gene at `index` replaced.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn with_gene(&self, index: usize, gene: G) -> Self {
        let mut genes = self.genes.clone();
        genes[index] = gene;
        Self { genes }
    }
}

impl<G> From<Vec<G>> for Individual<G> {
    fn from(genes: Vec<G>) -> Self {
        Self::new(genes)
    }
}

impl<G> FromIterator<G> for Individual<G> {
    fn from_iter<T: IntoIterator<Item = G>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<G> AsRef<[G]> for Individual<G> {
    fn as_ref(&self) -> &[G] {
        &self.genes
    }
}

/// Bit-string style individuals written as text, e.g. `"1100"`.
impl From<&str> for Individual<char> {
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

/// A fitness value: either the raw fitness or a rank.
///
/// Higher is better for both. Ranks run from 0 (worst) to `k - 1` (best)
/// where `k` is the number of distinct individuals.
///
/// Equality and ordering both go through [`Score::value`], so
/// `Score::Raw(2.0) == Score::Rank(2)`; use [`Score::is_rank`] to tell the
/// variants apart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Score {
    Raw(f64),
    Rank(usize),
}

impl Score {
    /// Numeric value of the score, used for comparison and proportional
    /// selection.
    pub fn value(self) -> f64 {
        match self {
            Score::Raw(v) => v,
            Score::Rank(r) => r as f64,
        }
    }

    /// Returns `true` for [`Score::Rank`].
    pub fn is_rank(self) -> bool {
        matches!(self, Score::Rank(_))
    }

    /// Total order on [`Score::value`] used for sorting. NaN compares
    /// below every number and equal to itself.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.value(), other.value());
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => a.total_cmp(&b),
        }
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value().partial_cmp(&other.value())
    }
}

/// Individual → score, in insertion order.
///
/// Insertion order is the population order of each individual's first
/// occurrence.
pub type FitnessMap<G> = IndexMap<Individual<G>, Score>;

/// The evolving part of the engine.
///
/// A generation transition never edits a state; it builds the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState<G: Gene> {
    /// Current population, exactly `N` individuals unless the selection
    /// strategy under-produced offspring.
    pub population: Vec<Individual<G>>,

    /// Score of every distinct individual in `population`.
    pub fitness: FitnessMap<G>,

    /// Number of generation transitions applied since initialization.
    pub generation: u64,
}

impl<G: Gene> EngineState<G> {
    /// Assembles a state from its parts.
    pub fn new(population: Vec<Individual<G>>, fitness: FitnessMap<G>, generation: u64) -> Self {
        Self {
            population,
            fitness,
            generation,
        }
    }

    /// Score recorded for `individual`, if it is in the fitness map.
    pub fn score_of(&self, individual: &Individual<G>) -> Option<Score> {
        self.fitness.get(individual).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_individual_value_equality() {
        let a = Individual::from("1100");
        let b: Individual<char> = vec!['1', '1', '0', '0'].into();
        assert_eq!(a, b);

        let set: HashSet<Individual<char>> = [a.clone(), b].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_with_gene_leaves_original() {
        let a = Individual::from("0000");
        let b = a.with_gene(2, '1');
        assert_eq!(a, Individual::from("0000"));
        assert_eq!(b, Individual::from("0010"));
    }

    #[test]
    fn test_score_ordering() {
        assert!(Score::Raw(2.5) > Score::Raw(1.0));
        assert!(Score::Rank(3) > Score::Rank(0));
        assert_eq!(Score::Rank(2).value(), 2.0);
        assert!(Score::Rank(1).is_rank());
        assert!(!Score::Raw(1.0).is_rank());
    }

    #[test]
    fn test_score_equality_agrees_with_ordering() {
        assert_eq!(Score::Raw(2.0), Score::Rank(2));
        assert_eq!(Score::Raw(2.0).partial_cmp(&Score::Rank(2)), Some(Ordering::Equal));
        assert_ne!(Score::Raw(2.5), Score::Rank(2));
    }

    #[test]
    fn test_total_cmp_puts_nan_last() {
        let nan = Score::Raw(f64::NAN);
        assert_eq!(nan.total_cmp(&Score::Raw(f64::NEG_INFINITY)), Ordering::Less);
        assert_eq!(Score::Rank(0).total_cmp(&nan), Ordering::Greater);
        assert_eq!(nan.total_cmp(&nan), Ordering::Equal);
        assert_eq!(Score::Raw(1.0).total_cmp(&Score::Rank(3)), Ordering::Less);
    }

    #[test]
    fn test_individual_serializes_as_sequence() {
        let ind = Individual::new(vec![1u8, 0, 1]);
        let json = serde_json::to_string(&ind).unwrap();
        assert_eq!(json, "[1,0,1]");
        let back: Individual<u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ind);
    }
}
