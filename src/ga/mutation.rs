//! Mutation operators.
//!
//! The engine never looks inside genes: a caller-supplied gene mutator
//! turns one gene into another, and [`gene_mutate`] decides where to apply
//! it.

use super::types::{Gene, Individual};
use rand::{Rng, RngCore};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied gene mutator.
pub type GeneMutator<G> = dyn Fn(&G, &mut dyn RngCore) -> G + Send + Sync;

/// A pluggable mutation operator.
pub trait MutationOperator<G: Gene>: Send + Sync {
    /// Returns a perturbed copy of `individual`.
    fn mutate(&self, individual: &Individual<G>, rng: &mut dyn RngCore) -> Individual<G>;
}

/// Replaces one uniformly chosen gene with `gene_mutator(old_gene)`.
///
/// All other genes are untouched. An empty individual is returned as is.
pub fn gene_mutate<G, F>(gene_mutator: &F, individual: &Individual<G>, rng: &mut dyn RngCore) -> Individual<G>
where
    G: Gene,
    F: Fn(&G, &mut dyn RngCore) -> G + ?Sized,
{
    if individual.is_empty() {
        return individual.clone();
    }
    let idx = rng.random_range(0..individual.len());
    let gene = gene_mutator(&individual.genes()[idx], rng);
    individual.with_gene(idx, gene)
}

/// Applies `mutator` with probability `rate`, otherwise returns a copy of
/// `individual`.
///
/// `rate <= 0` never mutates and `rate >= 1` always does; neither consumes
/// a draw for the coin flip.
pub fn mutate_with_rate<G, M>(
    rate: f64,
    mutator: &M,
    individual: &Individual<G>,
    rng: &mut dyn RngCore,
) -> Individual<G>
where
    G: Gene,
    M: MutationOperator<G> + ?Sized,
{
    let apply = if rate >= 1.0 {
        true
    } else if rate > 0.0 {
        rng.random_bool(rate)
    } else {
        false
    };

    if apply {
        mutator.mutate(individual, rng)
    } else {
        individual.clone()
    }
}

/// Single-gene mutation driven by a gene mutator.
///
/// ```
/// use u_evolve::ga::{GeneMutation, Individual, MutationOperator};
/// use u_evolve::random::create_rng;
///
/// let flip = GeneMutation::new(|bit: &bool, _rng: &mut dyn rand::RngCore| !bit);
/// let mut rng = create_rng(42);
/// let child = flip.mutate(&Individual::new(vec![false; 8]), &mut rng);
/// assert_eq!(child.genes().iter().filter(|&&b| b).count(), 1);
/// ```
pub struct GeneMutation<G> {
    gene_mutator: Arc<GeneMutator<G>>,
}

impl<G: Gene> GeneMutation<G> {
    /// Wraps a gene mutator.
    pub fn new<F>(gene_mutator: F) -> Self
    where
        F: Fn(&G, &mut dyn RngCore) -> G + Send + Sync + 'static,
    {
        Self {
            gene_mutator: Arc::new(gene_mutator),
        }
    }
}

impl<G> Clone for GeneMutation<G> {
    fn clone(&self) -> Self {
        Self {
            gene_mutator: Arc::clone(&self.gene_mutator),
        }
    }
}

impl<G> fmt::Debug for GeneMutation<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneMutation").finish_non_exhaustive()
    }
}

impl<G: Gene> MutationOperator<G> for GeneMutation<G> {
    fn mutate(&self, individual: &Individual<G>, rng: &mut dyn RngCore) -> Individual<G> {
        gene_mutate(self.gene_mutator.as_ref(), individual, rng)
    }
}
