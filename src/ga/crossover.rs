//! Generic crossover operators.
//!
//! All operators take two parents of equal length `L` and produce two
//! children of length `L`. They work on any gene type.
//!
//! - [`Crossover::SinglePoint`]: one cut, swap tails
//! - [`Crossover::MultiPoint`]: `n` cuts, alternate segments
//! - [`Crossover::Uniform`]: independent coin flip per position

use super::types::{Gene, Individual};
use crate::error::{GaError, Result};
use rand::{Rng, RngCore};

/// A pluggable crossover operator.
///
/// Implement this for problem-specific recombination.
pub trait CrossoverOperator<G: Gene>: Send + Sync {
    /// Combines two parents into two children.
    fn crossover(
        &self,
        parent1: &Individual<G>,
        parent2: &Individual<G>,
        rng: &mut dyn RngCore,
    ) -> Result<(Individual<G>, Individual<G>)>;
}

/// Built-in crossover operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossover {
    /// Cut at one uniformly drawn index and exchange the tails.
    SinglePoint,

    /// Cut at `n` points and alternate the segments between children.
    ///
    /// Requires `n < L`. `MultiPoint(0)` returns the parents unchanged.
    MultiPoint(usize),

    /// Each position independently goes to either child with probability
    /// 1/2; the other child takes the other parent's gene.
    Uniform,
}

impl Default for Crossover {
    fn default() -> Self {
        Crossover::SinglePoint
    }
}

impl<G: Gene> CrossoverOperator<G> for Crossover {
    fn crossover(
        &self,
        parent1: &Individual<G>,
        parent2: &Individual<G>,
        rng: &mut dyn RngCore,
    ) -> Result<(Individual<G>, Individual<G>)> {
        check_lengths(parent1, parent2)?;
        match *self {
            Crossover::SinglePoint => Ok(single_point(parent1, parent2, rng)),
            Crossover::MultiPoint(n) => multi_point(parent1, parent2, n, rng),
            Crossover::Uniform => Ok(uniform(parent1, parent2, rng)),
        }
    }
}

fn check_lengths<G: Gene>(parent1: &Individual<G>, parent2: &Individual<G>) -> Result<()> {
    if parent1.len() != parent2.len() {
        return Err(GaError::InvalidCrossoverConfig(format!(
            "parents differ in length: {} vs {}",
            parent1.len(),
            parent2.len()
        )));
    }
    Ok(())
}

/// Single-point crossover at a uniformly drawn cut in `[0, L)`.
fn single_point<G: Gene>(
    parent1: &Individual<G>,
    parent2: &Individual<G>,
    rng: &mut dyn RngCore,
) -> (Individual<G>, Individual<G>) {
    if parent1.is_empty() {
        return (parent1.clone(), parent2.clone());
    }
    let cut = rng.random_range(0..parent1.len());
    single_point_at(parent1, parent2, cut)
}

/// Single-point crossover at a fixed cut.
///
/// Returns `(p1[..cut] ++ p2[cut..], p2[..cut] ++ p1[cut..])`. Applying the
/// same cut to the two children gives back the parents.
///
/// # Panics
/// Panics if `cut` exceeds either parent's length.
pub fn single_point_at<G: Gene>(
    parent1: &Individual<G>,
    parent2: &Individual<G>,
    cut: usize,
) -> (Individual<G>, Individual<G>) {
    let (a, b) = (parent1.genes(), parent2.genes());
    let child1 = a[..cut].iter().chain(&b[cut..]).cloned().collect();
    let child2 = b[..cut].iter().chain(&a[cut..]).cloned().collect();
    (child1, child2)
}

/// Multi-point crossover with `points` cuts.
///
/// Each round draws a cut inside the current suffixes, leaving room for the
/// cuts still to come, emits the prefixes, and swaps which parent feeds
/// which child for the remaining suffixes.
fn multi_point<G: Gene>(
    parent1: &Individual<G>,
    parent2: &Individual<G>,
    points: usize,
    rng: &mut dyn RngCore,
) -> Result<(Individual<G>, Individual<G>)> {
    if points == 0 {
        return Ok((parent1.clone(), parent2.clone()));
    }
    let len = parent1.len();
    if points >= len {
        return Err(GaError::InvalidCrossoverConfig(format!(
            "{points} cut points do not fit in individuals of length {len}"
        )));
    }

    let mut child1 = Vec::with_capacity(len);
    let mut child2 = Vec::with_capacity(len);
    let (mut current, mut other) = (parent1.genes(), parent2.genes());

    for remaining in (1..=points).rev() {
        // remaining - 1 cuts still have to fit after this one
        let cut = rng.random_range(0..current.len() - (remaining - 1));
        child1.extend_from_slice(&current[..cut]);
        child2.extend_from_slice(&other[..cut]);
        (current, other) = (&other[cut..], &current[cut..]);
    }
    child1.extend_from_slice(current);
    child2.extend_from_slice(other);

    Ok((Individual::new(child1), Individual::new(child2)))
}

/// Uniform crossover: a fair coin decides, per position, which parent
/// feeds the first child.
fn uniform<G: Gene>(
    parent1: &Individual<G>,
    parent2: &Individual<G>,
    rng: &mut dyn RngCore,
) -> (Individual<G>, Individual<G>) {
    let len = parent1.len();
    let mut child1 = Vec::with_capacity(len);
    let mut child2 = Vec::with_capacity(len);

    for (a, b) in parent1.genes().iter().zip(parent2.genes()) {
        if rng.random_bool(0.5) {
            child1.push(a.clone());
            child2.push(b.clone());
        } else {
            child1.push(b.clone());
            child2.push(a.clone());
        }
    }

    (Individual::new(child1), Individual::new(child2))
}
