//! Outcome space over homogeneous feature domains.
//!
//! A [`Domain`] is the set of all outcomes for `n` features, each taking values
//! in `0..d`. Besides membership and size, it provides:
//!
//! - restartable enumeration of all outcomes in mixed-radix counting order
//!   (feature `0` varies fastest),
//! - enumeration of every unordered pair of distinct outcomes,
//! - uniform sampling of single outcomes and of outcome pairs at an exact
//!   Hamming distance, as used for dominance-testing experiments.
//!
//! # Example
//!
//! ```
//! use gencpnet::domain::Domain;
//!
//! let domain = Domain::new(2, 2);
//! let all: Vec<_> = domain.each_alternative(None).map(|o| o.values().to_vec()).collect();
//! assert_eq!(all, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
//! assert_eq!(domain.each_pair().count(), 6);
//! ```

use num_bigint::BigUint;
use rand::Rng;

use crate::error::{config_error, Result};
use crate::outcome::Outcome;
use crate::utils::random_k_subset;

/// The set of all outcomes over `features` features of size `domain_size` each.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Domain {
    features: usize,
    domain_size: usize,
}

impl Domain {
    /// Creates a new domain.
    ///
    /// # Panics
    ///
    /// Panics if `domain_size == 0`.
    pub fn new(features: usize, domain_size: usize) -> Self {
        assert_ne!(domain_size, 0, "Domain size must be >= 1");
        Domain { features, domain_size }
    }

    /// Number of features.
    pub fn features(&self) -> usize {
        self.features
    }

    /// Number of values of every feature.
    pub fn domain_size(&self) -> usize {
        self.domain_size
    }

    /// Total number of outcomes, `d^n`.
    pub fn size(&self) -> BigUint {
        BigUint::from(self.domain_size).pow(self.features as u32)
    }

    /// The values of a single feature, in increasing order.
    pub fn feature_values(&self) -> Vec<usize> {
        (0..self.domain_size).collect()
    }

    /// Checks whether the outcome has the right length and only in-range values.
    pub fn is_member(&self, outcome: &Outcome) -> bool {
        outcome.len() == self.features && outcome.values().iter().all(|&v| v < self.domain_size)
    }

    /// Returns an iterator over all outcomes in mixed-radix counting order.
    ///
    /// With `start = Some(o)` for a member `o`, enumeration begins strictly after `o`.
    /// A `start` that is not a member of the domain is ignored.
    pub fn each_alternative(&self, start: Option<&Outcome>) -> Alternatives {
        let next = match start {
            Some(o) if self.is_member(o) => successor(o.values(), self.domain_size),
            _ => Some(vec![0; self.features]),
        };
        Alternatives {
            domain: *self,
            next,
        }
    }

    /// Returns an iterator over every unordered pair of distinct outcomes, each exactly once.
    pub fn each_pair(&self) -> Pairs {
        Pairs {
            domain: *self,
            outer: self.each_alternative(None),
            current: None,
            inner: None,
        }
    }

    /// Draws one outcome uniformly at random.
    pub fn random_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> Outcome {
        let values: Vec<usize> = (0..self.features).map(|_| rng.gen_range(0..self.domain_size)).collect();
        Outcome::from(values)
    }

    /// Draws a random pair of outcomes at the given Hamming distance.
    ///
    /// The first outcome is uniform. For `hamming_distance > 0` the second one is
    /// derived from it by choosing exactly that many features with
    /// [`random_k_subset`] and moving each to a uniformly chosen different value.
    /// For `hamming_distance == 0` the second outcome is uniform among those
    /// distinct from the first.
    pub fn generate_pair<R: Rng + ?Sized>(&self, rng: &mut R, hamming_distance: usize) -> Result<(Outcome, Outcome)> {
        if hamming_distance > self.features {
            return Err(config_error(format!(
                "Hamming distance {} exceeds the number of features {}",
                hamming_distance, self.features
            )));
        }
        if self.size() < BigUint::from(2u32) {
            return Err(config_error("domain has fewer than two outcomes, cannot build a pair"));
        }

        let first = self.random_outcome(rng);

        if hamming_distance == 0 {
            loop {
                let second = self.random_outcome(rng);
                if second != first {
                    return Ok((first, second));
                }
            }
        }

        let mut values = first.values().to_vec();
        for feature in random_k_subset(rng, self.features, hamming_distance) {
            // Uniform over the d - 1 values different from the current one.
            let mut v = rng.gen_range(0..self.domain_size - 1);
            if v >= values[feature] {
                v += 1;
            }
            values[feature] = v;
        }
        Ok((first, Outcome::from(values)))
    }
}

/// Mixed-radix increment with feature `0` as the least significant digit.
fn successor(values: &[usize], domain_size: usize) -> Option<Vec<usize>> {
    let mut next = values.to_vec();
    for digit in next.iter_mut() {
        *digit += 1;
        if *digit < domain_size {
            return Some(next);
        }
        *digit = 0;
    }
    None
}

/// Iterator over the outcomes of a [`Domain`].
///
/// Created by [`Domain::each_alternative()`].
#[derive(Debug, Clone)]
pub struct Alternatives {
    domain: Domain,
    next: Option<Vec<usize>>,
}

impl Iterator for Alternatives {
    type Item = Outcome;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = successor(&current, self.domain.domain_size);
        Some(Outcome::from(current))
    }
}

/// Iterator over unordered pairs of distinct outcomes of a [`Domain`].
///
/// Created by [`Domain::each_pair()`]. The first component runs over all
/// outcomes; the second over all outcomes strictly after it.
#[derive(Debug, Clone)]
pub struct Pairs {
    domain: Domain,
    outer: Alternatives,
    current: Option<Outcome>,
    inner: Option<Alternatives>,
}

impl Iterator for Pairs {
    type Item = (Outcome, Outcome);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let (Some(first), Some(inner)) = (&self.current, self.inner.as_mut()) {
                if let Some(second) = inner.next() {
                    return Some((first.clone(), second));
                }
            }
            let first = self.outer.next()?;
            self.inner = Some(self.domain.each_alternative(Some(&first)));
            self.current = Some(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use test_log::test;

    use super::*;

    #[test]
    fn test_domain_size() {
        assert_eq!(Domain::new(3, 2).size(), BigUint::from(8u32));
        assert_eq!(Domain::new(0, 5).size(), BigUint::from(1u32));
        assert_eq!(Domain::new(4, 3).size(), BigUint::from(81u32));
        assert_eq!(Domain::new(100, 2).size(), BigUint::from(1u32) << 100);
    }

    #[test]
    #[should_panic(expected = "Domain size must be >= 1")]
    fn test_domain_zero_panics() {
        Domain::new(3, 0);
    }

    #[test]
    fn test_is_member() {
        let domain = Domain::new(3, 2);
        assert!(domain.is_member(&Outcome::from([0, 1, 1])));
        assert!(!domain.is_member(&Outcome::from([0, 2, 1])));
        assert!(!domain.is_member(&Outcome::from([0, 1])));
    }

    #[test]
    fn test_each_alternative_complete() {
        for (n, d) in [(0, 3), (1, 4), (3, 2), (2, 3), (4, 3)] {
            let domain = Domain::new(n, d);
            let all: Vec<Outcome> = domain.each_alternative(None).collect();
            assert_eq!(BigUint::from(all.len()), domain.size());
            assert!(all.iter().all(|o| domain.is_member(o)));
            let unique: HashSet<_> = all.iter().cloned().collect();
            assert_eq!(unique.len(), all.len());
        }
    }

    #[test]
    fn test_each_alternative_order() {
        let domain = Domain::new(2, 3);
        let all: Vec<Vec<usize>> = domain.each_alternative(None).map(Vec::from).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 0],
                vec![1, 0],
                vec![2, 0],
                vec![0, 1],
                vec![1, 1],
                vec![2, 1],
                vec![0, 2],
                vec![1, 2],
                vec![2, 2],
            ]
        );
    }

    #[test]
    fn test_each_alternative_start() {
        let domain = Domain::new(2, 2);
        let rest: Vec<Outcome> = domain.each_alternative(Some(&Outcome::from([1, 0]))).collect();
        assert_eq!(rest, vec![Outcome::from([0, 1]), Outcome::from([1, 1])]);

        let last = domain.each_alternative(Some(&Outcome::from([1, 1]))).count();
        assert_eq!(last, 0);

        // Non-members restart from the beginning
        let all = domain.each_alternative(Some(&Outcome::from([5, 0]))).count();
        assert_eq!(all, 4);
    }

    #[test]
    fn test_each_alternative_restartable() {
        let domain = Domain::new(3, 2);
        let first: Vec<Outcome> = domain.each_alternative(None).collect();
        let second: Vec<Outcome> = domain.each_alternative(None).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_each_pair() {
        let domain = Domain::new(3, 2);
        let pairs: Vec<(Outcome, Outcome)> = domain.each_pair().collect();
        assert_eq!(pairs.len(), 8 * 7 / 2);
        assert!(pairs.iter().all(|(a, b)| a != b));

        let unordered: HashSet<(Outcome, Outcome)> = pairs
            .into_iter()
            .map(|(a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        assert_eq!(unordered.len(), 28);
    }

    #[test]
    fn test_each_pair_single_outcome() {
        assert_eq!(Domain::new(3, 1).each_pair().count(), 0);
        assert_eq!(Domain::new(0, 2).each_pair().count(), 0);
    }

    #[test]
    fn test_generate_pair_exact_distance() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for (n, d) in [(1, 2), (5, 2), (6, 3), (10, 4)] {
            let domain = Domain::new(n, d);
            for h in 1..=n {
                for _ in 0..50 {
                    let (a, b) = domain.generate_pair(&mut rng, h).unwrap();
                    assert!(domain.is_member(&a));
                    assert!(domain.is_member(&b));
                    assert_eq!(a.hamming_distance(&b), h);
                }
            }
        }
    }

    #[test]
    fn test_generate_pair_unconstrained() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let domain = Domain::new(2, 2);
        for _ in 0..100 {
            let (a, b) = domain.generate_pair(&mut rng, 0).unwrap();
            assert_ne!(a, b);
            assert!(domain.is_member(&b));
        }
    }

    #[test]
    fn test_generate_pair_errors() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(Domain::new(3, 2).generate_pair(&mut rng, 4).is_err());
        assert!(Domain::new(3, 1).generate_pair(&mut rng, 0).is_err());
        assert!(Domain::new(0, 2).generate_pair(&mut rng, 0).is_err());
    }
}
