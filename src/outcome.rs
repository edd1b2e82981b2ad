//! Outcomes (complete assignments of feature values).
//!
//! An outcome is an immutable tuple of `n` feature values, each in `0..d` for
//! a homogeneous domain size `d`.
use std::fmt;

/// A complete assignment of values to features.
///
/// # Invariants
///
/// - The value sequence never changes after construction
/// - Equality compares the full value sequence, including its length
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Outcome(Box<[usize]>);

impl Outcome {
    /// Creates a new outcome from the given feature values.
    pub fn new(values: impl Into<Box<[usize]>>) -> Self {
        Outcome(values.into())
    }

    /// Returns the number of features.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the outcome has no features.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns all feature values in feature order.
    pub fn values(&self) -> &[usize] {
        &self.0
    }

    /// Returns the value of a single feature.
    ///
    /// # Panics
    ///
    /// Panics if `feature >= self.len()`.
    pub fn value_at(&self, feature: usize) -> usize {
        self.0[feature]
    }

    /// Projects the outcome onto the given features, in the given order.
    ///
    /// The order of `features` is significant: it defines the key used for CPT lookups.
    pub fn project(&self, features: &[usize]) -> Vec<usize> {
        features.iter().map(|&f| self.0[f]).collect()
    }

    /// Returns a copy of this outcome with one feature changed.
    pub fn with_value(&self, feature: usize, value: usize) -> Self {
        let mut values = self.0.clone();
        values[feature] = value;
        Outcome(values)
    }

    /// Returns the features on which two outcomes differ, in increasing order.
    ///
    /// Outcomes of different lengths differ on every position of the longer one
    /// beyond the shorter one.
    pub fn differing_features(&self, other: &Outcome) -> Vec<usize> {
        let n = self.len().max(other.len());
        (0..n)
            .filter(|&i| self.0.get(i) != other.0.get(i))
            .collect()
    }

    /// Number of features on which two outcomes differ.
    pub fn hamming_distance(&self, other: &Outcome) -> usize {
        self.differing_features(other).len()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

impl From<Vec<usize>> for Outcome {
    fn from(values: Vec<usize>) -> Self {
        Outcome::new(values)
    }
}

impl<const N: usize> From<[usize; N]> for Outcome {
    fn from(values: [usize; N]) -> Self {
        Outcome::new(values.to_vec())
    }
}

impl From<Outcome> for Vec<usize> {
    fn from(outcome: Outcome) -> Self {
        outcome.0.into_vec()
    }
}
