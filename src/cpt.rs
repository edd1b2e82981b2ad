//! Conditional preference tables.
//!
//! A [`Cpt`] for a node with `k` parents has `d^k` rows, one per assignment of
//! parent values. Rows are stored densely in mixed-radix order with the first
//! parent as the most significant digit, and each row is either a total order
//! over the node's own values (most preferred first) or missing.

use std::fmt;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{config_error, Error, Result};

/// Upper limit on the number of rows of a single table.
pub const MAX_TABLE_ROWS: usize = 1 << 20;

/// Default cap on the number of tables drawn before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Number of rows of a table with `indegree` parents over domain size `d`.
pub fn table_rows(domain_size: usize, indegree: usize) -> Result<usize> {
    u32::try_from(indegree)
        .ok()
        .and_then(|k| domain_size.checked_pow(k))
        .filter(|&rows| rows <= MAX_TABLE_ROWS)
        .ok_or_else(|| {
            config_error(format!(
                "CPT with {} parents over domain size {} exceeds {} rows",
                indegree, domain_size, MAX_TABLE_ROWS
            ))
        })
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Cpt {
    domain_size: usize,
    indegree: usize,
    rows: Vec<Option<Box<[usize]>>>,
}

impl Cpt {
    /// Creates a table from its rows, in mixed-radix order of parent values.
    ///
    /// Fails if the number of rows is not `d^indegree` or a present row is not
    /// a permutation of `0..d`. Degenerate tables are accepted here and
    /// rejected when assembled into a [`CpNet`](crate::cpnet::CpNet).
    pub fn new(domain_size: usize, indegree: usize, rows: Vec<Option<Vec<usize>>>) -> Result<Self> {
        let expected = table_rows(domain_size, indegree)?;
        if rows.len() != expected {
            return Err(config_error(format!(
                "CPT with {} parents over domain size {} needs {} rows, got {}",
                indegree,
                domain_size,
                expected,
                rows.len()
            )));
        }
        for order in rows.iter().flatten() {
            let mut seen = vec![false; domain_size];
            let valid = order.len() == domain_size
                && order.iter().all(|&v| v < domain_size && !std::mem::replace(&mut seen[v], true));
            if !valid {
                return Err(config_error(format!(
                    "{:?} is not a total order over {} values",
                    order, domain_size
                )));
            }
        }
        Ok(Cpt {
            domain_size,
            indegree,
            rows: rows.into_iter().map(|r| r.map(Vec::into_boxed_slice)).collect(),
        })
    }

    pub fn domain_size(&self) -> usize {
        self.domain_size
    }

    pub fn indegree(&self) -> usize {
        self.indegree
    }

    /// Total number of rows, present or missing.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn present_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_some()).count()
    }

    /// Position of the row for the given parent values.
    ///
    /// # Panics
    ///
    /// Panics if the key has the wrong length or a value out of range.
    pub fn row_index(&self, key: &[usize]) -> usize {
        assert_eq!(key.len(), self.indegree, "Key {:?} does not match indegree {}", key, self.indegree);
        key.iter().fold(0, |index, &v| {
            assert!(v < self.domain_size, "Value {} out of domain 0..{}", v, self.domain_size);
            index * self.domain_size + v
        })
    }

    /// Parent values of the row at `index`.
    pub fn key_of(&self, mut index: usize) -> Vec<usize> {
        let mut key = vec![0; self.indegree];
        for slot in key.iter_mut().rev() {
            *slot = index % self.domain_size;
            index /= self.domain_size;
        }
        key
    }

    /// The order for the given parent values, or `None` if the row is missing.
    pub fn row(&self, key: &[usize]) -> Option<&[usize]> {
        self.rows[self.row_index(key)].as_deref()
    }

    /// Iterates over `(parent values, order)` for every row.
    pub fn rows(&self) -> impl Iterator<Item = (Vec<usize>, Option<&[usize]>)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(move |(index, order)| (self.key_of(index), order.as_deref()))
    }

    /// Whether `a` is preferred to `b` under the row for `key`.
    ///
    /// Returns `None` if the row is missing.
    pub fn prefers(&self, key: &[usize], a: usize, b: usize) -> Option<bool> {
        let order = self.row(key)?;
        let rank = |v: usize| order.iter().position(|&x| x == v);
        Some(rank(a) < rank(b))
    }

    /// Values ranked strictly below `value` under the row for `key`, best first.
    ///
    /// Empty if the row is missing.
    pub fn worse_than(&self, key: &[usize], value: usize) -> &[usize] {
        match self.row(key) {
            Some(order) => match order.iter().position(|&x| x == value) {
                Some(rank) => &order[rank + 1..],
                None => &[],
            },
            None => &[],
        }
    }

    /// Whether the order actually changes with parent `p` somewhere.
    ///
    /// Holds when some two present rows agree on all parents but `p` and carry
    /// different orders.
    pub fn depends_on(&self, p: usize) -> bool {
        assert!(p < self.indegree, "Parent {} out of range 0..{}", p, self.indegree);
        let d = self.domain_size;
        let stride = d.pow((self.indegree - 1 - p) as u32);
        (0..self.rows.len())
            .filter(|&base| (base / stride) % d == 0)
            .any(|base| {
                let mut line = (0..d).filter_map(|v| self.rows[base + v * stride].as_deref());
                match line.next() {
                    Some(first) => line.any(|order| order != first),
                    None => false,
                }
            })
    }

    /// Parents the table does not actually depend on.
    pub fn vacuous_parents(&self) -> Vec<usize> {
        (0..self.indegree).filter(|&p| !self.depends_on(p)).collect()
    }

    /// A table is degenerate when some declared parent has no witness pair.
    pub fn is_degenerate(&self) -> bool {
        (0..self.indegree).any(|p| !self.depends_on(p))
    }
}

impl fmt::Display for Cpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, order) in self.rows() {
            let key: Vec<String> = key.iter().map(|v| v.to_string()).collect();
            write!(f, "[{}]: ", key.join(","))?;
            match order {
                Some(order) => {
                    let order: Vec<String> = order.iter().map(|v| v.to_string()).collect();
                    writeln!(f, "{}", order.join(" > "))?;
                }
                None => writeln!(f, "-")?,
            }
        }
        Ok(())
    }
}

/// Draws random non-degenerate tables.
///
/// Every row is present independently with probability `1 - incompleteness` and
/// carries a uniformly random order. Degenerate tables are discarded and drawn
/// again from scratch, at most `max_attempts` times in total.
#[derive(Debug, Clone)]
pub struct CptBuilder {
    domain_size: usize,
    incompleteness: f64,
    max_attempts: Option<usize>,
}

impl CptBuilder {
    pub fn new(domain_size: usize, incompleteness: f64) -> Self {
        Self {
            domain_size,
            incompleteness,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }

    /// Sets the retry cap; `None` retries until a table is found.
    pub fn with_max_attempts(mut self, max_attempts: Option<usize>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_attempts(&self) -> Option<usize> {
        self.max_attempts
    }

    /// Builds the table of `feature` for a node with `indegree` parents.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R, feature: usize, indegree: usize) -> Result<Cpt> {
        let rows = table_rows(self.domain_size, indegree)?;

        // A single value admits a single order, so no parent can ever matter.
        if indegree > 0 && self.domain_size < 2 {
            return Err(Error::GenerationExhausted {
                feature,
                indegree,
                attempts: 0,
            });
        }

        let mut attempts = 0;
        loop {
            if self.max_attempts.is_some_and(|cap| attempts >= cap) {
                return Err(Error::GenerationExhausted {
                    feature,
                    indegree,
                    attempts,
                });
            }
            attempts += 1;
            if attempts == 1000 {
                warn!(
                    "Still drawing CPT for feature {} (indegree {}) after {} attempts",
                    feature, indegree, attempts
                );
            }

            let cpt = self.draw(rng, indegree, rows);
            if !cpt.is_degenerate() {
                debug!(
                    "build: feature {} with {} parents, {}/{} rows present, {} attempt(s)",
                    feature,
                    indegree,
                    cpt.present_rows(),
                    rows,
                    attempts
                );
                return Ok(cpt);
            }
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R, indegree: usize, rows: usize) -> Cpt {
        let mut table = Vec::with_capacity(rows);
        for _ in 0..rows {
            if indegree == 0 || rng.gen::<f64>() >= self.incompleteness {
                let mut order: Vec<usize> = (0..self.domain_size).collect();
                order.shuffle(rng);
                table.push(Some(order.into_boxed_slice()));
            } else {
                table.push(None);
            }
        }
        Cpt {
            domain_size: self.domain_size,
            indegree,
            rows: table,
        }
    }
}
