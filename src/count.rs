//! Exact counting of bounded-indegree DAGs and CP-nets.
//!
//! The [`NetCount`] engine computes, with arbitrary precision, the number of
//! labeled acyclic digraphs on `n` nodes whose indegree is bounded by `c`,
//! optionally weighting every node by the number of non-degenerate CPTs it can
//! carry. The structural sampler uses these numbers as exact weights, so a
//! structure is drawn uniformly without any rejection step.
//!
//! # Recurrence
//!
//! Graphs are decomposed by their sinks. With `γ(j)` the weight of a node with
//! `j` parents (`1` for plain structures), let
//!
//! ```text
//! W(m)          = Σ_{j ≤ min(c, m)} C(m, j) γ(j)
//! cover(k,m,s)  = Σ_{t=0..s} (-1)^t C(s, t) W(m - t)^k
//! a(n, n)       = W(0)^n
//! a(n, k)       = C(n, k) Σ_{s=1..n-k} a(n - k, s) cover(k, n - k, s)
//! ```
//!
//! where `a(n, k)` counts graphs with exactly `k` sinks and `cover(k, m, s)`
//! counts the ways `k` new sinks choose parents among `m` older nodes such that
//! `s` designated nodes each receive a child. The total is `Σ_k a(n, k)`.
//!
//! All intermediate tables are memoized inside the engine and only ever grow.
//!
//! # Example
//!
//! ```
//! use gencpnet::count::NetCount;
//!
//! let counts = NetCount::default();
//! assert_eq!(counts.count_ldag(3).to_string(), "25");
//! assert_eq!(counts.count_bounded_ldag(3, 1).to_string(), "16");
//! assert_eq!(counts.count_cpnet(3, 2).unwrap().to_string(), "488");
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::cpt::table_rows;
use crate::error::{config_error, Error, Result};
use crate::utils::{dyadic, factorial, ratio_to_f64};

/// Largest sub-table (in rows) whose presence patterns are enumerated when
/// counting incomplete CPTs.
pub const MAX_ENUMERATED_CELLS: usize = 16;

/// What a single node contributes to the weight of a structure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Weighting {
    /// Every node weighs `1`: structures are counted (and drawn) uniformly.
    Structure,
    /// Every node weighs the number of non-degenerate CPTs for its indegree,
    /// so that complete CP-nets are counted (and drawn) uniformly.
    CpNet,
}

/// An exact non-negative dyadic rational `numerator / 2^denominator_log2`.
///
/// Counts that fold in an incompleteness probability are weighted sums and need
/// not be integers; with zero incompleteness the denominator is always `1`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Count {
    numerator: BigUint,
    denominator_log2: u64,
}

impl Count {
    /// Creates a count in lowest terms.
    pub fn new(numerator: BigUint, denominator_log2: u64) -> Self {
        let shift = numerator.trailing_zeros().unwrap_or(denominator_log2).min(denominator_log2);
        Count {
            numerator: numerator >> shift,
            denominator_log2: denominator_log2 - shift,
        }
    }

    pub fn numerator(&self) -> &BigUint {
        &self.numerator
    }

    pub fn denominator_log2(&self) -> u64 {
        self.denominator_log2
    }

    pub fn is_integer(&self) -> bool {
        self.denominator_log2 == 0
    }

    /// Returns the value if it is an integer.
    pub fn to_integer(&self) -> Option<BigUint> {
        self.is_integer().then(|| self.numerator.clone())
    }

    /// Approximate value.
    pub fn to_f64(&self) -> f64 {
        ratio_to_f64(&self.numerator, &(BigUint::from(1u32) << self.denominator_log2))
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/2^{}", self.numerator, self.denominator_log2)
        }
    }
}

/// Memoizing counting engine.
///
/// The domain size and the incompleteness probability are fixed at
/// construction; every counting method is a pure function of its arguments and
/// these two parameters. Memo tables live behind `RefCell`s, so the engine is
/// shared by reference (`&NetCount`) between the sampler and the caller.
pub struct NetCount {
    domain_size: usize,
    incompleteness: f64,
    /// `incompleteness == missing / unit`, `unit == 2^unit_log2`.
    missing: BigUint,
    unit: BigUint,
    unit_log2: u64,
    /// Number of total orders over one feature, `d!`.
    orders: BigUint,
    pascal: RefCell<Vec<Vec<BigUint>>>,
    ldag: RefCell<Vec<BigUint>>,
    subtables: RefCell<HashMap<usize, BigUint>>,
    tables: RefCell<HashMap<usize, BigUint>>,
    table_weights: RefCell<HashMap<(usize, usize), BigUint>>,
    parent_sets: RefCell<HashMap<(Weighting, usize, usize), BigUint>>,
    covers: RefCell<HashMap<(Weighting, usize, usize, usize, usize), BigUint>>,
    sinks: RefCell<HashMap<(Weighting, usize, usize, usize), BigUint>>,
}

impl NetCount {
    /// Creates an engine for domain size `d` and incompleteness probability `i`.
    ///
    /// Fails with [`Error::Config`] unless `d >= 1` and `0 <= i < 1`.
    pub fn new(domain_size: usize, incompleteness: f64) -> Result<Self> {
        if domain_size == 0 {
            return Err(config_error("domain size must be at least 1"));
        }
        let (missing, unit_log2) = dyadic(incompleteness).ok_or_else(|| {
            config_error(format!(
                "degree of incompleteness must be in range [0.0, 1.0), got {}",
                incompleteness
            ))
        })?;
        Ok(Self::from_parts(domain_size, incompleteness, missing, unit_log2 as u64))
    }

    fn from_parts(domain_size: usize, incompleteness: f64, missing: u64, unit_log2: u64) -> Self {
        Self {
            domain_size,
            incompleteness,
            missing: BigUint::from(missing),
            unit: BigUint::from(1u32) << unit_log2,
            unit_log2,
            orders: factorial(domain_size),
            pascal: RefCell::new(Vec::new()),
            ldag: RefCell::new(Vec::new()),
            subtables: RefCell::new(HashMap::new()),
            tables: RefCell::new(HashMap::new()),
            table_weights: RefCell::new(HashMap::new()),
            parent_sets: RefCell::new(HashMap::new()),
            covers: RefCell::new(HashMap::new()),
            sinks: RefCell::new(HashMap::new()),
        }
    }

    pub fn domain_size(&self) -> usize {
        self.domain_size
    }

    pub fn incompleteness(&self) -> f64 {
        self.incompleteness
    }

    /// Total number of memoized entries across all tables.
    pub fn memo_entries(&self) -> usize {
        self.pascal.borrow().iter().map(|row| row.len()).sum::<usize>()
            + self.ldag.borrow().len()
            + self.subtables.borrow().len()
            + self.tables.borrow().len()
            + self.table_weights.borrow().len()
            + self.parent_sets.borrow().len()
            + self.covers.borrow().len()
            + self.sinks.borrow().len()
    }
}

impl Default for NetCount {
    /// Binary domains without incompleteness.
    fn default() -> Self {
        Self::from_parts(2, 0.0, 0, 0)
    }
}

impl fmt::Debug for NetCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetCount")
            .field("domain_size", &self.domain_size)
            .field("incompleteness", &self.incompleteness)
            .field("memo_entries", &self.memo_entries())
            .finish()
    }
}

/// Indegree bounds beyond `n - 1` never bind.
pub fn effective_bound(nodes: usize, bound: usize) -> usize {
    bound.min(nodes.saturating_sub(1))
}

// Plain combinatorics
impl NetCount {
    /// Binomial coefficient `C(n, k)`, `0` when `k > n`.
    ///
    /// Served from a Pascal triangle that grows row by row as needed.
    pub fn binomial(&self, n: usize, k: usize) -> BigUint {
        if k > n {
            return BigUint::zero();
        }
        let mut pascal = self.pascal.borrow_mut();
        while pascal.len() <= n {
            let row = match pascal.last() {
                None => vec![BigUint::from(1u32)],
                Some(prev) => {
                    let mut row = Vec::with_capacity(prev.len() + 1);
                    row.push(BigUint::from(1u32));
                    for pair in prev.windows(2) {
                        row.push(&pair[0] + &pair[1]);
                    }
                    row.push(BigUint::from(1u32));
                    row
                }
            };
            pascal.push(row);
        }
        pascal[n][k].clone()
    }

    /// Number of labeled DAGs on `n` nodes with unbounded indegree.
    ///
    /// Robinson's recurrence, by inclusion-exclusion over the set of sinks:
    ///
    /// ```text
    /// a(0) = 1
    /// a(n) = Σ_{k=1..n} (-1)^(k+1) C(n, k) 2^(k(n-k)) a(n - k)
    /// ```
    pub fn count_ldag(&self, n: usize) -> BigUint {
        let known = self.ldag.borrow().len();
        for m in known..=n {
            let value = if m == 0 {
                BigUint::from(1u32)
            } else {
                let mut positive = BigUint::zero();
                let mut negative = BigUint::zero();
                for k in 1..=m {
                    let term = self.binomial(m, k) * (BigUint::from(1u32) << (k * (m - k))) * &self.ldag.borrow()[m - k];
                    if k % 2 == 1 {
                        positive += term;
                    } else {
                        negative += term;
                    }
                }
                positive - negative
            };
            self.ldag.borrow_mut().push(value);
        }
        self.ldag.borrow()[n].clone()
    }

    /// Number of labeled DAGs on `n` nodes in which every node has at most `c` parents.
    ///
    /// Equals [`count_ldag(n)`](Self::count_ldag) whenever `c >= n - 1`.
    pub fn count_bounded_ldag(&self, n: usize, c: usize) -> BigUint {
        self.total(Weighting::Structure, n, c)
            .expect("structure counting involves no CPT tables")
    }

    /// Weighted number of CP-nets on `n` features with indegree at most `c`.
    ///
    /// Every structure contributes the product over its nodes of the CPT
    /// multiplicity ([`cpt_multiplicity`](Self::cpt_multiplicity)). With zero
    /// incompleteness this is exactly the number of distinct CP-nets.
    pub fn count_cpnet(&self, n: usize, c: usize) -> Result<Count> {
        let c = effective_bound(n, c);
        let numerator = self.total(Weighting::CpNet, n, c)?;
        let rows = self.rows(c)? as u64;
        Ok(Count::new(numerator, self.unit_log2 * rows * n as u64))
    }

    /// Cumulative weights of the number of sinks `k = 1..=n` of a CP-net.
    ///
    /// The last entry is the numerator of [`count_cpnet(n, c)`](Self::count_cpnet).
    pub fn cpnet_cdf(&self, n: usize, c: usize) -> Result<Vec<BigUint>> {
        self.sink_cdf(Weighting::CpNet, n, c)
    }

    /// Probability of each number of sinks `k = 1..=n` in a random CP-net.
    pub fn prob_cpnet(&self, n: usize, c: usize) -> Result<Vec<f64>> {
        let cdf = self.cpnet_cdf(n, c)?;
        let total = match cdf.last() {
            Some(total) => total.clone(),
            None => return Ok(Vec::new()),
        };
        let mut previous = BigUint::zero();
        let mut probs = Vec::with_capacity(cdf.len());
        for value in cdf {
            probs.push(ratio_to_f64(&(&value - &previous), &total));
            previous = value;
        }
        Ok(probs)
    }

    /// Cumulative weights `Σ_{j ≤ k} a(n, j)` for `k = 1..=n`.
    pub fn sink_cdf(&self, weighting: Weighting, n: usize, c: usize) -> Result<Vec<BigUint>> {
        let c = effective_bound(n, c);
        let mut acc = BigUint::zero();
        let mut cdf = Vec::with_capacity(n);
        for k in 1..=n {
            acc += self.sinks(weighting, n, c, k)?;
            cdf.push(acc.clone());
        }
        Ok(cdf)
    }
}

// CPT multiplicities
impl NetCount {
    /// Number of rows of a CPT with `k` parents, `d^k`.
    pub fn rows(&self, k: usize) -> Result<usize> {
        table_rows(self.domain_size, k)
    }

    /// Weighted mass of one `d^s`-row sub-table that is constant on every
    /// connected component of its present rows, scaled by `unit^(d^s)`.
    ///
    /// Rows are adjacent when they differ in exactly one parent value. A present
    /// row weighs `(1 - i)` per order and a missing row `i·d!`.
    fn subtable_weight(&self, s: usize) -> Result<BigUint> {
        if let Some(value) = self.subtables.borrow().get(&s) {
            return Ok(value.clone());
        }

        let cells = self.rows(s)?;
        let missing = &self.missing * &self.orders;
        let present = &self.unit - &self.missing;

        let value = if s == 0 || self.missing.is_zero() {
            &self.orders * self.unit.pow(cells as u32)
        } else if s == 1 {
            let d = self.domain_size as u32;
            let none = missing.pow(d);
            &none + &self.orders * ((&missing + &present).pow(d) - &none)
        } else if cells <= MAX_ENUMERATED_CELLS {
            let tally = component_tally(s, self.domain_size);
            let mut total = BigUint::zero();
            for (size, by_components) in tally.iter().enumerate() {
                for (components, &count) in by_components.iter().enumerate() {
                    if count == 0 {
                        continue;
                    }
                    total += BigUint::from(count)
                        * present.pow(size as u32)
                        * missing.pow((cells - size) as u32)
                        * self.orders.pow(components as u32);
                }
            }
            total
        } else {
            return Err(Error::IntractableCount { indegree: s, cells });
        };

        debug!("subtable_weight(s = {}) = {}", s, value);
        self.subtables.borrow_mut().insert(s, value.clone());
        Ok(value)
    }

    /// Weighted number of non-degenerate CPTs with `k` parents, scaled by `unit^(d^k)`.
    ///
    /// Inclusion-exclusion over the set `S` of parents the table ignores:
    /// `Σ_s (-1)^s C(k, s) Z_s^(d^(k-s))`.
    fn table_mass(&self, k: usize) -> Result<BigUint> {
        if let Some(value) = self.tables.borrow().get(&k) {
            return Ok(value.clone());
        }

        let mut positive = BigUint::zero();
        let mut negative = BigUint::zero();
        for s in 0..=k {
            let blocks = self.rows(k - s)? as u32;
            let term = self.binomial(k, s) * self.subtable_weight(s)?.pow(blocks);
            if s % 2 == 0 {
                positive += term;
            } else {
                negative += term;
            }
        }
        let value = positive - negative;

        self.tables.borrow_mut().insert(k, value.clone());
        Ok(value)
    }

    /// Weighted number of non-degenerate CPTs for a node with `k` parents.
    ///
    /// With zero incompleteness this is the number of functions from the `d^k`
    /// parent assignments to the `d!` orders that depend on every parent.
    pub fn cpt_multiplicity(&self, k: usize) -> Result<Count> {
        let rows = self.rows(k)? as u64;
        Ok(Count::new(self.table_mass(k)?, self.unit_log2 * rows))
    }

    /// CPT multiplicity for `k` parents scaled to the common denominator
    /// `unit^(d^c)` of all nodes with at most `c` parents.
    pub fn table_weight(&self, c: usize, k: usize) -> Result<BigUint> {
        assert!(k <= c, "indegree {} exceeds bound {}", k, c);
        if let Some(value) = self.table_weights.borrow().get(&(c, k)) {
            return Ok(value.clone());
        }
        let scale = (self.rows(c)? - self.rows(k)?) as u32;
        let value = self.table_mass(k)? * self.unit.pow(scale);
        self.table_weights.borrow_mut().insert((c, k), value.clone());
        Ok(value)
    }

    /// Weight of a single node with `k` parents under the given weighting.
    pub fn node_weight(&self, weighting: Weighting, c: usize, k: usize) -> Result<BigUint> {
        match weighting {
            Weighting::Structure => Ok(BigUint::from(1u32)),
            Weighting::CpNet => self.table_weight(c, k),
        }
    }
}

// Weighted DAG recurrence
impl NetCount {
    /// `W(m)`: weighted number of parent sets of size at most `c` among `m` candidates.
    pub fn parent_sets(&self, weighting: Weighting, c: usize, m: usize) -> Result<BigUint> {
        let key = (weighting, c, m);
        if let Some(value) = self.parent_sets.borrow().get(&key) {
            return Ok(value.clone());
        }
        let mut value = BigUint::zero();
        for j in 0..=c.min(m) {
            value += self.binomial(m, j) * self.node_weight(weighting, c, j)?;
        }
        self.parent_sets.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    /// `cover(k, m, s)`: weighted number of ways for `k` new nodes to choose
    /// parents among `m` existing nodes so that `s` designated ones each get at
    /// least one child.
    pub fn cover(&self, weighting: Weighting, c: usize, k: usize, m: usize, s: usize) -> Result<BigUint> {
        assert!(s <= m, "cannot cover {} of {} nodes", s, m);
        let key = (weighting, c, k, m, s);
        if let Some(value) = self.covers.borrow().get(&key) {
            return Ok(value.clone());
        }
        let mut positive = BigUint::zero();
        let mut negative = BigUint::zero();
        for t in 0..=s {
            let term = self.binomial(s, t) * self.parent_sets(weighting, c, m - t)?.pow(k as u32);
            if t % 2 == 0 {
                positive += term;
            } else {
                negative += term;
            }
        }
        let value = positive - negative;
        self.covers.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    /// `a(n, k)`: weighted number of DAGs on `n` labeled nodes with exactly `k` sinks.
    pub fn sinks(&self, weighting: Weighting, n: usize, c: usize, k: usize) -> Result<BigUint> {
        assert!(1 <= k && k <= n, "sink count {} out of range 1..={}", k, n);
        let key = (weighting, n, c, k);
        if let Some(value) = self.sinks.borrow().get(&key) {
            return Ok(value.clone());
        }

        let m = n - k;
        let value = if m == 0 {
            self.cover(weighting, c, k, 0, 0)?
        } else {
            let mut sum = BigUint::zero();
            for s in 1..=m {
                sum += self.sinks(weighting, m, c, s)? * self.cover(weighting, c, k, m, s)?;
            }
            self.binomial(n, k) * sum
        };

        debug!(
            "sinks({:?}, n = {}, c = {}, k = {}) = {} bits",
            weighting,
            n,
            c,
            k,
            value.bits()
        );
        self.sinks.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    /// Weighted number of DAGs on `n` labeled nodes with indegree at most `c`.
    pub fn total(&self, weighting: Weighting, n: usize, c: usize) -> Result<BigUint> {
        let c = effective_bound(n, c);
        let mut total = BigUint::from((n == 0) as u32);
        for k in 1..=n {
            total += self.sinks(weighting, n, c, k)?;
        }
        Ok(total)
    }
}

/// Counts presence patterns of the `d^s` rows of a sub-table by number of
/// present rows and number of connected components among them.
///
/// Returns `tally[present][components]`.
fn component_tally(s: usize, d: usize) -> Vec<Vec<u64>> {
    let cells = d.pow(s as u32);

    // Rows differing in exactly one parent value
    let neighbours: Vec<Vec<usize>> = (0..cells)
        .map(|cell| {
            let mut result = Vec::new();
            let mut stride = 1;
            for _ in 0..s {
                let digit = (cell / stride) % d;
                for v in 0..d {
                    if v != digit {
                        result.push(cell - digit * stride + v * stride);
                    }
                }
                stride *= d;
            }
            result
        })
        .collect();

    let mut tally = vec![vec![0u64; cells + 1]; cells + 1];
    let mut parent = vec![0usize; cells];
    for mask in 0u32..(1u32 << cells) {
        let present = mask.count_ones() as usize;
        let mut components = present;
        for (cell, p) in parent.iter_mut().enumerate() {
            *p = cell;
        }
        for cell in 0..cells {
            if (mask >> cell) & 1 == 0 {
                continue;
            }
            for &other in &neighbours[cell] {
                if other < cell && (mask >> other) & 1 == 1 {
                    let a = find(&mut parent, cell);
                    let b = find(&mut parent, other);
                    if a != b {
                        parent[a] = b;
                        components -= 1;
                    }
                }
            }
        }
        tally[present][components] += 1;
    }
    tally
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn big(x: u64) -> BigUint {
        BigUint::from(x)
    }

    /// Counts DAGs with indegree at most `c` by checking every edge subset.
    fn brute_force_bounded_ldag(n: usize, c: usize) -> u64 {
        let edges: Vec<(usize, usize)> = (0..n)
            .flat_map(|u| (0..n).filter(move |&v| v != u).map(move |v| (u, v)))
            .collect();
        let mut count = 0;
        for mask in 0u64..(1 << edges.len()) {
            let chosen: Vec<(usize, usize)> =
                (0..edges.len()).filter(|&i| (mask >> i) & 1 == 1).map(|i| edges[i]).collect();
            let mut indegree = vec![0; n];
            for &(_, v) in &chosen {
                indegree[v] += 1;
            }
            if indegree.iter().any(|&x| x > c) {
                continue;
            }
            // Kahn's algorithm
            let mut removed = vec![false; n];
            let mut progress = true;
            while progress {
                progress = false;
                for v in 0..n {
                    if !removed[v] && chosen.iter().all(|&(u, w)| w != v || removed[u]) {
                        removed[v] = true;
                        progress = true;
                    }
                }
            }
            if removed.iter().all(|&r| r) {
                count += 1;
            }
        }
        count
    }

    #[test]
    fn test_binomial() {
        let counts = NetCount::default();
        assert_eq!(counts.binomial(0, 0), big(1));
        assert_eq!(counts.binomial(5, 2), big(10));
        assert_eq!(counts.binomial(5, 6), big(0));
        assert_eq!(counts.binomial(60, 30), big(118264581564861424));
        for n in 0..20 {
            for k in 0..=n {
                assert_eq!(counts.binomial(n, k), counts.binomial(n, n - k));
            }
        }
    }

    #[test]
    fn test_count_ldag() {
        let counts = NetCount::default();
        let expected = [1u64, 1, 3, 25, 543, 29281, 3781503, 1138779265];
        for (n, &e) in expected.iter().enumerate() {
            assert_eq!(counts.count_ldag(n), big(e), "n = {}", n);
        }
    }

    #[test]
    fn test_count_ldag_positive() {
        let counts = NetCount::default();
        for n in 0..30 {
            assert!(counts.count_ldag(n) >= big(1));
        }
    }

    #[test]
    fn test_count_bounded_ldag_table() {
        let counts = NetCount::default();
        let table: [(usize, [u64; 8]); 4] = [
            (0, [1, 1, 1, 1, 1, 1, 1, 1]),
            (1, [1, 1, 3, 16, 125, 1296, 16807, 262144]),
            (2, [1, 1, 3, 25, 443, 13956, 695902, 50741797]),
            (3, [1, 1, 3, 25, 543, 26566, 2556342, 435055552]),
        ];
        for (c, row) in table {
            for (n, &e) in row.iter().enumerate() {
                assert_eq!(counts.count_bounded_ldag(n, c), big(e), "n = {}, c = {}", n, c);
            }
        }
    }

    #[test]
    fn test_bounded_reduces_to_unbounded() {
        let counts = NetCount::default();
        for n in 0..12usize {
            let c = n.saturating_sub(1);
            assert_eq!(counts.count_bounded_ldag(n, c), counts.count_ldag(n), "n = {}", n);
            assert_eq!(counts.count_bounded_ldag(n, c + 3), counts.count_ldag(n), "n = {}", n);
        }
    }

    #[test]
    fn test_bounded_by_one_is_rooted_forests() {
        // Indegree <= 1 graphs are rooted forests: (n + 1)^(n - 1) of them.
        let counts = NetCount::default();
        for n in 1..15usize {
            assert_eq!(counts.count_bounded_ldag(n, 1), big(n as u64 + 1).pow(n as u32 - 1));
        }
    }

    #[test]
    fn test_bounded_matches_brute_force() {
        let counts = NetCount::default();
        for n in 0..=4 {
            for c in 0..=n {
                assert_eq!(
                    counts.count_bounded_ldag(n, c),
                    big(brute_force_bounded_ldag(n, c)),
                    "n = {}, c = {}",
                    n,
                    c
                );
            }
        }
    }

    #[test]
    fn test_cpt_multiplicity_complete() {
        let binary = NetCount::new(2, 0.0).unwrap();
        let expected = [2u64, 2, 10, 218, 64594];
        for (k, &e) in expected.iter().enumerate() {
            assert_eq!(binary.cpt_multiplicity(k).unwrap().to_integer(), Some(big(e)));
        }

        let ternary = NetCount::new(3, 0.0).unwrap();
        let expected = [6u64, 210, 10077270];
        for (k, &e) in expected.iter().enumerate() {
            assert_eq!(ternary.cpt_multiplicity(k).unwrap().to_integer(), Some(big(e)));
        }
    }

    #[test]
    fn test_cpt_multiplicity_incomplete() {
        // Values checked against enumeration of every table.
        let counts = NetCount::new(2, 0.25).unwrap();
        assert_eq!(counts.cpt_multiplicity(0).unwrap(), Count::new(big(2), 0));
        assert_eq!(counts.cpt_multiplicity(1).unwrap(), Count::new(big(9), 3));
        assert_eq!(counts.cpt_multiplicity(2).unwrap(), Count::new(big(621), 7));

        let counts = NetCount::new(2, 0.5).unwrap();
        assert_eq!(counts.cpt_multiplicity(1).unwrap(), Count::new(big(1), 1));
        assert_eq!(counts.cpt_multiplicity(2).unwrap(), Count::new(big(13), 3));

        let counts = NetCount::new(3, 0.25).unwrap();
        assert_eq!(counts.cpt_multiplicity(1).unwrap(), Count::new(big(5265), 5));
    }

    #[test]
    fn test_cpt_multiplicity_intractable() {
        let counts = NetCount::new(5, 0.1).unwrap();
        assert!(counts.cpt_multiplicity(1).is_ok());
        assert_eq!(
            counts.cpt_multiplicity(2),
            Err(Error::IntractableCount { indegree: 2, cells: 25 })
        );
        // Complete tables never need enumeration
        let counts = NetCount::new(5, 0.0).unwrap();
        assert!(counts.cpt_multiplicity(2).is_ok());
    }

    #[test]
    fn test_count_cpnet() {
        let binary = NetCount::new(2, 0.0).unwrap();
        assert_eq!(binary.count_cpnet(0, 0).unwrap().to_integer(), Some(big(1)));
        assert_eq!(binary.count_cpnet(1, 0).unwrap().to_integer(), Some(big(2)));
        assert_eq!(binary.count_cpnet(2, 1).unwrap().to_integer(), Some(big(12)));
        assert_eq!(binary.count_cpnet(3, 1).unwrap().to_integer(), Some(big(128)));
        assert_eq!(binary.count_cpnet(3, 2).unwrap().to_integer(), Some(big(488)));
        assert_eq!(binary.count_cpnet(4, 2).unwrap().to_integer(), Some(big(56240)));
        assert_eq!(binary.count_cpnet(4, 3).unwrap().to_integer(), Some(big(481776)));
        assert_eq!(binary.count_cpnet(5, 2).unwrap().to_integer(), Some(big(13126272)));

        let ternary = NetCount::new(3, 0.0).unwrap();
        assert_eq!(ternary.count_cpnet(2, 1).unwrap().to_integer(), Some(big(2556)));
        assert_eq!(ternary.count_cpnet(3, 2).unwrap().to_integer(), Some(big(77274933336)));
    }

    #[test]
    fn test_count_cpnet_incomplete() {
        let counts = NetCount::new(2, 0.25).unwrap();
        let count = counts.count_cpnet(2, 1).unwrap();
        assert_eq!(count, Count::new(big(17), 1));
        assert_eq!(count.to_string(), "17/2^1");
        assert_eq!(count.to_f64(), 8.5);

        assert_eq!(counts.count_cpnet(3, 2).unwrap(), Count::new(big(46463), 8));
        let counts = NetCount::new(2, 0.5).unwrap();
        assert_eq!(counts.count_cpnet(3, 2).unwrap(), Count::new(big(215), 2));
    }

    #[test]
    fn test_cpnet_cdf() {
        let counts = NetCount::new(2, 0.0).unwrap();
        let cdf = counts.cpnet_cdf(3, 2).unwrap();
        assert_eq!(cdf.len(), 3);
        assert!(cdf.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(cdf.last(), Some(&big(488)));

        let probs = counts.prob_cpnet(3, 2).unwrap();
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(counts.prob_cpnet(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_memo_grows_monotonically() {
        let counts = NetCount::default();
        let before = counts.memo_entries();
        counts.count_bounded_ldag(6, 2);
        let middle = counts.memo_entries();
        assert!(middle > before);
        counts.count_bounded_ldag(4, 2);
        assert_eq!(counts.memo_entries(), middle);
        counts.count_bounded_ldag(8, 2);
        assert!(counts.memo_entries() > middle);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(NetCount::new(0, 0.0).is_err());
        assert!(NetCount::new(2, 1.0).is_err());
        assert!(NetCount::new(2, -0.5).is_err());
        assert!(NetCount::new(2, f64::NAN).is_err());
    }

    #[test]
    fn test_count_display() {
        assert_eq!(Count::new(big(12), 2).to_string(), "3");
        assert_eq!(Count::new(big(0), 5), Count::new(big(0), 0));
        assert!(!Count::new(big(3), 1).is_integer());
    }

    #[test]
    fn test_component_tally() {
        // A 2x2 sub-table is a 4-cycle.
        let tally = component_tally(2, 2);
        let total: u64 = tally.iter().flatten().sum();
        assert_eq!(total, 16);
        assert_eq!(tally[0][0], 1);
        assert_eq!(tally[1][1], 4);
        assert_eq!(tally[2][1], 4); // adjacent pairs
        assert_eq!(tally[2][2], 2); // diagonal pairs
        assert_eq!(tally[3][1], 4);
        assert_eq!(tally[4][1], 1);
    }
}
