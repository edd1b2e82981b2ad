//! Uniform sampling of bounded-indegree DAGs.
//!
//! A DAG is peeled into layers: the first layer holds its sinks, the second
//! holds the sinks of what remains, and so on. [`DagSampler`] draws the layer
//! sizes with the exact weights from [`NetCount`], assigns labels to layers
//! uniformly, then lets every node pick its parents among deeper layers with
//! weights that account for the number of ways the rest of its layer can still
//! give every node of the next layer a child. Every structure is therefore
//! drawn with probability proportional to its weight and no draw is rejected.

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use rand::Rng;

use crate::count::{effective_bound, NetCount, Weighting};
use crate::error::Result;
use crate::utils::{draw_weighted, random_k_subset};

/// Directed acyclic graph over nodes `0..n`, stored as sorted parent lists.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Dag {
    parents: Vec<Vec<usize>>,
}

impl Dag {
    /// Graph without edges.
    pub fn empty(nodes: usize) -> Self {
        Dag {
            parents: vec![Vec::new(); nodes],
        }
    }

    /// Builds a graph from parent lists, sorting each of them.
    ///
    /// # Panics
    ///
    /// Panics if a parent is out of range or repeated, or if the graph has a cycle.
    pub fn from_parents(parents: Vec<Vec<usize>>) -> Self {
        let n = parents.len();
        let dag = Dag::with_parents(parents);
        for (node, ps) in dag.parents.iter().enumerate() {
            assert!(ps.windows(2).all(|w| w[0] < w[1]), "Repeated parent of node {}", node);
            assert!(ps.iter().all(|&p| p < n && p != node), "Invalid parent of node {}", node);
        }
        assert!(dag.is_acyclic(), "Parent lists contain a cycle");
        dag
    }

    /// Sorts the parent lists without validating them.
    pub(crate) fn with_parents(mut parents: Vec<Vec<usize>>) -> Self {
        for ps in parents.iter_mut() {
            ps.sort_unstable();
        }
        Dag { parents }
    }

    pub fn nodes(&self) -> usize {
        self.parents.len()
    }

    pub fn parents(&self, node: usize) -> &[usize] {
        &self.parents[node]
    }

    pub fn indegree(&self, node: usize) -> usize {
        self.parents[node].len()
    }

    pub fn max_indegree(&self) -> usize {
        self.parents.iter().map(|ps| ps.len()).max().unwrap_or(0)
    }

    /// All edges as `(parent, child)` pairs, ordered by child then parent.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.parents
            .iter()
            .enumerate()
            .flat_map(|(child, ps)| ps.iter().map(move |&p| (p, child)))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.parents.iter().map(|ps| ps.len()).sum()
    }

    /// Nodes ordered so that every parent precedes its children.
    ///
    /// Returns `None` if the graph has a cycle.
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let n = self.nodes();
        let mut children = vec![Vec::new(); n];
        let mut pending: Vec<usize> = self.parents.iter().map(|ps| ps.len()).collect();
        for (p, c) in self.edges() {
            children[p].push(c);
        }

        let mut order: Vec<usize> = (0..n).filter(|&v| pending[v] == 0).collect();
        let mut head = 0;
        while head < order.len() {
            let v = order[head];
            head += 1;
            for &c in &children[v] {
                pending[c] -= 1;
                if pending[c] == 0 {
                    order.push(c);
                }
            }
        }
        (order.len() == n).then_some(order)
    }

    pub fn is_acyclic(&self) -> bool {
        self.topological_order().is_some()
    }
}

/// Exact sampler of DAGs on `nodes` labeled nodes with indegree at most `bound`.
///
/// Borrows the counting engine, so repeated samples share its memo tables.
#[derive(Debug)]
pub struct DagSampler<'a> {
    counts: &'a NetCount,
    nodes: usize,
    bound: usize,
    weighting: Weighting,
}

impl<'a> DagSampler<'a> {
    pub fn new(counts: &'a NetCount, nodes: usize, bound: usize, weighting: Weighting) -> Self {
        Self {
            counts,
            nodes,
            bound: effective_bound(nodes, bound),
            weighting,
        }
    }

    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// The counting engine behind this sampler.
    pub fn counts(&self) -> &'a NetCount {
        self.counts
    }

    /// Indegree bound after clamping to `nodes - 1`.
    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// Draws one DAG.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Dag> {
        let n = self.nodes;
        if n == 0 {
            return Ok(Dag::empty(0));
        }

        let sizes = self.layer_sizes(rng)?;
        debug!("sample: layer sizes {:?}", sizes);

        let mut remaining: Vec<usize> = (0..n).collect();
        let mut layers = Vec::with_capacity(sizes.len());
        for &size in &sizes {
            let picked = random_k_subset(rng, remaining.len(), size);
            let mut layer = Vec::with_capacity(size);
            let mut rest = Vec::with_capacity(remaining.len() - size);
            let mut picked = picked.into_iter().peekable();
            for (index, &label) in remaining.iter().enumerate() {
                if picked.peek() == Some(&index) {
                    picked.next();
                    layer.push(label);
                } else {
                    rest.push(label);
                }
            }
            layers.push(layer);
            remaining = rest;
        }

        let mut parents = vec![Vec::new(); n];
        for j in 0..layers.len() {
            let next = layers.get(j + 1).map_or(0, |layer| layer.len());
            let deeper: Vec<usize> = layers[j + 1..].concat();
            let mut uncovered = deeper[..next].to_vec();
            let mut covered = deeper[next..].to_vec();
            let m = deeper.len();

            for (position, &node) in layers[j].iter().enumerate() {
                let rest = layers[j].len() - position - 1;
                let (x, y) = self.parent_split(rng, rest, m, uncovered.len())?;

                let newly: Vec<usize> = random_k_subset(rng, uncovered.len(), x)
                    .into_iter()
                    .map(|i| uncovered[i])
                    .collect();
                let mut ps: Vec<usize> = random_k_subset(rng, covered.len(), y)
                    .into_iter()
                    .map(|i| covered[i])
                    .collect();

                uncovered.retain(|v| !newly.contains(v));
                covered.extend_from_slice(&newly);
                ps.extend(newly);
                ps.sort_unstable();
                parents[node] = ps;
            }
            debug_assert!(uncovered.is_empty());
        }

        Ok(Dag { parents })
    }

    /// Draws the size of every layer, sinks first.
    fn layer_sizes<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<usize>> {
        let (n, c, w) = (self.nodes, self.bound, self.weighting);

        let weights = (1..=n)
            .map(|k| self.counts.sinks(w, n, c, k))
            .collect::<Result<Vec<_>>>()?;
        let mut k = draw_weighted(rng, &weights) + 1;
        let mut sizes = vec![k];
        let mut m = n - k;

        while m > 0 {
            let weights = (1..=m)
                .map(|s| Ok(self.counts.sinks(w, m, c, s)? * self.counts.cover(w, c, k, m, s)?))
                .collect::<Result<Vec<_>>>()?;
            k = draw_weighted(rng, &weights) + 1;
            sizes.push(k);
            m -= k;
        }

        Ok(sizes)
    }

    /// Draws how many parents a node takes among the `uncovered` nodes of the
    /// next layer and among the other `m - uncovered` deeper nodes, given that
    /// `rest` nodes of its layer still follow.
    fn parent_split<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        rest: usize,
        m: usize,
        uncovered: usize,
    ) -> Result<(usize, usize)> {
        let (c, w) = (self.bound, self.weighting);
        let mut choices = Vec::new();
        let mut weights: Vec<BigUint> = Vec::new();
        for x in 0..=uncovered.min(c) {
            let completions = self.counts.cover(w, c, rest, m, uncovered - x)?;
            if completions.is_zero() {
                continue;
            }
            for y in 0..=(m - uncovered).min(c - x) {
                let weight = self.counts.binomial(uncovered, x)
                    * self.counts.binomial(m - uncovered, y)
                    * self.counts.node_weight(w, c, x + y)?
                    * &completions;
                if !weight.is_zero() {
                    choices.push((x, y));
                    weights.push(weight);
                }
            }
        }
        Ok(choices[draw_weighted(rng, &weights)])
    }
}
