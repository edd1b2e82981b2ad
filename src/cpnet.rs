//! CP-nets: a dependency DAG over features plus one CPT per feature.
//!
//! # Examples
//!
//! ```
//! use gencpnet::cpnet::{CpNet, CpNode};
//! use gencpnet::cpt::Cpt;
//! use gencpnet::domain::Domain;
//! use gencpnet::outcome::Outcome;
//!
//! // x0 prefers 0; x1 agrees with x0.
//! let root = CpNode::new(0, vec![], Cpt::new(2, 0, vec![Some(vec![0, 1])]).unwrap());
//! let child = CpNode::new(1, vec![0], Cpt::new(2, 1, vec![Some(vec![0, 1]), Some(vec![1, 0])]).unwrap());
//! let net = CpNet::new(Domain::new(2, 2), vec![root, child]).unwrap();
//!
//! let a = Outcome::from([1, 1]);
//! let b = Outcome::from([1, 0]);
//! assert_eq!(net.dominates(&a, &b).unwrap(), Some(true));
//! assert_eq!(net.worsening_flips(&a).unwrap(), vec![Outcome::from([1, 0])]);
//! ```

use std::fmt;

use log::info;
use rand::Rng;

use crate::cpt::{Cpt, CptBuilder};
use crate::domain::Domain;
use crate::error::{config_error, Error, Result};
use crate::outcome::Outcome;
use crate::sampler::{Dag, DagSampler};

/// A single feature together with its parents and its table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CpNode {
    feature: usize,
    parents: Vec<usize>,
    cpt: Cpt,
}

impl CpNode {
    /// Creates a node. The parent order defines the CPT key order.
    ///
    /// # Panics
    ///
    /// Panics if the table indegree differs from the number of parents.
    pub fn new(feature: usize, parents: Vec<usize>, cpt: Cpt) -> Self {
        assert_eq!(
            parents.len(),
            cpt.indegree(),
            "Node {} has {} parents but its CPT has indegree {}",
            feature,
            parents.len(),
            cpt.indegree()
        );
        CpNode { feature, parents, cpt }
    }

    pub fn feature(&self) -> usize {
        self.feature
    }

    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    pub fn indegree(&self) -> usize {
        self.parents.len()
    }

    pub fn cpt(&self) -> &Cpt {
        &self.cpt
    }

    /// The order applicable to `outcome`, or `None` if its row is missing.
    ///
    /// # Panics
    ///
    /// Panics if `outcome` has no value, or an out-of-range value, for a parent.
    pub fn row_for(&self, outcome: &Outcome) -> Option<&[usize]> {
        self.cpt.row(&outcome.project(&self.parents))
    }

    /// Whether `a` is preferred to `b` at this node.
    ///
    /// The outcomes must differ in exactly this node's feature. Returns
    /// `Ok(None)` when the applicable row is missing.
    pub fn dominates(&self, a: &Outcome, b: &Outcome) -> Result<Option<bool>> {
        self.check_outcome(a)?;
        self.check_outcome(b)?;
        let differing = a.differing_features(b);
        if differing != [self.feature] {
            return Err(Error::InvalidComparison {
                feature: Some(self.feature),
                differing,
            });
        }
        let key = a.project(&self.parents);
        Ok(self.cpt.prefers(&key, a.value_at(self.feature), b.value_at(self.feature)))
    }

    /// Values of this feature ranked strictly below the current one in `outcome`.
    pub fn worsening_flips(&self, outcome: &Outcome) -> Result<Vec<usize>> {
        self.check_outcome(outcome)?;
        let key = outcome.project(&self.parents);
        Ok(self.cpt.worse_than(&key, outcome.value_at(self.feature)).to_vec())
    }

    /// Every feature the node reads must carry an in-range value.
    fn check_outcome(&self, outcome: &Outcome) -> Result<()> {
        let d = self.cpt.domain_size();
        for &feature in std::iter::once(&self.feature).chain(&self.parents) {
            match outcome.values().get(feature) {
                Some(&value) if value < d => {}
                value => {
                    return Err(Error::InvalidOutcome {
                        feature,
                        value: value.copied(),
                    })
                }
            }
        }
        Ok(())
    }
}

/// An acyclic CP-net.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CpNet {
    domain: Domain,
    nodes: Vec<CpNode>,
}

impl CpNet {
    /// Assembles a net, checking that node `i` describes feature `i`, that
    /// tables match the domain and that the parent relation is acyclic.
    ///
    /// Tables must be non-degenerate, and a root table must carry its order.
    pub fn new(domain: Domain, nodes: Vec<CpNode>) -> Result<Self> {
        if nodes.len() != domain.features() {
            return Err(config_error(format!(
                "expected {} nodes, got {}",
                domain.features(),
                nodes.len()
            )));
        }
        for (i, node) in nodes.iter().enumerate() {
            if node.feature != i {
                return Err(config_error(format!("node {} describes feature {}", i, node.feature)));
            }
            if node.cpt.domain_size() != domain.domain_size() {
                return Err(config_error(format!(
                    "CPT of feature {} has domain size {}, expected {}",
                    i,
                    node.cpt.domain_size(),
                    domain.domain_size()
                )));
            }
            if node.parents.iter().any(|&p| p >= nodes.len() || p == i) {
                return Err(config_error(format!("invalid parents {:?} of feature {}", node.parents, i)));
            }
            if node.cpt.is_degenerate() {
                let ignored: Vec<usize> = node.cpt.vacuous_parents().iter().map(|&p| node.parents[p]).collect();
                return Err(config_error(format!("CPT of feature {} ignores parents {:?}", i, ignored)));
            }
            if node.parents.is_empty() && node.cpt.present_rows() == 0 {
                return Err(config_error(format!("CPT of root feature {} has no order", i)));
            }
        }
        let net = CpNet { domain, nodes };
        if !net.dag().is_acyclic() {
            return Err(config_error("parent relation has a cycle"));
        }
        Ok(net)
    }

    /// Draws a random CP-net: a structure from `sampler`, then one table per node.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, sampler: &DagSampler, builder: &CptBuilder) -> Result<Self> {
        let dag = sampler.sample(rng)?;
        let domain = Domain::new(dag.nodes(), sampler.counts().domain_size());
        let mut nodes = Vec::with_capacity(dag.nodes());
        for feature in 0..dag.nodes() {
            let parents = dag.parents(feature).to_vec();
            let cpt = builder.build(rng, feature, parents.len())?;
            nodes.push(CpNode { feature, parents, cpt });
        }
        let net = CpNet { domain, nodes };
        info!(
            "Generated CP-net: {} features, {} edges, indegrees {:?}",
            net.features(),
            net.edges().len(),
            net.indegree_histogram()
        );
        Ok(net)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn features(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[CpNode] {
        &self.nodes
    }

    pub fn node(&self, feature: usize) -> &CpNode {
        &self.nodes[feature]
    }

    /// The dependency graph.
    pub fn dag(&self) -> Dag {
        Dag::with_parents(self.nodes.iter().map(|node| node.parents.clone()).collect())
    }

    /// All `(parent, child)` edges, ordered by child.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.nodes
            .iter()
            .flat_map(|node| node.parents.iter().map(move |&p| (p, node.feature)))
            .collect()
    }

    /// `histogram[k]` is the number of nodes with exactly `k` parents.
    pub fn indegree_histogram(&self) -> Vec<usize> {
        let max = self.nodes.iter().map(|node| node.indegree()).max().unwrap_or(0);
        let mut histogram = vec![0; max + 1];
        for node in &self.nodes {
            histogram[node.indegree()] += 1;
        }
        histogram
    }

    /// Whether `a` is preferred to `b` by a single flip.
    ///
    /// The outcomes must be members of the domain and differ in exactly one
    /// feature; the query is delegated to that feature's node.
    pub fn dominates(&self, a: &Outcome, b: &Outcome) -> Result<Option<bool>> {
        self.check_member(a)?;
        self.check_member(b)?;
        let differing = a.differing_features(b);
        if differing.len() == 1 {
            return self.nodes[differing[0]].dominates(a, b);
        }
        Err(Error::InvalidComparison {
            feature: None,
            differing,
        })
    }

    /// Outcomes reachable from `outcome` by one worsening flip, in feature
    /// order and then in preference order.
    pub fn worsening_flips(&self, outcome: &Outcome) -> Result<Vec<Outcome>> {
        self.check_member(outcome)?;
        let mut flips = Vec::new();
        for node in &self.nodes {
            for v in node.worsening_flips(outcome)? {
                flips.push(outcome.with_value(node.feature, v));
            }
        }
        Ok(flips)
    }

    /// Reports the first feature at which `outcome` leaves the domain.
    fn check_member(&self, outcome: &Outcome) -> Result<()> {
        if self.domain.is_member(outcome) {
            return Ok(());
        }
        let n = self.domain.features();
        let d = self.domain.domain_size();
        let feature = (0..n)
            .find(|&f| outcome.values().get(f).map_or(true, |&v| v >= d))
            .unwrap_or(n);
        Err(Error::InvalidOutcome {
            feature,
            value: outcome.values().get(feature).copied(),
        })
    }
}

impl fmt::Display for CpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "x{} <- {:?}", node.feature, node.parents)?;
            for line in node.cpt.to_string().lines() {
                writeln!(f, "  {}", line)?;
            }
        }
        Ok(())
    }
}
