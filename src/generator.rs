//! Generation entry points.
//!
//! [`Generator`] owns everything one generation run needs: the counting engine
//! (whose memo tables are shared by every net it draws), the outcome domain and
//! a seeded random number generator.
//!
//! ```
//! use gencpnet::generator::{Generator, GeneratorConfig};
//!
//! let mut config = GeneratorConfig::new(4);
//! config.indegree_bound = 2;
//! config.seed = Some(7);
//! config.count = 3;
//!
//! let mut generator = Generator::new(config).unwrap();
//! let nets = generator.generate().unwrap();
//! assert_eq!(nets.len(), 3);
//! assert!(nets.iter().all(|net| net.features() == 4));
//! ```

use log::{debug, info, warn};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::count::{effective_bound, Count, NetCount, Weighting};
use crate::cpnet::CpNet;
use crate::cpt::{table_rows, CptBuilder, DEFAULT_MAX_ATTEMPTS};
use crate::domain::Domain;
use crate::error::{config_error, Error, Result};
use crate::outcome::Outcome;
use crate::sampler::DagSampler;

/// Largest supported number of features.
pub const MAX_FEATURES: usize = 63;

/// Largest supported domain size (`d!` must fit in 64 bits).
pub const MAX_DOMAIN_SIZE: usize = 20;

/// Parameters of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of features `n`.
    pub features: usize,
    /// Bound `c` on the number of parents of every node.
    pub indegree_bound: usize,
    /// Homogeneous domain size `d`.
    pub domain_size: usize,
    /// Probability `i` that a CPT row is missing.
    pub incompleteness: f64,
    /// Number of nets `g` returned by [`Generator::generate`].
    pub count: usize,
    pub weighting: Weighting,
    /// Cap on CPT draws per node, `None` for no cap.
    pub max_cpt_attempts: Option<usize>,
    /// Seed for reproducible runs; fresh entropy when `None`.
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    pub fn new(features: usize) -> Self {
        Self {
            features,
            indegree_bound: 5,
            domain_size: 2,
            incompleteness: 0.0,
            count: 1,
            weighting: Weighting::CpNet,
            max_cpt_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            seed: None,
        }
    }

    /// Indegree bound after clamping to `n - 1`.
    pub fn effective_bound(&self) -> usize {
        effective_bound(self.features, self.indegree_bound)
    }

    /// Checks every parameter before any work is done.
    pub fn validate(&self) -> Result<()> {
        if self.features == 0 || self.features > MAX_FEATURES {
            return Err(config_error(format!(
                "number of nodes must be in range [1, {}], got {}",
                MAX_FEATURES, self.features
            )));
        }
        if self.domain_size == 0 || self.domain_size > MAX_DOMAIN_SIZE {
            return Err(config_error(format!(
                "domain size must be in range [1, {}], got {}",
                MAX_DOMAIN_SIZE, self.domain_size
            )));
        }
        if !self.incompleteness.is_finite() || !(0.0..1.0).contains(&self.incompleteness) {
            return Err(config_error(format!(
                "degree of incompleteness must be in range [0.0, 1.0), got {}",
                self.incompleteness
            )));
        }
        table_rows(self.domain_size, self.effective_bound())?;
        if self.max_cpt_attempts == Some(0) {
            return Err(config_error("CPT retry cap must be at least 1"));
        }
        Ok(())
    }
}

/// Draws CP-nets and outcome pairs for one configuration.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    counts: NetCount,
    domain: Domain,
    builder: CptBuilder,
    rng: ChaCha8Rng,
}

impl Generator {
    /// Validates `config` and prepares the counting tables.
    ///
    /// When the CPT multiplicities cannot be counted exactly (incomplete tables
    /// whose sub-tables are too large to enumerate), CP-net weighting falls back
    /// to [`Weighting::Structure`] and [`config`](Self::config) reflects it.
    pub fn new(mut config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let counts = NetCount::new(config.domain_size, config.incompleteness)?;
        if config.weighting == Weighting::CpNet {
            match counts.cpt_multiplicity(config.effective_bound()) {
                Ok(_) => {}
                Err(Error::IntractableCount { indegree, cells }) => {
                    warn!(
                        "Cannot weight CP-nets exactly: CPTs with {} parents need a {}-row sub-table; \
                         drawing structures uniformly instead",
                        indegree, cells
                    );
                    config.weighting = Weighting::Structure;
                }
                Err(e) => return Err(e),
            }
        }
        let domain = Domain::new(config.features, config.domain_size);
        let builder = CptBuilder::new(config.domain_size, config.incompleteness).with_max_attempts(config.max_cpt_attempts);
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        info!(
            "Generator: n = {}, c = {}, d = {}, i = {}, weighting {:?}",
            config.features,
            config.effective_bound(),
            config.domain_size,
            config.incompleteness,
            config.weighting
        );
        Ok(Self {
            config,
            counts,
            domain,
            builder,
            rng,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn counts(&self) -> &NetCount {
        &self.counts
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Draws one CP-net.
    pub fn generate_one(&mut self) -> Result<CpNet> {
        let sampler = DagSampler::new(
            &self.counts,
            self.config.features,
            self.config.indegree_bound,
            self.config.weighting,
        );
        CpNet::random(&mut self.rng, &sampler, &self.builder)
    }

    /// Draws `count` independent CP-nets.
    pub fn generate(&mut self) -> Result<Vec<CpNet>> {
        let nets = (0..self.config.count)
            .map(|_| self.generate_one())
            .collect::<Result<Vec<_>>>()?;
        debug!("generate: {} memo entries after {} nets", self.counts.memo_entries(), nets.len());
        Ok(nets)
    }

    /// Draws a pair of distinct outcomes at the given Hamming distance (`0` for any).
    pub fn generate_pair(&mut self, hamming_distance: usize) -> Result<(Outcome, Outcome)> {
        self.domain.generate_pair(&mut self.rng, hamming_distance)
    }
}

/// Generates `config.count` CP-nets.
pub fn generate(config: GeneratorConfig) -> Result<Vec<CpNet>> {
    Generator::new(config)?.generate()
}

/// Number of DAGs on `n` labeled nodes with indegree at most `c`.
pub fn count_structures(features: usize, indegree_bound: usize) -> BigUint {
    NetCount::default().count_bounded_ldag(features, indegree_bound)
}

/// Weighted number of CP-nets for the given parameters.
///
/// With zero incompleteness this is the exact number of CP-nets.
pub fn count_cpnets(features: usize, indegree_bound: usize, domain_size: usize, incompleteness: f64) -> Result<Count> {
    NetCount::new(domain_size, incompleteness)?.count_cpnet(features, indegree_bound)
}
