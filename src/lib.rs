//! # gencpnet: uniform random generation of acyclic CP-nets
//!
//! **`gencpnet`** draws acyclic CP-nets (conditional preference networks) over
//! features with a homogeneous finite domain, exactly uniformly at random, for
//! use in dominance-testing experiments.
//!
//! ## What is a CP-net?
//!
//! A CP-net is a directed acyclic graph over features in which every feature
//! carries a *conditional preference table* (CPT): for each assignment of its
//! parents' values, a total order over the feature's own values. A row may be
//! missing, in which case the preference under that context is unknown.
//!
//! ## How generation works
//!
//! - The counting engine ([`count::NetCount`]) computes, with arbitrary
//!   precision, how many bounded-indegree DAGs (and CP-nets built on them)
//!   exist for the given parameters.
//! - The structural sampler ([`sampler::DagSampler`]) uses these counts as
//!   weights, so each structure is drawn with its exact probability and no
//!   draw is rejected.
//! - The CPT builder ([`cpt::CptBuilder`]) fills in one table per feature,
//!   redrawing any table whose declared parents are not all actually used.
//!
//! ## Basic Usage
//!
//! ```rust
//! use gencpnet::generator::{count_structures, Generator, GeneratorConfig};
//! use gencpnet::outcome::Outcome;
//!
//! // Three binary features, at most one parent each.
//! assert_eq!(count_structures(3, 1).to_string(), "16");
//!
//! let mut config = GeneratorConfig::new(3);
//! config.indegree_bound = 1;
//! config.seed = Some(42);
//! let mut generator = Generator::new(config).unwrap();
//! let net = generator.generate_one().unwrap();
//!
//! // Worsening flips agree with single-flip dominance.
//! let a = Outcome::from([0, 0, 0]);
//! for b in net.worsening_flips(&a).unwrap() {
//!     assert_eq!(net.dominates(&a, &b).unwrap(), Some(true));
//! }
//! ```
//!
//! ## Core Components
//!
//! - **[`count`]**: exact counting of DAGs and CP-nets.
//! - **[`sampler`]**: uniform DAG sampling.
//! - **[`cpt`]**: conditional preference tables and their builder.
//! - **[`cpnet`]**: CP-nets and dominance queries.
//! - **[`domain`]**, **[`outcome`]**: the outcome space.
//! - **[`generator`]**: configuration and generation entry points.
//! - **[`xml`]**, **[`dot`]**: export formats.

pub mod count;
pub mod cpnet;
pub mod cpt;
pub mod domain;
pub mod dot;
pub mod error;
pub mod generator;
pub mod outcome;
pub mod sampler;
pub mod utils;
pub mod xml;
