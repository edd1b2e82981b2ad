//! Error type shared by the generator, the counting engine and the queries.

use std::fmt;

/// Errors reported by the library.
///
/// Incomparability of two outcomes is not an error: queries return `Ok(None)`
/// when the applicable CPT row is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Parameters rejected before any generation work starts.
    Config(String),
    /// Dominance query on outcomes that do not differ in exactly the node's feature.
    InvalidComparison {
        /// Feature of the node that was queried (or `None` for a net-level query).
        feature: Option<usize>,
        /// Features on which the two outcomes differ.
        differing: Vec<usize>,
    },
    /// Outcome with no value, or an out-of-range value, for a feature a query reads.
    InvalidOutcome { feature: usize, value: Option<usize> },
    /// No non-degenerate CPT was found within the retry cap.
    GenerationExhausted {
        feature: usize,
        indegree: usize,
        attempts: usize,
    },
    /// The exact CPT multiplicity under incompleteness would require enumerating
    /// presence patterns of a sub-table with too many rows.
    IntractableCount { indegree: usize, cells: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidComparison {
                feature: Some(feature),
                differing,
            } => write!(
                f,
                "Invalid comparison at feature {}: outcomes differ on {:?}",
                feature, differing
            ),
            Error::InvalidComparison { feature: None, differing } => write!(
                f,
                "Invalid comparison: outcomes must differ on exactly one feature, got {:?}",
                differing
            ),
            Error::InvalidOutcome { feature, value: Some(value) } => {
                write!(f, "Outcome assigns value {} to feature {}, outside the domain", value, feature)
            }
            Error::InvalidOutcome { feature, value: None } => {
                write!(f, "Outcome has no value for feature {}", feature)
            }
            Error::GenerationExhausted {
                feature,
                indegree,
                attempts,
            } => write!(
                f,
                "No non-degenerate CPT for feature {} (indegree {}) after {} attempts",
                feature, indegree, attempts
            ),
            Error::IntractableCount { indegree, cells } => write!(
                f,
                "Cannot count incomplete CPTs with {} parents exactly: sub-table of {} rows is too large",
                indegree, cells
            ),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for [`Error::Config`].
pub(crate) fn config_error(msg: impl Into<String>) -> Error {
    Error::Config(msg.into())
}
