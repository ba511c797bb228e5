//! Error types for the mining pipeline

use thiserror::Error;

/// Errors emitted by data loading, configuration checks and mining.
///
/// An empty result (no frequent itemsets, no rules) is not an error and is
/// never reported through this type.
#[derive(Debug, Error)]
pub enum MiningError {
    #[error("input is missing required column(s): {}", .missing.join(", "))]
    InputShape { missing: Vec<String> },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("itemset collection is incomplete: {0}")]
    IncompleteItemsets(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
