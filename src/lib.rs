//! BasketForge: A Rust CLI application for market basket analysis
//!
//! This library turns transaction line items into a basket matrix, mines
//! frequent itemsets with the Apriori algorithm and derives association rules
//! scored by support, confidence and lift.

pub mod apriori;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod viz;

// Re-export public items for easier access
pub use apriori::{mine, Apriori, FrequentItemset, FrequentItemsets};
pub use cli::Args;
pub use config::MiningConfig;
pub use data::{encode, load_transactions, parse_quantity, BasketMatrix, ColumnNames, TransactionRecord};
pub use error::MiningError;
pub use pipeline::{analyze, run, Analysis};
pub use report::{rank_rules, RankBy, HIGH_CONFIDENCE_THRESHOLD};
pub use rules::{generate_rules, AssociationRule};
pub use viz::create_support_chart;

/// Common result type used by the binary and chart rendering
pub type Result<T> = anyhow::Result<T>;
