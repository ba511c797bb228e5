//! End-to-end mining entry points

use std::path::Path;

use crate::apriori::{Apriori, FrequentItemsets};
use crate::config::MiningConfig;
use crate::data::{encode, load_transactions, BasketMatrix, ColumnNames, TransactionRecord};
use crate::error::MiningError;
use crate::report::high_confidence;
use crate::rules::{generate_rules, AssociationRule};

/// Everything produced by one mining run
#[derive(Debug, Clone)]
pub struct Analysis {
    pub matrix: BasketMatrix,
    pub itemsets: FrequentItemsets,
    pub rules: Vec<AssociationRule>,
}

impl Analysis {
    /// Rules above the fixed display threshold
    pub fn high_confidence_rules(&self) -> Vec<&AssociationRule> {
        high_confidence(&self.rules)
    }

    /// True when no rule passed the confidence threshold
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Encode, mine and generate rules from in-memory records
pub fn run(records: &[TransactionRecord], config: &MiningConfig) -> Result<Analysis, MiningError> {
    config.validate()?;

    let matrix = encode(records);
    let itemsets = Apriori::from_config(config).mine(&matrix)?;
    let rules = generate_rules(&itemsets, config.min_confidence)?;

    Ok(Analysis {
        matrix,
        itemsets,
        rules,
    })
}

/// Load a transaction CSV and run the full pipeline on it
///
/// The configuration is checked before the file is opened.
pub fn analyze(
    file_path: impl AsRef<Path>,
    columns: &ColumnNames,
    config: &MiningConfig,
) -> Result<Analysis, MiningError> {
    config.validate()?;
    let records = load_transactions(file_path, columns)?;
    run(&records, config)
}
