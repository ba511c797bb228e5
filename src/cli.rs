//! Command-line interface definitions and argument parsing

use std::time::Duration;

use clap::Parser;

use crate::config::{MiningConfig, DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_SUPPORT};
use crate::data::ColumnNames;
use crate::report::RankBy;

/// Market basket analysis CLI: frequent itemsets and association rules
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "market_data.csv")]
    pub input: String,

    /// Minimum support for frequent itemsets, in (0, 1]
    #[arg(short = 's', long, default_value_t = DEFAULT_MIN_SUPPORT)]
    pub min_support: f64,

    /// Minimum confidence for association rules, in [0, 1]
    #[arg(short = 'c', long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
    pub min_confidence: f64,

    /// Largest itemset size to mine
    #[arg(long)]
    pub max_len: Option<usize>,

    /// Stop starting new mining levels after this many milliseconds
    #[arg(long)]
    pub time_budget_ms: Option<u64>,

    /// Metric used to rank printed rules
    #[arg(long, value_enum, default_value_t = RankBy::Confidence)]
    pub rank_by: RankBy,

    /// Print at most this many rules per table
    #[arg(long)]
    pub top: Option<usize>,

    /// Output path for the support chart
    #[arg(short, long, default_value = "itemset_support.png")]
    pub output: String,

    /// Skip drawing the support chart
    #[arg(long)]
    pub no_plot: bool,

    /// Header of the transaction id column
    #[arg(long, default_value = "Transaction ID")]
    pub transaction_column: String,

    /// Header of the item name column
    #[arg(long, default_value = "Product Name")]
    pub item_column: String,

    /// Header of the quantity column
    #[arg(long, default_value = "Quantity")]
    pub quantity_column: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Thresholds and limits for the mining run
    pub fn mining_config(&self) -> MiningConfig {
        MiningConfig {
            min_support: self.min_support,
            min_confidence: self.min_confidence,
            max_len: self.max_len,
            time_budget: self.time_budget_ms.map(Duration::from_millis),
        }
    }

    pub fn column_names(&self) -> ColumnNames {
        ColumnNames {
            transaction_id: self.transaction_column.clone(),
            item: self.item_column.clone(),
            quantity: self.quantity_column.clone(),
        }
    }

    /// Reject option combinations that make no sense before any work starts
    pub fn check(&self) -> crate::Result<()> {
        if self.top == Some(0) {
            anyhow::bail!("--top must be at least 1");
        }
        if !self.no_plot && !self.output.to_lowercase().ends_with(".png") {
            anyhow::bail!("Output path must end with .png: {}", self.output);
        }
        self.mining_config().validate()?;
        Ok(())
    }
}
