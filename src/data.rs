//! Transaction loading and basket encoding

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use ndarray::{Array2, ArrayView1};

use crate::error::MiningError;

/// One line of a transaction export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub item: String,
    pub quantity: u64,
}

impl TransactionRecord {
    pub fn new(transaction_id: impl Into<String>, item: impl Into<String>, quantity: u64) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            item: item.into(),
            quantity,
        }
    }
}

/// Header names of the three columns read from the input CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub transaction_id: String,
    pub item: String,
    pub quantity: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            transaction_id: "Transaction ID".to_string(),
            item: "Product Name".to_string(),
            quantity: "Quantity".to_string(),
        }
    }
}

/// Boolean presence matrix: rows are transactions, columns are items
#[derive(Debug, Clone)]
pub struct BasketMatrix {
    transaction_ids: Vec<String>,
    items: Vec<String>,
    presence: Array2<bool>,
}

impl BasketMatrix {
    pub fn n_transactions(&self) -> usize {
        self.presence.nrows()
    }

    pub fn n_items(&self) -> usize {
        self.presence.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.n_transactions() == 0
    }

    /// Column labels, in column order
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Row labels, in row order
    pub fn transaction_ids(&self) -> &[String] {
        &self.transaction_ids
    }

    pub fn item_index(&self, item: &str) -> Option<usize> {
        self.items.binary_search_by(|probe| probe.as_str().cmp(item)).ok()
    }

    pub fn is_present(&self, row: usize, col: usize) -> bool {
        self.presence[[row, col]]
    }

    pub fn column(&self, col: usize) -> ArrayView1<'_, bool> {
        self.presence.column(col)
    }

    pub fn presence(&self) -> &Array2<bool> {
        &self.presence
    }

    /// Number of transactions containing the item
    pub fn item_count(&self, col: usize) -> usize {
        self.column(col).iter().filter(|&&present| present).count()
    }

    /// Items present in one transaction
    pub fn basket(&self, row: usize) -> Vec<&str> {
        self.presence
            .row(row)
            .iter()
            .zip(self.items.iter())
            .filter(|(present, _)| **present)
            .map(|(_, item)| item.as_str())
            .collect()
    }

    /// Fraction of cells that are true
    pub fn density(&self) -> f64 {
        let cells = self.presence.len();
        if cells == 0 {
            return 0.0;
        }
        self.presence.iter().filter(|&&present| present).count() as f64 / cells as f64
    }
}

/// Coerce a raw quantity field to a non-negative integer.
///
/// Integers and decimals (truncated toward zero) are accepted; anything else,
/// including negative values, becomes 0.
pub fn parse_quantity(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return value.max(0) as u64;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.trunc() as u64,
        _ => 0,
    }
}

/// Load transaction records from a CSV file
///
/// # Arguments
/// * `file_path` - Path to the CSV file
/// * `columns` - Header names of the transaction, item and quantity columns
///
/// # Returns
/// * One record per data row; rows without a transaction id or item are skipped
pub fn load_transactions(
    file_path: impl AsRef<Path>,
    columns: &ColumnNames,
) -> Result<Vec<TransactionRecord>, MiningError> {
    let file_path = file_path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(file_path)?;

    let header_map = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_lowercase(), idx))
        .collect::<HashMap<_, _>>();

    let mut missing = Vec::new();
    let mut lookup = |name: &str| {
        let position = header_map.get(&name.trim().to_lowercase()).copied();
        if position.is_none() {
            missing.push(name.to_string());
        }
        position
    };
    let id_idx = lookup(columns.transaction_id.as_str());
    let item_idx = lookup(columns.item.as_str());
    let qty_idx = lookup(columns.quantity.as_str());

    let (Some(id_idx), Some(item_idx), Some(qty_idx)) = (id_idx, item_idx, qty_idx) else {
        return Err(MiningError::InputShape { missing });
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row?;
        let transaction_id = row.get(id_idx).unwrap_or("").trim();
        let item = row.get(item_idx).unwrap_or("").trim();
        if transaction_id.is_empty() || item.is_empty() {
            skipped += 1;
            continue;
        }
        let quantity = parse_quantity(row.get(qty_idx).unwrap_or(""));
        records.push(TransactionRecord::new(transaction_id, item, quantity));
    }

    if skipped > 0 {
        tracing::debug!(skipped, "skipped rows without transaction id or item");
    }
    tracing::info!(path = %file_path.display(), records = records.len(), "loaded transactions");

    Ok(records)
}

/// Encode transaction records into a basket matrix
///
/// Quantities are summed per (transaction, item) pair and a cell is true when
/// the sum is at least 1. Rows and columns are sorted by label.
pub fn encode(records: &[TransactionRecord]) -> BasketMatrix {
    let mut totals: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    let mut transaction_ids = BTreeSet::new();
    let mut items = BTreeSet::new();

    for record in records {
        transaction_ids.insert(record.transaction_id.as_str());
        items.insert(record.item.as_str());
        let total = totals
            .entry((record.transaction_id.as_str(), record.item.as_str()))
            .or_insert(0);
        *total = total.saturating_add(record.quantity);
    }

    let transaction_ids: Vec<String> = transaction_ids.into_iter().map(str::to_string).collect();
    let items: Vec<String> = items.into_iter().map(str::to_string).collect();

    let mut presence = Array2::from_elem((transaction_ids.len(), items.len()), false);
    for ((transaction_id, item), total) in totals {
        if total < 1 {
            continue;
        }
        // Both keys were collected from the same records, so the searches succeed.
        if let (Ok(row), Ok(col)) = (
            transaction_ids.binary_search_by(|probe| probe.as_str().cmp(transaction_id)),
            items.binary_search_by(|probe| probe.as_str().cmp(item)),
        ) {
            presence[[row, col]] = true;
        }
    }

    tracing::info!(
        transactions = transaction_ids.len(),
        items = items.len(),
        "encoded basket matrix"
    );

    BasketMatrix {
        transaction_ids,
        items,
        presence,
    }
}
