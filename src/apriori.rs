//! Level-wise frequent itemset mining (Apriori)

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::config::{validate_min_support, MiningConfig};
use crate::data::BasketMatrix;
use crate::error::MiningError;

/// An itemset that met the support threshold
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemset {
    /// Item names in basket-matrix column order
    pub items: Vec<String>,
    /// Number of transactions containing every item
    pub count: usize,
    /// `count` divided by the number of transactions
    pub support: f64,
}

impl FrequentItemset {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items joined with ", "
    pub fn label(&self) -> String {
        self.items.join(", ")
    }
}

/// Result of a mining run, ordered by itemset size and then item order
#[derive(Debug, Clone, Default)]
pub struct FrequentItemsets {
    itemsets: Vec<FrequentItemset>,
    index: HashMap<Vec<String>, usize>,
    n_transactions: usize,
    truncated: bool,
}

impl FrequentItemsets {
    fn new(itemsets: Vec<FrequentItemset>, n_transactions: usize, truncated: bool) -> Self {
        let index = itemsets
            .iter()
            .enumerate()
            .map(|(idx, itemset)| (itemset.items.clone(), idx))
            .collect();
        Self {
            itemsets,
            index,
            n_transactions,
            truncated,
        }
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrequentItemset> {
        self.itemsets.iter()
    }

    pub fn as_slice(&self) -> &[FrequentItemset] {
        &self.itemsets
    }

    /// Number of rows in the matrix the itemsets were mined from
    pub fn n_transactions(&self) -> usize {
        self.n_transactions
    }

    /// True when a time budget stopped the search before it was exhausted
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Size of the largest itemset found
    pub fn max_len(&self) -> usize {
        self.itemsets.iter().map(FrequentItemset::len).max().unwrap_or(0)
    }

    /// Look up an itemset; `items` must be in column order
    pub fn get(&self, items: &[String]) -> Option<&FrequentItemset> {
        self.index.get(items).map(|&idx| &self.itemsets[idx])
    }

    pub fn support_of(&self, items: &[String]) -> Option<f64> {
        self.get(items).map(|itemset| itemset.support)
    }

    pub fn count_of(&self, items: &[String]) -> Option<usize> {
        self.get(items).map(|itemset| itemset.count)
    }

    pub fn of_size(&self, size: usize) -> impl Iterator<Item = &FrequentItemset> {
        self.itemsets.iter().filter(move |itemset| itemset.len() == size)
    }
}

impl<'a> IntoIterator for &'a FrequentItemsets {
    type Item = &'a FrequentItemset;
    type IntoIter = std::slice::Iter<'a, FrequentItemset>;

    fn into_iter(self) -> Self::IntoIter {
        self.itemsets.iter()
    }
}

/// Apriori parameters
#[derive(Debug, Clone)]
pub struct Apriori {
    min_support: f64,
    max_len: Option<usize>,
    time_budget: Option<Duration>,
}

impl Apriori {
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            max_len: None,
            time_budget: None,
        }
    }

    pub fn from_config(config: &MiningConfig) -> Self {
        Self::new(config.min_support)
            .max_len(config.max_len)
            .time_budget(config.time_budget)
    }

    /// Stop after itemsets of this size
    pub fn max_len(mut self, max_len: Option<usize>) -> Self {
        self.max_len = max_len;
        self
    }

    /// Stop starting new levels once this much time has passed
    pub fn time_budget(mut self, time_budget: Option<Duration>) -> Self {
        self.time_budget = time_budget;
        self
    }

    /// Mine all itemsets whose support is at least `min_support`
    ///
    /// Candidates of size k are joined from frequent (k-1)-itemsets sharing
    /// their first k-2 items, and dropped without counting when any of their
    /// (k-1)-subsets is infrequent.
    pub fn mine(&self, matrix: &BasketMatrix) -> Result<FrequentItemsets, MiningError> {
        validate_min_support(self.min_support)?;
        if self.max_len == Some(0) {
            return Err(MiningError::InvalidConfig(
                "max_len must be at least 1".to_string(),
            ));
        }

        let n_transactions = matrix.n_transactions();
        if n_transactions == 0 {
            tracing::info!("no transactions to mine");
            return Ok(FrequentItemsets::new(Vec::new(), 0, false));
        }

        let started = Instant::now();
        let meets_threshold =
            |count: usize| count as f64 / n_transactions as f64 >= self.min_support;

        let mut level: Vec<(Vec<usize>, usize)> = (0..matrix.n_items())
            .filter_map(|col| {
                let count = matrix.item_count(col);
                meets_threshold(count).then(|| (vec![col], count))
            })
            .collect();
        tracing::debug!(
            size = 1,
            candidates = matrix.n_items(),
            frequent = level.len(),
            "mined level"
        );

        let mut found = Vec::new();
        let mut size = 1;
        let mut truncated = false;
        while !level.is_empty() {
            found.extend(level.iter().cloned());

            if self.max_len.is_some_and(|max_len| size >= max_len) {
                break;
            }
            if let Some(budget) = self.time_budget {
                if started.elapsed() >= budget {
                    tracing::warn!(
                        completed_size = size,
                        budget_ms = budget.as_millis() as u64,
                        "time budget exhausted, returning completed levels"
                    );
                    truncated = true;
                    break;
                }
            }

            size += 1;
            let (candidates, pruned) = generate_candidates(&level);
            let candidate_count = candidates.len();
            level = candidates
                .into_iter()
                .filter_map(|candidate| {
                    let count = count_support(matrix, &candidate);
                    meets_threshold(count).then_some((candidate, count))
                })
                .collect();
            tracing::debug!(
                size,
                candidates = candidate_count,
                pruned,
                frequent = level.len(),
                "mined level"
            );
        }

        let itemsets: Vec<FrequentItemset> = found
            .into_iter()
            .map(|(cols, count)| FrequentItemset {
                items: cols.iter().map(|&col| matrix.items()[col].clone()).collect(),
                count,
                support: count as f64 / n_transactions as f64,
            })
            .collect();

        tracing::info!(
            itemsets = itemsets.len(),
            min_support = self.min_support,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "frequent itemsets mined"
        );

        Ok(FrequentItemsets::new(itemsets, n_transactions, truncated))
    }
}

/// Mine frequent itemsets with no size or time limit
pub fn mine(matrix: &BasketMatrix, min_support: f64) -> Result<FrequentItemsets, MiningError> {
    Apriori::new(min_support).mine(matrix)
}

/// Join frequent (k-1)-itemsets into k-candidates and prune those with an
/// infrequent subset. `level` must be sorted lexicographically; the output is
/// too. Returns the candidates and the number pruned.
fn generate_candidates(level: &[(Vec<usize>, usize)]) -> (Vec<Vec<usize>>, usize) {
    let known: HashSet<&[usize]> = level.iter().map(|(cols, _)| cols.as_slice()).collect();
    let mut candidates = Vec::new();
    let mut pruned = 0;

    for (i, (left, _)) in level.iter().enumerate() {
        let prefix = &left[..left.len() - 1];
        for (right, _) in &level[i + 1..] {
            if &right[..right.len() - 1] != prefix {
                break;
            }
            let mut candidate = left.clone();
            candidate.push(right[right.len() - 1]);
            if has_infrequent_subset(&candidate, &known) {
                pruned += 1;
            } else {
                candidates.push(candidate);
            }
        }
    }

    (candidates, pruned)
}

fn has_infrequent_subset(candidate: &[usize], known: &HashSet<&[usize]>) -> bool {
    // Dropping either of the last two items gives back the joined parents.
    (0..candidate.len().saturating_sub(2)).any(|skip| {
        let subset: Vec<usize> = candidate
            .iter()
            .enumerate()
            .filter(|&(idx, _)| idx != skip)
            .map(|(_, &col)| col)
            .collect();
        !known.contains(subset.as_slice())
    })
}

fn count_support(matrix: &BasketMatrix, candidate: &[usize]) -> usize {
    matrix
        .presence()
        .outer_iter()
        .filter(|row| candidate.iter().all(|&col| row[col]))
        .count()
}
