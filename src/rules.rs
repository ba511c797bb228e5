//! Association rule generation from frequent itemsets

use std::fmt;

use crate::apriori::FrequentItemsets;
use crate::config::validate_min_confidence;
use crate::error::MiningError;

/// A directional rule `antecedent -> consequent` with its quality metrics
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRule {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    /// Support of antecedent and consequent together
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    /// Infinite when confidence is 1
    pub conviction: f64,
    pub zhangs_metric: f64,
}

impl AssociationRule {
    /// True for one-item-to-one-item rules
    pub fn is_single_pair(&self) -> bool {
        self.antecedent.len() == 1 && self.consequent.len() == 1
    }

    pub fn antecedent_label(&self) -> String {
        self.antecedent.join(", ")
    }

    pub fn consequent_label(&self) -> String {
        self.consequent.join(", ")
    }
}

impl fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.antecedent_label(), self.consequent_label())
    }
}

/// Generate every rule whose confidence is at least `min_confidence`
///
/// Each frequent itemset of size k >= 2 yields up to 2^k - 2 rules, one per
/// non-empty proper subset taken as antecedent.
pub fn generate_rules(
    itemsets: &FrequentItemsets,
    min_confidence: f64,
) -> Result<Vec<AssociationRule>, MiningError> {
    validate_min_confidence(min_confidence)?;

    let n = itemsets.n_transactions() as f64;
    let mut rules = Vec::new();
    let mut evaluated = 0usize;

    for itemset in itemsets.iter().filter(|itemset| itemset.len() >= 2) {
        let k = itemset.len();
        if k >= u64::BITS as usize {
            return Err(MiningError::InvalidConfig(format!(
                "itemset of {} items is too large to split into rules",
                k
            )));
        }
        let union_count = itemset.count as f64;

        for mask in 1..(1u64 << k) - 1 {
            evaluated += 1;
            let (antecedent, consequent) = split(&itemset.items, mask);
            let antecedent_count = lookup_count(itemsets, &antecedent)?;
            let consequent_count = lookup_count(itemsets, &consequent)?;

            let confidence = union_count / antecedent_count;
            if confidence < min_confidence {
                continue;
            }

            let antecedent_support = antecedent_count / n;
            let consequent_support = consequent_count / n;
            let support = itemset.support;
            let lift = (union_count * n) / (antecedent_count * consequent_count);
            let leverage = support - antecedent_support * consequent_support;
            let conviction = if confidence >= 1.0 {
                f64::INFINITY
            } else {
                (1.0 - consequent_support) / (1.0 - confidence)
            };
            let zhang_denominator = (support * (1.0 - antecedent_support))
                .max(antecedent_support * (consequent_support - support));
            let zhangs_metric = if zhang_denominator == 0.0 {
                0.0
            } else {
                leverage / zhang_denominator
            };

            rules.push(AssociationRule {
                antecedent,
                consequent,
                antecedent_support,
                consequent_support,
                support,
                confidence,
                lift,
                leverage,
                conviction,
                zhangs_metric,
            });
        }
    }

    tracing::info!(
        rules = rules.len(),
        evaluated,
        min_confidence,
        "association rules generated"
    );

    Ok(rules)
}

/// Split items by bitmask: set bits go to the antecedent
fn split(items: &[String], mask: u64) -> (Vec<String>, Vec<String>) {
    let mut antecedent = Vec::new();
    let mut consequent = Vec::new();
    for (bit, item) in items.iter().enumerate() {
        if mask & (1 << bit) != 0 {
            antecedent.push(item.clone());
        } else {
            consequent.push(item.clone());
        }
    }
    (antecedent, consequent)
}

fn lookup_count(itemsets: &FrequentItemsets, items: &[String]) -> Result<f64, MiningError> {
    itemsets
        .count_of(items)
        .map(|count| count as f64)
        .ok_or_else(|| MiningError::IncompleteItemsets(format!("no support for {{{}}}", items.join(", "))))
}
