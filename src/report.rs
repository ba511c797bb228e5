//! Rule ranking and console reporting

use std::cmp::Ordering;
use std::fmt::Write;

use clap::ValueEnum;

use crate::apriori::{FrequentItemset, FrequentItemsets};
use crate::pipeline::Analysis;
use crate::rules::AssociationRule;

/// Rules above this confidence are called out separately (strictly greater)
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Metric used to order rules for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RankBy {
    #[default]
    Confidence,
    Support,
    Lift,
}

impl RankBy {
    fn key(self, rule: &AssociationRule) -> [f64; 3] {
        match self {
            RankBy::Confidence => [rule.confidence, rule.support, rule.lift],
            RankBy::Support => [rule.support, rule.confidence, rule.lift],
            RankBy::Lift => [rule.lift, rule.confidence, rule.support],
        }
    }
}

/// Rules with confidence above [`HIGH_CONFIDENCE_THRESHOLD`], in input order
pub fn high_confidence(rules: &[AssociationRule]) -> Vec<&AssociationRule> {
    rules
        .iter()
        .filter(|rule| rule.confidence > HIGH_CONFIDENCE_THRESHOLD)
        .collect()
}

/// Sort rules descending by the chosen metric
///
/// Ties fall back to the remaining metrics and then to the rule text, so the
/// order is stable across runs.
pub fn rank_rules<'a, I>(rules: I, rank_by: RankBy) -> Vec<&'a AssociationRule>
where
    I: IntoIterator<Item = &'a AssociationRule>,
{
    let mut ranked: Vec<&AssociationRule> = rules.into_iter().collect();
    ranked.sort_by(|a, b| {
        let (ka, kb) = (rank_by.key(a), rank_by.key(b));
        ka.iter()
            .zip(kb.iter())
            .map(|(x, y)| y.total_cmp(x))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.antecedent.cmp(&b.antecedent))
            .then_with(|| a.consequent.cmp(&b.consequent))
    });
    ranked
}

/// Merchandising advice for a one-item-to-one-item rule
pub fn suggestion(rule: &AssociationRule) -> Option<String> {
    if !rule.is_single_pair() {
        return None;
    }
    Some(format!(
        "Customers who buy {} are likely to also purchase {}. Consider bundling these items \
         together or placing them adjacent in displays to increase sales.",
        rule.antecedent[0], rule.consequent[0]
    ))
}

/// Render rules as a fixed-width text table
pub fn format_rule_table(rules: &[&AssociationRule]) -> String {
    let antecedent_width = rules
        .iter()
        .map(|rule| rule.antecedent_label().len())
        .max()
        .unwrap_or(0)
        .max("antecedents".len());
    let consequent_width = rules
        .iter()
        .map(|rule| rule.consequent_label().len())
        .max()
        .unwrap_or(0)
        .max("consequents".len());

    let mut table = String::new();
    let _ = writeln!(
        table,
        "  {:<aw$} | {:<cw$} | {:>7} | {:>10} | {:>6} | {:>8} | {:>10}",
        "antecedents",
        "consequents",
        "support",
        "confidence",
        "lift",
        "leverage",
        "conviction",
        aw = antecedent_width,
        cw = consequent_width,
    );
    let _ = writeln!(
        table,
        "  {}-|-{}-|-{}-|-{}-|-{}-|-{}-|-{}",
        "-".repeat(antecedent_width),
        "-".repeat(consequent_width),
        "-".repeat(7),
        "-".repeat(10),
        "-".repeat(6),
        "-".repeat(8),
        "-".repeat(10),
    );
    for rule in rules {
        let conviction = if rule.conviction.is_infinite() {
            "inf".to_string()
        } else {
            format!("{:.3}", rule.conviction)
        };
        let _ = writeln!(
            table,
            "  {:<aw$} | {:<cw$} | {:>7.3} | {:>10.3} | {:>6.3} | {:>8.4} | {:>10}",
            rule.antecedent_label(),
            rule.consequent_label(),
            rule.support,
            rule.confidence,
            rule.lift,
            rule.leverage,
            conviction,
            aw = antecedent_width,
            cw = consequent_width,
        );
    }
    table
}

/// Itemsets sorted by support, highest first, then by size and item order
pub fn rank_itemsets(itemsets: &FrequentItemsets) -> Vec<&FrequentItemset> {
    let mut ranked: Vec<&FrequentItemset> = itemsets.iter().collect();
    // Stable sort keeps mining order among equal supports
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Print frequent itemsets to stdout
pub fn print_itemset_summary(itemsets: &FrequentItemsets, top: Option<usize>) {
    println!("\n=== Frequent Itemsets ===");
    if itemsets.is_empty() {
        println!("No frequent itemsets found.");
        return;
    }

    println!(
        "{} itemsets over {} transactions (largest size {})",
        itemsets.len(),
        itemsets.n_transactions(),
        itemsets.max_len()
    );
    println!("  Support | Count | Itemset");
    println!("  --------|-------|--------");
    for itemset in rank_itemsets(itemsets)
        .into_iter()
        .take(top.unwrap_or(usize::MAX))
    {
        println!(
            "  {:7.3} | {:5} | {}",
            itemset.support,
            itemset.count,
            itemset.label()
        );
    }
}

/// Print the rule report to stdout
pub fn print_report(analysis: &Analysis, rank_by: RankBy, top: Option<usize>) {
    if analysis.rules.is_empty() {
        println!("No association rules found.");
        return;
    }

    let limit = top.unwrap_or(usize::MAX);

    let high = rank_rules(analysis.high_confidence_rules(), rank_by);
    println!(
        "High confidence rules (confidence > {}): {}",
        HIGH_CONFIDENCE_THRESHOLD,
        high.len()
    );
    if high.is_empty() {
        println!("  (none)");
    } else {
        let shown: Vec<&AssociationRule> = high.iter().copied().take(limit).collect();
        print!("{}", format_rule_table(&shown));
    }

    let all = rank_rules(&analysis.rules, rank_by);
    println!("\nAll association rules: {}", all.len());
    let shown: Vec<&AssociationRule> = all.into_iter().take(limit).collect();
    print!("{}", format_rule_table(&shown));

    let suggestions: Vec<String> = high.iter().filter_map(|rule| suggestion(rule)).collect();
    if !suggestions.is_empty() {
        println!("\nMerchandising suggestions:");
        for message in suggestions.iter().take(limit) {
            println!("  - {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(antecedent: &[&str], consequent: &[&str], support: f64, confidence: f64, lift: f64) -> AssociationRule {
        AssociationRule {
            antecedent: antecedent.iter().map(|s| s.to_string()).collect(),
            consequent: consequent.iter().map(|s| s.to_string()).collect(),
            antecedent_support: support / confidence,
            consequent_support: confidence / lift,
            support,
            confidence,
            lift,
            leverage: 0.0,
            conviction: 1.0,
            zhangs_metric: 0.0,
        }
    }

    fn sample_rules() -> Vec<AssociationRule> {
        vec![
            rule(&["bread"], &["milk"], 0.5, 0.5, 0.9),
            rule(&["eggs"], &["milk"], 0.5, 1.0, 1.3),
            rule(&["bread", "eggs"], &["milk"], 0.25, 0.8, 1.1),
            rule(&["milk"], &["eggs"], 0.5, 0.6, 1.3),
        ]
    }

    #[test]
    fn test_high_confidence_is_strict() {
        let rules = sample_rules();
        let high = high_confidence(&rules);
        let labels: Vec<String> = high.iter().map(|rule| rule.to_string()).collect();
        assert_eq!(labels, vec!["eggs -> milk", "bread, eggs -> milk", "milk -> eggs"]);
    }

    #[test]
    fn test_rank_by_each_metric() {
        let rules = sample_rules();

        let by_confidence: Vec<String> = rank_rules(&rules, RankBy::Confidence)
            .iter()
            .map(|rule| rule.to_string())
            .collect();
        assert_eq!(
            by_confidence,
            vec!["eggs -> milk", "bread, eggs -> milk", "milk -> eggs", "bread -> milk"]
        );

        let by_support: Vec<String> = rank_rules(&rules, RankBy::Support)
            .iter()
            .map(|rule| rule.to_string())
            .collect();
        assert_eq!(
            by_support,
            vec!["eggs -> milk", "milk -> eggs", "bread -> milk", "bread, eggs -> milk"]
        );

        let by_lift = rank_rules(&rules, RankBy::Lift);
        assert_eq!(by_lift[0].to_string(), "eggs -> milk");
        assert_eq!(by_lift[1].to_string(), "milk -> eggs");
    }

    #[test]
    fn test_suggestion_only_for_single_pairs() {
        let rules = sample_rules();
        let message = suggestion(&rules[0]).unwrap();
        assert!(message.starts_with("Customers who buy bread are likely to also purchase milk."));
        assert!(suggestion(&rules[2]).is_none());
    }

    #[test]
    fn test_format_rule_table() {
        let rules = sample_rules();
        let refs: Vec<&AssociationRule> = rules.iter().collect();
        let table = format_rule_table(&refs);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2 + rules.len());
        assert!(lines[0].contains("antecedents"));
        assert!(lines[0].contains("conviction"));
        assert!(lines[4].contains("bread, eggs"));
        assert!(lines[4].contains("0.800"));
    }

    #[test]
    fn test_rank_itemsets_by_support() {
        let records: Vec<crate::TransactionRecord> = [
            ("1", "tea"),
            ("2", "tea"),
            ("2", "biscuits"),
            ("3", "tea"),
            ("3", "biscuits"),
            ("3", "apples"),
        ]
        .into_iter()
        .map(|(id, item)| crate::TransactionRecord::new(id, item, 1))
        .collect();
        let itemsets = crate::mine(&crate::encode(&records), 0.3).unwrap();

        let labels: Vec<String> = rank_itemsets(&itemsets)
            .iter()
            .map(|itemset| itemset.label())
            .collect();
        assert_eq!(
            labels,
            vec![
                "tea",
                "biscuits",
                "biscuits, tea",
                "apples",
                "apples, biscuits",
                "apples, tea",
                "apples, biscuits, tea",
            ]
        );
    }

    #[test]
    fn test_infinite_conviction_is_rendered() {
        let mut certain = rule(&["eggs"], &["milk"], 0.5, 1.0, 1.3);
        certain.conviction = f64::INFINITY;
        let table = format_rule_table(&[&certain]);
        assert!(table.lines().nth(2).unwrap().trim_end().ends_with("inf"));
    }
}
