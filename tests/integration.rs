//! Integration tests for BasketForge

use basketforge::{
    analyze, generate_rules, load_transactions, mine, ColumnNames, MiningConfig, MiningError,
};
use std::collections::BTreeSet;
use std::io::Write;
use tempfile::NamedTempFile;

const TOLERANCE: f64 = 1e-9;

/// Create a test CSV file with sample grocery data
fn create_test_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Transaction ID,Date,Product Name,Quantity,Unit Price").unwrap();

    // T1 - bread and milk
    writeln!(file, "T1,2024-03-01,bread,1,2.10").unwrap();
    writeln!(file, "T1,2024-03-01,milk,2,0.95").unwrap();

    // T2 - bread, milk and eggs; milk split over two lines
    writeln!(file, "T2,2024-03-01,bread,1,2.10").unwrap();
    writeln!(file, "T2,2024-03-01,milk,0,0.95").unwrap();
    writeln!(file, "T2,2024-03-01,milk,1,0.95").unwrap();
    writeln!(file, "T2,2024-03-01,eggs,12,0.30").unwrap();

    // T3 - bread, plus a jam line with an unreadable quantity
    writeln!(file, "T3,2024-03-02,bread,1,2.10").unwrap();
    writeln!(file, "T3,2024-03-02,jam,unknown,3.50").unwrap();

    // T4 - milk and eggs
    writeln!(file, "T4,2024-03-02,milk,1,0.95").unwrap();
    writeln!(file, "T4,2024-03-02,eggs,6,0.30").unwrap();

    file
}

fn rule_set(analysis: &basketforge::Analysis) -> BTreeSet<String> {
    analysis
        .rules
        .iter()
        .map(|rule| format!("{} {:.12} {:.12}", rule, rule.confidence, rule.lift))
        .collect()
}

#[test]
fn test_end_to_end_pipeline() {
    let test_file = create_test_csv();

    let analysis = analyze(
        test_file.path(),
        &ColumnNames::default(),
        &MiningConfig::new(0.5, 0.6),
    )
    .unwrap();

    // jam is a column but never present
    assert_eq!(analysis.matrix.n_transactions(), 4);
    assert_eq!(analysis.matrix.n_items(), 4);

    assert_eq!(analysis.itemsets.len(), 5);
    let bread_milk = analysis
        .itemsets
        .get(&["bread".to_string(), "milk".to_string()])
        .unwrap();
    assert!((bread_milk.support - 0.5).abs() < TOLERANCE);

    let rule = analysis
        .rules
        .iter()
        .find(|rule| rule.to_string() == "bread -> milk")
        .unwrap();
    assert!((rule.confidence - 0.5 / 0.75).abs() < TOLERANCE);
    assert!((rule.lift - (0.5 / 0.75) / 0.75).abs() < TOLERANCE);
    assert!((rule.lift - 0.889).abs() < 1e-3);
}

#[test]
fn test_empty_dataset() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Transaction ID,Product Name,Quantity").unwrap();

    let analysis = analyze(file.path(), &ColumnNames::default(), &MiningConfig::default()).unwrap();

    assert!(analysis.matrix.is_empty());
    assert!(analysis.itemsets.is_empty());
    assert!(analysis.rules.is_empty());
    assert!(analysis.is_empty());
}

#[test]
fn test_missing_columns_differ_from_empty_input() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Invoice,Description,Quantity").unwrap();
    writeln!(file, "1,bread,1").unwrap();

    let result = analyze(file.path(), &ColumnNames::default(), &MiningConfig::default());
    match result {
        Err(MiningError::InputShape { missing }) => {
            assert_eq!(missing, vec!["Transaction ID", "Product Name"]);
        }
        other => panic!("expected InputShape error, got {:?}", other),
    }
}

#[test]
fn test_custom_column_names() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "InvoiceNo,Description,Qty").unwrap();
    writeln!(file, "536365,LANTERN,6").unwrap();
    writeln!(file, "536365,HEART HOLDER,6").unwrap();
    writeln!(file, "536366,LANTERN,2").unwrap();

    let columns = ColumnNames {
        transaction_id: "InvoiceNo".to_string(),
        item: "Description".to_string(),
        quantity: "Qty".to_string(),
    };
    let records = load_transactions(file.path(), &columns).unwrap();
    assert_eq!(records.len(), 3);

    let analysis = analyze(file.path(), &columns, &MiningConfig::new(0.5, 0.6)).unwrap();
    let labels: Vec<String> = analysis.rules.iter().map(|rule| rule.to_string()).collect();
    assert_eq!(labels, vec!["HEART HOLDER -> LANTERN"]);
}

#[test]
fn test_error_handling_invalid_thresholds() {
    let test_file = create_test_csv();

    let result = analyze(test_file.path(), &ColumnNames::default(), &MiningConfig::new(0.0, 0.5));
    assert!(matches!(result, Err(MiningError::InvalidConfig(_))));

    let result = analyze(test_file.path(), &ColumnNames::default(), &MiningConfig::new(0.5, 1.5));
    assert!(matches!(result, Err(MiningError::InvalidConfig(_))));
}

#[test]
fn test_pipeline_is_idempotent() {
    let test_file = create_test_csv();
    let config = MiningConfig::new(0.25, 0.1);

    let first = analyze(test_file.path(), &ColumnNames::default(), &config).unwrap();
    let second = analyze(test_file.path(), &ColumnNames::default(), &config).unwrap();

    let first_itemsets: BTreeSet<String> = first.itemsets.iter().map(|i| i.label()).collect();
    let second_itemsets: BTreeSet<String> = second.itemsets.iter().map(|i| i.label()).collect();
    assert_eq!(first_itemsets, second_itemsets);
    assert_eq!(rule_set(&first), rule_set(&second));
}

#[test]
fn test_stages_compose_directly() {
    let test_file = create_test_csv();
    let records = load_transactions(test_file.path(), &ColumnNames::default()).unwrap();
    let matrix = basketforge::encode(&records);

    let itemsets = mine(&matrix, 0.25).unwrap();
    // {bread, milk, eggs} appears only in T2
    assert_eq!(itemsets.max_len(), 3);

    let rules = generate_rules(&itemsets, 0.0).unwrap();
    for rule in &rules {
        assert!((0.0..=1.0).contains(&rule.confidence));
        assert!(rule.lift > 0.0);
        assert!(rule.support <= rule.antecedent_support + TOLERANCE);
    }
}
