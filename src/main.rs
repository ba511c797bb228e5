//! BasketForge: market basket analysis CLI
//!
//! This is the main entrypoint that orchestrates data loading, itemset
//! mining, rule generation, reporting and visualization.

use anyhow::Result;
use basketforge::{report, run, viz, Args};
use clap::Parser;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();
    init_tracing(args.verbose);

    // Fail on bad thresholds before touching the input
    args.check()?;

    if args.verbose {
        println!("BasketForge - Market Basket Analysis using Apriori");
        println!("==================================================\n");
    }

    run_full_pipeline(&args)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("BASKETFORGE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the full mining pipeline
fn run_full_pipeline(args: &Args) -> Result<()> {
    println!("=== Association Rule Mining ===\n");

    let start_time = Instant::now();
    let config = args.mining_config();

    // Step 1: Load and encode data
    if args.verbose {
        println!("Step 1: Loading transactions");
        println!("  Input file: {}", args.input);
    }

    let data_start = Instant::now();
    let records = basketforge::load_transactions(&args.input, &args.column_names())?;
    let data_time = data_start.elapsed();

    println!("✓ Data loaded: {} line items", records.len());
    if args.verbose {
        println!("  Loading time: {:.2}s", data_time.as_secs_f64());
    }

    // Step 2: Mine itemsets and rules
    if args.verbose {
        println!("\nStep 2: Mining frequent itemsets and rules");
        println!("  Minimum support: {}", config.min_support);
        println!("  Minimum confidence: {}", config.min_confidence);
        if let Some(max_len) = config.max_len {
            println!("  Maximum itemset size: {}", max_len);
        }
    }

    let mining_start = Instant::now();
    let analysis = run(&records, &config)?;
    let mining_time = mining_start.elapsed();

    println!(
        "✓ Basket matrix: {} transactions x {} items",
        analysis.matrix.n_transactions(),
        analysis.matrix.n_items()
    );
    println!(
        "✓ Mined {} frequent itemsets and {} rules",
        analysis.itemsets.len(),
        analysis.rules.len()
    );
    if analysis.itemsets.truncated() {
        println!("  Time budget reached: itemsets above size {} were not searched", analysis.itemsets.max_len());
    }
    if args.verbose {
        println!("  Mining time: {:.2}s", mining_time.as_secs_f64());
        println!("  Matrix density: {:.3}", analysis.matrix.density());
    }

    // Step 3: Report
    report::print_itemset_summary(&analysis.itemsets, args.top);
    println!();
    report::print_report(&analysis, args.rank_by, args.top);

    // Step 4: Visualize
    if !args.no_plot && !analysis.is_empty() {
        if args.verbose {
            println!("\nStep 3: Generating support chart");
            println!("  Output file: {}", args.output);
        }
        let viz_start = Instant::now();
        viz::create_support_chart(&analysis.itemsets, &analysis.rules, &args.output)?;
        if args.verbose {
            println!("  Visualization time: {:.2}s", viz_start.elapsed().as_secs_f64());
        }
    }

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}
