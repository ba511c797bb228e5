//! Itemset support chart using Plotters

use plotters::prelude::*;

use crate::apriori::FrequentItemsets;
use crate::report::{high_confidence, suggestion};
use crate::rules::AssociationRule;

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);
const RULE_COLOR: RGBColor = RGBColor(165, 42, 42);
const ADVICE_COLOR: RGBColor = BLUE;

/// One horizontal bar of the support chart
#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub label: String,
    pub support: f64,
    /// Lower edge of the bar's slot; the first itemset gets the highest slot
    pub y: f64,
}

/// Rule call-out attached to the bar of its antecedent
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub rule_text: String,
    pub suggestion: Option<String>,
}

/// Lay out one bar per itemset, first itemset at the top
pub fn bar_rows(itemsets: &FrequentItemsets) -> Vec<BarRow> {
    let n = itemsets.len();
    itemsets
        .iter()
        .enumerate()
        .map(|(i, itemset)| BarRow {
            label: itemset.label(),
            support: itemset.support,
            y: (n - 1 - i) as f64,
        })
        .collect()
}

/// Place a call-out for every high-confidence rule on its antecedent's bar
pub fn annotations(rows: &[BarRow], rules: &[AssociationRule]) -> Vec<Annotation> {
    high_confidence(rules)
        .into_iter()
        .filter_map(|rule| {
            let antecedent = rule.antecedent_label();
            let row = rows.iter().find(|row| row.label == antecedent)?;
            Some(Annotation {
                x: rule.support,
                y: row.y,
                rule_text: format!("{} (support {:.2})", rule, rule.support),
                suggestion: suggestion(rule),
            })
        })
        .collect()
}

/// Draw a horizontal bar chart of itemset supports
///
/// # Arguments
/// * `itemsets` - Mined itemsets, drawn in order from the top
/// * `rules` - Rules; those above the high-confidence threshold are annotated
/// * `output_path` - Path to save the PNG chart
pub fn create_support_chart(
    itemsets: &FrequentItemsets,
    rules: &[AssociationRule],
    output_path: &str,
) -> crate::Result<()> {
    let rows = bar_rows(itemsets);
    if rows.is_empty() {
        tracing::warn!(path = output_path, "no frequent itemsets, skipping support chart");
        return Ok(());
    }

    let notes = annotations(&rows, rules);
    let n_rows = rows.len();
    let max_support = rows.iter().map(|row| row.support).fold(0.0, f64::max);
    // Leave room to the right of the bars for the call-outs
    let x_max = (max_support * 2.0).max(0.1);
    let height = (n_rows as u32 * 32 + 120).max(400);

    let root = BitMapBackend::new(output_path, (1200, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Support of Itemsets", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(10)
        .build_cartesian_2d(0f64..x_max, 0f64..n_rows as f64)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_label_formatter(&|_| String::new())
        .x_desc("Support")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(rows.iter().map(|row| {
        Rectangle::new(
            [(0.0, row.y + 0.1), (row.support, row.y + 0.9)],
            BAR_COLOR.filled(),
        )
    }))?;

    chart.draw_series(rows.iter().map(|row| {
        Text::new(
            format!("{} ({:.2})", row.label, row.support),
            (x_max * 0.005, row.y + 0.7),
            ("sans-serif", 14).into_font(),
        )
    }))?;

    for note in &notes {
        chart.draw_series(std::iter::once(Text::new(
            note.rule_text.clone(),
            (note.x, note.y + 0.8),
            ("sans-serif", 13).into_font().color(&RULE_COLOR),
        )))?;

        if let Some(message) = &note.suggestion {
            chart.draw_series(std::iter::once(Text::new(
                message.clone(),
                (note.x, note.y + 0.45),
                ("sans-serif", 10).into_font().color(&ADVICE_COLOR),
            )))?;
        }
    }

    root.present()?;
    println!("Support chart saved to: {}", output_path);

    Ok(())
}
