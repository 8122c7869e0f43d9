use colored::Colorize;
use pricefit_core::{DiagnosticSink, EvaluationReport, PredictionRecord, Tier, format_usd};
use tabled::{Table, Tabled, settings::Style};

use crate::theme::tier_color;

/// Prints each scored item as a line colored by its tier.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn item(&mut self, record: &PredictionRecord, label: &str) {
        println!(
            "{}",
            record.diagnostic_line(label).color(tier_color(record.tier))
        );
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Items")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

fn pct(part: usize, whole: usize) -> String {
    if whole == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", part as f64 / whole as f64 * 100.0)
    }
}

pub fn display_summary(report: &EvaluationReport) {
    println!();
    println!("{}", report.chart_title().bold());
    println!();

    let rows = vec![
        SummaryRow {
            metric: "Items".to_string(),
            value: report.size.to_string(),
        },
        SummaryRow {
            metric: "Mean absolute error".to_string(),
            value: format_usd(report.mean_absolute_error),
        },
        SummaryRow {
            metric: "RMSLE".to_string(),
            value: format!("{:.4}", report.rmsle),
        },
        SummaryRow {
            metric: "Hit rate".to_string(),
            value: format!("{:.1}%", report.hit_rate * 100.0),
        },
    ];
    println!("{}", Table::new(rows).with(Style::rounded()));

    let tiers: Vec<TierRow> = Tier::ALL
        .iter()
        .map(|&t| TierRow {
            tier: t.label().color(tier_color(t)).to_string(),
            count: report.tier_counts.get(t),
            share: pct(report.tier_counts.get(t), report.size),
        })
        .collect();
    println!("{}", Table::new(tiers).with(Style::rounded()));
}

pub fn display_json(report: &EvaluationReport) -> Result<(), String> {
    let json = serde_json::to_string_pretty(report).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

pub fn display_extracted(price: f64) {
    println!("{}", format_usd(price));
}

pub fn display_tier(record: &PredictionRecord) {
    println!(
        "{} (error {}, ratio {})",
        record.tier.label().color(tier_color(record.tier)).bold(),
        format_usd(record.absolute_error),
        if record.truth > 0.0 {
            format!("{:.3}", record.absolute_error / record.truth)
        } else {
            "n/a".to_string()
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_handles_empty_runs() {
        assert_eq!(pct(1, 0), "-");
        assert_eq!(pct(1, 3), "33.3%");
    }
}
