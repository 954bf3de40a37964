use std::fmt::Write;

use crate::insights::{BucketSummary, DurationInsights};
use crate::statistics::Statistics;
use comfy_table::{Cell, Color as TableColor};

use super::styling::{heading, highlight, ident, label};
use super::tables::{color_coded_spread_cell, create_table, seconds_cell};

/// Prints a human-readable summary of the step-duration insights to stdout.
///
/// Shows an overview of what was collected, one section per OS bucket
/// (macOS, Windows, Ubuntu) with mean, median, min, max and standard
/// deviation in seconds, and a comparison table across buckets.
pub fn print_summary(insights: &DurationInsights) {
    println!("{}", render_summary(insights));
}

// Helper functions

fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", heading(emoji), heading(title).underlined());
}

/// Renders one bucket's section: a labeled banner followed by the five
/// statistics with two decimals, or a "No data" line.
pub fn render_bucket(title: &str, statistics: Option<&Statistics>) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", heading(format!("{title:=^34}")));

    match statistics {
        Some(stats) => {
            for (name, value) in [
                ("Mean", stats.mean),
                ("Median", stats.median),
                ("Min", stats.min),
                ("Max", stats.max),
                ("Standard Deviation", stats.std_dev),
            ] {
                let _ = writeln!(output, "{} {value:.2}", label(format!("{name}:")));
            }
        }
        None => {
            let _ = writeln!(output, "{}", highlight("No data"));
        }
    }

    output
}

fn comparison_row(bucket: &BucketSummary) -> Vec<Cell> {
    let mut row = vec![Cell::new(&bucket.label), Cell::new(bucket.samples)];
    match &bucket.statistics {
        Some(stats) => {
            row.extend([
                seconds_cell(stats.mean),
                seconds_cell(stats.median),
                seconds_cell(stats.min),
                seconds_cell(stats.max),
                color_coded_spread_cell(stats.std_dev, stats.mean),
            ]);
        }
        None => row.extend(vec![Cell::new("-").fg(TableColor::DarkGrey); 5]),
    }
    row
}

fn render_summary(insights: &DurationInsights) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📊", "Overview");
    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        label("Repository:"),
        ident(&insights.repository),
        label("Measured step:"),
        ident(&insights.step),
        label("Runs analyzed:"),
        highlight(insights.total_runs),
        label("Jobs analyzed:"),
        highlight(insights.total_jobs),
        label("Excluded jobs:"),
        highlight(insights.excluded_jobs),
        label("Unrecognized jobs:"),
        highlight(insights.unrecognized_jobs),
        label("Analysis date:"),
        label(insights.collected_at.format("%Y-%m-%d %H:%M UTC"))
    );

    add_section_header(&mut output, "⏱️", "Step Duration (seconds)");
    for bucket in &insights.buckets {
        output.push_str(&render_bucket(&bucket.label, bucket.statistics.as_ref()));
    }
    output.push('\n');

    add_section_header(&mut output, "📋", "Comparison");
    let mut table = create_table();
    table.set_header(create_cyan_header(&[
        "OS", "Samples", "Mean", "Median", "Min", "Max", "Std Dev",
    ]));
    for bucket in &insights.buckets {
        table.add_row(comparison_row(bucket));
    }
    let _ = writeln!(output, "{table}");

    if insights.negative_durations > 0 {
        let _ = writeln!(
            output,
            "\n{}",
            highlight(format!(
                "{} jobs reported a negative step duration and were left out.",
                insights.negative_durations
            ))
        );
    }

    if insights.missing_jobs > 0 {
        let _ = writeln!(
            output,
            "{}",
            highlight(format!(
                "{} jobs were reported by their runs but never listed.",
                insights.missing_jobs
            ))
        );
    }

    output
}
