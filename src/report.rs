//! Timing results rendering
//!
//! The ordered metric rows render three ways: CSV for spreadsheets and
//! machine parsing, an aligned table for the terminal, and JSON for
//! downstream tooling. Column order is fixed across all three:
//! `Op, ReuseKey, msgBytes, adBytes, Cycles, Throughput, RandomBytes,
//! RandBytesPerByte`.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::correlate::MetricRow;

const CSV_HEADER: &str = "Op,ReuseKey,msgBytes,adBytes,Cycles,Throughput,RandomBytes,RandBytesPerByte";

const TABLE_HEADER: [&str; 8] = [
    "Op",
    "ReuseKey",
    "PT/CT [B]",
    "AD [B]",
    "Cycles",
    "Throughput [B/cyc]",
    "Rand [B]",
    "Rand [B/B]",
];

/// Render a metric value with trailing zeros trimmed, keeping at least one
/// decimal place: `1.6`, `2.0`, `0.303`.
fn fmt_metric(value: f64) -> String {
    let mut text = format!("{value:.3}");
    while text.ends_with('0') && !text.ends_with(".0") {
        text.pop();
    }
    text
}

fn csv_fields(row: &MetricRow) -> [String; 8] {
    [
        row.op.as_str().to_string(),
        if row.reuse_key { "True" } else { "False" }.to_string(),
        row.msg_bytes.to_string(),
        row.ad_bytes.to_string(),
        row.cycles.to_string(),
        fmt_metric(row.throughput),
        row.random_bytes.map(|b| b.to_string()).unwrap_or_default(),
        row.rand_bytes_per_byte.map(fmt_metric).unwrap_or_default(),
    ]
}

fn table_fields(row: &MetricRow) -> [String; 8] {
    let mut fields = csv_fields(row);
    fields[1] = if row.reuse_key { "✓" } else { "" }.to_string();
    fields
}

/// Generate CSV output as a string.
pub fn to_csv(rows: &[MetricRow]) -> String {
    let mut output = String::new();
    output.push_str(CSV_HEADER);
    output.push('\n');
    for row in rows {
        output.push_str(&csv_fields(row).join(","));
        output.push('\n');
    }
    output
}

/// Write the CSV report to a file.
pub fn write_csv(rows: &[MetricRow], path: &Path) -> anyhow::Result<()> {
    fs::write(path, to_csv(rows))
        .with_context(|| format!("failed to write timing results {}", path.display()))
}

/// Render the aligned terminal table. Cells are right-justified; a rule is
/// drawn under the header and after every row that is `long` in both size
/// columns, closing out that measurement group.
pub fn render_table(rows: &[MetricRow]) -> String {
    let cells: Vec<[String; 8]> = rows.iter().map(table_fields).collect();
    let mut widths: [usize; 8] = TABLE_HEADER.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = widths.map(|w| "-".repeat(w)).join(" ");
    let mut output = String::new();
    let push_row = |output: &mut String, fields: &[String; 8]| {
        let line = fields
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:>width$}"))
            .collect::<Vec<_>>()
            .join(" ");
        output.push_str(line.trim_end());
        output.push('\n');
    };

    let header = TABLE_HEADER.map(String::from);
    push_row(&mut output, &header);
    output.push_str(&rule);
    output.push('\n');
    for (row, fields) in rows.iter().zip(cells.iter()) {
        push_row(&mut output, fields);
        if row.ends_group() {
            output.push_str(&rule);
            output.push('\n');
        }
    }
    output
}

/// Summary block of the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub total_rows: usize,
    pub synthesized_rows: usize,
}

/// Root JSON report structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
    pub rows: Vec<MetricRow>,
    pub summary: JsonSummary,
}

impl JsonReport {
    pub fn new(rows: &[MetricRow], design: Option<&str>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            design: design.map(str::to_string),
            rows: rows.to_vec(),
            summary: JsonSummary {
                total_rows: rows.len(),
                synthesized_rows: rows.iter().filter(|r| r.synthesized).count(),
            },
        }
    }
}

/// Generate pretty-printed JSON output.
pub fn to_json(rows: &[MetricRow], design: Option<&str>) -> anyhow::Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(rows, design))
        .context("failed to serialize timing results")
}
