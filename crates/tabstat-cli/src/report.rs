//! Text and JSON rendering of command results.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use tabstat_ingest::AttemptStage;
use tabstat_stats::{ResampleStatistic, format_fixed, format_percent_label};

use crate::commands::{BootstrapReport, InspectReport};

/// Decimals for interval bounds in the bootstrap table.
const RESULT_DIGITS: usize = 4;

pub fn render_inspect(report: &InspectReport, json: bool, styled: bool) -> Result<String> {
    if json {
        return to_json(report);
    }
    let mut out = String::new();
    let detected = report.detected.as_deref().unwrap_or("none");
    writeln!(out, "File: {}", report.path.display())?;
    writeln!(
        out,
        "Encoding: {} ({}, detector proposed {detected})",
        report.encoding,
        stage_label(report.stage)
    )?;
    writeln!(out, "Rows: {}", report.rows)?;
    writeln!(out, "Skipped rows: {}", report.skipped_rows.len())?;
    for failure in &report.failed_attempts {
        writeln!(out, "Failed attempt: {failure}")?;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Nulls"),
    ]);
    apply_table_style(&mut table, styled);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in &report.columns {
        table.add_row(vec![
            Cell::new(&column.name).add_attribute(Attribute::Bold),
            Cell::new(&column.dtype),
            count_cell(column.null_count, Color::Yellow),
        ]);
    }
    write!(out, "{table}")?;

    if !report.skipped_rows.is_empty() {
        let mut skipped = Table::new();
        skipped.set_header(vec![header_cell("Line"), header_cell("Reason")]);
        apply_table_style(&mut skipped, styled);
        align_column(&mut skipped, 0, CellAlignment::Right);
        for row in &report.skipped_rows {
            skipped.add_row(vec![
                Cell::new(row.line),
                Cell::new(row.reason.to_string()).fg(Color::Yellow),
            ]);
        }
        write!(out, "\n\nSkipped:\n{skipped}")?;
    }
    Ok(out)
}

pub fn render_bootstrap(report: &BootstrapReport, json: bool, styled: bool) -> Result<String> {
    if json {
        return to_json(report);
    }
    let result = &report.result;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table, styled);
    align_column(&mut table, 1, CellAlignment::Right);

    let interval = format!(
        "[{}, {}]",
        format_fixed(result.lower, RESULT_DIGITS),
        format_fixed(result.upper, RESULT_DIGITS)
    );
    let rows: Vec<(&str, Cell)> = vec![
        ("Column", Cell::new(&report.column)),
        ("Statistic", Cell::new(report.statistic.name())),
        ("N", Cell::new(report.n)),
        ("Dropped nulls", count_cell(report.dropped_nulls, Color::Yellow)),
        (
            "Estimate",
            Cell::new(format_fixed(result.point_estimate, RESULT_DIGITS))
                .add_attribute(Attribute::Bold),
        ),
        (
            "Confidence",
            Cell::new(format!("{}%", format_percent_label(result.confidence_level))),
        ),
        ("Interval", Cell::new(interval).fg(Color::Green)),
        ("Method", Cell::new(result.method)),
        ("Resamples", Cell::new(result.n_resamples)),
        ("Seed", Cell::new(result.seed)),
    ];
    for (field, value) in rows {
        table.add_row(vec![Cell::new(field), value]);
    }
    Ok(table.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize report")
}

fn stage_label(stage: AttemptStage) -> String {
    match stage {
        AttemptStage::Detected => "detected".to_string(),
        other => format!("via {other}"),
    }
}

fn apply_table_style(table: &mut Table, styled: bool) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
    if styled {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_label() {
        assert_eq!(stage_label(AttemptStage::Detected), "detected");
        assert_eq!(stage_label(AttemptStage::FallbackB), "via fallback B");
    }
}
