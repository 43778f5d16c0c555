//! Output formatting: table, JSON, YAML.
//!
//! Table uses `tabled`; the structured formats serialize the original
//! data with serde.

use std::io::{self, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use letmein_config::SettingRow;
use letmein_core::CycleReport;

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Rows ─────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "ACTION")]
    action: String,
    #[tabled(rename = "ITEM")]
    item: String,
    #[tabled(rename = "DETAIL")]
    detail: String,
}

#[derive(Tabled)]
struct SettingTableRow {
    #[tabled(rename = "KEY")]
    key: &'static str,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "DESCRIPTION")]
    description: &'static str,
}

fn report_rows(report: &CycleReport) -> Vec<ReportRow> {
    let (created, deleted) = if report.dry_run {
        ("would create", "would delete")
    } else {
        ("created", "deleted")
    };
    let row = |action: &str, item: String, detail: String| ReportRow {
        action: action.to_owned(),
        item,
        detail,
    };

    let mut rows = Vec::new();
    rows.extend(
        report
            .deleted
            .iter()
            .map(|flow| row("delete", format!("flow {flow}"), deleted.to_owned())),
    );
    rows.extend(
        report
            .created
            .iter()
            .map(|vlan| row("create", format!("VLAN {vlan}"), created.to_owned())),
    );
    rows.extend(
        report
            .skipped
            .iter()
            .map(|vlan| row("exists", format!("VLAN {vlan}"), "rule installed".to_owned())),
    );
    rows.extend(
        report
            .failed
            .iter()
            .map(|f| row(f.kind.as_ref(), f.item.clone(), f.message.clone())),
    );
    rows
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a cycle report. The table view leads with a one-line summary and
/// appends dry-run payload previews.
pub fn render_report(format: OutputFormat, report: &CycleReport) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let mode = if report.dry_run { " (dry-run)" } else { "" };
            let mut out = format!(
                "switch {} port {}{mode}: {} desired, {} created, {} deleted, {} failed\n",
                report.device,
                report.port,
                report.desired.len(),
                report.created.len(),
                report.deleted.len(),
                report.failed.len(),
            );
            let rows = report_rows(report);
            if rows.is_empty() {
                out.push_str("nothing to do");
            } else {
                out.push_str(&render_table(&rows));
            }
            for (vlan, payload) in &report.previews {
                out.push_str(&format!("\n\nVLAN {vlan} payload:\n"));
                out.push_str(&render_json(payload, false)?);
            }
            Ok(out)
        }
        OutputFormat::Json => render_json(report, false),
        OutputFormat::JsonCompact => render_json(report, true),
        OutputFormat::Yaml => render_yaml(report),
    }
}

/// Render the settings banner.
pub fn render_settings(format: OutputFormat, rows: &[SettingRow]) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let table_rows: Vec<SettingTableRow> = rows
                .iter()
                .map(|r| SettingTableRow {
                    key: r.key,
                    value: r.value.clone(),
                    description: r.description,
                })
                .collect();
            Ok(render_table(&table_rows))
        }
        OutputFormat::Json => render_json(rows, false),
        OutputFormat::JsonCompact => render_json(rows, true),
        OutputFormat::Yaml => render_yaml(rows),
    }
}

/// Print the rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}
