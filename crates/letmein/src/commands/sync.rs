//! One-shot reconciliation (`sync`, `plan`).

use letmein_config::Settings;

use crate::cli::GlobalOpts;
use crate::config::build_engine;
use crate::error::{CliError, from_sync};
use crate::output;

/// Run one cycle and print the report. Item failures still print the
/// report, then fail the command.
pub async fn handle(settings: &Settings, global: &GlobalOpts, dry_run: bool) -> Result<(), CliError> {
    let engine = build_engine(settings, dry_run)?;
    let url = engine.gateway().base_url().to_string();

    let report = engine
        .run_cycle()
        .await
        .map_err(|e| from_sync(e, &url))?;
    report.log();

    let rendered = output::render_report(global.output, &report)?;
    output::print_output(&rendered);

    if report.has_failures() {
        return Err(CliError::ItemFailures {
            count: report.failed.len(),
        });
    }
    Ok(())
}
