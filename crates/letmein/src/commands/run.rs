//! Long-running reconciliation loop.

use letmein_config::Settings;
use letmein_core::Scheduler;
use tokio::signal;
use tracing::info;

use crate::cli::{GlobalOpts, RunArgs};
use crate::config::build_engine;
use crate::error::CliError;
use crate::output;

pub async fn handle(settings: &Settings, global: &GlobalOpts, args: &RunArgs) -> Result<(), CliError> {
    let rendered = output::render_settings(global.output, &settings.describe())?;
    output::print_output(&rendered);

    let engine = build_engine(settings, false)?;
    let mut scheduler = Scheduler::new(settings.interval()?);
    if args.once {
        scheduler = scheduler.with_max_cycles(1);
    }

    let token = scheduler.cancellation_token();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping after the current cycle");
            token.cancel();
        }
    });

    let summary = scheduler.run(&engine).await;
    if args.once && summary.failed_cycles > 0 {
        return Err(CliError::CyclesFailed {
            count: summary.failed_cycles,
            cycles: summary.cycles,
        });
    }
    Ok(())
}
