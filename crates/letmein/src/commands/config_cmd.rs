//! Config subcommand handlers.

use letmein_config::{config_path, write_default_settings};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::resolve_settings;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let settings = resolve_settings(global)?;
            let rendered = output::render_settings(global.output, &settings.describe())?;
            output::print_output(&rendered);
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = global.config.clone().unwrap_or_else(config_path);
            write_default_settings(&path, force)?;
            eprintln!("wrote default settings to {}", path.display());
            Ok(())
        }
    }
}
