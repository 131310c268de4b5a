//! `uisync config path|show`.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_file(global).display().to_string());
            Ok(())
        }
        ConfigCommand::Show => {
            let shown = config::load(global)?.redacted();
            let toml = shown.to_toml()?;
            let out = output::render_single(global.output, &shown, |_| toml.clone())?;
            output::print_output(&out);
            Ok(())
        }
    }
}
