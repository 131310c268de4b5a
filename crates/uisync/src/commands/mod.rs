//! Command handlers. Everything except `config` and `completions` needs a
//! fully resolved `SyncConfig`.

pub mod config_cmd;
pub mod lists;
pub mod plan;
pub mod sync_cmd;

use uisync_core::Syncer;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

pub async fn dispatch(cmd: &Command, global: &GlobalOpts) -> Result<(), CliError> {
    let sync_config = config::sync_config(&config::load(global)?)?;
    let syncer = Syncer::new(&sync_config)?;
    tracing::debug!(command = ?cmd, "dispatching command");

    match cmd {
        Command::Run => sync_cmd::run(&syncer, sync_config.interval).await,
        Command::Sync => sync_cmd::sync_once(&syncer, global).await,
        Command::Plan => plan::handle(&syncer, global).await,
        Command::Lists(args) => lists::handle(&syncer, args, global).await,
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
