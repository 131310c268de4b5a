//! CLI-aware wrappers over `uisync_config`: `--config` and `--insecure`.

use std::path::PathBuf;

use uisync_config::Config;
use uisync_core::SyncConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in effect: `--config`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(uisync_config::config_path)
}

/// Load the config file plus env overrides, applying `--insecure`.
///
/// A missing default file is fine (env-only setups); a missing file
/// named explicitly with `--config` is not.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_file(global);
    if global.config.is_some() && !path.exists() {
        return Err(CliError::NoConfig {
            path: path.display().to_string(),
        });
    }

    let mut config = uisync_config::load_config_from(&path)?;
    if global.insecure {
        config.set_insecure();
    }
    Ok(config)
}

pub fn sync_config(config: &Config) -> Result<SyncConfig, CliError> {
    Ok(config.to_sync_config()?)
}
