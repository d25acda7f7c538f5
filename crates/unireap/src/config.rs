//! CLI configuration: a thin wrapper around `unireap_config`.
//!
//! Picks the config file path and layers `GlobalOpts` flag overrides
//! (--dry-run, --keep-going) on top of what the file says.

use std::path::PathBuf;

use unireap_core::{FailurePolicy, RunConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file to read: `--config` / `UNIREAP_CONFIG`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(unireap_config::config_path)
}

/// Load the run configuration and apply CLI flag overrides.
pub fn resolve_run_config(global: &GlobalOpts) -> Result<RunConfig, CliError> {
    let path = config_file(global);
    let mut config = unireap_config::load_run_config(
        &path,
        global.config_type.into(),
        global.config_version.into(),
    )?;
    apply_overrides(&mut config, global);
    Ok(config)
}

fn apply_overrides(config: &mut RunConfig, global: &GlobalOpts) {
    if global.dry_run {
        config.options.dry_run = true;
    }
    if global.keep_going {
        config.failure_policy = FailurePolicy::ContinueWithNextSite;
    }
}
