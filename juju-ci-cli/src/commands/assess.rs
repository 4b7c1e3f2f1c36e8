//! Acceptance check commands
//!
//! Each check bootstraps its own controller, runs against its default model
//! and tears the controller down again.

use crate::assess::assess_destroy_model;
use anyhow::{Context, Result};
use clap::Subcommand;
use juju_ci_lib::{BasicTestingArgs, BootstrapManager, JujuCiConfig, configure_logging};
use std::path::Path;

#[derive(Debug, Subcommand, Clone)]
pub enum AssessCommands {
    /// Test if juju drops selection of the current model when that model is destroyed
    DestroyModel {
        #[command(flatten)]
        basic: BasicTestingArgs,
    },
}

/// Handle acceptance check commands
pub fn handle_assess_command(cmd: AssessCommands, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        AssessCommands::DestroyModel { basic } => run_destroy_model(&basic, config_path),
    }
}

fn run_destroy_model(basic: &BasicTestingArgs, config_path: Option<&Path>) -> Result<()> {
    configure_logging(basic.verbose);
    let config = JujuCiConfig::load(config_path).context("Failed to load configuration")?;

    let mut bs_manager = BootstrapManager::from_args(basic, &config);
    bs_manager
        .booted_context(basic.upload_tools, |client| assess_destroy_model(client))
        .context("destroy-model check failed")?;

    Ok(())
}
