use crate::git_gate::{GitGateArgs, run};
use anyhow::{Context, Result};
use juju_ci_lib::configure_logging;
use std::process::ExitCode;

/// Handle the git-gate command
pub fn handle_git_gate_command(args: &GitGateArgs) -> Result<ExitCode> {
    configure_logging(false);
    run(args).with_context(|| format!("git gate for {} could not run", args.project))
}
