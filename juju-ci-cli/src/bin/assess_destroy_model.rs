//! Thin wrapper binary that delegates to `juju-ci destroy-model`

use juju_ci_cli::commands::delegate_to_juju_ci;
use std::process::ExitCode;

fn main() -> ExitCode {
    delegate_to_juju_ci("destroy-model")
}
