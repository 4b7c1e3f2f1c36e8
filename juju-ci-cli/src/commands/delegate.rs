//! Forwarding for the per-check wrapper binaries
//!
//! `assess_destroy_model` and `git_gate` keep the historical script names
//! working by re-running `juju-ci <subcommand>` from the same directory.

use std::env;
use std::process::ExitCode;

/// Run `juju-ci <subcommand> <our args>` next to the current executable
pub fn delegate_to_juju_ci(subcommand: &str) -> ExitCode {
    let current_exe = match env::current_exe() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Failed to determine current executable path: {e}");
            return ExitCode::FAILURE;
        }
    };
    let Some(bin_dir) = current_exe.parent() else {
        eprintln!("Failed to get parent directory of {}", current_exe.display());
        return ExitCode::FAILURE;
    };

    let juju_ci_path = bin_dir.join(format!("juju-ci{}", env::consts::EXE_SUFFIX));

    // Skip argv[0], the wrapper's own name
    let mut args = vec![subcommand.to_string()];
    args.extend(env::args().skip(1));

    match duct::cmd(juju_ci_path.as_path(), &args).unchecked().run() {
        Ok(output) => ExitCode::from(exit_status_byte(output.status.code())),
        Err(e) => {
            eprintln!("Failed to execute juju-ci: {e}");
            eprintln!("Expected at: {}", juju_ci_path.display());
            ExitCode::FAILURE
        }
    }
}

/// Child exit status as a process exit byte; signals and out-of-range codes become 1
fn exit_status_byte(code: Option<i32>) -> u8 {
    code.and_then(|code| u8::try_from(code).ok()).unwrap_or(1)
}
