//! juju-ci - CLI entry point
//!
//! Runs juju acceptance checks and the git gate. Each check bootstraps its
//! own controller and exits non-zero when juju misbehaves.

use clap::{Parser, Subcommand};
use juju_ci_cli::commands::{AssessCommands, handle_assess_command, handle_git_gate_command};
use juju_ci_cli::git_gate::GitGateArgs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "juju-ci")]
#[command(version, about = "Acceptance checks for the juju command line")]
struct Cli {
    /// TOML configuration file (defaults to the per-user juju-ci config)
    #[arg(long, global = true, env = "JUJU_CI_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Assess(AssessCommands),

    /// Merge and test a Go project hosted in git
    GitGate(GitGateArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Assess(cmd) => {
            handle_assess_command(cmd, cli.config.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::GitGate(args) => handle_git_gate_command(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_destroy_model_subcommand_exists() {
        let cli = Cli::try_parse_from(["juju-ci", "destroy-model", "lxd"]).unwrap();
        match cli.command {
            Commands::Assess(AssessCommands::DestroyModel { basic }) => {
                assert_eq!(basic.env, "lxd");
            }
            Commands::GitGate(_) => panic!("parsed as git-gate"),
        }
    }

    #[test]
    fn test_git_gate_subcommand_exists() {
        let cli = Cli::try_parse_from(["juju-ci", "git-gate", "--project", "git.testing/project"])
            .unwrap();
        match cli.command {
            Commands::GitGate(args) => {
                assert_eq!(args.project, "git.testing/project");
                assert_eq!(args.merge_ref, "HEAD");
            }
            Commands::Assess(_) => panic!("parsed as an assess command"),
        }
    }

    #[test]
    fn test_config_is_global() {
        let cli = Cli::try_parse_from([
            "juju-ci",
            "destroy-model",
            "lxd",
            "--config",
            "/etc/juju-ci.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/juju-ci.toml")));
    }
}
