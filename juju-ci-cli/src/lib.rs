//! juju-ci: acceptance checks for the juju command line
//!
//! - `assess`: checks that drive a bootstrapped controller
//! - `git_gate`: merge-and-test gate for Go projects hosted in git
//! - `commands`: clap subcommands and handlers behind the `juju-ci` binary

pub mod assess;
pub mod commands;
pub mod git_gate;
