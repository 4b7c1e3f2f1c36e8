//! Arguments every acceptance check accepts

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct BasicTestingArgs {
    /// Cloud (or environment) to bootstrap on
    pub env: String,

    /// Path to the juju binary to test
    pub juju_bin: Option<PathBuf>,

    /// Directory to store logs in
    pub logs: Option<PathBuf>,

    /// Name for the temporary controller and its default model
    pub temp_env_name: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Pass --debug to juju
    #[arg(long)]
    pub debug: bool,

    /// Upload local tools when bootstrapping
    #[arg(long)]
    pub upload_tools: bool,

    /// Keep the controller after the check finishes
    #[arg(long)]
    pub keep_env: bool,

    /// Series for the bootstrap machine
    #[arg(long)]
    pub series: Option<String>,

    /// Cloud region to bootstrap in
    #[arg(long)]
    pub region: Option<String>,

    /// URL for retrieving agents
    #[arg(long)]
    pub agent_url: Option<String>,

    /// Stream for retrieving agents
    #[arg(long)]
    pub agent_stream: Option<String>,
}
