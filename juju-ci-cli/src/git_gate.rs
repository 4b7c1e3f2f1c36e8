//! Merge and test a Go project hosted in git
//!
//! The project is fetched into a throwaway GOPATH, optionally merged with a
//! proposed branch, its dependencies pulled in, and then built and tested.
//! Any step exiting non-zero stops the gate with a `SubcommandError`.

use clap::{Args, Parser};
use snafu::{ResultExt, Snafu};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// Tool used to pin dependencies from a TSV file
const GODEPS_PACKAGE: &str = "github.com/rogpeppe/godeps";

#[derive(Debug, Clone, Args)]
pub struct GitGateArgs {
    /// Do not remove working dir after testing
    #[arg(long)]
    pub keep: bool,

    /// Go import path of package to test
    #[arg(long)]
    pub project: String,

    /// URL to git repository of package
    #[arg(long)]
    pub project_url: Option<String>,

    /// Branch name or tag to use as basis
    #[arg(long)]
    pub project_ref: Option<String>,

    /// URL to git repository to merge before testing
    #[arg(long)]
    pub merge_url: Option<String>,

    /// Branch name or tag to merge before testing
    #[arg(long, default_value = "HEAD")]
    pub merge_ref: String,

    /// Any number of Go import paths to fetch, in order
    #[arg(short = 'd', long = "dependency")]
    pub dependency: Vec<String>,

    /// Go get the package and all dependencies instead of cloning
    #[arg(long)]
    pub go_get_all: bool,

    /// Path to a godeps TSV file inside the project, pinning dependencies
    #[arg(long)]
    pub tsv_path: Option<String>,
}

#[derive(Parser)]
#[command(name = "git-gate", about = "Merge and test a Go project hosted in git")]
struct GitGateCli {
    #[command(flatten)]
    args: GitGateArgs,
}

/// Parse git-gate arguments, excluding the program name
pub fn parse_args<I, T>(argv: I) -> Result<GitGateArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let argv = std::iter::once(std::ffi::OsString::from("git-gate"))
        .chain(argv.into_iter().map(Into::into));
    GitGateCli::try_parse_from(argv).map(|cli| cli.args)
}

/// A gate step exited non-zero
#[derive(Debug, Snafu)]
#[snafu(display("Subprocess {command} {subcommand} failed with code {code}"))]
pub struct SubcommandError {
    pub command: String,
    pub subcommand: String,
    pub code: i32,
    /// Combined stdout and stderr of the failed step
    pub output: String,
}

impl SubcommandError {
    pub fn new(
        command: impl Into<String>,
        subcommand: impl Into<String>,
        code: i32,
        output: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            subcommand: subcommand.into(),
            code,
            output: output.into(),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum GateError {
    #[snafu(transparent)]
    Subcommand { source: SubcommandError },

    #[snafu(display("Failed to launch {command} {subcommand}: {source}"))]
    Launch {
        command: String,
        subcommand: String,
        source: std::io::Error,
    },

    #[snafu(display("Failed to create working directory: {source}"))]
    Workdir { source: std::io::Error },
}

/// Runs one program with a fixed environment, one subcommand at a time
#[derive(Debug, Clone)]
pub struct SubcommandRunner {
    command: String,
    env: Vec<(String, String)>,
    work_dir: Option<PathBuf>,
}

impl SubcommandRunner {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            env: Vec::new(),
            work_dir: None,
        }
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Run `command subcommand args...`, echoing its output on success
    pub fn run(&self, subcommand: &str, args: &[&str]) -> Result<String, GateError> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(subcommand);
        argv.extend_from_slice(args);

        let mut expression = duct::cmd(self.command.as_str(), &argv)
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked();
        if let Some(dir) = &self.work_dir {
            expression = expression.dir(dir);
        }
        for (key, value) in &self.env {
            expression = expression.env(key, value);
        }

        let output = expression.run().context(LaunchSnafu {
            command: self.command.as_str(),
            subcommand,
        })?;
        let text = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            return Err(SubcommandError::new(
                self.command.as_str(),
                subcommand,
                output.status.code().unwrap_or(-1),
                text,
            )
            .into());
        }

        print!("{text}");
        Ok(text)
    }
}

/// Fetch, merge, build and test `args.project` inside `gopath`
pub fn go_test(args: &GitGateArgs, gopath: &Path) -> Result<(), GateError> {
    let gopath_str = gopath.display().to_string();
    let project_all = format!("{}/...", args.project);
    let directory = gopath.join("src").join(&args.project);

    let go_outside = SubcommandRunner::new("go")
        .env("GOPATH", gopath_str.as_str())
        .work_dir(gopath);
    let git_outside = SubcommandRunner::new("git").work_dir(gopath);

    if let Some(url) = &args.project_url {
        info!("Cloning {} from {}", args.project, url);
        git_outside.run("clone", &[url.as_str(), &directory.display().to_string()])?;
    }
    if args.go_get_all && !(args.project_url.is_some() && args.merge_url.is_some()) {
        info!("Getting {} and dependencies using go", args.project);
        go_outside.run("get", &["-v", "-d", "-t", &project_all])?;
    }

    let go = go_outside.work_dir(&directory);
    let git = git_outside.work_dir(&directory);

    if let Some(project_ref) = &args.project_ref {
        git.run("checkout", &[project_ref.as_str()])?;
    }
    if let Some(merge_url) = &args.merge_url {
        info!("Merging {} ref {}", merge_url, args.merge_ref);
        git.run("fetch", &[merge_url.as_str(), args.merge_ref.as_str()])?;
        let message = format!("Merged {}", args.merge_ref);
        git.run("merge", &["--no-ff", "-m", &message, "FETCH_HEAD"])?;
        if args.go_get_all {
            info!("Updating {} dependencies using go", args.project);
            go.run("get", &["-v", "-d", "-t", &project_all])?;
        }
    }
    for dependency in &args.dependency {
        info!("Getting {} and dependencies using go", dependency);
        go.run("get", &["-v", "-d", dependency.as_str()])?;
    }
    if let Some(tsv_path) = &args.tsv_path {
        let tsv = directory.join(tsv_path);
        info!("Getting and installing godeps");
        let godeps_all = format!("{GODEPS_PACKAGE}/...");
        go.run("get", &["-v", "-d", &godeps_all])?;
        go.run("install", &[&godeps_all])?;
        let godeps = SubcommandRunner::new(gopath.join("bin").join("godeps").display().to_string())
            .env("GOPATH", gopath_str.as_str())
            .work_dir(&directory);
        godeps.run("-u", &[&tsv.display().to_string()])?;
    }

    info!("Building {}", args.project);
    go.run("build", &[&project_all])?;
    info!("Testing {}", args.project);
    go.run("test", &[&project_all])?;
    Ok(())
}

/// Run the gate in a fresh GOPATH, removed afterwards unless `--keep`
pub fn run(args: &GitGateArgs) -> Result<ExitCode, GateError> {
    let workdir = tempfile::Builder::new()
        .prefix("git_gate_")
        .tempdir()
        .context(WorkdirSnafu)?;
    let gopath = workdir.path().to_path_buf();

    let result = go_test(args, &gopath);

    if args.keep {
        let kept = workdir.keep();
        info!("Keeping working directory {}", kept.display());
    } else if let Err(err) = workdir.close() {
        tracing::warn!("Could not remove {}: {}", gopath.display(), err);
    }

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(GateError::Subcommand { source }) => {
            eprintln!("{source}");
            println!("{}", source.output);
            Ok(ExitCode::FAILURE)
        }
        Err(other) => Err(other),
    }
}
