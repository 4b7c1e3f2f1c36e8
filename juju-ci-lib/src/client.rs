//! Juju client handles
//!
//! A client is bound to one controller/model pair and runs juju commands
//! against it. Checks are written against the `ModelClient` trait so they can
//! run against the real binary (`JujuClient`) or an in-memory fake.

use crate::error::{CalledProcessSnafu, JujuError, SpawnSnafu};
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Controller/model pair a client is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEnv {
    pub controller: String,
    pub model: String,
}

impl ModelEnv {
    pub fn new(controller: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            model: model.into(),
        }
    }

    /// Same controller, different model
    #[must_use]
    pub fn with_model(&self, model: &str) -> Self {
        Self::new(self.controller.clone(), model)
    }

    /// `controller:model`, the form juju accepts for `-m` and `switch`
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.controller, self.model)
    }
}

/// Operations an acceptance check needs from a juju session
pub trait ModelClient: Sized {
    /// Environment this handle is bound to
    fn env(&self) -> &ModelEnv;

    /// Run `juju <command> [-m controller:model] <args>` and return raw stdout
    fn get_juju_output(
        &self,
        command: &str,
        args: &[&str],
        include_e: bool,
    ) -> Result<Vec<u8>, JujuError>;

    /// Change the current selection to `controller:model`
    fn switch(&mut self, model: &str, controller: &str) -> Result<(), JujuError>;

    /// Destroy the model this handle is bound to
    fn destroy_model(&self) -> Result<(), JujuError>;

    /// Create `model` on this handle's controller and return a handle bound to it
    fn add_model(&self, model: &str) -> Result<Self, JujuError>;
}

/// Client that shells out to a juju binary
#[derive(Debug, Clone)]
pub struct JujuClient {
    env: ModelEnv,
    juju_bin: PathBuf,
    juju_data: Option<PathBuf>,
    debug: bool,
}

impl JujuClient {
    pub fn new(env: ModelEnv, juju_bin: impl Into<PathBuf>) -> Self {
        Self {
            env,
            juju_bin: juju_bin.into(),
            juju_data: None,
            debug: false,
        }
    }

    /// Export `JUJU_DATA` to every juju invocation
    #[must_use]
    pub fn with_juju_data(mut self, juju_data: Option<PathBuf>) -> Self {
        self.juju_data = juju_data;
        self
    }

    /// Pass `--debug` to every juju invocation
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Same binary and settings, bound to `env`
    #[must_use]
    pub fn bound_to(&self, env: ModelEnv) -> Self {
        Self {
            env,
            ..self.clone()
        }
    }

    pub fn juju_bin(&self) -> &Path {
        &self.juju_bin
    }

    /// Full argument vector for a juju invocation, without the binary itself
    pub fn juju_args(&self, command: &str, args: &[&str], include_e: bool) -> Vec<String> {
        let mut full = Vec::with_capacity(args.len() + 4);
        if self.debug {
            full.push("--debug".to_string());
        }
        full.push(command.to_string());
        if include_e {
            full.push("-m".to_string());
            full.push(self.env.qualified_name());
        }
        full.extend(args.iter().map(|arg| (*arg).to_string()));
        full
    }

    /// Run a juju command whose output only matters for the log
    pub fn juju(&self, command: &str, args: &[&str], include_e: bool) -> Result<(), JujuError> {
        let output = self.get_juju_output(command, args, include_e)?;
        let text = String::from_utf8_lossy(&output);
        if !text.trim().is_empty() {
            debug!("juju {}: {}", command, text.trim_end());
        }
        Ok(())
    }

    /// Bootstrap this handle's controller with its model as the default model
    pub fn bootstrap(&self, cloud: &str, extra_args: &[String]) -> Result<(), JujuError> {
        let mut args = vec![
            cloud,
            self.env.controller.as_str(),
            "--default-model",
            self.env.model.as_str(),
        ];
        args.extend(extra_args.iter().map(String::as_str));
        self.juju("bootstrap", &args, false)
    }

    /// Tear down the controller and everything on it, without prompting
    pub fn kill_controller(&self) -> Result<(), JujuError> {
        self.juju("kill-controller", &[self.env.controller.as_str(), "-y"], false)
    }
}

impl ModelClient for JujuClient {
    fn env(&self) -> &ModelEnv {
        &self.env
    }

    fn get_juju_output(
        &self,
        command: &str,
        args: &[&str],
        include_e: bool,
    ) -> Result<Vec<u8>, JujuError> {
        let full_args = self.juju_args(command, args, include_e);
        debug!("Running {} {}", self.juju_bin.display(), full_args.join(" "));

        let mut expression = duct::cmd(self.juju_bin.clone(), &full_args)
            .stdout_capture()
            .stderr_capture()
            .unchecked();
        if let Some(juju_data) = &self.juju_data {
            expression = expression.env("JUJU_DATA", juju_data);
        }

        let output = expression.run().context(SpawnSnafu {
            program: self.juju_bin.display().to_string(),
        })?;

        if !output.status.success() {
            return CalledProcessSnafu {
                command: format!("juju {}", full_args.join(" ")),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .fail();
        }

        Ok(output.stdout)
    }

    fn switch(&mut self, model: &str, controller: &str) -> Result<(), JujuError> {
        let target = ModelEnv::new(controller, model);
        self.juju("switch", &[target.qualified_name().as_str()], false)?;
        self.env = target;
        Ok(())
    }

    fn destroy_model(&self) -> Result<(), JujuError> {
        self.juju(
            "destroy-model",
            &[self.env.qualified_name().as_str(), "-y"],
            false,
        )
    }

    fn add_model(&self, model: &str) -> Result<Self, JujuError> {
        self.juju(
            "add-model",
            &[model, "-c", self.env.controller.as_str()],
            false,
        )?;
        Ok(self.bound_to(self.env.with_model(model)))
    }
}
