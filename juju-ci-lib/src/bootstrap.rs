//! Scoped controller bootstrap with guaranteed teardown
//!
//! `BootstrapManager::booted_context` bootstraps a temporary controller, hands
//! a client bound to its default model to the check, and tears the controller
//! down afterwards whether the check passed or not.

use crate::args::BasicTestingArgs;
use crate::client::{JujuClient, ModelClient, ModelEnv};
use crate::config::JujuCiConfig;
use crate::error::JujuError;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug)]
pub struct BootstrapManager {
    client: JujuClient,
    cloud: String,
    series: Option<String>,
    agent_url: Option<String>,
    agent_stream: Option<String>,
    log_dir: Option<PathBuf>,
    keep_env: bool,
}

impl BootstrapManager {
    /// Build a manager from command-line arguments layered over `config`
    pub fn from_args(args: &BasicTestingArgs, config: &JujuCiConfig) -> Self {
        let name = args
            .temp_env_name
            .clone()
            .unwrap_or_else(generate_env_name);
        let juju_bin = args
            .juju_bin
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.juju_bin));
        let cloud = match &args.region {
            Some(region) => format!("{}/{}", args.env, region),
            None => args.env.clone(),
        };

        let client = JujuClient::new(ModelEnv::new(name.clone(), name), juju_bin)
            .with_juju_data(config.juju_data_path())
            .with_debug(args.debug);

        Self {
            client,
            cloud,
            series: args.series.clone().or_else(|| config.default_series.clone()),
            agent_url: args.agent_url.clone(),
            agent_stream: args.agent_stream.clone(),
            log_dir: args.logs.clone(),
            keep_env: args.keep_env || config.keep_env,
        }
    }

    pub fn client(&self) -> &JujuClient {
        &self.client
    }

    pub fn cloud(&self) -> &str {
        &self.cloud
    }

    /// Extra `juju bootstrap` arguments after cloud, controller and default model
    pub fn bootstrap_args(&self, upload_tools: bool) -> Vec<String> {
        let mut args = Vec::new();
        if upload_tools {
            args.push("--upload-tools".to_string());
        }
        if let Some(series) = &self.series {
            args.push("--bootstrap-series".to_string());
            args.push(series.clone());
        }
        if let Some(url) = &self.agent_url {
            args.push("--config".to_string());
            args.push(format!("agent-metadata-url={url}"));
        }
        if let Some(stream) = &self.agent_stream {
            args.push("--config".to_string());
            args.push(format!("agent-stream={stream}"));
        }
        args
    }

    /// Bootstrap, run `body` against the default model, then tear down.
    ///
    /// An error from bootstrap or `body` takes precedence over one from
    /// teardown; teardown errors surface only when everything else passed.
    pub fn booted_context<T, F>(&mut self, upload_tools: bool, body: F) -> Result<T, JujuError>
    where
        F: FnOnce(&mut JujuClient) -> Result<T, JujuError>,
    {
        let extra_args = self.bootstrap_args(upload_tools);
        info!(
            "Bootstrapping controller {} on {}",
            self.client.env().controller,
            self.cloud
        );
        let result = self
            .client
            .bootstrap(&self.cloud, &extra_args)
            .and_then(|()| body(&mut self.client));

        let teardown = self.tear_down();
        match (result, teardown) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) | (Err(err), Ok(())) => Err(err),
            (Err(err), Err(teardown_err)) => {
                warn!("Teardown also failed: {}", teardown_err);
                Err(err)
            }
        }
    }

    fn tear_down(&self) -> Result<(), JujuError> {
        self.dump_logs();
        if self.keep_env {
            info!(
                "Keeping controller {} as requested",
                self.client.env().controller
            );
            return Ok(());
        }
        info!("Killing controller {}", self.client.env().controller);
        self.client.kill_controller()
    }

    /// Save the controller's debug log into the log directory, if there is one
    fn dump_logs(&self) {
        let Some(log_dir) = &self.log_dir else {
            return;
        };
        let controller_client = self
            .client
            .bound_to(self.client.env().with_model("controller"));

        let dumped = controller_client
            .get_juju_output("debug-log", &["--replay", "--no-tail"], true)
            .map_err(|err| err.to_string())
            .and_then(|log| {
                std::fs::create_dir_all(log_dir)
                    .and_then(|()| std::fs::write(log_dir.join("debug-log.txt"), log))
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = dumped {
            warn!("Could not save controller logs to {}: {}", log_dir.display(), err);
        }
    }
}

/// Controller name for runs that did not ask for one
fn generate_env_name() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("juju-ci-{}", &id[..8])
}
