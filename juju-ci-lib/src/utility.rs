//! Helpers shared by acceptance checks

use crate::client::ModelClient;
use crate::error::{DecodeSnafu, JujuAssertionError, JujuError, ParseJsonSnafu};
use serde::Deserialize;
use snafu::ResultExt;
use tracing::{info, warn};

/// Name of the throwaway model checks create next to the bootstrapped one
pub const TEST_MODEL: &str = "test-tmp-env";

/// Subset of `juju list-models --format json`
#[derive(Debug, Default, Deserialize)]
pub struct ModelListing {
    #[serde(default)]
    pub models: Vec<ListedModel>,
    #[serde(rename = "current-model")]
    pub current_model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListedModel {
    pub name: String,
}

/// Models on the client's current controller
pub fn list_models<C: ModelClient>(client: &C) -> Result<ModelListing, JujuError> {
    let raw = client.get_juju_output("list-models", &["--format", "json"], false)?;
    let text = String::from_utf8(raw).context(DecodeSnafu {
        command: "list-models",
    })?;
    serde_json::from_str(&text).context(ParseJsonSnafu {
        command: "list-models",
    })
}

/// Name of the currently selected model, `None` when nothing is selected
pub fn get_current_model<C: ModelClient>(client: &C) -> Result<Option<String>, JujuError> {
    let listing = list_models(client)?;
    if listing.current_model.is_none() {
        warn!("No model is currently selected.");
    }
    Ok(listing.current_model)
}

/// Add `TEST_MODEL` to the client's controller and check juju selected it
pub fn add_model<C: ModelClient>(client: &C) -> Result<C, JujuError> {
    info!("Adding model \"{}\" to current controller", TEST_MODEL);
    let new_client = client.add_model(TEST_MODEL)?;
    let new_model = get_current_model(&new_client)?;
    if new_model.as_deref() == Some(TEST_MODEL) {
        info!("Current model and newly added model match");
        Ok(new_client)
    } else {
        Err(JujuAssertionError::new(format!(
            "Juju failed to switch to new model after creation. Expected {} got {}",
            TEST_MODEL,
            new_model.as_deref().unwrap_or("None")
        ))
        .into())
    }
}

/// Route log output to stderr at `info`, or `debug` when verbose.
///
/// `RUST_LOG` overrides the level. Calling it twice is harmless.
pub fn configure_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .try_init();
}
