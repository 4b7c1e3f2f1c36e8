//! Assess if juju tracks the model when the current model is destroyed
//!
//! Juju should drop its current model selection when that model is
//! destroyed. The check adds a throwaway model (which juju selects), destroys
//! it, expects the selection to be empty, then switches back to the model it
//! started on.

use juju_ci_lib::error::{DecodeSnafu, JujuAssertionError, JujuError};
use juju_ci_lib::{ModelClient, TEST_MODEL, add_model, get_current_model};
use snafu::ResultExt;
use tracing::info;

/// Run the whole check against `client`, leaving it on the model it started on
///
/// The client must start with a model selected. With nothing selected there
/// is no model to switch back to, so the check fails up front with an
/// assertion rather than issuing a `juju switch` without a model. A bootstrap
/// with `--default-model` always leaves a model selected.
pub fn assess_destroy_model<C: ModelClient>(client: &mut C) -> Result<(), JujuError> {
    let current_model = get_current_model(&*client)?.ok_or_else(|| {
        JujuAssertionError::new("No model is selected, nothing to switch back to")
    })?;
    let controller = get_current_controller(&*client)?;
    info!("Current model: {}", current_model);

    let new_client = add_model(&*client)?;
    destroy_model(&*client, &new_client)?;

    info!(
        "Juju successfully dropped its current model. Switching to {} to complete test",
        current_model
    );
    switch_model(client, &current_model, &controller)?;

    info!("SUCCESS");
    Ok(())
}

/// Destroy the model behind `new_client` and check `client` has no selection left
pub fn destroy_model<C: ModelClient>(client: &C, new_client: &C) -> Result<(), JujuError> {
    info!("Destroying model \"{}\"", TEST_MODEL);
    new_client.destroy_model()?;
    let new_model = get_current_model(client)?;
    if new_model.is_some_and(|model| !model.is_empty()) {
        return Err(
            JujuAssertionError::new("Juju failed to unset model after it was destroyed").into(),
        );
    }
    Ok(())
}

/// Switch back to `current_model` and check juju landed there
pub fn switch_model<C: ModelClient>(
    client: &mut C,
    current_model: &str,
    current_controller: &str,
) -> Result<(), JujuError> {
    client.switch(current_model, current_controller)?;
    let new_model = get_current_model(&*client)?;
    if new_model.as_deref() == Some(current_model) {
        info!("Current model and switch target match");
        Ok(())
    } else {
        Err(JujuAssertionError::new(format!(
            "Juju failed to switch back to existing model. Expected {} got {}",
            TEST_MODEL,
            new_model.as_deref().unwrap_or("None")
        ))
        .into())
    }
}

/// Controller name from `juju switch`, i.e. everything before the first colon
pub fn get_current_controller<C: ModelClient>(client: &C) -> Result<String, JujuError> {
    let raw = client.get_juju_output("switch", &[], false)?;
    let raw = String::from_utf8(raw).context(DecodeSnafu { command: "switch" })?;
    Ok(controller_prefix(&raw).to_string())
}

fn controller_prefix(switch_output: &str) -> &str {
    // split always yields at least one piece
    switch_output.split(':').next().unwrap_or(switch_output)
}
