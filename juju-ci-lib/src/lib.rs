//! Shared layer for juju acceptance checks
//!
//! - `client`: the `ModelClient` trait and the `JujuClient` that shells out to juju
//! - `bootstrap`: temporary controllers with guaranteed teardown
//! - `utility`: model helpers, `TEST_MODEL` and logging setup
//! - `args` / `config`: command-line and file configuration

pub mod args;
pub mod bootstrap;
pub mod client;
pub mod config;
pub mod error;
pub mod utility;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use args::BasicTestingArgs;
pub use bootstrap::BootstrapManager;
pub use client::{JujuClient, ModelClient, ModelEnv};
pub use config::{ConfigError, JujuCiConfig};
pub use error::{JujuAssertionError, JujuError};
pub use utility::{TEST_MODEL, add_model, configure_logging, get_current_model};
