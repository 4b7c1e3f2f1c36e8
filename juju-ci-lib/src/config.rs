//! User configuration for juju-ci
//!
//! Loaded from an explicit TOML file when one is given, otherwise from the
//! per-user confy location (`juju-ci/config.toml`). Command-line arguments
//! override anything set here.

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "juju-ci";
const CONFIG_NAME: &str = "config";

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read {}: {source}", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to parse {}: {source}", path.display()))]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[snafu(display("Failed to load user configuration: {source}"))]
    User { source: confy::ConfyError },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JujuCiConfig {
    /// juju binary used when none is given on the command line
    pub juju_bin: String,
    /// Exported as `JUJU_DATA`; `~` is expanded
    pub juju_data: Option<String>,
    /// Series passed to bootstrap when `--series` is absent
    pub default_series: Option<String>,
    /// Never kill controllers after a check
    pub keep_env: bool,
}

impl Default for JujuCiConfig {
    fn default() -> Self {
        Self {
            juju_bin: "juju".to_string(),
            juju_data: None,
            default_series: None,
            keep_env: false,
        }
    }
}

impl JujuCiConfig {
    /// Load from `path`, or from the user config when `path` is `None`.
    ///
    /// A named file that does not exist yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_file(path),
            None => confy::load(APP_NAME, Some(CONFIG_NAME)).context(UserSnafu),
        }
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).context(ReadSnafu { path })?;
        toml::from_str(&content).context(ParseSnafu { path })
    }

    /// `juju_data` with `~` expanded
    pub fn juju_data_path(&self) -> Option<PathBuf> {
        self.juju_data
            .as_deref()
            .map(|raw| PathBuf::from(shellexpand::tilde(raw).as_ref()))
    }
}
