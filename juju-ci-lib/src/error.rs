//! Error types shared by every acceptance check
//!
//! `JujuAssertionError` is the verdict of a check: juju ran fine but left the
//! controller or model in a state the check did not expect. Everything else in
//! `JujuError` is plumbing failing underneath the check (juju missing, a
//! command exiting non-zero, output that cannot be decoded).

use snafu::Snafu;
use std::string::FromUtf8Error;

/// Juju behaved, but not the way the check expected.
#[derive(Debug, Snafu)]
#[snafu(display("{message}"))]
pub struct JujuAssertionError {
    message: String,
}

impl JujuAssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum JujuError {
    #[snafu(context(false), display("{source}"))]
    Assertion { source: JujuAssertionError },

    #[snafu(display("Failed to execute {program}: {source}"))]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("Command '{command}' returned non-zero exit status {code}: {stderr}"))]
    CalledProcess {
        command: String,
        code: i32,
        stderr: String,
    },

    #[snafu(display("Output of juju {command} is not valid UTF-8"))]
    Decode {
        command: String,
        source: FromUtf8Error,
    },

    #[snafu(display("Failed to parse output of juju {command}: {source}"))]
    ParseJson {
        command: String,
        source: serde_json::Error,
    },
}

impl JujuError {
    /// True when the error is an assertion verdict rather than a plumbing failure
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion { .. })
    }
}
