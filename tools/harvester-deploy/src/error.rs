//! Deployment error types.
//!
//! Each variant maps to one failure class of the tool: fatal credential
//! problems, a failed provider call at a given step, or bad operator input.
//! Monitoring errors never surface here; the monitor logs and keeps polling.

use ovh_client::OvhError;
use thiserror::Error;

/// Errors that can occur while deploying Harvester.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Credentials could not be resolved or the client could not be built
    #[error("Failed to initialize OVH client: {0}")]
    Credentials(#[source] OvhError),

    /// Reading server information failed
    #[error("Failed to get server info: {0}")]
    Describe(#[source] OvhError),

    /// Assigning the boot script failed
    #[error("Failed to configure iPXE boot: {0}")]
    ApplyBootScript(#[source] OvhError),

    /// Requesting the reboot failed
    #[error("Failed to reboot server: {0}")]
    Reboot(#[source] OvhError),

    /// Any other OVH API call failed
    #[error("OVH API error: {0}")]
    Api(#[from] OvhError),

    /// The server selection matched nothing
    #[error("{0}")]
    InvalidSelection(String),

    /// The stage choice was not 1 or 2
    #[error("Invalid stage '{0}' (expected 1 or 2)")]
    InvalidStage(String),

    /// Ctrl-C arrived after the prompts
    #[error("Interrupted")]
    Interrupted,

    /// Reading a prompt answer or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
