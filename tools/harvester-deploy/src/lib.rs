//! Harvester Deploy
//!
//! Interactive deployment of Harvester HCI onto OVHcloud dedicated servers:
//! - inventory: list and describe servers
//! - boot_config / reboot: assign the iPXE script and restart the server
//! - monitor: poll the server state until it is back or a timeout elapses
//! - driver / deploy: prompt sequence and the deployment itself
//! - smoke_test / consumer_key: credential checks and consumer key setup
//!
//! Everything talks to the API through [`ovh_client::OvhClientTrait`] so the
//! flows run unchanged against [`ovh_client::MockOvhClient`] in tests.

pub mod boot_config;
pub mod cli;
pub mod consumer_key;
pub mod deploy;
pub mod driver;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod monitor;
pub mod reboot;
pub mod smoke_test;

pub use driver::{DeployVariant, DeploymentPlan, PromptOutcome};
pub use error::DeployError;
pub use monitor::{MonitorConfig, MonitorOutcome};
