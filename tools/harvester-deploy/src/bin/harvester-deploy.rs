//! Single-stage Harvester deployment
//!
//! Partitions, builds RAID1 and installs Harvester in one network boot.

use harvester_deploy::{cli, logging, DeployVariant};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    cli::run_deploy(DeployVariant::SingleStage).await
}
