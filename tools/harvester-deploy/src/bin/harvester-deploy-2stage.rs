//! Two-stage Harvester deployment
//!
//! Run once with stage 1 to prepare the RAID array, then again with stage 2
//! to install Harvester onto it.

use harvester_deploy::{cli, logging, DeployVariant};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    cli::run_deploy(DeployVariant::TwoStage).await
}
