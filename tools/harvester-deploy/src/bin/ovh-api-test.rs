//! OVH API connectivity test
//!
//! Checks that the configured credentials can read the account and its
//! dedicated servers before running a deployment.

use harvester_deploy::{cli, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    cli::run_api_test().await
}
