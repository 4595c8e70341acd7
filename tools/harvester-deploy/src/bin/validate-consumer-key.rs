//! Consumer key setup
//!
//! Requests a consumer key with the access rules the deploy tools need and
//! prints how to activate it.

use harvester_deploy::{cli, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    cli::run_validate_consumer_key().await
}
