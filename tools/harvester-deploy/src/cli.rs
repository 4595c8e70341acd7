//! Entry point flows
//!
//! Each binary is a thin `main` around one of the `run_*` functions here.
//! They print to stdout, log to stderr and return the process exit code.

use crate::consumer_key;
use crate::deploy::{self, DeploymentReport};
use crate::driver::{self, DeployVariant, DeploymentPlan, PromptOutcome};
use crate::error::DeployError;
use crate::inventory;
use crate::monitor::MonitorConfig;
use crate::smoke_test;
use anyhow::Context;
use ovh_client::{Credentials, OvhClient, OvhClientTrait};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Build a client for signed calls from `ovh.conf` and the environment
pub fn connect() -> Result<OvhClient, DeployError> {
    let credentials = Credentials::load().map_err(DeployError::Credentials)?;
    credentials.consumer_key().map_err(DeployError::Credentials)?;
    let client = OvhClient::new(&credentials).map_err(DeployError::Credentials)?;
    info!("Using OVH API at {}", client.base_url());
    Ok(client)
}

fn print_credential_help() {
    println!("   Make sure ovh.conf exists (./ovh.conf, ~/.ovh.conf or /etc/ovh.conf)");
    println!("   with application_key, application_secret and consumer_key,");
    println!("   or set OVH_ENDPOINT, OVH_APPLICATION_KEY, OVH_APPLICATION_SECRET and OVH_CONSUMER_KEY.");
}

/// Exit status when Ctrl-C stops the deployment sequence
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Printed when there is nothing to select, whether the list is empty or failed
pub const NO_SERVERS_MESSAGE: &str = "❌ No servers found or API access failed";

/// Interactive deployment
///
/// Exits 1 only when the client cannot be built and 130 when interrupted
/// after the prompts; a failed deployment is reported and still exits 0.
pub async fn run_deploy(variant: DeployVariant) -> ExitCode {
    match variant {
        DeployVariant::SingleStage => println!("🚀 Harvester HCI deployment on OVHcloud"),
        DeployVariant::TwoStage => println!("🚀 Harvester HCI two-stage deployment on OVHcloud"),
    }
    println!("{}", "=".repeat(50));

    let client = match connect() {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            println!("❌ {}", e);
            print_credential_help();
            return ExitCode::FAILURE;
        }
    };

    let mut out = io::stdout();
    match deploy_interactive(&client, variant, &mut out).await {
        Ok(()) => {}
        Err(DeployError::Interrupted) => {
            warn!("Deployment interrupted");
            println!("\n⛔ Interrupted");
            return ExitCode::from(INTERRUPTED_EXIT_CODE);
        }
        Err(e @ (DeployError::InvalidSelection(_) | DeployError::InvalidStage(_))) => println!("❌ {}", e),
        Err(e) => {
            error!("Deployment failed: {}", e);
            println!("❌ {}", e);
            println!("\n❌ Deployment failed!");
        }
    }

    ExitCode::SUCCESS
}

/// List servers and print the selection menu
///
/// Returns `None` when there is nothing to select.
pub async fn load_server_choices<W: Write>(
    client: &dyn OvhClientTrait,
    out: &mut W,
) -> Result<Option<Vec<String>>, DeployError> {
    let summaries = match inventory::list_with_summaries(client).await {
        Ok(summaries) if !summaries.is_empty() => summaries,
        result => {
            if let Err(e) = result {
                warn!("Listing servers failed: {}", e);
            }
            writeln!(out, "{}", NO_SERVERS_MESSAGE)?;
            return Ok(None);
        }
    };
    inventory::print_server_menu(out, &summaries)?;

    Ok(Some(summaries.into_iter().map(|summary| summary.name).collect()))
}

/// List, prompt on the terminal, then deploy
pub async fn deploy_interactive<W: Write>(
    client: &dyn OvhClientTrait,
    variant: DeployVariant,
    out: &mut W,
) -> Result<(), DeployError> {
    let Some(servers) = load_server_choices(client, out).await? else {
        return Ok(());
    };

    let plan = match prompt_for_plan(servers, variant).await? {
        PromptOutcome::Proceed(plan) => plan,
        PromptOutcome::Cancelled => return Ok(()),
    };

    run_deployment(client, &plan, &MonitorConfig::from_env(), out, interrupt_signal()).await?;
    writeln!(out, "\n✅ Deployment initiated successfully!")?;
    Ok(())
}

/// Execute `plan` until it finishes or `interrupt` completes
///
/// Nothing already applied is rolled back on interrupt.
pub async fn run_deployment<W, I>(
    client: &dyn OvhClientTrait,
    plan: &DeploymentPlan,
    config: &MonitorConfig,
    out: &mut W,
    interrupt: I,
) -> Result<DeploymentReport, DeployError>
where
    W: Write,
    I: Future<Output = ()>,
{
    tokio::select! {
        report = deploy::execute_plan(client, plan, config, out) => report,
        () = interrupt => Err(DeployError::Interrupted),
    }
}

/// Completes on the next Ctrl-C
///
/// Never completes when the handler cannot be installed.
pub async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Run the prompts on a blocking thread so Ctrl-C can be observed meanwhile
async fn prompt_for_plan(servers: Vec<String>, variant: DeployVariant) -> Result<PromptOutcome, DeployError> {
    let prompts = tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout();
        driver::collect_plan(&mut input, &mut out, &servers, variant)
    });

    tokio::select! {
        joined = prompts => joined.map_err(|e| DeployError::Io(io::Error::other(e)))?,
        () = interrupt_signal() => {
            println!("\n👋 Deployment cancelled");
            // The prompt thread stays blocked on stdin and would hold up runtime shutdown
            std::process::exit(0);
        }
    }
}

/// Connectivity smoke test; exits 1 on any failed step
pub async fn run_api_test() -> ExitCode {
    println!("🧪 OVH API connectivity test");
    println!("{}", "=".repeat(50));

    let mut out = io::stdout();
    match api_test(&mut out).await {
        Ok(summary) => {
            println!("\n🎉 All API tests passed! ({} servers visible)", summary.server_count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            println!("\n❌ {:#}", e);
            // stdout is gone if this fails too
            let _ = smoke_test::print_troubleshooting(&mut out);
            ExitCode::FAILURE
        }
    }
}

async fn api_test<W: Write>(out: &mut W) -> anyhow::Result<smoke_test::SmokeTestSummary> {
    let client = connect().context("Cannot run API tests")?;
    let summary = smoke_test::run_smoke_test(&client, out)
        .await
        .context("API test failed")?;
    Ok(summary)
}

/// Request a consumer key for the configured application
pub async fn run_validate_consumer_key() -> ExitCode {
    println!("🔐 OVH consumer key setup");
    println!("{}", "=".repeat(50));

    let mut out = io::stdout();
    match validate(&mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            println!("❌ {:#}", e);
            print_credential_help();
            ExitCode::FAILURE
        }
    }
}

async fn validate<W: Write>(out: &mut W) -> anyhow::Result<()> {
    // The consumer key is what is being requested, so it may be missing here
    let credentials = Credentials::load().context("Failed to load application credentials")?;
    let client = OvhClient::new(&credentials).context("Failed to initialize OVH client")?;
    writeln!(out, "   Endpoint: {} ({})", credentials.endpoint, client.base_url())?;
    writeln!(out, "   Application key: {}", credentials.application_key)?;

    let request = consumer_key::request_consumer_key(&client, out)
        .await
        .context("Failed to request a consumer key")?;

    let opened = consumer_key::open_in_browser(&request.validation_url);
    consumer_key::print_validation_steps(out, &request, opened)?;
    consumer_key::print_config_snippet(
        out,
        &credentials.endpoint,
        &credentials.application_key,
        &request.consumer_key,
    )?;
    Ok(())
}
