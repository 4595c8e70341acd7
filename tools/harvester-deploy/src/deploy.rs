//! Deployment sequence
//!
//! Runs a confirmed [`DeploymentPlan`]: describe the server, generate and
//! apply the iPXE script, reboot, then watch the state. Each step runs only
//! after the previous one succeeded; nothing is rolled back on failure.

use crate::boot_config;
use crate::driver::DeploymentPlan;
use crate::error::DeployError;
use crate::inventory::{self, NOT_AVAILABLE};
use crate::monitor::{self, MonitorConfig, MonitorOutcome};
use crate::reboot;
use ipxe_script::{ipxe_script, BootTarget};
use ovh_client::{OvhClientTrait, Task};
use std::io::Write;
use tracing::info;

/// What a completed deployment did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReport {
    /// Server identifier
    pub server: String,
    /// Boot the applied script was generated for
    pub target: BootTarget,
    /// Length of the applied script in characters
    pub script_length: usize,
    /// Task returned by the reboot request
    pub reboot_task: Task,
    /// How monitoring ended; does not change the deployment result
    pub monitor: MonitorOutcome,
}

/// Execute `plan` against the API
///
/// A monitor timeout still completes the deployment; the outcome is only
/// reported in the returned [`DeploymentReport`].
pub async fn execute_plan<W: Write>(
    client: &dyn OvhClientTrait,
    plan: &DeploymentPlan,
    monitor_config: &MonitorConfig,
    out: &mut W,
) -> Result<DeploymentReport, DeployError> {
    let config_url = plan.config_url.as_deref();

    writeln!(out, "\n🚀 Starting Harvester HCI deployment...")?;
    writeln!(out, "   Target server: {}", plan.server)?;
    writeln!(out, "   Boot target: {}", plan.target.description())?;
    writeln!(out, "   Cloud-init URL: {}", config_url.unwrap_or("default"))?;
    info!("Deploying {} to {}", plan.target.description(), plan.server);

    writeln!(out, "\n1️⃣  Getting server information...")?;
    let descriptor = inventory::describe(client, &plan.server)
        .await
        .map_err(DeployError::Describe)?;
    descriptor.print(out)?;

    writeln!(out, "\n2️⃣  Configuring iPXE boot...")?;
    let script = ipxe_script(plan.target, config_url);
    let applied = boot_config::apply_boot_script(client, &plan.server, &script)
        .await
        .map_err(DeployError::ApplyBootScript)?;
    writeln!(out, "✅ iPXE boot script configured successfully")?;
    writeln!(out, "   Script length: {} characters", applied.length)?;

    writeln!(out, "\n3️⃣  Rebooting server...")?;
    let task = reboot::reboot(client, &plan.server)
        .await
        .map_err(DeployError::Reboot)?;
    writeln!(out, "✅ Server reboot initiated")?;
    writeln!(
        out,
        "   Task ID: {}",
        task.id.map_or_else(|| NOT_AVAILABLE.to_string(), |id| id.to_string())
    )?;

    writeln!(out, "\n4️⃣  Monitoring deployment...")?;
    let outcome = monitor::monitor_deployment(client, &plan.server, monitor_config, out).await?;
    info!(
        "Monitoring of {} finished after {} polls (healthy: {})",
        plan.server,
        outcome.polls(),
        outcome.is_healthy()
    );

    print_next_steps(out, plan.target)?;

    Ok(DeploymentReport {
        server: plan.server.clone(),
        target: plan.target,
        script_length: applied.length,
        reboot_task: task,
        monitor: outcome,
    })
}

/// Print what the operator does after the tool is done
pub fn print_next_steps<W: Write>(out: &mut W, target: BootTarget) -> std::io::Result<()> {
    writeln!(out, "\n📝 Next steps:")?;
    writeln!(out, "   1. Monitor the installation via the OVH IPMI/KVM console")?;
    writeln!(out, "   2. Wait 15-45 minutes for the installation to finish")?;

    match target {
        BootTarget::RaidPreparation => {
            writeln!(out, "   3. Once the RAID array is ready, run harvester-deploy-2stage again")?;
            writeln!(out, "      and choose stage 2 to install Harvester onto it")?;
        }
        BootTarget::SingleStage | BootTarget::PlatformInstall => {
            writeln!(out, "   3. Open the Harvester UI at https://<server-ip>:443")?;
            writeln!(out, "   4. SSH to the node as: rancher@<server-ip>")?;
        }
    }
    Ok(())
}
