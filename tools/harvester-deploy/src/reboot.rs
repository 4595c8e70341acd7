//! Reboot trigger

use ovh_client::{OvhClientTrait, OvhError, Task};
use tracing::{error, info};

/// Request a reboot of `server`
///
/// The server state is not checked first and the request is not retried.
/// The returned task is informational; deployment progress is tracked by
/// polling the server state instead.
pub async fn reboot(client: &dyn OvhClientTrait, server: &str) -> Result<Task, OvhError> {
    match client.reboot_server(server).await {
        Ok(task) => {
            info!("Reboot of {} requested (task {:?})", server, task.id);
            Ok(task)
        }
        Err(e) => {
            error!("Failed to reboot {}: {}", server, e);
            Err(e)
        }
    }
}
