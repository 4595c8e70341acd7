//! Boot configuration
//!
//! Assigns a generated iPXE script as the server's network boot script.
//! The call replaces whatever script was active; there is nothing to roll back.

use ovh_client::{OvhClientTrait, OvhError};
use tracing::{error, info};

/// Outcome of a successful apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedBootScript {
    /// Script length in characters
    pub length: usize,
}

/// Assign `script` as the network boot script of `server`
pub async fn apply_boot_script(
    client: &dyn OvhClientTrait,
    server: &str,
    script: &str,
) -> Result<AppliedBootScript, OvhError> {
    info!("Applying iPXE boot script to {}", server);

    match client.set_boot_script(server, script).await {
        Ok(()) => Ok(AppliedBootScript {
            length: script.chars().count(),
        }),
        Err(e) => {
            error!("Failed to apply boot script to {}: {}", server, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovh_client::{MockCall, MockOvhClient};

    #[tokio::test]
    async fn test_apply_records_script() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_simple_server("srv1", "advance-1", "bhs5", "ok");

        let applied = apply_boot_script(&mock, "srv1", "#!ipxe\nboot").await.unwrap();
        assert_eq!(applied.length, 11);
        assert_eq!(
            mock.applied_scripts(),
            vec![("srv1".to_string(), "#!ipxe\nboot".to_string())]
        );
    }

    #[tokio::test]
    async fn test_apply_failure_is_returned() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_simple_server("srv1", "advance-1", "bhs5", "ok");
        mock.fail_on(MockCall::SetBootScript);

        assert!(apply_boot_script(&mock, "srv1", "#!ipxe").await.is_err());
        assert!(mock.applied_scripts().is_empty());
    }
}
