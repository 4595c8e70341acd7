//! Server inventory
//!
//! Read-only access to the dedicated servers of the account. Every read is a
//! fresh API call; nothing is cached between steps.

use ovh_client::{DedicatedServer, OvhClientTrait, OvhError};
use std::io::Write;
use tracing::{debug, warn};

/// Placeholder shown for attributes the API did not return
pub const NOT_AVAILABLE: &str = "N/A";

/// State reported when the API omits it
pub const UNKNOWN_STATE: &str = "unknown";

/// A server's attributes at the time of the read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    /// Server identifier
    pub name: String,
    /// Offer range, e.g. `advance-1`
    pub commercial_range: Option<String>,
    /// Datacenter code, e.g. `bhs5`
    pub datacenter: Option<String>,
    /// Operational state, [`UNKNOWN_STATE`] when omitted
    pub state: String,
    /// Normalized boot type, `unknown` when the response had no usable shape
    pub boot_type: String,
    /// Active network boot script, if any
    pub boot_script: Option<String>,
}

impl ServerDescriptor {
    /// Print the descriptor the way the deploy flow shows it
    pub fn print<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "🖥️  Server Information: {}", self.name)?;
        writeln!(out, "   Commercial Range: {}", or_na(self.commercial_range.as_deref()))?;
        writeln!(out, "   Datacenter: {}", or_na(self.datacenter.as_deref()))?;
        writeln!(out, "   Current Boot Mode: {}", self.boot_type)?;
        writeln!(out, "   State: {}", self.state)
    }
}

/// One entry of the selection menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSummary {
    /// Server identifier
    pub name: String,
    /// `None` when the per-server read failed
    pub details: Option<DedicatedServer>,
}

/// Display helper for optional attributes
pub fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// List the identifiers of every dedicated server on the account
///
/// An empty list cannot be told apart from missing list rights; callers treat
/// both the same way.
pub async fn list_servers(client: &dyn OvhClientTrait) -> Result<Vec<String>, OvhError> {
    let servers = client.list_dedicated_servers().await?;
    debug!("Account has {} dedicated servers", servers.len());
    Ok(servers)
}

/// List servers with their general information, for the selection menu
///
/// A failed per-server read leaves that entry without details.
pub async fn list_with_summaries(client: &dyn OvhClientTrait) -> Result<Vec<ServerSummary>, OvhError> {
    let names = list_servers(client).await?;
    let mut summaries = Vec::with_capacity(names.len());

    for name in names {
        let details = match client.get_dedicated_server(&name).await {
            Ok(server) => Some(server),
            Err(e) => {
                warn!("Failed to read server {}: {}", name, e);
                None
            }
        };
        summaries.push(ServerSummary { name, details });
    }

    Ok(summaries)
}

/// Print the numbered selection menu
pub fn print_server_menu<W: Write>(out: &mut W, summaries: &[ServerSummary]) -> std::io::Result<()> {
    writeln!(out, "📋 Available servers:")?;
    for (i, summary) in summaries.iter().enumerate() {
        let details = summary.details.as_ref();
        writeln!(
            out,
            "  {}. {} - {} - {}",
            i + 1,
            summary.name,
            or_na(details.and_then(|d| d.commercial_range.as_deref())),
            or_na(details.and_then(|d| d.datacenter.as_deref())),
        )?;
    }
    Ok(())
}

/// Read a server's general information and boot configuration
pub async fn describe(client: &dyn OvhClientTrait, name: &str) -> Result<ServerDescriptor, OvhError> {
    let server = client.get_dedicated_server(name).await?;
    let boot = client.get_server_boot(name).await?;

    Ok(ServerDescriptor {
        name: name.to_string(),
        commercial_range: server.commercial_range,
        datacenter: server.datacenter,
        state: server.state.unwrap_or_else(|| UNKNOWN_STATE.to_string()),
        boot_type: boot.boot_type,
        boot_script: server.boot_script,
    })
}

/// Read only the operational state of a server
pub async fn read_state(client: &dyn OvhClientTrait, name: &str) -> Result<String, OvhError> {
    let server = client.get_dedicated_server(name).await?;
    Ok(server.state.unwrap_or_else(|| UNKNOWN_STATE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovh_client::{MockCall, MockOvhClient};
    use serde_json::json;

    #[tokio::test]
    async fn test_describe_normalizes_single_record() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_simple_server("srv1", "advance-1", "bhs5", "ok");
        mock.set_boot_response("srv1", json!({"bootType": "network"}));

        let descriptor = describe(&mock, "srv1").await.unwrap();
        assert_eq!(descriptor.boot_type, "network");
        assert_eq!(descriptor.state, "ok");
        assert_eq!(descriptor.commercial_range.as_deref(), Some("advance-1"));
        assert_eq!(descriptor.datacenter.as_deref(), Some("bhs5"));
    }

    #[tokio::test]
    async fn test_describe_normalizes_list() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_simple_server("srv1", "advance-1", "bhs5", "ok");
        mock.set_boot_response("srv1", json!([{"bootType": "network"}]));

        let descriptor = describe(&mock, "srv1").await.unwrap();
        assert_eq!(descriptor.boot_type, "network");
    }

    #[tokio::test]
    async fn test_describe_unknown_boot_shape() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_server("srv1", DedicatedServer::default());
        mock.set_boot_response("srv1", json!([]));

        let descriptor = describe(&mock, "srv1").await.unwrap();
        assert_eq!(descriptor.boot_type, "unknown");
        assert_eq!(descriptor.state, UNKNOWN_STATE);
        assert!(descriptor.commercial_range.is_none());
    }

    #[tokio::test]
    async fn test_describe_propagates_errors() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_simple_server("srv1", "advance-1", "bhs5", "ok");
        mock.fail_on(MockCall::GetBoot);

        assert!(describe(&mock, "srv1").await.is_err());
        assert!(matches!(
            describe(&mock, "missing").await,
            Err(OvhError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_propagates_errors() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.fail_on(MockCall::ListServers);
        assert!(list_servers(&mock).await.is_err());
    }

    #[tokio::test]
    async fn test_summaries_tolerate_detail_failures() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_simple_server("srvA", "advance-1", "bhs5", "ok");
        mock.add_simple_server("srvB", "rise-2", "gra3", "ok");
        mock.fail_on(MockCall::GetServer);

        let summaries = list_with_summaries(&mock).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.details.is_none()));

        let mut out = Vec::new();
        print_server_menu(&mut out, &summaries).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  1. srvA - N/A - N/A"));
        assert!(text.contains("  2. srvB - N/A - N/A"));
    }

    #[tokio::test]
    async fn test_menu_lists_details() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_simple_server("srvA", "advance-1", "bhs5", "ok");

        let summaries = list_with_summaries(&mock).await.unwrap();
        let mut out = Vec::new();
        print_server_menu(&mut out, &summaries).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("  1. srvA - advance-1 - bhs5"));
    }
}
