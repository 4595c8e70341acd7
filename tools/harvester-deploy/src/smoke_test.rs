//! Connectivity smoke test
//!
//! Exercises the read-only calls a deployment depends on so credentials can be
//! checked before anything is changed on a server.

use crate::inventory::or_na;
use ovh_client::{Account, OvhClientTrait, OvhError};
use std::io::Write;
use tracing::{info, warn};

/// Servers whose details are read in step 2
pub const DETAIL_LIMIT: usize = 5;

/// Errors that fail the smoke test
#[derive(Debug, thiserror::Error)]
pub enum SmokeTestError {
    /// Step 1 failed
    #[error("Failed to get account info: {0}")]
    Account(#[source] OvhError),

    /// Step 2 failed
    #[error("Failed to list dedicated servers: {0}")]
    ListServers(#[source] OvhError),

    /// Writing progress failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the smoke test saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeTestSummary {
    /// Account the consumer key belongs to
    pub account: Account,
    /// Servers visible to the consumer key
    pub server_count: usize,
    /// Whether every endpoint of the permission check answered
    pub permissions_ok: bool,
    /// Whether boot and task reads on the first server both worked
    pub first_server_ok: Option<bool>,
}

/// Run the four smoke test steps, writing progress to `out`
pub async fn run_smoke_test<W: Write>(
    client: &dyn OvhClientTrait,
    out: &mut W,
) -> Result<SmokeTestSummary, SmokeTestError> {
    writeln!(out, "🌐 API endpoint: {}", client.base_url())?;

    writeln!(out, "\n1️⃣  Testing account access (GET /me)...")?;
    let account = client.get_me().await.map_err(SmokeTestError::Account)?;
    writeln!(out, "✅ Account access OK")?;
    writeln!(out, "   Nichandle: {}", or_na(account.nichandle.as_deref()))?;
    writeln!(
        out,
        "   Name: {} {}",
        account.firstname.as_deref().unwrap_or_default(),
        or_na(account.name.as_deref())
    )?;
    writeln!(out, "   Email: {}", or_na(account.email.as_deref()))?;
    writeln!(out, "   Country: {}", or_na(account.country.as_deref()))?;

    writeln!(out, "\n2️⃣  Listing dedicated servers (GET /dedicated/server)...")?;
    let servers = client
        .list_dedicated_servers()
        .await
        .map_err(SmokeTestError::ListServers)?;
    writeln!(out, "✅ Found {} dedicated servers", servers.len())?;

    for name in servers.iter().take(DETAIL_LIMIT) {
        match client.get_dedicated_server(name).await {
            Ok(server) => writeln!(
                out,
                "   • {}: {} in {} ({})",
                name,
                or_na(server.commercial_range.as_deref()),
                or_na(server.datacenter.as_deref()),
                or_na(server.state.as_deref())
            )?,
            Err(e) => {
                warn!("Failed to read server {}: {}", name, e);
                writeln!(out, "   • {}: ❌ {}", name, e)?;
            }
        }
    }
    if servers.len() > DETAIL_LIMIT {
        writeln!(out, "   ... and {} more", servers.len() - DETAIL_LIMIT)?;
    }

    writeln!(out, "\n3️⃣  Checking permissions...")?;
    let permissions_ok = check_permissions(client, out).await?;

    let first_server_ok = match servers.first() {
        Some(first) => {
            writeln!(out, "\n4️⃣  Checking server operations on {}...", first)?;
            Some(check_server_operations(client, first, out).await?)
        }
        None => {
            writeln!(out, "\n4️⃣  No servers, skipping server operation checks")?;
            None
        }
    };

    info!("Smoke test passed against {}", client.base_url());
    Ok(SmokeTestSummary {
        account,
        server_count: servers.len(),
        permissions_ok,
        first_server_ok,
    })
}

/// Required read endpoints; failures are warnings only
async fn check_permissions<W: Write>(client: &dyn OvhClientTrait, out: &mut W) -> std::io::Result<bool> {
    let mut ok = true;

    match client.list_dedicated_servers().await {
        Ok(_) => writeln!(out, "   ✅ GET /dedicated/server")?,
        Err(e) => {
            warn!("Permission check failed for GET /dedicated/server: {}", e);
            writeln!(out, "   ❌ GET /dedicated/server: {}", e)?;
            ok = false;
        }
    }

    match client.get_me().await {
        Ok(_) => writeln!(out, "   ✅ GET /me")?,
        Err(e) => {
            warn!("Permission check failed for GET /me: {}", e);
            writeln!(out, "   ❌ GET /me: {}", e)?;
            ok = false;
        }
    }

    if ok {
        writeln!(out, "   ✅ All required permissions verified")?;
    } else {
        writeln!(out, "   ⚠️  Some permissions may be missing")?;
    }
    Ok(ok)
}

/// Boot and task reads; failures are warnings only
async fn check_server_operations<W: Write>(
    client: &dyn OvhClientTrait,
    server: &str,
    out: &mut W,
) -> std::io::Result<bool> {
    let mut ok = true;

    match client.get_server_boot(server).await {
        Ok(boot) => writeln!(out, "   ✅ Boot configuration: {}", boot.boot_type)?,
        Err(e) => {
            warn!("Boot configuration read failed for {}: {}", server, e);
            writeln!(out, "   ⚠️  Boot configuration: {}", e)?;
            ok = false;
        }
    }

    match client.list_server_tasks(server).await {
        Ok(tasks) => writeln!(out, "   ✅ Tasks: {} found", tasks.len())?,
        Err(e) => {
            warn!("Task list read failed for {}: {}", server, e);
            writeln!(out, "   ⚠️  Tasks: {}", e)?;
            ok = false;
        }
    }

    Ok(ok)
}

/// Hints printed when the smoke test fails
pub fn print_troubleshooting<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "\n🔧 Troubleshooting:")?;
    writeln!(out, "   1. Check that ovh.conf (or the OVH_* variables) holds the right keys")?;
    writeln!(out, "   2. Check that the endpoint matches the account region (ovh-eu, ovh-ca, ...)")?;
    writeln!(out, "   3. Run validate-consumer-key and activate the new key in a browser")?;
    writeln!(out, "   4. Make sure the consumer key grants GET on /me and /dedicated/server/*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovh_client::{MockCall, MockOvhClient};

    fn account() -> Account {
        Account {
            nichandle: Some("ab12345-ovh".to_string()),
            firstname: Some("Sam".to_string()),
            name: Some("Doe".to_string()),
            email: Some("sam@example.test".to_string()),
            country: Some("CA".to_string()),
        }
    }

    #[tokio::test]
    async fn test_reports_account_and_servers() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.set_account(account());
        mock.add_simple_server("srv1", "advance-1", "bhs5", "ok");
        mock.set_tasks("srv1", vec![1, 2]);

        let mut out = Vec::new();
        let summary = run_smoke_test(&mock, &mut out).await.unwrap();

        assert_eq!(summary.account, account());
        assert_eq!(summary.server_count, 1);
        assert!(summary.permissions_ok);
        assert_eq!(summary.first_server_ok, Some(true));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Nichandle: ab12345-ovh"));
        assert!(text.contains("srv1: advance-1 in bhs5 (ok)"));
        assert!(text.contains("Tasks: 2 found"));
    }

    #[tokio::test]
    async fn test_detail_limit() {
        let mock = MockOvhClient::new("http://mock-ovh");
        for i in 0..7 {
            mock.add_simple_server(&format!("srv{}", i), "rise-1", "gra3", "ok");
        }

        let mut out = Vec::new();
        let summary = run_smoke_test(&mock, &mut out).await.unwrap();
        assert_eq!(summary.server_count, 7);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("srv4:"));
        assert!(!text.contains("srv5:"));
        assert!(text.contains("... and 2 more"));
    }

    #[tokio::test]
    async fn test_account_failure_fails() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.fail_on(MockCall::GetMe);

        let mut out = Vec::new();
        let err = run_smoke_test(&mock, &mut out).await.unwrap_err();
        assert!(matches!(err, SmokeTestError::Account(_)));
    }

    #[tokio::test]
    async fn test_server_operation_failures_are_warnings() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_simple_server("srv1", "advance-1", "bhs5", "ok");
        mock.fail_on(MockCall::GetBoot);
        mock.fail_on(MockCall::ListTasks);

        let mut out = Vec::new();
        let summary = run_smoke_test(&mock, &mut out).await.unwrap();
        assert_eq!(summary.first_server_ok, Some(false));
    }

    #[tokio::test]
    async fn test_permission_failures_are_warnings() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_simple_server("srv1", "advance-1", "bhs5", "ok");
        // Steps 1 and 2 read once each; the permission check is the second read
        mock.fail_after(MockCall::GetMe, 1);
        mock.fail_after(MockCall::ListServers, 1);

        let mut out = Vec::new();
        let summary = run_smoke_test(&mock, &mut out).await.unwrap();
        assert!(!summary.permissions_ok);
        assert_eq!(summary.first_server_ok, Some(true));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Some permissions may be missing"));
        assert!(text.contains("Checking server operations on srv1"));
    }

    #[tokio::test]
    async fn test_detail_failures_are_skipped() {
        let mock = MockOvhClient::new("http://mock-ovh");
        mock.add_simple_server("srv1", "advance-1", "bhs5", "ok");
        mock.fail_on(MockCall::GetServer);

        let mut out = Vec::new();
        let summary = run_smoke_test(&mock, &mut out).await.unwrap();
        assert_eq!(summary.server_count, 1);
        assert!(String::from_utf8(out).unwrap().contains("srv1: ❌"));
    }

    #[tokio::test]
    async fn test_no_servers_skips_step_four() {
        let mock = MockOvhClient::new("http://mock-ovh");
        let mut out = Vec::new();
        let summary = run_smoke_test(&mock, &mut out).await.unwrap();
        assert_eq!(summary.server_count, 0);
        assert_eq!(summary.first_server_ok, None);
    }
}
