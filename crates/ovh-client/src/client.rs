//! OVH API client
//!
//! Implements the OVHcloud REST API calls used to provision dedicated servers.
//! Based on the OVH API v1 layout: /dedicated/server/{serviceName}[/boot|/reboot|/task]

use crate::common::HttpClient;
use crate::config::Credentials;
use crate::error::OvhError;
use crate::models::*;
use crate::ovh_trait::OvhClientTrait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// OVH API client
#[derive(Debug)]
pub struct OvhClient {
    http: HttpClient,
}

impl OvhClient {
    /// Create a new OVH client
    ///
    /// # Arguments
    /// * `credentials` - Endpoint and keys, see [`Credentials::load`]
    pub fn new(credentials: &Credentials) -> Result<Self, OvhError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(OvhError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, credentials)?,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Path of a dedicated server resource, with the name percent-encoded
    fn server_path(service_name: &str, suffix: &str) -> String {
        format!("/dedicated/server/{}{}", urlencoding::encode(service_name), suffix)
    }

    /// Get the account the consumer key belongs to
    pub async fn get_me(&self) -> Result<Account, OvhError> {
        debug!("Fetching account information");
        self.http.get("/me").await
    }

    /// List the service names of all dedicated servers on the account
    pub async fn list_dedicated_servers(&self) -> Result<Vec<String>, OvhError> {
        debug!("Listing dedicated servers");
        self.http.get("/dedicated/server").await
    }

    /// Get a dedicated server
    ///
    /// # Arguments
    /// * `service_name` - Server identifier as returned by [`Self::list_dedicated_servers`]
    pub async fn get_dedicated_server(&self, service_name: &str) -> Result<DedicatedServer, OvhError> {
        debug!("Fetching dedicated server {}", service_name);
        self.http.get(&Self::server_path(service_name, "")).await
    }

    /// Get the boot configuration of a server, normalized to a single boot type
    pub async fn get_server_boot(&self, service_name: &str) -> Result<BootInfo, OvhError> {
        debug!("Fetching boot configuration of {}", service_name);
        let raw: serde_json::Value = self.http.get(&Self::server_path(service_name, "/boot")).await?;
        Ok(BootInfo::from_response(&raw))
    }

    /// Assign an iPXE script as the server's network boot script
    ///
    /// The previous script is replaced; the API keeps no history.
    pub async fn set_boot_script(&self, service_name: &str, boot_script: &str) -> Result<(), OvhError> {
        debug!("Setting boot script on {} ({} bytes)", service_name, boot_script.len());
        let body = serde_json::json!({ "bootScript": boot_script });
        let _: serde_json::Value = self.http.put(&Self::server_path(service_name, ""), &body).await?;
        Ok(())
    }

    /// Request a hard reboot
    ///
    /// # Returns
    /// * `Ok(Task)` - The asynchronous reboot task
    /// * `Err(OvhError)` - If the request fails
    pub async fn reboot_server(&self, service_name: &str) -> Result<Task, OvhError> {
        debug!("Rebooting {}", service_name);
        self.http.post(&Self::server_path(service_name, "/reboot"), None).await
    }

    /// List task ids of a server
    pub async fn list_server_tasks(&self, service_name: &str) -> Result<Vec<u64>, OvhError> {
        debug!("Listing tasks of {}", service_name);
        self.http.get(&Self::server_path(service_name, "/task")).await
    }

    /// Request a new consumer key for the given access rules
    ///
    /// Only the application key is sent; the returned key stays inactive until
    /// the account owner visits `validation_url`.
    pub async fn request_consumer_key(
        &self,
        access_rules: &[AccessRule],
        redirection: Option<&str>,
    ) -> Result<CredentialRequest, OvhError> {
        if access_rules.is_empty() {
            return Err(OvhError::InvalidRequest(
                "at least one access rule is required".to_string(),
            ));
        }

        let mut body = serde_json::json!({ "accessRules": access_rules });
        if let Some(redirection) = redirection {
            body["redirection"] = serde_json::Value::String(redirection.to_string());
        }

        debug!(
            "Requesting consumer key for application {} ({} rules)",
            self.http.application_key(),
            access_rules.len()
        );
        self.http.post_unauthenticated("/auth/credential", &body).await
    }
}

#[async_trait::async_trait]
impl OvhClientTrait for OvhClient {
    fn base_url(&self) -> &str {
        self.base_url()
    }

    async fn get_me(&self) -> Result<Account, OvhError> {
        self.get_me().await
    }

    async fn list_dedicated_servers(&self) -> Result<Vec<String>, OvhError> {
        self.list_dedicated_servers().await
    }

    async fn get_dedicated_server(&self, service_name: &str) -> Result<DedicatedServer, OvhError> {
        self.get_dedicated_server(service_name).await
    }

    async fn get_server_boot(&self, service_name: &str) -> Result<BootInfo, OvhError> {
        self.get_server_boot(service_name).await
    }

    async fn set_boot_script(&self, service_name: &str, boot_script: &str) -> Result<(), OvhError> {
        self.set_boot_script(service_name, boot_script).await
    }

    async fn reboot_server(&self, service_name: &str) -> Result<Task, OvhError> {
        self.reboot_server(service_name).await
    }

    async fn list_server_tasks(&self, service_name: &str) -> Result<Vec<u64>, OvhError> {
        self.list_server_tasks(service_name).await
    }

    async fn request_consumer_key(&self, access_rules: &[AccessRule], redirection: Option<&str>) -> Result<CredentialRequest, OvhError> {
        self.request_consumer_key(access_rules, redirection).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_path_encodes_name() {
        assert_eq!(
            OvhClient::server_path("ns1234567.ip-1-2-3.eu", "/boot"),
            "/dedicated/server/ns1234567.ip-1-2-3.eu/boot"
        );
        assert_eq!(
            OvhClient::server_path("odd/name", ""),
            "/dedicated/server/odd%2Fname"
        );
    }

    #[tokio::test]
    async fn test_request_consumer_key_requires_rules() {
        let creds = Credentials {
            endpoint: "ovh-ca".to_string(),
            application_key: "ak".to_string(),
            application_secret: "as".to_string(),
            consumer_key: None,
        };
        let client = OvhClient::new(&creds).unwrap();
        let err = client.request_consumer_key(&[], None).await.unwrap_err();
        assert!(matches!(err, OvhError::InvalidRequest(_)));
    }
}
