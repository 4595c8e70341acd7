//! OvhClient trait for mocking
//!
//! This trait abstracts the OvhClient to enable mocking in unit tests.
//! The concrete OvhClient implements this trait, and tests can use mock implementations.

use crate::error::OvhError;
use crate::models::*;

/// Trait for OVH API client operations
///
/// Covers exactly the calls the provisioning tools make.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait OvhClientTrait: Send + Sync {
    /// Get the API base URL
    fn base_url(&self) -> &str;

    // Account
    async fn get_me(&self) -> Result<Account, OvhError>;

    // Dedicated servers
    async fn list_dedicated_servers(&self) -> Result<Vec<String>, OvhError>;
    async fn get_dedicated_server(&self, service_name: &str) -> Result<DedicatedServer, OvhError>;
    async fn get_server_boot(&self, service_name: &str) -> Result<BootInfo, OvhError>;
    async fn set_boot_script(&self, service_name: &str, boot_script: &str) -> Result<(), OvhError>;
    async fn reboot_server(&self, service_name: &str) -> Result<Task, OvhError>;
    async fn list_server_tasks(&self, service_name: &str) -> Result<Vec<u64>, OvhError>;

    // Authentication
    async fn request_consumer_key(&self, access_rules: &[AccessRule], redirection: Option<&str>) -> Result<CredentialRequest, OvhError>;
}
