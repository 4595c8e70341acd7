//! Mock OvhClient for unit testing
//!
//! This module provides a mock implementation of OvhClientTrait that can be used
//! in unit tests without reaching the OVH API.
//!
//! Besides serving canned resources, the mock records every mutating call
//! (boot scripts applied, reboots requested) and can replay a sequence of
//! server states so polling loops can be driven deterministically.

use crate::error::OvhError;
use crate::models::*;
use crate::ovh_trait::OvhClientTrait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Calls whose failure can be injected with [`MockOvhClient::fail_on`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    GetMe,
    ListServers,
    GetServer,
    GetBoot,
    SetBootScript,
    Reboot,
    ListTasks,
    RequestConsumerKey,
}

/// Mock OvhClient for testing
///
/// This mock stores resources in memory and can be configured to return
/// specific responses for testing different scenarios.
#[derive(Debug, Clone)]
pub struct MockOvhClient {
    pub(crate) base_url: String,
    pub(crate) account: Arc<Mutex<Account>>,
    // Insertion order is the listing order
    pub(crate) servers: Arc<Mutex<Vec<(String, DedicatedServer)>>>,
    pub(crate) boot_responses: Arc<Mutex<HashMap<String, serde_json::Value>>>,
    pub(crate) state_sequences: Arc<Mutex<HashMap<String, VecDeque<Result<String, String>>>>>,
    pub(crate) tasks: Arc<Mutex<HashMap<String, Vec<u64>>>>,
    pub(crate) failures: Arc<Mutex<HashSet<MockCall>>>,
    // Successes left before a call starts failing
    pub(crate) failures_after: Arc<Mutex<HashMap<MockCall, usize>>>,
    // Call recording
    pub(crate) applied_scripts: Arc<Mutex<Vec<(String, String)>>>,
    pub(crate) reboots: Arc<Mutex<Vec<String>>>,
    pub(crate) server_reads: Arc<Mutex<usize>>,
    pub(crate) credential_requests: Arc<Mutex<Vec<Vec<AccessRule>>>>,
    // Counter for generating task IDs
    pub(crate) next_task_id: Arc<Mutex<u64>>,
}

impl MockOvhClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            account: Arc::new(Mutex::new(Account::default())),
            servers: Arc::new(Mutex::new(Vec::new())),
            boot_responses: Arc::new(Mutex::new(HashMap::new())),
            state_sequences: Arc::new(Mutex::new(HashMap::new())),
            tasks: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(HashSet::new())),
            failures_after: Arc::new(Mutex::new(HashMap::new())),
            applied_scripts: Arc::new(Mutex::new(Vec::new())),
            reboots: Arc::new(Mutex::new(Vec::new())),
            server_reads: Arc::new(Mutex::new(0)),
            credential_requests: Arc::new(Mutex::new(Vec::new())),
            next_task_id: Arc::new(Mutex::new(1000)),
        }
    }

    /// Set the account returned by `get_me` (for test setup)
    pub fn set_account(&self, account: Account) {
        *self.account.lock().unwrap() = account;
    }

    /// Add a server to the mock store (for test setup)
    pub fn add_server(&self, name: &str, server: DedicatedServer) {
        self.servers.lock().unwrap().push((name.to_string(), server));
    }

    /// Add a server with the given range, datacenter and state (for test setup)
    pub fn add_simple_server(&self, name: &str, commercial_range: &str, datacenter: &str, state: &str) {
        self.add_server(
            name,
            DedicatedServer {
                name: Some(name.to_string()),
                commercial_range: Some(commercial_range.to_string()),
                datacenter: Some(datacenter.to_string()),
                state: Some(state.to_string()),
                ..Default::default()
            },
        );
    }

    /// Set the raw `/boot` response for a server (for test setup)
    pub fn set_boot_response(&self, name: &str, response: serde_json::Value) {
        self.boot_responses.lock().unwrap().insert(name.to_string(), response);
    }

    /// Queue a state to be returned by the next server read
    pub fn queue_state(&self, name: &str, state: &str) {
        self.state_sequences
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(Ok(state.to_string()));
    }

    /// Queue a transient failure for the next server read
    pub fn queue_state_error(&self, name: &str, message: &str) {
        self.state_sequences
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(Err(message.to_string()));
    }

    /// Set the task ids listed for a server (for test setup)
    pub fn set_tasks(&self, name: &str, task_ids: Vec<u64>) {
        self.tasks.lock().unwrap().insert(name.to_string(), task_ids);
    }

    /// Make every subsequent `call` fail with an API error
    pub fn fail_on(&self, call: MockCall) {
        self.failures.lock().unwrap().insert(call);
    }

    /// Let `call` succeed `successes` more times, then fail like [`Self::fail_on`]
    pub fn fail_after(&self, call: MockCall, successes: usize) {
        self.failures_after.lock().unwrap().insert(call, successes);
    }

    /// Boot scripts applied so far, as (server, script)
    pub fn applied_scripts(&self) -> Vec<(String, String)> {
        self.applied_scripts.lock().unwrap().clone()
    }

    /// Servers rebooted so far, in call order
    pub fn reboots(&self) -> Vec<String> {
        self.reboots.lock().unwrap().clone()
    }

    /// Number of `get_dedicated_server` calls so far
    pub fn server_reads(&self) -> usize {
        *self.server_reads.lock().unwrap()
    }

    /// Access rule sets passed to `request_consumer_key` so far
    pub fn credential_requests(&self) -> Vec<Vec<AccessRule>> {
        self.credential_requests.lock().unwrap().clone()
    }

    fn check(&self, call: MockCall) -> Result<(), OvhError> {
        if self.failures.lock().unwrap().contains(&call) {
            return Err(OvhError::Api(format!("injected failure for {:?}", call)));
        }
        if let Some(remaining) = self.failures_after.lock().unwrap().get_mut(&call) {
            if *remaining == 0 {
                return Err(OvhError::Api(format!("injected failure for {:?}", call)));
            }
            *remaining -= 1;
        }
        Ok(())
    }

    fn find_server(&self, name: &str) -> Result<DedicatedServer, OvhError> {
        self.servers
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, server)| server.clone())
            .ok_or_else(|| OvhError::NotFound(format!("/dedicated/server/{} - Service not found", name)))
    }
}

#[async_trait::async_trait]
impl OvhClientTrait for MockOvhClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_me(&self) -> Result<Account, OvhError> {
        self.check(MockCall::GetMe)?;
        Ok(self.account.lock().unwrap().clone())
    }

    async fn list_dedicated_servers(&self) -> Result<Vec<String>, OvhError> {
        self.check(MockCall::ListServers)?;
        Ok(self.servers.lock().unwrap().iter().map(|(name, _)| name.clone()).collect())
    }

    async fn get_dedicated_server(&self, service_name: &str) -> Result<DedicatedServer, OvhError> {
        *self.server_reads.lock().unwrap() += 1;
        self.check(MockCall::GetServer)?;

        let queued = self
            .state_sequences
            .lock()
            .unwrap()
            .get_mut(service_name)
            .and_then(VecDeque::pop_front);

        let mut server = self.find_server(service_name)?;
        match queued {
            Some(Ok(state)) => {
                server.state = Some(state);
                Ok(server)
            }
            Some(Err(message)) => Err(OvhError::Api(message)),
            None => Ok(server),
        }
    }

    async fn get_server_boot(&self, service_name: &str) -> Result<BootInfo, OvhError> {
        self.check(MockCall::GetBoot)?;
        self.find_server(service_name)?;
        let raw = self
            .boot_responses
            .lock()
            .unwrap()
            .get(service_name)
            .cloned()
            .unwrap_or_else(|| serde_json::json!([]));
        Ok(BootInfo::from_response(&raw))
    }

    async fn set_boot_script(&self, service_name: &str, boot_script: &str) -> Result<(), OvhError> {
        self.check(MockCall::SetBootScript)?;
        self.find_server(service_name)?;
        self.applied_scripts
            .lock()
            .unwrap()
            .push((service_name.to_string(), boot_script.to_string()));
        Ok(())
    }

    async fn reboot_server(&self, service_name: &str) -> Result<Task, OvhError> {
        self.check(MockCall::Reboot)?;
        self.find_server(service_name)?;
        self.reboots.lock().unwrap().push(service_name.to_string());

        let mut next = self.next_task_id.lock().unwrap();
        let id = *next;
        *next += 1;
        self.tasks
            .lock()
            .unwrap()
            .entry(service_name.to_string())
            .or_default()
            .push(id);

        Ok(Task {
            id: Some(id),
            function: Some("hardReboot".to_string()),
            status: Some("todo".to_string()),
            ..Default::default()
        })
    }

    async fn list_server_tasks(&self, service_name: &str) -> Result<Vec<u64>, OvhError> {
        self.check(MockCall::ListTasks)?;
        self.find_server(service_name)?;
        Ok(self.tasks.lock().unwrap().get(service_name).cloned().unwrap_or_default())
    }

    async fn request_consumer_key(&self, access_rules: &[AccessRule], _redirection: Option<&str>) -> Result<CredentialRequest, OvhError> {
        self.check(MockCall::RequestConsumerKey)?;
        self.credential_requests.lock().unwrap().push(access_rules.to_vec());
        Ok(CredentialRequest {
            validation_url: format!("{}/auth/sso/login?credentialToken=mock-token", self.base_url),
            consumer_key: "mock-consumer-key".to_string(),
            state: Some("pendingValidation".to_string()),
        })
    }
}
