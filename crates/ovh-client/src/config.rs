//! Credential resolution
//!
//! Credentials come from the process environment first and from an `ovh.conf`
//! INI file second, following the layout used by the official OVH SDKs:
//!
//! ```ini
//! [default]
//! endpoint=ovh-ca
//!
//! [ovh-ca]
//! application_key=...
//! application_secret=...
//! consumer_key=...
//! ```
//!
//! Keys placed directly under `[default]` are accepted as a fallback.

use crate::error::OvhError;
use ini::Ini;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Endpoint used when neither `OVH_ENDPOINT` nor the config file names one
pub const DEFAULT_ENDPOINT: &str = "ovh-ca";

/// Config file looked up in the working directory, then `~/.ovh.conf`, then `/etc/ovh.conf`
pub const CONFIG_FILE_NAME: &str = "ovh.conf";

/// Environment variable naming the API endpoint
pub const ENV_ENDPOINT: &str = "OVH_ENDPOINT";
/// Environment variable holding the application key
pub const ENV_APPLICATION_KEY: &str = "OVH_APPLICATION_KEY";
/// Environment variable holding the application secret
pub const ENV_APPLICATION_SECRET: &str = "OVH_APPLICATION_SECRET";
/// Environment variable holding the consumer key
pub const ENV_CONSUMER_KEY: &str = "OVH_CONSUMER_KEY";

const ENDPOINTS: &[(&str, &str)] = &[
    ("ovh-eu", "https://eu.api.ovh.com/1.0"),
    ("ovh-ca", "https://ca.api.ovh.com/1.0"),
    ("ovh-us", "https://api.us.ovhcloud.com/1.0"),
    ("kimsufi-eu", "https://eu.api.kimsufi.com/1.0"),
    ("kimsufi-ca", "https://ca.api.kimsufi.com/1.0"),
    ("soyoustart-eu", "https://eu.api.soyoustart.com/1.0"),
    ("soyoustart-ca", "https://ca.api.soyoustart.com/1.0"),
];

/// Resolve an endpoint alias (or a literal `http(s)://` URL) to an API base URL
pub fn endpoint_url(endpoint: &str) -> Result<String, OvhError> {
    if endpoint.starts_with("http") {
        return Ok(endpoint.trim_end_matches('/').to_string());
    }

    ENDPOINTS
        .iter()
        .find(|(name, _)| *name == endpoint)
        .map(|(_, url)| (*url).to_string())
        .ok_or_else(|| {
            let known: Vec<&str> = ENDPOINTS.iter().map(|(name, _)| *name).collect();
            OvhError::Configuration(format!(
                "Unknown endpoint '{}' (expected one of: {})",
                endpoint,
                known.join(", ")
            ))
        })
}

/// API credentials for one endpoint
///
/// The consumer key is optional because requesting a new one only needs the
/// application key and secret.
#[derive(Clone)]
pub struct Credentials {
    pub endpoint: String,
    pub application_key: String,
    pub application_secret: String,
    pub consumer_key: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("application_key", &self.application_key)
            .field("application_secret", &"<redacted>")
            .field("consumer_key", &self.consumer_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Load credentials from the environment and the first config file found
    pub fn load() -> Result<Self, OvhError> {
        let file = match config_file_candidates().into_iter().find(|path| path.is_file()) {
            Some(path) => Some(load_config_file(&path)?),
            None => {
                debug!("No {} found, using environment only", CONFIG_FILE_NAME);
                None
            }
        };

        Self::from_sources(file.as_ref(), |key| std::env::var(key).ok())
    }

    /// Load credentials from the environment and an explicit config file
    pub fn from_file(path: &Path) -> Result<Self, OvhError> {
        let file = load_config_file(path)?;
        Self::from_sources(Some(&file), |key| std::env::var(key).ok())
    }

    /// Resolve credentials from a parsed config file and an environment lookup
    ///
    /// Environment values win over file values. Empty values count as unset.
    pub fn from_sources<F>(file: Option<&Ini>, env: F) -> Result<Self, OvhError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());
        let file_value = |section: &str, key: &str| {
            file.and_then(|ini| ini.section(Some(section)))
                .and_then(|props| props.get(key))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let endpoint = env(ENV_ENDPOINT)
            .or_else(|| file_value("default", "endpoint"))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let lookup = |env_key: &str, file_key: &str| {
            env(env_key)
                .or_else(|| file_value(&endpoint, file_key))
                .or_else(|| file_value("default", file_key))
        };

        let application_key = lookup(ENV_APPLICATION_KEY, "application_key").ok_or_else(|| {
            OvhError::Configuration(format!(
                "application_key is not set ({} or [{}] in {})",
                ENV_APPLICATION_KEY, endpoint, CONFIG_FILE_NAME
            ))
        })?;
        let application_secret =
            lookup(ENV_APPLICATION_SECRET, "application_secret").ok_or_else(|| {
                OvhError::Configuration(format!(
                    "application_secret is not set ({} or [{}] in {})",
                    ENV_APPLICATION_SECRET, endpoint, CONFIG_FILE_NAME
                ))
            })?;
        let consumer_key = lookup(ENV_CONSUMER_KEY, "consumer_key");

        // Fail on an unknown alias here rather than on the first request
        endpoint_url(&endpoint)?;

        Ok(Self {
            endpoint,
            application_key,
            application_secret,
            consumer_key,
        })
    }

    /// API base URL for the configured endpoint
    pub fn base_url(&self) -> Result<String, OvhError> {
        endpoint_url(&self.endpoint)
    }

    /// The consumer key, required for every signed call
    pub fn consumer_key(&self) -> Result<&str, OvhError> {
        self.consumer_key.as_deref().ok_or_else(|| {
            OvhError::Configuration(format!(
                "consumer_key is not set ({} or [{}] in {}); run validate-consumer-key first",
                ENV_CONSUMER_KEY, self.endpoint, CONFIG_FILE_NAME
            ))
        })
    }
}

/// Config files searched by [`Credentials::load`], in priority order
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(format!(".{}", CONFIG_FILE_NAME)));
    }
    candidates.push(PathBuf::from("/etc").join(CONFIG_FILE_NAME));
    candidates
}

fn load_config_file(path: &Path) -> Result<Ini, OvhError> {
    debug!("Reading OVH credentials from {}", path.display());
    Ini::load_from_file(path).map_err(|e| {
        OvhError::Configuration(format!("Failed to read {}: {}", path.display(), e))
    })
}
