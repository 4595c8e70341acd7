//! OVHcloud REST API Client
//!
//! A Rust client library for the parts of the OVHcloud API used to provision
//! dedicated servers: inventory, boot scripts, reboots and consumer keys.
//!
//! # Example
//!
//! ```no_run
//! use ovh_client::{Credentials, OvhClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Resolve credentials from OVH_* variables or ovh.conf
//! let credentials = Credentials::load()?;
//! let client = OvhClient::new(&credentials)?;
//!
//! // List servers and read the first one
//! let servers = client.list_dedicated_servers().await?;
//! if let Some(name) = servers.first() {
//!     let server = client.get_dedicated_server(name).await?;
//!     println!("{} is {:?}", name, server.state);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Request signing**: `X-Ovh-Signature` with server clock correction
//! - **Credential resolution**: environment variables or `ovh.conf`
//! - **Boot normalization**: `/boot` responses reduced to one boot type
//! - **Mocking**: `MockOvhClient` behind the `test-util` feature

pub mod client;
pub mod common;
pub mod config;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod ovh_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::OvhClient;
pub use common::HttpClient;
pub use config::Credentials;
pub use error::OvhError;
pub use models::*;
pub use ovh_trait::OvhClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockCall, MockOvhClient};
