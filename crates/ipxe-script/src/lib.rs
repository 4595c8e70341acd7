//! iPXE Boot Scripts
//!
//! Generates the iPXE scripts that chainload the Harvester installer on
//! OVHcloud dedicated servers. Generation is pure: the same target and
//! configuration URL always give the same script.
//!
//! ```
//! use ipxe_script::{ipxe_script, BootTarget};
//!
//! let script = ipxe_script(BootTarget::PlatformInstall, Some("https://example.test/cfg.yaml"));
//! assert!(script.starts_with("#!ipxe"));
//! assert!(script.contains("harvester.install.config_url=https://example.test/cfg.yaml"));
//! ```

pub mod profile;
pub mod release;
pub mod target;

pub use profile::BootProfile;
pub use release::InstallerRelease;
pub use target::{ipxe_script, BootTarget, CONFIG_BASE_URL, CONFIG_URL_PARAM};
