//! Boot targets
//!
//! Each target pairs an installer release with a default Harvester
//! configuration URL. The single-stage install partitions and installs in one
//! boot; the two-stage flow first builds the RAID array, then installs onto it.

use crate::profile::BootProfile;
use crate::release::InstallerRelease;

/// Repository holding the default Harvester configuration files
pub const CONFIG_BASE_URL: &str =
    "https://raw.githubusercontent.com/brdelphus/harvester-install-pxe1/refs/heads/main";

/// Kernel parameter carrying the configuration URL
pub const CONFIG_URL_PARAM: &str = "harvester.install.config_url";

/// Which network boot a script is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootTarget {
    /// Install Harvester on a RAID1 layout in a single boot
    SingleStage,
    /// Stage one: build the RAID array and partitions, then stop
    RaidPreparation,
    /// Stage two: install Harvester onto the prepared array
    PlatformInstall,
}

impl BootTarget {
    /// Installer release booted for this target
    pub fn release(self) -> InstallerRelease {
        match self {
            BootTarget::SingleStage | BootTarget::RaidPreparation | BootTarget::PlatformInstall => {
                InstallerRelease::HARVESTER_V1_6_0
            }
        }
    }

    /// Configuration URL used when the operator gives none
    pub fn default_config_url(self) -> String {
        let file = match self {
            BootTarget::SingleStage => "harvester-raid1-optimized.yaml",
            BootTarget::RaidPreparation => "harvester-stage1-raid-setup.yaml",
            BootTarget::PlatformInstall => "harvester-stage2-install.yaml",
        };
        format!("{}/{}", CONFIG_BASE_URL, file)
    }

    /// Short operator-facing description
    pub fn description(self) -> &'static str {
        match self {
            BootTarget::SingleStage => "single-stage Harvester install",
            BootTarget::RaidPreparation => "stage 1: RAID array preparation",
            BootTarget::PlatformInstall => "stage 2: Harvester installation",
        }
    }

    /// Boot profile for this target
    ///
    /// A blank `config_url` counts as absent. The URL is not validated.
    pub fn profile(self, config_url: Option<&str>) -> BootProfile {
        let release = self.release();
        let config_url = config_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map_or_else(|| self.default_config_url(), str::to_string);

        let cmdline = vec![
            format!("initrd={}", release.initrd_name()),
            "ip=dhcp".to_string(),
            "net.ifnames=1".to_string(),
            "rd.cos.disable".to_string(),
            "rd.noverifyssl".to_string(),
            format!("root=live:{}", release.rootfs_url()),
            "console=tty1".to_string(),
            "harvester.install.automatic=true".to_string(),
            format!("{}={}", CONFIG_URL_PARAM, config_url),
        ];

        BootProfile {
            kernel: release.kernel_url(),
            initrd: release.initrd_url(),
            cmdline,
        }
    }
}

/// Generate the iPXE script for a target
pub fn ipxe_script(target: BootTarget, config_url: Option<&str>) -> String {
    target.profile(config_url).render()
}
