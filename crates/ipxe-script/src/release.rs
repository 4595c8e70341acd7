//! Installer releases
//!
//! Kernel and initrd are fetched from the GitHub release assets; the live
//! root filesystem comes from the Rancher CDN.

/// A Harvester installer release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallerRelease {
    /// Release tag, e.g. `v1.6.0`
    pub version: &'static str,
    /// Architecture suffix used in asset names, e.g. `amd64`
    pub arch: &'static str,
}

impl InstallerRelease {
    /// Harvester v1.6.0 for x86_64
    pub const HARVESTER_V1_6_0: Self = Self {
        version: "v1.6.0",
        arch: "amd64",
    };

    /// File name of the initrd, as referenced by the kernel `initrd=` parameter
    pub fn initrd_name(&self) -> String {
        format!("harvester-{}-initrd-{}", self.version, self.arch)
    }

    /// Kernel image URL
    pub fn kernel_url(&self) -> String {
        format!(
            "https://github.com/harvester/harvester/releases/download/{v}/harvester-{v}-vmlinuz-{a}",
            v = self.version,
            a = self.arch
        )
    }

    /// Initrd image URL
    pub fn initrd_url(&self) -> String {
        format!(
            "https://github.com/harvester/harvester/releases/download/{}/{}",
            self.version,
            self.initrd_name()
        )
    }

    /// Live root filesystem URL
    pub fn rootfs_url(&self) -> String {
        format!(
            "https://releases.rancher.com/harvester/{v}/harvester-{v}-rootfs-{a}.squashfs",
            v = self.version,
            a = self.arch
        )
    }
}
