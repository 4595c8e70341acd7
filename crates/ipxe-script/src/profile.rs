//! Boot profiles
//!
//! A boot profile is the kernel, initrd and command line a machine should
//! network-boot with. Rendering it gives the iPXE script stored on the server.

/// Kernel, initrd and kernel command line for one network boot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootProfile {
    /// Kernel image URL
    pub kernel: String,
    /// Initrd image URL
    pub initrd: String,
    /// Kernel command-line parameters, in order
    pub cmdline: Vec<String>,
}

impl BootProfile {
    /// Render the profile as an iPXE script
    ///
    /// The script has no trailing newline.
    pub fn render(&self) -> String {
        let mut kernel_line = format!("kernel {}", self.kernel);
        for param in &self.cmdline {
            kernel_line.push(' ');
            kernel_line.push_str(param);
        }

        let initrd_line = format!("initrd {}", self.initrd);

        [
            "#!ipxe",
            "",
            "dhcp",
            kernel_line.as_str(),
            initrd_line.as_str(),
            "boot",
        ]
        .join("\n")
    }
}
