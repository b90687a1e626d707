use sysinfo::System;

/// Operating system and hardware descriptor of the host.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    /// Operating system family the binary was built for, e.g. `linux`.
    pub os: String,
    pub kernel_version: Option<String>,
    /// CPU architecture, e.g. `x86_64`.
    pub platform: String,
    /// Distribution or product name, e.g. `Ubuntu`.
    pub os_name: Option<String>,
    /// Human readable version, e.g. `Linux 22.04 Ubuntu`.
    pub os_version: Option<String>,
    pub distribution: String,
    pub hostname: Option<String>,
    pub cpus: usize,
}

impl Platform {
    pub fn detect() -> Self {
        Self {
            os: std::env::consts::OS.to_owned(),
            kernel_version: System::kernel_version(),
            platform: std::env::consts::ARCH.to_owned(),
            os_name: System::name(),
            os_version: System::long_os_version(),
            distribution: System::distribution_id(),
            hostname: System::host_name(),
            cpus: std::thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(1),
        }
    }
}
