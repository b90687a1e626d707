//! Identity of the local host: hostname, account and operating system.
mod error;
mod platform;
mod user;

pub use error::{Error, Result};
pub use platform::Platform;
pub use user::{Group, User, current_user, lookup_group, lookup_user};

/// Source of the host identity recorded in every snapshot.
pub trait HostIdentity {
    fn hostname(&self) -> Result<String>;

    /// The account the process runs as.
    fn current_user(&self) -> Result<User>;

    fn group(&self, gid: u32) -> Result<Group>;

    fn platform(&self) -> Platform;
}

/// [`HostIdentity`] of the machine the process runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHost;

impl HostIdentity for LocalHost {
    fn hostname(&self) -> Result<String> {
        sysinfo::System::host_name().ok_or(Error::Hostname)
    }

    fn current_user(&self) -> Result<User> {
        current_user()
    }

    fn group(&self, gid: u32) -> Result<Group> {
        lookup_group(gid)
    }

    fn platform(&self) -> Platform {
        Platform::detect()
    }
}
