/// Errors that may occur while looking up the identity of the local host.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to determine hostname")]
    Hostname,
    #[error("failed to look up user with uid {uid}: {source}")]
    UserLookup {
        uid: u32,
        #[source]
        source: nix::errno::Errno,
    },
    #[error("unknown user with uid {uid}")]
    UnknownUser { uid: u32 },
    #[error("failed to look up group with gid {gid}: {source}")]
    GroupLookup {
        gid: u32,
        #[source]
        source: nix::errno::Errno,
    },
    #[error("unknown group with gid {gid}")]
    UnknownGroup { gid: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
