use nix::unistd::{self, Gid, Uid};

use super::{Error, Result};

/// An account from the system user database.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: u32,
    /// Primary group id.
    pub gid: u32,
    pub username: String,
    /// Full name, i.e. the first comma-separated GECOS field.
    pub name: String,
    pub home_dir: String,
}

/// A group from the system group database.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub gid: u32,
    pub name: String,
}

impl From<unistd::User> for User {
    fn from(user: unistd::User) -> Self {
        Self {
            uid: user.uid.as_raw(),
            gid: user.gid.as_raw(),
            name: full_name(&user.gecos.to_string_lossy()).to_owned(),
            username: user.name,
            home_dir: user.dir.to_string_lossy().into_owned(),
        }
    }
}

impl From<unistd::Group> for Group {
    fn from(group: unistd::Group) -> Self {
        Self {
            gid: group.gid.as_raw(),
            name: group.name,
        }
    }
}

/// Looks up the real user of the current process.
///
/// # Errors
///
/// See [`lookup_user`].
pub fn current_user() -> Result<User> {
    lookup_user(unistd::getuid().as_raw())
}

/// Looks up a user by id in the system user database.
///
/// # Errors
///
/// * [`Error::UnknownUser`] if no entry exists for `uid`.
/// * [`Error::UserLookup`] if the database could not be queried.
pub fn lookup_user(uid: u32) -> Result<User> {
    unistd::User::from_uid(Uid::from_raw(uid))
        .map_err(|source| Error::UserLookup { uid, source })?
        .map(User::from)
        .ok_or(Error::UnknownUser { uid })
}

/// Looks up a group by id in the system group database.
///
/// # Errors
///
/// * [`Error::UnknownGroup`] if no entry exists for `gid`.
/// * [`Error::GroupLookup`] if the database could not be queried.
pub fn lookup_group(gid: u32) -> Result<Group> {
    unistd::Group::from_gid(Gid::from_raw(gid))
        .map_err(|source| Error::GroupLookup { gid, source })?
        .map(Group::from)
        .ok_or(Error::UnknownGroup { gid })
}

fn full_name(gecos: &str) -> &str {
    gecos.split(',').next().unwrap_or_default()
}
