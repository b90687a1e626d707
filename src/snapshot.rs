use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::ec2::InstanceIdentityDocument;
use crate::fetch::Payload;
use crate::host::{Group, Platform, User};

/// Values fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    start_time: DateTime<Utc>,
}

impl Context {
    /// Creates a context started now.
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(start_time: DateTime<Utc>) -> Self {
        Self { start_time }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Returns the current time, never earlier than the start time even if the
    /// wall clock was stepped back since.
    pub fn request_time(&self) -> DateTime<Utc> {
        Utc::now().max(self.start_time)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything known about the host at the time of one request.
///
/// Every field is always serialized; sources that are unavailable show up as
/// `null`, so consumers see the same shape on and off AWS.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub start_time: DateTime<Utc>,
    pub request_time: DateTime<Utc>,
    pub hostname: String,
    pub user: User,
    pub group: Group,
    pub system: Platform,
    pub env: BTreeMap<String, String>,
    pub ec2_instance_metadata: Option<InstanceIdentityDocument>,
    pub ecs_container_metadata: Option<Payload>,
    pub ecs_container_stats: Option<Payload>,
    pub ecs_task_metadata: Option<Payload>,
    pub ecs_task_stats: Option<Payload>,
    pub ecs_container_metadata_file: Option<Payload>,
}
