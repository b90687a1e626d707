//! Environment detection module.
//!
//! Captures the process environment and determines which ECS metadata endpoint,
//! if any, is reachable from it.
mod detect;
mod vars;

pub use detect::{DiscoveryMode, detect_discovery_mode};
pub use vars::{
    AWS_EC2_METADATA_DISABLED, AWS_EC2_METADATA_SERVICE_ENDPOINT, AWS_EXECUTION_ENV,
    ECS_CONTAINER_METADATA_FILE, ECS_CONTAINER_METADATA_URI, ECS_ON_EC2_MARKER, Environment,
};
