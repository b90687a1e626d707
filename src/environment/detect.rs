use super::vars::{AWS_EXECUTION_ENV, ECS_CONTAINER_METADATA_URI, ECS_ON_EC2_MARKER, Environment};

/// Which ECS task metadata endpoint, if any, the process can query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryMode {
    /// Not running in an ECS task (or the agent does not expose metadata).
    None,
    /// Task metadata endpoint v3, rooted at the given container URI.
    V3 { uri: String },
    /// Task metadata endpoint v2 at the well-known link-local address.
    V2,
}

/// Detects the ECS metadata endpoint version from the environment.
///
/// Selection is a pure function of two variables:
///
/// 1. [`ECS_CONTAINER_METADATA_URI`] set (to any value) selects [`DiscoveryMode::V3`],
///    regardless of anything else.
/// 2. Otherwise [`AWS_EXECUTION_ENV`] equal to [`ECS_ON_EC2_MARKER`] selects
///    [`DiscoveryMode::V2`].
/// 3. Otherwise there is nothing to discover.
pub fn detect_discovery_mode(env: &Environment) -> DiscoveryMode {
    if let Some(uri) = env.get(ECS_CONTAINER_METADATA_URI) {
        return DiscoveryMode::V3 {
            uri: uri.to_owned(),
        };
    }

    match env.get(AWS_EXECUTION_ENV) {
        Some(ECS_ON_EC2_MARKER) => DiscoveryMode::V2,
        _ => DiscoveryMode::None,
    }
}
