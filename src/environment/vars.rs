use std::collections::BTreeMap;

/// Container metadata endpoint injected by the ECS agent (task metadata endpoint v3).
pub const ECS_CONTAINER_METADATA_URI: &str = "ECS_CONTAINER_METADATA_URI";
/// Execution environment marker set by AWS runtimes.
pub const AWS_EXECUTION_ENV: &str = "AWS_EXECUTION_ENV";
/// Path of the ECS container metadata file, when enabled on the container instance.
pub const ECS_CONTAINER_METADATA_FILE: &str = "ECS_CONTAINER_METADATA_FILE";
/// Set to `true` to skip every EC2 instance metadata request.
pub const AWS_EC2_METADATA_DISABLED: &str = "AWS_EC2_METADATA_DISABLED";
/// Overrides the base URL of the EC2 instance metadata service.
pub const AWS_EC2_METADATA_SERVICE_ENDPOINT: &str = "AWS_EC2_METADATA_SERVICE_ENDPOINT";

/// Value of [`AWS_EXECUTION_ENV`] for tasks using the EC2 launch type.
pub const ECS_ON_EC2_MARKER: &str = "AWS_ECS_EC2";

/// A point-in-time copy of the process environment.
///
/// Every lookup an assembly performs goes through the same capture, so a snapshot
/// never mixes values from before and after a concurrent `setenv`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Captures the current process environment.
    ///
    /// Keys and values that are not valid UTF-8 are converted lossily.
    pub fn capture() -> Self {
        std::env::vars_os()
            .map(|(key, value)| {
                (
                    key.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    pub fn into_vars(self) -> BTreeMap<String, String> {
        self.vars
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
