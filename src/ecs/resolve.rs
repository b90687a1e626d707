use serde_json::Value;

use crate::fetch::Document;

/// Key of the container list in a task metadata document.
const CONTAINERS_KEY: &str = "Containers";
const TYPE_KEY: &str = "Type";
const DOCKER_ID_KEY: &str = "DockerId";

/// Type of the application container, as opposed to agent-managed sidecars
/// such as `~internal~ecs~pause`.
pub const PRIMARY_CONTAINER_TYPE: &str = "NORMAL";

/// Returns the docker id of the task's primary container.
///
/// Scans `Containers` in document order and returns the `DockerId` of the first
/// object whose `Type` is exactly [`PRIMARY_CONTAINER_TYPE`] and whose `DockerId`
/// is a string. Elements that do not match are skipped. Returns an empty string
/// when the list is missing, is not an array or holds no matching entry.
pub fn resolve_container_id(task_metadata: &Document) -> String {
    find_primary_container(task_metadata)
        .map(str::to_owned)
        .unwrap_or_default()
}

fn find_primary_container(task_metadata: &Document) -> Option<&str> {
    task_metadata
        .get(CONTAINERS_KEY)?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .find_map(|container| {
            if container.get(TYPE_KEY).and_then(Value::as_str) != Some(PRIMARY_CONTAINER_TYPE) {
                return None;
            }
            container.get(DOCKER_ID_KEY).and_then(Value::as_str)
        })
}
