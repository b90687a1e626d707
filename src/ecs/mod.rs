//! Amazon ECS task metadata discovery.
//!
//! See the task metadata endpoint documentation for the v2 and v3 layouts:
//! <https://docs.aws.amazon.com/AmazonECS/latest/developerguide/task-metadata-endpoint.html>
mod discovery;
mod metadata_file;
mod resolve;

pub use discovery::{EcsMetadata, V2_TASK_METADATA_URL, V2_TASK_STATS_URL, discover};
pub use metadata_file::read_metadata_file;
pub use resolve::{PRIMARY_CONTAINER_TYPE, resolve_container_id};
