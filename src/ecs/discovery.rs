use crate::environment::DiscoveryMode;
use crate::error::ResultOkLogExt;
use crate::fetch::{Document, MetadataFetcher, Payload, PayloadFormat};

use super::resolve::resolve_container_id;

/// Task metadata endpoint v2, served by the ECS agent on the container instance.
pub const V2_TASK_METADATA_URL: &str = "http://169.254.170.2/v2/metadata";
/// Task stats endpoint v2.
pub const V2_TASK_STATS_URL: &str = "http://169.254.170.2/v2/stats";

/// Everything the ECS task metadata endpoint told us about this task.
///
/// A field is `None` when the endpoint was not queried or the request failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EcsMetadata {
    pub container_metadata: Option<Payload>,
    pub container_stats: Option<Payload>,
    pub task_metadata: Option<Payload>,
    pub task_stats: Option<Payload>,
}

/// Queries the task metadata endpoint selected by `mode`.
///
/// Requests run one after the other in a fixed order: container metadata,
/// container stats, task metadata, task stats. A failed request is logged and
/// leaves only its own field empty.
///
/// * [`DiscoveryMode::V3`] always issues four requests below the container URI.
/// * [`DiscoveryMode::V2`] fetches task metadata and stats from the well-known
///   address and, only when the primary container can be resolved from the task
///   metadata, its container metadata and stats as well.
pub async fn discover<F: MetadataFetcher>(
    fetcher: &F,
    mode: &DiscoveryMode,
    format: PayloadFormat,
) -> EcsMetadata {
    match mode {
        DiscoveryMode::None => EcsMetadata::default(),
        DiscoveryMode::V3 { uri } => discover_v3(fetcher, uri, format).await,
        DiscoveryMode::V2 => discover_v2(fetcher, format).await,
    }
}

async fn discover_v3<F: MetadataFetcher>(
    fetcher: &F,
    container_metadata_url: &str,
    format: PayloadFormat,
) -> EcsMetadata {
    let container_stats_url = format!("{container_metadata_url}/stats");
    let task_metadata_url = format!("{container_metadata_url}/task");
    let task_stats_url = format!("{task_metadata_url}/stats");
    log::debug!("Querying ECS task metadata endpoint v3 at {container_metadata_url}");

    let container_metadata = fetch_payload(fetcher, container_metadata_url, format).await;
    let container_stats = fetch_payload(fetcher, &container_stats_url, format).await;
    let task_metadata = fetch_payload(fetcher, &task_metadata_url, format).await;
    let task_stats = fetch_payload(fetcher, &task_stats_url, format).await;

    EcsMetadata {
        container_metadata,
        container_stats,
        task_metadata,
        task_stats,
    }
}

async fn discover_v2<F: MetadataFetcher>(fetcher: &F, format: PayloadFormat) -> EcsMetadata {
    log::debug!("Querying ECS task metadata endpoint v2 at {V2_TASK_METADATA_URL}");
    let task_metadata = fetch_payload(fetcher, V2_TASK_METADATA_URL, format).await;
    let task_stats = fetch_payload(fetcher, V2_TASK_STATS_URL, format).await;

    let container_id = task_metadata
        .as_ref()
        .map(primary_container_id)
        .unwrap_or_default();
    if container_id.is_empty() {
        log::debug!("No primary container in ECS task metadata, skipping container endpoints");
        return EcsMetadata {
            task_metadata,
            task_stats,
            ..EcsMetadata::default()
        };
    }

    log::debug!("Resolved primary ECS container {container_id}");
    let container_metadata_url = format!("{V2_TASK_METADATA_URL}/{container_id}");
    let container_stats_url = format!("{V2_TASK_STATS_URL}/{container_id}");
    let container_metadata = fetch_payload(fetcher, &container_metadata_url, format).await;
    let container_stats = fetch_payload(fetcher, &container_stats_url, format).await;

    EcsMetadata {
        container_metadata,
        container_stats,
        task_metadata,
        task_stats,
    }
}

/// Raw payloads are parsed on a best-effort basis; unparseable text resolves to nothing.
fn primary_container_id(task_metadata: &Payload) -> String {
    match task_metadata {
        Payload::Json(doc) => resolve_container_id(doc),
        Payload::Text(text) => serde_json::from_str::<Document>(text)
            .map(|doc| resolve_container_id(&doc))
            .unwrap_or_default(),
    }
}

async fn fetch_payload<F: MetadataFetcher>(
    fetcher: &F,
    url: &str,
    format: PayloadFormat,
) -> Option<Payload> {
    let payload = match format {
        PayloadFormat::Json => fetcher.fetch_json(url).await.map(Payload::Json),
        PayloadFormat::Text => fetcher.fetch_text(url).await.map(Payload::Text),
    };
    payload.ok_log()
}
