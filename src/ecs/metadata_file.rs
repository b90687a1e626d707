use std::path::Path;

use crate::error::ResultOkLogExt;
use crate::fetch::{Payload, PayloadFormat};
use crate::fsutil;

/// Reads the ECS container metadata file.
///
/// The agent writes this file asynchronously after the container starts, so an
/// unreadable, incomplete or malformed file is expected and yields `None`.
/// See <https://docs.aws.amazon.com/AmazonECS/latest/developerguide/container-metadata.html>.
pub fn read_metadata_file(path: impl AsRef<Path>, format: PayloadFormat) -> Option<Payload> {
    let payload = match format {
        PayloadFormat::Json => fsutil::read_json(path).map(Payload::Json),
        PayloadFormat::Text => fsutil::read_text(path).map(Payload::Text),
    };
    payload.ok_log_at(log::Level::Debug)
}
