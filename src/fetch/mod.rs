//! Bounded-timeout HTTP GETs against cloud metadata endpoints.
//!
//! The [`MetadataFetcher`] trait is the seam the ECS discovery sequence is written
//! against; [`HttpFetcher`] is the `reqwest` implementation used at runtime.
mod error;
mod http;

use std::time::Duration;

pub use error::{Error, Result};
pub use http::HttpFetcher;

/// Per-request timeout applied to every metadata call.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// A decoded JSON object with arbitrary, loosely-typed content.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// How a metadata response is embedded in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadFormat {
    /// Decode the body as a JSON object.
    #[default]
    Json,
    /// Keep the body as opaque text, the shape older releases produced.
    Text,
}

/// A metadata response as embedded in a snapshot.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Json(Document),
    Text(String),
}

pub trait MetadataFetcher {
    /// Issues a GET against `url` and decodes the body as a JSON object.
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<Document>> + Send;

    /// Issues a GET against `url` and returns the body verbatim.
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}
