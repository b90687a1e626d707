//! Helpers shared by tests that talk to metadata endpoints.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::fetch::{self, Document, MetadataFetcher};

/// Serves `router` on an ephemeral localhost port and returns its base URL.
pub(crate) async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}

/// Returns a URL on localhost that nothing listens on.
pub(crate) async fn unused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");
    drop(listener);
    format!("http://{addr}/")
}

/// [`MetadataFetcher`] that serves canned JSON bodies and records every requested URL.
///
/// URLs without a canned body answer with `404 Not Found`.
#[derive(Debug, Default)]
pub(crate) struct RecordingFetcher {
    responses: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    pub(crate) fn with(mut self, url: impl Into<String>, body: serde_json::Value) -> Self {
        self.responses.insert(url.into(), body.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn respond(&self, url: &str) -> fetch::Result<String> {
        self.calls.lock().expect("calls lock").push(url.to_owned());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| fetch::Error::Status {
                url: url.to_owned(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

impl MetadataFetcher for RecordingFetcher {
    async fn fetch_json(&self, url: &str) -> fetch::Result<Document> {
        let body = self.respond(url)?;
        serde_json::from_str(&body).map_err(|source| fetch::Error::Decode {
            url: url.to_owned(),
            source,
        })
    }

    async fn fetch_text(&self, url: &str) -> fetch::Result<String> {
        self.respond(url)
    }
}
