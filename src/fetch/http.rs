use std::time::Duration;

use super::{Document, Error, MetadataFetcher, Result};

/// [`MetadataFetcher`] backed by a shared `reqwest` client.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be initialised.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Sends the request and rejects anything but `200 OK`.
    ///
    /// The response (and with it the connection) is dropped on every error path.
    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Status {
                url: url.to_owned(),
                status,
            });
        }

        Ok(response)
    }
}

impl MetadataFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Document> {
        let body = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|source| Error::Transport {
                url: url.to_owned(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| Error::Decode {
            url: url.to_owned(),
            source,
        })
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|source| Error::Transport {
                url: url.to_owned(),
                source,
            })
    }
}
