/// Errors that may occur while fetching a metadata endpoint.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("GET {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} > {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to decode response of `{url}`: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Returns the URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            Error::Transport { url, .. } | Error::Status { url, .. } | Error::Decode { url, .. } => {
                url
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
