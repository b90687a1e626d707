use std::time::Duration;

use crate::environment::{AWS_EC2_METADATA_DISABLED, AWS_EC2_METADATA_SERVICE_ENDPOINT, Environment};
use crate::fetch::{Error, Result};

use super::{InstanceIdentityDocument, InstanceIdentitySource};

/// Link-local address of the instance metadata service.
pub const DEFAULT_ENDPOINT: &str = "http://169.254.169.254";
/// IMDS answers within milliseconds on EC2; anything slower means we are elsewhere.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

const TOKEN_PATH: &str = "/latest/api/token";
const TOKEN_TTL_HEADER: &str = "x-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_TTL_SECONDS: &str = "21600";
const TOKEN_HEADER: &str = "x-aws-ec2-metadata-token";
const INSTANCE_ID_PATH: &str = "/latest/meta-data/instance-id";
const IDENTITY_DOCUMENT_PATH: &str = "/latest/dynamic/instance-identity/document";

/// Client for the EC2 instance metadata service (IMDS).
///
/// Uses an IMDSv2 session token when the service hands one out and falls back to
/// plain IMDSv1 requests otherwise.
#[derive(Debug, Clone)]
pub struct Ec2MetadataClient {
    client: reqwest::Client,
    endpoint: String,
    disabled: bool,
}

impl Ec2MetadataClient {
    /// Builds a client for the service at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be initialised.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = endpoint.into().trim_end_matches('/').to_owned();
        Ok(Self {
            client,
            endpoint,
            disabled: false,
        })
    }

    /// Builds a client honouring the AWS SDK environment conventions:
    /// [`AWS_EC2_METADATA_SERVICE_ENDPOINT`] overrides the endpoint and
    /// [`AWS_EC2_METADATA_DISABLED`]`=true` turns every lookup off.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be initialised.
    pub fn from_env(env: &Environment) -> reqwest::Result<Self> {
        let endpoint = env
            .get(AWS_EC2_METADATA_SERVICE_ENDPOINT)
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT);
        let mut client = Self::new(endpoint, DEFAULT_TIMEOUT)?;
        client.disabled = env
            .get(AWS_EC2_METADATA_DISABLED)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));
        Ok(client)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    /// Requests an IMDSv2 session token.
    ///
    /// `Ok(None)` means the service does not hand out tokens and IMDSv1 should be
    /// used. A transport error means the service is not reachable at all.
    async fn session_token(&self) -> Result<Option<String>> {
        let url = self.url(TOKEN_PATH);
        let response = self
            .client
            .put(&url)
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECONDS)
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;

        if response.status() != reqwest::StatusCode::OK {
            log::debug!(
                "PUT {url} > {}, falling back to IMDSv1",
                response.status()
            );
            return Ok(None);
        }

        let token = response
            .text()
            .await
            .map_err(|source| Error::Transport { url, source })?;
        Ok(Some(token))
    }

    /// Checks that the service answers for this instance and returns the session
    /// token to use for further requests.
    async fn probe(&self) -> Result<Option<String>> {
        let token = self.session_token().await?;
        self.get(INSTANCE_ID_PATH, token.as_deref()).await?;
        Ok(token)
    }

    async fn get(&self, path: &str, token: Option<&str>) -> Result<String> {
        let url = self.url(path);
        log::debug!("GET {url}");

        let mut request = self.client.get(&url);
        if let Some(token) = token {
            request = request.header(TOKEN_HEADER, token);
        }
        let response = request.send().await.map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Status { url, status });
        }

        response
            .text()
            .await
            .map_err(|source| Error::Transport { url, source })
    }
}

impl InstanceIdentitySource for Ec2MetadataClient {
    async fn identity_document(&self) -> Result<Option<InstanceIdentityDocument>> {
        if self.disabled {
            log::debug!("EC2 instance metadata disabled by {AWS_EC2_METADATA_DISABLED}");
            return Ok(None);
        }

        let token = match self.probe().await {
            Ok(token) => token,
            Err(err) => {
                log::debug!("EC2 instance metadata unavailable: {err}");
                return Ok(None);
            }
        };

        let body = self.get(IDENTITY_DOCUMENT_PATH, token.as_deref()).await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| Error::Decode {
                url: self.url(IDENTITY_DOCUMENT_PATH),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, put};

    use super::*;
    use crate::testutil;

    const TOKEN: &str = "AQAEAFTNrA4e";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get(TOKEN_HEADER)
            .is_some_and(|value| value.as_bytes() == TOKEN.as_bytes())
    }

    /// IMDS that only answers requests carrying a session token. Counts issued tokens.
    async fn imds_v2(tokens_issued: Arc<AtomicUsize>) -> String {
        let router = axum::Router::new()
            .route(
                TOKEN_PATH,
                put(move |headers: HeaderMap| async move {
                    if headers.contains_key(TOKEN_TTL_HEADER) {
                        tokens_issued.fetch_add(1, Ordering::SeqCst);
                        Ok(TOKEN)
                    } else {
                        Err(StatusCode::BAD_REQUEST)
                    }
                }),
            )
            .route(
                INSTANCE_ID_PATH,
                get(|headers: HeaderMap| async move {
                    if authorized(&headers) {
                        Ok("i-1234567890abcdef0")
                    } else {
                        Err(StatusCode::UNAUTHORIZED)
                    }
                }),
            )
            .route(
                IDENTITY_DOCUMENT_PATH,
                get(|headers: HeaderMap| async move {
                    if authorized(&headers) {
                        Ok(r#"{"instanceId":"i-1234567890abcdef0","region":"us-east-1"}"#)
                    } else {
                        Err(StatusCode::UNAUTHORIZED)
                    }
                }),
            );
        testutil::serve(router).await
    }

    /// IMDSv1-only service without a token endpoint.
    async fn imds_v1(document: &'static str) -> String {
        let router = axum::Router::new()
            .route(INSTANCE_ID_PATH, get(|| async { "i-0" }))
            .route(IDENTITY_DOCUMENT_PATH, get(move || async move { document }));
        testutil::serve(router).await
    }

    #[tokio::test]
    async fn test_identity_document_with_session_token() {
        let tokens_issued = Arc::new(AtomicUsize::new(0));
        let endpoint = imds_v2(Arc::clone(&tokens_issued)).await;
        let client = Ec2MetadataClient::new(endpoint, DEFAULT_TIMEOUT).unwrap();

        let doc = client.identity_document().await.unwrap().unwrap();
        assert_eq!(doc.instance_id.as_deref(), Some("i-1234567890abcdef0"));
        assert_eq!(doc.region.as_deref(), Some("us-east-1"));
        assert_eq!(tokens_issued.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_imds_v1() {
        let client =
            Ec2MetadataClient::new(imds_v1(r#"{"region":"eu-west-1"}"#).await, DEFAULT_TIMEOUT)
                .unwrap();

        let doc = client.identity_document().await.unwrap().unwrap();
        assert_eq!(doc.region.as_deref(), Some("eu-west-1"));
    }

    #[tokio::test]
    async fn test_malformed_document_is_decode_error() {
        let client = Ec2MetadataClient::new(imds_v1("<html>").await, DEFAULT_TIMEOUT).unwrap();

        let err = client.identity_document().await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_missing_instance_id_is_unavailable() {
        let router = axum::Router::new().route(IDENTITY_DOCUMENT_PATH, get(|| async { "{}" }));
        let client = Ec2MetadataClient::new(testutil::serve(router).await, DEFAULT_TIMEOUT).unwrap();

        assert!(client.identity_document().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let client = Ec2MetadataClient::new(testutil::unused_url().await, DEFAULT_TIMEOUT).unwrap();

        assert!(client.identity_document().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disabled_by_environment() {
        let env: Environment = [
            (AWS_EC2_METADATA_DISABLED, "TRUE"),
            (AWS_EC2_METADATA_SERVICE_ENDPOINT, "http://127.0.0.1:1/"),
        ]
        .into_iter()
        .collect();
        let client = Ec2MetadataClient::from_env(&env).unwrap();

        assert!(client.is_disabled());
        assert_eq!(client.endpoint(), "http://127.0.0.1:1");
        assert!(client.identity_document().await.unwrap().is_none());
    }

    #[test]
    fn test_default_endpoint() {
        let client = Ec2MetadataClient::from_env(&Environment::default()).unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
        assert!(!client.is_disabled());
    }
}
