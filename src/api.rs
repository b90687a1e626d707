use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use tokio::net::ToSocketAddrs;

use crate::encode::{Encoder, Style};
use crate::introspect::SnapshotSource;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

struct AppState<S> {
    source: S,
    encoder: Encoder,
}

/// Returns whether the client accepts a gzip-encoded response.
fn accepts_gzip(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT_ENCODING)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("gzip"))
}

async fn get_introspection<S: SnapshotSource>(
    State(state): State<Arc<AppState<S>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    log::info!("{method} {uri}");

    if method != Method::GET {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET")],
            "405 method not allowed\n",
        )
            .into_response();
    }

    let snapshot = match state.source.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            log::error!("Failed to introspect host: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to introspect host: {err}\n"),
            )
                .into_response();
        }
    };

    let gzip = accepts_gzip(&headers);
    let body = match state.encoder.encode(&snapshot, Style::Compact, gzip) {
        Ok(body) => body,
        Err(err) => {
            log::error!("Failed to encode snapshot: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to encode snapshot: {err}\n"),
            )
                .into_response();
        }
    };

    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
        body,
    )
        .into_response();
    if gzip {
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(header::VARY, HeaderValue::from_static("accept-encoding"));
    }
    response
}

async fn not_found(method: Method, uri: Uri) -> Response {
    log::info!("{method} {uri}");
    (StatusCode::NOT_FOUND, "404 page not found\n").into_response()
}

pub struct APIServer {
    router: axum::Router,
}

impl APIServer {
    /// Creates a server answering `GET /` with a fresh snapshot from `source`.
    pub fn new<S>(source: S, encoder: Encoder) -> Self
    where
        S: SnapshotSource + Send + Sync + 'static,
    {
        let state = Arc::new(AppState { source, encoder });
        let router = axum::Router::new()
            .route("/", any(get_introspection::<S>))
            .fallback(not_found)
            .with_state(state);
        Self { router }
    }

    pub fn into_router(self) -> axum::Router {
        self.router
    }

    /// Binds to `addr` and serves requests until the process exits.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the listener or accepting connections fails.
    pub async fn listen(self, addr: impl ToSocketAddrs) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("Server listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router.into_make_service()).await
    }
}
