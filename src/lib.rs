//! Introspector: reports what a process can learn about where it runs.
//!
//! A snapshot combines the local host identity (hostname, user, group, operating
//! system), the full process environment and whatever AWS metadata is reachable:
//! the EC2 instance identity document and the ECS container and task metadata
//! and stats. Snapshots are printed once to stdout or served over HTTP.

use std::io::Write;

use config::Config;
use ec2::Ec2MetadataClient;
use encode::{Encoder, Style};
use environment::Environment;
use fetch::HttpFetcher;
use host::LocalHost;
use introspect::{Introspector, SnapshotSource};
use snapshot::Context;

pub mod api;
pub mod config;
pub mod ec2;
pub mod ecs;
pub mod encode;
pub mod environment;
pub mod error;
pub mod fetch;
pub mod fsutil;
pub mod host;
pub mod introspect;
pub mod snapshot;

#[cfg(test)]
mod testutil;

/// Runs the Introspector application.
///
/// In server mode, answers `GET /` with a fresh snapshot until the process is
/// stopped. Otherwise takes a single snapshot and writes it to stdout.
///
/// # Errors
///
/// Possible errors include:
/// - Failure to build the HTTP clients.
/// - Failure to determine the hostname, user or group of the process.
/// - Failure to bind the listening socket.
/// - I/O errors when writing to stdout.
pub async fn run(context: Context, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = HttpFetcher::new(config.fetch_timeout())?;
    let ec2 = Ec2MetadataClient::from_env(&Environment::capture())?;
    log::debug!(
        "EC2 metadata endpoint: {} (disabled: {})",
        ec2.endpoint(),
        ec2.is_disabled()
    );
    let introspector = Introspector::new(context, fetcher, ec2, LocalHost)
        .with_payload_format(config.payload_format());
    let encoder = Encoder::new();

    if config.server {
        let api = api::APIServer::new(introspector, encoder);
        api.listen((config.bind, config.port)).await?;
        return Ok(());
    }

    let body = render_snapshot(&introspector, &encoder, config.stdout_style()).await?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&body)?;
    stdout.flush()?;
    Ok(())
}

/// Takes one snapshot from `source` and encodes it, uncompressed, for printing.
///
/// # Errors
///
/// Returns an error if the host identity cannot be determined or the snapshot
/// cannot be encoded.
pub async fn render_snapshot<S: SnapshotSource>(
    source: &S,
    encoder: &Encoder,
    style: Style,
) -> error::Result<Vec<u8>> {
    let snapshot = source.snapshot().await?;
    Ok(encoder.encode(&snapshot, style, false)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use crate::snapshot::tests::populated_snapshot;

    struct FixedSource;

    impl SnapshotSource for FixedSource {
        async fn snapshot(&self) -> host::Result<Snapshot> {
            Ok(populated_snapshot())
        }
    }

    struct FailingSource;

    impl SnapshotSource for FailingSource {
        async fn snapshot(&self) -> host::Result<Snapshot> {
            Err(host::Error::UnknownUser { uid: 4242 })
        }
    }

    async fn render(args: &[&str]) -> Vec<u8> {
        let config = Config::try_from_args(args.iter().copied()).unwrap();
        render_snapshot(&FixedSource, &Encoder::new(), config.stdout_style())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_stdout_is_indented_by_default() {
        let out = render(&["introspector"]).await;

        assert!(out.starts_with(b"{\n  \"startTime\": "));
        assert_eq!(out.last(), Some(&b'\n'));
        let snapshot: Snapshot = serde_json::from_slice(&out).unwrap();
        assert_eq!(snapshot, populated_snapshot());
    }

    #[tokio::test]
    async fn test_stdout_compact_flag() {
        for args in [["introspector", "-c"], ["introspector", "-compact"]] {
            let out = render(&args).await;

            assert!(out.starts_with(b"{\"startTime\":"), "{args:?}");
            assert_eq!(out.iter().filter(|&&b| b == b'\n').count(), 1);
            let snapshot: Snapshot = serde_json::from_slice(&out).unwrap();
            assert_eq!(snapshot, populated_snapshot());
        }
    }

    #[tokio::test]
    async fn test_host_failure_is_reported() {
        let err = render_snapshot(&FailingSource, &Encoder::new(), Style::Pretty)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            error::Error::LocalSystem(host::Error::UnknownUser { uid: 4242 })
        ));
    }
}
