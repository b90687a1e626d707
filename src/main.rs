/// Entry point for the Introspector.
///
/// Prints a JSON snapshot of the host, its environment and any reachable AWS
/// EC2/ECS metadata, or serves fresh snapshots over HTTP with `--server`.
///
/// # Errors
///
/// Returns an error if the host identity cannot be determined, the listener
/// cannot be bound or the snapshot cannot be written.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug introspector --compact
/// INTROSPECTOR_PORT=8080 introspector --server
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let context = introspector::snapshot::Context::new();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = introspector::config::Config::from_args(std::env::args_os());
    introspector::run(context, config).await
}
