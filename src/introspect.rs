use crate::ec2::{Ec2MetadataClient, InstanceIdentitySource};
use crate::ecs;
use crate::environment::{ECS_CONTAINER_METADATA_FILE, Environment, detect_discovery_mode};
use crate::error::ResultOkLogExt;
use crate::fetch::{HttpFetcher, MetadataFetcher, PayloadFormat};
use crate::host::{self, HostIdentity, LocalHost};
use crate::snapshot::{Context, Snapshot};

/// Anything that can produce a fresh [`Snapshot`] on demand.
pub trait SnapshotSource {
    fn snapshot(&self) -> impl Future<Output = host::Result<Snapshot>> + Send;
}

/// Assembles snapshots from the host, the environment and the AWS metadata services.
///
/// Holds no per-request state; one instance serves any number of concurrent requests.
#[derive(Debug)]
pub struct Introspector<F = HttpFetcher, E = Ec2MetadataClient, H = LocalHost> {
    context: Context,
    fetcher: F,
    ec2: E,
    host: H,
    format: PayloadFormat,
}

impl<F, E, H> Introspector<F, E, H>
where
    F: MetadataFetcher + Sync,
    E: InstanceIdentitySource + Sync,
    H: HostIdentity + Sync,
{
    pub fn new(context: Context, fetcher: F, ec2: E, host: H) -> Self {
        Self {
            context,
            fetcher,
            ec2,
            host,
            format: PayloadFormat::default(),
        }
    }

    /// Sets how ECS responses and the metadata file are embedded.
    pub fn with_payload_format(mut self, format: PayloadFormat) -> Self {
        self.format = format;
        self
    }

    /// Takes a snapshot of the current process environment.
    ///
    /// # Errors
    ///
    /// See [`Introspector::introspect_env`].
    pub async fn introspect(&self) -> host::Result<Snapshot> {
        self.introspect_env(Environment::capture()).await
    }

    /// Takes a snapshot using `env` as the process environment.
    ///
    /// External metadata sources are queried sequentially: the ECS endpoint
    /// selected by the environment first, then EC2 instance metadata, then the
    /// ECS container metadata file. A failing source is logged and leaves only
    /// its own field empty.
    ///
    /// # Errors
    ///
    /// Fails only if the local host identity (hostname, user, group) cannot be
    /// determined.
    pub async fn introspect_env(&self, env: Environment) -> host::Result<Snapshot> {
        let request_time = self.context.request_time();

        let hostname = self.host.hostname()?;
        let user = self.host.current_user()?;
        let group = self.host.group(user.gid)?;
        let system = self.host.platform();

        let mode = detect_discovery_mode(&env);
        log::debug!("ECS discovery mode: {mode:?}");
        let ecs = ecs::discover(&self.fetcher, &mode, self.format).await;

        let ec2_instance_metadata = self.ec2.identity_document().await.ok_log().flatten();

        let ecs_container_metadata_file = env
            .get(ECS_CONTAINER_METADATA_FILE)
            .and_then(|path| ecs::read_metadata_file(path, self.format));

        Ok(Snapshot {
            start_time: self.context.start_time(),
            request_time,
            hostname,
            user,
            group,
            system,
            env: env.into_vars(),
            ec2_instance_metadata,
            ecs_container_metadata: ecs.container_metadata,
            ecs_container_stats: ecs.container_stats,
            ecs_task_metadata: ecs.task_metadata,
            ecs_task_stats: ecs.task_stats,
            ecs_container_metadata_file,
        })
    }
}

impl<F, E, H> SnapshotSource for Introspector<F, E, H>
where
    F: MetadataFetcher + Sync,
    E: InstanceIdentitySource + Sync,
    H: HostIdentity + Sync,
{
    async fn snapshot(&self) -> host::Result<Snapshot> {
        self.introspect().await
    }
}
