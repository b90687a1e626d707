//! Amazon EC2 instance metadata.
mod client;
mod document;

pub use client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, Ec2MetadataClient};
pub use document::InstanceIdentityDocument;

use crate::fetch;

pub trait InstanceIdentitySource {
    /// Fetches the instance identity document.
    ///
    /// Resolves to `Ok(None)` when the metadata service cannot be reached from
    /// this host, and to an error when it is reachable but the document cannot
    /// be retrieved.
    fn identity_document(
        &self,
    ) -> impl Future<Output = fetch::Result<Option<InstanceIdentityDocument>>> + Send;
}
