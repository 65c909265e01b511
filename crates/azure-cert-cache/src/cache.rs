//! Certificate cache over an Azure Blob Storage container
//!
//! Each cache key maps to one blob in the configured container. Values are
//! opaque bytes (PEM bundles in practice, nothing is validated here) and a
//! Put replaces the previous value in full; concurrent writers on one key
//! resolve to whatever the storage service commits last.

use async_trait::async_trait;
use azure_blob_client::ContainerClient;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{CertCacheError, Result};

/// Content type recorded on stored certificate material. Descriptive only,
/// never enforced on reads.
pub const PEM_CONTENT_TYPE: &str = "application/x-pem-file";

const CONTAINER_ALREADY_EXISTS: &str = "ContainerAlreadyExists";

/// Capability set expected of a certificate cache: byte values stored under
/// string keys, with a distinct cache-miss condition on reads and idempotent
/// deletes.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch the cached value for `key`. Returns
    /// [`CertCacheError::CacheMiss`] when nothing is stored under it.
    async fn get(&self, ctx: &CancellationToken, key: &str) -> Result<Vec<u8>>;

    /// Store `data` under `key`, replacing any existing value in full.
    async fn put(&self, ctx: &CancellationToken, key: &str, data: &[u8]) -> Result<()>;

    /// Remove the value under `key`. Removing an absent key is not an error.
    async fn delete(&self, ctx: &CancellationToken, key: &str) -> Result<()>;
}

/// Azure Blob Storage backend for a certificate cache
///
/// Holds a single configured [`ContainerClient`] and no other state, so one
/// instance can serve any number of concurrent callers.
pub struct CertCache {
    client: ContainerClient,
}

impl CertCache {
    /// Create a cache against the standard endpoint for the account.
    pub fn new(account: &str, key: &str, container: &str) -> Result<Self> {
        if container.trim().is_empty() {
            return Err(CertCacheError::EmptyContainerName);
        }
        let client = ContainerClient::new(account, key, container)?;
        Ok(Self { client })
    }

    /// Create a cache against a custom endpoint, e.g. a local emulator or a
    /// compatible non-Azure service.
    pub fn with_endpoint(
        account: &str,
        key: &str,
        container: &str,
        endpoint: &str,
    ) -> Result<Self> {
        if container.trim().is_empty() {
            return Err(CertCacheError::EmptyContainerName);
        }
        let client = ContainerClient::with_endpoint(account, key, container, endpoint)?;
        Ok(Self { client })
    }

    /// Name of the configured container.
    pub fn container(&self) -> &str {
        self.client.container()
    }

    /// Provision the configured container. An already-existing container is
    /// success; a container still being deleted by the service is not.
    pub async fn create_container(&self, ctx: &CancellationToken) -> Result<()> {
        match self.client.create(ctx).await {
            Err(err) if err.error_code() == Some(CONTAINER_ALREADY_EXISTS) => {
                debug!(container = %self.client.container(), "container already exists");
                Ok(())
            }
            result => result.map_err(CertCacheError::from),
        }
    }

    /// Delete the configured container and every entry in it. An absent
    /// container is success.
    pub async fn delete_container(&self, ctx: &CancellationToken) -> Result<()> {
        match self.client.delete(ctx).await {
            Err(err) if err.is_not_found() => Ok(()),
            result => result.map_err(CertCacheError::from),
        }
    }

    /// Fetch the certificate data stored under `key`.
    pub async fn get(&self, ctx: &CancellationToken, key: &str) -> Result<Vec<u8>> {
        match self.client.get_blob(ctx, key).await {
            Err(err) if err.is_not_found() => Err(CertCacheError::CacheMiss),
            result => result.map_err(CertCacheError::from),
        }
    }

    /// Store certificate data under `key`, replacing any existing value.
    pub async fn put(&self, ctx: &CancellationToken, key: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_blob(ctx, key, data, PEM_CONTENT_TYPE)
            .await?;
        Ok(())
    }

    /// Remove the certificate data under `key`. An absent key is success, so
    /// repeated deletes are side-effect-free.
    pub async fn delete(&self, ctx: &CancellationToken, key: &str) -> Result<()> {
        match self.client.delete_blob(ctx, key).await {
            Err(err) if err.is_not_found() => {
                debug!(key, "key already absent on delete");
                Ok(())
            }
            result => result.map_err(CertCacheError::from),
        }
    }
}

// Cache implementation
#[async_trait]
impl Cache for CertCache {
    async fn get(&self, ctx: &CancellationToken, key: &str) -> Result<Vec<u8>> {
        CertCache::get(self, ctx, key).await
    }

    async fn put(&self, ctx: &CancellationToken, key: &str, data: &[u8]) -> Result<()> {
        CertCache::put(self, ctx, key, data).await
    }

    async fn delete(&self, ctx: &CancellationToken, key: &str) -> Result<()> {
        CertCache::delete(self, ctx, key).await
    }
}
