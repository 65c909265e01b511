//! Error types for the certificate cache

use azure_blob_client::BlobError;
use std::fmt;

#[derive(Debug)]
pub enum CertCacheError {
    /// The key has no cached value. Callers branch on this, it is not a
    /// failure of the backend.
    CacheMiss,
    /// The configured container name is empty
    EmptyContainerName,
    /// Underlying storage failure, passed through unchanged
    Storage(BlobError),
}

impl CertCacheError {
    /// True for the cache-miss condition, false for every real failure.
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, CertCacheError::CacheMiss)
    }
}

impl fmt::Display for CertCacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertCacheError::CacheMiss => write!(f, "Cache miss"),
            CertCacheError::EmptyContainerName => {
                write!(f, "Container name must not be empty")
            }
            CertCacheError::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for CertCacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CertCacheError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BlobError> for CertCacheError {
    fn from(err: BlobError) -> Self {
        CertCacheError::Storage(err)
    }
}

pub type Result<T> = std::result::Result<T, CertCacheError>;
