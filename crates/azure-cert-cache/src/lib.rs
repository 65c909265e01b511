//! Azure Blob Storage backed certificate cache
//!
//! Persists TLS certificate material as blobs in a single storage container.
//! Reads of absent keys surface a distinct cache-miss error so callers can
//! tell "nothing cached" from a failing backend; deletes of absent keys are
//! success. There is no local tier, expiration, or retry policy: every
//! operation is one call against the container, which is the single source
//! of truth.

pub mod cache;
pub mod error;

pub use azure_blob_client::BlobError;
pub use cache::{Cache, CertCache, PEM_CONTENT_TYPE};
pub use error::{CertCacheError, Result};
