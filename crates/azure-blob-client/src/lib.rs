//! Minimal Azure Blob Storage client
//!
//! Speaks the narrow slice of the Blob service REST API needed to keep opaque
//! blobs in a single container: container create/delete and blob
//! get/put/delete, authorized with the SharedKey scheme. Responses are
//! translated into a typed error carrying the HTTP status and the service
//! error code; no retry or backoff policy lives here.

pub mod client;
pub mod credential;
pub mod error;
mod signing;

pub use client::ContainerClient;
pub use credential::SharedKeyCredential;
pub use error::{BlobError, Result};
