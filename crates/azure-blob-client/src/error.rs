//! Error types for the Azure Blob Storage client

use reqwest::StatusCode;
use std::fmt;

#[derive(Debug)]
pub enum BlobError {
    /// Transport-level failure (connect, TLS, timeout)
    Http(Box<reqwest::Error>),
    /// Non-success response from the storage service
    Service {
        status: StatusCode,
        /// Value of the `x-ms-error-code` response header, when present
        code: Option<String>,
    },
    /// Account key is not valid base64
    Credential(base64::DecodeError),
    /// Invalid client configuration
    Config(String),
    /// The cancellation token for the call fired before the response arrived
    Cancelled,
}

impl BlobError {
    /// True when the service reported the container or blob as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlobError::Service { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Storage error code reported by the service, e.g. `BlobNotFound`.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            BlobError::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobError::Http(err) => write!(f, "HTTP error: {}", err),
            BlobError::Service {
                status,
                code: Some(code),
            } => write!(f, "Storage service error: {} ({})", status, code),
            BlobError::Service { status, code: None } => {
                write!(f, "Storage service error: {}", status)
            }
            BlobError::Credential(err) => write!(f, "Invalid account key: {}", err),
            BlobError::Config(msg) => write!(f, "Configuration error: {}", msg),
            BlobError::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for BlobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlobError::Http(err) => Some(err.as_ref()),
            BlobError::Credential(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BlobError {
    fn from(err: reqwest::Error) -> Self {
        BlobError::Http(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BlobError>;
