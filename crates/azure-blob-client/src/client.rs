//! Container-scoped Blob service client
//!
//! One client talks to one container. Every operation is a single signed
//! HTTP call raced against a caller-supplied cancellation token; retry and
//! backoff policy is left to the caller.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::credential::SharedKeyCredential;
use crate::error::{BlobError, Result};
use crate::signing;

const API_VERSION: &str = "2021-12-02";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "azure-blob-client-rs/0.1";

/// Client for one Azure Blob Storage container
///
/// Holds only immutable configuration and a connection pool, so a single
/// instance is safe to share across tasks.
pub struct ContainerClient {
    http: reqwest::Client,
    endpoint: Url,
    container: String,
    credential: SharedKeyCredential,
}

impl ContainerClient {
    /// Create a client against the standard endpoint for the account.
    pub fn new(account: &str, key: &str, container: &str) -> Result<Self> {
        let endpoint = format!("https://{}.blob.core.windows.net", account);
        Self::with_endpoint(account, key, container, &endpoint)
    }

    /// Create a client against a custom endpoint, e.g. a local emulator or a
    /// compatible non-Azure service.
    pub fn with_endpoint(
        account: &str,
        key: &str,
        container: &str,
        endpoint: &str,
    ) -> Result<Self> {
        let credential = SharedKeyCredential::new(account, key)?;
        let endpoint = Url::parse(endpoint)
            .map_err(|err| BlobError::Config(format!("invalid endpoint URL: {}", err)))?;
        if endpoint.cannot_be_a_base() {
            return Err(BlobError::Config(
                "endpoint URL cannot serve as a base".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| BlobError::Config(format!("failed to build HTTP client: {}", err)))?;

        Ok(Self {
            http,
            endpoint,
            container: container.to_string(),
            credential,
        })
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Provision the container. The service answers 409 `ContainerAlreadyExists`
    /// if it is already there; that is surfaced unchanged.
    pub async fn create(&self, ctx: &CancellationToken) -> Result<()> {
        let req = self.signed_request(Method::PUT, self.container_url(), 0, &[]);
        cancellable(ctx, async {
            self.send(req).await?;
            debug!(container = %self.container, "created container");
            Ok(())
        })
        .await
    }

    /// Delete the container and everything in it.
    pub async fn delete(&self, ctx: &CancellationToken) -> Result<()> {
        let req = self.signed_request(Method::DELETE, self.container_url(), 0, &[]);
        cancellable(ctx, async {
            self.send(req).await?;
            debug!(container = %self.container, "deleted container");
            Ok(())
        })
        .await
    }

    /// Fetch the full contents of a blob.
    pub async fn get_blob(&self, ctx: &CancellationToken, name: &str) -> Result<Vec<u8>> {
        let req = self.signed_request(Method::GET, self.blob_url(name), 0, &[]);
        cancellable(ctx, async {
            let response = self.send(req).await?;
            let data = response.bytes().await?;
            debug!(
                container = %self.container,
                blob = name,
                size = data.len(),
                "fetched blob"
            );
            Ok(data.to_vec())
        })
        .await
    }

    /// Upload a blob as a block blob, replacing any existing contents.
    pub async fn put_blob(
        &self,
        ctx: &CancellationToken,
        name: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<()> {
        let headers = [
            ("x-ms-blob-type", "BlockBlob".to_string()),
            ("x-ms-blob-content-type", content_type.to_string()),
        ];
        let req = self
            .signed_request(Method::PUT, self.blob_url(name), data.len(), &headers)
            .body(data.to_vec());
        cancellable(ctx, async {
            self.send(req).await?;
            debug!(
                container = %self.container,
                blob = name,
                size = data.len(),
                "stored blob"
            );
            Ok(())
        })
        .await
    }

    /// Delete a blob. The service answers 404 `BlobNotFound` for an absent
    /// blob; that is surfaced unchanged.
    pub async fn delete_blob(&self, ctx: &CancellationToken, name: &str) -> Result<()> {
        let req = self.signed_request(Method::DELETE, self.blob_url(name), 0, &[]);
        cancellable(ctx, async {
            self.send(req).await?;
            debug!(container = %self.container, blob = name, "deleted blob");
            Ok(())
        })
        .await
    }

    fn container_url(&self) -> Url {
        let mut url = self.object_url(None);
        url.set_query(Some("restype=container"));
        url
    }

    fn blob_url(&self, name: &str) -> Url {
        self.object_url(Some(name))
    }

    fn object_url(&self, blob: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .expect("endpoint validated at construction");
            segments.pop_if_empty().push(&self.container);
            if let Some(name) = blob {
                segments.push(name);
            }
        }
        url
    }

    fn signed_request(
        &self,
        method: Method,
        url: Url,
        content_length: usize,
        extra_headers: &[(&str, String)],
    ) -> RequestBuilder {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();

        let mut ms_headers: Vec<(&str, String)> = vec![
            ("x-ms-date", date),
            ("x-ms-version", API_VERSION.to_string()),
        ];
        ms_headers.extend(
            extra_headers
                .iter()
                .map(|(name, value)| (*name, value.clone())),
        );

        let string_to_sign = signing::string_to_sign(
            method.as_str(),
            self.credential.account(),
            &url,
            content_length,
            None,
            &ms_headers,
        );
        let signature = self.credential.sign(&string_to_sign);

        let mut builder = self.http.request(method, url).header(
            "authorization",
            format!("SharedKey {}:{}", self.credential.account(), signature),
        );
        for (name, value) in ms_headers {
            builder = builder.header(name, value);
        }
        builder
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response> {
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let code = response
            .headers()
            .get("x-ms-error-code")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Err(BlobError::Service { status, code })
    }
}

/// Race an operation against its cancellation token. An already-cancelled
/// token wins before the operation is ever polled.
async fn cancellable<F, T>(ctx: &CancellationToken, op: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = ctx.cancelled() => Err(BlobError::Cancelled),
        result = op => result,
    }
}
