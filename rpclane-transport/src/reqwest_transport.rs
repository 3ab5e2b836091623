use crate::transport::{HttpTransport, RequestDescriptor, ResponseDescriptor, TransportError};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, trace};

/// [`HttpTransport`] over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: HttpClient,
}

impl ReqwestTransport {
    /// `timeout` is the default for requests that carry none of their own.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(TransportError::Build)?;
        Ok(Self { http_client })
    }

    /// Reuse an existing `reqwest` client and its connection pool.
    pub fn with_client(http_client: HttpClient) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        endpoint: &str,
        request: RequestDescriptor,
    ) -> Result<ResponseDescriptor, TransportError> {
        debug!("{} {} ({} bytes)", request.method, endpoint, request.body.len());

        let mut builder = self
            .http_client
            .request(request.method, endpoint)
            .headers(request.headers)
            .body(request.body);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        let response = builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        trace!("{} response from {}: {} bytes", status, endpoint, body.len());
        Ok(ResponseDescriptor {
            status,
            headers,
            body,
        })
    }
}
