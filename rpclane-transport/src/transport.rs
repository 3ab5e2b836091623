use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use http::{Method, StatusCode};
use rpclane_core::{merge_headers, HeaderError};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub const JSON_ACCEPT: &str = "application/json";
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Everything needed to put one call on the wire, short of the endpoint.
///
/// `cancel` is the call's cancellation token. Request hooks may rewrite any
/// field but must hand the same token back, or cancelling the call no longer
/// reaches the transport. `timeout` bounds the whole exchange when set.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub cancel: CancellationToken,
    pub timeout: Option<Duration>,
}

impl RequestDescriptor {
    /// A POST carrying a JSON body with the protocol's fixed headers.
    pub fn json_post(body: impl Into<Bytes>, cancel: CancellationToken) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_ACCEPT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        RequestDescriptor {
            method: Method::POST,
            headers,
            body: body.into(),
            cancel,
            timeout: None,
        }
    }

    pub fn merge_headers<I, K, V>(&mut self, additions: I) -> Result<(), HeaderError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        merge_headers(&mut self.headers, additions)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The raw HTTP response, before envelope parsing.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ResponseDescriptor {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Sends one request to one endpoint and reads the whole body.
///
/// Callers drop the returned future to abort an exchange; implementations
/// must not rely on running to completion.
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    async fn send(
        &self,
        endpoint: &str,
        request: RequestDescriptor,
    ) -> Result<ResponseDescriptor, TransportError>;
}
