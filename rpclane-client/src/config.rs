use crate::error::ConfigError;
use rpclane_transport::{RequestDescriptor, ResponseDescriptor};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const ENDPOINT_ENV: &str = "RPC_URL";
pub const TIMEOUT_ENV: &str = "RPC_TIMEOUT_MS";

/// Rewrites the outgoing request, typically to add auth headers.
pub type RequestHook = Arc<dyn Fn(RequestDescriptor) -> RequestDescriptor + Send + Sync>;

/// Observes the raw response before the envelope is parsed.
pub type ResponseHook = Arc<dyn Fn(&ResponseDescriptor) + Send + Sync>;

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// URL every call is posted to. Calls fail fast while this is unset.
    pub endpoint: Option<String>,
    /// Applied to each request when the call is issued.
    pub request_hook: Option<RequestHook>,
    /// Looked up when a response arrives, not when the call was issued.
    pub response_hook: Option<ResponseHook>,
    /// Per-request timeout in milliseconds, read when each call is issued
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_hook: None,
            response_hook: None,
            timeout_ms: Some(30000),
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(url: impl Into<String>) -> Self {
        Self {
            endpoint: Some(url.into()),
            ..Default::default()
        }
    }

    /// Defaults overridden by `RPC_URL` and `RPC_TIMEOUT_MS` when they are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENDPOINT_ENV).filter(|url| !url.is_empty()) {
            config.endpoint = Some(url);
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let timeout = raw.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                var: TIMEOUT_ENV,
                value: raw.clone(),
            })?;
            config.timeout_ms = Some(timeout);
        }
        Ok(config)
    }

    pub fn with_request_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(RequestDescriptor) -> RequestDescriptor + Send + Sync + 'static,
    {
        self.request_hook = Some(Arc::new(hook));
        self
    }

    pub fn with_response_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ResponseDescriptor) + Send + Sync + 'static,
    {
        self.response_hook = Some(Arc::new(hook));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("request_hook", &self.request_hook.is_some())
            .field("response_hook", &self.response_hook.is_some())
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_has_no_endpoint() {
        let config = ClientConfig::default();
        assert!(config.endpoint.is_none());
        assert!(config.request_hook.is_none());
        assert!(config.response_hook.is_none());
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_from_env_reads_endpoint_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("RPC_URL", "http://backend:8000"),
            ("RPC_TIMEOUT_MS", "1500"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint.as_deref(), Some("http://backend:8000"));
        assert_eq!(config.timeout_ms, Some(1500));
    }

    #[test]
    fn test_from_env_empty_url_is_unset() {
        let config = ClientConfig::from_lookup(lookup(&[("RPC_URL", "")])).unwrap();
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_from_env_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[("RPC_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidTimeout { var: "RPC_TIMEOUT_MS", .. }
        ));
    }

    #[test]
    fn test_debug_hides_hooks() {
        let config = ClientConfig::with_endpoint("http://localhost:8000")
            .with_request_hook(|request| request)
            .with_response_hook(|_| {});

        let debug = format!("{:?}", config);
        assert!(debug.contains("http://localhost:8000"));
        assert!(debug.contains("request_hook: true"));
        assert!(debug.contains("response_hook: true"));
    }
}
