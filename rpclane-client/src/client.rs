// rpclane client
// Issues one JSON-RPC style call per request against the configured endpoint:
// - Request envelope construction with process-wide correlation ids
// - Request/response hooks read from shared, mutable configuration
// - Success/error envelope unwrapping
// - Cancellation through the returned call handle

use crate::call::AbortableCall;
use crate::config::ClientConfig;
use crate::error::ClientError;
use rpclane_core::{decode_response, encode_call, next_call_id, CallEnvelope, Outcome};
use rpclane_transport::{HttpTransport, RequestDescriptor, ReqwestTransport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Main client struct
///
/// Clones share one configuration: a change made through any clone applies
/// to every call issued afterwards, and to the response hook lookup of calls
/// still waiting for their response.
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<RwLock<ClientConfig>>,
    transport: Arc<dyn HttpTransport>,
}

impl Client {
    /// Create a new client backed by `reqwest`
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(None)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            transport,
        }
    }

    /// Create a new client posting to `url` with otherwise default configuration
    pub fn new_with_url(url: &str) -> Result<Self, ClientError> {
        Self::new(ClientConfig::with_endpoint(url))
    }

    /// Mutate the shared configuration in place.
    pub fn configure<R>(&self, update: impl FnOnce(&mut ClientConfig) -> R) -> R {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut config)
    }

    pub fn set_endpoint(&self, endpoint: Option<String>) {
        self.configure(|config| config.endpoint = endpoint);
    }

    /// A snapshot of the current configuration.
    pub fn config(&self) -> ClientConfig {
        self.read_config().clone()
    }

    fn read_config(&self) -> std::sync::RwLockReadGuard<'_, ClientConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Perform a single RPC call with serde conversions on both ends
    pub fn call<P, R>(&self, method: &str, params: &P) -> AbortableCall<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned + Send + 'static,
    {
        self.invoke(method, params, serde_json::to_value, serde_json::from_value)
    }

    /// Perform a single RPC call with caller-supplied conversions.
    ///
    /// The endpoint, timeout and request hook are read now; the returned call
    /// sends nothing until it is awaited.
    pub fn invoke<P, R, E, D>(&self, method: &str, params: P, encode: E, decode: D) -> AbortableCall<R>
    where
        E: FnOnce(P) -> Result<Value, serde_json::Error>,
        D: FnOnce(Value) -> Result<R, serde_json::Error> + Send + 'static,
        R: Send + 'static,
    {
        let (endpoint, request_hook, timeout) = {
            let config = self.read_config();
            (
                config.endpoint.clone(),
                config.request_hook.clone(),
                config.timeout(),
            )
        };
        let Some(endpoint) = endpoint else {
            return AbortableCall::rejected(
                None,
                ClientError::Configuration("client endpoint is not configured".to_string()),
            );
        };

        let id = next_call_id();
        let params = match encode(params) {
            Ok(params) => params,
            Err(err) => return AbortableCall::rejected(Some(id), ClientError::Encode(err)),
        };
        let envelope = CallEnvelope::new(id, method, params);
        let body = match encode_call(&envelope) {
            Ok(body) => body,
            Err(err) => return AbortableCall::rejected(Some(id), ClientError::Encode(err)),
        };

        let cancel = CancellationToken::new();
        let mut request = RequestDescriptor::json_post(body, cancel.clone());
        request.timeout = timeout;
        if let Some(hook) = request_hook {
            request = hook(request);
        }

        debug!("Sending call {} ({}) to {}", id, envelope.method, endpoint);
        trace!("Request body: {}", String::from_utf8_lossy(&request.body));

        let client = self.clone();
        let outcome = async move {
            // Hooks that swap the token opt out of cancellation.
            let token = request.cancel.clone();
            let response = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Call {} cancelled before a response arrived", id);
                    return Err(ClientError::Cancelled);
                }
                response = client.transport.send(&endpoint, request) => response?,
            };

            let response_hook = client.read_config().response_hook.clone();
            if let Some(hook) = response_hook {
                hook(&response);
            }

            trace!("Response body: {}", String::from_utf8_lossy(&response.body));
            let envelope = decode_response(&response.body)?;
            match envelope.outcome {
                Outcome::Success(result) => {
                    debug!("Call {} succeeded", id);
                    decode(result).map_err(ClientError::Decode)
                }
                Outcome::Error(error) => {
                    debug!("Call {} returned {}", id, error);
                    Err(ClientError::Application(error))
                }
            }
        };

        AbortableCall::new(id, cancel, outcome)
    }
}
