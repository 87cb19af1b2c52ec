//! `Handler`/`HandlerRegistry` — the statically typed replacement for the
//! original's decorator-populated process-wide route table (§4.10, §9
//! "Runtime-dispatched handlers").

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use rmpv::Value;

use super::errors::RequestError;
use crate::util::RequestId;

/// What a `Handler` sees: the fields a broker-forwarded request carries,
/// minus the envelope/id plumbing `WorkerLoop` already resolved.
#[derive(Debug, Clone)]
pub struct WorkerRequest {
    pub id: RequestId,
    pub method: String,
    pub endpoint: String,
    pub parameters: HashMap<String, String>,
    pub data: HashMap<String, Vec<u8>>,
}

/// A handler's successful result: the response body plus its status code.
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    pub response: Value,
    pub status: u16,
}

impl HandlerResponse {
    /// `200 OK` with the given response body.
    pub fn ok(response: impl Into<Value>) -> Self {
        Self {
            response: response.into(),
            status: 200,
        }
    }

    pub fn with_status(response: impl Into<Value>, status: u16) -> Self {
        Self {
            response: response.into(),
            status,
        }
    }
}

#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, request: &WorkerRequest) -> Result<HandlerResponse, Box<dyn RequestError>>;
}

/// Immutable `(method, endpoint) -> Handler` table built once at startup.
pub struct HandlerRegistry {
    handlers: HashMap<(String, String), Arc<dyn Handler>>,
    endpoints: BTreeSet<String>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    pub fn get(&self, method: &str, endpoint: &str) -> Option<&Arc<dyn Handler>> {
        self.handlers.get(&(method.to_string(), endpoint.to_string()))
    }

    /// Sorted set of every endpoint with at least one registered handler,
    /// used to build the worker's handshake frame.
    pub fn endpoints(&self) -> &BTreeSet<String> {
        &self.endpoints
    }
}

#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<(String, String), Arc<dyn Handler>>,
}

impl HandlerRegistryBuilder {
    pub fn route(mut self, method: impl Into<String>, endpoint: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.handlers.insert((method.into(), endpoint.into()), Arc::new(handler));
        self
    }

    pub fn build(self) -> HandlerRegistry {
        let endpoints = self.handlers.keys().map(|(_, endpoint)| endpoint.clone()).collect();
        HandlerRegistry {
            handlers: self.handlers,
            endpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::errors::HandlerError;

    struct EchoHandler;

    #[async_trait]
    impl Handler for EchoHandler {
        async fn call(&self, request: &WorkerRequest) -> Result<HandlerResponse, Box<dyn RequestError>> {
            Ok(HandlerResponse::ok(request.endpoint.clone()))
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl Handler for FailingHandler {
        async fn call(&self, _request: &WorkerRequest) -> Result<HandlerResponse, Box<dyn RequestError>> {
            Err(Box::new(HandlerError::ObjectDoesNotExist))
        }
    }

    fn sample_request(endpoint: &str) -> WorkerRequest {
        WorkerRequest {
            id: RequestId::new(),
            method: "GET".to_string(),
            endpoint: endpoint.to_string(),
            parameters: HashMap::new(),
            data: HashMap::new(),
        }
    }

    #[test]
    fn test_endpoints_reflects_all_routes() {
        let registry = HandlerRegistry::builder()
            .route("GET", "a", EchoHandler)
            .route("POST", "b", EchoHandler)
            .build();
        let endpoints: Vec<_> = registry.endpoints().iter().cloned().collect();
        assert_eq!(endpoints, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_get_matches_method_and_endpoint() {
        let registry = HandlerRegistry::builder().route("GET", "a", EchoHandler).build();
        assert!(registry.get("GET", "a").is_some());
        assert!(registry.get("POST", "a").is_none());
        assert!(registry.get("GET", "b").is_none());
    }

    #[tokio::test]
    async fn test_handler_invocation_succeeds() {
        let registry = HandlerRegistry::builder().route("GET", "a", EchoHandler).build();
        let handler = registry.get("GET", "a").expect("registered");
        let response = handler.call(&sample_request("a")).await.expect("call");
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_handler_invocation_propagates_request_error() {
        let registry = HandlerRegistry::builder().route("GET", "a", FailingHandler).build();
        let handler = registry.get("GET", "a").expect("registered");
        let err = handler.call(&sample_request("a")).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
