//! HTTP dispatch for inbound event notifications.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use http::StatusCode;

use crate::error::{WebhookError, WebhookResult};
use crate::event::Event;
use crate::handler::WebhookHandler;
use crate::signature::SignatureVerifier;
use crate::stats::{InstrumentedHandler, WebhookMetrics};

type ErrorCallback = Box<dyn Fn(&WebhookError) + Send + Sync>;

/// Processes inbound webhook requests.
///
/// Per request: an empty body is the provider's liveness probe and returns
/// 200 immediately; a body that fails to decode returns 400; a failed
/// signature check returns 403; a handler error returns 500; otherwise 200.
/// No response carries a body. The dispatcher holds no mutable state and is
/// shared as-is across concurrent requests.
pub struct WebhookDispatcher {
    handler: Arc<dyn WebhookHandler>,
    verifier: Option<SignatureVerifier>,
    on_error: Option<ErrorCallback>,
}

impl WebhookDispatcher {
    /// Starts building a dispatcher around a handler.
    pub fn builder(handler: impl WebhookHandler + 'static) -> WebhookDispatcherBuilder {
        WebhookDispatcherBuilder::new(handler)
    }

    /// Runs the dispatch state machine over one raw request body.
    pub async fn dispatch(&self, body: &[u8]) -> StatusCode {
        if body.is_empty() {
            // Provider liveness probe.
            return StatusCode::OK;
        }

        let event: Event = match serde_json::from_slice(body) {
            Ok(event) => event,
            Err(err) => {
                self.report(&WebhookError::Decode(err));
                return StatusCode::BAD_REQUEST;
            }
        };

        if let Some(verifier) = &self.verifier {
            if !verifier.verify(&event.header) {
                self.report(&WebhookError::Verification);
                return StatusCode::FORBIDDEN;
            }
        }

        if let Err(err) = self.handler.handle(&event).await {
            self.report(&WebhookError::Handler(err));
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        StatusCode::OK
    }

    /// Consumes the dispatcher into a router serving it at `/`.
    pub fn into_router(self) -> Router {
        webhook_router(Arc::new(self))
    }

    fn report(&self, err: &WebhookError) {
        tracing::warn!(error = %err, "webhook request rejected");
        if let Some(on_error) = &self.on_error {
            on_error(err);
        }
    }
}

enum SecretSource {
    Bytes(Vec<u8>),
    Env,
}

/// Builder for [`WebhookDispatcher`].
pub struct WebhookDispatcherBuilder {
    handler: Arc<dyn WebhookHandler>,
    secret: Option<SecretSource>,
    metrics: Option<Arc<WebhookMetrics>>,
    on_error: Option<ErrorCallback>,
}

impl WebhookDispatcherBuilder {
    /// Creates a builder around a handler.
    pub fn new(handler: impl WebhookHandler + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            secret: None,
            metrics: None,
            on_error: None,
        }
    }

    /// Enables signature verification with an explicit shared secret.
    pub fn verify_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = Some(SecretSource::Bytes(secret.into()));
        self
    }

    /// Enables signature verification with the secret from
    /// `FACEGATE_CLIENT_SECRET`.
    pub fn verify_secret_from_env(mut self) -> Self {
        self.secret = Some(SecretSource::Env);
        self
    }

    /// Wraps the handler with per-event metrics.
    pub fn metrics(mut self, metrics: Arc<WebhookMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Installs a callback invoked once per rejected request, after the
    /// built-in log line. The callback must not panic.
    pub fn on_error(mut self, on_error: impl Fn(&WebhookError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    /// Builds the dispatcher.
    ///
    /// Fails with [`WebhookError::Config`] when verification was requested
    /// but no usable secret is available; configuration problems never
    /// surface per-request.
    pub fn build(self) -> WebhookResult<WebhookDispatcher> {
        let verifier = match self.secret {
            Some(SecretSource::Bytes(bytes)) => Some(SignatureVerifier::new(bytes)?),
            Some(SecretSource::Env) => Some(SignatureVerifier::from_env()?),
            None => None,
        };

        let handler = match self.metrics {
            Some(metrics) => {
                Arc::new(InstrumentedHandler::new(self.handler, metrics)) as Arc<dyn WebhookHandler>
            }
            None => self.handler,
        };

        Ok(WebhookDispatcher {
            handler,
            verifier,
            on_error: self.on_error,
        })
    }
}

/// Mounts a dispatcher as a single POST route at `/`.
pub fn webhook_router(dispatcher: Arc<WebhookDispatcher>) -> Router {
    Router::new()
        .route("/", post(receive_webhook))
        .with_state(dispatcher)
}

async fn receive_webhook(
    State(dispatcher): State<Arc<WebhookDispatcher>>,
    body: Bytes,
) -> StatusCode {
    dispatcher.dispatch(&body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::body::Body;
    use http::Request;
    use tower::ServiceExt;

    const SECRET: &str = "946b9654dcfc55342c55e533805cdba6";
    const EVENT_ID: &str = "c75570bb-dc1a-4192-946c-ed09a34f7d77";
    const SIGNATURE: &str = "a173b27d031519da1e0cc5468eb7b9f3";

    struct CountingHandler {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl WebhookHandler for CountingHandler {
        async fn handle(&self, _event: &Event) -> Result<(), crate::error::HandlerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err("handler exploded".into())
            } else {
                Ok(())
            }
        }
    }

    fn counting(fail: bool) -> (CountingHandler, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            CountingHandler {
                calls: calls.clone(),
                fail,
            },
            calls,
        )
    }

    fn signed_body(signature: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "data_type": "person",
            "action_type": "update",
            "id": EVENT_ID,
            "hash": signature,
            "personID": "p-1",
            "aliasID": "a-1",
            "personName": "An",
            "personType": "0",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn empty_body_is_accepted_without_processing() {
        let (handler, calls) = counting(false);
        let dispatcher = WebhookDispatcher::builder(handler).build().unwrap();

        assert_eq!(dispatcher.dispatch(b"").await, StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_body_reports_decode_error_once() {
        let (handler, calls) = counting(false);
        let errors = Arc::new(AtomicUsize::new(0));
        let seen = errors.clone();
        let dispatcher = WebhookDispatcher::builder(handler)
            .on_error(move |err| {
                assert!(matches!(err, WebhookError::Decode(_)));
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        assert_eq!(dispatcher.dispatch(b"not json").await, StatusCode::BAD_REQUEST);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn tampered_signature_is_forbidden() {
        let (handler, calls) = counting(false);
        let errors = Arc::new(AtomicUsize::new(0));
        let seen = errors.clone();
        let dispatcher = WebhookDispatcher::builder(handler)
            .verify_secret(SECRET)
            .on_error(move |err| {
                assert!(matches!(err, WebhookError::Verification));
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        let mut tampered = SIGNATURE.to_string();
        tampered.replace_range(SIGNATURE.len() - 1.., "4");

        assert_eq!(
            dispatcher.dispatch(&signed_body(&tampered)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_signature_reaches_handler() {
        let (handler, calls) = counting(false);
        let dispatcher = WebhookDispatcher::builder(handler)
            .verify_secret(SECRET)
            .build()
            .unwrap();

        assert_eq!(
            dispatcher.dispatch(&signed_body(SIGNATURE)).await,
            StatusCode::OK
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn verification_is_opt_in() {
        let (handler, calls) = counting(false);
        let dispatcher = WebhookDispatcher::builder(handler).build().unwrap();

        // No verifier configured: any declared hash passes.
        assert_eq!(
            dispatcher.dispatch(&signed_body("ffff")).await,
            StatusCode::OK
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handler_error_maps_to_internal_server_error() {
        let (handler, calls) = counting(true);
        let errors = Arc::new(AtomicUsize::new(0));
        let seen = errors.clone();
        let dispatcher = WebhookDispatcher::builder(handler)
            .on_error(move |err| {
                assert!(matches!(err, WebhookError::Handler(_)));
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        assert_eq!(
            dispatcher.dispatch(&signed_body(SIGNATURE)).await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_explicit_secret_fails_at_build() {
        let (handler, _calls) = counting(false);
        let result = WebhookDispatcher::builder(handler)
            .verify_secret(Vec::new())
            .build();
        assert!(matches!(result, Err(WebhookError::Config(_))));
    }

    #[tokio::test]
    async fn metrics_wrapping_keeps_status_mapping() {
        let (handler, calls) = counting(false);
        let dispatcher = WebhookDispatcher::builder(handler)
            .metrics(WebhookMetrics::register())
            .build()
            .unwrap();

        assert_eq!(
            dispatcher.dispatch(&signed_body(SIGNATURE)).await,
            StatusCode::OK
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn router_maps_status_codes() {
        let (handler, _calls) = counting(false);
        let app = WebhookDispatcher::builder(handler)
            .verify_secret(SECRET)
            .build()
            .unwrap()
            .into_router();

        let post = |body: Vec<u8>| {
            Request::builder()
                .method("POST")
                .uri("/")
                .body(Body::from(body))
                .unwrap()
        };

        let response = app.clone().oneshot(post(Vec::new())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.clone().oneshot(post(b"not json".to_vec())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(post(signed_body("0000")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.oneshot(post(signed_body(SIGNATURE))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
