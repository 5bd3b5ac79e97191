//! # FaceGate Server
//!
//! Standalone webhook receiver: mounts the dispatcher from
//! `facegate_webhooks` behind a configurable route, installs a Prometheus
//! recorder for the event metrics, and serves both over axum.

mod config;

pub use config::{ConfigError, ServerConfig, WebhookConfig, load_config};

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use facegate_webhooks::{
    Event, FnHandler, HandlerFuture, LATENCY_BUCKETS, LATENCY_HISTOGRAM, SECRET_ENV,
    WebhookDispatcher, WebhookError, WebhookMetrics, WebhookResult, webhook_router,
};

/// The webhook receiver server.
pub struct WebhookServer {
    config: ServerConfig,
    router: Router,
}

impl WebhookServer {
    /// Builds the server from configuration: dispatcher with optional
    /// verification and metrics, plus a `/metrics` route when stats are on.
    pub fn new(server: ServerConfig, webhook: WebhookConfig) -> WebhookResult<Self> {
        let mut builder = WebhookDispatcher::builder(FnHandler::new(log_event));

        builder = match &webhook.secret {
            Some(secret) => builder.verify_secret(secret.as_bytes()),
            None if std::env::var(SECRET_ENV).is_ok() => builder.verify_secret_from_env(),
            None => {
                tracing::warn!("no webhook secret configured, signature verification disabled");
                builder
            }
        };

        let metrics_handle = if webhook.stats {
            let handle = install_recorder()?;
            builder = builder.metrics(WebhookMetrics::register());
            Some(handle)
        } else {
            None
        };

        let dispatcher = Arc::new(builder.build()?);

        let mut router = Router::new().nest(&webhook.path, webhook_router(dispatcher));
        if let Some(handle) = metrics_handle {
            router = router.route(
                "/metrics",
                get(move || {
                    let handle = handle.clone();
                    async move { handle.render() }
                }),
            );
        }

        Ok(Self {
            config: server,
            router,
        })
    }

    /// Serves until the process is stopped.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(%addr, "webhook server listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

/// Default handler: logs the event and accepts it.
fn log_event(event: &Event) -> HandlerFuture {
    let data_type = event.data_type.as_str().to_string();
    let action = event.header.action.as_str().to_string();
    let event_id = event.header.event_id.clone();
    let person = event
        .person
        .as_ref()
        .map(|person| person.person_name.clone());

    Box::pin(async move {
        tracing::info!(
            event_id = %event_id,
            data_type = %data_type,
            action = %action,
            person = person.as_deref().unwrap_or(""),
            "event received"
        );
        Ok(())
    })
}

/// Installs the Prometheus recorder with the webhook latency buckets.
fn install_recorder() -> WebhookResult<PrometheusHandle> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(LATENCY_HISTOGRAM.to_string()), LATENCY_BUCKETS)
        .map_err(|err| WebhookError::Config(err.to_string()))?
        .install_recorder()
        .map_err(|err| WebhookError::Config(err.to_string()))
}
