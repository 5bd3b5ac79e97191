//! Per-event instrumentation.
//!
//! [`InstrumentedHandler`] decorates a handler with measurements derived from
//! the decoded event: device/place/person-type tags, capture-to-receipt
//! latency, and a faces-detected counter. Measurements are recorded after the
//! wrapped handler returns, whether it succeeded or not, and never change the
//! handler's result.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use metrics::Label;

use crate::error::HandlerError;
use crate::event::Event;
use crate::handler::WebhookHandler;

/// Histogram of capture-to-receipt delay in milliseconds.
pub const LATENCY_HISTOGRAM: &str = "facegate_webhook_latency_ms";

/// Counter of events carrying person data (faces detected).
pub const FACES_COUNTER: &str = "facegate_faces_detected_total";

/// Latency bucket boundaries matching the provider's expected delay range.
pub const LATENCY_BUCKETS: &[f64] = &[0.0, 25.0, 100.0, 200.0, 400.0, 800.0, 10_000.0];

/// Handle proving the webhook instruments have been described.
///
/// Created once by the composition root and passed into
/// [`InstrumentedHandler`]; there is no registration side effect beyond the
/// process-wide `metrics` recorder.
pub struct WebhookMetrics {
    _private: (),
}

impl WebhookMetrics {
    /// Describes the webhook instruments and returns the handle.
    pub fn register() -> Arc<Self> {
        metrics::describe_histogram!(
            LATENCY_HISTOGRAM,
            metrics::Unit::Milliseconds,
            "Delay between device capture and webhook receipt"
        );
        metrics::describe_counter!(FACES_COUNTER, "Events carrying person data");
        Arc::new(Self { _private: () })
    }

    fn record(&self, event: &Event, received_at_ms: i64) {
        let labels = event_labels(event);

        if event.header.client_time_ms > 0 {
            // Clock skew can make this negative; recorded as-is.
            let latency_ms = received_at_ms - event.header.client_time_ms as i64;
            metrics::histogram!(LATENCY_HISTOGRAM, labels.clone()).record(latency_ms as f64);
        }
        if event.person.is_some() {
            metrics::counter!(FACES_COUNTER, labels).increment(1);
        }
    }
}

/// Derives the metric labels for one event.
fn event_labels(event: &Event) -> Vec<Label> {
    let mut labels = Vec::with_capacity(3);
    if let Some(device) = &event.device {
        labels.push(Label::new("device_id", device.device_id.clone()));
    }
    if let Some(place) = &event.place {
        labels.push(Label::new("place_id", place.place_id.to_string()));
    }
    if let Some(person) = &event.person {
        labels.push(Label::new("person_type", person.person_type.label()));
    }
    labels
}

/// Decorator recording metrics around an inner handler.
pub struct InstrumentedHandler<H> {
    inner: H,
    metrics: Arc<WebhookMetrics>,
}

impl<H: WebhookHandler> InstrumentedHandler<H> {
    /// Wraps a handler with the given instruments.
    pub fn new(inner: H, metrics: Arc<WebhookMetrics>) -> Self {
        Self { inner, metrics }
    }
}

#[async_trait]
impl<H: WebhookHandler> WebhookHandler for InstrumentedHandler<H> {
    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        let received_at_ms = Utc::now().timestamp_millis();
        let result = self.inner.handle(event).await;
        self.metrics.record(event, received_at_ms);
        result
    }
}
