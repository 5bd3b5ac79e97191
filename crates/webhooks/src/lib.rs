//! # FaceGate Webhooks
//!
//! Receiver for FaceGate event notifications:
//! - Tolerant decoding of the polymorphic event payload
//! - Sender verification with the provider's digest scheme
//! - Optional per-event metrics instrumentation
//! - An axum route implementing the provider's status-code contract
//!
//! ## Example
//!
//! ```rust,ignore
//! use facegate_webhooks::{FnHandler, WebhookDispatcher};
//!
//! let dispatcher = WebhookDispatcher::builder(FnHandler::new(|event| {
//!     let event_id = event.header.event_id.clone();
//!     Box::pin(async move {
//!         println!("event {event_id}");
//!         Ok(())
//!     })
//! }))
//! .verify_secret("client-secret")
//! .build()?;
//!
//! let app = axum::Router::new().nest("/hooks/facegate", dispatcher.into_router());
//! ```

mod dispatcher;
mod error;
mod event;
mod handler;
mod intid;
mod signature;
mod stats;

pub use dispatcher::{WebhookDispatcher, WebhookDispatcherBuilder, webhook_router};
pub use error::{HandlerError, WebhookError, WebhookResult};
pub use event::{
    ActionType, DataType, DeviceInfo, Event, EventHeader, PersonInfo, PersonType, PlaceInfo,
};
pub use handler::{FnHandler, HandlerFuture, WebhookHandler};
pub use intid::IntId;
pub use signature::{SECRET_ENV, SignatureVerifier};
pub use stats::{
    FACES_COUNTER, InstrumentedHandler, LATENCY_BUCKETS, LATENCY_HISTOGRAM, WebhookMetrics,
};
