//! Webhook handler trait and adapters.

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::event::Event;

/// Trait for application webhook handlers.
#[async_trait]
pub trait WebhookHandler: Send + Sync {
    /// Handles one decoded event notification.
    async fn handle(&self, event: &Event) -> Result<(), HandlerError>;
}

/// Future returned by [`FnHandler`] closures.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>>;

/// Wrapper for function-based handlers.
pub struct FnHandler<F>
where
    F: Fn(&Event) -> HandlerFuture + Send + Sync,
{
    handler: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&Event) -> HandlerFuture + Send + Sync,
{
    /// Creates a new function handler.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> WebhookHandler for FnHandler<F>
where
    F: Fn(&Event) -> HandlerFuture + Send + Sync,
{
    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        (self.handler)(event).await
    }
}

#[async_trait]
impl WebhookHandler for Arc<dyn WebhookHandler> {
    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        self.as_ref().handle(event).await
    }
}
