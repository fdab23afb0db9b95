use crate::errors::HandlerError;
use async_trait::async_trait;
use std::future::Future;

/// Trait for processing SQS message bodies.
///
/// The poller calls [`MessageHandler::handle`] once per received message, in
/// receipt order, and waits for it before moving on. A returned error is
/// logged; whether the message is still deleted depends on the configured
/// [`crate::poller::config::AckMode`].
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Processes one message body.
    async fn handle(&self, body: String) -> Result<(), HandlerError>;
}

/// Adapter that turns an async closure into a [`MessageHandler`].
///
/// Built with [`handler_fn`].
pub struct FnHandler<F> {
    handle_fn: F,
}

/// Wraps an async closure as a [`MessageHandler`].
///
/// # Example
///
/// ```rust
/// use sqs_poller::poller::handler::handler_fn;
///
/// let handler = handler_fn(|body: String| async move {
///     println!("Processing message: {}", body);
///     Ok(())
/// });
/// ```
pub fn handler_fn<F, Fut>(handle_fn: F) -> FnHandler<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    FnHandler { handle_fn }
}

#[async_trait]
impl<F, Fut> MessageHandler for FnHandler<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, body: String) -> Result<(), HandlerError> {
        (self.handle_fn)(body).await
    }
}

#[async_trait]
impl<H> MessageHandler for std::sync::Arc<H>
where
    H: MessageHandler + ?Sized,
{
    async fn handle(&self, body: String) -> Result<(), HandlerError> {
        (**self).handle(body).await
    }
}
