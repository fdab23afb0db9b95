use async_trait::async_trait;

use crate::client::Session;
use crate::errors::BoxError;

/// A message received from the queue.
///
/// Lives for one dispatch cycle: it is handed to the handler and then
/// acknowledged through its receipt handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub body: String,
    pub receipt_handle: String,
    pub message_id: Option<String>,
}

impl Message {
    pub fn new(body: impl Into<String>, receipt_handle: impl Into<String>) -> Self {
        Message {
            body: body.into(),
            receipt_handle: receipt_handle.into(),
            message_id: None,
        }
    }
}

/// Parameters of a single receive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveRequest {
    pub queue_url: String,
    pub wait_time_seconds: i32,
    pub visibility_timeout: i32,
    pub max_number_of_messages: i32,
}

/// The two queue operations the poller needs.
///
/// [`SqsProvider`] talks to SQS; tests and alternative backends supply their
/// own implementation through
/// [`PollerBuilder::provider`](crate::poller::PollerBuilder::provider).
#[async_trait]
pub trait QueueProvider: Send + Sync {
    /// Issues one receive call and returns the messages in receipt order.
    async fn receive_messages(&self, request: &ReceiveRequest) -> Result<Vec<Message>, BoxError>;

    /// Deletes one message by its receipt handle.
    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> Result<(), BoxError>;
}

#[async_trait]
impl<P> QueueProvider for std::sync::Arc<P>
where
    P: QueueProvider + ?Sized,
{
    async fn receive_messages(&self, request: &ReceiveRequest) -> Result<Vec<Message>, BoxError> {
        (**self).receive_messages(request).await
    }

    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> Result<(), BoxError> {
        (**self).delete_message(queue_url, receipt_handle).await
    }
}

/// [`QueueProvider`] backed by an established SQS [`Session`].
#[derive(Debug, Clone)]
pub struct SqsProvider {
    session: Session,
}

impl SqsProvider {
    pub fn new(session: Session) -> Self {
        SqsProvider { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[async_trait]
impl QueueProvider for SqsProvider {
    async fn receive_messages(&self, request: &ReceiveRequest) -> Result<Vec<Message>, BoxError> {
        let output = self
            .session
            .client()
            .receive_message()
            .queue_url(&request.queue_url)
            .wait_time_seconds(request.wait_time_seconds)
            .visibility_timeout(request.visibility_timeout)
            .max_number_of_messages(request.max_number_of_messages)
            .send()
            .await?;

        let messages = output.messages().iter().filter_map(convert).collect();

        Ok(messages)
    }

    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> Result<(), BoxError> {
        self.session
            .client()
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        Ok(())
    }
}

/// Converts an SQS message, dropping it when it has no receipt handle.
///
/// A missing body is dispatched as an empty string.
fn convert(message: &aws_sdk_sqs::types::Message) -> Option<Message> {
    let Some(receipt_handle) = message.receipt_handle() else {
        tracing::warn!(
            message_id = message.message_id().unwrap_or_default(),
            "Received a message with no receipt handle, skipping"
        );
        return None;
    };
    Some(Message {
        body: message.body().unwrap_or_default().to_string(),
        receipt_handle: receipt_handle.to_string(),
        message_id: message.message_id().map(str::to_string),
    })
}

impl From<Session> for SqsProvider {
    fn from(session: Session) -> Self {
        SqsProvider::new(session)
    }
}
