use std::str::FromStr;

use thiserror::Error;

/// Boxed source error returned by a queue provider.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for SQS poller operations.
///
/// Every failure of construction or of a poll cycle surfaces as one of these
/// variants. Nothing in this crate terminates the process unless the caller
/// opts into it (see [`crate::poller::Poller::poll_or_exit`]).
#[derive(Debug, Error)]
pub enum PollerError {
    /// The poller was built without a message handler.
    #[error("a message handler needs to be registered before polling")]
    MissingHandler,

    #[error("invalid poller configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error that occurs while establishing the SQS session.
    ///
    /// This typically happens when no region can be resolved, or when
    /// static credentials are supplied without a region.
    #[error("failed to establish SQS session: {0}")]
    Session(String),

    #[error("failed to receive messages from {queue_url}")]
    Receive {
        queue_url: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to delete message {receipt_handle} from {queue_url}")]
    Delete {
        queue_url: String,
        receipt_handle: String,
        #[source]
        source: BoxError,
    },
}

/// Configuration problems detected while resolving a [`crate::poller::config::PollerConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("queue URL must not be empty")]
    MissingQueueUrl,

    #[error("invalid region {0:?}")]
    InvalidRegion(String),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("{key} is not a valid number: {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Error returned by a message handler.
///
/// Handler failures never abort a poll cycle. They are logged, and under
/// [`crate::poller::config::AckMode::OnSuccess`] they keep the message on the
/// queue for redelivery.
#[derive(Debug, Error)]
pub struct HandlerError(String);

impl HandlerError {
    /// Creates a new `HandlerError` with the provided message.
    pub fn new(message: impl Into<String>) -> Self {
        HandlerError(message.into())
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HandlerError {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HandlerError::new(s))
    }
}

impl From<String> for HandlerError {
    fn from(s: String) -> Self {
        HandlerError::new(s)
    }
}

impl From<&str> for HandlerError {
    fn from(s: &str) -> Self {
        HandlerError::new(s)
    }
}
