//! # SQS Poller
//!
//! A small asynchronous helper that long-polls an AWS SQS queue, hands each
//! received message to a user-supplied handler and deletes it once handled.
//!
//! ## Features
//!
//! - One receive/dispatch/delete cycle per [`Poller::poll_once`] call, no hidden loop
//! - Defaults for wait time, visibility timeout and batch size
//! - Static credentials or the AWS default provider chain
//! - Errors returned as [`PollerError`], with an opt-in terminate-on-error mode
//! - Logger adapter that hides per-poll "Long polling" notices
//! - Pluggable [`QueueProvider`] for tests and alternative backends
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqs_poller::{handler_fn, Poller, PollerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PollerConfig::new("https://sqs.us-east-1.amazonaws.com/123456789012/jobs")
//!         .region("us-east-1")
//!         .wait_time_seconds(20);
//!
//!     let poller = Poller::new(
//!         config,
//!         handler_fn(|body: String| async move {
//!             println!("Processing message: {}", body);
//!             Ok(())
//!         }),
//!     )
//!     .await?;
//!
//!     loop {
//!         let summary = poller.poll_once().await?;
//!         println!("handled {} messages", summary.received);
//!     }
//! }
//! ```

pub mod client;
pub mod errors;
pub mod logger;
pub mod poller;
pub mod queue;

pub use errors::{HandlerError, PollerError};
pub use poller::config::{AckMode, PollerConfig};
pub use poller::handler::{MessageHandler, handler_fn};
pub use poller::{PollSummary, Poller};
pub use queue::{Message, QueueProvider};
