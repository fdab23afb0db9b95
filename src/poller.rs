use std::sync::Arc;

use crate::client::Session;
use crate::errors::PollerError;
use crate::log_record;
use crate::logger::{LogCategory, LogLevel, Logger, QuietLogger, TracingLogger};
use crate::queue::{QueueProvider, ReceiveRequest, SqsProvider};

pub mod config;
pub mod handler;

use config::{AckMode, PollerConfig, ResolvedConfig};
use handler::MessageHandler;

/// What one poll cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Messages returned by the provider. The SQS provider drops messages
    /// that carry no receipt handle before they get here, so those are not
    /// counted.
    pub received: usize,
    /// Messages deleted after handling.
    pub deleted: usize,
    /// Messages left on the queue because their handler failed under
    /// [`AckMode::OnSuccess`].
    pub retained: usize,
}

/// Single-shot SQS poller.
///
/// Each [`Poller::poll_once`] call performs one receive, hands every message
/// to the handler in receipt order and deletes it by its receipt handle.
/// There is no internal loop; call `poll_once` as often as needed.
pub struct Poller {
    config: ResolvedConfig,
    provider: Arc<dyn QueueProvider>,
    handler: Arc<dyn MessageHandler>,
    logger: Arc<dyn Logger>,
}

impl Poller {
    pub fn builder(config: PollerConfig) -> PollerBuilder {
        PollerBuilder {
            config,
            handler: None,
            logger: None,
            provider: None,
        }
    }

    /// Builds a poller with the default logger and an SQS session.
    pub async fn new<H>(config: PollerConfig, handler: H) -> Result<Self, PollerError>
    where
        H: MessageHandler + 'static,
    {
        Self::builder(config).handler(handler).build().await
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Runs one receive, dispatch and delete cycle.
    ///
    /// Handler errors are logged and never abort the cycle. A failed receive
    /// or delete stops the cycle at once; messages after a failed delete are
    /// neither handled nor deleted and will be redelivered by SQS.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::Receive`] or [`PollerError::Delete`] when the
    /// queue provider fails.
    pub async fn poll_once(&self) -> Result<PollSummary, PollerError> {
        let config = &self.config;

        log_record!(
            self.logger.log,
            LogLevel::Info,
            LogCategory::PollLifecycle,
            "Long polling on {}",
            config.queue_url
        );

        let request = ReceiveRequest {
            queue_url: config.queue_url.clone(),
            wait_time_seconds: config.wait_time_seconds,
            visibility_timeout: config.visibility_timeout,
            max_number_of_messages: config.max_number_of_messages,
        };

        let messages = self
            .provider
            .receive_messages(&request)
            .await
            .map_err(|source| PollerError::Receive {
                queue_url: config.queue_url.clone(),
                source,
            })?;

        let mut summary = PollSummary {
            received: messages.len(),
            ..Default::default()
        };

        for message in messages {
            if let Err(err) = self.handler.handle(message.body).await {
                log_record!(
                    self.logger.log,
                    LogLevel::Warn,
                    LogCategory::General,
                    "Error handling message {}: {}",
                    message.message_id.as_deref().unwrap_or(&message.receipt_handle),
                    err
                );
                if config.ack_mode == AckMode::OnSuccess {
                    summary.retained += 1;
                    continue;
                }
            }

            self.provider
                .delete_message(&config.queue_url, &message.receipt_handle)
                .await
                .map_err(|source| PollerError::Delete {
                    queue_url: config.queue_url.clone(),
                    receipt_handle: message.receipt_handle.clone(),
                    source,
                })?;
            summary.deleted += 1;
        }

        log_record!(
            self.logger.log,
            LogLevel::Info,
            LogCategory::PollLifecycle,
            "Finished long polling after {} seconds",
            config.wait_time_seconds
        );

        Ok(summary)
    }

    /// Like [`Poller::poll_once`], but any error goes to [`Logger::fatal`],
    /// which terminates the process.
    pub async fn poll_or_exit(&self) -> PollSummary {
        match self.poll_once().await {
            Ok(summary) => summary,
            Err(err) => log_record!(
                self.logger.fatal,
                LogLevel::Error,
                LogCategory::General,
                "{}",
                error_chain(&err)
            ),
        }
    }
}

/// Builder for [`Poller`].
pub struct PollerBuilder {
    config: PollerConfig,
    handler: Option<Arc<dyn MessageHandler>>,
    logger: Option<Arc<dyn Logger>>,
    provider: Option<Arc<dyn QueueProvider>>,
}

impl PollerBuilder {
    /// Registers the message handler. Required.
    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: MessageHandler + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Replaces the default `QuietLogger<TracingLogger>`.
    pub fn logger<L>(mut self, logger: L) -> Self
    where
        L: Logger + 'static,
    {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Uses `provider` instead of establishing an SQS session.
    pub fn provider<P>(mut self, provider: P) -> Self
    where
        P: QueueProvider + 'static,
    {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Resolves the configuration and establishes the session.
    ///
    /// The handler is checked first, so a missing handler fails before any
    /// network call.
    pub async fn build(self) -> Result<Poller, PollerError> {
        let handler = self.handler.ok_or(PollerError::MissingHandler)?;
        let config = self.config.resolve()?;

        let provider = match self.provider {
            Some(provider) => provider,
            None => Arc::new(SqsProvider::new(Session::establish(&config).await?)),
        };
        let logger = self.logger.unwrap_or_else(default_logger);

        log_record!(
            logger.log,
            LogLevel::Debug,
            LogCategory::General,
            "SQS poller ready for {} (wait {}s, visibility {}s, batch {})",
            config.queue_url,
            config.wait_time_seconds,
            config.visibility_timeout,
            config.max_number_of_messages
        );

        Ok(Poller {
            config,
            provider,
            handler,
            logger,
        })
    }

    /// Like [`PollerBuilder::build`], but any error goes to [`Logger::fatal`].
    pub async fn build_or_exit(self) -> Poller {
        let logger = self.logger.clone().unwrap_or_else(default_logger);
        match self.build().await {
            Ok(poller) => poller,
            Err(err) => log_record!(
                logger.fatal,
                LogLevel::Error,
                LogCategory::General,
                "{}",
                error_chain(&err)
            ),
        }
    }
}

fn default_logger() -> Arc<dyn Logger> {
    Arc::new(QuietLogger::new(TracingLogger))
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
