use crate::errors::ConfigError;

/// Long-poll duration used when none is configured, in seconds.
pub const DEFAULT_WAIT_TIME_SECONDS: i32 = 20;
/// Visibility timeout used when none is configured, in seconds.
pub const DEFAULT_VISIBILITY_TIMEOUT: i32 = 30;
/// Receive batch size used when none is configured.
pub const DEFAULT_MAX_NUMBER_OF_MESSAGES: i32 = 10;

const MAX_WAIT_TIME_SECONDS: i32 = 20;
const MAX_VISIBILITY_TIMEOUT: i32 = 43_200;
const MAX_NUMBER_OF_MESSAGES: i32 = 10;

/// When a received message is deleted from the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AckMode {
    /// Delete after the handler returns, whatever it returned.
    #[default]
    Always,
    /// Delete only when the handler returned `Ok`. Failed messages become
    /// visible again once their visibility timeout expires.
    OnSuccess,
}

/// Static AWS credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl StaticCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        StaticCredentials {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Both halves are present.
    pub fn is_complete(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// User-supplied configuration for the SQS poller.
///
/// Every numeric field is optional; [`PollerConfig::resolve`] fills unset
/// fields with defaults and validates the result.
///
/// # Example
///
/// ```rust
/// use sqs_poller::poller::config::PollerConfig;
///
/// let resolved = PollerConfig::new("https://sqs.eu-west-1.amazonaws.com/123/jobs")
///     .region("eu-west-1")
///     .wait_time_seconds(10)
///     .resolve()
///     .unwrap();
///
/// assert_eq!(resolved.wait_time_seconds, 10);
/// assert_eq!(resolved.max_number_of_messages, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PollerConfig {
    pub queue_url: String,
    pub region: Option<String>,
    /// Long-poll duration. `Some(0)` requests a short poll.
    pub wait_time_seconds: Option<i32>,
    /// Zero is treated as unset.
    pub visibility_timeout: Option<i32>,
    /// Zero is treated as unset.
    pub max_number_of_messages: Option<i32>,
    pub credentials: Option<StaticCredentials>,
    /// Overrides the SQS endpoint, e.g. for LocalStack.
    pub endpoint_url: Option<String>,
    pub ack_mode: AckMode,
}

impl PollerConfig {
    pub fn new(queue_url: impl Into<String>) -> Self {
        PollerConfig {
            queue_url: queue_url.into(),
            ..Default::default()
        }
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn wait_time_seconds(mut self, seconds: i32) -> Self {
        self.wait_time_seconds = Some(seconds);
        self
    }

    pub fn visibility_timeout(mut self, seconds: i32) -> Self {
        self.visibility_timeout = Some(seconds);
        self
    }

    pub fn max_number_of_messages(mut self, count: i32) -> Self {
        self.max_number_of_messages = Some(count);
        self
    }

    pub fn credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(StaticCredentials::new(access_key_id, secret_access_key));
        self
    }

    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    pub fn ack_mode(mut self, mode: AckMode) -> Self {
        self.ack_mode = mode;
        self
    }

    /// Loads the configuration from process environment variables.
    ///
    /// Reads `SQS_QUEUE_URL`, `AWS_REGION`, `SQS_WAIT_TIME_SECONDS`,
    /// `SQS_VISIBILITY_TIMEOUT`, `SQS_MAX_NUMBER_OF_MESSAGES`,
    /// `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `SQS_ENDPOINT_URL`.
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PollerConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let number = |key: &'static str| -> Result<Option<i32>, ConfigError> {
            non_empty(key)
                .map(|value| {
                    value
                        .trim()
                        .parse::<i32>()
                        .map_err(|_| ConfigError::InvalidNumber { key, value })
                })
                .transpose()
        };

        let credentials = match (non_empty("AWS_ACCESS_KEY_ID"), non_empty("AWS_SECRET_ACCESS_KEY")) {
            (Some(id), Some(secret)) => Some(StaticCredentials::new(id, secret)),
            _ => None,
        };

        Ok(PollerConfig {
            queue_url: lookup("SQS_QUEUE_URL").unwrap_or_default(),
            region: non_empty("AWS_REGION"),
            wait_time_seconds: number("SQS_WAIT_TIME_SECONDS")?,
            visibility_timeout: number("SQS_VISIBILITY_TIMEOUT")?,
            max_number_of_messages: number("SQS_MAX_NUMBER_OF_MESSAGES")?,
            credentials,
            endpoint_url: non_empty("SQS_ENDPOINT_URL"),
            ack_mode: AckMode::default(),
        })
    }

    /// Merges the configuration with the defaults and validates it.
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        let queue_url = self.queue_url.trim().to_string();
        if queue_url.is_empty() {
            return Err(ConfigError::MissingQueueUrl);
        }

        if let Some(region) = &self.region {
            let valid = !region.is_empty()
                && region
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            if !valid {
                return Err(ConfigError::InvalidRegion(region.clone()));
            }
        }

        let wait_time_seconds = self.wait_time_seconds.unwrap_or(DEFAULT_WAIT_TIME_SECONDS);
        let visibility_timeout = self
            .visibility_timeout
            .filter(|v| *v != 0)
            .unwrap_or(DEFAULT_VISIBILITY_TIMEOUT);
        let max_number_of_messages = self
            .max_number_of_messages
            .filter(|v| *v != 0)
            .unwrap_or(DEFAULT_MAX_NUMBER_OF_MESSAGES);

        check_range("wait_time_seconds", wait_time_seconds, 0, MAX_WAIT_TIME_SECONDS)?;
        check_range("visibility_timeout", visibility_timeout, 0, MAX_VISIBILITY_TIMEOUT)?;
        check_range(
            "max_number_of_messages",
            max_number_of_messages,
            1,
            MAX_NUMBER_OF_MESSAGES,
        )?;

        Ok(ResolvedConfig {
            queue_url,
            region: self.region,
            wait_time_seconds,
            visibility_timeout,
            max_number_of_messages,
            credentials: self.credentials,
            endpoint_url: self.endpoint_url,
            ack_mode: self.ack_mode,
        })
    }
}

fn check_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// A fully populated, validated poller configuration.
///
/// Only [`PollerConfig::resolve`] builds one, so every value has passed
/// validation.
///
/// ```compile_fail
/// use sqs_poller::poller::config::{AckMode, ResolvedConfig};
///
/// let unchecked = ResolvedConfig {
///     queue_url: String::new(),
///     region: None,
///     wait_time_seconds: 99,
///     visibility_timeout: -1,
///     max_number_of_messages: 0,
///     credentials: None,
///     endpoint_url: None,
///     ack_mode: AckMode::Always,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ResolvedConfig {
    pub queue_url: String,
    pub region: Option<String>,
    pub wait_time_seconds: i32,
    pub visibility_timeout: i32,
    pub max_number_of_messages: i32,
    pub credentials: Option<StaticCredentials>,
    pub endpoint_url: Option<String>,
    pub ack_mode: AckMode,
}
