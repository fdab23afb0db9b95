use aws_config::{BehaviorVersion, Region};
use aws_sdk_sqs::config::SharedCredentialsProvider;

use crate::errors::PollerError;
use crate::poller::config::{ResolvedConfig, StaticCredentials};

/// Where the SQS session gets its credentials from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Explicit access key id and secret key from the configuration.
    Static(StaticCredentials),
    /// The AWS SDK default chain: environment variables, shared config and
    /// profile files, then container or instance metadata.
    DefaultChain,
}

impl CredentialSource {
    /// Picks static credentials when both the key id and the secret are
    /// non-empty, the default chain otherwise.
    pub fn select(config: &ResolvedConfig) -> Self {
        match &config.credentials {
            Some(credentials) if credentials.is_complete() => {
                CredentialSource::Static(credentials.clone())
            }
            _ => CredentialSource::DefaultChain,
        }
    }
}

/// An SQS client bound to a region and credential source.
///
/// Built once per poller and reused across polls.
#[derive(Debug, Clone)]
pub struct Session {
    client: aws_sdk_sqs::Client,
    source: CredentialSource,
    region: Region,
}

impl Session {
    /// Establishes a session for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::Session`] when static credentials are given
    /// without a region, or when the default chain cannot resolve a region.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use sqs_poller::client::Session;
    /// use sqs_poller::poller::config::PollerConfig;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = PollerConfig::new("https://sqs.us-east-1.amazonaws.com/123/jobs")
    ///         .region("us-east-1")
    ///         .resolve()?;
    ///     let session = Session::establish(&config).await?;
    ///     println!("connected to {}", session.region());
    ///     Ok(())
    /// }
    /// ```
    pub async fn establish(config: &ResolvedConfig) -> Result<Self, PollerError> {
        match CredentialSource::select(config) {
            CredentialSource::Static(credentials) => {
                let region = config.region.as_deref().ok_or_else(|| {
                    PollerError::Session(
                        "a region is required when static credentials are configured".to_string(),
                    )
                })?;
                let client = create_sqs_client_with_credentials(
                    &credentials.access_key_id,
                    &credentials.secret_access_key,
                    region,
                    config.endpoint_url.as_deref(),
                );
                Ok(Session {
                    client,
                    source: CredentialSource::Static(credentials),
                    region: Region::new(region.to_string()),
                })
            }
            CredentialSource::DefaultChain => {
                let sdk_config =
                    load_default_chain(config.region.as_deref(), config.endpoint_url.as_deref())
                        .await;
                let region = sdk_config.region().cloned().ok_or_else(|| {
                    PollerError::Session(
                        "no region configured and none found in the default provider chain"
                            .to_string(),
                    )
                })?;
                Ok(Session {
                    client: aws_sdk_sqs::Client::new(&sdk_config),
                    source: CredentialSource::DefaultChain,
                    region,
                })
            }
        }
    }

    pub fn client(&self) -> &aws_sdk_sqs::Client {
        &self.client
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub fn region(&self) -> &Region {
        &self.region
    }
}

async fn load_default_chain(region: Option<&str>, endpoint_url: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }

    if let Some(endpoint_url) = endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }

    loader.load().await
}

/// Creates an AWS SQS client with explicitly provided credentials and region.
fn create_sqs_client_with_credentials(
    access_key_id: &str,
    secret_access_key: &str,
    region: &str,
    endpoint_url: Option<&str>,
) -> aws_sdk_sqs::Client {
    let credentials = aws_sdk_sqs::config::Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "sqs-poller-static",
    );

    let mut builder = aws_sdk_sqs::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .credentials_provider(SharedCredentialsProvider::new(credentials));

    if let Some(endpoint_url) = endpoint_url {
        builder = builder.endpoint_url(endpoint_url);
    }

    aws_sdk_sqs::Client::from_conf(builder.build())
}
