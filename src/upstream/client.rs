use crate::config::{ClientConfig, ErrorPolicy};
use crate::constants::TOKEN_HEADER;
use crate::errors::{AppError, AppResult};
use chrono::FixedOffset;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

/// Client for the OFD-Ya API.
///
/// Holds the account token and the resolved configuration. It carries no
/// per-call state, so one instance can serve any number of requests.
#[derive(Debug, Clone)]
pub struct OfdClient {
    http: reqwest::Client,
    token: HeaderValue,
    base_url: Url,
    pub(crate) error_policy: ErrorPolicy,
    pub(crate) link_concurrency: usize,
    pub(crate) utc_offset: Option<FixedOffset>,
}

impl OfdClient {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the token is empty or cannot be sent as an
    /// HTTP header value.
    pub fn new(token: impl Into<String>) -> AppResult<Self> {
        Self::with_config(token, &ClientConfig::default())
    }

    /// Creates a client from an explicit configuration.
    ///
    /// # Arguments
    ///
    /// * `token` - Account token sent in the `Ofdapitoken` header
    /// * `config` - Endpoint, timeouts and processing options
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unusable, the configuration does not
    /// pass [`ClientConfig::validate`], or the HTTP client cannot be built.
    pub fn with_config(token: impl Into<String>, config: &ClientConfig) -> AppResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AppError::InvalidInput("API token must not be empty".into()));
        }
        let mut token = HeaderValue::from_str(token.trim()).map_err(|_| {
            AppError::InvalidInput("API token contains characters not allowed in a header".into())
        })?;
        token.set_sensitive(true);

        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            token,
            base_url: config.base_url()?,
            error_policy: config.error_policy,
            link_concurrency: config.link_concurrency,
            utc_offset: config.fixed_offset()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends an authenticated JSON POST and decodes the JSON response.
    ///
    /// Transport failures map to `NetworkError`, non-success statuses to
    /// `UpstreamStatus` and undecodable bodies to `ParseError`.
    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        debug!(url = %url, "Sending upstream request");

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(TOKEN_HEADER, self.token.clone())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| AppError::ParseError(format!("Unexpected response from {path}: {e}")))
    }
}
