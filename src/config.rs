use crate::constants::{DEFAULT_BASE_URL, USER_AGENT};
use crate::errors::{AppError, AppResult};
use chrono::FixedOffset;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// What the top-level receipt collection does when the documents of a
/// register cannot be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Stop at the first failing register and return what was collected so far.
    /// Any non-success HTTP status from the documents endpoint counts as a
    /// failure, so a single 404 for one register ends the run.
    #[default]
    FailFast,
    /// Skip failing registers and report every failure together at the end.
    Continue,
}

/// Resolved client configuration with all values filled in.
///
/// Deserialized from the `[client]` table of a TOML config file; every field
/// falls back to its default when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Root of the upstream API; may include a gateway path prefix
    pub base_url: String,
    /// Total request timeout in seconds
    pub timeout_secs: u64,
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
    /// Number of cheque links resolved at once within one register.
    /// Document order is preserved regardless of this value.
    pub link_concurrency: usize,
    /// Behaviour when a register's documents cannot be fetched
    pub error_policy: ErrorPolicy,
    /// Fixed offset such as `+03:00` used to render receipt timestamps.
    /// When unset, the local time zone of the process is used.
    pub utc_offset: Option<String>,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            link_concurrency: 1,
            error_policy: ErrorPolicy::FailFast,
            utc_offset: None,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Checks that every value is usable before a client is built from it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a timeout or the link concurrency is zero or the
    /// UTC offset cannot be parsed, and `UrlError` if the base URL is malformed.
    pub fn validate(&self) -> AppResult<()> {
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "Timeout must be greater than 0".into(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "Connect timeout must be greater than 0".into(),
            ));
        }
        if self.link_concurrency == 0 {
            return Err(AppError::InvalidInput(
                "Link concurrency must be greater than 0".into(),
            ));
        }
        self.base_url()?;
        self.fixed_offset()?;
        Ok(())
    }

    /// Parses [`ClientConfig::base_url`] as a directory URL.
    ///
    /// A missing trailing `/` is added so endpoint paths are resolved below
    /// any path prefix instead of replacing its last segment.
    pub fn base_url(&self) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Parses [`ClientConfig::utc_offset`], returning `None` when it is unset.
    pub fn fixed_offset(&self) -> AppResult<Option<FixedOffset>> {
        self.utc_offset
            .as_deref()
            .map(|raw| {
                raw.trim().parse::<FixedOffset>().map_err(|e| {
                    AppError::InvalidInput(format!("Invalid UTC offset '{raw}': {e}"))
                })
            })
            .transpose()
    }
}

/// Configuration that can be loaded from a TOML file.
///
/// ```toml
/// token = "secret"
///
/// [client]
/// timeout_secs = 15
/// error_policy = "continue"
/// ```
///
/// Unknown keys are rejected at both levels to catch typos.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// API token; the command line and the environment take precedence
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub client: ClientConfig,
}

impl ConfigFile {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read, `ParseError` if the TOML is
    /// malformed or contains unknown keys, and the errors of
    /// [`ClientConfig::validate`] for out-of-range values.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config: ConfigFile = toml::from_str(contents)?;
        config.client.validate()?;
        Ok(config)
    }
}
