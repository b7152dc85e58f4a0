//! Reqwest client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the comment API client.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Base URL of the backend API
    #[cfg_attr(
        feature = "config",
        arg(long = "api-base-url", env = "API_BASE_URL", default_value = DEFAULT_API_BASE_URL)
    )]
    #[serde(default = "default_api_base_url")]
    pub api_base_url: Url,

    /// Base URL for relative photo references (defaults to the API base URL)
    #[cfg_attr(feature = "config", arg(long = "asset-base-url", env = "ASSET_BASE_URL"))]
    #[serde(default)]
    pub asset_base_url: Option<Url>,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Bearer token sent with every request
    #[cfg_attr(
        feature = "config",
        arg(long = "api-token", env = "API_TOKEN", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
}

fn default_api_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid")
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl fmt::Debug for ReqwestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("asset_base_url", &self.asset_base_url.as_ref().map(Url::as_str))
            .field("http_timeout", &self.http_timeout)
            .field("user_agent", &self.user_agent)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            asset_base_url: None,
            http_timeout: default_timeout_secs(),
            user_agent: None,
            api_token: None,
        }
    }
}

impl ReqwestConfig {
    /// Creates a configuration for the API at `api_base_url`.
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            ..Self::default()
        }
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("pantau/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Checks that both base URLs are usable HTTP(S) bases.
    pub fn validate(&self) -> Result<()> {
        check_base("API base URL", &self.api_base_url)?;
        if let Some(asset_base_url) = &self.asset_base_url {
            check_base("Asset base URL", asset_base_url)?;
        }

        if self
            .api_token
            .as_deref()
            .is_some_and(|token| token.trim().is_empty())
        {
            return Err(Error::configuration().with_message("API token is empty"));
        }

        Ok(())
    }

    /// Resolves an API path (with optional query string) against the base URL.
    pub fn endpoint_url(&self, path_and_query: &str) -> Result<Url> {
        Ok(with_trailing_slash(&self.api_base_url).join(path_and_query.trim_start_matches('/'))?)
    }

    /// Resolves a photo reference to an absolute URL.
    ///
    /// Absolute `http(s)` URLs are returned unchanged; anything else is
    /// joined onto the asset base URL. Blank references resolve to `None`.
    pub fn asset_url(&self, reference: &str) -> Option<Url> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        if let Ok(url) = Url::parse(reference)
            && matches!(url.scheme(), "http" | "https")
        {
            return Some(url);
        }

        let base = self.asset_base_url.as_ref().unwrap_or(&self.api_base_url);
        with_trailing_slash(base)
            .join(reference.trim_start_matches('/'))
            .ok()
    }

    /// Set the asset base URL.
    #[must_use]
    pub fn with_asset_base_url(mut self, asset_base_url: Url) -> Self {
        self.asset_base_url = Some(asset_base_url);
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }
}

fn check_base(name: &str, url: &Url) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::configuration().with_message(format!(
            "{name} must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(Error::configuration().with_message(format!("{name} has no host")));
    }

    Ok(())
}

/// Paths are joined below the base path, not beside its last segment.
fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
