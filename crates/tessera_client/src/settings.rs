//! Connection settings and OAuth application credentials.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tessera_error::{ClientError, ClientErrorKind};

/// Default service base URL.
pub const DEFAULT_BASE_URL: &str = "https://app.mindos.com/gate/lab";

/// Default authorization page.
pub const DEFAULT_OAUTH_URL: &str = "https://go.second.me/oauth/";

const OAUTH_SCOPES: &str = "user.info user.info.shades user.info.softmemory chat note.add";

/// Connection settings, read from the `[client]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[serde(default)]
#[builder(setter(into), default)]
pub struct ClientSettings {
    /// Service base URL
    base_url: String,
    /// Timeout for non-streaming requests, in seconds
    request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    /// Creates a new builder.
    pub fn builder() -> ClientSettingsBuilder {
        ClientSettingsBuilder::default()
    }

    /// Apply the `SECONDME_API_BASE` override, if set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base) = std::env::var("SECONDME_API_BASE")
            && !base.trim().is_empty()
        {
            tracing::debug!(base_url = %base, "Using SECONDME_API_BASE override");
            self.base_url = base;
        }
        self
    }
}

/// OAuth application credentials registered with the service.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct OAuthApp {
    /// OAuth client id
    client_id: String,
    /// OAuth client secret
    client_secret: String,
    /// Redirect URI registered for the app
    redirect_uri: String,
    /// Authorization page URL
    authorize_url: String,
}

impl OAuthApp {
    /// Create credentials explicitly.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            authorize_url: DEFAULT_OAUTH_URL.to_string(),
        }
    }

    /// Read credentials from the environment.
    ///
    /// Reads:
    /// - `SECONDME_CLIENT_ID` (required)
    /// - `SECONDME_CLIENT_SECRET` (required)
    /// - `SECONDME_REDIRECT_URI` (required)
    /// - `SECONDME_OAUTH_URL` (default: `https://go.second.me/oauth/`)
    pub fn from_env() -> Result<Self, ClientError> {
        let client_id = required_env("SECONDME_CLIENT_ID")?;
        let client_secret = required_env("SECONDME_CLIENT_SECRET")?;
        let redirect_uri = required_env("SECONDME_REDIRECT_URI")?;
        let authorize_url =
            std::env::var("SECONDME_OAUTH_URL").unwrap_or_else(|_| DEFAULT_OAUTH_URL.to_string());

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            authorize_url,
        })
    }

    /// Set the authorization page URL.
    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }

    /// URL a user visits to grant access; `state` is echoed back on redirect.
    pub fn authorization_url(&self, state: &str) -> Result<String, ClientError> {
        let url = reqwest::Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", OAUTH_SCOPES),
                ("state", state),
            ],
        )
        .map_err(|e| {
            ClientError::new(ClientErrorKind::Configuration(format!(
                "Invalid authorization URL '{}': {}",
                self.authorize_url, e
            )))
        })?;
        Ok(url.into())
    }
}

fn required_env(name: &str) -> Result<String, ClientError> {
    std::env::var(name).map_err(|_| {
        ClientError::new(ClientErrorKind::MissingCredentials(format!("{name} not set")))
    })
}
