//! Agent records held by the agent directory.

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Bearer credentials an agent uses against the hosting service.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use tessera_core::Credentials;
///
/// let now = Utc::now();
/// let creds = Credentials::new("access", "refresh", now + Duration::hours(2));
/// assert!(!creds.is_expired_at(now));
/// assert!(creds.is_expired_at(now + Duration::hours(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Token sent as `Authorization: Bearer`
    access_token: String,
    /// Token used to obtain a fresh access token
    refresh_token: String,
    /// Instant after which the access token is no longer valid
    expires_at: DateTime<Utc>,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    /// Whether the access token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// An autonomous participant with private memories and an invocation endpoint.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    Builder,
)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", into)]
#[builder(setter(into))]
pub struct Agent {
    /// Unique identifier
    id: String,
    /// Display name
    name: String,
    /// Avatar image URL, empty when unknown
    #[serde(default)]
    #[builder(default)]
    avatar_url: String,
    /// Credential pair and expiry
    credentials: Credentials,
    /// Free-text capability tags
    #[serde(default)]
    #[builder(default)]
    shades: Vec<String>,
    /// Short memory excerpts
    #[serde(default)]
    #[builder(default)]
    memory_snippets: Vec<String>,
    /// Credit balance
    #[serde(default)]
    #[builder(default)]
    credits: u32,
    /// When the agent first joined
    #[builder(default = "chrono::Utc::now()")]
    joined_at: DateTime<Utc>,
}

impl Agent {
    /// Creates a new builder.
    pub fn builder() -> AgentBuilder {
        AgentBuilder::default()
    }

    /// Bearer token for invocations.
    pub fn access_token(&self) -> &str {
        self.credentials.access_token()
    }
}
