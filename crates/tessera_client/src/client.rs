//! HTTP client for the SecondMe API.

use crate::dto::{
    ActRequest, ChatRequest, Envelope, NoteData, NoteRequest, Shade, ShadesData, SoftMemory,
    SoftMemoryData, TokenGrant, TokenRequest, UserInfo,
};
use crate::{ClientSettings, OAuthApp, decode_sse_stream};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tessera_error::{ClientError, ClientErrorKind, HttpError, TesseraResult};
use tessera_interface::{AgentInvoker, TokenStream};
use tracing::instrument;

const TOKEN_PATH: &str = "/api/secondme/oauth/token";
const USER_INFO_PATH: &str = "/api/secondme/user/info";
const SHADES_PATH: &str = "/api/secondme/user/shades";
const SOFT_MEMORY_PATH: &str = "/api/secondme/user/softmemory";
const ACT_PATH: &str = "/api/secondme/act/stream";
const CHAT_PATH: &str = "/api/secondme/chat/stream";
const NOTE_PATH: &str = "/api/secondme/note/add";

/// Client for the SecondMe agent-hosting service.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct SecondMeClient {
    settings: ClientSettings,
    oauth: Option<OAuthApp>,
    http: reqwest::Client,
}

impl SecondMeClient {
    /// Create a client without OAuth credentials.
    ///
    /// Streaming and profile calls work with any bearer token; code exchange
    /// and refresh additionally need [`with_oauth`](Self::with_oauth).
    #[instrument(skip(settings), fields(base_url = %settings.base_url()))]
    pub fn new(settings: ClientSettings) -> TesseraResult<Self> {
        tracing::debug!("Creating SecondMe client");
        let http = reqwest::Client::builder()
            .user_agent(concat!("tessera/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            settings,
            oauth: None,
            http,
        })
    }

    /// Attach OAuth application credentials.
    pub fn with_oauth(mut self, oauth: OAuthApp) -> Self {
        self.oauth = Some(oauth);
        self
    }

    /// Connection settings in use.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// OAuth credentials, if attached.
    pub fn oauth(&self) -> Option<&OAuthApp> {
        self.oauth.as_ref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url().trim_end_matches('/'), path)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(*self.settings.request_timeout_secs())
    }

    fn require_oauth(&self) -> Result<&OAuthApp, ClientError> {
        self.oauth.as_ref().ok_or_else(|| {
            ClientError::new(ClientErrorKind::MissingCredentials(
                "OAuth client credentials not configured".into(),
            ))
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(path, error = %e, "Request failed");
            ClientError::new(ClientErrorKind::Http(format!("Request to {} failed: {}", path, e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(path, status = %status, "Service returned error");
            return Err(ClientError::new(ClientErrorKind::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            }));
        }
        Ok(response)
    }

    async fn read_envelope<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
        context: &str,
    ) -> TesseraResult<T> {
        let response = self.send(request.timeout(self.request_timeout()), path).await?;
        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            tracing::error!(path, error = %e, "Failed to parse envelope");
            ClientError::new(ClientErrorKind::Deserialization(format!(
                "{}: {}",
                context, e
            )))
        })?;
        Ok(envelope.into_result(context)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
        context: &str,
    ) -> TesseraResult<T> {
        let request = self.http.get(self.url(path)).bearer_auth(access_token);
        self.read_envelope(request, path, context).await
    }

    async fn open_stream<B: Serialize + ?Sized>(
        &self,
        path: &str,
        access_token: &str,
        body: &B,
    ) -> TesseraResult<TokenStream> {
        let request = self
            .http
            .post(self.url(path))
            .bearer_auth(access_token)
            .json(body);
        let response = self.send(request, path).await?;
        tracing::debug!(path, "Stream opened");
        Ok(decode_sse_stream(response.bytes_stream()))
    }

    /// Exchange an authorization code for tokens.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> TesseraResult<TokenGrant> {
        let oauth = self.require_oauth()?;
        let body = TokenRequest {
            grant_type: "authorization_code",
            code: Some(code),
            refresh_token: None,
            client_id: oauth.client_id(),
            client_secret: oauth.client_secret(),
            redirect_uri: Some(oauth.redirect_uri()),
        };
        let request = self.http.post(self.url(TOKEN_PATH)).json(&body);
        let grant: TokenGrant = self
            .read_envelope(request, TOKEN_PATH, "Token exchange")
            .await?;
        tracing::info!(expires_in = ?grant.expires_in(), "Authorization code exchanged");
        Ok(grant)
    }

    /// Obtain a fresh access token from a refresh token.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_access_token(&self, refresh_token: &str) -> TesseraResult<TokenGrant> {
        let oauth = self.require_oauth()?;
        let body = TokenRequest {
            grant_type: "refresh_token",
            code: None,
            refresh_token: Some(refresh_token),
            client_id: oauth.client_id(),
            client_secret: oauth.client_secret(),
            redirect_uri: None,
        };
        let request = self.http.post(self.url(TOKEN_PATH)).json(&body);
        let grant = self
            .read_envelope(request, TOKEN_PATH, "Token refresh")
            .await?;
        tracing::info!("Access token refreshed");
        Ok(grant)
    }

    /// Profile of the token's owner.
    #[instrument(skip_all)]
    pub async fn user_info(&self, access_token: &str) -> TesseraResult<UserInfo> {
        self.get_json(USER_INFO_PATH, access_token, "User info")
            .await
    }

    /// Capability tags of the token's owner.
    #[instrument(skip_all)]
    pub async fn user_shades(&self, access_token: &str) -> TesseraResult<Vec<Shade>> {
        let data: ShadesData = self
            .get_json(SHADES_PATH, access_token, "User shades")
            .await?;
        Ok(data.shades)
    }

    /// Memory excerpts of the token's owner.
    #[instrument(skip_all)]
    pub async fn user_soft_memory(&self, access_token: &str) -> TesseraResult<Vec<SoftMemory>> {
        let data: SoftMemoryData = self
            .get_json(SOFT_MEMORY_PATH, access_token, "User soft memory")
            .await?;
        Ok(data.list)
    }

    /// Write a note into the owner's memory; returns the note id.
    #[instrument(skip_all, fields(content_len = content.len()))]
    pub async fn add_note(&self, access_token: &str, content: &str) -> TesseraResult<i64> {
        let request = self
            .http
            .post(self.url(NOTE_PATH))
            .bearer_auth(access_token)
            .json(&NoteRequest { content });
        let data: NoteData = self.read_envelope(request, NOTE_PATH, "Add note").await?;
        Ok(data.note_id)
    }

    /// Structured streaming call.
    #[instrument(skip_all, fields(message_len = message.len(), session = ?session_id))]
    pub async fn act_stream(
        &self,
        access_token: &str,
        message: &str,
        action_control: &str,
        session_id: Option<&str>,
    ) -> TesseraResult<TokenStream> {
        let body = ActRequest {
            message,
            action_control,
            session_id,
        };
        self.open_stream(ACT_PATH, access_token, &body).await
    }

    /// Free-form streaming call.
    #[instrument(skip_all, fields(message_len = message.len(), session = ?session_id))]
    pub async fn chat_stream(
        &self,
        access_token: &str,
        message: &str,
        session_id: Option<&str>,
    ) -> TesseraResult<TokenStream> {
        let body = ChatRequest {
            message,
            session_id,
        };
        self.open_stream(CHAT_PATH, access_token, &body).await
    }
}

#[async_trait]
impl AgentInvoker for SecondMeClient {
    async fn act(
        &self,
        access_token: &str,
        message: &str,
        action_control: &str,
    ) -> TesseraResult<TokenStream> {
        self.act_stream(access_token, message, action_control, None)
            .await
    }

    async fn chat(&self, access_token: &str, message: &str) -> TesseraResult<TokenStream> {
        self.chat_stream(access_token, message, None).await
    }
}
