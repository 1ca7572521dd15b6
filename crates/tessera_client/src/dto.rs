//! Wire types for the SecondMe API.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tessera_error::{ClientError, ClientErrorKind};

/// Response envelope wrapping every non-streaming endpoint.
///
/// `code == 0` means success; anything else is a service-level failure even
/// when the HTTP status is 200.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Zero on success
    pub code: i64,
    /// Failure description
    #[serde(default)]
    pub message: Option<String>,
    /// Payload
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload or turn the envelope into a client error.
    ///
    /// `context` names the operation for the error message.
    pub fn into_result(self, context: &str) -> Result<T, ClientError> {
        if self.code != 0 {
            return Err(ClientError::new(ClientErrorKind::Envelope {
                code: self.code,
                message: self
                    .message
                    .unwrap_or_else(|| format!("{context} failed")),
            }));
        }
        self.data.ok_or_else(|| {
            ClientError::new(ClientErrorKind::Deserialization(format!(
                "{context}: envelope carried no data"
            )))
        })
    }
}

/// Tokens returned by the OAuth token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TokenGrant {
    /// Bearer token
    access_token: String,
    /// Refresh token
    #[serde(default)]
    refresh_token: String,
    /// Lifetime of the access token in seconds
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Profile returned by `/user/info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Account email
    #[serde(default)]
    email: Option<String>,
    /// Display name
    #[serde(default)]
    name: Option<String>,
    /// Avatar image URL
    #[serde(default)]
    avatar_url: Option<String>,
    /// Stable public route (handle)
    #[serde(default)]
    route: Option<String>,
}

/// A capability tag ("shade") from `/user/shades`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Shade {
    /// Tag name
    #[serde(default)]
    name: Option<String>,
    /// Longer description
    #[serde(default)]
    description: Option<String>,
}

impl Shade {
    /// Name, or description when the name is blank.
    pub fn label(&self) -> Option<&str> {
        [self.name.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}

/// A memory excerpt from `/user/softmemory`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct SoftMemory {
    /// Memory text
    #[serde(default)]
    content: String,
    /// Creation time as reported by the service
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ShadesData {
    #[serde(default)]
    pub shades: Vec<Shade>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SoftMemoryData {
    #[serde(default)]
    pub list: Vec<SoftMemory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NoteData {
    pub note_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub grant_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<&'a str>,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActRequest<'a> {
    pub message: &'a str,
    pub action_control: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NoteRequest<'a> {
    pub content: &'a str,
}

/// One `data:` payload of the streaming endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeltaEvent {
    #[serde(default)]
    pub choices: Vec<DeltaChoice>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeltaChoice {
    #[serde(default)]
    pub delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Delta {
    #[serde(default)]
    pub content: Option<String>,
}

impl DeltaEvent {
    /// Incremental text of the first choice, if non-empty.
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_nonzero_code_is_error() {
        let env: Envelope<TokenGrant> =
            serde_json::from_str(r#"{"code": 401, "message": "bad code"}"#).unwrap();
        let err = env.into_result("token exchange").unwrap_err();
        assert!(matches!(
            err.kind,
            ClientErrorKind::Envelope { code: 401, ref message } if message == "bad code"
        ));
    }

    #[test]
    fn test_envelope_success_without_data() {
        let env: Envelope<TokenGrant> = serde_json::from_str(r#"{"code": 0}"#).unwrap();
        assert!(env.into_result("token exchange").is_err());
    }

    #[test]
    fn test_token_grant_parses() {
        let env: Envelope<TokenGrant> = serde_json::from_str(
            r#"{"code":0,"data":{"access_token":"a","refresh_token":"r","expires_in":60}}"#,
        )
        .unwrap();
        let grant = env.into_result("token exchange").unwrap();
        assert_eq!(grant.access_token(), "a");
        assert_eq!(*grant.expires_in(), Some(60));
    }

    #[test]
    fn test_shade_label_falls_back_to_description() {
        let shade: Shade = serde_json::from_str(r#"{"name":"","description":"hiker"}"#).unwrap();
        assert_eq!(shade.label(), Some("hiker"));
        assert_eq!(Shade::default().label(), None);
    }

    #[test]
    fn test_delta_text_extraction() {
        let ev: DeltaEvent =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"hi"}}]}"#).unwrap();
        assert_eq!(ev.into_text().as_deref(), Some("hi"));
        let ev: DeltaEvent = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(ev.into_text(), None);
    }

    #[test]
    fn test_act_request_omits_absent_session() {
        let body = serde_json::to_value(ActRequest {
            message: "m",
            action_control: "c",
            session_id: None,
        })
        .unwrap();
        assert_eq!(body["actionControl"], "c");
        assert!(body.get("sessionId").is_none());
    }
}
