//! Error types for the agent-hosting service client.

/// Error kinds for client operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum ClientErrorKind {
    /// HTTP request failed before a response arrived
    #[display("HTTP request failed: {}", _0)]
    Http(String),

    /// Service answered with a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Service answered 200 but the envelope carried a failure code
    #[display("Service rejected request (code {}): {}", code, message)]
    Envelope {
        /// Envelope code (non-zero)
        code: i64,
        /// Envelope message
        message: String,
    },

    /// Failed to deserialize response
    #[display("Failed to deserialize response: {}", _0)]
    Deserialization(String),

    /// Token stream broke mid-flight
    #[display("Stream error: {}", _0)]
    Stream(String),

    /// Required OAuth client credentials are missing
    #[display("Missing credentials: {}", _0)]
    MissingCredentials(String),

    /// Configuration error
    #[display("Configuration error: {}", _0)]
    Configuration(String),
}

/// Client error wrapper with location tracking.
///
/// # Examples
///
/// ```
/// use tessera_error::{ClientError, ClientErrorKind};
///
/// let err = ClientError::new(ClientErrorKind::Api { status: 502, message: "bad gateway".into() });
/// assert!(format!("{}", err).contains("502"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Client Error: {} at line {} in {}", kind, line, file)]
pub struct ClientError {
    /// The error kind
    pub kind: ClientErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl ClientError {
    /// Create a new ClientError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ClientErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
