//! Top-level error wrapper types.

use crate::{
    BuilderError, ClientError, ConfigError, HttpError, JsonError, NarrativeError, StorageError,
};

/// Every error family the workspace can produce.
///
/// # Examples
///
/// ```
/// use tessera_error::{TesseraError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: TesseraError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TesseraErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Repository or directory error
    #[from(StorageError)]
    Storage(StorageError),
    /// Agent-hosting service client error
    #[from(ClientError)]
    Client(ClientError),
    /// Narrative orchestration error
    #[from(NarrativeError)]
    Narrative(NarrativeError),
}

/// Tessera error with kind discrimination.
///
/// # Examples
///
/// ```
/// use tessera_error::{TesseraResult, ConfigError};
///
/// fn might_fail() -> TesseraResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Tessera Error: {}", _0)]
pub struct TesseraError(Box<TesseraErrorKind>);

impl TesseraError {
    /// Create a new error from a kind.
    pub fn new(kind: TesseraErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TesseraErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to TesseraErrorKind
impl<T> From<T> for TesseraError
where
    T: Into<TesseraErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Tessera operations.
pub type TesseraResult<T> = std::result::Result<T, TesseraError>;
