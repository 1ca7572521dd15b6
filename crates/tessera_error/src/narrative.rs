//! Narrative orchestration error types.

/// Specific error conditions for narrative operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum NarrativeErrorKind {
    /// Story id does not resolve to a stored story
    #[display("Story not found: {}", _0)]
    StoryNotFound(String),
    /// Participant list resolved to zero live agents
    #[display("Story '{}' has no live participants", _0)]
    NoParticipants(String),
    /// Structured output could not be parsed into the expected shape
    #[display("Unparsable structured response: {}", _0)]
    ResponseShape(String),
    /// Agent invocation failed
    #[display("Invocation failed for agent '{}': {}", agent, message)]
    Invocation {
        /// Agent identifier
        agent: String,
        /// Failure description
        message: String,
    },
    /// Agent invocation exceeded its time budget
    #[display("Invocation for agent '{}' timed out after {}s", agent, seconds)]
    Timeout {
        /// Agent identifier
        agent: String,
        /// Timeout in seconds
        seconds: u64,
    },
    /// Fragment owner is no longer in the agent directory
    #[display("Agent '{}' is missing from the directory", _0)]
    AgentMissing(String),
    /// Preset table is malformed or incomplete
    #[display("Preset table error: {}", _0)]
    Presets(String),
    /// Caller supplied an invalid story request
    #[display("Invalid story request: {}", _0)]
    InvalidRequest(String),
}

/// Error type for narrative operations.
///
/// # Examples
///
/// ```
/// use tessera_error::{NarrativeError, NarrativeErrorKind};
///
/// let err = NarrativeError::new(NarrativeErrorKind::StoryNotFound("story-9".into()));
/// assert!(format!("{}", err).contains("story-9"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Narrative Error: {} at line {} in {}", kind, line, file)]
pub struct NarrativeError {
    /// The specific error condition
    pub kind: NarrativeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NarrativeError {
    /// Create a new NarrativeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NarrativeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
