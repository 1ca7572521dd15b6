//! Tunables for the narrative pipeline, read from `[narrative]`.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Narrative pipeline settings.
///
/// # Examples
///
/// ```
/// use tessera_narrative::NarrativeConfig;
///
/// let config = NarrativeConfig::builder().max_refined_chars(120usize).build().unwrap();
/// assert_eq!(*config.max_refined_chars(), 120);
/// assert_eq!(*config.invocation_timeout_secs(), 90);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[serde(default)]
#[builder(setter(into), default)]
pub struct NarrativeConfig {
    /// Upper bound on a single agent invocation, stream drain included
    invocation_timeout_secs: u64,
    /// Refined content is cut to this many characters
    max_refined_chars: usize,
    /// Content excerpt length in the negotiation digest
    digest_excerpt_chars: usize,
    /// Previous-fragment excerpt length in weaving prompts
    neighbor_excerpt_chars: usize,
    /// Largest roster a story may invite
    max_participants: usize,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            invocation_timeout_secs: 90,
            max_refined_chars: 300,
            digest_excerpt_chars: 60,
            neighbor_excerpt_chars: 80,
            max_participants: 6,
        }
    }
}

impl NarrativeConfig {
    /// Creates a new builder.
    pub fn builder() -> NarrativeConfigBuilder {
        NarrativeConfigBuilder::default()
    }

    /// Invocation timeout as a `Duration`.
    pub fn invocation_timeout(&self) -> Duration {
        Duration::from_secs(self.invocation_timeout_secs)
    }
}
