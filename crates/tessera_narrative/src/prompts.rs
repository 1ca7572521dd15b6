//! Prompt and response-shape text sent to agents.

use crate::text::truncate_chars;
use tessera_core::{MemoryFragment, Story};

/// Response-shape instructions for memory extraction.
pub const EXTRACTION_CONTROL: &str = r#"Output only a valid JSON object. No explanation, no markdown code fences.
Your owner has lived through many experiences. Search your memory for the one real experience most relevant to the theme below.

Output shape:
{
  "has_memory": true or false,
  "memory_title": "one-line title (under 10 words)",
  "memory_content": "the experience told in the first person (80-150 words)",
  "emotion": "happy" or "nostalgic" or "excited" or "reflective" or "surprising",
  "time_hint": "roughly when it happened (e.g. last summer, college years)",
  "unique_detail": "the single most distinctive detail (under 20 words)"
}

Important: answer from your owner's real memories. If there is no relevant memory, set has_memory to false."#;

/// Response-shape instructions for position negotiation.
pub const PROPOSAL_CONTROL: &str = r#"Output only a valid JSON object. No explanation, no markdown code fences.
Below are the memory fragments contributed by everyone, followed by your own.

Propose, from a storytelling point of view, where your memory belongs in the whole story, and why.

Output shape:
{
  "proposed_position": "opening" or "middle" or "climax" or "closing",
  "reason": "why your memory fits that position (under 30 words)",
  "connection_to_others": "which other memory yours relates to, and how they connect (under 50 words)",
  "transition_suggestion": "how the story should lead into your part (under 20 words)"
}"#;

/// Message for the extraction call.
pub fn extraction_message(story: &Story) -> String {
    format!(
        "Theme: {}\nDescription: {}",
        story.theme(),
        story.description()
    )
}

/// One-line-per-fragment digest shared with every negotiator.
pub fn fragment_digest(fragments: &[MemoryFragment], excerpt_chars: usize) -> String {
    fragments
        .iter()
        .map(|f| {
            format!(
                "{}'s memory: {} - {}...",
                f.agent_name(),
                f.title(),
                truncate_chars(f.content(), excerpt_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Message for one fragment's negotiation call.
pub fn proposal_message(theme: &str, digest: &str, own: &MemoryFragment) -> String {
    format!(
        "Theme: {}\n\nAll memory fragments:\n{}\n\nYour memory: {} - {}",
        theme,
        digest,
        own.title(),
        own.content()
    )
}

/// Free-form weaving prompt for the fragment at `index` of `snapshot`.
///
/// Neighbor text always comes from `snapshot`, the negotiated order before
/// any rewriting.
pub fn weaving_prompt(
    theme: &str,
    snapshot: &[MemoryFragment],
    index: usize,
    neighbor_excerpt_chars: usize,
) -> String {
    let own = &snapshot[index];
    let previous = match index.checked_sub(1).and_then(|i| snapshot.get(i)) {
        Some(prev) => format!(
            "The part before yours is told by {}: {}...",
            prev.agent_name(),
            truncate_chars(prev.content(), neighbor_excerpt_chars)
        ),
        None => "You open the story.".to_string(),
    };
    let next = match snapshot.get(index + 1) {
        Some(next) => format!(
            "The part after yours, by {}, will tell: {}",
            next.agent_name(),
            next.title()
        ),
        None => "You close the story.".to_string(),
    };

    format!(
        "You are taking part in a group storytelling project on the theme \"{theme}\".\n\n\
         Your memory sits at position {position}/{total} of the story.\n\
         {previous}\n\
         {next}\n\n\
         Retell your original memory so it flows naturally out of the part before and into the part after.\n\
         Stay in the first person, keep it to 80-150 words, and keep your real feelings and unique details.\n\n\
         Your original memory: {title} - {content}",
        position = index + 1,
        total = snapshot.len(),
        title = own.title(),
        content = own.content(),
    )
}
