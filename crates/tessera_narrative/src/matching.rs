//! Theme-to-agent matching.

use tessera_core::Agent;
use tracing::debug;

/// Pick up to `max` agents for a theme, best match first.
///
/// The initiator is never picked. Every candidate starts at 1. Each word of
/// the theme and description (lowercased, two characters or longer) adds 3
/// for every capability tag it overlaps and 1 if it appears in the agent's
/// memory excerpts. Ties keep directory order.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use tessera_core::{Agent, Credentials};
/// use tessera_narrative::match_agents_for_theme;
///
/// let agent = |id: &str, shade: &str| {
///     Agent::builder()
///         .id(id)
///         .name(id)
///         .credentials(Credentials::new("t", "r", Utc::now()))
///         .shades(vec![shade.to_string()])
///         .build()
///         .unwrap()
/// };
/// let pool = vec![agent("a", "painting"), agent("b", "food"), agent("c", "travel")];
/// let picked = match_agents_for_theme(&pool, "street food", "", "a", 1);
/// assert_eq!(picked[0].id(), "b");
/// ```
pub fn match_agents_for_theme(
    agents: &[Agent],
    theme: &str,
    description: &str,
    initiator_id: &str,
    max: usize,
) -> Vec<Agent> {
    let query = format!("{theme} {description}").to_lowercase();
    let words: Vec<&str> = query
        .split_whitespace()
        .filter(|word| word.chars().count() >= 2)
        .collect();

    let mut scored: Vec<(u32, &Agent)> = agents
        .iter()
        .filter(|agent| agent.id() != initiator_id)
        .map(|agent| (score(agent, &words), agent))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    debug!(
        candidates = scored.len(),
        top = ?scored.iter().take(max).map(|(s, a)| (a.id().as_str(), *s)).collect::<Vec<_>>(),
        "Matched agents for theme"
    );
    scored
        .into_iter()
        .take(max)
        .map(|(_, agent)| agent.clone())
        .collect()
}

fn score(agent: &Agent, words: &[&str]) -> u32 {
    let shades: Vec<String> = agent.shades().iter().map(|s| s.to_lowercase()).collect();
    let memories = agent.memory_snippets().join(" ").to_lowercase();

    let mut score = 1;
    for word in words {
        for shade in &shades {
            if shade.contains(word) || word.contains(shade.as_str()) {
                score += 3;
            }
        }
        if memories.contains(word) {
            score += 1;
        }
    }
    score
}
