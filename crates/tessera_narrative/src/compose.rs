//! Rendering the final narrative.
//!
//! Rendering is a pure function of the theme, the ordered fragment list and
//! the mode, so the same input always yields byte-identical text.

use derive_getters::Getters;
use tessera_core::MemoryFragment;

const DIVIDER: &str = "\n\n---\n\n";

/// How the summary and blocks are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositionMode {
    /// Every fragment comes from a live participant
    #[default]
    Standard,
    /// Real and synthesized fragments are mixed
    Elastic,
}

/// Fragment counts behind a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct CompositionStats {
    /// All fragments
    total: usize,
    /// Fragments from live participants
    real: usize,
    /// Synthesized fill-ins
    synthetic: usize,
    /// round(100 * real / total), 0 for an empty list
    completion_percent: u32,
}

impl CompositionStats {
    /// Count the fragments.
    pub fn of(fragments: &[MemoryFragment]) -> Self {
        let real = fragments.iter().filter(|f| !f.is_ai_generated()).count();
        Self::from_counts(real, fragments.len())
    }

    /// Stats for `real` live fragments out of `total`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_narrative::CompositionStats;
    ///
    /// let stats = CompositionStats::from_counts(2, 5);
    /// assert_eq!(*stats.completion_percent(), 40);
    /// assert_eq!(*CompositionStats::from_counts(0, 0).completion_percent(), 0);
    /// ```
    pub fn from_counts(real: usize, total: usize) -> Self {
        let real = real.min(total);
        let completion_percent = if total == 0 {
            0
        } else {
            ((200 * real + total) / (2 * total)) as u32
        };
        Self {
            total,
            real,
            synthetic: total - real,
            completion_percent,
        }
    }
}

/// Render the final narrative text.
///
/// # Examples
///
/// ```
/// use tessera_core::MemoryFragment;
/// use tessera_narrative::{CompositionMode, compose_narrative};
///
/// let fragment = MemoryFragment::builder()
///     .agent_id("a1")
///     .agent_name("Mei")
///     .time_hint("last spring")
///     .content("I got lost in the tea house.")
///     .build()
///     .unwrap();
/// let text = compose_narrative("Chengdu", &[fragment], CompositionMode::Standard);
/// assert!(text.starts_with("# Chengdu\n"));
/// assert!(text.contains("**Mei** _last spring_\n\nI got lost in the tea house."));
/// ```
pub fn compose_narrative(
    theme: &str,
    fragments: &[MemoryFragment],
    mode: CompositionMode,
) -> String {
    let stats = CompositionStats::of(fragments);
    match mode {
        CompositionMode::Standard => compose_standard(theme, fragments, &stats),
        CompositionMode::Elastic => compose_elastic(theme, fragments, &stats),
    }
}

fn compose_standard(theme: &str, fragments: &[MemoryFragment], stats: &CompositionStats) -> String {
    let blocks = fragments
        .iter()
        .map(|f| {
            format!(
                "**{}** _{}_\n\n{}",
                f.agent_name(),
                f.time_hint(),
                f.display_content()
            )
        })
        .collect::<Vec<_>>()
        .join(DIVIDER);

    let n = stats.total;
    format!(
        "# {theme}\n\n\
         _{n} memories, {n} lives, woven into a story only they could tell_\
         {DIVIDER}{blocks}{DIVIDER}\
         _This narrative was woven by {n} AI twins in a memory puzzle. Every memory comes from a lived experience, \
         arranged into one story by narrative negotiation._"
    )
}

fn compose_elastic(theme: &str, fragments: &[MemoryFragment], stats: &CompositionStats) -> String {
    let blocks = fragments
        .iter()
        .map(|f| {
            let label = if *f.is_ai_generated() { "🔮" } else { "🧩" };
            format!(
                "### {} {}  _{}_\n\n{}",
                label,
                f.agent_name(),
                f.time_hint(),
                f.display_content()
            )
        })
        .collect::<Vec<_>>()
        .join(DIVIDER);

    let CompositionStats {
        total,
        real,
        synthetic,
        completion_percent,
    } = *stats;
    format!(
        "# {theme}\n\n\
         _{total} memories, {real} real pieces + {synthetic} AI-completed · completion {completion_percent}%_\
         {DIVIDER}{blocks}{DIVIDER}\
         > 🧩 {real} of these memories come from real AI twins and {synthetic} were imagined by AI. \
         As more real people replace the 🔮 pieces, the story grows truer and richer."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(name: &str, synthetic: bool) -> MemoryFragment {
        MemoryFragment::builder()
            .agent_id(name.to_lowercase())
            .agent_name(name)
            .time_hint("once")
            .content(format!("{name} raw"))
            .is_ai_generated(synthetic)
            .build()
            .unwrap()
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let fragments = vec![fragment("Mei", false), fragment("Lu", true)];
        for mode in [CompositionMode::Standard, CompositionMode::Elastic] {
            assert_eq!(
                compose_narrative("Rain", &fragments, mode),
                compose_narrative("Rain", &fragments, mode)
            );
        }
    }

    #[test]
    fn test_standard_blocks_are_divided() {
        let fragments = vec![
            fragment("Mei", false).with_refined_content("refined"),
            fragment("Lu", false),
        ];
        let text = compose_narrative("Rain", &fragments, CompositionMode::Standard);
        assert!(text.contains("**Mei** _once_\n\nrefined\n\n---\n\n**Lu** _once_\n\nLu raw"));
        assert!(text.contains("_2 memories, 2 lives"));
    }

    #[test]
    fn test_elastic_summary_counts() {
        let fragments = vec![
            fragment("A", false),
            fragment("B", false),
            fragment("C", true),
            fragment("D", true),
            fragment("E", true),
        ];
        let text = compose_narrative("Rain", &fragments, CompositionMode::Elastic);
        assert!(text.contains("_5 memories, 2 real pieces + 3 AI-completed · completion 40%_"));
        assert!(text.contains("### 🧩 A  _once_"));
        assert!(text.contains("### 🔮 C  _once_"));
    }

    #[test]
    fn test_empty_list_still_renders() {
        let text = compose_narrative("Rain", &[], CompositionMode::Elastic);
        assert!(text.contains("completion 0%"));
        assert!(!text.trim().is_empty());
    }

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(*CompositionStats::from_counts(1, 8).completion_percent(), 13);
        assert_eq!(*CompositionStats::from_counts(1, 3).completion_percent(), 33);
        assert_eq!(*CompositionStats::from_counts(2, 3).completion_percent(), 67);
        assert_eq!(*CompositionStats::from_counts(5, 5).completion_percent(), 100);
    }
}
