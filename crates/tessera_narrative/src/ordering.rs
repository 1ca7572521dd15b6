//! Negotiated ordering.

use tessera_core::MemoryFragment;

/// Sort fragments by proposed position: opening, middle, climax, closing.
///
/// Missing positions rank as middle. The sort is stable, so fragments with
/// the same position keep their relative order.
///
/// # Examples
///
/// ```
/// use tessera_core::{MemoryFragment, NarrativePosition};
/// use tessera_narrative::sort_by_position;
///
/// let mut fragments = vec![
///     MemoryFragment::new("a", "A").with_proposed_position(NarrativePosition::Climax),
///     MemoryFragment::new("b", "B").with_proposed_position(NarrativePosition::Opening),
///     MemoryFragment::new("c", "C").with_proposed_position(NarrativePosition::Middle),
/// ];
/// sort_by_position(&mut fragments);
/// let order: Vec<&str> = fragments.iter().map(|f| f.agent_id().as_str()).collect();
/// assert_eq!(order, ["b", "c", "a"]);
/// ```
pub fn sort_by_position(fragments: &mut [MemoryFragment]) {
    fragments.sort_by_key(MemoryFragment::position_rank);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::NarrativePosition;

    #[test]
    fn test_ties_keep_relative_order() {
        let mut fragments = vec![
            MemoryFragment::new("m1", "M1").with_proposed_position(NarrativePosition::Middle),
            MemoryFragment::new("c", "C").with_proposed_position(NarrativePosition::Closing),
            MemoryFragment::new("none", "None"),
            MemoryFragment::new("o", "O").with_proposed_position(NarrativePosition::Opening),
            MemoryFragment::new("m2", "M2").with_proposed_position(NarrativePosition::Middle),
        ];
        sort_by_position(&mut fragments);
        let order: Vec<&str> = fragments.iter().map(|f| f.agent_id().as_str()).collect();
        assert_eq!(order, ["o", "m1", "none", "m2", "c"]);
    }
}
