//! Architecture descriptor matching
//!
//! An architecture descriptor names a target platform/runtime as a
//! dot-separated refinement chain: `os` covers every server platform,
//! `os.linux` narrows it, `os.linux.x86_64` narrows it further. A build
//! declaring `os` can run anywhere a build declaring `os.linux.x86_64`
//! can, but not vice versa.
//!
//! The catalog treats specificity as opaque and delegates it to an
//! [`ArchMatcher`]; [`HierarchyMatcher`] is the stock implementation.

/// Decides whether an available architecture satisfies a required one,
/// and which available descriptor is the most specific satisfier.
pub trait ArchMatcher {
    /// The most specific descriptor in `available` that satisfies
    /// `required`, or `None` if nothing in `available` does.
    fn most_specific_match(&self, required: &str, available: &[&str]) -> Option<String>;
}

/// Stock matcher over dot-separated refinement chains. A candidate
/// satisfies a requirement when it equals the requirement or is a
/// dot-prefix of it; the most specific match is the longest satisfier.
#[derive(Debug, Default, Clone, Copy)]
pub struct HierarchyMatcher;

impl HierarchyMatcher {
    /// Whether a build declaring `candidate` can serve a host requiring
    /// `required`.
    pub fn satisfies(required: &str, candidate: &str) -> bool {
        required == candidate
            || (required.starts_with(candidate)
                && required.as_bytes().get(candidate.len()) == Some(&b'.'))
    }
}

impl ArchMatcher for HierarchyMatcher {
    fn most_specific_match(&self, required: &str, available: &[&str]) -> Option<String> {
        available
            .iter()
            .filter(|candidate| Self::satisfies(required, candidate))
            .max_by_key(|candidate| candidate.len())
            .map(|candidate| (*candidate).to_string())
    }
}

#[cfg(test)]
mod arch_tests {
    use super::*;

    #[test]
    fn test_exact_match_satisfies() {
        assert!(HierarchyMatcher::satisfies("os.linux.x86_64", "os.linux.x86_64"));
    }

    #[test]
    fn test_prefix_chain_satisfies() {
        assert!(HierarchyMatcher::satisfies("os.linux.x86_64", "os"));
        assert!(HierarchyMatcher::satisfies("os.linux.x86_64", "os.linux"));
    }

    #[test]
    fn test_more_specific_candidate_does_not_satisfy() {
        assert!(!HierarchyMatcher::satisfies("os", "os.linux"));
    }

    #[test]
    fn test_partial_segment_is_not_a_prefix() {
        // "os.lin" is not a refinement-chain prefix of "os.linux".
        assert!(!HierarchyMatcher::satisfies("os.linux", "os.lin"));
        assert!(!HierarchyMatcher::satisfies("web.browser", "web.br"));
    }

    #[test]
    fn test_unrelated_families_do_not_match() {
        assert!(!HierarchyMatcher::satisfies("web.browser", "os"));
    }

    #[test]
    fn test_most_specific_wins() {
        let matcher = HierarchyMatcher;
        let found = matcher.most_specific_match("os.linux.x86_64", &["os", "os.linux"]);
        assert_eq!(found.as_deref(), Some("os.linux"));
    }

    #[test]
    fn test_no_match_is_none() {
        let matcher = HierarchyMatcher;
        assert!(matcher
            .most_specific_match("web.browser", &["os", "os.linux"])
            .is_none());
    }
}
