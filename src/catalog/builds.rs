//! Minimal covering build-set search
//!
//! Given the builds of one version and a set of required architectures,
//! find the fewest builds that together satisfy every requirement. Build
//! subsets are enumerated lazily in strictly increasing size, so the
//! first satisfying subset is guaranteed minimum-cardinality; within a
//! size, index combinations come out in lexicographic order over builds
//! pre-sorted by id, which makes the answer deterministic for a given
//! store content.

use crate::arch::ArchMatcher;

use super::records::BuildRecord;

/// Lazy enumeration of the index subsets of `{0..n}` in strictly
/// increasing size: every 1-element subset, then every 2-element subset,
/// and so on up to the full set.
pub(crate) struct IncreasingSubsets {
    n: usize,
    indices: Vec<usize>,
    started: bool,
}

impl IncreasingSubsets {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            n,
            indices: Vec::new(),
            started: false,
        }
    }
}

impl Iterator for IncreasingSubsets {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.n == 0 {
            return None;
        }
        if !self.started {
            self.started = true;
            self.indices = vec![0];
            return Some(self.indices.clone());
        }

        let size = self.indices.len();
        let mut i = size;
        loop {
            if i == 0 {
                // Every subset of this size has been produced; grow.
                if size == self.n {
                    return None;
                }
                self.indices = (0..=size).collect();
                return Some(self.indices.clone());
            }
            i -= 1;
            // The rightmost index that can still advance carries the
            // trailing indices along with it.
            if self.indices[i] < self.n - (size - i) {
                self.indices[i] += 1;
                for j in i + 1..size {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return Some(self.indices.clone());
            }
        }
    }
}

/// The smallest subset of `builds` such that every architecture in
/// `arches` has a most-specific match against some build's declared set,
/// or `None` if even the full set cannot cover them. An empty requirement
/// set is covered by the empty subset.
///
/// Ties between same-size covering subsets go to the earliest combination
/// in enumeration order; callers get a deterministic answer as long as
/// `builds` arrives in a deterministic order.
pub fn minimal_covering_set<'a>(
    builds: &[&'a BuildRecord],
    arches: &[&str],
    matcher: &dyn ArchMatcher,
) -> Option<Vec<&'a BuildRecord>> {
    if arches.is_empty() {
        return Some(Vec::new());
    }

    for subset in IncreasingSubsets::new(builds.len()) {
        let satisfied = arches.iter().all(|needed| {
            subset.iter().any(|&i| {
                let declared = builds[i].architectures();
                matcher.most_specific_match(needed, &declared).is_some()
            })
        });
        if satisfied {
            return Some(subset.into_iter().map(|i| builds[i]).collect());
        }
    }
    None
}
