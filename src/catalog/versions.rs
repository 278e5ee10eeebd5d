//! Version ordering
//!
//! Package versions are ordered by semver precedence, with a plain string
//! comparison fallback for version strings that do not parse. Release
//! versions are a different lineage entirely: their recency is defined by
//! the `orderKey` token under plain string ordering, never by semver.

use std::cmp::Ordering;

use super::records::ReleaseVersion;

/// Compare two version strings by semver precedence, falling back to
/// string ordering when either side does not parse.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (semver::Version::parse(a), semver::Version::parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        _ => a.cmp(b),
    }
}

/// Sort version strings ascending by [`compare`].
pub fn sorted(mut versions: Vec<String>) -> Vec<String> {
    versions.sort_by(|a, b| compare(a, b));
    versions
}

/// All recommended versions on a track, ordered most-recent first by
/// `orderKey`. When `later_than_order_key` is given, entries whose key is
/// not strictly greater are excluded. Empty if the track is unknown or
/// has no recommended versions.
pub fn sorted_recommended(
    release_versions: &[ReleaseVersion],
    track: &str,
    later_than_order_key: Option<&str>,
) -> Vec<String> {
    let mut recommended: Vec<&ReleaseVersion> = release_versions
        .iter()
        .filter(|r| {
            if r.track != track || !r.recommended {
                return false;
            }
            match later_than_order_key {
                Some(floor) => r.order_key.as_str() > floor,
                None => true,
            }
        })
        .collect();

    recommended.sort_by(|a, b| a.order_key.cmp(&b.order_key));
    recommended.reverse();
    recommended.into_iter().map(|r| r.version.clone()).collect()
}
