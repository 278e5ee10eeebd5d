//! Catalog record types and the sync payload contract
//!
//! These are the shapes the package server hands us in a sync batch:
//! flat sequences of packages, versions, builds, release tracks, and
//! release versions. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// Separator joining architecture descriptors in a composite build
/// descriptor, e.g. `"os+web.browser"`.
pub const ARCH_SEPARATOR: char = '+';

/// General (non-version-specific) information about a package
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Package name (unique key)
    pub name: String,

    /// Maintainer handles
    #[serde(default)]
    pub maintainers: Vec<String>,

    /// Project home page
    #[serde(default)]
    pub home_page: Option<String>,

    /// When the server last touched this record
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A published version of a package
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    /// Server-assigned record id
    pub id: String,

    /// Name of the package this version belongs to
    pub package_name: String,

    /// Version string; (packageName, version) is a key
    pub version: String,

    /// Description at publication time
    #[serde(default)]
    pub description: Option<String>,

    /// Publication timestamp
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,

    /// Oldest version this one is a drop-in replacement for
    #[serde(default)]
    pub earliest_compatible_version: Option<String>,
}

/// A compiled build of a package version
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    /// Server-assigned record id
    pub id: String,

    /// Id of the [`VersionRecord`] this build belongs to
    pub version_id: String,

    /// Composite descriptor of every architecture this build covers,
    /// joined with [`ARCH_SEPARATOR`]
    pub build_architectures: String,
}

impl BuildRecord {
    /// Split the composite descriptor into individual architecture
    /// descriptors.
    pub fn architectures(&self) -> Vec<&str> {
        self.build_architectures.split(ARCH_SEPARATOR).collect()
    }
}

/// A named stream of tool releases, independent of package versioning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseTrack {
    /// Track name (unique key)
    pub name: String,
}

/// One release on a track
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseVersion {
    /// Track this release belongs to; (track, version) is a key
    pub track: String,

    /// Version string shown to users
    pub version: String,

    /// Monotonic ordering token. Compared with plain string ordering,
    /// never semver; it defines release recency.
    pub order_key: String,

    /// Whether this release is the suggested default for its track
    #[serde(default)]
    pub recommended: bool,

    /// Release notes blurb
    #[serde(default)]
    pub description: Option<String>,
}

/// The resolved "use this release" answer from
/// [`Catalog::get_default_release_version`](super::Catalog::get_default_release_version)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePointer {
    /// Release track name
    pub track: String,

    /// Release version on that track
    pub version: String,
}

/// One batch of records from the package server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBatch {
    /// Package records
    #[serde(default)]
    pub packages: Vec<Package>,

    /// Version records, in flat form; the store folds these into its
    /// two-level index
    #[serde(default)]
    pub versions: Vec<VersionRecord>,

    /// Build records
    #[serde(default)]
    pub builds: Vec<BuildRecord>,

    /// Release track records
    #[serde(default)]
    pub release_tracks: Vec<ReleaseTrack>,

    /// Release version records
    #[serde(default)]
    pub release_versions: Vec<ReleaseVersion>,
}

impl RecordBatch {
    /// Total number of records across all five sequences.
    pub fn record_count(&self) -> usize {
        self.packages.len()
            + self.versions.len()
            + self.builds.len()
            + self.release_tracks.len()
            + self.release_versions.len()
    }
}

/// A sync payload as delivered by the package server. The `collections`
/// field may be absent entirely, which loads nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    /// The record batch, if the server had anything for us
    #[serde(default)]
    pub collections: Option<RecordBatch>,
}

impl SyncPayload {
    /// Parse a payload from its JSON wire form.
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(content).map_err(|source| CatalogError::PayloadParse { source })
    }
}
