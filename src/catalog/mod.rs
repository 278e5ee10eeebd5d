//! Pantry Catalog - the in-memory package metadata catalog
//!
//! This module holds the authoritative view of known packages, their
//! published versions, their per-architecture builds, and the tool's own
//! release tracks/versions, and answers structured queries against it.
//!
//! # Architecture
//!
//! ```text
//! Package server (remote source of truth)
//!     │
//!     ▼  SyncSource::fetch  ← full replacement snapshots
//! Catalog
//!     ├── RecordStore       ← five collections + derived version index
//!     ├── record_or_refresh ← refresh-on-miss, at most one fetch per miss
//!     ├── versions          ← semver / orderKey ordering
//!     ├── builds            ← minimal covering build-set search
//!     └── LocalResolver     ← workspace-local pseudo-version mapping
//! ```
//!
//! The catalog is stale-tolerant: a query that misses triggers one
//! blocking resync and one retry, then reports plain absence. "Not found"
//! is never an error here; querying before [`Catalog::initialize`] is a
//! caller sequencing bug and panics.
//!
//! Designed for one logical control flow at a time: no internal locking,
//! and `initialize`/`reset` must not be interleaved with queries.

use std::cell::RefCell;

use tracing::{debug, warn};

use crate::arch::{ArchMatcher, HierarchyMatcher};

pub mod builds;
pub mod error;
pub mod local;
pub mod records;
pub mod store;
pub mod sync;
pub mod versions;

pub use error::CatalogError;
pub use local::{LocalResolver, RemoteOnly, WorkspaceResolver, DEFAULT_LOCAL_SUFFIX};
pub use records::{
    BuildRecord, Package, RecordBatch, ReleasePointer, ReleaseTrack, ReleaseVersion, SyncPayload,
    VersionRecord, ARCH_SEPARATOR,
};
pub use store::RecordStore;
pub use sync::{NullSource, SyncSource};


/// Release track consulted when the caller does not name one
pub const DEFAULT_TRACK: &str = "PANTRY-CORE";

/// The package metadata catalog
pub struct Catalog {
    /// Record collections; interior mutability so the refresh-on-miss
    /// path can reload during an `&self` query
    store: RefCell<RecordStore>,

    /// Remote source of truth, injected
    source: Box<dyn SyncSource>,

    /// Architecture specificity collaborator
    matcher: Box<dyn ArchMatcher>,

    /// Local-package capability (remote-only by default)
    local: Box<dyn LocalResolver>,

    /// Track used by `get_default_release_version(None)`
    default_track: String,

    /// Set by `initialize`; queries panic while false
    initialized: bool,
}

impl Catalog {
    /// Create an uninitialized catalog over a sync source, with the stock
    /// architecture matcher and the remote-only local capability.
    pub fn new(source: Box<dyn SyncSource>) -> Self {
        Self {
            store: RefCell::new(RecordStore::new()),
            source,
            matcher: Box::new(HierarchyMatcher),
            local: Box::new(RemoteOnly),
            default_track: DEFAULT_TRACK.to_string(),
            initialized: false,
        }
    }

    /// Replace the architecture matcher
    pub fn with_arch_matcher(mut self, matcher: Box<dyn ArchMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Replace the local-package capability (workspace-aware catalogs)
    pub fn with_local_resolver(mut self, local: Box<dyn LocalResolver>) -> Self {
        self.local = local;
        self
    }

    /// Override the default release track
    pub fn with_default_track(mut self, track: impl Into<String>) -> Self {
        self.default_track = track.into();
        self
    }

    /// Load an initial payload and mark the catalog ready for queries.
    pub fn initialize(&mut self, payload: SyncPayload) {
        let mut store = self.store.borrow_mut();
        store.reset();
        store.bulk_insert(payload);
        drop(store);
        self.initialized = true;
        debug!("catalog initialized");
    }

    /// Clear every collection. Does not touch the initialized flag.
    pub fn reset(&mut self) {
        self.store.borrow_mut().reset();
    }

    /// Whether `initialize` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Check the store's cross-record invariants.
    pub fn verify(&self) -> Result<(), CatalogError> {
        self.store.borrow().verify()
    }

    fn require_initialized(&self) {
        if !self.initialized {
            panic!("catalog queried before initialization");
        }
    }

    /// Run `find` against the store; on a miss, trigger one blocking
    /// resync (unless one is already in flight) and retry exactly once.
    /// A second miss is plain absence: queries for records the server
    /// never had are ordinary, and a third attempt would not help.
    fn record_or_refresh<T>(&self, find: impl Fn(&RecordStore) -> Option<T>) -> Option<T> {
        {
            let store = self.store.borrow();
            if let Some(found) = find(&store) {
                return Some(found);
            }
        }

        if !self.source.refresh_in_progress() {
            self.refresh();
        }

        let store = self.store.borrow();
        find(&store)
    }

    /// Ask the source for a full snapshot and swap it in. On failure the
    /// prior state stays; the miss that got us here is still a miss.
    fn refresh(&self) {
        match self.source.fetch() {
            Ok(payload) if payload.collections.is_some() => {
                let mut store = self.store.borrow_mut();
                store.reset();
                store.bulk_insert(payload);
                debug!("catalog refreshed from sync source");
            }
            Ok(_) => {
                debug!("sync source delivered no collections, keeping prior state");
            }
            Err(err) => {
                warn!("catalog refresh failed, keeping prior state: {err:#}");
            }
        }
    }

    /// General (non-version-specific) information about a package, or
    /// `None` if there is no such package.
    pub fn get_package(&self, name: &str) -> Option<Package> {
        self.require_initialized();
        self.record_or_refresh(|store| store.package(name).cloned())
    }

    /// Names of every package we know about, in no particular order
    pub fn get_all_package_names(&self) -> Vec<String> {
        self.require_initialized();
        self.store.borrow().package_names()
    }

    /// Every known version of a package, sorted oldest to newest by
    /// semver precedence (not publication date). Empty if the package is
    /// unknown or has no versions; an absent package's missing versions
    /// are not a cache miss, so no refresh is triggered.
    pub fn get_sorted_versions(&self, name: &str) -> Vec<String> {
        self.require_initialized();
        let store = self.store.borrow();
        let Some(by_version) = store.versions_of(name) else {
            return Vec::new();
        };
        versions::sorted(by_version.keys().cloned().collect())
    }

    /// One version of one package, or `None` if there is no such package
    /// or version.
    ///
    /// For a package the local capability claims, the supplied version is
    /// first rewritten onto the registry version its pseudo version
    /// shadows, and no refresh happens: the server cannot know about a
    /// local build.
    pub fn get_version(&self, name: &str, version: &str) -> Option<VersionRecord> {
        self.require_initialized();

        if self.local.is_local_package(name) {
            let version = self.local.resolve_local_version(name, version);
            return self.store.borrow().version(name, &version).cloned();
        }

        self.record_or_refresh(|store| store.version(name, version).cloned())
    }

    /// The newest version of a package under semver precedence, or `None`
    /// if the package is unknown or has no versions.
    pub fn get_latest_version(&self, name: &str) -> Option<VersionRecord> {
        self.require_initialized();
        let sorted = self.get_sorted_versions(name);
        let last = sorted.last()?;
        self.get_version(name, last)
    }

    /// The smallest set of this version's builds covering every required
    /// architecture, or `None` if the version is unknown or no subset of
    /// its builds (including all of them) covers the requirements. The
    /// latter is an expected outcome, not a fault: it means this version
    /// cannot run everywhere the caller needs it to.
    pub fn get_builds_for_arches(
        &self,
        name: &str,
        version: &str,
        arches: &[&str],
    ) -> Option<Vec<BuildRecord>> {
        self.require_initialized();

        let version_record = self.get_version(name, version)?;
        let store = self.store.borrow();
        let candidates = store.builds_for_version(&version_record.id);
        let solution = builds::minimal_covering_set(&candidates, arches, self.matcher.as_ref())?;
        Some(solution.into_iter().cloned().collect())
    }

    /// Every build of a version, or `None` if there is no such version
    pub fn get_all_builds(&self, name: &str, version: &str) -> Option<Vec<BuildRecord>> {
        self.require_initialized();

        let version_record = self.get_version(name, version)?;
        let store = self.store.borrow();
        Some(
            store
                .builds_for_version(&version_record.id)
                .into_iter()
                .cloned()
                .collect(),
        )
    }

    /// The build of a version whose composite descriptor matches
    /// `build_architectures` exactly, bypassing the covering-set search.
    /// Used when the caller already knows precisely which build it wants,
    /// e.g. re-fetching one it just published.
    pub fn get_build_with_exact_architectures(
        &self,
        version_record: &VersionRecord,
        build_architectures: &str,
    ) -> Option<BuildRecord> {
        self.require_initialized();
        self.record_or_refresh(|store| {
            store
                .build_with_architectures(&version_record.id, build_architectures)
                .cloned()
        })
    }

    /// General (non-version-specific) information about a release track,
    /// or `None` if there is no such track.
    pub fn get_release_track(&self, name: &str) -> Option<ReleaseTrack> {
        self.require_initialized();
        self.record_or_refresh(|store| store.release_track(name).cloned())
    }

    /// One release version on one track, or `None` if there is no such
    /// release version.
    pub fn get_release_version(&self, track: &str, version: &str) -> Option<ReleaseVersion> {
        self.require_initialized();
        self.record_or_refresh(|store| store.release_version(track, version).cloned())
    }

    /// Names of every release track we know about, in no particular order
    pub fn get_all_release_tracks(&self) -> Vec<String> {
        self.require_initialized();
        self.store.borrow().release_track_names()
    }

    /// All recommended versions on a track, most recent first by
    /// `orderKey`. Entries at or below `later_than_order_key` are
    /// excluded when the floor is given. Empty if the track is unknown or
    /// nothing is recommended.
    pub fn get_sorted_recommended_release_versions(
        &self,
        track: &str,
        later_than_order_key: Option<&str>,
    ) -> Vec<String> {
        self.require_initialized();
        let store = self.store.borrow();
        versions::sorted_recommended(store.release_versions(), track, later_than_order_key)
    }

    /// The latest recommended release version on a track (the default
    /// track when `None`), or `None` if no such thing exists even after
    /// one resync. "Nothing recommended yet" is treated as transient
    /// until synced, so this query is refresh-wrapped.
    pub fn get_default_release_version(&self, track: Option<&str>) -> Option<ReleasePointer> {
        self.require_initialized();

        let track = track.unwrap_or(&self.default_track).to_string();
        self.record_or_refresh(|store| {
            let recommended = versions::sorted_recommended(store.release_versions(), &track, None);
            recommended.first().map(|version| ReleasePointer {
                track: track.clone(),
                version: version.clone(),
            })
        })
    }
}
