//! In-memory record store
//!
//! Plain containers for the five catalog collections. Versions are held
//! only as the derived two-level `package name -> version -> record`
//! index, folded from each bulk-inserted batch; the index is rebuilt from
//! scratch on reload and never hand-edited.

use std::collections::HashMap;

use tracing::debug;

use super::error::CatalogError;
use super::records::{
    BuildRecord, Package, ReleaseTrack, ReleaseVersion, SyncPayload, VersionRecord,
};

/// Holds every record the catalog knows about
#[derive(Debug, Default)]
pub struct RecordStore {
    packages: Vec<Package>,
    versions: HashMap<String, HashMap<String, VersionRecord>>,
    builds: Vec<BuildRecord>,
    release_tracks: Vec<ReleaseTrack>,
    release_versions: Vec<ReleaseVersion>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Reinitialize every collection to empty.
    pub fn reset(&mut self) {
        self.packages = Vec::new();
        self.versions = HashMap::new();
        self.builds = Vec::new();
        self.release_tracks = Vec::new();
        self.release_versions = Vec::new();
    }

    /// Append a sync batch verbatim. Versions are folded into the
    /// two-level index, creating the per-package sub-map on first insert.
    ///
    /// No de-duplication happens here: callers must not load the same
    /// batch twice. A payload without collections loads nothing.
    pub fn bulk_insert(&mut self, payload: SyncPayload) {
        let Some(batch) = payload.collections else {
            debug!("sync payload had no collections; nothing to load");
            return;
        };

        debug!(
            packages = batch.packages.len(),
            versions = batch.versions.len(),
            builds = batch.builds.len(),
            release_tracks = batch.release_tracks.len(),
            release_versions = batch.release_versions.len(),
            "bulk-inserting sync batch"
        );

        self.packages.extend(batch.packages);
        self.builds.extend(batch.builds);
        self.release_tracks.extend(batch.release_tracks);
        self.release_versions.extend(batch.release_versions);

        for record in batch.versions {
            self.versions
                .entry(record.package_name.clone())
                .or_default()
                .insert(record.version.clone(), record);
        }
    }

    /// Check the dangling-build invariant: once fully loaded, every
    /// build's `version_id` must reference a version in the store.
    pub fn verify(&self) -> Result<(), CatalogError> {
        for build in &self.builds {
            let known = self
                .versions
                .values()
                .flat_map(|by_version| by_version.values())
                .any(|v| v.id == build.version_id);
            if !known {
                return Err(CatalogError::DanglingBuild {
                    build_id: build.id.clone(),
                    version_id: build.version_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Look up a package by name
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// All package names, in no particular order
    pub fn package_names(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.name.clone()).collect()
    }

    /// Look up one version of one package
    pub fn version(&self, name: &str, version: &str) -> Option<&VersionRecord> {
        self.versions.get(name).and_then(|by_version| by_version.get(version))
    }

    /// Every version of a package, as the raw index sub-map
    pub fn versions_of(&self, name: &str) -> Option<&HashMap<String, VersionRecord>> {
        self.versions.get(name)
    }

    /// Every build belonging to a version, sorted by build id so that
    /// downstream subset enumeration is deterministic.
    pub fn builds_for_version(&self, version_id: &str) -> Vec<&BuildRecord> {
        let mut builds: Vec<&BuildRecord> = self
            .builds
            .iter()
            .filter(|b| b.version_id == version_id)
            .collect();
        builds.sort_by(|a, b| a.id.cmp(&b.id));
        builds
    }

    /// The build of a version whose composite descriptor matches exactly
    pub fn build_with_architectures(
        &self,
        version_id: &str,
        build_architectures: &str,
    ) -> Option<&BuildRecord> {
        self.builds
            .iter()
            .find(|b| b.version_id == version_id && b.build_architectures == build_architectures)
    }

    /// Look up a release track by name
    pub fn release_track(&self, name: &str) -> Option<&ReleaseTrack> {
        self.release_tracks.iter().find(|t| t.name == name)
    }

    /// All release track names, in no particular order
    pub fn release_track_names(&self) -> Vec<String> {
        self.release_tracks.iter().map(|t| t.name.clone()).collect()
    }

    /// Look up one release version on one track
    pub fn release_version(&self, track: &str, version: &str) -> Option<&ReleaseVersion> {
        self.release_versions
            .iter()
            .find(|r| r.track == track && r.version == version)
    }

    /// Every release version record
    pub fn release_versions(&self) -> &[ReleaseVersion] {
        &self.release_versions
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;
    use crate::catalog::records::RecordBatch;

    fn version(id: &str, package: &str, version: &str) -> VersionRecord {
        VersionRecord {
            id: id.to_string(),
            package_name: package.to_string(),
            version: version.to_string(),
            description: None,
            published: None,
            earliest_compatible_version: None,
        }
    }

    fn build(id: &str, version_id: &str, arches: &str) -> BuildRecord {
        BuildRecord {
            id: id.to_string(),
            version_id: version_id.to_string(),
            build_architectures: arches.to_string(),
        }
    }

    fn payload(batch: RecordBatch) -> SyncPayload {
        SyncPayload {
            collections: Some(batch),
        }
    }

    #[test]
    fn test_bulk_insert_folds_versions() {
        let mut store = RecordStore::new();
        store.bulk_insert(payload(RecordBatch {
            versions: vec![
                version("v1", "http", "1.0.0"),
                version("v2", "http", "1.1.0"),
                version("v3", "json", "0.2.0"),
            ],
            ..Default::default()
        }));

        assert_eq!(store.version("http", "1.0.0").unwrap().id, "v1");
        assert_eq!(store.version("http", "1.1.0").unwrap().id, "v2");
        assert_eq!(store.version("json", "0.2.0").unwrap().id, "v3");
        assert!(store.version("http", "2.0.0").is_none());
        assert!(store.version("nope", "1.0.0").is_none());
        assert_eq!(store.versions_of("http").unwrap().len(), 2);
    }

    #[test]
    fn test_bulk_insert_appends_across_batches() {
        let mut store = RecordStore::new();
        store.bulk_insert(payload(RecordBatch {
            packages: vec![Package {
                name: "http".to_string(),
                maintainers: vec![],
                home_page: None,
                last_updated: None,
            }],
            versions: vec![version("v1", "http", "1.0.0")],
            ..Default::default()
        }));
        store.bulk_insert(payload(RecordBatch {
            versions: vec![version("v2", "http", "1.1.0")],
            ..Default::default()
        }));

        assert!(store.package("http").is_some());
        assert_eq!(store.versions_of("http").unwrap().len(), 2);
    }

    #[test]
    fn test_missing_collections_is_noop() {
        let mut store = RecordStore::new();
        store.bulk_insert(SyncPayload { collections: None });
        assert!(store.package_names().is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut store = RecordStore::new();
        store.bulk_insert(payload(RecordBatch {
            versions: vec![version("v1", "http", "1.0.0")],
            builds: vec![build("b1", "v1", "os")],
            release_tracks: vec![ReleaseTrack {
                name: "PANTRY-CORE".to_string(),
            }],
            ..Default::default()
        }));
        store.reset();

        assert!(store.version("http", "1.0.0").is_none());
        assert!(store.builds_for_version("v1").is_empty());
        assert!(store.release_track_names().is_empty());
    }

    #[test]
    fn test_builds_for_version_sorted_by_id() {
        let mut store = RecordStore::new();
        store.bulk_insert(payload(RecordBatch {
            versions: vec![version("v1", "http", "1.0.0")],
            builds: vec![
                build("b9", "v1", "web.browser"),
                build("b1", "v1", "os"),
                build("b5", "v2", "os"),
            ],
            ..Default::default()
        }));

        let ids: Vec<&str> = store
            .builds_for_version("v1")
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b1", "b9"]);
    }

    #[test]
    fn test_exact_architecture_lookup() {
        let mut store = RecordStore::new();
        store.bulk_insert(payload(RecordBatch {
            builds: vec![
                build("b1", "v1", "os+web.browser"),
                build("b2", "v1", "os"),
            ],
            ..Default::default()
        }));

        assert_eq!(
            store
                .build_with_architectures("v1", "os+web.browser")
                .unwrap()
                .id,
            "b1"
        );
        // Subset of the composite descriptor is not an exact match.
        assert!(store.build_with_architectures("v1", "web.browser").is_none());
    }

    #[test]
    fn test_verify_reports_dangling_build() {
        let mut store = RecordStore::new();
        store.bulk_insert(payload(RecordBatch {
            versions: vec![version("v1", "http", "1.0.0")],
            builds: vec![build("b1", "v1", "os"), build("b2", "v-gone", "os")],
            ..Default::default()
        }));

        let err = store.verify().unwrap_err();
        assert!(err.to_string().contains("v-gone"));
    }

    #[test]
    fn test_verify_passes_on_consistent_store() {
        let mut store = RecordStore::new();
        store.bulk_insert(payload(RecordBatch {
            versions: vec![version("v1", "http", "1.0.0")],
            builds: vec![build("b1", "v1", "os")],
            ..Default::default()
        }));
        assert!(store.verify().is_ok());
    }
}
