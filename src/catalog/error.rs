//! Catalog error types

use thiserror::Error;

/// Catalog-specific errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A sync payload could not be decoded from its JSON wire form
    #[error("Failed to parse sync payload")]
    PayloadParse {
        #[source]
        source: serde_json::Error,
    },

    /// A build references a version record that is not in the store
    #[error("Build '{build_id}' references unknown version id '{version_id}'")]
    DanglingBuild {
        build_id: String,
        version_id: String,
    },
}
