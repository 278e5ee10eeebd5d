//! Local-package capability
//!
//! A catalog serving a developer workspace also understands packages that
//! were built locally and never published. Those carry pseudo versions:
//! the registry version they shadow plus a build-local token, e.g.
//! `1.2.0+a1b2c3`. The capability below tells the catalog which packages
//! are local and how to rewrite their pseudo versions back onto the
//! registry version; a local package's absence can never be fixed by
//! talking to the server, so the catalog skips refresh for them.

use std::collections::HashMap;

/// Pseudo-version suffix used when a package has no explicit policy
pub const DEFAULT_LOCAL_SUFFIX: &str = "local";

const VERSION_METADATA_SEPARATOR: char = '+';

/// Decides which packages are local-only and how their pseudo versions
/// map onto registry versions
pub trait LocalResolver {
    /// Whether this package exists only as a local, unpublished build
    fn is_local_package(&self, name: &str) -> bool;

    /// Rewrite a pseudo version onto the version string the store
    /// actually holds for this package.
    fn resolve_local_version(&self, name: &str, version: &str) -> String;
}

/// The remote-only capability: nothing is local, versions pass through
/// untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct RemoteOnly;

impl LocalResolver for RemoteOnly {
    fn is_local_package(&self, _name: &str) -> bool {
        false
    }

    fn resolve_local_version(&self, _name: &str, version: &str) -> String {
        version.to_string()
    }
}

/// Workspace-aware capability holding its own index of local packages
/// and their pseudo-version suffixes.
#[derive(Debug, Default)]
pub struct WorkspaceResolver {
    /// package name -> pseudo-version suffix
    local: HashMap<String, String>,
}

impl WorkspaceResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a local package with the stock suffix
    pub fn register(&mut self, name: impl Into<String>) {
        self.local
            .insert(name.into(), DEFAULT_LOCAL_SUFFIX.to_string());
    }

    /// Register a local package with an explicit suffix policy
    pub fn register_with_suffix(&mut self, name: impl Into<String>, suffix: impl Into<String>) {
        self.local.insert(name.into(), suffix.into());
    }

    /// Names of every registered local package
    pub fn local_package_names(&self) -> Vec<String> {
        self.local.keys().cloned().collect()
    }
}

impl LocalResolver for WorkspaceResolver {
    fn is_local_package(&self, name: &str) -> bool {
        self.local.contains_key(name)
    }

    fn resolve_local_version(&self, name: &str, version: &str) -> String {
        let Some(suffix) = self.local.get(name) else {
            return version.to_string();
        };
        // Strip whatever build-local token the caller had and substitute
        // the package's suffix policy.
        let base = version
            .split(VERSION_METADATA_SEPARATOR)
            .next()
            .unwrap_or(version);
        format!("{base}{VERSION_METADATA_SEPARATOR}{suffix}")
    }
}

#[cfg(test)]
mod local_tests {
    use super::*;

    #[test]
    fn test_remote_only_is_identity() {
        let resolver = RemoteOnly;
        assert!(!resolver.is_local_package("http"));
        assert_eq!(resolver.resolve_local_version("http", "1.0.0+abc"), "1.0.0+abc");
    }

    #[test]
    fn test_workspace_rewrites_build_token() {
        let mut resolver = WorkspaceResolver::new();
        resolver.register("http");

        assert!(resolver.is_local_package("http"));
        assert_eq!(
            resolver.resolve_local_version("http", "1.2.0+a1b2c3"),
            "1.2.0+local"
        );
    }

    #[test]
    fn test_workspace_adds_suffix_to_bare_version() {
        let mut resolver = WorkspaceResolver::new();
        resolver.register("http");

        assert_eq!(resolver.resolve_local_version("http", "1.2.0"), "1.2.0+local");
    }

    #[test]
    fn test_explicit_suffix_policy() {
        let mut resolver = WorkspaceResolver::new();
        resolver.register_with_suffix("http", "checkout");

        assert_eq!(
            resolver.resolve_local_version("http", "1.2.0+xyz"),
            "1.2.0+checkout"
        );
    }

    #[test]
    fn test_unregistered_package_passes_through() {
        let resolver = WorkspaceResolver::new();
        assert!(!resolver.is_local_package("json"));
        assert_eq!(resolver.resolve_local_version("json", "1.0.0+abc"), "1.0.0+abc");
    }
}
