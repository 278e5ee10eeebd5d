//! Sync source trait - the remote source of truth for catalog data
//!
//! The catalog never does network I/O itself. It holds an explicit
//! reference to a [`SyncSource`] and asks it for a full replacement
//! snapshot when a query misses. The in-flight flag lives with the
//! source, including whatever synchronization it needs; the catalog only
//! promises to check it before triggering and to never start a second
//! concurrent refresh of its own.

use anyhow::Result;

use super::records::SyncPayload;

/// A remote source of truth that can re-deliver the full catalog contents
pub trait SyncSource {
    /// Whether a refresh is already underway somewhere in the process
    fn refresh_in_progress(&self) -> bool;

    /// Fetch a full replacement snapshot. Blocking; the caller waits for
    /// the result. On error the catalog keeps its prior state.
    fn fetch(&self) -> Result<SyncPayload>;
}

/// A source with nothing behind it. Refreshes succeed and deliver an
/// empty payload; useful for fully offline operation and tests.
#[derive(Debug, Default)]
pub struct NullSource;

impl SyncSource for NullSource {
    fn refresh_in_progress(&self) -> bool {
        false
    }

    fn fetch(&self) -> Result<SyncPayload> {
        Ok(SyncPayload::default())
    }
}
