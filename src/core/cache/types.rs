//! Cache type definitions
//!
//! Structs used for cached query results and operation statistics.

use chrono::{DateTime, Utc};

/// Counters returned by a group refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Contract ids present in the fetch but not in the cache
    pub added: usize,
    /// Contract ids present in the cache but gone from the fetch
    pub removed: usize,
}

/// Counters returned by a snapshot import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Entries accepted and written
    pub applied: usize,
    /// Entries rejected because the local version is at least as new
    pub skipped: usize,
    /// Entries missing required fields or referencing an uncached contract
    pub malformed: usize,
}

/// Per-group cache summary
#[derive(Debug, Clone)]
pub struct GroupStats {
    pub group_code: String,
    pub contracts: usize,
    /// Last successful refresh, if the group was ever refreshed live
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Whole-cache summary
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub total_contracts: usize,
    pub annotated: usize,
    pub by_group: Vec<GroupStats>,
    pub db_size_bytes: u64,
}
