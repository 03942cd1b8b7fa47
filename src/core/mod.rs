//! Core module - cache, fetching, reconciliation and merge logic

pub mod cache;
pub mod canonical;
pub mod config;
pub mod fetch;
pub mod project;
pub mod reconcile;
pub mod snapshot;

pub use cache::{CacheError, CacheStats, ContractCache, GroupStats, ImportStats, ReconcileStats};
pub use canonical::{canonicalize, CompactKey, KeyIndex, KeyParseError, MatchSummary};
pub use config::Config;
pub use fetch::{
    CatalogSource, FetchError, FetchMode, Fetcher, HttpCatalogSource, RawContract, RetryPolicy,
    SourceError, SubResource,
};
pub use project::{Project, ProjectError};
pub use reconcile::{reconcile, ReconcileError};
pub use snapshot::{
    lww_accepts, parse_recorded_at, read_snapshot_file, write_snapshot_file, SnapshotEntry,
    SnapshotError, TIMESTAMP_FORMAT,
};
