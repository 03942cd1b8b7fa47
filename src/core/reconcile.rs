//! Group reconciliation - diff a fresh fetch against the cache and apply it
//!
//! The live fetch happens first and is the atomicity boundary: if the catalog
//! is unreachable the cache is left exactly as it was. Once the fetch is in
//! hand, every fetched record is written (full overwrite, so drifted scalars
//! on known records get corrected) and every id that disappeared is
//! cascade-removed, all inside one transaction.

use std::collections::HashSet;

use thiserror::Error;

use crate::core::cache::{CacheError, ContractCache, ReconcileStats};
use crate::core::fetch::{FetchError, Fetcher};

/// Errors from a reconciliation call
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Refresh one group from the live catalog.
///
/// Post-condition: the cached id set for the group equals the fetched id set
/// exactly, and no dependent row references a removed id. Returns the
/// added/removed counts; annotation content is never logged.
pub fn reconcile(
    fetcher: &Fetcher,
    cache: &mut ContractCache,
    group_code: &str,
) -> Result<ReconcileStats, ReconcileError> {
    let fresh = fetcher.fetch_live(group_code)?;

    let old_ids = cache.read_ids(group_code)?;
    let fresh_ids: HashSet<String> = fresh.iter().map(|r| r.id.clone()).collect();

    let added = fresh_ids.difference(&old_ids).count();
    let removed_ids: Vec<String> = old_ids.difference(&fresh_ids).cloned().collect();

    cache.apply_refresh(group_code, &fresh, &removed_ids)?;

    Ok(ReconcileStats {
        added,
        removed: removed_ids.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetch::{CatalogSource, RetryPolicy, SourceError, SubResource};
    use serde_json::{json, Value};
    use std::time::Duration;

    struct FixedSource {
        payloads: Result<Vec<Value>, ()>,
    }

    impl CatalogSource for FixedSource {
        fn fetch_group(&self, _group_code: &str) -> Result<Vec<Value>, SourceError> {
            match &self.payloads {
                Ok(p) => Ok(p.clone()),
                Err(()) => Err(SourceError::Server {
                    status: 500,
                    body: "boom".to_string(),
                }),
            }
        }

        fn fetch_sub(&self, _contract_id: &str, _kind: SubResource) -> Result<Vec<Value>, SourceError> {
            self.fetch_group("")
        }
    }

    fn fetcher_returning(ids: &[&str]) -> Fetcher {
        let payloads = ids.iter().map(|id| json!({ "id": id })).collect();
        Fetcher::new(
            Box::new(FixedSource {
                payloads: Ok(payloads),
            }),
            fast_retry(),
        )
    }

    fn failing_fetcher() -> Fetcher {
        Fetcher::new(Box::new(FixedSource { payloads: Err(()) }), fast_retry())
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 2,
            delay: Duration::from_millis(0),
        }
    }

    fn ids_of(cache: &ContractCache, group: &str) -> Vec<String> {
        let mut ids: Vec<String> = cache.read_ids(group).unwrap().into_iter().collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_diff_applies_added_and_removed() {
        // cache {A,B,C}, fetch {B,C,D}
        let mut cache = ContractCache::open_in_memory().unwrap();
        reconcile(&fetcher_returning(&["A", "B", "C"]), &mut cache, "787000").unwrap();

        let stats = reconcile(&fetcher_returning(&["B", "C", "D"]), &mut cache, "787000").unwrap();
        assert_eq!(stats, ReconcileStats { added: 1, removed: 1 });
        assert_eq!(ids_of(&cache, "787000"), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut cache = ContractCache::open_in_memory().unwrap();
        let fetcher = fetcher_returning(&["A", "B"]);

        reconcile(&fetcher, &mut cache, "787000").unwrap();
        let before: Vec<String> = cache
            .read_group("787000")
            .unwrap()
            .iter()
            .map(|r| r.payload.to_string())
            .collect();

        let stats = reconcile(&fetcher, &mut cache, "787000").unwrap();
        assert_eq!(stats, ReconcileStats { added: 0, removed: 0 });

        let after: Vec<String> = cache
            .read_group("787000")
            .unwrap()
            .iter()
            .map(|r| r.payload.to_string())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_fetch_failure_leaves_cache_untouched() {
        let mut cache = ContractCache::open_in_memory().unwrap();
        reconcile(&fetcher_returning(&["A", "B"]), &mut cache, "787000").unwrap();
        let before = ids_of(&cache, "787000");
        let refreshed_before = cache.group_refreshed_at("787000").unwrap();

        let err = reconcile(&failing_fetcher(), &mut cache, "787000").unwrap_err();
        assert!(matches!(err, ReconcileError::Fetch(FetchError::Exhausted { .. })));

        assert_eq!(ids_of(&cache, "787000"), before);
        assert_eq!(cache.group_refreshed_at("787000").unwrap(), refreshed_before);
    }

    #[test]
    fn test_removed_contracts_lose_their_dependents() {
        let mut cache = ContractCache::open_in_memory().unwrap();
        reconcile(&fetcher_returning(&["A", "B"]), &mut cache, "787000").unwrap();
        cache
            .write_annotation(
                "A",
                &crate::entities::AnnotationRecord {
                    status: "SIGNED".to_string(),
                    recorded_at: "01/01/2025 11:00:00".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        cache.append_registry("A", "signed").unwrap();

        reconcile(&fetcher_returning(&["B"]), &mut cache, "787000").unwrap();

        assert!(cache.read_annotation("A").unwrap().is_none());
        assert!(cache.read_registry("A").unwrap().is_empty());
    }

    #[test]
    fn test_reconcile_overwrites_drifted_scalars() {
        let mut cache = ContractCache::open_in_memory().unwrap();

        let v1 = Fetcher::new(
            Box::new(FixedSource {
                payloads: Ok(vec![json!({ "id": "A", "description": "old wording" })]),
            }),
            fast_retry(),
        );
        reconcile(&v1, &mut cache, "787000").unwrap();

        let v2 = Fetcher::new(
            Box::new(FixedSource {
                payloads: Ok(vec![json!({ "id": "A", "description": "new wording" })]),
            }),
            fast_retry(),
        );
        let stats = reconcile(&v2, &mut cache, "787000").unwrap();

        // same id set, but the known record still gets rewritten
        assert_eq!(stats, ReconcileStats { added: 0, removed: 0 });
        let rec = cache.read_contract("A").unwrap().unwrap();
        assert_eq!(rec.description.as_deref(), Some("new wording"));
    }

    #[test]
    fn test_reconcile_only_touches_its_group() {
        let mut cache = ContractCache::open_in_memory().unwrap();
        reconcile(&fetcher_returning(&["X"]), &mut cache, "787010").unwrap();
        reconcile(&fetcher_returning(&["A"]), &mut cache, "787000").unwrap();

        // refreshing 787000 with a disjoint set must not evict 787010
        assert_eq!(ids_of(&cache, "787010"), vec!["X"]);
    }
}
