//! Portable annotation snapshots and the LWW merge
//!
//! A snapshot carries the annotation layer only (annotation, registry lines,
//! document links), never the contract mirror itself, so it stays small and
//! machine-independent. Merging is per-record last-write-wins on the
//! annotation's `recorded_at` marker: acceptance replaces the whole field
//! group for that contract, ties and local-newer keep the local version.
//! There is no central coordinator; exchanging snapshots in any order and any
//! number of times converges every contract to its latest annotation.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::cache::{
    contract_exists, read_annotation_row, read_links_row, read_registry_rows,
    replace_registry_rows, write_annotation_row, write_links_row, CacheError, ContractCache,
    ImportStats,
};
use crate::entities::{AnnotationRecord, LinksRecord};

/// Version marker format, `DD/MM/YYYY HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// One contract's annotation layer inside a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub id: String,
    pub group_code: String,

    #[serde(default)]
    pub status: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub edited_description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_process: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_note: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,

    #[serde(default)]
    pub recorded_at: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub registry_entries: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksRecord>,
}

impl SnapshotEntry {
    /// Required fields for a mergeable entry
    fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && !self.group_code.is_empty() && !self.recorded_at.is_empty()
    }

    fn annotation(&self) -> AnnotationRecord {
        AnnotationRecord {
            status: self.status.clone(),
            edited_description: self.edited_description.clone(),
            admin_process: self.admin_process.clone(),
            admin_note: self.admin_note.clone(),
            options: self.options.clone(),
            recorded_at: self.recorded_at.clone(),
        }
    }
}

/// Errors around the snapshot container itself
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot access snapshot file: {0}")]
    Io(#[from] std::io::Error),

    /// The container doesn't parse; nothing was imported
    #[error("malformed snapshot file: {0}")]
    MalformedFile(#[from] serde_json::Error),
}

/// Parse a version marker; `None` means the string doesn't follow the format
pub fn parse_recorded_at(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}

/// LWW acceptance test against an existing local marker.
///
/// Strictly-later incoming markers win; ties keep local. Either side failing
/// to parse is treated permissively as acceptable, so one bad timestamp never
/// blocks a merge.
pub fn lww_accepts(local: &str, incoming: &str) -> bool {
    match (parse_recorded_at(local), parse_recorded_at(incoming)) {
        (Some(l), Some(i)) => l < i,
        _ => true,
    }
}

impl ContractCache {
    /// Serialize every annotated contract's annotation layer.
    ///
    /// Contracts without an annotation are omitted; core contract scalars are
    /// never part of a snapshot.
    pub fn export_snapshot(&self) -> Result<Vec<SnapshotEntry>, CacheError> {
        let annotated: Vec<(String, String)> = {
            let mut stmt = self.conn().prepare(
                r#"SELECT a.contract_id, c.group_code
                   FROM annotations a
                   JOIN contracts c ON c.id = a.contract_id
                   ORDER BY a.contract_id"#,
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            rows.collect::<Result<_, _>>()?
        };

        let mut entries = Vec::with_capacity(annotated.len());
        for (id, group_code) in annotated {
            let Some(annotation) = read_annotation_row(self.conn(), &id)? else {
                continue;
            };
            let registry_entries = read_registry_rows(self.conn(), &id)?;
            let links = read_links_row(self.conn(), &id)?.filter(|l| !l.is_empty());

            entries.push(SnapshotEntry {
                id,
                group_code,
                status: annotation.status,
                edited_description: annotation.edited_description,
                admin_process: annotation.admin_process,
                admin_note: annotation.admin_note,
                options: annotation.options,
                recorded_at: annotation.recorded_at,
                registry_entries,
                links,
            });
        }

        Ok(entries)
    }

    /// Merge a batch of snapshot entries, one transaction for the whole batch.
    ///
    /// Per entry: missing required fields or an uncached contract id counts as
    /// `malformed` and does nothing; a local annotation that is at least as
    /// new counts as `skipped` and does nothing; otherwise the annotation is
    /// overwritten, the registry is replaced wholesale and the links record is
    /// upserted, counting `applied`.
    pub fn import_snapshot(&mut self, entries: &[SnapshotEntry]) -> Result<ImportStats, CacheError> {
        let mut stats = ImportStats::default();

        let tx = self.conn_mut().transaction()?;
        for entry in entries {
            if !entry.is_well_formed() || !contract_exists(&tx, &entry.id)? {
                stats.malformed += 1;
                continue;
            }

            let accept = match read_annotation_row(&tx, &entry.id)? {
                None => true,
                Some(local) => lww_accepts(&local.recorded_at, &entry.recorded_at),
            };

            if accept {
                write_annotation_row(&tx, &entry.id, &entry.annotation())?;
                replace_registry_rows(&tx, &entry.id, &entry.registry_entries)?;
                if let Some(links) = &entry.links {
                    write_links_row(&tx, &entry.id, links)?;
                }
                stats.applied += 1;
            } else {
                stats.skipped += 1;
            }
        }
        tx.commit()?;

        Ok(stats)
    }
}

/// Write a snapshot file (pretty JSON, round-trip lossless)
pub fn write_snapshot_file(path: &Path, entries: &[SnapshotEntry]) -> Result<(), SnapshotError> {
    let text = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Read a snapshot file; an unparsable container aborts with zero effect
pub fn read_snapshot_file(path: &Path) -> Result<Vec<SnapshotEntry>, SnapshotError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetch::RawContract;
    use serde_json::json;

    fn cache_with_contract(id: &str) -> ContractCache {
        let mut cache = ContractCache::open_in_memory().unwrap();
        cache
            .upsert_group(
                "787000",
                &[RawContract::from_payload("787000", json!({ "id": id })).unwrap()],
            )
            .unwrap();
        cache
    }

    fn entry(id: &str, status: &str, recorded_at: &str) -> SnapshotEntry {
        SnapshotEntry {
            id: id.to_string(),
            group_code: "787000".to_string(),
            status: status.to_string(),
            recorded_at: recorded_at.to_string(),
            ..Default::default()
        }
    }

    fn annotate(cache: &mut ContractCache, id: &str, status: &str, recorded_at: &str) {
        cache
            .write_annotation(
                id,
                &AnnotationRecord {
                    status: status.to_string(),
                    recorded_at: recorded_at.to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    #[test]
    fn test_lww_acceptance() {
        assert!(lww_accepts("01/01/2025 10:00:00", "01/01/2025 11:00:00"));
        assert!(!lww_accepts("01/01/2025 11:00:00", "01/01/2025 10:00:00"));
        // ties keep local
        assert!(!lww_accepts("01/01/2025 11:00:00", "01/01/2025 11:00:00"));
        // unparseable markers never block the merge
        assert!(lww_accepts("garbage", "01/01/2025 10:00:00"));
        assert!(lww_accepts("01/01/2025 10:00:00", "garbage"));
    }

    #[test]
    fn test_older_entry_is_skipped() {
        let mut cache = cache_with_contract("CT-1");
        annotate(&mut cache, "CT-1", "SIGNED", "01/01/2025 11:00:00");

        let stats = cache
            .import_snapshot(&[entry("CT-1", "EXPIRED", "01/01/2025 10:00:00")])
            .unwrap();

        assert_eq!(stats.applied, 0);
        assert_eq!(stats.skipped, 1);
        let local = cache.read_annotation("CT-1").unwrap().unwrap();
        assert_eq!(local.status, "SIGNED");
    }

    #[test]
    fn test_mixed_batch_applies_and_skips() {
        let mut cache = cache_with_contract("CT-1");
        cache
            .upsert_group(
                "787000",
                &[RawContract::from_payload("787000", json!({ "id": "CT-2" })).unwrap()],
            )
            .unwrap();
        annotate(&mut cache, "CT-1", "SIGNED", "01/01/2025 11:00:00");
        annotate(&mut cache, "CT-2", "ACTIVE", "01/01/2025 11:00:00");

        let stats = cache
            .import_snapshot(&[
                entry("CT-1", "EXPIRED", "01/01/2025 10:00:00"),
                entry("CT-2", "CLOSED", "02/01/2025 09:00:00"),
            ])
            .unwrap();

        assert_eq!(stats.applied, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(cache.read_annotation("CT-1").unwrap().unwrap().status, "SIGNED");
        assert_eq!(cache.read_annotation("CT-2").unwrap().unwrap().status, "CLOSED");
    }

    #[test]
    fn test_malformed_entries_are_counted_not_fatal() {
        let mut cache = cache_with_contract("CT-1");

        let mut missing_ts = entry("CT-1", "SIGNED", "");
        missing_ts.recorded_at = String::new();

        let stats = cache
            .import_snapshot(&[
                missing_ts,
                entry("", "SIGNED", "01/01/2025 10:00:00"),
                entry("CT-404", "SIGNED", "01/01/2025 10:00:00"),
                entry("CT-1", "SIGNED", "01/01/2025 10:00:00"),
            ])
            .unwrap();

        assert_eq!(stats.malformed, 3);
        assert_eq!(stats.applied, 1);
    }

    #[test]
    fn test_accepted_entry_replaces_registry_and_upserts_links() {
        let mut cache = cache_with_contract("CT-1");
        annotate(&mut cache, "CT-1", "ACTIVE", "01/01/2025 08:00:00");
        cache.append_registry("CT-1", "stale line").unwrap();

        let incoming = SnapshotEntry {
            registry_entries: vec!["line 1".to_string(), "line 2".to_string()],
            links: Some(LinksRecord {
                contract_url: Some("https://example.org/ct.pdf".to_string()),
                ..Default::default()
            }),
            ..entry("CT-1", "SIGNED", "01/01/2025 09:00:00")
        };

        let stats = cache.import_snapshot(&[incoming]).unwrap();
        assert_eq!(stats.applied, 1);
        assert_eq!(
            cache.read_registry("CT-1").unwrap(),
            vec!["line 1".to_string(), "line 2".to_string()]
        );
        assert_eq!(
            cache.read_links("CT-1").unwrap().unwrap().contract_url.as_deref(),
            Some("https://example.org/ct.pdf")
        );
    }

    #[test]
    fn test_merge_converges_regardless_of_exchange_order() {
        // two machines annotate the same contract independently
        let mut machine_a = cache_with_contract("CT-1");
        let mut machine_b = cache_with_contract("CT-1");
        annotate(&mut machine_a, "CT-1", "SIGNED", "01/01/2025 10:00:00");
        annotate(&mut machine_b, "CT-1", "CLOSED", "01/01/2025 12:00:00");

        let export_a = machine_a.export_snapshot().unwrap();
        let export_b = machine_b.export_snapshot().unwrap();

        // a imports b then b imports a; repeat the exchange a second time
        machine_a.import_snapshot(&export_b).unwrap();
        machine_b.import_snapshot(&export_a).unwrap();
        machine_a.import_snapshot(&export_b).unwrap();
        machine_b.import_snapshot(&export_a).unwrap();

        let final_a = machine_a.read_annotation("CT-1").unwrap().unwrap();
        let final_b = machine_b.read_annotation("CT-1").unwrap().unwrap();
        assert_eq!(final_a.status, "CLOSED");
        assert_eq!(final_a, final_b);
    }

    #[test]
    fn test_export_skips_unannotated_contracts() {
        let mut cache = cache_with_contract("CT-1");
        cache
            .upsert_group(
                "787000",
                &[RawContract::from_payload("787000", json!({ "id": "CT-2" })).unwrap()],
            )
            .unwrap();
        annotate(&mut cache, "CT-1", "SIGNED", "01/01/2025 10:00:00");

        let entries = cache.export_snapshot().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "CT-1");
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");

        let entries = vec![SnapshotEntry {
            options: json!({ "highlight": true }),
            registry_entries: vec!["line 1".to_string()],
            links: Some(LinksRecord {
                amendment_url: Some("https://example.org/amd.pdf".to_string()),
                ..Default::default()
            }),
            ..entry("CT-1", "SIGNED", "01/01/2025 10:00:00")
        }];

        write_snapshot_file(&path, &entries).unwrap();
        let back = read_snapshot_file(&path).unwrap();
        assert_eq!(entries, back);
    }

    #[test]
    fn test_unparsable_snapshot_file_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            read_snapshot_file(&path),
            Err(SnapshotError::MalformedFile(_))
        ));
    }
}
