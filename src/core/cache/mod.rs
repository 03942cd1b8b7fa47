//! SQLite-backed contract cache
//!
//! This module provides the local transactional store that:
//! - Mirrors contract records fetched from the remote catalog, one row per id
//! - Holds the four locally-authored dependents (annotation, registry lines,
//!   document links, fiscal assignment) keyed to the contract id
//! - Cascade-deletes every dependent when a contract is removed
//! - Wraps every multi-row operation in a single transaction
//!
//! The cache is machine-local and re-fetchable; only the annotation layer is
//! worth carrying across machines, which is what snapshots are for.

mod schema;
mod types;

pub use types::*;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use thiserror::Error;

use crate::core::fetch::{RawContract, SubResource};
use crate::core::project::Project;
use crate::entities::{AnnotationRecord, ContractRecord, FiscalAssignment, LinksRecord};

/// Current schema version - cache is rebuilt on version mismatch
const SCHEMA_VERSION: i32 = 3;

/// Errors from the local cache store
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed cached payload for contract {id}: {source}")]
    Payload {
        id: String,
        source: serde_json::Error,
    },
}

/// The contract cache backed by SQLite
pub struct ContractCache {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl ContractCache {
    /// Open or create the cache for a project.
    ///
    /// On a schema version mismatch the cache is dropped and recreated; the
    /// contract mirror costs one refresh to rebuild.
    pub fn open(project: &Project) -> Result<Self, CacheError> {
        Self::open_at(&project.cache_path())
    }

    /// Open or create a cache at an explicit path
    pub fn open_at(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let needs_init = !path.exists();
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        let mut cache = Self {
            conn,
            db_path: Some(path.to_path_buf()),
        };

        if needs_init {
            cache.init_schema()?;
        } else if cache.needs_schema_rebuild()? {
            cache.reinitialize_schema()?;
        }

        Ok(cache)
    }

    /// Open an in-memory cache (for testing)
    pub fn open_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let mut cache = Self {
            conn,
            db_path: None,
        };
        cache.init_schema()?;
        Ok(cache)
    }

    // =========================================================================
    // Contract mirror
    // =========================================================================

    /// Insert or fully overwrite every record of a group.
    ///
    /// Only the contract row is touched: scalars and `raw_snapshot` are
    /// replaced wholesale, the annotation-layer tables are left alone. Runs
    /// as one transaction.
    pub fn upsert_group(
        &mut self,
        group_code: &str,
        records: &[RawContract],
    ) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        for record in records {
            upsert_contract_row(&tx, group_code, record)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Remove a contract and all its dependents in one transaction.
    ///
    /// Returns false when the id was not cached (nothing to remove).
    pub fn delete_contract(&mut self, id: &str) -> Result<bool, CacheError> {
        let tx = self.conn.transaction()?;
        let existed = delete_contract_rows(&tx, id)?;
        tx.commit()?;
        Ok(existed)
    }

    /// Apply a full group refresh in one transaction: overwrite every fetched
    /// record, cascade-remove the ids that disappeared, and stamp the
    /// refresh log. Either all of it lands or none of it does.
    pub fn apply_refresh(
        &mut self,
        group_code: &str,
        records: &[RawContract],
        removed_ids: &[String],
    ) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        for record in records {
            upsert_contract_row(&tx, group_code, record)?;
        }
        for id in removed_ids {
            delete_contract_rows(&tx, id)?;
        }
        tx.execute(
            "INSERT OR REPLACE INTO refresh_log (group_code, refreshed_at) VALUES (?1, ?2)",
            params![group_code, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// All cached contract ids of a group
    pub fn read_ids(&self, group_code: &str) -> Result<HashSet<String>, CacheError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM contracts WHERE group_code = ?1")?;
        let rows = stmt.query_map(params![group_code], |row| row.get::<_, String>(0))?;

        let mut ids = HashSet::new();
        for row in rows {
            ids.insert(row?);
        }
        Ok(ids)
    }

    /// All raw payloads of a group, as last fetched
    pub fn read_group(&self, group_code: &str) -> Result<Vec<RawContract>, CacheError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, group_code, raw_snapshot FROM contracts WHERE group_code = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![group_code], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, group_code, raw) = row?;
            let payload: Value =
                serde_json::from_str(&raw).map_err(|e| CacheError::Payload {
                    id: id.clone(),
                    source: e,
                })?;
            records.push(RawContract {
                id,
                group_code,
                payload,
            });
        }
        Ok(records)
    }

    /// One contract with its denormalized scalars
    pub fn read_contract(&self, id: &str) -> Result<Option<ContractRecord>, CacheError> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE id = ?1",
            CONTRACT_SELECT
        ))?;
        let row = stmt
            .query_row(params![id], contract_columns)
            .optional()?;

        row.map(contract_from_columns).transpose()
    }

    /// All cached contracts, optionally filtered by group
    pub fn list_contracts(&self, group_code: Option<&str>) -> Result<Vec<ContractRecord>, CacheError> {
        let (sql, group_param);
        match group_code {
            Some(g) => {
                sql = format!("{} WHERE group_code = ?1 ORDER BY number, id", CONTRACT_SELECT);
                group_param = Some(g);
            }
            None => {
                sql = format!("{} ORDER BY group_code, number, id", CONTRACT_SELECT);
                group_param = None;
            }
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match group_param {
            Some(g) => stmt.query_map(params![g], contract_columns)?,
            None => stmt.query_map([], contract_columns)?,
        };

        let mut contracts = Vec::new();
        for row in rows {
            contracts.push(contract_from_columns(row?)?);
        }
        Ok(contracts)
    }

    // =========================================================================
    // Annotation layer
    // =========================================================================

    pub fn read_annotation(&self, id: &str) -> Result<Option<AnnotationRecord>, CacheError> {
        read_annotation_row(&self.conn, id)
    }

    /// Insert or fully overwrite the annotation for a contract
    pub fn write_annotation(
        &mut self,
        id: &str,
        record: &AnnotationRecord,
    ) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        write_annotation_row(&tx, id, record)?;
        tx.commit()?;
        Ok(())
    }

    /// Registry audit lines for a contract, in insertion order
    pub fn read_registry(&self, id: &str) -> Result<Vec<String>, CacheError> {
        read_registry_rows(&self.conn, id)
    }

    /// Replace every registry line of a contract (delete-all-then-reinsert)
    pub fn replace_registry(&mut self, id: &str, entries: &[String]) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        replace_registry_rows(&tx, id, entries)?;
        tx.commit()?;
        Ok(())
    }

    /// Append one registry line; literal duplicates within a contract are
    /// silently collapsed by the uniqueness constraint
    pub fn append_registry(&mut self, id: &str, entry: &str) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        let next: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM registry_entries WHERE contract_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO registry_entries (contract_id, position, entry) VALUES (?1, ?2, ?3)",
            params![id, next, entry],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn read_links(&self, id: &str) -> Result<Option<LinksRecord>, CacheError> {
        read_links_row(&self.conn, id)
    }

    pub fn write_links(&mut self, id: &str, links: &LinksRecord) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        write_links_row(&tx, id, links)?;
        tx.commit()?;
        Ok(())
    }

    pub fn read_fiscal(&self, id: &str) -> Result<Option<FiscalAssignment>, CacheError> {
        read_fiscal_row(&self.conn, id)
    }

    /// Fully overwrite the fiscal assignment, preserving `created_at` on
    /// re-saves and stamping `updated_at`
    pub fn write_fiscal(&mut self, id: &str, fiscal: &FiscalAssignment) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        let now = Utc::now();
        let created_at = read_fiscal_row(&tx, id)?
            .and_then(|f| f.created_at)
            .or(fiscal.created_at)
            .unwrap_or(now);

        tx.execute(
            r#"INSERT OR REPLACE INTO fiscal_assignments
               (contract_id, manager, deputy_manager, supervisor, deputy_supervisor,
                technical_officer, administrative_officer, notes, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
            params![
                id,
                fiscal.manager,
                fiscal.deputy_manager,
                fiscal.supervisor,
                fiscal.deputy_supervisor,
                fiscal.technical_officer,
                fiscal.administrative_officer,
                fiscal.notes,
                created_at.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    // =========================================================================
    // Sub-resources
    // =========================================================================

    /// Cached nested payloads for one contract and kind
    pub fn read_sub(&self, id: &str, kind: SubResource) -> Result<Vec<Value>, CacheError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT payload FROM {} WHERE contract_id = ?1 ORDER BY position",
            kind.table()
        ))?;
        let rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;

        let mut payloads = Vec::new();
        for row in rows {
            let raw = row?;
            payloads.push(serde_json::from_str(&raw).map_err(|e| CacheError::Payload {
                id: id.to_string(),
                source: e,
            })?);
        }
        Ok(payloads)
    }

    /// Replace the cached nested payloads for one contract and kind
    pub fn replace_sub(
        &mut self,
        id: &str,
        kind: SubResource,
        payloads: &[Value],
    ) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            &format!("DELETE FROM {} WHERE contract_id = ?1", kind.table()),
            params![id],
        )?;
        for (position, payload) in payloads.iter().enumerate() {
            tx.execute(
                &format!(
                    "INSERT INTO {} (contract_id, position, payload) VALUES (?1, ?2, ?3)",
                    kind.table()
                ),
                params![id, position as i64, payload.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // =========================================================================
    // Observability
    // =========================================================================

    /// When a group was last refreshed from the live catalog, if ever
    pub fn group_refreshed_at(&self, group_code: &str) -> Result<Option<DateTime<Utc>>, CacheError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT refreshed_at FROM refresh_log WHERE group_code = ?1",
                params![group_code],
                |row| row.get(0),
            )
            .optional()?;

        Ok(raw.and_then(|s| parse_rfc3339(&s)))
    }

    /// Get cache statistics
    pub fn statistics(&self) -> Result<CacheStats, CacheError> {
        let total_contracts: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM contracts", [], |row| row.get(0))?;

        let annotated: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM annotations", [], |row| row.get(0))?;

        let mut by_group = Vec::new();
        {
            let mut stmt = self.conn.prepare(
                r#"SELECT c.group_code, COUNT(*), r.refreshed_at
                   FROM contracts c
                   LEFT JOIN refresh_log r ON r.group_code = c.group_code
                   GROUP BY c.group_code
                   ORDER BY c.group_code"#,
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, usize>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?;

            for row in rows {
                let (group_code, contracts, refreshed_at) = row?;
                by_group.push(GroupStats {
                    group_code,
                    contracts,
                    refreshed_at: refreshed_at.and_then(|s| parse_rfc3339(&s)),
                });
            }
        }

        let db_size_bytes = self
            .db_path
            .as_ref()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(CacheStats {
            total_contracts,
            annotated,
            by_group,
            db_size_bytes,
        })
    }

    /// Execute raw SQL query (read-only)
    pub fn query_raw(&self, sql: &str) -> Result<Vec<Vec<String>>, CacheError> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_count = stmt.column_count();

        let rows = stmt.query_map([], |row| {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value: String = row
                    .get::<_, rusqlite::types::Value>(i)
                    .map(|v| match v {
                        rusqlite::types::Value::Null => "NULL".to_string(),
                        rusqlite::types::Value::Integer(i) => i.to_string(),
                        rusqlite::types::Value::Real(f) => f.to_string(),
                        rusqlite::types::Value::Text(s) => s,
                        rusqlite::types::Value::Blob(_) => "<blob>".to_string(),
                    })
                    .unwrap_or_default();
                values.push(value);
            }
            Ok(values)
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Get column names for a query
    pub fn query_columns(&self, sql: &str) -> Result<Vec<String>, CacheError> {
        let stmt = self.conn.prepare(sql)?;
        Ok(stmt.column_names().iter().map(|s| s.to_string()).collect())
    }

    /// Clear the entire cache (for reset)
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.conn.execute_batch(
            r#"
            DELETE FROM annotations;
            DELETE FROM registry_entries;
            DELETE FROM links;
            DELETE FROM fiscal_assignments;
            DELETE FROM sub_history;
            DELETE FROM sub_payments;
            DELETE FROM sub_line_items;
            DELETE FROM sub_attachments;
            DELETE FROM refresh_log;
            DELETE FROM contracts;
            "#,
        )?;
        Ok(())
    }

    /// Borrow the underlying connection for same-transaction composition
    /// within the crate (snapshot import/export live in a sibling module)
    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

const CONTRACT_SELECT: &str = r#"SELECT id, group_code, number, process_id, supplier_name,
       supplier_tax_id, description, value, valid_from, valid_to,
       contract_type, modality, raw_snapshot
  FROM contracts"#;

type ContractColumns = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
);

fn contract_columns(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContractColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
        row.get(11)?,
        row.get(12)?,
    ))
}

fn contract_from_columns(cols: ContractColumns) -> Result<ContractRecord, CacheError> {
    let (
        id,
        group_code,
        number,
        process_id,
        supplier_name,
        supplier_tax_id,
        description,
        value,
        valid_from,
        valid_to,
        contract_type,
        modality,
        raw,
    ) = cols;

    let raw_snapshot: Value = serde_json::from_str(&raw).map_err(|e| CacheError::Payload {
        id: id.clone(),
        source: e,
    })?;

    Ok(ContractRecord {
        id,
        group_code,
        number,
        process_id,
        supplier_name,
        supplier_tax_id,
        description,
        value,
        valid_from: valid_from.as_deref().and_then(parse_date),
        valid_to: valid_to.as_deref().and_then(parse_date),
        contract_type,
        modality,
        raw_snapshot,
    })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

// =========================================================================
// Row helpers, usable on a plain connection or inside a transaction
// =========================================================================

pub(crate) fn upsert_contract_row(
    conn: &Connection,
    group_code: &str,
    record: &RawContract,
) -> Result<(), CacheError> {
    let rec = ContractRecord::from_payload(&record.id, group_code, &record.payload);

    conn.execute(
        r#"INSERT OR REPLACE INTO contracts
           (id, group_code, number, process_id, supplier_name, supplier_tax_id,
            description, value, valid_from, valid_to, contract_type, modality, raw_snapshot)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"#,
        params![
            rec.id,
            rec.group_code,
            rec.number,
            rec.process_id,
            rec.supplier_name,
            rec.supplier_tax_id,
            rec.description,
            rec.value,
            rec.valid_from.map(|d| d.to_string()),
            rec.valid_to.map(|d| d.to_string()),
            rec.contract_type,
            rec.modality,
            record.payload.to_string(),
        ],
    )?;
    Ok(())
}

pub(crate) fn delete_contract_rows(conn: &Connection, id: &str) -> Result<bool, CacheError> {
    for table in &[
        "annotations",
        "registry_entries",
        "links",
        "fiscal_assignments",
    ] {
        conn.execute(
            &format!("DELETE FROM {} WHERE contract_id = ?1", table),
            params![id],
        )?;
    }
    for kind in SubResource::ALL {
        conn.execute(
            &format!("DELETE FROM {} WHERE contract_id = ?1", kind.table()),
            params![id],
        )?;
    }

    let deleted = conn.execute("DELETE FROM contracts WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

pub(crate) fn contract_exists(conn: &Connection, id: &str) -> Result<bool, CacheError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM contracts WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub(crate) fn read_annotation_row(
    conn: &Connection,
    id: &str,
) -> Result<Option<AnnotationRecord>, CacheError> {
    let row = conn
        .query_row(
            r#"SELECT status, edited_description, admin_process, admin_note, options, recorded_at
               FROM annotations WHERE contract_id = ?1"#,
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        )
        .optional()?;

    let Some((status, edited_description, admin_process, admin_note, options, recorded_at)) = row
    else {
        return Ok(None);
    };

    let options = match options {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| CacheError::Payload {
            id: id.to_string(),
            source: e,
        })?,
        None => Value::Null,
    };

    Ok(Some(AnnotationRecord {
        status,
        edited_description,
        admin_process,
        admin_note,
        options,
        recorded_at,
    }))
}

pub(crate) fn write_annotation_row(
    conn: &Connection,
    id: &str,
    record: &AnnotationRecord,
) -> Result<(), CacheError> {
    let options = if record.options.is_null() {
        None
    } else {
        Some(record.options.to_string())
    };

    conn.execute(
        r#"INSERT OR REPLACE INTO annotations
           (contract_id, status, edited_description, admin_process, admin_note, options, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
        params![
            id,
            record.status,
            record.edited_description,
            record.admin_process,
            record.admin_note,
            options,
            record.recorded_at,
        ],
    )?;
    Ok(())
}

pub(crate) fn read_registry_rows(conn: &Connection, id: &str) -> Result<Vec<String>, CacheError> {
    let mut stmt = conn.prepare(
        "SELECT entry FROM registry_entries WHERE contract_id = ?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

pub(crate) fn replace_registry_rows(
    conn: &Connection,
    id: &str,
    entries: &[String],
) -> Result<(), CacheError> {
    conn.execute(
        "DELETE FROM registry_entries WHERE contract_id = ?1",
        params![id],
    )?;
    for (position, entry) in entries.iter().enumerate() {
        conn.execute(
            "INSERT OR IGNORE INTO registry_entries (contract_id, position, entry) VALUES (?1, ?2, ?3)",
            params![id, position as i64, entry],
        )?;
    }
    Ok(())
}

pub(crate) fn read_links_row(conn: &Connection, id: &str) -> Result<Option<LinksRecord>, CacheError> {
    let row = conn
        .query_row(
            r#"SELECT contract_url, amendment_url, ordinance_url, portal_ref_url, institutional_url
               FROM links WHERE contract_id = ?1"#,
            params![id],
            |row| {
                Ok(LinksRecord {
                    contract_url: row.get(0)?,
                    amendment_url: row.get(1)?,
                    ordinance_url: row.get(2)?,
                    portal_ref_url: row.get(3)?,
                    institutional_url: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

pub(crate) fn write_links_row(
    conn: &Connection,
    id: &str,
    links: &LinksRecord,
) -> Result<(), CacheError> {
    conn.execute(
        r#"INSERT OR REPLACE INTO links
           (contract_id, contract_url, amendment_url, ordinance_url, portal_ref_url, institutional_url)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
        params![
            id,
            links.contract_url,
            links.amendment_url,
            links.ordinance_url,
            links.portal_ref_url,
            links.institutional_url,
        ],
    )?;
    Ok(())
}

fn read_fiscal_row(conn: &Connection, id: &str) -> Result<Option<FiscalAssignment>, CacheError> {
    let row = conn
        .query_row(
            r#"SELECT manager, deputy_manager, supervisor, deputy_supervisor,
                      technical_officer, administrative_officer, notes, created_at, updated_at
               FROM fiscal_assignments WHERE contract_id = ?1"#,
            params![id],
            |row| {
                Ok(FiscalAssignment {
                    manager: row.get(0)?,
                    deputy_manager: row.get(1)?,
                    supervisor: row.get(2)?,
                    deputy_supervisor: row.get(3)?,
                    technical_officer: row.get(4)?,
                    administrative_officer: row.get(5)?,
                    notes: row.get(6)?,
                    created_at: row
                        .get::<_, String>(7)
                        .map(|s| parse_rfc3339(&s))?,
                    updated_at: row
                        .get::<_, String>(8)
                        .map(|s| parse_rfc3339(&s))?,
                })
            },
        )
        .optional()?;
    Ok(row)
}
