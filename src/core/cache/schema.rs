//! Database schema initialization

use rusqlite::params;

use super::{CacheError, ContractCache, SCHEMA_VERSION};

impl ContractCache {
    /// Initialize database schema
    pub(super) fn init_schema(&mut self) -> Result<(), CacheError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Mirrored contract records (overwritten wholesale on refresh)
            CREATE TABLE IF NOT EXISTS contracts (
                id TEXT PRIMARY KEY,
                group_code TEXT NOT NULL,
                number TEXT,
                process_id TEXT,
                supplier_name TEXT,
                supplier_tax_id TEXT,
                description TEXT,
                value REAL,
                valid_from TEXT,
                valid_to TEXT,
                contract_type TEXT,
                modality TEXT,
                raw_snapshot TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_contracts_group ON contracts(group_code);
            CREATE INDEX IF NOT EXISTS idx_contracts_number ON contracts(number);

            -- Locally-authored annotation, one per contract
            CREATE TABLE IF NOT EXISTS annotations (
                contract_id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                edited_description TEXT NOT NULL DEFAULT '',
                admin_process TEXT NOT NULL DEFAULT '',
                admin_note TEXT NOT NULL DEFAULT '',
                options TEXT,
                recorded_at TEXT NOT NULL,
                FOREIGN KEY (contract_id) REFERENCES contracts(id) ON DELETE CASCADE
            );

            -- Append-only audit lines, replaced wholesale on accepted merges
            CREATE TABLE IF NOT EXISTS registry_entries (
                contract_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                entry TEXT NOT NULL,
                UNIQUE (contract_id, entry),
                FOREIGN KEY (contract_id) REFERENCES contracts(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_registry_contract ON registry_entries(contract_id);

            -- Named document URLs, one row per contract
            CREATE TABLE IF NOT EXISTS links (
                contract_id TEXT PRIMARY KEY,
                contract_url TEXT,
                amendment_url TEXT,
                ordinance_url TEXT,
                portal_ref_url TEXT,
                institutional_url TEXT,
                FOREIGN KEY (contract_id) REFERENCES contracts(id) ON DELETE CASCADE
            );

            -- Oversight role holders, one row per contract
            CREATE TABLE IF NOT EXISTS fiscal_assignments (
                contract_id TEXT PRIMARY KEY,
                manager TEXT,
                deputy_manager TEXT,
                supervisor TEXT,
                deputy_supervisor TEXT,
                technical_officer TEXT,
                administrative_officer TEXT,
                notes TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (contract_id) REFERENCES contracts(id) ON DELETE CASCADE
            );

            -- Cached nested resources, one fixed table per kind
            CREATE TABLE IF NOT EXISTS sub_history (
                contract_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                payload TEXT NOT NULL,
                FOREIGN KEY (contract_id) REFERENCES contracts(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_sub_history_contract ON sub_history(contract_id);

            CREATE TABLE IF NOT EXISTS sub_payments (
                contract_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                payload TEXT NOT NULL,
                FOREIGN KEY (contract_id) REFERENCES contracts(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_sub_payments_contract ON sub_payments(contract_id);

            CREATE TABLE IF NOT EXISTS sub_line_items (
                contract_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                payload TEXT NOT NULL,
                FOREIGN KEY (contract_id) REFERENCES contracts(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_sub_line_items_contract ON sub_line_items(contract_id);

            CREATE TABLE IF NOT EXISTS sub_attachments (
                contract_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                payload TEXT NOT NULL,
                FOREIGN KEY (contract_id) REFERENCES contracts(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_sub_attachments_contract ON sub_attachments(contract_id);

            -- Last successful refresh per group, for cache-age reporting
            CREATE TABLE IF NOT EXISTS refresh_log (
                group_code TEXT PRIMARY KEY,
                refreshed_at TEXT NOT NULL
            );
            "#,
        )?;

        // Set schema version
        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }

    /// Check if schema version matches current version
    pub(super) fn needs_schema_rebuild(&self) -> Result<bool, CacheError> {
        let current_version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(current_version != SCHEMA_VERSION)
    }

    /// Drop all tables and reinitialize with the current schema.
    ///
    /// Cached data is a mirror of the catalog, so a version bump simply costs
    /// one refresh per group; annotation tables are dropped too, which is why
    /// snapshots exist.
    pub(super) fn reinitialize_schema(&mut self) -> Result<(), CacheError> {
        self.conn.execute_batch(
            r#"
            DROP TABLE IF EXISTS schema_version;
            DROP TABLE IF EXISTS annotations;
            DROP TABLE IF EXISTS registry_entries;
            DROP TABLE IF EXISTS links;
            DROP TABLE IF EXISTS fiscal_assignments;
            DROP TABLE IF EXISTS sub_history;
            DROP TABLE IF EXISTS sub_payments;
            DROP TABLE IF EXISTS sub_line_items;
            DROP TABLE IF EXISTS sub_attachments;
            DROP TABLE IF EXISTS refresh_log;
            DROP TABLE IF EXISTS contracts;
            "#,
        )?;

        self.init_schema()?;

        Ok(())
    }
}
