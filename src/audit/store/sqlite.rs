//! SQLite audit store
//!
//! Persists entries to an `audit_log` table using rusqlite with r2d2
//! connection pooling. The diff is stored as a JSON text column.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, params_from_iter};
use uuid::Uuid;

use crate::audit::entry::{AuditEntry, AuditQuery};
use crate::error::{AuditError, AuditResult};

use super::AuditStore;

type DbPool = Pool<SqliteConnectionManager>;
type DbConn = PooledConnection<SqliteConnectionManager>;

const SELECT_COLUMNS: &str = "SELECT id, actor_identity, entity_type, entity_id, action, diff, \
     created_at, rowid AS seq FROM audit_log";

pub struct SqliteStore {
    pool: DbPool,
    db_path: PathBuf,
}

/// Raw column values before conversion into an [`AuditEntry`]
struct AuditRow {
    id: String,
    actor_identity: String,
    entity_type: String,
    entity_id: String,
    action: String,
    diff: String,
    created_at: String,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> AuditResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder().max_size(4).build(manager)?;

        let store = Self {
            pool,
            db_path: db_path.to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> AuditResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;

        let store = Self {
            pool,
            db_path: PathBuf::from(":memory:"),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> AuditResult<()> {
        let conn = self.get_conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id TEXT PRIMARY KEY,
                actor_identity TEXT NOT NULL,
                entity_type TEXT NOT NULL,
                entity_id TEXT NOT NULL,
                action TEXT NOT NULL,
                diff TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_audit_log_entity
                ON audit_log (entity_type, entity_id);",
        )
        .map_err(|e| AuditError::Storage(format!("Failed to create audit_log table: {}", e)))?;

        Ok(())
    }

    fn get_conn(&self) -> AuditResult<DbConn> {
        Ok(self.pool.get()?)
    }
}

impl AuditRow {
    fn into_entry(self) -> AuditResult<AuditEntry> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| AuditError::Storage(format!("Invalid entry id '{}': {}", self.id, e)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| AuditError::Storage(format!("Invalid timestamp for {}: {}", id, e)))?
            .with_timezone(&Utc);

        Ok(AuditEntry {
            id,
            actor_identity: self.actor_identity,
            entity_type: self.entity_type.parse()?,
            entity_id: self.entity_id,
            action: self.action.parse()?,
            diff: serde_json::from_str(&self.diff)?,
            created_at,
        })
    }
}

impl AuditStore for SqliteStore {
    fn append(&self, entry: &AuditEntry) -> AuditResult<()> {
        let conn = self.get_conn()?;
        let diff = serde_json::to_string(&entry.diff)?;

        conn.execute(
            "INSERT INTO audit_log (id, actor_identity, entity_type, entity_id, action, diff, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id.to_string(),
                entry.actor_identity,
                entry.entity_type.as_str(),
                entry.entity_id,
                entry.action.as_str(),
                diff,
                entry.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            ],
        )?;

        Ok(())
    }

    fn query(&self, query: &AuditQuery) -> AuditResult<Vec<AuditEntry>> {
        let mut conditions = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(entity_type) = query.entity_type {
            values.push(entity_type.as_str().to_string());
            conditions.push(format!("entity_type = ?{}", values.len()));
        }
        if let Some(entity_id) = &query.entity_id {
            values.push(entity_id.clone());
            conditions.push(format!("entity_id = ?{}", values.len()));
        }
        if let Some(actor) = &query.actor_identity {
            values.push(actor.clone());
            conditions.push(format!("actor_identity = ?{}", values.len()));
        }

        let mut sql = SELECT_COLUMNS.to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        // Most recent N, returned oldest first
        let sql = match query.limit {
            Some(limit) => format!(
                "SELECT * FROM ({} ORDER BY created_at DESC, seq DESC LIMIT {}) \
                 ORDER BY created_at ASC, seq ASC",
                sql,
                i64::try_from(limit).unwrap_or(i64::MAX)
            ),
            None => format!("{} ORDER BY created_at ASC, seq ASC", sql),
        };

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok(AuditRow {
                    id: row.get(0)?,
                    actor_identity: row.get(1)?,
                    entity_type: row.get(2)?,
                    entity_id: row.get(3)?,
                    action: row.get(4)?,
                    diff: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(AuditRow::into_entry).collect()
    }

    fn count(&self) -> AuditResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.db_path.display())
    }
}
