//! SQLite-backed trust store.
//!
//! All agents of a team can share one database file; rows are keyed by
//! `(owner, peer)` and each save replaces the owner's rows inside a
//! transaction.

#![cfg(feature = "sqlite")]

use hive_core::error::{HiveError, Result};
use hive_core::trust::{CategoryScores, TrustRecord, TrustStore};
use hive_core::types::AgentId;
use rusqlite::{params, Connection};
use std::path::Path;

fn sql_err(e: rusqlite::Error) -> HiveError {
    HiveError::store(e.to_string())
}

/// Trust store over a SQLite database.
pub struct SqliteTrustStore {
    conn: Connection,
}

impl SqliteTrustStore {
    /// Create a new in-memory store.
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(sql_err)?;
        Self::init_with_connection(conn)
    }

    /// Create or open a file-backed store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path).map_err(sql_err)?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS trust_records (
                owner TEXT NOT NULL,
                peer TEXT NOT NULL,
                drop_off REAL NOT NULL,
                room_search REAL NOT NULL,
                found_goal REAL NOT NULL,
                PRIMARY KEY (owner, peer)
            );

            CREATE TABLE IF NOT EXISTS trust_owners (
                owner TEXT PRIMARY KEY
            );
            "#,
        )
        .map_err(sql_err)?;
        Ok(Self { conn })
    }

    /// Total rows across all owners.
    pub fn record_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM trust_records", [], |row| row.get(0))
            .map_err(sql_err)?;
        Ok(count as usize)
    }
}

impl TrustStore for SqliteTrustStore {
    fn load(&self, owner: &AgentId) -> Result<Option<Vec<TrustRecord>>> {
        let known: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM trust_owners WHERE owner = ?1",
                params![owner.as_str()],
                |row| row.get(0),
            )
            .map_err(sql_err)?;
        if known == 0 {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare(
                "SELECT peer, drop_off, room_search, found_goal FROM trust_records
                 WHERE owner = ?1 ORDER BY peer",
            )
            .map_err(sql_err)?;
        let rows = stmt
            .query_map(params![owner.as_str()], |row| {
                Ok(TrustRecord {
                    peer: AgentId::new(row.get::<_, String>(0)?),
                    scores: CategoryScores {
                        drop_off: row.get(1)?,
                        room_search: row.get(2)?,
                        found_goal: row.get(3)?,
                    },
                })
            })
            .map_err(sql_err)?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>().map_err(sql_err)?;
        Ok(Some(records))
    }

    fn save(&mut self, owner: &AgentId, records: &[TrustRecord]) -> Result<()> {
        let tx = self.conn.transaction().map_err(sql_err)?;
        tx.execute(
            "INSERT OR IGNORE INTO trust_owners (owner) VALUES (?1)",
            params![owner.as_str()],
        )
        .map_err(sql_err)?;
        tx.execute("DELETE FROM trust_records WHERE owner = ?1", params![owner.as_str()])
            .map_err(sql_err)?;
        {
            let mut insert = tx
                .prepare(
                    "INSERT INTO trust_records (owner, peer, drop_off, room_search, found_goal)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(sql_err)?;
            for record in records {
                insert
                    .execute(params![
                        owner.as_str(),
                        record.peer.as_str(),
                        record.scores.drop_off,
                        record.scores.room_search,
                        record.scores.found_goal,
                    ])
                    .map_err(sql_err)?;
            }
        }
        tx.commit().map_err(sql_err)
    }
}
