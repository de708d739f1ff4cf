//! SQLite-based storage.
//!
//! Provides persistent storage for:
//! - Completed guided sessions and their statistics
//! - Whole-collection JSON blobs (mood entries, journal entries, goals)
//!   in a key-value table, one fixed key per feature

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::session::{CompletedSessionRecord, TechniqueId};

use super::data_dir;

/// Fixed kv keys, one per feature collection.
pub const MOOD_KEY: &str = "mood_entries";
pub const JOURNAL_KEY: &str = "journal_entries";
pub const GOALS_KEY: &str = "goals";
/// Persisted engine state between CLI invocations.
pub const ENGINE_KEY: &str = "session_engine";

#[derive(Debug, Clone, Serialize, Default)]
pub struct SessionStats {
    pub total_sessions: u64,
    pub total_minutes: u64,
    pub today_sessions: u64,
    pub today_minutes: u64,
    pub by_technique: Vec<TechniqueStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechniqueStats {
    pub technique: String,
    pub sessions: u64,
    pub minutes: u64,
}

/// SQLite database for session history and record collections.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/mindwell/mindwell.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()?.join("mindwell.db");
        let conn =
            Connection::open(&path).map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                id           TEXT PRIMARY KEY,
                technique    TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_technique ON sessions(technique);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Record a completed session.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(&self, record: &CompletedSessionRecord) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (id, technique, duration_secs, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.id.to_string(),
                record.technique.as_str(),
                record.duration_secs,
                record.completed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Most recent completed sessions, newest first.
    pub fn recent_sessions(
        &self,
        limit: usize,
    ) -> Result<Vec<CompletedSessionRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, technique, duration_secs, completed_at
             FROM sessions ORDER BY completed_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            let id: String = row.get(0)?;
            let technique: String = row.get(1)?;
            let duration_secs: u64 = row.get(2)?;
            let completed_at: String = row.get(3)?;
            Ok((id, technique, duration_secs, completed_at))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, technique, duration_secs, completed_at) = row?;
            // Rows written by older builds with unknown techniques are skipped.
            let (Ok(id), Ok(technique), Ok(completed_at)) = (
                id.parse::<Uuid>(),
                technique.parse::<TechniqueId>(),
                completed_at.parse::<DateTime<Utc>>(),
            ) else {
                continue;
            };
            records.push(CompletedSessionRecord {
                id,
                technique,
                duration_secs,
                completed_at,
            });
        }
        Ok(records)
    }

    pub fn stats_today(&self) -> Result<SessionStats, DatabaseError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let mut stats = self.stats_filtered(Some(format!("{today}T00:00:00+00:00")))?;
        stats.today_sessions = stats.total_sessions;
        stats.today_minutes = stats.total_minutes;
        Ok(stats)
    }

    pub fn stats_all(&self) -> Result<SessionStats, DatabaseError> {
        let mut stats = self.stats_filtered(None)?;
        let today = self.stats_today()?;
        stats.today_sessions = today.total_sessions;
        stats.today_minutes = today.total_minutes;
        Ok(stats)
    }

    fn stats_filtered(&self, since: Option<String>) -> Result<SessionStats, DatabaseError> {
        let sql = match since {
            Some(_) => {
                "SELECT technique, COUNT(*), COALESCE(SUM(duration_secs), 0)
                 FROM sessions WHERE completed_at >= ?1 GROUP BY technique"
            }
            None => {
                "SELECT technique, COUNT(*), COALESCE(SUM(duration_secs), 0)
                 FROM sessions GROUP BY technique"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;

        let map_row = |row: &rusqlite::Row<'_>| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        };
        let rows: Vec<_> = match since {
            Some(since) => stmt
                .query_map(params![since], map_row)?
                .collect::<Result<_, _>>()?,
            None => stmt.query_map([], map_row)?.collect::<Result<_, _>>()?,
        };

        let mut stats = SessionStats::default();
        for (technique, count, secs) in rows {
            stats.total_sessions += count;
            stats.total_minutes += secs / 60;
            stats.by_technique.push(TechniqueStats {
                technique,
                sessions: count,
                minutes: secs / 60,
            });
        }
        Ok(stats)
    }

    // ── Key-value collections ────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Load a whole record collection from its kv blob. A missing key is an
    /// empty collection.
    pub fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.kv_get(key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Persist a whole record collection as one JSON blob.
    pub fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.kv_set(key, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MoodEntry;
    use chrono::NaiveDate;

    fn record(technique: TechniqueId, duration_secs: u64) -> CompletedSessionRecord {
        CompletedSessionRecord {
            id: Uuid::new_v4(),
            technique,
            duration_secs,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn record_and_query() {
        let db = Database::open_memory().unwrap();
        db.record_session(&record(TechniqueId::Meditation, 300))
            .unwrap();
        db.record_session(&record(TechniqueId::Breathing, 180))
            .unwrap();
        let stats = db.stats_all().unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_minutes, 8);
        assert_eq!(stats.by_technique.len(), 2);
    }

    #[test]
    fn recent_sessions_newest_first() {
        let db = Database::open_memory().unwrap();
        let mut old = record(TechniqueId::Meditation, 300);
        old.completed_at = Utc::now() - chrono::Duration::days(2);
        db.record_session(&old).unwrap();
        let new = record(TechniqueId::Breathing, 180);
        db.record_session(&new).unwrap();

        let recent = db.recent_sessions(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, new.id);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn collections_round_trip() {
        let db = Database::open_memory().unwrap();
        let entries = vec![MoodEntry::new(
            NaiveDate::from_ymd_opt(2025, 8, 20).unwrap(),
            4,
            "good day",
            vec!["exercise".into()],
        )
        .unwrap()];
        db.save_collection(MOOD_KEY, &entries).unwrap();
        let loaded: Vec<MoodEntry> = db.load_collection(MOOD_KEY).unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn missing_collection_is_empty() {
        let db = Database::open_memory().unwrap();
        let loaded: Vec<MoodEntry> = db.load_collection(MOOD_KEY).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn malformed_collection_blob_is_a_json_error() {
        let db = Database::open_memory().unwrap();
        db.kv_set(MOOD_KEY, "not json").unwrap();
        let loaded: Result<Vec<MoodEntry>> = db.load_collection(MOOD_KEY);
        assert!(matches!(loaded, Err(crate::error::CoreError::Json(_))));
    }
}
