use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::state::storer::{BuildState, StateStorer, VersionRecord};
use crate::version::error::StateError;
use crate::version::types::ReleaseType;

/// version, release_type, state, install_dir, updated_at
type RawRecord = (String, String, String, Option<String>, i64);

pub struct StateStore {
    conn: Mutex<Connection>,
}

impl StateStore {
    pub fn new(db_path: &Path) -> Result<Self, StateError> {
        info!("Initializing state database at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, StateError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StateError> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        debug!("Database connection established");

        let store = Self {
            conn: Mutex::new(conn),
        };

        store.create_schema()?;
        Ok(store)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StateError> {
        self.conn.lock().map_err(|_| StateError::LockPoisoned)
    }

    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn create_schema(&self) -> Result<(), StateError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS libraries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS versions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                library_id INTEGER NOT NULL,
                version TEXT NOT NULL,
                release_type TEXT NOT NULL,
                state TEXT NOT NULL,
                install_dir TEXT,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY (library_id) REFERENCES libraries(id) ON DELETE CASCADE,
                UNIQUE(library_id, version)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_library_id ON versions(library_id)",
            [],
        )?;

        debug!("Database schema created successfully");
        Ok(())
    }

    fn into_record(library: &str, raw: RawRecord) -> Result<VersionRecord, StateError> {
        let (version, release_type, state, install_dir, updated_at) = raw;
        Ok(VersionRecord {
            library: library.to_string(),
            version,
            release_type: release_type.parse().unwrap_or(ReleaseType::Unknown),
            state: state.parse()?,
            install_dir: install_dir.map(PathBuf::from),
            updated_at,
        })
    }
}

impl StateStorer for StateStore {
    fn record_discovered(
        &self,
        library: &str,
        versions: &[(String, ReleaseType)],
    ) -> Result<(), StateError> {
        debug!("Recording {} versions for {}", versions.len(), library);

        let now = Self::current_timestamp_ms();

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO libraries (name, updated_at)
            VALUES (?1, ?2)
            ON CONFLICT(name) DO UPDATE SET updated_at = excluded.updated_at
            "#,
            (library, now),
        )?;

        let library_id: i64 = tx.query_row(
            "SELECT id FROM libraries WHERE name = ?1",
            [library],
            |row| row.get(0),
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO versions (library_id, version, release_type, state, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(library_id, version) DO UPDATE SET release_type = excluded.release_type
                "#,
            )?;
            for (version, release_type) in versions {
                stmt.execute((
                    library_id,
                    version,
                    release_type.as_str(),
                    BuildState::Discovered.as_str(),
                    now,
                ))?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn set_state(
        &self,
        library: &str,
        version: &str,
        state: BuildState,
        install_dir: Option<PathBuf>,
    ) -> Result<bool, StateError> {
        let now = Self::current_timestamp_ms();
        let install_dir = install_dir.map(|dir| dir.to_string_lossy().into_owned());

        let conn = self.lock_conn()?;
        let updated = conn.execute(
            r#"
            UPDATE versions SET state = ?3, install_dir = ?4, updated_at = ?5
            WHERE version = ?2
              AND library_id = (SELECT id FROM libraries WHERE name = ?1)
            "#,
            (library, version, state.as_str(), install_dir, now),
        )?;

        debug!("Set {}/{} to {} ({} rows)", library, version, state, updated);
        Ok(updated > 0)
    }

    fn get_record(
        &self,
        library: &str,
        version: &str,
    ) -> Result<Option<VersionRecord>, StateError> {
        let conn = self.lock_conn()?;
        let result: rusqlite::Result<RawRecord> = conn.query_row(
            r#"
            SELECT v.version, v.release_type, v.state, v.install_dir, v.updated_at
            FROM versions v
            JOIN libraries l ON v.library_id = l.id
            WHERE l.name = ?1 AND v.version = ?2
            "#,
            (library, version),
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        );

        match result {
            Ok(raw) => Self::into_record(library, raw).map(Some),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_records(&self, library: &str) -> Result<Vec<VersionRecord>, StateError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT v.version, v.release_type, v.state, v.install_dir, v.updated_at
            FROM versions v
            JOIN libraries l ON v.library_id = l.id
            WHERE l.name = ?1
            ORDER BY v.id
            "#,
        )?;

        let raw = stmt
            .query_map([library], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })?
            .collect::<Result<Vec<RawRecord>, _>>()?;

        raw.into_iter()
            .map(|raw| Self::into_record(library, raw))
            .collect()
    }

    fn remove_version(&self, library: &str, version: &str) -> Result<bool, StateError> {
        let conn = self.lock_conn()?;
        let removed = conn.execute(
            r#"
            DELETE FROM versions
            WHERE version = ?2
              AND library_id = (SELECT id FROM libraries WHERE name = ?1)
            "#,
            (library, version),
        )?;

        Ok(removed > 0)
    }
}
