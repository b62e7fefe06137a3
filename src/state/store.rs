use chrono::Utc;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use super::data::ImageAsset;
use crate::error::ScanError;

/// The AssetStore manages the session SQLite database.
/// It holds every captured or uploaded frame of the current run; nothing
/// survives a relaunch, because the database is cleared during startup.
pub struct AssetStore {
    conn: Connection,
    db_path: PathBuf,
}

impl AssetStore {
    /// Prepare the session database for a fresh run.
    ///
    /// Resolves the database path in the user's data directory, creates the
    /// schema, and wipes whatever a previous run left behind. Runs on a
    /// background task at launch; until its completion message arrives,
    /// every store operation fails with `StoreNotReady`.
    ///
    /// Returns the path the main thread (and every later background task)
    /// attaches to.
    pub fn prepare_session() -> Result<PathBuf, ScanError> {
        let db_path = Self::session_db_path();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .expect("Failed to create application data directory");
        }

        let store = Self::attach(&db_path)?;

        // Session-scoped semantics: prior sessions are never restored.
        store.clear()?;

        println!("📁 Session store initialized at: {}", db_path.display());

        Ok(db_path)
    }

    /// Get the path where the session database is stored
    fn session_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");

        path.push("film-scanner");
        path.push("session.db");
        path
    }

    /// Open the session database at a known path.
    ///
    /// Used by the main thread once preparation finishes, and by background
    /// tasks that need their own handle; the main connection cannot be
    /// shared with them.
    pub fn attach(db_path: &Path) -> Result<Self, ScanError> {
        let conn = Connection::open(db_path)?;
        let store = AssetStore {
            conn,
            db_path: db_path.to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), ScanError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS assets (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                mime        TEXT NOT NULL,
                payload     BLOB NOT NULL,
                folder      TEXT NOT NULL,
                created_at  INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_assets_folder ON assets(folder)",
            [],
        )?;

        Ok(())
    }

    /// Append a new frame and return its store-assigned id.
    ///
    /// The record shape is validated before anything reaches the database;
    /// malformed records are rejected with `ValidationFailure`. Each insert
    /// is its own SQLite transaction.
    pub fn put(
        &self,
        name: &str,
        mime: &str,
        payload: &[u8],
        folder: &str,
    ) -> Result<i64, ScanError> {
        Self::validate(name, mime, payload, folder)?;

        self.conn.execute(
            "INSERT INTO assets (name, mime, payload, folder, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![name, mime, payload, folder, Utc::now().timestamp()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Reject records that do not satisfy the asset schema.
    fn validate(name: &str, mime: &str, payload: &[u8], folder: &str) -> Result<(), ScanError> {
        if name.trim().is_empty() {
            return Err(ScanError::ValidationFailure("asset name is empty".into()));
        }
        if folder.trim().is_empty() {
            return Err(ScanError::ValidationFailure("folder name is empty".into()));
        }
        if payload.is_empty() {
            return Err(ScanError::ValidationFailure("payload is empty".into()));
        }
        if !mime.starts_with("image/") {
            return Err(ScanError::ValidationFailure(format!(
                "'{}' is not a raster image type",
                mime
            )));
        }
        Ok(())
    }

    /// Get a full, consistent snapshot of every stored frame,
    /// in insertion order.
    pub fn list_all(&self) -> Result<Vec<ImageAsset>, ScanError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, mime, payload, folder FROM assets ORDER BY id",
        )?;

        let asset_iter = stmt.query_map([], |row| {
            Ok(ImageAsset {
                id: row.get(0)?,
                name: row.get(1)?,
                mime: row.get(2)?,
                payload: row.get(3)?,
                folder: row.get(4)?,
            })
        })?;

        let mut assets = Vec::new();
        for asset in asset_iter {
            assets.push(asset?);
        }

        Ok(assets)
    }

    /// Remove every stored frame. Idempotent: clearing an empty store
    /// succeeds and leaves it empty.
    pub fn clear(&self) -> Result<(), ScanError> {
        self.conn.execute("DELETE FROM assets", [])?;
        Ok(())
    }

    /// Get a count of frames in the store
    pub fn count(&self) -> Result<i64, ScanError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM assets", [], |row| row.get(0))?;
        Ok(count)
    }

    /// In-memory store for tests; no file is touched.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, ScanError> {
        let conn = Connection::open_in_memory()?;
        let store = AssetStore {
            conn,
            db_path: PathBuf::new(),
        };
        store.init_schema()?;
        Ok(store)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_list_round_trip() {
        let store = AssetStore::open_in_memory().unwrap();

        let payload = vec![0x89u8, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let id = store
            .put("frame1.png", "image/png", &payload, "A")
            .unwrap();

        let assets = store.list_all().unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, id);
        assert_eq!(assets[0].name, "frame1.png");
        assert_eq!(assets[0].mime, "image/png");
        assert_eq!(assets[0].payload, payload);
        assert_eq!(assets[0].folder, "A");
    }

    #[test]
    fn test_ids_are_monotonic_and_unique() {
        let store = AssetStore::open_in_memory().unwrap();

        let first = store.put("a.png", "image/png", &[1], "roll").unwrap();
        let second = store.put("b.png", "image/png", &[2], "roll").unwrap();
        let third = store.put("c.png", "image/png", &[3], "other").unwrap();

        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = AssetStore::open_in_memory().unwrap();
        store.put("a.png", "image/png", &[1], "roll").unwrap();

        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);

        // Clearing an already-empty store must not error
        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_malformed_records_are_rejected() {
        let store = AssetStore::open_in_memory().unwrap();

        let empty_payload = store.put("a.png", "image/png", &[], "roll");
        assert!(matches!(empty_payload, Err(ScanError::ValidationFailure(_))));

        let bad_mime = store.put("a.txt", "text/plain", &[1], "roll");
        assert!(matches!(bad_mime, Err(ScanError::ValidationFailure(_))));

        let blank_name = store.put("   ", "image/png", &[1], "roll");
        assert!(matches!(blank_name, Err(ScanError::ValidationFailure(_))));

        let blank_folder = store.put("a.png", "image/png", &[1], " ");
        assert!(matches!(blank_folder, Err(ScanError::ValidationFailure(_))));

        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_list_all_preserves_insertion_order() {
        let store = AssetStore::open_in_memory().unwrap();
        for name in ["z.png", "m.png", "a.png"] {
            store.put(name, "image/png", &[1], "roll").unwrap();
        }

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|asset| asset.name)
            .collect();
        assert_eq!(names, vec!["z.png", "m.png", "a.png"]);
    }
}
