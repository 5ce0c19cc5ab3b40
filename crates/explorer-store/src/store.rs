use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use explorer::{CollaboratorError, PanelState, SidebarTab, UiStateStore};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::schema;

const SIDEBAR_WIDTH: &str = "sidebar.width";
const SIDEBAR_TAB: &str = "sidebar.activeTab";

/// A SQLite-backed key/value store for persisted panel state.
pub struct SqliteUiStateStore {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteUiStateStore {
    /// Open a store backed by a file on disk, creating its directory.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::Database(e.to_string()))?;
        }
        let conn =
            rusqlite::Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Open an in-memory store. Nothing outlives the process.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(mut conn: rusqlite::Connection) -> Result<Self, StoreError> {
        schema::migrations()
            .to_latest(&mut conn)
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, rusqlite::Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".into()))
    }

    /// Read and decode one value. Missing keys are `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let conn = self.conn()?;
        let raw: Option<String> = match conn.query_row(
            "SELECT value_json FROM ui_state WHERE key = ?1",
            [key],
            |row| row.get(0),
        ) {
            Ok(raw) => Some(raw),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(StoreError::Database(e.to_string())),
        };

        raw.map(|raw| {
            serde_json::from_str(&raw).map_err(|e| StoreError::Encoding {
                key: key.to_owned(),
                message: e.to_string(),
            })
        })
        .transpose()
    }

    /// Encode and write one value, replacing any previous one.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|e| StoreError::Encoding {
            key: key.to_owned(),
            message: e.to_string(),
        })?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO ui_state (key, value_json, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, json, now_epoch_secs()],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// Read a value, treating an undecodable one as missing.
    fn get_or_default<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key) {
            Err(StoreError::Encoding { key, message }) => {
                tracing::warn!(%key, %message, "ignoring undecodable ui state");
                Ok(None)
            }
            other => other,
        }
    }
}

#[async_trait::async_trait]
impl UiStateStore for SqliteUiStateStore {
    async fn load(&self) -> Result<PanelState, CollaboratorError> {
        let sidebar_width = self
            .get_or_default::<f64>(SIDEBAR_WIDTH)?
            .filter(|width| width.is_finite() && *width > 0.0);
        let sidebar_tab = self
            .get_or_default::<SidebarTab>(SIDEBAR_TAB)?
            .unwrap_or_default();

        Ok(PanelState {
            sidebar_width,
            sidebar_tab,
        })
    }

    async fn save_width(&self, width: f64) -> Result<(), CollaboratorError> {
        if !width.is_finite() {
            return Err(CollaboratorError::Other(format!(
                "refusing to persist sidebar width {width}"
            )));
        }
        tracing::debug!(width, "persisting sidebar width");
        Ok(self.put(SIDEBAR_WIDTH, &width)?)
    }

    async fn save_tab(&self, tab: SidebarTab) -> Result<(), CollaboratorError> {
        tracing::debug!(%tab, "persisting sidebar tab");
        Ok(self.put(SIDEBAR_TAB, &tab)?)
    }
}

/// Errors specific to store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("could not encode or decode {key}: {message}")]
    Encoding { key: String, message: String },
}

impl From<StoreError> for CollaboratorError {
    fn from(e: StoreError) -> Self {
        CollaboratorError::Other(e.to_string())
    }
}

fn now_epoch_secs() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    now.to_string()
}
