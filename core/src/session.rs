use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use log::debug;

use crate::config::{get_default_config_dir, APP_NAME};
use crate::errors::{ApiError, ApiResult};

/// Name of the file holding the persisted token
const TOKEN_FILE: &str = "token";

/// Persistence backend for the session token.
///
/// The client keeps exactly one token; the store only has to hold that
/// single string across restarts.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> ApiResult<Option<String>>;
    fn save(&self, token: &str) -> ApiResult<()>;
    fn clear(&self) -> ApiResult<()>;
}

/// Token store backed by a file under the user config directory
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default token path: `~/.config/frontdesk/token`
    pub fn default_path() -> ApiResult<PathBuf> {
        Ok(get_default_config_dir(APP_NAME)?.join(TOKEN_FILE))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ApiResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ApiError::ConfigError(format!("Failed to read token file: {}", e))
        })?;

        let token = content.trim();
        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(token.to_string()))
        }
    }

    fn save(&self, token: &str) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ApiError::ConfigError(format!("Failed to create token directory: {}", e))
            })?;
        }

        fs::write(&self.path, token).map_err(|e| {
            ApiError::ConfigError(format!("Failed to write token file: {}", e))
        })?;

        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                ApiError::ConfigError(format!("Failed to remove token file: {}", e))
            })?;
        }
        Ok(())
    }
}

/// Token store that keeps the token in memory only.
///
/// Used by tests and by embedders that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ApiResult<Option<String>> {
        Ok(read_cell(&self.token))
    }

    fn save(&self, token: &str) -> ApiResult<()> {
        write_cell(&self.token, Some(token.to_string()));
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        write_cell(&self.token, None);
        Ok(())
    }
}

/// The authenticated session: one optional bearer token shared by every
/// component that issues API requests.
///
/// Concurrently in-flight requests read the token; the only mutation
/// points are login, logout and the 401 handler, where last write wins.
#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    /// Creates a session backed by the given store, restoring any
    /// previously persisted token.
    pub fn new(store: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let token = store.load()?;
        if token.is_some() {
            debug!("Restored a persisted session token");
        }
        Ok(Self {
            token: Arc::new(RwLock::new(token)),
            store,
        })
    }

    /// Creates an unauthenticated session with no persistence
    pub fn in_memory() -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            store: Arc::new(MemoryTokenStore::new()),
        }
    }

    /// Returns the current token, if any
    pub fn token(&self) -> Option<String> {
        read_cell(&self.token)
    }

    /// True when a token is present; no server-side validation is attempted
    pub fn is_authenticated(&self) -> bool {
        read_cell(&self.token).is_some()
    }

    /// Stores a new token in memory and in the backing store
    pub fn set_token(&self, token: &str) -> ApiResult<()> {
        self.store.save(token)?;
        write_cell(&self.token, Some(token.to_string()));
        Ok(())
    }

    /// Drops the token from memory and the backing store; idempotent
    pub fn clear_token(&self) -> ApiResult<()> {
        self.store.clear()?;
        write_cell(&self.token, None);
        Ok(())
    }
}

fn read_cell(cell: &RwLock<Option<String>>) -> Option<String> {
    match cell.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn write_cell(cell: &RwLock<Option<String>>, value: Option<String>) {
    match cell.write() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}
