use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::db::{ConfigDb, DbError};
use crate::display::DisplayProjector;
use crate::error::EngineError;
use crate::types::Config;
use crate::verticals::{DefaultConfig, VerticalRegistry};

/// Shared application state: config plus the config database handle.
pub struct AppState {
    pub config: Mutex<Config>,
    pub db: Mutex<Option<ConfigDb>>,
}

impl AppState {
    /// Load `~/.studiodesk/config.json` and open the database it points at.
    pub fn new() -> Self {
        let config = match load_config() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}. Using default configuration.");
                Config::default()
            }
        };
        Self::with_config(config)
    }

    /// Build state from an explicit config. A database that fails to open
    /// leaves `db` empty rather than aborting.
    pub fn with_config(config: Config) -> Self {
        let opened = match &config.db_path {
            Some(path) => ConfigDb::open_at(path.clone()),
            None => ConfigDb::open(),
        };
        let db = match opened {
            Ok(db) => Some(db),
            Err(e) => {
                log::warn!("Failed to open config database: {e}. DB features disabled.");
                None
            }
        };

        if config.seed_defaults {
            if let Some(db) = &db {
                let seeded = DefaultConfig::builtin()
                    .and_then(|defaults| VerticalRegistry::new(db).seed_defaults(&defaults));
                if let Err(e) = seeded {
                    log::warn!("Failed to seed built-in verticals: {e}");
                }
            }
        }

        Self {
            config: Mutex::new(config),
            db: Mutex::new(db),
        }
    }

    /// Run a closure against the open database.
    pub fn with_db<T>(
        &self,
        f: impl FnOnce(&ConfigDb) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let guard = self.db.lock();
        let db = guard
            .as_ref()
            .ok_or(EngineError::Persistence(DbError::Unavailable))?;
        f(db)
    }

    pub fn config(&self) -> Config {
        self.config.lock().clone()
    }

    pub fn projector(&self) -> DisplayProjector {
        DisplayProjector::new(self.config.lock().date_format.clone())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the canonical config file path (~/.studiodesk/config.json)
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".studiodesk").join("config.json"))
}

/// Load configuration from ~/.studiodesk/config.json
pub fn load_config() -> Result<Config, String> {
    load_config_from(&config_path()?)
}

/// Load configuration from an explicit path. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}
