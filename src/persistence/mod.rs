//! Best-effort storage for high scores and settings
//!
//! Files are plain JSON under the user's local data directory. Callers treat
//! every error as "nothing stored" and carry on.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::highscores::HighScoreEntry;

/// Directory name under the local data dir
const APP_DIR: &str = "fusion-lander";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("could not determine a local data directory")]
    NoDataDir,
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where persisted files for this game live
pub fn data_path(file_name: &str) -> Result<PathBuf, PersistenceError> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR).join(file_name))
        .ok_or(PersistenceError::NoDataDir)
}

/// Read a JSON document; a missing file is `Ok(None)`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Write a JSON document, creating parent directories as needed
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(io_err)
}

/// Storage for the ordered high-score list
pub trait ScoreStore {
    fn load(&mut self) -> Result<Vec<HighScoreEntry>, PersistenceError>;
    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), PersistenceError>;
}

/// High scores as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "highscores.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the user's local data directory
    pub fn in_data_dir() -> Result<Self, PersistenceError> {
        data_path(Self::FILE_NAME).map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<Vec<HighScoreEntry>, PersistenceError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), PersistenceError> {
        write_json(&self.path, entries)
    }
}

/// In-memory store for tests and sessions without a data directory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub entries: Vec<HighScoreEntry>,
    /// Successful saves so far
    pub saves: usize,
    /// Fail every call with an I/O error
    pub failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HighScoreEntry>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), PersistenceError> {
        if self.failing {
            return Err(PersistenceError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("store unavailable"),
            });
        }
        Ok(())
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Vec<HighScoreEntry>, PersistenceError> {
        self.check()?;
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), PersistenceError> {
        self.check()?;
        self.entries = entries.to_vec();
        self.saves += 1;
        Ok(())
    }
}
