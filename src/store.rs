//! High score persisted as a small JSON file.
//!
//! Format: `{"high_score": 1234}`. A missing file means no high score yet.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{HighScoreStore, StoreError};

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileHighScoreStore {
    path: PathBuf,
}

impl JsonFileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `LETTER_CASCADE_HIGHSCORE` if set, else `~/.letter-cascade-highscore.json`,
    /// else the working directory.
    pub fn from_env() -> Self {
        let path = std::env::var("LETTER_CASCADE_HIGHSCORE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let file = ".letter-cascade-highscore.json";
                match std::env::var_os("HOME") {
                    Some(home) => Path::new(&home).join(file),
                    None => PathBuf::from(file),
                }
            });
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileHighScoreStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let file: HighScoreFile =
            serde_json::from_str(&text).map_err(|e| StoreError::Malformed(e.to_string()))?;
        debug!(path = %self.path.display(), high_score = file.high_score, "high score loaded");
        Ok(Some(file.high_score))
    }

    /// Write to a sibling temp file, then rename over the old one.
    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(&HighScoreFile { high_score: score })
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
