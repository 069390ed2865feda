use std::{fs, path::{Path, PathBuf}};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

pub const SAVED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A question stored under a name. Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub name: String,
    pub question: String,
    #[serde(rename = "savedAt")]
    pub saved_at: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedFile {
    #[serde(default)]
    saved: Vec<SavedQuery>,
}

/// Saved-question registry backed by one JSON file (`{"saved": [...]}`).
///
/// The file is read and rewritten wholesale on every operation. A missing,
/// unreadable or corrupt file reads as an empty registry.
#[derive(Debug, Clone)]
pub struct SavedQueryStore {
    path: PathBuf,
}

impl SavedQueryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> SavedFile {
        if !self.path.exists() {
            return SavedFile::default();
        }

        let parsed = fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str::<SavedFile>(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(file) => file,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "saved questions unreadable, treating as empty");
                SavedFile::default()
            }
        }
    }

    fn write(&self, file: &SavedFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn list(&self) -> Vec<SavedQuery> {
        self.read().saved
    }

    pub fn find(&self, name: &str) -> Option<SavedQuery> {
        self.list().into_iter().find(|item| item.name.to_lowercase() == name.to_lowercase())
    }

    /// Inserts or replaces the entry named `name` (any casing), stamped now.
    pub fn upsert(&self, name: &str, question: &str) -> Result<SavedQuery> {
        self.upsert_at(name, question, Utc::now())
    }

    pub fn upsert_at(&self, name: &str, question: &str, at: DateTime<Utc>) -> Result<SavedQuery> {
        let mut file = self.read();
        let entry = SavedQuery {
            name: name.to_string(),
            question: question.to_string(),
            saved_at: at.format(SAVED_AT_FORMAT).to_string(),
        };

        match file.saved.iter_mut().find(|item| item.name.to_lowercase() == name.to_lowercase()) {
            Some(existing) => *existing = entry.clone(),
            None => file.saved.push(entry.clone()),
        }

        self.write(&file)?;
        info!(name = %entry.name, path = %self.path.display(), "saved question");
        Ok(entry)
    }
}
