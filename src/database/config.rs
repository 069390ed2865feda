use std::{fs, path::{Path, PathBuf}};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{database::Catalog, error::Result};

/// Engine configuration, read from a JSON file.
///
/// Every key is optional; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// JSON array of machine records. The built-in sample machines are used when unset.
    pub inventory_path: Option<PathBuf>,
    /// Saved-question registry file
    pub saved_path: PathBuf,
    /// Base directory for relative `--out-file` paths
    pub downloads_dir: PathBuf,
    /// Header used when a question lists no columns
    pub default_column: String,
    /// Extra group aliases, merged over the built-in table
    pub group_aliases: IndexMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inventory_path: None,
            saved_path: PathBuf::from("saved_questions.json"),
            downloads_dir: PathBuf::from("downloads"),
            default_column: "Computer Name".to_string(),
            group_aliases: IndexMap::new(),
        }
    }
}

impl EngineConfig {
    /// Loads `path`, or the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The standard catalog with this configuration's aliases layered on top.
    pub fn catalog(&self) -> Catalog {
        Catalog::standard().with_group_aliases(self.group_aliases.iter().map(|(k, v)| (k.as_str(), v.clone())))
    }

    /// Absolute paths are kept; relative ones land under `downloads_dir`.
    pub fn resolve_output_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.downloads_dir.join(path)
        }
    }
}
