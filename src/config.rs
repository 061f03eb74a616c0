//! Persisted viewer configuration.
//!
//! A flat JSON record at a well-known path in the user's home directory.
//! Most fields are presentation state owned by the UI collaborator; the
//! filtering core only consumes the subset exposed by
//! [`filter_inputs`](ViewerConfig::filter_inputs).

use crate::error::{LogsieveError, Result};
use crate::filter::FilterInputs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "logsieve.json";

/// The persisted settings record, saved on every filter run and file open,
/// restored at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub include_keywords: String,
    pub exclude_keywords: String,
    pub include_case_sensitive: bool,
    pub exclude_case_sensitive: bool,
    pub start_time: String,
    pub end_time: String,
    pub word_wrap: bool,
    pub font_size: u32,
    pub last_file: String,
    pub dark_theme: bool,
    pub panel_collapsed: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            include_keywords: String::new(),
            exclude_keywords: String::new(),
            include_case_sensitive: false,
            exclude_case_sensitive: false,
            start_time: String::new(),
            end_time: String::new(),
            word_wrap: true,
            font_size: 10,
            last_file: String::new(),
            dark_theme: false,
            panel_collapsed: false,
        }
    }
}

impl ViewerConfig {
    /// The well-known location: `logsieve.json` in the home directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Load from the given path. A missing file yields defaults; malformed
    /// JSON is a config error (the caller decides whether to fall back).
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(LogsieveError::config(format!(
                    "reading {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| {
            LogsieveError::config(format!("writing {}: {}", path.display(), e))
        })
    }

    /// The FilterSpec-relevant subset of the record.
    pub fn filter_inputs(&self) -> FilterInputs {
        FilterInputs {
            include_text: self.include_keywords.clone(),
            exclude_text: self.exclude_keywords.clone(),
            include_case_sensitive: self.include_case_sensitive,
            exclude_case_sensitive: self.exclude_case_sensitive,
            start_time_text: self.start_time.clone(),
            end_time_text: self.end_time.clone(),
        }
    }
}
