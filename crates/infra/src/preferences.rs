//! User preferences persisted between sessions.
//!
//! Small TOML file holding which ledger was open last and whether it had
//! unsaved changes when the session ended.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tally_core::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Most recently opened or saved ledger file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_ledger_path: Option<PathBuf>,

    /// Directory the last ledger was opened from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_directory: Option<PathBuf>,

    /// True while the open ledger has unsaved changes. Still true at startup
    /// means the previous session ended without saving.
    pub ledger_modified: bool,
}

impl Preferences {
    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no preferences file; using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::serialization(format!("could not read '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> LedgerResult<Self> {
        toml::from_str(content)
            .map_err(|e| LedgerError::serialization(format!("invalid preferences: {e}")))
    }

    pub fn to_toml_string(&self) -> LedgerResult<String> {
        toml::to_string(self)
            .map_err(|e| LedgerError::serialization(format!("could not render preferences: {e}")))
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> LedgerResult<()> {
        let path = path.as_ref();
        let io_error = |e: std::io::Error| {
            LedgerError::serialization(format!("could not write '{}': {e}", path.display()))
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, self.to_toml_string()?).map_err(io_error)?;
        tracing::debug!(path = %path.display(), "preferences saved");
        Ok(())
    }

    /// True if the previous session left unsaved changes behind.
    pub fn previous_session_unsaved(&self) -> bool {
        self.ledger_modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(dir.path().join("prefs.toml")).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert!(!prefs.previous_session_unsaved());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");
        let prefs = Preferences {
            recent_ledger_path: Some(PathBuf::from("/home/me/budget.toml")),
            last_directory: Some(PathBuf::from("/home/me")),
            ledger_modified: true,
        };

        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let prefs = Preferences::from_toml_str("ledger_modified = true\n").unwrap();
        assert!(prefs.ledger_modified);
        assert!(prefs.recent_ledger_path.is_none());

        let empty = Preferences::default().to_toml_string().unwrap();
        assert_eq!(Preferences::from_toml_str(&empty).unwrap(), Preferences::default());
    }

    #[test]
    fn malformed_preferences_are_serialization_errors() {
        assert!(matches!(
            Preferences::from_toml_str("ledger_modified = \"yes\""),
            Err(LedgerError::Serialization(_))
        ));
    }
}
