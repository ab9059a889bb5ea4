//! The open ledger document: which book is loaded, where it lives on disk,
//! and whether it has unsaved changes.

use std::path::{Path, PathBuf};

use tally_accounting::AccountBook;
use tally_core::{LedgerError, LedgerResult};

use crate::archive::{LedgerSerializer, TomlSerializer};
use crate::preferences::Preferences;

#[derive(Debug)]
pub struct Workbook<S = TomlSerializer> {
    serializer: S,
    ledger: Option<AccountBook>,
    path: Option<PathBuf>,
    modified: bool,
    preferences: Preferences,
}

impl Workbook {
    pub fn new(preferences: Preferences) -> Self {
        Self::with_serializer(TomlSerializer, preferences)
    }
}

impl<S: LedgerSerializer> Workbook<S> {
    pub fn with_serializer(serializer: S, preferences: Preferences) -> Self {
        Self {
            serializer,
            ledger: None,
            path: None,
            modified: false,
            preferences,
        }
    }

    pub fn ledger(&self) -> Option<&AccountBook> {
        self.ledger.as_ref()
    }

    /// Mutable access to the open ledger. Marks the workbook modified.
    pub fn ledger_mut(&mut self) -> Option<&mut AccountBook> {
        if self.ledger.is_some() {
            self.set_modified(true);
        }
        self.ledger.as_mut()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn into_preferences(self) -> Preferences {
        self.preferences
    }

    fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
        self.preferences.ledger_modified = modified;
    }

    fn remember(&mut self, path: &Path) {
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.preferences.last_directory = path.parent().map(Path::to_path_buf);
        self.preferences.recent_ledger_path = Some(path.clone());
        self.path = Some(path);
    }

    /// Replace whatever is open with an empty ledger that has no file yet.
    pub fn new_ledger(&mut self, owner: impl Into<String>) {
        self.ledger = Some(AccountBook::new(owner));
        self.path = None;
        self.set_modified(false);
    }

    /// Load the ledger at `path`. On failure the current state is kept.
    pub fn open(&mut self, path: impl AsRef<Path>) -> LedgerResult<()> {
        let path = path.as_ref();
        let book = self.serializer.load(path)?;
        self.ledger = Some(book);
        self.remember(path);
        self.set_modified(false);
        Ok(())
    }

    /// Reopen the most recent ledger, if one is recorded.
    ///
    /// Returns whether a ledger was opened.
    pub fn restore_recent(&mut self) -> LedgerResult<bool> {
        match self.preferences.recent_ledger_path.clone() {
            Some(path) => self.open(path).map(|()| true),
            None => Ok(false),
        }
    }

    /// Save to the current path.
    pub fn save(&mut self) -> LedgerResult<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| LedgerError::serialization("no save path for this ledger"))?;
        self.save_as(path)
    }

    /// Save to `path` and make it the current path.
    ///
    /// The current path only changes if the save succeeds.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> LedgerResult<()> {
        let path = path.as_ref();
        let book = self
            .ledger
            .as_ref()
            .ok_or_else(|| LedgerError::serialization("no ledger is open"))?;
        self.serializer.save(book, path)?;
        self.remember(path);
        self.set_modified(false);
        Ok(())
    }

    /// Drop the open ledger without saving.
    pub fn close(&mut self) {
        self.ledger = None;
        self.path = None;
        self.set_modified(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::Amount;

    #[test]
    fn new_ledger_has_no_path_and_is_clean() {
        let mut workbook = Workbook::new(Preferences::default());
        assert!(workbook.ledger().is_none());
        assert!(workbook.ledger_mut().is_none());
        assert!(!workbook.is_modified());

        workbook.new_ledger("tjdwill");
        assert_eq!(workbook.ledger().unwrap().owner(), "tjdwill");
        assert!(workbook.path().is_none());
        assert!(!workbook.is_modified());
    }

    #[test]
    fn mutation_marks_modified_and_save_clears_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.toml");
        let mut workbook = Workbook::new(Preferences::default());
        workbook.new_ledger("me");

        let ledger = workbook.ledger_mut().unwrap();
        let a = ledger.create_account("Checking", "");
        ledger
            .make_transaction(Amount::new(dec!(10)), "seed", a, None)
            .unwrap();
        assert!(workbook.is_modified());
        assert!(workbook.preferences().ledger_modified);

        match workbook.save() {
            Err(LedgerError::Serialization(msg)) => assert!(msg.contains("no save path")),
            other => panic!("expected missing path error, got {other:?}"),
        }
        assert!(workbook.is_modified());

        workbook.save_as(&path).unwrap();
        assert!(!workbook.is_modified());
        assert!(!workbook.preferences().ledger_modified);
        assert!(workbook.path().is_some());
        assert!(workbook.preferences().recent_ledger_path.is_some());

        workbook.ledger_mut().unwrap();
        workbook.save().unwrap();
        assert!(!workbook.is_modified());
    }

    #[test]
    fn failed_save_as_keeps_the_old_path() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("book.toml");
        let mut workbook = Workbook::new(Preferences::default());
        workbook.new_ledger("me");
        workbook.save_as(&good).unwrap();
        let saved_path = workbook.path().map(Path::to_path_buf);

        workbook.ledger_mut().unwrap().create_account("x", "");
        assert!(workbook.save_as(dir.path().join("book.json")).is_err());
        assert_eq!(workbook.path().map(Path::to_path_buf), saved_path);
        assert!(workbook.is_modified());
    }

    #[test]
    fn open_updates_preferences_and_failed_open_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.toml");

        let mut writer = Workbook::new(Preferences::default());
        writer.new_ledger("me");
        writer.ledger_mut().unwrap().create_account("Savings", "");
        writer.save_as(&path).unwrap();

        let mut reader = Workbook::new(Preferences::default());
        reader.open(&path).unwrap();
        assert_eq!(reader.ledger(), writer.ledger());
        assert!(!reader.is_modified());
        let prefs = reader.preferences().clone();
        assert!(prefs.recent_ledger_path.is_some());
        assert!(prefs.last_directory.is_some());

        assert!(reader.open(dir.path().join("missing.toml")).is_err());
        assert_eq!(reader.ledger(), writer.ledger());
        assert_eq!(reader.preferences(), &prefs);
    }

    #[test]
    fn restore_recent_reopens_the_last_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.toml");

        let mut first = Workbook::new(Preferences::default());
        first.new_ledger("me");
        first.save_as(&path).unwrap();
        let prefs = first.into_preferences();

        let mut second = Workbook::new(prefs);
        assert!(second.restore_recent().unwrap());
        assert_eq!(second.ledger().unwrap().owner(), "me");

        let mut fresh = Workbook::new(Preferences::default());
        assert!(!fresh.restore_recent().unwrap());
        assert!(fresh.ledger().is_none());
    }

    #[test]
    fn close_forgets_the_ledger() {
        let mut workbook = Workbook::new(Preferences::default());
        workbook.new_ledger("me");
        workbook.ledger_mut().unwrap();
        workbook.close();
        assert!(workbook.ledger().is_none());
        assert!(workbook.path().is_none());
        assert!(!workbook.is_modified());
    }
}
