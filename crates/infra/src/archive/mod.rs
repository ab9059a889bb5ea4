//! Persisted ledger files.
//!
//! A ledger is saved as one structured text document and loaded back by
//! replaying each transaction through the same logging path used at runtime,
//! so a loaded book satisfies every runtime invariant.

pub mod r#trait;
pub mod toml_file;

use std::path::Path;

use tally_accounting::AccountBook;
use tally_core::{IdGenerator, LedgerError, LedgerResult};

pub use r#trait::LedgerSerializer;
pub use toml_file::TomlSerializer;

/// Load a ledger with a default-constructed serializer `S`.
pub fn load_ledger<S>(path: impl AsRef<Path>) -> LedgerResult<AccountBook>
where
    S: LedgerSerializer + Default,
{
    S::default().load(path.as_ref())
}

/// Save a ledger with a default-constructed serializer `S`.
pub fn save_ledger<S, G>(book: &AccountBook<G>, path: impl AsRef<Path>) -> LedgerResult<()>
where
    S: LedgerSerializer + Default,
    G: IdGenerator,
{
    S::default().save(book, path.as_ref())
}

/// Reject paths whose extension is not `expected`.
pub(crate) fn check_extension(path: &Path, expected: &str) -> LedgerResult<()> {
    let actual = path.extension().and_then(|ext| ext.to_str());
    if actual == Some(expected) {
        return Ok(());
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Err(LedgerError::serialization(format!(
        "invalid file extension. Expected {}. Got {}",
        Path::new(&file_name).with_extension(expected).display(),
        file_name
    )))
}
