use std::path::Path;

use tally_accounting::AccountBook;
use tally_core::{IdGenerator, LedgerResult};

/// Reads and writes a whole account book at a filesystem path.
///
/// Implementations map every failure (IO, malformed document, replay errors)
/// to `LedgerError::Serialization` and never hand back a partial book.
///
/// ## Round trip
///
/// For any book `b`, `load(p)` after `save(&b, p)` returns a book equal to
/// `b`: same owner, accounts, transactions, balances and statuses.
pub trait LedgerSerializer {
    /// File extension (without the dot) this format reads and writes.
    fn extension(&self) -> &'static str;

    fn load(&self, path: &Path) -> LedgerResult<AccountBook>;

    fn save<G: IdGenerator>(&self, book: &AccountBook<G>, path: &Path) -> LedgerResult<()>;
}
