//! Infrastructure layer: ledger files on disk, user preferences and the
//! open-document session that ties them together.

pub mod archive;
pub mod preferences;
pub mod workbook;


pub use archive::{LedgerSerializer, TomlSerializer, load_ledger, save_ledger};
pub use preferences::Preferences;
pub use workbook::Workbook;
