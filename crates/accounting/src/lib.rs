//! Ledger domain: transactions, accounts and the account book.
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod account;
pub mod book;
pub mod display;
pub mod transaction;

pub use account::{Account, AccountStatus};
pub use book::AccountBook;
pub use display::{AccountSummary, TransactionRow, short_label, transaction_rows};
pub use transaction::{Timestamp, Transaction};
