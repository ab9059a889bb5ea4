//! TOML ledger documents.
//!
//! Layout:
//!
//! ```toml
//! owner = "tjdwill"
//!
//! [67e55044-10b1-426f-9247-bb680e5fe0c8]
//! name = "Checking"
//! description = ""
//! isActive = true
//!
//! [[67e55044-10b1-426f-9247-bb680e5fe0c8.transactions]]
//! transactionId = "..."
//! otherPartyId = "00000000-0000-0000-0000-000000000000"
//! amount = "100.00"
//! timeStamp = "2025-03-01 14:02:11.123456789"
//! notes = "deposit"
//! ```
//!
//! Amounts and timestamps are strings so no precision is lost.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDateTime;
use toml::{Table, Value};

use tally_accounting::{Account, AccountBook, Timestamp, Transaction};
use tally_core::{AccountId, Amount, IdGenerator, LedgerError, LedgerResult, TransactionId};

use super::check_extension;
use super::r#trait::LedgerSerializer;

const OWNER_KEY: &str = "owner";
const ACCOUNT_NAME_KEY: &str = "name";
const ACCOUNT_DESCRIPTION_KEY: &str = "description";
const ACCOUNT_ACTIVE_KEY: &str = "isActive";
const ACCOUNT_TRANSACTIONS_KEY: &str = "transactions";
const TRANSACTION_ID_KEY: &str = "transactionId";
const TRANSACTION_OTHER_PARTY_KEY: &str = "otherPartyId";
const TRANSACTION_AMOUNT_KEY: &str = "amount";
const TRANSACTION_TIMESTAMP_KEY: &str = "timeStamp";
const TRANSACTION_NOTES_KEY: &str = "notes";

/// Date and time, UTC, fractional seconds only when non-zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(text: &str) -> LedgerResult<Timestamp> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| LedgerError::serialization(format!("malformed timestamp '{text}': {e}")))
}

/// [`LedgerSerializer`] for `.toml` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlSerializer;

impl TomlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Build a book from document text.
    pub fn from_toml_str(&self, content: &str) -> LedgerResult<AccountBook> {
        let mut document: Table = toml::from_str(content)
            .map_err(|e| LedgerError::serialization(format!("invalid TOML: {e}")))?;

        let owner = match document.remove(OWNER_KEY) {
            Some(Value::String(owner)) => owner,
            Some(_) => return Err(incorrect_type(OWNER_KEY, "document")),
            None => return Err(missing_key(OWNER_KEY, "document")),
        };

        let mut book = AccountBook::new(owner);
        for (key, value) in document {
            let Value::Table(account_table) = value else {
                return Err(LedgerError::serialization(format!(
                    "top-level key '{key}' is not an account table"
                )));
            };
            let account_id = AccountId::parse(&key).map_err(LedgerError::into_serialization)?;
            let account = read_account(&account_table, account_id)?;
            book.add_parsed_account(account)
                .map_err(LedgerError::into_serialization)?;
        }

        Ok(book)
    }

    /// Render a book as document text.
    pub fn to_toml_string<G: IdGenerator>(&self, book: &AccountBook<G>) -> LedgerResult<String> {
        let mut document = Table::new();
        document.insert(OWNER_KEY.to_string(), Value::String(book.owner().to_string()));
        for (account_id, account) in book {
            document.insert(account_id.to_string(), Value::Table(write_account(account)));
        }

        toml::to_string(&document)
            .map_err(|e| LedgerError::serialization(format!("could not render TOML: {e}")))
    }
}

impl LedgerSerializer for TomlSerializer {
    fn extension(&self) -> &'static str {
        "toml"
    }

    fn load(&self, path: &Path) -> LedgerResult<AccountBook> {
        let result = check_extension(path, self.extension()).and_then(|()| {
            let content = std::fs::read_to_string(path).map_err(|e| {
                LedgerError::serialization(format!("could not read '{}': {e}", path.display()))
            })?;
            self.from_toml_str(&content)
        });

        match &result {
            Ok(book) => tracing::info!(
                path = %path.display(),
                accounts = book.account_count(),
                "ledger loaded"
            ),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "ledger load failed"),
        }
        result
    }

    fn save<G: IdGenerator>(&self, book: &AccountBook<G>, path: &Path) -> LedgerResult<()> {
        let result = check_extension(path, self.extension())
            .and_then(|()| self.to_toml_string(book))
            .and_then(|content| write_replacing(path, &content));

        match &result {
            Ok(()) => tracing::info!(
                path = %path.display(),
                accounts = book.account_count(),
                "ledger saved"
            ),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "ledger save failed"),
        }
        result
    }
}

/// Write through a sibling temp file so a failed save leaves the old file intact.
fn write_replacing(path: &Path, content: &str) -> LedgerResult<()> {
    let io_error = |e: std::io::Error| {
        LedgerError::serialization(format!("could not write to file '{}': {e}", path.display()))
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    staged.write_all(content.as_bytes()).map_err(io_error)?;
    staged.write_all(b"\n").map_err(io_error)?;
    staged.as_file().sync_all().map_err(io_error)?;
    staged.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

fn missing_key(key: &str, context: &str) -> LedgerError {
    LedgerError::serialization(format!("missing key '{key}' in {context}"))
}

fn incorrect_type(key: &str, context: &str) -> LedgerError {
    LedgerError::serialization(format!("incorrect type for key '{key}' in {context}"))
}

fn get<'a>(table: &'a Table, key: &str, context: &str) -> LedgerResult<&'a Value> {
    table.get(key).ok_or_else(|| missing_key(key, context))
}

fn get_str<'a>(table: &'a Table, key: &str, context: &str) -> LedgerResult<&'a str> {
    get(table, key, context)?
        .as_str()
        .ok_or_else(|| incorrect_type(key, context))
}

fn get_bool(table: &Table, key: &str, context: &str) -> LedgerResult<bool> {
    get(table, key, context)?
        .as_bool()
        .ok_or_else(|| incorrect_type(key, context))
}

fn read_account(table: &Table, account_id: AccountId) -> LedgerResult<Account> {
    let context = format!("account {account_id}");
    let name = get_str(table, ACCOUNT_NAME_KEY, &context)?;
    let description = get_str(table, ACCOUNT_DESCRIPTION_KEY, &context)?;
    let is_active = get_bool(table, ACCOUNT_ACTIVE_KEY, &context)?;
    let transactions = get(table, ACCOUNT_TRANSACTIONS_KEY, &context)?
        .as_array()
        .ok_or_else(|| incorrect_type(ACCOUNT_TRANSACTIONS_KEY, &context))?;

    // New accounts start active, so the history can be replayed before the
    // stored status is applied.
    let mut account = Account::new(account_id, name, description);
    for entry in transactions {
        let transaction_table = entry
            .as_table()
            .ok_or_else(|| incorrect_type(ACCOUNT_TRANSACTIONS_KEY, &context))?;
        let transaction = read_transaction(transaction_table, account_id)?;
        account
            .log_transaction(transaction)
            .map_err(LedgerError::into_serialization)?;
    }

    if !is_active {
        account.deactivate();
    }
    Ok(account)
}

fn read_transaction(table: &Table, owning_party_id: AccountId) -> LedgerResult<Transaction> {
    let context = format!("a transaction of account {owning_party_id}");
    let transaction_id = TransactionId::parse(get_str(table, TRANSACTION_ID_KEY, &context)?)
        .map_err(LedgerError::into_serialization)?;
    let other_party_id = AccountId::parse(get_str(table, TRANSACTION_OTHER_PARTY_KEY, &context)?)
        .map_err(LedgerError::into_serialization)?;
    let amount = Amount::parse(get_str(table, TRANSACTION_AMOUNT_KEY, &context)?)
        .map_err(LedgerError::into_serialization)?;
    let timestamp = parse_timestamp(get_str(table, TRANSACTION_TIMESTAMP_KEY, &context)?)?;
    let notes = get_str(table, TRANSACTION_NOTES_KEY, &context)?;

    Ok(Transaction::new(
        transaction_id,
        owning_party_id,
        other_party_id,
        amount,
        timestamp,
        notes,
    ))
}

fn write_account(account: &Account) -> Table {
    let mut table = Table::new();
    table.insert(ACCOUNT_NAME_KEY.to_string(), Value::String(account.name().to_string()));
    table.insert(
        ACCOUNT_DESCRIPTION_KEY.to_string(),
        Value::String(account.description().to_string()),
    );
    table.insert(ACCOUNT_ACTIVE_KEY.to_string(), Value::Boolean(account.is_active()));

    let transactions = account
        .transactions()
        .map(|t| Value::Table(write_transaction(t)))
        .collect();
    table.insert(ACCOUNT_TRANSACTIONS_KEY.to_string(), Value::Array(transactions));
    table
}

fn write_transaction(transaction: &Transaction) -> Table {
    let mut table = Table::new();
    table.insert(
        TRANSACTION_ID_KEY.to_string(),
        Value::String(transaction.transaction_id().to_string()),
    );
    table.insert(
        TRANSACTION_OTHER_PARTY_KEY.to_string(),
        Value::String(transaction.other_party_id().to_string()),
    );
    table.insert(
        TRANSACTION_AMOUNT_KEY.to_string(),
        Value::String(transaction.amount().format()),
    );
    table.insert(
        TRANSACTION_TIMESTAMP_KEY.to_string(),
        Value::String(format_timestamp(&transaction.timestamp())),
    );
    table.insert(
        TRANSACTION_NOTES_KEY.to_string(),
        Value::String(transaction.notes().to_string()),
    );
    table
}
