//! View-facing projections of ledger state.
//!
//! Plain data for whatever renders the ledger; no formatting decisions beyond
//! turning amounts into two-decimal text.

use tally_core::{AccountId, IdGenerator, LedgerResult, TransactionId};

use crate::account::Account;
use crate::book::AccountBook;
use crate::transaction::{Timestamp, Transaction};

/// One row of an account list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub name: String,
    pub description: String,
    pub balance: String,
    pub is_active: bool,
}

impl AccountSummary {
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.account_id(),
            name: account.name().to_string(),
            description: account.description().to_string(),
            balance: account.balance().to_currency_string(),
            is_active: account.is_active(),
        }
    }
}

/// One row of an account's transaction history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub timestamp: Timestamp,
    pub amount: String,
    pub notes: String,
    /// Empty for external transactions.
    pub counterparty_name: String,
    pub transaction_id: TransactionId,
    pub other_party_id: AccountId,
}

impl TransactionRow {
    /// Fails with `AccountNotFound` if the counterparty is not in `book`.
    pub fn from_transaction<G: IdGenerator>(
        transaction: &Transaction,
        book: &AccountBook<G>,
    ) -> LedgerResult<Self> {
        let counterparty_name = book
            .counterparty(transaction)?
            .map(|account| account.name().to_string())
            .unwrap_or_default();

        Ok(Self {
            timestamp: transaction.timestamp(),
            amount: transaction.amount().to_currency_string(),
            notes: transaction.notes().to_string(),
            counterparty_name,
            transaction_id: transaction.transaction_id(),
            other_party_id: transaction.other_party_id(),
        })
    }
}

/// History rows for one account, newest first.
pub fn transaction_rows<G: IdGenerator>(
    account: &Account,
    book: &AccountBook<G>,
) -> LedgerResult<Vec<TransactionRow>> {
    let mut rows = account
        .transactions()
        .map(|t| TransactionRow::from_transaction(t, book))
        .collect::<LedgerResult<Vec<_>>>()?;
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(rows)
}

/// `"<name> (<first uuid group>)"`, enough to tell same-named accounts apart.
pub fn short_label(name: &str, id: AccountId) -> String {
    let text = id.to_string();
    let head = text.split('-').next().unwrap_or(&text);
    format!("{name} ({head})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::{Amount, LedgerError};

    #[test]
    fn summary_shows_two_decimal_balance() {
        let mut book = AccountBook::new("owner");
        let a = book.create_account("Savings", "rainy day");
        book.make_transaction(Amount::new(dec!(1234.5)), "", a, None)
            .unwrap();
        book.deactivate(a).unwrap();

        let summary = AccountSummary::from_account(book.account(a).unwrap());
        assert_eq!(summary.name, "Savings");
        assert_eq!(summary.description, "rainy day");
        assert_eq!(summary.balance, "1234.50");
        assert!(!summary.is_active);
        assert_eq!(summary.id, a);
    }

    #[test]
    fn rows_name_the_counterparty() {
        let mut book = AccountBook::new("owner");
        let a = book.create_account("Checking", "");
        let b = book.create_account("Rent", "");
        book.make_transaction(Amount::new(dec!(50)), "paycheck", a, None)
            .unwrap();
        let tid = book
            .make_transaction(Amount::new(dec!(-20)), "rent", a, Some(b))
            .unwrap();

        let rows = transaction_rows(book.account(a).unwrap(), &book).unwrap();
        assert_eq!(rows.len(), 2);
        let transfer = rows.iter().find(|r| r.transaction_id == tid).unwrap();
        assert_eq!(transfer.counterparty_name, "Rent");
        assert_eq!(transfer.amount, "-20.00");
        assert_eq!(transfer.other_party_id, b);

        let external = rows.iter().find(|r| r.transaction_id != tid).unwrap();
        assert_eq!(external.counterparty_name, "");
        assert!(external.other_party_id.is_nil());
        assert!(rows[0].timestamp >= rows[1].timestamp);
    }

    #[test]
    fn unknown_counterparty_is_an_error() {
        let book = AccountBook::new("owner");
        let orphan = Transaction::new(
            TransactionId::generate(),
            AccountId::generate(),
            AccountId::generate(),
            Amount::ZERO,
            chrono::Utc::now(),
            "",
        );
        assert!(matches!(
            TransactionRow::from_transaction(&orphan, &book),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn short_label_uses_first_group() {
        let id = AccountId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(short_label("Checking", id), "Checking (67e55044)");
    }
}
