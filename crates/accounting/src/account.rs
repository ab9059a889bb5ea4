//! A named account: ordered transactions plus a derived balance.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use tally_core::{AccountId, Amount, Entity, LedgerError, LedgerResult, TransactionId};

use crate::transaction::Transaction;

/// Account lifecycle. Only active accounts accept transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

/// An account and everything ever logged into it.
///
/// `balance` always equals the sum of the logged amounts; it is never set
/// directly. Transactions are keyed (and iterated) by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    name: String,
    description: String,
    balance: Amount,
    transactions: BTreeMap<TransactionId, Transaction>,
    status: AccountStatus,
}

impl Account {
    /// Fresh, active account with no transactions.
    pub fn new(id: AccountId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            balance: Amount::ZERO,
            transactions: BTreeMap::new(),
            status: AccountStatus::Active,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn activate(&mut self) {
        self.status = AccountStatus::Active;
    }

    pub fn deactivate(&mut self) {
        self.status = AccountStatus::Inactive;
    }

    pub fn contains(&self, transaction_id: TransactionId) -> bool {
        self.transactions.contains_key(&transaction_id)
    }

    pub fn transaction(&self, transaction_id: TransactionId) -> LedgerResult<&Transaction> {
        self.transactions
            .get(&transaction_id)
            .ok_or_else(|| LedgerError::transaction_not_found(transaction_id))
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions.values()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, TransactionId, Transaction> {
        self.transactions.iter()
    }

    /// Check that `transaction` could be logged, without logging it.
    pub fn check_loggable(&self, transaction: &Transaction) -> LedgerResult<()> {
        self.next_balance(transaction).map(|_| ())
    }

    fn next_balance(&self, transaction: &Transaction) -> LedgerResult<Amount> {
        if !self.is_active() {
            return Err(LedgerError::inactive_account(self.id));
        }
        if self.contains(transaction.transaction_id()) {
            return Err(LedgerError::duplicate_id(format!(
                "transaction {} already exists in account {}",
                transaction.transaction_id(),
                self.id
            )));
        }
        self.balance
            .checked_add(transaction.amount())
            .ok_or_else(|| {
                LedgerError::malformed_amount(format!(
                    "balance of account {} would overflow",
                    self.id
                ))
            })
    }

    /// Record `transaction` and fold its amount into the balance.
    ///
    /// On error the account is untouched.
    pub fn log_transaction(&mut self, transaction: Transaction) -> LedgerResult<()> {
        let balance = self.next_balance(&transaction)?;

        tracing::debug!(
            account_id = %self.id,
            transaction_id = %transaction.transaction_id(),
            amount = %transaction.amount(),
            "transaction logged"
        );
        self.transactions
            .insert(transaction.transaction_id(), transaction);
        self.balance = balance;
        Ok(())
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl<'a> IntoIterator for &'a Account {
    type Item = (&'a TransactionId, &'a Transaction);
    type IntoIter = btree_map::Iter<'a, TransactionId, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
