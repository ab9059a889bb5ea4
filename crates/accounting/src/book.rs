//! The account book: root aggregate owning every account of one owner.
//!
//! All mutation goes through here. Transfers between two accounts are logged
//! as a pair of mirrored transactions sharing one id and one timestamp;
//! single-sided transactions record the nil id as the other party.

use std::collections::BTreeMap;
use std::collections::btree_map::{self, Entry};

use chrono::Utc;

use tally_core::{
    AccountId, Amount, IdGenerator, LedgerError, LedgerResult, ProcessIdGenerator, TransactionId,
};

use crate::account::Account;
use crate::transaction::Transaction;

/// A ledger: one owner, many accounts keyed by id.
///
/// `G` is the source of fresh identifiers; it defaults to the process-wide
/// generator. Equality ignores the generator.
#[derive(Debug, Clone)]
pub struct AccountBook<G = ProcessIdGenerator> {
    owner: String,
    accounts: BTreeMap<AccountId, Account>,
    generator: G,
}

impl AccountBook {
    pub fn new(owner: impl Into<String>) -> Self {
        Self::with_generator(owner, ProcessIdGenerator)
    }
}

impl<G: IdGenerator> AccountBook<G> {
    pub fn with_generator(owner: impl Into<String>, generator: G) -> Self {
        Self {
            owner: owner.into(),
            accounts: BTreeMap::new(),
            generator,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn contains(&self, account_id: AccountId) -> bool {
        self.accounts.contains_key(&account_id)
    }

    pub fn account(&self, account_id: AccountId) -> LedgerResult<&Account> {
        self.accounts
            .get(&account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    pub fn account_mut(&mut self, account_id: AccountId) -> LedgerResult<&mut Account> {
        self.accounts
            .get_mut(&account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> + '_ {
        self.accounts.values()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, AccountId, Account> {
        self.accounts.iter()
    }

    /// Open a new, empty, active account and return its id.
    ///
    /// Ids are re-drawn until one is free in this book.
    pub fn create_account(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> AccountId {
        // Unbounded: a generator that only ever repeats taken ids spins here.
        let account_id = loop {
            let candidate = AccountId::generate_with(&mut self.generator);
            if !self.accounts.contains_key(&candidate) {
                break candidate;
            }
        };

        let account = Account::new(account_id, name, description);
        tracing::debug!(account_id = %account_id, name = account.name(), "account created");
        self.accounts.insert(account_id, account);
        account_id
    }

    /// Insert an account rebuilt from persisted state.
    ///
    /// Fails with `DuplicateId` if the id is taken; the book is unchanged.
    pub fn add_parsed_account(&mut self, account: Account) -> LedgerResult<()> {
        match self.accounts.entry(account.account_id()) {
            Entry::Occupied(existing) => Err(LedgerError::duplicate_id(format!(
                "account with id {} already exists with name '{}'",
                existing.key(),
                existing.get().name()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }

    pub fn activate(&mut self, account_id: AccountId) -> LedgerResult<()> {
        self.account_mut(account_id)?.activate();
        tracing::debug!(account_id = %account_id, "account activated");
        Ok(())
    }

    pub fn deactivate(&mut self, account_id: AccountId) -> LedgerResult<()> {
        self.account_mut(account_id)?.deactivate();
        tracing::debug!(account_id = %account_id, "account deactivated");
        Ok(())
    }

    fn ensure_active(&self, account_id: AccountId) -> LedgerResult<()> {
        if self.account(account_id)?.is_active() {
            Ok(())
        } else {
            Err(LedgerError::inactive_account(account_id))
        }
    }

    /// Record `amount` against `primary_id`, mirrored into `secondary_id` when given.
    ///
    /// A positive amount is an inflow to the primary account and, for a
    /// transfer, an outflow from the secondary. Without a secondary the other
    /// party is external (nil). Both accounts are validated before anything is
    /// logged.
    pub fn make_transaction(
        &mut self,
        amount: Amount,
        notes: impl Into<String>,
        primary_id: AccountId,
        secondary_id: Option<AccountId>,
    ) -> LedgerResult<TransactionId> {
        self.ensure_active(primary_id)?;
        if let Some(secondary_id) = secondary_id {
            self.ensure_active(secondary_id)?;
            if secondary_id == primary_id {
                return Err(LedgerError::duplicate_id(format!(
                    "account {primary_id} cannot transfer to itself"
                )));
            }
        }

        // Unique within the involved accounts only, not ledger-wide.
        let transaction_id = loop {
            let candidate = TransactionId::generate_with(&mut self.generator);
            let taken = self.account(primary_id)?.contains(candidate)
                || match secondary_id {
                    Some(secondary_id) => self.account(secondary_id)?.contains(candidate),
                    None => false,
                };
            if !taken {
                break candidate;
            }
        };
        let timestamp = Utc::now();

        let primary_leg = Transaction::new(
            transaction_id,
            primary_id,
            secondary_id.unwrap_or_default(),
            amount,
            timestamp,
            notes,
        );
        let secondary_leg = secondary_id.map(|_| primary_leg.mirrored());

        self.account(primary_id)?.check_loggable(&primary_leg)?;
        if let (Some(secondary_id), Some(leg)) = (secondary_id, &secondary_leg) {
            self.account(secondary_id)?.check_loggable(leg)?;
        }

        self.account_mut(primary_id)?.log_transaction(primary_leg)?;
        if let (Some(secondary_id), Some(leg)) = (secondary_id, secondary_leg) {
            self.account_mut(secondary_id)?.log_transaction(leg)?;
        }

        tracing::debug!(
            transaction_id = %transaction_id,
            primary = %primary_id,
            secondary = ?secondary_id.map(|id| id.to_string()),
            amount = %amount,
            "transaction made"
        );
        Ok(transaction_id)
    }

    /// Every leg recorded under `transaction_id`, across all accounts.
    pub fn find_transaction(&self, transaction_id: TransactionId) -> Vec<&Transaction> {
        self.accounts
            .values()
            .filter_map(|account| account.transaction(transaction_id).ok())
            .collect()
    }

    /// The account on the other side of `transaction`, `None` if external.
    pub fn counterparty(&self, transaction: &Transaction) -> LedgerResult<Option<&Account>> {
        if transaction.is_external() {
            return Ok(None);
        }
        self.account(transaction.other_party_id()).map(Some)
    }

    /// Sum of every account balance. Transfers cancel out.
    ///
    /// Fails with `MalformedAmount` if the sum leaves the decimal range,
    /// which individually valid balances can still do.
    pub fn total_balance(&self) -> LedgerResult<Amount> {
        self.accounts
            .values()
            .try_fold(Amount::ZERO, |total, account| {
                total.checked_add(account.balance()).ok_or_else(|| {
                    LedgerError::malformed_amount(format!(
                        "total balance overflows after account {}",
                        account.account_id()
                    ))
                })
            })
    }
}

impl<G> PartialEq for AccountBook<G> {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.accounts == other.accounts
    }
}

impl<G> Eq for AccountBook<G> {}

impl<'a, G> IntoIterator for &'a AccountBook<G> {
    type Item = (&'a AccountId, &'a Account);
    type IntoIter = btree_map::Iter<'a, AccountId, Account>;

    fn into_iter(self) -> Self::IntoIter {
        self.accounts.iter()
    }
}
