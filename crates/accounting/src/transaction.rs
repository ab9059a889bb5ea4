use chrono::{DateTime, Utc};

use tally_core::{AccountId, Amount, TransactionId, ValueObject};

/// Point in time a transaction was made (UTC).
pub type Timestamp = DateTime<Utc>;

/// One immutable leg of a ledger entry.
///
/// `amount` is signed relative to the owning account: positive is money in,
/// negative is money out. `other_party_id` is nil for external transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    transaction_id: TransactionId,
    owning_party_id: AccountId,
    other_party_id: AccountId,
    amount: Amount,
    timestamp: Timestamp,
    notes: String,
}

impl ValueObject for Transaction {}

impl Transaction {
    pub fn new(
        transaction_id: TransactionId,
        owning_party_id: AccountId,
        other_party_id: AccountId,
        amount: Amount,
        timestamp: Timestamp,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id,
            owning_party_id,
            other_party_id,
            amount,
            timestamp,
            notes: notes.into(),
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn owning_party_id(&self) -> AccountId {
        self.owning_party_id
    }

    pub fn other_party_id(&self) -> AccountId {
        self.other_party_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Whether the other side is outside the ledger.
    pub fn is_external(&self) -> bool {
        self.other_party_id.is_nil()
    }

    /// The leg the other party records for the same transfer.
    pub fn mirrored(&self) -> Transaction {
        Transaction {
            transaction_id: self.transaction_id,
            owning_party_id: self.other_party_id,
            other_party_id: self.owning_party_id,
            amount: -self.amount,
            timestamp: self.timestamp,
            notes: self.notes.clone(),
        }
    }

    /// `a` and `b` are the two legs of one transfer: same id, timestamp and
    /// notes, negated amounts, swapped parties.
    pub fn is_pair(a: &Transaction, b: &Transaction) -> bool {
        a.transaction_id == b.transaction_id
            && a.timestamp == b.timestamp
            && a.notes == b.notes
            && a.amount == -b.amount
            && a.owning_party_id == b.other_party_id
            && a.other_party_id == b.owning_party_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn leg(amount: Amount) -> Transaction {
        Transaction::new(
            TransactionId::generate(),
            AccountId::generate(),
            AccountId::generate(),
            amount,
            Utc::now(),
            "rent",
        )
    }

    #[test]
    fn mirrored_leg_forms_a_pair() {
        let t = leg(Amount::new(dec!(100.00)));
        let m = t.mirrored();

        assert_eq!(m.owning_party_id(), t.other_party_id());
        assert_eq!(m.other_party_id(), t.owning_party_id());
        assert_eq!(m.amount(), Amount::new(dec!(-100.00)));
        assert!(Transaction::is_pair(&t, &m));
        assert!(Transaction::is_pair(&m, &t));
    }

    #[test]
    fn pair_requires_every_field_to_line_up() {
        let t = leg(Amount::new(dec!(5)));
        let m = t.mirrored();

        // Same amount sign is not a pair.
        let same_sign = Transaction::new(
            m.transaction_id(),
            m.owning_party_id(),
            m.other_party_id(),
            t.amount(),
            m.timestamp(),
            m.notes(),
        );
        assert!(!Transaction::is_pair(&t, &same_sign));

        let other_notes = Transaction::new(
            m.transaction_id(),
            m.owning_party_id(),
            m.other_party_id(),
            m.amount(),
            m.timestamp(),
            "groceries",
        );
        assert!(!Transaction::is_pair(&t, &other_notes));

        let other_time = Transaction::new(
            m.transaction_id(),
            m.owning_party_id(),
            m.other_party_id(),
            m.amount(),
            m.timestamp() + chrono::Duration::seconds(1),
            m.notes(),
        );
        assert!(!Transaction::is_pair(&t, &other_time));

        let other_id = Transaction::new(
            TransactionId::generate(),
            m.owning_party_id(),
            m.other_party_id(),
            m.amount(),
            m.timestamp(),
            m.notes(),
        );
        assert!(!Transaction::is_pair(&t, &other_id));

        // A transaction is not its own pair unless it is a zero self-transfer.
        assert!(!Transaction::is_pair(&t, &t));
    }

    #[test]
    fn external_transactions_have_a_nil_counterparty() {
        let t = Transaction::new(
            TransactionId::generate(),
            AccountId::generate(),
            AccountId::nil(),
            Amount::new(dec!(20)),
            Utc::now(),
            "",
        );
        assert!(t.is_external());
        assert!(!leg(Amount::ZERO).is_external());
    }

    #[test]
    fn equality_is_structural() {
        let t = leg(Amount::new(dec!(1.5)));
        assert_eq!(t.clone(), t);
        assert_ne!(t, t.mirrored());
    }
}
