//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger crates.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Closed set of failures a ledger operation can report.
///
/// Every mutating operation that returns one of these leaves the state it was
/// called on unchanged. Callers match on the variant; the payload is a
/// human-readable cause.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Identifier text is not a canonical hyphenated uuid.
    #[error("invalid identifier format: {0}")]
    InvalidFormat(String),

    /// Decimal text could not be parsed as an amount.
    #[error("malformed amount: {0}")]
    MalformedAmount(String),

    /// No account with the requested id exists in the ledger.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// No transaction with the requested id exists in the account.
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    /// An account or transaction with this id already exists in its scope.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// The account is inactive and cannot accept transactions.
    #[error("inactive account: {0}")]
    InactiveAccount(String),

    /// Reading or writing a persisted ledger failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub fn malformed_amount(msg: impl Into<String>) -> Self {
        Self::MalformedAmount(msg.into())
    }

    pub fn account_not_found(id: impl core::fmt::Display) -> Self {
        Self::AccountNotFound(format!("account with id {id} does not exist"))
    }

    pub fn transaction_not_found(id: impl core::fmt::Display) -> Self {
        Self::TransactionNotFound(format!("transaction with id {id} does not exist"))
    }

    pub fn duplicate_id(msg: impl Into<String>) -> Self {
        Self::DuplicateId(msg.into())
    }

    pub fn inactive_account(id: impl core::fmt::Display) -> Self {
        Self::InactiveAccount(format!("account {id} is inactive"))
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Re-label any error as a serialization failure, keeping its message.
    ///
    /// Used by the persistence layer so a failed load reports a single kind.
    pub fn into_serialization(self) -> Self {
        match self {
            Self::Serialization(_) => self,
            other => Self::Serialization(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_id() {
        let err = LedgerError::account_not_found("abc");
        assert_eq!(
            err.to_string(),
            "account not found: account with id abc does not exist"
        );
    }

    #[test]
    fn into_serialization_wraps_other_kinds() {
        let err = LedgerError::duplicate_id("transaction x already exists").into_serialization();
        match err {
            LedgerError::Serialization(msg) => assert!(msg.contains("transaction x already exists")),
            other => panic!("expected serialization error, got {other:?}"),
        }

        let already = LedgerError::serialization("bad file");
        assert_eq!(already.clone().into_serialization(), already);
    }
}
