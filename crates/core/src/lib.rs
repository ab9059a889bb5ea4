//! `tally-core`: ledger foundation building blocks.
//!
//! Identifiers, exact amounts and the error model shared by the ledger
//! crates. Nothing here performs IO.

pub mod amount;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use amount::Amount;
pub use entity::Entity;
pub use error::{LedgerError, LedgerResult};
pub use id::{
    AccountId, IdGenerator, ProcessIdGenerator, SeededIdGenerator, TransactionId, generate_uuid,
};
pub use value_object::ValueObject;
