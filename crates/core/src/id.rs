//! Strongly-typed identifiers and the generators that mint them.
//!
//! Identifiers are opaque 128-bit uuids with one canonical text form
//! (lowercase, hyphenated). The all-zero value is reserved as the nil
//! sentinel meaning "no party / external". An identifier can only be obtained
//! by generating it, by parsing canonical text, or by asking for `nil()`.

use core::str::FromStr;
use std::sync::{Mutex, OnceLock, PoisonError};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::{Builder, Uuid};

use crate::error::{LedgerError, LedgerResult};

/// Source of fresh random uuids.
///
/// Ledgers own one of these so tests can substitute a deterministic source.
/// Implementations are not required to avoid collisions; callers that need
/// uniqueness within a scope re-draw on their own.
pub trait IdGenerator {
    fn next_uuid(&mut self) -> Uuid;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_uuid(&mut self) -> Uuid {
        (**self).next_uuid()
    }
}

static PROCESS_RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

fn process_rng() -> &'static Mutex<StdRng> {
    PROCESS_RNG.get_or_init(|| {
        tracing::debug!("seeding process-wide id generator from OS entropy");
        Mutex::new(StdRng::from_entropy())
    })
}

fn random_v4(rng: &mut impl RngCore) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

/// Draw a version 4 uuid from the process-wide generator.
///
/// The generator is seeded once from OS entropy on first use and lives for the
/// rest of the process. First use is synchronized, so concurrent callers are
/// fine.
pub fn generate_uuid() -> Uuid {
    let mut rng = process_rng()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    random_v4(&mut *rng)
}

/// Generator backed by the process-wide, entropy-seeded rng.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessIdGenerator;

impl IdGenerator for ProcessIdGenerator {
    fn next_uuid(&mut self) -> Uuid {
        generate_uuid()
    }
}

/// Deterministic generator for reproducible runs.
#[derive(Debug, Clone)]
pub struct SeededIdGenerator {
    rng: StdRng,
}

impl SeededIdGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IdGenerator for SeededIdGenerator {
    fn next_uuid(&mut self) -> Uuid {
        random_v4(&mut self.rng)
    }
}

const CANONICAL_LEN: usize = 36;

fn parse_canonical(text: &str) -> Result<Uuid, String> {
    // 36 bytes is the only length uuid accepts for the hyphenated form.
    if text.len() != CANONICAL_LEN {
        return Err(format!(
            "expected {CANONICAL_LEN} characters in grouped-hex form, got '{text}'"
        ));
    }
    Uuid::parse_str(text).map_err(|e| format!("'{text}': {e}"))
}

/// Identifier of an account within a ledger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(Uuid);

/// Identifier shared by the legs of one transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// The reserved all-zero identifier.
            pub const fn nil() -> Self {
                Self(Uuid::nil())
            }

            /// Fresh random identifier from the process-wide generator.
            pub fn generate() -> Self {
                Self::generate_with(&mut ProcessIdGenerator)
            }

            /// Fresh identifier drawn from `generator`. Never nil.
            pub fn generate_with<G: IdGenerator + ?Sized>(generator: &mut G) -> Self {
                loop {
                    let uuid = generator.next_uuid();
                    if !uuid.is_nil() {
                        return Self(uuid);
                    }
                }
            }

            /// Parse the canonical hyphenated form.
            pub fn parse(text: &str) -> LedgerResult<Self> {
                parse_canonical(text)
                    .map(Self)
                    .map_err(|e| LedgerError::invalid_format(format!("{}: {}", $name, e)))
            }

            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::nil()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                Self::parse(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_uuid_newtype!(AccountId, "AccountId");
impl_uuid_newtype!(TransactionId, "TransactionId");
