//! Adapter Core - Stable interface between the pool and asset custody
//!
//! This crate defines what the pool engine needs from the outside world to
//! move assets, and nothing more:
//! - `Address`: 32-byte identity for parties, assets, and the pool itself
//! - `AssetLedger`: pull/push/balance capability for one fungible asset
//! - `TransferError`: why a movement was refused
//!
//! `MockAsset` is an in-memory `AssetLedger` with mint/approve/pause
//! controls, used by tests and the CLI simulator.
//!
//! # Design Principles
//! - no_std + alloc so the interface carries no runtime assumptions
//! - One ledger per asset; the pool is handed both for every operation
//! - Ledgers report failures as values, never panics

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

pub mod mock;

pub use mock::MockAsset;

// ============================================================================
// Identities
// ============================================================================

/// Party, asset, or pool identity
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The null identity (all zeroes)
    pub const NULL: Self = Self([0u8; 32]);

    /// Check if this is the null identity
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Deterministic identity from a short human label
    ///
    /// The label's bytes are copied into the front of the address and the
    /// rest is zero-filled, so `from_label("alice")` is stable across runs.
    pub fn from_label(label: &str) -> Result<Self, AddressError> {
        let bytes = label.as_bytes();
        if bytes.is_empty() {
            return Err(AddressError::Empty);
        }
        if bytes.len() > 32 {
            return Err(AddressError::TooLong);
        }
        if bytes.iter().any(|b| !b.is_ascii_graphic()) {
            return Err(AddressError::InvalidLabel);
        }

        let mut out = [0u8; 32];
        out[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Recover the label of an address built by `from_label`
    pub fn as_label(&self) -> Option<&str> {
        let end = self.0.iter().position(|b| *b == 0).unwrap_or(32);
        if end == 0 || self.0[end..].iter().any(|b| *b != 0) {
            return None;
        }
        let head = &self.0[..end];
        if head.iter().any(|b| !b.is_ascii_graphic()) {
            return None;
        }
        core::str::from_utf8(head).ok()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(&self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_label() {
            Some(label) => write!(f, "Address({})", label),
            None => write!(f, "Address({})", self),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parse a base58-encoded 32-byte address
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: Vec<u8> = bs58::decode(s)
            .into_vec()
            .map_err(|_| AddressError::InvalidBase58)?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength)?;
        Ok(Self(array))
    }
}

impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AddressVisitor;

        impl serde::de::Visitor<'_> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a base58-encoded 32-byte address")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Address, E> {
                Address::from_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}

/// Address parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// Label is empty
    Empty,
    /// Label is longer than 32 bytes
    TooLong,
    /// Label contains whitespace or non-ASCII bytes
    InvalidLabel,
    /// Not valid base58
    InvalidBase58,
    /// Decoded to something other than 32 bytes
    InvalidLength,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            AddressError::Empty => "label is empty",
            AddressError::TooLong => "label is longer than 32 bytes",
            AddressError::InvalidLabel => "label must be printable ASCII without spaces",
            AddressError::InvalidBase58 => "not a base58 string",
            AddressError::InvalidLength => "address must decode to 32 bytes",
        };
        f.write_str(msg)
    }
}

// ============================================================================
// Asset Movements
// ============================================================================

/// Why an asset ledger refused a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    /// Sender holds less than the amount
    InsufficientBalance,
    /// Spender was not approved for the amount
    InsufficientAllowance,
    /// Recipient is the null identity
    NullAddress,
    /// Asset is paused
    Paused,
    /// Recipient balance would overflow
    Overflow,
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TransferError::InsufficientBalance => "insufficient balance",
            TransferError::InsufficientAllowance => "insufficient allowance",
            TransferError::NullAddress => "transfer to the null address",
            TransferError::Paused => "asset is paused",
            TransferError::Overflow => "balance overflow",
        };
        f.write_str(msg)
    }
}

/// Capability to move one fungible asset
///
/// The pool calls `transfer_from` to pull a party's asset into its custody
/// (the pool is both the recipient and the approved spender) and `transfer`
/// to push from its own custody to a party. Implementations must either
/// apply a movement completely or return an error without side effects.
///
/// `check_transfer` and `check_transfer_from` answer whether the matching
/// movement would be accepted right now. A movement that passed its check
/// must succeed if nothing touched the ledger in between.
pub trait AssetLedger {
    /// Identity of the asset this ledger moves
    fn asset_id(&self) -> Address;

    /// Balance held by `party`
    fn balance_of(&self, party: &Address) -> u128;

    /// Move `amount` from `from` to `to`, spending `to`'s allowance from `from`
    fn transfer_from(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError>;

    /// Move `amount` that `from` holds to `to`
    fn transfer(&mut self, from: &Address, to: &Address, amount: u128)
        -> Result<(), TransferError>;

    /// Dry run of `transfer_from`
    fn check_transfer_from(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError>;

    /// Dry run of `transfer`
    fn check_transfer(&self, from: &Address, to: &Address, amount: u128)
        -> Result<(), TransferError>;
}
