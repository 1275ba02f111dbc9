//! BIP44 account paths.
//!
//! The Lisk app addresses keys by a fully hardened three-level path:
//!
//! ```text
//! m / 44' / 134' / account'
//! ```
//!
//! Each element is sent as a 4-byte big-endian word with the hardened bit
//! (`0x8000_0000`) set, so the serialized path is always 12 bytes.
//!
//! The coin type is fixed to Lisk (`134`). [`LedgerAccount::with_coin_index`]
//! validates its argument and then keeps `134` regardless; the device app
//! only serves one chain.
//!
//! # Example
//!
//! ```
//! use lisk_ledger_core::path::LedgerAccount;
//!
//! let account = LedgerAccount::new(1u32).unwrap();
//! let path = account.derive_path();
//!
//! assert_eq!(path.len(), 12);
//! assert_eq!(path.to_string(), "m/44'/134'/1'");
//! assert_eq!(&path.as_bytes()[..4], &[0x80, 0x00, 0x00, 0x2C]);
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// BIP44 purpose.
pub const PURPOSE: u32 = 44;

/// SLIP-44 coin type for Lisk.
pub const LISK_COIN_TYPE: u32 = 134;

/// Hardened derivation flag.
pub const HARDENED: u32 = 0x8000_0000;

/// Deepest path the device accepts.
pub const MAX_PATH_DEPTH: usize = 10;

/// A single non-hardened path index, guaranteed to fit below [`HARDENED`].
///
/// Built through `TryFrom` so that negative, fractional and oversized
/// values are rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PathIndex(u32);

impl PathIndex {
    /// Index `0`.
    pub const ZERO: Self = Self(0);

    /// Returns the raw index.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the index with the hardened bit set.
    #[must_use]
    pub const fn hardened(self) -> u32 {
        self.0 | HARDENED
    }
}

impl TryFrom<u32> for PathIndex {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        if value >= HARDENED {
            return Err(Error::InvalidPath(format!(
                "index {value} does not fit a hardened element"
            )));
        }
        Ok(Self(value))
    }
}

impl TryFrom<i64> for PathIndex {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        if value < 0 {
            return Err(Error::InvalidPath(format!(
                "index must be non-negative, got {value}"
            )));
        }
        u32::try_from(value)
            .map_err(|_| Error::InvalidPath(format!("index {value} is out of range")))?
            .try_into()
    }
}

impl TryFrom<i32> for PathIndex {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        i64::from(value).try_into()
    }
}

impl TryFrom<usize> for PathIndex {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        u32::try_from(value)
            .map_err(|_| Error::InvalidPath(format!("index {value} is out of range")))?
            .try_into()
    }
}

impl TryFrom<f64> for PathIndex {
    type Error = Error;

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is checked to be a non-negative integer below 2^31"
    )]
    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(Error::InvalidPath(format!(
                "index must be an integer, got {value}"
            )));
        }
        if value < 0.0 {
            return Err(Error::InvalidPath(format!(
                "index must be non-negative, got {value}"
            )));
        }
        if value >= f64::from(HARDENED) {
            return Err(Error::InvalidPath(format!(
                "index {value} does not fit a hardened element"
            )));
        }
        Ok(Self(value as u32))
    }
}

impl From<PathIndex> for u32 {
    fn from(index: PathIndex) -> Self {
        index.0
    }
}

impl fmt::Display for PathIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An account on the device: `m/44'/134'/account'`.
///
/// Immutable; build a new one to address another account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedgerAccount {
    account: PathIndex,
    coin_index: u32,
}

impl Default for PathIndex {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Default for LedgerAccount {
    fn default() -> Self {
        Self {
            account: PathIndex::ZERO,
            coin_index: LISK_COIN_TYPE,
        }
    }
}

impl LedgerAccount {
    /// Creates the account with the given index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if `account` is negative, fractional or
    /// not below `2^31`.
    pub fn new<I>(account: I) -> Result<Self>
    where
        I: TryInto<PathIndex, Error = Error>,
    {
        Ok(Self {
            account: account.try_into()?,
            coin_index: LISK_COIN_TYPE,
        })
    }

    /// Returns a copy addressing a different account index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for invalid indices.
    pub fn with_account<I>(self, account: I) -> Result<Self>
    where
        I: TryInto<PathIndex, Error = Error>,
    {
        Ok(Self {
            account: account.try_into()?,
            ..self
        })
    }

    /// Validates a coin index and keeps the Lisk coin type.
    ///
    /// The argument is checked like any path index, but the account always
    /// derives with [`LISK_COIN_TYPE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for invalid indices.
    pub fn with_coin_index<I>(self, coin_index: I) -> Result<Self>
    where
        I: TryInto<PathIndex, Error = Error>,
    {
        let requested: PathIndex = coin_index.try_into()?;
        if requested.value() != LISK_COIN_TYPE {
            log::warn!("coin index {requested} requested, deriving with {LISK_COIN_TYPE}");
        }
        Ok(Self {
            coin_index: LISK_COIN_TYPE,
            ..self
        })
    }

    /// Returns the account index.
    #[must_use]
    pub const fn account(&self) -> PathIndex {
        self.account
    }

    /// Returns the coin type used for derivation.
    #[must_use]
    pub const fn coin_index(&self) -> u32 {
        self.coin_index
    }

    /// Derives the hardened path `[44', coin', account']`.
    #[must_use]
    pub fn derive_path(&self) -> DerivedPath {
        DerivedPath::from_elements(&[
            PURPOSE | HARDENED,
            self.coin_index | HARDENED,
            self.account.hardened(),
        ])
    }
}

/// A serialized derivation path: 4-byte big-endian words, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivedPath {
    bytes: Vec<u8>,
}

impl DerivedPath {
    fn from_elements(elements: &[u32]) -> Self {
        Self {
            bytes: elements.iter().flat_map(|e| e.to_be_bytes()).collect(),
        }
    }

    /// Wraps a caller-supplied path buffer, bypassing derivation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] unless the buffer holds 1 to
    /// [`MAX_PATH_DEPTH`] whole 4-byte words.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() || bytes.len() % 4 != 0 {
            return Err(Error::InvalidPath(format!(
                "path buffer of {} bytes is not a whole number of words",
                bytes.len()
            )));
        }
        if bytes.len() / 4 > MAX_PATH_DEPTH {
            return Err(Error::InvalidPath(format!(
                "path depth {} exceeds {MAX_PATH_DEPTH}",
                bytes.len() / 4
            )));
        }
        Ok(Self { bytes })
    }

    /// Returns the serialized path.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the serialized length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the path has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the number of 4-byte words, as sent ahead of the path.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "depth is bounded by MAX_PATH_DEPTH"
    )]
    #[must_use]
    pub fn word_count(&self) -> u8 {
        (self.bytes.len() / 4) as u8
    }

    /// Decodes the path elements, hardened bit included.
    #[must_use]
    pub fn elements(&self) -> Vec<u32> {
        self.bytes
            .chunks_exact(4)
            .map(|w| u32::from_be_bytes([w[0], w[1], w[2], w[3]]))
            .collect()
    }
}

impl From<LedgerAccount> for DerivedPath {
    fn from(account: LedgerAccount) -> Self {
        account.derive_path()
    }
}

impl From<&LedgerAccount> for DerivedPath {
    fn from(account: &LedgerAccount) -> Self {
        account.derive_path()
    }
}

impl From<&Self> for DerivedPath {
    fn from(path: &Self) -> Self {
        path.clone()
    }
}

impl fmt::Display for DerivedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for element in self.elements() {
            if element & HARDENED == 0 {
                write!(f, "/{element}")?;
            } else {
                write!(f, "/{}'", element & !HARDENED)?;
            }
        }
        Ok(())
    }
}

impl FromStr for DerivedPath {
    type Err = Error;

    /// Parses BIP32 notation such as `m/44'/134'/0'` (`h` also marks hardening).
    fn from_str(s: &str) -> Result<Self> {
        let body = s.strip_prefix("m/").unwrap_or(s);
        if body.is_empty() {
            return Err(Error::InvalidPath("path has no elements".to_string()));
        }

        let mut elements = Vec::new();
        for component in body.split('/') {
            let (digits, hardened) = match component
                .strip_suffix('\'')
                .or_else(|| component.strip_suffix('h'))
            {
                Some(digits) => (digits, true),
                None => (component, false),
            };
            let value: u32 = digits
                .parse()
                .map_err(|_| Error::InvalidPath(format!("invalid path element {component:?}")))?;
            let index = PathIndex::try_from(value)?;
            elements.push(if hardened {
                index.hardened()
            } else {
                index.value()
            });
        }

        if elements.len() > MAX_PATH_DEPTH {
            return Err(Error::InvalidPath(format!(
                "path depth {} exceeds {MAX_PATH_DEPTH}",
                elements.len()
            )));
        }
        Ok(Self::from_elements(&elements))
    }
}
