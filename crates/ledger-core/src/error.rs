//! Error types for the Lisk Ledger driver.
//!
//! This module provides a single error type [`enum@Error`] that covers every
//! failure mode of a request to the device: bad construction arguments,
//! invalid derivation paths, broken exchanges and device-reported failures.
//!
//! # Error Categories
//!
//! - **Configuration errors**: chunk size out of range, missing transport
//! - **Path errors**: account indices that cannot be hardened
//! - **Protocol errors**: length echo mismatch, out-of-sequence device state
//! - **Integrity errors**: CRC mismatch at either position of the chain
//! - **Device errors**: status words surfaced unchanged by the transport
//!
//! # Example
//!
//! ```
//! use lisk_ledger_core::Error;
//!
//! let err = Error::CrcMismatch { expected: 0x29B1, received: 0x0000 };
//! assert!(err.is_integrity());
//! assert_eq!(err.to_string(), "CRC validation failed: expected 0x29b1, device returned 0x0000");
//! ```

use core::result::Result as CoreResult;
use hex::FromHexError;
use thiserror::Error;

use crate::device::status;

/// The main error type for the Lisk Ledger driver.
///
/// No variant carries partial results: a failed exchange yields nothing
/// usable to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Construction Errors
    // =========================================================================
    /// The driver was built with invalid arguments.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An account index or raw path buffer is not usable as a hardened path.
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    // =========================================================================
    // Exchange Protocol Errors
    // =========================================================================
    /// The device echoed a different payload length in the start phase.
    #[error("length mismatch: sent {expected} bytes, device understood {received}")]
    LengthMismatch {
        /// Length announced by the host.
        expected: usize,
        /// Length echoed by the device.
        received: usize,
    },

    /// A command could not be framed for the device.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The device's CRC of the chunk just sent differs from the host's.
    #[error("CRC validation failed: expected {expected:#06x}, device returned {received:#06x}")]
    CrcMismatch {
        /// CRC computed by the host.
        expected: u16,
        /// CRC reported by the device.
        received: u16,
    },

    /// The device's echo of the previous chunk's CRC breaks the chain.
    #[error("previous CRC not valid: expected {expected:#06x}, device returned {received:#06x}")]
    PrevCrcMismatch {
        /// Chain value carried by the host.
        expected: u16,
        /// Chain value echoed by the device.
        received: u16,
    },

    /// The payload exceeds what the device application can buffer.
    #[error("payload too big for device implementation")]
    PayloadTooLarge,

    /// A response buffer declares more bytes than it holds.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The liveness probe answered with something other than `PONG`.
    #[error("did not receive PONG (got {0:?})")]
    NoPong(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The device answered with a non-success status word.
    #[error("Ledger device: {reason} ({status:#06x})")]
    Device {
        /// The raw status word.
        status: u16,
        /// Human-readable name of the status word.
        reason: &'static str,
    },

    /// The transport failed below the APDU layer.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A payload part given as hex could not be decoded.
    #[error("hex decoding failed: {0}")]
    HexDecodeFailed(String),
}

impl Error {
    /// Builds an [`Error::Device`] from a status word, naming it if known.
    #[must_use]
    pub const fn device(status: u16) -> Self {
        Self::Device {
            status,
            reason: status::describe(status),
        }
    }

    /// Returns `true` for either position of a broken CRC chain.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::CrcMismatch { .. } | Self::PrevCrcMismatch { .. })
    }

    /// Returns `true` for length-echo and sequencing failures, including a
    /// device reporting `CODE_NOT_INITIALIZED` mid-exchange.
    #[must_use]
    pub const fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. }
                | Self::Protocol(_)
                | Self::Device {
                    status: status::SW_NOT_INITIALIZED,
                    ..
                }
        )
    }

    /// Returns the device status word, if the error carries one.
    #[must_use]
    pub const fn status_word(&self) -> Option<u16> {
        match self {
            Self::Device { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<FromHexError> for Error {
    fn from(err: FromHexError) -> Self {
        Self::HexDecodeFailed(err.to_string())
    }
}

/// A specialized [`Result`] type for Lisk Ledger operations.
pub type Result<T> = CoreResult<T, Error>;
