//! Lisk Ledger Core Library
//!
//! This crate is the host side of the Lisk app for Ledger hardware wallets.
//! It derives account paths, frames operation payloads, streams them to the
//! device in CRC-checked chunks and decodes the replies.
//!
//! # Overview
//!
//! The Lisk app accepts requests of any size through a three-phase exchange
//! (start, append, finalize). Every append is acknowledged with a CRC of the
//! chunk and the CRC of the chunk before it, so the host detects corruption
//! or reordering before the device acts on the payload.
//!
//! This library provides:
//!
//! - **Paths**: `m/44'/134'/account'` derivation and raw path handling
//! - **Commands**: payload encoders for public key, signing, ping and version
//! - **Exchange**: the chunked start/append/finalize engine with CRC chain
//! - **Responses**: decoding of the device's length-prefixed reply fields
//! - **Progress**: optional per-chunk notifications for long transfers
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       LiskLedger                            │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────────────┐ │
//! │  │  Path   │  │ Command │  │  Reply  │  │    Progress     │ │
//! │  │ Derive  │  │ Framing │  │ Parsing │  │    Observer     │ │
//! │  └─────────┘  └─────────┘  └─────────┘  └─────────────────┘ │
//! ├─────────────────────────────────────────────────────────────┤
//! │              Exchange Engine (start/append/finalize)        │
//! │        chunking · CRC chain · length echo · decompose       │
//! ├─────────────────────────────────────────────────────────────┤
//! │              Transport Layer (HID / U2F / emulator)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Deriving a Path
//!
//! ```rust
//! use lisk_ledger_core::LedgerAccount;
//!
//! let account = LedgerAccount::new(1u32).unwrap();
//! let path = account.derive_path();
//!
//! assert_eq!(path.to_string(), "m/44'/134'/1'");
//! assert_eq!(path.len(), 12);
//! ```
//!
//! ## Talking to the Device
//!
//! Implement [`Transport`] for your platform, then:
//!
//! ```ignore
//! use lisk_ledger_core::{LedgerAccount, LiskLedger};
//!
//! let mut ledger = LiskLedger::new(transport)?;
//! ledger.ping()?;
//!
//! let version = ledger.version()?;
//! println!("Lisk app {} ({})", version.version, version.coin_id);
//!
//! let account = LedgerAccount::default();
//! let info = ledger.get_public_key(&account, true)?;
//! let signature = ledger.sign_message(&account, "hello")?;
//! ```
//!
//! # Feature Flags
//!
//! This crate currently has no optional features. All functionality is
//! included by default.
//!
//! # Security Considerations
//!
//! - Private keys never leave the device
//! - Every chunk is checked against the device's CRC before the next is sent
//! - Payload bytes are never logged

pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod ledger;
pub mod path;
pub mod progress;
pub mod protocol;

pub use command::{AppVersion, PublicKeyInfo, SignType};
pub use config::LedgerConfig;
pub use device::Transport;
pub use error::{Error, Result};
pub use ledger::{LedgerBuilder, LiskLedger};
pub use path::{DerivedPath, LedgerAccount, PathIndex};
pub use progress::{NoProgress, ProgressObserver};

#[cfg(test)]
use proptest as _;
