//! The Lisk Ledger client.
//!
//! [`LiskLedger`] is the public entry point: it frames each operation with
//! [`command`](crate::command), runs it through an
//! [`ExchangeEngine`](crate::protocol::ExchangeEngine) and parses the reply.
//!
//! # Example
//!
//! ```ignore
//! use lisk_ledger_core::{LedgerAccount, LiskLedger};
//!
//! let mut ledger = LiskLedger::new(transport)?;
//! ledger.ping()?;
//!
//! let account = LedgerAccount::new(0u32)?;
//! let info = ledger.get_public_key(&account, false)?;
//! println!("{}", info.human_address);
//!
//! let signature = ledger.sign_transaction(&account, &tx_bytes)?;
//! ```

use std::fmt;

use crate::command::{self, AppVersion, PublicKeyInfo, SignType};
use crate::config::LedgerConfig;
use crate::device::Transport;
use crate::error::{Error, Result};
use crate::path::DerivedPath;
use crate::progress::ProgressObserver;
use crate::protocol::payload::{self, PayloadPart};
use crate::protocol::{ExchangeEngine, MAX_CHUNK_SIZE};

/// A client for the Lisk app on a Ledger device.
///
/// Operations take `&mut self`: the device runs one exchange at a time, and
/// the borrow checker keeps callers from overlapping them.
pub struct LiskLedger<T> {
    engine: ExchangeEngine<T>,
}

impl<T> fmt::Debug for LiskLedger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiskLedger")
            .field("engine", &self.engine)
            .finish()
    }
}

impl<T: Transport> LiskLedger<T> {
    /// Creates a client with the default chunk size of 240.
    ///
    /// # Errors
    ///
    /// Infallible with the default settings; returns `Result` to match
    /// [`LedgerBuilder::build`].
    pub fn new(transport: T) -> Result<Self> {
        LedgerBuilder::new().transport(transport).build()
    }

    /// Creates a client with a custom chunk size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `chunk_size` is outside `1..=240`.
    pub fn with_chunk_size(transport: T, chunk_size: usize) -> Result<Self> {
        LedgerBuilder::new()
            .transport(transport)
            .chunk_size(chunk_size)
            .build()
    }

    /// Returns the configured chunk size.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.engine.chunk_size()
    }

    /// Returns a reference to the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        self.engine.transport()
    }

    /// Retrieves the public key and addresses for a path.
    ///
    /// `path` is a [`LedgerAccount`](crate::LedgerAccount) or a pre-built
    /// [`DerivedPath`]. With `show_on_device` the device displays the
    /// address for confirmation before answering.
    ///
    /// # Errors
    ///
    /// Returns exchange errors, or [`Error::MalformedResponse`] if the reply
    /// is not the expected three fields.
    pub fn get_public_key(
        &mut self,
        path: impl Into<DerivedPath>,
        show_on_device: bool,
    ) -> Result<PublicKeyInfo> {
        let payload = command::get_public_key(&path.into(), show_on_device);
        let fields = self.engine.exchange(&payload)?;
        PublicKeyInfo::from_fields(&fields)
    }

    /// Signs transaction bytes; returns the raw signature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] for more than `u16::MAX` bytes,
    /// otherwise exchange errors.
    pub fn sign_transaction(
        &mut self,
        path: impl Into<DerivedPath>,
        tx_bytes: &[u8],
    ) -> Result<Vec<u8>> {
        self.sign(SignType::Transaction, path, tx_bytes)
    }

    /// Signs a message; text is sent as its UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Same as [`sign_transaction`](Self::sign_transaction).
    pub fn sign_message(
        &mut self,
        path: impl Into<DerivedPath>,
        message: impl AsRef<[u8]>,
    ) -> Result<Vec<u8>> {
        self.sign(SignType::Message, path, message.as_ref())
    }

    /// Signs `data` under the given sign type.
    ///
    /// # Errors
    ///
    /// Same as [`sign_transaction`](Self::sign_transaction).
    pub fn sign(
        &mut self,
        sign_type: SignType,
        path: impl Into<DerivedPath>,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        let payload = command::sign(sign_type, &path.into(), data)?;
        let fields = self.engine.exchange(&payload)?;
        command::signature(fields)
    }

    /// Queries the app version and coin identifier.
    ///
    /// # Errors
    ///
    /// Returns exchange errors, or [`Error::MalformedResponse`] for a reply
    /// that is not two ASCII fields.
    pub fn version(&mut self) -> Result<AppVersion> {
        let fields = self.engine.exchange(&command::version())?;
        AppVersion::from_fields(&fields)
    }

    /// Checks that the app answers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPong`] if the reply is anything but `PONG`.
    pub fn ping(&mut self) -> Result<()> {
        let fields = self.engine.exchange(&command::ping())?;
        command::check_pong(&fields)
    }

    /// Runs a raw exchange and returns the reply fields.
    ///
    /// # Errors
    ///
    /// See [`ExchangeEngine::exchange`].
    pub fn exchange(&mut self, payload: impl AsRef<[u8]>) -> Result<Vec<Vec<u8>>> {
        self.engine.exchange(payload.as_ref())
    }

    /// Runs a raw exchange over a payload given as parts.
    ///
    /// Bytes pass through, single bytes are appended as-is and strings are
    /// decoded as hex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HexDecodeFailed`] before any transport call if a
    /// part is not valid hex, otherwise as [`exchange`](Self::exchange).
    pub fn exchange_parts<I>(&mut self, parts: I) -> Result<Vec<Vec<u8>>>
    where
        I: IntoIterator,
        I::Item: Into<PayloadPart>,
    {
        let payload = payload::concat(parts)?;
        self.engine.exchange(&payload)
    }

    /// Runs a raw exchange over a hex-encoded payload.
    ///
    /// # Errors
    ///
    /// As [`exchange_parts`](Self::exchange_parts).
    pub fn exchange_hex(&mut self, hex: &str) -> Result<Vec<Vec<u8>>> {
        self.exchange_parts([hex])
    }

    /// Closes the transport.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if it could not close cleanly.
    pub fn close(&mut self) -> Result<()> {
        self.engine.transport_mut().close()
    }

    /// Consumes the client, returning the transport.
    #[must_use]
    pub fn into_transport(self) -> T {
        self.engine.into_transport()
    }
}

/// Builds a [`LiskLedger`].
///
/// ```ignore
/// let ledger = LedgerBuilder::new()
///     .transport(transport)
///     .chunk_size(128)
///     .observer(Box::new(progress_bar))
///     .build()?;
/// ```
pub struct LedgerBuilder<T> {
    transport: Option<T>,
    chunk_size: usize,
    observer: Option<Box<dyn ProgressObserver>>,
}

impl<T> fmt::Debug for LedgerBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerBuilder")
            .field("has_transport", &self.transport.is_some())
            .field("chunk_size", &self.chunk_size)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl<T> Default for LedgerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LedgerBuilder<T> {
    /// Starts a builder with the default chunk size and no observer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transport: None,
            chunk_size: MAX_CHUNK_SIZE,
            observer: None,
        }
    }

    /// Sets the transport. Required.
    #[must_use]
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the chunk size.
    #[must_use]
    pub const fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Applies settings from a [`LedgerConfig`].
    #[must_use]
    pub const fn config(self, config: &LedgerConfig) -> Self {
        self.chunk_size(config.chunk_size)
    }

    /// Attaches a progress observer.
    #[must_use]
    pub fn observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

impl<T: Transport> LedgerBuilder<T> {
    /// Validates the settings and builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no transport was given or the
    /// chunk size is outside `1..=240`.
    pub fn build(self) -> Result<LiskLedger<T>> {
        let transport = self
            .transport
            .ok_or_else(|| Error::Configuration("transport cannot be empty".to_string()))?;

        let mut engine = ExchangeEngine::new(transport, self.chunk_size)?;
        if let Some(observer) = self.observer {
            engine = engine.with_observer(observer);
        }
        log::debug!("Lisk Ledger client ready, chunk size {}", self.chunk_size);

        Ok(LiskLedger { engine })
    }
}
