//! The start/append/finalize driver.
//!
//! [`ExchangeEngine`] owns the transport and runs one exchange at a time:
//! each phase blocks on the transport before the next is issued, and no
//! state survives between exchanges except the chunk size and observer.
//!
//! # Example
//!
//! ```ignore
//! use lisk_ledger_core::protocol::ExchangeEngine;
//!
//! let mut engine = ExchangeEngine::new(transport, 240)?;
//! let fields = engine.exchange(&[0x08])?; // ping
//! assert_eq!(fields[0], b"PONG");
//! ```

use std::fmt;

use super::integrity::IntegrityChain;
use super::response::{decompose, read_u16_le};
use super::{CLA, MAX_CHUNK_SIZE, MAX_PAYLOAD_LEN, SCRAMBLE_KEY, ins};
use crate::device::status::SW_PAYLOAD_TOO_BIG;
use crate::device::{Apdu, Transport};
use crate::error::{Error, Result};
use crate::progress::{NoProgress, ProgressObserver};

/// Drives chunked exchanges over a [`Transport`].
pub struct ExchangeEngine<T> {
    /// The underlying transport.
    transport: T,

    /// Bytes per append, in `1..=240`.
    chunk_size: usize,

    /// Receives start/chunk/end notifications.
    observer: Box<dyn ProgressObserver>,
}

impl<T> fmt::Debug for ExchangeEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeEngine")
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> ExchangeEngine<T> {
    /// Creates an engine and registers the Lisk scramble key on the transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `chunk_size` is outside `1..=240`.
    pub fn new(mut transport: T, chunk_size: usize) -> Result<Self> {
        validate_chunk_size(chunk_size)?;
        transport.set_scramble_key(SCRAMBLE_KEY);

        Ok(Self {
            transport,
            chunk_size,
            observer: Box::new(NoProgress),
        })
    }

    /// Attaches a progress observer, replacing the current one.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the configured chunk size.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns a reference to the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the transport.
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the engine, returning the transport.
    #[must_use]
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Sends `payload` to the device and returns the decomposed reply.
    ///
    /// Runs start, one append per chunk (`ceil(len / chunk_size)` of them)
    /// and finalize, in that order. Nothing is retried.
    ///
    /// # Errors
    ///
    /// - [`Error::PayloadTooLarge`] if the payload exceeds `u16::MAX` bytes or
    ///   the device reports status `0x6803` while starting
    /// - [`Error::LengthMismatch`] if the device echoes another length
    /// - [`Error::CrcMismatch`] / [`Error::PrevCrcMismatch`] on a broken chain
    /// - [`Error::MalformedResponse`] for replies that do not decompose
    /// - any transport error, unchanged
    pub fn exchange(&mut self, payload: &[u8]) -> Result<Vec<Vec<u8>>> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::PayloadTooLarge);
        }

        self.observer.on_start();
        self.start(payload.len())?;

        let mut chain = IntegrityChain::new();
        for chunk in payload.chunks(self.chunk_size) {
            self.append(chunk, &mut chain)?;
        }

        let fields = self.finalize()?;
        self.observer.on_end();
        Ok(fields)
    }

    fn start(&mut self, len: usize) -> Result<()> {
        log::debug!(
            "exchange start: {len} bytes in {} chunk(s) of {}",
            len.div_ceil(self.chunk_size),
            self.chunk_size
        );

        #[expect(
            clippy::cast_possible_truncation,
            reason = "length is checked against u16::MAX by the caller"
        )]
        let announced = (len as u16).to_be_bytes().to_vec();
        let apdu = Apdu::new(CLA, ins::START, 0x00, 0x00, Some(announced));

        let reply = self.transport.send(&apdu).map_err(|err| {
            if err.status_word() == Some(SW_PAYLOAD_TOO_BIG) {
                Error::PayloadTooLarge
            } else {
                err
            }
        })?;

        let fields = decompose(&reply)?;
        let echoed = fields
            .first()
            .ok_or_else(|| Error::MalformedResponse("start reply has no fields".to_string()))?;
        let echoed = usize::from(read_u16_le(echoed)?);
        if echoed != len {
            log::warn!("device understood {echoed} bytes, {len} announced");
            return Err(Error::LengthMismatch {
                expected: len,
                received: echoed,
            });
        }
        Ok(())
    }

    fn append(&mut self, chunk: &[u8], chain: &mut IntegrityChain) -> Result<()> {
        let apdu = Apdu::new(CLA, ins::APPEND, 0x00, 0x00, Some(chunk.to_vec()));
        let reply = self.transport.send(&apdu)?;

        let fields = decompose(&reply)?;
        let [device_crc, device_prev] = fields.as_slice() else {
            return Err(Error::MalformedResponse(format!(
                "append reply has {} fields, expected 2",
                fields.len()
            )));
        };
        let crc = chain.verify(chunk, read_u16_le(device_crc)?, read_u16_le(device_prev)?)?;
        log::trace!("chunk of {} bytes verified, crc {crc:#06x}", chunk.len());

        self.observer.on_chunk_processed(chunk);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Vec<Vec<u8>>> {
        let apdu = Apdu::new(CLA, ins::FINALIZE, 0x00, 0x00, None);
        let reply = self.transport.send(&apdu)?;
        let fields = decompose(&reply)?;
        log::debug!("exchange finalized with {} field(s)", fields.len());
        Ok(fields)
    }
}

/// Checks that a chunk size is within `1..=240`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] otherwise.
pub fn validate_chunk_size(chunk_size: usize) -> Result<()> {
    if chunk_size > MAX_CHUNK_SIZE {
        return Err(Error::Configuration(format!(
            "chunk size cannot exceed {MAX_CHUNK_SIZE}, got {chunk_size}"
        )));
    }
    if chunk_size < 1 {
        return Err(Error::Configuration(
            "chunk size cannot be less than 1".to_string(),
        ));
    }
    Ok(())
}
