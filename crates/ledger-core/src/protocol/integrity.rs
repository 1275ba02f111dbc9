//! CRC chain across appended chunks.
//!
//! After every append the device answers with two checksums: its CRC of the
//! chunk it just received and the CRC it recorded for the chunk before. The
//! host checks both against its own values, so a dropped, duplicated or
//! reordered chunk breaks the chain on the next append at the latest.
//!
//! ```text
//! chunk:      c0        c1        c2
//! device:  (crc0, 0) (crc1, crc0) (crc2, crc1)
//! ```
//!
//! Checksums are CRC-16/CCITT-FALSE (poly `0x1021`, init `0xFFFF`).

use crc::{CRC_16_IBM_3740, Crc};

use crate::error::{Error, Result};

const CCITT: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Computes the CRC16-CCITT of a chunk.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    CCITT.checksum(data)
}

/// The rolling chain value for one exchange.
///
/// Starts at zero and advances only after a chunk verifies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntegrityChain {
    prev: u16,
}

impl IntegrityChain {
    /// Creates a chain positioned before the first chunk.
    #[must_use]
    pub const fn new() -> Self {
        Self { prev: 0 }
    }

    /// Returns the CRC carried forward from the last verified chunk.
    #[must_use]
    pub const fn prev(&self) -> u16 {
        self.prev
    }

    /// Verifies the device's checksums for `chunk` and advances the chain.
    ///
    /// # Errors
    ///
    /// - [`Error::CrcMismatch`] if `device_crc` is not the CRC of `chunk`
    /// - [`Error::PrevCrcMismatch`] if `device_prev` is not the carried value
    ///
    /// The chain is left untouched on failure.
    pub fn verify(&mut self, chunk: &[u8], device_crc: u16, device_prev: u16) -> Result<u16> {
        let crc = crc16(chunk);
        if crc != device_crc {
            log::warn!("chunk CRC mismatch: host {crc:#06x}, device {device_crc:#06x}");
            return Err(Error::CrcMismatch {
                expected: crc,
                received: device_crc,
            });
        }
        if device_prev != self.prev {
            log::warn!(
                "previous CRC mismatch: host {:#06x}, device {device_prev:#06x}",
                self.prev
            );
            return Err(Error::PrevCrcMismatch {
                expected: self.prev,
                received: device_prev,
            });
        }

        self.prev = crc;
        Ok(crc)
    }
}
