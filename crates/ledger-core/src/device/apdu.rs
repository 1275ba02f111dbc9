//! APDU command descriptor and raw response handling.
//!
//! The Lisk app only ever sees a fixed command class and one of three
//! instruction codes; the operation opcode travels inside the payload.
//!
//! # APDU Command Structure
//!
//! ```text
//! | CLA | INS | P1 | P2 | Lc | Data |
//! |-----|-----|----|----|----|------|
//! | 1B  | 1B  | 1B | 1B | 1B | Var  |
//! ```
//!
//! `Lc` and `Data` are omitted when the command carries no payload
//! (the finalize step).
//!
//! # APDU Response Structure
//!
//! ```text
//! | Data | SW1 | SW2 |
//! |------|-----|-----|
//! | Var  | 1B  | 1B  |
//! ```
//!
//! # Example
//!
//! ```
//! use lisk_ledger_core::device::{Apdu, ApduResponse};
//!
//! let apdu = Apdu::new(0xE0, 90, 0x00, 0x00, Some(vec![0xAB, 0xCD, 0xEF]));
//! assert_eq!(apdu.to_bytes().unwrap(), vec![0xE0, 90, 0x00, 0x00, 0x03, 0xAB, 0xCD, 0xEF]);
//!
//! let response = ApduResponse::parse(&[0x01, 0x90, 0x00]).unwrap();
//! assert!(response.is_success());
//! assert_eq!(response.into_data().unwrap(), vec![0x01]);
//! ```

use super::status::{SW_OK, SW_PAYLOAD_TOO_BIG};
use crate::error::{Error, Result};

/// An APDU command: the 5-tuple handed to a [`Transport`](super::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apdu {
    /// Class byte.
    cla: u8,

    /// Instruction byte.
    ins: u8,

    /// Parameter 1.
    p1: u8,

    /// Parameter 2.
    p2: u8,

    /// Command data; `None` sends the bare header.
    data: Option<Vec<u8>>,
}

impl Apdu {
    /// Maximum short APDU data length.
    pub const MAX_SHORT_DATA: usize = 255;

    /// Creates a new APDU command.
    #[must_use]
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8, data: Option<Vec<u8>>) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data,
        }
    }

    /// Returns the class byte.
    #[must_use]
    pub const fn cla(&self) -> u8 {
        self.cla
    }

    /// Returns the instruction byte.
    #[must_use]
    pub const fn ins(&self) -> u8 {
        self.ins
    }

    /// Returns parameter 1.
    #[must_use]
    pub const fn p1(&self) -> u8 {
        self.p1
    }

    /// Returns parameter 2.
    #[must_use]
    pub const fn p2(&self) -> u8 {
        self.p2
    }

    /// Returns the command data, if any.
    #[must_use]
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Serializes the APDU in short form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the data does not fit the single-byte
    /// `Lc` of a short APDU.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let data = self.data.as_deref().unwrap_or_default();
        let mut bytes = Vec::with_capacity(5 + data.len());

        bytes.push(self.cla);
        bytes.push(self.ins);
        bytes.push(self.p1);
        bytes.push(self.p2);

        if self.data.is_some() {
            let lc = u8::try_from(data.len()).map_err(|_| {
                Error::Protocol(format!(
                    "APDU data of {} bytes exceeds short form ({} max)",
                    data.len(),
                    Self::MAX_SHORT_DATA
                ))
            })?;
            bytes.push(lc);
            bytes.extend_from_slice(data);
        }

        Ok(bytes)
    }
}

/// A raw device response split into body and status word.
///
/// Transports use this to turn what the wire returned into either the
/// response body or an [`Error::Device`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApduResponse {
    /// Response data.
    data: Vec<u8>,

    /// Status word 1.
    sw1: u8,

    /// Status word 2.
    sw2: u8,
}

impl ApduResponse {
    /// Splits raw response bytes (data + SW1 + SW2).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the response is shorter than a status word.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let Some((data, status)) = bytes.split_last_chunk::<2>() else {
            return Err(Error::Transport(format!(
                "response of {} bytes has no status word",
                bytes.len()
            )));
        };

        Ok(Self {
            data: data.to_vec(),
            sw1: status[0],
            sw2: status[1],
        })
    }

    /// Returns the response data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the full status word as a [`u16`].
    #[must_use]
    pub const fn status_word(&self) -> u16 {
        u16::from_be_bytes([self.sw1, self.sw2])
    }

    /// Checks if the response indicates success (`SW = 0x9000`).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_word() == SW_OK
    }

    /// Checks if the device refused the announced payload size.
    #[must_use]
    pub const fn is_payload_too_big(&self) -> bool {
        self.status_word() == SW_PAYLOAD_TOO_BIG
    }

    /// Consumes the response, returning the body on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] carrying the status word otherwise.
    pub fn into_data(self) -> Result<Vec<u8>> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(Error::device(self.status_word()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apdu_new() {
        let apdu = Apdu::new(0xE0, 89, 0x00, 0x00, Some(vec![0x00, 0x03]));

        assert_eq!(apdu.cla(), 0xE0);
        assert_eq!(apdu.ins(), 89);
        assert_eq!(apdu.p1(), 0x00);
        assert_eq!(apdu.p2(), 0x00);
        assert_eq!(apdu.data(), Some(&[0x00, 0x03][..]));
    }

    #[test]
    fn apdu_to_bytes_no_data() {
        let apdu = Apdu::new(0xE0, 91, 0x00, 0x00, None);

        assert_eq!(apdu.to_bytes().unwrap(), vec![0xE0, 91, 0x00, 0x00]);
    }

    #[test]
    fn apdu_to_bytes_empty_data_keeps_lc() {
        let apdu = Apdu::new(0xE0, 90, 0x00, 0x00, Some(vec![]));

        assert_eq!(apdu.to_bytes().unwrap(), vec![0xE0, 90, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn response_parse() {
        let response = ApduResponse::parse(&[0x01, 0x02, 0x03, 0x90, 0x00]).unwrap();

        assert_eq!(response.data(), &[0x01, 0x02, 0x03]);
        assert_eq!(response.status_word(), 0x9000);
        assert!(response.is_success());
    }

    #[test]
    fn response_too_short() {
        let err = ApduResponse::parse(&[0x90]).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn response_status_maps_to_device_error() {
        let response = ApduResponse::parse(&[0x98, 0x02]).unwrap();
        assert!(!response.is_success());

        let err = response.into_data().unwrap_err();
        assert_eq!(err, Error::device(0x9802));
    }

    #[test]
    fn response_payload_too_big() {
        let response = ApduResponse::parse(&[0x68, 0x03]).unwrap();
        assert!(response.is_payload_too_big());
    }

    #[test]
    fn apdu_to_bytes_rejects_extended_data() {
        let apdu = Apdu::new(0xE0, 90, 0x00, 0x00, Some(vec![0; 256]));
        assert!(matches!(apdu.to_bytes(), Err(Error::Protocol(_))));

        let apdu = Apdu::new(0xE0, 90, 0x00, 0x00, Some(vec![0; 255]));
        let bytes = apdu.to_bytes().unwrap();
        assert_eq!(bytes[4], 0xFF);
        assert_eq!(bytes.len(), 5 + 255);
    }

    #[test]
    fn response_status_only() {
        let response = ApduResponse::parse(&[0x90, 0x00]).unwrap();
        assert!(response.data().is_empty());
        assert!(response.is_success());
        assert_eq!(response.into_data().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn response_status_follows_data() {
        let response = ApduResponse::parse(&[0xAA, 0xBB, 0x90, 0x00]).unwrap();
        assert_eq!(response.data(), &[0xAA, 0xBB]);
        assert_eq!(response.status_word(), 0x9000);

        let response = ApduResponse::parse(&[0x90, 0x00, 0x6A, 0x81]).unwrap();
        assert_eq!(response.into_data().unwrap_err(), Error::device(0x6A81));
    }
}
