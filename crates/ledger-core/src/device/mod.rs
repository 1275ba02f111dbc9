//! Device communication seam.
//!
//! This module defines what the driver needs from a physical connection to
//! the Ledger device and the APDU types exchanged across it:
//!
//! - [`apdu`]: command descriptor and raw response splitting
//! - [`status`]: status words reported by the Lisk app
//!
//! # Transport Abstraction
//!
//! The [`Transport`] trait abstracts over the physical link (USB-HID, U2F,
//! a speculos socket, a test double). A transport is responsible for turning
//! a non-success status word into [`Error::Device`](crate::Error::Device)
//! before returning; [`ApduResponse`] does that split.
//!
//! # Example
//!
//! ```
//! use lisk_ledger_core::Result;
//! use lisk_ledger_core::device::{Apdu, ApduResponse, Transport};
//!
//! struct Loopback;
//!
//! impl Transport for Loopback {
//!     fn send(&mut self, apdu: &Apdu) -> Result<Vec<u8>> {
//!         let mut raw = apdu.data().unwrap_or_default().to_vec();
//!         raw.extend_from_slice(&[0x90, 0x00]);
//!         ApduResponse::parse(&raw)?.into_data()
//!     }
//! }
//!
//! let mut transport = Loopback;
//! let body = transport.send(&Apdu::new(0xE0, 90, 0, 0, Some(vec![7]))).unwrap();
//! assert_eq!(body, vec![7]);
//! ```

pub mod apdu;
pub mod status;

pub use apdu::{Apdu, ApduResponse};

use crate::error::Result;

/// A transport layer for communicating with a Ledger device.
///
/// Calls are strictly request/response: the driver never issues a second
/// command before the previous one returned.
pub trait Transport {
    /// Sends an APDU command and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`](crate::Error::Device) for non-success status
    /// words and [`Error::Transport`](crate::Error::Transport) for I/O failures.
    fn send(&mut self, apdu: &Apdu) -> Result<Vec<u8>>;

    /// Sets the U2F scramble key used to address the device application.
    ///
    /// Transports without a scrambling layer ignore it.
    fn set_scramble_key(&mut self, _key: &str) {}

    /// Releases the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection could not be released cleanly.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, apdu: &Apdu) -> Result<Vec<u8>> {
        (**self).send(apdu)
    }

    fn set_scramble_key(&mut self, key: &str) {
        (**self).set_scramble_key(key);
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// A mock transport for testing.
    struct MockTransport {
        responses: VecDeque<Vec<u8>>,
        scramble_key: Option<String>,
    }

    impl MockTransport {
        fn new(responses: Vec<Vec<u8>>) -> Self {
            Self {
                responses: responses.into_iter().collect(),
                scramble_key: None,
            }
        }
    }

    impl Transport for MockTransport {
        fn send(&mut self, _apdu: &Apdu) -> Result<Vec<u8>> {
            let raw = self
                .responses
                .pop_front()
                .ok_or_else(|| crate::error::Error::Transport("no response".to_string()))?;
            ApduResponse::parse(&raw)?.into_data()
        }

        fn set_scramble_key(&mut self, key: &str) {
            self.scramble_key = Some(key.to_string());
        }
    }

    #[test]
    fn mock_transport() {
        let mut transport = MockTransport::new(vec![vec![0xAA, 0x90, 0x00]]);

        let apdu = Apdu::new(0xE0, 91, 0x00, 0x00, None);
        let result = transport.send(&apdu);

        assert_eq!(result.unwrap(), vec![0xAA]);
        assert!(transport.close().is_ok());
    }

    #[test]
    fn boxed_transport_forwards() {
        let mut transport: Box<dyn Transport> =
            Box::new(MockTransport::new(vec![vec![0x6A, 0x81]]));
        transport.set_scramble_key("hirishh");

        let err = transport
            .send(&Apdu::new(0xE0, 91, 0x00, 0x00, None))
            .unwrap_err();
        assert_eq!(err.status_word(), Some(0x6A81));
    }
}
