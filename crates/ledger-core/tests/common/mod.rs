//! A simulated Lisk app for integration tests.
//!
//! [`SimulatedDevice`] implements the device side of the chunked exchange:
//! it checks the announced length, answers every append with the chunk CRC
//! and the previous one, reassembles the payload and dispatches it on the
//! opcode byte. Replies go through [`ApduResponse`] with a status word, the
//! way a real transport would hand them back.
//!
//! Faults are injected with the `with_*` builders.

#![allow(dead_code, unreachable_pub)]

use lisk_ledger_core::device::status::{
    SW_INVALID_DATA, SW_NOT_INITIALIZED, SW_OK, SW_PAYLOAD_TOO_BIG, SW_UNKNOWN_COMMAND,
};
use lisk_ledger_core::device::{Apdu, ApduResponse, Transport};
use lisk_ledger_core::protocol::response::compose;
use lisk_ledger_core::protocol::{crc16, ins};
use lisk_ledger_core::{Error, Result};

/// Length of the simulated public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Length of the simulated signature.
pub const SIGNATURE_LEN: usize = 64;

#[derive(Debug)]
pub struct SimulatedDevice {
    /// Refuse announced lengths above this with `0x6803`.
    max_payload: Option<usize>,
    /// Echo this length on start instead of the announced one.
    echo_override: Option<u16>,
    /// Report a wrong CRC for this chunk index.
    corrupt_crc_at: Option<usize>,
    /// Report a wrong previous CRC for this chunk index.
    corrupt_prev_at: Option<usize>,
    /// Ping reply.
    pong: Vec<u8>,
    /// Reply with these fields on finalize, whatever the opcode.
    fixed_reply: Option<Vec<Vec<u8>>>,

    /// Every APDU received, in order.
    pub calls: Vec<Apdu>,
    /// Every payload reassembled on finalize.
    pub payloads: Vec<Vec<u8>>,
    /// Show flags of get-public-key requests.
    pub shown: Vec<bool>,
    pub scramble_key: Option<String>,
    pub closed: bool,

    expected_len: Option<usize>,
    buffer: Vec<u8>,
    prev_crc: u16,
    chunk_index: usize,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self {
            max_payload: None,
            echo_override: None,
            corrupt_crc_at: None,
            corrupt_prev_at: None,
            pong: b"PONG".to_vec(),
            fixed_reply: None,
            calls: Vec::new(),
            payloads: Vec::new(),
            shown: Vec::new(),
            scramble_key: None,
            closed: false,
            expected_len: None,
            buffer: Vec::new(),
            prev_crc: 0,
            chunk_index: 0,
        }
    }
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed_reply(fields: Vec<Vec<u8>>) -> Self {
        Self {
            fixed_reply: Some(fields),
            ..Self::default()
        }
    }

    /// Refuses announced lengths above `max` with `0x6803`.
    pub fn with_max_payload(mut self, max: usize) -> Self {
        self.max_payload = Some(max);
        self
    }

    /// Echoes `len` on start whatever was announced.
    pub fn with_echo(mut self, len: u16) -> Self {
        self.echo_override = Some(len);
        self
    }

    /// Reports a wrong CRC for chunk `index`.
    pub fn with_corrupt_crc_at(mut self, index: usize) -> Self {
        self.corrupt_crc_at = Some(index);
        self
    }

    /// Reports a wrong previous CRC for chunk `index`.
    pub fn with_corrupt_prev_at(mut self, index: usize) -> Self {
        self.corrupt_prev_at = Some(index);
        self
    }

    /// Clears injected checksum faults.
    pub fn heal(&mut self) {
        self.corrupt_crc_at = None;
        self.corrupt_prev_at = None;
    }

    /// Answers ping with `reply`.
    pub fn with_pong(mut self, reply: &[u8]) -> Self {
        self.pong = reply.to_vec();
        self
    }

    /// Number of append calls received so far.
    pub fn append_count(&self) -> usize {
        self.calls.iter().filter(|a| a.ins() == ins::APPEND).count()
    }

    fn respond(&mut self, apdu: &Apdu) -> Vec<u8> {
        let data = apdu.data().unwrap_or_default();
        match apdu.ins() {
            ins::START => self.start(data),
            ins::APPEND => self.append(data),
            ins::FINALIZE => self.finalize(),
            _ => status_only(SW_UNKNOWN_COMMAND),
        }
    }

    fn start(&mut self, data: &[u8]) -> Vec<u8> {
        let Ok(announced) = <[u8; 2]>::try_from(data) else {
            return status_only(SW_INVALID_DATA);
        };
        let len = u16::from_be_bytes(announced);
        if self.max_payload.is_some_and(|max| usize::from(len) > max) {
            return status_only(SW_PAYLOAD_TOO_BIG);
        }

        self.expected_len = Some(usize::from(len));
        self.buffer.clear();
        self.prev_crc = 0;
        self.chunk_index = 0;

        let echoed = self.echo_override.unwrap_or(len);
        ok(&[echoed.to_le_bytes()])
    }

    fn append(&mut self, chunk: &[u8]) -> Vec<u8> {
        if self.expected_len.is_none() {
            return status_only(SW_NOT_INITIALIZED);
        }
        self.buffer.extend_from_slice(chunk);

        let crc = crc16(chunk);
        let mut reported_crc = crc;
        let mut reported_prev = self.prev_crc;
        if self.corrupt_crc_at == Some(self.chunk_index) {
            reported_crc ^= 0x0001;
        }
        if self.corrupt_prev_at == Some(self.chunk_index) {
            reported_prev ^= 0x0001;
        }

        self.prev_crc = crc;
        self.chunk_index += 1;
        ok(&[reported_crc.to_le_bytes(), reported_prev.to_le_bytes()])
    }

    fn finalize(&mut self) -> Vec<u8> {
        let Some(expected) = self.expected_len.take() else {
            return status_only(SW_NOT_INITIALIZED);
        };
        let payload = std::mem::take(&mut self.buffer);
        if payload.len() != expected {
            return status_only(SW_INVALID_DATA);
        }
        self.payloads.push(payload.clone());

        if let Some(fields) = &self.fixed_reply {
            return ok(fields.as_slice());
        }
        self.dispatch(&payload)
    }

    fn dispatch(&mut self, payload: &[u8]) -> Vec<u8> {
        match payload {
            [0x04, show, words @ 1..=u8::MAX, path @ ..] if path.len() == usize::from(*words) * 4 => {
                self.shown.push(*show == 1);
                let public_key = public_key_for(path);
                let address = public_key[..8].to_vec();
                let human = format!("lsk{}", hex::encode(&address)).into_bytes();
                ok(&[public_key, address, human])
            }
            [0x05 | 0x06, words, rest @ ..] => {
                let path_len = usize::from(*words) * 4;
                let Some((_, tail)) = rest.split_at_checked(path_len) else {
                    return status_only(SW_INVALID_DATA);
                };
                let Some(([hi, lo], data)) = tail.split_first_chunk::<2>() else {
                    return status_only(SW_INVALID_DATA);
                };
                if usize::from(u16::from_be_bytes([*hi, *lo])) != data.len() {
                    return status_only(SW_INVALID_DATA);
                }
                ok(&[signature_for(payload)])
            }
            [0x08] => ok(&[self.pong.clone()]),
            [0x09] => ok(&[b"2.0.0".to_vec(), b"lisk".to_vec()]),
            _ => status_only(SW_UNKNOWN_COMMAND),
        }
    }
}

impl Transport for SimulatedDevice {
    fn send(&mut self, apdu: &Apdu) -> Result<Vec<u8>> {
        self.calls.push(apdu.clone());
        let raw = self.respond(apdu);
        ApduResponse::parse(&raw)?.into_data()
    }

    fn set_scramble_key(&mut self, key: &str) {
        self.scramble_key = Some(key.to_string());
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::Transport("already closed".to_string()));
        }
        self.closed = true;
        Ok(())
    }
}

/// The public key the device reports for a path.
pub fn public_key_for(path: &[u8]) -> Vec<u8> {
    (0..PUBLIC_KEY_LEN)
        .map(|i| path[i % path.len()] ^ u8::try_from(i).unwrap_or(0))
        .collect()
}

/// The signature the device returns for a signing payload.
pub fn signature_for(payload: &[u8]) -> Vec<u8> {
    let mut signature = crc16(payload).to_be_bytes().to_vec();
    signature.resize(SIGNATURE_LEN, 0x5A);
    signature
}

/// A payload of `len` bytes counting up from zero.
pub fn counting_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

fn ok<F: AsRef<[u8]>>(fields: &[F]) -> Vec<u8> {
    let mut raw = compose(fields).unwrap();
    raw.extend_from_slice(&SW_OK.to_be_bytes());
    raw
}

fn status_only(status: u16) -> Vec<u8> {
    status.to_be_bytes().to_vec()
}
