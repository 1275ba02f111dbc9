//! Per-operation payload encoders and reply parsers.
//!
//! Each Lisk app operation is a payload whose first byte selects the
//! operation, followed by operation-specific fields:
//!
//! | Opcode | Operation        | Payload after opcode                          | Reply fields                    |
//! |--------|------------------|-----------------------------------------------|---------------------------------|
//! | `0x04` | get public key   | show flag, path words, path                   | public key, address, lisk32     |
//! | `0x05` | sign transaction | path words, path, data length (BE u16), data  | signature                       |
//! | `0x06` | sign message     | path words, path, data length (BE u16), data  | signature                       |
//! | `0x08` | ping             | none                                          | `PONG`                          |
//! | `0x09` | version          | none                                          | version, coin id                |
//!
//! The functions here are pure; [`LiskLedger`](crate::LiskLedger) sends
//! what they build.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::DerivedPath;

/// Payload opcodes.
pub mod opcode {
    /// Retrieve a public key and its addresses.
    pub const GET_PUBLIC_KEY: u8 = 0x04;

    /// Sign transaction bytes.
    pub const SIGN_TX: u8 = 0x05;

    /// Sign an arbitrary message.
    pub const SIGN_MSG: u8 = 0x06;

    /// Liveness probe.
    pub const PING: u8 = 0x08;

    /// App version and coin identifier.
    pub const VERSION: u8 = 0x09;
}

/// Expected ping reply.
pub const PONG: &[u8] = b"PONG";

/// What a signature covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SignType {
    /// Transaction signing bytes.
    Transaction = opcode::SIGN_TX,

    /// A free-form message.
    Message = opcode::SIGN_MSG,
}

impl SignType {
    /// Returns the opcode byte.
    #[must_use]
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

/// Builds the get-public-key payload.
#[must_use]
pub fn get_public_key(path: &DerivedPath, show_on_device: bool) -> Vec<u8> {
    let mut payload = Vec::with_capacity(3 + path.len());
    payload.push(opcode::GET_PUBLIC_KEY);
    payload.push(u8::from(show_on_device));
    payload.push(path.word_count());
    payload.extend_from_slice(path.as_bytes());
    payload
}

/// Builds a signing payload.
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] if `data` does not fit the 2-byte length.
pub fn sign(sign_type: SignType, path: &DerivedPath, data: &[u8]) -> Result<Vec<u8>> {
    let len = u16::try_from(data.len()).map_err(|_| Error::PayloadTooLarge)?;

    let mut payload = Vec::with_capacity(4 + path.len() + data.len());
    payload.push(sign_type.opcode());
    payload.push(path.word_count());
    payload.extend_from_slice(path.as_bytes());
    payload.extend_from_slice(&len.to_be_bytes());
    payload.extend_from_slice(data);
    Ok(payload)
}

/// Builds the version payload.
#[must_use]
pub fn version() -> Vec<u8> {
    vec![opcode::VERSION]
}

/// Builds the ping payload.
#[must_use]
pub fn ping() -> Vec<u8> {
    vec![opcode::PING]
}

/// A public key as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKeyInfo {
    /// Hex-encoded public key.
    pub public_key: String,

    /// Hex-encoded binary address.
    pub address: String,

    /// Human-readable `lsk…` address.
    pub human_address: String,
}

impl PublicKeyInfo {
    /// Parses the three reply fields of a get-public-key exchange.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] unless there are exactly three
    /// fields and the last one is UTF-8.
    pub fn from_fields(fields: &[Vec<u8>]) -> Result<Self> {
        let [public_key, address, human_address] = fields else {
            return Err(Error::MalformedResponse(format!(
                "public key reply has {} fields, expected 3",
                fields.len()
            )));
        };

        Ok(Self {
            public_key: hex::encode(public_key),
            address: hex::encode(address),
            human_address: utf8_field("human address", human_address)?,
        })
    }
}

/// App version and coin identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppVersion {
    /// App version, e.g. `2.0.0`.
    pub version: String,

    /// Coin identifier, e.g. `lisk`.
    pub coin_id: String,
}

impl AppVersion {
    /// Parses the two reply fields of a version exchange.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] unless there are two ASCII fields.
    pub fn from_fields(fields: &[Vec<u8>]) -> Result<Self> {
        let [version, coin_id] = fields else {
            return Err(Error::MalformedResponse(format!(
                "version reply has {} fields, expected 2",
                fields.len()
            )));
        };

        Ok(Self {
            version: ascii_field("version", version)?,
            coin_id: ascii_field("coin id", coin_id)?,
        })
    }
}

/// Extracts the signature from a signing reply.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the reply has no field.
pub fn signature(fields: Vec<Vec<u8>>) -> Result<Vec<u8>> {
    fields
        .into_iter()
        .next()
        .ok_or_else(|| Error::MalformedResponse("signing reply has no fields".to_string()))
}

/// Checks a ping reply.
///
/// # Errors
///
/// Returns [`Error::NoPong`] unless the first field reads `PONG`.
pub fn check_pong(fields: &[Vec<u8>]) -> Result<()> {
    match fields.first() {
        Some(field) if field.as_slice() == PONG => Ok(()),
        Some(field) => Err(Error::NoPong(String::from_utf8_lossy(field).into_owned())),
        None => Err(Error::NoPong(String::new())),
    }
}

fn utf8_field(name: &str, field: &[u8]) -> Result<String> {
    String::from_utf8(field.to_vec())
        .map_err(|e| Error::MalformedResponse(format!("{name} is not UTF-8: {e}")))
}

fn ascii_field(name: &str, field: &[u8]) -> Result<String> {
    if !field.is_ascii() {
        return Err(Error::MalformedResponse(format!("{name} is not ASCII")));
    }
    utf8_field(name, field)
}
