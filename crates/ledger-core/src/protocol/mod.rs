//! The chunked exchange protocol spoken by the Lisk app.
//!
//! Every request, whatever its size, runs the same three phases under
//! command class [`CLA`]:
//!
//! | Phase    | INS  | Data                      | Reply fields                  |
//! |----------|------|---------------------------|-------------------------------|
//! | start    | `89` | total length (BE u16)     | echoed length (LE u16)        |
//! | append   | `90` | one chunk (≤ 240 bytes)   | chunk CRC, previous CRC       |
//! | finalize | `91` | none                      | operation result fields       |
//!
//! The operation itself (public key, signature, ping, ...) is selected by
//! the first byte of the payload, not by `INS`.
//!
//! - [`exchange`]: the phase driver
//! - [`integrity`]: the CRC chain checked on every append
//! - [`payload`]: assembling payloads from mixed parts
//! - [`response`]: splitting length-prefixed reply frames

pub mod exchange;
pub mod integrity;
pub mod payload;
pub mod response;

pub use exchange::ExchangeEngine;
pub use integrity::{IntegrityChain, crc16};
pub use payload::PayloadPart;
pub use response::decompose;

/// Command class of every exchange APDU.
pub const CLA: u8 = 0xE0;

/// Exchange instruction codes.
pub mod ins {
    /// Announce the total payload length.
    pub const START: u8 = 89;

    /// Send one chunk.
    pub const APPEND: u8 = 90;

    /// Close the exchange and fetch the result.
    pub const FINALIZE: u8 = 91;
}

/// Largest chunk the device accepts in one append.
pub const MAX_CHUNK_SIZE: usize = 240;

/// Largest payload the start phase can announce.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Scramble key identifying the Lisk app to U2F transports.
pub const SCRAMBLE_KEY: &str = "hirishh";
