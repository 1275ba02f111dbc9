//! Exchange payload assembly.
//!
//! A payload is the concatenation of heterogeneous parts: single bytes
//! (opcodes, flags, counts), raw buffers (paths, data) and hex strings.

use crate::error::Result;

/// One element of a payload sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPart {
    /// A single byte.
    Byte(u8),
    /// Raw bytes, passed through unchanged.
    Bytes(Vec<u8>),
    /// Hex-encoded bytes.
    Hex(String),
}

impl PayloadPart {
    /// Appends the decoded part to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HexDecodeFailed`](crate::Error::HexDecodeFailed) for
    /// invalid hex.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Byte(b) => out.push(*b),
            Self::Bytes(bytes) => out.extend_from_slice(bytes),
            Self::Hex(hex) => out.extend_from_slice(&hex::decode(hex)?),
        }
        Ok(())
    }
}

impl From<u8> for PayloadPart {
    fn from(value: u8) -> Self {
        Self::Byte(value)
    }
}

impl From<Vec<u8>> for PayloadPart {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for PayloadPart {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for PayloadPart {
    fn from(value: [u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<&str> for PayloadPart {
    fn from(value: &str) -> Self {
        Self::Hex(value.to_string())
    }
}

impl From<String> for PayloadPart {
    fn from(value: String) -> Self {
        Self::Hex(value)
    }
}

/// Concatenates parts into one payload buffer.
///
/// # Errors
///
/// Fails on the first part holding invalid hex.
pub fn concat<I>(parts: I) -> Result<Vec<u8>>
where
    I: IntoIterator,
    I::Item: Into<PayloadPart>,
{
    let mut out = Vec::new();
    for part in parts {
        part.into().write_to(&mut out)?;
    }
    Ok(out)
}
