//! Multi-field response frames.
//!
//! Every reply of the exchange protocol has the same shape:
//!
//! ```text
//! | count | len0 (LE u16) | field0 | len1 (LE u16) | field1 | ... |
//! |  1B   |      2B       |  len0  |      2B       |  len1  |     |
//! ```
//!
//! The count byte is signed on the device side; a negative count is
//! rejected. Bytes after the last declared field are ignored.
//!
//! # Example
//!
//! ```
//! use lisk_ledger_core::protocol::response::decompose;
//!
//! let fields = decompose(&[0x02, 0x01, 0x00, 0xAA, 0x02, 0x00, 0xBB, 0xCC]).unwrap();
//! assert_eq!(fields, vec![vec![0xAA], vec![0xBB, 0xCC]]);
//! ```

use crate::error::{Error, Result};

/// Splits a response buffer into its length-prefixed fields.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the buffer is empty, the count is
/// negative, or a declared length runs past the end of the buffer.
pub fn decompose(buffer: &[u8]) -> Result<Vec<Vec<u8>>> {
    let Some((&count, mut rest)) = buffer.split_first() else {
        return Err(Error::MalformedResponse(
            "empty response, missing field count".to_string(),
        ));
    };

    let count = i8::from_ne_bytes([count]);
    let count = usize::try_from(count)
        .map_err(|_| Error::MalformedResponse(format!("negative field count {count}")))?;

    let mut fields = Vec::with_capacity(count);
    for index in 0..count {
        let Some((len, tail)) = rest.split_first_chunk::<2>() else {
            return Err(Error::MalformedResponse(format!(
                "field {index} of {count}: missing length prefix"
            )));
        };
        let len = usize::from(u16::from_le_bytes(*len));
        if tail.len() < len {
            return Err(Error::MalformedResponse(format!(
                "field {index} of {count}: declares {len} bytes, {} remain",
                tail.len()
            )));
        }
        let (field, tail) = tail.split_at(len);
        fields.push(field.to_vec());
        rest = tail;
    }

    Ok(fields)
}

/// Encodes fields into a response frame; the inverse of [`decompose`].
///
/// Used by device simulators and tests.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if there are more than 127 fields or a
/// field exceeds `u16::MAX` bytes.
pub fn compose<F: AsRef<[u8]>>(fields: &[F]) -> Result<Vec<u8>> {
    let count = i8::try_from(fields.len())
        .map_err(|_| Error::MalformedResponse(format!("{} fields exceed 127", fields.len())))?;

    let mut frame = vec![count.to_ne_bytes()[0]];
    for field in fields {
        let field = field.as_ref();
        let len = u16::try_from(field.len()).map_err(|_| {
            Error::MalformedResponse(format!("field of {} bytes exceeds u16", field.len()))
        })?;
        frame.extend_from_slice(&len.to_le_bytes());
        frame.extend_from_slice(field);
    }
    Ok(frame)
}

/// Reads a little-endian `u16` from the start of a response field.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the field is shorter than two bytes.
pub fn read_u16_le(field: &[u8]) -> Result<u16> {
    field
        .first_chunk::<2>()
        .map(|b| u16::from_le_bytes(*b))
        .ok_or_else(|| {
            Error::MalformedResponse(format!("expected a 2-byte value, got {} bytes", field.len()))
        })
}
