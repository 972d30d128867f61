// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varints and fixed-width little-endian fields.
//!
//! Varints carry the small numbers (string lengths, posting deltas, n-gram
//! occurrence ordinals). Anything a reader has to index into directly, such as
//! string offsets and table slots, is fixed width so it can be addressed
//! without a scan.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer encoding.
//!   See DWARF4 §7.6 "Variable Length Data", and the Protocol Buffers encoding
//!   guide: <https://protobuf.dev/programming-guides/encoding/>

use std::io;

use super::header::MAX_VARINT_BYTES;

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Returns an error if:
/// - Buffer is empty
/// - Varint exceeds MAX_VARINT_BYTES (malformed input)
pub fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    if bytes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Empty buffer for varint",
        ));
    }

    let mut result: u64 = 0;
    let mut shift = 0;
    let mut i = 0;

    while i < bytes.len() && i < MAX_VARINT_BYTES {
        let byte = bytes[i];
        result |= ((byte & 0x7F) as u64) << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Ok((result, i));
        }
        shift += 7;
    }

    if i >= MAX_VARINT_BYTES {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Varint exceeds maximum length (possible corruption)",
        ))
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Incomplete varint",
        ))
    }
}

// ============================================================================
// FIXED-WIDTH FIELDS
// ============================================================================

#[inline]
pub(crate) fn read_u32(bytes: &[u8], pos: usize) -> io::Result<u32> {
    bytes
        .get(pos..pos.saturating_add(4))
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| truncated("u32", pos))
}

#[inline]
pub(crate) fn read_u64(bytes: &[u8], pos: usize) -> io::Result<u64> {
    bytes
        .get(pos..pos.saturating_add(8))
        .map(|b| {
            u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
        })
        .ok_or_else(|| truncated("u64", pos))
}

fn truncated(what: &str, pos: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("Truncated {} at offset {}", what, pos),
    )
}

// ============================================================================
// STRING RECORDS
// ============================================================================

/// Encode one string table record: varint byte length, then UTF-8 bytes.
pub fn encode_string(s: &str, buf: &mut Vec<u8>) {
    encode_varint(s.len() as u64, buf);
    buf.extend_from_slice(s.as_bytes());
}

/// Decode the string record starting at the beginning of `bytes`.
pub fn decode_string(bytes: &[u8]) -> io::Result<(&str, usize)> {
    let (len, pos) = decode_varint(bytes)?;
    let end = usize::try_from(len)
        .ok()
        .and_then(|len| pos.checked_add(len))
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Truncated string record (expected {} bytes)", len),
            )
        })?;
    let s = std::str::from_utf8(&bytes[pos..end]).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid UTF-8 in string record: {}", e),
        )
    })?;
    Ok((s, end))
}
