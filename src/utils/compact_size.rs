/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Bitcoin's *compact size* encoding of unsigned integers.
//!
//! Values smaller than `0xfd` take a single byte; larger values are written
//! as a marker byte (`0xfd`, `0xfe` or `0xff`) followed by the value as a
//! little-endian `u16`, `u32` or `u64`, respectively. Only the shortest
//! encoding of a value is accepted when decoding.

/// Errors decoding a compact size.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactSizeError {
    #[error("Truncated compact size")]
    /// The buffer ends before the end of the encoding.
    Truncated,
    #[error("Non-canonical compact size: {0} could be written in fewer bytes")]
    /// The value has a shorter encoding.
    NonCanonical(u64),
}

/// Append the compact size of `value` to `buf`.
pub fn write_compact_size(buf: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => buf.push(value as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Decode a compact size at the start of `buf`.
///
/// Returns the value and the number of bytes read.
pub fn read_compact_size(buf: &[u8]) -> Result<(u64, usize), CompactSizeError> {
    let (&marker, rest) = buf.split_first().ok_or(CompactSizeError::Truncated)?;
    let (width, min) = match marker {
        0xfd => (2, 0xfd),
        0xfe => (4, 0x1_0000),
        0xff => (8, 0x1_0000_0000),
        _ => return Ok((marker as u64, 1)),
    };
    let bytes = rest.get(..width).ok_or(CompactSizeError::Truncated)?;
    let value = bytes
        .iter()
        .rev()
        .fold(0_u64, |acc, &byte| (acc << 8) | byte as u64);
    if value < min {
        return Err(CompactSizeError::NonCanonical(value));
    }
    Ok((value, 1 + width))
}

/// Return the number of bytes of the compact size of `value`.
pub fn compact_size_len(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}
