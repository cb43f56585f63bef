/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Golomb–Rice codes.
//!
//! The Golomb–Rice code with parameter *p* of a natural number *x* is the
//! unary code of ⌊*x* / 2<sup>*p*</sup>⌋ (that many ones followed by a zero)
//! followed by the *p* lowest bits of *x*, most significant first. For *p* =
//! 0 it degenerates to a unary code.
//!
//! The code is optimal for geometrically distributed values with mean close
//! to 2<sup>*p*</sup>, which is the distribution of the gaps between sorted
//! uniform hashes.
//!
//! Parameters must be smaller than 64; callers are expected to validate them.

use crate::bits::{BitReader, BitWriter, StreamError};

/// Return the length in bits of the Golomb–Rice code of `value` with
/// parameter `p`.
#[inline(always)]
pub fn len_rice(value: u64, p: u8) -> usize {
    debug_assert!(p < 64);
    (value >> p) as usize + 1 + p as usize
}

/// Writing of Golomb–Rice codes.
pub trait RiceWrite {
    /// Write the Golomb–Rice code of `value` with parameter `p`.
    fn write_rice(&mut self, value: u64, p: u8);
}

/// Reading of Golomb–Rice codes.
pub trait RiceRead {
    /// Read a value written with [`RiceWrite::write_rice`] with the same
    /// parameter.
    ///
    /// Fails with [`StreamError::UnexpectedEndOfStream`] if the stream ends
    /// within the code, and with [`StreamError::Overflow`] if the decoded
    /// quotient does not fit in 64 bits once shifted.
    fn read_rice(&mut self, p: u8) -> Result<u64, StreamError>;
}

impl RiceWrite for BitWriter {
    #[inline]
    fn write_rice(&mut self, value: u64, p: u8) {
        debug_assert!(p < 64);
        self.write_unary(value >> p);
        if p != 0 {
            self.write_bits(value & ((1 << p) - 1), p as usize);
        }
    }
}

impl RiceRead for BitReader<'_> {
    #[inline]
    fn read_rice(&mut self, p: u8) -> Result<u64, StreamError> {
        debug_assert!(p < 64);
        let q = self.read_unary()?;
        if p == 0 {
            return Ok(q);
        }
        if q >> (64 - p) != 0 {
            return Err(StreamError::Overflow);
        }
        let r = self.read_bits(p as usize)?;
        Ok(q << p | r)
    }
}
