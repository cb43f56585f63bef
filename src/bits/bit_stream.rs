/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Bit-level writer and reader over a byte buffer.

Bits are packed starting from the most significant bit of each byte, and
multi-bit fields are written most-significant bit first. Thus, writing the
bits `1`, `0`, `1` and then the 5-bit field `00111` yields the single byte
`0b1010_0111`. The last byte of a stream is padded with zeros.

This is the bit order of compact block filters, and it must not change:
any other packing yields filters that other implementations cannot read.

*/

/// Errors raised while reading a bit stream.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    #[error("Unexpected end of stream")]
    /// The stream ended in the middle of a symbol.
    UnexpectedEndOfStream,
    #[error("Decoded value does not fit in 64 bits")]
    /// A decoded value does not fit in a `u64`.
    Overflow,
}

/// A growable bit stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitWriter {
    data: Vec<u8>,
    /// The number of bits written so far.
    len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with space for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            data: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Return the number of bits written so far.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn write_bit(&mut self, bit: bool) {
        let bit_index = self.len % 8;
        if bit_index == 0 {
            self.data.push(0);
        }
        if bit {
            if let Some(last) = self.data.last_mut() {
                *last |= 0x80 >> bit_index;
            }
        }
        self.len += 1;
    }

    /// Write the lowest `width` bits of `value`, most significant first.
    ///
    /// `width` must be at most 64; bits of `value` above `width` are ignored.
    #[inline]
    pub fn write_bits(&mut self, value: u64, mut width: usize) {
        debug_assert!(width <= 64);
        while width > 0 {
            let bit_index = self.len % 8;
            if bit_index == 0 {
                self.data.push(0);
            }
            let free = 8 - bit_index;
            let take = free.min(width);
            let chunk = ((value >> (width - take)) & ((1 << take) - 1)) as u8;
            if let Some(last) = self.data.last_mut() {
                *last |= chunk << (free - take);
            }
            self.len += take;
            width -= take;
        }
    }

    /// Write `q` one bits followed by a zero bit.
    #[inline]
    pub fn write_unary(&mut self, mut q: u64) {
        while q >= 63 {
            self.write_bits(u64::MAX, 63);
            q -= 63;
        }
        // q ones and a trailing zero fit in 64 bits
        self.write_bits(((1 << q) - 1) << 1, q as usize + 1);
    }

    /// Return the underlying bytes, including the zero padding of the last
    /// byte.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// A cursor reading bits from a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// The index of the next bit to read.
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Return the number of bits read so far.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Return the number of bits left in the stream, padding included.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    #[inline(always)]
    pub fn read_bit(&mut self) -> Result<bool, StreamError> {
        let byte = self
            .data
            .get(self.pos / 8)
            .ok_or(StreamError::UnexpectedEndOfStream)?;
        let bit = byte & (0x80 >> (self.pos % 8)) != 0;
        self.pos += 1;
        Ok(bit)
    }

    /// Read a `width`-bit field written most significant bit first.
    ///
    /// On failure the cursor does not move.
    #[inline]
    pub fn read_bits(&mut self, mut width: usize) -> Result<u64, StreamError> {
        debug_assert!(width <= 64);
        if width > self.remaining() {
            return Err(StreamError::UnexpectedEndOfStream);
        }
        let mut value = 0_u64;
        while width > 0 {
            let byte = self.data[self.pos / 8];
            let avail = 8 - self.pos % 8;
            let take = avail.min(width);
            let chunk = (byte >> (avail - take)) & ((1_u16 << take) - 1) as u8;
            value = (value << take) | chunk as u64;
            self.pos += take;
            width -= take;
        }
        Ok(value)
    }

    /// Read a run of one bits terminated by a zero bit, and return the length
    /// of the run.
    #[inline]
    pub fn read_unary(&mut self) -> Result<u64, StreamError> {
        let mut q = 0_u64;
        loop {
            let byte = *self
                .data
                .get(self.pos / 8)
                .ok_or(StreamError::UnexpectedEndOfStream)?;
            let bit_index = self.pos % 8;
            let avail = 8 - bit_index;
            // Bits already read are shifted out and replaced by zeros
            let ones = ((byte << bit_index).leading_ones() as usize).min(avail);
            if ones < avail {
                self.pos += ones + 1;
                return Ok(q + ones as u64);
            }
            q += avail as u64;
            self.pos += avail;
        }
    }
}
