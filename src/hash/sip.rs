/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Implementation of SipHash from [Jean-Philippe Aumasson](https://www.aumasson.jp/) and Daniel J. Bernstein.
//!
//! SipHash is a keyed pseudorandom function: with a secret 128-bit key its
//! outputs are hard to predict, which is what filters need to place items in
//! buckets an adversary cannot target. It is not intended for cryptographic
//! purposes.
//!
//! Compact block filters use SipHash-2-4 ([`SipHash24`]), with the two 64-bit
//! subkeys read in little-endian order from the 16-byte filter key.
//!
//! # Reference
//! - <https://www.aumasson.jp/siphash/siphash.pdf>
//! - <https://github.com/veorq/SipHash>
//! - <https://github.com/rust-lang/rust/blob/master/library/core/src/hash/sip.rs>

/// SipHash with 2 compression rounds and 4 finalization rounds.
pub type SipHash24 = Sip64<2, 4>;

/// Assemble a `u64` from at most 8 bytes in little-endian order.
#[inline(always)]
fn load_le(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    bytes
        .iter()
        .rev()
        .fold(0, |acc, &byte| (acc << 8) | byte as u64)
}

/// 64-bit SipHash with `C` compression rounds and `D` finalization rounds.
#[derive(Debug, Clone, Copy)]
pub struct Sip64<const C: usize, const D: usize> {
    v0: u64,
    v1: u64,
    v2: u64,
    v3: u64,
    /// how many bytes we've processed
    length: usize,
    /// buffer of unprocessed bytes in little endian order
    tail: u64,
    /// how many bytes in tail are valid
    ntail: usize,
}

impl<const C: usize, const D: usize> core::default::Default for Sip64<C, D> {
    #[inline]
    fn default() -> Self {
        Self::new_with_key(&[0; 16])
    }
}

impl<const C: usize, const D: usize> Sip64<C, D> {
    #[inline(always)]
    pub fn new_with_key(key: &[u8; 16]) -> Self {
        Self::new_with_keys(load_le(&key[..8]), load_le(&key[8..]))
    }

    #[inline(always)]
    pub fn new_with_keys(k0: u64, k1: u64) -> Self {
        Self {
            v0: k0 ^ 0x736f6d6570736575,
            v1: k1 ^ 0x646f72616e646f6d,
            v2: k0 ^ 0x6c7967656e657261,
            v3: k1 ^ 0x7465646279746573,
            length: 0,
            tail: 0,
            ntail: 0,
        }
    }

    #[inline(always)]
    fn round(&mut self) {
        self.v0 = self.v0.wrapping_add(self.v1);
        self.v2 = self.v2.wrapping_add(self.v3);

        self.v1 = self.v1.rotate_left(13);
        self.v3 = self.v3.rotate_left(16);

        self.v1 ^= self.v0;
        self.v3 ^= self.v2;

        self.v0 = self.v0.rotate_left(32);

        self.v0 = self.v0.wrapping_add(self.v3);
        self.v2 = self.v2.wrapping_add(self.v1);

        self.v1 = self.v1.rotate_left(17);
        self.v3 = self.v3.rotate_left(21);

        self.v3 ^= self.v0;
        self.v1 ^= self.v2;

        self.v2 = self.v2.rotate_left(32);
    }

    #[inline(always)]
    fn compress(&mut self, m: u64) {
        self.v3 ^= m;
        for _ in 0..C {
            self.round();
        }
        self.v0 ^= m;
    }

    /// Hash `msg` in one shot.
    #[inline]
    pub fn hash(key: &[u8; 16], msg: &[u8]) -> u64 {
        let mut sip = Self::new_with_key(key);
        core::hash::Hasher::write(&mut sip, msg);
        core::hash::Hasher::finish(&sip)
    }
}

impl<const C: usize, const D: usize> core::hash::Hasher for Sip64<C, D> {
    #[inline]
    fn write(&mut self, mut msg: &[u8]) {
        self.length += msg.len();

        if self.ntail != 0 {
            let needed = 8 - self.ntail;
            let fill = needed.min(msg.len());
            self.tail |= load_le(&msg[..fill]) << (8 * self.ntail);
            if fill < needed {
                self.ntail += fill;
                return;
            }
            self.compress(self.tail);
            msg = &msg[needed..];
        }

        // Buffered tail is now flushed, process new input.
        let mut chunks = msg.chunks_exact(8);
        for chunk in &mut chunks {
            self.compress(load_le(chunk));
        }
        let rest = chunks.remainder();
        self.tail = load_le(rest);
        self.ntail = rest.len();
    }

    #[inline]
    fn finish(&self) -> u64 {
        let mut state = *self;

        let b: u64 = ((self.length as u64 & 0xff) << 56) | self.tail;
        state.compress(b);

        state.v2 ^= 0xff;
        for _ in 0..D {
            state.round();
        }

        state.v0 ^ state.v1 ^ state.v2 ^ state.v3
    }
}
