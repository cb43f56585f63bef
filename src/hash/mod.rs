/*
 *
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Keyed hashing of items and range reduction.
//!
//! Items are mapped to [0..*r*) by hashing them with [SipHash-2-4](sip) and
//! then [reducing](reduce) the hash to the range. Both steps are bit-exact:
//! filters built by different implementations agree only if every item lands
//! in the same bucket.

pub mod sip;
pub use sip::*;

/// Fixed-point arithmetic range reduction.
///
/// This function computes ⌊α *r*⌋, where α ∈ [0..1), using 128-bit
/// fixed-point arithmetic. α is represented by a 64-bit unsigned integer
/// `hash`; in fixed-point arithmetic, this amounts to computing ⌊`hash` · *r*
/// / 2⁶⁴⌋, that is, the high 64 bits of the 128-bit product.
///
/// For uniform hashes the result is uniform in [0..*r*) without the cost of a
/// division and without the bias of the lower bits of `hash % r`.
#[inline(always)]
pub fn reduce(hash: u64, range: u64) -> u64 {
    ((hash as u128 * range as u128) >> 64) as u64
}

/// Return the SipHash-2-4 of `item` keyed with `key`.
#[inline(always)]
pub fn hash_item(key: &[u8; 16], item: &[u8]) -> u64 {
    SipHash24::hash(key, item)
}

/// Hash `item` with `key` and reduce the hash to [0..`range`).
#[inline(always)]
pub fn hash_to_range(key: &[u8; 16], item: &[u8], range: u64) -> u64 {
    reduce(hash_item(key, item), range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce() {
        assert_eq!(reduce(0, 1000), 0);
        assert_eq!(reduce(u64::MAX, 1000), 999);
        assert_eq!(reduce(1 << 63, 1000), 500);
        assert_eq!(reduce(1 << 62, 17 << 19), (17 << 19) / 4);
        assert_eq!(reduce(u64::MAX, 0), 0);
        // the largest range of a filter: (2³² - 1) · 2³²
        let range = (u32::MAX as u64) << 32;
        assert_eq!(reduce(u64::MAX, range), range - 1);
    }

    #[test]
    fn test_reduce_is_monotone() {
        let range = 123_456_789;
        let mut last = 0;
        for i in 0..1000_u64 {
            let r = reduce(i.wrapping_mul(18_446_744_073_709_551), range);
            assert!(r < range);
            if i > 0 {
                assert!(r >= last);
            }
            last = r;
        }
    }

    #[test]
    fn test_hash_to_range() {
        let key = [0x42; 16];
        for item in [b"".as_slice(), b"a", b"Nate", b"0123456789abcdef0123"] {
            let h = hash_item(&key, item);
            assert_eq!(hash_to_range(&key, item, 17 << 19), reduce(h, 17 << 19));
            assert!(hash_to_range(&key, item, 17 << 19) < 17 << 19);
        }
        assert_ne!(hash_item(&key, b"Nate"), hash_item(&[0x43; 16], b"Nate"));
    }
}
