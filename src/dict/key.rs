/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Filter keys.

use crate::chain::Hash;
use rand::RngCore;

/// The size in bytes of a [`FilterKey`].
pub const KEY_SIZE: usize = 16;

/// The key of the SipHash function placing items in a filter.
pub type FilterKey = [u8; KEY_SIZE];

/// Derive a filter key from a hash, usually the hash of the block the filter
/// describes.
///
/// The key is made of the first [`KEY_SIZE`] bytes of the hash in internal
/// order. Since block hashes are double SHA-256 digests, the key is a prefix
/// of a digest of the block header rather than of any of its fields.
pub fn derive_key(hash: &Hash) -> FilterKey {
    let mut key = [0; KEY_SIZE];
    key.copy_from_slice(&hash.as_bytes()[..KEY_SIZE]);
    key
}

/// Return a filter key from the thread-local cryptographically secure
/// generator.
pub fn random_key() -> FilterKey {
    let mut key = [0; KEY_SIZE];
    rand::rng().fill_bytes(&mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key() -> anyhow::Result<()> {
        let hash: Hash = "000000000000000000496d7ff9bd2c96154a8d64260e8b3b411e625712abb14c".parse()?;
        let expected = [
            0x4c, 0xb1, 0xab, 0x12, 0x57, 0x62, 0x1e, 0x41, 0x3b, 0x8b, 0x0e, 0x26, 0x64, 0x8d,
            0x4a, 0x15,
        ];
        assert_eq!(derive_key(&hash), expected);
        assert_eq!(derive_key(&hash), derive_key(&hash));
        Ok(())
    }

    #[test]
    fn test_random_key() {
        assert_ne!(random_key(), random_key());
    }
}
