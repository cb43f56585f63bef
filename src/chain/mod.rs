/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Block-chain primitives consumed by filters: 32-byte hashes and
//! transaction outpoints.

use core::fmt;
use core::str::FromStr;
use sha2::{Digest, Sha256};

/// The size in bytes of a [`Hash`].
pub const HASH_SIZE: usize = 32;

/// Errors parsing a [`Hash`] from a string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("Hash strings must have {expected} hexadecimal digits, found {0}", expected = 2 * HASH_SIZE)]
    /// The string does not have exactly 64 characters.
    InvalidLength(usize),
    #[error("Invalid hexadecimal digits in hash string")]
    /// The string contains characters that are not hexadecimal digits.
    InvalidHex,
}

/// A 32-byte hash, such as a block hash or a transaction id.
///
/// Bytes are kept in internal order, that is, the order in which they are
/// serialized and hashed. The string representation reverses them, as
/// block explorers do, so that the leading zeros of a block hash come first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Return the bytes of the hash in internal order.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Return the double SHA-256 of `data`.
    pub fn double_sha256(data: impl AsRef<[u8]>) -> Self {
        let first = Sha256::digest(data.as_ref());
        Self(Sha256::digest(first).into())
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&faster_hex::hex_string(&reversed))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self)
    }
}

impl FromStr for Hash {
    type Err = HashError;

    /// Parse a hash from its reversed hexadecimal representation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 * HASH_SIZE {
            return Err(HashError::InvalidLength(s.len()));
        }
        let mut bytes = [0; HASH_SIZE];
        faster_hex::hex_decode(s.as_bytes(), &mut bytes).map_err(|_| HashError::InvalidHex)?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}

/// A reference to an output of a previous transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OutPoint {
    /// The id of the transaction.
    pub txid: Hash,
    /// The index of the output within the transaction.
    pub index: u32,
}

impl OutPoint {
    /// The size of the serialized form.
    pub const SIZE: usize = HASH_SIZE + 4;

    pub fn new(txid: Hash, index: u32) -> Self {
        Self { txid, index }
    }

    /// Serialize the outpoint as the transaction id in internal byte order
    /// followed by the index in little-endian order.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0; Self::SIZE];
        bytes[..HASH_SIZE].copy_from_slice(self.txid.as_bytes());
        bytes[HASH_SIZE..].copy_from_slice(&self.index.to_le_bytes());
        bytes
    }
}
