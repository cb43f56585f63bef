/*
*
* SPDX-FileCopyrightText: 2023 Sebastiano Vigna
*
* SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
*/

use super::{check_p, hash_all, FilterKey, GcsError};
use crate::bits::{BitReader, BitWriter};
use crate::codes::{len_rice, RiceRead, RiceWrite};
use crate::hash::hash_to_range;
use crate::utils::{compact_size_len, read_compact_size, write_compact_size};
use epserde::prelude::*;
use mem_dbg::*;
use rdst::RadixSort;

/// Golomb-coded set filters (i.e., static probabilistic dictionaries with no
/// false negatives).
///
/// Instances of this structure are immutable; they are built using a
/// [`GcsBuilder`](super::GcsBuilder), or decoded from one of their
/// serialized forms, and can also be serialized using [ε-serde](`epserde`).
/// Queries never modify the filter, so a filter can be shared among threads
/// and queried concurrently.
///
/// The filter stores *n* values in [0..*n* · 2<sup>*p*</sup>), that is, the
/// keyed hashes of the items reduced to that range, sorted and then
/// delta-encoded using a Golomb–Rice code with parameter *p*. A query for an
/// item not in the filter succeeds with probability about 2<sup>–*p*</sup>.
///
/// The key used to hash the items is not part of the filter: queries must
/// provide the same key used to build it.
#[derive(Epserde, Debug, Clone, PartialEq, Eq, Hash, MemDbg, MemSize)]
pub struct GcsFilter {
    /// The number of values.
    n: u32,
    /// The Rice parameter.
    p: u8,
    /// The Golomb–Rice codes of the gaps between values.
    data: Vec<u8>,
}

impl GcsFilter {
    /// Encode a sorted sequence of values in [0..`n` · 2<sup>`p`</sup>).
    pub(crate) fn from_sorted_values(n: u32, p: u8, values: &[u64]) -> Self {
        debug_assert_eq!(values.len(), n as usize);
        debug_assert!(values.windows(2).all(|w| w[0] <= w[1]));

        let mut last = 0;
        let bits = values
            .iter()
            .map(|&v| {
                let len = len_rice(v - last, p);
                last = v;
                len
            })
            .sum();

        let mut writer = BitWriter::with_capacity(bits);
        let mut last = 0;
        for &value in values {
            writer.write_rice(value - last, p);
            last = value;
        }
        debug_assert_eq!(writer.len(), bits);

        Self {
            n,
            p,
            data: writer.into_bytes(),
        }
    }

    /// Create a filter from its number of values, its Rice parameter and the
    /// Golomb–Rice bitstream returned by [`bytes`](GcsFilter::bytes).
    ///
    /// The bitstream is not validated: a corrupt bitstream will make queries
    /// fail.
    pub fn from_bytes(n: u32, p: u8, data: impl Into<Vec<u8>>) -> Result<Self, GcsError> {
        check_p(p)?;
        Ok(Self {
            n,
            p,
            data: data.into(),
        })
    }

    /// Create a filter from its Rice parameter and the count-prefixed
    /// bitstream returned by [`n_bytes`](GcsFilter::n_bytes).
    pub fn from_n_bytes(p: u8, bytes: &[u8]) -> Result<Self, GcsError> {
        check_p(p)?;
        let (n, len) = read_compact_size(bytes)?;
        let n = u32::try_from(n).map_err(|_| GcsError::TooManyEntries(n as usize))?;
        Self::from_bytes(n, p, &bytes[len..])
    }

    /// Create a filter from the self-describing form returned by
    /// [`np_bytes`](GcsFilter::np_bytes).
    pub fn from_np_bytes(bytes: &[u8]) -> Result<Self, GcsError> {
        let (n, len) = read_compact_size(bytes)?;
        let n = u32::try_from(n).map_err(|_| GcsError::TooManyEntries(n as usize))?;
        let (&p, data) = bytes[len..]
            .split_first()
            .ok_or(GcsError::UnexpectedEndOfStream)?;
        Self::from_bytes(n, p, data)
    }

    /// Return the number of values in the filter.
    #[inline(always)]
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Return the Rice parameter of the filter.
    #[inline(always)]
    pub fn p(&self) -> u8 {
        self.p
    }

    /// Return whether the filter is empty.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Return the Golomb–Rice bitstream.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Return the compact size of the number of values followed by the
    /// bitstream.
    ///
    /// This is the wire format of compact block filters, in which the Rice
    /// parameter is fixed by the protocol.
    pub fn n_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(compact_size_len(self.n as u64) + self.data.len());
        write_compact_size(&mut bytes, self.n as u64);
        bytes.extend_from_slice(&self.data);
        bytes
    }

    /// Return the compact size of the number of values, the Rice parameter
    /// as a byte, and the bitstream.
    pub fn np_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(compact_size_len(self.n as u64) + 1 + self.data.len());
        write_compact_size(&mut bytes, self.n as u64);
        bytes.push(self.p);
        bytes.extend_from_slice(&self.data);
        bytes
    }

    /// Return the double SHA-256 of [`n_bytes`](GcsFilter::n_bytes).
    pub fn hash(&self) -> crate::chain::Hash {
        crate::chain::Hash::double_sha256(self.n_bytes())
    }

    /// Return the size of the range values are reduced to.
    #[inline(always)]
    fn range(&self) -> u64 {
        (self.n as u64) << self.p
    }

    /// Return an iterator decoding the values of the filter in increasing
    /// order.
    pub fn iter(&self) -> Values<'_> {
        Values {
            reader: BitReader::new(&self.data),
            p: self.p,
            remaining: self.n,
            last: 0,
        }
    }

    /// Return whether `item`, hashed with `key`, appears to be in the filter.
    ///
    /// Items used to build the filter always match; other items match with
    /// probability about 2<sup>–*p*</sup>. Decoding stops at the first value
    /// not smaller than the hash of `item`.
    pub fn match_item(&self, key: &FilterKey, item: impl AsRef<[u8]>) -> Result<bool, GcsError> {
        if self.n == 0 {
            return Ok(false);
        }
        let target = hash_to_range(key, item.as_ref(), self.range());
        for value in self.iter() {
            let value = value?;
            if value == target {
                return Ok(true);
            }
            if value > target {
                break;
            }
        }
        Ok(false)
    }

    /// Return whether any of `items`, hashed with `key`, appears to be in the
    /// filter.
    ///
    /// The hashes of the items are sorted and merged with the values of the
    /// filter in a single decoding pass, which is much faster than calling
    /// [`match_item`](GcsFilter::match_item) on each item. Duplicate items
    /// are harmless.
    pub fn match_any<T: AsRef<[u8]> + Sync>(
        &self,
        key: &FilterKey,
        items: &[T],
    ) -> Result<bool, GcsError> {
        if self.n == 0 || items.is_empty() {
            return Ok(false);
        }
        let mut targets = hash_all(key, items, self.range());
        targets.radix_sort_unstable();

        let mut t = 0;
        for value in self.iter() {
            let value = value?;
            while targets[t] < value {
                t += 1;
                if t == targets.len() {
                    return Ok(false);
                }
            }
            if targets[t] == value {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<'a> IntoIterator for &'a GcsFilter {
    type Item = Result<u64, GcsError>;
    type IntoIter = Values<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the values of a [`GcsFilter`].
///
/// Returned by [`GcsFilter::iter`]. After an error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Values<'a> {
    reader: BitReader<'a>,
    p: u8,
    remaining: u32,
    last: u64,
}

impl Iterator for Values<'_> {
    type Item = Result<u64, GcsError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let value = self
            .reader
            .read_rice(self.p)
            .map_err(GcsError::from)
            .and_then(|delta| {
                self.last
                    .checked_add(delta)
                    .ok_or(GcsError::CorruptStream)
            });
        match value {
            Ok(value) => {
                self.last = value;
                Some(Ok(value))
            }
            Err(err) => {
                self.remaining = 0;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}
