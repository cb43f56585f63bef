/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Golomb-coded set filters (i.e., static probabilistic dictionaries).
//!
//! A [`GcsBuilder`] accumulates items and builds an immutable [`GcsFilter`].
//! Items are hashed with a 16-byte [`FilterKey`] that is not stored in the
//! filter: the same key must be passed to every query.

pub mod builder;
pub use builder::GcsBuilder;

pub mod filter;
pub use filter::{GcsFilter, Values};

pub mod header;
pub use header::make_header_for_filter;

pub mod key;
pub use key::{derive_key, random_key, FilterKey, KEY_SIZE};

use crate::bits::StreamError;
use crate::hash::hash_to_range;
use crate::utils::CompactSizeError;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// The default Rice parameter, giving a false-positive rate of about 2⁻¹⁹.
pub const DEFAULT_P: u8 = 19;

/// The maximum Rice parameter.
pub const MAX_P: u8 = 32;

/// Errors building, decoding or querying a filter.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcsError {
    #[error("P is too big: {0} > {max}", max = MAX_P)]
    /// The Rice parameter is larger than [`MAX_P`].
    PTooBig(u8),
    #[error("Unexpected end of filter data")]
    /// The filter data ended in the middle of a value.
    UnexpectedEndOfStream,
    #[error("Corrupt filter data")]
    /// The filter data decodes to values that do not fit in 64 bits.
    CorruptStream,
    #[error("Too many entries: {0} distinct entries, at most {max} allowed", max = u32::MAX)]
    /// There are more distinct entries than a filter can count.
    TooManyEntries(usize),
    #[error("Non-canonical encoding of the number of entries")]
    /// The compact size of the number of entries is not in its shortest
    /// form.
    NonCanonicalVarInt,
}

impl From<StreamError> for GcsError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::UnexpectedEndOfStream => GcsError::UnexpectedEndOfStream,
            StreamError::Overflow => GcsError::CorruptStream,
        }
    }
}

impl From<CompactSizeError> for GcsError {
    fn from(err: CompactSizeError) -> Self {
        match err {
            CompactSizeError::Truncated => GcsError::UnexpectedEndOfStream,
            CompactSizeError::NonCanonical(_) => GcsError::NonCanonicalVarInt,
        }
    }
}

/// Check that `p` is a valid Rice parameter.
#[inline]
pub(crate) fn check_p(p: u8) -> Result<(), GcsError> {
    if p > MAX_P {
        Err(GcsError::PTooBig(p))
    } else {
        Ok(())
    }
}

/// Hash `items` with `key` and reduce them to [0..`range`), in order.
///
/// If the feature "rayon" is enabled, this function is parallelized.
pub(crate) fn hash_all<T: AsRef<[u8]> + Sync>(key: &FilterKey, items: &[T], range: u64) -> Vec<u64> {
    #[cfg(feature = "rayon")]
    {
        items
            .par_iter()
            .map(|item| hash_to_range(key, item.as_ref(), range))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    {
        items
            .iter()
            .map(|item| hash_to_range(key, item.as_ref(), range))
            .collect()
    }
}
