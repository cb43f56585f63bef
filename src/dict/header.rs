/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::GcsFilter;
use crate::chain::{Hash, HASH_SIZE};

/// Return the header of a filter given the header of the filter of the
/// previous block.
///
/// The header is the double SHA-256 of the [hash of the
/// filter](GcsFilter::hash) followed by the previous header, both in internal
/// byte order. The chain of headers starts from an all-zero previous header.
pub fn make_header_for_filter(filter: &GcsFilter, prev_header: &Hash) -> Hash {
    let mut data = [0; 2 * HASH_SIZE];
    data[..HASH_SIZE].copy_from_slice(filter.hash().as_bytes());
    data[HASH_SIZE..].copy_from_slice(prev_header.as_bytes());
    Hash::double_sha256(data)
}
