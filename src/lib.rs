/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Golomb-coded set (GCS) filters.
//!
//! A GCS filter stores a set of byte strings as the sorted, delta-encoded
//! sequence of their keyed hashes reduced to the range [0..*n* · 2<sup>*p*</sup>),
//! where *n* is the number of items and *p* is the Rice parameter. Deltas are
//! written with a Golomb–Rice code, so the filter takes about *p* + 2 bits per
//! item, has no false negatives, and has a false-positive rate of about
//! 2<sup>–*p*</sup>.
//!
//! Filters are built with a [`GcsBuilder`](dict::GcsBuilder) and queried with
//! [`GcsFilter::match_item`](dict::GcsFilter::match_item) or, for a batch of
//! items, with [`GcsFilter::match_any`](dict::GcsFilter::match_any), which
//! decodes the filter just once.
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use gcs_filter::prelude::*;
//!
//! let key = [7; KEY_SIZE];
//! let mut builder = GcsBuilder::with_key(key);
//! builder.add_entry(b"Alice").add_entry(b"Bob");
//! let filter = builder.build()?;
//!
//! assert_eq!(filter.n(), 2);
//! assert!(filter.match_item(&key, b"Alice")?);
//! assert!(filter.match_any(&key, &[b"Carol".as_slice(), b"Bob".as_slice()])?);
//! #     Ok(())
//! # }
//! ```

#![deny(unconditional_recursion)]

pub mod bits;
pub mod chain;
pub mod codes;
pub mod dict;
pub mod hash;
pub mod utils;

#[cfg(feature = "fuzz")]
pub mod fuzz;

pub mod prelude {
    pub use crate::chain::*;
    pub use crate::dict::*;
}
