/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{check_p, derive_key, hash_all, random_key, FilterKey, GcsError, GcsFilter, DEFAULT_P};
use crate::chain::{Hash, OutPoint};
use derivative::Derivative;
use log::{debug, log_enabled, trace, Level};
use rdst::RadixSort;

/// A builder for [`GcsFilter`].
///
/// The builder accumulates raw items, which can be added in any order and
/// with repetitions, and keeps the [key](FilterKey) used to hash them and the
/// Rice parameter *p*. The same key must be used to query the resulting
/// filter.
///
/// Configuration errors are sticky: setting a Rice parameter larger than
/// [`MAX_P`](super::MAX_P) does not fail immediately, but makes every
/// subsequent call to [`key`](GcsBuilder::key) and
/// [`build`](GcsBuilder::build) fail, whatever happens in between. Thus, a
/// chain of setters can be checked just once at the end.
///
/// A builder can build any number of filters. Filters built from the same
/// key, parameter and set of items are identical, independently of the
/// order in which items were added.
///
/// # Examples
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use gcs_filter::prelude::*;
///
/// let block_hash: Hash =
///     "000000000000000000496d7ff9bd2c96154a8d64260e8b3b411e625712abb14c".parse()?;
///
/// let mut builder = GcsBuilder::with_key_hash(&block_hash);
/// builder
///     .add_entries(["Alex", "Bob", "Charlie"])
///     .add_hash(&block_hash)
///     .add_outpoint(&OutPoint::new(block_hash, 4321));
/// let key = builder.key()?;
/// let filter = builder.build()?;
///
/// assert_eq!(filter.n(), 5);
/// assert_eq!(filter.p(), DEFAULT_P);
/// assert!(filter.match_item(&key, "Bob")?);
/// #     Ok(())
/// # }
/// ```
///
/// An invalid parameter is reported by the terminal operations:
///
/// ```rust
/// use gcs_filter::prelude::*;
///
/// let mut builder = GcsBuilder::with_random_key_p(33);
/// builder.set_p(20).add_entry("Alex");
/// assert_eq!(builder.build(), Err(GcsError::PTooBig(33)));
/// ```
#[derive(Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct GcsBuilder {
    /// The key; if `None`, a random key will be generated when needed.
    key: Option<FilterKey>,
    /// The Rice parameter.
    #[derivative(Default(value = "DEFAULT_P"))]
    p: u8,
    /// The raw items, possibly with repetitions.
    items: Vec<Box<[u8]>>,
    /// The first configuration error, if any.
    err: Option<GcsError>,
}

impl GcsBuilder {
    /// Create a builder with the given key and the default Rice parameter.
    pub fn with_key(key: FilterKey) -> Self {
        Self::with_key_p(key, DEFAULT_P)
    }

    /// Create a builder with the given key and Rice parameter.
    pub fn with_key_p(key: FilterKey, p: u8) -> Self {
        let mut builder = Self {
            key: Some(key),
            ..Self::default()
        };
        builder.set_p(p);
        builder
    }

    /// Create a builder with a key [derived](derive_key) from the given hash
    /// and the default Rice parameter.
    pub fn with_key_hash(hash: &Hash) -> Self {
        Self::with_key_p(derive_key(hash), DEFAULT_P)
    }

    /// Create a builder with a key [derived](derive_key) from the given hash
    /// and the given Rice parameter.
    pub fn with_key_hash_p(hash: &Hash, p: u8) -> Self {
        Self::with_key_p(derive_key(hash), p)
    }

    /// Create a builder with a [random key](random_key) and the default Rice
    /// parameter.
    pub fn with_random_key() -> Self {
        Self::with_key_p(random_key(), DEFAULT_P)
    }

    /// Create a builder with a [random key](random_key) and the given Rice
    /// parameter.
    pub fn with_random_key_p(p: u8) -> Self {
        Self::with_key_p(random_key(), p)
    }

    /// Replace the key.
    ///
    /// Does nothing if a configuration error has occurred.
    pub fn set_key(&mut self, key: FilterKey) -> &mut Self {
        if self.err.is_none() {
            self.key = Some(key);
        }
        self
    }

    /// Replace the key with one [derived](derive_key) from the given hash.
    ///
    /// Does nothing if a configuration error has occurred.
    pub fn set_key_from_hash(&mut self, hash: &Hash) -> &mut Self {
        self.set_key(derive_key(hash))
    }

    /// Set the Rice parameter.
    ///
    /// If `p` is larger than [`MAX_P`](super::MAX_P) the builder enters a
    /// permanent error state. Does nothing if a configuration error has
    /// already occurred.
    pub fn set_p(&mut self, p: u8) -> &mut Self {
        if self.err.is_none() {
            match check_p(p) {
                Ok(()) => self.p = p,
                Err(err) => self.err = Some(err),
            }
        }
        self
    }

    /// Return the Rice parameter.
    pub fn p(&self) -> u8 {
        self.p
    }

    /// Return the number of items added so far, repetitions included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item.
    pub fn add_entry(&mut self, item: impl AsRef<[u8]>) -> &mut Self {
        self.items.push(item.as_ref().into());
        self
    }

    /// Add a sequence of items.
    pub fn add_entries<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.items
            .extend(items.into_iter().map(|item| item.as_ref().into()));
        self
    }

    /// Add the [serialization](OutPoint::to_bytes) of an outpoint.
    pub fn add_outpoint(&mut self, outpoint: &OutPoint) -> &mut Self {
        self.add_entry(outpoint.to_bytes())
    }

    /// Add the bytes of a hash, in internal order.
    pub fn add_hash(&mut self, hash: &Hash) -> &mut Self {
        self.add_entry(hash.as_bytes())
    }

    /// Add a script.
    ///
    /// The script is added as a whole; the data it pushes, if needed, must be
    /// extracted and added by the caller.
    pub fn add_script(&mut self, script: &[u8]) -> &mut Self {
        self.add_entry(script)
    }

    /// Return the key, or the configuration error, if any.
    ///
    /// If the builder has no key yet, a random key is generated and kept.
    pub fn key(&mut self) -> Result<FilterKey, GcsError> {
        if let Some(err) = self.err {
            return Err(err);
        }
        Ok(*self.key.get_or_insert_with(random_key))
    }

    /// Build a filter containing the items added so far, or return the
    /// configuration error, if any.
    ///
    /// Repeated items are stored once. If the builder has no key yet, a random
    /// key is generated and kept, so that it can be retrieved with
    /// [`key`](GcsBuilder::key).
    ///
    /// If the feature "rayon" is enabled, items are hashed in parallel.
    pub fn build(&mut self) -> Result<GcsFilter, GcsError> {
        let key = self.key()?;

        let mut entries = self.items.iter().map(|item| &**item).collect::<Vec<&[u8]>>();
        entries.sort_unstable();
        entries.dedup();

        let n = u32::try_from(entries.len()).map_err(|_| GcsError::TooManyEntries(entries.len()))?;
        let range = (n as u64) << self.p;

        let mut values = hash_all(&key, &entries, range);
        values.radix_sort_unstable();

        if log_enabled!(Level::Trace) {
            let collisions = values.windows(2).filter(|w| w[0] == w[1]).count();
            if collisions != 0 {
                trace!("{} hash collisions among {} entries", collisions, n);
            }
        }

        let filter = GcsFilter::from_sorted_values(n, self.p, &values);
        debug!(
            "Built filter with {} entries ({} distinct), p = {}, {} bytes",
            self.items.len(),
            n,
            self.p,
            filter.bytes().len()
        );
        Ok(filter)
    }
}
