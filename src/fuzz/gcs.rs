/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */
use crate::prelude::*;
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
pub struct Data {
    key: [u8; KEY_SIZE],
    /// the Rice parameter, possibly invalid
    p: u8,
    items: Vec<Vec<u8>>,
    queries: Vec<Vec<u8>>,
    /// arbitrary bytes decoded as a filter
    garbage: Vec<u8>,
}

/// build a filter from random data and check that there are no false
/// negatives, that wire forms round-trip and that decoding garbage never
/// panics
pub fn harness(data: Data) {
    let mut builder = GcsBuilder::with_key_p(data.key, data.p);
    builder.add_entries(&data.items);

    let filter = match builder.build() {
        Ok(filter) => filter,
        Err(err) => {
            assert!(data.p > MAX_P);
            assert_eq!(err, GcsError::PTooBig(data.p));
            return;
        }
    };

    for item in &data.items {
        assert!(filter.match_item(&data.key, item).unwrap());
    }
    if !data.items.is_empty() {
        assert!(filter.match_any(&data.key, &data.items).unwrap());
    }

    let single = data
        .queries
        .iter()
        .any(|query| filter.match_item(&data.key, query).unwrap());
    assert_eq!(single, filter.match_any(&data.key, &data.queries).unwrap());

    assert_eq!(
        GcsFilter::from_n_bytes(filter.p(), &filter.n_bytes()).unwrap(),
        filter
    );
    assert_eq!(GcsFilter::from_np_bytes(&filter.np_bytes()).unwrap(), filter);

    if let Ok(garbage) = GcsFilter::from_np_bytes(&data.garbage) {
        // n can be huge, so only a prefix is decoded
        for value in garbage.iter().take(1 << 16) {
            if value.is_err() {
                break;
            }
        }
        let _ = garbage.match_any(&data.key, &data.queries);
    }
}
