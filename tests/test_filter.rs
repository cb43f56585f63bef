/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use gcs_filter::hash::hash_to_range;
use gcs_filter::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_items(rng: &mut SmallRng, n: usize) -> Vec<Vec<u8>> {
    (0..n)
        .map(|_| {
            let len = rng.random_range(0..40);
            (0..len).map(|_| rng.random()).collect()
        })
        .collect()
}

#[test]
fn test_no_false_negatives() -> Result<()> {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .try_init();

    let mut rng = SmallRng::seed_from_u64(0);
    for p in [0, 1, 2, 5, 8, 19, 20, 31, 32] {
        for n in [0, 1, 2, 10, 100, 1000] {
            let key: FilterKey = rng.random();
            let items = random_items(&mut rng, n);
            let mut builder = GcsBuilder::with_key_p(key, p);
            builder.add_entries(&items);
            let filter = builder.build()?;
            assert!(filter.n() as usize <= n);
            assert_eq!(filter.p(), p);

            for item in &items {
                assert!(filter.match_item(&key, item)?);
            }
            assert_eq!(filter.match_any(&key, &items)?, n != 0);
        }
    }
    Ok(())
}

#[test]
fn test_values() -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(1);
    let key: FilterKey = rng.random();
    let p = 10;
    let items = (0..1000_u32).map(u32::to_le_bytes).collect::<Vec<_>>();
    let mut builder = GcsBuilder::with_key_p(key, p);
    builder.add_entries(&items);
    let filter = builder.build()?;

    let values = filter.iter().collect::<Result<Vec<_>, _>>()?;
    let mut expected = items
        .iter()
        .map(|item| hash_to_range(&key, item, 1000 << p))
        .collect::<Vec<_>>();
    expected.sort_unstable();
    assert_eq!(values, expected);
    assert_eq!((&filter).into_iter().count(), 1000);
    Ok(())
}

#[test]
fn test_false_positives() -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(2);
    let key: FilterKey = rng.random();
    let n = 1000_u64;
    let p = 4;
    let mut builder = GcsBuilder::with_key_p(key, p);
    builder.add_entries((0..n).map(u64::to_le_bytes));
    let filter = builder.build()?;

    let queries = 4000;
    let mut false_positives = 0;
    for i in n..n + queries {
        if filter.match_item(&key, i.to_le_bytes())? {
            false_positives += 1;
        }
    }
    // The expected rate is about 1/16, that is, 250 false positives
    assert!(
        (125..500).contains(&false_positives),
        "{} false positives",
        false_positives
    );
    Ok(())
}

#[cfg(feature = "slow_tests")]
#[test]
fn test_false_positives_default_p() -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(3);
    let key: FilterKey = rng.random();
    let n = 100_000_u64;
    let p = 10;
    let mut builder = GcsBuilder::with_key_p(key, p);
    builder.add_entries((0..n).map(u64::to_le_bytes));
    let filter = builder.build()?;

    // Batches of 100 queries match with probability about 100/1024
    let batches = 2000;
    let mut matches = 0;
    for b in 0..batches {
        let batch = (0..100)
            .map(|i| (n + b * 100 + i).to_le_bytes())
            .collect::<Vec<_>>();
        if filter.match_any(&key, &batch)? {
            matches += 1;
        }
    }
    assert!((100..300).contains(&matches), "{} matches", matches);
    Ok(())
}

#[test]
fn test_match_any() -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(4);
    let key: FilterKey = rng.random();
    let items = random_items(&mut rng, 500);
    let mut builder = GcsBuilder::with_key_p(key, 6);
    builder.add_entries(&items);
    let filter = builder.build()?;

    let empty: &[&[u8]] = &[];
    assert!(!filter.match_any(&key, empty)?);

    for _ in 0..200 {
        let len = rng.random_range(1..20);
        let mut queries = random_items(&mut rng, len);
        if rng.random_bool(0.5) {
            let i = rng.random_range(0..items.len());
            queries.push(items[i].clone());
        }
        let expected = queries
            .iter()
            .try_fold(false, |acc, query| -> Result<bool, GcsError> {
                Ok(acc || filter.match_item(&key, query)?)
            })?;
        assert_eq!(filter.match_any(&key, &queries)?, expected);
    }
    Ok(())
}

#[test]
fn test_empty_filter() -> Result<()> {
    let key = [9; KEY_SIZE];
    let filter = GcsBuilder::with_key(key).build()?;
    assert_eq!(filter.n(), 0);
    assert!(filter.is_empty());
    assert!(filter.bytes().is_empty());
    assert!(!filter.match_item(&key, "Alex")?);
    assert!(!filter.match_any(&key, &["Alex", "Bob"])?);
    assert_eq!(filter.iter().count(), 0);
    Ok(())
}

#[test]
fn test_concurrent_queries() -> Result<()> {
    let key = [42; KEY_SIZE];
    let items = (0..10_000_u32).map(u32::to_be_bytes).collect::<Vec<_>>();
    let mut builder = GcsBuilder::with_key(key);
    builder.add_entries(&items);
    let filter = builder.build()?;

    std::thread::scope(|s| -> Result<()> {
        let handles = items
            .chunks(1000)
            .map(|chunk| {
                let filter = &filter;
                s.spawn(move || -> Result<(), GcsError> {
                    for item in chunk.iter().step_by(50) {
                        assert!(filter.match_item(&key, item)?);
                    }
                    assert!(filter.match_any(&key, chunk)?);
                    Ok(())
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("Query thread panicked"))??;
        }
        Ok(())
    })
}

#[test]
fn test_header_chain() -> Result<()> {
    let hash: Hash = "000000000000000000496d7ff9bd2c96154a8d64260e8b3b411e625712abb14c".parse()?;
    let mut prev_header = Hash::default();
    let mut headers = Vec::new();
    for block in 0..3_u32 {
        let mut builder = GcsBuilder::with_key_hash(&hash);
        builder
            .add_outpoint(&OutPoint::new(hash, block))
            .add_entry(block.to_le_bytes());
        let filter = builder.build()?;
        let header = make_header_for_filter(&filter, &prev_header);
        assert_eq!(header, make_header_for_filter(&filter, &prev_header));
        headers.push(header);
        prev_header = header;
    }
    assert_ne!(headers[0], headers[1]);
    assert_ne!(headers[1], headers[2]);
    Ok(())
}
