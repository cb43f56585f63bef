/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use gcs_filter::prelude::*;

const CONTENTS: [&str; 17] = [
    "Alex", "Bob", "Charlie", "Dick", "Ed", "Frank", "George", "Harry", "Ilya", "John", "Kevin",
    "Larry", "Michael", "Nate", "Owen", "Paul", "Quentin",
];

const TEST_KEY: FilterKey = [
    0x4c, 0xb1, 0xab, 0x12, 0x57, 0x62, 0x1e, 0x41, 0x3b, 0x8b, 0x0e, 0x26, 0x64, 0x8d, 0x4a, 0x15,
];

const TEST_HASH: &str = "000000000000000000496d7ff9bd2c96154a8d64260e8b3b411e625712abb14c";

/// A pay-to-script-hash script: OP_HASH160 <20 bytes> OP_EQUAL.
fn test_script() -> Vec<u8> {
    let mut script = vec![0xa9, 0x14];
    script.extend((1..=20).map(|i| i * 11));
    script.push(0x87);
    script
}

/// Run the same sequence of additions, builds and queries on a fresh
/// builder.
fn check_builder(builder: &mut GcsBuilder, hash: &Hash, p: u8) -> Result<()> {
    let key = builder.key()?;

    builder.add_entries(CONTENTS);
    let filter = builder.build()?;
    assert_eq!(filter.p(), p);
    assert_eq!(filter.n(), CONTENTS.len() as u32);
    assert!(filter.match_item(&key, "Nate")?);
    // "weks" might be a false positive, with probability 2^-p
    let _ = filter.match_item(&key, "weks")?;

    builder.add_hash(hash);
    let filter = builder.build()?;
    assert!(filter.match_item(&key, hash.as_bytes())?);

    let outpoint = OutPoint::new(*hash, 4321);
    builder.add_outpoint(&outpoint);
    let filter = builder.build()?;
    assert!(filter.match_item(&key, hash.as_bytes())?);
    assert!(filter.match_item(&key, outpoint.to_bytes())?);

    let script = test_script();
    builder.add_script(&script);
    let filter = builder.build()?;
    let pushed = &script[2..22];
    assert!(filter.match_any(&key, &[pushed, script.as_slice()])?);

    // Duplicates do not change the filter
    let n = filter.n();
    assert_eq!(n, CONTENTS.len() as u32 + 3);
    builder.add_script(&script).add_entries(CONTENTS);
    let again = builder.build()?;
    assert_eq!(again.n(), n);
    assert_eq!(again, filter);

    assert_eq!(builder.key()?, key);
    Ok(())
}

#[test]
fn test_use_block_hash() -> Result<()> {
    let hash: Hash = TEST_HASH.parse()?;

    let mut builder = GcsBuilder::with_key_hash(&hash);
    assert_eq!(builder.key()?, TEST_KEY);
    check_builder(&mut builder, &hash, DEFAULT_P)?;

    check_builder(&mut GcsBuilder::with_key_hash_p(&hash, 30), &hash, 30)?;

    let mut builder = GcsBuilder::with_random_key();
    builder.set_key_from_hash(&hash);
    assert_eq!(builder.key()?, TEST_KEY);
    check_builder(&mut builder, &hash, DEFAULT_P)?;

    let mut builder = GcsBuilder::with_random_key();
    let key1 = builder.key()?;
    check_builder(&mut builder, &hash, DEFAULT_P)?;

    let mut builder = GcsBuilder::with_random_key_p(30);
    let key2 = builder.key()?;
    assert_ne!(key1, key2);
    check_builder(&mut builder, &hash, 30)?;

    let mut builder = GcsBuilder::with_key(TEST_KEY);
    assert_eq!(builder.key()?, TEST_KEY);
    check_builder(&mut builder, &hash, DEFAULT_P)?;

    let mut builder = GcsBuilder::with_key_p(TEST_KEY, 30);
    assert_eq!(builder.key()?, TEST_KEY);
    check_builder(&mut builder, &hash, 30)?;

    Ok(())
}

#[test]
fn test_p_too_big() -> Result<()> {
    let hash: Hash = TEST_HASH.parse()?;
    let script = test_script();

    let mut builder = GcsBuilder::with_random_key_p(33);
    builder
        .set_key_from_hash(&hash)
        .set_key(TEST_KEY)
        .set_p(30)
        .add_entry(hash.as_bytes())
        .add_entries(CONTENTS)
        .add_outpoint(&OutPoint::new(hash, 4321))
        .add_hash(&hash)
        .add_script(&script);

    assert_eq!(builder.key(), Err(GcsError::PTooBig(33)));
    assert_eq!(builder.build(), Err(GcsError::PTooBig(33)));
    assert_eq!(builder.build(), Err(GcsError::PTooBig(33)));
    assert_eq!(
        GcsError::PTooBig(33).to_string(),
        format!("P is too big: 33 > {}", MAX_P)
    );
    Ok(())
}

#[test]
fn test_derived_keys() -> Result<()> {
    let hash: Hash = TEST_HASH.parse()?;
    let mut from_hash = GcsBuilder::with_key_hash(&hash);
    let mut from_key = GcsBuilder::with_key(derive_key(&hash));
    from_hash.add_entries(CONTENTS);
    from_key.add_entries(CONTENTS.iter().rev());
    assert_eq!(from_hash.build()?, from_key.build()?);

    // A different key gives, with overwhelming probability, a different
    // filter
    let mut other = GcsBuilder::with_key([0; KEY_SIZE]);
    other.add_entries(CONTENTS);
    assert_ne!(other.build()?, from_hash.build()?);
    Ok(())
}
