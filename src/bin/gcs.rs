/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use dsi_progress_logger::*;
use epserde::prelude::*;
use gcs_filter::prelude::*;
use gcs_filter::utils::ItemLender;
use lender::Lender;
use log::info;
use mem_dbg::{DbgFlags, MemDbg, MemSize, SizeFlags};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Builds and queries Golomb-coded set filters", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Builds a filter from a file of items, one per line, and optionally
    /// stores it.
    Build {
        /// A file containing items, one per line; it can be compressed with
        /// gzip (.gz) or Zstandard (.zst).
        items: PathBuf,
        /// An optional name for the serialized filter.
        output: Option<PathBuf>,
        /// The key as 32 hexadecimal digits; if neither a key nor a block
        /// hash is given, a random key is used.
        #[arg(short, long, conflicts_with = "block_hash")]
        key: Option<String>,
        /// Derive the key from this block hash (64 hexadecimal digits, block
        /// explorer order).
        #[arg(short, long)]
        block_hash: Option<String>,
        /// The Rice parameter.
        #[arg(short, default_value_t = DEFAULT_P)]
        p: u8,
        /// Store the filter in wire format (compact-size count followed by
        /// the Rice-coded data) instead of ε-serde format.
        #[arg(short, long)]
        wire: bool,
    },
    /// Loads a filter and queries it.
    Query {
        /// The serialized filter.
        filter: PathBuf,
        /// The key used to build the filter, as 32 hexadecimal digits.
        #[arg(short, long)]
        key: String,
        /// The items to look for.
        items: Vec<String>,
        /// The filter is in wire format.
        #[arg(short, long, requires = "p")]
        wire: bool,
        /// The Rice parameter of a wire-format filter.
        #[arg(short)]
        p: Option<u8>,
    },
}

fn parse_key(hex: &str) -> Result<FilterKey> {
    if hex.len() != 2 * KEY_SIZE {
        bail!(
            "Keys must have {} hexadecimal digits, found {}",
            2 * KEY_SIZE,
            hex.len()
        );
    }
    let mut key = [0; KEY_SIZE];
    faster_hex::hex_decode(hex.as_bytes(), &mut key)
        .map_err(|err| anyhow::anyhow!("Invalid key {}: {:?}", hex, err))?;
    Ok(key)
}

fn build(
    items: PathBuf,
    output: Option<PathBuf>,
    key: Option<String>,
    block_hash: Option<String>,
    p: u8,
    wire: bool,
) -> Result<()> {
    let mut builder = match (key, block_hash) {
        (Some(key), _) => GcsBuilder::with_key_p(parse_key(&key)?, p),
        (None, Some(hash)) => GcsBuilder::with_key_hash_p(&hash.parse()?, p),
        (None, None) => GcsBuilder::with_random_key_p(p),
    };
    // Fail before reading the items
    let key = builder.key()?;

    let mut pl = ProgressLogger::default();
    pl.item_name("item");
    pl.start(format!("Reading items from {}...", items.display()));
    let mut lender = ItemLender::from_path(&items)?;
    while let Some(item) = lender.next() {
        builder.add_entry(item?);
        pl.light_update();
    }
    pl.done();

    let filter = builder.build()?;
    info!("Key: {}", faster_hex::hex_string(&key));
    info!(
        "Entries: {} distinct out of {}, p = {}",
        filter.n(),
        builder.len(),
        p
    );
    info!(
        "Size: {} bytes ({:.3} bits/entry)",
        filter.bytes().len(),
        (8 * filter.bytes().len()) as f64 / filter.n().max(1) as f64
    );
    info!("Hash: {}", filter.hash());
    filter.mem_dbg(DbgFlags::default())?;

    if let Some(output) = output {
        if wire {
            std::fs::write(&output, filter.n_bytes())?;
        } else {
            filter.store(&output)?;
        }
        info!("Filter stored in {}", output.display());
    }
    Ok(())
}

fn query(filter: PathBuf, key: String, items: Vec<String>, wire: bool, p: Option<u8>) -> Result<()> {
    let key = parse_key(&key)?;
    let filter = if wire {
        let Some(p) = p else {
            bail!("Wire-format filters require the Rice parameter");
        };
        GcsFilter::from_n_bytes(p, &std::fs::read(&filter)?)?
    } else {
        GcsFilter::load_full(&filter)?
    };
    info!(
        "Loaded filter with {} entries, p = {}, {} bytes in memory",
        filter.n(),
        filter.p(),
        filter.mem_size(SizeFlags::default())
    );

    for item in &items {
        println!("{}\t{}", item, filter.match_item(&key, item)?);
    }
    println!("any\t{}", filter.match_any(&key, &items)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .try_init()?;

    match Args::parse().command {
        Command::Build {
            items,
            output,
            key,
            block_hash,
            p,
            wire,
        } => build(items, output, key, block_hash, p, wire),
        Command::Query {
            filter,
            key,
            items,
            wire,
            p,
        } => query(filter, key, items, wire, p),
    }
}
