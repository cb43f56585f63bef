/*
 *
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Lending filter items from files.

*/

use flate2::read::GzDecoder;
use lender::*;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};
use zstd::stream::read::Decoder;

/**

A structure lending the lines coming from a [`BufRead`] as `&[u8]`.

Lines are not required to be valid UTF-8, as filter items are arbitrary byte
strings. A trailing `\n` or `\r\n` is removed. The lines are read into a
reusable internal buffer that grows as needed.

For convenience, we implement [`From`] from [`BufRead`].

*/
pub struct ItemLender<B> {
    buf: B,
    line: Vec<u8>,
}

impl<B> ItemLender<B> {
    pub fn new(buf: B) -> Self {
        ItemLender {
            buf,
            line: Vec::with_capacity(128),
        }
    }
}

impl<B> From<B> for ItemLender<B> {
    fn from(buf: B) -> Self {
        ItemLender::new(buf)
    }
}

impl ItemLender<Box<dyn BufRead>> {
    /// Open a file of items, one per line.
    ///
    /// Files ending in `.gz` are decompressed with gzip, and files ending in
    /// `.zst` with Zstandard.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let buf: Box<dyn BufRead> = match path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Box::new(BufReader::new(GzDecoder::new(file))),
            Some("zst") => Box::new(BufReader::new(Decoder::new(file)?)),
            _ => Box::new(BufReader::new(file)),
        };
        Ok(ItemLender::new(buf))
    }
}

impl<'lend, B: BufRead> Lending<'lend> for ItemLender<B> {
    type Lend = io::Result<&'lend [u8]>;
}

impl<B: BufRead> Lender for ItemLender<B> {
    fn next(&mut self) -> Option<Lend<'_, Self>> {
        self.line.clear();
        match self.buf.read_until(b'\n', &mut self.line) {
            Err(e) => Some(Err(e)),
            Ok(0) => None,
            Ok(_) => {
                if self.line.ends_with(b"\n") {
                    self.line.pop();
                    if self.line.ends_with(b"\r") {
                        self.line.pop();
                    }
                }
                Some(Ok(self.line.as_slice()))
            }
        }
    }
}
