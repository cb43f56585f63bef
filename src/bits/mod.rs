/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Bit streams packing bits most-significant first within each byte.

pub mod bit_stream;
pub use bit_stream::*;
