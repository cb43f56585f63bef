/*
 *
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Utility functions and structures.

*/

pub mod compact_size;
pub use compact_size::*;

pub mod file;
pub use file::*;
