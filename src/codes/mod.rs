/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Instantaneous codes for integers written on [bit streams](crate::bits).

pub mod rice;
pub use rice::*;
