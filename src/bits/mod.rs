/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Succinct support structures: a packed bit vector, Elias γ/δ codecs,
//! fixed-width packed arrays, an Elias–Fano list, and rank-1 support.

mod bit_vec;
pub use bit_vec::BitVec;

mod elias;

mod compact_array;
pub use compact_array::CompactArray;

mod elias_fano;
pub use elias_fano::EliasFanoList;

mod rank;
pub use rank::Rank9;

/// Returns the number of bits needed to represent `x`, that is,
/// `⌊log₂ x⌋ + 1` for positive `x` and `0` for `x = 0`.
#[inline(always)]
pub(crate) fn bit_width(x: u64) -> usize {
    (u64::BITS - x.leading_zeros()) as usize
}
