/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::bits::BitVec;

/// An unsigned integer type usable as a key for the structures of this
/// crate.
///
/// Keys must fit in a 64-bit word and expose their exact width, so that
/// the big-endian bit expansion of the whole key set is a prefix-free
/// code: no expansion can be a prefix of another, which is what the
/// tries rely on.
pub trait FixedWidthKey: Copy + Ord + core::fmt::Debug {
    /// The width of the key type in bits.
    const BITS: usize;

    /// Returns the key as a word, value preserving.
    fn to_word(self) -> u64;

    /// The inverse of [`to_word`](FixedWidthKey::to_word).
    fn from_word(word: u64) -> Self;

    /// Expands the key into its big-endian bit string: bit `i` of the
    /// result is bit `BITS − 1 − i` of the key.
    fn to_bits(self) -> BitVec {
        let word = self.to_word();
        BitVec::from_fn(Self::BITS, |i| (word >> (Self::BITS - 1 - i)) & 1 != 0)
    }

    /// The inverse of [`to_bits`](FixedWidthKey::to_bits).
    fn from_bits(bits: &BitVec) -> Self {
        debug_assert_eq!(bits.len(), Self::BITS);
        let mut word = 0;
        for i in 0..Self::BITS {
            word = (word << 1) | bits.get(i) as u64;
        }
        Self::from_word(word)
    }
}

macro_rules! impl_fixed_width_key {
    ($($ty:ty),*) => {$(
        impl FixedWidthKey for $ty {
            const BITS: usize = <$ty>::BITS as usize;

            #[inline(always)]
            fn to_word(self) -> u64 {
                self as u64
            }

            #[inline(always)]
            fn from_word(word: u64) -> Self {
                word as $ty
            }
        }
    )*};
}

impl_fixed_width_key!(u8, u16, u32, u64, usize);
