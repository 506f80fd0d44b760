/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Elias γ and δ codes over a [`BitVec`].
//!
//! Both codes have domain `x ≥ 1`. Writes append at the end of the
//! vector; reads take a mutable bit cursor, which is advanced past the
//! decoded codeword, so that consecutive codewords can be decoded
//! back to back from any starting position.
//!
//! A γ codeword for `x` is the unary code of `N = ⌊log₂ x⌋` (`N` zeros
//! and a one) followed by the `N` lowest bits of `x`, for a total of
//! `2N + 1` bits. A δ codeword is the γ code of `N + 1` followed by the
//! `N` lowest bits of `x`, which is asymptotically shorter.
//!
//! Decoding a truncated stream is a programmer error: the structures
//! owning the stream guarantee that a full codeword is present, and the
//! bounds assertions of [`BitVec::extract`] will catch violations.

use super::bit_width;
use super::BitVec;

impl BitVec {
    /// Appends the Elias γ code of `x`, which must be nonzero.
    pub fn write_gamma(&mut self, x: u64) {
        debug_assert!(x != 0, "cannot γ-encode 0");
        let n = bit_width(x) - 1;
        if n > 0 {
            self.push_word(0, n, 0);
        }
        self.push(true);
        if n > 0 {
            self.push_word(x, n, 0);
        }
    }

    /// Reads an Elias γ code starting at `*cursor`, advancing the
    /// cursor past it.
    pub fn read_gamma(&self, cursor: &mut usize) -> u64 {
        let n = self.count_zeros(*cursor);
        debug_assert!(n < u64::BITS as usize);
        *cursor += n + 1;
        let x = 1_u64 << n | self.extract(*cursor, *cursor + n);
        *cursor += n;
        x
    }

    /// Appends the Elias δ code of `x`, which must be nonzero.
    pub fn write_delta(&mut self, x: u64) {
        debug_assert!(x != 0, "cannot δ-encode 0");
        let n = bit_width(x) - 1;
        self.write_gamma(n as u64 + 1);
        if n > 0 {
            self.push_word(x, n, 0);
        }
    }

    /// Reads an Elias δ code starting at `*cursor`, advancing the
    /// cursor past it.
    pub fn read_delta(&self, cursor: &mut usize) -> u64 {
        let n = (self.read_gamma(cursor) - 1) as usize;
        debug_assert!(n < u64::BITS as usize);
        let x = 1_u64 << n | self.extract(*cursor, *cursor + n);
        *cursor += n;
        x
    }
}
