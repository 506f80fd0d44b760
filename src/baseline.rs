/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Trivial reference structures.
//!
//! These exist to anchor the space/speed trade-off: a structure slower
//! than [`RankHash`] is only justified by using less space, and one
//! using more space is not justified at all.

use core::marker::PhantomData;

use itertools::Itertools;

use crate::traits::{
    BuildError, FixedWidthKey, MinimalPerfectHash, MonotoneMinimalPerfectHash, PerfectHash,
};

/// The identity function on the key word: trivially perfect over the
/// whole key type, with an image as wide as the type itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoNothingHash<K> {
    _marker: PhantomData<K>,
}

impl<K: FixedWidthKey> PerfectHash<K> for DoNothingHash<K> {
    fn build(_keys: &[K]) -> Result<Self, BuildError> {
        Ok(Self {
            _marker: PhantomData,
        })
    }

    #[inline(always)]
    fn query(&self, key: &K) -> usize {
        key.to_word() as usize
    }

    fn byte_size(&self) -> usize {
        core::mem::size_of::<Self>()
    }

    fn name() -> &'static str {
        "DoNothingHash"
    }
}

/// Rank by binary search over the sorted key set, with every second key
/// dropped.
///
/// A key at an even position of the sorted input is found directly; a
/// key at an odd position falls in the gap between two stored keys, and
/// its position is reconstructed from the insertion point. Non-member
/// keys get an unspecified nearby rank.
#[derive(Debug, Clone)]
pub struct RankHash<K> {
    keys: Vec<K>,
}

impl<K: FixedWidthKey> PerfectHash<K> for RankHash<K> {
    fn build(keys: &[K]) -> Result<Self, BuildError> {
        let keys = keys
            .iter()
            .copied()
            .sorted_unstable()
            .step_by(2)
            .collect();
        Ok(Self { keys })
    }

    #[inline]
    fn query(&self, key: &K) -> usize {
        let pos = self.keys.partition_point(|stored| stored < key);
        if pos < self.keys.len() && self.keys[pos] == *key {
            2 * pos
        } else {
            (2 * pos).saturating_sub(1)
        }
    }

    fn byte_size(&self) -> usize {
        core::mem::size_of::<Self>() + self.keys.len() * core::mem::size_of::<K>()
    }

    fn name() -> &'static str {
        "RankHash"
    }
}

impl<K: FixedWidthKey> MinimalPerfectHash<K> for RankHash<K> {}
impl<K: FixedWidthKey> MonotoneMinimalPerfectHash<K> for RankHash<K> {}
