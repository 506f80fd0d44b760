/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::marker::PhantomData;

use crate::bits::BitVec;
use crate::traits::{
    BuildError, FixedWidthKey, MinimalPerfectHash, MonotoneMinimalPerfectHash, PerfectHash,
};

use super::{CompactTrie, NonKeyRank, Sentinel};

/// A [`CompactTrie`] re-encoded as a single bit stream, answering the
/// same rank queries without materializing nodes.
///
/// The stream is the depth-first preorder of the internal nodes of the
/// compacted trie; the leaf level is pruned. Each node contributes
///
/// ```text
/// δ(|prefix| + 1) · prefix · δ(left_bitsize + 1) · δ(left_leaf_count)
/// ```
///
/// where `left_bitsize` is the size in bits of the encoding of the left
/// subtree, immediately following the node, and `left_leaf_count` is
/// its number of leaves. The two lengths are stored off by one to keep
/// them in the δ domain.
///
/// A query walks the stream with a bit cursor: a left turn enters the
/// next node in the stream, a right turn skips `left_bitsize` bits.
/// Leaves are implicit: the left child is a leaf when the node holds a
/// single left leaf, and the right child is a leaf when skipping the
/// left subtree crosses the boundary of the closest enclosing left
/// subtree, tracked as a watermark.
///
/// # Examples
///
/// ```
/// use stathash::prelude::*;
///
/// let trie = HollowTrie::<u8>::from_keys(&[0, 1, 2, 3, 4, 5, 6, 10]);
/// assert_eq!(trie.rank(6), 6);
/// assert_eq!(trie.rank(10), 7);
/// ```
#[derive(Debug, Clone)]
pub struct HollowTrie<K, P = Sentinel> {
    repr: BitVec,
    _marker: PhantomData<(K, P)>,
}

impl<K: FixedWidthKey, P: NonKeyRank> HollowTrie<K, P> {
    /// Builds a hollow trie over the given keys, ignoring duplicates.
    pub fn from_keys(keys: &[K]) -> Self {
        Self::from_compact_trie(&CompactTrie::from_keys(keys))
    }

    /// Re-encodes an existing compacted trie.
    pub fn from_compact_trie(trie: &CompactTrie<K, P>) -> Self {
        let repr = if trie.is_empty() {
            BitVec::new()
        } else {
            Self::convert(trie, trie.root())
        };
        Self {
            repr,
            _marker: PhantomData,
        }
    }

    fn convert(trie: &CompactTrie<K, P>, index: u32) -> BitVec {
        // the leaf level is pruned
        if trie.is_leaf(index) {
            return BitVec::new();
        }
        let node = trie.node(index);
        let left = Self::convert(trie, node.left);
        let right = Self::convert(trie, node.right);

        let mut repr = BitVec::with_capacity(left.len() + right.len());
        repr.write_delta(node.prefix.len() as u64 + 1);
        repr.extend_from_bit_vec(&node.prefix);
        repr.write_delta(left.len() as u64 + 1);
        repr.write_delta(trie.leaf_count(node.left) as u64);
        repr.extend_from_bit_vec(&left);
        repr.extend_from_bit_vec(&right);
        repr
    }

    /// Returns the rank of the key in the key set, or the
    /// policy-resolved value if the key is detected as absent.
    pub fn rank(&self, key: K) -> usize {
        // a trie over at most one key has no internal nodes
        if self.repr.is_empty() {
            return 0;
        }

        let bits = key.to_bits();
        let mut left_leaf_cnt = 0;
        let mut key_ind = 0;
        let mut leftmost_right = self.repr.len();
        let mut bit_ind = 0;
        while key_ind < bits.len() {
            let prefix_len = (self.repr.read_delta(&mut bit_ind) - 1) as usize;
            let prefix_start = bit_ind;
            bit_ind += prefix_len;
            let left_bitsize = (self.repr.read_delta(&mut bit_ind) - 1) as usize;
            let left_leaf_count = self.repr.read_delta(&mut bit_ind) as usize;

            if bits.len() - key_ind < prefix_len {
                return P::resolve(left_leaf_cnt);
            }
            let mut i = 0;
            while i < prefix_len {
                let cnt = Ord::min(u64::BITS as usize, prefix_len - i);
                if self.repr.extract(prefix_start + i, prefix_start + i + cnt)
                    != bits.extract(key_ind + i, key_ind + i + cnt)
                {
                    return P::resolve(left_leaf_cnt);
                }
                i += cnt;
            }
            key_ind += prefix_len;

            debug_assert!(key_ind < bits.len());
            if bits.get(key_ind) {
                left_leaf_cnt += left_leaf_count;
                // the right child follows the left subtree
                bit_ind += left_bitsize;
                // crossing the enclosing left subtree means the right
                // child is a leaf
                if bit_ind >= leftmost_right {
                    return left_leaf_cnt;
                }
            } else {
                if left_leaf_count == 1 {
                    return left_leaf_cnt;
                }
                leftmost_right = bit_ind + left_bitsize;
                // the left child starts right here
            }
        }

        P::resolve(left_leaf_cnt)
    }

    /// Returns the size in bits of the encoding.
    pub fn bit_size(&self) -> usize {
        self.repr.len()
    }
}

impl<K: FixedWidthKey, P: NonKeyRank> PerfectHash<K> for HollowTrie<K, P> {
    fn build(keys: &[K]) -> Result<Self, BuildError> {
        Ok(Self::from_keys(keys))
    }

    #[inline]
    fn query(&self, key: &K) -> usize {
        self.rank(*key)
    }

    fn byte_size(&self) -> usize {
        core::mem::size_of::<Self>() - core::mem::size_of::<BitVec>() + self.repr.byte_size()
    }

    fn name() -> &'static str {
        "HollowTrie"
    }
}

impl<K: FixedWidthKey, P: NonKeyRank> MinimalPerfectHash<K> for HollowTrie<K, P> {}
impl<K: FixedWidthKey, P: NonKeyRank> MonotoneMinimalPerfectHash<K> for HollowTrie<K, P> {}
