/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::marker::PhantomData;

use dsi_progress_logger::prelude::*;
use itertools::Itertools;

use crate::bits::BitVec;
use crate::traits::{
    BuildError, FixedWidthKey, MinimalPerfectHash, MonotoneMinimalPerfectHash, PerfectHash,
};

use super::{NonKeyRank, Sentinel};

/// The index used for absent children.
const NIL: u32 = u32::MAX;

#[derive(Debug, Clone)]
pub(super) struct Node {
    /// The edge label leading into this node.
    pub(super) prefix: BitVec,
    /// The number of leaves in the left subtree.
    pub(super) left_leaf_count: usize,
    pub(super) left: u32,
    pub(super) right: u32,
}

/// A compacted binary trie over the bit expansion of the keys, mapping
/// each key to its rank in the key set.
///
/// Every edge carries the maximal prefix shared below it, so internal
/// nodes always have two children and the trie has exactly one leaf per
/// key. Each node records the number of leaves in its left subtree; a
/// rank query descends along a key's expansion summing those counts on
/// every right turn.
///
/// Nodes live in an arena indexed by `u32` and are never reclaimed
/// individually; the structure is meant to be built once and queried.
/// The `P` parameter selects the [`NonKeyRank`] behavior for keys
/// detected as absent.
///
/// # Examples
///
/// ```
/// use stathash::prelude::*;
///
/// let trie = CompactTrie::<u8>::from_keys(&[0, 1, 2, 3, 4, 5, 6, 10]);
/// assert_eq!(trie.rank(6), 6);
/// assert_eq!(trie.rank(10), 7);
/// ```
#[derive(Debug, Clone)]
pub struct CompactTrie<K, P = Sentinel> {
    nodes: Vec<Node>,
    root: u32,
    num_keys: usize,
    _marker: PhantomData<(K, P)>,
}

/// Copies the bits of the range `[start, stop)` into a fresh vector.
fn sub_bits(bits: &BitVec, start: usize, stop: usize) -> BitVec {
    let mut out = BitVec::with_capacity(stop - start);
    let mut i = start;
    while i < stop {
        let cnt = Ord::min(u64::BITS as usize, stop - i);
        out.push_word(bits.extract(i, i + cnt), cnt, 0);
        i += cnt;
    }
    out
}

impl<K: FixedWidthKey, P: NonKeyRank> CompactTrie<K, P> {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NIL,
            num_keys: 0,
            _marker: PhantomData,
        }
    }

    /// Builds a trie over the given keys, ignoring duplicates.
    ///
    /// The keys are sorted before insertion: the overall complexity
    /// does not change, but the constants improve considerably on large
    /// unsorted inputs.
    pub fn from_keys(keys: &[K]) -> Self {
        let keys = keys.iter().copied().sorted_unstable().collect_vec();
        let mut trie = Self::new();
        let mut pl = ProgressLogger::default();
        pl.item_name("key").expected_updates(Some(keys.len()));
        pl.start("Inserting keys...");
        for key in keys {
            trie.insert(key);
            pl.light_update();
        }
        pl.done();
        trie
    }

    /// Builds a trie over the given keys, returning
    /// [`BuildError::DuplicateKey`] if the same key appears twice.
    pub fn from_keys_strict(keys: &[K]) -> Result<Self, BuildError> {
        let keys = keys.iter().copied().sorted_unstable().collect_vec();
        let mut trie = Self::new();
        for key in keys {
            if !trie.insert(key) {
                return Err(BuildError::DuplicateKey);
            }
        }
        Ok(trie)
    }

    fn alloc(&mut self, prefix: BitVec, left_leaf_count: usize, left: u32, right: u32) -> u32 {
        let index = self.nodes.len();
        assert!(index < NIL as usize);
        self.nodes.push(Node {
            prefix,
            left_leaf_count,
            left,
            right,
        });
        index as u32
    }

    /// Inserts a key, returning false if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        let bits = key.to_bits();
        if self.root == NIL {
            let prefix = sub_bits(&bits, 0, bits.len());
            self.root = self.alloc(prefix, 0, NIL, NIL);
            self.num_keys += 1;
            return true;
        }

        let mut cur = self.root;
        let mut start = 0;
        let mut parent = NIL;
        let mut parent_left = false;
        loop {
            // first mismatch between the edge label and the key suffix
            let label_len = self.nodes[cur as usize].prefix.len();
            let mut i = 0;
            while i < label_len {
                debug_assert!(
                    start + i < bits.len(),
                    "key code is a prefix of an existing code"
                );
                if self.nodes[cur as usize].prefix.get(i) != bits.get(start + i) {
                    break;
                }
                i += 1;
            }

            if i < label_len {
                // split the edge at the mismatch
                let label = &self.nodes[cur as usize].prefix;
                let upper = sub_bits(label, 0, i);
                let lower = sub_bits(label, i, label.len());
                let goes_right = bits.get(start + i);
                let left_leaf_count = if goes_right { self.leaf_count(cur) } else { 1 };
                self.nodes[cur as usize].prefix = lower;
                let leaf = self.alloc(sub_bits(&bits, start + i, bits.len()), 0, NIL, NIL);
                let split = if goes_right {
                    self.alloc(upper, left_leaf_count, cur, leaf)
                } else {
                    self.alloc(upper, left_leaf_count, leaf, cur)
                };
                if parent == NIL {
                    self.root = split;
                } else if parent_left {
                    self.nodes[parent as usize].left = split;
                } else {
                    self.nodes[parent as usize].right = split;
                }
                self.num_keys += 1;
                return true;
            }

            if start + label_len == bits.len() {
                // duplicate: undo the counts bumped on the way down
                debug_assert!(self.nodes[cur as usize].left == NIL);
                let mut node = self.root;
                let mut depth = 0;
                while node != cur {
                    depth += self.nodes[node as usize].prefix.len();
                    if bits.get(depth) {
                        node = self.nodes[node as usize].right;
                    } else {
                        self.nodes[node as usize].left_leaf_count -= 1;
                        node = self.nodes[node as usize].left;
                    }
                }
                return false;
            }

            debug_assert!(
                self.nodes[cur as usize].left != NIL,
                "key code extends past an existing code"
            );
            start += label_len;
            parent = cur;
            if bits.get(start) {
                parent_left = false;
                cur = self.nodes[cur as usize].right;
            } else {
                parent_left = true;
                self.nodes[cur as usize].left_leaf_count += 1;
                cur = self.nodes[cur as usize].left;
            }
        }
    }

    /// Returns the number of leaves of the subtree rooted at the given
    /// node.
    pub(super) fn leaf_count(&self, mut node: u32) -> usize {
        let mut count = 0;
        while self.nodes[node as usize].left != NIL {
            count += self.nodes[node as usize].left_leaf_count;
            node = self.nodes[node as usize].right;
        }
        count + 1
    }

    /// Returns the rank of the key in the key set, or the
    /// policy-resolved value if the key is detected as absent.
    pub fn rank(&self, key: K) -> usize {
        if self.root == NIL {
            return 0;
        }
        let bits = key.to_bits();
        let mut cur = self.root;
        let mut start = 0;
        let mut left_leaf_cnt = 0;
        loop {
            let node = &self.nodes[cur as usize];
            if bits.len() - start < node.prefix.len() {
                return P::resolve(left_leaf_cnt);
            }
            if !bits.matches(&node.prefix, start) {
                return P::resolve(left_leaf_cnt);
            }
            start += node.prefix.len();
            if node.left == NIL {
                return if start == bits.len() {
                    left_leaf_cnt
                } else {
                    P::resolve(left_leaf_cnt)
                };
            }
            debug_assert!(start < bits.len());
            if bits.get(start) {
                left_leaf_cnt += node.left_leaf_count;
                cur = node.right;
            } else {
                cur = node.left;
            }
        }
    }

    /// Returns the number of keys in the trie.
    pub fn len(&self) -> usize {
        self.num_keys
    }

    /// Returns true if the trie contains no keys.
    pub fn is_empty(&self) -> bool {
        self.num_keys == 0
    }

    pub(super) fn root(&self) -> u32 {
        self.root
    }

    pub(super) fn node(&self, index: u32) -> &Node {
        &self.nodes[index as usize]
    }

    pub(super) fn is_leaf(&self, index: u32) -> bool {
        self.nodes[index as usize].left == NIL
    }
}

impl<K: FixedWidthKey, P: NonKeyRank> Default for CompactTrie<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FixedWidthKey, P: NonKeyRank> PerfectHash<K> for CompactTrie<K, P> {
    fn build(keys: &[K]) -> Result<Self, BuildError> {
        Ok(Self::from_keys(keys))
    }

    #[inline]
    fn query(&self, key: &K) -> usize {
        self.rank(*key)
    }

    fn byte_size(&self) -> usize {
        core::mem::size_of::<Self>()
            + self
                .nodes
                .iter()
                .map(|node| {
                    core::mem::size_of::<Node>() - core::mem::size_of::<BitVec>()
                        + node.prefix.byte_size()
                })
                .sum::<usize>()
    }

    fn name() -> &'static str {
        "CompactTrie"
    }
}

impl<K: FixedWidthKey, P: NonKeyRank> MinimalPerfectHash<K> for CompactTrie<K, P> {}
impl<K: FixedWidthKey, P: NonKeyRank> MonotoneMinimalPerfectHash<K> for CompactTrie<K, P> {}
