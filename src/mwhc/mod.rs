/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The Majewski–Wormald–Havas–Czech construction and its variants.
//!
//! All structures in this module hash each key to a triple of vertices
//! of a random 3-uniform hypergraph with about 1.23 vertices per key,
//! reseeding until the hypergraph can be peeled, and then assign values
//! to the vertices walking the peeling order backwards, so that the
//! values met by a key's triple combine to the desired output:
//!
//! - [`Mwhc`] stores one value per vertex and combines them by sum
//!   modulo the number of vertices, realizing an order-preserving
//!   minimal perfect hash function;
//! - [`CompressedMwhc`] and [`CompactedMwhc`] answer exactly the same
//!   queries from a bit-compressed, respectively rank-compacted, value
//!   array;
//! - [`BitMwhc`] spends only two bits per vertex to select one vertex
//!   of the triple, realizing a plain perfect hash function, and
//!   [`RankedBitMwhc`] makes it minimal with a ranked bit vector.

use core::marker::PhantomData;

use dsi_progress_logger::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

use crate::bits::{bit_width, BitVec, CompactArray, Rank9};
use crate::traits::{
    BuildError, FixedWidthKey, MinimalPerfectHash, OrderPreservingMphf, PerfectHash,
};

mod hasher;
use hasher::EdgeHasher;

mod hypergraph;
use hypergraph::HyperGraph;

mod bit_mwhc;
pub use bit_mwhc::{BitMwhc, RankedBitMwhc};

/// Vertices allocated per key; peeling succeeds with high probability
/// above the 3-uniform hypergraph threshold of about 1.22.
const OVERALLOC: f64 = 1.23;

/// Seeding attempts before giving up with
/// [`ConstructionFailed`](BuildError::ConstructionFailed).
const MAX_ATTEMPTS: usize = 16;

fn num_vertices(num_keys: usize) -> usize {
    Ord::max(1, (OVERALLOC * num_keys as f64).ceil() as usize)
}

/// Draws seeds and builds hypergraphs until one can be peeled, up to
/// the attempt cap.
///
/// On success returns the winning hasher together with the peeling
/// order of the edges.
fn peel_hypergraph<K: FixedWidthKey, R: Rng>(
    keys: &[K],
    num_vertices: usize,
    rng: &mut R,
) -> Result<(EdgeHasher, Vec<usize>), BuildError> {
    for attempt in 0..MAX_ATTEMPTS {
        let hasher = EdgeHasher::new(num_vertices, rng);
        let edges = keys
            .iter()
            .map(|key| hasher.triple(key.to_word()))
            .collect();
        let order = HyperGraph::new(num_vertices, edges).peel();
        if order.len() == keys.len() {
            return Ok((hasher, order));
        }
        log::debug!(
            "hypergraph on {} vertices was cyclic; reseeding (attempt {}/{})",
            num_vertices,
            attempt + 1,
            MAX_ATTEMPTS
        );
    }
    Err(BuildError::ConstructionFailed {
        attempts: MAX_ATTEMPTS,
    })
}

/// An order-preserving minimal perfect hash function à la
/// Majewski–Wormald–Havas–Czech.
///
/// Each key is mapped to its position in the build slice by summing,
/// modulo the number of vertices `N`, the values its triple of vertices
/// received during construction. Unassigned cells hold the sentinel
/// `N`, which is congruent to zero, so they never perturb the sum.
///
/// Construction takes expected linear time but needs about
/// `1.23 ⌈log₂ N⌉` bits per key once compressed (see
/// [`CompressedMwhc`]); this plain variant spends a full word per
/// vertex in exchange for the fastest queries.
#[derive(Debug, Clone)]
pub struct Mwhc<K> {
    hasher: EdgeHasher,
    values: Vec<usize>,
    _marker: PhantomData<K>,
}

impl<K: FixedWidthKey> Mwhc<K> {
    /// Builds the function over the given keys with a deterministic
    /// seed, mapping each key to its position in the slice.
    pub fn with_seed(keys: &[K], seed: u64) -> Result<Self, BuildError> {
        Self::with_rng(keys, &mut SmallRng::seed_from_u64(seed))
    }

    fn with_rng<R: Rng>(keys: &[K], rng: &mut R) -> Result<Self, BuildError> {
        let n = num_vertices(keys.len());
        let (hasher, order) = peel_hypergraph(keys, n, rng)?;

        let mut values = vec![n; n];
        let mut pl = ProgressLogger::default();
        pl.item_name("edge")
            .expected_updates(Some(keys.len()));
        pl.start("Assigning vertex values...");
        for &e in order.iter().rev() {
            let [a, b, c] = hasher.triple(keys[e].to_word());
            // skip duplicates of coincident vertices in the sum
            let mut sum = values[a];
            if b != a {
                sum += values[b];
            }
            if c != a && c != b {
                sum += values[c];
            }
            let x = (n + e - sum % n) % n;
            // at peeling time at least one vertex of this edge had
            // degree one, so at least one cell is still unassigned
            let mut assigned = false;
            for v in [a, b, c] {
                if values[v] == n {
                    values[v] = if assigned { 0 } else { x };
                    assigned = true;
                }
            }
            debug_assert!(assigned);
            pl.light_update();
        }
        pl.done();

        Ok(Self {
            hasher,
            values,
            _marker: PhantomData,
        })
    }

    /// Returns the number of vertices of the underlying hypergraph.
    pub fn num_vertices(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn query_value(&self, key: &K) -> usize {
        let [a, b, c] = self.hasher.triple(key.to_word());
        let mut sum = self.values[a];
        if b != a {
            sum += self.values[b];
        }
        if c != a && c != b {
            sum += self.values[c];
        }
        sum % self.values.len()
    }
}

impl<K: FixedWidthKey> PerfectHash<K> for Mwhc<K> {
    fn build(keys: &[K]) -> Result<Self, BuildError> {
        Self::with_seed(keys, rand::rng().random())
    }

    #[inline]
    fn query(&self, key: &K) -> usize {
        self.query_value(key)
    }

    fn byte_size(&self) -> usize {
        core::mem::size_of::<Self>() + self.values.len() * core::mem::size_of::<usize>()
    }

    fn name() -> &'static str {
        "MWHC"
    }
}

impl<K: FixedWidthKey> MinimalPerfectHash<K> for Mwhc<K> {}
impl<K: FixedWidthKey> OrderPreservingMphf<K> for Mwhc<K> {}

/// [`Mwhc`] with the value array stored at the width of its largest
/// value.
///
/// Cells holding `0` or the sentinel `N` are both congruent to zero
/// modulo `N`, so they are stored as zero; the rest are copied
/// verbatim. Queries return exactly the same values as the plain
/// engine.
#[derive(Debug, Clone)]
pub struct CompressedMwhc<K> {
    hasher: EdgeHasher,
    values: CompactArray,
    _marker: PhantomData<K>,
}

impl<K: FixedWidthKey> CompressedMwhc<K> {
    /// Builds the function over the given keys with a deterministic
    /// seed.
    pub fn with_seed(keys: &[K], seed: u64) -> Result<Self, BuildError> {
        Ok(Self::from_mwhc(Mwhc::with_seed(keys, seed)?))
    }

    /// Compresses the value array of an existing function.
    pub fn from_mwhc(mwhc: Mwhc<K>) -> Self {
        let n = mwhc.values.len();
        let is_set = |value: usize| value != 0 && value != n;
        let max = mwhc
            .values
            .iter()
            .copied()
            .filter(|&value| is_set(value))
            .max()
            .unwrap_or(0);
        let mut values = CompactArray::new(Ord::max(1, bit_width(max as u64)), n);
        for (i, &value) in mwhc.values.iter().enumerate() {
            if is_set(value) {
                values.set(i, value as u64);
            }
        }
        Self {
            hasher: mwhc.hasher,
            values,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn query_value(&self, key: &K) -> usize {
        let [a, b, c] = self.hasher.triple(key.to_word());
        let mut sum = self.values.get(a) as usize;
        if b != a {
            sum += self.values.get(b) as usize;
        }
        if c != a && c != b {
            sum += self.values.get(c) as usize;
        }
        sum % self.values.len()
    }
}

impl<K: FixedWidthKey> PerfectHash<K> for CompressedMwhc<K> {
    fn build(keys: &[K]) -> Result<Self, BuildError> {
        Self::with_seed(keys, rand::rng().random())
    }

    #[inline]
    fn query(&self, key: &K) -> usize {
        self.query_value(key)
    }

    fn byte_size(&self) -> usize {
        core::mem::size_of::<Self>() - core::mem::size_of::<CompactArray>()
            + self.values.byte_size()
    }

    fn name() -> &'static str {
        "CompressedMWHC"
    }
}

impl<K: FixedWidthKey> MinimalPerfectHash<K> for CompressedMwhc<K> {}
impl<K: FixedWidthKey> OrderPreservingMphf<K> for CompressedMwhc<K> {}

/// [`Mwhc`] with unset cells dropped altogether.
///
/// A bit vector with rank support marks the cells that hold a value
/// that is not congruent to zero; only those are stored, densely, and
/// a query reads the cell of vertex `v` as `marked(v) ·
/// dense[rank₁(v)]`. On sparse assignments this beats
/// [`CompressedMwhc`], at the price of a rank per vertex probed.
#[derive(Debug, Clone)]
pub struct CompactedMwhc<K> {
    hasher: EdgeHasher,
    marked: Rank9,
    values: CompactArray,
    _marker: PhantomData<K>,
}

impl<K: FixedWidthKey> CompactedMwhc<K> {
    /// Builds the function over the given keys with a deterministic
    /// seed.
    pub fn with_seed(keys: &[K], seed: u64) -> Result<Self, BuildError> {
        Ok(Self::from_mwhc(Mwhc::with_seed(keys, seed)?))
    }

    /// Compacts the value array of an existing function.
    pub fn from_mwhc(mwhc: Mwhc<K>) -> Self {
        let n = mwhc.values.len();
        let is_set = |value: usize| value != 0 && value != n;

        let mut marks = BitVec::new_filled(n, false);
        let mut num_set = 0;
        let mut max = 0;
        for (i, &value) in mwhc.values.iter().enumerate() {
            if is_set(value) {
                marks.set(i, true);
                num_set += 1;
                max = Ord::max(max, value);
            }
        }

        let mut values = CompactArray::new(Ord::max(1, bit_width(max as u64)), num_set);
        let mut next = 0;
        for &value in &mwhc.values {
            if is_set(value) {
                values.set(next, value as u64);
                next += 1;
            }
        }

        Self {
            hasher: mwhc.hasher,
            marked: Rank9::new(marks),
            values,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn cell(&self, v: usize) -> usize {
        if self.marked.get(v) {
            self.values.get(self.marked.rank1(v)) as usize
        } else {
            0
        }
    }

    #[inline]
    fn query_value(&self, key: &K) -> usize {
        let [a, b, c] = self.hasher.triple(key.to_word());
        let mut sum = self.cell(a);
        if b != a {
            sum += self.cell(b);
        }
        if c != a && c != b {
            sum += self.cell(c);
        }
        sum % self.marked.bit_vec().len()
    }
}

impl<K: FixedWidthKey> PerfectHash<K> for CompactedMwhc<K> {
    fn build(keys: &[K]) -> Result<Self, BuildError> {
        Self::with_seed(keys, rand::rng().random())
    }

    #[inline]
    fn query(&self, key: &K) -> usize {
        self.query_value(key)
    }

    fn byte_size(&self) -> usize {
        core::mem::size_of::<Self>() - core::mem::size_of::<Rank9>()
            - core::mem::size_of::<CompactArray>()
            + self.marked.byte_size()
            + self.values.byte_size()
    }

    fn name() -> &'static str {
        "CompactedMWHC"
    }
}

impl<K: FixedWidthKey> MinimalPerfectHash<K> for CompactedMwhc<K> {}
impl<K: FixedWidthKey> OrderPreservingMphf<K> for CompactedMwhc<K> {}
