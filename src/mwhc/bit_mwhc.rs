/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::marker::PhantomData;

use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

use crate::bits::{BitVec, CompactArray, Rank9};
use crate::traits::{BuildError, FixedWidthKey, MinimalPerfectHash, PerfectHash};

use super::hasher::EdgeHasher;
use super::{num_vertices, peel_hypergraph};

/// The sentinel marking an unassigned 2-bit cell; congruent to zero
/// modulo 3, so unassigned cells never perturb a query.
const UNSET: u64 = 3;

/// A perfect hash function storing two bits per hypergraph vertex.
///
/// Instead of encoding a key's position in its triple's values, as
/// [`Mwhc`](super::Mwhc) does, this variant only encodes *which* vertex
/// of the triple was peeled for the key: the 2-bit cells of the triple
/// sum to the position of that vertex modulo 3, and the query returns
/// the vertex itself. Since every vertex is peeled at most once, the
/// result is a perfect hash into the vertex range, using two bits per
/// vertex regardless of the number of keys.
#[derive(Debug, Clone)]
pub struct BitMwhc<K> {
    hasher: EdgeHasher,
    values: CompactArray,
    _marker: PhantomData<K>,
}

impl<K: FixedWidthKey> BitMwhc<K> {
    /// Builds the function over the given keys with a deterministic
    /// seed.
    pub fn with_seed(keys: &[K], seed: u64) -> Result<Self, BuildError> {
        Self::with_rng(keys, &mut SmallRng::seed_from_u64(seed))
    }

    fn with_rng<R: Rng>(keys: &[K], rng: &mut R) -> Result<Self, BuildError> {
        let n = num_vertices(keys.len());
        let (hasher, order) = peel_hypergraph(keys, n, rng)?;

        let mut values = CompactArray::filled_max(2, n);
        for &e in order.iter().rev() {
            let triple = hasher.triple(keys[e].to_word());
            let [a, b, c] = triple;
            let mut sum = values.get(a);
            if b != a {
                sum += values.get(b);
            }
            if c != a && c != b {
                sum += values.get(c);
            }
            // the position in the triple of the first unassigned
            // vertex, which the query must select
            let position = triple
                .iter()
                .position(|&v| values.get(v) == UNSET)
                .expect("peeled edge with no unassigned vertex");
            let x = (3 + position as u64 - sum % 3) % 3;
            let mut assigned = false;
            for &v in &triple {
                if values.get(v) == UNSET {
                    values.set(v, if assigned { 0 } else { x });
                    assigned = true;
                }
            }
        }

        Ok(Self {
            hasher,
            values,
            _marker: PhantomData,
        })
    }

    /// Returns the number of vertices of the underlying hypergraph,
    /// which bounds the image of the function.
    pub fn num_vertices(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn query_value(&self, key: &K) -> usize {
        let triple = self.hasher.triple(key.to_word());
        let [a, b, c] = triple;
        let mut sum = self.values.get(a);
        if b != a {
            sum += self.values.get(b);
        }
        if c != a && c != b {
            sum += self.values.get(c);
        }
        triple[(sum % 3) as usize]
    }
}

impl<K: FixedWidthKey> PerfectHash<K> for BitMwhc<K> {
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
        "BitMWHC"
    }
}

/// [`BitMwhc`] composed with a ranked bit vector marking the occupied
/// vertices, turning the perfect hash into a minimal one.
///
/// The ordering of the output values follows the (arbitrary) vertex
/// numbering, so this function is minimal but neither monotone nor
/// order preserving.
#[derive(Debug, Clone)]
pub struct RankedBitMwhc<K> {
    mwhc: BitMwhc<K>,
    occupied: Rank9,
}

impl<K: FixedWidthKey> RankedBitMwhc<K> {
    /// Builds the function over the given keys with a deterministic
    /// seed.
    pub fn with_seed(keys: &[K], seed: u64) -> Result<Self, BuildError> {
        let mwhc = BitMwhc::with_seed(keys, seed)?;
        let mut marks = BitVec::new_filled(mwhc.num_vertices(), false);
        for key in keys {
            marks.set(mwhc.query_value(key), true);
        }
        Ok(Self {
            mwhc,
            occupied: Rank9::new(marks),
        })
    }
}

impl<K: FixedWidthKey> PerfectHash<K> for RankedBitMwhc<K> {
    fn build(keys: &[K]) -> Result<Self, BuildError> {
        Self::with_seed(keys, rand::rng().random())
    }

    #[inline]
    fn query(&self, key: &K) -> usize {
        self.occupied.rank1(self.mwhc.query_value(key))
    }

    fn byte_size(&self) -> usize {
        core::mem::size_of::<Self>() - core::mem::size_of::<BitMwhc<K>>()
            - core::mem::size_of::<Rank9>()
            + self.mwhc.byte_size()
            + self.occupied.byte_size()
    }

    fn name() -> &'static str {
        "RankedBitMWHC"
    }
}

impl<K: FixedWidthKey> MinimalPerfectHash<K> for RankedBitMwhc<K> {}
