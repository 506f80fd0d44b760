/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use thiserror::Error;

/// Errors that can occur while building a static hash function.
///
/// Queries never fail: once a structure is frozen, `query` is total on
/// its key type, and only its behavior on non-members is unspecified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No acyclic hypergraph was found within the retry cap.
    ///
    /// This is an event of vanishing probability at the default
    /// overallocation factor; if it happens repeatedly the key set is
    /// probably degenerate (e.g., it contains duplicates).
    #[error("no acyclic hypergraph found after {attempts} seeding attempts")]
    ConstructionFailed { attempts: usize },
    /// The input contained the same key twice.
    ///
    /// Only returned by builders that explicitly check for duplicates,
    /// such as [`CompactTrie::from_keys_strict`](crate::trie::CompactTrie::from_keys_strict);
    /// the default builders silently ignore them.
    #[error("duplicate key in input")]
    DuplicateKey,
}

/// A function mapping distinct keys of a fixed set to distinct `usize`
/// values in an unspecified range.
///
/// The set of keys is fixed at [build](PerfectHash::build) time and the
/// resulting structure is immutable. The behavior of
/// [`query`](PerfectHash::query) on keys outside the build set is
/// unspecified unless an implementation documents otherwise.
pub trait PerfectHash<K>: Sized {
    /// Builds the function over the given keys.
    ///
    /// Duplicate keys are ignored unless the implementation documents
    /// otherwise.
    fn build(keys: &[K]) -> Result<Self, BuildError>;

    /// Returns the value of the function on the given key.
    fn query(&self, key: &K) -> usize;

    /// Returns an estimate of the memory used by the structure, in
    /// bytes.
    fn byte_size(&self) -> usize;

    /// Returns the name of the structure, for reporting purposes.
    fn name() -> &'static str;
}

/// A [`PerfectHash`] whose image is exactly `[0, n)`, where `n` is the
/// number of distinct keys it was built on.
pub trait MinimalPerfectHash<K>: PerfectHash<K> {}

/// A [`MinimalPerfectHash`] mapping each key to its rank in the key
/// set, that is, to the number of keys strictly smaller than it.
///
/// Queries with non-member keys return unspecified values; callers that
/// cannot guarantee membership must filter keys themselves.
pub trait MonotoneMinimalPerfectHash<K>: MinimalPerfectHash<K> {}

/// A [`PerfectHash`] mapping each key to its position in the slice it
/// was built from.
///
/// The build slice doubles as the order specification: `query(k)` is
/// the index of `k` in it.
pub trait OrderPreservingMphf<K>: PerfectHash<K> {}
