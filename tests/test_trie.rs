/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Tests for the compacted trie and its hollow re-encoding.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use stathash::prelude::*;

const SEEDS: [u64; 5] = [0, 1, 13, 42, 1337];

/// Generates an increasing dataset where roughly one in ten integers is
/// kept.
fn gapped_dataset(seed: u64, size: usize) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut dataset = Vec::with_capacity(size);
    let mut d = 0;
    while dataset.len() < size {
        if rng.random_range(0..100) < 10 {
            dataset.push(d);
        }
        d += 1;
    }
    dataset
}

fn shuffled(mut values: Vec<u64>, rng: &mut SmallRng) -> Vec<u64> {
    for i in (1..values.len()).rev() {
        let j = rng.random_range(0..=i);
        values.swap(i, j);
    }
    values
}

// ── CompactTrie ──

#[test]
fn test_compact_trie_sanity() {
    let keys: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 10];
    let trie = CompactTrie::<u8>::from_keys(&keys);
    assert_eq!(trie.len(), 8);
    for (rank, &key) in keys.iter().enumerate() {
        assert_eq!(trie.rank(key), rank);
    }
}

#[test]
fn test_compact_trie_is_monotone() {
    let mut size = 1000;
    for seed in SEEDS {
        let mut rng = SmallRng::seed_from_u64(seed);
        let dataset = gapped_dataset(seed, size);
        size += size - 1;

        // insertion order must not matter
        let trie = CompactTrie::<u64>::from_keys(&shuffled(dataset.clone(), &mut rng));
        assert_eq!(trie.len(), dataset.len());
        for (rank, &key) in dataset.iter().enumerate() {
            assert_eq!(trie.rank(key), rank);
        }
    }
}

#[test]
fn test_compact_trie_duplicates() {
    let trie = CompactTrie::<u64>::from_keys(&[5, 5, 7, 7, 7, 1]);
    assert_eq!(trie.len(), 3);
    assert_eq!(trie.rank(1), 0);
    assert_eq!(trie.rank(5), 1);
    assert_eq!(trie.rank(7), 2);

    assert_eq!(
        CompactTrie::<u64>::from_keys_strict(&[5, 5, 7]).map(|_| ()),
        Err(BuildError::DuplicateKey)
    );
    assert!(CompactTrie::<u64>::from_keys_strict(&[5, 6, 7]).is_ok());
}

#[test]
fn test_compact_trie_incremental_inserts() {
    // duplicates interleaved with fresh keys must leave the per-node
    // counts intact
    let mut trie = CompactTrie::<u8>::new();
    assert!(trie.insert(9));
    assert!(trie.insert(3));
    assert!(!trie.insert(9));
    assert!(trie.insert(0));
    assert!(!trie.insert(3));
    assert!(!trie.insert(0));
    assert!(trie.insert(200));
    assert_eq!(trie.len(), 4);
    assert_eq!(trie.rank(0), 0);
    assert_eq!(trie.rank(3), 1);
    assert_eq!(trie.rank(9), 2);
    assert_eq!(trie.rank(200), 3);
}

#[test]
fn test_compact_trie_sentinel_on_non_keys() {
    let keys: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 10];
    let trie = CompactTrie::<u8>::from_keys(&keys);
    for key in 0..=u8::MAX {
        if !keys.contains(&key) {
            assert_eq!(trie.rank(key), usize::MAX, "key = {}", key);
        }
    }
}

#[test]
fn test_compact_trie_approx_rank_on_non_keys() {
    let dataset = gapped_dataset(99, 500);
    let trie = CompactTrie::<u64, ApproxRank>::from_keys(&dataset);
    for key in 0..*dataset.last().unwrap() + 10 {
        let true_rank = dataset.partition_point(|&x| x < key);
        if dataset.binary_search(&key).is_ok() {
            assert_eq!(trie.rank(key), true_rank);
        } else {
            // the estimate counts a subset of the smaller keys
            assert!(trie.rank(key) <= true_rank);
        }
    }
}

#[test]
fn test_compact_trie_empty_and_single() {
    let empty = CompactTrie::<u64>::from_keys(&[]);
    assert!(empty.is_empty());
    assert_eq!(empty.rank(42), 0);

    let single = CompactTrie::<u64>::from_keys(&[42]);
    assert_eq!(single.len(), 1);
    assert_eq!(single.rank(42), 0);
}

// ── HollowTrie ──

#[test]
fn test_hollow_trie_sanity() {
    let keys: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 10];
    let trie = HollowTrie::<u8>::from_keys(&keys);
    for (rank, &key) in keys.iter().enumerate() {
        assert_eq!(trie.rank(key), rank);
    }
}

#[test]
fn test_hollow_trie_matches_compact_trie() {
    let mut size = 1000;
    for seed in SEEDS {
        let mut rng = SmallRng::seed_from_u64(seed);
        let dataset = gapped_dataset(seed, size);
        size += size - 1;

        let compact = CompactTrie::<u64>::from_keys(&shuffled(dataset.clone(), &mut rng));
        let hollow = HollowTrie::from_compact_trie(&compact);
        for (rank, &key) in dataset.iter().enumerate() {
            assert_eq!(hollow.rank(key), rank);
            assert_eq!(hollow.rank(key), compact.rank(key));
        }
    }
}

#[test]
fn test_hollow_trie_internal_mismatch() {
    // 64 diverges from {0, 3} inside the edge label of an internal
    // node, so even the pruned encoding can reject it
    let keys: [u8; 3] = [0, 3, 128];
    let sentinel = HollowTrie::<u8>::from_keys(&keys);
    assert_eq!(sentinel.rank(64), usize::MAX);

    let approx = HollowTrie::<u8, ApproxRank>::from_keys(&keys);
    let compact = CompactTrie::<u8, ApproxRank>::from_keys(&keys);
    assert_eq!(approx.rank(64), compact.rank(64));
}

#[test]
fn test_hollow_trie_empty_and_single() {
    let empty = HollowTrie::<u64>::from_keys(&[]);
    assert_eq!(empty.bit_size(), 0);
    assert_eq!(empty.rank(42), 0);

    let single = HollowTrie::<u64>::from_keys(&[42]);
    assert_eq!(single.bit_size(), 0);
    assert_eq!(single.rank(42), 0);
}

#[test]
fn test_hollow_trie_is_smaller() {
    let dataset = gapped_dataset(3, 2000);
    let compact = CompactTrie::<u64>::from_keys(&dataset);
    let hollow = HollowTrie::from_compact_trie(&compact);
    assert!(hollow.byte_size() < compact.byte_size());
}

// ── key expansion ──

#[test]
fn test_key_bit_expansion() {
    let bits = 0xa5_u8.to_bits();
    assert_eq!(bits.len(), 8);
    for (i, expected) in [true, false, true, false, false, true, false, true]
        .into_iter()
        .enumerate()
    {
        assert_eq!(bits.get(i), expected);
    }
    assert_eq!(u8::from_bits(&bits), 0xa5);

    for seed in SEEDS {
        let mut rng = SmallRng::seed_from_u64(seed);
        let key: u64 = rng.random();
        assert_eq!(u64::from_bits(&key.to_bits()), key);
        let key: u32 = rng.random();
        assert_eq!(u32::from_bits(&key.to_bits()), key);
    }
}

// ── trait surface ──

#[test]
fn test_tries_through_traits() -> anyhow::Result<()> {
    fn check_monotone<H: MonotoneMinimalPerfectHash<u64>>(keys: &[u64]) -> anyhow::Result<()> {
        let h = H::build(keys)?;
        for (rank, key) in keys.iter().enumerate() {
            anyhow::ensure!(h.query(key) == rank, "{} is not monotone", H::name());
        }
        anyhow::ensure!(h.byte_size() > 0);
        Ok(())
    }

    let dataset = gapped_dataset(17, 800);
    check_monotone::<CompactTrie<u64>>(&dataset)?;
    check_monotone::<HollowTrie<u64>>(&dataset)?;
    check_monotone::<RankHash<u64>>(&dataset)?;
    Ok(())
}
