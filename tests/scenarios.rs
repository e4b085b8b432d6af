//! End-to-end scenarios, each run in both sort directions.

#![expect(clippy::unwrap_used, reason = "fail fast in tests")]

mod common;

use cacheskip::{
    CountingAllocator, Direction, DuplicatePolicy, HeightDistribution, InsertError, SkipList,
    SkipListConfig, levels_for,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

const L: usize = levels_for::<u64, u64>();

type List = SkipList<u64, u64, L>;

const DIRECTIONS: [Direction; 2] = [Direction::Natural, Direction::Reversed];

fn keys(list: &List) -> Vec<u64> {
    list.iter().map(|(k, _)| *k).collect()
}

fn sorted(direction: Direction, mut keys: Vec<u64>) -> Vec<u64> {
    keys.sort_unstable();
    if direction == Direction::Reversed {
        keys.reverse();
    }
    keys
}

fn shuffled(range: std::ops::RangeInclusive<u64>, seed: u64) -> Vec<u64> {
    let mut keys: Vec<u64> = range.collect();
    keys.shuffle(&mut SmallRng::seed_from_u64(seed));
    keys
}

// ============================================================================
//  Basic scenarios
// ============================================================================

#[test]
fn test_three_inserts_natural_and_reversed() {
    common::init_tracing();

    let mut asc = List::new(Direction::Natural);
    let mut desc = List::new(Direction::Reversed);
    for k in [3, 1, 5] {
        assert!(asc.insert(k, k * 100));
        assert!(desc.insert(k, k * 100));
    }

    assert_eq!(keys(&asc), vec![1, 3, 5]);
    assert_eq!(keys(&desc), vec![5, 3, 1]);
    asc.check_invariants().unwrap();
    desc.check_invariants().unwrap();
}

#[test]
fn test_insert_twice_is_rejected() {
    for d in DIRECTIONS {
        let mut list = List::new(d);
        assert!(list.insert(1, 1));
        assert!(!list.insert(1, 2));
        assert_eq!(list.size(), 1);
        assert_eq!(list.find(&1), Some(&1));
        assert_eq!(list.try_insert(1, 3), Err(InsertError::DuplicateKey));
    }
}

#[test]
fn test_ascending_insert_then_ascending_erase() {
    common::init_tracing();

    for d in DIRECTIONS {
        let mut list = List::new(d);
        for k in 1..=1000 {
            assert!(list.insert(k, k + 1));
        }
        assert_eq!(list.size(), 1000);
        assert_eq!(list.count(), 1000);
        list.check_invariants().unwrap();

        for k in 1..=1000 {
            assert!(list.contains(&k), "{d}: {k} missing before erase");
            assert_eq!(list.erase(&k), Some(k + 1));
            assert!(!list.contains(&k), "{d}: {k} present after erase");
            assert_eq!(list.len(), (1000 - k) as usize);
        }

        assert!(list.empty());
        list.check_invariants().unwrap();
    }
}

#[test]
fn test_descending_insert() {
    for d in DIRECTIONS {
        let mut list = List::new(d);
        for k in (1..=1000).rev() {
            assert!(list.insert(k, k));
        }

        assert_eq!(keys(&list), sorted(d, (1..=1000).collect()));
        list.check_invariants().unwrap();
    }
}

#[test]
fn test_random_permutation_insert() {
    for d in DIRECTIONS {
        let mut list = List::new(d);
        for k in shuffled(1..=1000, 7) {
            assert!(list.insert(k, k * 2));
        }

        assert_eq!(list.size(), 1000);
        for k in 1..=1000 {
            assert!(list.contains(&k));
            assert_eq!(list.find(&k), Some(&(k * 2)));
        }
        assert_eq!(keys(&list), sorted(d, (1..=1000).collect()));
        list.check_invariants().unwrap();
    }
}

#[test]
fn test_round_trip_any_erase_order() {
    for d in DIRECTIONS {
        for seed in 0..8 {
            let mut list = List::new(d);
            for k in shuffled(1..=200, seed) {
                assert!(list.insert(k, k));
            }

            for k in shuffled(1..=200, seed + 100) {
                assert_eq!(list.erase(&k), Some(k));
                list.check_invariants().unwrap();
            }

            assert!(list.is_empty());
            assert_eq!(list.size(), 0);
        }
    }
}

#[test]
fn test_erase_missing_leaves_list_unchanged() {
    for d in DIRECTIONS {
        let mut list = List::new(d);
        for k in [10, 20, 30] {
            list.insert(k, k);
        }
        let before = list.to_vec();

        for k in [0, 15, 40] {
            assert_eq!(list.erase(&k), None);
        }

        assert_eq!(list.to_vec(), before);
        list.check_invariants().unwrap();
    }
}

// ============================================================================
//  Configuration
// ============================================================================

#[test]
fn test_every_height_distribution() {
    let distributions = [
        HeightDistribution::Uniform,
        HeightDistribution::Logarithmic,
        HeightDistribution::SquareRoot,
        HeightDistribution::Fixed(1),
        HeightDistribution::Fixed(L),
    ];

    for d in DIRECTIONS {
        for dist in distributions {
            let config = SkipListConfig::new(d).with_height(dist).with_seed(3);
            let mut list = List::with_config(config);

            for k in shuffled(1..=500, 1) {
                list.insert(k, k);
            }
            list.check_invariants().unwrap();

            for k in shuffled(1..=500, 2).into_iter().take(250) {
                list.erase(&k);
            }
            list.check_invariants().unwrap();
            assert_eq!(list.len(), 250);
            assert_eq!(list.count(), 250);
        }
    }
}

#[test]
fn test_direction_from_str() {
    let bids: List = List::new("desc".parse().unwrap());
    assert_eq!(bids.direction(), Direction::Reversed);
    assert!("sideways".parse::<Direction>().is_err());
}

#[test]
fn test_allow_duplicates_keeps_all() {
    for d in DIRECTIONS {
        let config = SkipListConfig::new(d).with_duplicates(DuplicatePolicy::Allow);
        let mut list = List::with_config(config);

        for i in 0..1000 {
            assert!(list.insert(7, i));
        }
        list.insert(1, 0);
        list.insert(9, 0);

        assert_eq!(list.len(), 1002);
        list.check_invariants().unwrap();

        while list.erase(&7).is_some() {}
        assert_eq!(keys(&list), sorted(d, vec![1, 9]));
        list.check_invariants().unwrap();
    }
}

// ============================================================================
//  Ownership
// ============================================================================

#[test]
fn test_one_block_per_element() {
    for d in DIRECTIONS {
        let mut list: SkipList<u64, u64, L, CountingAllocator> =
            SkipList::with_allocator(SkipListConfig::new(d), CountingAllocator::new());

        for k in shuffled(1..=300, 5) {
            list.insert(k, k);
        }
        for k in 1..=300 {
            assert!(!list.insert(k, 0));
        }
        assert_eq!(list.allocator().allocations(), 300);

        for k in 1..=100 {
            list.erase(&k);
        }
        assert_eq!(list.allocator().deallocations(), 100);

        list.clear();
        assert_eq!(list.allocator().live(), 0);
        assert!(list.is_empty());
    }
}

#[test]
fn test_clone_is_independent() {
    for d in DIRECTIONS {
        let mut original = List::new(d);
        for k in shuffled(1..=100, 9) {
            original.insert(k, k);
        }

        let mut copy = original.clone();
        copy.check_invariants().unwrap();
        assert_eq!(copy.to_vec(), original.to_vec());

        for k in 1..=50 {
            copy.erase(&k);
        }
        assert_eq!(original.len(), 100);
        assert_eq!(copy.len(), 50);
        original.check_invariants().unwrap();
    }
}

#[test]
fn test_owned_iteration_in_order() {
    for d in DIRECTIONS {
        let mut list = List::new(d);
        for k in shuffled(1..=64, 4) {
            list.insert(k, k * 3);
        }

        let pairs: Vec<(u64, u64)> = list.into_iter().collect();
        let expected: Vec<(u64, u64)> = sorted(d, (1..=64).collect())
            .into_iter()
            .map(|k| (k, k * 3))
            .collect();
        assert_eq!(pairs, expected);
    }
}
