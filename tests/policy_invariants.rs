// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Behavior that spans both policies and the builder, driven only through the
// public API.

use midcache::builder::{CacheBuilder, CachePolicy};
use midcache::policy::lru::LruCache;
use midcache::policy::midpoint::MidpointCache;
use midcache::traits::{CoreCache, MutableCache, ReadOnlyCache, SegmentedCacheTrait};

fn run_trace<C: CoreCache<u32, u32>>(cache: &mut C, trace: &[(bool, u32)]) -> Vec<Option<u32>> {
    trace
        .iter()
        .map(|&(is_put, key)| {
            if is_put {
                cache.insert(key, key);
                None
            } else {
                cache.get(&key).copied()
            }
        })
        .collect()
}

// ==============================================
// Walkthrough scenarios
// ==============================================

mod walkthroughs {
    use super::*;

    #[test]
    fn plain_cache_evicts_least_recent() {
        let mut cache = LruCache::new(2);
        cache.insert(1, 1);
        cache.insert(2, 2);
        assert_eq!(cache.get(&1), Some(&1));
        cache.insert(3, 3);
        assert_eq!(cache.get(&2), None);
        cache.insert(4, 4);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&3), Some(&3));
        assert_eq!(cache.get(&4), Some(&4));
    }

    #[test]
    fn segmented_cache_evicts_unread_entry() {
        let mut cache = MidpointCache::new(2, 0.7);
        cache.insert(1, 1);
        cache.insert(2, 2);
        assert_eq!(cache.get(&1), Some(&1));
        cache.insert(3, 3);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(&1));
        assert_eq!(cache.get(&3), Some(&3));
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn same_trace_diverges_only_on_scan() {
        // Hot key 1 read twice, then three one-off keys.
        let trace = [
            (true, 1),
            (false, 1),
            (true, 2),
            (true, 3),
            (true, 4),
            (false, 1),
        ];
        let lru_results = run_trace(&mut LruCache::new(3), &trace);
        let mid_results = run_trace(&mut MidpointCache::new(3, 0.5), &trace);

        assert_eq!(lru_results[5], None);
        assert_eq!(mid_results[5], Some(1));
    }
}

// ==============================================
// Capacity and configuration
// ==============================================

mod configuration {
    use super::*;

    #[test]
    fn capacity_zero_is_rejected_everywhere() {
        assert!(LruCache::<u32, u32>::try_new(0).is_err());
        assert!(MidpointCache::<u32, u32>::try_new(0, 0.5).is_err());
        assert!(
            CacheBuilder::new(0)
                .try_build::<u32, u32>(CachePolicy::midpoint())
                .is_err()
        );
    }

    #[test]
    fn len_never_exceeds_capacity() {
        for policy in [CachePolicy::Lru, CachePolicy::Midpoint { old_ratio: 0.25 }] {
            let mut cache = CacheBuilder::new(16).build::<u32, u32>(policy);
            for k in 0..1000 {
                cache.insert(k % 97, k);
                assert!(cache.len() <= 16, "{policy:?}");
            }
        }
    }

    #[test]
    fn tiny_ratio_behaves_like_tail_insertion() {
        let mut cache = MidpointCache::new(3, 0.2);
        for k in 1..=4 {
            cache.insert(k, k);
        }
        assert!(cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(!cache.contains(&3));
        assert!(cache.contains(&4));
        assert_eq!(cache.old_len(), 0);
    }
}

// ==============================================
// Trait-object usage
// ==============================================

mod trait_objects {
    use super::*;

    #[test]
    fn boxed_policies_share_a_surface() {
        let mut caches: Vec<Box<dyn MutableCache<u32, String>>> = vec![
            Box::new(LruCache::new(4)),
            Box::new(MidpointCache::new(4, 0.5)),
        ];
        for cache in &mut caches {
            for k in 0..6 {
                cache.insert(k, k.to_string());
            }
            assert_eq!(cache.len(), 4);
            assert_eq!(cache.remove(&5), Some("5".to_string()));
            assert_eq!(cache.len(), 3);
            cache.clear();
            assert!(cache.is_empty());
        }
    }

    #[test]
    fn segmented_view_reports_victim() {
        let mut cache = MidpointCache::new(4, 0.5);
        for k in ['a', 'b', 'c', 'd'] {
            cache.insert(k, ());
        }
        let view: &dyn SegmentedCacheTrait<char, ()> = &cache;
        assert_eq!(view.peek_victim().map(|(k, _)| *k), Some('a'));
        assert_eq!(view.old_len(), 2);
        assert_eq!(ReadOnlyCache::capacity(&cache), 4);
    }
}

// ==============================================
// Long-running churn
// ==============================================

mod churn {
    use super::*;

    #[test]
    fn midpoint_invariants_hold_under_mixed_churn() {
        for &(capacity, ratio) in &[(1, 0.5), (2, 0.7), (7, 0.375), (64, 0.1), (64, 0.9)] {
            let mut cache = MidpointCache::new(capacity, ratio);
            let mut x: u64 = 0x9e37_79b9_7f4a_7c15;
            for step in 0..5_000u64 {
                x ^= x << 13;
                x ^= x >> 7;
                x ^= x << 17;
                let key = x % (capacity as u64 * 3);
                match step % 7 {
                    0..=3 => {
                        cache.insert(key, step);
                    },
                    4 | 5 => {
                        cache.get(&key);
                    },
                    _ => {
                        cache.remove(&key);
                    },
                }
                if let Err(err) = cache.check_invariants() {
                    panic!("capacity {capacity} ratio {ratio} step {step}: {err}");
                }
            }
        }
    }
}
