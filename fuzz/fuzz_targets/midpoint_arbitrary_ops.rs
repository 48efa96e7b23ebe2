#![no_main]

use libfuzzer_sys::fuzz_target;
use midcache::policy::midpoint::MidpointCache;

// Fuzz arbitrary get/insert/remove/clear sequences on MidpointCache
//
// The first two bytes pick capacity (1..=32) and old ratio; the rest are
// (op, key) pairs over a small key space so hits, overwrites and evictions
// all occur. The full structural audit runs after every operation.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = usize::from(data[0] % 32) + 1;
    let old_ratio = (f64::from(data[1] % 99) + 1.0) / 100.0;
    let mut cache: MidpointCache<u8, u32> = MidpointCache::new(capacity, old_ratio);

    for (step, chunk) in data[2..].chunks_exact(2).enumerate() {
        let key = chunk[1] % 64;
        match chunk[0] % 5 {
            0 | 1 => {
                let victim = cache.peek_victim().map(|(k, _)| *k);
                let fresh = !cache.contains(&key);
                let full = cache.len() == cache.capacity();
                cache.insert(key, step as u32);
                assert_eq!(cache.peek(&key), Some(&(step as u32)));
                if fresh && full {
                    if let Some(victim) = victim {
                        assert!(!cache.contains(&victim));
                    }
                }
            },
            2 => {
                let present = cache.contains(&key);
                assert_eq!(cache.get(&key).is_some(), present);
                if present {
                    assert_eq!(cache.is_old(&key), Some(false));
                }
            },
            3 => {
                let present = cache.contains(&key);
                assert_eq!(cache.remove(&key).is_some(), present);
                assert!(!cache.contains(&key));
            },
            4 => {
                if key == 0 {
                    cache.clear();
                    assert!(cache.is_empty());
                }
            },
            _ => unreachable!(),
        }

        assert!(cache.len() <= cache.capacity());
        assert!(cache.old_len() <= cache.max_old_len());
        if let Err(err) = cache.check_invariants() {
            panic!("midpoint invariant broken: {err}");
        }
    }
});
