// ==============================================
// EXTERNAL LOCKING TESTS (integration)
// ==============================================
//
// The caches are single-threaded; sharing one means wrapping the whole cache
// in a lock. These tests drive a cache from several threads through
// `parking_lot::Mutex` and check the structure afterwards.

use std::sync::{Arc, Barrier};
use std::thread;

use parking_lot::Mutex;

use midcache::policy::lru::LruCache;
use midcache::policy::midpoint::MidpointCache;

const THREADS: usize = 8;
const OPS_PER_THREAD: u64 = 2_000;

#[test]
fn caches_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MidpointCache<u64, String>>();
    assert_send_sync::<LruCache<u64, String>>();
}

#[test]
fn midpoint_under_single_mutex_keeps_invariants() {
    let cache = Arc::new(Mutex::new(MidpointCache::new(64, 0.375)));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS as u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..OPS_PER_THREAD {
                    let key = (t * 31 + i * 7) % 200;
                    let mut guard = cache.lock();
                    if guard.get(&key).is_none() {
                        guard.insert(key, t);
                    }
                    if i % 50 == 0 {
                        guard.remove(&((key + 1) % 200));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let guard = cache.lock();
    assert!(guard.len() <= 64);
    assert!(guard.old_len() <= guard.max_old_len());
    assert!(guard.check_invariants().is_ok());
}

#[test]
fn hot_keys_survive_concurrent_scans() {
    let cache = Arc::new(Mutex::new(MidpointCache::new(32, 0.5)));
    {
        let mut guard = cache.lock();
        for k in 0..8u64 {
            guard.insert(k, k);
            guard.get(&k);
        }
    }

    let scanners: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..1_000u64 {
                    cache.lock().insert(10_000 * (t + 1) + i, i);
                }
            })
        })
        .collect();
    for handle in scanners {
        handle.join().unwrap();
    }

    let guard = cache.lock();
    for k in 0..8u64 {
        assert!(guard.contains(&k), "hot key {k} evicted by scan");
    }
    assert!(guard.check_invariants().is_ok());
}

#[test]
fn lru_under_single_mutex_keeps_invariants() {
    let cache = Arc::new(Mutex::new(LruCache::new(32)));
    let handles: Vec<_> = (0..THREADS as u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let mut guard = cache.lock();
                    guard.insert((t + i) % 100, i);
                    guard.touch(&(i % 100));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    let guard = cache.lock();
    assert_eq!(guard.len(), 32);
    assert!(guard.check_invariants().is_ok());
}
