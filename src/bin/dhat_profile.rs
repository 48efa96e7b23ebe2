//! DHAT heap profiler for midcache.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use midcache::policy::lru::LruCache;
use midcache::policy::midpoint::MidpointCache;
use midcache::traits::CoreCache;

const CAPACITY: usize = 4096;
const OPERATIONS: usize = 100_000;
const UNIVERSE: u64 = 16_384;

/// XorShift64 keeps the profile free of allocator noise from an RNG crate.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// 90% of accesses land on 10% of the key space; misses fill.
fn hotset_workload<C: CoreCache<u64, Vec<u8>>>(cache: &mut C, seed: u64) -> u64 {
    let mut rng = XorShift64::new(seed);
    let hot_size = UNIVERSE / 10;
    let mut hits = 0;

    for _ in 0..OPERATIONS {
        let key = if rng.next_u64() % 10 < 9 {
            rng.next_u64() % hot_size
        } else {
            hot_size + rng.next_u64() % (UNIVERSE - hot_size)
        };

        if cache.get(&key).is_some() {
            hits += 1;
        } else {
            cache.insert(key, vec![0u8; 64]);
        }
    }
    hits
}

/// Sequential pass over keys the cache has never seen.
fn scan_workload<C: CoreCache<u64, Vec<u8>>>(cache: &mut C) {
    for i in 0..OPERATIONS as u64 {
        let key = UNIVERSE + i;
        if cache.get(&key).is_none() {
            cache.insert(key, vec![0u8; 64]);
        }
    }
}

fn profile<C: CoreCache<u64, Vec<u8>>>(name: &str, cache: &mut C) {
    println!("=== Profiling {name} ===");
    for i in 0..CAPACITY as u64 {
        cache.insert(i, vec![0u8; 64]);
    }
    let before = hotset_workload(cache, 42);
    scan_workload(cache);
    let after = hotset_workload(cache, 7);
    println!("  Hot hits before scan: {before}");
    println!("  Hot hits after scan:  {after}");
    println!("  Final size: {}", cache.len());
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("midcache DHAT Heap Profiling");
    println!("============================\n");

    profile("LRU", &mut LruCache::new(CAPACITY));
    profile(
        "Midpoint",
        &mut MidpointCache::new(CAPACITY, MidpointCache::<u64, Vec<u8>>::DEFAULT_OLD_RATIO),
    );

    println!("\n============================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
