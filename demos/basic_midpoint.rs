use midcache::policy::midpoint::MidpointCache;

fn main() {
    // capacity=2, old_ratio=0.7 → old region holds at most one entry
    let mut cache: MidpointCache<u32, u32> = MidpointCache::new(2, 0.7);

    cache.insert(1, 1);
    cache.insert(2, 2);
    println!("get 1: {:?}", cache.get(&1));

    cache.insert(3, 3);
    println!("get 2: {:?}", cache.get(&2));
    println!("get 1: {:?}", cache.get(&1));
    println!("get 3: {:?}", cache.get(&3));

    // A scan of one-off keys only churns the old region.
    let mut pool = MidpointCache::new(10, MidpointCache::<String, u32>::DEFAULT_OLD_RATIO);
    for i in 0..5 {
        let key = format!("hot{i}");
        pool.insert(key.clone(), i);
        pool.get(&key);
    }
    for i in 0..100 {
        pool.insert(format!("scan{i}"), i);
    }
    let survivors = (0..5)
        .filter(|i| pool.contains(&format!("hot{i}")))
        .count();
    println!("hot keys surviving scan: {survivors}/5");
    println!(
        "old region: {}/{} entries",
        pool.old_len(),
        pool.max_old_len()
    );
}

// Expected output:
// get 1: Some(1)
// get 2: None
// get 1: Some(1)
// get 3: Some(3)
// hot keys surviving scan: 5/5
// old region: 3/3 entries
//
// Explanation: 2 was inserted into the old region and never read, so it is
// the victim when 3 arrives. The read of 1 promoted it into the new region.
