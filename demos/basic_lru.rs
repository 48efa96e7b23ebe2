use midcache::policy::lru::LruCache;

fn main() {
    let mut cache: LruCache<u32, u32> = LruCache::new(2);

    cache.insert(1, 1);
    cache.insert(2, 2);
    println!("get 1: {:?}", cache.get(&1));

    cache.insert(3, 3);
    println!("get 2: {:?}", cache.get(&2));

    cache.insert(4, 4);
    println!("get 1: {:?}", cache.get(&1));
    println!("get 3: {:?}", cache.get(&3));
    println!("get 4: {:?}", cache.get(&4));
}

// Expected output:
// get 1: Some(1)
// get 2: None
// get 1: None
// get 3: Some(3)
// get 4: Some(4)
//
// Explanation: capacity=2; reading 1 makes 2 the LRU, so inserting 3 evicts 2.
// The list is then [3, 1]; inserting 4 evicts 1.
