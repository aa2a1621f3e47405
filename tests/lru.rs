use probemap::{Error, HashMap, LruMap};

use std::hash::{BuildHasherDefault, Hasher};
use std::sync::Arc;

mod common;
use common::tunings;

// Run the test on LRU maps of the given limit with different configurations.
fn with_lru<K, V>(limit: usize, mut test: impl FnMut(LruMap<K, V>)) {
    for tuning in tunings() {
        debug!("running with {tuning:?}");
        test(HashMap::builder().tuning(tuning).build_lru(limit));
    }
}

fn keys<K: Copy, V>(map: &LruMap<K, V>) -> Vec<K> {
    map.keys().copied().collect()
}

#[test]
fn evicts_least_recently_used() {
    with_lru::<&str, i32>(3, |mut cache| {
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);

        assert_eq!(cache.get("a"), Some(&1));

        cache.insert("d", 4);
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains_key("b"));
        assert_eq!(keys(&cache), ["c", "a", "d"]);
    });
}

#[test]
fn peek_does_not_touch() {
    with_lru::<u32, u32>(2, |mut cache| {
        cache.insert(1, 1);
        cache.insert(2, 2);

        assert_eq!(cache.peek(&1), Some(&1));
        assert!(cache.contains_key(&1));
        assert_eq!(cache.iter().count(), 2);

        cache.insert(3, 3);
        assert_eq!(keys(&cache), [2, 3]);
    });
}

#[test]
fn overwrite_touches() {
    with_lru::<u32, u32>(3, |mut cache| {
        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(3, 3);

        assert_eq!(cache.insert(1, 10), Some(1));
        assert_eq!(keys(&cache), [2, 3, 1]);

        // Overwriting at the limit does not evict.
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.peek(&1), Some(&10));
    });
}

#[test]
fn get_or_insert_with_touches() {
    with_lru::<u32, u32>(3, |mut cache| {
        for i in 0..3 {
            cache.insert(i, i);
        }

        *cache.get_or_insert_with(0, || unreachable!()) += 5;
        cache.get_or_insert_with(3, || 3);

        assert_eq!(keys(&cache), [2, 0, 3]);
        assert_eq!(cache.peek(&0), Some(&5));
    });
}

#[test]
fn bounded() {
    with_lru::<u32, u32>(64, |mut cache| {
        for i in 0..10_000 {
            cache.insert(i, i);
            assert!(cache.len() <= 64);

            // Keep key 0 hot.
            cache.get(&0);
        }

        assert_eq!(cache.len(), 64);
        assert!(cache.contains_key(&0));
        let recent: Vec<u32> = (10_000 - 63..10_000).collect();
        assert_eq!(keys(&cache)[..63], recent[..]);
        assert_eq!(keys(&cache).last(), Some(&0));
    });
}

#[test]
fn set_limit_evicts() {
    with_lru::<u32, u32>(10, |mut cache| {
        for i in 0..10 {
            cache.insert(i, i);
        }

        cache.set_limit(4);
        assert_eq!(cache.limit(), 4);
        assert_eq!(keys(&cache), [6, 7, 8, 9]);

        cache.set_limit(8);
        cache.insert(10, 10);
        assert_eq!(cache.len(), 5);
    });
}

#[test]
fn pop_and_evict() {
    with_lru::<u32, u32>(5, |mut cache| {
        for i in 0..5 {
            cache.insert(i, i);
        }
        cache.get(&0);

        assert_eq!(cache.peek_lru(), Some((&1, &1)));
        assert_eq!(cache.pop_lru(), Some((1, 1)));
        assert_eq!(cache.evict(2), 2);
        assert_eq!(keys(&cache), [4, 0]);

        assert_eq!(cache.remove(&4), Some(4));
        assert_eq!(cache.pop_lru(), Some((0, 0)));
        assert_eq!(cache.pop_lru(), None);
    });
}

#[test]
fn evicted_entries_dropped() {
    let value = Arc::new(());

    with_lru::<u32, Arc<()>>(4, |mut cache| {
        for i in 0..100 {
            cache.insert(i, value.clone());
        }

        assert_eq!(Arc::strong_count(&value), 5);
        drop(cache);
        assert_eq!(Arc::strong_count(&value), 1);
    });
}

#[test]
fn cursor_walk_does_not_touch() {
    with_lru::<u32, u32>(4, |mut cache| {
        for i in 0..4 {
            cache.insert(i, i);
        }

        let mut cursor = None;
        let mut seen = Vec::new();
        while let Some((next, &k, _)) = cache.get_next(cursor) {
            seen.push(k);
            cursor = Some(next);
        }

        assert_eq!(seen, [0, 1, 2, 3]);
        assert_eq!(keys(&cache), [0, 1, 2, 3]);
    });
}

#[test]
fn failed_insert_keeps_entries() {
    #[derive(Default)]
    struct ZeroHasher;

    impl Hasher for ZeroHasher {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, _: &[u8]) {}
    }

    let mut cache: LruMap<u32, u32, BuildHasherDefault<ZeroHasher>> = HashMap::builder()
        .hasher(BuildHasherDefault::default())
        .build_lru(50);

    let mut failures = 0;
    for i in 0..100 {
        let before: Vec<u32> = cache.keys().copied().collect();
        match cache.insert_fallible(i, i) {
            Ok(None) => assert!(cache.len() <= 50),
            Ok(Some(_)) => panic!("distinct key {i} replaced an entry"),
            Err(err) => {
                assert_eq!(err, Error::ProbeExhausted);
                assert_eq!(cache.keys().copied().collect::<Vec<_>>(), before);
                failures += 1;
            }
        }
        assert_eq!(cache.iter().count(), cache.len());
    }

    assert!(failures < 100);
}

#[test]
#[should_panic]
fn zero_limit() {
    let _: LruMap<u32, u32> = LruMap::new(0);
}
