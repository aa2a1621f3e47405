use probemap::{AttackEvent, Error, Insertion, Lru, RawMap, Tuning};

use std::sync::atomic::{AtomicUsize, Ordering};

fn hash(x: u64) -> u64 {
    x.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn keys<V, O: probemap::Order>(map: &RawMap<u64, V, O>) -> Vec<u64> {
    map.iter().map(|(&k, _)| k).collect()
}

static EVENTS: AtomicUsize = AtomicUsize::new(0);

fn count_events(event: &AttackEvent) {
    assert!(event.collisions > Tuning::default().attack_limit);
    EVENTS.fetch_add(1, Ordering::Relaxed);
}

#[test]
fn constant_hash_is_bounded() {
    let mut map: RawMap<u64, u64> = RawMap::new(Tuning::default());
    map.set_attack_hook(count_events);

    let mut inserted = 0;
    for i in 0..500 {
        match map.insert(42, i, i * 2) {
            Ok(None) => inserted += 1,
            Ok(Some(_)) => panic!("distinct key {i} replaced an entry"),
            Err(err) => assert_eq!(err, Error::ProbeExhausted),
        }
    }

    // Flooding degrades lookups, but inserts never lose or duplicate entries.
    assert!(inserted > Tuning::default().attack_limit);
    assert_eq!(map.len(), inserted);
    assert_eq!(map.iter().count(), inserted);
    assert!(map.attacks() > 0);
    assert!(EVENTS.load(Ordering::Relaxed) > 0);

    // The table stops growing once the probe sequence is saturated.
    assert!(map.capacity() <= 1 << 10);

    for (&k, &v) in map.iter() {
        assert_eq!(v, k * 2);
        if let Some((_, &found)) = map.get(42, |&q| q == k) {
            assert_eq!(found, v);
        }
    }

    map.retain(|_, _| false);
    assert!(map.is_empty());
    assert_eq!(map.iter().next(), None);

    // The emptied table is usable again.
    map.insert(hash(1), 1, 1).unwrap();
    assert_eq!(map.get(hash(1), |&k| k == 1), Some((&1, &1)));
}

#[test]
fn flooded_insert_replaces_existing_key() {
    let mut map: RawMap<u64, u64> = RawMap::new(Tuning::default());
    for i in 0..40 {
        assert_eq!(map.insert(42, i, i), Ok(None));
    }

    // Key 39 sits past the collision limit of the shared hash.
    assert_eq!(map.insert(42, 39, 999), Ok(Some(39)));
    assert_eq!(map.len(), 40);
    assert_eq!(map.iter().filter(|&(&k, _)| k == 39).count(), 1);
    assert_eq!(map.iter().find(|&(&k, _)| k == 39), Some((&39, &999)));

    let (value, rejected) = map.insert_if_missing(42, 38, 0).unwrap();
    assert_eq!((*value, rejected), (38, Some(0)));
    assert_eq!(map.len(), 40);
    assert!(map.attacks() > 0);
}

#[test]
fn dense_tables_compare_every_key() {
    let tuning = Tuning {
        array_log_limit: 6,
        ..Tuning::default()
    };

    let mut map: RawMap<u64, u64> = RawMap::new(tuning);
    for i in 0..60 {
        assert_eq!(map.insert(7, i, i), Ok(None));
    }

    assert_eq!(map.capacity(), 64);
    assert_eq!(map.attacks(), 0);
    for i in 0..60 {
        assert_eq!(map.get(7, |&k| k == i), Some((&i, &i)));
    }

    assert_eq!(map.remove(7, |&k| k == 30), Some((30, 30)));
    assert_eq!(map.get(7, |&k| k == 30), None);
    assert_eq!(map.len(), 59);
}

#[test]
fn insert_if_missing() {
    let mut map: RawMap<u64, String> = RawMap::new(Tuning::default());

    let (value, rejected) = map.insert_if_missing(hash(1), 1, "one".to_owned()).unwrap();
    assert_eq!(*value, "one");
    assert_eq!(rejected, None);

    let (value, rejected) = map.insert_if_missing(hash(1), 1, "uno".to_owned()).unwrap();
    value.push('!');
    assert_eq!(rejected.as_deref(), Some("uno"));

    assert_eq!(map.get(hash(1), |&k| k == 1).map(|(_, v)| v.as_str()), Some("one!"));
    assert_eq!(map.len(), 1);
}

#[test]
fn get_mut_and_remove() {
    let mut map: RawMap<u64, u64> = RawMap::new(Tuning::default());
    for i in 0..100 {
        map.insert(hash(i), i, i).unwrap();
    }

    for i in 0..100 {
        let (_, v) = map.get_mut(hash(i), |&k| k == i).unwrap();
        *v += 1;
    }

    for i in 0..100 {
        assert_eq!(map.remove(hash(i), |&k| k == i), Some((i, i + 1)));
        assert_eq!(map.remove(hash(i), |&k| k == i), None);
    }

    assert!(map.is_empty());
}

#[test]
fn touch_reorders_lru() {
    let mut map: RawMap<u64, u64, Lru> = RawMap::new(Tuning::default());
    map.set_limit(3);
    for i in 0..3 {
        map.insert(hash(i), i, i).unwrap();
    }

    // Reads leave the order alone.
    assert_eq!(map.get(hash(0), |&k| k == 0), Some((&0, &0)));
    assert_eq!(keys(&map), [0, 1, 2]);

    let (_, v) = map.touch(hash(0), |&k| k == 0).unwrap();
    *v = 10;
    assert_eq!(keys(&map), [1, 2, 0]);

    map.insert(hash(3), 3, 3).unwrap();
    assert_eq!(keys(&map), [2, 0, 3]);
    assert_eq!(map.limit(), 3);

    // Touching a table without an order is a plain lookup.
    let mut plain: RawMap<u64, u64, Insertion> = RawMap::new(Tuning::default());
    plain.insert(hash(0), 0, 0).unwrap();
    plain.insert(hash(1), 1, 1).unwrap();
    plain.touch(hash(0), |&k| k == 0).unwrap();
    assert_eq!(keys(&plain), [0, 1]);
}

#[test]
fn reserve_and_compact() {
    let mut map: RawMap<u64, u64, Insertion> =
        RawMap::with_capacity(100, Tuning::default()).unwrap();
    let capacity = map.capacity();
    assert!(capacity >= 100);

    for i in 0..100 {
        map.insert(hash(i), i, i).unwrap();
    }
    assert_eq!(map.capacity(), capacity);

    for i in 10..100 {
        map.remove(hash(i), |&k| k == i);
    }
    map.compact();
    assert!(map.capacity() < capacity);
    assert_eq!(keys(&map), (0..10).collect::<Vec<_>>());

    map.clear();
    map.compact();
    assert_eq!(map.capacity(), 0);
    assert_eq!(map.bits(), 0);

    assert_eq!(map.reserve(usize::MAX), Err(Error::CapacityOverflow));
    assert!(map.is_empty());
}

#[test]
fn errors_display() {
    assert_eq!(Error::CapacityOverflow.to_string(), "capacity overflow");
    assert!(Error::ProbeExhausted.to_string().contains("probe"));
}
