#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use probemap::{HashMap, LruMap, OrderedMap};

#[derive(Debug, Arbitrary)]
enum Operation<K, V> {
    Insert(K, V),
    Remove(K),
    Get(K),
    Evict(u8),
    ShrinkToFit,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    limit: u8,
    operations: Vec<Operation<u8, u32>>,
}

// Checks ordered and LRU maps against a list in iteration order.
fn fuzz_ordered(input: FuzzInput) {
    let limit = input.limit.max(1) as usize;

    let mut ordered: OrderedMap<u8, u32> = HashMap::builder().ordered().build();
    let mut lru: LruMap<u8, u32> = LruMap::new(limit);
    let mut ordered_model: Vec<(u8, u32)> = Vec::new();
    let mut lru_model: Vec<(u8, u32)> = Vec::new();

    for op in input.operations {
        match op {
            Operation::Insert(k, v) => {
                match ordered_model.iter_mut().find(|(key, _)| *key == k) {
                    Some(entry) => entry.1 = v,
                    None => ordered_model.push((k, v)),
                }
                ordered.insert(k, v);

                match lru_model.iter().position(|&(key, _)| key == k) {
                    Some(i) => drop(lru_model.remove(i)),
                    None if lru_model.len() == limit => drop(lru_model.remove(0)),
                    None => {}
                }
                lru_model.push((k, v));
                lru.insert(k, v);
            }
            Operation::Remove(k) => {
                let expected = ordered_model
                    .iter()
                    .position(|&(key, _)| key == k)
                    .map(|i| ordered_model.remove(i).1);
                assert_eq!(ordered.remove(&k), expected);

                let expected = lru_model
                    .iter()
                    .position(|&(key, _)| key == k)
                    .map(|i| lru_model.remove(i).1);
                assert_eq!(lru.remove(&k), expected);
            }
            Operation::Get(k) => {
                let expected = ordered_model.iter().find(|&&(key, _)| key == k).map(|e| &e.1);
                assert_eq!(ordered.get(&k), expected);

                let expected = lru_model.iter().position(|&(key, _)| key == k).map(|i| {
                    let entry = lru_model.remove(i);
                    lru_model.push(entry);
                    entry.1
                });
                assert_eq!(lru.get(&k).copied(), expected);
            }
            Operation::Evict(n) => {
                let n = n as usize;
                let evicted = n.min(ordered_model.len());
                ordered_model.drain(..evicted);
                assert_eq!(ordered.evict(n), evicted);

                let evicted = n.min(lru_model.len());
                lru_model.drain(..evicted);
                assert_eq!(lru.evict(n), evicted);
            }
            Operation::ShrinkToFit => {
                ordered.shrink_to_fit();
                lru.shrink_to_fit();
            }
        }

        assert!(lru.len() <= limit);
    }

    let entries: Vec<(u8, u32)> = ordered.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(entries, ordered_model);

    let entries: Vec<(u8, u32)> = lru.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(entries, lru_model);
}

fuzz_target!(|data: FuzzInput| {
    fuzz_ordered(data);
});
