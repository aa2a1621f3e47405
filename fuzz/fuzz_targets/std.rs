#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use probemap::{HashMap as ProbeHashMap, Tuning, TryInsertError};
use std::collections::HashMap as StdHashMap;

#[derive(Debug, Arbitrary)]
enum Operation<K, V> {
    Insert(K, V),
    Remove(K),
    Get(K),
    Contains(K),
    Clear,
    Len,
    IsEmpty,
    Update(K, V),
    GetOrInsert(K, V),
    TryInsert(K, V),
    Reserve(u8),
    ShrinkToFit,
    RetainEven,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    array_log_limit: u8,
    operations: Vec<Operation<u16, u32>>,
}

fn fuzz_hashmap(input: FuzzInput) {
    let tuning = Tuning {
        array_log_limit: input.array_log_limit % 8,
        ..Tuning::default()
    };

    let mut std_map = StdHashMap::new();
    let mut probe_map = ProbeHashMap::builder().tuning(tuning).build();

    for op in input.operations {
        match op {
            Operation::Insert(k, v) => {
                let std_result = std_map.insert(k, v);
                let probe_result = probe_map.insert(k, v);
                assert_eq!(std_result, probe_result);
            }
            Operation::Remove(k) => {
                let std_result = std_map.remove(&k);
                let probe_result = probe_map.remove(&k);
                assert_eq!(std_result, probe_result);
            }
            Operation::Get(k) => {
                let std_result = std_map.get(&k);
                let probe_result = probe_map.get(&k);
                assert_eq!(std_result, probe_result);
            }
            Operation::Contains(k) => {
                let std_result = std_map.contains_key(&k);
                let probe_result = probe_map.contains_key(&k);
                assert_eq!(std_result, probe_result);
            }
            Operation::Clear => {
                std_map.clear();
                probe_map.clear();
            }
            Operation::Len => {
                assert_eq!(std_map.len(), probe_map.len());
            }
            Operation::IsEmpty => {
                assert_eq!(std_map.is_empty(), probe_map.is_empty());
            }
            Operation::Update(k, v) => {
                let std_result = std_map.get_mut(&k).map(|e| {
                    *e = e.wrapping_add(v);
                    *e
                });
                let probe_result = probe_map.get_mut(&k).map(|e| {
                    *e = e.wrapping_add(v);
                    *e
                });
                assert_eq!(std_result, probe_result);
            }
            Operation::GetOrInsert(k, v) => {
                let std_result = *std_map.entry(k).or_insert(v);
                let probe_result = *probe_map.get_or_insert(k, v);
                assert_eq!(std_result, probe_result);
            }
            Operation::TryInsert(k, v) => {
                let existed = std_map.contains_key(&k);
                std_map.entry(k).or_insert(v);
                let probe_result = probe_map.try_insert(k, v);
                assert_eq!(existed, matches!(probe_result, Err(TryInsertError::Occupied(_))));
            }
            Operation::Reserve(n) => {
                std_map.reserve(n as usize);
                probe_map.reserve(n as usize);
                assert!(probe_map.capacity() >= probe_map.len() + n as usize);
            }
            Operation::ShrinkToFit => {
                std_map.shrink_to_fit();
                probe_map.shrink_to_fit();
            }
            Operation::RetainEven => {
                std_map.retain(|_, v| *v % 2 == 0);
                probe_map.retain(|_, v| *v % 2 == 0);
            }
        }
    }

    // Final consistency checks
    for (k, v) in std_map.iter() {
        let probe_result = probe_map.get(k);
        assert_eq!(Some(v), probe_result);
    }
    assert_eq!(std_map.len(), probe_map.len());
    assert_eq!(std_map.len(), probe_map.iter().count());
    assert_eq!(std_map.is_empty(), probe_map.is_empty());
}

fuzz_target!(|data: FuzzInput| {
    fuzz_hashmap(data);
});
