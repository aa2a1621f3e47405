use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use probemap::{LruMap, OrderedMap};

const SIZE: usize = 10_000;

#[derive(Clone, Copy)]
struct RandomKeys {
    state: usize,
}

impl RandomKeys {
    fn new() -> Self {
        RandomKeys { state: 0 }
    }
}

impl Iterator for RandomKeys {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        // Add 1 then multiply by some 32 bit prime.
        self.state = self.state.wrapping_add(1).wrapping_mul(3_787_392_781);
        Some(self.state)
    }
}

fn read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    group.bench_function("probemap", |b| {
        let mut m = probemap::HashMap::<usize, usize>::default();
        for i in RandomKeys::new().take(SIZE) {
            m.insert(i, i);
        }

        b.iter(|| {
            for i in RandomKeys::new().take(SIZE) {
                black_box(assert_eq!(m.get(&i), Some(&i)));
            }
        });
    });

    group.bench_function("probemap-ordered", |b| {
        let mut m: OrderedMap<usize, usize> = probemap::HashMap::builder().ordered().build();
        for i in RandomKeys::new().take(SIZE) {
            m.insert(i, i);
        }

        b.iter(|| {
            for i in RandomKeys::new().take(SIZE) {
                black_box(assert_eq!(m.get(&i), Some(&i)));
            }
        });
    });

    group.bench_function("std", |b| {
        let mut m = HashMap::<usize, usize>::default();
        for i in RandomKeys::new().take(SIZE) {
            m.insert(i, i);
        }

        b.iter(|| {
            for i in RandomKeys::new().take(SIZE) {
                black_box(assert_eq!(m.get(&i), Some(&i)));
            }
        });
    });

    group.finish();
}

fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    group.bench_function("probemap", |b| {
        b.iter(|| {
            let mut m = probemap::HashMap::<usize, usize>::default();
            for i in RandomKeys::new().take(SIZE) {
                m.insert(i, i);
            }
            black_box(m);
        });
    });

    group.bench_function("std", |b| {
        b.iter(|| {
            let mut m = HashMap::<usize, usize>::default();
            for i in RandomKeys::new().take(SIZE) {
                m.insert(i, i);
            }
            black_box(m);
        });
    });

    group.bench_function("probemap-lru", |b| {
        b.iter(|| {
            let mut m = LruMap::<usize, usize>::new(SIZE / 4);
            for i in RandomKeys::new().take(SIZE) {
                m.insert(i, i);
            }
            black_box(m);
        });
    });

    group.finish();
}

fn cursor(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor");

    let mut m: OrderedMap<usize, usize> = probemap::HashMap::builder().ordered().build();
    for i in RandomKeys::new().take(SIZE) {
        m.insert(i, i);
    }

    group.bench_function("walk", |b| {
        b.iter(|| {
            let mut cursor = None;
            while let Some((next, k, _)) = m.get_next(cursor) {
                black_box(k);
                cursor = Some(next);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, read, insert, cursor);
criterion_main!(benches);
