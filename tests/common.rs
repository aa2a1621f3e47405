#![allow(dead_code)]

use probemap::{HashMap, HashSet, OrderedMap, Tuning};

// Prints a log message if `RUST_LOG=debug` is set.
#[macro_export]
macro_rules! debug {
    ($($x:tt)*) => {
        if std::env::var("RUST_LOG").as_deref() == Ok("debug") {
            println!($($x)*);
        }
    };
}

// Configurations exercising both probing strategies.
pub fn tunings() -> [Tuning; 3] {
    [
        // Linear scans up to 8 slots.
        Tuning::default(),
        // Hashed probing at every size.
        Tuning {
            array_log_limit: 1,
            ..Tuning::default()
        },
        // Linear scans up to 64 slots, to stress the dense strategy.
        Tuning {
            array_log_limit: 6,
            ..Tuning::default()
        },
    ]
}

// Run the test on different configurations of a `HashMap`.
pub fn with_map<K, V>(mut test: impl FnMut(&dyn Fn() -> HashMap<K, V>)) {
    for tuning in tunings() {
        debug!("running with {tuning:?}");
        test(&(move || HashMap::builder().tuning(tuning).build()));
    }
}

// Run the test on different configurations of an `OrderedMap`.
pub fn with_ordered_map<K, V>(mut test: impl FnMut(&dyn Fn() -> OrderedMap<K, V>)) {
    for tuning in tunings() {
        debug!("running with {tuning:?}");
        test(&(move || HashMap::builder().ordered().tuning(tuning).build()));
    }
}

// Run the test on different configurations of a `HashSet`.
pub fn with_set<K>(mut test: impl FnMut(&dyn Fn() -> HashSet<K>)) {
    for tuning in tunings() {
        debug!("running with {tuning:?}");
        test(&(move || HashSet::builder().tuning(tuning).build()));
    }
}
