use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A probe sequence that met too many keys sharing the hash metadata of the
/// probed key.
///
/// This is the signature of a hash flooding attack, or of a very poor hash
/// function. The operation still completes: lookups stop early and may miss
/// keys that are present, while inserts keep comparing keys and never add a
/// second copy of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct AttackEvent {
    /// The hash of the probed key.
    pub hash: u64,
    /// The number of colliding entries compared before giving up.
    pub collisions: usize,
    /// The number of slots in the table.
    pub capacity: usize,
    /// The number of events recorded by this map, including this one.
    pub total: usize,
}

impl fmt::Display for AttackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "probemap: possible hash flooding, {} collisions for hash {:#018x} \
             in a table of {} slots ({} events so far)",
            self.collisions, self.hash, self.capacity, self.total
        )
    }
}

/// A callback notified of attack events.
pub type AttackHook = fn(&AttackEvent);

// Logs the event to stderr.
fn report(event: &AttackEvent) {
    eprintln!("{event}");
}

// Records attack events for a single map.
//
// The hook is called for the first event and then only when the total
// reaches a power of two, so a sustained attack is reported a logarithmic
// number of times.
pub struct AttackMonitor {
    total: AtomicUsize,
    hook: AttackHook,
}

impl Default for AttackMonitor {
    fn default() -> AttackMonitor {
        AttackMonitor::new(report)
    }
}

impl AttackMonitor {
    pub fn new(hook: AttackHook) -> AttackMonitor {
        AttackMonitor {
            total: AtomicUsize::new(0),
            hook,
        }
    }

    // The number of events recorded so far.
    #[inline]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn set_hook(&mut self, hook: AttackHook) {
        self.hook = hook;
    }

    #[cold]
    pub fn record(&self, hash: u64, collisions: usize, capacity: usize) {
        let total = self.total.fetch_add(1, Ordering::Relaxed) + 1;

        if total.is_power_of_two() {
            (self.hook)(&AttackEvent {
                hash,
                collisions,
                capacity,
                total,
            });
        }
    }
}

impl fmt::Debug for AttackMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackMonitor")
            .field("total", &self.total())
            .finish()
    }
}
