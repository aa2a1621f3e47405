/// Policy constants for probing and sizing.
///
/// The defaults are tuned empirically. None of them affect correctness,
/// only the shape of probe sequences and when the table grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tuning {
    /// Tables with at most `2^array_log_limit` slots are scanned linearly
    /// instead of hashed.
    pub array_log_limit: u8,
    /// The maximum number of 8-slot groups examined by a probe.
    pub seek_limit: usize,
    /// The number of byte-hash matches failing a full comparison that a
    /// single probe tolerates before giving up.
    pub attack_limit: usize,
    /// The stride between probed groups. Should be a large odd number.
    pub cuckoo_step: usize,
    /// The largest table exponent, the table never holds more than
    /// `2^max_bits` slots.
    pub max_bits: u8,
}

impl Default for Tuning {
    fn default() -> Tuning {
        Tuning {
            array_log_limit: 3,
            seek_limit: 13,
            attack_limit: 16,
            cuckoo_step: 0x43F8_2D0B,
            max_bits: 31,
        }
    }
}

// The smallest allocated table exponent.
pub const MIN_BITS: u8 = 2;

// Relative offsets of the slots in a probed group, within a 64-slot window.
//
// The gaps grow so that neighbouring home positions share few slots.
pub const OFFSETS: [usize; 8] = [0, 3, 8, 17, 28, 41, 58, 60];

// The largest window a group is spread over.
const WINDOW: usize = 64;

impl Tuning {
    // Returns `true` if a table with the given exponent is scanned linearly.
    #[inline]
    pub fn is_dense(&self, bits: u8) -> bool {
        bits <= self.array_log_limit
    }

    // The number of entries a table with the given exponent may hold.
    #[inline]
    pub fn max_load(&self, bits: u8) -> usize {
        let capacity = capacity(bits);
        if self.is_dense(bits) {
            capacity
        } else {
            capacity - capacity / 8
        }
    }

    // Returns the smallest exponent whose table holds `len` entries.
    pub fn bits_for(&self, len: usize) -> Option<u8> {
        let mut bits = MIN_BITS;
        while self.max_load(bits) < len {
            if bits >= self.max_bits {
                return None;
            }
            bits += 1;
        }

        Some(bits)
    }
}

// The number of slots for a table exponent.
#[inline]
pub fn capacity(bits: u8) -> usize {
    if bits == 0 {
        0
    } else {
        1 << bits
    }
}

// A group probe sequence.
//
// Each step examines 8 slots scattered over an aligned window, then jumps by
// a large stride to decorrelate clustering.
pub struct Probe {
    // The current position in the probe sequence.
    pos: usize,
    // Mask for the length of the table.
    mask: usize,
    // Mask for the window of the current group.
    window: usize,
    // The stride between groups.
    step: usize,
    // The number of groups examined so far.
    pub len: usize,
}

impl Probe {
    // Initialize the probe sequence.
    #[inline]
    pub fn start(hash: u64, mask: usize, tuning: &Tuning) -> Probe {
        Probe {
            pos: hash as usize,
            mask,
            window: (mask + 1).min(WINDOW) - 1,
            step: tuning.cuckoo_step,
            len: 0,
        }
    }

    // The slots of the current group.
    //
    // In tables smaller than the window some offsets alias the same slot.
    #[inline]
    pub fn group(&self) -> [usize; 8] {
        let base = self.pos & self.mask & !self.window;
        OFFSETS.map(|offset| base | (self.pos.wrapping_add(offset) & self.window))
    }

    // Advance to the next group.
    #[inline]
    pub fn next(&mut self) {
        self.pos = self.pos.wrapping_add(self.step);
        self.len += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_in_bounds() {
        let tuning = Tuning::default();
        for bits in [4u8, 5, 6, 10] {
            let mask = capacity(bits) - 1;
            let mut probe = Probe::start(0xDEAD_BEEF_F00D, mask, &tuning);
            for _ in 0..tuning.seek_limit {
                assert!(probe.group().iter().all(|&i| i <= mask));
                probe.next();
            }
        }
    }

    #[test]
    fn full_window_slots_distinct() {
        let tuning = Tuning::default();
        let probe = Probe::start(12345, capacity(12) - 1, &tuning);
        let mut slots = probe.group().to_vec();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), 8);
    }

    #[test]
    fn sizing() {
        let tuning = Tuning::default();
        assert_eq!(tuning.bits_for(0), Some(2));
        assert_eq!(tuning.bits_for(4), Some(2));
        assert_eq!(tuning.bits_for(8), Some(3));
        // 16 slots in hash mode hold 14 entries.
        assert_eq!(tuning.bits_for(14), Some(4));
        assert_eq!(tuning.bits_for(15), Some(5));

        let small = Tuning {
            max_bits: 4,
            ..Tuning::default()
        };
        assert_eq!(small.bits_for(14), Some(4));
        assert_eq!(small.bits_for(15), None);
    }
}
