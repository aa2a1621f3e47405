// Entry metadata and byte-parallel matching over groups of 8 metadata bytes.

use std::num::NonZeroU64;

// Indicates a slot that was never occupied, or was reclaimed.
pub const EMPTY: u8 = 0x00;

// Indicates an entry that has been deleted.
pub const TOMBSTONE: u8 = 0xFF;

// Return a byte of hash metadata, used for cheap searches.
//
// The byte is taken just above the bits used for addressing, and never
// collides with `EMPTY` or `TOMBSTONE`.
#[inline]
pub fn h2(hash: u64, bits: u8) -> u8 {
    match (hash >> bits) as u8 {
        EMPTY => 0x01,
        TOMBSTONE => 0xFE,
        byte => byte,
    }
}

// Returns `true` if the metadata byte belongs to a live entry.
#[inline]
pub fn is_live(meta: u8) -> bool {
    meta != EMPTY && meta != TOMBSTONE
}

// The hash value 0 is reserved.
#[inline]
pub fn fix(hash: u64) -> u64 {
    if hash == 0 {
        1
    } else {
        hash
    }
}

#[inline]
fn repeat(b: u8) -> u64 {
    u64::from_ne_bytes([b; 8])
}

// Sets the high bit of every zero byte in `x`, and only those.
//
// Unlike the classic `(x - 0x01..) & !x & 0x80..` trick this has no false
// positives, which matters because empty matches are used for placement.
#[inline]
fn zero_bytes(x: u64) -> u64 {
    let low = repeat(0x7f);
    !(((x & low).wrapping_add(low)) | x | low)
}

// Eight metadata bytes packed into a word, byte `i` at bits `8i..8i+8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Group(pub u64);

impl Group {
    // Packs the given metadata bytes.
    #[inline]
    pub fn new(bytes: [u8; 8]) -> Group {
        Group(u64::from_le_bytes(bytes))
    }

    // Loads up to 8 consecutive bytes starting at `start`, padding with `EMPTY`.
    #[inline]
    pub fn load(meta: &[u8], start: usize) -> Group {
        let mut bytes = [EMPTY; 8];
        let end = meta.len().min(start + 8);
        if start < end {
            bytes[..end - start].copy_from_slice(&meta[start..end]);
        }
        Group::new(bytes)
    }

    // Gathers the metadata bytes at the given slots.
    #[inline]
    pub fn gather(meta: &[u8], slots: &[usize; 8]) -> Group {
        Group::new(slots.map(|i| meta[i]))
    }

    // Bytes equal to `byte`.
    #[inline]
    pub fn match_byte(self, byte: u8) -> BitMask {
        BitMask(zero_bytes(self.0 ^ repeat(byte)))
    }

    // Bytes marking an empty slot.
    #[inline]
    pub fn match_empty(self) -> BitMask {
        BitMask(zero_bytes(self.0))
    }

    // Bytes marking a deleted entry.
    #[inline]
    pub fn match_tombstone(self) -> BitMask {
        BitMask(zero_bytes(!self.0))
    }

    // Bytes belonging to live entries.
    #[inline]
    pub fn match_live(self) -> BitMask {
        let dead = zero_bytes(self.0) | zero_bytes(!self.0);
        BitMask(!dead & repeat(0x80))
    }
}

// A set of byte positions within a `Group`, one high bit per byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitMask(u64);

impl BitMask {
    // The lowest byte position in the set.
    #[inline]
    pub fn lowest(self) -> Option<usize> {
        let x = NonZeroU64::new(self.0)?;
        Some(x.trailing_zeros() as usize / 8)
    }

    // The highest byte position in the set.
    #[inline]
    pub fn highest(self) -> Option<usize> {
        let x = NonZeroU64::new(self.0)?;
        Some((63 - x.leading_zeros() as usize) / 8)
    }
}

impl Iterator for BitMask {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        let bit = self.lowest()?;
        self.0 &= self.0 - 1;
        Some(bit)
    }
}
