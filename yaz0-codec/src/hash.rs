//! Open-addressed hash table of recent 3-byte prefixes.
//!
//! Two parallel arrays hold the full 32-bit hash and the absolute stream
//! position of each entry. Lookups and insertions walk a bounded linear
//! probe sequence starting at `hash % N`. Entries further than
//! [`MAX_DISTANCE`] behind the current position are never returned as
//! candidates and are recycled on insertion or compaction.

use crate::format::MAX_DISTANCE;
use yaz0_core::error::{Result, Yaz0Error};

/// Number of slots in the table.
pub const HASH_TABLE_SIZE: usize = 0x8000;

/// Live entries that trigger a compaction pass.
pub const COMPACTION_THRESHOLD: usize = HASH_TABLE_SIZE / 2;

/// Sentinel for an unused slot; never a valid stream position.
const EMPTY: u32 = u32::MAX;

/// Hash a 3-byte prefix.
pub fn hash3(a: u8, b: u8, c: u8) -> u32 {
    let mut x = a as u32 | (b as u32) << 8 | (c as u32) << 16;
    x = ((x >> 16) ^ x).wrapping_mul(0x045d_9f3b);
    (x >> 16) ^ x
}

/// Distance from `entry` to `current`, if `entry` is not in the future.
fn distance(current: u32, entry: u32) -> Option<usize> {
    current.checked_sub(entry).map(|d| d as usize)
}

/// Fixed-size prefix table used by the match finder.
#[derive(Debug, Clone)]
pub struct HashTable {
    hashes: Vec<u32>,
    positions: Vec<u32>,
    /// Spare arrays that compaction rebuilds into.
    scratch_hashes: Vec<u32>,
    scratch_positions: Vec<u32>,
    /// Slots filled since the last compaction.
    live: usize,
}

fn empty_slots() -> Result<Vec<u32>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(HASH_TABLE_SIZE)
        .map_err(|_| Yaz0Error::out_of_memory(HASH_TABLE_SIZE * size_of::<u32>()))?;
    slots.resize(HASH_TABLE_SIZE, EMPTY);
    Ok(slots)
}

#[inline]
fn slot(hash: u32, probe: usize) -> usize {
    (hash as usize).wrapping_add(probe) % HASH_TABLE_SIZE
}

impl HashTable {
    /// Allocate a table with every slot set to the empty sentinel.
    pub fn new() -> Result<Self> {
        Ok(Self {
            hashes: empty_slots()?,
            positions: empty_slots()?,
            scratch_hashes: empty_slots()?,
            scratch_positions: empty_slots()?,
            live: 0,
        })
    }

    /// Number of slots filled since the last compaction.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Whether enough slots have been filled to warrant [`HashTable::compact`].
    pub fn needs_compaction(&self) -> bool {
        self.live > COMPACTION_THRESHOLD
    }

    /// Record `position` under `hash`.
    ///
    /// The first empty slot in the probe window wins. Failing that, a slot
    /// whose entry is out of reach from `current` is recycled, and failing
    /// that the oldest entry is evicted.
    pub fn insert(&mut self, hash: u32, position: u32, current: u32, max_probes: usize) {
        let mut target = None;
        let mut oldest = EMPTY;

        for probe in 0..max_probes {
            let index = slot(hash, probe);
            let entry = self.positions[index];
            if entry == EMPTY {
                self.live += 1;
                target = Some(index);
                break;
            }
            if distance(current, entry).is_some_and(|d| d > MAX_DISTANCE) {
                target = Some(index);
                break;
            }
            if entry < oldest {
                oldest = entry;
                target = Some(index);
            }
        }

        if let Some(index) = target {
            self.hashes[index] = hash;
            self.positions[index] = position;
        }
    }

    /// Positions recorded under `hash`, in probe order.
    ///
    /// The walk stops at the first empty slot. Entries are not filtered by
    /// distance; callers check reachability.
    pub fn candidates(&self, hash: u32, max_probes: usize) -> impl Iterator<Item = u32> + '_ {
        (0..max_probes)
            .map(move |probe| slot(hash, probe))
            .take_while(|&index| self.positions[index] != EMPTY)
            .filter(move |&index| self.hashes[index] == hash)
            .map(|index| self.positions[index])
    }

    /// Rebuild the table keeping only entries reachable from `current`.
    pub fn compact(&mut self, current: u32) {
        self.scratch_hashes.fill(EMPTY);
        self.scratch_positions.fill(EMPTY);
        let mut kept = 0;

        for i in 0..HASH_TABLE_SIZE {
            let entry = self.positions[i];
            if entry == EMPTY || distance(current, entry).is_none_or(|d| d > MAX_DISTANCE) {
                continue;
            }
            let hash = self.hashes[i];
            let mut index = slot(hash, 0);
            while self.scratch_positions[index] != EMPTY {
                index = (index + 1) % HASH_TABLE_SIZE;
            }
            self.scratch_hashes[index] = hash;
            self.scratch_positions[index] = entry;
            kept += 1;
        }

        std::mem::swap(&mut self.hashes, &mut self.scratch_hashes);
        std::mem::swap(&mut self.positions, &mut self.scratch_positions);
        self.live = kept;
    }

    /// Return every slot to the empty sentinel.
    pub fn clear(&mut self) {
        self.hashes.fill(EMPTY);
        self.positions.fill(EMPTY);
        self.live = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_known_values() {
        assert_eq!(hash3(0, 0, 0), 0);
        assert_ne!(hash3(b'a', b'b', b'c'), hash3(b'c', b'b', b'a'));
        // Byte order matters: a is the least significant byte.
        let x = 0x0063_6261u32;
        let x = ((x >> 16) ^ x).wrapping_mul(0x045d_9f3b);
        assert_eq!(hash3(b'a', b'b', b'c'), (x >> 16) ^ x);
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = HashTable::new().unwrap();
        assert_eq!(table.live(), 0);
        assert_eq!(table.candidates(hash3(1, 2, 3), 16).count(), 0);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = HashTable::new().unwrap();
        let h = hash3(b'x', b'y', b'z');
        table.insert(h, 10, 10, 4);
        table.insert(h, 20, 20, 4);

        let found: Vec<u32> = table.candidates(h, 4).collect();
        assert_eq!(found, [10, 20]);
        assert_eq!(table.live(), 2);
    }

    #[test]
    fn test_collisions_filtered_by_hash() {
        let mut table = HashTable::new().unwrap();
        let h = 5u32;
        let other = 5u32 + HASH_TABLE_SIZE as u32;
        table.insert(other, 1, 1, 4);
        table.insert(h, 2, 2, 4);

        assert_eq!(table.candidates(h, 4).collect::<Vec<_>>(), [2]);
        assert_eq!(table.candidates(other, 4).collect::<Vec<_>>(), [1]);
    }

    #[test]
    fn test_evicts_oldest_when_window_full() {
        let mut table = HashTable::new().unwrap();
        let h = 77u32;
        table.insert(h, 100, 100, 2);
        table.insert(h, 50, 100, 2);
        table.insert(h, 200, 200, 2);

        // Slot holding 50 (oldest) was replaced.
        let found: Vec<u32> = table.candidates(h, 2).collect();
        assert_eq!(found, [100, 200]);
        assert_eq!(table.live(), 2);
    }

    #[test]
    fn test_recycles_unreachable_entry_first() {
        let mut table = HashTable::new().unwrap();
        let h = 9u32;
        table.insert(h, 10, 10, 2);
        table.insert(h, 5000, 5000, 2);
        table.insert(h, 5001, 5001, 2);

        // Entry 10 is more than MAX_DISTANCE behind 5000 and its slot is reused.
        let found: Vec<u32> = table.candidates(h, 2).collect();
        assert_eq!(found, [5000, 5001]);
        assert_eq!(table.live(), 2);
    }

    #[test]
    fn test_compact_drops_stale_entries() {
        let mut table = HashTable::new().unwrap();
        for pos in 0..100u32 {
            table.insert(hash3(pos as u8, 0, 1), pos, pos, 8);
        }
        table.insert(hash3(1, 2, 3), 0x2000, 0x2000, 8);

        table.compact(0x2000);
        assert_eq!(table.live(), 1);
        assert_eq!(table.candidates(hash3(1, 2, 3), 8).collect::<Vec<_>>(), [0x2000]);
        assert_eq!(table.candidates(hash3(3, 0, 1), 8).count(), 0);
    }

    #[test]
    fn test_compaction_threshold() {
        let mut table = HashTable::new().unwrap();
        for pos in 0..=COMPACTION_THRESHOLD as u32 {
            table.insert(pos, pos, pos, 1);
        }
        assert!(table.needs_compaction());
        table.compact(COMPACTION_THRESHOLD as u32);
        assert!(!table.needs_compaction());
        assert_eq!(table.live(), MAX_DISTANCE + 1);
    }

    #[test]
    fn test_clear() {
        let mut table = HashTable::new().unwrap();
        table.insert(1, 1, 1, 1);
        table.clear();
        assert_eq!(table.candidates(1, 1).count(), 0);
        assert_eq!(table.live(), 0);
    }
}
