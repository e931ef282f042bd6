//! Resizable hash table used for every name → value mapping in the crate.
//!
//! Open hashing with array-based chaining: each bucket is a small `Vec` of
//! entries grown by a fixed increment. Removal shifts the bucket down, so
//! lookup and iteration never skip tombstones.
//!
//! # Key disciplines
//!
//! The table is generic over its key. Two disciplines are provided:
//!
//! - `String` keys, hashed with a rolling polynomial checksum over the bytes.
//! - [`IdentityKey`], an integer identity whose bit pattern is the hash.
//!
//! A table is instantiated for one key type and never mixes them.
//!
//! # Iteration
//!
//! [`Table::iter`] borrows the table and cannot observe mutation. The
//! explicit cursor ([`Table::first`] / [`Table::next`]) lives on the table
//! itself: there is a single active cursor per table, and a resize or a
//! removal resets it so the following `next` returns `None`.

use std::borrow::Borrow;

use tracing::warn;

/// Bucket counts, tried in order as the table grows.
const SIZES: [usize; 13] = [
    31, 101, 401, 1601, 4001, 8009, 16001, 32003, 64007, 128021, 256019, 512009, 1024021,
];

/// Average entries per bucket that triggers growth.
const MAX_LOAD: usize = 4;

/// Slots added to a full bucket.
const BUCKET_INCREMENT: usize = 5;

// =============================================================================
// Keys
// =============================================================================

/// Hash input for table keys.
pub trait Checksum {
    fn checksum(&self) -> u32;
}

impl Checksum for str {
    fn checksum(&self) -> u32 {
        self.bytes()
            .fold(0u32, |sum, byte| sum.wrapping_mul(31).wrapping_add(u32::from(byte)))
    }
}

impl Checksum for String {
    fn checksum(&self) -> u32 {
        self.as_str().checksum()
    }
}

/// Identity key: an opaque integer (an element id, a handle) compared by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey(pub u64);

impl Checksum for IdentityKey {
    fn checksum(&self) -> u32 {
        (self.0 ^ (self.0 >> 32)) as u32
    }
}

/// Initial size class for a new table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl TableSize {
    fn index(self) -> usize {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
        }
    }
}

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    checksum: u32,
    value: V,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    bucket: usize,
    slot: usize,
}

/// Hash table keyed by `K`.
#[derive(Debug, Clone)]
pub struct Table<K, V> {
    buckets: Vec<Vec<Entry<K, V>>>,
    size_index: usize,
    entries: usize,
    cursor: Option<Cursor>,
}

/// String-keyed table.
pub type StringTable<V> = Table<String, V>;

/// Identity-keyed table.
pub type IdentityTable<V> = Table<IdentityKey, V>;

impl<K: Checksum + Eq, V> Default for Table<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Checksum + Eq, V> Table<K, V> {
    /// Create an empty table with the smallest bucket count.
    pub fn new() -> Self {
        Self::with_size(TableSize::Small)
    }

    /// Create an empty table starting at the given size class.
    pub fn with_size(size: TableSize) -> Self {
        let size_index = size.index();
        let mut buckets = Vec::new();
        buckets.resize_with(SIZES[size_index], Vec::new);
        Self {
            buckets,
            size_index,
            entries: 0,
            cursor: None,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_of(&self, checksum: u32) -> usize {
        checksum as usize % self.buckets.len()
    }

    fn locate<Q>(&self, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: Checksum + Eq + ?Sized,
    {
        let checksum = key.checksum();
        let bucket = self.bucket_of(checksum);
        self.buckets[bucket]
            .iter()
            .position(|entry| {
                entry.checksum == checksum && <K as Borrow<Q>>::borrow(&entry.key) == key
            })
            .map(|slot| (bucket, slot))
    }

    /// Insert or replace. Returns the previous value for the key.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        if let Some((bucket, slot)) = self.locate(&key) {
            let entry = &mut self.buckets[bucket][slot];
            return Some(std::mem::replace(&mut entry.value, value));
        }

        let checksum = key.checksum();
        let bucket = self.bucket_of(checksum);
        push_entry(&mut self.buckets[bucket], Entry { key, checksum, value });
        self.entries += 1;

        if self.entries > self.buckets.len() * MAX_LOAD {
            self.grow();
        }
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Checksum + Eq + ?Sized,
    {
        self.locate(key)
            .map(|(bucket, slot)| &self.buckets[bucket][slot].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Checksum + Eq + ?Sized,
    {
        self.locate(key)
            .map(|(bucket, slot)| &mut self.buckets[bucket][slot].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Checksum + Eq + ?Sized,
    {
        self.locate(key).is_some()
    }

    /// Remove a key. Absent keys are not an error.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Checksum + Eq + ?Sized,
    {
        let (bucket, slot) = self.locate(key)?;
        let entry = self.buckets[bucket].remove(slot);
        self.entries -= 1;
        self.cursor = None;
        Some(entry.value)
    }

    /// Remove every entry, keeping the current bucket count.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.entries = 0;
        self.cursor = None;
    }

    /// Borrowing iterator over all entries, in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|entry| (&entry.key, &entry.value)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    /// Reset the cursor to the first entry and return its key.
    pub fn first(&mut self) -> Option<&K> {
        self.cursor = self.next_occupied(0).map(|bucket| Cursor { bucket, slot: 0 });
        self.cursor_key()
    }

    /// Advance the cursor. Returns `None` at the end, or when the cursor was
    /// invalidated by a resize or removal since the last call.
    pub fn next(&mut self) -> Option<&K> {
        let Cursor { bucket, slot } = self.cursor?;
        self.cursor = if slot + 1 < self.buckets[bucket].len() {
            Some(Cursor { bucket, slot: slot + 1 })
        } else {
            self.next_occupied(bucket + 1)
                .map(|bucket| Cursor { bucket, slot: 0 })
        };
        self.cursor_key()
    }

    /// Value at the cursor.
    pub fn cursor_value(&self) -> Option<&V> {
        let Cursor { bucket, slot } = self.cursor?;
        self.buckets.get(bucket)?.get(slot).map(|entry| &entry.value)
    }

    fn cursor_key(&self) -> Option<&K> {
        let Cursor { bucket, slot } = self.cursor?;
        self.buckets.get(bucket)?.get(slot).map(|entry| &entry.key)
    }

    fn next_occupied(&self, from: usize) -> Option<usize> {
        (from..self.buckets.len()).find(|&bucket| !self.buckets[bucket].is_empty())
    }

    // =========================================================================
    // Growth
    // =========================================================================

    fn grow(&mut self) {
        let Some(&count) = SIZES.get(self.size_index + 1) else {
            return;
        };

        let mut buckets: Vec<Vec<Entry<K, V>>> = Vec::new();
        if buckets.try_reserve_exact(count).is_err() {
            warn!(buckets = count, entries = self.entries, "table growth failed, keeping current buckets");
            return;
        }
        buckets.resize_with(count, Vec::new);

        for entry in std::mem::take(&mut self.buckets).into_iter().flatten() {
            let bucket = entry.checksum as usize % count;
            push_entry(&mut buckets[bucket], entry);
        }

        self.buckets = buckets;
        self.size_index += 1;
        self.cursor = None;
    }
}

fn push_entry<K, V>(bucket: &mut Vec<Entry<K, V>>, entry: Entry<K, V>) {
    if bucket.len() == bucket.capacity() {
        bucket.reserve_exact(BUCKET_INCREMENT);
    }
    bucket.push(entry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut table: StringTable<i32> = Table::new();
        assert_eq!(table.set("ONE".to_string(), 1), None);
        assert_eq!(table.set("TWO".to_string(), 2), None);
        assert_eq!(table.set("ONE".to_string(), 11), Some(1));

        assert_eq!(table.get("ONE"), Some(&11));
        assert_eq!(table.len(), 2);

        assert_eq!(table.remove("ONE"), Some(11));
        assert_eq!(table.get("ONE"), None);
        assert_eq!(table.remove("ONE"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_growth_keeps_every_key() {
        let mut table: StringTable<usize> = Table::new();
        let initial = table.bucket_count();

        for i in 0..2000 {
            table.set(format!("KEY{i}"), i);
        }

        assert_eq!(table.len(), 2000);
        assert!(table.bucket_count() > initial);
        for i in 0..2000 {
            assert_eq!(table.get(format!("KEY{i}").as_str()), Some(&i));
        }
    }

    #[test]
    fn test_identity_keys() {
        let mut table: IdentityTable<&str> = Table::new();
        table.set(IdentityKey(7), "seven");
        table.set(IdentityKey(7 + 31), "thirty-eight");

        assert_eq!(table.get(&IdentityKey(7)), Some(&"seven"));
        assert_eq!(table.get(&IdentityKey(38)), Some(&"thirty-eight"));
        assert!(!table.contains_key(&IdentityKey(8)));
    }

    #[test]
    fn test_bucket_collisions_compact_on_remove() {
        // Same bucket in a 31-bucket table.
        let mut table: IdentityTable<u64> = Table::new();
        for k in [1u64, 32, 63, 94] {
            table.set(IdentityKey(k), k);
        }
        table.remove(&IdentityKey(32));

        assert_eq!(table.get(&IdentityKey(1)), Some(&1));
        assert_eq!(table.get(&IdentityKey(63)), Some(&63));
        assert_eq!(table.get(&IdentityKey(94)), Some(&94));
        assert_eq!(table.iter().count(), 3);
    }

    #[test]
    fn test_cursor_visits_every_entry() {
        let mut table: StringTable<i32> = Table::new();
        for name in ["A", "B", "C", "D"] {
            table.set(name.to_string(), 0);
        }

        let mut seen = Vec::new();
        let mut key = table.first().cloned();
        while let Some(k) = key {
            seen.push(k);
            key = table.next().cloned();
        }
        seen.sort();
        assert_eq!(seen, ["A", "B", "C", "D"]);

        // Restartable.
        assert!(table.first().is_some());
    }

    #[test]
    fn test_cursor_invalidated_by_resize() {
        let mut table: StringTable<usize> = Table::new();
        table.set("FIRST".to_string(), 0);
        assert!(table.first().is_some());

        for i in 0..200 {
            table.set(format!("K{i}"), i);
        }
        assert!(table.next().is_none());
    }

    #[test]
    fn test_empty_cursor() {
        let mut table: StringTable<i32> = Table::new();
        assert!(table.first().is_none());
        assert!(table.next().is_none());
        assert!(table.cursor_value().is_none());
    }

    #[test]
    fn test_checksum_is_polynomial() {
        assert_eq!("".checksum(), 0);
        assert_eq!("a".checksum(), 97);
        assert_eq!("ab".checksum(), 97 * 31 + 98);
        assert_eq!(String::from("ab").checksum(), "ab".checksum());
    }
}
