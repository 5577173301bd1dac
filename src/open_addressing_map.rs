use std::{fmt, mem};

use log::{debug, trace, warn};

use crate::{
    error::CapacityError,
    hash::{HashFn, KeyHasher},
    utils::{StringMap, next_prime},
};

/// A key-value pair stored in an occupied slot
#[derive(Debug, Clone)]
struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// State of one slot in the table.
///
/// Slots move `Empty -> Occupied -> Tombstone -> Occupied`; a tombstone is only
/// cleared by a later insert landing on it, by `clear`, or by a rebuild.
#[derive(Debug, Clone)]
enum Slot<V> {
    /// Never used since the last rebuild or clear; terminates lookups
    Empty,
    /// Holds a live entry
    Occupied(Entry<V>),
    /// Held an entry that was removed; lookups probe through it
    Tombstone,
}

/// Yields the slot indices `home + i²  (mod capacity)` for `i` in `0..capacity`.
///
/// The square is built incrementally (`(i + 1)² = i² + 2i + 1`) so no intermediate
/// value exceeds `2 * capacity`.
#[derive(Debug, Clone)]
struct QuadraticProbe {
    /// Index to yield next
    index: usize,
    /// Number of probes issued so far
    step: usize,
    /// Table size the sequence wraps around
    capacity: usize,
}

impl QuadraticProbe {
    /// Starts a probe sequence at `home`
    fn new(home: usize, capacity: usize) -> Self {
        Self { index: home, step: 0, capacity }
    }
}

impl Iterator for QuadraticProbe {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<usize> {
        if self.step >= self.capacity {
            return None;
        }
        let current = self.index;
        let gap = self.step.saturating_mul(2).saturating_add(1) % self.capacity;
        self.index = (self.index + gap) % self.capacity;
        self.step += 1;
        Some(current)
    }
}

/// A string-keyed hash map resolving collisions with quadratic probing.
///
/// The table size is always an odd prime and the load factor is kept below
/// [`Self::MAX_LOAD`] by doubling the table before an insert that would start at
/// or above it. Removal leaves a tombstone so probe sequences running through the
/// slot stay intact.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct OpenAddressingMap<V, H = HashFn> {
    /// The slots storing the entries
    slots: Vec<Slot<V>>,
    /// Number of live entries
    size: usize,
    /// Hash function bound at construction
    hasher: H,
}

impl<V, H> Extend<(String, V)> for OpenAddressingMap<V, H>
where
    H: KeyHasher,
{
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<V, H> OpenAddressingMap<V, H>
where
    H: KeyHasher,
{
    /// Load factor at which `put` doubles the table first
    pub const MAX_LOAD: f64 = 0.5;

    /// Creates a map with at least `capacity` slots, rounded up to a prime
    pub fn new(capacity: usize, hasher: H) -> Self {
        Self { slots: empty_slots(next_prime(capacity)), size: 0, hasher }
    }

    /// Gets the home slot for a key
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    fn home_index(&self, key: &str) -> usize {
        // Capacity is a prime >= 3, so the remainder fits back into usize.
        (self.hasher.hash_key(key) % self.slots.len() as u64) as usize
    }

    /// Finds the slot holding the live entry for `key`.
    ///
    /// An empty slot ends the search; tombstones are probed through.
    fn find_index(&self, key: &str) -> Option<usize> {
        let home = self.home_index(key);
        for index in QuadraticProbe::new(home, self.slots.len()) {
            match self.slots.get(index)? {
                Slot::Empty => return None,
                Slot::Occupied(entry) if entry.key == key => return Some(index),
                Slot::Occupied(_) | Slot::Tombstone => {}
            }
        }
        None
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// The table is doubled first whenever the load factor is at or above
    /// [`Self::MAX_LOAD`], even if the call ends up only updating a value.
    pub fn put<K: Into<String>>(&mut self, key: K, value: V) -> Option<V> {
        if self.table_load() >= Self::MAX_LOAD {
            let target = self.capacity().saturating_mul(2);
            trace!("load {:.3} reached threshold, growing to {target}", self.table_load());
            self.resize_table(target);
        }

        let key = key.into();
        let home = self.home_index(&key);
        let mut vacancy = None;

        for index in QuadraticProbe::new(home, self.slots.len()) {
            match self.slots.get_mut(index) {
                None => break,
                Some(Slot::Empty) => {
                    vacancy.get_or_insert(index);
                    break;
                }
                // Keep probing past a tombstone: the key may live further along.
                Some(Slot::Tombstone) => {
                    vacancy.get_or_insert(index);
                }
                Some(Slot::Occupied(entry)) if entry.key == key => {
                    return Some(mem::replace(&mut entry.value, value));
                }
                Some(Slot::Occupied(_)) => {}
            }
        }

        match vacancy.and_then(|index| self.slots.get_mut(index)) {
            Some(slot) => {
                *slot = Slot::Occupied(Entry { key, value });
                self.size = self.size.saturating_add(1);
            }
            None => warn!("probe sequence for {key:?} exhausted without a free slot"),
        }
        None
    }

    /// Retrieve a value for a given key
    pub fn get(&self, key: &str) -> Option<&V> {
        match self.slots.get(self.find_index(key)?)? {
            Slot::Occupied(entry) => Some(&entry.value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find_index(key)?;
        match self.slots.get_mut(index)? {
            Slot::Occupied(entry) => Some(&mut entry.value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns true if the map holds a live entry for `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find_index(key).is_some()
    }

    /// Removes a key, leaving a tombstone in its slot
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.find_index(key)?;
        let slot = self.slots.get_mut(index)?;
        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied(entry) => {
                self.size = self.size.saturating_sub(1);
                Some(entry.value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Rebuilds the table with `capacity` rounded up to a prime.
    ///
    /// Requests below the current number of entries are ignored.
    pub fn resize_table(&mut self, capacity: usize) {
        if let Err(err) = self.try_resize_table(capacity) {
            debug!("ignoring resize request: {err}");
        }
    }

    /// Rebuilds the table with `capacity` rounded up to a prime.
    ///
    /// Live entries are re-inserted in slot order through [`Self::put`], which may
    /// grow the table again if the new capacity leaves it at or above
    /// [`Self::MAX_LOAD`].
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError::BelowMinimum`] if `capacity` is below [`Self::len`].
    pub fn try_resize_table(&mut self, capacity: usize) -> Result<(), CapacityError> {
        if capacity < self.size {
            return Err(CapacityError::BelowMinimum { requested: capacity, minimum: self.size });
        }

        let new_capacity = next_prime(capacity);
        debug!(
            "rebuilding open addressing table: {} -> {new_capacity} slots, {} entries",
            self.slots.len(),
            self.size
        );

        let old_slots = mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.size = 0;
        for slot in old_slots {
            if let Slot::Occupied(Entry { key, value }) = slot {
                self.put(key, value);
            }
        }
        Ok(())
    }
}

impl<V, H> OpenAddressingMap<V, H> {
    /// Returns the number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the current load factor of the map
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.slots.len() as f64
    }

    /// Counts slots without a live entry; tombstones count as empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.slots.iter().filter(|slot| !matches!(slot, Slot::Occupied(_))).count()
    }

    /// Returns the live entries in slot order
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
    }

    /// Empties every slot, keeping the capacity
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.size = 0;
    }

    /// Returns an iterator over the live entries in slot order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { slots: &self.slots, index: 0 }
    }
}

impl<V, H> StringMap<V> for OpenAddressingMap<V, H>
where
    H: KeyHasher,
{
    fn put(&mut self, key: String, value: V) -> Option<V> {
        Self::put(self, key, value)
    }

    fn get(&self, key: &str) -> Option<&V> {
        Self::get(self, key)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        Self::remove(self, key)
    }

    fn resize_table(&mut self, capacity: usize) {
        Self::resize_table(self, capacity);
    }

    fn try_resize_table(&mut self, capacity: usize) -> Result<(), CapacityError> {
        Self::try_resize_table(self, capacity)
    }

    fn table_load(&self) -> f64 {
        Self::table_load(self)
    }

    fn empty_buckets(&self) -> usize {
        Self::empty_buckets(self)
    }

    fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        Self::get_keys_and_values(self)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn contains_key(&self, key: &str) -> bool {
        Self::contains_key(self, key)
    }
}

impl<V: fmt::Display, H> fmt::Display for OpenAddressingMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: EMPTY")?,
                Slot::Tombstone => writeln!(f, "{index}: TOMBSTONE")?,
                Slot::Occupied(entry) => writeln!(f, "{index}: {}: {}", entry.key, entry.value)?,
            }
        }
        Ok(())
    }
}

impl<'a, V, H> IntoIterator for &'a OpenAddressingMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Allocates `capacity` empty slots
fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

/// Iterator over the live entries of an [`OpenAddressingMap`].
///
/// Skips empty slots and tombstones; once the index passes the last slot it keeps
/// returning `None`.
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Reference to the slots in the map
    slots: &'a [Slot<V>],
    /// Current position in the iteration
    index: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.slots.get(self.index) {
            self.index = self.index.saturating_add(1);
            if let Slot::Occupied(entry) = slot {
                return Some((entry.key.as_str(), &entry.value));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sum_hash, utils::is_prime, weighted_hash};
    use test_log::test;

    fn probe_order(home: usize, capacity: usize) -> Vec<usize> {
        QuadraticProbe::new(home, capacity).collect()
    }

    #[test]
    fn test_probe_sequence() {
        assert_eq!(probe_order(0, 7), vec![0, 1, 4, 2, 2, 4, 1]);
        assert_eq!(probe_order(8, 11), vec![8, 9, 1, 6, 2, 0, 0, 2, 6, 1, 9]);
        assert_eq!(probe_order(2, 3).len(), 3);
    }

    #[test]
    fn test_put_update_and_get() {
        let mut map = OpenAddressingMap::new(11, sum_hash);
        assert_eq!(map.capacity(), 11);

        assert_eq!(map.put("key1", 10), None);
        assert_eq!(map.put("key2", 20), None);
        assert_eq!(map.put("key1", 30), Some(10));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("key1"), Some(&30));
        assert_eq!(map.get("key2"), Some(&20));
        assert_eq!(map.get("key3"), None);
    }

    #[test]
    fn test_construction_rounds_to_prime() {
        let map: OpenAddressingMap<i32> = OpenAddressingMap::new(20, sum_hash);
        assert_eq!(map.capacity(), 23);

        let map: OpenAddressingMap<i32> = OpenAddressingMap::new(0, sum_hash);
        assert_eq!(map.capacity(), 3);
    }

    #[test]
    fn test_collisions_follow_quadratic_sequence() {
        // All three are anagrams, so sum_hash sends them to slot 8 of 11.
        let mut map = OpenAddressingMap::new(11, sum_hash);
        map.put("abc", 1);
        map.put("acb", 2);
        map.put("bac", 3);

        let order: Vec<(&str, i32)> = map.iter().map(|(k, &v)| (k, v)).collect();
        assert_eq!(order, vec![("bac", 3), ("abc", 1), ("acb", 2)]);
        assert_eq!(map.empty_buckets(), 8);
    }

    #[test]
    fn test_lookup_probes_through_tombstones() {
        let mut map = OpenAddressingMap::new(11, sum_hash);
        map.put("ab", 1);
        map.put("ba", 2);

        assert_eq!(map.remove("ab"), Some(1));
        assert_eq!(map.get("ab"), None);
        assert_eq!(map.get("ba"), Some(&2));
        assert!(!map.contains_key("ab"));
        assert!(map.contains_key("ba"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_update_behind_tombstone_does_not_duplicate() {
        let mut map = OpenAddressingMap::new(11, sum_hash);
        map.put("ab", 1);
        map.put("ba", 2);
        map.remove("ab");

        // "ba" sits one probe past the tombstone left by "ab".
        assert_eq!(map.put("ba", 20), Some(2));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_keys_and_values(), vec![("ba".to_string(), 20)]);

        // A fresh key reuses the tombstone.
        assert_eq!(map.put("ab", 10), None);
        assert_eq!(map.len(), 2);
        let order: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["ab", "ba"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut map = OpenAddressingMap::new(53, sum_hash);
        assert_eq!(map.get("key1"), None);
        map.put("key1", 10);
        assert_eq!(map.get("key1"), Some(&10));
        assert_eq!(map.remove("key1"), Some(10));
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.remove("key4"), None);
        assert_eq!(map.remove("key1"), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_put_keeps_load_below_half() {
        let mut map = OpenAddressingMap::new(53, sum_hash);
        for i in 0..150 {
            map.put(format!("str{i}"), i * 100);
            // The check runs before inserting, so one entry may land past half.
            assert!(map.len() * 2 <= map.capacity() + 1);
            assert!(is_prime(map.capacity()));
        }
        assert_eq!(map.len(), 150);
        for i in 0..150 {
            assert_eq!(map.get(&format!("str{i}")), Some(&(i * 100)));
        }
    }

    #[test]
    fn test_repeated_keys_count_once() {
        let mut map = OpenAddressingMap::new(41, weighted_hash);
        for i in 0..50 {
            map.put(format!("str{}", i / 3), i * 100);
        }
        assert_eq!(map.len(), 17);
        assert_eq!(map.get("str16"), Some(&4900));
        assert_eq!(map.get("str0"), Some(&200));
    }

    #[test]
    fn test_growth_doubles_to_next_prime() {
        let mut map = OpenAddressingMap::new(5, sum_hash);
        map.put("a", 1);
        map.put("b", 2);
        map.put("c", 3);
        assert_eq!(map.capacity(), 5);

        // 3 / 5 >= 0.5, so the fourth put rebuilds at next_prime(10) = 11.
        map.put("d", 4);
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_resize_table() {
        let mut map = OpenAddressingMap::new(20, sum_hash);
        map.put("key1", 10);
        assert_eq!((map.len(), map.capacity()), (1, 23));

        map.resize_table(30);
        assert_eq!((map.len(), map.capacity()), (1, 31));
        assert_eq!(map.get("key1"), Some(&10));
        assert!(map.contains_key("key1"));
    }

    #[test]
    fn test_resize_below_size_is_rejected() {
        let mut map = OpenAddressingMap::new(11, weighted_hash);
        for i in 1..6 {
            map.put(i.to_string(), (i * 10).to_string());
        }

        assert_eq!(
            map.try_resize_table(2),
            Err(CapacityError::BelowMinimum { requested: 2, minimum: 5 })
        );
        map.resize_table(2);
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_resize_to_exact_size_regrows() {
        let mut map = OpenAddressingMap::new(11, sum_hash);
        for key in ["a", "b", "c", "d", "e"] {
            map.put(key, key.len());
        }

        // Five entries into five slots: reinsertion grows the table again.
        assert_eq!(map.try_resize_table(5), Ok(()));
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.len(), 5);
        for key in ["a", "b", "c", "d", "e"] {
            assert!(map.contains_key(key));
        }
    }

    #[test]
    fn test_resize_drops_tombstones() {
        let mut map = OpenAddressingMap::new(11, sum_hash);
        map.put("ab", 1);
        map.put("ba", 2);
        map.remove("ab");
        assert_eq!(map.empty_buckets(), 10);

        map.resize_table(11);
        assert_eq!(map.to_string().matches("TOMBSTONE").count(), 0);
        assert_eq!(map.get("ba"), Some(&2));
    }

    #[test]
    fn test_resize_preserves_every_key() {
        let mut map = OpenAddressingMap::new(75, weighted_hash);
        let keys: Vec<usize> = (25..1000).step_by(13).collect();
        for key in &keys {
            map.put(key.to_string(), key * 42);
        }

        for capacity in (111..1000).step_by(117) {
            map.resize_table(capacity);
            assert!(map.len() * 2 <= map.capacity() + 1);

            map.put("some key", 0);
            assert!(map.contains_key("some key"));
            map.remove("some key");

            for key in &keys {
                assert_eq!(map.get(&key.to_string()), Some(&(key * 42)));
                assert!(!map.contains_key(&(key + 1).to_string()));
            }
            assert_eq!(map.len(), keys.len());
        }
    }

    #[test]
    fn test_table_load() {
        let mut map = OpenAddressingMap::new(101, sum_hash);
        assert!(map.table_load().abs() < f64::EPSILON);
        map.put("key1", 10);
        assert!((map.table_load() - 1.0 / 101.0).abs() < f64::EPSILON);
        map.put("key2", 20);
        map.put("key1", 30);
        assert!((map.table_load() - 2.0 / 101.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_buckets() {
        let mut map = OpenAddressingMap::new(101, sum_hash);
        assert_eq!(map.empty_buckets(), 101);
        map.put("key1", 10);
        assert_eq!(map.empty_buckets(), 100);
        map.put("key2", 20);
        assert_eq!(map.empty_buckets(), 99);
        map.put("key1", 30);
        assert_eq!(map.empty_buckets(), 99);
        map.put("key4", 40);
        assert_eq!(map.empty_buckets(), 98);
        map.remove("key4");
        assert_eq!(map.empty_buckets(), 99);
    }

    #[test]
    fn test_clear() {
        let mut map = OpenAddressingMap::new(53, sum_hash);
        map.put("key1", 10);
        map.put("key2", 20);
        map.resize_table(100);
        assert_eq!((map.len(), map.capacity()), (2, 101));

        map.clear();

        assert_eq!((map.len(), map.capacity()), (0, 101));
        assert_eq!(map.empty_buckets(), 101);
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.get("key2"), None);
    }

    #[test]
    fn test_iter_skips_tombstones() {
        let mut map = OpenAddressingMap::new(10, weighted_hash);
        for i in 0..5 {
            map.put(i.to_string(), (i * 24).to_string());
        }
        map.remove("0");
        map.remove("4");

        let mut seen: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["1", "2", "3"]);

        let mut iter = map.iter();
        assert_eq!(iter.by_ref().count(), 3);
        assert_eq!(iter.next(), None);

        let mut count = 0;
        for (_, value) in &map {
            assert!(!value.is_empty());
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_get_mut() {
        let mut map = OpenAddressingMap::new(11, sum_hash);
        map.put("key1", 1);

        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Some(&11));
        assert!(map.get_mut("missing").is_none());
    }

    #[test]
    fn test_extend() {
        let mut map = OpenAddressingMap::new(3, sum_hash);
        map.extend((0..20).map(|i| (format!("k{i}"), i)));

        assert_eq!(map.len(), 20);
        assert_eq!(map.capacity(), 79);
        assert_eq!(map.get("k19"), Some(&19));
    }

    #[test]
    fn test_display() {
        let mut map = OpenAddressingMap::new(3, sum_hash);
        map.put("a", 1);
        // 'a' is 97, and 97 % 3 == 1
        assert_eq!(map.to_string(), "0: EMPTY\n1: a: 1\n2: EMPTY\n");

        map.remove("a");
        assert_eq!(map.to_string(), "0: EMPTY\n1: TOMBSTONE\n2: EMPTY\n");
    }

    #[test]
    fn test_probe_is_bounded_without_empty_slots() {
        // Every key hashes to slot 0; with three slots the sequence only visits 0 and 1.
        let mut map = OpenAddressingMap::new(3, |_: &str| -> u64 { 0 });
        map.put("x", 1);
        map.put("y", 2);
        map.remove("x");
        map.remove("y");

        assert_eq!(map.get("missing"), None);
        assert_eq!(map.empty_buckets(), 3);
        assert_eq!(map.to_string(), "0: TOMBSTONE\n1: TOMBSTONE\n2: EMPTY\n");
    }
}
