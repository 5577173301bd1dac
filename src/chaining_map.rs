use std::{fmt, mem, slice};

use log::{debug, trace};

use crate::{
    chain::{self, Chain},
    error::CapacityError,
    hash::{HashFn, KeyHasher, sum_hash},
    utils::{StringMap, next_prime},
};

/// A string-keyed hash map where every bucket holds a [`Chain`] of entries.
///
/// The bucket count is always an odd prime; the table is doubled before an insert
/// whenever the load factor is at or above [`Self::MAX_LOAD`]. Removal unlinks the
/// node, so there are no tombstones.
#[derive(Debug, Clone)]
pub struct SeparateChainingMap<V, H = HashFn> {
    /// One chain per bucket
    buckets: Vec<Chain<V>>,
    /// Number of entries across all chains
    size: usize,
    /// Hash function bound at construction
    hasher: H,
}

impl<V> SeparateChainingMap<V> {
    /// Bucket count used by [`Default`]
    pub const DEFAULT_CAPACITY: usize = 11;

    /// Creates a map with at least `capacity` buckets using [`sum_hash`]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let hasher: HashFn = sum_hash;
        Self::new(capacity, hasher)
    }
}

impl<V> Default for SeparateChainingMap<V> {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl<V, H> Extend<(String, V)> for SeparateChainingMap<V, H>
where
    H: KeyHasher,
{
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<V, H> SeparateChainingMap<V, H>
where
    H: KeyHasher,
{
    /// Load factor at which `put` doubles the table first
    pub const MAX_LOAD: f64 = 1.0;

    /// Creates a map with at least `capacity` buckets, rounded up to a prime
    pub fn new(capacity: usize, hasher: H) -> Self {
        Self { buckets: empty_buckets(next_prime(capacity)), size: 0, hasher }
    }

    /// Gets the bucket index for a key
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    fn bucket_index(&self, key: &str) -> usize {
        (self.hasher.hash_key(key) % self.buckets.len() as u64) as usize
    }

    /// Returns the chain `key` belongs to
    fn bucket(&self, key: &str) -> Option<&Chain<V>> {
        self.buckets.get(self.bucket_index(key))
    }

    /// Inserts a key-value pair, returning the previous value if the key was present
    pub fn put<K: Into<String>>(&mut self, key: K, value: V) -> Option<V> {
        if self.table_load() >= Self::MAX_LOAD {
            let target = self.capacity().saturating_mul(2);
            trace!("load {:.3} reached threshold, growing to {target}", self.table_load());
            self.resize_table(target);
        }

        let key = key.into();
        let index = self.bucket_index(&key);
        let bucket = self.buckets.get_mut(index)?;
        if let Some(existing) = bucket.contains_mut(&key) {
            return Some(mem::replace(existing, value));
        }
        bucket.insert(key, value);
        self.size = self.size.saturating_add(1);
        None
    }

    /// Retrieve a value for a given key
    pub fn get(&self, key: &str) -> Option<&V> {
        self.bucket(key)?.contains(key)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_index(key);
        self.buckets.get_mut(index)?.contains_mut(key)
    }

    /// Returns true if the map contains `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Unlinks `key` from its chain
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_index(key);
        let removed = self.buckets.get_mut(index)?.remove(key)?;
        self.size = self.size.saturating_sub(1);
        Some(removed)
    }

    /// Rebuilds the table with `capacity` rounded up to a prime; zero is ignored
    pub fn resize_table(&mut self, capacity: usize) {
        if let Err(err) = self.try_resize_table(capacity) {
            debug!("ignoring resize request: {err}");
        }
    }

    /// Rebuilds the table with `capacity` rounded up to a prime.
    ///
    /// Entries are re-inserted bucket by bucket, in chain order.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError::BelowMinimum`] if `capacity` is zero.
    pub fn try_resize_table(&mut self, capacity: usize) -> Result<(), CapacityError> {
        if capacity < 1 {
            return Err(CapacityError::BelowMinimum { requested: capacity, minimum: 1 });
        }

        let new_capacity = next_prime(capacity);
        debug!(
            "rebuilding chained table: {} -> {new_capacity} buckets, {} entries",
            self.buckets.len(),
            self.size
        );

        let old_buckets = mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        self.size = 0;
        for (key, value) in old_buckets.into_iter().flatten() {
            self.put(key, value);
        }
        Ok(())
    }
}

impl<V, H> SeparateChainingMap<V, H> {
    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the current load factor of the map
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Counts buckets whose chain is empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    /// Returns every entry in bucket order, then chain order
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
    }

    /// Replaces every chain with an empty one, keeping the capacity
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = Chain::new();
        }
        self.size = 0;
    }

    /// Returns an iterator over the entries in bucket order, then chain order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.iter(), current: chain::Iter::default() }
    }
}

impl<V, H> StringMap<V> for SeparateChainingMap<V, H>
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
}

impl<V: fmt::Display, H> fmt::Display for SeparateChainingMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            write!(f, "{index}:")?;
            for (key, value) in chain {
                write!(f, " -> ({key}: {value})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a, V, H> IntoIterator for &'a SeparateChainingMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Allocates `capacity` empty chains
fn empty_buckets<V>(capacity: usize) -> Vec<Chain<V>> {
    (0..capacity).map(|_| Chain::new()).collect()
}

/// Iterator over the entries of a [`SeparateChainingMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Buckets not yet visited
    buckets: slice::Iter<'a, Chain<V>>,
    /// Position inside the bucket being visited
    current: chain::Iter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.next() {
                return Some(item);
            }
            self.current = self.buckets.next()?.iter();
        }
    }
}
