//! Prime capacity helpers and the contract shared by both map implementations

use crate::error::CapacityError;

/// Returns true if `candidate` is a prime number
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn is_prime(candidate: usize) -> bool {
    if candidate == 2 || candidate == 3 {
        return true;
    }
    if candidate < 2 || candidate % 2 == 0 {
        return false;
    }

    let mut factor = 3;
    while factor <= candidate / factor {
        if candidate % factor == 0 {
            return false;
        }
        factor += 2;
    }
    true
}

/// Rounds `capacity` up to the nearest odd prime.
///
/// Even inputs are bumped to the next odd number before the search, so the result
/// is never 2: `next_prime(0)`, `next_prime(1)` and `next_prime(2)` are all 3.
#[must_use]
pub fn next_prime(capacity: usize) -> usize {
    let mut candidate = if capacity % 2 == 0 { capacity.saturating_add(1) } else { capacity };
    while !is_prime(candidate) {
        candidate = candidate.saturating_add(2);
    }
    candidate
}

/// Operations common to every string-keyed map in this crate
pub trait StringMap<V> {
    /// Inserts or updates `key`, returning the value it replaced
    fn put(&mut self, key: String, value: V) -> Option<V>;

    /// Returns the value stored under `key`
    fn get(&self, key: &str) -> Option<&V>;

    /// Removes `key`, returning its value if it was present
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Rebuilds the table with at least `capacity` buckets, or does nothing if
    /// the request is below the map's minimum
    fn resize_table(&mut self, capacity: usize);

    /// Same as [`StringMap::resize_table`] but reports a rejected request
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError::BelowMinimum`] when `capacity` cannot hold the map.
    fn try_resize_table(&mut self, capacity: usize) -> Result<(), CapacityError>;

    /// Ratio of live entries to buckets
    fn table_load(&self) -> f64;

    /// Number of buckets holding no live entry
    fn empty_buckets(&self) -> usize;

    /// Clones every live entry out of the map in bucket order
    fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone;

    /// Removes every entry while keeping the capacity
    fn clear(&mut self);

    /// Number of live entries
    fn len(&self) -> usize;

    /// Number of buckets
    fn capacity(&self) -> usize;

    /// Returns true if the map contains `key`
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns true if the map holds no live entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the keys in bucket order
    fn keys(&self) -> Vec<String>
    where
        V: Clone,
    {
        self.get_keys_and_values().into_iter().map(|(key, _)| key).collect()
    }

    /// Returns the values in bucket order
    fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.get_keys_and_values().into_iter().map(|(_, value)| value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OpenAddressingMap, SeparateChainingMap, sum_hash};

    #[test]
    fn test_is_prime() {
        let primes: Vec<usize> = (0..40).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37]);
        assert!(is_prime(7919));
        assert!(!is_prime(7917));
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(0), 3);
        assert_eq!(next_prime(1), 3);
        assert_eq!(next_prime(2), 3);
        assert_eq!(next_prime(11), 11);
        assert_eq!(next_prime(20), 23);
        assert_eq!(next_prime(22), 23);
        assert_eq!(next_prime(30), 31);
        assert_eq!(next_prime(100), 101);
    }

    fn fill<M: StringMap<i32>>(map: &mut M) {
        map.put("c".to_string(), 1);
        map.put("d".to_string(), 2);
        map.put("e".to_string(), 3);
    }

    #[test]
    fn test_keys_and_values() {
        let mut open = OpenAddressingMap::new(11, sum_hash);
        let mut chained = SeparateChainingMap::new(11, sum_hash);
        fill(&mut open);
        fill(&mut chained);

        // 'c', 'd' and 'e' land in buckets 0, 1 and 2 under sum_hash
        for (keys, values) in [(open.keys(), open.values()), (chained.keys(), chained.values())] {
            assert_eq!(keys, vec!["c".to_string(), "d".to_string(), "e".to_string()]);
            assert_eq!(values, vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_contains_key() {
        let mut map: SeparateChainingMap<i32> = SeparateChainingMap::default();
        fill(&mut map);

        assert!(StringMap::contains_key(&map, "c"));
        assert!(!StringMap::contains_key(&map, "a"));
        assert!(!StringMap::is_empty(&map));
    }
}
