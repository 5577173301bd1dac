//! Pluggable key hashing.
//!
//! A map is bound to one [`KeyHasher`] at construction and only ever reduces its
//! output modulo the current capacity. Any `Fn(&str) -> u64` is a `KeyHasher`, so
//! plain functions such as [`sum_hash`] can be passed directly.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// Function pointer form of a hash function, used as the default hasher type.
pub type HashFn = fn(&str) -> u64;

/// Maps a string key to a non-negative integer.
///
/// Implementations must be deterministic: equal keys must produce equal hashes for
/// the lifetime of the map.
pub trait KeyHasher {
    /// Hashes `key`
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Sums the code points of every character in the key.
///
/// Anagrams collide, which makes this useful for exercising collision handling.
#[must_use]
pub fn sum_hash(key: &str) -> u64 {
    key.chars().fold(0_u64, |hash, c| hash.wrapping_add(u64::from(u32::from(c))))
}

/// Sums each character's code point weighted by its one-based position.
#[must_use]
pub fn weighted_hash(key: &str) -> u64 {
    key.chars().zip(1_u64..).fold(0_u64, |hash, (c, position)| {
        hash.wrapping_add(position.wrapping_mul(u64::from(u32::from(c))))
    })
}

/// Hashes keys with the standard library's `DefaultHasher`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SipKeyHasher;

impl KeyHasher for SipKeyHasher {
    fn hash_key(&self, key: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }
}
