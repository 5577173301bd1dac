//! # Probemap
//!
//! String-keyed hash maps built on prime-sized bucket arrays.
//!
//! This crate provides two hash map implementations with the same contract:
//!
//! - `OpenAddressingMap`: one entry per slot, collisions resolved with quadratic
//!   probing, removals leave tombstones. Grows when the load factor reaches 0.5.
//! - `SeparateChainingMap`: one linked chain per bucket. Grows when the load factor
//!   reaches 1.0.
//!
//! Both take their hash function at construction and round every capacity up to an
//! odd prime. Growth doubles the capacity (then rounds to a prime) and happens inside
//! `put`, before the new key is placed.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probemap::{OpenAddressingMap, sum_hash};
//!
//! let mut map = OpenAddressingMap::new(11, sum_hash);
//!
//! map.put("key1", 10);
//! map.put("key2", 20);
//! map.put("key1", 30);
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("key1"), Some(&30));
//! assert_eq!(map.get("key3"), None);
//!
//! map.remove("key1");
//! assert!(!map.contains_key("key1"));
//! ```
//!
//! ## Separate Chaining
//!
//! ```rust
//! use probemap::SeparateChainingMap;
//!
//! let mut map: SeparateChainingMap<String> = SeparateChainingMap::default();
//! assert_eq!(map.capacity(), 11);
//!
//! for i in 1..=5 {
//!     map.put(i.to_string(), (i * 10).to_string());
//! }
//! assert_eq!(map.get("3").map(String::as_str), Some("30"));
//!
//! map.remove("3");
//! assert!(!map.contains_key("3"));
//! assert_eq!(map.len(), 4);
//! ```
//!
//! ## Resizing
//!
//! `resize_table` silently ignores requests the map cannot honour; `try_resize_table`
//! reports them instead.
//!
//! ```rust
//! use probemap::{CapacityError, OpenAddressingMap, weighted_hash};
//!
//! let mut map = OpenAddressingMap::new(11, weighted_hash);
//! for i in 0..4 {
//!     map.put(i.to_string(), i);
//! }
//!
//! assert_eq!(
//!     map.try_resize_table(2),
//!     Err(CapacityError::BelowMinimum { requested: 2, minimum: 4 })
//! );
//! map.resize_table(30);
//! assert_eq!(map.capacity(), 31);
//! ```

/// Singly linked chains used as buckets by the chaining map
mod chain;
/// Module implementing the separate-chaining hash map
mod chaining_map;
/// Capacity errors
mod error;
/// Hash function trait and stock hash functions
mod hash;
/// Mode finding built on the chaining map
mod mode;
/// Module implementing the quadratic-probing hash map
mod open_addressing_map;
/// Prime helpers and the shared map trait
mod utils;

pub use chain::Chain;
pub use chaining_map::SeparateChainingMap;
pub use error::CapacityError;
pub use hash::{HashFn, KeyHasher, SipKeyHasher, sum_hash, weighted_hash};
pub use mode::find_mode;
pub use open_addressing_map::OpenAddressingMap;
pub use utils::{StringMap, is_prime, next_prime};

/// Iterator types returned by the maps and chains
pub mod iter {
    pub use crate::chain::{IntoIter as ChainIntoIter, Iter as ChainIter};
    pub use crate::chaining_map::Iter as ChainingIter;
    pub use crate::open_addressing_map::Iter as OpenAddressingIter;
}
