//! Computed table for BDD operation memoization.
//!
//! Every recursive operation of the manager (`ITE`, `restrict`) looks up
//! its operands here before descending, so a shared subgraph is processed
//! only once per distinct call. Without it, building the queens formula
//! is exponential in the number of variables.
//!
//! The type alias [`Cache`] points to [`HashMapCache`]: zero collisions and
//! dynamic growth, at the price of memory that is only reclaimed on
//! [`clear`](HashMapCache::clear) (done by garbage collection).

mod hashmap;

pub use hashmap::HashMapCache;

/// Default cache implementation.
pub type Cache<K, V> = HashMapCache<K, V>;
