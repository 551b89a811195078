//! [Hash Table] implementation with separate chaining and load-factor-driven
//! growth.
//!
//! Just use [`HashMap`].
//!
//! [Hash Table]: https://en.wikipedia.org/wiki/Hash_table
//! [`HashMap`]: std::collections::HashMap

use std::fmt;

use core::hash::{Hash, Hasher};
use core::iter::Flatten;
use core::mem;
use core::ops::Index;
use core::slice;

use thiserror::Error;

/// Creates a [`HashTable`] containing the arguments, using the default
/// capacity and load factor.
///
/// # Examples
///
/// ```
/// use chaintable::prelude::*;
///
/// let table = table![1 => "a", 2 => "b", 3 => "c"];
///
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.get(2), Some("b"));
/// ```
#[macro_export]
macro_rules! table {
    () => {
        $crate::collections::hash_table::HashTable::default()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut table = $crate::collections::hash_table::HashTable::default();
        $(table.insert($key, ::std::string::String::from($value));)+
        table
    }};
}

/// Fowler–Noll–Vo (FNV-1a) non-cryptographic hash function
#[derive(Debug, Copy, Clone)]
pub struct FnvHasher {
    hash: u64,
}

impl FnvHasher {
    const FNV_PRIME: u64 = 0x100000001B3;
    const FNV_OFFSET_BASIS: u64 = 0xCBF29CE484222325;

    /// Creates a new [`FnvHasher`], initialized with `FNV_OFFSET_BASIS`.
    pub fn new() -> Self {
        Self {
            hash: FnvHasher::FNV_OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.hash ^= *byte as u64;
            self.hash = self.hash.wrapping_mul(Self::FNV_PRIME);
        }
    }
}

/// Error returned when a [`HashTable`] is constructed with an invalid
/// configuration. No table is produced.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidConfiguration {
    /// The requested bucket count was zero.
    #[error("hash table capacity must be greater than zero")]
    ZeroCapacity,
    /// The requested load factor was outside `(0.0, 1.0]`.
    #[error("hash table load factor must be in range (0.0, 1.0], got {0}")]
    LoadFactorOutOfRange(f64),
}

/// A chain of `(key, value)` entries sharing one bucket index. Entry order
/// within a chain is not meaningful.
type Bucket = Vec<(i32, String)>;

/// [Hash Table] mapping `i32` keys to `String` values, with [separate
/// chaining] for collision resolution.
///
/// The bucket array starts at a fixed capacity and doubles whenever the
/// ratio of stored keys to buckets reaches the configured load factor,
/// rehashing every entry under the new capacity.
///
/// Just use [`HashMap`].
///
/// [Hash Table]: https://en.wikipedia.org/wiki/Hash_table
/// [separate chaining]: https://en.wikipedia.org/wiki/Hash_table#Separate_chaining
/// [`HashMap`]: std::collections::HashMap
#[derive(Clone)]
pub struct HashTable {
    /// Bucket array; its length is the table's capacity.
    buckets: Vec<Bucket>,
    /// Number of distinct keys stored across all buckets.
    entries: usize,
    /// Fill ratio that triggers growth. Fixed at construction.
    load_factor: f64,
}

/// An iterator that references a `HashTable`.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    entries: Flatten<slice::Iter<'a, Bucket>>,
    remaining: usize,
}

/// An iterator over the keys of a `HashTable`.
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    inner: Iter<'a>,
}

/// An iterator over the values of a `HashTable`.
#[derive(Debug, Clone)]
pub struct Values<'a> {
    inner: Iter<'a>,
}

impl HashTable {
    /// Bucket count used by [`HashTable::new`] and [`HashTable::default`].
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Growth threshold used when none is given.
    pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

    /// Multiplier applied to the bucket count on growth.
    const GROWTH_COEFFICIENT: usize = 2;

    /// Creates an empty `HashTable` with the default capacity and load
    /// factor.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let mut table = HashTable::new()?;
    /// # Ok::<(), InvalidConfiguration>(())
    /// ```
    #[inline]
    pub fn new() -> Result<Self, InvalidConfiguration> {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates an empty `HashTable` with `capacity` buckets and the default
    /// load factor.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::ZeroCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let mut table = HashTable::with_capacity(10)?;
    /// assert_eq!(table.capacity(), 10);
    ///
    /// assert!(HashTable::with_capacity(0).is_err());
    /// # Ok::<(), InvalidConfiguration>(())
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> Result<Self, InvalidConfiguration> {
        Self::with_capacity_and_load_factor(capacity, Self::DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty `HashTable` with `capacity` buckets that grows once
    /// the ratio of stored keys to buckets reaches `load_factor`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::ZeroCapacity`] if `capacity` is zero,
    /// or [`InvalidConfiguration::LoadFactorOutOfRange`] if `load_factor` is
    /// outside `(0.0, 1.0]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let mut table = HashTable::with_capacity_and_load_factor(8, 0.5)?;
    /// assert_eq!(table.load_factor(), 0.5);
    ///
    /// assert!(HashTable::with_capacity_and_load_factor(8, 1.5).is_err());
    /// # Ok::<(), InvalidConfiguration>(())
    /// ```
    pub fn with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f64,
    ) -> Result<Self, InvalidConfiguration> {
        if capacity == 0 {
            return Err(InvalidConfiguration::ZeroCapacity);
        }

        // Also rejects NaN.
        if !(load_factor > 0.0 && load_factor <= 1.0) {
            return Err(InvalidConfiguration::LoadFactorOutOfRange(load_factor));
        }

        Ok(Self {
            buckets: vec![Vec::new(); capacity],
            entries: 0,
            load_factor,
        })
    }

    /// Returns the bucket index for `key` in a table of `capacity` buckets.
    ///
    /// Deterministic for a given `(key, capacity)` pair. An index computed
    /// under one capacity is meaningless under another, so every capacity
    /// change forces a full rehash.
    fn bucket_index(key: i32, capacity: usize) -> usize {
        let mut hasher = FnvHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % capacity as u64) as usize
    }

    /// Inserts a key-value pair into the table.
    ///
    /// If the table did not have this key present, [`None`] is returned.
    ///
    /// If the table did have this key present, the value is updated in
    /// place and the old value is returned. Re-inserting an existing key
    /// never changes [`len`] and never creates a second entry.
    ///
    /// [`len`]: HashTable::len
    ///
    /// # Time Complexity
    ///
    /// Takes amortized *O*(1) time. If the insert brings the table to its
    /// load-factor threshold, *O*(*len*) time is taken to rehash every
    /// entry into a doubled bucket array.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let mut table = HashTable::new()?;
    /// assert_eq!(table.insert(37, String::from("a")), None);
    /// assert_eq!(table.is_empty(), false);
    ///
    /// table.insert(37, String::from("b"));
    /// assert_eq!(table.insert(37, String::from("c")), Some(String::from("b")));
    /// assert_eq!(table.get(37), Some("c"));
    /// # Ok::<(), InvalidConfiguration>(())
    /// ```
    pub fn insert(&mut self, key: i32, value: String) -> Option<String> {
        let index = Self::bucket_index(key, self.buckets.len());

        let chain = &mut self.buckets[index];
        if let Some((_, existing)) = chain.iter_mut().find(|(k, _)| *k == key) {
            return Some(mem::replace(existing, value));
        }

        chain.push((key, value));
        self.entries += 1;

        if self.entries as f64 / self.buckets.len() as f64 >= self.load_factor {
            self.grow();
        }

        None
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Time Complexity
    ///
    /// Takes average *O*(1) time. Worst case is *O*(*len*) if every key
    /// hashes to the same bucket.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let mut table = HashTable::new()?;
    /// table.insert(1, String::from("a"));
    /// assert_eq!(table.get(1), Some("a"));
    /// assert_eq!(table.get(2), None);
    /// # Ok::<(), InvalidConfiguration>(())
    /// ```
    pub fn get(&self, key: i32) -> Option<&str> {
        let index = Self::bucket_index(key, self.buckets.len());

        self.buckets[index]
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let mut table = HashTable::new()?;
    /// table.insert(1, String::from("a"));
    /// if let Some(value) = table.get_mut(1) {
    ///     value.push('!');
    /// }
    /// assert_eq!(table.get(1), Some("a!"));
    /// # Ok::<(), InvalidConfiguration>(())
    /// ```
    pub fn get_mut(&mut self, key: i32) -> Option<&mut String> {
        let index = Self::bucket_index(key, self.buckets.len());

        self.buckets[index]
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// Removes a key from the table, returning the value at the key if the
    /// key was previously in the table. A missing key leaves the table
    /// unchanged.
    ///
    /// # Time Complexity
    ///
    /// Takes average *O*(1) time. Worst case is *O*(*len*) if every key
    /// hashes to the same bucket.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let mut table = HashTable::new()?;
    /// table.insert(1, String::from("a"));
    /// assert_eq!(table.remove(1), Some(String::from("a")));
    /// assert_eq!(table.remove(1), None);
    /// # Ok::<(), InvalidConfiguration>(())
    /// ```
    pub fn remove(&mut self, key: i32) -> Option<String> {
        let index = Self::bucket_index(key, self.buckets.len());
        let chain = &mut self.buckets[index];

        // The key can sit anywhere in the chain.
        let position = chain.iter().position(|(k, _)| *k == key)?;
        let (_, value) = chain.swap_remove(position);
        self.entries -= 1;

        Some(value)
    }

    /// Returns `true` if the table contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let mut table = HashTable::new()?;
    /// table.insert(1, String::from("a"));
    /// assert_eq!(table.contains_key(1), true);
    /// assert_eq!(table.contains_key(2), false);
    /// # Ok::<(), InvalidConfiguration>(())
    /// ```
    #[inline]
    pub fn contains_key(&self, key: i32) -> bool {
        self.get(key).is_some()
    }

    /// Clears the table, removing all key-value pairs. The bucket array
    /// keeps its current length.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let mut table = HashTable::new()?;
    /// table.insert(1, String::from("a"));
    /// table.clear();
    /// assert!(table.is_empty());
    /// # Ok::<(), InvalidConfiguration>(())
    /// ```
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.entries = 0;
    }

    /// Returns the number of distinct keys in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Returns `true` if the table contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Returns the number of buckets in the table.
    ///
    /// This is the logical capacity the growth policy works with, not an
    /// allocation size.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the load factor configured at construction.
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Returns an iterator referencing the hash table. The iteration order
    /// is unspecified.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let table = HashTable::new()?;
    ///
    /// let mut iter = table.iter();
    ///
    /// assert_eq!(iter.next(), None);
    /// # Ok::<(), InvalidConfiguration>(())
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            entries: self.buckets.iter().flatten(),
            remaining: self.entries,
        }
    }

    /// Returns an iterator over the table's keys. Each key is yielded
    /// exactly once, in unspecified order.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let table = table![1 => "a", 2 => "b"];
    ///
    /// let mut keys: Vec<i32> = table.keys().collect();
    /// keys.sort_unstable();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    #[inline]
    pub fn keys(&self) -> Keys<'_> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the table's values, one per entry, in
    /// unspecified order. Values duplicated across different keys are each
    /// yielded.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaintable::prelude::*;
    ///
    /// let table = table![1 => "a", 2 => "a"];
    ///
    /// assert_eq!(table.values().count(), 2);
    /// ```
    #[inline]
    pub fn values(&self) -> Values<'_> {
        Values { inner: self.iter() }
    }

    /// Doubles the bucket array and rehashes every entry under the new
    /// capacity.
    ///
    /// The replacement array is fully populated before it becomes the
    /// table's bucket array, so no half-migrated state is ever observable.
    /// `entries` is untouched; growth neither drops nor duplicates entries.
    fn grow(&mut self) {
        // Work on the bucket count, never on whatever extra space the
        // backing `Vec` has reserved.
        let capacity = self.buckets.len() * Self::GROWTH_COEFFICIENT;
        let mut buckets: Vec<Bucket> = vec![Vec::new(); capacity];

        for chain in self.buckets.drain(..) {
            for (key, value) in chain {
                buckets[Self::bucket_index(key, capacity)].push((key, value));
            }
        }

        self.buckets = buckets;
    }
}

impl Default for HashTable {
    /// Creates an empty `HashTable` with [`DEFAULT_CAPACITY`] buckets and
    /// [`DEFAULT_LOAD_FACTOR`], a configuration that is always valid.
    ///
    /// [`DEFAULT_CAPACITY`]: HashTable::DEFAULT_CAPACITY
    /// [`DEFAULT_LOAD_FACTOR`]: HashTable::DEFAULT_LOAD_FACTOR
    fn default() -> Self {
        Self {
            buckets: vec![Vec::new(); Self::DEFAULT_CAPACITY],
            entries: 0,
            load_factor: Self::DEFAULT_LOAD_FACTOR,
        }
    }
}

impl fmt::Debug for HashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Index<i32> for HashTable {
    type Output = str;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `HashTable`.
    #[inline]
    fn index(&self, key: i32) -> &str {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a> IntoIterator for &'a HashTable {
    type IntoIter = Iter<'a>;
    type Item = (i32, &'a str);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (i32, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.entries.next()?;
        self.remaining -= 1;

        Some((*key, value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> Iterator for Keys<'a> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}

impl<'a> Iterator for Values<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Values<'_> {}
