use core::fmt::Debug;
use core::fmt::Display;
use core::ops::Index;

use log::debug;
use log::trace;

use crate::bucket_array;
use crate::bucket_array::BucketArray;
use crate::error::Error;
use crate::error::Result;
use crate::hasher::DefaultHashBuilder;
use crate::hasher::HashFunction;

/// Smallest number of slots a dictionary is ever created with.
pub const MINIMUM_CAPACITY: usize = 64;

/// Load factor above which an insert doubles the number of slots.
pub const MAX_LOAD_FACTOR: f64 = 0.72;

/// Number of slots for a requested capacity: the smallest power of two that
/// is at least twice the request, and never below [`MINIMUM_CAPACITY`].
fn slots_for(requested: usize) -> usize {
    requested
        .checked_mul(2)
        .and_then(usize::checked_next_power_of_two)
        .expect("capacity overflow")
        .max(MINIMUM_CAPACITY)
}

/// A dictionary mapping unique keys to values, backed by a [`BucketArray`] of
/// separate chains.
///
/// `Dictionary<K, V, S>` hashes keys with `S`, any [`HashFunction<K>`]. Every
/// [`BuildHasher`](core::hash::BuildHasher) qualifies for keys that implement
/// `Hash`, and arbitrary closures can be used through
/// [`HashFn`](crate::HashFn).
///
/// Keys and values are passed as anything convertible into an `Option`, so a
/// plain `key` and `Some(key)` are both accepted; an absent (`None`) key or
/// value is rejected with [`Error::InvalidArgument`].
///
/// # Growth
///
/// The dictionary starts with at least [`MINIMUM_CAPACITY`] slots. Whenever an
/// insert adds a key and leaves the load factor above [`MAX_LOAD_FACTOR`],
/// the number of slots doubles and every entry is rehashed into its new slot.
/// Removing entries never shrinks the dictionary.
///
/// # Example
///
/// ```rust
/// use chain_hash::Dictionary;
/// use chain_hash::Error;
///
/// let mut ages: Dictionary<&str, u32> = Dictionary::new();
/// ages.insert("ada", 36)?;
/// ages.insert("alan", 41)?;
/// ages.insert("ada", 37)?;
///
/// assert_eq!(ages.len(), 2);
/// assert_eq!(ages.get(&"ada"), Ok(&37));
/// assert_eq!(ages.get(&"grace"), Err(Error::NotFound));
/// assert_eq!(ages.insert("grace", None), Err(Error::InvalidArgument));
/// # Ok::<(), Error>(())
/// ```
#[derive(Clone)]
pub struct Dictionary<K, V, S = DefaultHashBuilder> {
    table: BucketArray<(K, V)>,
    hash_builder: S,
    len: usize,
}

impl<K, V, S> Debug for Dictionary<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> Display for Dictionary<K, V, S>
where
    K: Display,
    V: Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        f.write_str("}")
    }
}

impl<K, V, S> Dictionary<K, V, S> {
    /// Returns the number of entries in the dictionary.
    ///
    /// ```rust
    /// # use chain_hash::Dictionary;
    /// let mut dict: Dictionary<i32, &str> = Dictionary::new();
    /// assert_eq!(dict.len(), 0);
    /// dict.insert(1, "a").unwrap();
    /// assert_eq!(dict.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the bucket array.
    ///
    /// This is always a power of two and never less than
    /// [`MINIMUM_CAPACITY`].
    ///
    /// ```rust
    /// # use chain_hash::Dictionary;
    /// let small: Dictionary<i32, i32> = Dictionary::with_capacity(10);
    /// assert_eq!(small.capacity(), 64);
    ///
    /// let large: Dictionary<i32, i32> = Dictionary::with_capacity(100);
    /// assert_eq!(large.capacity(), 256);
    /// ```
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the load factor, the number of entries divided by the number
    /// of slots.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.table.capacity() as f64
    }

    /// Returns a reference to the dictionary's hash function.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of entries stored in non-empty slots.
    ///
    /// Every entry lives in some non-empty slot, so this always equals
    /// [`len`](Dictionary::len); it is computed by walking the slots and is
    /// meant as a consistency check.
    pub fn collision_count(&self) -> usize {
        self.table.collision_count()
    }

    /// Returns the length of the longest chain, or 0 for an empty dictionary.
    pub fn max_chain_length(&self) -> usize {
        self.table.max_chain_length()
    }

    /// Removes every entry. The number of slots is unchanged.
    ///
    /// ```rust
    /// # use chain_hash::Dictionary;
    /// let mut dict: Dictionary<i32, i32> = (0..100).map(|i| (i, i)).collect();
    /// let capacity = dict.capacity();
    /// dict.clear();
    /// assert!(dict.is_empty());
    /// assert_eq!(dict.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        trace!("clearing {} entries from {} slots", self.len, self.capacity());
        self.table.clear();
        self.len = 0;
    }

    /// Returns an iterator over the entries of the dictionary.
    ///
    /// Every entry is visited exactly once, in no specified order.
    ///
    /// ```rust
    /// # use chain_hash::Dictionary;
    /// let mut dict: Dictionary<i32, &str> = Dictionary::new();
    /// dict.insert(1, "a").unwrap();
    /// dict.insert(2, "b").unwrap();
    ///
    /// let mut pairs: Vec<_> = dict.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [(&1, &"a"), (&2, &"b")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys of the dictionary.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the dictionary.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator that removes and yields every entry.
    ///
    /// The dictionary is empty as soon as this returns, even if the iterator
    /// is dropped early. The number of slots is unchanged.
    ///
    /// ```rust
    /// # use chain_hash::Dictionary;
    /// let mut dict: Dictionary<i32, &str> = Dictionary::new();
    /// dict.insert(1, "a").unwrap();
    /// dict.insert(2, "b").unwrap();
    ///
    /// let pairs: Vec<_> = dict.drain().collect();
    /// assert!(dict.is_empty());
    /// assert_eq!(pairs.len(), 2);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        self.len = 0;
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns detailed statistics about the bucket array.
    ///
    /// Requires the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::TableStats {
        self.table.debug_stats()
    }
}

impl<K, V, S> Dictionary<K, V, S>
where
    K: Eq,
    S: HashFunction<K>,
{
    /// Creates an empty dictionary with [`MINIMUM_CAPACITY`] slots and the
    /// given hash function.
    ///
    /// ```rust
    /// use chain_hash::Dictionary;
    /// use chain_hash::HashFn;
    ///
    /// let dict: Dictionary<u64, u64, _> = Dictionary::with_hasher(HashFn(|k: &u64| *k));
    /// assert!(dict.is_empty());
    /// assert_eq!(dict.capacity(), 64);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty dictionary sized for `capacity` entries, using the
    /// given hash function.
    ///
    /// The number of slots is the smallest power of two that is at least
    /// `2 * capacity`, and never less than [`MINIMUM_CAPACITY`].
    ///
    /// # Panics
    ///
    /// Panics if the number of slots overflows `usize`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let slots = slots_for(capacity);
        trace!("creating dictionary with {slots} slots for requested capacity {capacity}");
        Self {
            table: BucketArray::with_capacity(slots),
            hash_builder,
            len: 0,
        }
    }

    /// Associates `value` with `key`, replacing any value already stored for
    /// an equal key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `key` or `value` is `None`; the
    /// dictionary is left untouched.
    ///
    /// ```rust
    /// # use chain_hash::Dictionary;
    /// # use chain_hash::Error;
    /// let mut dict: Dictionary<&str, i32> = Dictionary::new();
    /// dict.insert("a", 1)?;
    /// dict.insert("a", Some(2))?;
    /// assert_eq!(dict.get(&"a"), Ok(&2));
    /// assert_eq!(dict.len(), 1);
    ///
    /// assert_eq!(dict.insert(None, 3), Err(Error::InvalidArgument));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn insert(&mut self, key: impl Into<Option<K>>, value: impl Into<Option<V>>) -> Result<()> {
        let (Some(key), Some(value)) = (key.into(), value.into()) else {
            return Err(Error::InvalidArgument);
        };
        self.insert_present(key, value);
        Ok(())
    }

    fn insert_present(&mut self, key: K, value: V) {
        let hash = self.hash_builder.hash(&key);
        if let Some((_, existing)) = self.table.find_mut(hash, |(k, _)| k == &key) {
            *existing = value;
            return;
        }

        self.table.push(hash, (key, value));
        self.len += 1;
        self.grow_if_needed();
    }

    /// Doubles the number of slots if the last insert pushed the load factor
    /// above [`MAX_LOAD_FACTOR`].
    fn grow_if_needed(&mut self) {
        let load = self.load_factor();
        if load <= MAX_LOAD_FACTOR {
            return;
        }

        let old_capacity = self.table.capacity();
        let new_capacity = old_capacity.checked_mul(2).expect("capacity overflow");
        let hash_builder = &self.hash_builder;
        self.table
            .replace(new_capacity, |(k, _)| hash_builder.hash(k));

        debug!(
            "grew dictionary from {old_capacity} to {new_capacity} slots at load {load:.3} ({} entries)",
            self.len
        );
    }

    /// Returns the value stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `key` is `None`, and
    /// [`Error::NotFound`] if no equal key is stored.
    ///
    /// ```rust
    /// # use chain_hash::Dictionary;
    /// # use chain_hash::Error;
    /// let mut dict: Dictionary<i32, &str> = Dictionary::new();
    /// dict.insert(1, "a").unwrap();
    /// assert_eq!(dict.get(&1), Ok(&"a"));
    /// assert_eq!(dict.get(&2), Err(Error::NotFound));
    /// assert_eq!(dict.get(None), Err(Error::InvalidArgument));
    /// ```
    pub fn get<'q>(&self, key: impl Into<Option<&'q K>>) -> Result<&V>
    where
        K: 'q,
    {
        let key = key.into().ok_or(Error::InvalidArgument)?;
        let hash = self.hash_builder.hash(key);
        self.table
            .find(hash, |(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or(Error::NotFound)
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Errors
    ///
    /// The same as [`get`](Dictionary::get).
    ///
    /// ```rust
    /// # use chain_hash::Dictionary;
    /// let mut dict: Dictionary<i32, String> = Dictionary::new();
    /// dict.insert(1, "a".to_string()).unwrap();
    /// dict.get_mut(&1).unwrap().push('b');
    /// assert_eq!(dict.get(&1).map(String::as_str), Ok("ab"));
    /// ```
    pub fn get_mut<'q>(&mut self, key: impl Into<Option<&'q K>>) -> Result<&mut V>
    where
        K: 'q,
    {
        let key = key.into().ok_or(Error::InvalidArgument)?;
        let hash = self.hash_builder.hash(key);
        self.table
            .find_mut(hash, |(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or(Error::NotFound)
    }

    /// Returns `true` if a value is stored for `key`.
    ///
    /// An absent key is simply not contained; this never fails.
    pub fn contains<'q>(&self, key: impl Into<Option<&'q K>>) -> bool
    where
        K: 'q,
    {
        self.get(key).is_ok()
    }

    /// Removes `key` and returns the value that was stored for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `key` is `None`, and
    /// [`Error::NotFound`] if no equal key is stored. The dictionary is left
    /// untouched in both cases.
    ///
    /// ```rust
    /// # use chain_hash::Dictionary;
    /// # use chain_hash::Error;
    /// let mut dict: Dictionary<i32, &str> = Dictionary::new();
    /// dict.insert(1, "a").unwrap();
    /// assert_eq!(dict.remove(&1), Ok("a"));
    /// assert_eq!(dict.remove(&1), Err(Error::NotFound));
    /// ```
    pub fn remove<'q>(&mut self, key: impl Into<Option<&'q K>>) -> Result<V>
    where
        K: 'q,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and value.
    ///
    /// # Errors
    ///
    /// The same as [`remove`](Dictionary::remove).
    pub fn remove_entry<'q>(&mut self, key: impl Into<Option<&'q K>>) -> Result<(K, V)>
    where
        K: 'q,
    {
        let key = key.into().ok_or(Error::InvalidArgument)?;
        let hash = self.hash_builder.hash(key);
        let entry = self
            .table
            .remove(hash, |(k, _)| k == key)
            .ok_or(Error::NotFound)?;
        self.len -= 1;
        Ok(entry)
    }
}

impl<K, V, S> Dictionary<K, V, S>
where
    K: Eq,
    S: HashFunction<K> + Default,
{
    /// Creates an empty dictionary with [`MINIMUM_CAPACITY`] slots and the
    /// default hash function.
    ///
    /// ```rust
    /// # use chain_hash::Dictionary;
    /// let dict: Dictionary<i32, String> = Dictionary::new();
    /// assert!(dict.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty dictionary sized for `capacity` entries, using the
    /// default hash function.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for Dictionary<K, V, S>
where
    K: Eq,
    S: HashFunction<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S, S2> PartialEq<Dictionary<K, V, S2>> for Dictionary<K, V, S>
where
    K: Eq,
    V: PartialEq,
    S2: HashFunction<K>,
{
    /// Two dictionaries are equal when they hold the same key-value mappings,
    /// whatever their hash functions, capacities or iteration orders.
    fn eq(&self, other: &Dictionary<K, V, S2>) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Ok(v))
    }
}

impl<K, V, S> Eq for Dictionary<K, V, S>
where
    K: Eq,
    V: Eq,
    S: HashFunction<K>,
{
}

impl<K, V, S> Index<&K> for Dictionary<K, V, S>
where
    K: Eq,
    S: HashFunction<K>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not in the dictionary.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Ok(value) => value,
            Err(_) => panic!("key not found in dictionary"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for Dictionary<K, V, S>
where
    K: Eq,
    S: HashFunction<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert_present(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for Dictionary<K, V, S>
where
    K: Eq,
    S: HashFunction<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        dict.extend(iter);
        dict
    }
}

impl<'a, K, V, S> IntoIterator for &'a Dictionary<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for Dictionary<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
            remaining: self.len,
        }
    }
}

/// An iterator over the entries of a [`Dictionary`].
///
/// Besides [`Iterator`], it offers an explicit cursor protocol:
/// [`has_next`](Iter::has_next) reports whether an entry remains, and
/// [`try_next`](Iter::try_next) fails with [`Error::NoMoreElements`] once the
/// entries run out.
///
/// ```rust
/// # use chain_hash::Dictionary;
/// # use chain_hash::Error;
/// let mut dict: Dictionary<&str, i32> = Dictionary::new();
/// dict.insert("only", 1).unwrap();
///
/// let mut iter = dict.iter();
/// assert!(iter.has_next());
/// assert_eq!(iter.try_next(), Ok((&"only", &1)));
/// assert!(!iter.has_next());
/// assert_eq!(iter.try_next(), Err(Error::NoMoreElements));
/// ```
pub struct Iter<'a, K, V> {
    inner: bucket_array::Iter<'a, (K, V)>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Returns `true` if another entry remains.
    pub fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    /// Returns the next entry, or [`Error::NoMoreElements`] once every entry
    /// has been produced.
    pub fn try_next(&mut self) -> Result<(&'a K, &'a V)> {
        let (k, v) = self.inner.try_next()?;
        self.remaining -= 1;
        Ok((k, v))
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

/// An iterator over the keys of a [`Dictionary`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    /// Returns `true` if another key remains.
    pub fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    /// Returns the next key, or [`Error::NoMoreElements`] once every key has
    /// been produced.
    pub fn try_next(&mut self) -> Result<&'a K> {
        self.inner.try_next().map(|(k, _)| k)
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`Dictionary`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    /// Returns `true` if another value remains.
    pub fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    /// Returns the next value, or [`Error::NoMoreElements`] once every value
    /// has been produced.
    pub fn try_next(&mut self) -> Result<&'a V> {
        self.inner.try_next().map(|(_, v)| v)
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// An owning iterator over the entries of a [`Dictionary`].
pub struct IntoIter<K, V> {
    inner: bucket_array::IntoIter<(K, V)>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// A draining iterator over the entries of a [`Dictionary`].
pub struct Drain<'a, K, V> {
    inner: bucket_array::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
