//! Hash functions for [`Dictionary`](crate::Dictionary).
//!
//! The dictionary accepts any [`HashFunction`], which covers every
//! [`BuildHasher`] as well as closures wrapped in [`HashFn`].

use core::hash::BuildHasher;
use core::hash::Hash;
use core::hash::Hasher;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hash function used when none is supplied.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hash function used when none is supplied.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        /// The hash function used when none is supplied.
        pub type DefaultHashBuilder = core::hash::BuildHasherDefault<FnvHasher>;
    }
}

/// Maps a key to a 64-bit hash code.
///
/// A hash function must be pure: equal keys always produce equal hashes, and
/// calling it has no side effects. The dictionary only ever uses the low bits
/// of the result, so functions with poor low-bit entropy will produce long
/// chains.
///
/// Every [`BuildHasher`] is a hash function for every `K: Hash`. Plain
/// closures can be used through [`HashFn`].
pub trait HashFunction<K: ?Sized> {
    /// Computes the hash code of `key`.
    fn hash(&self, key: &K) -> u64;
}

impl<K, S> HashFunction<K> for S
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.hash_one(key)
    }
}

/// Adapts a closure `Fn(&K) -> u64` into a [`HashFunction`].
///
/// ```rust
/// use chain_hash::Dictionary;
/// use chain_hash::HashFn;
///
/// let by_length = HashFn(|key: &String| key.len() as u64);
/// let mut dict: Dictionary<String, i32, _> = Dictionary::with_hasher(by_length);
/// dict.insert("one".to_string(), 1).unwrap();
/// dict.insert("two".to_string(), 2).unwrap();
///
/// // Both keys land in the same chain.
/// assert_eq!(dict.max_chain_length(), 2);
/// assert_eq!(dict.get(&"two".to_string()), Ok(&2));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HashFn<F>(pub F);

impl<K, F> HashFunction<K> for HashFn<F>
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (self.0)(key)
    }
}

/// Fowler–Noll–Vo (FNV-1a) hasher, the fallback when neither `foldhash` nor
/// `std` is available.
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher {
    hash: u64,
}

impl FnvHasher {
    const FNV_PRIME: u64 = 0x100000001B3;
    const FNV_OFFSET_BASIS: u64 = 0xCBF29CE484222325;

    /// Creates a hasher initialized with the FNV offset basis.
    pub fn new() -> Self {
        Self {
            hash: Self::FNV_OFFSET_BASIS,
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
