#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bucket_array;

/// A key-value dictionary built on separate chaining.
///
/// This module provides [`Dictionary`], which wraps a
/// [`BucketArray`](bucket_array::BucketArray) of `(K, V)` entries and keeps it
/// under [`MAX_LOAD_FACTOR`] by doubling.
pub mod dictionary;

mod error;

pub mod hasher;

#[cfg(feature = "stats")]
pub use bucket_array::TableStats;
pub use dictionary::Dictionary;
pub use dictionary::MAX_LOAD_FACTOR;
pub use dictionary::MINIMUM_CAPACITY;
pub use error::Error;
pub use error::Result;
pub use hasher::DefaultHashBuilder;
pub use hasher::HashFn;
pub use hasher::HashFunction;
