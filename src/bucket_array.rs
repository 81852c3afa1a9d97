//! The bucket array underneath [`Dictionary`](crate::Dictionary).
//!
//! A [`BucketArray<T>`] is a power-of-two sized array of slots. Each slot is
//! either empty or owns a chain: an insertion-ordered list of every value
//! whose hash selects that slot. Like the dictionary built on it, the array
//! never hashes anything itself; callers pass the hash along with an equality
//! predicate, and growth is driven from outside through
//! [`replace`](BucketArray::replace).

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;

use crate::error::Error;
use crate::error::Result;

/// The collision list stored in an occupied slot.
///
/// Never empty while it sits in a slot; a chain emptied by a removal is
/// released and the slot goes back to empty.
type Chain<T> = Vec<T>;

/// Debug statistics for bucket array analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    /// Number of values stored in the array
    pub populated: usize,
    /// Number of slots in the array
    pub capacity: usize,
    /// Slots holding a chain
    pub occupied_slots: usize,
    /// Slots holding nothing
    pub empty_slots: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Length of the longest chain
    pub max_chain_length: usize,
    /// `chain_lengths[n]` is the number of slots whose chain holds `n` values
    pub chain_lengths: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl TableStats {
    /// Pretty-print the statistics, including a horizontal chain-length
    /// histogram.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Bucket Array Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slot Usage: {} occupied, {} empty",
            self.occupied_slots, self.empty_slots
        );
        println!("Longest chain: {}", self.max_chain_length);

        let max = self.chain_lengths.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return;
        }

        let max_bar = 60usize;
        for (length, &count) in self.chain_lengths.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", length, "█".repeat(width), count);
        }
    }
}

/// A power-of-two array of chains.
///
/// The slot for a hash is `hash & (capacity - 1)`, so only the low bits of
/// the hash select a slot. Every value reachable from slot `i` was pushed
/// with a hash whose low bits equal `i` under the current capacity.
///
/// # Example
///
/// ```rust
/// use chain_hash::bucket_array::BucketArray;
///
/// let mut array: BucketArray<(u64, &str)> = BucketArray::with_capacity(8);
/// array.push(3, (3, "three"));
/// array.push(11, (11, "eleven"));
///
/// // 3 and 11 agree in their low three bits and share a chain.
/// assert_eq!(array.slot_at(3).map(|chain| chain.len()), Some(2));
/// assert_eq!(array.find(11, |&(k, _)| k == 11), Some(&(11, "eleven")));
///
/// // Doubling the capacity separates them again.
/// array.replace(16, |&(k, _)| k);
/// assert_eq!(array.slot_at(3).map(|chain| chain.len()), Some(1));
/// assert_eq!(array.slot_at(11).map(|chain| chain.len()), Some(1));
/// ```
#[derive(Clone)]
pub struct BucketArray<T> {
    slots: Vec<Option<Chain<T>>>,
}

impl<T> Debug for BucketArray<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BucketArray")
            .field("capacity", &self.capacity())
            .field("occupied_slots", &self.occupied_slots())
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .enumerate()
                    .filter_map(|(index, slot)| slot.as_ref().map(|chain| (index, chain)))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T> BucketArray<T> {
    /// Creates an array of `capacity` empty slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "bucket array capacity must be a power of two, got {capacity}"
        );

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot selected by `hash`.
    #[inline]
    pub fn index_of(&self, hash: u64) -> usize {
        hash as usize & (self.slots.len() - 1)
    }

    /// Returns the chain stored at `index`, or `None` if the slot is empty or
    /// `index` is out of range.
    pub fn slot_at(&self, index: usize) -> Option<&[T]> {
        self.slots.get(index)?.as_deref()
    }

    /// Returns the chain at `index`, creating an empty one first if the slot
    /// is empty.
    ///
    /// The caller must push into the returned chain before anything else
    /// observes the array.
    fn ensure_chain(&mut self, index: usize) -> &mut Chain<T> {
        self.slots[index].get_or_insert_with(Vec::new)
    }

    /// Finds the value in `hash`'s chain for which `eq` returns `true`.
    ///
    /// ```rust
    /// use chain_hash::bucket_array::BucketArray;
    ///
    /// let mut array = BucketArray::with_capacity(4);
    /// array.push(7, 7u32);
    /// assert_eq!(array.find(7, |&v| v == 7), Some(&7));
    /// assert_eq!(array.find(3, |&v| v == 3), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&T> {
        self.slot_at(self.index_of(hash))?
            .iter()
            .find(|&value| eq(value))
    }

    /// Finds the value in `hash`'s chain for which `eq` returns `true`,
    /// returning a mutable reference.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&mut T> {
        let index = self.index_of(hash);
        self.slots[index]
            .as_mut()?
            .iter_mut()
            .find(|value| eq(&**value))
    }

    /// Appends `value` to the end of `hash`'s chain.
    ///
    /// No check is made for an equal value already being present.
    pub fn push(&mut self, hash: u64, value: T) -> &mut T {
        let index = self.index_of(hash);
        let chain = self.ensure_chain(index);
        chain.push(value);
        let last = chain.len() - 1;
        &mut chain[last]
    }

    /// Removes and returns the value in `hash`'s chain for which `eq`
    /// returns `true`.
    ///
    /// The relative order of the rest of the chain is preserved.
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<T> {
        let index = self.index_of(hash);
        let slot = &mut self.slots[index];
        let chain = slot.as_mut()?;
        let position = chain.iter().position(|value| eq(value))?;
        let value = chain.remove(position);
        if chain.is_empty() {
            *slot = None;
        }
        Some(value)
    }

    /// Replaces the array with one of `new_capacity` slots, moving every value
    /// to the slot selected by `rehash(value)` under the new capacity.
    ///
    /// Values are visited in iteration order and appended to their new chain,
    /// so values that share a chain after the move keep their relative order.
    ///
    /// # Panics
    ///
    /// Panics if `new_capacity` is not a power of two.
    pub fn replace(&mut self, new_capacity: usize, rehash: impl Fn(&T) -> u64) {
        let old = core::mem::replace(self, Self::with_capacity(new_capacity));
        for value in old {
            let hash = rehash(&value);
            self.push(hash, value);
        }
    }

    /// Empties every slot. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.fill_with(|| None);
    }

    /// Returns an iterator over every value, slot by slot and in chain order
    /// within a slot.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.slots)
    }

    /// Returns an iterator that removes and yields every value.
    ///
    /// The array is empty as soon as this returns, whether or not the
    /// iterator is consumed. The capacity is unchanged.
    pub fn drain(&mut self) -> Drain<'_, T> {
        let capacity = self.capacity();
        let old = core::mem::replace(self, Self::with_capacity(capacity));
        Drain {
            inner: old.into_iter(),
            _marker: PhantomData,
        }
    }

    /// Returns the number of slots holding a chain.
    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns the number of values stored across all non-empty slots.
    pub fn collision_count(&self) -> usize {
        self.slots.iter().flatten().map(Vec::len).sum()
    }

    /// Returns the length of the longest chain, or 0 if every slot is empty.
    pub fn max_chain_length(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Requires the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> TableStats {
        let max_chain_length = self.max_chain_length();
        let mut chain_lengths = vec![0usize; max_chain_length + 1];
        for slot in &self.slots {
            chain_lengths[slot.as_ref().map_or(0, Vec::len)] += 1;
        }

        let populated = self.collision_count();
        let occupied_slots = self.occupied_slots();
        TableStats {
            populated,
            capacity: self.capacity(),
            occupied_slots,
            empty_slots: self.capacity() - occupied_slots,
            load_factor: populated as f64 / self.capacity() as f64,
            max_chain_length,
            chain_lengths,
        }
    }
}

impl<T> IntoIterator for BucketArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.slots)
    }
}

impl<'a, T> IntoIterator for &'a BucketArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the values in a [`BucketArray`].
///
/// The iterator walks the slots in index order, skipping empty ones, and
/// hands out each chain's values in insertion order. It is positioned on the
/// next value whenever [`has_next`](Iter::has_next) reports `true`.
pub struct Iter<'a, T> {
    slots: core::slice::Iter<'a, Option<Chain<T>>>,
    chain: Option<core::slice::Iter<'a, T>>,
}

impl<'a, T> Iter<'a, T> {
    fn new(slots: &'a [Option<Chain<T>>]) -> Self {
        let mut iter = Iter {
            slots: slots.iter(),
            chain: None,
        };
        iter.advance_slot();
        iter
    }

    /// Moves to the next occupied slot, or marks the iterator exhausted.
    fn advance_slot(&mut self) {
        self.chain = self
            .slots
            .by_ref()
            .find_map(|slot| slot.as_ref().filter(|chain| !chain.is_empty()))
            .map(|chain| chain.iter());
    }

    /// Returns `true` if another value remains.
    pub fn has_next(&self) -> bool {
        self.chain.is_some()
    }

    /// Returns the next value, or [`Error::NoMoreElements`] once every value
    /// has been produced.
    pub fn try_next(&mut self) -> Result<&'a T> {
        let chain = self.chain.as_mut().ok_or(Error::NoMoreElements)?;
        let value = chain.next().ok_or(Error::NoMoreElements)?;
        if chain.as_slice().is_empty() {
            self.advance_slot();
        }
        Ok(value)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().ok()
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            chain: self.chain.clone(),
        }
    }
}

/// An owning iterator over the values of a [`BucketArray`].
pub struct IntoIter<T> {
    slots: vec::IntoIter<Option<Chain<T>>>,
    chain: Option<vec::IntoIter<T>>,
}

impl<T> IntoIter<T> {
    fn new(slots: Vec<Option<Chain<T>>>) -> Self {
        IntoIter {
            slots: slots.into_iter(),
            chain: None,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.chain.as_mut().and_then(Iterator::next) {
                return Some(value);
            }
            self.chain = Some(self.slots.by_ref().flatten().next()?.into_iter());
        }
    }
}

/// A draining iterator over the values in a [`BucketArray`].
///
/// This struct is created by the [`drain`] method on [`BucketArray`].
///
/// [`drain`]: BucketArray::drain
pub struct Drain<'a, T> {
    inner: IntoIter<T>,
    _marker: PhantomData<&'a mut BucketArray<T>>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
