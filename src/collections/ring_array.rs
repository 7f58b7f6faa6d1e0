//! Growable double-ended queue over a flat slot array.
//!
//! # Invariants
//! - `len <= capacity`, and `head < capacity` whenever `capacity > 0`.
//! - The element at logical index `i` lives at physical slot
//!   `(head + i) % capacity`.
//! - Slots in the logical range `[0, len)` are `Some`; all others are `None`.
//!
//! # Threading
//! This type is not synchronized; it assumes single-threaded usage.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::iter::FusedIterator;

/// Minimum number of slots added by a growth step.
const MIN_GROWTH: usize = 4;

/// A double-ended queue backed by one contiguous slot array.
///
/// Unlike a linked list, scanning, sorting and mid-array removal stay
/// cache-friendly, and there is no per-element allocation. Pushing at either
/// end is amortized O(1); the array grows by roughly 1.5x when full.
///
/// `RingArray<T>` owns its elements. Store `Box<T>` or `Arc<T>` to keep
/// large payloads out of the slot array.
///
/// # Example
///
/// ```rust
/// use parallax_adapter::collections::RingArray;
///
/// let mut queue = RingArray::new(4);
/// queue.push_back(2);
/// queue.push_back(3);
/// queue.push_front(1);
///
/// assert_eq!(queue.peek_nth(1), Some(&2));
/// assert_eq!(queue.pop_front(), Some(1));
/// assert_eq!(queue.pop_back(), Some(3));
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Clone)]
pub struct RingArray<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    len: usize,
}

fn vacant_slots<T>(count: usize) -> Box<[Option<T>]> {
    (0..count).map(|_| None).collect()
}

impl<T> RingArray<T> {
    /// Create an empty array with room for `initial_capacity` elements.
    ///
    /// A capacity of 0 is allowed; the first push allocates.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            slots: vacant_slots(initial_capacity),
            head: 0,
            len: 0,
        }
    }

    /// Alias for [`new`](Self::new).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity)
    }

    /// Number of elements stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns true when no elements are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true when the next push will grow the array.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Physical slot of a logical index in `0..=capacity`.
    #[inline]
    fn physical(&self, logical: usize) -> usize {
        let idx = self.head + logical;
        let cap = self.capacity();
        if idx >= cap { idx - cap } else { idx }
    }

    /// Element at a logical index known to be within `0..len`.
    #[inline]
    fn occupied(&self, logical: usize) -> Option<&T> {
        debug_assert!(logical < self.len);
        let slot = self.slots[self.physical(logical)].as_ref();
        debug_assert!(slot.is_some(), "slot {logical} within length is vacant");
        slot
    }

    /// Move the element at logical index `from` into the vacant logical slot `to`.
    #[inline]
    fn shift(&mut self, from: usize, to: usize) {
        let from = self.physical(from);
        let to = self.physical(to);
        debug_assert!(self.slots[to].is_none());
        self.slots[to] = self.slots[from].take();
    }

    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = (old_capacity + old_capacity / 2).max(old_capacity + MIN_GROWTH);

        // Re-linearize: logical element i lands in physical slot i.
        let mut slots = vacant_slots(new_capacity);
        for (i, slot) in slots.iter_mut().enumerate().take(self.len) {
            let from = self.physical(i);
            *slot = self.slots[from].take();
        }
        self.slots = slots;
        self.head = 0;

        tracing::trace!(
            from = old_capacity,
            to = new_capacity,
            len = self.len,
            "ring array grown"
        );
    }

    #[inline]
    fn reserve_one(&mut self) {
        if self.is_full() {
            self.grow();
        }
    }

    /// Append `elem` at the back, growing if full.
    pub fn push_back(&mut self, elem: T) {
        self.reserve_one();
        let tail = self.physical(self.len);
        debug_assert!(self.slots[tail].is_none());
        self.slots[tail] = Some(elem);
        self.len += 1;
    }

    /// Prepend `elem` at the front, growing if full.
    pub fn push_front(&mut self, elem: T) {
        self.reserve_one();
        self.head = if self.head == 0 {
            self.capacity() - 1
        } else {
            self.head - 1
        };
        debug_assert!(self.slots[self.head].is_none());
        self.slots[self.head] = Some(elem);
        self.len += 1;
    }

    /// Remove and return the front element, or `None` when empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.slots[self.head].take();
        self.head = self.physical(1);
        self.len -= 1;
        value
    }

    /// Remove and return the back element, or `None` when empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let tail = self.physical(self.len - 1);
        self.len -= 1;
        self.slots[tail].take()
    }

    /// The front element, or `None` when empty.
    pub fn peek_front(&self) -> Option<&T> {
        self.peek_nth(0)
    }

    /// The back element, or `None` when empty.
    pub fn peek_back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.peek_nth(i))
    }

    /// The element at logical index `i`, or `None` if `i >= len`.
    pub fn peek_nth(&self, i: usize) -> Option<&T> {
        if i >= self.len {
            return None;
        }
        self.slots[self.physical(i)].as_ref()
    }

    /// Mutable access to the front element.
    pub fn peek_front_mut(&mut self) -> Option<&mut T> {
        self.peek_nth_mut(0)
    }

    /// Mutable access to the back element.
    pub fn peek_back_mut(&mut self) -> Option<&mut T> {
        match self.len.checked_sub(1) {
            Some(i) => self.peek_nth_mut(i),
            None => None,
        }
    }

    /// Mutable access to the element at logical index `i`.
    pub fn peek_nth_mut(&mut self, i: usize) -> Option<&mut T> {
        if i >= self.len {
            return None;
        }
        let idx = self.physical(i);
        self.slots[idx].as_mut()
    }

    /// Remove the element at logical index `i`, keeping the order of the rest.
    ///
    /// Whichever side of `i` is shorter is shifted to close the gap, so the
    /// cost is O(min(i, len - i)). Returns `None` if `i >= len`.
    pub fn drop_element(&mut self, i: usize) -> Option<T> {
        if i >= self.len {
            return None;
        }
        let idx = self.physical(i);
        let removed = self.slots[idx].take();

        let after = self.len - 1 - i;
        if i < after {
            // Shift the front part one slot towards the back.
            for j in (0..i).rev() {
                self.shift(j, j + 1);
            }
            self.head = self.physical(1);
        } else {
            for j in i + 1..self.len {
                self.shift(j, j - 1);
            }
        }

        self.len -= 1;
        removed
    }

    /// Like [`drop_element`](Self::drop_element), reporting a bad index as
    /// [`Error::IndexOutOfRange`].
    pub fn remove(&mut self, i: usize) -> Result<T> {
        let len = self.len;
        self.drop_element(i)
            .ok_or(Error::IndexOutOfRange { index: i, len })
    }

    /// Insert `elem` so that it ends up at logical index `i`.
    ///
    /// `i == len` appends. Fails with [`Error::IndexOutOfRange`] if `i > len`.
    pub fn insert(&mut self, i: usize, elem: T) -> Result<()> {
        if i > self.len {
            return Err(Error::IndexOutOfRange {
                index: i,
                len: self.len,
            });
        }
        self.insert_within(i, elem);
        Ok(())
    }

    fn insert_within(&mut self, i: usize, elem: T) {
        debug_assert!(i <= self.len);
        self.reserve_one();

        if i < self.len - i {
            // Open a slot before the head and pull the first `i` elements into it.
            self.head = if self.head == 0 {
                self.capacity() - 1
            } else {
                self.head - 1
            };
            for j in 0..i {
                self.shift(j + 1, j);
            }
        } else {
            for j in (i..self.len).rev() {
                self.shift(j, j + 1);
            }
        }

        let idx = self.physical(i);
        debug_assert!(self.slots[idx].is_none());
        self.slots[idx] = Some(elem);
        self.len += 1;
    }

    /// Logical index of the first element matching `pred`.
    pub fn find<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().position(pred)
    }

    /// Logical index of the first element equal to `value`.
    pub fn find_by_value(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.find(|elem| elem == value)
    }

    /// Insert `elem` keeping the array ascending according to `cmp`.
    ///
    /// The array must already be sorted by `cmp`. Elements comparing equal
    /// to `elem` stay in front of it, so equal keys keep insertion order.
    pub fn push_sorted<F>(&mut self, elem: T, mut cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut lo = 0;
        let mut hi = self.len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.occupied(mid) {
                Some(existing) if cmp(existing, &elem) != Ordering::Greater => lo = mid + 1,
                _ => hi = mid,
            }
        }
        self.insert_within(lo, elem);
    }

    /// Sort all elements in place, ascending according to `cmp`.
    ///
    /// The sort is stable. The contents are first rotated so the logical
    /// sequence starts at physical slot 0, which makes the result
    /// independent of where the window currently wraps.
    pub fn sort<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if self.len < 2 {
            return;
        }
        self.slots.rotate_left(self.head);
        self.head = 0;

        // Only the occupied prefix is sorted, so both sides are always Some.
        self.slots[..self.len].sort_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => cmp(a, b),
            _ => Ordering::Equal,
        });
    }

    /// Drop all elements in FIFO order. Capacity is kept.
    pub fn clear(&mut self) {
        for i in 0..self.len {
            let idx = self.physical(i);
            self.slots[idx] = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Front-to-back iterator over the elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            array: self,
            front: 0,
            back: self.len,
        }
    }
}

impl<T> Default for RingArray<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RingArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for RingArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut array = Self::new(iter.size_hint().0);
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for RingArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.push_back(elem);
        }
    }
}

/// Borrowing iterator returned by [`RingArray::iter`].
pub struct Iter<'a, T> {
    array: &'a RingArray<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let item = self.array.occupied(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.array.occupied(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RingArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Owning iterator, yielding elements front to back.
pub struct IntoIter<T> {
    array: RingArray<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.array.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.array.len(), Some(self.array.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.array.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for RingArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { array: self }
    }
}
