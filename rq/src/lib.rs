//! Fixed-capacity FIFO queue over a circular buffer.
//!
//! `BoundedQueue<T>` allocates its backing storage once at construction and
//! never reallocates. Enqueue, dequeue, and peek are all O(1) via modular
//! index arithmetic over the fixed-size slot array.
//!
//! # Invariants
//! - `len <= capacity` at all times.
//! - Slots in the logical range `[front, front + len)` (wrapping modulo
//!   capacity) are occupied; all other slots are vacant.
//! - FIFO order: items leave in the exact order they entered.
//!
//! # Threading
//! This type is not synchronized; it assumes single-threaded usage.

/// Fixed-capacity FIFO backed by a circular buffer.
///
/// A full queue refuses new items rather than growing or evicting:
/// [`push_back`](BoundedQueue::push_back) hands the rejected item back to the
/// caller untouched, so backpressure is explicit and deterministic.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    slots: Vec<Option<T>>,
    front: usize,
    len: usize,
}

impl<T> BoundedQueue<T> {
    /// Constructs an empty queue holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Callers validate capacity before
    /// construction; a zero-capacity queue could never hold an item.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedQueue capacity must be > 0");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, front: 0, len: 0 }
    }

    /// Returns the fixed capacity set at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of items currently queued.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when no items are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true when `len == capacity`.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Index of the slot one past the last occupied slot.
    #[inline]
    fn rear(&self) -> usize {
        (self.front + self.len) % self.capacity()
    }

    /// Attempts to append `item`, returning `Err(item)` when the queue is
    /// already full.
    ///
    /// On failure nothing is consumed or mutated; ownership returns to the
    /// caller instead of the item being dropped silently.
    pub fn push_back(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        let rear = self.rear();
        debug_assert!(self.slots[rear].is_none());
        self.slots[rear] = Some(item);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the oldest item, or `None` when empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.slots[self.front].take();
        debug_assert!(item.is_some());
        self.front = (self.front + 1) % self.capacity();
        self.len -= 1;
        item
    }

    /// Returns the oldest item without removing it.
    pub fn front(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.front].as_ref()
    }

    /// Mutable peek at the oldest item.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.front].as_mut()
    }

    /// Iterates the queued items front to back without mutation.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { queue: self, pos: 0 }
    }
}

/// Front-to-back iterator over a [`BoundedQueue`].
pub struct Iter<'a, T> {
    queue: &'a BoundedQueue<T>,
    pos: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.pos >= self.queue.len {
            return None;
        }
        let idx = (self.queue.front + self.pos) % self.queue.capacity();
        self.pos += 1;
        self.queue.slots[idx].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.queue.len - self.pos;
        (rest, Some(rest))
    }
}

impl<'a, T> IntoIterator for &'a BoundedQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
