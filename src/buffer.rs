//! Growable, index-addressable buffer with pooled slot reuse.
//!
//! Reduces allocation churn in hot paths by parking removed instances
//! in their backing slots and handing them back out on later pooled
//! appends, instead of dropping and reallocating them.

use std::cmp::Ordering;
use std::fmt;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::stats::PoolStats;

/// Default growth increment (and initial capacity) in slots.
pub const DEFAULT_GROW_SIZE: usize = 32;

/// A growable sequence whose vacated slots retain their instances for reuse.
///
/// The backing storage is a manually grown arena of `Option<T>` slots.
/// Slots below the logical length are always occupied; slots at or past it
/// are either `None` (never used) or hold a parked instance awaiting reuse.
/// Capacity grows by exactly the configured increment each time the buffer
/// is full, and never shrinks.
///
/// Pooled operations ([`push_pooled`](Self::push_pooled),
/// [`insert`](Self::insert)) return the slot's previous instance as-is when
/// one is parked there; the caller is responsible for reinitializing its
/// state before use. Only never-used slots invoke the element factory.
///
/// Not safe for concurrent mutation; wrap it in a lock if it must be shared.
pub struct WorkBuffer<T> {
    /// Backing slots. The Vec's length is the capacity; its own growth
    /// policy is never exercised (slots are only written in place or
    /// extended by `grow`), so parked instances survive every operation.
    slots: Vec<Option<T>>,
    /// Logical length. Slots `[0, len)` are always `Some`.
    len: usize,
    /// Slots added each time the buffer is exactly full.
    grow_size: usize,
    /// Element constructor for pooled operations on never-used slots.
    factory: Option<Box<dyn FnMut() -> T>>,
    reused: usize,
    created: usize,
}

impl<T> WorkBuffer<T> {
    /// Create an empty buffer with the default growth increment.
    pub fn new() -> Self {
        Self::with_grow_size(DEFAULT_GROW_SIZE)
    }

    /// Create an empty buffer that starts at `grow_size` slots and grows
    /// by `grow_size` slots each time it fills up.
    ///
    /// # Panics
    /// Panics if `grow_size` is zero.
    pub fn with_grow_size(grow_size: usize) -> Self {
        assert!(grow_size > 0, "grow size must be nonzero");
        let mut slots = Vec::new();
        slots.resize_with(grow_size, || None);
        Self {
            slots,
            len: 0,
            grow_size,
            factory: None,
            reused: 0,
            created: 0,
        }
    }

    /// Install the element factory used by pooled operations when a slot
    /// has never held an instance.
    pub fn with_factory(mut self, factory: impl FnMut() -> T + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Number of logically valid elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the buffer holds no logically valid elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total backing slots, including parked and never-used ones.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Growth increment configured at construction.
    #[inline]
    pub fn grow_size(&self) -> usize {
        self.grow_size
    }

    fn grow(&mut self) {
        let old = self.slots.len();
        self.slots.resize_with(old + self.grow_size, || None);
        trace!("Work buffer grew {} -> {} slots", old, self.slots.len());
    }

    fn grow_if_needed(&mut self) {
        // Strict equality: growth happens exactly once per grow_size appends.
        if self.slots.len() == self.len {
            self.grow();
        }
    }

    /// Make sure the slot at `idx` holds an instance, invoking the factory
    /// for a never-used slot. Counts reuse vs. creation.
    fn materialize(&mut self, idx: usize) -> Result<()> {
        if self.slots[idx].is_some() {
            self.reused += 1;
        } else {
            let factory = self.factory.as_mut().ok_or(Error::MissingFactory)?;
            self.slots[idx] = Some(factory());
            self.created += 1;
        }
        Ok(())
    }

    /// Append a value, overwriting whatever the target slot held.
    ///
    /// Any instance parked in the slot is dropped; pooling does not apply
    /// to value appends. Amortized O(1).
    pub fn push(&mut self, value: T) {
        self.grow_if_needed();
        self.slots[self.len] = Some(value);
        self.len += 1;
    }

    /// Append by reusing the target slot's parked instance, or by invoking
    /// the factory if the slot has never been used.
    ///
    /// The returned instance keeps whatever state it had when it was popped
    /// or removed; reset it before use.
    pub fn push_pooled(&mut self) -> Result<&mut T> {
        self.grow_if_needed();
        let idx = self.len;
        self.materialize(idx)?;
        self.len += 1;
        // Occupied by materialize above.
        Ok(self.slots[idx].as_mut().unwrap())
    }

    /// Remove the last element and return a borrow of it.
    ///
    /// The instance stays parked in its slot, so a later
    /// [`push_pooled`](Self::push_pooled) hands it back out.
    pub fn pop(&mut self) -> Result<&T> {
        if self.len == 0 {
            return Err(Error::OutOfRange { index: 0, len: 0 });
        }
        self.len -= 1;
        Ok(self.slots[self.len].as_ref().unwrap())
    }

    /// Insert at `index`, shifting `[index, len)` one slot to the right.
    ///
    /// The instance that lands at `index` is the one parked just past the
    /// end (or a fresh one from the factory); as with
    /// [`push_pooled`](Self::push_pooled), the caller populates it.
    /// `index == len` is equivalent to a pooled append. O(len - index).
    pub fn insert(&mut self, index: usize) -> Result<&mut T> {
        if index > self.len {
            return Err(Error::OutOfRange {
                index,
                len: self.len,
            });
        }
        if index == self.len {
            return self.push_pooled();
        }
        self.grow_if_needed();
        // Fill the parked tail slot first, then rotate it into place so no
        // instance is dropped by the shift.
        self.materialize(self.len)?;
        self.slots[index..=self.len].rotate_right(1);
        self.len += 1;
        Ok(self.slots[index].as_mut().unwrap())
    }

    /// Remove the element at `index`, shifting `[index + 1, len)` one slot
    /// to the left.
    ///
    /// The removed instance is relocated to the slot just past the new end,
    /// parked for reuse rather than dropped. O(len - index).
    pub fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(Error::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.slots[index..self.len].rotate_left(1);
        self.len -= 1;
        Ok(())
    }

    /// Drop the last `n` elements from the logical range, as `n` pops
    /// without returning values. The instances stay parked for reuse.
    pub fn remove_last(&mut self, n: usize) -> Result<()> {
        if n > self.len {
            return Err(Error::OutOfRange {
                index: n,
                len: self.len,
            });
        }
        self.len -= n;
        Ok(())
    }

    /// Reset the logical length to zero. Every parked instance is retained,
    /// so a refill via pooled appends allocates nothing.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Stable in-place sort of the logical range. Parked slots past the end
    /// are untouched.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.slots[..self.len].sort_by(|a, b| {
            // Slots below len are always occupied.
            compare(a.as_ref().unwrap(), b.as_ref().unwrap())
        });
    }

    /// Borrow the element at `index`, if it is within the logical range.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            self.slots[index].as_ref()
        } else {
            None
        }
    }

    /// Mutably borrow the element at `index`, if it is within the logical
    /// range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            self.slots[index].as_mut()
        } else {
            None
        }
    }

    /// Borrow the first element.
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Borrow the last element.
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|idx| self.get(idx))
    }

    /// Iterate over the logical range.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots[..self.len].iter().filter_map(Option::as_ref)
    }

    /// Get pooling statistics.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            reused: self.reused,
            created: self.created,
        }
    }
}

impl<T: Hash> WorkBuffer<T> {
    /// Log the logical length and a fingerprint of every backing slot,
    /// parked ones included, at debug level. Diagnostic only.
    pub fn dump(&self) {
        let mut line = String::new();
        for slot in &self.slots {
            let fingerprint = match slot {
                Some(value) => {
                    let mut hasher = FxHasher::default();
                    value.hash(&mut hasher);
                    hasher.finish()
                }
                None => 0,
            };
            let _ = write!(line, ", {:x}", fingerprint);
        }
        debug!("Work buffer len={}{}", self.len, line);
    }
}

impl<T> Default for WorkBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for WorkBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkBuffer")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("grow_size", &self.grow_size)
            .finish()
    }
}
