//! Fixed-capacity history of recent readings.
//!
//! An arena-backed ring: slots are allocated once, a write cursor moves
//! modulo capacity, and the oldest slot is overwritten when full.

/// FIFO ring with a fixed capacity (at least 1).
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    /// Next slot to write.
    head: usize,
    capacity: usize,
}

impl<T: Copy> RingBuffer<T> {
    /// `capacity` is clamped to at least 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Append `value`, returning the evicted oldest value when full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.slots.len() < self.capacity {
            self.slots.push(value);
            None
        } else {
            Some(std::mem::replace(&mut self.slots[self.head], value))
        };
        self.head = (self.head + 1) % self.capacity;
        evicted
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Most recently pushed value.
    pub fn latest(&self) -> Option<T> {
        if self.slots.is_empty() {
            return None;
        }
        let idx = (self.head + self.capacity - 1) % self.capacity;
        Some(self.slots[idx])
    }

    /// Iterate values oldest → newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let start = if self.is_full() { self.head } else { 0 };
        let len = self.slots.len();
        (0..len).map(move |i| self.slots[(start + i) % self.capacity])
    }

    /// Copy out the contents in arrival order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Drop every value; the allocation and capacity are kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }
}
