//! Free List
//!
//! Stack of vacated slot offsets. The most recently freed slot is handed
//! out first.

/// LIFO queue of reusable slot offsets
#[derive(Debug, Default)]
pub struct FreeList {
    offsets: Vec<u64>,
}

impl FreeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a slot for reuse
    pub fn push(&mut self, offset: u64) {
        self.offsets.push(offset);
    }

    /// Take the most recently freed slot, if any
    pub fn pop(&mut self) -> Option<u64> {
        self.offsets.pop()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn clear(&mut self) {
        self.offsets.clear();
    }
}
