//! Fixed-capacity min-heaps over node indices with priority updates.
//!
//! Both heaps keep priorities in a side array indexed by node index, so an
//! index may be queued at most once at a time. Ties pop in heap order, not
//! insertion order.

use std::fmt;

/// Returned when inserting into a queue that is already at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapFull {
    pub capacity: usize,
}

impl fmt::Display for HeapFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "priority queue full ({} entries)", self.capacity)
    }
}

impl std::error::Error for HeapFull {}

/// Min-priority queue of node indices, as used by the search core.
pub trait PriorityQueue {
    /// A queue for indices `0..index_space` holding at most `capacity` entries.
    fn with_capacity(index_space: usize, capacity: usize) -> Self
    where
        Self: Sized;

    /// Queue `index`, which must not already be queued.
    fn insert(&mut self, index: usize, priority: u32) -> Result<(), HeapFull>;

    /// Remove and return the entry with the lowest priority.
    fn pop(&mut self) -> Option<(usize, u32)>;

    /// Lower the priority of a queued `index`.
    ///
    /// `priority` must not exceed the current one; raising a priority breaks
    /// the heap order. Unknown indices are ignored.
    fn update(&mut self, index: usize, priority: u32);

    /// Last priority recorded for `index`.
    fn priority(&self, index: usize) -> u32;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    /// Drop every entry, keeping the allocated storage.
    fn clear(&mut self);
}

// ---------------------------------------------------------------------------
// ScanHeap
// ---------------------------------------------------------------------------

/// Binary heap whose [`update`](PriorityQueue::update) finds the entry by a
/// linear scan of the occupied slots.
#[derive(Debug, Clone)]
pub struct ScanHeap {
    priorities: Vec<u32>,
    /// 1-based heap of node indices; slot 0 is unused.
    heap: Vec<usize>,
    capacity: usize,
}

impl ScanHeap {
    fn sift_up(&mut self, mut i: usize) {
        while i > 1 {
            let parent = i >> 1;
            if self.priorities[self.heap[i]] < self.priorities[self.heap[parent]] {
                self.heap.swap(i, parent);
                i = parent;
            } else {
                return;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = i << 1;
            if left >= len {
                return;
            }
            let mut child = left;
            if left + 1 < len
                && self.priorities[self.heap[left + 1]] < self.priorities[self.heap[left]]
            {
                child = left + 1;
            }
            if self.priorities[self.heap[child]] < self.priorities[self.heap[i]] {
                self.heap.swap(i, child);
                i = child;
            } else {
                return;
            }
        }
    }
}

impl PriorityQueue for ScanHeap {
    fn with_capacity(index_space: usize, capacity: usize) -> Self {
        let mut heap = Vec::with_capacity(capacity + 1);
        heap.push(usize::MAX);
        Self {
            priorities: vec![0; index_space],
            heap,
            capacity,
        }
    }

    fn insert(&mut self, index: usize, priority: u32) -> Result<(), HeapFull> {
        if self.len() >= self.capacity {
            return Err(HeapFull {
                capacity: self.capacity,
            });
        }
        self.priorities[index] = priority;
        self.heap.push(index);
        self.sift_up(self.heap.len() - 1);
        Ok(())
    }

    fn pop(&mut self) -> Option<(usize, u32)> {
        if self.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(1);
        self.sift_down(1);
        Some((top, self.priorities[top]))
    }

    fn update(&mut self, index: usize, priority: u32) {
        if let Some(slot) = (1..self.heap.len()).rev().find(|&s| self.heap[s] == index) {
            self.priorities[index] = priority;
            self.sift_up(slot);
        }
    }

    #[inline]
    fn priority(&self, index: usize) -> u32 {
        self.priorities[index]
    }

    #[inline]
    fn len(&self) -> usize {
        self.heap.len() - 1
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.heap.truncate(1);
    }
}

// ---------------------------------------------------------------------------
// IndexedHeap
// ---------------------------------------------------------------------------

const ABSENT: u32 = 0;

/// Binary heap with an index-to-slot side table, making
/// [`update`](PriorityQueue::update) O(log n).
#[derive(Debug, Clone)]
pub struct IndexedHeap {
    priorities: Vec<u32>,
    /// Heap slot of each node index, or [`ABSENT`].
    slots: Vec<u32>,
    heap: Vec<usize>,
    capacity: usize,
}

impl IndexedHeap {
    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots[self.heap[a]] = a as u32;
        self.slots[self.heap[b]] = b as u32;
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 1 {
            let parent = i >> 1;
            if self.priorities[self.heap[i]] < self.priorities[self.heap[parent]] {
                self.swap(i, parent);
                i = parent;
            } else {
                return;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = i << 1;
            if left >= len {
                return;
            }
            let mut child = left;
            if left + 1 < len
                && self.priorities[self.heap[left + 1]] < self.priorities[self.heap[left]]
            {
                child = left + 1;
            }
            if self.priorities[self.heap[child]] < self.priorities[self.heap[i]] {
                self.swap(i, child);
                i = child;
            } else {
                return;
            }
        }
    }
}

impl PriorityQueue for IndexedHeap {
    fn with_capacity(index_space: usize, capacity: usize) -> Self {
        let mut heap = Vec::with_capacity(capacity + 1);
        heap.push(usize::MAX);
        Self {
            priorities: vec![0; index_space],
            slots: vec![ABSENT; index_space],
            heap,
            capacity,
        }
    }

    fn insert(&mut self, index: usize, priority: u32) -> Result<(), HeapFull> {
        if self.len() >= self.capacity {
            return Err(HeapFull {
                capacity: self.capacity,
            });
        }
        self.priorities[index] = priority;
        self.heap.push(index);
        let slot = self.heap.len() - 1;
        self.slots[index] = slot as u32;
        self.sift_up(slot);
        Ok(())
    }

    fn pop(&mut self) -> Option<(usize, u32)> {
        if self.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(1);
        self.slots[top] = ABSENT;
        if self.heap.len() > 1 {
            self.slots[self.heap[1]] = 1;
            self.sift_down(1);
        }
        Some((top, self.priorities[top]))
    }

    fn update(&mut self, index: usize, priority: u32) {
        let slot = self.slots[index];
        if slot != ABSENT {
            self.priorities[index] = priority;
            self.sift_up(slot as usize);
        }
    }

    #[inline]
    fn priority(&self, index: usize) -> u32 {
        self.priorities[index]
    }

    #[inline]
    fn len(&self) -> usize {
        self.heap.len() - 1
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        for &index in &self.heap[1..] {
            self.slots[index] = ABSENT;
        }
        self.heap.truncate(1);
    }
}
