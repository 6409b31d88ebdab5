//! Fixed-capacity binary max-heap of pending operations.
//!
//! Slots `[0, len)` are always occupied. For slot `i`, the parent lives at
//! `(i - 1) / 2` and the children at `2i + 1` and `2i + 2`. Ordering follows
//! [`Transaction::compare`], which reads account balances live.

use crate::error::{DispatchError, Result};
use crate::transaction::Transaction;

fn parent(index: usize) -> usize {
    (index - 1) / 2
}

fn children(index: usize) -> [usize; 2] {
    [2 * index + 1, 2 * index + 2]
}

/// A bounded priority queue of [`Transaction`]s.
///
/// The backing buffer is reserved once at construction and never grows past
/// `capacity`; inserting into a full heap fails instead of resizing.
#[derive(Debug)]
pub struct TransactionHeap {
    /// Occupied slots in heap order.
    slots: Vec<Transaction>,

    /// Maximum number of slots.
    capacity: usize,
}

impl TransactionHeap {
    /// Creates an empty heap holding at most `capacity` operations.
    pub fn new(capacity: usize) -> Self {
        TransactionHeap {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds an operation and sifts it up to its place.
    ///
    /// Fails with [`DispatchError::CapacityExceeded`] when the heap is full;
    /// the heap is left untouched.
    pub fn insert(&mut self, transaction: Transaction) -> Result<()> {
        if self.is_full() {
            return Err(DispatchError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        self.slots.push(transaction);
        self.heapify_up(self.slots.len() - 1);
        Ok(())
    }

    /// Removes and returns the highest-ranked operation.
    ///
    /// The last slot moves into the root and is sifted down.
    pub fn extract_max(&mut self) -> Result<Transaction> {
        if self.slots.is_empty() {
            return Err(DispatchError::Empty);
        }

        let max = self.slots.swap_remove(0);
        if !self.slots.is_empty() {
            self.heapify_down(0);
        }
        Ok(max)
    }

    /// Returns the highest-ranked operation without removing it.
    pub fn peek(&self) -> Result<&Transaction> {
        self.slots.first().ok_or(DispatchError::Empty)
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
        self.slots.len() >= self.capacity
    }

    /// Occupied slots in heap (not sorted) order.
    pub fn as_slice(&self) -> &[Transaction] {
        &self.slots
    }

    /// Checks that no slot outranks its parent under the current balances.
    ///
    /// Can turn `false` without any heap call if a referenced account balance
    /// changes while its operations are queued.
    pub fn satisfies_heap_order(&self) -> bool {
        (1..self.slots.len()).all(|i| !self.slots[i].outranks(&self.slots[parent(i)]))
    }

    fn heapify_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent_index = parent(index);
            if !self.slots[index].outranks(&self.slots[parent_index]) {
                break;
            }
            self.slots.swap(index, parent_index);
            index = parent_index;
        }
    }

    fn heapify_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let mut max_index = index;
            for child in children(index) {
                if child < len && self.slots[child].outranks(&self.slots[max_index]) {
                    max_index = child;
                }
            }

            if max_index == index {
                break;
            }
            self.slots.swap(index, max_index);
            index = max_index;
        }
    }
}
