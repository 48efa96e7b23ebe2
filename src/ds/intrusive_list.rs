//! Doubly linked list whose nodes live in a [`SlotArena`] and link by [`SlotId`].
//!
//! Both cache policies keep their recency order in one of these. Handles are
//! stable for the lifetime of a node, so a cache can keep `key → SlotId` in a
//! hash map and reach any node in O(1) without raw pointers.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ id_0   │ { value: A, prev: None,       next: id_2 }  │
//!   │ id_1   │ { value: C, prev: Some(id_2), next: None }  │
//!   │ id_2   │ { value: B, prev: Some(id_0), next: id_1 }  │
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   head ─► [id_0] ◄──► [id_2] ◄──► [id_1] ◄── tail
//! ```
//!
//! ## Operations
//!
//! | Operation              | Time | Notes                                   |
//! |------------------------|------|-----------------------------------------|
//! | `push_front`           | O(1) | new head                                |
//! | `push_back`            | O(1) | new tail                                |
//! | `insert_before(a, v)`  | O(1) | splice ahead of `a`; at head = push     |
//! | `move_to_front(id)`    | O(1) | detach + attach at head                 |
//! | `remove(id)`           | O(1) | detach + free slot                      |
//! | `pop_back`             | O(1) |                                         |
//! | `iter` / `iter_ids`    | O(n) | head to tail                            |
//!
//! A detached node always has both links cleared before it is re-attached or
//! freed, so no stale neighbour survives a move.

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Arena-backed doubly linked list addressed by [`SlotId`].
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is currently a node in this list.
    #[inline]
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Returns the head value.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    #[inline]
    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    /// Returns the tail value.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    #[inline]
    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    /// Returns the successor of `id` (one step toward the tail).
    #[inline]
    pub fn next_id(&self, id: SlotId) -> Option<SlotId> {
        self.arena.get(id).and_then(|node| node.next)
    }

    /// Returns the predecessor of `id` (one step toward the head).
    #[inline]
    pub fn prev_id(&self, id: SlotId) -> Option<SlotId> {
        self.arena.get(id).and_then(|node| node.prev)
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Inserts `value` as the new head and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.attach_front(id);
        id
    }

    /// Inserts `value` as the new tail and returns its handle.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => {
                if let Some(node) = self.arena.get_mut(tail) {
                    node.next = Some(id);
                }
            },
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Splices `value` in immediately ahead of `anchor`.
    ///
    /// When `anchor` is the head this is a plain [`push_front`](Self::push_front).
    /// Hands the value back if `anchor` is not in the list.
    pub fn insert_before(&mut self, anchor: SlotId, value: T) -> Result<SlotId, T> {
        let Some(anchor_node) = self.arena.get(anchor) else {
            return Err(value);
        };
        let Some(prev) = anchor_node.prev else {
            return Ok(self.push_front(value));
        };

        let id = self.arena.insert(Node {
            value,
            prev: Some(prev),
            next: Some(anchor),
        });
        if let Some(prev_node) = self.arena.get_mut(prev) {
            prev_node.next = Some(id);
        }
        if let Some(anchor_node) = self.arena.get_mut(anchor) {
            anchor_node.prev = Some(id);
        }
        Ok(id)
    }

    /// Moves an existing node to the head; returns `false` if `id` is not present.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Unlinks `id`, frees its slot and returns the value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.arena.contains(id) {
            return None;
        }
        self.detach(id);
        self.arena.remove(id).map(|node| node.value)
    }

    /// Removes and returns the tail value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    /// Removes and returns the head value.
    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id)
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Values from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// Handles from head to tail.
    pub fn iter_ids(&self) -> IdIter<'_, T> {
        IdIter {
            list: self,
            current: self.head,
        }
    }

    /// Rewires the neighbours of `id` around it and clears its own links.
    fn detach(&mut self, id: SlotId) {
        let Some((prev, next)) = self.arena.get(id).map(|node| (node.prev, node.next)) else {
            return;
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.arena.get_mut(prev_id) {
                    prev_node.next = next;
                }
            },
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.arena.get_mut(next_id) {
                    next_node.prev = prev;
                }
            },
            None => self.tail = prev,
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        node.prev = None;
        node.next = old_head;

        match old_head {
            Some(old_head) => {
                if let Some(head_node) = self.arena.get_mut(old_head) {
                    head_node.prev = Some(id);
                }
            },
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    /// Walks the list and checks link symmetry, endpoints and node count.
    pub fn validate(&self) -> Result<(), InvariantError> {
        if self.head.is_none() != self.tail.is_none() {
            return Err(InvariantError::new(format!(
                "head {:?} and tail {:?} disagree on emptiness",
                self.head, self.tail
            )));
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("dangling link to {id:?}")))?;
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "node {id:?} has prev {:?}, expected {prev:?}",
                    node.prev
                )));
            }
            count += 1;
            if count > self.arena.len() {
                return Err(InvariantError::new("cycle detected while walking list"));
            }
            prev = Some(id);
            current = node.next;
        }

        if prev != self.tail {
            return Err(InvariantError::new(format!(
                "walk ended at {prev:?} but tail is {:?}",
                self.tail
            )));
        }
        if count != self.arena.len() {
            return Err(InvariantError::new(format!(
                "walked {count} nodes but arena holds {}",
                self.arena.len()
            )));
        }
        Ok(())
    }

    /// Panics if [`validate`](Self::validate) finds a broken link.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.validate() {
            panic!("intrusive list invariant violated: {err}");
        }
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over values from head to tail.
pub struct Iter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.value)
    }
}

/// Iterator over handles from head to tail.
pub struct IdIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<T> Iterator for IdIter<'_, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.list.arena.get(id)?.next;
        Some(id)
    }
}
