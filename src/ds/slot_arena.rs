//! Slot arena: `Vec`-backed node storage addressed by stable [`SlotId`] handles.
//!
//! Freed slots are recycled through a free list, so a long-running cache that
//! churns through entries keeps a bounded allocation instead of growing.
//! Handles stay valid until the slot is removed; a removed handle reads back
//! as `None` until its slot is reused.
//!
//! ```text
//!   slots:     [ Some(a) | None | Some(c) | Some(d) ]
//!   free_list: [ 1 ]            ← next insert lands in slot 1
//! ```

/// Stable handle to a slot in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Returns the raw slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena of `T` with O(1) insert, remove and lookup by [`SlotId`].
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Creates an arena with room for `capacity` live slots before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value`, reusing a freed slot when one is available.
    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none(), "free slot {idx} still occupied");
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.len += 1;
        SlotId(idx)
    }

    /// Frees the slot and returns its value; `None` if the slot was already empty.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    #[inline]
    pub fn contains(&self, id: SlotId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value and forgets all handles.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
