//! Generational arena owning every timeline and event node.
//!
//! Nodes refer to each other through [`ArenaIndex`] handles rather than
//! references, so the tree has a single owner and back-references
//! (parent, ancestor, placement) never form ownership cycles. Each slot
//! carries a generation counter that is bumped on removal; a handle whose
//! generation no longer matches its slot is stale and resolves to `None`.

/// A handle into an [`Arena`] with a generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArenaIndex {
    index: usize,
    generation: u32,
}

impl ArenaIndex {
    /// Slot position of this handle.
    pub const fn index(self) -> usize {
        self.index
    }

    /// Generation this handle was issued for.
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl core::fmt::Display for ArenaIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage with free-list reuse.
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Create an empty arena.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live values.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the arena holds no live values.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `value` and return its handle.
    pub fn insert(&mut self, value: T) -> ArenaIndex {
        self.len = self.len.saturating_add(1);

        while let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.value = Some(value);
                return ArenaIndex {
                    index,
                    generation: slot.generation,
                };
            }
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        ArenaIndex {
            index,
            generation: 0,
        }
    }

    /// Borrow the value behind `handle`, if it is still live.
    pub fn get(&self, handle: ArenaIndex) -> Option<&T> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Mutably borrow the value behind `handle`, if it is still live.
    pub fn get_mut(&mut self, handle: ArenaIndex) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Whether `handle` still refers to a live value.
    pub fn contains(&self, handle: ArenaIndex) -> bool {
        self.get(handle).is_some()
    }

    /// Remove and return the value behind `handle`.
    ///
    /// The slot's generation is bumped so every outstanding copy of the
    /// handle becomes stale.
    pub fn remove(&mut self, handle: ArenaIndex) -> Option<T> {
        let slot = self
            .slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len = self.len.saturating_sub(1);
        Some(value)
    }

    /// Remove every live value for which `discard` returns true.
    pub fn remove_where(&mut self, mut discard: impl FnMut(&T) -> bool) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.as_ref().is_some_and(&mut discard) {
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
                self.len = self.len.saturating_sub(1);
            }
        }
    }
}
