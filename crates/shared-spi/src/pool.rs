use core::marker::PhantomData;

use heapless::Vec;

/// Fixed-capacity arena.
///
/// Slots are handed out in order and live as long as the pool; there is no
/// removal, so an index stays valid once issued.
pub(crate) struct Pool<T, const N: usize> {
    slots: Vec<T, N>,
}

impl<T, const N: usize> Pool<T, N> {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Stores `value`, returning its slot index, or gives it back when full.
    pub fn alloc(&mut self, value: T) -> Result<usize, T> {
        let index = self.slots.len();
        self.slots.push(value)?;
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }
}

impl<T, const N: usize> core::ops::Index<usize> for Pool<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.slots[index]
    }
}

impl<T, const N: usize> core::ops::IndexMut<usize> for Pool<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[index]
    }
}

/// Opaque handle to a slot of a pool.
///
/// `K` tags the kind of slot so bus and slave handles cannot be mixed up.
pub struct Handle<K> {
    index: usize,
    _kind: PhantomData<K>,
}

impl<K> Handle<K> {
    pub(crate) fn new(index: usize) -> Self {
        Self { index, _kind: PhantomData }
    }

    pub(crate) fn index(self) -> usize {
        self.index
    }
}

// Manual impls: derives would put bounds on `K`.
impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<K> Eq for Handle<K> {}

impl<K> core::hash::Hash for Handle<K> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<K> core::fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

#[cfg(feature = "defmt")]
impl<K> defmt::Format for Handle<K> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Handle({})", self.index)
    }
}
