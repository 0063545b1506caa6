//! Memoized values with a dirty bit.

/// A memoized value.
///
/// The stored value is only meaningful while the element is clean. Elements
/// start dirty; an immutable element stays clean once computed, a mutable one
/// is marked dirty again by [`CacheElement::set_dirty`].
#[derive(Clone, Debug)]
pub(crate) struct CacheElement<V> {
    value: V,
    dirty: bool,
    mutable: bool,
    recomputes: u64,
}

impl<V> CacheElement<V> {
    /// A dirty element holding `placeholder` until first computed.
    pub(crate) fn new(placeholder: V, mutable: bool) -> Self {
        Self {
            value: placeholder,
            dirty: true,
            mutable,
            recomputes: 0,
        }
    }

    #[inline]
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub(crate) fn is_mutable(&self) -> bool {
        self.mutable
    }

    #[inline]
    pub(crate) fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Current value; the element must be clean.
    #[inline]
    pub(crate) fn get(&self) -> &V {
        debug_assert!(!self.dirty, "read of a dirty cache element");
        &self.value
    }

    pub(crate) fn store(&mut self, value: V) {
        self.value = value;
        self.dirty = false;
        self.recomputes += 1;
    }

    #[inline]
    pub(crate) fn set_dirty(&mut self) {
        if self.mutable {
            self.dirty = true;
        }
    }
}
