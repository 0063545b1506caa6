//! `BodyId` / `JointId`: strong, zero-cost handles for mechanism entities
//!
//! Bodies are the vertices and joints the edges of a mechanism's directed
//! graph. Each handle wraps a nonzero `u32` so that `Option<BodyId>` is the
//! same size as the handle itself; 0 is reserved as an invalid value.
//!
//! Handles are stable for the lifetime of a mechanism. The dense position of a
//! handle inside the graph's arrays is tracked separately by the graph (see
//! [`DirectedGraph::vertex_index`](crate::topology::graph::DirectedGraph::vertex_index))
//! and may change when other entries are removed.

use std::{fmt, num::NonZeroU32};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Creates a handle from a raw value, or `None` if `raw == 0`.
            #[inline]
            pub fn new(raw: u32) -> Option<Self> {
                NonZeroU32::new(raw).map(Self)
            }

            /// Takes the next unused handle from `alloc`.
            #[inline]
            pub(crate) fn allocate(alloc: &mut IdAllocator) -> Self {
                Self(alloc.next_raw())
            }

            /// Returns the raw value of this handle.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple($label).field(&self.get()).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.get())
            }
        }
    };
}

define_id!(
    /// Handle of a rigid body (a vertex of the mechanism graph).
    BodyId,
    "BodyId"
);

define_id!(
    /// Handle of a joint (an edge of the mechanism graph).
    JointId,
    "JointId"
);

/// Monotonic allocator for nonzero handles.
#[derive(Clone, Debug)]
pub(crate) struct IdAllocator {
    next: NonZeroU32,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self {
            next: NonZeroU32::MIN,
        }
    }

    pub(crate) fn next_raw(&mut self) -> NonZeroU32 {
        let raw = self.next;
        self.next = raw.saturating_add(1);
        raw
    }
}
