//! Common bound aliases used across topology code.
//!
//! These traits have blanket impls, so any type satisfying the underlying
//! bounds will automatically implement them.

/// Canonical bound set for vertex and edge handles stored in a
/// [`DirectedGraph`](crate::topology::graph::DirectedGraph).
///
/// Handles are small immutable `Copy` keys. The graph keeps each handle's
/// current position in its own index maps (see `vertex_index`/`edge_index`)
/// and updates them on insertion and compaction.
pub trait GraphKey: Copy + Eq + std::hash::Hash + Ord + std::fmt::Debug {}
impl<T> GraphKey for T where T: Copy + Eq + std::hash::Hash + Ord + std::fmt::Debug {}
