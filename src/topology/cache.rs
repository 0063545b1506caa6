//! Cache invalidation shared by structures that memoize derived quantities.

/// Anything that memoizes values derived from mutable inputs (per-state
/// kinematics, per-topology coordinate layouts, …) implements this.
pub trait InvalidateCache {
    /// Mark *all* memoized values stale. Must not recompute anything eagerly.
    fn invalidate_cache(&mut self);
}

