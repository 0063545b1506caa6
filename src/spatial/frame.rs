//! Coordinate frame identifiers.

use crate::mechanism_error::MechanismError;
use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

/// A coordinate system attached to a body or joint.
///
/// Frames are compared by identity: every call to [`CartesianFrame3D::new`]
/// yields a frame distinct from all others created in the process.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CartesianFrame3D(NonZeroU64);

impl CartesianFrame3D {
    pub fn new() -> Self {
        let raw = NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed);
        // the counter starts at 1 and would need 2^64 frames to wrap
        CartesianFrame3D(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    #[inline]
    pub fn id(self) -> u64 {
        self.0.get()
    }

    /// Fallible frame comparison for public API boundaries.
    pub fn check(self, expected: CartesianFrame3D) -> Result<(), MechanismError> {
        if self == expected {
            Ok(())
        } else {
            Err(MechanismError::FrameMismatch {
                expected: expected.to_string(),
                found: self.to_string(),
            })
        }
    }
}

impl Default for CartesianFrame3D {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CartesianFrame3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.id())
    }
}

impl fmt::Display for CartesianFrame3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.id())
    }
}
