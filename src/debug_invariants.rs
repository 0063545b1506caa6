//! Opt-in structural invariant checks for graphs, trees and mechanisms.
//!
//! Checks run in debug builds, or in release builds with the
//! `check-invariants` / `strict-invariants` features.

use crate::mechanism_error::MechanismError;

/// Types whose internal bookkeeping can be validated on demand.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation encountered.
    fn validate_invariants(&self) -> Result<(), MechanismError>;

    /// Panic on the first violation when invariant checking is enabled.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "structure");
    }
}

/// Run a fallible check and panic on error when invariant checking is enabled.
///
/// The second argument is a string literal naming the checked structure; it is
/// prefixed to the panic message.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
