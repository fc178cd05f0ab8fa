//! Access to the currently executing operation.

use crate::id::OperationIdentifier;
use std::sync::RwLock;

/// Read access to the identifier of the unit of work currently in flight.
///
/// Returns `None` when no operation is executing. Reads must be idempotent
/// and side-effect free; consumers never mutate the scope through this
/// trait.
pub trait CurrentOperation: Send + Sync {
    /// The identifier of the current unit of work, if any.
    fn current(&self) -> Option<OperationIdentifier>;
}

/// An explicit scope the engine enters when it starts a unit of work and
/// exits when the unit finishes.
///
/// The scope is shared by value (typically behind an `Arc`) and handed to
/// consumers as a [`CurrentOperation`] trait object. Keeping it an ordinary
/// injected value rather than process-global state means any test can stand
/// up its own scope.
#[derive(Debug, Default)]
pub struct OperationScope {
    current: RwLock<Option<OperationIdentifier>>,
}

impl OperationScope {
    /// Create a scope with no operation in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as the operation in flight.
    ///
    /// Returns the previously current identifier so nested callers can
    /// restore it when their unit of work finishes.
    pub fn enter(&self, id: OperationIdentifier) -> Option<OperationIdentifier> {
        self.lock_write().replace(id)
    }

    /// Clear the operation in flight, returning it.
    pub fn exit(&self) -> Option<OperationIdentifier> {
        self.lock_write().take()
    }

    fn lock_write(&self) -> std::sync::RwLockWriteGuard<'_, Option<OperationIdentifier>> {
        self.current.write().expect("operation scope lock poisoned")
    }
}

impl CurrentOperation for OperationScope {
    fn current(&self) -> Option<OperationIdentifier> {
        self.current
            .read()
            .expect("operation scope lock poisoned")
            .clone()
    }
}
