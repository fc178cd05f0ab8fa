//! Build operation identity for Forge.
//!
//! Everything the build engine executes — configuring a project, running a
//! task, resolving an input — runs inside an *operation*. This crate provides
//! the correlation handle for those units of work and an explicit,
//! shareable scope object that answers "which operation is executing right
//! now?".
//!
//! The core types are:
//! - [`OperationIdentifier`]: opaque handle naming a unit of work
//! - [`CurrentOperation`]: read access to the operation in flight, if any
//! - [`OperationScope`]: a concrete scope the engine enters and exits
//!
//! The scope is an ordinary value that callers share and inject; consumers
//! that only need to *read* the current operation take a
//! [`CurrentOperation`] handle, so they can be exercised without a running
//! engine.
//!
//! # Example
//!
//! ```rust
//! use forge_operations::{CurrentOperation, OperationIdentifier, OperationScope};
//!
//! let scope = OperationScope::new();
//! assert!(scope.current().is_none());
//!
//! scope.enter(OperationIdentifier::new("configure:app"));
//! assert_eq!(scope.current().unwrap().as_str(), "configure:app");
//!
//! scope.exit();
//! assert!(scope.current().is_none());
//! ```

pub mod id;
pub mod scope;

pub use id::OperationIdentifier;
pub use scope::{CurrentOperation, OperationScope};
