//! Structured problem collection and reporting for Forge.
//!
//! Every subsystem of the build tool reports diagnostics — errors, warnings,
//! deprecations, advice — through this crate, without knowing how they are
//! ultimately consumed (console, IDE, telemetry). A reported diagnostic is a
//! [`Problem`]: an immutable record with a label, a hierarchical category, a
//! severity, and optional location, documentation, solution, and exception
//! information.
//!
//! # Architecture
//!
//! The pipeline is `configure -> build -> transform -> emit`:
//!
//! - [`ProblemBuilder`]: the fluent surface a configuration callback mutates
//! - [`ProblemReporter`]: drives the builder, correlates the finished
//!   problem with the operation currently executing, and delivers it
//! - [`ProblemTransformer`]: enrichment/redaction steps applied in
//!   registration order before delivery
//! - [`ProblemEmitter`]: the terminal consumer performing actual delivery
//! - [`Problems`]: the service owning the shared collaborators, minting one
//!   reporter per reporting subsystem (namespace)
//!
//! A problem reported while no operation is in flight has no correlation
//! target and is dropped rather than delivered; reporting never fails a
//! build on its own.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use forge_operations::{OperationIdentifier, OperationScope};
//! use forge_problems::{Problem, ProblemEmitter, Problems, Severity};
//!
//! struct ConsoleEmitter;
//!
//! impl ProblemEmitter for ConsoleEmitter {
//!     fn emit(&self, problem: Problem, id: &OperationIdentifier) {
//!         println!("[{id}] {}: {}", problem.severity, problem.label);
//!     }
//! }
//!
//! let scope = Arc::new(OperationScope::new());
//! let problems = Problems::new(Arc::new(ConsoleEmitter), scope.clone());
//! let reporter = problems.reporter("forge.compilation");
//!
//! scope.enter(OperationIdentifier::new("op-1"));
//! reporter.report(|spec| {
//!     spec.label("unused import")
//!         .category("compilation", &["unused-code"])
//!         .severity(Severity::Warning)
//!         .file_location("src/main.frg");
//! })?;
//! # Ok::<(), forge_problems::ProblemsError>(())
//! ```

pub mod builder;
pub mod emit;
pub mod error;
pub mod problem;
pub mod reporter;
pub mod transform;

// Re-export main types for convenience
pub use builder::{DefaultProblemBuilder, DelegatingProblemBuilder, ProblemBuilder};
pub use emit::ProblemEmitter;
pub use error::{ProblemDefinitionError, ProblemsError};
pub use problem::{DocLink, Problem, ProblemCategory, ProblemError, ProblemLocation, Severity};
pub use reporter::{ProblemReporter, Problems};
pub use transform::ProblemTransformer;
