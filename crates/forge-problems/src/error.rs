//! Error taxonomy for the problems pipeline.
//!
//! Two classes of failure surface as values here: unmet build-time
//! invariants on a problem definition, and the errors the throwing reporter
//! policies hand back to their callers. The third class — a builder
//! implementation breaking the self-return contract — is a programming
//! defect and panics at the point of detection instead; see
//! [`DelegatingProblemBuilder`](crate::DelegatingProblemBuilder).

use crate::problem::ProblemError;
use thiserror::Error;

/// A required field was missing when a builder was asked to produce a
/// [`Problem`](crate::Problem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProblemDefinitionError {
    /// No label was set before `build`.
    #[error("problem label must be specified")]
    MissingLabel,
    /// No category was set before `build`.
    #[error("problem category must be specified")]
    MissingCategory,
}

/// Errors surfaced by the reporter.
#[derive(Debug, Error)]
pub enum ProblemsError {
    /// The configured problem could not be built.
    #[error(transparent)]
    Definition(#[from] ProblemDefinitionError),

    /// `throw_on_report` was invoked but the configuration callback never
    /// attached an exception. The variant exists specifically to fail the
    /// build, so proceeding without one would silently change its meaning.
    #[error("throw_on_report requires an exception to be attached to the problem")]
    MissingException,

    /// The caller's own error, handed back after delivery by the throwing
    /// policies. The wrapped handle is the same instance that was attached
    /// to the problem.
    #[error("{0}")]
    Reported(ProblemError),
}

impl ProblemsError {
    /// The reported error instance, when this wraps one.
    pub fn reported(&self) -> Option<&ProblemError> {
        match self {
            ProblemsError::Reported(error) => Some(error),
            _ => None,
        }
    }
}
