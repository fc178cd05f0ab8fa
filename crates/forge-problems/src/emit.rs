//! The terminal consumer of the pipeline.

use crate::problem::Problem;
use forge_operations::OperationIdentifier;

/// Performs final delivery of a transformed problem, correlated with the
/// operation that produced it.
///
/// One emitter is shared by every reporter in the process, so
/// implementations are invoked concurrently from many build threads and own
/// their thread safety. The reporter treats emission as fire-and-forget: it
/// does not await, retry, or inspect the outcome.
pub trait ProblemEmitter: Send + Sync {
    /// Deliver a problem attributed to the given operation.
    fn emit(&self, problem: Problem, id: &OperationIdentifier);
}
