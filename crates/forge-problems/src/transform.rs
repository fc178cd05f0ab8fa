//! Problem transformers.

use crate::problem::Problem;

/// A step applied to every problem after it is built and before it is
/// delivered.
///
/// Transformers enrich (attach build context, resolve stack locations) or
/// scrub (redact secrets) problems. A reporter applies its transformers
/// strictly in registration order, each receiving the output of the
/// previous one; the chain is fixed for the lifetime of the reporter.
///
/// Implementations may be invoked concurrently from many build threads and
/// must not rely on call ordering across problems.
pub trait ProblemTransformer: Send + Sync {
    /// Map a problem to its (possibly modified) replacement.
    fn transform(&self, problem: Problem) -> Problem;
}

impl<F> ProblemTransformer for F
where
    F: Fn(Problem) -> Problem + Send + Sync,
{
    fn transform(&self, problem: Problem) -> Problem {
        self(problem)
    }
}
