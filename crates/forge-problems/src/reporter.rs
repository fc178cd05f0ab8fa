//! The reporting entry point and its delivery policies.

use crate::builder::{DefaultProblemBuilder, ProblemBuilder};
use crate::emit::ProblemEmitter;
use crate::error::{ProblemDefinitionError, ProblemsError};
use crate::problem::{Problem, ProblemError};
use crate::transform::ProblemTransformer;
use forge_operations::{CurrentOperation, OperationIdentifier};
use std::sync::Arc;
use tracing::{debug, trace};

/// The problems service.
///
/// Owns the collaborators shared by every reporter in the process — the
/// emitter, the current-operation accessor, and the transformer chain — and
/// mints one [`ProblemReporter`] per reporting subsystem.
pub struct Problems {
    emitter: Arc<dyn ProblemEmitter>,
    current_operation: Arc<dyn CurrentOperation>,
    transformers: Vec<Arc<dyn ProblemTransformer>>,
}

impl Problems {
    /// A service delivering through `emitter`, correlating problems with
    /// the operation reported by `current_operation`.
    pub fn new(
        emitter: Arc<dyn ProblemEmitter>,
        current_operation: Arc<dyn CurrentOperation>,
    ) -> Self {
        Problems {
            emitter,
            current_operation,
            transformers: Vec::new(),
        }
    }

    /// Append a transformer to the chain.
    ///
    /// Transformers run in the order they were added; each one receives the
    /// output of the previous. The chain is fixed once reporters are
    /// minted.
    pub fn with_transformer(mut self, transformer: Arc<dyn ProblemTransformer>) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// A reporter whose problems carry the given namespace.
    pub fn reporter(&self, namespace: impl Into<String>) -> ProblemReporter {
        ProblemReporter::new(
            Arc::clone(&self.emitter),
            Arc::clone(&self.current_operation),
            self.transformers.clone(),
            namespace,
        )
    }
}

/// The single entry point for reporting a diagnostic.
///
/// Owns the full lifecycle from "caller wants to describe a problem" to
/// "problem is delivered or dropped, and control flow may or may not be
/// interrupted". Every reporting call runs the same private pipeline:
/// create a fresh builder, hand it to the caller's configuration callback,
/// build, then apply the delivery policy of the variant that was called.
///
/// Everything is synchronous and on the calling thread; reporters are
/// cheap to mint per namespace via [`Problems::reporter`] and safe to use
/// from many build threads at once.
pub struct ProblemReporter {
    emitter: Arc<dyn ProblemEmitter>,
    current_operation: Arc<dyn CurrentOperation>,
    transformers: Vec<Arc<dyn ProblemTransformer>>,
    namespace: String,
}

impl ProblemReporter {
    /// A reporter with an explicit collaborator set. Most code obtains
    /// reporters from [`Problems::reporter`] instead.
    pub fn new(
        emitter: Arc<dyn ProblemEmitter>,
        current_operation: Arc<dyn CurrentOperation>,
        transformers: Vec<Arc<dyn ProblemTransformer>>,
        namespace: impl Into<String>,
    ) -> Self {
        ProblemReporter {
            emitter,
            current_operation,
            transformers,
            namespace: namespace.into(),
        }
    }

    /// The namespace stamped on every problem this reporter builds.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Build a problem from the configuration callback and attempt
    /// delivery.
    ///
    /// Never raises on the caller's behalf: if no operation is in flight
    /// the problem is dropped and the call still succeeds. Unmet build
    /// invariants (missing label or category) propagate as `Err`.
    pub fn report<F>(&self, configure: F) -> Result<(), ProblemsError>
    where
        F: FnOnce(&mut dyn ProblemBuilder),
    {
        let problem = self.build_problem(configure)?;
        self.report_problem(problem);
        Ok(())
    }

    /// Build a problem that must carry an exception, deliver it, then hand
    /// the exception back for the caller to propagate.
    ///
    /// This variant exists specifically to fail the build: a callback that
    /// never attaches an exception is an illegal state, surfaced as
    /// [`ProblemsError::MissingException`] with no delivery performed.
    /// Always returns an error; callers write
    /// `return Err(reporter.throw_on_report(..).into())`.
    #[must_use]
    pub fn throw_on_report<F>(&self, configure: F) -> ProblemsError
    where
        F: FnOnce(&mut dyn ProblemBuilder),
    {
        let problem = match self.build_problem(configure) {
            Ok(problem) => problem,
            Err(err) => return err.into(),
        };
        let Some(exception) = problem.exception.clone() else {
            return ProblemsError::MissingException;
        };
        self.report_problem(problem);
        ProblemsError::Reported(exception)
    }

    /// Attach an already-raised error to a freshly built problem, deliver
    /// it, then hand the *same* error instance back so the original
    /// failure keeps propagating.
    ///
    /// The error is returned even when delivery is skipped because no
    /// operation is in flight; losing it would swallow a failure that is
    /// already unwinding.
    #[must_use]
    pub fn rethrow_with_report<F>(&self, error: ProblemError, configure: F) -> ProblemsError
    where
        F: FnOnce(&mut dyn ProblemBuilder),
    {
        let built = self.build_problem(|builder| {
            configure(&mut *builder);
            builder.with_exception(Arc::clone(&error));
        });
        match built {
            Ok(problem) => {
                self.report_problem(problem);
                ProblemsError::Reported(error)
            }
            Err(err) => err.into(),
        }
    }

    /// Build and return a problem without delivering it, for callers that
    /// inspect or aggregate problems before deciding what to do with them.
    pub fn create<F>(&self, configure: F) -> Result<Problem, ProblemsError>
    where
        F: FnOnce(&mut dyn ProblemBuilder),
    {
        Ok(self.build_problem(configure)?)
    }

    /// Deliver an already-built problem, correlated with the operation
    /// currently in flight. Dropped silently when there is none.
    pub fn report_problem(&self, problem: Problem) {
        self.report_with_id(problem, self.current_operation.current());
    }

    /// Deliver an already-built problem with an explicit operation
    /// identifier; `None` drops the problem.
    ///
    /// A diagnostic with no operation has no correlation target, so the
    /// drop is deliberate and must never fail the caller. The branch lives
    /// here, not in the emitter, so the policy stays visible.
    pub fn report_with_id(&self, problem: Problem, id: Option<OperationIdentifier>) {
        match id {
            Some(id) => {
                let problem = self.transform(problem);
                trace!(namespace = %self.namespace, operation = %id, label = %problem.label, "emitting problem");
                self.emitter.emit(problem, &id);
            }
            None => {
                debug!(namespace = %self.namespace, label = %problem.label, "no operation in flight, dropping problem");
            }
        }
    }

    fn build_problem<F>(&self, configure: F) -> Result<Problem, ProblemDefinitionError>
    where
        F: FnOnce(&mut dyn ProblemBuilder),
    {
        let mut builder: Box<dyn ProblemBuilder> =
            Box::new(DefaultProblemBuilder::new(self.namespace.as_str()));
        configure(builder.as_mut());
        builder.build()
    }

    fn transform(&self, problem: Problem) -> Problem {
        self.transformers
            .iter()
            .fold(problem, |problem, transformer| transformer.transform(problem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Severity;
    use forge_operations::OperationScope;
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("task failed")]
    struct TaskFailed;

    #[derive(Default)]
    struct CollectingEmitter {
        emitted: Mutex<Vec<(Problem, OperationIdentifier)>>,
    }

    impl CollectingEmitter {
        fn emitted(&self) -> Vec<(Problem, OperationIdentifier)> {
            self.emitted.lock().unwrap().clone()
        }
    }

    impl ProblemEmitter for CollectingEmitter {
        fn emit(&self, problem: Problem, id: &OperationIdentifier) {
            self.emitted.lock().unwrap().push((problem, id.clone()));
        }
    }

    struct Fixture {
        emitter: Arc<CollectingEmitter>,
        scope: Arc<OperationScope>,
        reporter: ProblemReporter,
    }

    fn fixture_with_transformers(transformers: Vec<Arc<dyn ProblemTransformer>>) -> Fixture {
        let emitter = Arc::new(CollectingEmitter::default());
        let scope = Arc::new(OperationScope::new());
        let reporter = ProblemReporter::new(
            emitter.clone(),
            scope.clone(),
            transformers,
            "forge.compilation",
        );
        Fixture {
            emitter,
            scope,
            reporter,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_transformers(Vec::new())
    }

    #[test]
    fn test_report_delivers_during_active_operation() {
        let f = fixture();
        f.scope.enter(OperationIdentifier::new("op-1"));

        f.reporter
            .report(|spec| {
                spec.label("unused import").category("compilation", &[]);
            })
            .unwrap();

        let emitted = f.emitter.emitted();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].0.label, "unused import");
        assert_eq!(emitted[0].0.namespace, "forge.compilation");
        assert_eq!(emitted[0].1, OperationIdentifier::new("op-1"));
    }

    #[test]
    fn test_report_drops_without_active_operation() {
        let f = fixture();

        f.reporter
            .report(|spec| {
                spec.label("unused import").category("compilation", &[]);
            })
            .unwrap();

        assert!(f.emitter.emitted().is_empty());
    }

    #[test]
    fn test_report_propagates_build_errors() {
        let f = fixture();
        f.scope.enter(OperationIdentifier::new("op-1"));

        let err = f.reporter.report(|spec| {
            spec.category("compilation", &[]);
        });

        assert!(matches!(
            err,
            Err(ProblemsError::Definition(ProblemDefinitionError::MissingLabel))
        ));
        assert!(f.emitter.emitted().is_empty());
    }

    #[test]
    fn test_transformers_run_in_registration_order() {
        let first: Arc<dyn ProblemTransformer> = Arc::new(|mut problem: Problem| {
            problem.label.push_str(" [first");
            problem
        });
        let second: Arc<dyn ProblemTransformer> = Arc::new(|mut problem: Problem| {
            problem.label.push_str(" second]");
            problem
        });
        let f = fixture_with_transformers(vec![first, second]);
        f.scope.enter(OperationIdentifier::new("op-1"));

        f.reporter
            .report(|spec| {
                spec.label("ordering").category("test", &[]);
            })
            .unwrap();

        assert_eq!(f.emitter.emitted()[0].0.label, "ordering [first second]");
    }

    #[test]
    fn test_throw_on_report_without_exception_is_illegal_state() {
        let f = fixture();
        f.scope.enter(OperationIdentifier::new("op-1"));

        let err = f.reporter.throw_on_report(|spec| {
            spec.label("broken task").category("execution", &[]);
        });

        assert!(matches!(err, ProblemsError::MissingException));
        assert!(f.emitter.emitted().is_empty());
    }

    #[test]
    fn test_throw_on_report_delivers_then_returns_the_exception() {
        let f = fixture();
        f.scope.enter(OperationIdentifier::new("op-1"));

        let error: ProblemError = Arc::new(TaskFailed);
        let returned = f.reporter.throw_on_report(|spec| {
            spec.label("task failed")
                .category("execution", &[])
                .severity(Severity::Error)
                .with_exception(Arc::clone(&error));
        });

        assert_eq!(f.emitter.emitted().len(), 1);
        assert!(Arc::ptr_eq(returned.reported().unwrap(), &error));
    }

    #[test]
    fn test_rethrow_attaches_and_returns_the_same_instance() {
        let f = fixture();
        f.scope.enter(OperationIdentifier::new("op-1"));

        let error: ProblemError = Arc::new(TaskFailed);
        let returned = f.reporter.rethrow_with_report(Arc::clone(&error), |spec| {
            spec.label("task failed").category("execution", &[]);
        });

        let emitted = f.emitter.emitted();
        assert_eq!(emitted.len(), 1);
        assert!(Arc::ptr_eq(emitted[0].0.exception.as_ref().unwrap(), &error));
        assert!(Arc::ptr_eq(returned.reported().unwrap(), &error));
    }

    #[test]
    fn test_rethrow_returns_the_error_even_without_an_operation() {
        let f = fixture();

        let error: ProblemError = Arc::new(TaskFailed);
        let returned = f.reporter.rethrow_with_report(Arc::clone(&error), |spec| {
            spec.label("task failed").category("execution", &[]);
        });

        assert!(f.emitter.emitted().is_empty());
        assert!(Arc::ptr_eq(returned.reported().unwrap(), &error));
    }

    #[test]
    fn test_rethrow_overrides_a_callback_attached_exception() {
        let f = fixture();
        f.scope.enter(OperationIdentifier::new("op-1"));

        let original: ProblemError = Arc::new(TaskFailed);
        let decoy: ProblemError = Arc::new(TaskFailed);
        let returned = f
            .reporter
            .rethrow_with_report(Arc::clone(&original), |spec| {
                spec.label("task failed")
                    .category("execution", &[])
                    .with_exception(Arc::clone(&decoy));
            });

        let emitted = f.emitter.emitted();
        assert!(Arc::ptr_eq(emitted[0].0.exception.as_ref().unwrap(), &original));
        assert!(Arc::ptr_eq(returned.reported().unwrap(), &original));
    }

    #[test]
    fn test_create_never_emits_and_never_demands_an_exception() {
        let f = fixture();
        f.scope.enter(OperationIdentifier::new("op-1"));

        let problem = f
            .reporter
            .create(|spec| {
                spec.label("inspect me").category("validation", &[]);
            })
            .unwrap();

        assert_eq!(problem.label, "inspect me");
        assert!(problem.exception.is_none());
        assert!(f.emitter.emitted().is_empty());
    }

    #[test]
    fn test_report_with_explicit_id() {
        let f = fixture();
        let problem = f
            .reporter
            .create(|spec| {
                spec.label("pre-built").category("validation", &[]);
            })
            .unwrap();

        f.reporter
            .report_with_id(problem.clone(), Some(OperationIdentifier::new("op-9")));
        f.reporter.report_with_id(problem, None);

        let emitted = f.emitter.emitted();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].1, OperationIdentifier::new("op-9"));
    }

    #[test]
    fn test_service_stamps_namespaces() {
        let emitter = Arc::new(CollectingEmitter::default());
        let scope = Arc::new(OperationScope::new());
        let problems = Problems::new(emitter.clone(), scope.clone());
        scope.enter(OperationIdentifier::new("op-1"));

        problems
            .reporter("forge.deprecation")
            .report(|spec| {
                spec.label("old API").category("deprecation", &[]);
            })
            .unwrap();
        problems
            .reporter("forge.validation")
            .report(|spec| {
                spec.label("missing input").category("validation", &[]);
            })
            .unwrap();

        let emitted = emitter.emitted();
        assert_eq!(emitted[0].0.namespace, "forge.deprecation");
        assert_eq!(emitted[1].0.namespace, "forge.validation");
    }

    #[test]
    fn test_redaction_scenario() {
        // Reporter with chain [redact_secrets], active operation "op-1".
        let redact_secrets: Arc<dyn ProblemTransformer> = Arc::new(|mut problem: Problem| {
            if let Some(details) = problem.details.take() {
                problem.details = Some(details.replace("hunter2", "<redacted>"));
            }
            problem
        });
        let f = fixture_with_transformers(vec![redact_secrets]);
        f.scope.enter(OperationIdentifier::new("op-1"));

        f.reporter
            .report(|spec| {
                spec.label("unused import")
                    .category("build", &["compile"])
                    .details("credential hunter2 leaked into the log");
            })
            .unwrap();

        let emitted = f.emitter.emitted();
        assert_eq!(emitted.len(), 1);
        let (problem, id) = &emitted[0];
        assert_eq!(problem.label, "unused import");
        assert_eq!(problem.category.to_string(), "build:compile");
        assert_eq!(
            problem.details.as_deref(),
            Some("credential <redacted> leaked into the log")
        );
        assert_eq!(id, &OperationIdentifier::new("op-1"));
    }
}
