//! Delivery policy example.
//!
//! Demonstrates the four reporter variants: report, throw_on_report,
//! rethrow_with_report, and create.

use forge_operations::{OperationIdentifier, OperationScope};
use forge_problems::{Problem, ProblemEmitter, ProblemError, Problems, ProblemsError, Severity};
use std::sync::Arc;

struct ConsoleEmitter;

impl ProblemEmitter for ConsoleEmitter {
    fn emit(&self, problem: Problem, id: &OperationIdentifier) {
        println!("delivered [{id}] {}", problem.label);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("compilation failed with 3 errors")]
struct CompilationFailed;

fn compile(reporter: &forge_problems::ProblemReporter) -> Result<(), ProblemsError> {
    let error: ProblemError = Arc::new(CompilationFailed);
    Err(reporter.throw_on_report(move |spec| {
        spec.label("compilation failed")
            .category("compilation", &[])
            .severity(Severity::Error)
            .with_exception(error);
    }))
}

fn main() {
    let scope = Arc::new(OperationScope::new());
    let problems = Problems::new(Arc::new(ConsoleEmitter), scope.clone());
    let reporter = problems.reporter("forge.compilation");

    scope.enter(OperationIdentifier::new("task:compile"));

    println!("=== report: deliver, keep going ===");
    reporter
        .report(|spec| {
            spec.label("deprecated flag").category("deprecation", &[]);
        })
        .unwrap();

    println!("\n=== throw_on_report: deliver, then fail the build ===");
    match compile(&reporter) {
        Ok(()) => unreachable!(),
        Err(err) => println!("build aborted: {err}"),
    }

    println!("\n=== rethrow_with_report: annotate an in-flight failure ===");
    let original: ProblemError = Arc::new(CompilationFailed);
    let rethrown = reporter.rethrow_with_report(Arc::clone(&original), |spec| {
        spec.label("compilation failed in an included build")
            .category("compilation", &[])
            .severity(Severity::Error);
    });
    println!(
        "same error instance handed back: {}",
        Arc::ptr_eq(rethrown.reported().unwrap(), &original)
    );

    println!("\n=== create: build without delivering ===");
    let problem = reporter
        .create(|spec| {
            spec.label("inspect me").category("validation", &[]);
        })
        .unwrap();
    println!("built but not delivered: {}", problem.to_json());
}
