//! Basic reporting example.
//!
//! This example wires a reporter to a console emitter and shows the
//! conditional delivery policy: problems reported inside an operation are
//! delivered, problems reported outside any operation are dropped.

use forge_operations::{OperationIdentifier, OperationScope};
use forge_problems::{Problem, ProblemEmitter, Problems, Severity};
use std::sync::Arc;

struct ConsoleEmitter;

impl ProblemEmitter for ConsoleEmitter {
    fn emit(&self, problem: Problem, id: &OperationIdentifier) {
        println!("[{id}] {}: {}", problem.severity, problem.label);
        if let Some(solution) = &problem.solution {
            println!("        fix: {solution}");
        }
    }
}

fn main() {
    let scope = Arc::new(OperationScope::new());
    let problems = Problems::new(Arc::new(ConsoleEmitter), scope.clone());
    let reporter = problems.reporter("forge.compilation");

    println!("=== Inside an operation: delivered ===");
    scope.enter(OperationIdentifier::new("task:compile"));
    reporter
        .report(|spec| {
            spec.label("unused import")
                .category("compilation", &["unused-code"])
                .severity(Severity::Warning)
                .line_in_file_location("src/main.frg", 14, Some(1), None)
                .solution("remove the import");
        })
        .expect("problem definition is complete");
    scope.exit();

    println!("=== Outside any operation: dropped ===");
    reporter
        .report(|spec| {
            spec.label("this one has no correlation target")
                .category("compilation", &[]);
        })
        .expect("problem definition is complete");
    println!("(nothing was printed above - that is the point)");
}
