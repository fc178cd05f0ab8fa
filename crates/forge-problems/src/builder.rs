//! Fluent assembly of problems.
//!
//! Configuration callbacks receive a `&mut dyn ProblemBuilder` and describe
//! the problem with chained field-setting calls. Every mutating method
//! returns the handle it was called on, so chains like
//! `spec.label("..").category("..", &[]).severity(..)` hold regardless of
//! how many wrapper layers sit between the callback and the accumulator.
//!
//! Within a single builder the compiler guarantees the self-return shape.
//! At trust boundaries — a builder implementation this crate does not
//! control — [`DelegatingProblemBuilder`] re-validates the contract at
//! runtime on every call and treats a violation as a fatal defect.

use crate::error::ProblemDefinitionError;
use crate::problem::{
    DocLink, Problem, ProblemCategory, ProblemError, ProblemLocation, Severity,
};
use std::collections::BTreeMap;

/// The fluent surface handed to problem configuration callbacks.
///
/// All mutators return the same builder handle to allow chaining. `build`
/// terminates the chain, consuming the builder and producing the immutable
/// [`Problem`]; it fails when a required field (label, category) was never
/// set.
pub trait ProblemBuilder {
    /// Short human-readable summary. Required.
    fn label(&mut self, label: &str) -> &mut dyn ProblemBuilder;

    /// Link to documentation by literal URL.
    fn documented_at(&mut self, url: &str) -> &mut dyn ProblemBuilder;

    /// Link to documentation by link object.
    fn documented_at_link(&mut self, link: DocLink) -> &mut dyn ProblemBuilder;

    /// The problem originates in a file. Replaces any previous location.
    fn file_location(&mut self, path: &str) -> &mut dyn ProblemBuilder;

    /// The problem originates at a line in a file, optionally narrowed to a
    /// column and length. Replaces any previous location.
    fn line_in_file_location(
        &mut self,
        path: &str,
        line: u32,
        column: Option<u32>,
        length: Option<u32>,
    ) -> &mut dyn ProblemBuilder;

    /// The problem originates at a byte range in a file. Replaces any
    /// previous location.
    fn offset_in_file_location(
        &mut self,
        path: &str,
        offset: usize,
        length: usize,
    ) -> &mut dyn ProblemBuilder;

    /// The problem originates in a plugin. Replaces any previous location.
    fn plugin_location(&mut self, plugin_id: &str) -> &mut dyn ProblemBuilder;

    /// The problem originates in a task. Replaces any previous location.
    fn task_path_location(&mut self, task_path: &str) -> &mut dyn ProblemBuilder;

    /// The location should be resolved from the call stack downstream.
    /// Replaces any previous location.
    fn stack_location(&mut self) -> &mut dyn ProblemBuilder;

    /// Hierarchical classification. Required.
    fn category(&mut self, category: &str, subcategories: &[&str]) -> &mut dyn ProblemBuilder;

    /// Free-text details beyond the label.
    fn details(&mut self, details: &str) -> &mut dyn ProblemBuilder;

    /// Suggested fix.
    fn solution(&mut self, solution: &str) -> &mut dyn ProblemBuilder;

    /// Attach a string-keyed value for consumers needing structured extras.
    fn additional_data(&mut self, key: &str, value: serde_json::Value)
    -> &mut dyn ProblemBuilder;

    /// Attach the error that caused or accompanies the problem.
    fn with_exception(&mut self, exception: ProblemError) -> &mut dyn ProblemBuilder;

    /// How serious the problem is. Defaults to [`Severity::Warning`].
    fn severity(&mut self, severity: Severity) -> &mut dyn ProblemBuilder;

    /// Produce the immutable problem, consuming the builder.
    fn build(self: Box<Self>) -> Result<Problem, ProblemDefinitionError>;
}

/// The standard accumulator behind the reporter.
///
/// Created fresh for every reporting call, mutated by exactly one
/// configuration callback on one thread, and discarded after `build`.
#[derive(Debug)]
pub struct DefaultProblemBuilder {
    namespace: String,
    label: Option<String>,
    category: Option<ProblemCategory>,
    severity: Severity,
    location: Option<ProblemLocation>,
    documentation: Option<DocLink>,
    details: Option<String>,
    solution: Option<String>,
    exception: Option<ProblemError>,
    additional_data: BTreeMap<String, serde_json::Value>,
}

impl DefaultProblemBuilder {
    /// An empty builder whose problem will carry the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        DefaultProblemBuilder {
            namespace: namespace.into(),
            label: None,
            category: None,
            severity: Severity::Warning,
            location: None,
            documentation: None,
            details: None,
            solution: None,
            exception: None,
            additional_data: BTreeMap::new(),
        }
    }
}

impl ProblemBuilder for DefaultProblemBuilder {
    fn label(&mut self, label: &str) -> &mut dyn ProblemBuilder {
        self.label = Some(label.to_owned());
        self
    }

    fn documented_at(&mut self, url: &str) -> &mut dyn ProblemBuilder {
        self.documentation = Some(DocLink::url(url));
        self
    }

    fn documented_at_link(&mut self, link: DocLink) -> &mut dyn ProblemBuilder {
        self.documentation = Some(link);
        self
    }

    fn file_location(&mut self, path: &str) -> &mut dyn ProblemBuilder {
        self.location = Some(ProblemLocation::File {
            path: path.to_owned(),
            line: None,
            column: None,
            length: None,
        });
        self
    }

    fn line_in_file_location(
        &mut self,
        path: &str,
        line: u32,
        column: Option<u32>,
        length: Option<u32>,
    ) -> &mut dyn ProblemBuilder {
        self.location = Some(ProblemLocation::File {
            path: path.to_owned(),
            line: Some(line),
            column,
            length,
        });
        self
    }

    fn offset_in_file_location(
        &mut self,
        path: &str,
        offset: usize,
        length: usize,
    ) -> &mut dyn ProblemBuilder {
        self.location = Some(ProblemLocation::Offset {
            path: path.to_owned(),
            offset,
            length,
        });
        self
    }

    fn plugin_location(&mut self, plugin_id: &str) -> &mut dyn ProblemBuilder {
        self.location = Some(ProblemLocation::Plugin {
            plugin_id: plugin_id.to_owned(),
        });
        self
    }

    fn task_path_location(&mut self, task_path: &str) -> &mut dyn ProblemBuilder {
        self.location = Some(ProblemLocation::Task {
            task_path: task_path.to_owned(),
        });
        self
    }

    fn stack_location(&mut self) -> &mut dyn ProblemBuilder {
        self.location = Some(ProblemLocation::Stack);
        self
    }

    fn category(&mut self, category: &str, subcategories: &[&str]) -> &mut dyn ProblemBuilder {
        self.category = Some(ProblemCategory::new(category, subcategories));
        self
    }

    fn details(&mut self, details: &str) -> &mut dyn ProblemBuilder {
        self.details = Some(details.to_owned());
        self
    }

    fn solution(&mut self, solution: &str) -> &mut dyn ProblemBuilder {
        self.solution = Some(solution.to_owned());
        self
    }

    fn additional_data(
        &mut self,
        key: &str,
        value: serde_json::Value,
    ) -> &mut dyn ProblemBuilder {
        self.additional_data.insert(key.to_owned(), value);
        self
    }

    fn with_exception(&mut self, exception: ProblemError) -> &mut dyn ProblemBuilder {
        self.exception = Some(exception);
        self
    }

    fn severity(&mut self, severity: Severity) -> &mut dyn ProblemBuilder {
        self.severity = severity;
        self
    }

    fn build(self: Box<Self>) -> Result<Problem, ProblemDefinitionError> {
        let label = self.label.ok_or(ProblemDefinitionError::MissingLabel)?;
        let category = self.category.ok_or(ProblemDefinitionError::MissingCategory)?;
        Ok(Problem {
            label,
            category,
            severity: self.severity,
            location: self.location,
            documentation: self.documentation,
            details: self.details,
            solution: self.solution,
            exception: self.exception,
            additional_data: self.additional_data,
            namespace: self.namespace,
        })
    }
}

/// Contract-checking wrapper around a builder this crate does not control.
///
/// Forwards every fluent call to the delegate, asserts that the handle the
/// delegate returns is the same allocation the call went to, then returns
/// itself so it remains in the chain and every subsequent call is validated
/// too. A delegate that hands back anything else would silently switch the
/// accumulator mid-chain, so the wrapper panics at the point of detection;
/// this signals a bug in the builder implementation, not a bad build, and
/// must not be caught.
///
/// `build` terminates the chain and returns the problem, so it is the one
/// method exempt from the check.
pub struct DelegatingProblemBuilder {
    delegate: Box<dyn ProblemBuilder>,
}

impl DelegatingProblemBuilder {
    /// Wrap a builder, validating its self-return behavior on every call.
    pub fn new(delegate: Box<dyn ProblemBuilder>) -> Self {
        DelegatingProblemBuilder { delegate }
    }

    fn delegate_addr(&self) -> *const () {
        std::ptr::from_ref::<dyn ProblemBuilder>(&*self.delegate).cast::<()>()
    }
}

fn assert_same_builder(expected: *const (), returned: &mut dyn ProblemBuilder) {
    let actual = std::ptr::from_ref::<dyn ProblemBuilder>(returned).cast::<()>();
    if !std::ptr::eq(expected, actual) {
        panic!("builder pattern expected to return the same builder");
    }
}

impl ProblemBuilder for DelegatingProblemBuilder {
    fn label(&mut self, label: &str) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.label(label));
        self
    }

    fn documented_at(&mut self, url: &str) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.documented_at(url));
        self
    }

    fn documented_at_link(&mut self, link: DocLink) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.documented_at_link(link));
        self
    }

    fn file_location(&mut self, path: &str) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.file_location(path));
        self
    }

    fn line_in_file_location(
        &mut self,
        path: &str,
        line: u32,
        column: Option<u32>,
        length: Option<u32>,
    ) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(
            expected,
            self.delegate.line_in_file_location(path, line, column, length),
        );
        self
    }

    fn offset_in_file_location(
        &mut self,
        path: &str,
        offset: usize,
        length: usize,
    ) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(
            expected,
            self.delegate.offset_in_file_location(path, offset, length),
        );
        self
    }

    fn plugin_location(&mut self, plugin_id: &str) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.plugin_location(plugin_id));
        self
    }

    fn task_path_location(&mut self, task_path: &str) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.task_path_location(task_path));
        self
    }

    fn stack_location(&mut self) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.stack_location());
        self
    }

    fn category(&mut self, category: &str, subcategories: &[&str]) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.category(category, subcategories));
        self
    }

    fn details(&mut self, details: &str) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.details(details));
        self
    }

    fn solution(&mut self, solution: &str) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.solution(solution));
        self
    }

    fn additional_data(
        &mut self,
        key: &str,
        value: serde_json::Value,
    ) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.additional_data(key, value));
        self
    }

    fn with_exception(&mut self, exception: ProblemError) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.with_exception(exception));
        self
    }

    fn severity(&mut self, severity: Severity) -> &mut dyn ProblemBuilder {
        let expected = self.delegate_addr();
        assert_same_builder(expected, self.delegate.severity(severity));
        self
    }

    fn build(self: Box<Self>) -> Result<Problem, ProblemDefinitionError> {
        self.delegate.build()
    }
}
