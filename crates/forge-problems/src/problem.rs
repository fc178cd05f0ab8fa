//! The immutable problem record and its component value types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A shared handle to the error attached to a problem.
///
/// The handle is shared so the rethrow policy can deliver a problem and
/// still hand the very same error instance back to the caller; instance
/// identity is compared with [`Arc::ptr_eq`].
pub type ProblemError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// How serious a problem is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A suggestion the user may act on; never affects the build outcome.
    Advice,
    /// Something is wrong, but the build can proceed.
    Warning,
    /// The build cannot complete as requested.
    Error,
}

impl Severity {
    /// Lowercase name used in machine-readable output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Advice => "advice",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hierarchical classification of a problem.
///
/// The category names the broad area (e.g. `"compilation"`,
/// `"deprecation"`, `"task-validation"`); subcategories refine it in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemCategory {
    /// The top-level category name.
    pub category: String,
    /// Ordered refinements of the category.
    pub subcategories: Vec<String>,
}

impl ProblemCategory {
    /// Create a category with ordered subcategories.
    pub fn new(category: impl Into<String>, subcategories: &[&str]) -> Self {
        ProblemCategory {
            category: category.into(),
            subcategories: subcategories.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

impl fmt::Display for ProblemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.category)?;
        for sub in &self.subcategories {
            write!(f, ":{sub}")?;
        }
        Ok(())
    }
}

/// A link to documentation describing a problem in more detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocLink {
    url: String,
}

impl DocLink {
    /// A link to the given URL.
    pub fn url(url: impl Into<String>) -> Self {
        DocLink { url: url.into() }
    }

    /// The linked URL.
    pub fn as_url(&self) -> &str {
        &self.url
    }

    /// A sentence pointing the user at the linked documentation, suitable
    /// for appending to a rendered problem.
    pub fn consultation_message(&self) -> String {
        format!("For more information, please refer to {}.", self.url)
    }
}

/// Where a problem originates.
///
/// At most one location is attached to a problem; setting a new location on
/// a builder replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProblemLocation {
    /// A file, optionally narrowed to a line, column, and length.
    File {
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        column: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        length: Option<u32>,
    },
    /// A byte range within a file.
    Offset {
        path: String,
        offset: usize,
        length: usize,
    },
    /// The plugin that produced the problem.
    Plugin { plugin_id: String },
    /// The task the problem originated from.
    Task { task_path: String },
    /// Marker: the location should be resolved from the call stack.
    Stack,
}

/// An immutable diagnostic record describing an error, warning, or piece of
/// advice produced by the build.
///
/// Problems are assembled through [`ProblemBuilder`](crate::ProblemBuilder)
/// and are value types once built: cloning is cheap (the attached exception,
/// if any, is a shared handle) and no field ever changes.
///
/// `label` and `category` are always present; everything else is optional.
/// `namespace` identifies the subsystem that reported the problem and is
/// stamped by the reporter, not by the configuration callback.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Short human-readable summary.
    pub label: String,
    /// Hierarchical classification.
    pub category: ProblemCategory,
    /// How serious the problem is.
    pub severity: Severity,
    /// Where the problem originates, if known.
    pub location: Option<ProblemLocation>,
    /// Link to documentation describing the problem.
    pub documentation: Option<DocLink>,
    /// Free-text details beyond the label.
    pub details: Option<String>,
    /// Suggested fix.
    pub solution: Option<String>,
    /// The error that caused or accompanies the problem.
    pub exception: Option<ProblemError>,
    /// String-keyed payload for consumers that need structured extras.
    pub additional_data: BTreeMap<String, serde_json::Value>,
    /// The subsystem that reported the problem.
    pub namespace: String,
}

impl Problem {
    /// Start building a problem for the given reporting subsystem.
    ///
    /// Most code reports through a
    /// [`ProblemReporter`](crate::ProblemReporter), which creates builders
    /// itself; this entry point exists for callers that assemble problems
    /// standalone.
    pub fn builder(namespace: impl Into<String>) -> crate::builder::DefaultProblemBuilder {
        crate::builder::DefaultProblemBuilder::new(namespace)
    }

    /// Render this problem as a JSON value.
    ///
    /// Absent optional fields are omitted rather than serialized as null.
    /// The attached exception, when present, is rendered as its display
    /// string; the live error handle does not survive serialization.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut obj = json!({
            "namespace": self.namespace,
            "label": self.label,
            "severity": self.severity.as_str(),
            "category": self.category,
        });

        if let Some(location) = &self.location {
            obj["location"] = json!(location);
        }

        if let Some(documentation) = &self.documentation {
            obj["documentation"] = json!(documentation);
        }

        if let Some(details) = &self.details {
            obj["details"] = json!(details);
        }

        if let Some(solution) = &self.solution {
            obj["solution"] = json!(solution);
        }

        if let Some(exception) = &self.exception {
            obj["exception"] = json!(exception.to_string());
        }

        if !self.additional_data.is_empty() {
            obj["additional_data"] = json!(self.additional_data);
        }

        obj
    }
}
