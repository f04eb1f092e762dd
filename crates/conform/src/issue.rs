//! Validation issues and results.
//!
//! Every validation step ends in a [`ValidationResult`]: either the validated
//! value or a non-empty, ordered list of [`Issue`]s. Composite schemas merge
//! their children's issues through an [`IssueAccumulator`], which keeps
//! encounter order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::trace;

use crate::Value;

/// A single human-readable validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable failure reason
    pub message: String,
}

impl Issue {
    /// Create an issue with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Returned when building [`Issues`] from an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("issue list must not be empty")]
pub struct EmptyIssues;

/// Ordered, non-empty list of issues.
///
/// The only way to build one is from at least one [`Issue`], so a failure can
/// never be reported without a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Issue>", into = "Vec<Issue>")]
pub struct Issues(Vec<Issue>);

impl Issues {
    /// A list holding exactly one issue.
    pub fn single(issue: Issue) -> Self {
        Self(vec![issue])
    }

    /// A list holding one issue with the given message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::single(Issue::new(message))
    }

    /// Build from a vector, rejecting an empty one.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self(issues))
        }
    }

    /// Append one issue.
    pub fn push(&mut self, issue: Issue) {
        self.0.push(issue);
    }

    /// Append every issue of `other`, keeping its order.
    pub fn extend(&mut self, other: Issues) {
        self.0.extend(other.0);
    }

    /// The first issue; always present.
    pub fn first(&self) -> &Issue {
        &self.0[0]
    }

    /// Number of issues; never zero.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; provided for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the issues in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.0.iter()
    }

    /// Borrow the issues as a slice.
    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    /// All messages, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|issue| issue.message.as_str()).collect()
    }

    /// Messages joined with `separator`.
    pub fn joined(&self, separator: &str) -> String {
        self.messages().join(separator)
    }

    /// Unwrap into the underlying vector.
    pub fn into_vec(self) -> Vec<Issue> {
        self.0
    }
}

impl TryFrom<Vec<Issue>> for Issues {
    type Error = EmptyIssues;

    fn try_from(issues: Vec<Issue>) -> Result<Self, Self::Error> {
        Self::from_vec(issues).ok_or(EmptyIssues)
    }
}

impl From<Issues> for Vec<Issue> {
    fn from(issues: Issues) -> Self {
        issues.0
    }
}

impl From<Issue> for Issues {
    fn from(issue: Issue) -> Self {
        Self::single(issue)
    }
}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined(", "))
    }
}

/// Outcome of one resolved validation: the value, or why it was rejected.
pub type ValidationResult<T = Value> = Result<T, Issues>;

/// Collects issues from several children in encounter order.
#[derive(Debug, Default)]
pub struct IssueAccumulator {
    issues: Option<Issues>,
}

impl IssueAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child's issues.
    pub fn record(&mut self, issues: Issues) {
        match &mut self.issues {
            Some(existing) => existing.extend(issues),
            None => self.issues = Some(issues),
        }
    }

    /// Keep a successful value, or record the failure and return `None`.
    pub fn take<T>(&mut self, result: ValidationResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(issues) => {
                self.record(issues);
                None
            }
        }
    }

    /// Whether anything has been recorded.
    pub fn has_issues(&self) -> bool {
        self.issues.is_some()
    }

    /// The recorded issues, if any.
    pub fn into_issues(self) -> Option<Issues> {
        self.issues
    }

    /// `Ok(value)` when nothing was recorded, otherwise every recorded issue.
    pub fn finish<T>(self, value: T) -> ValidationResult<T> {
        match self.issues {
            None => Ok(value),
            Some(issues) => {
                trace!(issue_count = issues.len(), "Aggregated child failures");
                Err(issues)
            }
        }
    }
}
