//! Immediate or suspended validation outcomes.
//!
//! A schema answers every `validate` call with an [`Outcome`]: a result that
//! is already known, or a future that will produce one. Composite schemas
//! never decide on their own whether to suspend. They call their children,
//! then hand the children's outcomes to [`join_all`], which stays
//! synchronous unless at least one child actually suspended.
//!
//! Futures here are not `Send`: validation runs on one thread and suspended
//! work is awaited cooperatively.

use futures::future;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tracing::trace;

use crate::issue::{IssueAccumulator, Issues, ValidationResult};
use crate::Value;

/// A suspended validation, resolved by awaiting it.
pub type PendingValidation<'a, T = Value> = Pin<Box<dyn Future<Output = ValidationResult<T>> + 'a>>;

/// What a schema returns from `validate`.
#[must_use = "an outcome does nothing until inspected or awaited"]
pub enum Outcome<'a, T = Value> {
    /// The result is already known
    Ready(ValidationResult<T>),
    /// The result needs to be awaited
    Pending(PendingValidation<'a, T>),
}

impl<'a, T: 'a> Outcome<'a, T> {
    /// An immediate success.
    pub fn ok(value: T) -> Self {
        Outcome::Ready(Ok(value))
    }

    /// An immediate failure.
    pub fn fail(issues: Issues) -> Self {
        Outcome::Ready(Err(issues))
    }

    /// An immediate failure with a single message.
    pub fn issue(message: impl Into<String>) -> Self {
        Outcome::fail(Issues::message(message))
    }

    /// Wrap a future as a suspended outcome.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = ValidationResult<T>> + 'a,
    {
        Outcome::Pending(Box::pin(future))
    }

    /// Whether the outcome must be awaited.
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending(_))
    }

    /// The immediate result, or the future if the outcome suspended.
    pub fn into_ready(self) -> Result<ValidationResult<T>, PendingValidation<'a, T>> {
        match self {
            Outcome::Ready(result) => Ok(result),
            Outcome::Pending(future) => Err(future),
        }
    }

    /// A future for the result, whether or not the outcome suspended.
    pub fn into_future(self) -> PendingValidation<'a, T> {
        match self {
            Outcome::Ready(result) => Box::pin(future::ready(result)),
            Outcome::Pending(future) => future,
        }
    }

    /// Await the result.
    pub async fn resolve(self) -> ValidationResult<T> {
        match self {
            Outcome::Ready(result) => result,
            Outcome::Pending(future) => future.await,
        }
    }

    /// Transform the result once it is known, without introducing suspension.
    pub fn map<U, F>(self, f: F) -> Outcome<'a, U>
    where
        U: 'a,
        F: FnOnce(ValidationResult<T>) -> ValidationResult<U> + 'a,
    {
        match self {
            Outcome::Ready(result) => Outcome::Ready(f(result)),
            Outcome::Pending(future) => Outcome::pending(async move { f(future.await) }),
        }
    }

    /// Continue with another outcome once this one is known.
    pub fn then<U, F>(self, f: F) -> Outcome<'a, U>
    where
        U: 'a,
        F: FnOnce(ValidationResult<T>) -> Outcome<'a, U> + 'a,
    {
        match self {
            Outcome::Ready(result) => f(result),
            Outcome::Pending(future) => {
                Outcome::pending(async move { f(future.await).resolve().await })
            }
        }
    }
}

impl<'a, T> From<ValidationResult<T>> for Outcome<'a, T> {
    fn from(result: ValidationResult<T>) -> Self {
        Outcome::Ready(result)
    }
}

impl<T: fmt::Debug> fmt::Debug for Outcome<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Outcome::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

// =============================================================================
// Execution unifier
// =============================================================================

/// Combine child outcomes, in positional order, into one parent outcome.
///
/// If every child is ready, `finish` runs immediately and the parent is ready
/// too. If any child suspended, the parent suspends, awaits *all* remaining
/// children, and only then calls `finish`. Either way `finish` receives the
/// results in the order the outcomes were given.
pub fn join_all<'a, T, R, F>(outcomes: Vec<Outcome<'a, T>>, finish: F) -> Outcome<'a, R>
where
    T: 'a,
    R: 'a,
    F: FnOnce(Vec<ValidationResult<T>>) -> ValidationResult<R> + 'a,
{
    let total = outcomes.len();
    let mut ready = Vec::with_capacity(total);
    let mut remaining = outcomes.into_iter();

    while let Some(outcome) = remaining.next() {
        match outcome {
            Outcome::Ready(result) => ready.push(result),
            Outcome::Pending(first) => {
                trace!(
                    children = total,
                    position = ready.len(),
                    "Child validation suspended, joining"
                );
                let mut suspended = Vec::with_capacity(total - ready.len());
                suspended.push(first);
                suspended.extend(remaining.map(Outcome::into_future));
                return Outcome::pending(async move {
                    ready.extend(future::join_all(suspended).await);
                    trace!(children = total, "Joined suspended child validations");
                    finish(ready)
                });
            }
        }
    }

    Outcome::Ready(finish(ready))
}

/// Aggregate-all policy: every value if nothing failed, otherwise every issue.
pub fn collect_all<T>(results: Vec<ValidationResult<T>>) -> ValidationResult<Vec<T>> {
    let mut issues = IssueAccumulator::new();
    let values: Vec<T> = results
        .into_iter()
        .filter_map(|result| issues.take(result))
        .collect();
    issues.finish(values)
}
