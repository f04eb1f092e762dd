//! Shared helpers for tests.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::issue::Issues;
use crate::schema::{Schema, SchemaRef};
use crate::schemas::{CustomSchema, custom_async};
use crate::Value;

/// Future that is pending exactly once, waking itself before returning.
pub fn yield_once() -> impl Future<Output = ()> {
    YieldOnce { yielded: false }
}

struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Same verdict as `schema`, but always suspends first.
pub fn deferred<S: Schema + 'static>(schema: S) -> CustomSchema {
    let schema: SchemaRef = schema.into_ref();
    custom_async(move |input| {
        let schema = schema.clone();
        async move {
            yield_once().await;
            schema.validate(input).resolve().await
        }
    })
}

/// Asynchronous string check with the usual message.
pub fn async_string() -> CustomSchema {
    custom_async(|input| async move {
        yield_once().await;
        match input {
            Value::String(_) => Ok(input),
            _ => Err(Issues::message("Not a valid string")),
        }
    })
}

/// Issue messages of a failed result.
pub fn messages(result: &crate::ValidationResult) -> Vec<String> {
    match result {
        Ok(_) => Vec::new(),
        Err(issues) => issues.iter().map(|issue| issue.message.clone()).collect(),
    }
}
