//! User-supplied validation functions.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use crate::issue::ValidationResult;
use crate::outcome::Outcome;
use crate::schema::{Schema, SchemaKind};
use crate::Value;

type Validator = Rc<dyn Fn(Value) -> Outcome<'static>>;

/// Schema backed by a closure.
///
/// Built with [`custom`] for immediate checks or [`custom_async`] for checks
/// that have to wait on something. The async form is the only leaf that
/// suspends.
#[derive(Clone)]
pub struct CustomSchema {
    validator: Validator,
    suspends: bool,
}

impl CustomSchema {
    /// Whether every validation suspends.
    pub fn is_async(&self) -> bool {
        self.suspends
    }
}

impl fmt::Debug for CustomSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSchema")
            .field("suspends", &self.suspends)
            .finish_non_exhaustive()
    }
}

impl Schema for CustomSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Custom
    }

    fn validate(&self, input: Value) -> Outcome<'_> {
        (self.validator)(input)
    }
}

/// Validate with a synchronous function.
///
/// ```rust
/// use conform::{parse, schemas::custom, Issues, Value};
///
/// let even = custom(|input| match input.as_f64() {
///     Some(n) if n % 2.0 == 0.0 => Ok(input),
///     _ => Err(Issues::message("Not even")),
/// });
/// assert!(parse(&even, 4).is_ok());
/// assert!(parse(&even, 3).is_err());
/// ```
pub fn custom<F>(validate: F) -> CustomSchema
where
    F: Fn(Value) -> ValidationResult + 'static,
{
    CustomSchema {
        validator: Rc::new(move |input| Outcome::Ready(validate(input))),
        suspends: false,
    }
}

/// Validate with a function returning a future.
pub fn custom_async<F, Fut>(validate: F) -> CustomSchema
where
    F: Fn(Value) -> Fut + 'static,
    Fut: Future<Output = ValidationResult> + 'static,
{
    CustomSchema {
        validator: Rc::new(move |input| Outcome::pending(validate(input))),
        suspends: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Issues;
    use futures::executor::block_on;

    #[test]
    fn test_custom_is_immediate() {
        let schema = custom(|input| {
            if input.is_null() {
                Err(Issues::message("null"))
            } else {
                Ok(input)
            }
        });
        assert!(!schema.is_async());
        let outcome = schema.validate(Value::Null);
        assert!(!outcome.is_pending());
        assert_eq!(outcome.into_ready().ok(), Some(Err(Issues::message("null"))));
    }

    #[test]
    fn test_custom_can_transform() {
        let doubled = custom(|input| match input.as_f64() {
            Some(n) => Ok(Value::from(n * 2.0)),
            None => Err(Issues::message("Not a number")),
        });
        assert_eq!(crate::parse(&doubled, 21).unwrap(), Value::from(42));
    }

    #[test]
    fn test_custom_async_always_suspends() {
        let schema = custom_async(|input| async move { Ok(input) });
        assert!(schema.is_async());
        let outcome = schema.validate(Value::from(1));
        assert!(outcome.is_pending());
        assert_eq!(block_on(outcome.resolve()), Ok(Value::from(1)));
    }
}
