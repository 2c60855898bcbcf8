//! # Resolver
//!
//! The recursive dispatcher. Given a spec and a value it selects the rule
//! that applies, in fixed precedence:
//!
//! 1. compiled sub-validator, invoked directly;
//! 2. combinator, each with its own rule;
//! 3. primitive kind;
//! 4. class membership;
//! 5. composite shape (see [`crate::structure`]).
//!
//! Results are [`Checked`] so that a default produced by `Maybe` can be
//! told apart from a value that was actually present; the marker is
//! removed before anything reaches a target container or the caller.

use crate::cast;
use crate::error::{BranchFailure, Error, ErrorKind, Result, Segment};
use crate::spec::{Combinator, CustomFn, Spec};
use crate::structure;
use crate::validator::UnionErrors;
use crate::value::{Class, Value};

/// Outcome of checking one value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Checked {
    /// The checked (possibly converted) value.
    Value(Value),
    /// A `Maybe` default standing in for a missing value.
    Default(Value),
}

impl Checked {
    pub(crate) fn into_value(self) -> Value {
        match self {
            Checked::Value(value) | Checked::Default(value) => value,
        }
    }

    /// True when nothing was produced: an `undefined` that is not a default.
    pub(crate) fn is_absent(&self) -> bool {
        matches!(self, Checked::Value(Value::Undefined))
    }
}

/// Per-invocation settings threaded through the recursion.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Context {
    pub(crate) union_errors: UnionErrors,
}

/// Check `value` against `spec`.
pub(crate) fn check(spec: &Spec, value: &Value, cx: Context) -> Result<Checked> {
    match spec {
        Spec::Validator(validator) => validator.validate(value).map(Checked::Value),

        Spec::Maybe { spec, default } => check_maybe(spec, default.as_ref(), value, cx),
        Spec::And(specs) => check_and(specs, value, cx),
        Spec::Or(specs) => check_or(specs, value, cx),
        Spec::Exactly(expected) => check_exactly(expected, value),
        Spec::Custom(validate) => check_custom(validate, value),
        Spec::List { element, min, max } => check_list(element, *min, *max, value, cx),
        Spec::Cast(cast) => cast::apply(cast, value, cx).map(Checked::Value),
        Spec::Any | Spec::Uninitialized(Combinator::Any) => Ok(Checked::Value(value.clone())),
        Spec::Uninitialized(combinator) => Err(Error::configuration(format!(
            "{} must be initialized before use, eg: {}",
            combinator.name(),
            combinator.signature()
        ))),

        Spec::Primitive(primitive) => primitive.check(value).map(Checked::Value),
        Spec::Class(class) => check_class(class, value).map(Checked::Value),

        Spec::Object(fields) => {
            structure::check_object(spec, fields, value, cx).map(|map| Checked::Value(map.into()))
        }
        Spec::Tuple(items) => {
            structure::check_tuple(spec, items, value, cx).map(|items| Checked::Value(items.into()))
        }
    }
}

fn check_maybe(
    spec: &Spec,
    default: Option<&Value>,
    value: &Value,
    cx: Context,
) -> Result<Checked> {
    if value.is_nullish() {
        return Ok(match default {
            Some(default) => Checked::Default(default.clone()),
            None => Checked::Value(value.clone()),
        });
    }
    check(spec, value, cx)
}

fn check_and(specs: &[Spec], value: &Value, cx: Context) -> Result<Checked> {
    let mut current = Checked::Value(value.clone());
    for spec in specs {
        let input = current.into_value();
        current = check(spec, &input, cx)?;
    }
    Ok(current)
}

fn check_or(specs: &[Spec], value: &Value, cx: Context) -> Result<Checked> {
    let mut failures: Vec<(&Spec, Error)> = Vec::with_capacity(specs.len());
    for spec in specs {
        match check(spec, value, cx) {
            Ok(checked) => return Ok(checked),
            Err(error) => {
                tracing::trace!(branch = %spec, error = %error, "union branch rejected value");
                failures.push((spec, error));
            }
        }
    }

    if cx.union_errors == UnionErrors::Last {
        if let Some((_, error)) = failures.pop() {
            return Err(error);
        }
    }

    Err(Error::new(ErrorKind::UnionExhausted {
        branches: failures
            .into_iter()
            .map(|(spec, error)| BranchFailure {
                description: spec.to_string(),
                message: error.to_string(),
            })
            .collect(),
        actual: value.to_string(),
    }))
}

fn check_exactly(expected: &Value, value: &Value) -> Result<Checked> {
    if expected.strict_eq(value) {
        Ok(Checked::Value(value.clone()))
    } else {
        Err(Error::new(ErrorKind::ExactValueMismatch {
            expected: expected.to_string(),
            actual: value.to_string(),
        }))
    }
}

fn check_custom(validate: &CustomFn, value: &Value) -> Result<Checked> {
    match validate(value) {
        Ok(Some(replacement)) => Ok(Checked::Value(replacement)),
        Ok(None) => Ok(Checked::Value(value.clone())),
        Err(message) => Err(Error::new(ErrorKind::PredicateFailed { message })),
    }
}

fn check_list(
    element: &Spec,
    min: usize,
    max: Option<usize>,
    value: &Value,
    cx: Context,
) -> Result<Checked> {
    let items = value.as_array().ok_or_else(|| {
        Error::new(ErrorKind::ShapeMismatch {
            expected: Spec::List {
                element: Box::new(element.clone()),
                min,
                max,
            }
            .to_string(),
            actual: value.to_string(),
        })
    })?;

    let len = items.len();
    if len < min || max.is_some_and(|max| len > max) {
        return Err(Error::new(ErrorKind::LengthOutOfBounds { min, max, len }));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            check(element, item, cx)
                .map(Checked::into_value)
                .map_err(|e| e.within(Segment::Index(index)))
        })
        .collect::<Result<Vec<_>>>()
        .map(|items| Checked::Value(Value::Array(items)))
}

fn check_class(class: &Class, value: &Value) -> Result<Value> {
    if value.is_instance_of(class) {
        Ok(value.clone())
    } else {
        Err(Error::new(ErrorKind::TypeMismatch {
            expected: class.name().to_string(),
            actual: value.to_string(),
        }))
    }
}
