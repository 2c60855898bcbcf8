//! # Validators
//!
//! [`compile`] turns a [`Spec`] into a reusable [`Validator`]. Compilation
//! records the caller's source location as the validator's origin (reported
//! on errors) and mints a fresh [`Class`] identity. Composite results are
//! instances of that class, which lets a validator be nested inside other
//! specs and lets callers tell apart values produced by different
//! validators.
//!
//! ## Thread Safety
//!
//! `Validator` is `Send + Sync` and cheap to clone. Each invocation keeps
//! its state on the stack; nothing is shared between calls except the
//! immutable spec.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::check::{check, Checked, Context};
use crate::error::Result;
use crate::spec::Spec;
use crate::structure;
use crate::value::{Class, Value};

/// Class name used when no name is configured.
const DEFAULT_NAME: &str = "Spec";

/// How an exhausted union reports its failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionErrors {
    /// One error listing every branch and its failure.
    #[default]
    Aggregate,
    /// Only the last branch's error.
    Last,
}

/// Settings applied when compiling a validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Class name of the validator, used in diagnostics.
    pub name: Option<String>,
    /// Union failure reporting.
    pub union_errors: UnionErrors,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn union_errors(mut self, mode: UnionErrors) -> Self {
        self.union_errors = mode;
        self
    }
}

/// A compiled, reusable spec.
#[derive(Clone)]
pub struct Validator {
    inner: Arc<Inner>,
}

struct Inner {
    spec: Spec,
    class: Class,
    origin: String,
    context: Context,
}

/// Compile `spec` with default options.
#[track_caller]
pub fn compile(spec: impl Into<Spec>) -> Validator {
    compile_with(spec, CompileOptions::default())
}

/// Compile `spec` with explicit options.
#[track_caller]
pub fn compile_with(spec: impl Into<Spec>, options: CompileOptions) -> Validator {
    let location = Location::caller();
    let origin = format!("{}:{}:{}", location.file(), location.line(), location.column());
    let spec = spec.into();
    let name = options.name.as_deref().unwrap_or(DEFAULT_NAME);

    tracing::debug!(origin = %origin, validator = name, spec = %spec, "compiled validator");

    Validator {
        inner: Arc::new(Inner {
            class: Class::new(name),
            spec,
            origin,
            context: Context {
                union_errors: options.union_errors,
            },
        }),
    }
}

impl Validator {
    /// Check `data`, returning the normalized value.
    ///
    /// Object and tuple specs produce an instance of [`Validator::class`];
    /// every other spec returns the checked value itself.
    ///
    /// # Errors
    ///
    /// Returns the first failure, with its field trace and this validator's
    /// origin.
    pub fn validate(&self, data: &Value) -> Result<Value> {
        let inner = &*self.inner;
        let result = match &inner.spec {
            Spec::Object(fields) => structure::check_object(&inner.spec, fields, data, inner.context)
                .map(|fields| inner.class.instantiate(fields)),
            Spec::Tuple(items) => structure::check_tuple(&inner.spec, items, data, inner.context)
                .map(|items| inner.class.instantiate(items)),
            spec => check(spec, data, inner.context).map(Checked::into_value),
        };

        result.map_err(|error| {
            tracing::debug!(origin = %inner.origin, error = %error, "validation failed");
            error.with_origin(&inner.origin)
        })
    }

    /// Run [`Validator::validate`] and hand the outcome to `callback`.
    pub fn test<F, R>(&self, data: &Value, callback: F) -> R
    where
        F: FnOnce(Result<Value>) -> R,
    {
        callback(self.validate(data))
    }

    /// Returns true if `data` passes.
    pub fn is(&self, data: &Value) -> bool {
        self.validate(data).is_ok()
    }

    /// The class composite results are instances of.
    pub fn class(&self) -> &Class {
        &self.inner.class
    }

    /// Returns true if `value` was produced by this validator.
    pub fn produced(&self, value: &Value) -> bool {
        value.is_instance_of(&self.inner.class)
    }

    pub fn name(&self) -> &str {
        self.inner.class.name()
    }

    /// Source location of the `compile` call.
    pub fn origin(&self) -> &str {
        &self.inner.origin
    }

    pub fn spec(&self) -> &Spec {
        &self.inner.spec
    }
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name())
            .field("origin", &self.origin())
            .field("spec", &self.inner.spec)
            .finish()
    }
}
